//! TOML scenario files: a terrain, the worms that start on it and a script of
//! actions replayed against the resulting world.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;
use worms_core::{Command, Position, TerrainGrid};
use worms_world::{World, WorldConfig};

use crate::terrain_map::{parse_map, TerrainMapError};

/// Scenario loaded from disk.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Scenario {
    /// Terrain and world tunables.
    pub(crate) world: WorldSection,
    /// Worms spawned before any action runs, in order.
    #[serde(default)]
    pub(crate) worms: Vec<WormSection>,
    /// Commands replayed after the worms are spawned.
    #[serde(default)]
    pub(crate) actions: Vec<Command>,
}

/// `[world]` table of a scenario.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct WorldSection {
    pub(crate) width: f64,
    pub(crate) height: f64,
    /// ASCII raster, top row first.
    pub(crate) map: String,
    pub(crate) gravity: Option<f64>,
    pub(crate) seed: Option<u64>,
    pub(crate) max_placement_attempts: Option<u32>,
    pub(crate) max_landing_steps: Option<u32>,
}

/// Entry of the `[[worms]]` array.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct WormSection {
    pub(crate) name: String,
    pub(crate) radius: f64,
    #[serde(default)]
    pub(crate) direction: f64,
    /// Fixed spawn site; random placement when omitted.
    #[serde(default)]
    pub(crate) position: Option<Position>,
}

impl Scenario {
    /// Reads and parses a scenario file.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        Self::from_toml(&text)
            .with_context(|| format!("failed to parse scenario {}", path.display()))
    }

    /// Parses scenario text.
    pub(crate) fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("scenario is not valid TOML")
    }

    /// Builds the world described by the `[world]` table.
    ///
    /// `seed_override` replaces the seed stored in the file.
    pub(crate) fn build_world(&self, seed_override: Option<u64>) -> Result<World> {
        let terrain = self.world.terrain().context("invalid terrain map")?;
        let config = self.world.config(seed_override);
        World::new(terrain, config).context("invalid world configuration")
    }

    /// Spawn commands followed by the scripted actions.
    pub(crate) fn commands(&self) -> impl Iterator<Item = Command> + '_ {
        self.worms
            .iter()
            .map(WormSection::spawn_command)
            .chain(self.actions.iter().cloned())
    }
}

impl WorldSection {
    fn terrain(&self) -> Result<TerrainGrid, TerrainMapError> {
        parse_map(self.width, self.height, &self.map)
    }

    fn config(&self, seed_override: Option<u64>) -> WorldConfig {
        let mut config = WorldConfig::default();
        if let Some(gravity) = self.gravity {
            config = config.with_gravity(gravity);
        }
        if let Some(seed) = seed_override.or(self.seed) {
            config = config.with_seed(seed);
        }
        if let Some(attempts) = self.max_placement_attempts {
            config.max_placement_attempts = attempts;
        }
        if let Some(steps) = self.max_landing_steps {
            config.max_landing_steps = steps;
        }
        config
    }
}

impl WormSection {
    fn spawn_command(&self) -> Command {
        Command::SpawnWorm {
            name: self.name.clone(),
            radius: self.radius,
            direction: self.direction,
            position: self.position,
        }
    }
}
