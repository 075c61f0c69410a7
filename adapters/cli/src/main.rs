#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that replays a Worms scenario and prints the events it
//! produces.

mod scenario;
mod terrain_map;

use std::{
    io::{self, BufWriter, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use env_logger::Env;
use log::info;
use worms_core::Event;

use crate::scenario::Scenario;

/// Replays a scenario file against a fresh world.
#[derive(Debug, Parser)]
#[command(name = "worms", version)]
struct Args {
    /// Path to the TOML scenario file.
    scenario: PathBuf,
    /// Placement seed overriding the one in the scenario.
    #[arg(long)]
    seed: Option<u64>,
    /// Output format for the event log.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
}

/// How events are written to stdout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// One JSON object per line.
    Json,
    /// Rust debug representation, one event per line.
    Debug,
}

/// Entry point for the Worms command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let scenario = Scenario::load(&args.scenario)?;
    let mut world = scenario.build_world(args.seed)?;

    let mut events = Vec::new();
    for command in scenario.commands() {
        worms_world::apply(&mut world, command, &mut events);
    }
    info!(
        "replayed {} commands into {} events",
        scenario.worms.len() + scenario.actions.len(),
        events.len()
    );

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    write_events(&mut out, &events, args.format)?;
    out.flush().context("failed to flush event log")
}

fn write_events(out: &mut impl Write, events: &[Event], format: OutputFormat) -> Result<()> {
    for event in events {
        match format {
            OutputFormat::Json => {
                serde_json::to_writer(&mut *out, event).context("failed to encode event")?;
                writeln!(out)?;
            }
            OutputFormat::Debug => writeln!(out, "{event:?}")?,
        }
    }
    Ok(())
}
