//! ASCII terrain maps used by scenario files.

use std::{error::Error, fmt};

use worms_core::{TerrainGrid, WormsError};

/// Glyph marking an impassable cell.
const SOLID: char = '#';
/// Glyph marking a passable cell.
const OPEN: char = '.';

/// Parses a map drawn top row first into a terrain grid spanning `width × height`.
///
/// Blank lines and surrounding whitespace are ignored. Raster row 0 is the
/// bottom of the world, so the drawn lines are reversed.
pub(crate) fn parse_map(
    width: f64,
    height: f64,
    map: &str,
) -> Result<TerrainGrid, TerrainMapError> {
    let drawn = map.lines().map(str::trim).filter(|line| !line.is_empty());

    let mut raster: Vec<Vec<bool>> = Vec::new();
    for (line_index, line) in drawn.enumerate() {
        let row = line
            .chars()
            .enumerate()
            .map(|(column, glyph)| match glyph {
                SOLID => Ok(false),
                OPEN => Ok(true),
                other => Err(TerrainMapError::UnknownGlyph {
                    line: line_index + 1,
                    column: column + 1,
                    glyph: other,
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(first) = raster.first().map(Vec::len) {
            if row.len() != first {
                return Err(TerrainMapError::RaggedLine {
                    line: line_index + 1,
                    expected: first,
                    found: row.len(),
                });
            }
        }
        raster.push(row);
    }

    if raster.is_empty() {
        return Err(TerrainMapError::EmptyMap);
    }
    raster.reverse();

    TerrainGrid::new(width, height, raster).map_err(TerrainMapError::InvalidTerrain)
}

/// Errors that can occur while reading an ASCII terrain map.
#[derive(Debug)]
pub(crate) enum TerrainMapError {
    /// The map contained no drawn lines.
    EmptyMap,
    /// A line used a glyph other than `#` or `.`.
    UnknownGlyph {
        /// One-based line number counted from the top of the map.
        line: usize,
        /// One-based column within the line.
        column: usize,
        /// Offending character.
        glyph: char,
    },
    /// A line was wider or narrower than the first one.
    RaggedLine {
        /// One-based line number counted from the top of the map.
        line: usize,
        /// Width of the first line.
        expected: usize,
        /// Width of the offending line.
        found: usize,
    },
    /// The raster was rejected by the terrain model.
    InvalidTerrain(WormsError),
}

impl fmt::Display for TerrainMapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyMap => write!(f, "terrain map has no rows"),
            Self::UnknownGlyph {
                line,
                column,
                glyph,
            } => write!(
                f,
                "unexpected glyph '{glyph}' at line {line}, column {column}; use '{SOLID}' or '{OPEN}'"
            ),
            Self::RaggedLine {
                line,
                expected,
                found,
            } => write!(
                f,
                "line {line} has {found} cells but the map is {expected} cells wide"
            ),
            Self::InvalidTerrain(error) => write!(f, "terrain map was rejected: {error}"),
        }
    }
}

impl Error for TerrainMapError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidTerrain(error) => Some(error),
            _ => None,
        }
    }
}
