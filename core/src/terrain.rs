//! Immutable passability raster that backs every terrain query.

use crate::{InvalidArgument, Position, WormsError};

/// Location of a single raster pixel expressed as row and column indices.
///
/// Indices produced by [`TerrainGrid::cell_of`] may equal the row or column
/// count when the queried coordinate lies beyond the world extent; such
/// pixels are reported as impassable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PixelCoord {
    row: u32,
    column: u32,
}

impl PixelCoord {
    /// Creates a new pixel coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the pixel.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the pixel.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }
}

/// Fixed-size passability raster paired with the continuous world extent.
///
/// Rows are stored row-major. Row `0` covers `y ∈ [0, cell_height]` and
/// column `0` covers `x ∈ [0, cell_width]`. The raster never changes after
/// construction.
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainGrid {
    width: f64,
    height: f64,
    columns: u32,
    rows: u32,
    passable: Vec<bool>,
}

impl TerrainGrid {
    /// Builds a grid from a raster indexed as `raster[row][column]`.
    pub fn new(width: f64, height: f64, raster: Vec<Vec<bool>>) -> Result<Self, WormsError> {
        let rows = raster.len();
        let columns = raster.first().map_or(0, Vec::len);
        if raster.iter().any(|row| row.len() != columns) {
            return Err(InvalidArgument::RaggedTerrain.into());
        }

        let cells = raster.into_iter().flatten().collect();
        Self::from_row_major(width, height, count(columns)?, count(rows)?, cells)
    }

    /// Builds a grid from a flat row-major cell buffer.
    pub fn from_row_major(
        width: f64,
        height: f64,
        columns: u32,
        rows: u32,
        passable: Vec<bool>,
    ) -> Result<Self, WormsError> {
        if !Self::is_legal_dimension(width) || !Self::is_legal_dimension(height) {
            return Err(InvalidArgument::InvalidDimension.into());
        }
        if columns == 0 || rows == 0 {
            return Err(InvalidArgument::EmptyTerrain.into());
        }

        let expected = u64::from(columns) * u64::from(rows);
        if u64::try_from(passable.len()).map_or(true, |len| len != expected) {
            return Err(InvalidArgument::RaggedTerrain.into());
        }

        Ok(Self {
            width,
            height,
            columns,
            rows,
            passable,
        })
    }

    /// Reports whether a world dimension lies strictly between zero and `f64::MAX`.
    #[must_use]
    pub fn is_legal_dimension(dimension: f64) -> bool {
        dimension > 0.0 && dimension < f64::MAX
    }

    /// Width of the world in continuous units.
    #[must_use]
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// Height of the world in continuous units.
    #[must_use]
    pub const fn height(&self) -> f64 {
        self.height
    }

    /// Number of raster columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of raster rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Horizontal extent of a single pixel.
    #[must_use]
    pub fn cell_width(&self) -> f64 {
        self.width / f64::from(self.columns)
    }

    /// Vertical extent of a single pixel.
    #[must_use]
    pub fn cell_height(&self) -> f64 {
        self.height / f64::from(self.rows)
    }

    /// Reports whether the pixel at `(row, column)` is passable.
    ///
    /// Indices outside `[0, rows) × [0, columns)` are never passable.
    #[must_use]
    pub fn is_passable(&self, row: i64, column: i64) -> bool {
        let (Ok(row), Ok(column)) = (u32::try_from(row), u32::try_from(column)) else {
            return false;
        };
        if row >= self.rows || column >= self.columns {
            return false;
        }

        let index = row as usize * self.columns as usize + column as usize;
        self.passable.get(index).copied().unwrap_or(false)
    }

    /// Maps a continuous position onto the pixel that contains it.
    ///
    /// Each axis resolves to the first pixel whose upper boundary is greater
    /// than or equal to the coordinate, so boundary coordinates belong to the
    /// lower-indexed pixel. The last boundary is the world extent itself.
    #[must_use]
    pub fn cell_of(&self, position: Position) -> PixelCoord {
        PixelCoord::new(
            scan_index(position.y(), self.height, self.rows),
            scan_index(position.x(), self.width, self.columns),
        )
    }

    /// Reports whether `0 ≤ x ≤ width` and `0 ≤ y ≤ height`.
    #[must_use]
    pub fn is_position_within_bounds(&self, position: Position) -> bool {
        (0.0..=self.width).contains(&position.x()) && (0.0..=self.height).contains(&position.y())
    }

    /// Reports whether the position lies in bounds on a passable pixel.
    #[must_use]
    pub fn is_passable_position(&self, position: Position) -> bool {
        if !self.is_position_within_bounds(position) {
            return false;
        }

        let cell = self.cell_of(position);
        self.is_passable(i64::from(cell.row()), i64::from(cell.column()))
    }

    /// Reports whether a disc of the given radius lies entirely inside the world.
    #[must_use]
    pub fn fits_in_world(&self, center: Position, radius: f64) -> bool {
        center.x() - radius >= 0.0
            && center.y() - radius >= 0.0
            && center.x() + radius <= self.width
            && center.y() + radius <= self.height
    }
}

fn count(len: usize) -> Result<u32, WormsError> {
    u32::try_from(len).map_err(|_| InvalidArgument::InvalidDimension.into())
}

/// Smallest index whose upper boundary is at least `coordinate`, or `count`
/// when the coordinate lies beyond `extent`.
fn scan_index(coordinate: f64, extent: f64, count: u32) -> u32 {
    let cell = extent / f64::from(count);
    let boundary = |index: u32| {
        if index + 1 >= count {
            extent
        } else {
            cell * f64::from(index + 1)
        }
    };

    let estimate = (coordinate / cell).ceil() - 1.0;
    let mut index = if estimate.is_nan() || estimate <= 0.0 {
        0
    } else if estimate >= f64::from(count) {
        count
    } else {
        estimate as u32
    };

    while index > 0 && coordinate <= boundary(index - 1) {
        index -= 1;
    }
    while index < count && coordinate > boundary(index) {
        index += 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(x: f64, y: f64) -> Position {
        Position::new(x, y).expect("finite position")
    }

    fn checkerboard() -> TerrainGrid {
        TerrainGrid::new(
            4.0,
            2.0,
            vec![
                vec![true, false, true, false],
                vec![false, true, false, true],
            ],
        )
        .expect("valid grid")
    }

    #[test]
    fn rejects_illegal_dimensions() {
        for (width, height) in [(0.0, 1.0), (1.0, -2.0), (f64::NAN, 1.0), (f64::MAX, 1.0)] {
            let error = TerrainGrid::new(width, height, vec![vec![true]]).unwrap_err();
            assert_eq!(error, InvalidArgument::InvalidDimension.into());
        }
    }

    #[test]
    fn rejects_empty_and_ragged_rasters() {
        assert_eq!(
            TerrainGrid::new(1.0, 1.0, Vec::new()).unwrap_err(),
            InvalidArgument::EmptyTerrain.into()
        );
        assert_eq!(
            TerrainGrid::new(1.0, 1.0, vec![vec![true, true], vec![true]]).unwrap_err(),
            InvalidArgument::RaggedTerrain.into()
        );
    }

    #[test]
    fn out_of_range_pixels_are_impassable() {
        let grid = TerrainGrid::new(2.0, 2.0, vec![vec![true; 2]; 2]).expect("valid grid");

        assert!(grid.is_passable(0, 0));
        assert!(grid.is_passable(1, 1));
        for (row, column) in [(-1, 0), (0, -1), (2, 0), (0, 2), (i64::MAX, 0)] {
            assert!(!grid.is_passable(row, column), "({row}, {column})");
        }
    }

    #[test]
    fn raster_is_row_major() {
        let grid = checkerboard();
        assert!(grid.is_passable(0, 0));
        assert!(!grid.is_passable(0, 1));
        assert!(!grid.is_passable(1, 0));
        assert!(grid.is_passable(1, 3));
    }

    #[test]
    fn boundary_coordinates_belong_to_lower_cell() {
        let grid = checkerboard();
        assert_eq!(grid.cell_of(position(1.0, 1.0)), PixelCoord::new(0, 0));
        assert_eq!(grid.cell_of(position(1.000_001, 1.000_001)), PixelCoord::new(1, 1));
        assert_eq!(grid.cell_of(position(0.0, 0.0)), PixelCoord::new(0, 0));
    }

    #[test]
    fn world_edge_maps_to_last_cell() {
        let grid = checkerboard();
        assert_eq!(grid.cell_of(position(4.0, 2.0)), PixelCoord::new(1, 3));
    }

    #[test]
    fn beyond_extent_maps_out_of_range() {
        let grid = checkerboard();
        let cell = grid.cell_of(position(4.5, 2.5));
        assert_eq!(cell, PixelCoord::new(2, 4));
        assert!(!grid.is_passable(i64::from(cell.row()), i64::from(cell.column())));
    }

    #[test]
    fn edge_mapping_survives_inexact_cell_sizes() {
        let grid = TerrainGrid::new(1.0, 1.0, vec![vec![true; 10]; 10]).expect("valid grid");
        assert_eq!(grid.cell_of(position(1.0, 1.0)), PixelCoord::new(9, 9));
        assert_eq!(grid.cell_of(position(0.3, 0.7)), PixelCoord::new(6, 2));
    }

    #[test]
    fn passable_position_requires_bounds() {
        let grid = checkerboard();
        assert!(grid.is_passable_position(position(0.5, 0.5)));
        assert!(!grid.is_passable_position(position(1.5, 0.5)));
        assert!(!grid.is_passable_position(position(-0.1, 0.5)));
        assert!(!grid.is_passable_position(position(0.5, 2.1)));
    }

    #[test]
    fn fits_in_world_accounts_for_radius() {
        let grid = checkerboard();
        assert!(grid.fits_in_world(position(1.0, 1.0), 1.0));
        assert!(!grid.fits_in_world(position(0.5, 1.0), 1.0));
        assert!(!grid.fits_in_world(position(3.5, 1.0), 1.0));
    }
}
