//! Grid to pixel geometry.
//!
//! A map's tile pyramid covers an inclusive span of integer columns and rows
//! at zoom 0. Everything the viewport needs to constrain panning and center
//! the view is derived from that span and the tile size.

use crate::core::geo::{LatLng, LatLngBounds, TileCoord};
use serde::{Deserialize, Serialize};

/// Inclusive column (`x`) and row (`y`) span of a map at zoom 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GridBounds {
    pub min_x: i64,
    pub max_x: i64,
    pub min_y: i64,
    pub max_y: i64,
}

impl GridBounds {
    pub fn new(min_x: i64, max_x: i64, min_y: i64, max_y: i64) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// Returns the span with inverted axes collapsed onto their minimum.
    pub fn normalized(&self) -> Self {
        Self::new(
            self.min_x,
            self.max_x.max(self.min_x),
            self.min_y,
            self.max_y.max(self.min_y),
        )
    }

    /// Number of tile columns at zoom 0, never less than one.
    pub fn tiles_x(&self) -> i64 {
        self.max_x
            .saturating_sub(self.min_x)
            .saturating_add(1)
            .max(1)
    }

    /// Number of tile rows at zoom 0, never less than one.
    pub fn tiles_y(&self) -> i64 {
        self.max_y
            .saturating_sub(self.min_y)
            .saturating_add(1)
            .max(1)
    }

    /// Tiles covering the grid at `zoom`. Every zoom level doubles the span.
    ///
    /// Returns `None` when the addresses at that level no longer fit in an
    /// `i64`.
    pub fn tile_span(&self, zoom: u8) -> Option<TileSpan> {
        let grid = self.normalized();
        let scale = 2_i64.checked_pow(u32::from(zoom))?;
        let last = scale - 1;
        Some(TileSpan {
            zoom,
            min_x: grid.min_x.checked_mul(scale)?,
            max_x: grid.max_x.checked_mul(scale)?.checked_add(last)?,
            min_y: grid.min_y.checked_mul(scale)?,
            max_y: grid.max_y.checked_mul(scale)?.checked_add(last)?,
        })
    }
}

/// Inclusive block of tile addresses at one zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSpan {
    pub zoom: u8,
    pub min_x: i64,
    pub max_x: i64,
    pub min_y: i64,
    pub max_y: i64,
}

impl TileSpan {
    /// Number of tiles in the span. Wide enough for any `i64` extent.
    pub fn len(&self) -> u128 {
        let cols = (i128::from(self.max_x) - i128::from(self.min_x) + 1) as u128;
        let rows = (i128::from(self.max_y) - i128::from(self.min_y) + 1) as u128;
        cols.saturating_mul(rows)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Row-major walk over the span. Lazy, so callers bound it with `take`.
    pub fn iter(&self) -> impl Iterator<Item = TileCoord> {
        let Self {
            zoom,
            min_x,
            max_x,
            min_y,
            max_y,
        } = *self;
        (min_y..=max_y).flat_map(move |y| (min_x..=max_x).map(move |x| TileCoord::new(x, y, zoom)))
    }
}

/// Pixel-space geometry of one map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapGeometry {
    pub bounds: LatLngBounds,
    pub center: LatLng,
}

/// Derives the pixel bounds and center of a grid.
///
/// Increasing rows move toward negative `lat`, increasing columns toward
/// positive `lng`. The center depends only on the tile counts, not on the
/// grid origin.
pub fn derive(grid: &GridBounds, tile_size: u32) -> MapGeometry {
    let size = f64::from(tile_size);
    let grid = grid.normalized();

    // f64 throughout: the far edge of an `i64::MAX` row is not an i64
    let north_west = LatLng::new(size * -(grid.min_y as f64), size * grid.min_x as f64);
    let south_east = LatLng::new(
        size * -(grid.max_y as f64 + 1.0),
        size * (grid.max_x as f64 + 1.0),
    );
    let center = LatLng::new(
        size * -span(grid.min_y, grid.max_y) / 2.0,
        size * span(grid.min_x, grid.max_x) / 2.0,
    );

    MapGeometry {
        bounds: LatLngBounds::new(north_west, south_east),
        center,
    }
}

fn span(min: i64, max: i64) -> f64 {
    (max as f64 - min as f64 + 1.0).max(1.0)
}
