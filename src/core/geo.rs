use serde::{Deserialize, Serialize};

/// A coordinate in the flat "simple" reference system.
///
/// There is no projection involved: `lat` is the vertical pixel axis
/// (growing upward, so tile rows map to negative values) and `lng` is the
/// horizontal pixel axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a new coordinate
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Converts a marker point `[x, y]` into viewport space.
    ///
    /// The axes are swapped and the vertical one inverted, matching the
    /// convention that grid rows grow downward.
    pub fn from_point(point: [f64; 2]) -> Self {
        Self::new(-point[1], point[0])
    }

    pub fn to_array(self) -> [f64; 2] {
        [self.lat, self.lng]
    }
}

impl Default for LatLng {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Pixel-space rectangle given by its north-west and south-east corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub north_west: LatLng,
    pub south_east: LatLng,
}

impl LatLngBounds {
    pub fn new(north_west: LatLng, south_east: LatLng) -> Self {
        Self {
            north_west,
            south_east,
        }
    }

    pub fn to_array(&self) -> [[f64; 2]; 2] {
        [self.north_west.to_array(), self.south_east.to_array()]
    }
}

/// Address of one tile in a map's pyramid.
///
/// Unlike slippy-map tiles, grid maps may start at negative columns or rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: i64,
    pub y: i64,
    pub z: u8,
}

impl TileCoord {
    pub fn new(x: i64, y: i64, z: u8) -> Self {
        Self { x, y, z }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_axis_swap() {
        let position = LatLng::from_point([10.0, 20.0]);
        assert_eq!(position, LatLng::new(-20.0, 10.0));
    }

    #[test]
    fn test_bounds_corner_order() {
        let bounds = LatLngBounds::new(LatLng::new(0.0, 0.0), LatLng::new(-512.0, 512.0));
        assert_eq!(bounds.to_array(), [[0.0, 0.0], [-512.0, 512.0]]);
    }
}
