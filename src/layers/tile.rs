//! Tile layer options and tile addressing
//!
//! Fetching and drawing tiles is the viewport's job; this module only
//! describes a map's pyramid to it and expands tile path templates.

use crate::core::{
    config::TileConfig,
    geo::{LatLngBounds, TileCoord},
};
use serde::{Deserialize, Serialize};

/// Options handed to the collaborator when a map's tile layer is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileLayerOptions {
    pub tile_size: u32,
    pub min_zoom: u8,
    pub max_zoom: u8,
    /// Grid maps never repeat horizontally.
    pub no_wrap: bool,
    pub bounds: LatLngBounds,
    pub error_tile_url: Option<String>,
}

impl TileLayerOptions {
    pub fn from_config(tiles: &TileConfig, bounds: LatLngBounds) -> Self {
        Self {
            tile_size: tiles.tile_size(),
            min_zoom: tiles.min_zoom(),
            max_zoom: tiles.max_zoom(),
            no_wrap: true,
            bounds,
            error_tile_url: tiles.error_tile_url().map(str::to_owned),
        }
    }

    /// Clamps a zoom level into this layer's range.
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        let (min, max) = (f64::from(self.min_zoom), f64::from(self.max_zoom));
        if min > max {
            return min;
        }
        zoom.clamp(min, max)
    }
}

/// Trait representing anything that can produce tile URLs for a given coordinate.
pub trait TileSource: Send + Sync {
    /// Build a URL for the requested `coord`.
    fn url(&self, coord: TileCoord) -> String;
}

/// Source backed by a path template with `{z}`, `{x}` and `{y}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateTileSource {
    template: String,
}

impl TemplateTileSource {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }
}

impl TileSource for TemplateTileSource {
    fn url(&self, coord: TileCoord) -> String {
        self.template
            .replace("{z}", &coord.z.to_string())
            .replace("{x}", &coord.x.to_string())
            .replace("{y}", &coord.y.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::LatLng;

    #[test]
    fn test_template_expansion() {
        let source = TemplateTileSource::new("directory/{z}-{y}-{x}.png");
        assert_eq!(source.url(TileCoord::new(3, 1, 2)), "directory/2-1-3.png");
        assert_eq!(source.url(TileCoord::new(-1, 0, 0)), "directory/0-0--1.png");
    }

    #[test]
    fn test_options_from_config() {
        let bounds = LatLngBounds::new(LatLng::new(0.0, 0.0), LatLng::new(-256.0, 256.0));
        let options = TileLayerOptions::from_config(&TileConfig::default(), bounds);
        assert_eq!(options.tile_size, 256);
        assert_eq!((options.min_zoom, options.max_zoom), (0, 2));
        assert!(options.no_wrap);
        assert_eq!(options.error_tile_url, None);
        assert_eq!(options.clamp_zoom(7.0), 2.0);
        assert_eq!(options.clamp_zoom(-1.0), 0.0);
    }
}
