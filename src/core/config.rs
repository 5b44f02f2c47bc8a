//! Configuration document for a viewer
//!
//! This module holds the declarative document a viewer is built from: a list
//! of named maps, each backed by a tile pyramid and carrying its own markers,
//! plus markers shown on every map. Every field is optional at the parsing
//! level so that missing required values surface as [`ConfigError`]s with the
//! offending entry attached, rather than as opaque parse failures.

use crate::core::{constants, geometry::GridBounds};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

/// Errors caused by the user-supplied configuration.
///
/// These are always reported before the viewport is touched.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Map name cannot be null: {map}")]
    MissingMapName { map: String },

    #[error("Marker must have both a minZoom and a maxZoom specified: {marker}")]
    MissingZoom { marker: String },

    #[error("Marker has invalid points: {marker}")]
    InvalidPoint { marker: String },

    #[error("At least one map must be configured")]
    NoMaps,

    #[error("Duplicate map name: {0}")]
    DuplicateMapName(String),

    #[error("Global overlays have already been registered")]
    GlobalOverlaysAlreadySet,

    #[error("Invalid configuration document: {0}")]
    InvalidDocument(#[from] serde_json::Error),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Renders a config entry for error messages.
pub(crate) fn describe<T: Serialize>(entry: &T) -> String {
    serde_json::to_string(entry).unwrap_or_else(|_| "<unprintable>".to_string())
}

/// One marker entry as written in the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerSpec {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub point: Option<Vec<f64>>,
    #[serde(default)]
    pub min_zoom: Option<f64>,
    #[serde(default)]
    pub max_zoom: Option<f64>,
    /// Only bound when it is a non-empty string; anything else is ignored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popup_text: Option<serde_json::Value>,
}

impl MarkerSpec {
    /// Convenience constructor for a plain point marker.
    pub fn point(x: f64, y: f64, min_zoom: f64, max_zoom: f64) -> Self {
        Self {
            kind: None,
            point: Some(vec![x, y]),
            min_zoom: Some(min_zoom),
            max_zoom: Some(max_zoom),
            popup_text: None,
        }
    }

    pub fn with_popup(mut self, text: impl Into<String>) -> Self {
        self.popup_text = Some(serde_json::Value::String(text.into()));
        self
    }

    /// The popup text, when it is a non-empty string.
    pub fn label(&self) -> Option<&str> {
        match &self.popup_text {
            Some(serde_json::Value::String(text)) if !text.is_empty() => Some(text),
            _ => None,
        }
    }
}

/// Tile pyramid fields of a map entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tile_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tile_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_zoom: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_zoom: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_tile_url: Option<String>,
}

impl TileConfig {
    pub fn tile_path(&self) -> &str {
        self.tile_path
            .as_deref()
            .filter(|path| !path.is_empty())
            .unwrap_or(constants::DEFAULT_TILE_PATH)
    }

    /// Tile size in pixels; zero counts as unset.
    pub fn tile_size(&self) -> u32 {
        self.tile_size
            .filter(|size| *size > 0)
            .unwrap_or(constants::TILE_SIZE)
    }

    pub fn min_zoom(&self) -> u8 {
        self.min_zoom.unwrap_or(constants::DEFAULT_MIN_ZOOM)
    }

    /// Highest zoom; zero counts as unset.
    pub fn max_zoom(&self) -> u8 {
        self.max_zoom
            .filter(|zoom| *zoom > 0)
            .unwrap_or(constants::DEFAULT_MAX_ZOOM)
    }

    pub fn error_tile_url(&self) -> Option<&str> {
        self.error_tile_url.as_deref().filter(|url| !url.is_empty())
    }
}

/// Grid span fields of a map entry. Unset values are 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_x: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_x: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_y: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_y: Option<i64>,
}

impl GridConfig {
    pub fn bounds(&self) -> GridBounds {
        GridBounds::new(
            self.min_x.unwrap_or(0),
            self.max_x.unwrap_or(0),
            self.min_y.unwrap_or(0),
            self.max_y.unwrap_or(0),
        )
    }
}

/// Reads an explicit `null` list the same way as an absent one.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// One named map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub tiles: TileConfig,
    #[serde(flatten)]
    pub grid: GridConfig,
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub markers: Vec<MarkerSpec>,
}

impl MapConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_grid(mut self, min_x: i64, max_x: i64, min_y: i64, max_y: i64) -> Self {
        self.grid = GridConfig {
            min_x: Some(min_x),
            max_x: Some(max_x),
            min_y: Some(min_y),
            max_y: Some(max_y),
        };
        self
    }

    pub fn with_marker(mut self, marker: MarkerSpec) -> Self {
        self.markers.push(marker);
        self
    }
}

/// The whole document.
///
/// When `maps` is absent or empty, the top-level `name`, tile and grid fields
/// describe the single implicit map. Top-level `markers` are always global.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerConfig {
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub maps: Vec<MapConfig>,
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub markers: Vec<MarkerSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub tiles: TileConfig,
    #[serde(flatten)]
    pub grid: GridConfig,
}

impl ViewerConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn with_map(mut self, map: MapConfig) -> Self {
        self.maps.push(map);
        self
    }

    pub fn with_global_marker(mut self, marker: MarkerSpec) -> Self {
        self.markers.push(marker);
        self
    }

    /// The map entries to register, in order.
    pub fn map_entries(&self) -> Vec<MapConfig> {
        if !self.maps.is_empty() {
            return self.maps.clone();
        }

        vec![MapConfig {
            name: self.name.clone(),
            tiles: self.tiles.clone(),
            grid: self.grid,
            markers: Vec::new(),
        }]
    }
}
