//! # simplemap
//!
//! Multi-map viewer core for flat, tile-grid based maps.
//!
//! A viewer is built from a declarative document listing named maps, each
//! backed by a tile pyramid and carrying zoom-gated markers, plus markers
//! shown on every map. This crate derives each map's pixel geometry from its
//! tile grid and keeps exactly the right markers attached to a viewport as
//! the user zooms or switches maps. Drawing is left to a [`Viewport`]
//! implementation; [`HeadlessViewport`] runs everything in memory.

pub mod core;
pub mod input;
pub mod layers;
pub mod prelude;
pub mod ui;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    config::{ConfigError, MapConfig, MarkerSpec, ViewerConfig},
    coordinator::MapSwitchCoordinator,
    definition::{MapDefinition, MapPlan},
    geo::{LatLng, LatLngBounds, TileCoord},
    geometry::{derive, GridBounds, MapGeometry, TileSpan},
    map::SimpleMap,
    registry::MapRegistry,
    viewport::{HeadlessViewport, LayerFactory, LayerHandle, Viewport},
};

pub use layers::{
    overlay::{OverlayBuilder, OverlayDescriptor, OverlayKind, ZoomRange},
    tile::{TemplateTileSource, TileLayerOptions, TileSource},
    visibility::{SyncReport, VisibilitySynchronizer},
};

pub use input::events::MapEvent;

pub use ui::controls::LayersControl;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// The registry and the viewport disagree about which maps exist.
///
/// These are programming or integration errors, never user errors.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("No map named {0:?} is registered")]
    UnknownMap(String),

    #[error("No active map has been set")]
    NoActiveMap,
}

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Lookup error: {0}")]
    Lookup(#[from] LookupError),
}

/// Error type alias for convenience
pub type Error = MapError;
