//! Prelude module for common simplemap types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use simplemap::prelude::*;`

pub use crate::core::{
    config::{ConfigError, MapConfig, MarkerSpec, ViewerConfig},
    coordinator::MapSwitchCoordinator,
    definition::MapDefinition,
    geo::{LatLng, LatLngBounds, TileCoord},
    geometry::{GridBounds, MapGeometry, TileSpan},
    map::SimpleMap,
    registry::MapRegistry,
    viewport::{HeadlessViewport, LayerFactory, LayerHandle, Viewport},
};

pub use crate::layers::{
    overlay::{OverlayDescriptor, OverlayKind, ZoomRange},
    tile::{TemplateTileSource, TileSource},
    visibility::VisibilitySynchronizer,
};

pub use crate::input::events::MapEvent;

pub use crate::{Error as MapError, LookupError, Result};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
