use crate::{
    core::{
        config::{describe, ConfigError, MapConfig},
        geo::{LatLng, LatLngBounds, TileCoord},
        geometry::{self, GridBounds, MapGeometry, TileSpan},
        viewport::{LayerFactory, LayerHandle},
    },
    layers::{
        overlay::{OverlayBuilder, OverlayDescriptor, OverlayPlan},
        tile::{TemplateTileSource, TileLayerOptions, TileSource},
    },
};

/// A fully validated map that has no viewport objects yet.
#[derive(Debug, Clone, PartialEq)]
pub struct MapPlan {
    pub name: String,
    pub tile_path: String,
    pub grid: GridBounds,
    pub geometry: MapGeometry,
    pub tile_options: TileLayerOptions,
    pub overlays: Vec<OverlayPlan>,
}

impl MapPlan {
    /// Validates one map entry and derives its geometry.
    pub fn from_config(config: &MapConfig) -> Result<Self, ConfigError> {
        let name = match config.name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => {
                return Err(ConfigError::MissingMapName {
                    map: describe(config),
                })
            }
        };

        let grid = config.grid.bounds();
        let geometry = geometry::derive(&grid, config.tiles.tile_size());
        let tile_options = TileLayerOptions::from_config(&config.tiles, geometry.bounds);
        let overlays = OverlayBuilder::validate(&config.markers)?;

        Ok(Self {
            name,
            tile_path: config.tiles.tile_path().to_string(),
            grid,
            geometry,
            tile_options,
            overlays,
        })
    }

    /// Creates the tile layer and overlay objects for this map.
    pub fn materialize(self, factory: &mut dyn LayerFactory) -> MapDefinition {
        let tile_layer = factory.create_tile_layer(&self.tile_path, &self.tile_options);
        let overlays = OverlayBuilder::materialize(self.overlays, factory);

        MapDefinition {
            name: self.name,
            tile_source: TemplateTileSource::new(self.tile_path),
            tile_options: self.tile_options,
            grid: self.grid,
            geometry: self.geometry,
            tile_layer,
            overlays,
            active: false,
        }
    }
}

/// One named map: its tile pyramid, derived geometry and own overlays.
#[derive(Debug, Clone, PartialEq)]
pub struct MapDefinition {
    name: String,
    tile_source: TemplateTileSource,
    tile_options: TileLayerOptions,
    grid: GridBounds,
    geometry: MapGeometry,
    tile_layer: LayerHandle,
    overlays: Vec<OverlayDescriptor>,
    active: bool,
}

impl MapDefinition {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bounds(&self) -> &LatLngBounds {
        &self.geometry.bounds
    }

    pub fn center(&self) -> LatLng {
        self.geometry.center
    }

    pub fn min_zoom(&self) -> u8 {
        self.tile_options.min_zoom
    }

    pub fn max_zoom(&self) -> u8 {
        self.tile_options.max_zoom
    }

    pub fn tile_layer(&self) -> LayerHandle {
        self.tile_layer
    }

    pub fn overlays(&self) -> &[OverlayDescriptor] {
        &self.overlays
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Block of tiles covering this map at `zoom`, clamped to the pyramid's
    /// range. `None` when that level cannot be addressed.
    pub fn tile_span(&self, zoom: f64) -> Option<TileSpan> {
        let level = self.tile_options.clamp_zoom(zoom.floor()) as u8;
        self.grid.tile_span(level)
    }

    /// The first `limit` tiles covering this map at `zoom`, row by row.
    pub fn tile_coords(&self, zoom: f64, limit: usize) -> Vec<TileCoord> {
        self.tile_span(zoom)
            .map(|span| span.iter().take(limit).collect())
            .unwrap_or_default()
    }

    /// URLs of the first `limit` tiles covering this map at `zoom`.
    pub fn tile_urls(&self, zoom: f64, limit: usize) -> Vec<String> {
        self.tile_coords(zoom, limit)
            .into_iter()
            .map(|coord| self.tile_source.url(coord))
            .collect()
    }
}
