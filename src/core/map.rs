use crate::{
    core::{
        config::ViewerConfig,
        constants,
        coordinator::MapSwitchCoordinator,
        definition::MapDefinition,
        registry::MapRegistry,
        viewport::{CoordinateSystem, MountOptions, Viewport},
    },
    input::events::MapEvent,
    layers::visibility::SyncReport,
    ui::controls::LayersControl,
    Result,
};

/// A multi-map viewer mounted on a viewport.
///
/// Built once from a configuration document through [`SimpleMap::initialize`];
/// afterwards it only reacts to viewport events.
pub struct SimpleMap<V: Viewport> {
    container_id: String,
    coordinator: MapSwitchCoordinator<V>,
}

impl<V: Viewport> SimpleMap<V> {
    /// Validates `config`, builds every map and marker, and mounts the first
    /// map on `viewport`.
    ///
    /// Configuration errors are returned before the viewport is mounted or
    /// any layer object is created.
    pub fn initialize(container_id: &str, config: &ViewerConfig, mut viewport: V) -> Result<Self> {
        let container_id = if container_id.is_empty() {
            constants::DEFAULT_CONTAINER_ID
        } else {
            container_id
        };

        let registry = MapRegistry::from_config(config, &mut viewport)?;
        let first = registry.active_map()?;

        viewport.mount(
            container_id,
            &MountOptions {
                crs: CoordinateSystem::Simple,
                initial_layer: first.tile_layer(),
            },
        );
        viewport.set_view(first.center(), f64::from(first.min_zoom()));
        viewport.set_max_bounds(first.bounds());

        #[cfg(feature = "debug")]
        log::info!(
            "Mounted {:?} in #{} at zoom {}",
            first.name(),
            container_id,
            first.min_zoom()
        );

        let control = LayersControl::for_registry(&registry);
        let mut coordinator = MapSwitchCoordinator::new(registry, viewport);
        coordinator.sync_overlays()?;

        if let Some(control) = control {
            coordinator.viewport_mut().add_layers_control(&control);
        }

        Ok(Self {
            container_id: container_id.to_string(),
            coordinator,
        })
    }

    /// Parses a JSON document and initializes from it.
    pub fn from_json_str(container_id: &str, json: &str, viewport: V) -> Result<Self> {
        let config = ViewerConfig::from_json_str(json)?;
        Self::initialize(container_id, &config, viewport)
    }

    pub fn handle_event(&mut self, event: &MapEvent) -> Result<SyncReport> {
        self.coordinator.handle_event(event)
    }

    /// Dispatches every event the viewport raised since the last call, in order.
    ///
    /// Stops at the first event that fails; later events stay unprocessed.
    pub fn process_events(&mut self) -> Result<Vec<MapEvent>> {
        let events = self.coordinator.viewport_mut().drain_events();
        for event in &events {
            self.coordinator.handle_event(event)?;
        }
        Ok(events)
    }

    pub fn active_map(&self) -> Result<&MapDefinition> {
        Ok(self.coordinator.registry().active_map()?)
    }

    pub fn registry(&self) -> &MapRegistry {
        self.coordinator.registry()
    }

    pub fn viewport(&self) -> &V {
        self.coordinator.viewport()
    }

    pub fn viewport_mut(&mut self) -> &mut V {
        self.coordinator.viewport_mut()
    }

    pub fn container_id(&self) -> &str {
        &self.container_id
    }
}
