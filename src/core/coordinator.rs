//! Active-map state machine
//!
//! The coordinator owns the registry and the viewport and is the only place
//! that moves the active flag after initialization. It reacts to two events:
//!
//! - `ZoomEnd`: re-sync the active map's and the global overlays at the new zoom.
//! - `BaseLayerChange`: detach everything the previous map had attached
//!   (globals included), flip the active flag, swap tile layers, push the
//!   new panning bounds and sync the new map's overlays.
//!
//! A switch resolves its target before touching anything, so an unknown map
//! name leaves both the registry and the viewport exactly as they were.

use crate::{
    core::{registry::MapRegistry, viewport::Viewport},
    input::events::MapEvent,
    layers::visibility::{SyncReport, VisibilitySynchronizer},
    Result,
};

pub struct MapSwitchCoordinator<V: Viewport> {
    registry: MapRegistry,
    viewport: V,
    synchronizer: VisibilitySynchronizer,
}

impl<V: Viewport> MapSwitchCoordinator<V> {
    /// Takes over a finalized registry and the viewport it was built against.
    pub fn new(registry: MapRegistry, viewport: V) -> Self {
        Self {
            registry,
            viewport,
            synchronizer: VisibilitySynchronizer::new(),
        }
    }

    pub fn registry(&self) -> &MapRegistry {
        &self.registry
    }

    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut V {
        &mut self.viewport
    }

    pub fn handle_event(&mut self, event: &MapEvent) -> Result<SyncReport> {
        #[cfg(feature = "debug")]
        log::debug!("Handling {} event", event.event_type());

        match event {
            MapEvent::ZoomEnd { .. } => self.on_zoom_end(),
            MapEvent::BaseLayerChange { name } => self.on_base_layer_change(name),
        }
    }

    /// Syncs the active map's overlays and the globals at the viewport's zoom.
    pub fn sync_overlays(&mut self) -> Result<SyncReport> {
        let active = self.registry.active_map()?;
        let zoom = self.viewport.zoom();
        let overlays = active
            .overlays()
            .iter()
            .chain(self.registry.global_overlays());
        Ok(self.synchronizer.sync(&mut self.viewport, zoom, overlays))
    }

    /// The zoom changed while the active map stayed the same.
    pub fn on_zoom_end(&mut self) -> Result<SyncReport> {
        self.sync_overlays()
    }

    /// Makes `name` the active map.
    pub fn on_base_layer_change(&mut self, name: &str) -> Result<SyncReport> {
        let target = self.registry.index_of(name)?;
        let previous = self.registry.active_index()?;

        let old_tiles = {
            let old = self.registry.map_at(previous);
            self.synchronizer.detach_all(
                &mut self.viewport,
                old.overlays().iter().chain(self.registry.global_overlays()),
            );
            old.tile_layer()
        };

        self.registry.switch_active(previous, target);

        let new = self.registry.map_at(target);
        if previous != target {
            self.viewport.remove_layer(old_tiles);
        }
        self.viewport.add_layer(new.tile_layer());
        self.viewport.set_max_bounds(new.bounds());

        #[cfg(feature = "debug")]
        log::info!(
            "Switched active map from {:?} to {:?}",
            self.registry.map_at(previous).name(),
            name
        );

        self.sync_overlays()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        config::{MapConfig, MarkerSpec, ViewerConfig},
        viewport::{HeadlessViewport, ViewportOp},
    };
    use crate::{LookupError, MapError};

    fn coordinator() -> MapSwitchCoordinator<HeadlessViewport> {
        let config = ViewerConfig::default()
            .with_map(
                MapConfig::named("A")
                    .with_grid(0, 1, 0, 0)
                    .with_marker(MarkerSpec::point(1.0, 1.0, 1.0, 1.0)),
            )
            .with_map(MapConfig::named("B").with_marker(MarkerSpec::point(0.0, 0.0, 0.0, 2.0)))
            .with_global_marker(MarkerSpec::point(5.0, 5.0, 0.0, 5.0));
        let mut viewport = HeadlessViewport::new();
        let registry = MapRegistry::from_config(&config, &mut viewport).unwrap();
        MapSwitchCoordinator::new(registry, viewport)
    }

    #[test]
    fn test_zoom_end_syncs_active_and_globals() {
        let mut coordinator = coordinator();
        coordinator.viewport_mut().zoom_to(1.0);
        coordinator.on_zoom_end().unwrap();

        let registry = coordinator.registry();
        let local = registry.find_by_name("A").unwrap().overlays()[0].handle();
        let global = registry.global_overlays()[0].handle();
        let other = registry.find_by_name("B").unwrap().overlays()[0].handle();

        let viewport = coordinator.viewport();
        assert!(viewport.is_attached(local));
        assert!(viewport.is_attached(global));
        assert!(!viewport.is_attached(other));
    }

    #[test]
    fn test_switch_detaches_before_attaching() {
        let mut coordinator = coordinator();
        coordinator.viewport_mut().zoom_to(1.0);
        coordinator.on_zoom_end().unwrap();
        coordinator.viewport_mut().clear_ops();

        coordinator.on_base_layer_change("B").unwrap();

        let registry = coordinator.registry();
        let a = registry.find_by_name("A").unwrap();
        let b = registry.find_by_name("B").unwrap();
        let ops = coordinator.viewport().ops();

        let last_detach = ops
            .iter()
            .rposition(|op| matches!(op, ViewportOp::Detach(h) if a.overlays().iter().any(|o| o.handle() == *h)))
            .unwrap();
        let first_attach = ops
            .iter()
            .position(|op| matches!(op, ViewportOp::Attach(h) if b.overlays().iter().any(|o| o.handle() == *h)))
            .unwrap();
        assert!(last_detach < first_attach);
        assert!(a.overlays().iter().all(|o| !coordinator.viewport().is_attached(o.handle())));
        assert!(ops.contains(&ViewportOp::SetMaxBounds(*b.bounds())));
        assert!(coordinator.viewport().is_attached(b.tile_layer()));
        assert!(!coordinator.viewport().is_attached(a.tile_layer()));
        assert!(b.is_active() && !a.is_active());
    }

    #[test]
    fn test_unknown_map_changes_nothing() {
        let mut coordinator = coordinator();
        coordinator.viewport_mut().zoom_to(1.0);
        coordinator.on_zoom_end().unwrap();
        let attached = coordinator.viewport().attached_layers();
        coordinator.viewport_mut().clear_ops();

        let err = coordinator.on_base_layer_change("Nowhere").unwrap_err();
        assert!(matches!(err, MapError::Lookup(LookupError::UnknownMap(_))));
        assert_eq!(coordinator.registry().active_map().unwrap().name(), "A");
        assert_eq!(coordinator.viewport().attached_layers(), attached);
        assert!(coordinator.viewport().ops().is_empty());
    }

    #[test]
    fn test_switch_to_same_map_keeps_tiles() {
        let mut coordinator = coordinator();
        let tiles = coordinator.registry().active_map().unwrap().tile_layer();
        coordinator.viewport_mut().add_layer(tiles);

        coordinator.on_base_layer_change("A").unwrap();
        assert!(coordinator.viewport().is_attached(tiles));
        assert_eq!(coordinator.registry().active_map().unwrap().name(), "A");
    }

    #[test]
    fn test_single_active_after_many_switches() {
        let mut coordinator = coordinator();
        for name in ["B", "A", "B", "B", "A"] {
            coordinator
                .handle_event(&MapEvent::BaseLayerChange {
                    name: name.to_string(),
                })
                .unwrap();
            let registry = coordinator.registry();
            assert_eq!(registry.maps().iter().filter(|m| m.is_active()).count(), 1);
            assert_eq!(registry.active_map().unwrap().name(), name);
        }
    }
}
