//! The viewport collaborator
//!
//! Rendering, panning and tile fetching live outside this crate. The traits
//! here list the primitives the map needs from whatever draws it, and
//! [`HeadlessViewport`] implements them in memory so a map can be driven
//! without any UI, for tests, server-side processing or CLI tools.

use crate::{
    core::geo::{LatLng, LatLngBounds},
    input::events::MapEvent,
    layers::tile::TileLayerOptions,
    prelude::{HashMap, HashSet},
    ui::controls::LayersControl,
};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Opaque reference to a visual object owned by the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LayerHandle(u64);

impl LayerHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for LayerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "layer#{}", self.0)
    }
}

/// Coordinate reference systems a viewport can be mounted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoordinateSystem {
    /// Flat pixel plane, one unit per pixel at zoom 0.
    Simple,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MountOptions {
    pub crs: CoordinateSystem,
    pub initial_layer: LayerHandle,
}

/// Creates the visual objects a map is made of.
pub trait LayerFactory {
    fn create_tile_layer(&mut self, path: &str, options: &TileLayerOptions) -> LayerHandle;

    fn create_marker(&mut self, position: LatLng) -> LayerHandle;

    fn bind_popup(&mut self, handle: LayerHandle, text: &str);
}

/// The live, interactive view a map is shown in.
///
/// `add_layer` and `remove_layer` must be idempotent.
pub trait Viewport: LayerFactory {
    /// Creates the view inside `container_id` showing `options.initial_layer`.
    fn mount(&mut self, container_id: &str, options: &MountOptions);

    fn set_view(&mut self, center: LatLng, zoom: f64);

    /// Constrains panning to `bounds`.
    fn set_max_bounds(&mut self, bounds: &LatLngBounds);

    fn zoom(&self) -> f64;

    fn add_layer(&mut self, handle: LayerHandle);

    fn remove_layer(&mut self, handle: LayerHandle);

    fn add_layers_control(&mut self, control: &LayersControl);

    /// Returns the events raised since the last call, oldest first.
    fn drain_events(&mut self) -> Vec<MapEvent>;
}

/// A visual object created through [`LayerFactory`].
#[derive(Debug, Clone, PartialEq)]
pub enum LayerRecord {
    Tile {
        path: String,
        options: TileLayerOptions,
    },
    Marker {
        position: LatLng,
        popup: Option<String>,
    },
}

/// State changes applied to a [`HeadlessViewport`], in order.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewportOp {
    Mount { container_id: String },
    SetView { center: LatLng, zoom: f64 },
    SetMaxBounds(LatLngBounds),
    Attach(LayerHandle),
    Detach(LayerHandle),
    LayersControl(Vec<String>),
}

/// In-memory viewport that records everything done to it.
#[derive(Debug, Default)]
pub struct HeadlessViewport {
    next_id: u64,
    layers: HashMap<LayerHandle, LayerRecord>,
    attached: HashSet<LayerHandle>,
    container_id: Option<String>,
    center: LatLng,
    zoom: f64,
    max_bounds: Option<LatLngBounds>,
    control: Option<LayersControl>,
    events: VecDeque<MapEvent>,
    ops: Vec<ViewportOp>,
}

impl HeadlessViewport {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self, record: LayerRecord) -> LayerHandle {
        self.next_id += 1;
        let handle = LayerHandle::new(self.next_id);
        self.layers.insert(handle, record);
        handle
    }

    /// Options of the attached base tile layer, if any.
    fn base_layer_options(&self) -> Option<&TileLayerOptions> {
        self.attached
            .iter()
            .filter_map(|handle| match self.layers.get(handle) {
                Some(LayerRecord::Tile { options, .. }) => Some(options),
                _ => None,
            })
            .next()
    }

    /// Zooms like a user would, clamped to the base layer's range, and raises `ZoomEnd`.
    pub fn zoom_to(&mut self, zoom: f64) {
        let zoom = match self.base_layer_options() {
            Some(options) => options.clamp_zoom(zoom),
            None => zoom,
        };
        self.zoom = zoom;
        self.events.push_back(MapEvent::ZoomEnd { zoom });
    }

    /// Picks a base map through the layers control, swapping tile layers and
    /// raising `BaseLayerChange`. Returns `false` for a name the control
    /// does not list.
    pub fn select_base_layer(&mut self, name: &str) -> bool {
        let Some(control) = self.control.clone() else {
            return false;
        };
        let Some(target) = control.layer_for(name) else {
            return false;
        };

        for (_, handle) in control.base_maps() {
            if *handle != target {
                self.remove_layer(*handle);
            }
        }
        self.add_layer(target);
        self.events.push_back(MapEvent::BaseLayerChange {
            name: name.to_string(),
        });
        true
    }

    /// Queues an arbitrary event, as a misbehaving host might.
    pub fn push_event(&mut self, event: MapEvent) {
        self.events.push_back(event);
    }

    pub fn is_attached(&self, handle: LayerHandle) -> bool {
        self.attached.contains(&handle)
    }

    /// Attached layers, sorted by handle.
    pub fn attached_layers(&self) -> Vec<LayerHandle> {
        let mut handles: Vec<_> = self.attached.iter().copied().collect();
        handles.sort();
        handles
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn popup(&self, handle: LayerHandle) -> Option<&str> {
        match self.layers.get(&handle) {
            Some(LayerRecord::Marker { popup, .. }) => popup.as_deref(),
            _ => None,
        }
    }

    pub fn container_id(&self) -> Option<&str> {
        self.container_id.as_deref()
    }

    pub fn center(&self) -> LatLng {
        self.center
    }

    pub fn max_bounds(&self) -> Option<&LatLngBounds> {
        self.max_bounds.as_ref()
    }

    pub fn layers_control(&self) -> Option<&LayersControl> {
        self.control.as_ref()
    }

    pub fn ops(&self) -> &[ViewportOp] {
        &self.ops
    }

    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }
}

impl LayerFactory for HeadlessViewport {
    fn create_tile_layer(&mut self, path: &str, options: &TileLayerOptions) -> LayerHandle {
        self.allocate(LayerRecord::Tile {
            path: path.to_string(),
            options: options.clone(),
        })
    }

    fn create_marker(&mut self, position: LatLng) -> LayerHandle {
        self.allocate(LayerRecord::Marker {
            position,
            popup: None,
        })
    }

    fn bind_popup(&mut self, handle: LayerHandle, text: &str) {
        if let Some(LayerRecord::Marker { popup, .. }) = self.layers.get_mut(&handle) {
            *popup = Some(text.to_string());
        }
    }
}

impl Viewport for HeadlessViewport {
    fn mount(&mut self, container_id: &str, options: &MountOptions) {
        self.container_id = Some(container_id.to_string());
        self.ops.push(ViewportOp::Mount {
            container_id: container_id.to_string(),
        });
        self.add_layer(options.initial_layer);
    }

    fn set_view(&mut self, center: LatLng, zoom: f64) {
        self.center = center;
        self.zoom = zoom;
        self.ops.push(ViewportOp::SetView { center, zoom });
    }

    fn set_max_bounds(&mut self, bounds: &LatLngBounds) {
        self.max_bounds = Some(*bounds);
        self.ops.push(ViewportOp::SetMaxBounds(*bounds));
    }

    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn add_layer(&mut self, handle: LayerHandle) {
        if self.attached.insert(handle) {
            self.ops.push(ViewportOp::Attach(handle));
        }
    }

    fn remove_layer(&mut self, handle: LayerHandle) {
        if self.attached.remove(&handle) {
            self.ops.push(ViewportOp::Detach(handle));
        }
    }

    fn add_layers_control(&mut self, control: &LayersControl) {
        self.ops.push(ViewportOp::LayersControl(
            control
                .base_maps()
                .iter()
                .map(|(name, _)| name.clone())
                .collect(),
        ));
        self.control = Some(control.clone());
    }

    fn drain_events(&mut self) -> Vec<MapEvent> {
        self.events.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile_options(min_zoom: u8, max_zoom: u8) -> TileLayerOptions {
        TileLayerOptions {
            tile_size: 256,
            min_zoom,
            max_zoom,
            no_wrap: true,
            bounds: LatLngBounds::new(LatLng::new(0.0, 0.0), LatLng::new(-256.0, 256.0)),
            error_tile_url: None,
        }
    }

    #[test]
    fn test_attach_is_idempotent() {
        let mut viewport = HeadlessViewport::new();
        let marker = viewport.create_marker(LatLng::new(-1.0, 1.0));

        viewport.add_layer(marker);
        viewport.add_layer(marker);
        assert!(viewport.is_attached(marker));
        assert_eq!(viewport.ops(), &[ViewportOp::Attach(marker)]);

        viewport.remove_layer(marker);
        viewport.remove_layer(marker);
        assert!(!viewport.is_attached(marker));
        assert_eq!(viewport.ops().len(), 2);
    }

    #[test]
    fn test_zoom_is_clamped_to_base_layer() {
        let mut viewport = HeadlessViewport::new();
        let tiles = viewport.create_tile_layer("t/{z}.png", &tile_options(1, 3));
        viewport.mount(
            "map",
            &MountOptions {
                crs: CoordinateSystem::Simple,
                initial_layer: tiles,
            },
        );

        viewport.zoom_to(9.0);
        assert_eq!(viewport.zoom(), 3.0);
        viewport.zoom_to(0.0);
        assert_eq!(viewport.zoom(), 1.0);
        assert_eq!(
            viewport.drain_events(),
            vec![MapEvent::ZoomEnd { zoom: 3.0 }, MapEvent::ZoomEnd { zoom: 1.0 }]
        );
        assert!(viewport.drain_events().is_empty());
    }

    #[test]
    fn test_select_base_layer_without_control() {
        let mut viewport = HeadlessViewport::new();
        assert!(!viewport.select_base_layer("A"));
        assert!(viewport.drain_events().is_empty());
    }
}
