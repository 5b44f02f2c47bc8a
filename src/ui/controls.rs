use crate::core::{registry::MapRegistry, viewport::LayerHandle};

/// Base-map picker shown when a viewer has more than one map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayersControl {
    base_maps: Vec<(String, LayerHandle)>,
}

impl LayersControl {
    /// Lists every registered map with its tile layer, in registration order.
    ///
    /// Returns `None` for a single map, which needs no picker.
    pub fn for_registry(registry: &MapRegistry) -> Option<Self> {
        if registry.len() < 2 {
            return None;
        }
        Some(Self {
            base_maps: registry
                .maps()
                .iter()
                .map(|map| (map.name().to_string(), map.tile_layer()))
                .collect(),
        })
    }

    pub fn base_maps(&self) -> &[(String, LayerHandle)] {
        &self.base_maps
    }

    pub fn layer_for(&self, name: &str) -> Option<LayerHandle> {
        self.base_maps
            .iter()
            .find(|(candidate, _)| candidate == name)
            .map(|(_, handle)| *handle)
    }
}
