use serde::{Deserialize, Serialize};

/// Events emitted by the viewport that the map reacts to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MapEvent {
    /// A zoom gesture or call finished at `zoom`.
    ZoomEnd { zoom: f64 },
    /// The user picked another base map.
    BaseLayerChange { name: String },
}

impl MapEvent {
    /// Leaflet-style event name, used in logs.
    pub fn event_type(&self) -> &'static str {
        match self {
            MapEvent::ZoomEnd { .. } => "zoomend",
            MapEvent::BaseLayerChange { .. } => "baselayerchange",
        }
    }
}
