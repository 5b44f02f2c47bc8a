//! Zoom-gated overlays
//!
//! Marker entries from the configuration are turned into overlays in two
//! steps. [`OverlayBuilder::validate`] checks every entry and produces pure
//! [`OverlayPlan`]s without touching the viewport; [`OverlayBuilder::materialize`]
//! then asks the collaborator to create one visual object per plan. Keeping
//! the steps apart lets a whole document be rejected before anything exists
//! on screen.

use crate::{
    core::{
        config::{describe, ConfigError, MarkerSpec},
        constants,
        geo::LatLng,
        viewport::{LayerFactory, LayerHandle},
    },
};
use serde::{Deserialize, Serialize};

/// Inclusive zoom interval in which an overlay is shown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomRange {
    pub min: f64,
    pub max: f64,
}

impl ZoomRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, zoom: f64) -> bool {
        zoom >= self.min && zoom <= self.max
    }
}

/// Kinds of overlay. Every new kind needs its own arm wherever overlays are
/// created, so nothing is dropped silently once it is listed here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OverlayKind {
    /// A single point marker.
    Marker { position: LatLng },
}

impl OverlayKind {
    /// Parses the kind-specific part of a spec.
    ///
    /// Returns `Ok(None)` for a `type` this version does not know.
    fn from_spec(spec: &MarkerSpec) -> Result<Option<Self>, ConfigError> {
        match spec.kind.as_deref() {
            None | Some(constants::MARKER_TYPE) => {
                let point = match spec.point.as_deref() {
                    Some(&[x, y]) => [x, y],
                    _ => {
                        return Err(ConfigError::InvalidPoint {
                            marker: describe(spec),
                        })
                    }
                };
                Ok(Some(OverlayKind::Marker {
                    position: LatLng::from_point(point),
                }))
            }
            Some(_other) => {
                #[cfg(feature = "debug")]
                log::warn!("Skipping overlay of unsupported type {:?}", _other);
                Ok(None)
            }
        }
    }

    pub fn position(&self) -> LatLng {
        match self {
            OverlayKind::Marker { position } => *position,
        }
    }
}

/// A validated overlay that has no visual object yet.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayPlan {
    pub kind: OverlayKind,
    pub zoom: ZoomRange,
    pub label: Option<String>,
}

/// One overlay with the collaborator object it owns.
///
/// The handle is created once and only ever attached or detached afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayDescriptor {
    kind: OverlayKind,
    zoom: ZoomRange,
    label: Option<String>,
    handle: LayerHandle,
}

impl OverlayDescriptor {
    pub fn kind(&self) -> &OverlayKind {
        &self.kind
    }

    pub fn position(&self) -> LatLng {
        self.kind.position()
    }

    pub fn zoom_range(&self) -> ZoomRange {
        self.zoom
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn handle(&self) -> LayerHandle {
        self.handle
    }

    /// Whether the overlay belongs on the viewport at `zoom`.
    pub fn is_visible_at(&self, zoom: f64) -> bool {
        self.zoom.contains(zoom)
    }
}

/// Builds overlays from marker entries, shared by per-map and global markers.
pub struct OverlayBuilder;

impl OverlayBuilder {
    /// Validates every spec, preserving input order.
    ///
    /// Specs of an unknown `type` are skipped.
    pub fn validate(specs: &[MarkerSpec]) -> Result<Vec<OverlayPlan>, ConfigError> {
        let mut plans = Vec::with_capacity(specs.len());

        for spec in specs {
            let zoom = match (spec.min_zoom, spec.max_zoom) {
                (Some(min), Some(max)) => ZoomRange::new(min, max),
                _ => {
                    return Err(ConfigError::MissingZoom {
                        marker: describe(spec),
                    })
                }
            };

            if let Some(kind) = OverlayKind::from_spec(spec)? {
                plans.push(OverlayPlan {
                    kind,
                    zoom,
                    label: spec.label().map(str::to_owned),
                });
            }
        }

        Ok(plans)
    }

    /// Creates the visual object for each plan and binds popups.
    pub fn materialize(
        plans: Vec<OverlayPlan>,
        factory: &mut dyn LayerFactory,
    ) -> Vec<OverlayDescriptor> {
        plans
            .into_iter()
            .map(|plan| {
                let handle = match &plan.kind {
                    OverlayKind::Marker { position } => factory.create_marker(*position),
                };
                if let Some(text) = &plan.label {
                    factory.bind_popup(handle, text);
                }
                OverlayDescriptor {
                    kind: plan.kind,
                    zoom: plan.zoom,
                    label: plan.label,
                    handle,
                }
            })
            .collect()
    }

    /// Validates all specs, then materializes them.
    pub fn build(
        specs: &[MarkerSpec],
        factory: &mut dyn LayerFactory,
    ) -> Result<Vec<OverlayDescriptor>, ConfigError> {
        let plans = Self::validate(specs)?;
        Ok(Self::materialize(plans, factory))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::viewport::HeadlessViewport;
    use serde_json::json;

    fn spec(value: serde_json::Value) -> MarkerSpec {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_missing_max_zoom_fails() {
        let specs = vec![
            MarkerSpec::point(0.0, 0.0, 0.0, 1.0),
            spec(json!({ "point": [1, 1], "minZoom": 0 })),
        ];
        let mut viewport = HeadlessViewport::new();

        let err = OverlayBuilder::build(&specs, &mut viewport).unwrap_err();
        assert!(matches!(err, ConfigError::MissingZoom { .. }));
        // nothing was created for the valid spec either
        assert_eq!(viewport.layer_count(), 0);
    }

    #[test]
    fn test_null_zoom_fails() {
        let specs = vec![spec(json!({ "point": [1, 1], "minZoom": null, "maxZoom": 2 }))];
        let err = OverlayBuilder::validate(&specs).unwrap_err();
        assert!(err.to_string().contains("minZoom"));
    }

    #[test]
    fn test_invalid_points() {
        for bad in [
            json!({ "minZoom": 0, "maxZoom": 1 }),
            json!({ "point": null, "minZoom": 0, "maxZoom": 1 }),
            json!({ "point": [1], "minZoom": 0, "maxZoom": 1 }),
            json!({ "point": [1, 2, 3], "minZoom": 0, "maxZoom": 1 }),
        ] {
            let err = OverlayBuilder::validate(&[spec(bad)]).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidPoint { .. }));
        }
    }

    #[test]
    fn test_coordinate_transform() {
        let plans = OverlayBuilder::validate(&[MarkerSpec::point(10.0, 20.0, 0.0, 1.0)]).unwrap();
        assert_eq!(plans[0].kind.position(), LatLng::new(-20.0, 10.0));
    }

    #[test]
    fn test_unknown_type_is_skipped() {
        let specs = vec![
            spec(json!({ "type": "polygon", "points": [[0, 0]], "minZoom": 0, "maxZoom": 1 })),
            spec(json!({ "type": "marker", "point": [3, 4], "minZoom": 0, "maxZoom": 1 })),
        ];
        let plans = OverlayBuilder::validate(&specs).unwrap();
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].kind.position(), LatLng::new(-4.0, 3.0));
    }

    #[test]
    fn test_order_and_popups() {
        let specs = vec![
            MarkerSpec::point(1.0, 0.0, 2.0, 3.0).with_popup("first"),
            MarkerSpec::point(2.0, 0.0, 0.0, 1.0),
            MarkerSpec::point(1.0, 0.0, 2.0, 3.0).with_popup("first"),
        ];
        let mut viewport = HeadlessViewport::new();
        let overlays = OverlayBuilder::build(&specs, &mut viewport).unwrap();

        assert_eq!(overlays.len(), 3);
        assert_eq!(overlays[0].label(), Some("first"));
        assert_eq!(overlays[1].label(), None);
        assert_ne!(overlays[0].handle(), overlays[2].handle());
        assert_eq!(viewport.popup(overlays[0].handle()), Some("first"));
        assert_eq!(viewport.popup(overlays[1].handle()), None);
        assert!(overlays.iter().all(|o| !viewport.is_attached(o.handle())));
    }

    #[test]
    fn test_zoom_range_is_inclusive() {
        let range = ZoomRange::new(1.0, 3.0);
        assert!(!range.contains(0.0));
        assert!(range.contains(1.0));
        assert!(range.contains(3.0));
        assert!(!range.contains(3.5));
    }
}
