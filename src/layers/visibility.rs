use crate::{
    core::viewport::{LayerHandle, Viewport},
    layers::overlay::OverlayDescriptor,
};

/// What one synchronization pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Overlays that should be on the viewport after the pass.
    pub shown: Vec<LayerHandle>,
    /// Overlays that should be off the viewport after the pass.
    pub hidden: Vec<LayerHandle>,
}

/// Keeps the viewport's overlay set in line with the zoom level.
///
/// Attach and detach are idempotent on the viewport, so a pass can run any
/// number of times with the same result.
#[derive(Debug, Clone, Copy, Default)]
pub struct VisibilitySynchronizer;

impl VisibilitySynchronizer {
    pub fn new() -> Self {
        Self
    }

    /// Attaches every overlay whose zoom range contains `zoom` and detaches the rest.
    pub fn sync<'a, V, I>(&self, viewport: &mut V, zoom: f64, overlays: I) -> SyncReport
    where
        V: Viewport + ?Sized,
        I: IntoIterator<Item = &'a OverlayDescriptor>,
    {
        let mut report = SyncReport::default();

        for overlay in overlays {
            if overlay.is_visible_at(zoom) {
                #[cfg(feature = "debug")]
                log::debug!("Attaching {} at zoom {}", overlay.handle(), zoom);
                viewport.add_layer(overlay.handle());
                report.shown.push(overlay.handle());
            } else {
                #[cfg(feature = "debug")]
                log::debug!("Detaching {} at zoom {}", overlay.handle(), zoom);
                viewport.remove_layer(overlay.handle());
                report.hidden.push(overlay.handle());
            }
        }

        #[cfg(feature = "debug")]
        log::debug!(
            "Synced overlays at zoom {}: {} shown, {} hidden",
            zoom,
            report.shown.len(),
            report.hidden.len()
        );

        report
    }

    /// Detaches every overlay regardless of zoom.
    pub fn detach_all<'a, V, I>(&self, viewport: &mut V, overlays: I)
    where
        V: Viewport + ?Sized,
        I: IntoIterator<Item = &'a OverlayDescriptor>,
    {
        for overlay in overlays {
            #[cfg(feature = "debug")]
            log::debug!("Detaching {}", overlay.handle());
            viewport.remove_layer(overlay.handle());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{config::MarkerSpec, viewport::HeadlessViewport};
    use crate::layers::overlay::OverlayBuilder;

    fn overlays(viewport: &mut HeadlessViewport) -> Vec<OverlayDescriptor> {
        let specs = [
            MarkerSpec::point(0.0, 0.0, 0.0, 0.0),
            MarkerSpec::point(1.0, 1.0, 1.0, 2.0),
            MarkerSpec::point(2.0, 2.0, 0.0, 5.0),
        ];
        OverlayBuilder::build(&specs, viewport).unwrap()
    }

    #[test]
    fn test_attached_iff_in_range() {
        let mut viewport = HeadlessViewport::new();
        let overlays = overlays(&mut viewport);
        let sync = VisibilitySynchronizer::new();

        for zoom in 0..=6 {
            let zoom = f64::from(zoom);
            sync.sync(&mut viewport, zoom, &overlays);
            for overlay in &overlays {
                assert_eq!(
                    viewport.is_attached(overlay.handle()),
                    overlay.zoom_range().contains(zoom),
                    "overlay {} at zoom {}",
                    overlay.handle(),
                    zoom
                );
            }
        }
    }

    #[test]
    fn test_sync_is_idempotent() {
        let mut viewport = HeadlessViewport::new();
        let overlays = overlays(&mut viewport);
        let sync = VisibilitySynchronizer::new();

        let first = sync.sync(&mut viewport, 1.0, &overlays);
        let attached = viewport.attached_layers();
        let ops = viewport.ops().len();

        let second = sync.sync(&mut viewport, 1.0, &overlays);
        assert_eq!(first, second);
        assert_eq!(viewport.attached_layers(), attached);
        assert_eq!(viewport.ops().len(), ops);
    }

    #[test]
    fn test_detach_all() {
        let mut viewport = HeadlessViewport::new();
        let overlays = overlays(&mut viewport);
        let sync = VisibilitySynchronizer::new();

        sync.sync(&mut viewport, 1.0, &overlays);
        assert!(!viewport.attached_layers().is_empty());
        sync.detach_all(&mut viewport, &overlays);
        assert!(viewport.attached_layers().is_empty());
    }

    #[test]
    fn test_report_covers_each_overlay_once() {
        let mut viewport = HeadlessViewport::new();
        let overlays = overlays(&mut viewport);
        let handles: Vec<_> = overlays.iter().map(|overlay| overlay.handle()).collect();

        let report = VisibilitySynchronizer::new().sync(&mut viewport, 1.0, &overlays);
        assert_eq!(report.shown, vec![handles[1], handles[2]]);
        assert_eq!(report.hidden, vec![handles[0]]);
        assert_eq!(viewport.attached_layers(), report.shown);
    }
}
