//! Headless map viewer
//!
//! Loads a viewer configuration, mounts it on an in-memory viewport and
//! replays zoom and map-switch steps, printing what is on screen after each.

use anyhow::{bail, Context, Result};
use clap::Parser;
use simplemap::{HeadlessViewport, OverlayKind, SimpleMap, ViewerConfig, Viewport};
use std::{path::PathBuf, str::FromStr};

/// Tile URLs printed per step; larger levels are summarized by count.
const MAX_LISTED_TILES: usize = 16;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Path to the JSON viewer configuration
    config: PathBuf,

    /// Container the viewport is mounted into
    #[clap(long, default_value = "map")]
    container: String,

    /// Step to replay, in order: `zoom:<level>` or `switch:<map name>`
    #[clap(long = "event", value_name = "STEP")]
    events: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq)]
enum Step {
    Zoom(f64),
    Switch(String),
}

impl FromStr for Step {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.split_once(':') {
            Some(("zoom", level)) => Ok(Step::Zoom(
                level
                    .parse()
                    .with_context(|| format!("invalid zoom level {level:?}"))?,
            )),
            Some(("switch", name)) if !name.is_empty() => Ok(Step::Switch(name.to_string())),
            _ => bail!("expected zoom:<level> or switch:<name>, got {raw:?}"),
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = ViewerConfig::from_path(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    let mut map = SimpleMap::initialize(&args.container, &config, HeadlessViewport::new())?;

    println!("🗺️ Mounted in #{}", map.container_id());
    print_state(&map)?;

    for step in &args.events {
        match step {
            Step::Zoom(level) => map.viewport_mut().zoom_to(*level),
            Step::Switch(name) => {
                if !map.viewport_mut().select_base_layer(name) {
                    bail!("no base map named {name:?} in the layers control");
                }
            }
        }
        let events = map.process_events()?;
        log::debug!("Processed {} event(s) for {:?}", events.len(), step);

        println!("\n▶ {step:?}");
        print_state(&map)?;
    }

    Ok(())
}

fn print_state(map: &SimpleMap<HeadlessViewport>) -> Result<()> {
    let viewport = map.viewport();
    let active = map.active_map()?;
    let zoom = viewport.zoom();

    println!("   Active map: {}", active.name());
    println!(
        "   Zoom: {zoom} (range {}-{})",
        active.min_zoom(),
        active.max_zoom()
    );
    println!("   Bounds: {:?}", active.bounds().to_array());

    let visible = active
        .overlays()
        .iter()
        .chain(map.registry().global_overlays())
        .filter(|overlay| viewport.is_attached(overlay.handle()));
    for overlay in visible {
        let range = overlay.zoom_range();
        match overlay.kind() {
            OverlayKind::Marker { position } => println!(
                "   📍 [{}, {}] z{}-{} {}",
                position.lat,
                position.lng,
                range.min,
                range.max,
                overlay.label().unwrap_or("")
            ),
        }
    }

    let Some(span) = active.tile_span(zoom) else {
        println!("   🧱 zoom level {zoom} has no addressable tiles");
        return Ok(());
    };
    println!("   🧱 {} tile(s) at level {}", span.len(), span.zoom);
    for url in active.tile_urls(zoom, MAX_LISTED_TILES) {
        println!("   🧱 {url}");
    }
    if span.len() > MAX_LISTED_TILES as u128 {
        println!("   🧱 ...");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_steps() {
        assert_eq!("zoom:2".parse::<Step>().unwrap(), Step::Zoom(2.0));
        assert_eq!(
            "switch:Nether".parse::<Step>().unwrap(),
            Step::Switch("Nether".to_string())
        );
        assert!("zoom:high".parse::<Step>().is_err());
        assert!("switch:".parse::<Step>().is_err());
        assert!("pan:1".parse::<Step>().is_err());
    }
}
