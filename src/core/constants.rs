//! Engine-wide defaults for grid maps.
//! Keeping them in a single place makes it easier to tweak the magic numbers
//! a configuration document falls back to.

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// Lowest zoom level of a map when the configuration omits `minZoom`.
pub const DEFAULT_MIN_ZOOM: u8 = 0;

/// Highest zoom level of a map when the configuration omits `maxZoom`.
pub const DEFAULT_MAX_ZOOM: u8 = 2;

/// Tile path template used when a map has no `tilePath`.
pub const DEFAULT_TILE_PATH: &str = "directory/{z}-{y}-{x}.png";

/// Container the viewport mounts into when the caller passes an empty id.
pub const DEFAULT_CONTAINER_ID: &str = "map";

/// The only overlay `type` understood today. Specs without a type default to it.
pub const MARKER_TYPE: &str = "marker";
