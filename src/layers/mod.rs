pub mod overlay;
pub mod tile;
pub mod visibility;
