pub mod controls;

pub use controls::LayersControl;
