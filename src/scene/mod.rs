//! CPU-side scene state shared by the lessons.

pub mod camera;
pub mod light;
pub mod light_editor;

pub use camera::{Camera, Movement};
pub use light::{attenuation_coefficients, Light};
pub use light_editor::{LightEditor, LightField};
