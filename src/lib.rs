//! A sequence of small OpenGL lessons, each adding one rendering technique,
//! over a thin layer of owned GL resource wrappers.

pub mod app;
pub mod assets;
pub mod image;
pub mod lessons;
pub mod renderer;
pub mod scene;
