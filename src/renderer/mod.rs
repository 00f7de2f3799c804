//! Owned wrappers around OpenGL objects. Each wrapper holds one GL handle
//! and deletes it on drop, so all of them must be dropped while the context
//! that created them is current.

pub mod buffer;
pub mod cube_texture;
pub mod framebuffer;
pub mod gl;
pub mod material;
pub mod mesh;
pub mod model;
pub mod program;
pub mod shader;
pub mod shadow_map;
pub mod texture;
pub mod vertex_layout;

pub use buffer::Buffer;
pub use cube_texture::CubeTexture;
pub use framebuffer::FrameBuffer;
pub use material::Material;
pub use mesh::{Mesh, Vertex};
pub use model::Model;
pub use program::{Program, Uniform};
pub use shader::Shader;
pub use shadow_map::ShadowMap;
pub use texture::Texture;
pub use vertex_layout::VertexLayout;

/// Clears the bound framebuffer's color, depth and stencil buffers to
/// `color`.
pub fn clear(color: glam::Vec4) {
    gl::call!(gl::ClearColor(color.x, color.y, color.z, color.w));
    gl::call!(gl::Clear(
        gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT | gl::STENCIL_BUFFER_BIT
    ));
}
