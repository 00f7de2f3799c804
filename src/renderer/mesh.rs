use std::mem;
use std::ptr;
use std::rc::Rc;

use anyhow::bail;
use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

use crate::renderer::buffer::Buffer;
use crate::renderer::gl;
use crate::renderer::material::Material;
use crate::renderer::program::Program;
use crate::renderer::vertex_layout::VertexLayout;

/// The vertex attribute location of [`Vertex::position`].
pub const ATTR_LOC_POSITION: gl::types::GLuint = 0;
/// The vertex attribute location of [`Vertex::normal`].
pub const ATTR_LOC_NORMAL: gl::types::GLuint = 1;
/// The vertex attribute location of [`Vertex::tex_coord`].
pub const ATTR_LOC_TEX_COORD: gl::types::GLuint = 2;
/// The vertex attribute location of [`Vertex::tangent`].
pub const ATTR_LOC_TANGENT: gl::types::GLuint = 3;

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub tex_coord: Vec2,
    pub tangent: Vec3,
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3, tex_coord: Vec2) -> Vertex {
        Vertex {
            position,
            normal,
            tex_coord,
            tangent: Vec3::ZERO,
        }
    }
}

/// Indexed geometry on the GPU, with an optional material applied on draw.
pub struct Mesh {
    primitive_type: gl::types::GLenum,
    vertex_layout: VertexLayout,
    vertex_buffer: Buffer,
    index_buffer: Buffer,
    material: Option<Rc<Material>>,
}

impl Mesh {
    /// Uploads the geometry. Tangents are recomputed for triangle lists, so
    /// the ones passed in only matter for other primitive types.
    pub fn create(
        vertices: &[Vertex],
        indices: &[u32],
        primitive_type: gl::types::GLenum,
    ) -> anyhow::Result<Mesh> {
        if let Some(index) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            bail!(
                "mesh index {index} is out of bounds for {} vertices",
                vertices.len()
            );
        }

        let mut vertices = vertices.to_vec();
        if primitive_type == gl::TRIANGLES {
            compute_tangents(&mut vertices, indices);
        }

        let vertex_layout = VertexLayout::create();
        let vertex_buffer = Buffer::create_with_data(gl::ARRAY_BUFFER, gl::STATIC_DRAW, &vertices);
        let index_buffer =
            Buffer::create_with_data(gl::ELEMENT_ARRAY_BUFFER, gl::STATIC_DRAW, indices);
        set_vertex_attribs(&vertex_layout);
        gl::call!(gl::BindVertexArray(0));

        Ok(Mesh {
            primitive_type,
            vertex_layout,
            vertex_buffer,
            index_buffer,
            material: None,
        })
    }

    /// A unit cube centered on the origin, with separate vertices per face so
    /// each face has its own normal and full 0..1 texture coordinates.
    pub fn create_box() -> anyhow::Result<Mesh> {
        let (vertices, indices) = box_geometry();
        Mesh::create(&vertices, &indices, gl::TRIANGLES)
    }

    /// A unit square in the XY plane, facing +Z.
    pub fn create_plane() -> anyhow::Result<Mesh> {
        let (vertices, indices) = plane_geometry();
        Mesh::create(&vertices, &indices, gl::TRIANGLES)
    }

    pub fn set_material(&mut self, material: Rc<Material>) {
        self.material = Some(material);
    }

    pub fn material(&self) -> Option<&Rc<Material>> {
        self.material.as_ref()
    }

    /// Draws the mesh with the given program, which must be in use.
    pub fn draw(&self, program: &Program) {
        self.vertex_layout.bind();
        if let Some(material) = &self.material {
            material.set_to_program(program);
        }
        gl::call!(gl::DrawElements(
            self.primitive_type,
            self.index_buffer.count() as gl::types::GLsizei,
            gl::UNSIGNED_INT,
            ptr::null(),
        ));
    }

    pub fn vertex_layout(&self) -> &VertexLayout {
        &self.vertex_layout
    }

    pub fn vertex_buffer(&self) -> &Buffer {
        &self.vertex_buffer
    }

    pub fn index_buffer(&self) -> &Buffer {
        &self.index_buffer
    }
}

/// Points the [`Vertex`] attributes at the currently bound array buffer.
pub fn set_vertex_attribs(layout: &VertexLayout) {
    let stride = mem::size_of::<Vertex>();
    layout.set_attrib(
        ATTR_LOC_POSITION,
        3,
        gl::FLOAT,
        false,
        stride,
        mem::offset_of!(Vertex, position),
    );
    layout.set_attrib(
        ATTR_LOC_NORMAL,
        3,
        gl::FLOAT,
        false,
        stride,
        mem::offset_of!(Vertex, normal),
    );
    layout.set_attrib(
        ATTR_LOC_TEX_COORD,
        2,
        gl::FLOAT,
        false,
        stride,
        mem::offset_of!(Vertex, tex_coord),
    );
    layout.set_attrib(
        ATTR_LOC_TANGENT,
        3,
        gl::FLOAT,
        false,
        stride,
        mem::offset_of!(Vertex, tangent),
    );
}

/// Computes per-vertex tangents for a triangle list. Each triangle's tangent
/// is added to all three of its corners and the sums are normalized, so
/// shared vertices get the average direction. Triangles with degenerate
/// texture coordinates contribute nothing.
pub fn compute_tangents(vertices: &mut [Vertex], indices: &[u32]) {
    let mut tangents = vec![Vec3::ZERO; vertices.len()];
    for triangle in indices.chunks_exact(3) {
        let [i0, i1, i2] = [
            triangle[0] as usize,
            triangle[1] as usize,
            triangle[2] as usize,
        ];
        let (v0, v1, v2) = (vertices[i0], vertices[i1], vertices[i2]);

        let edge1 = v1.position - v0.position;
        let edge2 = v2.position - v0.position;
        let delta_uv1 = v1.tex_coord - v0.tex_coord;
        let delta_uv2 = v2.tex_coord - v0.tex_coord;

        let det = delta_uv1.x * delta_uv2.y - delta_uv2.x * delta_uv1.y;
        if det == 0.0 || !det.is_finite() {
            continue;
        }
        let tangent = (edge1 * delta_uv2.y - edge2 * delta_uv1.y) / det;
        for i in [i0, i1, i2] {
            tangents[i] += tangent;
        }
    }
    for (vertex, tangent) in vertices.iter_mut().zip(tangents) {
        vertex.tangent = tangent.normalize_or_zero();
    }
}

pub fn box_geometry() -> (Vec<Vertex>, Vec<u32>) {
    // (normal, right, up) per face, where right x up = normal, so the
    // corners below wind counter-clockwise when seen from outside.
    let faces = [
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    ];
    let corners = [
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(0.0, 1.0),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, right, up) in faces {
        let base = vertices.len() as u32;
        for uv in corners {
            let position = normal * 0.5 + right * (uv.x - 0.5) + up * (uv.y - 0.5);
            vertices.push(Vertex::new(position, normal, uv));
        }
        indices.extend([0, 1, 2, 2, 3, 0].map(|i| base + i));
    }
    (vertices, indices)
}

pub fn plane_geometry() -> (Vec<Vertex>, Vec<u32>) {
    #[rustfmt::skip]
    let vertices = vec![
        Vertex::new(Vec3::new(-0.5, -0.5, 0.0), Vec3::Z, Vec2::new(0.0, 0.0)),
        Vertex::new(Vec3::new( 0.5, -0.5, 0.0), Vec3::Z, Vec2::new(1.0, 0.0)),
        Vertex::new(Vec3::new( 0.5,  0.5, 0.0), Vec3::Z, Vec2::new(1.0, 1.0)),
        Vertex::new(Vec3::new(-0.5,  0.5, 0.0), Vec3::Z, Vec2::new(0.0, 1.0)),
    ];
    (vertices, vec![0, 1, 2, 2, 3, 0])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec3_eq(expected: Vec3, actual: Vec3) {
        assert!(
            expected.abs_diff_eq(actual, 1e-5),
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn vertex_is_tightly_packed() {
        assert_eq!(44, mem::size_of::<Vertex>());
        assert_eq!(0, mem::offset_of!(Vertex, position));
        assert_eq!(12, mem::offset_of!(Vertex, normal));
        assert_eq!(24, mem::offset_of!(Vertex, tex_coord));
        assert_eq!(32, mem::offset_of!(Vertex, tangent));
    }

    #[test]
    fn box_faces_wind_outwards() {
        let (vertices, indices) = box_geometry();
        assert_eq!(24, vertices.len());
        assert_eq!(36, indices.len());
        for triangle in indices.chunks_exact(3) {
            let [a, b, c] = [0, 1, 2].map(|i| vertices[triangle[i] as usize]);
            let face_normal = (b.position - a.position)
                .cross(c.position - a.position)
                .normalize();
            assert_vec3_eq(a.normal, face_normal);
            assert_eq!(0.5, a.position.dot(a.normal));
        }
        for vertex in &vertices {
            assert!(vertex.position.abs().max_element() <= 0.5);
        }
    }

    #[test]
    fn plane_faces_positive_z() {
        let (vertices, indices) = plane_geometry();
        assert_eq!(vec![0, 1, 2, 2, 3, 0], indices);
        assert!(vertices.iter().all(|v| v.normal == Vec3::Z && v.position.z == 0.0));
    }

    #[test]
    fn tangents_follow_increasing_u() {
        let (mut vertices, indices) = plane_geometry();
        compute_tangents(&mut vertices, &indices);
        for vertex in &vertices {
            assert_vec3_eq(Vec3::X, vertex.tangent);
        }

        let (mut vertices, indices) = box_geometry();
        compute_tangents(&mut vertices, &indices);
        // The top face's texture u axis runs along +X.
        for vertex in vertices.iter().filter(|v| v.normal == Vec3::Y) {
            assert_vec3_eq(Vec3::X, vertex.tangent);
        }
        for vertex in vertices.iter().filter(|v| v.normal == Vec3::X) {
            assert_vec3_eq(Vec3::NEG_Z, vertex.tangent);
        }
    }

    #[test]
    fn tangents_are_accumulated_on_shared_vertices() {
        // Two triangles sharing vertex 0, one with u along +X and one with
        // u along +Y: the shared vertex gets the normalized sum.
        let mut vertices = vec![
            Vertex::new(Vec3::ZERO, Vec3::Z, Vec2::new(0.0, 0.0)),
            Vertex::new(Vec3::X, Vec3::Z, Vec2::new(1.0, 0.0)),
            Vertex::new(Vec3::Y, Vec3::Z, Vec2::new(0.0, 1.0)),
            Vertex::new(Vec3::Y, Vec3::Z, Vec2::new(1.0, 0.0)),
            Vertex::new(Vec3::NEG_X, Vec3::Z, Vec2::new(0.0, 1.0)),
        ];
        compute_tangents(&mut vertices, &[0, 1, 2, 0, 3, 4]);
        assert_vec3_eq(Vec3::X, vertices[1].tangent);
        assert_vec3_eq(Vec3::Y, vertices[3].tangent);
        assert_vec3_eq(Vec3::new(1.0, 1.0, 0.0).normalize(), vertices[0].tangent);
    }

    #[test]
    fn degenerate_texture_coordinates_give_zero_tangents() {
        let mut vertices = vec![
            Vertex::new(Vec3::ZERO, Vec3::Z, Vec2::ZERO),
            Vertex::new(Vec3::X, Vec3::Z, Vec2::ZERO),
            Vertex::new(Vec3::Y, Vec3::Z, Vec2::ZERO),
            Vertex::new(Vec3::ONE, Vec3::Z, Vec2::ZERO),
        ];
        compute_tangents(&mut vertices, &[0, 1, 2]);
        assert!(vertices.iter().all(|v| v.tangent == Vec3::ZERO));
    }
}
