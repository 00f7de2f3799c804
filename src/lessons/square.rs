//! A square from four vertices and six indices, with per-vertex colors.

use std::mem;
use std::ptr;

use crate::app::{Lesson, WindowConfig};
use crate::lessons::CLEAR_COLOR;
use crate::renderer::{self, gl, Buffer, Program, VertexLayout};
use crate::scene::Movement;

const POSITION: u32 = 0;
const COLOR: u32 = 1;

#[rustfmt::skip]
const VERTICES: [f32; 24] = [
    // position       color
     0.5,  0.5, 0.0,  1.0, 0.0, 0.0,
     0.5, -0.5, 0.0,  0.0, 1.0, 0.0,
    -0.5, -0.5, 0.0,  0.0, 0.0, 1.0,
    -0.5,  0.5, 0.0,  1.0, 1.0, 0.0,
];
const INDICES: [u32; 6] = [0, 1, 3, 1, 2, 3];

pub struct Square {
    vertex_layout: VertexLayout,
    _vertex_buffer: Buffer,
    index_buffer: Buffer,
    program: Program,
}

impl Lesson for Square {
    fn window_config() -> WindowConfig {
        WindowConfig {
            title: "02 First Square",
            ..WindowConfig::default()
        }
    }

    fn bootstrap(_width: u32, _height: u32) -> anyhow::Result<Square> {
        let vertex_layout = VertexLayout::create();
        let vertex_buffer = Buffer::create_with_data(gl::ARRAY_BUFFER, gl::STATIC_DRAW, &VERTICES);
        let stride = 6 * mem::size_of::<f32>();
        vertex_layout.set_attrib(POSITION, 3, gl::FLOAT, false, stride, 0);
        vertex_layout.set_attrib(COLOR, 3, gl::FLOAT, false, stride, 3 * mem::size_of::<f32>());
        let index_buffer =
            Buffer::create_with_data(gl::ELEMENT_ARRAY_BUFFER, gl::STATIC_DRAW, &INDICES);

        let program = Program::create_from_files(
            "shader/per_vertex_color.vs",
            "shader/per_vertex_color.fs",
        )?;

        Ok(Square {
            vertex_layout,
            _vertex_buffer: vertex_buffer,
            index_buffer,
            program,
        })
    }

    fn render_frame(&mut self, _time: f32, _movement: Movement) -> anyhow::Result<()> {
        renderer::clear(CLEAR_COLOR);
        self.program.use_program();
        self.vertex_layout.bind();
        gl::call!(gl::DrawElements(
            gl::TRIANGLES,
            self.index_buffer.count() as gl::types::GLsizei,
            gl::UNSIGNED_INT,
            ptr::null(),
        ));
        Ok(())
    }
}
