//! The first triangle: three positions in a vertex buffer, drawn with a
//! flat color program.

use glam::{Mat4, Vec4};

use crate::app::{Lesson, WindowConfig};
use crate::lessons::CLEAR_COLOR;
use crate::renderer::{self, gl, Buffer, Program, VertexLayout};
use crate::scene::Movement;

const POSITION: u32 = 0;

#[rustfmt::skip]
const VERTICES: [f32; 9] = [
    -0.5, -0.5, 0.0,
     0.5, -0.5, 0.0,
     0.0,  0.5, 0.0,
];

pub struct Triangle {
    vertex_layout: VertexLayout,
    _vertex_buffer: Buffer,
    program: Program,
}

impl Lesson for Triangle {
    fn window_config() -> WindowConfig {
        WindowConfig {
            title: "01 First Triangle",
            ..WindowConfig::default()
        }
    }

    fn bootstrap(_width: u32, _height: u32) -> anyhow::Result<Triangle> {
        let vertex_layout = VertexLayout::create();
        let vertex_buffer = Buffer::create_with_data(gl::ARRAY_BUFFER, gl::STATIC_DRAW, &VERTICES);
        vertex_layout.set_attrib(POSITION, 3, gl::FLOAT, false, 3 * 4, 0);

        let program = Program::create_from_files("shader/simple.vs", "shader/simple.fs")?;
        log::info!("program id: {}", program.get());

        Ok(Triangle {
            vertex_layout,
            _vertex_buffer: vertex_buffer,
            program,
        })
    }

    fn render_frame(&mut self, _time: f32, _movement: Movement) -> anyhow::Result<()> {
        renderer::clear(CLEAR_COLOR);
        self.program.use_program();
        self.program.set_uniform("transform", Mat4::IDENTITY);
        self.program
            .set_uniform("color", Vec4::new(1.0, 0.5, 0.2, 1.0));
        self.vertex_layout.bind();
        gl::call!(gl::DrawArrays(gl::TRIANGLES, 0, 3));
        Ok(())
    }
}
