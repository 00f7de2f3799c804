//! Two textures on one quad: a generated checkerboard and a picture,
//! blended in the fragment shader.

use std::mem;
use std::ptr;

use crate::app::{Lesson, WindowConfig};
use crate::image::Image;
use crate::lessons::{load_texture, CLEAR_COLOR};
use crate::renderer::{self, gl, Buffer, Program, Texture, VertexLayout};
use crate::scene::Movement;

#[rustfmt::skip]
const VERTICES: [f32; 32] = [
    // position       color           texture coordinate
     0.5,  0.5, 0.0,  1.0, 0.0, 0.0,  1.0, 1.0,
     0.5, -0.5, 0.0,  0.0, 1.0, 0.0,  1.0, 0.0,
    -0.5, -0.5, 0.0,  0.0, 0.0, 1.0,  0.0, 0.0,
    -0.5,  0.5, 0.0,  1.0, 1.0, 0.0,  0.0, 1.0,
];
const INDICES: [u32; 6] = [0, 1, 3, 1, 2, 3];

pub struct TexturedQuad {
    vertex_layout: VertexLayout,
    _vertex_buffer: Buffer,
    index_buffer: Buffer,
    program: Program,
    checker: Texture,
    face: Texture,
}

impl Lesson for TexturedQuad {
    fn window_config() -> WindowConfig {
        WindowConfig {
            title: "03 First Texture",
            ..WindowConfig::default()
        }
    }

    fn bootstrap(_width: u32, _height: u32) -> anyhow::Result<TexturedQuad> {
        let vertex_layout = VertexLayout::create();
        let vertex_buffer = Buffer::create_with_data(gl::ARRAY_BUFFER, gl::STATIC_DRAW, &VERTICES);
        let float = mem::size_of::<f32>();
        vertex_layout.set_attrib(0, 3, gl::FLOAT, false, 8 * float, 0);
        vertex_layout.set_attrib(1, 3, gl::FLOAT, false, 8 * float, 3 * float);
        vertex_layout.set_attrib(2, 2, gl::FLOAT, false, 8 * float, 6 * float);
        let index_buffer =
            Buffer::create_with_data(gl::ELEMENT_ARRAY_BUFFER, gl::STATIC_DRAW, &INDICES);

        let program =
            Program::create_from_files("shader/textured_quad.vs", "shader/textured_quad.fs")?;

        let mut checker_image = Image::create(512, 512, 4)?;
        checker_image.set_check_image(16, 16);
        let checker = Texture::create_from_image(&checker_image);
        let face = load_texture("image/awesomeface.png")?;

        program.use_program();
        program.set_uniform("tex1", 0);
        program.set_uniform("tex2", 1);

        Ok(TexturedQuad {
            vertex_layout,
            _vertex_buffer: vertex_buffer,
            index_buffer,
            program,
            checker,
            face,
        })
    }

    fn render_frame(&mut self, _time: f32, _movement: Movement) -> anyhow::Result<()> {
        renderer::clear(CLEAR_COLOR);
        self.program.use_program();
        gl::call!(gl::ActiveTexture(gl::TEXTURE0));
        self.checker.bind();
        gl::call!(gl::ActiveTexture(gl::TEXTURE1));
        self.face.bind();
        gl::call!(gl::ActiveTexture(gl::TEXTURE0));

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
