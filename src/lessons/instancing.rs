//! Instanced rendering: a field of grass quads drawn with a single call,
//! each instance placed and turned by a per-instance attribute.

use std::f32::consts::TAU;
use std::ptr;

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::app::{InputAction, Lesson, WindowConfig};
use crate::lessons::depth::BoxRoom;
use crate::lessons::load_texture;
use crate::renderer::mesh::set_vertex_attribs;
use crate::renderer::{gl, Buffer, Mesh, Program, Texture, VertexLayout};
use crate::scene::Movement;

pub const GRASS_COUNT: usize = 10000;
const GRASS_SEED: u64 = 53;
/// Instance attribute location of the `(x, rotation, z)` offsets.
const ATTR_LOC_OFFSET: gl::types::GLuint = 3;

/// Random `(x, rotation around y, z)` triples with x and z in -5..5 and the
/// rotation in radians. The same seed always gives the same field.
pub fn grass_instances(count: usize, seed: u64) -> Vec<Vec3> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            Vec3::new(
                rng.gen_range(-5.0..5.0),
                rng.gen_range(0.0..TAU),
                rng.gen_range(-5.0..5.0),
            )
        })
        .collect()
}

pub struct Instancing {
    room: BoxRoom,
    // Owns the vertex and index buffers the grass layout reads from.
    plane: Mesh,
    grass_layout: VertexLayout,
    _instance_buffer: Buffer,
    instance_count: usize,
    grass_texture: Texture,
    grass_program: Program,
}

impl Lesson for Instancing {
    fn window_config() -> WindowConfig {
        WindowConfig {
            title: "18 Instancing",
            samples: Some(4),
            ..WindowConfig::default()
        }
    }

    fn bootstrap(width: u32, height: u32) -> anyhow::Result<Instancing> {
        let plane = Mesh::create_plane()?;
        let instances = grass_instances(GRASS_COUNT, GRASS_SEED);

        let grass_layout = VertexLayout::create();
        plane.vertex_buffer().bind();
        set_vertex_attribs(&grass_layout);
        plane.index_buffer().bind();
        let instance_buffer =
            Buffer::create_with_data(gl::ARRAY_BUFFER, gl::STATIC_DRAW, instances.as_slice());
        grass_layout.set_attrib(
            ATTR_LOC_OFFSET,
            3,
            gl::FLOAT,
            false,
            instance_buffer.stride(),
            0,
        );
        grass_layout.set_attrib_divisor(ATTR_LOC_OFFSET, 1);
        gl::call!(gl::BindVertexArray(0));

        let grass_program = Program::create_from_files("shader/grass.vs", "shader/grass.fs")?;
        grass_program.use_program();
        grass_program.set_uniform("tex", 0);
        log::info!("{} grass instances", instances.len());

        Ok(Instancing {
            room: BoxRoom::load(width, height)?,
            plane,
            grass_layout,
            _instance_buffer: instance_buffer,
            instance_count: instances.len(),
            grass_texture: load_texture("image/grass.png")?,
            grass_program,
        })
    }

    fn handle_action(&mut self, action: &InputAction) -> anyhow::Result<()> {
        self.room.handle_action(action);
        Ok(())
    }

    fn render_frame(&mut self, _time: f32, movement: Movement) -> anyhow::Result<()> {
        self.room.viewer.camera.process_movement(movement);
        self.room.draw();

        self.grass_program.use_program();
        self.grass_program
            .set_uniform("transform", self.room.view_projection());
        gl::call!(gl::ActiveTexture(gl::TEXTURE0));
        self.grass_texture.bind();
        self.grass_layout.bind();
        gl::call!(gl::DrawElementsInstanced(
            gl::TRIANGLES,
            self.plane.index_buffer().count() as gl::types::GLsizei,
            gl::UNSIGNED_INT,
            ptr::null(),
            self.instance_count as gl::types::GLsizei,
        ));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grass_stays_on_the_floor() {
        let instances = grass_instances(GRASS_COUNT, GRASS_SEED);
        assert_eq!(GRASS_COUNT, instances.len());
        for instance in instances {
            assert!((-5.0..5.0).contains(&instance.x));
            assert!((-5.0..5.0).contains(&instance.z));
            assert!((0.0..TAU).contains(&instance.y));
        }
    }

    #[test]
    fn grass_is_reproducible() {
        assert_eq!(grass_instances(100, 7), grass_instances(100, 7));
        assert_ne!(grass_instances(100, 7), grass_instances(100, 8));
    }
}
