//! Blending: semi-transparent windows drawn after the opaque scene, sorted
//! from the farthest to the nearest.

use glam::{Mat4, Vec3};

use crate::app::{InputAction, Lesson, WindowConfig};
use crate::lessons::depth::BoxRoom;
use crate::lessons::load_texture;
use crate::renderer::{gl, Mesh, Program, Texture};
use crate::scene::Movement;

pub const WINDOW_POSITIONS: [Vec3; 3] = [
    Vec3::new(0.0, 0.5, 4.0),
    Vec3::new(0.2, 0.5, 5.0),
    Vec3::new(0.4, 0.5, 6.0),
];

/// Returns `positions` ordered by decreasing distance from `eye`.
pub fn back_to_front(positions: &[Vec3], eye: Vec3) -> Vec<Vec3> {
    let mut sorted = positions.to_vec();
    sorted.sort_by(|a, b| b.distance_squared(eye).total_cmp(&a.distance_squared(eye)));
    sorted
}

pub struct Blending {
    room: BoxRoom,
    window: Mesh,
    window_texture: Texture,
    window_program: Program,
}

impl Lesson for Blending {
    fn window_config() -> WindowConfig {
        WindowConfig {
            title: "15 Blending",
            ..WindowConfig::default()
        }
    }

    fn bootstrap(width: u32, height: u32) -> anyhow::Result<Blending> {
        let window_program = Program::create_from_files("shader/texture.vs", "shader/blend.fs")?;
        window_program.use_program();
        window_program.set_uniform("tex", 0);
        Ok(Blending {
            room: BoxRoom::load(width, height)?,
            window: Mesh::create_plane()?,
            window_texture: load_texture("image/blending_transparent_window.png")?,
            window_program,
        })
    }

    fn handle_action(&mut self, action: &InputAction) -> anyhow::Result<()> {
        self.room.handle_action(action);
        Ok(())
    }

    fn render_frame(&mut self, _time: f32, movement: Movement) -> anyhow::Result<()> {
        self.room.viewer.camera.process_movement(movement);
        self.room.draw();

        gl::call!(gl::Enable(gl::BLEND));
        gl::call!(gl::BlendFunc(gl::SRC_ALPHA, gl::ONE_MINUS_SRC_ALPHA));
        gl::call!(gl::Disable(gl::CULL_FACE));

        let view_projection = self.room.view_projection();
        self.window_program.use_program();
        gl::call!(gl::ActiveTexture(gl::TEXTURE0));
        self.window_texture.bind();
        for position in back_to_front(&WINDOW_POSITIONS, self.room.viewer.camera.position) {
            self.window_program
                .set_uniform("transform", view_projection * Mat4::from_translation(position));
            self.window.draw(&self.window_program);
        }

        gl::call!(gl::Disable(gl::BLEND));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_are_drawn_farthest_first() {
        let sorted = back_to_front(&WINDOW_POSITIONS, Vec3::new(0.0, 2.5, 8.0));
        assert_eq!(
            vec![WINDOW_POSITIONS[0], WINDOW_POSITIONS[1], WINDOW_POSITIONS[2]],
            sorted
        );

        let sorted = back_to_front(&WINDOW_POSITIONS, Vec3::new(0.0, 0.5, 0.0));
        assert_eq!(WINDOW_POSITIONS[2], sorted[0]);
        assert_eq!(WINDOW_POSITIONS[0], sorted[2]);
    }
}
