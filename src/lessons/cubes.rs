//! Ten textured cubes in perspective, spinning over time.

use glam::{Mat4, Vec3};

use crate::app::{InputAction, Lesson, WindowConfig};
use crate::lessons::{load_texture, CLEAR_COLOR};
use crate::renderer::{self, gl, Mesh, Program, Texture};
use crate::scene::{Camera, Movement};

pub const CUBE_POSITIONS: [Vec3; 10] = [
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(2.0, 5.0, -15.0),
    Vec3::new(-1.5, -2.2, -2.5),
    Vec3::new(-3.8, -2.0, -12.3),
    Vec3::new(2.4, -0.4, -3.5),
    Vec3::new(-1.7, 3.0, -7.5),
    Vec3::new(1.3, -2.0, -2.5),
    Vec3::new(1.5, 2.0, -2.5),
    Vec3::new(1.5, 0.2, -1.5),
    Vec3::new(-1.3, 1.0, -1.5),
];

/// Rotation of the `index`th cube at `time` seconds: 120 degrees per
/// second around (1, 0.5, 0), each cube 20 degrees ahead of the previous.
pub fn cube_transform(index: usize, time: f32) -> Mat4 {
    let angle = (time * 120.0 + 20.0 * index as f32).to_radians();
    Mat4::from_translation(CUBE_POSITIONS[index])
        * Mat4::from_axis_angle(Vec3::new(1.0, 0.5, 0.0).normalize(), angle)
}

/// The cube mesh, its two textures and the program mixing them.
pub struct CubeField {
    cube: Mesh,
    program: Program,
    container: Texture,
    face: Texture,
}

impl CubeField {
    pub fn load() -> anyhow::Result<CubeField> {
        let program = Program::create_from_files("shader/texture.vs", "shader/texture_mix.fs")?;
        program.use_program();
        program.set_uniform("tex1", 0);
        program.set_uniform("tex2", 1);
        Ok(CubeField {
            cube: Mesh::create_box()?,
            program,
            container: load_texture("image/container.jpg")?,
            face: load_texture("image/awesomeface.png")?,
        })
    }

    pub fn draw(&self, view_projection: Mat4, time: f32) {
        renderer::clear(CLEAR_COLOR);
        gl::call!(gl::Enable(gl::DEPTH_TEST));

        self.program.use_program();
        gl::call!(gl::ActiveTexture(gl::TEXTURE0));
        self.container.bind();
        gl::call!(gl::ActiveTexture(gl::TEXTURE1));
        self.face.bind();
        gl::call!(gl::ActiveTexture(gl::TEXTURE0));

        for i in 0..CUBE_POSITIONS.len() {
            self.program
                .set_uniform("transform", view_projection * cube_transform(i, time));
            self.cube.draw(&self.program);
        }
    }
}

pub struct Cubes {
    field: CubeField,
    camera: Camera,
    width: u32,
    height: u32,
}

impl Lesson for Cubes {
    fn window_config() -> WindowConfig {
        WindowConfig {
            title: "04 First 3D",
            ..WindowConfig::default()
        }
    }

    fn bootstrap(width: u32, height: u32) -> anyhow::Result<Cubes> {
        Ok(Cubes {
            field: CubeField::load()?,
            camera: Camera::default(),
            width,
            height,
        })
    }

    fn handle_action(&mut self, action: &InputAction) -> anyhow::Result<()> {
        if let InputAction::Resized { width, height } = *action {
            self.width = width;
            self.height = height;
        }
        Ok(())
    }

    fn render_frame(&mut self, time: f32, _movement: Movement) -> anyhow::Result<()> {
        let aspect_ratio = self.width as f32 / self.height.max(1) as f32;
        let projection = self.camera.projection(aspect_ratio, 0.01, 20.0);
        self.field
            .draw(projection * self.camera.view_matrix(), time);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cubes_rotate_in_place() {
        for i in 0..CUBE_POSITIONS.len() {
            let center = cube_transform(i, 1.25).transform_point3(Vec3::ZERO);
            assert!(center.abs_diff_eq(CUBE_POSITIONS[i], 1e-5));
        }
    }

    #[test]
    fn cubes_complete_a_turn_in_three_seconds() {
        let start = cube_transform(3, 0.0);
        let after_turn = cube_transform(3, 3.0);
        assert!(start.abs_diff_eq(after_turn, 1e-4));
        let after_half_turn = cube_transform(3, 1.5);
        assert!(!start.abs_diff_eq(after_half_turn, 1e-2));
    }
}
