//! Normal mapping: a brick wall whose per-pixel normals come from a
//! texture, added to the shadowed scene.

use glam::{Mat4, Vec3};

use crate::app::{InputAction, Lesson, WindowConfig};
use crate::image::Image;
use crate::lessons::model_transform;
use crate::lessons::shadow::ShadowScene;
use crate::renderer::{gl, Mesh, Program, Texture};
use crate::scene::Movement;

pub fn brick_transform() -> Mat4 {
    model_transform(Vec3::new(0.0, 3.0, 0.0), -90.0, Vec3::X, Vec3::ONE)
}

pub struct NormalMapping {
    scene: ShadowScene,
    brick: Mesh,
    diffuse: Texture,
    normal_map: Texture,
    program: Program,
}

impl Lesson for NormalMapping {
    fn window_config() -> WindowConfig {
        WindowConfig {
            title: "21 Normal Mapping",
            ..WindowConfig::default()
        }
    }

    fn bootstrap(width: u32, height: u32) -> anyhow::Result<NormalMapping> {
        let program = Program::create_from_files("shader/normal.vs", "shader/normal.fs")?;
        program.use_program();
        program.set_uniform("diffuse", 0);
        program.set_uniform("normalMap", 1);
        Ok(NormalMapping {
            scene: ShadowScene::load(width, height)?,
            brick: Mesh::create_plane()?,
            diffuse: Texture::create_from_image(&Image::load("image/brickwall.jpg", false)?),
            normal_map: Texture::create_from_image(&Image::load(
                "image/brickwall_normal.jpg",
                false,
            )?),
            program,
        })
    }

    fn handle_action(&mut self, action: &InputAction) -> anyhow::Result<()> {
        self.scene.handle_action(action);
        Ok(())
    }

    fn render_frame(&mut self, _time: f32, movement: Movement) -> anyhow::Result<()> {
        self.scene.viewer.camera.process_movement(movement);
        self.scene.draw();

        let model = brick_transform();
        let view_projection = self.scene.viewer.projection() * self.scene.viewer.view();
        self.program.use_program();
        self.program.set_uniform("transform", view_projection * model);
        self.program.set_uniform("modelTransform", model);
        self.program
            .set_uniform("viewPos", self.scene.viewer.camera.position);
        self.program
            .set_uniform("lightPos", self.scene.light.position);
        gl::call!(gl::ActiveTexture(gl::TEXTURE0));
        self.diffuse.bind();
        gl::call!(gl::ActiveTexture(gl::TEXTURE1));
        self.normal_map.bind();
        gl::call!(gl::ActiveTexture(gl::TEXTURE0));
        self.brick.draw(&self.program);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brick_plane_faces_up() {
        let model = brick_transform();
        assert!(model
            .transform_vector3(Vec3::Z)
            .normalize()
            .abs_diff_eq(Vec3::Y, 1e-6));
        assert!(model
            .transform_point3(Vec3::ZERO)
            .abs_diff_eq(Vec3::new(0.0, 3.0, 0.0), 1e-6));
    }

    #[test]
    fn brick_plane_keeps_its_size() {
        let model = brick_transform();
        for axis in [Vec3::X, Vec3::Y, Vec3::Z] {
            assert!((model.transform_vector3(axis).length() - 1.0).abs() < 1e-6);
        }
    }
}
