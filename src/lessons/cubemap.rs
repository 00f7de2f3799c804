//! A skybox around the camera and a box that mirrors it.

use glam::{Mat4, Vec3};

use crate::app::{InputAction, Lesson, WindowConfig};
use crate::image::Image;
use crate::lessons::depth::BoxRoom;
use crate::lessons::model_transform;
use crate::renderer::{gl, CubeTexture, Mesh, Program};
use crate::scene::Movement;

/// Face images, in cube map order.
pub const SKYBOX_FACES: [&str; 6] = [
    "image/skybox/right.jpg",
    "image/skybox/left.jpg",
    "image/skybox/top.jpg",
    "image/skybox/bottom.jpg",
    "image/skybox/front.jpg",
    "image/skybox/back.jpg",
];

const SKYBOX_SCALE: f32 = 50.0;

pub fn load_skybox() -> anyhow::Result<CubeTexture> {
    let mut images = Vec::with_capacity(SKYBOX_FACES.len());
    for face in SKYBOX_FACES {
        images.push(Image::load(face, false)?);
    }
    CubeTexture::create_from_images([
        &images[0], &images[1], &images[2], &images[3], &images[4], &images[5],
    ])
}

pub fn mirror_box_transform() -> Mat4 {
    model_transform(Vec3::new(1.0, 0.75, -2.0), 40.0, Vec3::Y, Vec3::ONE)
}

/// The skybox cube follows the camera, so it never gets closer.
pub fn skybox_transform(camera_position: Vec3) -> Mat4 {
    Mat4::from_translation(camera_position) * Mat4::from_scale(Vec3::splat(SKYBOX_SCALE))
}

pub struct Cubemap {
    room: BoxRoom,
    skybox: CubeTexture,
    cube: Mesh,
    skybox_program: Program,
    envmap_program: Program,
}

impl Lesson for Cubemap {
    fn window_config() -> WindowConfig {
        WindowConfig {
            title: "17 Cubemap",
            ..WindowConfig::default()
        }
    }

    fn bootstrap(width: u32, height: u32) -> anyhow::Result<Cubemap> {
        let skybox_program = Program::create_from_files("shader/skybox.vs", "shader/skybox.fs")?;
        skybox_program.use_program();
        skybox_program.set_uniform("skybox", 0);
        let envmap_program = Program::create_from_files("shader/envmap.vs", "shader/envmap.fs")?;
        envmap_program.use_program();
        envmap_program.set_uniform("skybox", 0);
        Ok(Cubemap {
            room: BoxRoom::load(width, height)?,
            skybox: load_skybox()?,
            cube: Mesh::create_box()?,
            skybox_program,
            envmap_program,
        })
    }

    fn handle_action(&mut self, action: &InputAction) -> anyhow::Result<()> {
        self.room.handle_action(action);
        Ok(())
    }

    fn render_frame(&mut self, _time: f32, movement: Movement) -> anyhow::Result<()> {
        self.room.viewer.camera.process_movement(movement);
        self.room.draw();

        let camera_position = self.room.viewer.camera.position;
        let view = self.room.viewer.view();
        let projection = self.room.viewer.projection();

        gl::call!(gl::ActiveTexture(gl::TEXTURE0));
        self.skybox.bind();

        self.envmap_program.use_program();
        self.envmap_program
            .set_uniform("model", mirror_box_transform());
        self.envmap_program.set_uniform("view", view);
        self.envmap_program.set_uniform("projection", projection);
        self.envmap_program
            .set_uniform("cameraPos", camera_position);
        self.cube.draw(&self.envmap_program);

        self.skybox_program.use_program();
        self.skybox_program.set_uniform(
            "transform",
            projection * view * skybox_transform(camera_position),
        );
        self.cube.draw(&self.skybox_program);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skybox_surrounds_the_camera() {
        let eye = Vec3::new(3.0, 2.0, -1.0);
        let transform = skybox_transform(eye);
        assert!(transform
            .transform_point3(Vec3::ZERO)
            .abs_diff_eq(eye, 1e-6));
        let corner = transform.transform_point3(Vec3::splat(0.5));
        assert!((corner - eye).abs_diff_eq(Vec3::splat(25.0), 1e-4));
    }

    #[test]
    fn skybox_fits_inside_the_far_plane() {
        let half_diagonal = (Vec3::splat(SKYBOX_SCALE / 2.0)).length();
        assert!(half_diagonal < 100.0);
    }
}
