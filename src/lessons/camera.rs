//! The spinning cubes again, seen through a fly camera: hold the right mouse
//! button to look around and move with W/A/S/D/E/Q.

use glam::Vec3;

use crate::app::{InputAction, Lesson, WindowConfig};
use crate::lessons::cubes::CubeField;
use crate::lessons::Viewer;
use crate::scene::{Camera, Movement};

pub struct CameraControl {
    field: CubeField,
    viewer: Viewer,
}

impl Lesson for CameraControl {
    fn window_config() -> WindowConfig {
        WindowConfig {
            title: "05 Camera Control",
            ..WindowConfig::default()
        }
    }

    fn bootstrap(width: u32, height: u32) -> anyhow::Result<CameraControl> {
        let mut camera = Camera::new(Vec3::new(0.0, 0.0, 3.0), 0.0, 0.0);
        camera.rotation_speed = 0.8;
        Ok(CameraControl {
            field: CubeField::load()?,
            viewer: Viewer::new(camera, width, height, 0.01, 20.0),
        })
    }

    fn handle_action(&mut self, action: &InputAction) -> anyhow::Result<()> {
        self.viewer.handle_action(action);
        Ok(())
    }

    fn render_frame(&mut self, time: f32, movement: Movement) -> anyhow::Result<()> {
        self.viewer.camera.process_movement(movement);
        self.field
            .draw(self.viewer.projection() * self.viewer.view(), time);
        Ok(())
    }
}
