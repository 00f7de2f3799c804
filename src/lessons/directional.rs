//! The lit cubes under a directional light, like sunlight: no position, no
//! falloff.

use glam::Vec3;

use crate::app::{InputAction, Lesson, WindowConfig};
use crate::lessons::lighting_maps::LitCubes;
use crate::scene::{Light, Movement};

pub fn sun() -> Light {
    Light {
        directional: true,
        direction: Vec3::new(-0.2, -1.0, -0.3),
        ambient: Vec3::splat(0.2),
        diffuse: Vec3::splat(0.5),
        ..Light::default()
    }
}

pub struct Directional {
    scene: LitCubes,
}

impl Lesson for Directional {
    fn window_config() -> WindowConfig {
        WindowConfig {
            title: "09 Directional Light",
            ..WindowConfig::default()
        }
    }

    fn bootstrap(width: u32, height: u32) -> anyhow::Result<Directional> {
        Ok(Directional {
            scene: LitCubes::load(width, height, sun())?,
        })
    }

    fn handle_action(&mut self, action: &InputAction) -> anyhow::Result<()> {
        self.scene.handle_action(action);
        Ok(())
    }

    fn render_frame(&mut self, _time: f32, movement: Movement) -> anyhow::Result<()> {
        self.scene.viewer.camera.process_movement(movement);
        self.scene.draw(false);
        Ok(())
    }
}
