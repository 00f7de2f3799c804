//! A spot light with a soft edge and distance falloff. F switches to a
//! flashlight that follows the camera.

use glam::{Vec2, Vec3};
use sdl2::keyboard::Keycode;

use crate::app::{InputAction, Lesson, WindowConfig};
use crate::lessons::lighting_maps::LitCubes;
use crate::lessons::toggle;
use crate::scene::{Camera, Light, Movement};

pub fn spot_light() -> Light {
    Light {
        position: Vec3::new(0.0, 0.0, 3.0),
        direction: Vec3::NEG_Z,
        cutoff: Vec2::new(12.5, 5.0),
        distance: 50.0,
        ..Light::default()
    }
}

/// Points `light` from the camera along its view direction.
pub fn follow_camera(light: &mut Light, camera: &Camera) {
    light.position = camera.position;
    light.direction = camera.front();
}

pub struct Spot {
    scene: LitCubes,
    flashlight: bool,
}

impl Lesson for Spot {
    fn window_config() -> WindowConfig {
        WindowConfig {
            title: "11 Spot Light",
            ..WindowConfig::default()
        }
    }

    fn bootstrap(width: u32, height: u32) -> anyhow::Result<Spot> {
        Ok(Spot {
            scene: LitCubes::load(width, height, spot_light())?,
            flashlight: true,
        })
    }

    fn handle_action(&mut self, action: &InputAction) -> anyhow::Result<()> {
        if let InputAction::KeyPressed(Keycode::F) = action {
            toggle(&mut self.flashlight, "flashlight");
        }
        self.scene.handle_action(action);
        Ok(())
    }

    fn render_frame(&mut self, _time: f32, movement: Movement) -> anyhow::Result<()> {
        self.scene.viewer.camera.process_movement(movement);
        if self.flashlight {
            follow_camera(&mut self.scene.light, &self.scene.viewer.camera);
        }
        self.scene.draw(!self.flashlight);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flashlight_follows_the_camera() {
        let mut light = spot_light();
        let camera = Camera::new(Vec3::new(1.0, 2.0, 3.0), 90.0, 0.0);
        follow_camera(&mut light, &camera);
        assert_eq!(camera.position, light.position);
        assert!(light.direction.abs_diff_eq(Vec3::NEG_X, 1e-6));
    }

    #[test]
    fn spot_cone_is_narrow() {
        let cosines = spot_light().cutoff_cosines();
        assert!(cosines.x > cosines.y);
        assert!((cosines.x - 12.5f32.to_radians().cos()).abs() < 1e-6);
    }
}
