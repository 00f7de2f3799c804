//! Phong against Blinn-Phong specular highlights on the box room floor,
//! under a wide spot light. B switches between them.

use glam::{Vec2, Vec3};
use sdl2::keyboard::Keycode;

use crate::app::{InputAction, Lesson, WindowConfig};
use crate::lessons::depth::BoxRoom;
use crate::lessons::toggle;
use crate::scene::{Light, Movement};

/// A wide, far-reaching cone, so the highlight on the floor stays in view
/// as the camera moves.
fn room_spot_light() -> Light {
    Light {
        position: Vec3::new(1.0, 4.0, 4.0),
        direction: Vec3::new(-1.0, -1.0, -1.0),
        cutoff: Vec2::new(120.0, 5.0),
        distance: 128.0,
        ..Light::default()
    }
}

pub struct BlinnPhong {
    room: BoxRoom,
}

impl Lesson for BlinnPhong {
    fn window_config() -> WindowConfig {
        WindowConfig {
            title: "19 Blinn-Phong",
            ..WindowConfig::default()
        }
    }

    fn bootstrap(width: u32, height: u32) -> anyhow::Result<BlinnPhong> {
        let mut room = BoxRoom::load(width, height)?;
        room.light = room_spot_light();
        room.blinn = true;
        Ok(BlinnPhong { room })
    }

    fn handle_action(&mut self, action: &InputAction) -> anyhow::Result<()> {
        if let InputAction::KeyPressed(Keycode::B) = action {
            toggle(&mut self.room.blinn, "blinn-phong");
        }
        self.room.handle_action(action);
        Ok(())
    }

    fn render_frame(&mut self, _time: f32, movement: Movement) -> anyhow::Result<()> {
        self.room.viewer.camera.process_movement(movement);
        self.room.draw();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spot_light_is_wide_and_points_down() {
        let light = room_spot_light();
        assert!(!light.directional);
        assert_eq!(Vec3::new(1.0, 4.0, 4.0), light.position);
        assert!(light.direction.y < 0.0);
        assert_eq!(Vec2::new(120.0, 5.0), light.cutoff);
        assert_eq!(128.0, light.distance);
        // Cones past 90 degrees light the whole floor.
        assert!(light.cutoff_cosines().x < 0.0);
    }
}
