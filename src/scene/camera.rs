use glam::{Mat3, Mat4, Vec2, Vec3};
use sdl2::mouse::MouseButton;

/// Which of the fly camera's movement keys are held this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Movement {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

/// A fly camera, steered by mouse and keyboard while the right mouse button
/// is held.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    /// Rotation around +Y, in degrees, kept within 0..=360.
    pub yaw: f32,
    /// Rotation around +X, in degrees, kept within -89..=89.
    pub pitch: f32,
    pub up: Vec3,
    /// Distance moved per frame per held key.
    pub speed: f32,
    /// Degrees turned per pixel of mouse movement.
    pub rotation_speed: f32,
    control: bool,
    previous_mouse_position: Vec2,
}

impl Default for Camera {
    fn default() -> Camera {
        Camera::new(Vec3::new(0.0, 0.0, 3.0), 0.0, 0.0)
    }
}

impl Camera {
    pub fn new(position: Vec3, yaw: f32, pitch: f32) -> Camera {
        Camera {
            position,
            yaw,
            pitch,
            up: Vec3::Y,
            speed: 0.05,
            rotation_speed: 0.08,
            control: false,
            previous_mouse_position: Vec2::ZERO,
        }
    }

    pub fn front(&self) -> Vec3 {
        Mat3::from_rotation_y(self.yaw.to_radians())
            * Mat3::from_rotation_x(self.pitch.to_radians())
            * Vec3::NEG_Z
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front(), self.up)
    }

    /// A 45 degree vertical field of view projection.
    pub fn projection(&self, aspect_ratio: f32, near: f32, far: f32) -> Mat4 {
        Mat4::perspective_rh_gl(45f32.to_radians(), aspect_ratio, near, far)
    }

    pub fn is_controlled(&self) -> bool {
        self.control
    }

    /// Moves the camera along its own axes. Only has an effect while the
    /// camera is being controlled.
    pub fn process_movement(&mut self, movement: Movement) {
        if !self.control {
            return;
        }
        let front = self.front();
        if movement.forward {
            self.position += self.speed * front;
        }
        if movement.backward {
            self.position -= self.speed * front;
        }

        let right = self.up.cross(-front).normalize();
        if movement.right {
            self.position += self.speed * right;
        }
        if movement.left {
            self.position -= self.speed * right;
        }

        let up = (-front).cross(right).normalize();
        if movement.up {
            self.position += self.speed * up;
        }
        if movement.down {
            self.position -= self.speed * up;
        }
    }

    pub fn mouse_move(&mut self, x: f32, y: f32) {
        if !self.control {
            return;
        }
        let position = Vec2::new(x, y);
        let delta = position - self.previous_mouse_position;

        self.yaw -= delta.x * self.rotation_speed;
        self.pitch -= delta.y * self.rotation_speed;
        if self.yaw < 0.0 {
            self.yaw += 360.0;
        }
        if self.yaw > 360.0 {
            self.yaw -= 360.0;
        }
        self.pitch = self.pitch.clamp(-89.0, 89.0);

        self.previous_mouse_position = position;
    }

    /// Pressing the right mouse button starts controlling the camera,
    /// releasing it stops.
    pub fn mouse_button(&mut self, button: MouseButton, pressed: bool, x: f32, y: f32) {
        if button != MouseButton::Right {
            return;
        }
        if pressed {
            self.previous_mouse_position = Vec2::new(x, y);
            self.control = true;
        } else {
            self.control = false;
        }
    }

    pub fn reset(&mut self) {
        self.yaw = 0.0;
        self.pitch = 0.0;
        self.position = Vec3::new(0.0, 0.0, 3.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controlled_camera() -> Camera {
        let mut camera = Camera::default();
        camera.mouse_button(MouseButton::Right, true, 100.0, 100.0);
        camera
    }

    #[test]
    fn default_camera_looks_down_negative_z() {
        let camera = Camera::default();
        assert!(camera.front().abs_diff_eq(Vec3::NEG_Z, 1e-6));
        let view = camera.view_matrix();
        assert!(view
            .transform_point3(Vec3::new(0.0, 0.0, -1.0))
            .abs_diff_eq(Vec3::new(0.0, 0.0, -4.0), 1e-5));
    }

    #[test]
    fn yaw_turns_left() {
        let camera = Camera::new(Vec3::ZERO, 90.0, 0.0);
        assert!(camera.front().abs_diff_eq(Vec3::NEG_X, 1e-6));
        let camera = Camera::new(Vec3::ZERO, 0.0, 30.0);
        assert!(camera.front().y > 0.0);
    }

    #[test]
    fn input_is_ignored_without_control() {
        let mut camera = Camera::default();
        camera.mouse_move(500.0, 500.0);
        camera.process_movement(Movement {
            forward: true,
            ..Default::default()
        });
        assert_eq!(Camera::default(), camera);
    }

    #[test]
    fn movement_follows_camera_axes() {
        let mut camera = controlled_camera();
        camera.process_movement(Movement {
            forward: true,
            ..Default::default()
        });
        assert!(camera.position.abs_diff_eq(Vec3::new(0.0, 0.0, 2.95), 1e-6));

        camera.process_movement(Movement {
            right: true,
            up: true,
            ..Default::default()
        });
        assert!(camera.position.abs_diff_eq(Vec3::new(0.05, 0.05, 2.95), 1e-6));

        camera.process_movement(Movement {
            left: true,
            down: true,
            backward: true,
            ..Default::default()
        });
        assert!(camera.position.abs_diff_eq(Vec3::new(0.0, 0.0, 3.0), 1e-6));
    }

    #[test]
    fn yaw_wraps_and_pitch_is_clamped() {
        let mut camera = controlled_camera();
        camera.mouse_move(110.0, 100.0);
        assert!((camera.yaw - 359.2).abs() < 1e-3, "yaw was {}", camera.yaw);

        camera.mouse_move(110.0, -2000.0);
        assert_eq!(89.0, camera.pitch);
        camera.mouse_move(110.0, 3000.0);
        assert_eq!(-89.0, camera.pitch);
    }

    #[test]
    fn releasing_the_right_button_stops_control() {
        let mut camera = controlled_camera();
        assert!(camera.is_controlled());
        camera.mouse_button(MouseButton::Left, false, 0.0, 0.0);
        assert!(camera.is_controlled());
        camera.mouse_button(MouseButton::Right, false, 0.0, 0.0);
        assert!(!camera.is_controlled());
    }

    #[test]
    fn reset_restores_the_start_pose() {
        let mut camera = Camera::new(Vec3::new(0.0, 2.5, 8.0), 10.0, -20.0);
        camera.reset();
        assert_eq!(Vec3::new(0.0, 0.0, 3.0), camera.position);
        assert_eq!((0.0, 0.0), (camera.yaw, camera.pitch));
    }
}
