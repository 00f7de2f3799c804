//! Depth testing: a floor with boxes standing on it, several materials lit
//! by one spot light.
//!
//! [`BoxRoom`] is the starting scene for all the lessons after this one.

use glam::{Mat4, Vec3};

use crate::app::{InputAction, Lesson, WindowConfig};
use crate::lessons::{BoxScene, Viewer, CLEAR_COLOR};
use crate::renderer::{self, gl, Program};
use crate::scene::{Camera, Light, LightEditor, Movement};

pub const PLANE_SIZE: f32 = 10.0;

/// Where the camera starts in the box room lessons: above and behind the
/// boxes, looking slightly down.
pub fn room_camera() -> Camera {
    Camera::new(Vec3::new(0.0, 2.5, 8.0), 0.0, -20.0)
}

/// The box scene with its camera, light and lighting program.
pub struct BoxRoom {
    pub viewer: Viewer,
    pub light: Light,
    pub editor: LightEditor,
    pub blinn: bool,
    pub scene: BoxScene,
    pub program: Program,
}

impl BoxRoom {
    pub fn load(width: u32, height: u32) -> anyhow::Result<BoxRoom> {
        Ok(BoxRoom {
            viewer: Viewer::new(room_camera(), width, height, 0.1, 100.0),
            light: Light::default(),
            editor: LightEditor::default(),
            blinn: false,
            scene: BoxScene::load(128.0)?,
            program: Program::create_from_files("shader/lighting.vs", "shader/lighting.fs")?,
        })
    }

    /// Feeds key presses to the light editor and everything to the camera.
    pub fn handle_action(&mut self, action: &InputAction) {
        if let InputAction::KeyPressed(key) = *action {
            self.editor.handle_key(&mut self.light, key);
        }
        self.viewer.handle_action(action);
    }

    pub fn view_projection(&self) -> Mat4 {
        self.viewer.projection() * self.viewer.view()
    }

    /// Puts the lighting program in use with the camera and light uniforms
    /// set, ready for [`BoxScene::draw_object`].
    pub fn use_lighting(&self) {
        self.program.use_program();
        self.program
            .set_uniform("viewPos", self.viewer.camera.position);
        self.program.set_uniform("blinn", self.blinn);
        self.light.apply(&self.program);
    }

    /// Clears and draws the floor and both boxes.
    pub fn draw(&self) {
        renderer::clear(CLEAR_COLOR);
        gl::call!(gl::Enable(gl::DEPTH_TEST));
        self.use_lighting();
        self.scene
            .draw(&self.program, self.view_projection(), PLANE_SIZE);
    }
}

pub struct DepthTest {
    room: BoxRoom,
}

impl Lesson for DepthTest {
    fn window_config() -> WindowConfig {
        WindowConfig {
            title: "13 Depth Test",
            ..WindowConfig::default()
        }
    }

    fn bootstrap(width: u32, height: u32) -> anyhow::Result<DepthTest> {
        Ok(DepthTest {
            room: BoxRoom::load(width, height)?,
        })
    }

    fn handle_action(&mut self, action: &InputAction) -> anyhow::Result<()> {
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
    fn room_camera_looks_at_the_boxes() {
        let camera = room_camera();
        assert!(camera.front().y < 0.0);
        assert!(camera.front().z < 0.0);
        assert_eq!(0.0, camera.front().x);
    }
}
