//! A textured model loaded from disk, lit by the flashlight.

use glam::{Mat4, Vec3};
use sdl2::keyboard::Keycode;

use crate::app::{InputAction, Lesson, WindowConfig};
use crate::lessons::spot::{follow_camera, spot_light};
use crate::lessons::{toggle, Viewer, CLEAR_COLOR};
use crate::renderer::{self, gl, Model, Program};
use crate::scene::{Camera, Light, LightEditor, Movement};

pub const MODEL_PATH: &str = "model/backpack/backpack.obj";

pub struct ModelLoading {
    viewer: Viewer,
    light: Light,
    editor: LightEditor,
    flashlight: bool,
    model: Model,
    program: Program,
}

impl Lesson for ModelLoading {
    fn window_config() -> WindowConfig {
        WindowConfig {
            title: "12 Model Loading",
            ..WindowConfig::default()
        }
    }

    fn bootstrap(width: u32, height: u32) -> anyhow::Result<ModelLoading> {
        let camera = Camera::new(Vec3::new(0.0, 0.0, 5.0), 0.0, 0.0);
        Ok(ModelLoading {
            viewer: Viewer::new(camera, width, height, 0.1, 100.0),
            light: Light {
                cutoff: glam::Vec2::new(20.0, 10.0),
                ..spot_light()
            },
            editor: LightEditor::default(),
            flashlight: true,
            model: Model::load(MODEL_PATH)?,
            program: Program::create_from_files("shader/lighting.vs", "shader/lighting.fs")?,
        })
    }

    fn handle_action(&mut self, action: &InputAction) -> anyhow::Result<()> {
        match *action {
            InputAction::KeyPressed(Keycode::F) => toggle(&mut self.flashlight, "flashlight"),
            InputAction::KeyPressed(key) => {
                self.editor.handle_key(&mut self.light, key);
            }
            _ => {}
        }
        self.viewer.handle_action(action);
        Ok(())
    }

    fn render_frame(&mut self, _time: f32, movement: Movement) -> anyhow::Result<()> {
        self.viewer.camera.process_movement(movement);
        if self.flashlight {
            follow_camera(&mut self.light, &self.viewer.camera);
        }

        renderer::clear(CLEAR_COLOR);
        gl::call!(gl::Enable(gl::DEPTH_TEST));
        self.program.use_program();
        self.program
            .set_uniform("transform", self.viewer.projection() * self.viewer.view());
        self.program.set_uniform("modelTransform", Mat4::IDENTITY);
        self.program
            .set_uniform("viewPos", self.viewer.camera.position);
        self.program.set_uniform("blinn", false);
        self.light.apply(&self.program);
        self.model.draw(&self.program);
        Ok(())
    }
}
