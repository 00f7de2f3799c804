//! Phong lighting with diffuse and specular maps on a field of cubes, lit
//! by a point light that orbits the scene. Space pauses the orbit.
//!
//! [`LitCubes`] is shared with the directional, spot and Blinn-Phong
//! lessons, which only change the light.

use std::rc::Rc;

use glam::{Mat4, Vec3, Vec4};
use sdl2::keyboard::Keycode;

use crate::app::{InputAction, Lesson, WindowConfig};
use crate::lessons::cubes::CUBE_POSITIONS;
use crate::lessons::{load_texture, toggle, Viewer, CLEAR_COLOR};
use crate::renderer::{self, gl, Material, Mesh, Program};
use crate::scene::{Camera, Light, LightEditor, Movement};

const LIGHT_CUBE_COLOR: Vec4 = Vec4::ONE;

pub fn cube_model_transform(index: usize) -> Mat4 {
    Mat4::from_translation(CUBE_POSITIONS[index])
        * Mat4::from_axis_angle(
            Vec3::new(1.0, 0.3, 0.5).normalize(),
            (20.0 * index as f32).to_radians(),
        )
}

/// Where the orbiting point light is at `time` seconds.
pub fn orbit_position(time: f32) -> Vec3 {
    Vec3::new(2.0 * time.sin(), 1.0, 2.0 * time.cos())
}

/// A light with a cone wide enough to light in every direction.
pub fn point_light(position: Vec3) -> Light {
    Light {
        position,
        cutoff: glam::Vec2::new(180.0, 0.0),
        distance: 50.0,
        ambient: Vec3::splat(0.2),
        diffuse: Vec3::splat(0.5),
        ..Light::default()
    }
}

/// Ten cubes with the container material, the lighting program and a small
/// unlit cube marking the light.
pub struct LitCubes {
    pub viewer: Viewer,
    pub light: Light,
    pub editor: LightEditor,
    cube: Mesh,
    lighting_program: Program,
    light_program: Program,
}

impl LitCubes {
    pub fn load(width: u32, height: u32, light: Light) -> anyhow::Result<LitCubes> {
        let mut cube = Mesh::create_box()?;
        cube.set_material(Rc::new(Material {
            diffuse: Some(Rc::new(load_texture("image/container2.png")?)),
            specular: Some(Rc::new(load_texture("image/container2_specular.png")?)),
            shininess: 32.0,
        }));
        Ok(LitCubes {
            viewer: Viewer::new(Camera::default(), width, height, 0.1, 100.0),
            light,
            editor: LightEditor::default(),
            cube,
            lighting_program: Program::create_from_files(
                "shader/lighting.vs",
                "shader/lighting.fs",
            )?,
            light_program: Program::create_from_files("shader/simple.vs", "shader/simple.fs")?,
        })
    }

    /// Feeds key presses to the light editor and everything to the camera.
    pub fn handle_action(&mut self, action: &InputAction) {
        if let InputAction::KeyPressed(key) = *action {
            self.editor.handle_key(&mut self.light, key);
        }
        self.viewer.handle_action(action);
    }

    pub fn draw(&self, draw_light_cube: bool) {
        renderer::clear(CLEAR_COLOR);
        gl::call!(gl::Enable(gl::DEPTH_TEST));
        let view_projection = self.viewer.projection() * self.viewer.view();

        self.lighting_program.use_program();
        self.lighting_program
            .set_uniform("viewPos", self.viewer.camera.position);
        self.lighting_program.set_uniform("blinn", false);
        self.light.apply(&self.lighting_program);
        for i in 0..CUBE_POSITIONS.len() {
            let model = cube_model_transform(i);
            self.lighting_program
                .set_uniform("transform", view_projection * model);
            self.lighting_program.set_uniform("modelTransform", model);
            self.cube.draw(&self.lighting_program);
        }

        if draw_light_cube {
            self.light_program.use_program();
            self.light_program.set_uniform(
                "transform",
                view_projection
                    * Mat4::from_translation(self.light.position)
                    * Mat4::from_scale(Vec3::splat(0.2)),
            );
            self.light_program.set_uniform("color", LIGHT_CUBE_COLOR);
            self.cube.draw(&self.light_program);
        }
    }
}

pub struct LightingMaps {
    scene: LitCubes,
    animate: bool,
}

impl Lesson for LightingMaps {
    fn window_config() -> WindowConfig {
        WindowConfig {
            title: "08 Lighting Maps",
            ..WindowConfig::default()
        }
    }

    fn bootstrap(width: u32, height: u32) -> anyhow::Result<LightingMaps> {
        Ok(LightingMaps {
            scene: LitCubes::load(width, height, point_light(orbit_position(0.0)))?,
            animate: true,
        })
    }

    fn handle_action(&mut self, action: &InputAction) -> anyhow::Result<()> {
        if let InputAction::KeyPressed(Keycode::Space) = action {
            toggle(&mut self.animate, "animate light");
        }
        self.scene.handle_action(action);
        Ok(())
    }

    fn render_frame(&mut self, time: f32, movement: Movement) -> anyhow::Result<()> {
        self.scene.viewer.camera.process_movement(movement);
        if self.animate {
            self.scene.light.position = orbit_position(time);
        }
        self.scene.draw(true);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_orbits_at_fixed_height_and_radius() {
        for time in [0.0, 0.7, 2.0, 5.5] {
            let position = orbit_position(time);
            assert_eq!(1.0, position.y);
            assert!((Vec3::new(position.x, 0.0, position.z).length() - 2.0).abs() < 1e-5);
        }
    }

    #[test]
    fn point_light_cone_covers_every_direction() {
        let cosines = point_light(Vec3::ZERO).cutoff_cosines();
        assert!((cosines.x + 1.0).abs() < 1e-6);
        assert!((cosines.y + 1.0).abs() < 1e-6);
    }

    #[test]
    fn cubes_keep_their_positions() {
        for (i, position) in CUBE_POSITIONS.iter().enumerate() {
            let center = cube_model_transform(i).transform_point3(Vec3::ZERO);
            assert!(center.abs_diff_eq(*position, 1e-6));
        }
    }
}
