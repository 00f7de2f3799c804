//! Shadow mapping. The scene is first rendered from the light into a depth
//! texture, then from the camera with every fragment checked against it.
//! L switches between the spot light and a directional one, V shows the
//! depth texture in a corner.

use glam::{Mat4, Vec3, Vec4};
use sdl2::keyboard::Keycode;

use crate::app::{InputAction, Lesson, WindowConfig};
use crate::lessons::depth::room_camera;
use crate::lessons::{toggle, BoxScene, Viewer, CLEAR_COLOR};
use crate::renderer::{self, gl, FrameBuffer, Material, Mesh, Program, ShadowMap};
use crate::scene::{Light, LightEditor, Movement};

pub const SHADOW_MAP_SIZE: u32 = 1024;
pub const PLANE_SIZE: f32 = 40.0;
const SHADOW_MAP_UNIT: u32 = 3;

pub fn preview_transform() -> Mat4 {
    Mat4::from_translation(Vec3::new(0.7, -0.7, 0.0))
        * Mat4::from_scale(Vec3::new(0.5, 0.5, 1.0))
}

/// The box scene on a larger floor, lit with shadows.
pub struct ShadowScene {
    pub viewer: Viewer,
    pub light: Light,
    pub editor: LightEditor,
    pub blinn: bool,
    pub preview: bool,
    scene: BoxScene,
    shadow_map: ShadowMap,
    lighting_program: Program,
    depth_program: Program,
    preview_program: Program,
    light_program: Program,
    quad: Mesh,
}

impl ShadowScene {
    pub fn load(width: u32, height: u32) -> anyhow::Result<ShadowScene> {
        let lighting_program = Program::create_from_files(
            "shader/lighting_shadow.vs",
            "shader/lighting_shadow.fs",
        )?;
        lighting_program.use_program();
        lighting_program.set_uniform("shadowMap", SHADOW_MAP_UNIT as i32);

        let preview_program = Program::create_from_files("shader/texture.vs", "shader/depth.fs")?;
        preview_program.use_program();
        preview_program.set_uniform("tex", 0);
        preview_program.set_uniform("transform", preview_transform());

        Ok(ShadowScene {
            viewer: Viewer::new(room_camera(), width, height, 0.1, 100.0),
            light: Light::default(),
            editor: LightEditor::default(),
            blinn: true,
            preview: false,
            scene: BoxScene::load(128.0)?,
            shadow_map: ShadowMap::create(SHADOW_MAP_SIZE, SHADOW_MAP_SIZE)?,
            lighting_program,
            depth_program: Program::create_from_files("shader/simple.vs", "shader/simple.fs")?,
            preview_program,
            light_program: Program::create_from_files("shader/simple.vs", "shader/simple.fs")?,
            quad: Mesh::create_plane()?,
        })
    }

    /// Handles the light and preview toggles and the camera.
    pub fn handle_action(&mut self, action: &InputAction) {
        match action {
            InputAction::KeyPressed(Keycode::L) => {
                toggle(&mut self.light.directional, "directional light")
            }
            InputAction::KeyPressed(Keycode::V) => toggle(&mut self.preview, "shadow map preview"),
            InputAction::KeyPressed(key) => {
                self.editor.handle_key(&mut self.light, *key);
            }
            _ => {}
        }
        self.viewer.handle_action(action);
    }

    fn objects(&self) -> [(Mat4, &Material); 4] {
        [
            (
                BoxScene::plane_transform(PLANE_SIZE),
                &self.scene.plane_material,
            ),
            (BoxScene::box1_transform(), &self.scene.box1_material),
            (BoxScene::box2_transform(), &self.scene.box2_material),
            (BoxScene::box3_transform(), &self.scene.box2_material),
        ]
    }

    fn render_shadow_map(&self, light_transform: Mat4) {
        self.shadow_map.bind();
        gl::call!(gl::Viewport(
            0,
            0,
            SHADOW_MAP_SIZE as i32,
            SHADOW_MAP_SIZE as i32
        ));
        gl::call!(gl::Clear(gl::DEPTH_BUFFER_BIT));
        self.depth_program.use_program();
        for (model, _) in self.objects() {
            self.depth_program
                .set_uniform("transform", light_transform * model);
            self.scene.box_mesh.draw(&self.depth_program);
        }
        FrameBuffer::bind_to_default();
        gl::call!(gl::Viewport(
            0,
            0,
            self.viewer.width as i32,
            self.viewer.height as i32
        ));
    }

    /// Renders the shadow map, then the lit scene to the window.
    pub fn draw(&self) {
        gl::call!(gl::Enable(gl::DEPTH_TEST));
        let light_transform = self.light.light_transform();
        self.render_shadow_map(light_transform);

        renderer::clear(CLEAR_COLOR);
        let view_projection = self.viewer.projection() * self.viewer.view();
        self.lighting_program.use_program();
        self.lighting_program
            .set_uniform("viewPos", self.viewer.camera.position);
        self.lighting_program.set_uniform("blinn", self.blinn);
        self.lighting_program
            .set_uniform("lightTransform", light_transform);
        self.light.apply(&self.lighting_program);
        gl::call!(gl::ActiveTexture(gl::TEXTURE0 + SHADOW_MAP_UNIT));
        self.shadow_map.shadow_map().bind();
        gl::call!(gl::ActiveTexture(gl::TEXTURE0));
        for (model, material) in self.objects() {
            self.scene
                .draw_object(&self.lighting_program, view_projection, model, material);
        }

        if !self.light.directional {
            self.light_program.use_program();
            self.light_program.set_uniform(
                "transform",
                view_projection
                    * Mat4::from_translation(self.light.position)
                    * Mat4::from_scale(Vec3::splat(0.2)),
            );
            self.light_program.set_uniform("color", Vec4::ONE);
            self.scene.box_mesh.draw(&self.light_program);
        }

        if self.preview {
            gl::call!(gl::Disable(gl::DEPTH_TEST));
            self.preview_program.use_program();
            self.shadow_map.shadow_map().bind();
            self.quad.draw(&self.preview_program);
            gl::call!(gl::Enable(gl::DEPTH_TEST));
        }
    }
}

pub struct Shadows {
    scene: ShadowScene,
}

impl Lesson for Shadows {
    fn window_config() -> WindowConfig {
        WindowConfig {
            title: "20 Shadow Mapping",
            ..WindowConfig::default()
        }
    }

    fn bootstrap(width: u32, height: u32) -> anyhow::Result<Shadows> {
        Ok(Shadows {
            scene: ShadowScene::load(width, height)?,
        })
    }

    fn handle_action(&mut self, action: &InputAction) -> anyhow::Result<()> {
        self.scene.handle_action(action);
        Ok(())
    }

    fn render_frame(&mut self, _time: f32, movement: Movement) -> anyhow::Result<()> {
        self.scene.viewer.camera.process_movement(movement);
        self.scene.draw();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_is_inside_the_directional_light_frustum() {
        let light = Light {
            directional: true,
            ..Light::default()
        };
        let clip = light.light_transform().project_point3(Vec3::ZERO);
        assert!(clip.abs().max_element() <= 1.0, "clip position {clip}");
    }

    #[test]
    fn boxes_are_inside_the_spot_light_frustum() {
        let light = Light::default();
        for model in [
            BoxScene::box1_transform(),
            BoxScene::box2_transform(),
            BoxScene::box3_transform(),
        ] {
            let center = model.transform_point3(Vec3::ZERO);
            let clip = light.light_transform().project_point3(center);
            assert!(clip.abs().max_element() <= 1.0, "clip position {clip}");
        }
    }

    #[test]
    fn preview_sits_in_the_bottom_right_corner() {
        let corner = preview_transform().transform_point3(Vec3::new(0.5, -0.5, 0.0));
        assert!(corner.abs_diff_eq(Vec3::new(0.95, -0.95, 0.0), 1e-6));
    }
}
