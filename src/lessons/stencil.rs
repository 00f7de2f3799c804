//! Stencil testing: the steel-framed box gets an outline, drawn only where
//! the box itself did not write to the stencil buffer.

use glam::{Mat4, Vec3, Vec4};

use crate::app::{InputAction, Lesson, WindowConfig};
use crate::lessons::depth::{BoxRoom, PLANE_SIZE};
use crate::lessons::{BoxScene, CLEAR_COLOR};
use crate::renderer::{self, gl, Program};
use crate::scene::Movement;

const OUTLINE_COLOR: Vec4 = Vec4::new(1.0, 1.0, 0.5, 1.0);
const OUTLINE_SCALE: f32 = 1.05;

pub fn outline_transform(model: Mat4) -> Mat4 {
    model * Mat4::from_scale(Vec3::splat(OUTLINE_SCALE))
}

pub struct StencilTest {
    room: BoxRoom,
    outline_program: Program,
}

impl Lesson for StencilTest {
    fn window_config() -> WindowConfig {
        WindowConfig {
            title: "14 Stencil Test",
            ..WindowConfig::default()
        }
    }

    fn bootstrap(width: u32, height: u32) -> anyhow::Result<StencilTest> {
        Ok(StencilTest {
            room: BoxRoom::load(width, height)?,
            outline_program: Program::create_from_files("shader/simple.vs", "shader/simple.fs")?,
        })
    }

    fn handle_action(&mut self, action: &InputAction) -> anyhow::Result<()> {
        self.room.handle_action(action);
        Ok(())
    }

    fn render_frame(&mut self, _time: f32, movement: Movement) -> anyhow::Result<()> {
        self.room.viewer.camera.process_movement(movement);
        let view_projection = self.room.view_projection();
        let scene = &self.room.scene;
        let program = &self.room.program;

        gl::call!(gl::Enable(gl::STENCIL_TEST));
        gl::call!(gl::StencilOp(gl::KEEP, gl::KEEP, gl::REPLACE));
        gl::call!(gl::StencilMask(0xFF));
        renderer::clear(CLEAR_COLOR);
        gl::call!(gl::Enable(gl::DEPTH_TEST));

        self.room.use_lighting();
        gl::call!(gl::StencilMask(0x00));
        scene.draw_object(
            program,
            view_projection,
            BoxScene::plane_transform(PLANE_SIZE),
            &scene.plane_material,
        );
        scene.draw_object(
            program,
            view_projection,
            BoxScene::box1_transform(),
            &scene.box1_material,
        );

        gl::call!(gl::StencilFunc(gl::ALWAYS, 1, 0xFF));
        gl::call!(gl::StencilMask(0xFF));
        scene.draw_object(
            program,
            view_projection,
            BoxScene::box2_transform(),
            &scene.box2_material,
        );

        gl::call!(gl::StencilFunc(gl::NOTEQUAL, 1, 0xFF));
        gl::call!(gl::StencilMask(0x00));
        gl::call!(gl::Disable(gl::DEPTH_TEST));
        self.outline_program.use_program();
        self.outline_program.set_uniform(
            "transform",
            view_projection * outline_transform(BoxScene::box2_transform()),
        );
        self.outline_program.set_uniform("color", OUTLINE_COLOR);
        scene.box_mesh.draw(&self.outline_program);

        gl::call!(gl::StencilMask(0xFF));
        gl::call!(gl::StencilFunc(gl::ALWAYS, 0, 0xFF));
        gl::call!(gl::Enable(gl::DEPTH_TEST));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outline_is_slightly_larger_than_the_box() {
        let model = BoxScene::box2_transform();
        let corner = Vec3::splat(0.5);
        let center = model.transform_point3(Vec3::ZERO);
        let box_extent = (model.transform_point3(corner) - center).length();
        let outline_extent = (outline_transform(model).transform_point3(corner) - center).length();
        assert!((outline_extent / box_extent - OUTLINE_SCALE).abs() < 1e-5);
    }
}
