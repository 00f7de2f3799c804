//! The lessons, in tutorial order. Each one is run by its own binary in
//! `src/bin`.
//!
//! Lessons after the first few share a camera ([`Viewer`]) and, from the
//! depth test on, the same small scene of textured boxes on a floor
//! ([`BoxScene`]).

use std::path::Path;
use std::rc::Rc;

use glam::{Mat4, Quat, Vec3, Vec4};
use sdl2::keyboard::Keycode;

use crate::app::InputAction;
use crate::image::Image;
use crate::renderer::{Material, Mesh, Program, Texture};
use crate::scene::Camera;

pub mod blend;
pub mod blinn_phong;
pub mod camera;
pub mod cubemap;
pub mod cubes;
pub mod depth;
pub mod directional;
pub mod framebuffer;
pub mod instancing;
pub mod lighting_maps;
pub mod model;
pub mod normal_map;
pub mod shadow;
pub mod spot;
pub mod square;
pub mod stencil;
pub mod texture;
pub mod triangle;

pub const CLEAR_COLOR: Vec4 = Vec4::new(0.1, 0.2, 0.3, 0.0);

/// The camera plus the window size it projects to.
pub struct Viewer {
    pub camera: Camera,
    pub width: u32,
    pub height: u32,
    pub near: f32,
    pub far: f32,
}

impl Viewer {
    pub fn new(camera: Camera, width: u32, height: u32, near: f32, far: f32) -> Viewer {
        Viewer {
            camera,
            width,
            height,
            near,
            far,
        }
    }

    /// Feeds window, mouse and the reset key (R) to the camera.
    pub fn handle_action(&mut self, action: &InputAction) {
        match *action {
            InputAction::Resized { width, height } => {
                self.width = width;
                self.height = height;
            }
            InputAction::MouseMoved { x, y } => self.camera.mouse_move(x, y),
            InputAction::MouseButton {
                button,
                pressed,
                x,
                y,
            } => self.camera.mouse_button(button, pressed, x, y),
            InputAction::KeyPressed(Keycode::R) => {
                self.camera.reset();
                log::info!("camera reset");
            }
            InputAction::KeyPressed(_) => {}
        }
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    pub fn view(&self) -> Mat4 {
        self.camera.view_matrix()
    }

    pub fn projection(&self) -> Mat4 {
        self.camera
            .projection(self.aspect_ratio(), self.near, self.far)
    }
}

/// Flips a lesson setting and logs its new state.
pub fn toggle(flag: &mut bool, name: &str) {
    *flag = !*flag;
    log::info!("{name}: {}", if *flag { "on" } else { "off" });
}

pub fn load_texture(path: impl AsRef<Path>) -> anyhow::Result<Texture> {
    Ok(Texture::create_from_image(&Image::load(path, true)?))
}

pub fn single_color_texture(color: Vec4) -> anyhow::Result<Texture> {
    Ok(Texture::create_from_image(&Image::create_single_color(
        4, 4, color,
    )?))
}

/// Translation, then rotation in degrees around `axis`, then scale.
pub fn model_transform(translation: Vec3, angle: f32, axis: Vec3, scale: Vec3) -> Mat4 {
    Mat4::from_scale_rotation_translation(
        scale,
        Quat::from_axis_angle(axis.normalize(), angle.to_radians()),
        translation,
    )
}

/// A floor and textured boxes: marble floor, a plain wooden container and a
/// steel-framed one with a specular map.
pub struct BoxScene {
    pub box_mesh: Mesh,
    pub plane_material: Material,
    pub box1_material: Material,
    pub box2_material: Material,
}

impl BoxScene {
    pub fn load(plane_shininess: f32) -> anyhow::Result<BoxScene> {
        let gray = Rc::new(single_color_texture(Vec4::new(0.5, 0.5, 0.5, 1.0))?);
        let dark_gray = Rc::new(single_color_texture(Vec4::new(0.2, 0.2, 0.2, 1.0))?);
        Ok(BoxScene {
            box_mesh: Mesh::create_box()?,
            plane_material: Material {
                diffuse: Some(Rc::new(load_texture("image/marble.jpg")?)),
                specular: Some(gray),
                shininess: plane_shininess,
            },
            box1_material: Material {
                diffuse: Some(Rc::new(load_texture("image/container.jpg")?)),
                specular: Some(dark_gray),
                shininess: 16.0,
            },
            box2_material: Material {
                diffuse: Some(Rc::new(load_texture("image/container2.png")?)),
                specular: Some(Rc::new(load_texture("image/container2_specular.png")?)),
                shininess: 64.0,
            },
        })
    }

    pub fn plane_transform(size: f32) -> Mat4 {
        Mat4::from_translation(Vec3::new(0.0, -0.5, 0.0))
            * Mat4::from_scale(Vec3::new(size, 1.0, size))
    }

    pub fn box1_transform() -> Mat4 {
        model_transform(Vec3::new(-1.0, 0.75, -4.0), 30.0, Vec3::Y, Vec3::splat(1.5))
    }

    pub fn box2_transform() -> Mat4 {
        model_transform(Vec3::new(0.0, 0.75, 2.0), 20.0, Vec3::Y, Vec3::splat(1.5))
    }

    pub fn box3_transform() -> Mat4 {
        model_transform(Vec3::new(3.0, 1.75, -2.0), 50.0, Vec3::Y, Vec3::splat(1.5))
    }

    /// Draws the box mesh with `material`. The program must be in use.
    pub fn draw_object(
        &self,
        program: &Program,
        view_projection: Mat4,
        model: Mat4,
        material: &Material,
    ) {
        program.set_uniform("transform", view_projection * model);
        program.set_uniform("modelTransform", model);
        material.set_to_program(program);
        self.box_mesh.draw(program);
    }

    /// The floor of the given size plus the two boxes.
    pub fn draw(&self, program: &Program, view_projection: Mat4, plane_size: f32) {
        self.draw_object(
            program,
            view_projection,
            BoxScene::plane_transform(plane_size),
            &self.plane_material,
        );
        self.draw_object(
            program,
            view_projection,
            BoxScene::box1_transform(),
            &self.box1_material,
        );
        self.draw_object(
            program,
            view_projection,
            BoxScene::box2_transform(),
            &self.box2_material,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdl2::mouse::MouseButton;

    #[test]
    fn viewer_tracks_window_size() {
        let mut viewer = Viewer::new(Camera::default(), 800, 600, 0.1, 100.0);
        viewer.handle_action(&InputAction::Resized {
            width: 1000,
            height: 500,
        });
        assert_eq!(2.0, viewer.aspect_ratio());
        viewer.handle_action(&InputAction::Resized {
            width: 1000,
            height: 0,
        });
        assert!(viewer.aspect_ratio().is_finite());
    }

    #[test]
    fn viewer_resets_camera_on_r() {
        let mut viewer = Viewer::new(
            Camera::new(Vec3::new(0.0, 2.5, 8.0), 0.0, -20.0),
            800,
            600,
            0.1,
            100.0,
        );
        viewer.handle_action(&InputAction::MouseButton {
            button: MouseButton::Right,
            pressed: true,
            x: 0.0,
            y: 0.0,
        });
        assert!(viewer.camera.is_controlled());
        viewer.handle_action(&InputAction::KeyPressed(Keycode::R));
        assert_eq!(Vec3::new(0.0, 0.0, 3.0), viewer.camera.position);
    }

    #[test]
    fn model_transform_scales_then_rotates_then_translates() {
        let model = model_transform(Vec3::new(1.0, 0.0, 0.0), 90.0, Vec3::Y, Vec3::splat(2.0));
        // (1, 0, 0) scaled to (2, 0, 0), rotated to (0, 0, -2), moved by +x.
        assert!(model
            .transform_point3(Vec3::X)
            .abs_diff_eq(Vec3::new(1.0, 0.0, -2.0), 1e-5));
    }

    #[test]
    fn floor_top_is_at_zero() {
        let plane = BoxScene::plane_transform(40.0);
        assert!(plane
            .transform_point3(Vec3::new(0.5, 0.5, 0.5))
            .abs_diff_eq(Vec3::new(20.0, 0.0, 20.0), 1e-5));
    }

    #[test]
    fn toggle_flips_flag() {
        let mut flag = false;
        toggle(&mut flag, "test");
        assert!(flag);
        toggle(&mut flag, "test");
        assert!(!flag);
    }
}
