//! Post-processing: the box room is rendered into an off-screen framebuffer
//! whose color texture is then drawn over the whole window through an
//! effect shader. P cycles the effect, +/- change the gamma.

use glam::{Mat4, Vec3};
use sdl2::keyboard::Keycode;

use crate::app::{InputAction, Lesson, WindowConfig};
use crate::lessons::depth::BoxRoom;
use crate::lessons::CLEAR_COLOR;
use crate::renderer::{self, gl, FrameBuffer, Mesh, Program, Texture};
use crate::scene::Movement;

const GAMMA_STEP: f32 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PostEffect {
    Invert,
    Gamma,
    None,
}

impl PostEffect {
    pub fn next(self) -> PostEffect {
        match self {
            PostEffect::Invert => PostEffect::Gamma,
            PostEffect::Gamma => PostEffect::None,
            PostEffect::None => PostEffect::Invert,
        }
    }
}

/// Gamma starts neutral, so the effect shows nothing until it is adjusted.
pub const INITIAL_GAMMA: f32 = 1.0;

/// Changes `gamma` by `steps` increments, staying within 0..=2.
pub fn adjust_gamma(gamma: f32, steps: i32) -> f32 {
    (gamma + steps as f32 * GAMMA_STEP).clamp(0.0, 2.0)
}

fn create_framebuffer(width: u32, height: u32) -> anyhow::Result<FrameBuffer> {
    let color = Texture::create(width.max(1), height.max(1), gl::RGB, gl::UNSIGNED_BYTE);
    FrameBuffer::create(color)
}

fn create_effect_program(fragment_shader: &str) -> anyhow::Result<Program> {
    let program = Program::create_from_files("shader/texture.vs", fragment_shader)?;
    program.use_program();
    program.set_uniform("tex", 0);
    program.set_uniform("transform", Mat4::from_scale(Vec3::new(2.0, 2.0, 1.0)));
    Ok(program)
}

pub struct PostProcessing {
    room: BoxRoom,
    framebuffer: FrameBuffer,
    screen: Mesh,
    invert_program: Program,
    gamma_program: Program,
    copy_program: Program,
    effect: PostEffect,
    gamma: f32,
}

impl PostProcessing {
    fn effect_program(&self) -> &Program {
        match self.effect {
            PostEffect::Invert => &self.invert_program,
            PostEffect::Gamma => &self.gamma_program,
            PostEffect::None => &self.copy_program,
        }
    }
}

impl Lesson for PostProcessing {
    fn window_config() -> WindowConfig {
        WindowConfig {
            title: "16 Framebuffer",
            ..WindowConfig::default()
        }
    }

    fn bootstrap(width: u32, height: u32) -> anyhow::Result<PostProcessing> {
        Ok(PostProcessing {
            room: BoxRoom::load(width, height)?,
            framebuffer: create_framebuffer(width, height)?,
            screen: Mesh::create_plane()?,
            invert_program: create_effect_program("shader/invert.fs")?,
            gamma_program: create_effect_program("shader/gamma.fs")?,
            copy_program: create_effect_program("shader/texture.fs")?,
            effect: PostEffect::Invert,
            gamma: INITIAL_GAMMA,
        })
    }

    fn handle_action(&mut self, action: &InputAction) -> anyhow::Result<()> {
        match *action {
            InputAction::Resized { width, height } => {
                self.framebuffer = create_framebuffer(width, height)?;
            }
            InputAction::KeyPressed(Keycode::P) => {
                self.effect = self.effect.next();
                log::info!("post effect: {:?}", self.effect);
            }
            InputAction::KeyPressed(Keycode::Plus | Keycode::Equals | Keycode::KpPlus) => {
                self.gamma = adjust_gamma(self.gamma, 1);
                log::info!("gamma: {:.1}", self.gamma);
            }
            InputAction::KeyPressed(Keycode::Minus | Keycode::KpMinus) => {
                self.gamma = adjust_gamma(self.gamma, -1);
                log::info!("gamma: {:.1}", self.gamma);
            }
            _ => {}
        }
        self.room.handle_action(action);
        Ok(())
    }

    fn render_frame(&mut self, _time: f32, movement: Movement) -> anyhow::Result<()> {
        self.room.viewer.camera.process_movement(movement);

        self.framebuffer.bind();
        self.room.draw();
        FrameBuffer::bind_to_default();

        gl::call!(gl::Disable(gl::DEPTH_TEST));
        renderer::clear(CLEAR_COLOR);
        let program = self.effect_program();
        program.use_program();
        if self.effect == PostEffect::Gamma {
            program.set_uniform("gamma", self.gamma);
        }
        gl::call!(gl::ActiveTexture(gl::TEXTURE0));
        self.framebuffer.color_attachment().bind();
        self.screen.draw(program);
        gl::call!(gl::Enable(gl::DEPTH_TEST));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effects_cycle() {
        let mut effect = PostEffect::Invert;
        let mut seen = vec![];
        for _ in 0..3 {
            effect = effect.next();
            seen.push(effect);
        }
        assert_eq!(
            vec![PostEffect::Gamma, PostEffect::None, PostEffect::Invert],
            seen
        );
    }

    #[test]
    fn gamma_stays_in_range() {
        assert!((adjust_gamma(1.0, 1) - 1.1).abs() < 1e-6);
        assert_eq!(2.0, adjust_gamma(1.95, 1));
        assert_eq!(0.0, adjust_gamma(0.05, -1));
        assert_eq!(2.0, adjust_gamma(2.0, 5));
    }

    #[test]
    fn gamma_starts_neutral() {
        assert_eq!(1.0, INITIAL_GAMMA);
        assert!((adjust_gamma(INITIAL_GAMMA, -3) - 0.7).abs() < 1e-6);
    }
}
