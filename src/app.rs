//! Window, context and main loop shared by every lesson.
//!
//! A lesson only sees [`InputAction`]s and the held movement keys; it never
//! touches SDL directly, so each lesson module reads as "build resources,
//! react to input, draw a frame".

use std::error::Error;
use std::ffi::{c_void, CStr};
use std::fmt::Display;
use std::time::Instant;

use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::{Keycode, Scancode};
use sdl2::mouse::MouseButton;
use sdl2::video::GLProfile;

use crate::renderer::gl;
use crate::scene::camera::Movement;

/// Window settings a lesson asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowConfig {
    pub title: &'static str,
    pub width: u32,
    pub height: u32,
    /// Multisample anti-aliasing sample count, if any.
    pub samples: Option<u8>,
}

impl Default for WindowConfig {
    fn default() -> WindowConfig {
        WindowConfig {
            title: env!("CARGO_PKG_NAME"),
            width: 800,
            height: 600,
            samples: None,
        }
    }
}

/// Input passed on to lessons.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputAction {
    /// The drawable size of the window changed. The viewport has already
    /// been updated.
    Resized { width: u32, height: u32 },
    MouseMoved { x: f32, y: f32 },
    MouseButton {
        button: MouseButton,
        pressed: bool,
        x: f32,
        y: f32,
    },
    /// A key was pressed (key repeats are not reported).
    KeyPressed(Keycode),
}

/// One tutorial program.
pub trait Lesson: Sized {
    fn window_config() -> WindowConfig {
        WindowConfig::default()
    }

    /// Creates the lesson's GPU resources. Called once the GL context is
    /// current, with the initial drawable size.
    fn bootstrap(width: u32, height: u32) -> anyhow::Result<Self>;

    fn handle_action(&mut self, _action: &InputAction) -> anyhow::Result<()> {
        Ok(())
    }

    /// Renders a frame. `time` is in seconds since the lesson started.
    fn render_frame(&mut self, time: f32, movement: Movement) -> anyhow::Result<()>;
}

/// Sets up logging, opens the window and runs the lesson until the window is
/// closed or escape is pressed.
pub fn run<L: Lesson>() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("start program");
    let result = run_lesson::<L>();
    if let Err(err) = &result {
        log::error!("{err:#}");
    }
    result
}

fn run_lesson<L: Lesson>() -> anyhow::Result<()> {
    let config = L::window_config();

    log::info!("initialize sdl");
    let sdl_context = sdl2::init().map_err(SdlErr)?;
    let video_subsystem = sdl_context.video().map_err(SdlErr)?;
    let gl_attr = video_subsystem.gl_attr();
    gl_attr.set_context_profile(GLProfile::Core);
    gl_attr.set_context_version(3, 3);
    gl_attr.set_depth_size(24);
    gl_attr.set_stencil_size(8);
    if let Some(samples) = config.samples {
        gl_attr.set_multisample_buffers(1);
        gl_attr.set_multisample_samples(samples);
    }

    log::info!("create window");
    let window = video_subsystem
        .window(config.title, config.width, config.height)
        .resizable()
        .opengl()
        .build()?;
    let _gl_context = window.gl_create_context().map_err(SdlErr)?;
    gl::load_with(|s| video_subsystem.gl_get_proc_address(s) as *const c_void);
    if let Err(err) = video_subsystem.gl_set_swap_interval(1) {
        log::warn!("could not enable vsync: {err}");
    }
    log::info!("OpenGL context version: {}", gl_version());

    let (width, height) = window.drawable_size();
    gl::call!(gl::Viewport(0, 0, width as i32, height as i32));
    if config.samples.is_some() {
        gl::call!(gl::Enable(gl::MULTISAMPLE));
    }

    log::info!("create lesson");
    let mut lesson = L::bootstrap(width, height)?;
    let mut event_pump = sdl_context.event_pump().map_err(SdlErr)?;

    log::info!("start main loop");
    let start = Instant::now();
    'main: loop {
        for event in event_pump.poll_iter() {
            let action = match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'main,
                Event::Window {
                    win_event: WindowEvent::SizeChanged(..),
                    ..
                } => {
                    let (width, height) = window.drawable_size();
                    log::info!("framebuffer size changed: ({width}, {height})");
                    gl::call!(gl::Viewport(0, 0, width as i32, height as i32));
                    InputAction::Resized { width, height }
                }
                Event::MouseMotion { x, y, .. } => InputAction::MouseMoved {
                    x: x as f32,
                    y: y as f32,
                },
                Event::MouseButtonDown {
                    mouse_btn, x, y, ..
                } => InputAction::MouseButton {
                    button: mouse_btn,
                    pressed: true,
                    x: x as f32,
                    y: y as f32,
                },
                Event::MouseButtonUp {
                    mouse_btn, x, y, ..
                } => InputAction::MouseButton {
                    button: mouse_btn,
                    pressed: false,
                    x: x as f32,
                    y: y as f32,
                },
                Event::KeyDown {
                    keycode: Some(keycode),
                    repeat: false,
                    ..
                } => {
                    log::debug!("pressed {keycode:?}");
                    InputAction::KeyPressed(keycode)
                }
                _ => continue,
            };
            lesson.handle_action(&action)?;
        }

        let keyboard = event_pump.keyboard_state();
        let movement = Movement {
            forward: keyboard.is_scancode_pressed(Scancode::W),
            backward: keyboard.is_scancode_pressed(Scancode::S),
            left: keyboard.is_scancode_pressed(Scancode::A),
            right: keyboard.is_scancode_pressed(Scancode::D),
            up: keyboard.is_scancode_pressed(Scancode::E),
            down: keyboard.is_scancode_pressed(Scancode::Q),
        };
        lesson.render_frame(start.elapsed().as_secs_f32(), movement)?;
        window.gl_swap_window();
    }

    // GL resources must be released while the context is still alive.
    drop(lesson);
    log::info!("exit");
    Ok(())
}

fn gl_version() -> String {
    let version = gl::call!(gl::GetString(gl::VERSION));
    if version.is_null() {
        return String::from("unknown");
    }
    unsafe { CStr::from_ptr(version as *const _) }
        .to_string_lossy()
        .into_owned()
}

#[derive(Debug)]
pub struct SdlErr(pub String);
impl Display for SdlErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sdl error: {}", self.0)
    }
}
impl Error for SdlErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sdl_errors_are_prefixed() {
        let err = anyhow::Error::from(SdlErr("no video device".into()));
        assert_eq!("sdl error: no video device", err.to_string());
    }

    #[test]
    fn default_window_matches_lesson_size() {
        let config = WindowConfig::default();
        assert_eq!((800, 600), (config.width, config.height));
        assert_eq!(None, config.samples);
    }
}
