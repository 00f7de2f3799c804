use std::path::Path;

use anyhow::anyhow;
use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::renderer::gl;
use crate::renderer::shader::Shader;

const INFO_LOG_CAPACITY: usize = 1024;

/// A linked shader program.
pub struct Program {
    program: gl::types::GLuint,
}

impl Program {
    pub fn create(shaders: &[&Shader]) -> anyhow::Result<Program> {
        let program = gl::call!(gl::CreateProgram());
        let program = Program { program };
        for shader in shaders {
            gl::call!(gl::AttachShader(program.program, shader.get()));
        }
        gl::call!(gl::LinkProgram(program.program));

        let mut link_status = 0;
        gl::call!(gl::GetProgramiv(
            program.program,
            gl::LINK_STATUS,
            &mut link_status
        ));
        if link_status == gl::FALSE as gl::types::GLint {
            let mut info_log = [0u8; INFO_LOG_CAPACITY];
            let mut length = 0;
            gl::call!(gl::GetProgramInfoLog(
                program.program,
                info_log.len() as gl::types::GLsizei,
                &mut length,
                info_log.as_mut_ptr() as *mut gl::types::GLchar,
            ));
            let reason = gl::info_log_to_string(&info_log, length);
            log::error!("failed to link program: {reason}");
            return Err(anyhow!("failed to link program: {reason}"));
        }
        Ok(program)
    }

    /// Compiles the vertex and fragment shader files and links them. The
    /// shader objects are released once linked.
    pub fn create_from_files(
        vertex_shader_path: impl AsRef<Path>,
        fragment_shader_path: impl AsRef<Path>,
    ) -> anyhow::Result<Program> {
        let vertex_shader = Shader::create_from_file(vertex_shader_path, gl::VERTEX_SHADER)?;
        let fragment_shader = Shader::create_from_file(fragment_shader_path, gl::FRAGMENT_SHADER)?;
        Program::create(&[&vertex_shader, &fragment_shader])
    }

    pub fn use_program(&self) {
        gl::call!(gl::UseProgram(self.program));
    }

    pub fn get(&self) -> gl::types::GLuint {
        self.program
    }

    /// Sets a uniform of the program. The program must be in use.
    pub fn set_uniform<U: Uniform>(&self, name: &str, value: U) {
        let location = gl::get_uniform_location(self.program, name);
        value.set(location);
    }
}

impl Drop for Program {
    fn drop(&mut self) {
        gl::call!(gl::DeleteProgram(self.program));
    }
}

/// Values which can be uploaded to a uniform location.
pub trait Uniform {
    fn set(&self, location: gl::types::GLint);
}

impl Uniform for i32 {
    fn set(&self, location: gl::types::GLint) {
        gl::call!(gl::Uniform1i(location, *self));
    }
}

impl Uniform for bool {
    fn set(&self, location: gl::types::GLint) {
        gl::call!(gl::Uniform1i(location, *self as i32));
    }
}

impl Uniform for f32 {
    fn set(&self, location: gl::types::GLint) {
        gl::call!(gl::Uniform1f(location, *self));
    }
}

impl Uniform for Vec2 {
    fn set(&self, location: gl::types::GLint) {
        gl::call!(gl::Uniform2fv(location, 1, self.to_array().as_ptr()));
    }
}

impl Uniform for Vec3 {
    fn set(&self, location: gl::types::GLint) {
        gl::call!(gl::Uniform3fv(location, 1, self.to_array().as_ptr()));
    }
}

impl Uniform for Vec4 {
    fn set(&self, location: gl::types::GLint) {
        gl::call!(gl::Uniform4fv(location, 1, self.to_array().as_ptr()));
    }
}

impl Uniform for Mat4 {
    fn set(&self, location: gl::types::GLint) {
        gl::call!(gl::UniformMatrix4fv(
            location,
            1,
            gl::FALSE,
            self.to_cols_array().as_ptr()
        ));
    }
}
