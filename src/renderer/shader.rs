use std::ffi::CString;
use std::path::Path;
use std::ptr;

use anyhow::{anyhow, Context};

use crate::assets;
use crate::renderer::gl;

const INFO_LOG_CAPACITY: usize = 1024;

/// A compiled shader stage.
pub struct Shader {
    shader: gl::types::GLuint,
}

impl Shader {
    pub fn create_from_file(
        path: impl AsRef<Path>,
        shader_type: gl::types::GLenum,
    ) -> anyhow::Result<Shader> {
        let path = path.as_ref();
        log::info!("loading shader file: {}", path.display());
        let source = assets::load_text_file(path)?;
        Shader::create_from_source(&source, shader_type, &path.display().to_string())
    }

    /// Compiles `source`. The `label` names the shader in error messages.
    pub fn create_from_source(
        source: &str,
        shader_type: gl::types::GLenum,
        label: &str,
    ) -> anyhow::Result<Shader> {
        let source = CString::new(source)
            .with_context(|| format!("shader source contains a nul byte: {label}"))?;
        let shader = gl::call!(gl::CreateShader(shader_type));
        // Owned from here on, so early returns delete the shader object.
        let shader = Shader { shader };
        gl::call!(gl::ShaderSource(shader.shader, 1, &source.as_ptr(), ptr::null()));
        gl::call!(gl::CompileShader(shader.shader));

        let mut compile_status = 0;
        gl::call!(gl::GetShaderiv(
            shader.shader,
            gl::COMPILE_STATUS,
            &mut compile_status
        ));
        if compile_status == gl::FALSE as gl::types::GLint {
            let mut info_log = [0u8; INFO_LOG_CAPACITY];
            let mut length = 0;
            gl::call!(gl::GetShaderInfoLog(
                shader.shader,
                info_log.len() as gl::types::GLsizei,
                &mut length,
                info_log.as_mut_ptr() as *mut gl::types::GLchar,
            ));
            let reason = gl::info_log_to_string(&info_log, length);
            log::error!("failed to compile shader: {label}\nreason: {reason}");
            return Err(anyhow!("failed to compile shader: {label}: {reason}"));
        }
        Ok(shader)
    }

    pub fn get(&self) -> gl::types::GLuint {
        self.shader
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        gl::call!(gl::DeleteShader(self.shader));
    }
}
