use std::ffi::c_void;
use std::mem;

use bytemuck::Pod;

use crate::renderer::gl;

/// A GPU buffer object holding `count` elements of `stride` bytes each.
pub struct Buffer {
    buffer: gl::types::GLuint,
    target: gl::types::GLenum,
    usage: gl::types::GLenum,
    stride: usize,
    count: usize,
}

impl Buffer {
    /// Creates a buffer, binds it to `target` and uploads `data` into it. The
    /// buffer stays bound afterwards.
    pub fn create_with_data<T: Pod>(
        target: gl::types::GLenum,
        usage: gl::types::GLenum,
        data: &[T],
    ) -> Buffer {
        let mut buffer = 0;
        gl::call!(gl::GenBuffers(1, &mut buffer));
        let buffer = Buffer {
            buffer,
            target,
            usage,
            stride: mem::size_of::<T>(),
            count: data.len(),
        };
        buffer.bind();
        let bytes: &[u8] = bytemuck::cast_slice(data);
        gl::call!(gl::BufferData(
            target,
            bytes.len() as gl::types::GLsizeiptr,
            bytes.as_ptr() as *const c_void,
            usage,
        ));
        buffer
    }

    pub fn bind(&self) {
        gl::call!(gl::BindBuffer(self.target, self.buffer));
    }

    pub fn get(&self) -> gl::types::GLuint {
        self.buffer
    }

    pub fn target(&self) -> gl::types::GLenum {
        self.target
    }

    pub fn usage(&self) -> gl::types::GLenum {
        self.usage
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        gl::call!(gl::DeleteBuffers(1, &self.buffer));
    }
}
