use crate::renderer::gl;

/// A vertex array object: which buffers feed which attribute locations, and
/// how their bytes are laid out.
pub struct VertexLayout {
    vertex_array_object: gl::types::GLuint,
}

impl VertexLayout {
    /// Creates the vertex array object and binds it.
    pub fn create() -> VertexLayout {
        let mut vertex_array_object = 0;
        gl::call!(gl::GenVertexArrays(1, &mut vertex_array_object));
        let layout = VertexLayout {
            vertex_array_object,
        };
        layout.bind();
        layout
    }

    pub fn bind(&self) {
        gl::call!(gl::BindVertexArray(self.vertex_array_object));
    }

    pub fn get(&self) -> gl::types::GLuint {
        self.vertex_array_object
    }

    /// Points attribute `index` at the currently bound array buffer. The
    /// layout must be bound.
    pub fn set_attrib(
        &self,
        index: gl::types::GLuint,
        count: gl::types::GLint,
        attrib_type: gl::types::GLenum,
        normalized: bool,
        stride: usize,
        offset: usize,
    ) {
        gl::call!(gl::EnableVertexAttribArray(index));
        gl::call!(gl::VertexAttribPointer(
            index,
            count,
            attrib_type,
            if normalized { gl::TRUE } else { gl::FALSE },
            stride as gl::types::GLsizei,
            gl::offset_ptr(offset),
        ));
    }

    /// Makes attribute `index` advance once per `divisor` instances instead
    /// of once per vertex.
    pub fn set_attrib_divisor(&self, index: gl::types::GLuint, divisor: gl::types::GLuint) {
        gl::call!(gl::VertexAttribDivisor(index, divisor));
    }

    pub fn disable_attrib(&self, index: gl::types::GLuint) {
        gl::call!(gl::DisableVertexAttribArray(index));
    }
}

impl Drop for VertexLayout {
    fn drop(&mut self) {
        gl::call!(gl::DeleteVertexArrays(1, &self.vertex_array_object));
    }
}
