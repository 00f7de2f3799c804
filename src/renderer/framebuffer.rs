use anyhow::anyhow;

use crate::renderer::gl;
use crate::renderer::texture::Texture;

/// An off-screen render target: a color texture plus a combined
/// depth/stencil renderbuffer.
pub struct FrameBuffer {
    framebuffer: gl::types::GLuint,
    depth_stencil_buffer: gl::types::GLuint,
    color_attachment: Texture,
}

impl FrameBuffer {
    pub fn create(color_attachment: Texture) -> anyhow::Result<FrameBuffer> {
        let mut framebuffer = 0;
        gl::call!(gl::GenFramebuffers(1, &mut framebuffer));
        gl::call!(gl::BindFramebuffer(gl::FRAMEBUFFER, framebuffer));
        gl::call!(gl::FramebufferTexture2D(
            gl::FRAMEBUFFER,
            gl::COLOR_ATTACHMENT0,
            gl::TEXTURE_2D,
            color_attachment.get(),
            0,
        ));

        let mut depth_stencil_buffer = 0;
        gl::call!(gl::GenRenderbuffers(1, &mut depth_stencil_buffer));
        let frame_buffer = FrameBuffer {
            framebuffer,
            depth_stencil_buffer,
            color_attachment,
        };
        gl::call!(gl::BindRenderbuffer(gl::RENDERBUFFER, depth_stencil_buffer));
        gl::call!(gl::RenderbufferStorage(
            gl::RENDERBUFFER,
            gl::DEPTH24_STENCIL8,
            frame_buffer.color_attachment.width() as gl::types::GLsizei,
            frame_buffer.color_attachment.height() as gl::types::GLsizei,
        ));
        gl::call!(gl::BindRenderbuffer(gl::RENDERBUFFER, 0));
        gl::call!(gl::FramebufferRenderbuffer(
            gl::FRAMEBUFFER,
            gl::DEPTH_STENCIL_ATTACHMENT,
            gl::RENDERBUFFER,
            depth_stencil_buffer,
        ));

        let status = gl::call!(gl::CheckFramebufferStatus(gl::FRAMEBUFFER));
        FrameBuffer::bind_to_default();
        if status != gl::FRAMEBUFFER_COMPLETE {
            log::error!("failed to create framebuffer: status {status:#x}");
            return Err(anyhow!("failed to create framebuffer: status {status:#x}"));
        }
        Ok(frame_buffer)
    }

    pub fn bind_to_default() {
        gl::call!(gl::BindFramebuffer(gl::FRAMEBUFFER, 0));
    }

    pub fn bind(&self) {
        gl::call!(gl::BindFramebuffer(gl::FRAMEBUFFER, self.framebuffer));
    }

    pub fn get(&self) -> gl::types::GLuint {
        self.framebuffer
    }

    pub fn color_attachment(&self) -> &Texture {
        &self.color_attachment
    }
}

impl Drop for FrameBuffer {
    fn drop(&mut self) {
        gl::call!(gl::DeleteRenderbuffers(1, &self.depth_stencil_buffer));
        gl::call!(gl::DeleteFramebuffers(1, &self.framebuffer));
    }
}
