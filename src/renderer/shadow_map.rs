use anyhow::anyhow;
use glam::Vec4;

use crate::renderer::framebuffer::FrameBuffer;
use crate::renderer::gl;
use crate::renderer::texture::Texture;

/// A depth-only render target, rendered from the light's point of view.
pub struct ShadowMap {
    framebuffer: gl::types::GLuint,
    shadow_map: Texture,
}

impl ShadowMap {
    pub fn create(width: u32, height: u32) -> anyhow::Result<ShadowMap> {
        let shadow_map = Texture::create(width, height, gl::DEPTH_COMPONENT, gl::FLOAT);
        shadow_map.set_filter(gl::NEAREST, gl::NEAREST);
        shadow_map.set_wrap(gl::CLAMP_TO_BORDER, gl::CLAMP_TO_BORDER);
        // Everything outside the light's frustum is lit.
        shadow_map.set_border_color(Vec4::ONE);

        let mut framebuffer = 0;
        gl::call!(gl::GenFramebuffers(1, &mut framebuffer));
        let map = ShadowMap {
            framebuffer,
            shadow_map,
        };
        map.bind();
        gl::call!(gl::FramebufferTexture2D(
            gl::FRAMEBUFFER,
            gl::DEPTH_ATTACHMENT,
            gl::TEXTURE_2D,
            map.shadow_map.get(),
            0,
        ));
        gl::call!(gl::DrawBuffer(gl::NONE));
        gl::call!(gl::ReadBuffer(gl::NONE));

        let status = gl::call!(gl::CheckFramebufferStatus(gl::FRAMEBUFFER));
        FrameBuffer::bind_to_default();
        if status != gl::FRAMEBUFFER_COMPLETE {
            log::error!("failed to create shadow map framebuffer: status {status:#x}");
            return Err(anyhow!(
                "failed to create shadow map framebuffer: status {status:#x}"
            ));
        }
        Ok(map)
    }

    pub fn bind(&self) {
        gl::call!(gl::BindFramebuffer(gl::FRAMEBUFFER, self.framebuffer));
    }

    pub fn get(&self) -> gl::types::GLuint {
        self.framebuffer
    }

    pub fn shadow_map(&self) -> &Texture {
        &self.shadow_map
    }
}

impl Drop for ShadowMap {
    fn drop(&mut self) {
        gl::call!(gl::DeleteFramebuffers(1, &self.framebuffer));
    }
}
