use std::ffi::c_void;
use std::ptr;

use glam::Vec4;

use crate::image::Image;
use crate::renderer::gl;

/// A 2D texture.
pub struct Texture {
    texture: gl::types::GLuint,
    width: u32,
    height: u32,
    format: gl::types::GLenum,
    pixel_type: gl::types::GLenum,
}

impl Texture {
    /// Allocates uninitialized storage, e.g. for use as a render target.
    pub fn create(
        width: u32,
        height: u32,
        format: gl::types::GLenum,
        pixel_type: gl::types::GLenum,
    ) -> Texture {
        let mut texture = Texture::generate();
        texture.bind();
        texture.set_filter(gl::LINEAR, gl::LINEAR);
        texture.set_wrap(gl::CLAMP_TO_EDGE, gl::CLAMP_TO_EDGE);
        texture.set_texture_format(width, height, format, pixel_type, ptr::null());
        texture
    }

    /// Uploads an image, picking the texture format from its channel count,
    /// and generates the mipmap chain.
    pub fn create_from_image(image: &Image) -> Texture {
        let mut texture = Texture::generate();
        texture.bind();
        texture.set_filter(gl::LINEAR_MIPMAP_LINEAR, gl::LINEAR);
        texture.set_wrap(gl::CLAMP_TO_EDGE, gl::CLAMP_TO_EDGE);
        gl::call!(gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1));
        texture.set_texture_format(
            image.width(),
            image.height(),
            format_for_channel_count(image.channel_count()),
            gl::UNSIGNED_BYTE,
            image.data().as_ptr() as *const c_void,
        );
        gl::call!(gl::GenerateMipmap(gl::TEXTURE_2D));
        texture
    }

    fn generate() -> Texture {
        let mut texture = 0;
        gl::call!(gl::GenTextures(1, &mut texture));
        Texture {
            texture,
            width: 0,
            height: 0,
            format: gl::RGBA,
            pixel_type: gl::UNSIGNED_BYTE,
        }
    }

    fn set_texture_format(
        &mut self,
        width: u32,
        height: u32,
        format: gl::types::GLenum,
        pixel_type: gl::types::GLenum,
        pixels: *const c_void,
    ) {
        self.width = width;
        self.height = height;
        self.format = format;
        self.pixel_type = pixel_type;
        gl::call!(gl::TexImage2D(
            gl::TEXTURE_2D,
            0,
            format as gl::types::GLint,
            width as gl::types::GLsizei,
            height as gl::types::GLsizei,
            0,
            format,
            pixel_type,
            pixels,
        ));
    }

    pub fn bind(&self) {
        gl::call!(gl::BindTexture(gl::TEXTURE_2D, self.texture));
    }

    /// Sets the minification and magnification filters. The texture must be
    /// bound.
    pub fn set_filter(&self, min_filter: gl::types::GLenum, mag_filter: gl::types::GLenum) {
        gl::call!(gl::TexParameteri(
            gl::TEXTURE_2D,
            gl::TEXTURE_MIN_FILTER,
            min_filter as gl::types::GLint
        ));
        gl::call!(gl::TexParameteri(
            gl::TEXTURE_2D,
            gl::TEXTURE_MAG_FILTER,
            mag_filter as gl::types::GLint
        ));
    }

    /// Sets the S and T wrap modes. The texture must be bound.
    pub fn set_wrap(&self, s_wrap: gl::types::GLenum, t_wrap: gl::types::GLenum) {
        gl::call!(gl::TexParameteri(
            gl::TEXTURE_2D,
            gl::TEXTURE_WRAP_S,
            s_wrap as gl::types::GLint
        ));
        gl::call!(gl::TexParameteri(
            gl::TEXTURE_2D,
            gl::TEXTURE_WRAP_T,
            t_wrap as gl::types::GLint
        ));
    }

    /// Sets the color sampled outside CLAMP_TO_BORDER textures. The texture
    /// must be bound.
    pub fn set_border_color(&self, color: Vec4) {
        gl::call!(gl::TexParameterfv(
            gl::TEXTURE_2D,
            gl::TEXTURE_BORDER_COLOR,
            color.to_array().as_ptr()
        ));
    }

    pub fn get(&self) -> gl::types::GLuint {
        self.texture
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> gl::types::GLenum {
        self.format
    }

    pub fn pixel_type(&self) -> gl::types::GLenum {
        self.pixel_type
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        gl::call!(gl::DeleteTextures(1, &self.texture));
    }
}

pub fn format_for_channel_count(channel_count: u32) -> gl::types::GLenum {
    match channel_count {
        1 => gl::RED,
        2 => gl::RG,
        3 => gl::RGB,
        _ => gl::RGBA,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_follows_channel_count() {
        assert_eq!(gl::RED, format_for_channel_count(1));
        assert_eq!(gl::RG, format_for_channel_count(2));
        assert_eq!(gl::RGB, format_for_channel_count(3));
        assert_eq!(gl::RGBA, format_for_channel_count(4));
    }
}
