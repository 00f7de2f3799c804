use std::ffi::c_void;

use anyhow::bail;

use crate::image::Image;
use crate::renderer::gl;
use crate::renderer::texture::format_for_channel_count;

/// A cube map texture, sampled with a direction vector.
pub struct CubeTexture {
    texture: gl::types::GLuint,
}

impl CubeTexture {
    /// Builds the cube map from six same-sized images, in the order
    /// right (+X), left (-X), top (+Y), bottom (-Y), front (+Z), back (-Z).
    pub fn create_from_images(images: [&Image; 6]) -> anyhow::Result<CubeTexture> {
        let (width, height) = (images[0].width(), images[0].height());
        if let Some(face) = images
            .iter()
            .position(|image| image.width() != width || image.height() != height)
        {
            bail!(
                "cube map face {face} is {}x{}, expected {width}x{height}",
                images[face].width(),
                images[face].height(),
            );
        }

        let mut texture = 0;
        gl::call!(gl::GenTextures(1, &mut texture));
        let cube_texture = CubeTexture { texture };
        cube_texture.bind();
        for (parameter, value) in [
            (gl::TEXTURE_MIN_FILTER, gl::LINEAR),
            (gl::TEXTURE_MAG_FILTER, gl::LINEAR),
            (gl::TEXTURE_WRAP_S, gl::CLAMP_TO_EDGE),
            (gl::TEXTURE_WRAP_T, gl::CLAMP_TO_EDGE),
            (gl::TEXTURE_WRAP_R, gl::CLAMP_TO_EDGE),
        ] {
            gl::call!(gl::TexParameteri(
                gl::TEXTURE_CUBE_MAP,
                parameter,
                value as gl::types::GLint
            ));
        }

        gl::call!(gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1));
        for (i, image) in images.iter().enumerate() {
            gl::call!(gl::TexImage2D(
                gl::TEXTURE_CUBE_MAP_POSITIVE_X + i as gl::types::GLenum,
                0,
                gl::RGB as gl::types::GLint,
                width as gl::types::GLsizei,
                height as gl::types::GLsizei,
                0,
                format_for_channel_count(image.channel_count()),
                gl::UNSIGNED_BYTE,
                image.data().as_ptr() as *const c_void,
            ));
        }
        Ok(cube_texture)
    }

    pub fn bind(&self) {
        gl::call!(gl::BindTexture(gl::TEXTURE_CUBE_MAP, self.texture));
    }

    pub fn get(&self) -> gl::types::GLuint {
        self.texture
    }
}

impl Drop for CubeTexture {
    fn drop(&mut self) {
        gl::call!(gl::DeleteTextures(1, &self.texture));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatched_faces_are_rejected() {
        let face = Image::create(4, 4, 3).unwrap();
        let wide = Image::create(8, 4, 3).unwrap();
        let result = CubeTexture::create_from_images([&face, &face, &face, &wide, &face, &face]);
        let message = result.err().map(|err| err.to_string()).unwrap_or_default();
        assert_eq!("cube map face 3 is 8x4, expected 4x4", message);
    }
}
