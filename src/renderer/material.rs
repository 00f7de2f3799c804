use std::rc::Rc;

use crate::renderer::gl;
use crate::renderer::program::Program;
use crate::renderer::texture::Texture;

/// Diffuse and specular maps plus the specular exponent, bound to the
/// `material` uniform struct of the lighting shaders.
pub struct Material {
    pub diffuse: Option<Rc<Texture>>,
    pub specular: Option<Rc<Texture>>,
    pub shininess: f32,
}

impl Default for Material {
    fn default() -> Material {
        Material {
            diffuse: None,
            specular: None,
            shininess: 32.0,
        }
    }
}

impl Material {
    /// Binds the maps to consecutive texture units starting at 0 and points
    /// the sampler uniforms at them. The program must be in use.
    pub fn set_to_program(&self, program: &Program) {
        let mut texture_unit: i32 = 0;
        for (name, texture) in [
            ("material.diffuse", &self.diffuse),
            ("material.specular", &self.specular),
        ] {
            if let Some(texture) = texture {
                gl::call!(gl::ActiveTexture(gl::TEXTURE0 + texture_unit as u32));
                texture.bind();
                program.set_uniform(name, texture_unit);
                texture_unit += 1;
            }
        }
        gl::call!(gl::ActiveTexture(gl::TEXTURE0));
        program.set_uniform("material.shininess", self.shininess);
    }
}
