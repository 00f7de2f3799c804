use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{bail, Context};
use glam::Vec4;

use crate::assets;
use crate::image::Image;
use crate::renderer::gl;
use crate::renderer::material::Material;
use crate::renderer::mesh::{Mesh, Vertex};
use crate::renderer::program::Program;
use crate::renderer::texture::Texture;

mod gltf;
mod obj;

pub use gltf::parse_gltf;
pub use obj::parse_obj;

/// Geometry of one mesh of a model, before upload.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub material_index: Option<usize>,
}

/// Texture file paths (resolved against the model's directory) and specular
/// exponent of a model material.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MaterialData {
    pub diffuse_texture: Option<PathBuf>,
    pub specular_texture: Option<PathBuf>,
    pub shininess: Option<f32>,
}

#[derive(Clone, Debug, Default)]
pub struct ModelData {
    pub meshes: Vec<MeshData>,
    pub materials: Vec<MaterialData>,
}

/// A set of meshes loaded from a model file, each with its material.
pub struct Model {
    meshes: Vec<Mesh>,
}

impl Model {
    /// Loads a Wavefront OBJ (with its MTL files) or a glTF 2.0 model with
    /// external buffers, based on the file extension.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Model> {
        let path = assets::resolve(path);
        log::info!("loading model: {}", path.display());
        let extension = path
            .extension()
            .and_then(|extension| extension.to_str())
            .map(str::to_ascii_lowercase);
        let data = match extension.as_deref() {
            Some("obj") => obj::load_obj(&path),
            Some("gltf") => gltf::load_gltf(&path),
            _ => bail!("unsupported model format: {}", path.display()),
        }
        .with_context(|| {
            log::error!("failed to load model: {}", path.display());
            format!("failed to load model: {}", path.display())
        })?;
        let model = Model::create(&data)?;
        log::info!(
            "model: {} meshes, {} materials",
            data.meshes.len(),
            data.materials.len()
        );
        Ok(model)
    }

    /// Uploads already parsed model data. Textures referenced by more than
    /// one material are only loaded once.
    pub fn create(data: &ModelData) -> anyhow::Result<Model> {
        let mut textures = TextureCache::default();
        let mut materials = Vec::with_capacity(data.materials.len());
        for material in &data.materials {
            let diffuse = match &material.diffuse_texture {
                Some(path) => textures.load(path, Vec4::ONE)?,
                None => textures.single_color(Vec4::ONE)?,
            };
            let specular = match &material.specular_texture {
                Some(path) => textures.load(path, SPECULAR_FALLBACK)?,
                None => textures.single_color(SPECULAR_FALLBACK)?,
            };
            let mut gl_material = Material {
                diffuse: Some(diffuse),
                specular: Some(specular),
                ..Material::default()
            };
            if let Some(shininess) = material.shininess.filter(|&s| s > 0.0) {
                gl_material.shininess = shininess;
            }
            materials.push(Rc::new(gl_material));
        }

        let mut meshes = Vec::with_capacity(data.meshes.len());
        for mesh_data in &data.meshes {
            let mut mesh = Mesh::create(&mesh_data.vertices, &mesh_data.indices, gl::TRIANGLES)?;
            if let Some(material) = mesh_data
                .material_index
                .and_then(|index| materials.get(index))
            {
                mesh.set_material(material.clone());
            }
            meshes.push(mesh);
        }
        Ok(Model { meshes })
    }

    pub fn draw(&self, program: &Program) {
        for mesh in &self.meshes {
            mesh.draw(program);
        }
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }
}

const SPECULAR_FALLBACK: Vec4 = Vec4::new(0.2, 0.2, 0.2, 1.0);

/// Decodes a material texture. A file that can't be read is replaced with a
/// small single color image so the rest of the model still loads.
fn material_image(path: &Path, fallback: Vec4) -> anyhow::Result<Image> {
    match Image::load(path, true) {
        Ok(image) => Ok(image),
        Err(err) => {
            log::warn!("using a single color for texture {}: {err:#}", path.display());
            Image::create_single_color(4, 4, fallback)
        }
    }
}

#[derive(Default)]
struct TextureCache {
    files: HashMap<PathBuf, Rc<Texture>>,
    colors: HashMap<[u8; 4], Rc<Texture>>,
}

impl TextureCache {
    fn load(&mut self, path: &Path, fallback: Vec4) -> anyhow::Result<Rc<Texture>> {
        if let Some(texture) = self.files.get(path) {
            return Ok(texture.clone());
        }
        let texture = Rc::new(Texture::create_from_image(&material_image(path, fallback)?));
        self.files.insert(path.to_path_buf(), texture.clone());
        Ok(texture)
    }

    fn single_color(&mut self, color: Vec4) -> anyhow::Result<Rc<Texture>> {
        let image = Image::create_single_color(4, 4, color)?;
        let key: [u8; 4] = [0, 1, 2, 3].map(|i| image.data()[i]);
        if let Some(texture) = self.colors.get(&key) {
            return Ok(texture.clone());
        }
        let texture = Rc::new(Texture::create_from_image(&image));
        self.colors.insert(key, texture.clone());
        Ok(texture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_texture_falls_back_to_single_color() {
        let path = Path::new("image/no_such_texture.png");
        let image = material_image(path, SPECULAR_FALLBACK).unwrap();
        assert_eq!((4, 4), (image.width(), image.height()));
        assert_eq!(&[51, 51, 51, 255], image.pixel(3, 3));
    }
}
