use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::Context;
use glam::{Vec2, Vec3};

use crate::renderer::mesh::Vertex;
use crate::renderer::model::{MaterialData, MeshData, ModelData};

pub fn load_obj(path: &Path) -> anyhow::Result<ModelData> {
    let directory = path.parent().unwrap_or_else(|| Path::new("")).to_path_buf();
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut reader = BufReader::new(file);
    parse_obj(&mut reader, &directory, |mtl_path| {
        tobj::load_mtl(directory.join(mtl_path))
    })
}

/// Parses an OBJ file, triangulated and with one index per unique
/// position/texcoord/normal combination. Texture paths in the materials
/// are made relative to `texture_directory`.
pub fn parse_obj<B, ML>(
    reader: &mut B,
    texture_directory: &Path,
    material_loader: ML,
) -> anyhow::Result<ModelData>
where
    B: BufRead,
    ML: Fn(&Path) -> tobj::MTLLoadResult,
{
    let (models, materials) = tobj::load_obj_buf(
        reader,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
        material_loader,
    )?;
    let materials = materials.unwrap_or_else(|err| {
        log::warn!("model materials could not be loaded: {err}");
        Vec::new()
    });

    let materials = materials
        .iter()
        .map(|material| MaterialData {
            diffuse_texture: material
                .diffuse_texture
                .as_deref()
                .map(|texture| texture_path(texture_directory, texture)),
            specular_texture: material
                .specular_texture
                .as_deref()
                .map(|texture| texture_path(texture_directory, texture)),
            shininess: material.shininess,
        })
        .collect();

    let meshes = models
        .iter()
        .map(|model| {
            let mesh = &model.mesh;
            let mut vertices = (0..mesh.positions.len() / 3)
                .map(|i| Vertex {
                    position: Vec3::from_slice(&mesh.positions[i * 3..i * 3 + 3]),
                    normal: mesh
                        .normals
                        .get(i * 3..i * 3 + 3)
                        .map_or(Vec3::ZERO, Vec3::from_slice),
                    tex_coord: mesh
                        .texcoords
                        .get(i * 2..i * 2 + 2)
                        .map_or(Vec2::ZERO, Vec2::from_slice),
                    tangent: Vec3::ZERO,
                })
                .collect::<Vec<_>>();
            if mesh.normals.is_empty() {
                compute_normals(&mut vertices, &mesh.indices);
            }
            MeshData {
                vertices,
                indices: mesh.indices.clone(),
                material_index: mesh.material_id,
            }
        })
        .collect();

    Ok(ModelData { meshes, materials })
}

/// Exporters on Windows write texture paths with backslashes.
fn texture_path(directory: &Path, texture: &str) -> PathBuf {
    directory.join(texture.trim().replace('\\', "/"))
}

/// Smooth normals for meshes that come without them: every face normal is
/// added to its corners, weighted by the face area.
fn compute_normals(vertices: &mut [Vertex], indices: &[u32]) {
    for triangle in indices.chunks_exact(3) {
        let [a, b, c] = [0, 1, 2].map(|i| triangle[i] as usize);
        let face_normal = (vertices[b].position - vertices[a].position)
            .cross(vertices[c].position - vertices[a].position);
        for i in [a, b, c] {
            vertices[i].normal += face_normal;
        }
    }
    for vertex in vertices {
        vertex.normal = vertex.normal.normalize_or_zero();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const QUAD_OBJ: &str = "mtllib quad.mtl
o quad
v -1 -1 0
v 1 -1 0
v 1 1 0
v -1 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vn 0 0 1
usemtl brick
f 1/1/1 2/2/1 3/3/1 4/4/1
";

    const QUAD_MTL: &str = "newmtl brick
Ns 64
map_Kd textures\\brick.png
map_Ks brick_spec.png
";

    fn quad_mtl(_: &Path) -> tobj::MTLLoadResult {
        tobj::load_mtl_buf(&mut BufReader::new(Cursor::new(QUAD_MTL)))
    }

    #[test]
    fn quad_is_triangulated_with_shared_vertices() {
        let mut reader = BufReader::new(Cursor::new(QUAD_OBJ));
        let model = parse_obj(&mut reader, Path::new("model/quad"), quad_mtl).unwrap();
        assert_eq!(1, model.meshes.len());
        let mesh = &model.meshes[0];
        assert_eq!(4, mesh.vertices.len());
        assert_eq!(6, mesh.indices.len());
        assert_eq!(Some(0), mesh.material_index);
        assert!(mesh.vertices.iter().all(|v| v.normal == Vec3::Z));
        let top_right = mesh
            .vertices
            .iter()
            .find(|v| v.position == Vec3::new(1.0, 1.0, 0.0))
            .unwrap();
        assert_eq!(Vec2::ONE, top_right.tex_coord);
    }

    #[test]
    fn material_textures_are_relative_to_the_model() {
        let mut reader = BufReader::new(Cursor::new(QUAD_OBJ));
        let model = parse_obj(&mut reader, Path::new("model/quad"), quad_mtl).unwrap();
        assert_eq!(
            vec![MaterialData {
                diffuse_texture: Some(PathBuf::from("model/quad/textures/brick.png")),
                specular_texture: Some(PathBuf::from("model/quad/brick_spec.png")),
                shininess: Some(64.0),
            }],
            model.materials
        );
    }

    #[test]
    fn missing_materials_do_not_fail_the_load() {
        let mut reader = BufReader::new(Cursor::new(QUAD_OBJ));
        let model = parse_obj(&mut reader, Path::new(""), |_| {
            Err(tobj::LoadError::OpenFileFailed)
        })
        .unwrap();
        assert!(model.materials.is_empty());
        assert_eq!(6, model.meshes[0].indices.len());
    }

    #[test]
    fn normals_are_generated_when_missing() {
        let obj = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        let mut reader = BufReader::new(Cursor::new(obj));
        let model = parse_obj(&mut reader, Path::new(""), |_| {
            Err(tobj::LoadError::OpenFileFailed)
        })
        .unwrap();
        assert!(model.meshes[0].vertices.iter().all(|v| v.normal == Vec3::Z));
    }
}
