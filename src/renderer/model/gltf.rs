use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, Context};
use glam::{Mat3, Mat4, Quat, Vec2, Vec3};
use tinyjson::JsonValue;

use crate::renderer::mesh::Vertex;
use crate::renderer::model::{MaterialData, MeshData, ModelData};

const COMPONENT_TYPE_UNSIGNED_BYTE: usize = 5121;
const COMPONENT_TYPE_UNSIGNED_SHORT: usize = 5123;
const COMPONENT_TYPE_UNSIGNED_INT: usize = 5125;
const COMPONENT_TYPE_FLOAT: usize = 5126;
const MODE_TRIANGLES: usize = 4;

pub fn load_gltf(path: &Path) -> anyhow::Result<ModelData> {
    let directory = path.parent().unwrap_or_else(|| Path::new(""));
    let gltf = fs::read_to_string(path)?;
    parse_gltf(&gltf, directory, |uri| {
        let buffer_path = directory.join(uri);
        fs::read(&buffer_path).with_context(|| format!("failed to read {}", buffer_path.display()))
    })
}

/// Parses a glTF 2.0 document. Buffers are fetched by uri with
/// `load_buffer`; image uris are made relative to `texture_directory`.
///
/// The default scene's node hierarchy is flattened: every triangle primitive
/// becomes its own mesh, with the node's world transform applied to the
/// positions and normals.
pub fn parse_gltf(
    gltf: &str,
    texture_directory: &Path,
    load_buffer: impl Fn(&str) -> anyhow::Result<Vec<u8>>,
) -> anyhow::Result<ModelData> {
    let gltf: JsonValue = gltf.parse().map_err(|err| anyhow!("invalid gltf json: {err}"))?;
    let gltf = take_object(&gltf)?;

    let mut buffers = Vec::new();
    for buffer in take_array_field(gltf, "buffers")? {
        let buffer = take_object(buffer)?;
        let uri = buffer
            .get("uri")
            .and_then(|uri| uri.get::<String>())
            .ok_or_else(|| anyhow!("only gltf buffers with a uri are supported"))?;
        let data = load_buffer(uri)?;
        let byte_length = take_usize(field(buffer, "byteLength")?)?;
        if data.len() < byte_length {
            bail!("buffer \"{uri}\" is {} bytes, expected {byte_length}", data.len());
        }
        buffers.push(data);
    }

    let accessors = Accessors {
        accessors: take_array_field(gltf, "accessors")?,
        buffer_views: take_array_field(gltf, "bufferViews")?,
        buffers: &buffers,
    };

    let images = optional_array_field(gltf, "images")?;
    let textures = optional_array_field(gltf, "textures")?;
    let texture_path = |texture_info: &JsonValue| -> anyhow::Result<std::path::PathBuf> {
        let texture_index = take_usize(field(take_object(texture_info)?, "index")?)?;
        let texture = take_object(index(textures, texture_index)?)?;
        let image = take_object(index(images, take_usize(field(texture, "source")?)?)?)?;
        let uri = field(image, "uri")?
            .get::<String>()
            .ok_or_else(|| anyhow!("image uri is not a string"))?;
        Ok(texture_directory.join(uri))
    };
    let mut materials = Vec::new();
    for material in optional_array_field(gltf, "materials")? {
        let material = take_object(material)?;
        let diffuse_texture = match material
            .get("pbrMetallicRoughness")
            .and_then(|pbr| pbr.get::<HashMap<_, _>>())
            .and_then(|pbr| pbr.get("baseColorTexture"))
        {
            Some(texture_info) => Some(texture_path(texture_info)?),
            None => None,
        };
        materials.push(MaterialData {
            diffuse_texture,
            specular_texture: None,
            shininess: None,
        });
    }

    let nodes = take_array_field(gltf, "nodes")?;
    let meshes_json = take_array_field(gltf, "meshes")?;
    let scenes = take_array_field(gltf, "scenes")?;
    let scene = gltf.get("scene").map(take_usize).transpose()?.unwrap_or(0);
    let scene = take_object(index(scenes, scene)?)?;

    let mut node_queue = Vec::new();
    for node_index in optional_array_field(scene, "nodes")? {
        node_queue.push((Mat4::IDENTITY, take_usize(node_index)?));
    }
    let mut meshes = Vec::new();
    // Nodes form disjoint trees, so reaching one twice means a cycle.
    let mut visited = vec![false; nodes.len()];
    while let Some((parent_transform, node_index)) = node_queue.pop() {
        let node = take_object(index(nodes, node_index)?)?;
        if std::mem::replace(&mut visited[node_index], true) {
            bail!("gltf node {node_index} is reached more than once");
        }
        let transform = parent_transform * node_transform(node)?;
        if let Some(mesh_index) = node.get("mesh") {
            let mesh = take_object(index(meshes_json, take_usize(mesh_index)?)?)?;
            for primitive in take_array_field(mesh, "primitives")? {
                let primitive = take_object(primitive)?;
                let mode = primitive.get("mode").map(take_usize).transpose()?;
                if mode.unwrap_or(MODE_TRIANGLES) != MODE_TRIANGLES {
                    log::warn!("skipping gltf primitive with non-triangle mode {mode:?}");
                    continue;
                }
                meshes.push(read_primitive(primitive, &accessors, transform)?);
            }
        }
        for child in optional_array_field(node, "children")? {
            node_queue.push((transform, take_usize(child)?));
        }
    }

    Ok(ModelData { meshes, materials })
}

fn node_transform(node: &HashMap<String, JsonValue>) -> anyhow::Result<Mat4> {
    if let Some(matrix_values) = node.get("matrix") {
        let values = take_floats(matrix_values)?;
        if values.len() != 16 {
            bail!("node matrix has {} values, expected 16", values.len());
        }
        return Ok(Mat4::from_cols_slice(&values));
    }
    let translation = match node.get("translation") {
        Some(value) => take_vec3(value)?,
        None => Vec3::ZERO,
    };
    let scale = match node.get("scale") {
        Some(value) => take_vec3(value)?,
        None => Vec3::ONE,
    };
    let rotation = match node.get("rotation") {
        Some(value) => take_quat(value)?,
        None => Quat::IDENTITY,
    };
    Ok(Mat4::from_scale_rotation_translation(
        scale,
        rotation,
        translation,
    ))
}

fn read_primitive(
    primitive: &HashMap<String, JsonValue>,
    accessors: &Accessors,
    transform: Mat4,
) -> anyhow::Result<MeshData> {
    let attributes = take_object(field(primitive, "attributes")?)?;
    let positions = accessors.read_floats(take_usize(field(attributes, "POSITION")?)?, 3)?;
    let vertex_count = positions.len() / 3;
    let normals = match attributes.get("NORMAL") {
        Some(accessor) => accessors.read_floats(take_usize(accessor)?, 3)?,
        None => Vec::new(),
    };
    let tex_coords = match attributes.get("TEXCOORD_0") {
        Some(accessor) => accessors.read_floats(take_usize(accessor)?, 2)?,
        None => Vec::new(),
    };
    let mut indices = match primitive.get("indices") {
        Some(accessor) => accessors.read_indices(take_usize(accessor)?)?,
        None => (0..vertex_count as u32).collect(),
    };
    // A mirroring transform turns front faces around.
    if transform.determinant() < 0.0 {
        for triangle in indices.chunks_exact_mut(3) {
            triangle.swap(1, 2);
        }
    }

    let normal_matrix = Mat3::from_mat4(transform).inverse().transpose();
    let vertices = (0..vertex_count)
        .map(|i| {
            let normal = normals
                .get(i * 3..i * 3 + 3)
                .map_or(Vec3::ZERO, Vec3::from_slice);
            // glTF texture coordinates start from the top-left corner, and
            // images are uploaded bottom row first.
            let tex_coord = tex_coords
                .get(i * 2..i * 2 + 2)
                .map_or(Vec2::ZERO, |uv| Vec2::new(uv[0], 1.0 - uv[1]));
            Vertex {
                position: transform.transform_point3(Vec3::from_slice(&positions[i * 3..i * 3 + 3])),
                normal: (normal_matrix * normal).normalize_or_zero(),
                tex_coord,
                tangent: Vec3::ZERO,
            }
        })
        .collect();

    Ok(MeshData {
        vertices,
        indices,
        material_index: primitive.get("material").map(take_usize).transpose()?,
    })
}

struct Accessors<'a> {
    accessors: &'a Vec<JsonValue>,
    buffer_views: &'a Vec<JsonValue>,
    buffers: &'a [Vec<u8>],
}

impl Accessors<'_> {
    /// Returns the bytes of each element of the accessor, along with its
    /// component type and component count.
    fn elements(&self, accessor: usize) -> anyhow::Result<(Vec<&[u8]>, usize, usize)> {
        let accessor = take_object(index(self.accessors, accessor)?)?;
        let buffer_view = take_object(index(
            self.buffer_views,
            take_usize(field(accessor, "bufferView")?)?,
        )?)?;
        let buffer = self
            .buffers
            .get(take_usize(field(buffer_view, "buffer")?)?)
            .ok_or_else(|| anyhow!("buffer view references a missing buffer"))?;
        let byte_offset = optional_usize(accessor, "byteOffset")?
            + optional_usize(buffer_view, "byteOffset")?;
        let count = take_usize(field(accessor, "count")?)?;
        let component_type = take_usize(field(accessor, "componentType")?)?;
        let component_count = match field(accessor, "type")?.get::<String>().map(String::as_str) {
            Some("SCALAR") => 1,
            Some("VEC2") => 2,
            Some("VEC3") => 3,
            Some("VEC4") => 4,
            type_ => bail!("unsupported accessor type {type_:?}"),
        };
        let component_size = match component_type {
            COMPONENT_TYPE_UNSIGNED_BYTE => 1,
            COMPONENT_TYPE_UNSIGNED_SHORT => 2,
            COMPONENT_TYPE_UNSIGNED_INT | COMPONENT_TYPE_FLOAT => 4,
            _ => bail!("unsupported accessor component type {component_type}"),
        };
        let element_size = component_size * component_count;
        let stride = match buffer_view.get("byteStride") {
            Some(stride) => take_usize(stride)?,
            None => element_size,
        };

        let mut elements = Vec::with_capacity(count);
        for i in 0..count {
            let start = byte_offset + i * stride;
            let element = buffer
                .get(start..start + element_size)
                .ok_or_else(|| anyhow!("accessor reads past the end of its buffer"))?;
            elements.push(element);
        }
        Ok((elements, component_type, component_count))
    }

    fn read_floats(&self, accessor: usize, expected_components: usize) -> anyhow::Result<Vec<f32>> {
        let (elements, component_type, component_count) = self.elements(accessor)?;
        if component_type != COMPONENT_TYPE_FLOAT || component_count != expected_components {
            bail!("expected a float accessor with {expected_components} components");
        }
        Ok(elements
            .iter()
            .flat_map(|element| element.chunks_exact(4))
            .map(|bytes| f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
            .collect())
    }

    fn read_indices(&self, accessor: usize) -> anyhow::Result<Vec<u32>> {
        let (elements, component_type, component_count) = self.elements(accessor)?;
        if component_count != 1 {
            bail!("index accessors must be scalars");
        }
        Ok(elements
            .iter()
            .map(|bytes| match component_type {
                COMPONENT_TYPE_UNSIGNED_BYTE => bytes[0] as u32,
                COMPONENT_TYPE_UNSIGNED_SHORT => u16::from_le_bytes([bytes[0], bytes[1]]) as u32,
                _ => u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            })
            .collect())
    }
}

fn take_object(json_value: &JsonValue) -> anyhow::Result<&HashMap<String, JsonValue>> {
    json_value
        .get::<HashMap<_, _>>()
        .ok_or_else(|| anyhow!("expected a json object"))
}

fn field<'a>(object: &'a HashMap<String, JsonValue>, name: &str) -> anyhow::Result<&'a JsonValue> {
    object
        .get(name)
        .ok_or_else(|| anyhow!("missing gltf field \"{name}\""))
}

fn index(array: &[JsonValue], i: usize) -> anyhow::Result<&JsonValue> {
    array
        .get(i)
        .ok_or_else(|| anyhow!("gltf index {i} is out of bounds"))
}

fn take_array_field<'a>(
    object: &'a HashMap<String, JsonValue>,
    name: &str,
) -> anyhow::Result<&'a Vec<JsonValue>> {
    field(object, name)?
        .get::<Vec<_>>()
        .ok_or_else(|| anyhow!("gltf field \"{name}\" is not an array"))
}

/// Like [`take_array_field`], but a missing field is an empty array.
fn optional_array_field<'a>(
    object: &'a HashMap<String, JsonValue>,
    name: &str,
) -> anyhow::Result<&'a [JsonValue]> {
    match object.get(name) {
        Some(_) => take_array_field(object, name).map(Vec::as_slice),
        None => Ok(&[]),
    }
}

fn optional_usize(object: &HashMap<String, JsonValue>, name: &str) -> anyhow::Result<usize> {
    Ok(object.get(name).map(take_usize).transpose()?.unwrap_or(0))
}

/// Return usize if JsonValue is a number.
fn take_usize(json_value: &JsonValue) -> anyhow::Result<usize> {
    let i: &f64 = json_value
        .get()
        .ok_or_else(|| anyhow!("expected a number"))?;
    Ok(*i as usize)
}

fn take_floats(json_value: &JsonValue) -> anyhow::Result<Vec<f32>> {
    let values: &Vec<JsonValue> = json_value
        .get()
        .ok_or_else(|| anyhow!("expected an array of numbers"))?;
    values
        .iter()
        .map(|value| {
            value
                .get::<f64>()
                .map(|&f| f as f32)
                .ok_or_else(|| anyhow!("expected a number"))
        })
        .collect()
}

/// Return Vec3 if JsonValue is an array of 3 numbers.
fn take_vec3(json_value: &JsonValue) -> anyhow::Result<Vec3> {
    let values = take_floats(json_value)?;
    match values[..] {
        [x, y, z] => Ok(Vec3::new(x, y, z)),
        _ => bail!("expected 3 numbers"),
    }
}

/// Return Quat if JsonValue is an array of 4 numbers.
fn take_quat(json_value: &JsonValue) -> anyhow::Result<Quat> {
    let values = take_floats(json_value)?;
    match values[..] {
        [x, y, z, w] => Ok(Quat::from_xyzw(x, y, z, w)),
        _ => bail!("expected 4 numbers"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    /// One triangle, referenced by a parent node (translated) and its child
    /// (scaled), so the triangle ends up in the model twice.
    const TRIANGLE_GLTF: &str = r#"{
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [{ "nodes": [0] }],
        "nodes": [
            { "mesh": 0, "translation": [0, 2, 0], "children": [1] },
            { "mesh": 0, "scale": [2, 2, 2] }
        ],
        "meshes": [{ "primitives": [{
            "attributes": { "POSITION": 0, "TEXCOORD_0": 1 },
            "indices": 2,
            "material": 0
        }] }],
        "materials": [{ "pbrMetallicRoughness": { "baseColorTexture": { "index": 0 } } }],
        "textures": [{ "source": 0 }],
        "images": [{ "uri": "base.png" }],
        "buffers": [{ "uri": "triangle.bin", "byteLength": 66 }],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 36 },
            { "buffer": 0, "byteOffset": 36, "byteLength": 24 },
            { "buffer": 0, "byteOffset": 60, "byteLength": 6 }
        ],
        "accessors": [
            { "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3" },
            { "bufferView": 1, "componentType": 5126, "count": 3, "type": "VEC2" },
            { "bufferView": 2, "componentType": 5123, "count": 3, "type": "SCALAR" }
        ]
    }"#;

    fn triangle_bin() -> Vec<u8> {
        let positions: [f32; 9] = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let tex_coords: [f32; 6] = [0.0, 1.0, 1.0, 1.0, 0.0, 0.0];
        let indices: [u16; 3] = [0, 1, 2];
        let mut bin = Vec::new();
        bin.extend_from_slice(bytemuck::cast_slice(&positions));
        bin.extend_from_slice(bytemuck::cast_slice(&tex_coords));
        bin.extend_from_slice(bytemuck::cast_slice(&indices));
        bin
    }

    fn parse_triangle() -> ModelData {
        parse_gltf(TRIANGLE_GLTF, Path::new("model/tri"), |uri| {
            assert_eq!("triangle.bin", uri);
            Ok(triangle_bin())
        })
        .unwrap()
    }

    #[test]
    fn node_hierarchy_is_flattened_with_world_transforms() {
        let model = parse_triangle();
        assert_eq!(2, model.meshes.len());
        let mut tops = model
            .meshes
            .iter()
            .map(|mesh| mesh.vertices[2].position)
            .collect::<Vec<_>>();
        tops.sort_by(|a, b| a.y.total_cmp(&b.y));
        // Parent: translated by 2. Child: scaled by 2, then translated by 2.
        assert_eq!(Vec3::new(0.0, 3.0, 0.0), tops[0]);
        assert_eq!(Vec3::new(0.0, 4.0, 0.0), tops[1]);
        for mesh in &model.meshes {
            assert_eq!(vec![0, 1, 2], mesh.indices);
            assert_eq!(Some(0), mesh.material_index);
        }
    }

    #[test]
    fn texture_coordinates_are_flipped() {
        let model = parse_triangle();
        let vertices = &model.meshes[0].vertices;
        assert_eq!(Vec2::new(0.0, 0.0), vertices[0].tex_coord);
        assert_eq!(Vec2::new(1.0, 0.0), vertices[1].tex_coord);
        assert_eq!(Vec2::new(0.0, 1.0), vertices[2].tex_coord);
    }

    #[test]
    fn base_color_texture_becomes_diffuse() {
        let model = parse_triangle();
        assert_eq!(
            Some(PathBuf::from("model/tri/base.png")),
            model.materials[0].diffuse_texture
        );
    }

    #[test]
    fn short_buffers_are_rejected() {
        let result = parse_gltf(TRIANGLE_GLTF, Path::new(""), |_| Ok(vec![0; 10]));
        assert!(result.is_err());
    }

    #[test]
    fn node_matrix_overrides_trs() {
        let json: JsonValue = r#"{ "matrix": [1,0,0,0, 0,1,0,0, 0,0,1,0, 5,6,7,1], "translation": [1,1,1] }"#
            .parse()
            .unwrap();
        let transform = node_transform(take_object(&json).unwrap()).unwrap();
        assert_eq!(Vec3::new(5.0, 6.0, 7.0), transform.transform_point3(Vec3::ZERO));
    }

    #[test]
    fn node_cycles_are_rejected() {
        let gltf = TRIANGLE_GLTF.replace(
            r#"{ "mesh": 0, "scale": [2, 2, 2] }"#,
            r#"{ "mesh": 0, "scale": [2, 2, 2], "children": [0] }"#,
        );
        assert_ne!(TRIANGLE_GLTF, gltf);
        let result = parse_gltf(&gltf, Path::new(""), |_| Ok(triangle_bin()));
        assert!(result.is_err());
    }

    #[test]
    fn mirrored_nodes_keep_front_faces() {
        let gltf = TRIANGLE_GLTF.replace(r#""scale": [2, 2, 2]"#, r#""scale": [-1, 1, 1]"#);
        let model = parse_gltf(&gltf, Path::new(""), |_| Ok(triangle_bin())).unwrap();
        let mut indices = model
            .meshes
            .iter()
            .map(|mesh| mesh.indices.clone())
            .collect::<Vec<_>>();
        indices.sort();
        assert_eq!(vec![vec![0, 1, 2], vec![0, 2, 1]], indices);
        let mirrored = model
            .meshes
            .iter()
            .find(|mesh| mesh.indices == [0, 2, 1])
            .unwrap();
        assert_eq!(Vec3::new(-1.0, 2.0, 0.0), mirrored.vertices[1].position);
    }
}
