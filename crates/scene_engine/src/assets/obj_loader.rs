//! Wavefront OBJ reader for external models
//!
//! Only what the runtime needs is kept: the vertex cloud (for bounds) and
//! face count. Normals, texture coordinates and material libraries are
//! skipped.

use crate::assets::AssetError;
use crate::foundation::math::Vec3;
use crate::scene::Aabb;

/// A loaded external model
#[derive(Debug, Clone, PartialEq)]
pub struct ModelAsset {
    /// Locator the model came from
    pub source: String,
    /// Local bounds of every vertex; `None` for an empty model
    pub bounds: Option<Aabb>,
    /// Vertex position count
    pub vertex_count: usize,
    /// Face count
    pub face_count: usize,
}

/// Parse OBJ text into a model
pub fn parse_obj(source: &str, text: &str) -> Result<ModelAsset, AssetError> {
    let mut positions = Vec::new();
    let mut face_count = 0;

    for (number, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts[0] {
            "v" => {
                if parts.len() < 4 {
                    return Err(parse_error(source, number, "vertex needs 3 coordinates"));
                }
                let mut coords = [0.0f32; 3];
                for (slot, part) in coords.iter_mut().zip(&parts[1..4]) {
                    *slot = part
                        .parse()
                        .map_err(|_| parse_error(source, number, "invalid vertex coordinate"))?;
                }
                positions.push(Vec3::new(coords[0], coords[1], coords[2]));
            }
            "f" => {
                if parts.len() < 4 {
                    return Err(parse_error(source, number, "face needs at least 3 vertices"));
                }
                for part in &parts[1..] {
                    // v, v/vt, v//vn or v/vt/vn; negative indices are relative
                    let index: i64 = part
                        .split('/')
                        .next()
                        .and_then(|i| i.parse().ok())
                        .ok_or_else(|| parse_error(source, number, "invalid face index"))?;
                    let count = positions.len() as i64;
                    let valid = (index > 0 && index <= count) || (index < 0 && -index <= count);
                    if !valid {
                        return Err(parse_error(source, number, "face index out of range"));
                    }
                }
                face_count += 1;
            }
            _ => {}
        }
    }

    Ok(ModelAsset {
        source: source.to_string(),
        bounds: Aabb::from_points(&positions),
        vertex_count: positions.len(),
        face_count,
    })
}

fn parse_error(source: &str, line: usize, message: &str) -> AssetError {
    AssetError::Decode(format!("{}:{}: {}", source, line + 1, message))
}
