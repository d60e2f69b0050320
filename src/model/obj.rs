//! Wavefront OBJ parsing
//! Supports vertices (v), texture coords (vt), normals (vn) and faces (f)

use crate::error::{RenderError, Result};
use crate::rasterizer::{Vec2, Vec3};

/// One face corner: indices into the geometry arrays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Corner {
    pub vert: usize,
    pub uv: Option<usize>,
    pub normal: Option<usize>,
}

/// Raw triangle soup as read from the file
#[derive(Debug, Clone, Default)]
pub struct ObjGeometry {
    pub positions: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub normals: Vec<Vec3>,
    pub faces: Vec<[Corner; 3]>,
}

/// Parse OBJ file contents
pub fn parse(contents: &str) -> Result<ObjGeometry> {
    let mut geometry = ObjGeometry::default();

    for (line_idx, line) in contents.lines().enumerate() {
        let line_num = line_idx + 1;
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();

        match parts[0] {
            "v" => {
                let [x, y, z] = parse_floats::<3>(&parts[1..], line_num, "vertex position")?;
                geometry.positions.push(Vec3::new(x, y, z));
            }

            "vt" => {
                // A third (w) component is allowed and ignored
                let [u, v] = parse_floats::<2>(&parts[1..], line_num, "texture coordinate")?;
                geometry.uvs.push(Vec2::new(u, v));
            }

            "vn" => {
                let [x, y, z] = parse_floats::<3>(&parts[1..], line_num, "normal")?;
                geometry.normals.push(Vec3::new(x, y, z));
            }

            "f" => {
                if parts.len() < 4 {
                    return Err(obj_error(line_num, "face must have at least 3 vertices"));
                }

                let corners = parts[1..]
                    .iter()
                    .map(|corner| parse_corner(corner, &geometry, line_num))
                    .collect::<Result<Vec<_>>>()?;

                // Fan triangulation from the first corner keeps the winding
                for i in 1..corners.len() - 1 {
                    geometry.faces.push([corners[0], corners[i], corners[i + 1]]);
                }
            }

            _ => {
                // Ignore other OBJ commands (o, g, s, usemtl, mtllib, etc.)
            }
        }
    }

    Ok(geometry)
}

fn obj_error(line: usize, message: impl Into<String>) -> RenderError {
    RenderError::Obj {
        line,
        message: message.into(),
    }
}

fn parse_floats<const N: usize>(parts: &[&str], line: usize, what: &str) -> Result<[f64; N]> {
    if parts.len() < N {
        return Err(obj_error(
            line,
            format!("invalid {} (expected {} values)", what, N),
        ));
    }

    let mut ret = [0.0; N];
    for (value, s) in ret.iter_mut().zip(parts) {
        *value = s
            .parse()
            .map_err(|_| obj_error(line, format!("invalid number '{}'", s)))?;
    }
    Ok(ret)
}

/// Parse a face corner like "1/2/3", "1//3", "1/2" or "1"
fn parse_corner(corner: &str, geometry: &ObjGeometry, line: usize) -> Result<Corner> {
    let mut fields = corner.split('/');

    let vert = match fields.next() {
        Some(s) if !s.is_empty() => parse_index(s, geometry.positions.len(), line)?,
        _ => return Err(obj_error(line, "missing position index in face")),
    };

    let uv = match fields.next() {
        Some(s) if !s.is_empty() => Some(parse_index(s, geometry.uvs.len(), line)?),
        _ => None,
    };

    let normal = match fields.next() {
        Some(s) if !s.is_empty() => Some(parse_index(s, geometry.normals.len(), line)?),
        _ => None,
    };

    Ok(Corner { vert, uv, normal })
}

/// Resolve a 1-based (or negative, relative to the end) OBJ index
fn parse_index(s: &str, count: usize, line: usize) -> Result<usize> {
    let idx: i64 = s
        .parse()
        .map_err(|_| obj_error(line, format!("invalid index '{}'", s)))?;

    let resolved = if idx > 0 {
        idx - 1
    } else {
        count as i64 + idx
    };

    if idx == 0 || resolved < 0 || resolved >= count as i64 {
        return Err(obj_error(
            line,
            format!("index {} out of range ({} defined)", idx, count),
        ));
    }
    Ok(resolved as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD: &str = "\
# unit quad
o quad
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 0
vt 1 1 0
vt 0 1
vn 0 0 1
s off
f 1/1/1 2/2/1 3/3/1 4/4/1
";

    #[test]
    fn test_parse_quad_fans_into_triangles() {
        let geometry = parse(QUAD).unwrap();
        assert_eq!(geometry.positions.len(), 4);
        assert_eq!(geometry.uvs.len(), 4);
        assert_eq!(geometry.normals.len(), 1);
        assert_eq!(geometry.faces.len(), 2);

        let verts: Vec<[usize; 3]> = geometry
            .faces
            .iter()
            .map(|f| [f[0].vert, f[1].vert, f[2].vert])
            .collect();
        assert_eq!(verts, vec![[0, 1, 2], [0, 2, 3]]);
        assert_eq!(geometry.faces[1][2].uv, Some(3));
        assert_eq!(geometry.faces[1][2].normal, Some(0));
    }

    #[test]
    fn test_corner_forms() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2 -1//-1\n";
        let geometry = parse(src).unwrap();
        let face = geometry.faces[0];
        assert_eq!(face[0], Corner { vert: 0, uv: None, normal: Some(0) });
        assert_eq!(face[1], Corner { vert: 1, uv: None, normal: None });
        assert_eq!(face[2], Corner { vert: 2, uv: None, normal: Some(0) });
    }

    #[test]
    fn test_errors_carry_line_numbers() {
        let err = parse("v 0 0 0\nv 1 0\n").unwrap_err();
        assert!(matches!(err, RenderError::Obj { line: 2, .. }));

        let err = parse("v 0 0 0\nv 1 0 0\nv 0 1 0\n\nf 1 2 4\n").unwrap_err();
        assert!(matches!(err, RenderError::Obj { line: 5, .. }));

        let err = parse("v 0 0 x\n").unwrap_err();
        assert!(err.to_string().contains("invalid number 'x'"));

        let err = parse("v 0 0 0\nf 1 1\n").unwrap_err();
        assert!(matches!(err, RenderError::Obj { line: 2, .. }));

        let err = parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 0 1 2\n").unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }
}
