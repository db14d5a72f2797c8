//! PLY (`.ply`). Reads ASCII and binary through `ply-rs`, writes ASCII.

use std::io::{self, Cursor, Write};
use std::path::Path;

use ply_rs::parser::Parser;
use ply_rs::ply::{DefaultElement, Property};

use super::Mesh;
use crate::error::MeshError;

pub fn parse(path: &Path, bytes: &[u8]) -> Result<Mesh, MeshError> {
    let mut reader = Cursor::new(bytes);
    let parser = Parser::<DefaultElement>::new();
    let ply = parser
        .read_ply(&mut reader)
        .map_err(|e| MeshError::unreadable(path, e))?;

    let vertices = ply
        .payload
        .get("vertex")
        .ok_or_else(|| MeshError::unreadable(path, "no vertex element"))?;
    let mut points = Vec::with_capacity(vertices.len());
    for v in vertices {
        let coord = |name: &str| {
            float_property(v, name)
                .ok_or_else(|| MeshError::unreadable(path, format!("vertex missing {name}")))
        };
        points.push([coord("x")?, coord("y")?, coord("z")?]);
    }

    let mut cells = Vec::new();
    if let Some(faces) = ply.payload.get("face") {
        for f in faces {
            let cell = list_property(f, "vertex_indices")
                .or_else(|| list_property(f, "vertex_index"))
                .ok_or_else(|| MeshError::unreadable(path, "face missing vertex_indices"))?;
            cells.push(cell);
        }
    }
    Ok(Mesh { points, cells })
}

fn float_property(element: &DefaultElement, name: &str) -> Option<f64> {
    match element.get(name)? {
        Property::Float(v) => Some(*v as f64),
        Property::Double(v) => Some(*v),
        Property::Int(v) => Some(*v as f64),
        Property::UInt(v) => Some(*v as f64),
        Property::Short(v) => Some(*v as f64),
        Property::UShort(v) => Some(*v as f64),
        Property::Char(v) => Some(*v as f64),
        Property::UChar(v) => Some(*v as f64),
        _ => None,
    }
}

fn list_property(element: &DefaultElement, name: &str) -> Option<Vec<usize>> {
    fn to_indices<T: Copy + TryInto<usize>>(v: &[T]) -> Option<Vec<usize>> {
        v.iter().map(|&x| x.try_into().ok()).collect()
    }
    match element.get(name)? {
        Property::ListInt(v) => to_indices(v),
        Property::ListUInt(v) => to_indices(v),
        Property::ListShort(v) => to_indices(v),
        Property::ListUShort(v) => to_indices(v),
        Property::ListChar(v) => to_indices(v),
        Property::ListUChar(v) => to_indices(v),
        _ => None,
    }
}

pub fn write<W: Write>(w: &mut W, mesh: &Mesh) -> io::Result<()> {
    writeln!(w, "ply")?;
    writeln!(w, "format ascii 1.0")?;
    writeln!(w, "comment written by {}", env!("CARGO_PKG_NAME"))?;
    writeln!(w, "element vertex {}", mesh.points.len())?;
    writeln!(w, "property double x")?;
    writeln!(w, "property double y")?;
    writeln!(w, "property double z")?;
    writeln!(w, "element face {}", mesh.cells.len())?;
    writeln!(w, "property list uchar int vertex_indices")?;
    writeln!(w, "end_header")?;
    for p in &mesh.points {
        writeln!(w, "{} {} {}", p[0], p[1], p[2])?;
    }
    for c in &mesh.cells {
        write!(w, "{}", c.len())?;
        for i in c {
            write!(w, " {i}")?;
        }
        writeln!(w)?;
    }
    w.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_ascii_triangle() {
        let text = "ply\nformat ascii 1.0\nelement vertex 3\nproperty float x\nproperty float y\nproperty float z\nelement face 1\nproperty list uchar int vertex_indices\nend_header\n0 0 0\n1 0 0\n0 1 0\n3 0 1 2\n";
        let mesh = parse(Path::new("t.ply"), text.as_bytes()).unwrap();
        assert_eq!(mesh.points[1], [1.0, 0.0, 0.0]);
        assert_eq!(mesh.cells, vec![vec![0, 1, 2]]);
    }

    #[test]
    fn garbage_is_unreadable() {
        assert!(matches!(
            parse(Path::new("g.ply"), b"\x00\x01not a ply"),
            Err(MeshError::Unreadable { .. })
        ));
    }
}
