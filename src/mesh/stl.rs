//! STL (`.stl`) via `stl_io`. Reads binary and ASCII, writes binary.

use std::io::{self, Cursor, Write};
use std::path::Path;

use super::Mesh;
use crate::error::MeshError;

pub fn parse(path: &Path, bytes: &[u8]) -> Result<Mesh, MeshError> {
    let mut reader = Cursor::new(bytes);
    let stl = stl_io::read_stl(&mut reader).map_err(|e| MeshError::unreadable(path, e))?;
    let points = stl
        .vertices
        .iter()
        .map(|v| [v[0] as f64, v[1] as f64, v[2] as f64])
        .collect();
    let cells = stl.faces.iter().map(|f| f.vertices.to_vec()).collect();
    Ok(Mesh { points, cells })
}

pub fn write<W: Write>(w: &mut W, mesh: &Mesh) -> io::Result<()> {
    let vertex = |i: usize| {
        let p = mesh.points[i];
        [p[0] as f32, p[1] as f32, p[2] as f32]
    };
    let triangles: Vec<stl_io::Triangle> = mesh
        .triangles()
        .map(|[a, b, c]| {
            let (p0, p1, p2) = (vertex(a), vertex(b), vertex(c));
            stl_io::Triangle {
                normal: stl_io::Normal::new(unit_normal(p0, p1, p2)),
                vertices: [
                    stl_io::Vertex::new(p0),
                    stl_io::Vertex::new(p1),
                    stl_io::Vertex::new(p2),
                ],
            }
        })
        .collect();
    stl_io::write_stl(w, triangles.iter())?;
    w.flush()
}

/// Normal of the triangle, or zero for a degenerate one.
fn unit_normal(p0: [f32; 3], p1: [f32; 3], p2: [f32; 3]) -> [f32; 3] {
    let e1 = [p1[0] - p0[0], p1[1] - p0[1], p1[2] - p0[2]];
    let e2 = [p2[0] - p0[0], p2[1] - p0[1], p2[2] - p0[2]];
    let n = [
        e1[1] * e2[2] - e1[2] * e2[1],
        e1[2] * e2[0] - e1[0] * e2[2],
        e1[0] * e2[1] - e1[1] * e2[0],
    ];
    let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
    if len > 0.0 {
        [n[0] / len, n[1] / len, n[2] / len]
    } else {
        [0.0; 3]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_bytes_are_unreadable() {
        assert!(matches!(
            parse(Path::new("e.stl"), b""),
            Err(MeshError::Unreadable { .. })
        ));
    }

    #[test]
    fn binary_output_is_readable_back() {
        let mesh = Mesh {
            points: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            cells: vec![vec![0, 2, 1], vec![0, 1, 3], vec![0, 3, 2], vec![1, 2, 3]],
        };
        let mut buf = Vec::new();
        write(&mut buf, &mesh).unwrap();
        let back = parse(Path::new("t.stl"), &buf).unwrap();
        assert_eq!(back.points.len(), 4);
        assert_eq!(back.cells.len(), 4);
    }

    #[test]
    fn normal_of_xy_triangle_points_up() {
        let n = unit_normal([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        assert_eq!(n, [0.0, 0.0, 1.0]);
    }
}
