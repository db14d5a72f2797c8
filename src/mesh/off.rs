//! Object File Format (`.off`), ASCII variant.
//!
//! The first non-comment line must be exactly `OFF`; a header glued to the counts
//! (`OFF8 6 0`) is rejected here and repaired by the format-convert stage.

use std::io::{self, Write};
use std::path::Path;

use super::{Mesh, as_text, parse_point};
use crate::error::MeshError;

/// Byte offset where the header's line break belongs.
pub const HEADER_LEN: usize = 3;

/// Shortest possible vertex line (`0 0 0\n`) and face line (`3 0 1 2\n`).
const MIN_VERTEX_LINE: usize = 6;
const MIN_FACE_LINE: usize = 8;

pub fn parse(path: &Path, bytes: &[u8]) -> Result<Mesh, MeshError> {
    let text = as_text(path, bytes)?;
    let mut lines = text
        .lines()
        .map(|l| l.split('#').next().unwrap_or("").trim())
        .filter(|l| !l.is_empty());

    match lines.next() {
        Some("OFF") => {}
        Some(other) => {
            return Err(MeshError::unreadable(
                path,
                format!("expected `OFF` header, found `{other}`"),
            ));
        }
        None => return Err(MeshError::unreadable(path, "empty file")),
    }

    let counts = lines
        .next()
        .ok_or_else(|| MeshError::unreadable(path, "missing counts line"))?;
    let mut counts = counts.split_whitespace().map(str::parse::<usize>);
    let (n_points, n_cells) = match (counts.next(), counts.next()) {
        (Some(Ok(v)), Some(Ok(f))) => (v, f),
        _ => return Err(MeshError::unreadable(path, "bad counts line")),
    };

    // Counts are untrusted; never reserve more than the file could hold.
    let mut mesh = Mesh {
        points: Vec::with_capacity(n_points.min(bytes.len() / MIN_VERTEX_LINE)),
        cells: Vec::with_capacity(n_cells.min(bytes.len() / MIN_FACE_LINE)),
    };
    for _ in 0..n_points {
        let line = lines
            .next()
            .ok_or_else(|| MeshError::unreadable(path, "fewer vertices than declared"))?;
        mesh.points
            .push(parse_point(path, &mut line.split_whitespace())?);
    }
    for _ in 0..n_cells {
        let line = lines
            .next()
            .ok_or_else(|| MeshError::unreadable(path, "fewer faces than declared"))?;
        let mut tokens = line.split_whitespace().map(str::parse::<usize>);
        let k = match tokens.next() {
            Some(Ok(k)) => k,
            _ => return Err(MeshError::unreadable(path, "bad face line")),
        };
        let cell = tokens
            .take(k)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| MeshError::unreadable(path, e))?;
        if cell.len() != k {
            return Err(MeshError::unreadable(path, "truncated face"));
        }
        mesh.cells.push(cell);
    }
    Ok(mesh)
}

pub fn write<W: Write>(w: &mut W, mesh: &Mesh) -> io::Result<()> {
    writeln!(w, "OFF")?;
    writeln!(w, "{} {} 0", mesh.points.len(), mesh.cells.len())?;
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

/// If `bytes` is missing the line break right after the 3-byte header, return a copy
/// with `\n` inserted at [`HEADER_LEN`]. Inputs shorter than the header plus one byte are left alone.
pub fn repair_header(bytes: &[u8]) -> Option<Vec<u8>> {
    if bytes.len() <= HEADER_LEN || bytes[HEADER_LEN] == b'\n' {
        return None;
    }
    let mut fixed = Vec::with_capacity(bytes.len() + 1);
    fixed.extend_from_slice(&bytes[..HEADER_LEN]);
    fixed.push(b'\n');
    fixed.extend_from_slice(&bytes[HEADER_LEN..]);
    Some(fixed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TETRA: &str = "OFF\n4 4 6\n0 0 0\n1 0 0\n0 1 0\n0 0 1\n3 0 2 1\n3 0 1 3\n3 0 3 2\n3 1 2 3\n";

    #[test]
    fn parses_tetrahedron() {
        let mesh = parse(Path::new("t.off"), TETRA.as_bytes()).unwrap();
        assert_eq!(mesh.points.len(), 4);
        assert_eq!(mesh.cells[1], vec![0, 1, 3]);
    }

    #[test]
    fn glued_header_is_rejected() {
        let glued = TETRA.replacen("OFF\n", "OFF", 1);
        assert!(parse(Path::new("t.off"), glued.as_bytes()).is_err());
    }

    #[test]
    fn repair_inserts_break_after_header() {
        let fixed = repair_header(b"OFF4 4 6\n").unwrap();
        assert_eq!(fixed, b"OFF\n4 4 6\n");
        assert!(repair_header(b"OFF\n4 4 6\n").is_none());
        assert!(repair_header(b"OFF").is_none());
    }

    #[test]
    fn comments_are_ignored() {
        let text = "# made by hand\nOFF\n3 1 0\n0 0 0 # origin\n1 0 0\n0 1 0\n3 0 1 2\n";
        let mesh = parse(Path::new("c.off"), text.as_bytes()).unwrap();
        assert_eq!(mesh.cells, vec![vec![0, 1, 2]]);
    }

    #[test]
    fn oversized_counts_are_unreadable() {
        let text = "OFF\n1000000000000000 1 0\n0 0 0\n";
        assert!(matches!(
            parse(Path::new("big.off"), text.as_bytes()),
            Err(MeshError::Unreadable { .. })
        ));
        let text = "OFF\n3 1000000000000000 0\n0 0 0\n1 0 0\n0 1 0\n3 0 1 2\n";
        assert!(matches!(
            parse(Path::new("big.off"), text.as_bytes()),
            Err(MeshError::Unreadable { .. })
        ));
    }
}
