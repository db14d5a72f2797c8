//! Wavefront OBJ (`.obj`): `v` and `f` records; texture/normal/grouping records are skipped.

use std::io::{self, Write};
use std::path::Path;

use super::{Mesh, as_text, parse_point};
use crate::error::MeshError;

/// Records that are valid OBJ but carry nothing we keep.
const IGNORED_RECORDS: &[&str] = &[
    "vt", "vn", "vp", "l", "p", "g", "o", "s", "mtllib", "usemtl",
];

pub fn parse(path: &Path, bytes: &[u8]) -> Result<Mesh, MeshError> {
    let text = as_text(path, bytes)?;
    let mut mesh = Mesh::default();
    for (lineno, raw) in text.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or("").trim();
        let mut tokens = line.split_whitespace();
        let Some(kind) = tokens.next() else {
            continue;
        };
        match kind {
            "v" => mesh.points.push(parse_point(path, &mut tokens)?),
            "f" => {
                let n = mesh.points.len();
                let cell = tokens
                    .map(|t| resolve_index(t, n))
                    .collect::<Option<Vec<_>>>()
                    .ok_or_else(|| {
                        MeshError::unreadable(path, format!("bad face on line {}", lineno + 1))
                    })?;
                mesh.cells.push(cell);
            }
            k if IGNORED_RECORDS.contains(&k) => {}
            other => {
                return Err(MeshError::unreadable(
                    path,
                    format!("unknown record `{other}` on line {}", lineno + 1),
                ));
            }
        }
    }
    Ok(mesh)
}

/// `7`, `7/1`, `7//3`, `-1` → zero-based vertex index. Negative indices count back from `n_points`.
fn resolve_index(token: &str, n_points: usize) -> Option<usize> {
    let head = token.split('/').next()?;
    let idx: i64 = head.parse().ok()?;
    match idx {
        0 => None,
        i if i > 0 => Some((i - 1) as usize),
        i => n_points.checked_sub(i.unsigned_abs() as usize),
    }
}

pub fn write<W: Write>(w: &mut W, mesh: &Mesh) -> io::Result<()> {
    for p in &mesh.points {
        writeln!(w, "v {} {} {}", p[0], p[1], p[2])?;
    }
    for c in &mesh.cells {
        write!(w, "f")?;
        for i in c {
            write!(w, " {}", i + 1)?;
        }
        writeln!(w)?;
    }
    w.flush()
}
