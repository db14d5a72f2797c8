//! Mesh file I/O used by the format-convert stage.
//!
//! Only serialization lives here: points and polygon cells are read and written as-is,
//! no geometry is modified.
//!
//! | Format | Suffix | Read | Write |
//! |--------|--------|------|-------|
//! | Object File Format | `.off` | ✓ | ✓ |
//! | Wavefront OBJ | `.obj` | ✓ | ✓ |
//! | STL | `.stl` | ✓ (binary + ASCII) | ✓ (binary) |
//! | PLY | `.ply` | ✓ | ✓ (ASCII) |

pub mod obj;
pub mod off;
pub mod ply;
pub mod stl;

use std::fs;
use std::path::Path;

use crate::error::MeshError;

/// Points plus polygon cells (indices into `points`).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub points: Vec<[f64; 3]>,
    pub cells: Vec<Vec<usize>>,
}

impl Mesh {
    /// Reject meshes with no points or with cells pointing past the point list.
    fn validated(self, path: &Path) -> Result<Self, MeshError> {
        if self.points.is_empty() {
            return Err(MeshError::unreadable(path, "no points"));
        }
        let n = self.points.len();
        for (i, cell) in self.cells.iter().enumerate() {
            if cell.len() < 3 {
                return Err(MeshError::unreadable(
                    path,
                    format!("cell {i} has fewer than 3 vertices"),
                ));
            }
            if let Some(bad) = cell.iter().find(|&&v| v >= n) {
                return Err(MeshError::unreadable(
                    path,
                    format!("cell {i} references vertex {bad} of {n}"),
                ));
            }
        }
        Ok(self)
    }

    /// Fan triangulation of every cell (used by writers that only know triangles).
    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        self.cells
            .iter()
            .flat_map(|c| (1..c.len().saturating_sub(1)).map(move |i| [c[0], c[i], c[i + 1]]))
    }
}

/// Supported mesh formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MeshFormat {
    Off,
    Obj,
    Stl,
    Ply,
}

impl MeshFormat {
    /// Format from an extension without the dot (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<MeshFormat> {
        match ext.to_ascii_lowercase().as_str() {
            "off" => Some(MeshFormat::Off),
            "obj" => Some(MeshFormat::Obj),
            "stl" => Some(MeshFormat::Stl),
            "ply" => Some(MeshFormat::Ply),
            _ => None,
        }
    }

    /// Format from a suffix with its leading dot, e.g. `.obj`.
    pub fn from_suffix(suffix: &str) -> Option<MeshFormat> {
        suffix.strip_prefix('.').and_then(Self::from_extension)
    }

    pub fn from_path(path: &Path) -> Option<MeshFormat> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            MeshFormat::Off => ".off",
            MeshFormat::Obj => ".obj",
            MeshFormat::Stl => ".stl",
            MeshFormat::Ply => ".ply",
        }
    }
}

/// Read a mesh, picking the parser from the path suffix.
///
/// Anything that is not a parseable mesh (unknown suffix, garbage, empty file) is
/// [`MeshError::Unreadable`]; failing to read the bytes at all is [`MeshError::Io`].
pub fn read(path: &Path) -> Result<Mesh, MeshError> {
    let format = MeshFormat::from_path(path)
        .ok_or_else(|| MeshError::unreadable(path, "unknown mesh suffix"))?;
    let bytes = fs::read(path).map_err(|source| MeshError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mesh = match format {
        MeshFormat::Off => off::parse(path, &bytes)?,
        MeshFormat::Obj => obj::parse(path, &bytes)?,
        MeshFormat::Stl => stl::parse(path, &bytes)?,
        MeshFormat::Ply => ply::parse(path, &bytes)?,
    };
    mesh.validated(path)
}

/// Write `mesh` to `path` in `format`.
pub fn write(path: &Path, mesh: &Mesh, format: MeshFormat) -> Result<(), MeshError> {
    let io_err = |source| MeshError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = fs::File::create(path).map_err(io_err)?;
    let mut writer = std::io::BufWriter::new(file);
    match format {
        MeshFormat::Off => off::write(&mut writer, mesh),
        MeshFormat::Obj => obj::write(&mut writer, mesh),
        MeshFormat::Stl => stl::write(&mut writer, mesh),
        MeshFormat::Ply => ply::write(&mut writer, mesh),
    }
    .map_err(io_err)
}

/// Decode bytes as UTF-8 text, or report the file as unreadable.
pub(crate) fn as_text<'a>(path: &Path, bytes: &'a [u8]) -> Result<&'a str, MeshError> {
    std::str::from_utf8(bytes).map_err(|e| MeshError::unreadable(path, e))
}

/// Parse exactly three coordinates from the front of `tokens`.
pub(crate) fn parse_point<'a, I>(path: &Path, tokens: &mut I) -> Result<[f64; 3], MeshError>
where
    I: Iterator<Item = &'a str>,
{
    let mut p = [0.0_f64; 3];
    for c in p.iter_mut() {
        let tok = tokens
            .next()
            .ok_or_else(|| MeshError::unreadable(path, "truncated vertex"))?;
        *c = tok
            .parse()
            .map_err(|_| MeshError::unreadable(path, format!("bad coordinate `{tok}`")))?;
    }
    Ok(p)
}
