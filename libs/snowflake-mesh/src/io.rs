//! Field loading and mesh writing.
//!
//! Fields come from text grids (one row per line, samples separated by
//! whitespace or commas, `#` starts a comment) or from grayscale images whose
//! luma values 0–255 become the samples. Meshes are written as indexed OBJ or
//! binary STL, chosen by file extension.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::{debug, info};

use crate::error::{MeshError, MeshResult};
use crate::field::{field_from_rows, ScalarField};
use crate::mesh::Mesh;

// =============================================================================
// FORMATS
// =============================================================================

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

fn unsupported(path: &Path) -> MeshError {
    MeshError::UnsupportedFormat {
        extension: path.extension().and_then(|e| e.to_str()).map(String::from),
    }
}

/// Supported field file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldFormat {
    Text,
    Image,
}

impl FieldFormat {
    /// Detect format from file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match extension(path)?.as_str() {
            "txt" | "csv" | "dat" => Some(FieldFormat::Text),
            "png" | "pgm" | "pnm" | "ppm" | "bmp" | "tif" | "tiff" => Some(FieldFormat::Image),
            _ => None,
        }
    }
}

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshFormat {
    Obj,
    Stl,
}

impl MeshFormat {
    /// Detect format from file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match extension(path)?.as_str() {
            "obj" => Some(MeshFormat::Obj),
            "stl" => Some(MeshFormat::Stl),
            _ => None,
        }
    }

    /// Conventional file extension.
    pub fn extension(self) -> &'static str {
        match self {
            MeshFormat::Obj => "obj",
            MeshFormat::Stl => "stl",
        }
    }
}

// =============================================================================
// FIELD LOADING
// =============================================================================

/// Load a scalar field, auto-detecting format from extension.
pub fn load_field(path: &Path) -> MeshResult<ScalarField> {
    let format = FieldFormat::from_path(path).ok_or_else(|| unsupported(path))?;
    info!(?path, ?format, "Loading field");

    let field = match format {
        FieldFormat::Text => {
            let text = std::fs::read_to_string(path).map_err(|e| MeshError::io(path, e))?;
            parse_field(&text, path)?
        }
        FieldFormat::Image => load_image_field(path)?,
    };

    debug!(rows = field.nrows(), cols = field.ncols(), "Loaded field");
    Ok(field)
}

/// Parses a text grid. `path` only labels errors.
///
/// # Example
///
/// ```rust
/// use std::path::Path;
/// use snowflake_mesh::io::parse_field;
///
/// let field = parse_field("0 0 0\n0, 2, 0\n# comment\n0 0 0\n", Path::new("inline")).unwrap();
/// assert_eq!(field.dim(), (3, 3));
/// assert_eq!(field[[1, 1]], 2.0);
/// ```
pub fn parse_field(text: &str, path: &Path) -> MeshResult<ScalarField> {
    let mut rows: Vec<Vec<f64>> = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        let content = line.split('#').next().unwrap_or("").trim();
        if content.is_empty() {
            continue;
        }

        let row = content
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty())
            .map(|token| {
                token.parse::<f64>().map_err(|e| MeshError::ParseField {
                    path: path.to_path_buf(),
                    line: line_no,
                    message: format!("{token:?}: {e}"),
                })
            })
            .collect::<MeshResult<Vec<f64>>>()?;

        if let Some(first) = rows.first() {
            if row.len() != first.len() {
                return Err(MeshError::ParseField {
                    path: path.to_path_buf(),
                    line: line_no,
                    message: format!("{} samples, expected {}", row.len(), first.len()),
                });
            }
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(MeshError::ParseField {
            path: path.to_path_buf(),
            line: 0,
            message: "no samples".to_string(),
        });
    }
    field_from_rows(rows)
}

fn load_image_field(path: &Path) -> MeshResult<ScalarField> {
    let image = image::open(path)
        .map_err(|source| MeshError::Image {
            path: path.to_path_buf(),
            source,
        })?
        .to_luma8();
    let (width, height) = image.dimensions();
    Ok(ScalarField::from_shape_fn(
        (height as usize, width as usize),
        |(row, col)| f64::from(image.get_pixel(col as u32, row as u32).0[0]),
    ))
}

// =============================================================================
// MESH WRITING
// =============================================================================

/// Save mesh to file, auto-detecting format from extension.
pub fn save_mesh(mesh: &Mesh, path: &Path) -> MeshResult<()> {
    match MeshFormat::from_path(path).ok_or_else(|| unsupported(path))? {
        MeshFormat::Obj => save_obj(mesh, path),
        MeshFormat::Stl => save_stl(mesh, path),
    }
}

/// Save mesh to OBJ file (ASCII, 1-based indices, one face group).
pub fn save_obj(mesh: &Mesh, path: &Path) -> MeshResult<()> {
    let file = File::create(path).map_err(|e| MeshError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    write_obj(mesh, &mut writer)
        .and_then(|()| writer.flush())
        .map_err(|e| MeshError::io(path, e))?;

    info!(
        ?path,
        vertices = mesh.vertex_count(),
        faces = mesh.triangle_count(),
        "Saved OBJ"
    );
    Ok(())
}

/// Writes OBJ text to any writer.
pub fn write_obj<W: Write>(mesh: &Mesh, writer: &mut W) -> std::io::Result<()> {
    writeln!(writer, "# snowflake mesh")?;
    writeln!(writer, "# Vertices: {}", mesh.vertex_count())?;
    writeln!(writer, "# Faces: {}", mesh.triangle_count())?;
    writeln!(writer, "o snowflake")?;

    for v in mesh.vertices() {
        writeln!(writer, "v {:.6} {:.6} {:.6}", v.x, v.y, v.z)?;
    }
    for &[a, b, c] in mesh.triangles() {
        writeln!(writer, "f {} {} {}", a + 1, b + 1, c + 1)?;
    }
    Ok(())
}

/// Save mesh to STL file (binary format).
pub fn save_stl(mesh: &Mesh, path: &Path) -> MeshResult<()> {
    let file = File::create(path).map_err(|e| MeshError::io(path, e))?;
    let mut writer = BufWriter::new(file);

    let vertices = mesh.vertices_f32();
    let triangles: Vec<stl_io::Triangle> = mesh
        .triangles()
        .iter()
        .enumerate()
        .map(|(index, &[a, b, c])| {
            let n = mesh.face_normal(index);
            stl_io::Triangle {
                normal: stl_io::Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                vertices: [
                    stl_io::Vertex::new(vertices[a as usize]),
                    stl_io::Vertex::new(vertices[b as usize]),
                    stl_io::Vertex::new(vertices[c as usize]),
                ],
            }
        })
        .collect();

    stl_io::write_stl(&mut writer, triangles.iter())
        .and_then(|()| writer.flush())
        .map_err(|e| MeshError::io(path, e))?;

    info!(?path, triangles = triangles.len(), "Saved STL");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;
    use std::fs;
    use tempfile::{tempdir, NamedTempFile};

    fn tetrahedron() -> Mesh {
        let mut mesh = Mesh::new();
        mesh.add_vertex(DVec3::ZERO);
        mesh.add_vertex(DVec3::new(10.0, 0.0, 0.0));
        mesh.add_vertex(DVec3::new(0.0, 10.0, 0.0));
        mesh.add_vertex(DVec3::new(0.0, 0.0, 10.0));
        mesh.add_triangle(0, 2, 1);
        mesh.add_triangle(0, 1, 3);
        mesh.add_triangle(0, 3, 2);
        mesh.add_triangle(1, 2, 3);
        mesh
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(
            MeshFormat::from_path(Path::new("a.OBJ")),
            Some(MeshFormat::Obj)
        );
        assert_eq!(
            MeshFormat::from_path(Path::new("a.stl")),
            Some(MeshFormat::Stl)
        );
        assert_eq!(MeshFormat::from_path(Path::new("a.ply")), None);
        assert_eq!(
            FieldFormat::from_path(Path::new("grid.csv")),
            Some(FieldFormat::Text)
        );
        assert_eq!(
            FieldFormat::from_path(Path::new("flake.png")),
            Some(FieldFormat::Image)
        );
        assert_eq!(FieldFormat::from_path(Path::new("flake.npy")), None);
    }

    #[test]
    fn test_parse_field_reports_line_of_ragged_row() {
        let result = parse_field("1 2 3\n\n4 5\n", Path::new("grid.txt"));
        match result {
            Err(MeshError::ParseField { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected ParseField, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_field_rejects_bad_number() {
        let result = parse_field("1 x 3\n", Path::new("grid.txt"));
        assert!(matches!(result, Err(MeshError::ParseField { line: 1, .. })));
    }

    #[test]
    fn test_parse_field_rejects_empty() {
        let result = parse_field("# nothing here\n\n", Path::new("grid.txt"));
        assert!(matches!(result, Err(MeshError::ParseField { .. })));
    }

    #[test]
    fn test_load_text_field() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("grid.txt");
        fs::write(&path, "0,0,0,0\n0,2,2,0\n0,0,0,0\n").unwrap();

        let field = load_field(&path).unwrap();
        assert_eq!(field.dim(), (3, 4));
        assert_eq!(field[[1, 2]], 2.0);
    }

    #[test]
    fn test_load_image_field_uses_luma() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("flake.png");
        let image = image::GrayImage::from_fn(4, 3, |x, y| image::Luma([(x * 10 + y) as u8]));
        image.save(&path).unwrap();

        let field = load_field(&path).unwrap();
        assert_eq!(field.dim(), (3, 4));
        assert_eq!(field[[2, 3]], 32.0);
    }

    #[test]
    fn test_load_unknown_extension() {
        let result = load_field(Path::new("flake.npy"));
        assert!(matches!(
            result,
            Err(MeshError::UnsupportedFormat { extension: Some(ref e) }) if e == "npy"
        ));
    }

    #[test]
    fn test_write_obj_is_one_based() {
        let mut buffer = Vec::new();
        write_obj(&tetrahedron(), &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 4);
        assert_eq!(text.lines().filter(|l| l.starts_with("f ")).count(), 4);
        assert!(text.contains("f 1 3 2"));
        assert!(text.contains("v 10.000000 0.000000 0.000000"));
    }

    #[test]
    fn test_save_stl_round_trip_face_count() {
        let file = NamedTempFile::with_suffix(".stl").unwrap();
        save_mesh(&tetrahedron(), file.path()).unwrap();

        let mut reader = fs::File::open(file.path()).unwrap();
        let stl = stl_io::read_stl(&mut reader).unwrap();
        assert_eq!(stl.faces.len(), 4);
        assert_eq!(stl.vertices.len(), 4);
    }

    #[test]
    fn test_save_obj_to_file() {
        let file = NamedTempFile::with_suffix(".obj").unwrap();
        save_mesh(&tetrahedron(), file.path()).unwrap();
        let text = fs::read_to_string(file.path()).unwrap();
        assert!(text.starts_with("# snowflake mesh"));
    }

    #[test]
    fn test_save_unknown_extension() {
        let result = save_mesh(&tetrahedron(), Path::new("mesh.ply"));
        assert!(matches!(result, Err(MeshError::UnsupportedFormat { .. })));
    }
}
