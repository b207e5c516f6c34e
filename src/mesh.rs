//! Triangle meshes loaded from text files.
//!
//! The native format is a minimal line-oriented description with no header:
//!
//! ```text
//! v 0 0 0
//! v 1 0 0
//! v 0 1 0
//! f 1 2 3
//! ```
//!
//! A line starting with `v` is a vertex and a line starting with `f` is a
//! face; every other line is ignored. Within a record, tokens that do not
//! parse as numbers (such as the leading tag) are skipped and the first three
//! that do are used. Face indices are one-based in the file and stored
//! zero-based.

use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use crate::error::{MeshError, MeshResult};
use crate::face::Face;
use crate::math::{Mat4, Vec3};

/// An indexed triangle mesh.
///
/// A `Mesh` only exists in a fully validated state: every face index lies
/// within `0..vertex_count()`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vec3>,
    faces: Vec<Face>,
}

impl Mesh {
    /// Build a mesh from vertex and face lists, checking face indices.
    ///
    /// A [`MeshError::DanglingIndex`] from here reports the one-based
    /// position of the face in `faces` as its `line`.
    pub fn new(vertices: Vec<Vec3>, faces: Vec<Face>) -> MeshResult<Self> {
        for (i, face) in faces.iter().enumerate() {
            check_face(face, vertices.len(), i + 1)?;
        }
        Ok(Self { vertices, faces })
    }

    /// Load a mesh from a text file at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> MeshResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| MeshError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let text = String::from_utf8(bytes).map_err(|_| MeshError::Utf8 {
            path: path.to_path_buf(),
        })?;

        let mesh = Self::parse(&text)?;
        debug!(
            "Loaded {}: {} vertices, {} faces",
            path.display(),
            mesh.vertex_count(),
            mesh.face_count()
        );
        Ok(mesh)
    }

    /// Parse mesh text already held in memory.
    pub fn parse(text: &str) -> MeshResult<Self> {
        let mut vertices = Vec::new();
        // Faces keep their source line until the vertex count is final, since
        // a face may refer to a vertex declared further down the file.
        let mut faces = Vec::new();

        for (number, line) in split_lines(text).enumerate().map(|(i, l)| (i + 1, l)) {
            if line.starts_with('v') {
                vertices.push(read_vertex(line, number)?);
            } else if line.starts_with('f') {
                faces.push((number, read_face(line, number)?));
            }
        }

        let vertex_count = vertices.len();
        let faces = faces
            .into_iter()
            .map(|(number, [a, b, c])| -> MeshResult<Face> {
                let face = Face::new(
                    to_index(a, vertex_count, number)?,
                    to_index(b, vertex_count, number)?,
                    to_index(c, vertex_count, number)?,
                );
                Ok(face)
            })
            .collect::<MeshResult<Vec<_>>>()?;

        Ok(Self { vertices, faces })
    }

    /// Load a Wavefront OBJ file.
    ///
    /// Polygons are triangulated and all objects in the file are merged into
    /// a single mesh.
    pub fn from_obj<P: AsRef<Path>>(path: P) -> MeshResult<Self> {
        let path = path.as_ref();
        let options = tobj::LoadOptions {
            single_index: true,
            triangulate: true,
            ignore_points: true,
            ignore_lines: true,
            ..Default::default()
        };
        let (models, _materials) = tobj::load_obj(path, &options)?;

        let mut vertices = Vec::new();
        let mut faces = Vec::new();
        for model in &models {
            let offset = vertices.len();
            vertices.extend(
                model
                    .mesh
                    .positions
                    .chunks_exact(3)
                    .map(|p| Vec3::new(p[0], p[1], p[2])),
            );
            faces.extend(model.mesh.indices.chunks_exact(3).map(|t| {
                Face::new(
                    offset + t[0] as usize,
                    offset + t[1] as usize,
                    offset + t[2] as usize,
                )
            }));
        }

        let mesh = Self::new(vertices, faces)?;
        debug!(
            "Loaded OBJ {}: {} models, {} vertices, {} faces",
            path.display(),
            models.len(),
            mesh.vertex_count(),
            mesh.face_count()
        );
        Ok(mesh)
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.faces.is_empty()
    }

    /// The three corner positions of `face`, or `None` if it indexes past
    /// this mesh's vertices.
    pub fn face_vertices(&self, face: &Face) -> Option<[Vec3; 3]> {
        Some([
            *self.vertices.get(face.a)?,
            *self.vertices.get(face.b)?,
            *self.vertices.get(face.c)?,
        ])
    }

    /// A copy of this mesh with every vertex passed through
    /// [`Mat4::transform_point`]. Faces are unchanged.
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        Self {
            vertices: self
                .vertices
                .iter()
                .map(|&v| matrix.transform_point(v))
                .collect(),
            faces: self.faces.clone(),
        }
    }
}

impl FromStr for Mesh {
    type Err = MeshError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Split `text` at every line break character, counting `\r\n` as a single
/// break so that line numbers match what an editor shows.
fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = Some(text);
    std::iter::from_fn(move || {
        let s = rest?;
        match s.char_indices().find(|&(_, c)| is_line_break(c)) {
            Some((i, c)) => {
                let mut end = i + c.len_utf8();
                if c == '\r' && s[end..].starts_with('\n') {
                    end += 1;
                }
                rest = Some(&s[end..]);
                Some(&s[..i])
            }
            None => {
                rest = None;
                Some(s)
            }
        }
    })
}

fn read_vertex(line: &str, number: usize) -> MeshResult<Vec3> {
    let v: Vec<f32> = line
        .split_whitespace()
        .filter_map(|token| token.parse().ok())
        .collect();
    match v.as_slice() {
        [x, y, z, ..] => Ok(Vec3::new(*x, *y, *z)),
        _ => Err(MeshError::MalformedVertex {
            line: number,
            found: v.len(),
        }),
    }
}

/// Face indices exactly as written (one-based).
fn read_face(line: &str, number: usize) -> MeshResult<[i64; 3]> {
    let v: Vec<i64> = line
        .split_whitespace()
        .filter_map(|token| token.parse().ok())
        .collect();
    match v.as_slice() {
        [a, b, c, ..] => Ok([*a, *b, *c]),
        _ => Err(MeshError::MalformedFace {
            line: number,
            found: v.len(),
        }),
    }
}

/// Convert a one-based file index to a checked zero-based index.
fn to_index(index: i64, vertex_count: usize, line: usize) -> MeshResult<usize> {
    index
        .checked_sub(1)
        .and_then(|i| usize::try_from(i).ok())
        .filter(|&i| i < vertex_count)
        .ok_or(MeshError::DanglingIndex {
            line,
            index,
            vertex_count,
        })
}

fn check_face(face: &Face, vertex_count: usize, position: usize) -> MeshResult<()> {
    match face.indices().into_iter().find(|&i| i >= vertex_count) {
        Some(i) => Err(MeshError::DanglingIndex {
            line: position,
            index: i64::try_from(i)
                .ok()
                .and_then(|i| i.checked_add(1))
                .unwrap_or(i64::MAX),
            vertex_count,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TRIANGLE: &str = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";

    #[test]
    fn test_parse_triangle() {
        let mesh = Mesh::parse(TRIANGLE).unwrap();
        assert_eq!(
            mesh.vertices(),
            &[
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ]
        );
        assert_eq!(mesh.faces(), &[Face::new(0, 1, 2)]);
    }

    #[test]
    fn test_other_lines_ignored() {
        let text = "# comment\n\nv 1 2 3\n  v 9 9 9\ng group\nv 4 5 6\nv 7 8 9\nf 3 2 1\n";
        let mesh: Mesh = text.parse().unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.face_count(), 1);
        assert_eq!(mesh.faces()[0], Face::new(2, 1, 0));
    }

    #[test]
    fn test_extra_tokens_skipped() {
        let mesh = Mesh::parse("v 1.5 x -2 3e1 7\n").unwrap();
        assert_eq!(mesh.vertices(), &[Vec3::new(1.5, -2.0, 30.0)]);
    }

    #[test]
    fn test_crlf_lines() {
        let mesh = Mesh::parse("v 0 0 0\r\nv 1 0 0\r\nv 0 1 0\r\nf 1 2 3\r\n").unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.faces(), &[Face::new(0, 1, 2)]);
    }

    #[test]
    fn test_cr_only_lines() {
        let mesh = Mesh::parse("v 0 0 0\rv 1 0 0\rv 0 1 0\rf 1 2 3\r").unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.faces(), &[Face::new(0, 1, 2)]);
    }

    #[test]
    fn test_unicode_line_separators() {
        let mesh =
            Mesh::parse("v 0 0 0\u{2028}v 1 0 0\u{2029}v 0 1 0\u{85}f 1 2 3").unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.faces(), &[Face::new(0, 1, 2)]);
    }

    #[test]
    fn test_line_numbers_count_crlf_once() {
        let err = Mesh::parse("v 0 0 0\r\nv 1 0 0\r\nv 0 1\r\n").unwrap_err();
        assert!(matches!(err, MeshError::MalformedVertex { line: 3, found: 2 }));

        let err = Mesh::parse("v 0 0 0\rv 1\n").unwrap_err();
        assert!(matches!(err, MeshError::MalformedVertex { line: 2, found: 1 }));
    }

    #[test]
    fn test_split_lines() {
        let lines: Vec<_> = split_lines("a\r\nb\rc\n\nd").collect();
        assert_eq!(lines, ["a", "b", "c", "", "d"]);
    }

    #[test]
    fn test_face_before_its_vertices() {
        let mesh = Mesh::parse("f 1 2 3\nv 0 0 0\nv 1 0 0\nv 0 1 0\n").unwrap();
        assert_eq!(mesh.faces(), &[Face::new(0, 1, 2)]);
    }

    #[test]
    fn test_short_vertex_is_error() {
        let err = Mesh::parse("v 0 0 0\nv 1 2\n").unwrap_err();
        assert!(matches!(
            err,
            MeshError::MalformedVertex { line: 2, found: 2 }
        ));
    }

    #[test]
    fn test_short_face_is_error() {
        let err = Mesh::parse("v 0 0 0\nf 1 1\n").unwrap_err();
        assert!(matches!(err, MeshError::MalformedFace { line: 2, found: 2 }));
    }

    #[test]
    fn test_slashed_face_tokens_are_skipped() {
        // OBJ-style `v/vt/vn` references are not integers.
        let err = Mesh::parse("v 0 0 0\nf 1/1 2/2 3/3\n").unwrap_err();
        assert!(matches!(err, MeshError::MalformedFace { found: 0, .. }));
    }

    #[test]
    fn test_dangling_index_is_error() {
        let err = Mesh::parse("v 0 0 0\nv 1 0 0\nf 1 2 3\n").unwrap_err();
        assert!(matches!(
            err,
            MeshError::DanglingIndex {
                line: 3,
                index: 3,
                vertex_count: 2
            }
        ));

        let err = Mesh::parse(TRIANGLE.replace("f 1", "f 0").as_str()).unwrap_err();
        assert!(matches!(err, MeshError::DanglingIndex { index: 0, .. }));
    }

    #[test]
    fn test_empty_text_is_empty_mesh() {
        let mesh = Mesh::parse("").unwrap();
        assert!(mesh.is_empty());
    }

    #[test]
    fn test_new_checks_indices() {
        let vertices = vec![Vec3::ZERO, Vec3::X, Vec3::Y];
        assert!(Mesh::new(vertices.clone(), vec![Face::new(0, 1, 2)]).is_ok());
        let err = Mesh::new(vertices.clone(), vec![Face::new(0, 1, 3)]).unwrap_err();
        assert!(matches!(err, MeshError::DanglingIndex { index: 4, .. }));

        // Indices too large for the one-based report saturate instead of wrapping.
        for huge in [i64::MAX as usize, usize::MAX] {
            let err = Mesh::new(vertices.clone(), vec![Face::new(0, 0, huge)]).unwrap_err();
            assert!(matches!(
                err,
                MeshError::DanglingIndex {
                    index: i64::MAX,
                    ..
                }
            ));
        }
    }

    #[test]
    fn test_face_vertices_and_transform() {
        let mesh = Mesh::parse(TRIANGLE).unwrap();
        let face = mesh.faces()[0];
        assert_eq!(
            mesh.face_vertices(&face),
            Some([Vec3::ZERO, Vec3::X, Vec3::Y])
        );
        assert_eq!(mesh.face_vertices(&Face::new(0, 1, 5)), None);

        let moved = mesh.transformed(&Mat4::translate(Vec3::Z));
        assert_eq!(moved.vertices()[1], Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(moved.faces(), mesh.faces());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(TRIANGLE.as_bytes()).unwrap();
        let mesh = Mesh::load(file.path()).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.face_count(), 1);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Mesh::load(dir.path().join("missing.smf")).unwrap_err();
        assert!(matches!(err, MeshError::Io { .. }));
    }

    #[test]
    fn test_load_non_utf8() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[b'v', b' ', 0xff, 0xfe, b'\n']).unwrap();
        let err = Mesh::load(file.path()).unwrap_err();
        assert!(matches!(err, MeshError::Utf8 { .. }));
    }

    #[test]
    fn test_from_obj() {
        let mut file = tempfile::Builder::new().suffix(".obj").tempfile().unwrap();
        file.write_all(b"o quad\nv 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n")
            .unwrap();
        let mesh = Mesh::from_obj(file.path()).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        // The quad is split into two triangles.
        assert_eq!(mesh.face_count(), 2);
        for face in mesh.faces() {
            assert!(mesh.face_vertices(face).is_some());
        }
    }
}
