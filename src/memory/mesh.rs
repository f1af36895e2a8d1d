use super::DRIVER_NAME;
use crate::prelude::*;

use ndarray::Array2;

/// Mesh geometry held in memory.
///
/// Vertices are the rows of a `(vertices, ordinates)` matrix with 2 (x, y) or 3
/// (x, y, z) columns. Faces are lists of vertex indices of any length.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryMesh {
    vertices: Array2<f64>,
    faces: Vec<Vec<usize>>,
}

impl MemoryMesh {
    pub fn new(vertices: Array2<f64>, faces: Vec<Vec<usize>>) -> Self {
        Self {
            vertices: vertices.as_standard_layout().into_owned(),
            faces,
        }
    }

    fn coordinates(&self) -> &[f64] {
        // standard layout is enforced in `new`
        self.vertices.as_slice().unwrap_or(&[])
    }

    /// Wrap this geometry in a [`Mesh`], deriving its counts, extent and largest
    /// face from the data.
    pub fn into_mesh(self, uri: &str) -> Mesh {
        let extent = BBox::from_coordinates(self.coordinates(), self.vertices.ncols());
        let face_vertices_maximum = self.faces.iter().map(Vec::len).max().unwrap_or(0);

        Mesh::new(
            DRIVER_NAME,
            self.vertices.nrows(),
            self.faces.len(),
            face_vertices_maximum,
            extent,
            uri,
            self,
        )
    }
}

impl MeshSource for MemoryMesh {
    fn read_vertices(&self) -> Box<dyn MeshVertexIterator + '_> {
        Box::new(MemoryVertexIterator {
            coordinates: self.coordinates(),
            ordinates: self.vertex_ordinates(),
            next: 0,
        })
    }

    fn read_faces(&self) -> Box<dyn MeshFaceIterator + '_> {
        Box::new(MemoryFaceIterator {
            faces: &self.faces,
            next: 0,
        })
    }

    fn vertex_ordinates(&self) -> usize {
        self.vertices.ncols()
    }
}

struct MemoryVertexIterator<'a> {
    coordinates: &'a [f64],
    ordinates: usize,
    next: usize,
}

impl MeshVertexIterator for MemoryVertexIterator<'_> {
    fn next_batch(&mut self, vertex_count: usize, coordinates: &mut [f64]) -> usize {
        let from = self.next * self.ordinates;
        let left = self.coordinates.len().saturating_sub(from) / self.ordinates.max(1);
        let count = vertex_count.min(left);
        let len = count * self.ordinates;

        coordinates[..len].copy_from_slice(&self.coordinates[from..from + len]);
        self.next += count;
        count
    }
}

struct MemoryFaceIterator<'a> {
    faces: &'a [Vec<usize>],
    next: usize,
}

impl MeshFaceIterator for MemoryFaceIterator<'_> {
    fn next_batch(&mut self, face_offsets: &mut [usize], vertex_indices: &mut [usize]) -> usize {
        let mut written = 0;
        let mut produced = 0;

        for (offset, face) in face_offsets.iter_mut().zip(&self.faces[self.next..]) {
            let end = written + face.len();
            if end > vertex_indices.len() {
                break;
            }

            vertex_indices[written..end].copy_from_slice(face);
            *offset = end;
            written = end;
            produced += 1;
        }

        self.next += produced;
        produced
    }
}
