use crate::traits::{MeshFaceIterator, MeshVertexIterator};
use crate::utils::window_len;

/// Single pass reader over the vertices of a [`Mesh`](crate::Mesh).
///
/// Obtained from [`Mesh::read_vertices`](crate::Mesh::read_vertices). The reader
/// keeps a private cursor, so give each consumer its own.
pub struct VertexReader<'a> {
    inner: Box<dyn MeshVertexIterator + 'a>,
    remaining: usize,
    ordinates: usize,
}

impl<'a> VertexReader<'a> {
    pub(crate) fn new(
        inner: Box<dyn MeshVertexIterator + 'a>,
        vertices: usize,
        ordinates: usize,
    ) -> Self {
        Self {
            inner,
            remaining: vertices,
            ordinates: ordinates.max(1),
        }
    }

    /// Number of values written per vertex
    pub fn ordinates(&self) -> usize {
        self.ordinates
    }

    /// Read up to `vertex_count` vertices into `coordinates` and return how many
    /// were read. Zero means every vertex has been read.
    pub fn next_batch(&mut self, vertex_count: usize, coordinates: &mut [f64]) -> usize {
        let capacity = coordinates.len() / self.ordinates;
        let count = window_len(0, vertex_count, self.remaining, capacity);
        if count == 0 {
            return 0;
        }

        let window = &mut coordinates[..count * self.ordinates];
        let produced = self.inner.next_batch(count, window).min(count);
        self.remaining -= produced;
        produced
    }

    /// Read every remaining vertex, `window` vertices at a time
    pub fn collect_vertices(mut self, window: usize) -> Vec<f64> {
        let mut buffer = vec![0.0; window.max(1) * self.ordinates];
        let mut coordinates = Vec::with_capacity(self.remaining * self.ordinates);

        loop {
            let read = self.next_batch(window.max(1), &mut buffer);
            if read == 0 {
                break;
            }
            coordinates.extend_from_slice(&buffer[..read * self.ordinates]);
        }

        coordinates
    }
}

/// Single pass reader over the faces of a [`Mesh`](crate::Mesh).
///
/// Obtained from [`Mesh::read_faces`](crate::Mesh::read_faces). Each batch fills an
/// offsets buffer and a vertex indices buffer, see
/// [`MeshFaceIterator`](crate::MeshFaceIterator) for the layout and
/// [`decode_faces`] to split a batch back into faces.
pub struct FaceReader<'a> {
    inner: Box<dyn MeshFaceIterator + 'a>,
    remaining: usize,
    face_vertices_maximum: usize,
}

impl<'a> FaceReader<'a> {
    pub(crate) fn new(
        inner: Box<dyn MeshFaceIterator + 'a>,
        faces: usize,
        face_vertices_maximum: usize,
    ) -> Self {
        Self {
            inner,
            remaining: faces,
            face_vertices_maximum,
        }
    }

    /// Largest number of vertices of a single face. Size `vertex_indices` to this
    /// times the number of faces per batch.
    pub fn face_vertices_maximum(&self) -> usize {
        self.face_vertices_maximum
    }

    /// Read as many faces as fit into both buffers and return how many were read.
    /// Zero means every face has been read.
    ///
    /// Size `vertex_indices` to at least `face_offsets.len()` times the maximum
    /// number of vertices per face, otherwise a batch may stop early.
    pub fn next_batch(&mut self, face_offsets: &mut [usize], vertex_indices: &mut [usize]) -> usize {
        let count = window_len(0, face_offsets.len(), self.remaining, face_offsets.len());
        if count == 0 || vertex_indices.is_empty() {
            return 0;
        }

        let produced = self
            .inner
            .next_batch(&mut face_offsets[..count], vertex_indices)
            .min(count);
        self.remaining -= produced;
        produced
    }

    /// Read every remaining face, `window` faces at a time
    pub fn collect_faces(mut self, window: usize) -> Vec<Vec<usize>> {
        let window = window.max(1);
        let mut offsets = vec![0; window];
        let mut indices = vec![0; window * self.face_vertices_maximum.max(1)];
        let mut faces = Vec::with_capacity(self.remaining);

        loop {
            let read = self.next_batch(&mut offsets, &mut indices);
            if read == 0 {
                break;
            }
            faces.extend(decode_faces(&offsets[..read], &indices).map(<[usize]>::to_vec));
        }

        faces
    }
}

/// Split one batch of a face reader into the vertex indices of each face.
///
/// `offsets` holds the running end of each face within `indices`:
///
/// ```
/// let offsets = [3, 7, 9];
/// let indices = [0, 1, 2, 3, 4, 5, 6, 7, 8];
/// let faces: Vec<&[usize]> = meshdata::decode_faces(&offsets, &indices).collect();
/// assert_eq!(faces, vec![&[0, 1, 2][..], &[3, 4, 5, 6][..], &[7, 8][..]]);
/// ```
pub fn decode_faces<'a>(offsets: &'a [usize], indices: &'a [usize]) -> FaceWindow<'a> {
    FaceWindow {
        offsets,
        indices,
        face: 0,
        start: 0,
    }
}

/// Iterator over the faces of one batch, created by [`decode_faces`]
pub struct FaceWindow<'a> {
    offsets: &'a [usize],
    indices: &'a [usize],
    face: usize,
    start: usize,
}

impl<'a> Iterator for FaceWindow<'a> {
    type Item = &'a [usize];

    fn next(&mut self) -> Option<Self::Item> {
        let end = *self.offsets.get(self.face)?;
        // malformed offsets end the iteration
        let face = self.indices.get(self.start..end)?;

        self.face += 1;
        self.start = end;
        Some(face)
    }
}
