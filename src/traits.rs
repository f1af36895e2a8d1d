//! # Traits
//!
//! These are the contracts a format driver implements so that meshes and datasets
//! read from its files can be consumed through [`Mesh`](crate::Mesh) and
//! [`Dataset`](crate::Dataset) without knowing the format.
//!
//! Every method follows the same buffer-fill convention: the driver receives a
//! starting index and a buffer, writes as many items as it can into the front of the
//! buffer, and returns how many items it produced. The core has already clamped the
//! window before calling in, so a driver never sees a starting index past the end of
//! its data and the buffer is never longer than the items left to read.
//!

/// Values of a dataset living on mesh vertices or faces
///
/// A driver backing a 2D dataset implements this trait. The buffer handed to
/// `scalar_data` holds one `f64` per item while the buffer handed to `vector_data`
/// holds two (x and y components, interleaved), so the requested item count is
/// `buffer.len()` and `buffer.len() / 2` respectively.
///
/// ```ignore
/// struct Depth {
///     values: Vec<f64>,
/// }
///
/// impl meshdata::FlatValues for Depth {
///     fn scalar_data(&self, start: usize, buffer: &mut [f64]) -> usize {
///         let window = &self.values[start..start + buffer.len()];
///         buffer.copy_from_slice(window);
///         buffer.len()
///     }
///
///     fn vector_data(&self, _start: usize, _buffer: &mut [f64]) -> usize {
///         0
///     }
/// }
/// ```
pub trait FlatValues: Send + Sync {
    /// Fill `buffer` with scalar values starting at item `start`
    fn scalar_data(&self, start: usize, buffer: &mut [f64]) -> usize;

    /// Fill `buffer` with interleaved `(x, y)` pairs starting at item `start`
    fn vector_data(&self, start: usize, buffer: &mut [f64]) -> usize;

    /// Fill `buffer` with per-face active flags starting at face `start`
    ///
    /// Only consulted when the dataset reports active flag support. The default
    /// marks every face active.
    fn active_data(&self, _start: usize, buffer: &mut [bool]) -> usize {
        buffer.fill(true);
        buffer.len()
    }
}

/// Values of a layered 3D dataset
///
/// The layers under each face are called volumes. Volumes are numbered face by
/// face, so the volumes of face `i` start at `face_to_volume_data[i]` and there
/// are `vertical_level_count_data[i]` of them. The extrusion levels bounding those
/// volumes hold one more value per face than the face has volumes.
pub trait VolumeValues: Send + Sync {
    /// Number of volumes (vertical layers) under each face, starting at face `start`
    fn vertical_level_count_data(&self, start: usize, buffer: &mut [usize]) -> usize;

    /// Extrusion levels, `volumes + faces` values in total
    fn vertical_level_data(&self, start: usize, buffer: &mut [f64]) -> usize;

    /// Index of the first volume of each face, starting at face `start`
    fn face_to_volume_data(&self, start: usize, buffer: &mut [usize]) -> usize;

    /// One scalar per volume
    fn scalar_volumes_data(&self, start: usize, buffer: &mut [f64]) -> usize;

    /// Interleaved `(x, y)` pairs, one pair per volume
    fn vector_volumes_data(&self, start: usize, buffer: &mut [f64]) -> usize;

    /// Per-face active flags, see [`FlatValues::active_data`]
    fn active_data(&self, _start: usize, buffer: &mut [bool]) -> usize {
        buffer.fill(true);
        buffer.len()
    }
}

/// Forward-only reader of mesh vertices
pub trait MeshVertexIterator {
    /// Write up to `vertex_count` vertices into `coordinates` and return the number
    /// of vertices written. Each vertex takes as many consecutive values as the mesh
    /// has ordinates. Zero means the iterator is exhausted.
    fn next_batch(&mut self, vertex_count: usize, coordinates: &mut [f64]) -> usize;
}

/// Forward-only reader of mesh faces
///
/// Faces are polygons with a variable number of vertices. Each call fills two
/// buffers: `face_offsets[i]` is the number of entries of `vertex_indices` used by
/// the faces `0..=i` of this window, and `vertex_indices` holds the vertex indices of
/// every face in the window back to back.
///
/// A call stops early when the next face would not fit into `vertex_indices`, so a
/// window can produce fewer faces than `face_offsets` has room for.
pub trait MeshFaceIterator {
    fn next_batch(&mut self, face_offsets: &mut [usize], vertex_indices: &mut [usize]) -> usize;
}

/// Geometry of a mesh as provided by a driver
pub trait MeshSource: Send + Sync {
    /// Start a fresh pass over the vertices
    fn read_vertices(&self) -> Box<dyn MeshVertexIterator + '_>;

    /// Start a fresh pass over the faces
    fn read_faces(&self) -> Box<dyn MeshFaceIterator + '_>;

    /// Number of values stored per vertex: 2 (x, y) or 3 (x, y, z)
    fn vertex_ordinates(&self) -> usize {
        3
    }
}
