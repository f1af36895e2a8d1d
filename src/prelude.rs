//! Common traits and types that are useful for working with `meshdata`

pub use crate::{
    BBox, DataLocation, Dataset, DatasetGroup, DatasetShape, EditState, Mesh, Metadata,
    RelativeTimestamp, Statistics, TimeUnit,
};
pub use crate::{FlatValues, MeshFaceIterator, MeshSource, MeshVertexIterator, VolumeValues};
pub use crate::{FaceReader, VertexReader};

#[cfg(feature = "memory")]
pub use crate::memory::{MemoryMesh, MemoryValues, MemoryVolumes};
