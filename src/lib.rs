#![doc = include_str!("../README.md")]

mod crs;
mod data;
pub mod dataset;
mod group;
mod iter;
pub mod mesh;
pub mod prelude;
mod time;
mod traits;
mod utils;

#[cfg(feature = "memory")]
pub mod memory;

pub use traits::FlatValues;
pub use traits::MeshFaceIterator;
pub use traits::MeshSource;
pub use traits::MeshVertexIterator;
pub use traits::VolumeValues;

pub use crs::{CrsDefinition, CrsNormalizer, PlainCrs};
pub use data::{BBox, Metadata, Statistics};
pub use dataset::{DataLocation, Dataset, DatasetShape};
pub use group::{DatasetGroup, EditState};
pub use iter::{decode_faces, FaceReader, FaceWindow, VertexReader};
pub use mesh::Mesh;
pub use time::{RelativeTimestamp, TimeUnit};

pub use chrono;

/// general purpose error enumeration for the writer-side operations of the data model.
///
/// Reading values and geometry never fails: those calls report the number of items
/// produced instead.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("An io error occured: `{0}`")]
    Io(#[from] std::io::Error),
    #[error("Could not normalize coordinate reference system: {0}")]
    Crs(String),
    #[error("Dataset group `{group}` is not in edit mode")]
    NotEditing { group: String },
    #[error("Dataset group `{group}` is already in edit mode")]
    AlreadyEditing { group: String },
    #[error("Dataset with values on {dataset} does not fit a group with values on {group}")]
    LocationMismatch {
        group: DataLocation,
        dataset: DataLocation,
    },
    #[error("Dataset group `{group}` holds {expected} values")]
    ValueKindMismatch {
        group: String,
        expected: &'static str,
    },
    #[error("Dataset group `{group}` already holds datasets on {location}")]
    LocationLocked {
        group: String,
        location: DataLocation,
    },
    #[error("Dataset group `{group}` was built for a different mesh")]
    ForeignGroup { group: String },
    #[error("Dataset was built for a different mesh than group `{group}`")]
    ForeignDataset { group: String },
    #[error("Dataset index {index} out of range for a group of {len} datasets")]
    DatasetIndex { index: usize, len: usize },
    #[cfg(feature = "memory")]
    #[error("In-memory arrays have incompatible shapes: `{0}`")]
    Shape(#[from] ndarray::ShapeError),
}

pub type Result<T> = std::result::Result<T, Error>;
