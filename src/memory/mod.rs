//! # In-memory driver
//!
//! Meshes and datasets held entirely in [`ndarray`] arrays. This is the driver to
//! reach for when the data was computed rather than read from a file, and it is
//! the reference for how a format driver satisfies the buffer-fill contract.
//!
//! ```
//! use meshdata::prelude::*;
//! use ndarray::{array, Array1};
//!
//! let vertices = array![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
//! let mut mesh = MemoryMesh::new(vertices, vec![vec![0, 1, 2]]).into_mesh("memory://triangle");
//!
//! let mut group = DatasetGroup::new("memory", &mesh, "memory://triangle", "depth");
//! group.start_editing()?;
//! let depth = MemoryValues::scalar(Array1::from(vec![1.0_f32, 2.0, 3.0]));
//! let dataset = depth.into_dataset(&group);
//! group.add_dataset(dataset)?;
//! group.stop_editing()?;
//! mesh.add_dataset_group(group)?;
//!
//! assert_eq!(mesh.group("depth").unwrap().statistics(), Statistics::new(1.0, 3.0));
//! # Ok::<(), meshdata::Error>(())
//! ```

mod mesh;
mod values;

pub use mesh::MemoryMesh;
pub use values::{MemoryValues, MemoryVolumes};

use ndarray::{s, Array1, Array2};
use num_traits::AsPrimitive;

/// Name reported as the driver of everything built by this module
pub const DRIVER_NAME: &str = "memory";

/// Copy rows of `values` starting at `start` into `buffer`, one row per
/// `values.ncols()` slots
fn fill_rows<NUM>(values: &Array2<NUM>, start: usize, buffer: &mut [f64]) -> usize
where
    NUM: AsPrimitive<f64>,
{
    let components = values.ncols().max(1);
    let count = (buffer.len() / components).min(values.nrows().saturating_sub(start));
    if count == 0 {
        return 0;
    }

    let rows = values.slice(s![start..start + count, ..]);
    for (row, out) in rows.rows().into_iter().zip(buffer.chunks_exact_mut(components)) {
        for (slot, value) in out.iter_mut().zip(row.iter()) {
            *slot = value.as_();
        }
    }

    count
}

/// Copy `source[start..]` into `buffer`
fn copy_from<T: Copy>(source: &Array1<T>, start: usize, buffer: &mut [T]) -> usize {
    let count = buffer.len().min(source.len().saturating_sub(start));
    if count == 0 {
        return 0;
    }

    for (slot, value) in buffer.iter_mut().zip(source.slice(s![start..start + count])) {
        *slot = *value;
    }

    count
}
