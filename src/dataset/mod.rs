//! # Datasets
//!
//! A [`Dataset`] holds one time step of one variable over a mesh. It has one of two
//! shapes, fixed when it is built:
//!
//! * **2D**: one value per vertex or per face, depending on the
//!   [`DataLocation`] of its group. The values come from a driver's
//!   [`FlatValues`](crate::FlatValues).
//! * **3D**: one value per volume, a vertical layer below a face. The number of
//!   volumes and the largest number of layers under a single face are fixed at
//!   construction. The values come from a driver's
//!   [`VolumeValues`](crate::VolumeValues).
//!
//! Every accessor can be called on every dataset. The volumetric accessors of a 2D
//! dataset produce nothing, and the scalar / vector accessors of a 3D dataset read
//! the volume index space.
//!
//! ## Reading values
//!
//! All accessors fill a caller-owned buffer with a window of items and return the
//! number of items written. Vector accessors use two buffer slots per item. A
//! window that starts at or beyond the end produces zero items, which is also how
//! the end of a dataset is reported:
//!
//! ```ignore
//! let mut buffer = vec![0.0; 1024];
//! let mut start = 0;
//! loop {
//!     let read = dataset.scalar_data(start, buffer.len(), &mut buffer);
//!     if read == 0 {
//!         break;
//!     }
//!     consume(&buffer[..read]);
//!     start += read;
//! }
//! ```
//!
//! Check [`Dataset::is_valid`] before trusting anything read from a dataset. An
//! invalid dataset produces zero items from every accessor.

mod dim_2;
mod dim_3;

use crate::data::Statistics;
use crate::mesh::MeshCounts;
use crate::time::{RelativeTimestamp, TimeUnit};
use crate::traits::{FlatValues, VolumeValues};
use crate::utils::window_len;
use crate::DatasetGroup;

/// Window used when draining a dataset to compute its statistics
const STATISTICS_WINDOW: usize = 1000;

/// Which mesh elements the values of a group are defined on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, derive_more::Display)]
pub enum DataLocation {
    #[default]
    #[display(fmt = "vertices (2D)")]
    OnVertices2D,
    #[display(fmt = "faces (2D)")]
    OnFaces2D,
    #[display(fmt = "volumes (3D)")]
    OnVolumes3D,
}

impl DataLocation {
    pub fn is_volumetric(self) -> bool {
        self == DataLocation::OnVolumes3D
    }
}

/// Shape of a dataset, fixed at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetShape {
    Flat,
    Volumetric {
        volumes: usize,
        maximum_vertical_levels: usize,
    },
}

enum Values {
    Flat(Box<dyn FlatValues>),
    Volumetric {
        volumes: usize,
        maximum_vertical_levels: usize,
        values: Box<dyn VolumeValues>,
    },
}

/// One time step of one variable.
///
/// A dataset does not point back at the group that owns it. Instead it keeps a
/// copy of the few facts it needs from its parents: where its values live and the
/// element counts of the mesh.
pub struct Dataset {
    location: DataLocation,
    mesh: MeshCounts,
    values: Values,
    time: RelativeTimestamp,
    is_scalar: bool,
    is_valid: bool,
    supports_active_flag: bool,
    statistics: Statistics,
}

impl Dataset {
    /// Build a 2D dataset for `group`. Its values are indexed per vertex or per face
    /// following the group's data location.
    pub fn new_2d<V>(group: &DatasetGroup, values: V) -> Self
    where
        V: FlatValues + 'static,
    {
        Self::with_values(group, Values::Flat(Box::new(values)))
    }

    /// Build a 3D dataset for `group` with a fixed number of volumes and a fixed
    /// maximum number of vertical levels under a single face.
    ///
    /// A 3D dataset needs at least one vertical level; one built without any is
    /// marked invalid.
    pub fn new_3d<V>(
        group: &DatasetGroup,
        volumes: usize,
        maximum_vertical_levels: usize,
        values: V,
    ) -> Self
    where
        V: VolumeValues + 'static,
    {
        debug_assert!(
            maximum_vertical_levels > 0,
            "3D dataset without vertical levels"
        );

        let mut dataset = Self::with_values(
            group,
            Values::Volumetric {
                volumes,
                maximum_vertical_levels,
                values: Box::new(values),
            },
        );
        dataset.is_valid = maximum_vertical_levels > 0;
        dataset
    }

    fn with_values(group: &DatasetGroup, values: Values) -> Self {
        Self {
            location: group.data_location(),
            mesh: group.mesh_counts(),
            values,
            time: RelativeTimestamp::default(),
            is_scalar: group.is_scalar(),
            is_valid: true,
            supports_active_flag: false,
            statistics: Statistics::default(),
        }
    }

    pub fn shape(&self) -> DatasetShape {
        match &self.values {
            Values::Flat(_) => DatasetShape::Flat,
            Values::Volumetric {
                volumes,
                maximum_vertical_levels,
                ..
            } => DatasetShape::Volumetric {
                volumes: *volumes,
                maximum_vertical_levels: *maximum_vertical_levels,
            },
        }
    }

    /// Data location of the group this dataset was built for
    pub fn data_location(&self) -> DataLocation {
        self.location
    }

    pub(crate) fn mesh_counts(&self) -> MeshCounts {
        self.mesh
    }

    /// Number of items the scalar and vector accessors cover
    pub fn values_count(&self) -> usize {
        match self.location {
            DataLocation::OnVertices2D => self.mesh.vertices,
            DataLocation::OnFaces2D => self.mesh.faces,
            DataLocation::OnVolumes3D => self.volumes_count(),
        }
    }

    /// Number of volumes, zero for a 2D dataset
    pub fn volumes_count(&self) -> usize {
        match &self.values {
            Values::Flat(_) => 0,
            Values::Volumetric { volumes, .. } => *volumes,
        }
    }

    /// Largest number of vertical levels under a face, zero for a 2D dataset
    pub fn maximum_vertical_levels_count(&self) -> usize {
        match &self.values {
            Values::Flat(_) => 0,
            Values::Volumetric {
                maximum_vertical_levels,
                ..
            } => *maximum_vertical_levels,
        }
    }

    /// Whether the values are scalars or `(x, y)` vectors. Defaults to the kind of
    /// the group the dataset was built for.
    pub fn is_scalar(&self) -> bool {
        self.is_scalar
    }

    pub fn set_is_scalar(&mut self, is_scalar: bool) {
        self.is_scalar = is_scalar;
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// Mark whether the driver managed to fully build this dataset
    pub fn set_valid(&mut self, is_valid: bool) {
        self.is_valid = is_valid;
    }

    pub fn supports_active_flag(&self) -> bool {
        self.supports_active_flag
    }

    pub fn set_supports_active_flag(&mut self, supports: bool) {
        self.supports_active_flag = supports;
    }

    pub fn statistics(&self) -> Statistics {
        self.statistics
    }

    pub fn set_statistics(&mut self, statistics: Statistics) {
        self.statistics = statistics;
    }

    /// Offset from the group's reference time, expressed in `unit`
    pub fn time(&self, unit: TimeUnit) -> f64 {
        self.time.value(unit)
    }

    pub fn relative_time(&self) -> RelativeTimestamp {
        self.time
    }

    pub fn set_time(&mut self, time: f64, unit: TimeUnit) {
        self.time = RelativeTimestamp::new(time, unit);
    }

    pub fn set_relative_time(&mut self, time: RelativeTimestamp) {
        self.time = time;
    }

    /// Compute the value range by draining the dataset. Vector datasets are
    /// measured by the magnitude of each vector. NaN values are skipped.
    ///
    /// Nothing is cached: store the result with [`Dataset::set_statistics`].
    pub fn calculate_statistics(&self, is_scalar: bool) -> Statistics {
        let stride = if is_scalar { 1 } else { 2 };
        let mut buffer = vec![0.0; STATISTICS_WINDOW * stride];
        let mut stats = Statistics::default();
        let mut start = 0;

        loop {
            let read = if is_scalar {
                self.scalar_data(start, STATISTICS_WINDOW, &mut buffer)
            } else {
                self.vector_data(start, STATISTICS_WINDOW, &mut buffer)
            };

            if read == 0 {
                break;
            }

            let window = &buffer[..read * stride];
            let window_stats = if is_scalar {
                Statistics::from_values(window.iter().copied())
            } else {
                Statistics::from_values(window.chunks_exact(2).map(|v| v[0].hypot(v[1])))
            };

            stats = stats.merge(window_stats);
            start += read;
        }

        stats
    }

    /// Clamp a read window and hand it to the driver.
    ///
    /// `stride` is the number of buffer slots per item and `bound` the number of
    /// items in the index space being read.
    fn read_window<T, F>(
        &self,
        start: usize,
        count: usize,
        stride: usize,
        bound: usize,
        buffer: &mut [T],
        read: F,
    ) -> usize
    where
        F: FnOnce(usize, &mut [T]) -> usize,
    {
        if !self.is_valid {
            return 0;
        }

        let items = window_len(start, count, bound, buffer.len() / stride);
        if items == 0 {
            return 0;
        }

        let produced = read(start, &mut buffer[..items * stride]);
        if produced > items {
            log::warn!(
                "driver produced {} items for a window of {}, ignoring the excess",
                produced,
                items
            );
        }

        produced.min(items)
    }
}

impl std::fmt::Debug for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dataset")
            .field("location", &self.location)
            .field("shape", &self.shape())
            .field("time", &self.time)
            .field("is_scalar", &self.is_scalar)
            .field("is_valid", &self.is_valid)
            .field("supports_active_flag", &self.supports_active_flag)
            .field("statistics", &self.statistics)
            .finish()
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{Columns, Ramp, VOLUMES};
    use super::*;
    use crate::mesh::testing::square_mesh;
    use approx::assert_relative_eq;

    fn group(location: DataLocation) -> DatasetGroup {
        let mesh = square_mesh();
        let mut group = DatasetGroup::new("test", &mesh, "memory://", "depth");
        group.set_data_location(location).unwrap();
        group
    }

    fn drain(dataset: &Dataset, window: usize) -> Vec<f64> {
        let mut buffer = vec![0.0; window];
        let mut out = Vec::new();
        let mut start = 0;
        loop {
            let read = dataset.scalar_data(start, window, &mut buffer);
            if read == 0 {
                break;
            }
            out.extend_from_slice(&buffer[..read]);
            start += read;
        }
        out
    }

    #[test]
    fn flat_shape_has_no_volumes() {
        let dataset = Dataset::new_2d(&group(DataLocation::OnVertices2D), Ramp);
        assert_eq!(dataset.shape(), DatasetShape::Flat);
        assert_eq!(dataset.volumes_count(), 0);
        assert_eq!(dataset.maximum_vertical_levels_count(), 0);

        let mut levels = [0usize; 4];
        let mut values = [0.0; 4];
        assert_eq!(dataset.vertical_level_count_data(0, 4, &mut levels), 0);
        assert_eq!(dataset.face_to_volume_data(0, 4, &mut levels), 0);
        assert_eq!(dataset.vertical_level_data(0, 4, &mut values), 0);
        assert_eq!(dataset.scalar_volumes_data(0, 4, &mut values), 0);
        assert_eq!(dataset.vector_volumes_data(0, 2, &mut values), 0);
    }

    #[test]
    fn values_count_follows_location() {
        let on_vertices = Dataset::new_2d(&group(DataLocation::OnVertices2D), Ramp);
        assert_eq!(on_vertices.values_count(), 5);

        let on_faces = Dataset::new_2d(&group(DataLocation::OnFaces2D), Ramp);
        assert_eq!(on_faces.values_count(), 4);

        let on_volumes = Dataset::new_3d(&group(DataLocation::OnVolumes3D), VOLUMES, 3, Columns);
        assert_eq!(on_volumes.values_count(), 6);
    }

    #[test]
    fn drain_in_uneven_windows() {
        let dataset = Dataset::new_2d(&group(DataLocation::OnVertices2D), Ramp);
        let expected = vec![0.0, 1.0, 2.0, 3.0, 4.0];

        for window in 1..8 {
            assert_eq!(drain(&dataset, window), expected);
        }
    }

    #[test]
    fn start_past_end_reads_nothing() {
        let dataset = Dataset::new_2d(&group(DataLocation::OnFaces2D), Ramp);
        let mut buffer = [0.0; 8];
        assert_eq!(dataset.scalar_data(4, 2, &mut buffer), 0);
        assert_eq!(dataset.scalar_data(100, 2, &mut buffer), 0);
        assert_eq!(dataset.vector_data(4, 2, &mut buffer), 0);
    }

    #[test]
    fn request_clamped_to_buffer() {
        let dataset = Dataset::new_2d(&group(DataLocation::OnVertices2D), Ramp);
        let mut buffer = [0.0; 3];
        assert_eq!(dataset.scalar_data(0, 5, &mut buffer), 3);
        // three slots hold a single vector
        assert_eq!(dataset.vector_data(0, 5, &mut buffer), 1);
        assert_eq!(&buffer[..2], &[0.0, 0.0]);
    }

    #[test]
    fn vector_pairs_are_interleaved() {
        let dataset = Dataset::new_2d(&group(DataLocation::OnVertices2D), Ramp);
        let mut buffer = [0.0; 6];
        assert_eq!(dataset.vector_data(2, 3, &mut buffer), 3);
        assert_eq!(buffer, [2.0, -2.0, 3.0, -3.0, 4.0, -4.0]);
    }

    #[test]
    fn invalid_dataset_reads_nothing() {
        let mut dataset = Dataset::new_2d(&group(DataLocation::OnVertices2D), Ramp);
        dataset.set_valid(false);
        assert!(!dataset.is_valid());

        let mut buffer = [0.0; 4];
        assert_eq!(dataset.scalar_data(0, 4, &mut buffer), 0);
    }

    #[test]
    fn active_flags_default_to_all_active() {
        let dataset = Dataset::new_2d(&group(DataLocation::OnVertices2D), Ramp);
        assert!(!dataset.supports_active_flag());

        let mut flags = [false; 10];
        // active flags are per face, the square mesh has four
        assert_eq!(dataset.active_data(0, 10, &mut flags), 4);
        assert!(flags[..4].iter().all(|active| *active));
    }

    #[test]
    fn volumetric_accessors() {
        let dataset = Dataset::new_3d(&group(DataLocation::OnVolumes3D), VOLUMES, 3, Columns);
        assert_eq!(
            dataset.shape(),
            DatasetShape::Volumetric {
                volumes: 6,
                maximum_vertical_levels: 3
            }
        );

        let mut counts = [0usize; 8];
        assert_eq!(dataset.vertical_level_count_data(0, 8, &mut counts), 4);
        assert_eq!(&counts[..4], &[2, 3, 0, 1]);
        assert_eq!(dataset.face_to_volume_data(1, 8, &mut counts), 3);
        assert_eq!(&counts[..3], &[2, 5, 5]);

        // extrusion levels cover volumes + faces
        let mut levels = [0.0; 16];
        assert_eq!(dataset.vertical_level_data(0, 16, &mut levels), 10);

        let mut values = [0.0; 8];
        assert_eq!(dataset.scalar_volumes_data(3, 8, &mut values), 3);
        assert_eq!(&values[..3], &[30.0, 40.0, 50.0]);

        // scalar_data reads the volume index space on a 3D dataset
        assert_eq!(dataset.scalar_data(3, 8, &mut values), 3);
        assert_eq!(&values[..3], &[30.0, 40.0, 50.0]);

        assert_eq!(dataset.vector_data(5, 4, &mut values), 1);
        assert_eq!(&values[..2], &[15.0, 20.0]);
    }

    #[test]
    #[cfg_attr(
        debug_assertions,
        should_panic(expected = "3D dataset without vertical levels")
    )]
    fn volumes_without_levels_are_invalid() {
        let dataset = Dataset::new_3d(&group(DataLocation::OnVolumes3D), 0, 0, Columns);
        assert!(!dataset.is_valid());
    }

    #[test]
    fn kind_defaults_to_group() {
        let mut vectors = group(DataLocation::OnFaces2D);
        vectors.set_is_scalar(false);
        assert!(!Dataset::new_2d(&vectors, Ramp).is_scalar());

        let mut dataset = Dataset::new_2d(&group(DataLocation::OnFaces2D), Ramp);
        assert!(dataset.is_scalar());
        dataset.set_is_scalar(false);
        assert!(!dataset.is_scalar());
    }

    #[test]
    fn statistics_are_explicit() {
        let mut dataset = Dataset::new_2d(&group(DataLocation::OnVertices2D), Ramp);
        assert!(!dataset.statistics().is_set());

        dataset.set_statistics(Statistics::new(2.5, 9.0));
        assert_eq!(dataset.statistics(), Statistics::new(2.5, 9.0));
    }

    #[test]
    fn calculated_statistics() {
        let dataset = Dataset::new_2d(&group(DataLocation::OnVertices2D), Ramp);
        assert_eq!(dataset.calculate_statistics(true), Statistics::new(0.0, 4.0));

        let magnitudes = dataset.calculate_statistics(false);
        assert_relative_eq!(magnitudes.minimum, 0.0);
        assert_relative_eq!(magnitudes.maximum, 4.0 * 2f64.sqrt());

        let volumes = Dataset::new_3d(&group(DataLocation::OnVolumes3D), VOLUMES, 3, Columns);
        let magnitudes = volumes.calculate_statistics(false);
        assert_relative_eq!(magnitudes.maximum, 25.0);
    }

    #[test]
    fn time_in_units() {
        let mut dataset = Dataset::new_2d(&group(DataLocation::OnVertices2D), Ramp);
        dataset.set_time(90.0, TimeUnit::Minutes);
        assert_relative_eq!(dataset.time(TimeUnit::Hours), 1.5);
        assert_eq!(
            dataset.relative_time(),
            RelativeTimestamp::new(5400.0, TimeUnit::Seconds)
        );
    }
}
