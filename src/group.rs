use chrono::{DateTime, Utc};

use crate::data::{Metadata, Statistics};
use crate::dataset::{DataLocation, Dataset, DatasetShape};
use crate::mesh::{Mesh, MeshCounts};
use crate::{Error, Result};

/// Metadata key holding the name of a group
const NAME_KEY: &str = "name";

/// Whether the datasets of a group may currently be added or removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditState {
    #[default]
    Closed,
    Editing,
}

/// One named variable (depth, velocity, ...) over a sequence of time steps.
///
/// Datasets can only be added or removed between [`DatasetGroup::start_editing`]
/// and [`DatasetGroup::stop_editing`]. Closing the edit session computes the
/// statistics of the new datasets and of the whole group.
#[derive(Debug)]
pub struct DatasetGroup {
    driver_name: String,
    mesh: MeshCounts,
    uri: String,
    is_scalar: bool,
    data_location: DataLocation,
    reference_time: Option<DateTime<Utc>>,
    metadata: Metadata,
    statistics: Statistics,
    state: EditState,
    datasets: Vec<Dataset>,
}

impl DatasetGroup {
    /// Create an empty scalar group on the vertices of `mesh`.
    ///
    /// The group is not part of the mesh until it is passed to
    /// [`Mesh::add_dataset_group`].
    pub fn new(driver_name: &str, mesh: &Mesh, uri: &str, name: &str) -> Self {
        let mut group = Self {
            driver_name: driver_name.to_string(),
            mesh: mesh.counts(),
            uri: uri.to_string(),
            is_scalar: true,
            data_location: DataLocation::default(),
            reference_time: None,
            metadata: Metadata::new(),
            statistics: Statistics::default(),
            state: EditState::default(),
            datasets: Vec::new(),
        };
        group.set_name(name);
        group
    }

    /// Name of the driver that produced this group
    pub fn driver_name(&self) -> &str {
        &self.driver_name
    }

    /// File or uri the group was read from
    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub(crate) fn mesh_counts(&self) -> MeshCounts {
        self.mesh
    }

    pub fn name(&self) -> &str {
        self.metadata.get(NAME_KEY).unwrap_or_default()
    }

    pub fn set_name(&mut self, name: &str) {
        self.set_metadata(NAME_KEY, name);
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Latest value stored under `key`
    pub fn get_metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key)
    }

    /// Append a metadata pair. Earlier pairs with the same key are kept.
    pub fn set_metadata(&mut self, key: &str, value: &str) {
        self.metadata.push(key, value);
    }

    pub fn is_scalar(&self) -> bool {
        self.is_scalar
    }

    pub fn set_is_scalar(&mut self, is_scalar: bool) {
        self.is_scalar = is_scalar;
    }

    pub fn data_location(&self) -> DataLocation {
        self.data_location
    }

    /// Change where the values of this group live. Only allowed while the group
    /// holds no datasets.
    pub fn set_data_location(&mut self, location: DataLocation) -> Result<()> {
        if !self.datasets.is_empty() && location != self.data_location {
            return Err(Error::LocationLocked {
                group: self.name().to_string(),
                location: self.data_location,
            });
        }

        self.data_location = location;
        Ok(())
    }

    pub fn reference_time(&self) -> Option<DateTime<Utc>> {
        self.reference_time
    }

    pub fn set_reference_time(&mut self, reference_time: DateTime<Utc>) {
        self.reference_time = Some(reference_time);
    }

    /// Absolute time of the dataset at `index`, if the group has a reference time
    /// and the offset stays within the representable dates
    pub fn absolute_time(&self, index: usize) -> Option<DateTime<Utc>> {
        let reference = self.reference_time.as_ref()?;
        let dataset = self.datasets.get(index)?;
        dataset.relative_time().after(reference)
    }

    pub fn statistics(&self) -> Statistics {
        self.statistics
    }

    pub fn set_statistics(&mut self, statistics: Statistics) {
        self.statistics = statistics;
    }

    /// Largest number of vertical levels of any dataset in the group, zero when
    /// the group holds no 3D datasets
    pub fn maximum_vertical_levels_count(&self) -> usize {
        self.datasets
            .iter()
            .map(Dataset::maximum_vertical_levels_count)
            .max()
            .unwrap_or(0)
    }

    pub fn datasets(&self) -> &[Dataset] {
        &self.datasets
    }

    pub fn datasets_count(&self) -> usize {
        self.datasets.len()
    }

    pub fn dataset(&self, index: usize) -> Option<&Dataset> {
        self.datasets.get(index)
    }

    pub fn dataset_mut(&mut self, index: usize) -> Option<&mut Dataset> {
        self.datasets.get_mut(index)
    }

    pub fn edit_state(&self) -> EditState {
        self.state
    }

    pub fn is_in_edit_mode(&self) -> bool {
        self.state == EditState::Editing
    }

    pub fn start_editing(&mut self) -> Result<()> {
        if self.state == EditState::Editing {
            return Err(Error::AlreadyEditing {
                group: self.name().to_string(),
            });
        }

        self.state = EditState::Editing;
        Ok(())
    }

    /// Close the edit session.
    ///
    /// Valid datasets without statistics get them computed here, then the group
    /// statistics are recomputed once from all of its datasets.
    pub fn stop_editing(&mut self) -> Result<()> {
        self.ensure_editing()?;

        let is_scalar = self.is_scalar;
        let mut statistics = Statistics::default();

        for dataset in self.datasets.iter_mut().filter(|d| d.is_valid()) {
            if !dataset.statistics().is_set() {
                let computed = dataset.calculate_statistics(is_scalar);
                dataset.set_statistics(computed);
            }
            statistics = statistics.merge(dataset.statistics());
        }

        self.statistics = statistics;
        self.state = EditState::Closed;

        log::debug!(
            "closed editing of group `{}` with {} datasets, range {:?}",
            self.name(),
            self.datasets.len(),
            self.statistics
        );

        Ok(())
    }

    /// Append a dataset and return its index. The dataset must have been built for
    /// this group's mesh and data location, and hold the same kind of values.
    pub fn add_dataset(&mut self, dataset: Dataset) -> Result<usize> {
        self.ensure_editing()?;

        let volumetric = matches!(dataset.shape(), DatasetShape::Volumetric { .. });
        if dataset.data_location() != self.data_location
            || volumetric != self.data_location.is_volumetric()
        {
            return Err(Error::LocationMismatch {
                group: self.data_location,
                dataset: dataset.data_location(),
            });
        }

        if dataset.is_scalar() != self.is_scalar {
            return Err(Error::ValueKindMismatch {
                group: self.name().to_string(),
                expected: if self.is_scalar { "scalar" } else { "vector" },
            });
        }

        if dataset.mesh_counts() != self.mesh {
            return Err(Error::ForeignDataset {
                group: self.name().to_string(),
            });
        }

        self.datasets.push(dataset);
        Ok(self.datasets.len() - 1)
    }

    /// Remove and return the dataset at `index`
    pub fn remove_dataset(&mut self, index: usize) -> Result<Dataset> {
        self.ensure_editing()?;

        if index >= self.datasets.len() {
            return Err(Error::DatasetIndex {
                index,
                len: self.datasets.len(),
            });
        }

        Ok(self.datasets.remove(index))
    }

    fn ensure_editing(&self) -> Result<()> {
        match self.state {
            EditState::Editing => Ok(()),
            EditState::Closed => Err(Error::NotEditing {
                group: self.name().to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::testing::{Columns, Ramp, VOLUMES};
    use crate::mesh::testing::{square_mesh, triangle_mesh};
    use crate::time::TimeUnit;
    use chrono::TimeZone;

    fn depth() -> DatasetGroup {
        DatasetGroup::new("test", &square_mesh(), "memory://depth", "depth")
    }

    #[test]
    fn new_group_defaults() {
        let group = depth();
        assert_eq!(group.name(), "depth");
        assert_eq!(group.driver_name(), "test");
        assert_eq!(group.uri(), "memory://depth");
        assert!(group.is_scalar());
        assert_eq!(group.data_location(), DataLocation::OnVertices2D);
        assert_eq!(group.edit_state(), EditState::Closed);
        assert!(group.reference_time().is_none());
        assert!(!group.statistics().is_set());
        assert_eq!(group.maximum_vertical_levels_count(), 0);
    }

    #[test]
    fn metadata_appends_and_last_wins() {
        let mut group = depth();
        group.set_metadata("k", "v1");
        group.set_metadata("k", "v2");

        assert_eq!(group.get_metadata("k"), Some("v2"));
        assert_eq!(group.get_metadata("absent"), None);
        // the name is stored as metadata too
        assert_eq!(group.metadata().len(), 3);
        assert_eq!(group.metadata()[1], ("k".to_string(), "v1".to_string()));

        group.set_name("water depth");
        assert_eq!(group.name(), "water depth");
        assert_eq!(group.metadata().len(), 4);
    }

    #[test]
    fn mutations_require_edit_mode() {
        let mut group = depth();
        let dataset = Dataset::new_2d(&group, Ramp);

        assert!(matches!(
            group.add_dataset(dataset),
            Err(Error::NotEditing { .. })
        ));
        assert!(matches!(
            group.remove_dataset(0),
            Err(Error::NotEditing { .. })
        ));
        assert!(matches!(group.stop_editing(), Err(Error::NotEditing { .. })));

        group.start_editing().unwrap();
        assert!(group.is_in_edit_mode());
        assert!(matches!(
            group.start_editing(),
            Err(Error::AlreadyEditing { .. })
        ));
    }

    #[test]
    fn add_and_remove_while_editing() {
        let mut group = depth();
        group.start_editing().unwrap();

        for hour in 0..3 {
            let mut dataset = Dataset::new_2d(&group, Ramp);
            dataset.set_time(hour as f64, TimeUnit::Hours);
            assert_eq!(group.add_dataset(dataset).unwrap(), hour);
        }

        let removed = group.remove_dataset(1).unwrap();
        assert_eq!(removed.time(TimeUnit::Hours), 1.0);
        assert_eq!(group.datasets_count(), 2);
        assert_eq!(group.dataset(1).unwrap().time(TimeUnit::Hours), 2.0);

        assert!(matches!(
            group.remove_dataset(2),
            Err(Error::DatasetIndex { index: 2, len: 2 })
        ));

        group.stop_editing().unwrap();
        assert_eq!(group.edit_state(), EditState::Closed);
    }

    #[test]
    fn closing_computes_statistics() {
        let mut group = depth();
        group.start_editing().unwrap();
        group.add_dataset(Dataset::new_2d(&group, Ramp)).unwrap();

        let mut preset = Dataset::new_2d(&group, Ramp);
        preset.set_statistics(Statistics::new(-2.0, 1.0));
        group.add_dataset(preset).unwrap();

        let mut invalid = Dataset::new_2d(&group, Ramp);
        invalid.set_valid(false);
        invalid.set_statistics(Statistics::new(-100.0, 100.0));
        group.add_dataset(invalid).unwrap();

        // nothing is computed before editing closes
        assert!(!group.statistics().is_set());
        assert!(!group.dataset(0).unwrap().statistics().is_set());

        group.stop_editing().unwrap();
        assert_eq!(
            group.dataset(0).unwrap().statistics(),
            Statistics::new(0.0, 4.0)
        );
        assert_eq!(
            group.dataset(1).unwrap().statistics(),
            Statistics::new(-2.0, 1.0)
        );
        assert_eq!(group.statistics(), Statistics::new(-2.0, 4.0));
    }

    #[test]
    fn shape_must_match_location() {
        let mut group = depth();
        let mut volumes = depth();
        volumes.set_data_location(DataLocation::OnVolumes3D).unwrap();

        group.start_editing().unwrap();
        let dataset = Dataset::new_3d(&volumes, VOLUMES, 3, Columns);
        assert!(matches!(
            group.add_dataset(dataset),
            Err(Error::LocationMismatch {
                group: DataLocation::OnVertices2D,
                dataset: DataLocation::OnVolumes3D,
            })
        ));

        // a flat dataset cannot live on volumes either
        volumes.start_editing().unwrap();
        let flat = Dataset::new_2d(&volumes, Ramp);
        assert!(matches!(
            volumes.add_dataset(flat),
            Err(Error::LocationMismatch { .. })
        ));
    }

    #[test]
    fn value_kind_must_match() {
        let mut group = depth();
        group.start_editing().unwrap();

        let mut vectors = Dataset::new_2d(&group, Ramp);
        vectors.set_is_scalar(false);
        assert!(matches!(
            group.add_dataset(vectors),
            Err(Error::ValueKindMismatch {
                expected: "scalar",
                ..
            })
        ));

        group.set_is_scalar(false);
        let mut vectors = Dataset::new_2d(&group, Ramp);
        vectors.set_is_scalar(false);
        group.add_dataset(vectors).unwrap();
        group.stop_editing().unwrap();

        // vector statistics are measured on magnitudes
        let range = group.statistics();
        assert!(range.is_set());
        assert_eq!(range.minimum, 0.0);
    }

    #[test]
    fn location_locked_once_populated() {
        let mut group = depth();
        group.set_data_location(DataLocation::OnFaces2D).unwrap();
        group.start_editing().unwrap();
        group.add_dataset(Dataset::new_2d(&group, Ramp)).unwrap();

        assert!(matches!(
            group.set_data_location(DataLocation::OnVertices2D),
            Err(Error::LocationLocked { .. })
        ));
        assert!(group.set_data_location(DataLocation::OnFaces2D).is_ok());
    }

    #[test]
    fn datasets_from_other_meshes_rejected() {
        let mut group = depth();
        let other = DatasetGroup::new("test", &triangle_mesh(), "memory://", "depth");

        group.start_editing().unwrap();
        assert!(matches!(
            group.add_dataset(Dataset::new_2d(&other, Ramp)),
            Err(Error::ForeignDataset { .. })
        ));
    }

    #[test]
    fn maximum_levels_over_datasets() {
        let mut group = depth();
        group.set_data_location(DataLocation::OnVolumes3D).unwrap();
        group.start_editing().unwrap();
        group
            .add_dataset(Dataset::new_3d(&group, VOLUMES, 3, Columns))
            .unwrap();
        group
            .add_dataset(Dataset::new_3d(&group, VOLUMES, 7, Columns))
            .unwrap();
        group.stop_editing().unwrap();

        assert_eq!(group.maximum_vertical_levels_count(), 7);
    }

    #[test]
    fn absolute_times() {
        let mut group = depth();
        group.start_editing().unwrap();
        let mut dataset = Dataset::new_2d(&group, Ramp);
        dataset.set_time(30.0, TimeUnit::Minutes);
        group.add_dataset(dataset).unwrap();
        group.stop_editing().unwrap();

        assert!(group.absolute_time(0).is_none());

        let reference = Utc.with_ymd_and_hms(2021, 6, 1, 12, 0, 0).unwrap();
        group.set_reference_time(reference);
        assert_eq!(
            group.absolute_time(0),
            Some(Utc.with_ymd_and_hms(2021, 6, 1, 12, 30, 0).unwrap())
        );
        assert!(group.absolute_time(1).is_none());

        group.dataset_mut(0).unwrap().set_time(1.0e12, TimeUnit::Hours);
        assert!(group.absolute_time(0).is_none());
    }
}
