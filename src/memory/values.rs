use super::{copy_from, fill_rows};
use crate::prelude::*;
use crate::Result;

use ndarray::{stack, Array1, Array2, Axis, ErrorKind, ShapeError};
use num_traits::AsPrimitive;

/// Values of a 2D dataset held in memory.
///
/// Storage is generic over the numeric type so that single precision results do
/// not have to be widened up front. Scalars are stored as a single column, vectors
/// as an `(x, y)` column pair.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryValues<NUM> {
    values: Array2<NUM>,
    active: Option<Array1<bool>>,
}

impl<NUM> MemoryValues<NUM>
where
    NUM: AsPrimitive<f64> + Send + Sync,
{
    pub fn scalar(values: Array1<NUM>) -> Self {
        Self {
            values: values.insert_axis(Axis(1)),
            active: None,
        }
    }

    /// Vector values from their x and y components, which must have equal length
    pub fn vector(x: Array1<NUM>, y: Array1<NUM>) -> Result<Self> {
        let values = stack(Axis(1), &[x.view(), y.view()])?;
        Ok(Self {
            values,
            active: None,
        })
    }

    /// Attach per-face active flags
    pub fn with_active(mut self, active: Array1<bool>) -> Self {
        self.active = Some(active);
        self
    }

    pub fn is_scalar(&self) -> bool {
        self.values.ncols() == 1
    }

    pub fn len(&self) -> usize {
        self.values.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Build a 2D dataset for `group`. Active flag support is enabled when flags
    /// were attached.
    ///
    /// The dataset is marked invalid when the values do not cover every vertex or
    /// face of the group, or the flags do not cover every face of the mesh.
    pub fn into_dataset(self, group: &DatasetGroup) -> Dataset {
        let is_scalar = self.is_scalar();
        let len = self.len();
        let active = self.active.as_ref().map(|flags| flags.len());

        let mut dataset = Dataset::new_2d(group, self);
        dataset.set_is_scalar(is_scalar);
        dataset.set_supports_active_flag(active.is_some());

        let faces = dataset.mesh_counts().faces;
        if len != dataset.values_count() || active.map_or(false, |flags| flags != faces) {
            log::warn!(
                "{} values and {:?} active flags do not cover group `{}` on {}",
                len,
                active,
                group.name(),
                group.data_location()
            );
            dataset.set_valid(false);
        }

        dataset
    }
}

impl<NUM> FlatValues for MemoryValues<NUM>
where
    NUM: AsPrimitive<f64> + Send + Sync,
{
    fn scalar_data(&self, start: usize, buffer: &mut [f64]) -> usize {
        if !self.is_scalar() {
            return 0;
        }
        fill_rows(&self.values, start, buffer)
    }

    fn vector_data(&self, start: usize, buffer: &mut [f64]) -> usize {
        if self.is_scalar() {
            return 0;
        }
        fill_rows(&self.values, start, buffer)
    }

    fn active_data(&self, start: usize, buffer: &mut [bool]) -> usize {
        match &self.active {
            Some(active) => copy_from(active, start, buffer),
            None => {
                buffer.fill(true);
                buffer.len()
            }
        }
    }
}

/// Values of a layered 3D dataset held in memory.
///
/// Built from the number of volumes under each face; the index of the first volume
/// of each face follows from those counts. Extrusion levels hold one value more per
/// face than the face has volumes. At least one volume is required.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryVolumes<NUM> {
    level_counts: Array1<usize>,
    face_to_volume: Array1<usize>,
    vertical_levels: Array1<f64>,
    values: Array2<NUM>,
    active: Option<Array1<bool>>,
}

impl<NUM> MemoryVolumes<NUM>
where
    NUM: AsPrimitive<f64> + Send + Sync,
{
    pub fn scalar(
        level_counts: Array1<usize>,
        vertical_levels: Array1<f64>,
        values: Array1<NUM>,
    ) -> Result<Self> {
        Self::build(level_counts, vertical_levels, values.insert_axis(Axis(1)))
    }

    pub fn vector(
        level_counts: Array1<usize>,
        vertical_levels: Array1<f64>,
        x: Array1<NUM>,
        y: Array1<NUM>,
    ) -> Result<Self> {
        let values = stack(Axis(1), &[x.view(), y.view()])?;
        Self::build(level_counts, vertical_levels, values)
    }

    fn build(
        level_counts: Array1<usize>,
        vertical_levels: Array1<f64>,
        values: Array2<NUM>,
    ) -> Result<Self> {
        let volumes = level_counts.sum();

        if volumes == 0
            || values.nrows() != volumes || vertical_levels.len() != volumes + level_counts.len() {
            log::debug!(
                "{} volumes under {} faces do not fit {} values and {} levels",
                volumes,
                level_counts.len(),
                values.nrows(),
                vertical_levels.len()
            );
            return Err(ShapeError::from_kind(ErrorKind::IncompatibleShape).into());
        }

        let mut next = 0;
        let face_to_volume = level_counts.map(|count| {
            let first = next;
            next += count;
            first
        });

        Ok(Self {
            level_counts,
            face_to_volume,
            vertical_levels,
            values,
            active: None,
        })
    }

    /// Attach per-face active flags
    pub fn with_active(mut self, active: Array1<bool>) -> Self {
        self.active = Some(active);
        self
    }

    pub fn is_scalar(&self) -> bool {
        self.values.ncols() == 1
    }

    pub fn faces_count(&self) -> usize {
        self.level_counts.len()
    }

    pub fn volumes_count(&self) -> usize {
        self.values.nrows()
    }

    pub fn maximum_vertical_levels_count(&self) -> usize {
        self.level_counts.iter().copied().max().unwrap_or(0)
    }

    /// Build a 3D dataset for `group` sized after these volumes.
    ///
    /// The dataset is marked invalid when the level counts or the active flags do
    /// not cover every face of the mesh.
    pub fn into_dataset(self, group: &DatasetGroup) -> Dataset {
        let is_scalar = self.is_scalar();
        let columns = self.faces_count();
        let active = self.active.as_ref().map(|flags| flags.len());
        let volumes = self.volumes_count();
        let maximum_levels = self.maximum_vertical_levels_count();

        let mut dataset = Dataset::new_3d(group, volumes, maximum_levels, self);
        dataset.set_is_scalar(is_scalar);
        dataset.set_supports_active_flag(active.is_some());

        let faces = dataset.mesh_counts().faces;
        if columns != faces || active.map_or(false, |flags| flags != faces) {
            log::warn!(
                "{} columns and {:?} active flags do not cover the {} faces of group `{}`",
                columns,
                active,
                faces,
                group.name()
            );
            dataset.set_valid(false);
        }

        dataset
    }
}

impl<NUM> VolumeValues for MemoryVolumes<NUM>
where
    NUM: AsPrimitive<f64> + Send + Sync,
{
    fn vertical_level_count_data(&self, start: usize, buffer: &mut [usize]) -> usize {
        copy_from(&self.level_counts, start, buffer)
    }

    fn vertical_level_data(&self, start: usize, buffer: &mut [f64]) -> usize {
        copy_from(&self.vertical_levels, start, buffer)
    }

    fn face_to_volume_data(&self, start: usize, buffer: &mut [usize]) -> usize {
        copy_from(&self.face_to_volume, start, buffer)
    }

    fn scalar_volumes_data(&self, start: usize, buffer: &mut [f64]) -> usize {
        if !self.is_scalar() {
            return 0;
        }
        fill_rows(&self.values, start, buffer)
    }

    fn vector_volumes_data(&self, start: usize, buffer: &mut [f64]) -> usize {
        if self.is_scalar() {
            return 0;
        }
        fill_rows(&self.values, start, buffer)
    }

    fn active_data(&self, start: usize, buffer: &mut [bool]) -> usize {
        match &self.active {
            Some(active) => copy_from(active, start, buffer),
            None => {
                buffer.fill(true);
                buffer.len()
            }
        }
    }
}
