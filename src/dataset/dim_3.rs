use super::{Dataset, Values};
use crate::traits::VolumeValues;

impl Dataset {
    /// Hand a window to the volumetric driver. 2D datasets produce nothing.
    fn read_volumes<T, F>(
        &self,
        start: usize,
        count: usize,
        stride: usize,
        bound: impl FnOnce(usize) -> usize,
        buffer: &mut [T],
        read: F,
    ) -> usize
    where
        F: FnOnce(&dyn VolumeValues, usize, &mut [T]) -> usize,
    {
        match &self.values {
            Values::Flat(_) => 0,
            Values::Volumetric {
                volumes, values, ..
            } => self.read_window(start, count, stride, bound(*volumes), buffer, |start, window| {
                read(&**values, start, window)
            }),
        }
    }

    /// Number of vertical levels under each face, starting at face `start`
    pub fn vertical_level_count_data(
        &self,
        start: usize,
        count: usize,
        buffer: &mut [usize],
    ) -> usize {
        let faces = self.mesh.faces;
        self.read_volumes(start, count, 1, |_| faces, buffer, |values, start, window| {
            values.vertical_level_count_data(start, window)
        })
    }

    /// Extrusion levels bounding the volumes. Each face contributes one level more
    /// than it has volumes, so there are `volumes + faces` values.
    pub fn vertical_level_data(&self, start: usize, count: usize, buffer: &mut [f64]) -> usize {
        let faces = self.mesh.faces;
        self.read_volumes(
            start,
            count,
            1,
            |volumes| volumes + faces,
            buffer,
            |values, start, window| values.vertical_level_data(start, window),
        )
    }

    /// Index of the first volume below each face, starting at face `start`
    pub fn face_to_volume_data(&self, start: usize, count: usize, buffer: &mut [usize]) -> usize {
        let faces = self.mesh.faces;
        self.read_volumes(start, count, 1, |_| faces, buffer, |values, start, window| {
            values.face_to_volume_data(start, window)
        })
    }

    /// One scalar per volume, starting at volume `start`
    pub fn scalar_volumes_data(&self, start: usize, count: usize, buffer: &mut [f64]) -> usize {
        self.read_volumes(
            start,
            count,
            1,
            |volumes| volumes,
            buffer,
            |values, start, window| values.scalar_volumes_data(start, window),
        )
    }

    /// One vector per volume as two consecutive slots, starting at volume `start`
    pub fn vector_volumes_data(&self, start: usize, count: usize, buffer: &mut [f64]) -> usize {
        self.read_volumes(
            start,
            count,
            2,
            |volumes| volumes,
            buffer,
            |values, start, window| values.vector_volumes_data(start, window),
        )
    }
}
