use super::{Dataset, Values};

impl Dataset {
    /// Read up to `count` scalar values starting at item `start`.
    ///
    /// For a 2D dataset the items are the vertices or faces of the mesh. For a 3D
    /// dataset this reads volumes, exactly like [`Dataset::scalar_volumes_data`].
    pub fn scalar_data(&self, start: usize, count: usize, buffer: &mut [f64]) -> usize {
        match &self.values {
            Values::Flat(values) => {
                let bound = self.values_count();
                self.read_window(start, count, 1, bound, buffer, |start, window| {
                    values.scalar_data(start, window)
                })
            }
            Values::Volumetric { .. } => self.scalar_volumes_data(start, count, buffer),
        }
    }

    /// Read up to `count` vectors starting at item `start`. Each vector takes two
    /// consecutive slots of `buffer`.
    ///
    /// For a 3D dataset this reads volumes, exactly like
    /// [`Dataset::vector_volumes_data`].
    pub fn vector_data(&self, start: usize, count: usize, buffer: &mut [f64]) -> usize {
        match &self.values {
            Values::Flat(values) => {
                let bound = self.values_count();
                self.read_window(start, count, 2, bound, buffer, |start, window| {
                    values.vector_data(start, window)
                })
            }
            Values::Volumetric { .. } => self.vector_volumes_data(start, count, buffer),
        }
    }

    /// Read up to `count` per-face active flags starting at face `start`.
    ///
    /// When the dataset does not support active flags every face is reported
    /// active.
    pub fn active_data(&self, start: usize, count: usize, buffer: &mut [bool]) -> usize {
        let bound = self.mesh.faces;

        if !self.supports_active_flag {
            return self.read_window(start, count, 1, bound, buffer, |_, window| {
                window.fill(true);
                window.len()
            });
        }

        self.read_window(start, count, 1, bound, buffer, |start, window| {
            match &self.values {
                Values::Flat(values) => values.active_data(start, window),
                Values::Volumetric { values, .. } => values.active_data(start, window),
            }
        })
    }
}
