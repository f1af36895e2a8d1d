//! Small value types carried by meshes, groups and datasets.

use derive_more::{Constructor, Deref};
use num_traits::Float;

/// Planar extent of a mesh. Fixed when the mesh is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Constructor)]
pub struct BBox {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl BBox {
    /// Compute the extent of an interleaved coordinate buffer where each vertex
    /// occupies `ordinates` consecutive values (x first, then y).
    ///
    /// An empty buffer has no extent and yields a box of NaN.
    pub fn from_coordinates(coordinates: &[f64], ordinates: usize) -> Self {
        if ordinates < 2 || coordinates.len() < ordinates {
            return BBox::new(f64::NAN, f64::NAN, f64::NAN, f64::NAN);
        }

        coordinates.chunks_exact(ordinates).fold(
            BBox::new(f64::MAX, -f64::MAX, f64::MAX, -f64::MAX),
            |bbox, vertex| BBox {
                min_x: bbox.min_x.min(vertex[0]),
                max_x: bbox.max_x.max(vertex[0]),
                min_y: bbox.min_y.min(vertex[1]),
                max_y: bbox.max_y.max(vertex[1]),
            },
        )
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Minimum and maximum of a dataset or a whole group.
///
/// Both fields start as NaN, meaning "not computed yet". This keeps an unset pair
/// distinguishable from a dataset whose values are genuinely all zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Statistics {
    pub minimum: f64,
    pub maximum: f64,
}

impl Default for Statistics {
    fn default() -> Self {
        Self {
            minimum: f64::NAN,
            maximum: f64::NAN,
        }
    }
}

impl Statistics {
    pub fn new(minimum: f64, maximum: f64) -> Self {
        Self { minimum, maximum }
    }

    /// `true` once both ends of the range hold a computed value
    pub fn is_set(&self) -> bool {
        !self.minimum.is_nan() && !self.maximum.is_nan()
    }

    /// Widen this range to cover `other`. Unset ends are ignored.
    pub fn merge(self, other: Statistics) -> Statistics {
        Statistics {
            minimum: self.minimum.min(other.minimum),
            maximum: self.maximum.max(other.maximum),
        }
    }

    /// Range of a sequence of values, skipping NaN entries. An empty (or all NaN)
    /// sequence gives unset statistics.
    pub fn from_values<I, NUM>(values: I) -> Statistics
    where
        I: IntoIterator<Item = NUM>,
        NUM: Float + Into<f64>,
    {
        values
            .into_iter()
            .filter(|value| !value.is_nan())
            .fold(Statistics::default(), |stats, value| {
                let value: f64 = value.into();
                stats.merge(Statistics::new(value, value))
            })
    }
}

/// Ordered list of `(key, value)` string pairs.
///
/// This is an append log rather than a map: setting a key twice keeps both pairs
/// in insertion order, and lookups return the most recently appended value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref)]
pub struct Metadata(Vec<(String, String)>);

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pair, even if `key` is already present.
    pub fn push<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.0.push((key.into(), value.into()));
    }

    /// Value of the last pair appended under `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value.as_str())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Metadata {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut metadata = Metadata::new();
        for (key, value) in iter {
            metadata.push(key, value);
        }
        metadata
    }
}
