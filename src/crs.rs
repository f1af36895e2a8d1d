//! Coordinate reference system assignment.
//!
//! A mesh stores a single CRS string. Drivers hand it one of several input
//! representations and a [`CrsNormalizer`] turns that into the stored string.
//! Projection mathematics live outside this crate: a normalizer backed by a real
//! geodesy library can be installed per mesh with
//! [`Mesh::set_crs_normalizer`](crate::Mesh::set_crs_normalizer).

use std::path::PathBuf;

/// One of the accepted ways to describe a coordinate reference system
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrsDefinition {
    /// A string already in the canonical form
    Normalized(String),
    /// Well-known text
    Wkt(String),
    /// EPSG registry code
    Epsg(i32),
    /// Path to an external projection definition (`.prj`) file
    ProjFile(PathBuf),
}

/// Turns a [`CrsDefinition`] into the canonical string stored on a mesh.
pub trait CrsNormalizer: Send + Sync {
    fn normalize(&self, definition: &CrsDefinition) -> crate::Result<String>;
}

/// Normalizer that performs no projection lookups.
///
/// Strings and WKT are trimmed, EPSG codes become `EPSG:<code>` and projection
/// files are read and trimmed.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainCrs;

impl CrsNormalizer for PlainCrs {
    fn normalize(&self, definition: &CrsDefinition) -> crate::Result<String> {
        let crs = match definition {
            CrsDefinition::Normalized(crs) | CrsDefinition::Wkt(crs) => crs.trim().to_string(),
            CrsDefinition::Epsg(code) => format!("EPSG:{code}"),
            CrsDefinition::ProjFile(path) => std::fs::read_to_string(path)?.trim().to_string(),
        };

        Ok(crs)
    }
}
