//! # Meshes
//!
//! A [`Mesh`] describes the geometry produced by a driver: how many vertices and
//! faces it has, the largest number of vertices of a single face, its extent and its
//! coordinate reference system. The geometry itself stays with the driver and is
//! streamed on demand through [`Mesh::read_vertices`] and [`Mesh::read_faces`].
//!
//! The mesh also owns the [`DatasetGroup`]s read from the same source. Groups are
//! only ever appended, and a group keeps its position for the lifetime of the mesh.
//!
//! ## Building a mesh
//!
//! A driver constructs the mesh first, then builds groups against it:
//!
//! ```ignore
//! let mut mesh = Mesh::new("2DM", vertices, faces, 4, extent, "mesh.2dm", source);
//! mesh.set_source_crs_from_epsg(32633)?;
//!
//! let mut group = DatasetGroup::new("2DM", &mesh, "mesh.2dm", "bed elevation");
//! group.start_editing()?;
//! group.add_dataset(Dataset::new_2d(&group, elevations))?;
//! group.stop_editing()?;
//! mesh.add_dataset_group(group)?;
//! ```
//!
//! After that the mesh is only read. Groups and datasets are handed out as plain
//! borrows, so none of them can outlive the mesh.

use crate::crs::{CrsDefinition, CrsNormalizer, PlainCrs};
use crate::data::BBox;
use crate::iter::{FaceReader, VertexReader};
use crate::traits::MeshSource;
use crate::{DatasetGroup, Error, Result};

use std::path::Path;

/// Element counts of a mesh, copied into its groups and datasets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MeshCounts {
    pub(crate) vertices: usize,
    pub(crate) faces: usize,
}

pub struct Mesh {
    driver_name: String,
    vertices_count: usize,
    faces_count: usize,
    face_vertices_maximum_count: usize,
    extent: BBox,
    uri: String,
    crs: String,
    source: Box<dyn MeshSource>,
    normalizer: Box<dyn CrsNormalizer>,
    groups: Vec<DatasetGroup>,
}

impl Mesh {
    /// Construct a mesh over the geometry of `source`.
    ///
    /// `face_vertices_maximum_count` is the largest number of vertices of any face,
    /// typically 3 or 4 and sometimes up to 9.
    pub fn new<S>(
        driver_name: &str,
        vertices_count: usize,
        faces_count: usize,
        face_vertices_maximum_count: usize,
        extent: BBox,
        uri: &str,
        source: S,
    ) -> Self
    where
        S: MeshSource + 'static,
    {
        Self {
            driver_name: driver_name.to_string(),
            vertices_count,
            faces_count,
            face_vertices_maximum_count,
            extent,
            uri: uri.to_string(),
            crs: String::new(),
            source: Box::new(source),
            normalizer: Box::new(PlainCrs),
            groups: Vec::new(),
        }
    }

    pub fn driver_name(&self) -> &str {
        &self.driver_name
    }

    pub fn vertices_count(&self) -> usize {
        self.vertices_count
    }

    pub fn faces_count(&self) -> usize {
        self.faces_count
    }

    pub fn face_vertices_maximum_count(&self) -> usize {
        self.face_vertices_maximum_count
    }

    /// Number of values per vertex written by the vertex iterator
    pub fn vertex_ordinates(&self) -> usize {
        self.source.vertex_ordinates()
    }

    pub fn extent(&self) -> BBox {
        self.extent
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// The coordinate reference system, empty if none was assigned
    pub fn crs(&self) -> &str {
        &self.crs
    }

    pub(crate) fn counts(&self) -> MeshCounts {
        MeshCounts {
            vertices: self.vertices_count,
            faces: self.faces_count,
        }
    }

    /// Replace the service used to normalize CRS definitions. The CRS already
    /// stored is left untouched.
    pub fn set_crs_normalizer<N>(&mut self, normalizer: N)
    where
        N: CrsNormalizer + 'static,
    {
        self.normalizer = Box::new(normalizer);
    }

    /// Assign the CRS from any supported definition. The last successful call
    /// decides the stored value; a failed call keeps the previous one.
    pub fn set_crs(&mut self, definition: &CrsDefinition) -> Result<()> {
        let crs = self.normalizer.normalize(definition)?;
        log::debug!("mesh `{}` crs set to `{}`", self.uri, crs);
        self.crs = crs;
        Ok(())
    }

    pub fn set_source_crs(&mut self, crs: &str) -> Result<()> {
        self.set_crs(&CrsDefinition::Normalized(crs.to_string()))
    }

    pub fn set_source_crs_from_wkt(&mut self, wkt: &str) -> Result<()> {
        self.set_crs(&CrsDefinition::Wkt(wkt.to_string()))
    }

    pub fn set_source_crs_from_epsg(&mut self, code: i32) -> Result<()> {
        self.set_crs(&CrsDefinition::Epsg(code))
    }

    pub fn set_source_crs_from_prj_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.set_crs(&CrsDefinition::ProjFile(path.as_ref().to_path_buf()))
    }

    /// Start a new pass over the vertices. Each call returns an independent reader.
    pub fn read_vertices(&self) -> VertexReader<'_> {
        VertexReader::new(
            self.source.read_vertices(),
            self.vertices_count,
            self.vertex_ordinates(),
        )
    }

    /// Start a new pass over the faces. Each call returns an independent reader.
    pub fn read_faces(&self) -> FaceReader<'_> {
        FaceReader::new(
            self.source.read_faces(),
            self.faces_count,
            self.face_vertices_maximum_count,
        )
    }

    /// Append a group built for this mesh and return its index
    pub fn add_dataset_group(&mut self, group: DatasetGroup) -> Result<usize> {
        if group.mesh_counts() != self.counts() {
            return Err(Error::ForeignGroup {
                group: group.name().to_string(),
            });
        }

        log::debug!(
            "mesh `{}` gained group `{}` ({} datasets)",
            self.uri,
            group.name(),
            group.datasets_count()
        );

        self.groups.push(group);
        Ok(self.groups.len() - 1)
    }

    pub fn dataset_groups(&self) -> &[DatasetGroup] {
        &self.groups
    }

    pub fn dataset_groups_count(&self) -> usize {
        self.groups.len()
    }

    pub fn dataset_group(&self, index: usize) -> Option<&DatasetGroup> {
        self.groups.get(index)
    }

    pub fn dataset_group_mut(&mut self, index: usize) -> Option<&mut DatasetGroup> {
        self.groups.get_mut(index)
    }

    /// First group named `name`, in insertion order. Names are not required to be
    /// unique.
    pub fn group(&self, name: &str) -> Option<&DatasetGroup> {
        self.groups.iter().find(|group| group.name() == name)
    }

    pub fn group_mut(&mut self, name: &str) -> Option<&mut DatasetGroup> {
        self.groups.iter_mut().find(|group| group.name() == name)
    }
}

impl std::fmt::Debug for Mesh {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mesh")
            .field("driver_name", &self.driver_name)
            .field("vertices_count", &self.vertices_count)
            .field("faces_count", &self.faces_count)
            .field("face_vertices_maximum_count", &self.face_vertices_maximum_count)
            .field("extent", &self.extent)
            .field("uri", &self.uri)
            .field("crs", &self.crs)
            .field("groups", &self.groups)
            .finish()
    }
}
