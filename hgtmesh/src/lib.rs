// #![deny(missing_docs)]

//! SRTM elevation (`.hgt`) tiles and flat-shaded terrain meshes.
//!
//! The pipeline is:
//!
//! 1. [`read_height_grid`] parses a `.hgt` file into a [`HeightGrid`].
//! 1. [`TerrainTile::new`] anchors the grid at a geographic origin
//!    and answers [`TerrainTile::height_at`] queries.
//! 1. [`build_mesh`] turns a tile into vertex, normal, and index
//!    buffers ready to hand to a renderer.
//!
//! # References
//!
//! 1. [HGT file layout](https://www.researchgate.net/profile/Pierre-Boulanger-4/publication/228924813/figure/fig8/AS:300852653903880@1448740270695/Description-of-a-HGT-file-structure-The-name-file-in-this-case-is-N20W100HGT.png)
//! 1. [Archive Team](http://fileformats.archiveteam.org/index.php?title=HGT&oldid=17250)
//! 1. [SRTM Collection User Guide](https://lpdaac.usgs.gov/documents/179/SRTM_User_Guide_V3.pdf)

mod coord;
mod error;
pub mod geodesic;
mod grid;
mod mesh;
mod sample;
mod tile;

pub use crate::{
    coord::GeoCoord,
    error::HgtError,
    geodesic::EarthModel,
    grid::{read_height_grid, HeightGrid, HgtFormat},
    mesh::{build_mesh, MeshGeometry},
    sample::Sample,
    tile::TerrainTile,
};
pub use geo;
pub use glam::DVec3;

/// Base floating point type used for all coordinates and calculations.
pub type C = f64;

/// Bit representation of elevation samples.
pub type Elev = u16;

const ARCSEC_PER_DEG: C = 3600.0;
