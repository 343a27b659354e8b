use crate::{
    geodesic::{self, EarthModel},
    sample::{square, Sample},
    Elev, GeoCoord, HeightGrid, HgtError, HgtFormat, C,
};
use geo::geometry::Polygon;
#[cfg(feature = "image")]
use image::{ImageBuffer, Luma};
use log::{debug, warn};
#[cfg(feature = "image")]
use num_traits::AsPrimitive;
use std::path::Path;

/// A [`HeightGrid`] anchored to the globe.
#[derive(Clone, Debug)]
pub struct TerrainTile {
    /// Southwest corner of the tile.
    ///
    /// Specifically, the _center_ of the SW most sample of the tile,
    /// with that sample's elevation unless the caller provided one.
    origin: GeoCoord,

    /// Degrees between adjacent samples, along both axes.
    angular_step: C,

    /// Meters covered by one step east.
    longitude_step_distance: C,

    /// Meters covered by one step north.
    latitude_step_distance: C,

    /// Number of rows (and columns) in this tile.
    size: usize,

    /// Elevation samples.
    grid: HeightGrid,
}

impl TerrainTile {
    /// Returns a tile with step distances measured on WGS-84.
    pub fn new(grid: HeightGrid, origin: GeoCoord, angular_step: C) -> Self {
        Self::with_earth_model(grid, origin, angular_step, EarthModel::default())
    }

    pub fn with_earth_model(
        grid: HeightGrid,
        origin: GeoCoord,
        angular_step: C,
        model: EarthModel,
    ) -> Self {
        let size = grid.dimension();
        let origin = GeoCoord {
            elevation: origin
                .elevation
                .or_else(|| grid.get(size - 1, 0).map(C::from)),
            ..origin
        };
        let (longitude_step_distance, latitude_step_distance) =
            step_distances(origin, size, model);
        debug!(
            "tile at ({}, {}), {size}x{size} samples, {longitude_step_distance:.3}m x {latitude_step_distance:.3}m steps",
            origin.latitude, origin.longitude
        );
        Self {
            origin,
            angular_step,
            longitude_step_distance,
            latitude_step_distance,
            size,
            grid,
        }
    }

    /// Returns a 3 arcsecond tile read from the file at `path`.
    pub fn load<P: AsRef<Path>>(path: P, origin: GeoCoord) -> Result<Self, HgtError> {
        Self::load_with_format(path, origin, HgtFormat::SRTM3)
    }

    /// Returns a tile read from the file at `path` in the given
    /// format.
    pub fn load_with_format<P: AsRef<Path>>(
        path: P,
        origin: GeoCoord,
        format: HgtFormat,
    ) -> Result<Self, HgtError> {
        let grid = HeightGrid::load_with_format(path, format)?;
        Ok(Self::new(grid, origin, format.angular_step()))
    }

    /// Returns the elevation sample nearest to `coord`, or `None` if
    /// `coord` is not covered by this tile.
    ///
    /// Offsets exactly halfway between two samples round to the even
    /// one.
    pub fn height_at(&self, coord: GeoCoord) -> Option<Elev> {
        let (row, col) = self.coord_to_row_col(coord)?;
        self.grid.get(row, col)
    }

    /// Returns the location of the sample at (`row`, `col`).
    pub fn coord_of(&self, row: usize, col: usize) -> Option<GeoCoord> {
        let elevation = self.grid.get(row, col)?;
        Some(self.row_col_to_coord(row, col).with_elevation(C::from(elevation)))
    }

    pub fn origin(&self) -> GeoCoord {
        self.origin
    }

    pub fn angular_step(&self) -> C {
        self.angular_step
    }

    /// Meters per step along a parallel.
    pub fn longitude_step_distance(&self) -> C {
        self.longitude_step_distance
    }

    /// Meters per step along a meridian.
    pub fn latitude_step_distance(&self) -> C {
        self.latitude_step_distance
    }

    /// Returns the number of rows (and columns) in this tile.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn grid(&self) -> &HeightGrid {
        &self.grid
    }

    /// Returns the lowest elevation sample in this tile.
    pub fn min_elevation(&self) -> Elev {
        self.grid.min_elevation()
    }

    /// Returns the highest elevation sample in this tile.
    pub fn max_elevation(&self) -> Elev {
        self.grid.max_elevation()
    }

    /// Returns and iterator over `self`'s samples, north to south.
    pub fn iter(&self) -> impl Iterator<Item = Sample<'_>> + '_ {
        (0..self.grid.len()).map(|index| Sample { tile: self, index })
    }

    /// Returns this tile's outline as a polygon.
    ///
    /// The outline encloses every sample's full cell, so it extends
    /// half a step past the outermost sample centers.
    pub fn polygon(&self) -> Polygon<C> {
        #[allow(clippy::cast_precision_loss)]
        let span = (self.size - 1) as C * self.angular_step;
        let center = self.origin.offset(span / 2.0, span / 2.0);
        square(center.into(), span + self.angular_step)
    }
}

#[cfg(feature = "image")]
impl TerrainTile {
    /// Returns an [`ImageBuffer`] of this tile, north up.
    ///
    /// The image is scaled so that the lowest elevation is `0` and
    /// the highest is `Pix::max_value()`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_image<Pix>(&self) -> ImageBuffer<Luma<Pix>, Vec<Pix>>
    where
        Pix: image::Primitive + 'static,
        f32: AsPrimitive<Pix> + From<Pix>,
    {
        let dim = self.size as u32;
        let mut img = ImageBuffer::new(dim, dim);
        let min_elev: f32 = self.min_elevation().into();
        let max_elev: f32 = self.max_elevation().into();
        let range = (max_elev - min_elev).max(1.0);
        let scale = |elev: Elev| {
            let elev: f32 = elev.into();
            (elev - min_elev) / range * f32::from(Pix::max_value())
        };
        for sample in self.iter() {
            let (row, col) = sample.row_col();
            img.put_pixel(col as u32, row as u32, Luma([scale(sample.elevation()).as_()]));
        }
        img
    }
}

/// Private API
impl TerrainTile {
    // Location of (`row`, `col`), which must be in bounds.
    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn row_col_to_coord(&self, row: usize, col: usize) -> GeoCoord {
        self.origin.offset(
            (self.size - 1 - row) as C * self.angular_step,
            col as C * self.angular_step,
        )
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    fn coord_to_row_col(&self, coord: GeoCoord) -> Option<(usize, usize)> {
        let lat_offset = ((coord.latitude - self.origin.latitude) / self.angular_step).round_ties_even();
        let col = ((coord.longitude - self.origin.longitude) / self.angular_step).round_ties_even();
        let size = self.size as C;
        // Rows count down from the north edge, offsets count up from
        // the south edge.
        let row = size - 1.0 - lat_offset;
        let in_bounds = |idx: C| idx.is_finite() && (0.0..size).contains(&idx);
        if in_bounds(row) && in_bounds(col) {
            Some((row as usize, col as usize))
        } else {
            None
        }
    }
}

/// Returns average (longitude, latitude) meters per step over the
/// 1°x1° cell whose SW corner is `origin`.
fn step_distances(origin: GeoCoord, size: usize, model: EarthModel) -> (C, C) {
    let corner = |d_lat: C, d_lon: C| {
        let coord = origin.offset(d_lat, d_lon);
        GeoCoord {
            latitude: coord.latitude.clamp(-90.0, 90.0),
            ..coord
        }
    };
    let sw = corner(0.0, 0.0);
    let se = corner(0.0, 1.0);
    let nw = corner(1.0, 0.0);
    let ne = corner(1.0, 1.0);

    let distance = |a, b| {
        let d = geodesic::distance(a, b, model);
        if d.is_finite() {
            d
        } else {
            0.0
        }
    };
    #[allow(clippy::cast_precision_loss)]
    let steps = size as C;
    let longitude_step = (distance(sw, se) + distance(nw, ne)) / 2.0 / steps;
    let latitude_step = (distance(sw, nw) + distance(se, ne)) / 2.0 / steps;
    if longitude_step <= 0.0 || latitude_step <= 0.0 {
        warn!(
            "degenerate step distances at ({}, {}): {longitude_step}m x {latitude_step}m",
            origin.latitude, origin.longitude
        );
    }
    (longitude_step, latitude_step)
}
