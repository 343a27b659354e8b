use crate::{
    geo::{polygon, Coord, Polygon},
    Elev, GeoCoord, TerrainTile, C,
};

/// An elevation sample of a [`TerrainTile`].
pub struct Sample<'a> {
    /// The parent [`TerrainTile`] this sample belongs to.
    pub(crate) tile: &'a TerrainTile,
    /// Row-major index into the parent's grid.
    pub(crate) index: usize,
}

#[allow(clippy::must_use_candidate)]
impl<'a> Sample<'a> {
    /// Sample elevation in meters.
    #[inline]
    pub fn elevation(&self) -> Elev {
        self.tile.grid().samples()[self.index]
    }

    /// This sample's (row, col) in the source grid.
    ///
    /// Note that (0, 0) is the NW corner.
    #[inline]
    pub fn row_col(&self) -> (usize, usize) {
        let size = self.tile.size();
        (self.index / size, self.index % size)
    }

    /// This sample's center, with its elevation.
    #[inline]
    pub fn coord(&self) -> GeoCoord {
        let (row, col) = self.row_col();
        self.tile
            .row_col_to_coord(row, col)
            .with_elevation(C::from(self.elevation()))
    }

    /// A polygon of this sample's geographic bounding box.
    #[inline]
    pub fn polygon(&self) -> Polygon<C> {
        square(self.coord().into(), self.tile.angular_step())
    }
}

impl<'a> std::cmp::PartialEq for Sample<'a> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && std::ptr::eq(self.tile, other.tile)
    }
}

impl<'a> std::cmp::Eq for Sample<'a> {}

/// Generate a square `side` degrees wide around `center`.
pub(crate) fn square(center: Coord<C>, side: C) -> Polygon<C> {
    let delta = side / 2.0;
    let n = center.y + delta;
    let e = center.x + delta;
    let s = center.y - delta;
    let w = center.x - delta;
    polygon![
        (x: w, y: s),
        (x: e, y: s),
        (x: e, y: n),
        (x: w, y: n),
        (x: w, y: s),
    ]
}

#[cfg(test)]
mod tests {
    use crate::{GeoCoord, HeightGrid, TerrainTile};
    use geo::{Area, Contains, Coord};

    #[test]
    fn test_sample_geometry() {
        let grid = HeightGrid::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
        let tile = TerrainTile::new(grid, GeoCoord::new(44.0, -72.0), 0.5);
        let samples: Vec<_> = tile.iter().collect();
        assert_eq!(samples.len(), 4);

        let ne = &samples[1];
        assert_eq!(ne.row_col(), (0, 1));
        assert_eq!(ne.elevation(), 2);
        assert_eq!(
            ne.coord(),
            GeoCoord::new(44.5, -71.5).with_elevation(2.0)
        );
        let poly = ne.polygon();
        approx::assert_relative_eq!(poly.unsigned_area(), 0.25);
        assert!(poly.contains(&Coord { x: -71.4, y: 44.6 }));
        assert!(!poly.contains(&Coord { x: -71.8, y: 44.6 }));

        assert!(samples[0] == samples[0]);
        assert!(samples[0] != samples[1]);
    }
}
