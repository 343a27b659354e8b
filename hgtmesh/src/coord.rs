use crate::{HgtError, C};
use geo::geometry::{Coord, Point};
use std::path::Path;

/// A geographic location in degrees, with optional elevation in
/// meters.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoCoord {
    pub latitude: C,
    pub longitude: C,
    pub elevation: Option<C>,
}

impl GeoCoord {
    pub fn new(latitude: C, longitude: C) -> Self {
        Self {
            latitude,
            longitude,
            elevation: None,
        }
    }

    #[must_use]
    pub fn with_elevation(self, elevation: C) -> Self {
        Self {
            elevation: Some(elevation),
            ..self
        }
    }

    /// Returns `self` moved by the given number of degrees.
    #[must_use]
    pub fn offset(self, d_lat: C, d_lon: C) -> Self {
        Self {
            latitude: self.latitude + d_lat,
            longitude: self.longitude + d_lon,
            ..self
        }
    }

    /// Returns the SW corner encoded in an `.hgt` file name.
    ///
    /// `N49E016.hgt` yields (49, 16), `S10W045.hgt` yields (-10, -45).
    pub fn from_hgt_path<P: AsRef<Path>>(path: P) -> Result<Self, HgtError> {
        let mk_err = || HgtError::HgtName(path.as_ref().to_owned());
        let name = path
            .as_ref()
            .file_stem()
            .and_then(std::ffi::OsStr::to_str)
            .ok_or_else(mk_err)?;
        if name.len() != 7 || !name.is_ascii() {
            return Err(mk_err());
        }
        let lat_sign = match &name[0..1] {
            "N" | "n" => 1,
            "S" | "s" => -1,
            _ => return Err(mk_err()),
        };
        let lat = lat_sign * name[1..3].parse::<i16>().map_err(|_| mk_err())?;
        let lon_sign = match &name[3..4] {
            "E" | "e" => 1,
            "W" | "w" => -1,
            _ => return Err(mk_err()),
        };
        let lon = lon_sign * name[4..7].parse::<i16>().map_err(|_| mk_err())?;
        Ok(Self::new(C::from(lat), C::from(lon)))
    }
}

impl From<GeoCoord> for Coord<C> {
    fn from(coord: GeoCoord) -> Self {
        Coord {
            x: coord.longitude,
            y: coord.latitude,
        }
    }
}

impl From<GeoCoord> for Point<C> {
    fn from(coord: GeoCoord) -> Self {
        Point(coord.into())
    }
}

impl From<Coord<C>> for GeoCoord {
    fn from(Coord { x, y }: Coord<C>) -> Self {
        Self::new(y, x)
    }
}
