use crate::{Elev, HgtError, C, ARCSEC_PER_DEG};
use byteorder::{BigEndian, ReadBytesExt};
use log::debug;
use std::{
    fs::File,
    io::{self, BufReader, ErrorKind, Read},
    mem::size_of,
    ops::Index,
    path::Path,
};

/// Layout of an `.hgt` file.
///
/// The format is always chosen by the caller. A file whose length
/// doesn't match the chosen format is corrupt, it is never
/// reinterpreted as a different resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HgtFormat {
    /// Number of rows, and of samples per row.
    pub dimension: usize,
    /// Arcseconds per sample.
    pub resolution: u8,
}

impl HgtFormat {
    /// 1 arcsecond, 3601x3601 samples.
    pub const SRTM1: Self = Self {
        dimension: 3601,
        resolution: 1,
    };

    /// 3 arcsecond, 1201x1201 samples.
    pub const SRTM3: Self = Self {
        dimension: 1201,
        resolution: 3,
    };

    /// Exact file length in bytes.
    ///
    /// Saturates at `u64::MAX` for dimensions no file can hold.
    pub fn file_len(&self) -> u64 {
        let dimension = self.dimension as u64;
        dimension
            .saturating_mul(dimension)
            .saturating_mul(size_of::<Elev>() as u64)
    }

    /// Degrees between adjacent samples.
    pub fn angular_step(&self) -> C {
        C::from(self.resolution) / ARCSEC_PER_DEG
    }
}

impl Default for HgtFormat {
    fn default() -> Self {
        Self::SRTM3
    }
}

/// A square grid of elevation samples.
///
/// Row 0 is the northernmost row, and column 0 the westernmost
/// column, matching the order samples are stored on disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeightGrid {
    /// Number of rows, and of samples per row.
    dimension: usize,

    /// Lowest elevation sample in this grid.
    min_elevation: Elev,

    /// Highest elevation sample in this grid.
    max_elevation: Elev,

    /// Row-major samples, `dimension * dimension` long.
    samples: Box<[Elev]>,
}

/// Returns the 3 arcsecond grid read from the file at `path`.
pub fn read_height_grid<P: AsRef<Path>>(path: P) -> Result<HeightGrid, HgtError> {
    HeightGrid::load(path)
}

impl HeightGrid {
    /// Returns the 3 arcsecond grid read from the file at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, HgtError> {
        Self::load_with_format(path, HgtFormat::SRTM3)
    }

    /// Returns a grid read from the file at `path`, which must be
    /// exactly `format.file_len()` bytes long.
    pub fn load_with_format<P: AsRef<Path>>(path: P, format: HgtFormat) -> Result<Self, HgtError> {
        let path = path.as_ref();
        let unreadable = |source| HgtError::Unreadable {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(unreadable)?;
        let metadata = file.metadata().map_err(unreadable)?;
        if !metadata.is_file() {
            return Err(unreadable(io::Error::new(
                ErrorKind::InvalidInput,
                "not a regular file",
            )));
        }
        let len = metadata.len();
        let expected = format.file_len();
        if len != expected {
            return Err(HgtError::CorruptFile {
                path: path.to_path_buf(),
                len,
                expected,
            });
        }

        debug!("loading {path:?}, {} rows", format.dimension);
        let samples = read_rows(path, &mut BufReader::new(file), format.dimension)?;
        Ok(Self::from_parts(format.dimension, samples))
    }

    /// Returns a grid built from north-to-south rows of
    /// west-to-east samples.
    pub fn from_rows(rows: Vec<Vec<Elev>>) -> Result<Self, HgtError> {
        let dimension = rows.len();
        if dimension == 0 {
            return Err(HgtError::EmptyGrid);
        }
        if let Some(row) = rows.iter().find(|row| row.len() != dimension) {
            return Err(HgtError::Ragged {
                dimension,
                len: row.len(),
            });
        }
        Ok(Self::from_parts(dimension, rows.concat().into_boxed_slice()))
    }

    /// Returns a grid built from `dimension²` row-major samples.
    pub fn from_samples(dimension: usize, samples: Vec<Elev>) -> Result<Self, HgtError> {
        if dimension == 0 {
            return Err(HgtError::EmptyGrid);
        }
        if dimension.checked_mul(dimension) != Some(samples.len()) {
            return Err(HgtError::SampleCount {
                dimension,
                len: samples.len(),
            });
        }
        Ok(Self::from_parts(dimension, samples.into_boxed_slice()))
    }

    fn from_parts(dimension: usize, samples: Box<[Elev]>) -> Self {
        let min_elevation = samples.iter().copied().min().unwrap_or_default();
        let max_elevation = samples.iter().copied().max().unwrap_or_default();
        Self {
            dimension,
            min_elevation,
            max_elevation,
            samples,
        }
    }

    /// Returns the number of rows (and columns) in this grid.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Returns the number of samples in this grid.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns the sample at (`row`, `col`), if in bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<Elev> {
        if row < self.dimension && col < self.dimension {
            Some(self.samples[row * self.dimension + col])
        } else {
            None
        }
    }

    /// Returns row `row`, west to east.
    pub fn row(&self, row: usize) -> Option<&[Elev]> {
        self.rows().nth(row)
    }

    /// Returns an iterator over rows, north to south.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[Elev]> + '_ {
        self.samples.chunks_exact(self.dimension)
    }

    /// Returns all samples in row-major order.
    pub fn samples(&self) -> &[Elev] {
        &self.samples
    }

    /// Returns the lowest elevation sample in this grid.
    pub fn min_elevation(&self) -> Elev {
        self.min_elevation
    }

    /// Returns the highest elevation sample in this grid.
    pub fn max_elevation(&self) -> Elev {
        self.max_elevation
    }
}

/// Indexes by (row, col).
///
/// # Panics
///
/// Panics if either index is out of bounds.
impl Index<(usize, usize)> for HeightGrid {
    type Output = Elev;

    fn index(&self, (row, col): (usize, usize)) -> &Elev {
        assert!(col < self.dimension, "column {col} out of bounds");
        &self.samples[row * self.dimension + col]
    }
}

// Reads `dimension` rows of `dimension` big-endian samples.
//
// Any short read is reported as truncation at the row it happened in.
fn read_rows(path: &Path, src: &mut impl Read, dimension: usize) -> Result<Box<[Elev]>, HgtError> {
    let mut samples = vec![0; dimension * dimension].into_boxed_slice();
    for (row, dst) in samples.chunks_exact_mut(dimension).enumerate() {
        src.read_u16_into::<BigEndian>(dst).map_err(|err| {
            if err.kind() == ErrorKind::UnexpectedEof {
                HgtError::Truncated {
                    path: path.to_path_buf(),
                    row,
                }
            } else {
                HgtError::Unreadable {
                    path: path.to_path_buf(),
                    source: err,
                }
            }
        })?;
    }
    Ok(samples)
}
