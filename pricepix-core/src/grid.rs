//! Grid dimension and the final pixel matrix.

use crate::encode::color::{ColorCode, Rgb};
use crate::encode::signature::SIGNATURE_LEN;
use crate::error::EncodeError;
use serde::{Deserialize, Serialize};

/// Side length N of the square output grid.
///
/// Always at least 2, so the bottom-right 2×2 signature block fits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct GridSize(usize);

impl GridSize {
    pub const DEFAULT: usize = 10;

    /// Fails with `EncodeError::GridSize` below 2.
    pub fn new(size: usize) -> Result<Self, EncodeError> {
        if size < 2 {
            return Err(EncodeError::GridSize(size));
        }
        Ok(Self(size))
    }

    /// Side length N.
    pub fn get(self) -> usize {
        self.0
    }

    /// Total number of cells, N².
    pub fn cells(self) -> usize {
        self.0 * self.0
    }

    /// Number of cells filled from price data, N² − 4.
    pub fn price_cells(self) -> usize {
        self.cells() - SIGNATURE_LEN
    }

    /// Row-major linear indices of the bottom-right 2×2 block, ascending.
    ///
    /// For N = 10 this is `[88, 89, 98, 99]`.
    pub fn signature_positions(self) -> [usize; 4] {
        let n = self.0;
        let upper = n * (n - 2);
        let lower = n * (n - 1);
        [upper + n - 2, upper + n - 1, lower + n - 2, lower + n - 1]
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl TryFrom<usize> for GridSize {
    type Error = EncodeError;

    fn try_from(size: usize) -> Result<Self, Self::Error> {
        Self::new(size)
    }
}

impl From<GridSize> for usize {
    fn from(size: GridSize) -> Self {
        size.0
    }
}

impl std::fmt::Display for GridSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{0}x{0}", self.0)
    }
}

/// N×N matrix of RGB pixels, row-major with a top-left origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    size: GridSize,
    pixels: Vec<Rgb>,
}

impl PixelGrid {
    /// Map an encoded grid sequence to pixels, row 0 left-to-right first.
    pub fn from_sequence(sequence: &[ColorCode], size: GridSize) -> Result<Self, EncodeError> {
        if sequence.len() != size.cells() {
            return Err(EncodeError::SequenceLength {
                size: size.get(),
                expected: size.cells(),
                actual: sequence.len(),
            });
        }

        Ok(Self {
            size,
            pixels: sequence.iter().map(|c| c.to_rgb()).collect(),
        })
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Rgb> {
        let n = self.size.get();
        if row >= n || col >= n {
            return None;
        }
        self.pixels.get(row * n + col).copied()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Rgb]> {
        self.pixels.chunks(self.size.get())
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Packed `r, g, b` bytes, row-major. Length is `3 * N²`.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| p.channels()).collect()
    }

    /// Back to the color code sequence the grid was built from.
    pub fn to_sequence(&self) -> Vec<ColorCode> {
        self.pixels.iter().map(|p| p.to_code()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_positions() {
        assert_eq!(GridSize::default().signature_positions(), [88, 89, 98, 99]);
    }

    #[test]
    fn positions_follow_n() {
        assert_eq!(GridSize::new(2).unwrap().signature_positions(), [0, 1, 2, 3]);
        assert_eq!(GridSize::new(4).unwrap().signature_positions(), [10, 11, 14, 15]);
    }

    #[test]
    fn rejects_tiny_grids() {
        assert_eq!(GridSize::new(1), Err(EncodeError::GridSize(1)));
        assert_eq!(GridSize::new(0), Err(EncodeError::GridSize(0)));
    }

    #[test]
    fn pixel_grid_is_row_major() {
        let size = GridSize::new(2).unwrap();
        let seq: Vec<ColorCode> = [0xFF0000, 0x00FF00, 0x0000FF, 0xFFFFFF]
            .into_iter()
            .map(|v| ColorCode::new(v).unwrap())
            .collect();
        let grid = PixelGrid::from_sequence(&seq, size).unwrap();

        assert_eq!(grid.get(0, 0), Some(Rgb::new(255, 0, 0)));
        assert_eq!(grid.get(0, 1), Some(Rgb::new(0, 255, 0)));
        assert_eq!(grid.get(1, 0), Some(Rgb::new(0, 0, 255)));
        assert_eq!(grid.get(1, 1), Some(Rgb::new(255, 255, 255)));
        assert_eq!(grid.get(2, 0), None);
        assert_eq!(grid.rows().count(), 2);
        assert_eq!(grid.to_rgb_bytes().len(), 12);
        assert_eq!(grid.to_sequence(), seq);
    }

    #[test]
    fn pixel_grid_rejects_wrong_length() {
        let seq = vec![ColorCode::new(1).unwrap(); 99];
        assert!(matches!(
            PixelGrid::from_sequence(&seq, GridSize::default()),
            Err(EncodeError::SequenceLength { actual: 99, .. })
        ));
    }

    #[test]
    fn grid_size_from_toml_style_number() {
        let size: GridSize = serde_json::from_str("12").unwrap();
        assert_eq!(size.cells(), 144);
        assert!(serde_json::from_str::<GridSize>("1").is_err());
    }
}
