//! Decoding of TacOps `.dat` terrain map files.
//!
//! A `.dat` file is a fixed-layout little-endian header followed, at offset
//! 0x40, by a row-major raster of 16-bit terrain cells. Each cell packs a
//! base terrain type in its high byte and a set of attribute flags in its
//! low byte; see [terrain] for the unpacking.

use std::borrow::Cow;
use std::ops::Index;

use thiserror::Error;

use crate::dat::header::{read_header, RASTER_START};
use crate::dat::terrain::{decode_terrain, TerrainFlags, TerrainType};

mod header;
pub mod terrain;

/// Number of image pixels covered by one raster cell in each dimension.
/// Baked into the format, not configurable.
pub const PIXELS_PER_CELL: usize = 10;

#[derive(Error, Debug, Copy, Clone, Eq, PartialEq)]
pub enum DatError {
    #[error("File too short for the fixed header: {actual} bytes")]
    TruncatedHeader { actual: usize },
    #[error("Invalid raster dimensions: {width}x{height}")]
    InvalidDimensions { width: i16, height: i16 },
    #[error("Raster truncated: expected {expected} cells, found {actual}")]
    TruncatedRaster { expected: usize, actual: usize },
}

/// A decoded terrain map.
///
/// Constructed whole by [Map::from_bytes] and read-only afterwards. The
/// raster always holds exactly `raster_width * raster_height` cells; a file
/// that cannot fill it fails to decode instead of producing a partial map.
///
/// Cells can be read via [Map::get], or through the `Index` trait if the
/// coordinates are known to be valid:
///
/// ```rs
/// let col = 0;
/// let row = 5;
/// let cell_1 = map.get(row, col);
/// let cell_2 = map[row][col];
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Map {
    /// Pixel width of the rendered area.
    pub width: i16,
    /// Pixel height of the rendered area.
    pub height: i16,
    /// Width of the terrain grid, in cells.
    pub raster_width: i16,
    /// Height of the terrain grid, in cells.
    pub raster_height: i16,
    /// UTM easting of the map's grid reference. Carried through untouched.
    pub utm_easting: i16,
    /// UTM northing of the map's grid reference. Carried through untouched.
    pub utm_northing: i16,
    /// Format version tag. Carried through untouched.
    pub version: i16,
    /// Map name exactly as stored on disk: 8 raw bytes, not necessarily
    /// NUL-terminated. Use [Map::name_lossy] for display.
    pub name: [u8; 8],
    /// The terrain cells, stored left-to-right, top-to-bottom.
    pub raster: Vec<i16>,
}

impl Map {
    /// Decodes a map from the raw contents of a `.dat` file.
    ///
    /// Fails without producing a map when the header is short, the declared
    /// raster dimensions are not positive, or fewer cells are present than
    /// the dimensions call for. Bytes past the declared raster are ignored.
    pub fn from_bytes(data: &[u8]) -> Result<Self, DatError> {
        let header = read_header(data)?;
        if header.raster_width <= 0 || header.raster_height <= 0 {
            return Err(DatError::InvalidDimensions {
                width: header.raster_width,
                height: header.raster_height,
            });
        }

        let expected = header.raster_width as usize * header.raster_height as usize;
        let raster = data[RASTER_START..]
            .chunks_exact(2)
            .take(expected)
            .map(|chunk| i16::from_le_bytes(chunk.try_into().unwrap()))
            .collect::<Vec<_>>();
        if raster.len() != expected {
            return Err(DatError::TruncatedRaster {
                expected,
                actual: raster.len(),
            });
        }

        Ok(Map {
            width: header.width,
            height: header.height,
            raster_width: header.raster_width,
            raster_height: header.raster_height,
            utm_easting: header.utm_easting,
            utm_northing: header.utm_northing,
            version: header.version,
            name: header.name,
            raster,
        })
    }

    // Retrieves a cell at the given coordinates, checking the bounds to
    // ensure it's a valid position. Returns [None] if the coordinates are
    // out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<i16> {
        if col >= self.raster_width as usize || row >= self.raster_height as usize {
            return None;
        }

        Some(self[row][col])
    }

    /// Decodes the terrain under a pixel coordinate of the rendered map.
    ///
    /// Each cell covers a [PIXELS_PER_CELL]-sized square, so the pixel
    /// coordinate is integer-divided down to a cell coordinate first.
    /// Returns [None] for pixels outside the raster extent.
    pub fn cell_at(&self, x: usize, y: usize) -> Option<TerrainCell> {
        let col = x / PIXELS_PER_CELL;
        let row = y / PIXELS_PER_CELL;
        self.get(row, col).map(|raw| {
            let (terrain, flags) = decode_terrain(raw);
            TerrainCell {
                terrain,
                flags,
                col,
                row,
            }
        })
    }

    /// Map name decoded for display: CP-1252, stopping at the first NUL if
    /// there is one. The name field has no terminator when all 8 bytes are
    /// in use.
    pub fn name_lossy(&self) -> Cow<'_, str> {
        let end = self.name.iter().position(|&b| b == 0).unwrap_or(self.name.len());
        let (name, _, _) = encoding_rs::WINDOWS_1252.decode(&self.name[..end]);
        name
    }
}

/// A row of raster cells.
type RasterRow = [i16];

impl Index<usize> for Map {
    type Output = RasterRow;

    /// Returns a row of cells given a row index. This operation is not
    /// checked against the bounds of the raster, and may panic if given
    /// values that exceed it.
    fn index(&self, row: usize) -> &Self::Output {
        let start = row * self.raster_width as usize;
        &self.raster[start..start + self.raster_width as usize]
    }
}

/// The decoded terrain under one pixel coordinate, along with the raster
/// cell it came from.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TerrainCell {
    pub terrain: TerrainType,
    pub flags: TerrainFlags,
    /// Raster column the pixel falls in.
    pub col: usize,
    /// Raster row the pixel falls in.
    pub row: usize,
}

#[cfg(test)]
mod tests {
    use assert_ok::assert_ok;
    use rstest::rstest;

    use super::header::RASTER_START;
    use super::*;

    /// Builds a syntactically complete `.dat` file around the given raster.
    fn dat_bytes(raster_width: i16, raster_height: i16, cells: &[i16]) -> Vec<u8> {
        let mut data = vec![0u8; RASTER_START];
        data[0x06..0x08].copy_from_slice(&raster_width.to_le_bytes());
        data[0x08..0x0a].copy_from_slice(&raster_height.to_le_bytes());
        data[0x0e..0x10].copy_from_slice(&400i16.to_le_bytes());
        data[0x10..0x12].copy_from_slice(&300i16.to_le_bytes());
        data[0x32..0x34].copy_from_slice(&1205i16.to_le_bytes());
        data[0x34..0x36].copy_from_slice(&4807i16.to_le_bytes());
        data[0x36..0x38].copy_from_slice(&5i16.to_le_bytes());
        data[0x38..0x40].copy_from_slice(b"CAMBRAI\0");
        for cell in cells {
            data.extend_from_slice(&cell.to_le_bytes());
        }
        data
    }

    #[test]
    fn round_trip() {
        let cells = (0..12).collect::<Vec<i16>>();
        let map = assert_ok!(Map::from_bytes(&dat_bytes(4, 3, &cells)));

        assert_eq!(map.width, 400);
        assert_eq!(map.height, 300);
        assert_eq!(map.raster_width, 4);
        assert_eq!(map.raster_height, 3);
        assert_eq!(map.utm_easting, 1205);
        assert_eq!(map.utm_northing, 4807);
        assert_eq!(map.version, 5);
        assert_eq!(map.raster.len(), 12);

        for row in 0..3 {
            for col in 0..4 {
                assert_eq!(map[row][col], (row * 4 + col) as i16);
            }
        }
    }

    #[test]
    fn get_checks_bounds() {
        let cells = (0..12).collect::<Vec<i16>>();
        let map = assert_ok!(Map::from_bytes(&dat_bytes(4, 3, &cells)));

        assert_eq!(map.get(2, 3), Some(11));
        assert_eq!(map.get(3, 0), None);
        assert_eq!(map.get(0, 4), None);
    }

    #[test]
    fn extra_bytes_after_the_raster_are_ignored() {
        let cells = (0..12).collect::<Vec<i16>>();
        let mut data = dat_bytes(4, 3, &cells);
        data.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]);

        let map = assert_ok!(Map::from_bytes(&data));
        assert_eq!(map.raster.len(), 12);
        assert_eq!(map[2][3], 11);
    }

    #[rstest]
    #[case::one_cell_short(11)]
    #[case::empty_raster(0)]
    fn short_raster_fails_decode(#[case] available: usize) {
        let cells = (0..available as i16).collect::<Vec<i16>>();
        assert_eq!(
            Map::from_bytes(&dat_bytes(4, 3, &cells)),
            Err(DatError::TruncatedRaster {
                expected: 12,
                actual: available,
            })
        );
    }

    #[test]
    fn trailing_half_cell_does_not_count() {
        let cells = (0..11).collect::<Vec<i16>>();
        let mut data = dat_bytes(4, 3, &cells);
        data.push(0xab);

        assert_eq!(
            Map::from_bytes(&data),
            Err(DatError::TruncatedRaster {
                expected: 12,
                actual: 11,
            })
        );
    }

    #[test]
    fn short_header_fails_decode() {
        assert_eq!(
            Map::from_bytes(&[0u8; 0x3f]),
            Err(DatError::TruncatedHeader { actual: 0x3f })
        );
    }

    #[rstest]
    #[case(0, 3)]
    #[case(4, 0)]
    #[case(-4, 3)]
    #[case(4, -3)]
    fn non_positive_dimensions_fail_decode(#[case] width: i16, #[case] height: i16) {
        assert_eq!(
            Map::from_bytes(&dat_bytes(width, height, &[])),
            Err(DatError::InvalidDimensions { width, height })
        );
    }

    #[test]
    fn pixel_coordinates_map_to_cells() {
        let cells = (0..100).collect::<Vec<i16>>();
        let map = assert_ok!(Map::from_bytes(&dat_bytes(10, 10, &cells)));

        let cell = map.cell_at(23, 47).unwrap();
        assert_eq!((cell.col, cell.row), (2, 4));

        assert_eq!(map.cell_at(0, 0).map(|c| (c.col, c.row)), Some((0, 0)));
        assert_eq!(map.cell_at(99, 99).map(|c| (c.col, c.row)), Some((9, 9)));
        assert_eq!(map.cell_at(100, 0), None);
        assert_eq!(map.cell_at(0, 100), None);
    }

    #[test]
    fn cell_at_decodes_the_raw_value() {
        let mut cells = vec![0i16; 100];
        cells[4 * 10 + 2] = 0x30a8u16 as i16;
        let map = assert_ok!(Map::from_bytes(&dat_bytes(10, 10, &cells)));

        let cell = map.cell_at(23, 47).unwrap();
        assert_eq!(cell.terrain, TerrainType::Water);
        assert_eq!(
            cell.flags,
            TerrainFlags::ELEVATION | TerrainFlags::ROAD | TerrainFlags::TOWN
        );
    }

    #[test]
    fn name_without_terminator_is_preserved_whole() {
        let mut data = dat_bytes(1, 1, &[0]);
        data[0x38..0x40].copy_from_slice(b"VICTORY8");

        let map = assert_ok!(Map::from_bytes(&data));
        assert_eq!(map.name, *b"VICTORY8");
        assert_eq!(map.name.len(), 8);
        assert_eq!(map.name_lossy(), "VICTORY8");
    }

    #[test]
    fn name_padding_is_trimmed_for_display() {
        let map = assert_ok!(Map::from_bytes(&dat_bytes(1, 1, &[0])));
        assert_eq!(map.name_lossy(), "CAMBRAI");
    }
}
