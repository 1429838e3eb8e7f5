//! Decoding and rendering of TacOps `.dat` terrain maps.
//!
//! [dat] decodes the binary map format into a [Map]; [render] turns a
//! decoded map into an RGBA image. [load_map_file] ties the two together
//! for the common read-a-file case.

pub mod dat;
pub mod render;

pub use dat::terrain::{decode_terrain, TerrainFlags, TerrainType};
pub use dat::{DatError, Map, TerrainCell, PIXELS_PER_CELL};
pub use render::{render_map, RenderOptions};

use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapFileError {
    #[error("Failed to read map file")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode map file")]
    Dat(#[from] DatError),
}

/// Reads and decodes a TacOps `.dat` map file.
///
/// Either returns a complete [Map] or fails; there is no partial result.
/// Every call stands alone, nothing is cached between calls.
pub fn load_map_file(path: impl AsRef<Path>) -> Result<Map, MapFileError> {
    let data = std::fs::read(path)?;
    Ok(Map::from_bytes(&data)?)
}
