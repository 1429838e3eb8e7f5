use bitflags::bitflags;

/// Base terrain classification of a raster cell, selected by the high byte
/// of the raw cell value. Exactly one applies per cell.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TerrainType {
    Clear,
    Nogo1,
    Nogo2,
    Nogo3,
    Rough1,
    Rough2,
    Rough3,
    Rough4,
    Water,
    /// The high byte matched no known terrain value. Kept as an explicit
    /// variant so one bad cell never voids an otherwise-valid map; the
    /// renderer gives these a sentinel color.
    Unknown,
}

impl TerrainType {
    /// Maps the high byte of a raw cell value to its terrain type.
    pub fn from_type_byte(value: u8) -> Self {
        match value {
            0x00 => TerrainType::Clear,
            0x01 => TerrainType::Nogo1,
            0x02 => TerrainType::Nogo2,
            0x04 => TerrainType::Nogo3,
            0x08 => TerrainType::Rough1,
            0x10 => TerrainType::Rough2,
            0x18 => TerrainType::Rough3,
            0x20 => TerrainType::Rough4,
            0x30 => TerrainType::Water,
            _ => TerrainType::Unknown,
        }
    }
}

bitflags! {
    /// Attribute flags of a raster cell, taken from the low byte of the raw
    /// cell value. Flags are orthogonal: any subset may be set, independent
    /// of the terrain type and of each other.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct TerrainFlags: u8 {
        /// Blocks line of sight.
        const LOS_BLOCK = 0x02;
        /// Elevated ground.
        const ELEVATION = 0x08;
        const ROAD = 0x20;
        const WOODS = 0x40;
        const TOWN = 0x80;
    }
}

/// Unpacks a raw 16-bit cell value into its terrain type and flag set.
///
/// The high byte selects the type via exact table lookup, the low byte is
/// read bit-by-bit. Pure and deterministic.
pub fn decode_terrain(raw: i16) -> (TerrainType, TerrainFlags) {
    let raw = raw as u16;
    let terrain = TerrainType::from_type_byte((raw >> 8) as u8);
    let flags = TerrainFlags::from_bits_truncate(raw as u8);
    (terrain, flags)
}
