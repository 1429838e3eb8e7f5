use nom::combinator::map;
use nom::sequence::tuple;
use nom::IResult;

use crate::dat::DatError;

/// Offset of the first raster cell; everything before it is the fixed
/// header.
pub(crate) const RASTER_START: usize = 0x40;

/// The fixed-layout header at the start of a `.dat` file. All multi-byte
/// fields are little-endian signed 16-bit; the byte ranges between them are
/// unused (or at least not understood) and skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DatHeader {
    pub raster_width: i16,
    pub raster_height: i16,
    pub width: i16,
    pub height: i16,
    pub utm_easting: i16,
    pub utm_northing: i16,
    pub version: i16,
    pub name: [u8; 8],
}

fn dat_header(input: &[u8]) -> IResult<&[u8], DatHeader> {
    use nom::bytes::complete::take;
    use nom::number::complete::le_i16;

    map(
        tuple((
            take(6usize),  // 0x00
            le_i16,        // 0x06 raster width
            le_i16,        // 0x08 raster height
            take(4usize),  // 0x0a
            le_i16,        // 0x0e width
            le_i16,        // 0x10 height
            take(0x20usize), // 0x12
            le_i16,        // 0x32 UTM easting
            le_i16,        // 0x34 UTM northing
            le_i16,        // 0x36 version
            take::<_, _, nom::error::Error<&[u8]>>(8usize),  // 0x38 name, ends at RASTER_START
        )),
        |(_, raster_width, raster_height, _, width, height, _, utm_easting, utm_northing, version, name)| {
            DatHeader {
                raster_width,
                raster_height,
                width,
                height,
                utm_easting,
                utm_northing,
                version,
                name: name.try_into().unwrap(),
            }
        },
    )(input)
}

/// Parses the fixed header from the start of `data`. Anything shorter than
/// [RASTER_START] bytes is a truncated file.
pub(crate) fn read_header(data: &[u8]) -> Result<DatHeader, DatError> {
    let (_, header) =
        dat_header(data).map_err(|_| DatError::TruncatedHeader { actual: data.len() })?;
    Ok(header)
}
