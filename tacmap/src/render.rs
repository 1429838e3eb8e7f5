//! Rendering of a decoded [Map] into an RGBA image.
//!
//! Every raster cell becomes a fixed 10x10 pixel block filled with the
//! color of its base terrain type, with flag overlays drawn on top. Grid
//! lines and a one-line caption can be layered over the terrain.

use image::{ImageBuffer, Rgba, RgbaImage};
use imageproc::drawing::{
    draw_filled_rect_mut, draw_hollow_rect_mut, draw_line_segment_mut, draw_text_mut,
};
use imageproc::rect::Rect;
use rusttype::{Font, Scale};
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::dat::terrain::{decode_terrain, TerrainFlags, TerrainType};
use crate::dat::{Map, PIXELS_PER_CELL};

/// Grid spacings in pixels. One raster cell is 100 meters of terrain, so
/// 10 cells (100 pixels) make a kilometer.
pub const GRID_1KM_SPACING: u32 = 100;
pub const GRID_5KM_SPACING: u32 = 500;
pub const GRID_10KM_SPACING: u32 = 1000;

/// Height of the caption band appended below the image.
const CAPTION_HEIGHT: u32 = 20;
const CAPTION_FONT_SIZE: f32 = 13.0;

/// Install locations checked for a caption font, most specific first.
const FONT_SEARCH_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
    "/usr/share/fonts/dejavu/DejaVuSansMono.ttf",
    "/Library/Fonts/DejaVuSansMono.ttf",
];

const BACKGROUND: Rgba<u8> = Rgba([0, 0, 0, 255]);
const GRID_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);
const CAPTION_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);
const ROAD_FILL: Rgba<u8> = Rgba([255, 255, 255, 255]);
const ELEVATION_OUTLINE: Rgba<u8> = Rgba([153, 102, 51, 255]);
const WOODS_FILL: Rgba<u8> = Rgba([102, 204, 102, 255]);
const TOWN_FILL: Rgba<u8> = Rgba([153, 0, 51, 255]);

/// What to draw besides the terrain itself. The renderer takes all of its
/// configuration from here; nothing is ambient.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Overlay grid lines every kilometer of terrain.
    pub grid_1km: bool,
    /// Overlay grid lines every 5 kilometers of terrain.
    pub grid_5km: bool,
    /// Overlay grid lines every 10 kilometers of terrain.
    pub grid_10km: bool,
    /// Append a one-line description of the map below the image.
    pub caption: bool,
}

impl RenderOptions {
    /// Pixel spacings of the enabled grid overlays.
    pub fn grid_spacings(&self) -> SmallVec<[u32; 3]> {
        let mut spacings = SmallVec::new();
        if self.grid_1km {
            spacings.push(GRID_1KM_SPACING);
        }
        if self.grid_5km {
            spacings.push(GRID_5KM_SPACING);
        }
        if self.grid_10km {
            spacings.push(GRID_10KM_SPACING);
        }
        spacings
    }
}

/// Renders the map's terrain raster, plus whatever overlays `options` asks
/// for, into a fresh image. The image covers the map's pixel extent, with
/// an extra caption band at the bottom when the caption is enabled.
pub fn render_map(map: &Map, options: &RenderOptions) -> RgbaImage {
    let width = map.width.max(0) as u32;
    let mut height = map.height.max(0) as u32;
    if options.caption {
        height += CAPTION_HEIGHT;
    }

    let mut image = ImageBuffer::from_pixel(width, height, BACKGROUND);
    debug!("wrote background");

    draw_terrain(&mut image, map);
    debug!("wrote terrain");

    for spacing in options.grid_spacings() {
        draw_grid(&mut image, map, spacing);
        debug!(spacing, "wrote grid");
    }

    if options.caption {
        draw_caption(&mut image, map);
        debug!("wrote caption");
    }

    image
}

fn terrain_color(terrain: TerrainType) -> Rgba<u8> {
    match terrain {
        TerrainType::Clear => Rgba([204, 204, 204, 255]),
        TerrainType::Rough1 => Rgba([153, 153, 153, 255]),
        TerrainType::Rough2 => Rgba([102, 102, 102, 255]),
        TerrainType::Rough3 => Rgba([51, 51, 51, 255]),
        TerrainType::Rough4 => Rgba([26, 26, 26, 255]),
        TerrainType::Water => Rgba([26, 153, 255, 255]),
        // No-go terrain and unrecognized cells share the sentinel color.
        TerrainType::Nogo1 | TerrainType::Nogo2 | TerrainType::Nogo3 | TerrainType::Unknown => {
            Rgba([255, 255, 0, 255])
        }
    }
}

fn draw_terrain(image: &mut RgbaImage, map: &Map) {
    let cell_size = PIXELS_PER_CELL as u32;
    for row in 0..map.raster_height.max(0) as usize {
        for col in 0..map.raster_width.max(0) as usize {
            let (terrain, flags) = decode_terrain(map[row][col]);
            let x = (col * PIXELS_PER_CELL) as i32;
            let y = (row * PIXELS_PER_CELL) as i32;
            let block = Rect::at(x, y).of_size(cell_size, cell_size);

            draw_filled_rect_mut(image, block, terrain_color(terrain));
            if flags.contains(TerrainFlags::ROAD) {
                draw_filled_rect_mut(image, block, ROAD_FILL);
            }
            if flags.contains(TerrainFlags::ELEVATION) {
                draw_hollow_rect_mut(
                    image,
                    Rect::at(x, y).of_size(cell_size - 1, cell_size - 1),
                    ELEVATION_OUTLINE,
                );
            }
            if flags.contains(TerrainFlags::WOODS) {
                draw_filled_rect_mut(image, Rect::at(x + 4, y + 4).of_size(3, 3), WOODS_FILL);
            }
            if flags.contains(TerrainFlags::TOWN) {
                draw_filled_rect_mut(image, Rect::at(x + 4, y + 4).of_size(3, 3), TOWN_FILL);
            }
        }
    }
}

/// Draws full-extent grid lines over the map area (never the caption band).
fn draw_grid(image: &mut RgbaImage, map: &Map, spacing: u32) {
    let width = map.width.max(0) as u32;
    let height = map.height.max(0) as u32;
    if spacing == 0 || width == 0 || height == 0 {
        return;
    }

    for x in (0..width).step_by(spacing as usize) {
        draw_line_segment_mut(
            image,
            (x as f32, 0.0),
            (x as f32, (height - 1) as f32),
            GRID_COLOR,
        );
    }
    for y in (0..height).step_by(spacing as usize) {
        draw_line_segment_mut(
            image,
            (0.0, y as f32),
            ((width - 1) as f32, y as f32),
            GRID_COLOR,
        );
    }
}

fn load_caption_font() -> Option<Font<'static>> {
    FONT_SEARCH_PATHS
        .iter()
        .find_map(|path| std::fs::read(path).ok())
        .and_then(Font::try_from_vec)
}

fn draw_caption(image: &mut RgbaImage, map: &Map) {
    let Some(font) = load_caption_font() else {
        warn!("no caption font found, leaving the caption band empty");
        return;
    };

    let text = format!(
        "Generated from TacOps map \"{}\" version {} ({} x {} pixels, {} x {} terrain raster)",
        map.name_lossy(),
        map.version,
        map.width,
        map.height,
        map.raster_width,
        map.raster_height,
    );
    let y = map.height.max(0) as i32 + 4;
    draw_text_mut(
        image,
        CAPTION_COLOR,
        0,
        y,
        Scale::uniform(CAPTION_FONT_SIZE),
        &font,
        &text,
    );
}
