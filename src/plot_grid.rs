//! Renders a patch tiling as a labelled grid figure.
//!
//! Cell (i, j) shows the patch at spatial offset (i*patch_size,
//! j*patch_size). Row and column indices are drawn 1-based on the outer
//! edge only, and the figure is titled `"{class_name} -> Patchified"`.

use std::sync::OnceLock;

use image::{RgbImage, RgbaImage};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontStyle, register_font};

use crate::patch_grid::{PatchError, PatchGrid};

static FONT_BYTES: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");
static FONT_OK: OnceLock<bool> = OnceLock::new();

const CELL_SCALE: u32 = 4;
const CELL_GAP: u32 = 2;
const MARGIN: u32 = 10;
const TITLE_BAND: u32 = 36;
const LEFT_GUTTER: u32 = 30;
const BOTTOM_GUTTER: u32 = 26;
const TITLE_FONT_PX: u32 = 22;
const LABEL_FONT_PX: u32 = 14;

/// Cosmetic parameters of the rendered figure.
#[derive(Debug, Clone)]
pub struct PlotConfig {
    /// Nearest-neighbour magnification of each patch inside its cell.
    pub cell_scale: u32,
    /// Gap between adjacent cells, in pixels.
    pub cell_gap: u32,
    pub margin: u32,
    pub title_band: u32,
    pub left_gutter: u32,
    pub bottom_gutter: u32,
    pub title_font_px: u32,
    pub label_font_px: u32,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            cell_scale: CELL_SCALE,
            cell_gap: CELL_GAP,
            margin: MARGIN,
            title_band: TITLE_BAND,
            left_gutter: LEFT_GUTTER,
            bottom_gutter: BOTTOM_GUTTER,
            title_font_px: TITLE_FONT_PX,
            label_font_px: LABEL_FONT_PX,
        }
    }
}

/// Errors from rendering a patch grid figure.
#[derive(Debug, thiserror::Error)]
pub enum PlotError {
    #[error(transparent)]
    Patch(#[from] PatchError),

    #[error("failed to register bundled font")]
    Font,

    #[error("drawing failed: {0}")]
    Backend(String),

    #[error("figure buffer has unexpected size")]
    BufferSize,
}

/// Pixel geometry of the figure, derived from a tiling and a `PlotConfig`.
#[derive(Debug, Clone, Copy)]
pub struct FigureLayout {
    pub num_patches: u32,
    pub scale: u32,
    pub cell_px: u32,
    pub stride: u32,
    pub origin_x: u32,
    pub origin_y: u32,
    pub width: u32,
    pub height: u32,
}

impl FigureLayout {
    pub fn new(grid: PatchGrid, config: &PlotConfig) -> Self {
        let scale = config.cell_scale.max(1);
        let cell_px = grid.patch_size() * scale;
        let stride = cell_px + config.cell_gap;
        let n = grid.num_patches();
        let extent = n * stride - config.cell_gap;
        let origin_x = config.margin + config.left_gutter;
        let origin_y = config.margin + config.title_band;
        Self {
            num_patches: n,
            scale,
            cell_px,
            stride,
            origin_x,
            origin_y,
            width: origin_x + extent + config.margin,
            height: origin_y + extent + config.bottom_gutter + config.margin,
        }
    }

    /// Top-left pixel of the cell interior at grid position (`row`, `col`).
    pub fn cell_origin(&self, row: u32, col: u32) -> (u32, u32) {
        (
            self.origin_x + col * self.stride,
            self.origin_y + row * self.stride,
        )
    }
}

fn ensure_font() -> Result<(), PlotError> {
    let ok = *FONT_OK
        .get_or_init(|| register_font("sans-serif", FontStyle::Normal, FONT_BYTES).is_ok());
    if ok { Ok(()) } else { Err(PlotError::Font) }
}

/// Renders the patch grid figure in-memory and returns it as an RGBA image.
///
/// The input is validated against the tiling before any drawing happens, so
/// a bad shape produces no partial figure. The input image is read-only.
pub fn render_patch_grid(
    image: &RgbImage,
    class_name: &str,
    grid: PatchGrid,
    config: &PlotConfig,
) -> Result<RgbaImage, PlotError> {
    grid.check_image(image)?;
    ensure_font()?;

    let layout = FigureLayout::new(grid, config);
    let (width, height) = (layout.width, layout.height);
    let pixel_count = (width as usize)
        .checked_mul(height as usize)
        .ok_or(PlotError::BufferSize)?;

    let mut rgb = vec![255u8; pixel_count * 3];

    {
        let root = BitMapBackend::with_buffer(&mut rgb, (width, height)).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| PlotError::Backend(e.to_string()))?;

        let title_style = ("sans-serif", config.title_font_px)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Center));
        root.draw(&Text::new(
            format!("{class_name} -> Patchified"),
            (
                (width / 2) as i32,
                (config.margin + config.title_band / 2) as i32,
            ),
            title_style,
        ))
        .map_err(|e| PlotError::Backend(e.to_string()))?;

        let label_font = ("sans-serif", config.label_font_px)
            .into_font()
            .color(&BLACK);
        let row_style = label_font.pos(Pos::new(HPos::Right, VPos::Center));
        let col_style = label_font.pos(Pos::new(HPos::Center, VPos::Top));

        let border = RGBColor(170, 170, 170);
        let n = layout.num_patches;
        for row in 0..n {
            for col in 0..n {
                let (x, y) = layout.cell_origin(row, col);
                root.draw(&Rectangle::new(
                    [
                        (x as i32 - 1, y as i32 - 1),
                        ((x + layout.cell_px) as i32, (y + layout.cell_px) as i32),
                    ],
                    border,
                ))
                .map_err(|e| PlotError::Backend(e.to_string()))?;
            }
        }

        // Outer-edge labels only: each row number appears once, left of the
        // first column, and each column number once, below the last row.
        for row in 0..n {
            let (x, y) = layout.cell_origin(row, 0);
            root.draw(&Text::new(
                format!("{}", row + 1),
                (x as i32 - 5, (y + layout.cell_px / 2) as i32),
                row_style.clone(),
            ))
            .map_err(|e| PlotError::Backend(e.to_string()))?;
        }
        for col in 0..n {
            let (x, y) = layout.cell_origin(n - 1, col);
            root.draw(&Text::new(
                format!("{}", col + 1),
                (
                    (x + layout.cell_px / 2) as i32,
                    (y + layout.cell_px) as i32 + 3,
                ),
                col_style.clone(),
            ))
            .map_err(|e| PlotError::Backend(e.to_string()))?;
        }

        root.present()
            .map_err(|e| PlotError::Backend(e.to_string()))?;
    }

    // Blit the patches after the chrome so cell interiors carry the raw
    // pixels, magnified nearest-neighbour.
    for (row, col, region) in grid.regions() {
        let (cx, cy) = layout.cell_origin(row, col);
        for dy in 0..layout.cell_px {
            let sy = region.y + dy / layout.scale;
            for dx in 0..layout.cell_px {
                let sx = region.x + dx / layout.scale;
                let pixel = image.get_pixel(sx, sy).0;
                let idx = ((cy + dy) as usize * width as usize + (cx + dx) as usize) * 3;
                rgb[idx..idx + 3].copy_from_slice(&pixel);
            }
        }
    }

    let mut rgba = vec![255u8; pixel_count * 4];
    for i in 0..pixel_count {
        rgba[i * 4] = rgb[i * 3];
        rgba[i * 4 + 1] = rgb[i * 3 + 1];
        rgba[i * 4 + 2] = rgb[i * 3 + 2];
        rgba[i * 4 + 3] = 255;
    }

    RgbaImage::from_raw(width, height, rgba).ok_or(PlotError::BufferSize)
}
