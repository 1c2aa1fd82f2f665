//! Tiling geometry: splits a square image into a regular grid of
//! non-overlapping square patches.

use image::{RgbImage, SubImage, imageops};
use serde::Serialize;

/// Errors from building a patch tiling or applying it to an image.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PatchError {
    #[error("image size must be nonzero")]
    ZeroImageSize,

    #[error("patch size must be nonzero")]
    ZeroPatchSize,

    #[error("image size {img_size} is not divisible by patch size {patch_size}")]
    Indivisible { img_size: u32, patch_size: u32 },

    #[error("image is {width}x{height}, expected {expected}x{expected}")]
    ShapeMismatch {
        width: u32,
        height: u32,
        expected: u32,
    },
}

/// Pixel rectangle covered by one patch. Always square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PatchRegion {
    pub x: u32,
    pub y: u32,
    pub size: u32,
}

/// A validated tiling of an `img_size` x `img_size` image into
/// `num_patches` x `num_patches` patches of `patch_size` pixels.
#[derive(Debug, Clone, Copy)]
pub struct PatchGrid {
    img_size: u32,
    patch_size: u32,
    num_patches: u32,
}

/// Serializable description of a tiling, row-major region order.
#[derive(Debug, Clone, Serialize)]
pub struct PatchSummary {
    pub img_size: u32,
    pub patch_size: u32,
    pub num_patches: u32,
    pub cell_count: usize,
    pub regions: Vec<PatchRegion>,
}

impl PatchGrid {
    pub fn new(img_size: u32, patch_size: u32) -> Result<Self, PatchError> {
        if img_size == 0 {
            return Err(PatchError::ZeroImageSize);
        }
        if patch_size == 0 {
            return Err(PatchError::ZeroPatchSize);
        }
        if img_size % patch_size != 0 {
            return Err(PatchError::Indivisible {
                img_size,
                patch_size,
            });
        }
        Ok(Self {
            img_size,
            patch_size,
            num_patches: img_size / patch_size,
        })
    }

    pub fn img_size(&self) -> u32 {
        self.img_size
    }

    pub fn patch_size(&self) -> u32 {
        self.patch_size
    }

    /// Patches per row (and per column).
    pub fn num_patches(&self) -> u32 {
        self.num_patches
    }

    /// Total number of patches in the tiling.
    pub fn cell_count(&self) -> usize {
        (self.num_patches as usize) * (self.num_patches as usize)
    }

    /// Pixel region of the patch at grid position (`row`, `col`).
    ///
    /// `row` indexes height and `col` indexes width, so the region covers
    /// pixel rows `[row*patch_size, (row+1)*patch_size)` and columns
    /// `[col*patch_size, (col+1)*patch_size)`.
    pub fn region(&self, row: u32, col: u32) -> Option<PatchRegion> {
        if row >= self.num_patches || col >= self.num_patches {
            return None;
        }
        Some(PatchRegion {
            x: col * self.patch_size,
            y: row * self.patch_size,
            size: self.patch_size,
        })
    }

    /// Iterates all patches in row-major order (rows outer, columns inner).
    pub fn regions(&self) -> impl Iterator<Item = (u32, u32, PatchRegion)> {
        let grid = *self;
        (0..grid.num_patches).flat_map(move |row| {
            (0..grid.num_patches).map(move |col| {
                let region = PatchRegion {
                    x: col * grid.patch_size,
                    y: row * grid.patch_size,
                    size: grid.patch_size,
                };
                (row, col, region)
            })
        })
    }

    /// Confirms the image's spatial dimensions match the tiling.
    pub fn check_image(&self, image: &RgbImage) -> Result<(), PatchError> {
        let (width, height) = image.dimensions();
        if width != self.img_size || height != self.img_size {
            return Err(PatchError::ShapeMismatch {
                width,
                height,
                expected: self.img_size,
            });
        }
        Ok(())
    }

    /// Borrowed view of one patch. The image is never copied or mutated.
    pub fn patch_view<'a>(
        &self,
        image: &'a RgbImage,
        row: u32,
        col: u32,
    ) -> Option<SubImage<&'a RgbImage>> {
        let region = self.region(row, col)?;
        Some(imageops::crop_imm(
            image,
            region.x,
            region.y,
            region.size,
            region.size,
        ))
    }

    pub fn summary(&self) -> PatchSummary {
        PatchSummary {
            img_size: self.img_size,
            patch_size: self.patch_size,
            num_patches: self.num_patches,
            cell_count: self.cell_count(),
            regions: self.regions().map(|(_, _, r)| r).collect(),
        }
    }
}
