use image::{GenericImageView, Rgb, RgbImage};
use patchify::patch_grid::{PatchError, PatchGrid};

fn gradient_image(size: u32) -> RgbImage {
    RgbImage::from_fn(size, size, |x, y| Rgb([(x * 7) as u8, (y * 7) as u8, 128]))
}

#[test]
fn vit_default_sizes() {
    let grid = PatchGrid::new(224, 16).expect("224/16 must tile");
    assert_eq!(grid.num_patches(), 14);
    assert_eq!(grid.cell_count(), 196);
    let region = grid.region(0, 0).expect("corner region");
    assert_eq!(region.size, 16);
}

#[test]
fn small_grid_sizes() {
    let grid = PatchGrid::new(32, 8).expect("32/8 must tile");
    assert_eq!(grid.num_patches(), 4);
    assert_eq!(grid.cell_count(), 16);
}

#[test]
fn indivisible_size_is_rejected() {
    let err = PatchGrid::new(30, 16).expect_err("30 % 16 != 0");
    assert!(matches!(
        err,
        PatchError::Indivisible {
            img_size: 30,
            patch_size: 16
        }
    ));
}

#[test]
fn zero_sizes_are_rejected() {
    assert!(matches!(
        PatchGrid::new(0, 16),
        Err(PatchError::ZeroImageSize)
    ));
    assert!(matches!(
        PatchGrid::new(32, 0),
        Err(PatchError::ZeroPatchSize)
    ));
}

#[test]
fn regions_cover_image_exactly_once() {
    let grid = PatchGrid::new(32, 8).expect("grid");
    let size = grid.img_size() as usize;
    let mut touched = vec![0u32; size * size];
    for (_, _, region) in grid.regions() {
        for y in region.y..region.y + region.size {
            for x in region.x..region.x + region.size {
                touched[y as usize * size + x as usize] += 1;
            }
        }
    }
    assert!(
        touched.iter().all(|&count| count == 1),
        "tiling must cover every pixel exactly once"
    );
}

#[test]
fn region_offsets_match_grid_position() {
    let grid = PatchGrid::new(32, 8).expect("grid");
    let region = grid.region(2, 3).expect("in range");
    assert_eq!(region.y, 16, "row index scales height offset");
    assert_eq!(region.x, 24, "column index scales width offset");
    assert!(grid.region(4, 0).is_none());
    assert!(grid.region(0, 4).is_none());
}

#[test]
fn regions_iterate_row_major() {
    let grid = PatchGrid::new(32, 8).expect("grid");
    let order: Vec<(u32, u32)> = grid.regions().map(|(row, col, _)| (row, col)).collect();
    assert_eq!(order.len(), 16);
    assert_eq!(&order[..5], &[(0, 0), (0, 1), (0, 2), (0, 3), (1, 0)]);
    assert_eq!(order[15], (3, 3));
}

#[test]
fn patch_view_matches_source_pixels() {
    let img = gradient_image(32);
    let grid = PatchGrid::new(32, 8).expect("grid");
    let region = grid.region(1, 2).expect("in range");
    let view = grid.patch_view(&img, 1, 2).expect("view");
    assert_eq!(view.dimensions(), (8, 8));
    for y in 0..8 {
        for x in 0..8 {
            assert_eq!(
                view.get_pixel(x, y),
                *img.get_pixel(region.x + x, region.y + y),
                "patch ({x},{y}) must alias the source region"
            );
        }
    }
}

#[test]
fn check_image_rejects_wrong_shape() {
    let grid = PatchGrid::new(32, 8).expect("grid");
    let err = grid
        .check_image(&gradient_image(16))
        .expect_err("16x16 is not 32x32");
    assert!(matches!(
        err,
        PatchError::ShapeMismatch {
            width: 16,
            height: 16,
            expected: 32
        }
    ));
    grid.check_image(&gradient_image(32)).expect("exact shape");
}

#[test]
fn summary_lists_all_regions() {
    let grid = PatchGrid::new(224, 16).expect("grid");
    let summary = grid.summary();
    assert_eq!(summary.cell_count, 196);
    assert_eq!(summary.regions.len(), 196);
    let json = serde_json::to_value(&summary).expect("serialize");
    assert_eq!(json["num_patches"], 14);
    assert_eq!(json["regions"][0]["x"], 0);
    assert_eq!(json["regions"][195]["x"], 208);
    assert_eq!(json["regions"][195]["y"], 208);
}
