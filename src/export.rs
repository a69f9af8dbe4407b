//! Grayscale PNG export of heightfields and slope maps.

use crate::errors::TerrainResult;
use crate::heightfield::HeightField;
use crate::terrain::slope::SlopeMap;
use image::{GrayImage, Luma};
use std::path::Path;
use tracing::info;

/// Map `value` in `[min, max]` to a gray level; a flat range maps to black
fn to_gray(value: f32, min: f32, max: f32) -> u8 {
    let range = max - min;
    if range <= 0.0 {
        return 0;
    }
    (((value - min) / range).clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Render a slope map, black at 0 degrees and white at `ceiling_degrees`.
///
/// Slopes above the ceiling saturate to white, so impassable cells stand out
/// when the ceiling is the search's `max_slope_degrees`. With a non-positive
/// ceiling every sloped cell is white and only flat cells stay black.
pub fn slope_map_image(map: &SlopeMap, ceiling_degrees: f32) -> GrayImage {
    let width = map.width();
    let values = map.values();
    GrayImage::from_fn(map.width(), map.height(), |x, y| {
        let value = values[(y * width + x) as usize];
        let level = if ceiling_degrees <= 0.0 {
            if value > 0.0 { 255 } else { 0 }
        } else {
            to_gray(value, 0.0, ceiling_degrees)
        };
        Luma([level])
    })
}

/// Render elevations scaled between the field's extrema
pub fn heightmap_image(field: &HeightField) -> GrayImage {
    let (min, max) = (field.min_elevation(), field.max_elevation());
    let width = field.width();
    let samples = field.samples();
    GrayImage::from_fn(field.width(), field.height(), |x, y| {
        Luma([to_gray(samples[(y * width + x) as usize], min, max)])
    })
}

pub fn export_slope_map_png<P: AsRef<Path>>(
    map: &SlopeMap,
    ceiling_degrees: f32,
    path: P,
) -> TerrainResult<()> {
    let path = path.as_ref();
    slope_map_image(map, ceiling_degrees).save(path)?;
    info!("Slope map exported to {}", path.display());
    Ok(())
}

pub fn export_heightmap_png<P: AsRef<Path>>(field: &HeightField, path: P) -> TerrainResult<()> {
    let path = path.as_ref();
    heightmap_image(field).save(path)?;
    info!("Heightmap exported to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::slope::slope_map;

    #[test]
    fn test_heightmap_spans_full_range() {
        let field = HeightField::new(3, 1, vec![-2.0, 0.0, 2.0]).unwrap();
        let img = heightmap_image(&field);
        assert_eq!(img.dimensions(), (3, 1));
        assert_eq!(img.get_pixel(0, 0).0, [0]);
        assert_eq!(img.get_pixel(1, 0).0, [128]);
        assert_eq!(img.get_pixel(2, 0).0, [255]);
    }

    #[test]
    fn test_flat_heightmap_is_black() {
        let field = HeightField::flat(2, 2, 7.0).unwrap();
        let img = heightmap_image(&field);
        assert!(img.pixels().all(|p| p.0 == [0]));
    }

    #[test]
    fn test_slope_image_saturates_above_ceiling() {
        let mut samples = vec![0.0; 9];
        samples[4] = 100.0;
        let field = HeightField::new(3, 3, samples).unwrap();
        let img = slope_map_image(&slope_map(&field), 30.0);
        assert!(img.pixels().all(|p| p.0 == [255]));
    }

    #[test]
    fn test_slope_image_with_zero_ceiling() {
        // Cell 0 only borders flat ground
        let field = HeightField::new(3, 1, vec![0.0, 0.0, 5.0]).unwrap();
        let map = slope_map(&field);
        let img = slope_map_image(&map, 0.0);
        assert_eq!(img.get_pixel(1, 0).0, [255]);
        assert_eq!(img.get_pixel(2, 0).0, [255]);
        assert_eq!(img.get_pixel(0, 0).0, [0]);
    }

    #[test]
    fn test_export_writes_png_files() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let field = HeightField::new(2, 2, vec![0.0, 1.0, 2.0, 3.0]).unwrap();

        let height_path = dir.path().join("height.png");
        export_heightmap_png(&field, &height_path).expect("Heightmap export should succeed");
        let reloaded = image::open(&height_path).unwrap().to_luma8();
        assert_eq!(reloaded, heightmap_image(&field));

        let slope_path = dir.path().join("slope.png");
        export_slope_map_png(&slope_map(&field), 45.0, &slope_path).unwrap();
        assert!(slope_path.exists());
    }
}
