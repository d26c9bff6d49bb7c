//! Наложение логотипа
//!
//! Порядок: выбить модули под подложкой и логотипом, нарисовать подложку цветом
//! фона, отмасштабировать логотип и положить его по центру подложки.

use image::imageops::{self, FilterType};
use image::Rgba;

use crate::geometry::PixelRect;
use crate::logo::LogoAsset;
use crate::logo_safety::LogoPlacement;
use crate::plan::RenderPlan;
use crate::shapes::fill_shape;

/// Наложение логотипа по готовому размещению.
///
/// Возвращает прямоугольник, в который лёг сам логотип.
pub fn composite_logo(
    plan: &mut RenderPlan,
    placement: &LogoPlacement,
    logo: &LogoAsset,
    background: Rgba<u8>,
) -> PixelRect {
    let mut erased = 0;
    for &(row, col) in &placement.knockout {
        if plan.knock_out(row, col, background) {
            erased += 1;
        }
    }

    fill_shape(plan.canvas_mut(), &placement.plate_shape(), background);

    let resized = imageops::resize(
        logo.image(),
        placement.logo_width,
        placement.logo_height,
        FilterType::Lanczos3,
    );
    let target = placement.logo_rect;
    let (x, y) = (target.x, target.y);

    if logo.has_transparency() {
        imageops::overlay(plan.canvas_mut(), &resized, x as i64, y as i64);
    } else {
        imageops::replace(plan.canvas_mut(), &resized, x as i64, y as i64);
    }

    log::debug!(
        "Logo {}x{} placed at ({}, {}), {} modules knocked out ({} erased)",
        placement.logo_width,
        placement.logo_height,
        x,
        y,
        placement.knockout.len(),
        erased
    );
    target
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Geometry;
    use crate::logo_safety::plan_logo;
    use crate::matrix::ModuleMatrix;
    use crate::modules::render_modules;
    use crate::regions::RegionMap;
    use crate::{EcLevel, ModuleStyle, RenderConfig};
    use image::RgbaImage;

    const INK: Rgba<u8> = Rgba([0, 0, 0, 255]);
    const PAPER: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const RED: Rgba<u8> = Rgba([220, 20, 20, 255]);

    fn painted_plan(config: &RenderConfig) -> (RenderPlan, RegionMap) {
        let geometry = Geometry::plan(config.size, config.border, 25).unwrap();
        let regions = RegionMap::classify(25);
        let matrix = ModuleMatrix::new(25, vec![true; 625]).unwrap();
        let mut plan = RenderPlan::new(geometry, PAPER);
        render_modules(&mut plan, &matrix, &regions, ModuleStyle::PlainSquare, INK);
        (plan, regions)
    }

    #[test]
    fn test_opaque_logo_is_pasted_on_plate() {
        let config = RenderConfig {
            size: 512,
            ec_level: EcLevel::H,
            logo_scale: 0.1,
            ..RenderConfig::default()
        };
        let (mut plan, regions) = painted_plan(&config);
        let logo = LogoAsset::from_image(RgbaImage::from_pixel(40, 40, RED)).unwrap();
        let placement = plan_logo(plan.geometry(), &regions, &config, (40, 40)).unwrap();

        let pasted = composite_logo(&mut plan, &placement, &logo, PAPER);

        assert_eq!(pasted.width, placement.logo_width);
        let (cx, cy) = (pasted.x + pasted.width / 2, pasted.y + pasted.height / 2);
        assert_eq!(*plan.canvas().get_pixel(cx, cy), RED);
        // Отступ подложки закрашен фоном
        assert_eq!(*plan.canvas().get_pixel(pasted.x - 2, cy), PAPER);
        for &(row, col) in &placement.knockout {
            assert!(plan.is_knocked_out(row, col));
            assert!(!plan.is_painted(row, col));
        }
        assert_eq!(plan.knocked_out_count(), placement.knockout.len());
    }

    #[test]
    fn test_logo_paints_only_knocked_out_modules() {
        for padding in [0, 3, 20] {
            for radius in [0, 10, 28, 100] {
                let config = RenderConfig {
                    size: 512,
                    ec_level: EcLevel::H,
                    logo_scale: 0.12,
                    logo_padding: padding,
                    logo_radius: radius,
                    ..RenderConfig::default()
                };
                let (mut plan, regions) = painted_plan(&config);
                let before = plan.canvas().clone();
                let logo = LogoAsset::from_image(RgbaImage::from_pixel(40, 40, RED)).unwrap();
                let placement = plan_logo(plan.geometry(), &regions, &config, (40, 40)).unwrap();

                composite_logo(&mut plan, &placement, &logo, PAPER);

                let geometry = *plan.geometry();
                let matrix = geometry.matrix_rect();
                for (x, y, pixel) in plan.canvas().enumerate_pixels() {
                    if *pixel == *before.get_pixel(x, y) || !matrix.contains(x, y) {
                        continue;
                    }
                    let row = ((y - geometry.origin()) / geometry.pitch) as usize;
                    let col = ((x - geometry.origin()) / geometry.pitch) as usize;
                    assert!(
                        placement.knockout.contains(&(row, col)),
                        "padding {} radius {}: pixel ({}, {}) changed in module ({}, {})",
                        padding,
                        radius,
                        x,
                        y,
                        row,
                        col
                    );
                }
            }
        }
    }

    #[test]
    fn test_transparent_logo_blends_with_plate() {
        let config = RenderConfig {
            size: 512,
            ec_level: EcLevel::H,
            logo_scale: 0.1,
            ..RenderConfig::default()
        };
        let (mut plan, regions) = painted_plan(&config);
        let logo = LogoAsset::from_image(RgbaImage::from_pixel(40, 40, Rgba([220, 20, 20, 0]))).unwrap();
        let placement = plan_logo(plan.geometry(), &regions, &config, (40, 40)).unwrap();

        let pasted = composite_logo(&mut plan, &placement, &logo, PAPER);
        let centre = *plan
            .canvas()
            .get_pixel(pasted.x + pasted.width / 2, pasted.y + pasted.height / 2);
        assert_eq!(centre, PAPER);
    }
}
