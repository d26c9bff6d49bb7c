//! Проверка того, что логотип не ломает читаемость кода
//!
//! Бюджет уровня коррекции задаётся долей модулей матрицы N x N, которые можно
//! закрыть. Закрытыми считаются модули матрицы, хотя бы один пиксель которых
//! попадает под подложку или под сам логотип (углы логотипа могут выступать за
//! скругление подложки); тихая зона в расчёт не входит. Область, задевающая
//! finder-паттерн, недопустима при любом бюджете.

use serde::Serialize;

use crate::geometry::{Geometry, PixelRect};
use crate::logo::fit_within;
use crate::regions::RegionMap;
use crate::shapes::{RectF, Shape};
use crate::{limits, RenderConfig, RenderError};

/// Наименьший масштаб логотипа, до которого допускается уменьшение
pub const MIN_LOGO_SCALE: f32 = limits::LOGO_SCALE.min as f32;

/// Область, которую логотип занимает при заданной стороне
#[derive(Debug, Clone, PartialEq)]
pub struct Footprint {
    pub box_side: u32,
    pub logo_width: u32,
    pub logo_height: u32,
    pub plate: PixelRect,
    pub plate_radius: f32,
    /// Куда ляжет отмасштабированный логотип
    pub logo_rect: PixelRect,
    /// Модули матрицы под подложкой или логотипом, построчно
    pub knockout: Vec<(usize, usize)>,
    pub covers_eyes: bool,
    pub obscured_fraction: f32,
}

impl Footprint {
    /// Укладывается ли область в бюджет `budget`
    pub fn fits(&self, budget: f32) -> bool {
        !self.covers_eyes && self.obscured_fraction <= budget
    }
}

/// Расчёт области логотипа с пропорциями `logo_size`, вписанного в квадрат `box_side`
pub fn footprint(
    geometry: &Geometry,
    regions: &RegionMap,
    config: &RenderConfig,
    logo_size: (u32, u32),
    box_side: u32,
) -> Footprint {
    let canvas = geometry.canvas;
    let (logo_width, logo_height) = fit_within(logo_size.0, logo_size.1, box_side);

    let plate_width = (logo_width + 2 * config.logo_padding).min(canvas);
    let plate_height = (logo_height + 2 * config.logo_padding).min(canvas);
    let plate = PixelRect::new(
        (canvas - plate_width) / 2,
        (canvas - plate_height) / 2,
        plate_width,
        plate_height,
    );
    let shape = Shape::rounded(RectF::from(plate), config.logo_radius as f32);
    let plate_radius = match shape {
        Shape::RoundedRect { radius, .. } => radius,
        _ => 0.0,
    };
    let logo_rect = PixelRect::new(
        plate.x + plate.width.saturating_sub(logo_width) / 2,
        plate.y + plate.height.saturating_sub(logo_height) / 2,
        logo_width,
        logo_height,
    );
    let bounds = union_bounds(plate, logo_rect);

    let mut knockout = Vec::new();
    let mut covers_eyes = false;
    let mut obscured = 0usize;
    for row in geometry.module_span(bounds.y, bounds.bottom()) {
        for col in geometry.module_span(bounds.x, bounds.right()) {
            let cell = geometry.cell(row, col);
            if !shape.covers_any_pixel(cell) && logo_rect.intersection(&cell).is_none() {
                continue;
            }
            knockout.push((row, col));
            if regions.is_eye(row, col) {
                covers_eyes = true;
            } else {
                obscured += 1;
            }
        }
    }

    let total = geometry.dimension * geometry.dimension;
    Footprint {
        box_side,
        logo_width,
        logo_height,
        plate,
        plate_radius,
        logo_rect,
        knockout,
        covers_eyes,
        obscured_fraction: obscured as f32 / total as f32,
    }
}

fn union_bounds(a: PixelRect, b: PixelRect) -> PixelRect {
    let x = a.x.min(b.x);
    let y = a.y.min(b.y);
    PixelRect::new(x, y, a.right().max(b.right()) - x, a.bottom().max(b.bottom()) - y)
}

/// Итоговое размещение логотипа
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogoPlacement {
    pub requested_scale: f32,
    pub effective_scale: f32,
    pub box_side: u32,
    pub logo_width: u32,
    pub logo_height: u32,
    pub plate: PixelRect,
    pub plate_radius: f32,
    pub logo_rect: PixelRect,
    pub knockout: Vec<(usize, usize)>,
    pub obscured_fraction: f32,
    pub clamped: bool,
}

impl LogoPlacement {
    fn new(requested_scale: f32, canvas: u32, footprint: Footprint, clamped: bool) -> Self {
        Self {
            requested_scale,
            effective_scale: footprint.box_side as f32 / canvas as f32,
            box_side: footprint.box_side,
            logo_width: footprint.logo_width,
            logo_height: footprint.logo_height,
            plate: footprint.plate,
            plate_radius: footprint.plate_radius,
            logo_rect: footprint.logo_rect,
            knockout: footprint.knockout,
            obscured_fraction: footprint.obscured_fraction,
            clamped,
        }
    }

    /// Фигура подложки на холсте
    pub fn plate_shape(&self) -> Shape {
        Shape::rounded(RectF::from(self.plate), self.plate_radius)
    }
}

/// Сторона квадрата логотипа в пикселях для масштаба `scale`
fn side_for_scale(canvas: u32, scale: f32) -> u32 {
    ((canvas as f32 * scale).floor() as u32).max(1)
}

/// Выбор размера логотипа под бюджет уровня коррекции.
///
/// Если запрошенный размер не помещается в бюджет, сторона уменьшается
/// попиксельно до наибольшей подходящей (не меньше [`MIN_LOGO_SCALE`]).
/// Если не подходит даже минимальная, возвращается `LogoRejected`.
pub fn plan_logo(
    geometry: &Geometry,
    regions: &RegionMap,
    config: &RenderConfig,
    logo_size: (u32, u32),
) -> Result<LogoPlacement, RenderError> {
    let canvas = geometry.canvas;
    let level = config.ec_level;
    let budget = level.budget();
    let requested_side = side_for_scale(canvas, config.logo_scale);
    let min_side = side_for_scale(canvas, MIN_LOGO_SCALE).min(requested_side);

    let requested = footprint(geometry, regions, config, logo_size, requested_side);
    if requested.fits(budget) {
        log::debug!(
            "Logo fits: side={}px, obscured={:.3} of budget {:.2}",
            requested_side,
            requested.obscured_fraction,
            budget
        );
        return Ok(LogoPlacement::new(config.logo_scale, canvas, requested, false));
    }

    for side in (min_side..requested_side).rev() {
        let candidate = footprint(geometry, regions, config, logo_size, side);
        if candidate.fits(budget) {
            log::info!(
                "Logo clamped from {}px to {}px to stay within level {} budget ({:.3} <= {:.2})",
                requested_side,
                side,
                level.as_str(),
                candidate.obscured_fraction,
                budget
            );
            return Ok(LogoPlacement::new(config.logo_scale, canvas, candidate, true));
        }
    }

    let smallest = footprint(geometry, regions, config, logo_size, min_side);
    log::warn!(
        "Logo rejected at level {}: minimum footprint obscures {:.3} (budget {:.2}, covers eyes: {})",
        level.as_str(),
        smallest.obscured_fraction,
        budget,
        smallest.covers_eyes
    );
    Err(RenderError::LogoRejected {
        level,
        min_fraction: smallest.obscured_fraction,
        budget,
        covers_eyes: smallest.covers_eyes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EcLevel;

    fn setup(size: u32, dimension: usize) -> (Geometry, RegionMap) {
        (
            Geometry::plan(size, 4, dimension).unwrap(),
            RegionMap::classify(dimension),
        )
    }

    #[test]
    fn test_footprint_is_centered() {
        let (geometry, regions) = setup(512, 25);
        let config = RenderConfig::default();
        let fp = footprint(&geometry, &regions, &config, (100, 100), 100);
        assert_eq!((fp.logo_width, fp.logo_height), (100, 100));
        assert_eq!(fp.plate, PixelRect::new(186, 186, 140, 140));
        assert!(!fp.covers_eyes);
        assert_eq!(
            fp.obscured_fraction,
            fp.knockout.len() as f32 / 625.0,
            "no eye modules under a centered plate"
        );
    }

    #[test]
    fn test_knockout_matches_plate_pixels() {
        let (geometry, regions) = setup(512, 25);
        let config = RenderConfig {
            logo_padding: 5,
            logo_radius: 30,
            ..RenderConfig::default()
        };
        let fp = footprint(&geometry, &regions, &config, (3, 2), 90);
        let shape = Shape::rounded(RectF::from(fp.plate), fp.plate_radius);
        for row in 0..25 {
            for col in 0..25 {
                let cell = geometry.cell(row, col);
                let expected =
                    shape.covers_any_pixel(cell) || fp.logo_rect.intersection(&cell).is_some();
                assert_eq!(fp.knockout.contains(&(row, col)), expected, "module ({}, {})", row, col);
            }
        }
    }

    #[test]
    fn test_logo_corners_outside_rounded_plate_are_charged() {
        // Без отступа и с большим радиусом углы логотипа выходят за подложку
        let geometry = Geometry::plan(1024, 4, 177).unwrap();
        let regions = RegionMap::classify(177);
        let config = RenderConfig {
            ec_level: EcLevel::H,
            logo_scale: 0.1,
            logo_padding: 0,
            logo_radius: 100,
            ..RenderConfig::default()
        };
        let fp = footprint(&geometry, &regions, &config, (64, 64), 102);
        assert_eq!(fp.logo_rect, fp.plate);
        assert_eq!(fp.plate_radius, 51.0);

        let shape = Shape::rounded(RectF::from(fp.plate), fp.plate_radius);
        let mut beyond_plate = 0;
        for row in 0..177 {
            for col in 0..177 {
                let cell = geometry.cell(row, col);
                if fp.logo_rect.intersection(&cell).is_some() {
                    assert!(fp.knockout.contains(&(row, col)), "module ({}, {})", row, col);
                    if !shape.covers_any_pixel(cell) {
                        beyond_plate += 1;
                    }
                }
            }
        }
        assert!(beyond_plate > 0);
        assert_eq!(fp.obscured_fraction, fp.knockout.len() as f32 / (177.0 * 177.0));
    }

    #[test]
    fn test_fitting_logo_is_kept() {
        let (geometry, regions) = setup(512, 25);
        let config = RenderConfig {
            ec_level: EcLevel::H,
            logo_scale: 0.1,
            logo_padding: 0,
            ..RenderConfig::default()
        };
        let placement = plan_logo(&geometry, &regions, &config, (64, 64)).unwrap();
        assert!(!placement.clamped);
        assert_eq!(placement.box_side, 51);
        assert_eq!(placement.requested_scale, 0.1);
        assert!(placement.obscured_fraction <= EcLevel::H.budget());
    }

    #[test]
    fn test_oversized_logo_is_clamped() {
        let (geometry, regions) = setup(512, 25);
        let config = RenderConfig {
            ec_level: EcLevel::L,
            logo_scale: 0.3,
            ..RenderConfig::default()
        };
        let placement = plan_logo(&geometry, &regions, &config, (64, 64)).unwrap();
        assert!(placement.clamped);
        assert!(placement.effective_scale < 0.3);
        assert!(placement.obscured_fraction <= EcLevel::L.budget());

        // На пиксель больше уже не помещается
        let bigger = footprint(&geometry, &regions, &config, (64, 64), placement.box_side + 1);
        assert!(!bigger.fits(EcLevel::L.budget()));
    }

    #[test]
    fn test_rejected_when_minimum_does_not_fit() {
        // Маленький холст: даже минимальная подложка с отступом 100px закрывает всё
        let (geometry, regions) = setup(300, 21);
        let config = RenderConfig {
            ec_level: EcLevel::L,
            logo_padding: 100,
            ..RenderConfig::default()
        };
        match plan_logo(&geometry, &regions, &config, (10, 10)) {
            Err(RenderError::LogoRejected { level, min_fraction, budget, .. }) => {
                assert_eq!(level, EcLevel::L);
                assert!(min_fraction > budget);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_default_scale_respects_every_budget() {
        let (geometry, regions) = setup(1024, 33);
        for level in EcLevel::ALL {
            let config = RenderConfig {
                ec_level: level,
                ..RenderConfig::default()
            };
            if let Ok(placement) = plan_logo(&geometry, &regions, &config, (128, 128)) {
                assert!(placement.obscured_fraction <= level.budget(), "level {}", level.as_str());
            }
        }
    }
}
