//! Отрисовка обычных модулей
//!
//! Каждый тёмный модуль вне finder-паттернов рисуется отдельной фигурой в своей
//! ячейке; соседние модули никогда не объединяются в общий примитив.

use image::Rgba;

use crate::geometry::PixelRect;
use crate::matrix::ModuleMatrix;
use crate::plan::RenderPlan;
use crate::regions::RegionMap;
use crate::shapes::{fill_rect, fill_shape, RectF, Shape};
use crate::ModuleStyle;

/// Радиус скругления `rounded-square` в долях шага
pub const ROUNDED_RADIUS_RATIO: f32 = 0.35;
/// Отступ круга `dot` от края ячейки (диаметр = 0.9 шага)
pub const DOT_INSET_RATIO: f32 = 0.05;
/// Зазор `gapped-square` с каждой стороны
pub const GAP_RATIO: f32 = 0.1;
/// Толщина полосы `bar-*` поперёк её направления
pub const BAR_THICKNESS_RATIO: f32 = 0.8;

/// Фигура модуля в ячейке `cell`
pub fn module_shape(style: ModuleStyle, cell: PixelRect) -> Shape {
    let pitch = cell.width as f32;
    let rect = RectF::from(cell);
    let bar_inset = pitch * (1.0 - BAR_THICKNESS_RATIO) / 2.0;

    match style {
        ModuleStyle::PlainSquare => Shape::Rect(rect),
        ModuleStyle::RoundedSquare => Shape::rounded(rect, pitch * ROUNDED_RADIUS_RATIO),
        ModuleStyle::Dot => {
            let inset = pitch * DOT_INSET_RATIO;
            Shape::Ellipse(rect.inset(inset, inset))
        }
        ModuleStyle::GappedSquare => {
            let gap = pitch * GAP_RATIO;
            Shape::Rect(rect.inset(gap, gap))
        }
        ModuleStyle::BarVertical => Shape::Rect(rect.inset(bar_inset, 0.0)),
        ModuleStyle::BarHorizontal => Shape::Rect(rect.inset(0.0, bar_inset)),
    }
}

/// Рисование всех тёмных обычных модулей; возвращает число нарисованных модулей
pub fn render_modules(
    plan: &mut RenderPlan,
    matrix: &ModuleMatrix,
    regions: &RegionMap,
    style: ModuleStyle,
    color: Rgba<u8>,
) -> usize {
    let geometry = *plan.geometry();
    let dimension = matrix.dimension();
    let mut drawn = 0;

    for row in 0..dimension {
        for col in 0..dimension {
            if regions.is_eye(row, col) || !matrix.is_dark(row, col) {
                continue;
            }

            let cell = geometry.cell(row, col);
            match style {
                ModuleStyle::PlainSquare => fill_rect(plan.canvas_mut(), cell, color),
                _ => {
                    fill_shape(plan.canvas_mut(), &module_shape(style, cell), color);
                }
            }
            plan.mark_painted(row, col);
            drawn += 1;
        }
    }

    log::debug!("Drew {} modules as {}", drawn, style.as_str());
    drawn
}
