//! Отрисовка finder-паттернов («глаз»)
//!
//! Глаз рисуется тремя вложенными слоями: внешняя фигура цветом переднего плана,
//! вырез цветом фона и ядро снова цветом переднего плана. Форма слоёв зависит от
//! `eye_shape` и `eye_style` и не зависит от стиля обычных модулей.

use crate::geometry::Geometry;
use crate::plan::RenderPlan;
use crate::regions::{Corner, EYE_SIZE};
use crate::shapes::{fill_shape, RectF, Shape};
use crate::{limits, EyeShape, EyeStyle, RenderConfig};

/// Нижняя граница совпадает с допустимым диапазоном конфигурации
pub const EYE_SCALE_MIN: f32 = limits::EYE_SCALE.min as f32;
/// Больше 1.0 глаз вышел бы за свой блок 7x7
pub const EYE_SCALE_MAX: f32 = 1.0;

/// Толщина кольца `single-ring` в модулях
const RING_STROKE: f32 = 1.0;
/// Отступ ядра `single-ring` от внешней границы в модулях
const RING_CORE_INSET: f32 = 1.5;

/// Фактический масштаб глаза по одной оси
pub fn clamp_eye_scale(scale: f32) -> f32 {
    scale.clamp(EYE_SCALE_MIN, EYE_SCALE_MAX)
}

/// Три слоя одного глаза в координатах холста
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyeShapes {
    pub outer: Shape,
    pub cutout: Shape,
    pub core: Shape,
}

/// Геометрия глаза в углу `corner`
pub fn eye_shapes(geometry: &Geometry, corner: Corner, config: &RenderConfig) -> EyeShapes {
    let pitch = geometry.pitch as f32;
    let (row, col) = corner.origin(geometry.dimension);
    let cell = geometry.cell(row, col);
    let block = RectF::new(
        cell.x as f32,
        cell.y as f32,
        EYE_SIZE as f32 * pitch,
        EYE_SIZE as f32 * pitch,
    );
    let (cx, cy) = block.center();
    let sx = clamp_eye_scale(config.eye_scale_x);
    let sy = clamp_eye_scale(config.eye_scale_y);

    // Слой со стороной `modules`, растянутый вокруг центра глаза
    let layer = |modules: f32| {
        let w = modules * pitch * sx;
        let h = modules * pitch * sy;
        RectF::new(cx - w / 2.0, cy - h / 2.0, w, h)
    };

    match config.eye_style {
        EyeStyle::SingleRing => {
            let outer = layer(EYE_SIZE as f32);
            EyeShapes {
                outer: Shape::Ellipse(outer),
                cutout: Shape::Ellipse(outer.inset(RING_STROKE * pitch * sx, RING_STROKE * pitch * sy)),
                core: Shape::Ellipse(outer.inset(RING_CORE_INSET * pitch * sx, RING_CORE_INSET * pitch * sy)),
            }
        }
        EyeStyle::StandardIndependent => {
            let radius = config.eye_radius * pitch;
            let shape = |rect: RectF| match config.eye_shape {
                EyeShape::Rectangle => Shape::Rect(rect),
                EyeShape::Rounded => Shape::rounded(rect, radius),
                EyeShape::Circle => Shape::Ellipse(rect),
            };
            EyeShapes {
                outer: shape(layer(7.0)),
                cutout: shape(layer(5.0)),
                core: shape(layer(3.0)),
            }
        }
    }
}

/// Рисование трёх глаз; возвращает число закрашенных цветом переднего плана пикселей
pub fn render_eyes(plan: &mut RenderPlan, config: &RenderConfig) -> usize {
    let geometry = *plan.geometry();
    let fg = config.foreground.to_rgba();
    let bg = config.background.to_rgba();
    let mut painted = 0;

    for corner in Corner::ALL {
        let eye = eye_shapes(&geometry, corner, config);
        let canvas = plan.canvas_mut();
        painted += fill_shape(canvas, &eye.outer, fg);
        painted = painted.saturating_sub(fill_shape(canvas, &eye.cutout, bg));
        painted += fill_shape(canvas, &eye.core, fg);
    }

    log::debug!(
        "Drew eyes: shape={}, style={}",
        config.eye_shape.as_str(),
        config.eye_style.as_str()
    );
    painted
}
