//! Rasterization primitives shared by the module, eye and logo stages.
//!
//! A pixel belongs to a shape when its center lies inside the shape. There is no
//! anti-aliasing, so every stage paints exact, repeatable pixel sets.

use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

use crate::geometry::PixelRect;

/// Axis-aligned rectangle in canvas coordinates, half-open on the right/bottom
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectF {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl RectF {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x0: x,
            y0: y,
            x1: x + width,
            y1: y + height,
        }
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    pub fn center(&self) -> (f32, f32) {
        ((self.x0 + self.x1) / 2.0, (self.y0 + self.y1) / 2.0)
    }

    /// Shrink by `dx` on the left and right and `dy` on the top and bottom
    pub fn inset(&self, dx: f32, dy: f32) -> Self {
        Self {
            x0: self.x0 + dx,
            y0: self.y0 + dy,
            x1: self.x1 - dx,
            y1: self.y1 - dy,
        }
    }
}

impl From<PixelRect> for RectF {
    fn from(rect: PixelRect) -> Self {
        RectF::new(rect.x as f32, rect.y as f32, rect.width as f32, rect.height as f32)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Rect(RectF),
    RoundedRect { rect: RectF, radius: f32 },
    Ellipse(RectF),
}

impl Shape {
    /// Rounded rectangle; the radius is limited to half of the shorter side
    pub fn rounded(rect: RectF, radius: f32) -> Self {
        let radius = radius.min(rect.width().min(rect.height()) / 2.0).max(0.0);
        if radius == 0.0 {
            Shape::Rect(rect)
        } else {
            Shape::RoundedRect { rect, radius }
        }
    }

    pub fn bounds(&self) -> RectF {
        match *self {
            Shape::Rect(rect) | Shape::RoundedRect { rect, .. } | Shape::Ellipse(rect) => rect,
        }
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        let b = self.bounds();
        if x < b.x0 || x >= b.x1 || y < b.y0 || y >= b.y1 {
            return false;
        }

        match *self {
            Shape::Rect(_) => true,
            Shape::RoundedRect { rect, radius } => {
                let dx = x - x.max(rect.x0 + radius).min(rect.x1 - radius);
                let dy = y - y.max(rect.y0 + radius).min(rect.y1 - radius);
                dx * dx + dy * dy <= radius * radius
            }
            Shape::Ellipse(rect) => {
                let (cx, cy) = rect.center();
                let rx = rect.width() / 2.0;
                let ry = rect.height() / 2.0;
                if rx <= 0.0 || ry <= 0.0 {
                    return false;
                }
                let nx = (x - cx) / rx;
                let ny = (y - cy) / ry;
                nx * nx + ny * ny <= 1.0
            }
        }
    }

    /// Whether painting this shape would touch any pixel of `area`
    pub fn covers_any_pixel(&self, area: PixelRect) -> bool {
        match *self {
            Shape::Rect(rect) => {
                let (x0, x1) = center_range(area.x, area.right(), rect.x0, rect.x1);
                let (y0, y1) = center_range(area.y, area.bottom(), rect.y0, rect.y1);
                x0 < x1 && y0 < y1
            }
            Shape::RoundedRect { rect, radius } => {
                let (x0, x1) = center_range(area.x, area.right(), rect.x0, rect.x1);
                let (y0, y1) = center_range(area.y, area.bottom(), rect.y0, rect.y1);
                if x0 >= x1 || y0 >= y1 {
                    return false;
                }
                // Within `radius` of the inner rectangle
                let dx = axis_gap(x0, x1, rect.x0 + radius, rect.x1 - radius);
                let dy = axis_gap(y0, y1, rect.y0 + radius, rect.y1 - radius);
                dx * dx + dy * dy <= radius * radius
            }
            Shape::Ellipse(_) => (area.y..area.bottom()).any(|py| {
                (area.x..area.right()).any(|px| self.contains(px as f32 + 0.5, py as f32 + 0.5))
            }),
        }
    }
}

/// Pixels of `[start, end)` whose centers fall inside `[lo, hi)`
fn center_range(start: u32, end: u32, lo: f32, hi: f32) -> (u32, u32) {
    let first = (lo - 0.5).ceil().max(start as f32);
    let past = (hi - 0.5).ceil().min(end as f32);
    (first as u32, past.max(first) as u32)
}

/// Smallest distance from a pixel center in the non-empty range `[start, end)`
/// to the closed span `[lo, hi]`
fn axis_gap(start: u32, end: u32, lo: f32, hi: f32) -> f32 {
    let first = start as f32 + 0.5;
    let last = end as f32 - 0.5;
    if last < lo {
        return lo - last;
    }
    if first > hi {
        return first - hi;
    }
    // Smallest pixel center not left of `lo`
    let above = ((lo - 0.5).ceil() + 0.5).max(first);
    if above <= hi {
        0.0
    } else {
        (above - hi).min(lo - (above - 1.0))
    }
}

/// Fill an integer rectangle, clipped to the canvas
pub fn fill_rect(canvas: &mut RgbaImage, rect: PixelRect, color: Rgba<u8>) {
    if rect.width == 0 || rect.height == 0 {
        return;
    }
    draw_filled_rect_mut(
        canvas,
        Rect::at(rect.x as i32, rect.y as i32).of_size(rect.width, rect.height),
        color,
    );
}

/// Paint every canvas pixel whose center lies inside `shape`; returns the count
pub fn fill_shape(canvas: &mut RgbaImage, shape: &Shape, color: Rgba<u8>) -> usize {
    if let Shape::Rect(rect) = shape {
        if let Some(pixels) = pixel_aligned(rect) {
            let bounds = PixelRect::new(0, 0, canvas.width(), canvas.height());
            return match pixels.intersection(&bounds) {
                Some(visible) => {
                    fill_rect(canvas, visible, color);
                    visible.width as usize * visible.height as usize
                }
                None => 0,
            };
        }
    }

    let b = shape.bounds();
    let (width, height) = canvas.dimensions();
    let x_start = b.x0.floor().max(0.0) as u32;
    let y_start = b.y0.floor().max(0.0) as u32;
    let x_end = (b.x1.ceil().max(0.0) as u32).min(width);
    let y_end = (b.y1.ceil().max(0.0) as u32).min(height);

    let mut painted = 0;
    for py in y_start..y_end {
        for px in x_start..x_end {
            if shape.contains(px as f32 + 0.5, py as f32 + 0.5) {
                canvas.put_pixel(px, py, color);
                painted += 1;
            }
        }
    }
    painted
}

/// Integer rectangle equal to `rect`, when its edges sit on pixel boundaries
fn pixel_aligned(rect: &RectF) -> Option<PixelRect> {
    let aligned = [rect.x0, rect.y0, rect.x1, rect.y1]
        .iter()
        .all(|v| v.fract() == 0.0 && *v >= 0.0);
    if !aligned || rect.x1 <= rect.x0 || rect.y1 <= rect.y0 {
        return None;
    }
    Some(PixelRect::new(
        rect.x0 as u32,
        rect.y0 as u32,
        (rect.x1 - rect.x0) as u32,
        (rect.y1 - rect.y0) as u32,
    ))
}
