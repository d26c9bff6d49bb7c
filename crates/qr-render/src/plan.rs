//! Рабочая поверхность одного вызова рендеринга
//!
//! Холст плюс побитовые карты «закрашен» / «выбит логотипом» по координатам
//! модулей. Создаётся в начале вызова и уничтожается при его завершении;
//! между вызовами ничего не разделяется.

use image::{Rgba, RgbaImage};

use crate::geometry::Geometry;
use crate::shapes::fill_rect;

pub struct RenderPlan {
    canvas: RgbaImage,
    geometry: Geometry,
    painted: Vec<bool>,
    knocked_out: Vec<bool>,
}

impl RenderPlan {
    /// Новый холст, залитый цветом фона
    pub fn new(geometry: Geometry, background: Rgba<u8>) -> Self {
        let modules = geometry.dimension * geometry.dimension;
        Self {
            canvas: RgbaImage::from_pixel(geometry.canvas, geometry.canvas, background),
            geometry,
            painted: vec![false; modules],
            knocked_out: vec![false; modules],
        }
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut RgbaImage {
        &mut self.canvas
    }

    fn index(&self, row: usize, col: usize) -> usize {
        row * self.geometry.dimension + col
    }

    pub fn mark_painted(&mut self, row: usize, col: usize) {
        let idx = self.index(row, col);
        self.painted[idx] = true;
    }

    pub fn is_painted(&self, row: usize, col: usize) -> bool {
        self.painted[self.index(row, col)]
    }

    pub fn is_knocked_out(&self, row: usize, col: usize) -> bool {
        self.knocked_out[self.index(row, col)]
    }

    /// Выбить модуль под логотип: стереть его краску фоном.
    ///
    /// Возвращает `true`, если модуль был закрашен и его пришлось стирать.
    pub fn knock_out(&mut self, row: usize, col: usize, background: Rgba<u8>) -> bool {
        let idx = self.index(row, col);
        self.knocked_out[idx] = true;
        if !self.painted[idx] {
            return false;
        }

        let cell = self.geometry.cell(row, col);
        fill_rect(&mut self.canvas, cell, background);
        self.painted[idx] = false;
        true
    }

    pub fn painted_count(&self) -> usize {
        self.painted.iter().filter(|&&p| p).count()
    }

    pub fn knocked_out_count(&self) -> usize {
        self.knocked_out.iter().filter(|&&k| k).count()
    }

    pub fn into_canvas(self) -> RgbaImage {
        self.canvas
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INK: Rgba<u8> = Rgba([0, 0, 0, 255]);
    const PAPER: Rgba<u8> = Rgba([255, 255, 255, 255]);

    #[test]
    fn test_knock_out_erases_painted_cell() {
        let geometry = Geometry::plan(290, 4, 21).unwrap();
        let mut plan = RenderPlan::new(geometry, PAPER);
        let cell = geometry.cell(10, 10);
        fill_rect(plan.canvas_mut(), cell, INK);
        plan.mark_painted(10, 10);

        assert!(plan.knock_out(10, 10, PAPER));
        assert!(plan.is_knocked_out(10, 10));
        assert!(!plan.is_painted(10, 10));
        assert_eq!(*plan.canvas().get_pixel(cell.x, cell.y), PAPER);

        // Повторное выбивание ничего не стирает
        assert!(!plan.knock_out(10, 10, PAPER));
        assert_eq!(plan.knocked_out_count(), 1);
    }

    #[test]
    fn test_canvas_has_configured_size() {
        let geometry = Geometry::plan(512, 4, 25).unwrap();
        let plan = RenderPlan::new(geometry, PAPER);
        assert_eq!(plan.canvas().dimensions(), (512, 512));
        assert_eq!(plan.painted_count(), 0);
    }
}
