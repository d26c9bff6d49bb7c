//! Классификация модулей по структурной роли
//!
//! Три finder-паттерна («глаза») всегда занимают блоки 7x7 в трёх углах матрицы;
//! всё остальное (данные, тайминг, выравнивание, служебные биты) рисуется
//! одинаково и считается обычным модулем. Карта зависит только от стороны матрицы.

use serde::Serialize;

/// Сторона блока finder-паттерна в модулях
pub const EYE_SIZE: usize = 7;

/// Угол, в котором стоит finder-паттерн
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
}

impl Corner {
    pub const ALL: [Corner; 3] = [Corner::TopLeft, Corner::TopRight, Corner::BottomLeft];

    /// Модуль (строка, столбец) левого верхнего угла блока 7x7
    pub fn origin(self, dimension: usize) -> (usize, usize) {
        let far = dimension - EYE_SIZE;
        match self {
            Corner::TopLeft => (0, 0),
            Corner::TopRight => (0, far),
            Corner::BottomLeft => (far, 0),
        }
    }
}

/// Часть finder-паттерна
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EyePart {
    /// Внешнее кольцо: блок 7x7 минус внутренний 5x5
    Outer,
    /// Светлый зазор между кольцом и ядром
    Gap,
    /// Ядро 3x3
    Core,
}

/// Роль модуля в матрице
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Region {
    Eye { corner: Corner, part: EyePart },
    Generic,
}

/// Карта ролей всех модулей матрицы
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionMap {
    dimension: usize,
    regions: Vec<Region>,
}

impl RegionMap {
    /// Построение карты для матрицы со стороной `dimension`
    pub fn classify(dimension: usize) -> Self {
        let mut regions = Vec::with_capacity(dimension * dimension);
        for row in 0..dimension {
            for col in 0..dimension {
                regions.push(classify_module(dimension, row, col));
            }
        }
        Self { dimension, regions }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn get(&self, row: usize, col: usize) -> Region {
        self.regions[row * self.dimension + col]
    }

    pub fn is_eye(&self, row: usize, col: usize) -> bool {
        matches!(self.get(row, col), Region::Eye { .. })
    }

    pub fn eye_module_count(&self) -> usize {
        self.regions
            .iter()
            .filter(|region| matches!(region, Region::Eye { .. }))
            .count()
    }
}

fn classify_module(dimension: usize, row: usize, col: usize) -> Region {
    for corner in Corner::ALL {
        let (top, left) = corner.origin(dimension);
        if row < top || row >= top + EYE_SIZE || col < left || col >= left + EYE_SIZE {
            continue;
        }

        // Расстояние Чебышёва до центра блока: 3 - кольцо, 2 - зазор, иначе ядро
        let ring = (row - top).abs_diff(3).max((col - left).abs_diff(3));
        let part = match ring {
            3 => EyePart::Outer,
            2 => EyePart::Gap,
            _ => EyePart::Core,
        };
        return Region::Eye { corner, part };
    }
    Region::Generic
}
