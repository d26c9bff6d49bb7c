//! Матрица модулей QR-кода
//!
//! Неизменяемая квадратная сетка светлых/тёмных модулей. Матрица приходит от
//! внешнего кодировщика; для удобства есть адаптер над крейтом `qrcode`.

use qrcode::types::QrError;
use qrcode::QrCode;

use crate::{EcLevel, RenderError};

/// Наименьшая сторона матрицы (версия 1)
pub const MIN_DIMENSION: usize = 21;
/// Наибольшая сторона матрицы (версия 40)
pub const MAX_DIMENSION: usize = 177;

/// Квадратная матрица модулей (`true` = тёмный)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleMatrix {
    dimension: usize,
    modules: Vec<bool>,
}

impl ModuleMatrix {
    /// Создание матрицы из построчно уложенных модулей
    pub fn new(dimension: usize, modules: Vec<bool>) -> Result<Self, RenderError> {
        if dimension < MIN_DIMENSION || dimension > MAX_DIMENSION {
            return Err(RenderError::InvalidMatrix(format!(
                "dimension {} is outside {}..={}",
                dimension, MIN_DIMENSION, MAX_DIMENSION
            )));
        }
        if dimension % 2 == 0 {
            return Err(RenderError::InvalidMatrix(format!(
                "dimension {} must be odd",
                dimension
            )));
        }
        if modules.len() != dimension * dimension {
            return Err(RenderError::InvalidMatrix(format!(
                "expected {} modules, got {}",
                dimension * dimension,
                modules.len()
            )));
        }

        Ok(Self { dimension, modules })
    }

    /// Создание матрицы из набора строк
    pub fn from_rows(rows: &[Vec<bool>]) -> Result<Self, RenderError> {
        let dimension = rows.len();
        if let Some(row) = rows.iter().find(|row| row.len() != dimension) {
            return Err(RenderError::InvalidMatrix(format!(
                "matrix is not square: row of {} modules in a {}-row matrix",
                row.len(),
                dimension
            )));
        }
        Self::new(dimension, rows.concat())
    }

    /// Кодирование текста в матрицу на заданном уровне коррекции
    ///
    /// Возвращает матрицу и фактически выбранный уровень.
    pub fn encode(text: &str, level: EcLevel) -> Result<(Self, EcLevel), RenderError> {
        let code = QrCode::with_error_correction_level(text.as_bytes(), to_qrcode_level(level))
            .map_err(|e| match e {
                QrError::DataTooLong => RenderError::DataTooLong(format!(
                    "{} bytes do not fit at level {}",
                    text.len(),
                    level.as_str()
                )),
                other => RenderError::InvalidMatrix(other.to_string()),
            })?;

        let dimension = code.width();
        let modules = code
            .to_colors()
            .into_iter()
            .map(|color| color == qrcode::Color::Dark)
            .collect();
        let chosen = from_qrcode_level(code.error_correction_level());

        log::debug!("Encoded {} bytes into a {}x{} matrix", text.len(), dimension, dimension);
        Ok((Self::new(dimension, modules)?, chosen))
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn is_dark(&self, row: usize, col: usize) -> bool {
        self.modules[row * self.dimension + col]
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    pub fn dark_count(&self) -> usize {
        self.modules.iter().filter(|&&dark| dark).count()
    }
}

fn to_qrcode_level(level: EcLevel) -> qrcode::EcLevel {
    match level {
        EcLevel::L => qrcode::EcLevel::L,
        EcLevel::M => qrcode::EcLevel::M,
        EcLevel::Q => qrcode::EcLevel::Q,
        EcLevel::H => qrcode::EcLevel::H,
    }
}

fn from_qrcode_level(level: qrcode::EcLevel) -> EcLevel {
    match level {
        qrcode::EcLevel::L => EcLevel::L,
        qrcode::EcLevel::M => EcLevel::M,
        qrcode::EcLevel::Q => EcLevel::Q,
        qrcode::EcLevel::H => EcLevel::H,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_url() {
        let (matrix, level) = ModuleMatrix::encode("https://example.com/a", EcLevel::Q).unwrap();
        assert_eq!(level, EcLevel::Q);
        assert_eq!(matrix.dimension() % 4, 1);
        assert!(matrix.dimension() >= MIN_DIMENSION);
        // Левый верхний угол finder-паттерна всегда тёмный
        assert!(matrix.is_dark(0, 0));
        assert!(!matrix.is_dark(1, 1));
    }

    #[test]
    fn test_encode_too_long() {
        let text = "x".repeat(4000);
        assert!(matches!(
            ModuleMatrix::encode(&text, EcLevel::H),
            Err(RenderError::DataTooLong(_))
        ));
    }

    #[test]
    fn test_rejects_bad_dimensions() {
        assert!(ModuleMatrix::new(20, vec![false; 400]).is_err());
        assert!(ModuleMatrix::new(22, vec![false; 484]).is_err());
        assert!(ModuleMatrix::new(21, vec![false; 440]).is_err());
        assert!(ModuleMatrix::new(21, vec![false; 441]).is_ok());
    }

    #[test]
    fn test_from_rows_requires_square() {
        let mut rows = vec![vec![false; 21]; 21];
        assert!(ModuleMatrix::from_rows(&rows).is_ok());
        rows[3].push(true);
        assert!(matches!(
            ModuleMatrix::from_rows(&rows),
            Err(RenderError::InvalidMatrix(_))
        ));
    }
}
