//! QR Render - Модуль стилизованной отрисовки QR-кодов
//!
//! Библиотека превращает матрицу модулей в готовый PNG с поддержкой:
//! - Шести стилей модулей и трёх форм finder-паттернов («глаз»)
//! - Логотипа с подложкой в пределах бюджета коррекции ошибок
//! - Скругления углов всего изображения
//! - Квантования в ограниченную палитру и сжатия PNG
//!
//! Каждый вызов [`render`] - чистая функция своих аргументов: движок не хранит
//! состояния между вызовами и может работать из любого числа потоков.

pub mod catalog;
pub mod compositing;
pub mod config;
pub mod eyes;
pub mod finishing;
pub mod geometry;
pub mod logo;
pub mod logo_safety;
pub mod matrix;
pub mod modules;
pub mod output;
pub mod palette;
pub mod plan;
pub mod presets;
pub mod regions;
pub mod shapes;

pub use catalog::StyleCatalog;
pub use config::{
    limits, ColorParseError, EcLevel, EyeShape, EyeStyle, ModuleStyle, NumericRange,
    RenderConfig, Rgb,
};
pub use geometry::{Geometry, PixelRect};
pub use logo::LogoAsset;
pub use logo_safety::LogoPlacement;
pub use matrix::ModuleMatrix;
pub use presets::Preset;
pub use regions::{Corner, EyePart, Region, RegionMap};

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::plan::RenderPlan;

/// Основные ошибки модуля
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("Invalid geometry: {size}px canvas cannot fit {dimension} modules with a {border}-module border")]
    InvalidGeometry {
        size: u32,
        border: u32,
        dimension: usize,
    },

    #[error("Config out of range: {field} = {value}, expected {min}..={max}")]
    ConfigOutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Logo rejected: smallest logo obscures {min_fraction:.3} of the matrix, level {level} allows {budget:.2} (covers finder pattern: {covers_eyes})")]
    LogoRejected {
        level: EcLevel,
        min_fraction: f32,
        budget: f32,
        covers_eyes: bool,
    },

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Invalid matrix: {0}")]
    InvalidMatrix(String),

    #[error("Invalid logo: {0}")]
    InvalidLogo(String),

    #[error("Data too long: {0}")]
    DataTooLong(String),
}

impl RenderError {
    /// Поле конфигурации, которое нужно изменить, чтобы вызов прошёл
    pub fn field(&self) -> Option<&'static str> {
        match self {
            RenderError::ConfigOutOfRange { field, .. } => Some(*field),
            RenderError::LogoRejected { .. } => Some("ec_level"),
            RenderError::InvalidGeometry { .. } => Some("size"),
            _ => None,
        }
    }
}

/// Нефатальные сигналы, возвращаемые вместе с успешным результатом
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum RenderWarning {
    /// Логотип уменьшен, чтобы код оставался читаемым
    LogoClamped {
        requested_scale: f32,
        effective_scale: f32,
    },
}

impl fmt::Display for RenderWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderWarning::LogoClamped {
                requested_scale,
                effective_scale,
            } => write!(
                f,
                "Logo scale reduced from {:.3} to {:.3} to keep the code scannable",
                requested_scale, effective_scale
            ),
        }
    }
}

/// Результат рендеринга
#[derive(Debug, Clone)]
pub struct RenderOutput {
    /// Готовый PNG
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Число цветов в палитре PNG
    pub palette_len: usize,
    pub warnings: Vec<RenderWarning>,
    /// Итоговое размещение логотипа (если логотип был)
    pub logo: Option<LogoPlacement>,
}

/// Отрисовка матрицы в PNG
pub fn render(
    matrix: &ModuleMatrix,
    config: &RenderConfig,
    logo: Option<&LogoAsset>,
) -> Result<RenderOutput, RenderError> {
    config.validate()?;

    let dimension = matrix.dimension();
    let geometry = Geometry::plan(config.size, config.border, dimension)?;
    log::info!(
        "Rendering {}x{} matrix on {}px canvas, pitch {}px",
        dimension,
        dimension,
        config.size,
        geometry.pitch
    );

    let regions = RegionMap::classify(dimension);
    let fg = config.foreground.to_rgba();
    let bg = config.background.to_rgba();

    // Модули и глаза
    let mut plan = RenderPlan::new(geometry, bg);
    modules::render_modules(&mut plan, matrix, &regions, config.module_style, fg);
    eyes::render_eyes(&mut plan, config);

    // Логотип
    let mut warnings = Vec::new();
    let mut logo_area = None;
    let placement = match logo {
        Some(asset) => {
            let placement =
                logo_safety::plan_logo(&geometry, &regions, config, (asset.width(), asset.height()))?;
            if placement.clamped {
                let warning = RenderWarning::LogoClamped {
                    requested_scale: placement.requested_scale,
                    effective_scale: placement.effective_scale,
                };
                log::warn!("{}", warning);
                warnings.push(warning);
            }
            logo_area = Some(compositing::composite_logo(&mut plan, &placement, asset, bg));
            Some(placement)
        }
        None => None,
    };

    // Финальная обработка и вывод
    let finished = finishing::finish(plan.into_canvas(), config.canvas_radius, config.background);
    let mut anchors = vec![bg, fg];
    if finished.has_alpha {
        anchors.push(config.background.to_transparent());
    }
    let indexed = palette::quantize(
        &finished.image,
        &anchors,
        logo_area,
        config.palette_size as usize,
    )?;
    let png = output::encode_png(&indexed, config.compression)?;

    log::info!(
        "Render complete: {} bytes, {} colors, {} warning(s)",
        png.len(),
        indexed.palette.len(),
        warnings.len()
    );

    Ok(RenderOutput {
        png,
        width: indexed.width,
        height: indexed.height,
        palette_len: indexed.palette.len(),
        warnings,
        logo: placement,
    })
}

/// Кодирование текста на уровне `config.ec_level` и отрисовка
pub fn render_text(
    text: &str,
    config: &RenderConfig,
    logo: Option<&LogoAsset>,
) -> Result<RenderOutput, RenderError> {
    let (matrix, _) = ModuleMatrix::encode(text, config.ec_level)?;
    render(&matrix, config, logo)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_names_field() {
        let err = RenderConfig {
            border: 21,
            ..RenderConfig::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.field(), Some("border"));
        assert!(err.to_string().contains("border = 21"));
    }

    #[test]
    fn test_logo_rejected_message() {
        let err = RenderError::LogoRejected {
            level: EcLevel::L,
            min_fraction: 0.12,
            budget: 0.07,
            covers_eyes: false,
        };
        assert_eq!(err.field(), Some("ec_level"));
        assert!(err.to_string().contains("level L allows 0.07"));
    }

    #[test]
    fn test_warning_serializes_with_kind() {
        let warning = RenderWarning::LogoClamped {
            requested_scale: 0.5,
            effective_scale: 0.25,
        };
        let json = serde_json::to_value(&warning).unwrap();
        assert_eq!(json["kind"], "logo-clamped");
        assert_eq!(json["effective_scale"], 0.25);
    }

    #[test]
    fn test_render_text_small_canvas() {
        let config = RenderConfig {
            size: 200,
            ..RenderConfig::default()
        };
        let output = render_text("hello", &config, None).unwrap();
        assert_eq!((output.width, output.height), (200, 200));
        assert!(output.warnings.is_empty());
        assert!(output.logo.is_none());
        assert!(output.png.starts_with(b"\x89PNG"));
    }
}
