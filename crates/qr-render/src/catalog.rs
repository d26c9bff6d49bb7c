//! Машиночитаемый перечень допустимых значений конфигурации
//!
//! Используется внешним слоем запросов, чтобы клиенты могли узнать доступные
//! стили и диапазоны без дублирования их у себя.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::{limits, NumericRange};
use crate::{EcLevel, EyeShape, EyeStyle, ModuleStyle};

/// Все допустимые значения перечислений и диапазоны числовых полей
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleCatalog {
    pub module_styles: Vec<&'static str>,
    pub eye_shapes: Vec<&'static str>,
    pub eye_styles: Vec<&'static str>,
    pub ec_levels: Vec<&'static str>,
    /// Доля модулей, которую можно закрыть на каждом уровне
    pub ec_budgets: BTreeMap<&'static str, f32>,
    pub limits: BTreeMap<&'static str, NumericRange>,
}

impl StyleCatalog {
    pub fn current() -> Self {
        let ranges = BTreeMap::from([
            ("size", limits::SIZE),
            ("border", limits::BORDER),
            ("eye_radius", limits::EYE_RADIUS),
            ("eye_scale_x", limits::EYE_SCALE),
            ("eye_scale_y", limits::EYE_SCALE),
            ("canvas_radius", limits::CANVAS_RADIUS),
            ("logo_scale", limits::LOGO_SCALE),
            ("logo_padding", limits::LOGO_PADDING),
            ("logo_radius", limits::LOGO_RADIUS),
            ("palette_size", limits::PALETTE_SIZE),
            ("compression", limits::COMPRESSION),
        ]);

        Self {
            module_styles: ModuleStyle::ALL.iter().map(|s| s.as_str()).collect(),
            eye_shapes: EyeShape::ALL.iter().map(|s| s.as_str()).collect(),
            eye_styles: EyeStyle::ALL.iter().map(|s| s.as_str()).collect(),
            ec_levels: EcLevel::ALL.iter().map(|l| l.as_str()).collect(),
            ec_budgets: EcLevel::ALL.iter().map(|l| (l.as_str(), l.budget())).collect(),
            limits: ranges,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
