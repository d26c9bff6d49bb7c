//! Конфигурация рендеринга
//!
//! Полный набор параметров стилизации: размер холста, рамка, стиль модулей,
//! форма и стиль «глаз», цвета, уровень коррекции ошибок, параметры логотипа
//! и выходного PNG. Каждое числовое поле имеет замкнутый диапазон (см. [`limits`]).

use std::fmt;
use std::str::FromStr;

use image::Rgba;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::RenderError;

/// Стиль отрисовки обычных модулей (всё, кроме finder-паттернов)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModuleStyle {
    #[serde(alias = "square")]
    PlainSquare,
    #[serde(alias = "rounded")]
    RoundedSquare,
    #[serde(alias = "dots")]
    Dot,
    #[serde(alias = "gapped")]
    GappedSquare,
    #[serde(alias = "bars-vertical")]
    BarVertical,
    #[serde(alias = "bars-horizontal")]
    BarHorizontal,
}

impl ModuleStyle {
    pub const ALL: [ModuleStyle; 6] = [
        ModuleStyle::PlainSquare,
        ModuleStyle::RoundedSquare,
        ModuleStyle::Dot,
        ModuleStyle::GappedSquare,
        ModuleStyle::BarVertical,
        ModuleStyle::BarHorizontal,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ModuleStyle::PlainSquare => "plain-square",
            ModuleStyle::RoundedSquare => "rounded-square",
            ModuleStyle::Dot => "dot",
            ModuleStyle::GappedSquare => "gapped-square",
            ModuleStyle::BarVertical => "bar-vertical",
            ModuleStyle::BarHorizontal => "bar-horizontal",
        }
    }
}

/// Форма finder-паттерна
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EyeShape {
    #[serde(alias = "rect")]
    Rectangle,
    Rounded,
    Circle,
}

impl EyeShape {
    pub const ALL: [EyeShape; 3] = [EyeShape::Rectangle, EyeShape::Rounded, EyeShape::Circle];

    pub fn as_str(self) -> &'static str {
        match self {
            EyeShape::Rectangle => "rectangle",
            EyeShape::Rounded => "rounded",
            EyeShape::Circle => "circle",
        }
    }
}

/// Стиль finder-паттерна
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EyeStyle {
    /// Кольцо и ядро одной формы, масштабируются независимо
    #[serde(alias = "standard")]
    StandardIndependent,
    /// Тонкое кольцо и круглое ядро
    #[serde(alias = "circle-ring")]
    SingleRing,
}

impl EyeStyle {
    pub const ALL: [EyeStyle; 2] = [EyeStyle::StandardIndependent, EyeStyle::SingleRing];

    pub fn as_str(self) -> &'static str {
        match self {
            EyeStyle::StandardIndependent => "standard-independent",
            EyeStyle::SingleRing => "single-ring",
        }
    }
}

/// Уровень коррекции ошибок
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EcLevel {
    #[serde(alias = "l")]
    L, // ~7%
    #[serde(alias = "m")]
    M, // ~15%
    #[serde(alias = "q")]
    Q, // ~25%
    #[serde(alias = "h")]
    H, // ~30%
}

impl EcLevel {
    pub const ALL: [EcLevel; 4] = [EcLevel::L, EcLevel::M, EcLevel::Q, EcLevel::H];

    /// Максимальная доля модулей матрицы, которую можно закрыть без потери читаемости
    pub fn budget(self) -> f32 {
        match self {
            EcLevel::L => 0.07,
            EcLevel::M => 0.15,
            EcLevel::Q => 0.25,
            EcLevel::H => 0.30,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EcLevel::L => "L",
            EcLevel::M => "M",
            EcLevel::Q => "Q",
            EcLevel::H => "H",
        }
    }
}

impl fmt::Display for EcLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ошибка разбора цвета
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid hex color '{0}', expected #RRGGBB")]
pub struct ColorParseError(pub String);

/// Непрозрачный цвет в формате RGB
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const BLACK: Rgb = Rgb([0, 0, 0]);
    pub const WHITE: Rgb = Rgb([255, 255, 255]);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    pub fn to_rgba(self) -> Rgba<u8> {
        let [r, g, b] = self.0;
        Rgba([r, g, b, 255])
    }

    /// Тот же цвет с нулевой альфой (для обрезанных углов холста)
    pub fn to_transparent(self) -> Rgba<u8> {
        let [r, g, b] = self.0;
        Rgba([r, g, b, 0])
    }

    pub fn to_hex(self) -> String {
        let [r, g, b] = self.0;
        format!("#{:02X}{:02X}{:02X}", r, g, b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    /// Принимает `#RRGGBB` или `RRGGBB` в любом регистре
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError(s.to_string()));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| ColorParseError(s.to_string()))
        };
        Ok(Rgb([channel(0)?, channel(2)?, channel(4)?]))
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Замкнутый диапазон числового параметра и его значение по умолчанию
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
    pub default: f64,
}

impl NumericRange {
    pub const fn new(min: f64, max: f64, default: f64) -> Self {
        Self { min, max, default }
    }

    /// NaN никогда не попадает в диапазон
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn check(&self, field: &'static str, value: f64) -> Result<(), RenderError> {
        if self.contains(value) {
            Ok(())
        } else {
            Err(RenderError::ConfigOutOfRange {
                field,
                value,
                min: self.min,
                max: self.max,
            })
        }
    }
}

/// Допустимые диапазоны параметров
pub mod limits {
    use super::NumericRange;

    /// Сторона холста в пикселях
    pub const SIZE: NumericRange = NumericRange::new(21.0, 4096.0, 1024.0);
    /// Тихая зона в модулях
    pub const BORDER: NumericRange = NumericRange::new(0.0, 20.0, 4.0);
    /// Радиус скругления глаз в долях шага модуля
    pub const EYE_RADIUS: NumericRange = NumericRange::new(0.0, 3.5, 0.9);
    pub const EYE_SCALE: NumericRange = NumericRange::new(0.5, 2.0, 1.0);
    /// Радиус скругления всего холста в пикселях
    pub const CANVAS_RADIUS: NumericRange = NumericRange::new(0.0, 200.0, 0.0);
    /// Сторона логотипа в долях стороны холста
    pub const LOGO_SCALE: NumericRange = NumericRange::new(0.05, 0.5, 0.22);
    pub const LOGO_PADDING: NumericRange = NumericRange::new(0.0, 100.0, 20.0);
    pub const LOGO_RADIUS: NumericRange = NumericRange::new(0.0, 100.0, 28.0);
    pub const PALETTE_SIZE: NumericRange = NumericRange::new(2.0, 256.0, 64.0);
    pub const COMPRESSION: NumericRange = NumericRange::new(0.0, 9.0, 9.0);
}

/// Параметры одного вызова рендеринга
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Сторона итогового изображения в пикселях
    pub size: u32,
    /// Ширина тихой зоны в модулях
    pub border: u32,
    #[serde(alias = "style")]
    pub module_style: ModuleStyle,
    pub eye_shape: EyeShape,
    pub eye_style: EyeStyle,
    /// Радиус скругления глаз (доля шага модуля), только для `rounded`
    pub eye_radius: f32,
    pub eye_scale_x: f32,
    pub eye_scale_y: f32,
    #[serde(alias = "dark_color")]
    pub foreground: Rgb,
    #[serde(alias = "light_color")]
    pub background: Rgb,
    #[serde(alias = "error_correction")]
    pub ec_level: EcLevel,
    /// Скругление углов всего изображения в пикселях
    #[serde(alias = "qr_radius")]
    pub canvas_radius: u32,
    pub logo_scale: f32,
    /// Отступ подложки логотипа в пикселях
    #[serde(alias = "bg_padding")]
    pub logo_padding: u32,
    /// Радиус скругления подложки логотипа в пикселях
    #[serde(alias = "bg_radius")]
    pub logo_radius: u32,
    #[serde(alias = "quantize_colors")]
    pub palette_size: u32,
    /// Уровень сжатия PNG (0-9)
    #[serde(alias = "compress_level")]
    pub compression: u8,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            size: limits::SIZE.default as u32,
            border: limits::BORDER.default as u32,
            module_style: ModuleStyle::RoundedSquare,
            eye_shape: EyeShape::Rectangle,
            eye_style: EyeStyle::StandardIndependent,
            eye_radius: limits::EYE_RADIUS.default as f32,
            eye_scale_x: limits::EYE_SCALE.default as f32,
            eye_scale_y: limits::EYE_SCALE.default as f32,
            foreground: Rgb::BLACK,
            background: Rgb::WHITE,
            ec_level: EcLevel::Q,
            canvas_radius: limits::CANVAS_RADIUS.default as u32,
            logo_scale: limits::LOGO_SCALE.default as f32,
            logo_padding: limits::LOGO_PADDING.default as u32,
            logo_radius: limits::LOGO_RADIUS.default as u32,
            palette_size: limits::PALETTE_SIZE.default as u32,
            compression: limits::COMPRESSION.default as u8,
        }
    }
}

impl RenderConfig {
    /// Разбор конфигурации из JSON; отсутствующие поля берутся по умолчанию
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Проверка всех числовых полей; возвращает первое нарушение
    pub fn validate(&self) -> Result<(), RenderError> {
        limits::SIZE.check("size", self.size as f64)?;
        limits::BORDER.check("border", self.border as f64)?;
        limits::EYE_RADIUS.check("eye_radius", self.eye_radius as f64)?;
        limits::EYE_SCALE.check("eye_scale_x", self.eye_scale_x as f64)?;
        limits::EYE_SCALE.check("eye_scale_y", self.eye_scale_y as f64)?;
        limits::CANVAS_RADIUS.check("canvas_radius", self.canvas_radius as f64)?;
        limits::LOGO_SCALE.check("logo_scale", self.logo_scale as f64)?;
        limits::LOGO_PADDING.check("logo_padding", self.logo_padding as f64)?;
        limits::LOGO_RADIUS.check("logo_radius", self.logo_radius as f64)?;
        limits::PALETTE_SIZE.check("palette_size", self.palette_size as f64)?;
        limits::COMPRESSION.check("compression", self.compression as f64)?;
        Ok(())
    }
}
