//! Логотип для наложения на QR-код

use image::RgbaImage;

use crate::RenderError;

/// Растровый логотип в RGBA
///
/// Движок никогда не изменяет логотип вызывающего кода: масштабирование
/// делается над рабочей копией.
#[derive(Debug, Clone, PartialEq)]
pub struct LogoAsset {
    image: RgbaImage,
}

impl LogoAsset {
    /// Декодирование PNG/JPEG из байтов
    pub fn from_bytes(data: &[u8]) -> Result<Self, RenderError> {
        let image = image::load_from_memory(data)
            .map_err(|e| RenderError::InvalidLogo(e.to_string()))?
            .to_rgba8();
        Self::from_image(image)
    }

    pub fn from_image(image: RgbaImage) -> Result<Self, RenderError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(RenderError::InvalidLogo("logo has zero size".to_string()));
        }
        Ok(Self { image })
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Есть ли хотя бы один не полностью непрозрачный пиксель
    pub fn has_transparency(&self) -> bool {
        self.image.pixels().any(|p| p[3] < 255)
    }

    /// Размер логотипа, вписанного в квадрат `side` с сохранением пропорций
    pub fn fit_within(&self, side: u32) -> (u32, u32) {
        fit_within(self.width(), self.height(), side)
    }
}

pub(crate) fn fit_within(width: u32, height: u32, side: u32) -> (u32, u32) {
    if width >= height {
        let h = (side as f64 * height as f64 / width as f64).round() as u32;
        (side, h.max(1))
    } else {
        let w = (side as f64 * width as f64 / height as f64).round() as u32;
        (w.max(1), side)
    }
}
