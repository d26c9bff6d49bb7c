//! Финальная обработка холста: скругление углов всего изображения

use image::RgbaImage;

use crate::shapes::{RectF, Shape};
use crate::Rgb;

/// Готовый растр перед квантованием
#[derive(Debug, Clone)]
pub struct FinishedRaster {
    pub image: RgbaImage,
    /// Есть ли прозрачные пиксели (только от скругления углов)
    pub has_alpha: bool,
}

/// Применение скругления углов холста.
///
/// Пиксели вне скруглённого прямоугольника становятся цветом фона с нулевой
/// альфой. Радиус ограничивается половиной стороны холста.
pub fn finish(mut image: RgbaImage, radius: u32, background: Rgb) -> FinishedRaster {
    let (width, height) = image.dimensions();
    let radius = radius.min(width.min(height) / 2);
    if radius == 0 {
        return FinishedRaster {
            image,
            has_alpha: false,
        };
    }

    let clip = Shape::rounded(RectF::new(0.0, 0.0, width as f32, height as f32), radius as f32);
    let clear = background.to_transparent();
    let mut clipped = 0usize;

    // Вне скругления могут оказаться только пиксели угловых квадратов radius x radius
    let xs = (0..radius).chain(width - radius..width);
    for x in xs {
        for y in (0..radius).chain(height - radius..height) {
            if !clip.contains(x as f32 + 0.5, y as f32 + 0.5) {
                image.put_pixel(x, y, clear);
                clipped += 1;
            }
        }
    }

    log::debug!("Canvas corners rounded: radius={}px, {} pixels cleared", radius, clipped);
    FinishedRaster {
        image,
        has_alpha: clipped > 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_zero_radius_keeps_image_opaque() {
        let image = RgbaImage::from_pixel(50, 50, Rgba([1, 2, 3, 255]));
        let finished = finish(image.clone(), 0, Rgb::WHITE);
        assert!(!finished.has_alpha);
        assert_eq!(finished.image, image);
    }

    #[test]
    fn test_corners_become_transparent_background() {
        let image = RgbaImage::from_pixel(100, 100, Rgba([0, 0, 0, 255]));
        let finished = finish(image, 20, Rgb::new(10, 20, 30));
        assert!(finished.has_alpha);
        for (x, y) in [(0, 0), (99, 0), (0, 99), (99, 99)] {
            assert_eq!(*finished.image.get_pixel(x, y), Rgba([10, 20, 30, 0]));
        }
        assert_eq!(*finished.image.get_pixel(50, 0), Rgba([0, 0, 0, 255]));
        assert_eq!(*finished.image.get_pixel(50, 50), Rgba([0, 0, 0, 255]));
        assert_eq!(finished.image.dimensions(), (100, 100));
    }

    #[test]
    fn test_radius_is_limited_to_half_side() {
        let image = RgbaImage::from_pixel(40, 40, Rgba([0, 0, 0, 255]));
        let finished = finish(image, 200, Rgb::WHITE);
        // Полный круг: центр непрозрачен, углы прозрачны
        assert_eq!(finished.image.get_pixel(20, 20)[3], 255);
        assert_eq!(finished.image.get_pixel(0, 0)[3], 0);
        assert_eq!(finished.image.get_pixel(20, 0)[3], 255);
    }
}
