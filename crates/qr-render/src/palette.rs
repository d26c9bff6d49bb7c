//! Квантование растра в ограниченную палитру
//!
//! Сначала в палитру попадают опорные цвета (фон, передний план, прозрачный фон),
//! затем самые частые цвета логотипа, а оставшиеся слоты заполняются методом
//! median cut по остальным цветам. Гистограмма упорядочена, поэтому результат
//! полностью детерминирован.

use std::collections::{BTreeMap, BTreeSet};

use image::{Rgba, RgbaImage};

use crate::geometry::PixelRect;
use crate::RenderError;

/// Растр с индексированной палитрой RGBA
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedImage {
    pub width: u32,
    pub height: u32,
    pub palette: Vec<[u8; 4]>,
    /// Индексы палитры построчно, по одному на пиксель
    pub indices: Vec<u8>,
}

impl IndexedImage {
    pub fn has_transparency(&self) -> bool {
        self.palette.iter().any(|color| color[3] < 255)
    }

    pub fn color_at(&self, x: u32, y: u32) -> [u8; 4] {
        let index = self.indices[(y * self.width + x) as usize];
        self.palette[index as usize]
    }
}

type Histogram = BTreeMap<[u8; 4], u64>;

fn histogram(image: &RgbaImage, area: Option<PixelRect>) -> Histogram {
    let mut counts = Histogram::new();
    match area {
        None => {
            for pixel in image.pixels() {
                *counts.entry(pixel.0).or_insert(0) += 1;
            }
        }
        Some(area) => {
            let bounds = PixelRect::new(0, 0, image.width(), image.height());
            if let Some(area) = area.intersection(&bounds) {
                for y in area.y..area.bottom() {
                    for x in area.x..area.right() {
                        *counts.entry(image.get_pixel(x, y).0).or_insert(0) += 1;
                    }
                }
            }
        }
    }
    counts
}

/// Квантование `image` в палитру не больше `size` цветов.
///
/// `anchors` попадают в палитру первыми и в заданном порядке. Цвета из
/// `logo_area` занимают не больше половины оставшихся слотов.
pub fn quantize(
    image: &RgbaImage,
    anchors: &[Rgba<u8>],
    logo_area: Option<PixelRect>,
    size: usize,
) -> Result<IndexedImage, RenderError> {
    if size == 0 || size > 256 {
        return Err(RenderError::Encoding(format!(
            "palette size {} is outside 1..=256",
            size
        )));
    }

    let counts = histogram(image, None);
    let mut palette: Vec<[u8; 4]> = Vec::with_capacity(size);
    let mut taken = BTreeSet::new();

    for anchor in anchors {
        if palette.len() == size {
            break;
        }
        if taken.insert(anchor.0) {
            palette.push(anchor.0);
        }
    }

    if let Some(area) = logo_area {
        let quota = (size - palette.len()) / 2;
        let mut logo_colors: Vec<([u8; 4], u64)> = histogram(image, Some(area))
            .into_iter()
            .filter(|(color, _)| !taken.contains(color))
            .collect();
        // Сначала самые частые; равные по частоте идут в порядке цвета
        logo_colors.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        for (color, _) in logo_colors.into_iter().take(quota) {
            taken.insert(color);
            palette.push(color);
        }
    }

    let rest: Vec<([u8; 4], u64)> = counts
        .iter()
        .filter(|(color, _)| !taken.contains(*color))
        .map(|(color, count)| (*color, *count))
        .collect();
    let free = size - palette.len();
    if rest.len() <= free {
        palette.extend(rest.iter().map(|(color, _)| *color));
    } else {
        for color in median_cut(rest, free) {
            if taken.insert(color) {
                palette.push(color);
            }
        }
    }

    // Каждому встречающемуся цвету один раз подбирается индекс
    let lookup: BTreeMap<[u8; 4], u8> = counts
        .keys()
        .map(|color| (*color, nearest(&palette, color)))
        .collect();
    let indices = image.pixels().map(|pixel| lookup[&pixel.0]).collect();

    log::debug!(
        "Quantized {} distinct colors into a palette of {}",
        counts.len(),
        palette.len()
    );
    Ok(IndexedImage {
        width: image.width(),
        height: image.height(),
        palette,
        indices,
    })
}

/// Индекс ближайшего цвета палитры по квадрату расстояния в RGBA
fn nearest(palette: &[[u8; 4]], color: &[u8; 4]) -> u8 {
    let mut best = 0;
    let mut best_distance = u32::MAX;
    for (index, entry) in palette.iter().enumerate() {
        let distance: u32 = entry
            .iter()
            .zip(color.iter())
            .map(|(a, b)| {
                let d = *a as i32 - *b as i32;
                (d * d) as u32
            })
            .sum();
        if distance < best_distance {
            best = index;
            best_distance = distance;
            if distance == 0 {
                break;
            }
        }
    }
    best as u8
}

/// Разбиение цветов на `target` ящиков; каждый ящик представлен средним цветом
fn median_cut(colors: Vec<([u8; 4], u64)>, target: usize) -> Vec<[u8; 4]> {
    if target == 0 || colors.is_empty() {
        return Vec::new();
    }

    let mut boxes = vec![colors];
    while boxes.len() < target {
        // Ящик с наибольшим разбросом по одному из каналов
        let widest = boxes
            .iter()
            .enumerate()
            .filter(|(_, b)| b.len() > 1)
            .map(|(i, b)| {
                let (channel, spread) = widest_channel(b);
                (i, channel, spread)
            })
            .fold(None, |best: Option<(usize, usize, u8)>, item| match best {
                Some(current) if current.2 >= item.2 => Some(current),
                _ => Some(item),
            });

        let Some((index, channel, _)) = widest else {
            break;
        };

        let mut bucket = boxes.swap_remove(index);
        bucket.sort_by(|a, b| a.0[channel].cmp(&b.0[channel]).then(a.0.cmp(&b.0)));
        let split = weighted_median(&bucket);
        let upper = bucket.split_off(split);
        boxes.push(bucket);
        boxes.push(upper);
    }

    boxes.iter().map(|b| average(b)).collect()
}

fn widest_channel(colors: &[([u8; 4], u64)]) -> (usize, u8) {
    let mut best = (0, 0);
    for channel in 0..4 {
        let (min, max) = colors.iter().fold((u8::MAX, u8::MIN), |(lo, hi), (c, _)| {
            (lo.min(c[channel]), hi.max(c[channel]))
        });
        let spread = max - min;
        if spread > best.1 {
            best = (channel, spread);
        }
    }
    best
}

/// Позиция разреза: первая точка, где накопленный вес достигает половины.
/// Обе части всегда непусты.
fn weighted_median(colors: &[([u8; 4], u64)]) -> usize {
    let total: u64 = colors.iter().map(|(_, count)| count).sum();
    let mut acc = 0;
    for (i, (_, count)) in colors.iter().enumerate() {
        acc += count;
        if acc * 2 >= total {
            return (i + 1).clamp(1, colors.len() - 1);
        }
    }
    colors.len() / 2
}

fn average(colors: &[([u8; 4], u64)]) -> [u8; 4] {
    let total: u64 = colors.iter().map(|(_, count)| count).sum();
    let mut sums = [0u64; 4];
    for (color, count) in colors {
        for (sum, channel) in sums.iter_mut().zip(color.iter()) {
            *sum += *channel as u64 * count;
        }
    }
    sums.map(|sum| ((sum + total / 2) / total.max(1)) as u8)
}
