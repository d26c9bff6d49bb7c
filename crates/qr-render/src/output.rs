//! Сериализация индексированного растра в PNG

use png::{AdaptiveFilterType, BitDepth, ColorType, Compression, Encoder, FilterType};

use crate::palette::IndexedImage;
use crate::RenderError;

/// Пресет deflate для уровня сжатия 0-9
pub fn compression_preset(level: u8) -> Compression {
    match level {
        0..=3 => Compression::Fast,
        4..=6 => Compression::Default,
        _ => Compression::Best,
    }
}

/// Наименьшая глубина цвета, в которую помещается палитра
pub fn bit_depth(palette_len: usize) -> BitDepth {
    match palette_len {
        0..=2 => BitDepth::One,
        3..=4 => BitDepth::Two,
        5..=16 => BitDepth::Four,
        _ => BitDepth::Eight,
    }
}

fn bits(depth: BitDepth) -> usize {
    depth as usize
}

/// Упаковка индексов построчно, старшие биты слева; каждая строка с границы байта
fn pack_rows(indexed: &IndexedImage, depth: BitDepth) -> Vec<u8> {
    let width = indexed.width as usize;
    let bits = bits(depth);
    if bits == 8 {
        return indexed.indices.clone();
    }

    let per_byte = 8 / bits;
    let stride = width.div_ceil(per_byte);
    let mut data = vec![0u8; stride * indexed.height as usize];
    for (y, row) in indexed.indices.chunks(width).enumerate() {
        let out = &mut data[y * stride..(y + 1) * stride];
        for (x, &index) in row.iter().enumerate() {
            let shift = 8 - bits * (x % per_byte + 1);
            out[x / per_byte] |= index << shift;
        }
    }
    data
}

/// Запись PNG с палитрой; `tRNS` пишется только при наличии прозрачности
pub fn encode_png(indexed: &IndexedImage, compression: u8) -> Result<Vec<u8>, RenderError> {
    if indexed.palette.is_empty() || indexed.palette.len() > 256 {
        return Err(RenderError::Encoding(format!(
            "palette of {} colors cannot be written",
            indexed.palette.len()
        )));
    }

    let depth = bit_depth(indexed.palette.len());
    let data = pack_rows(indexed, depth);
    let rgb: Vec<u8> = indexed.palette.iter().flat_map(|c| [c[0], c[1], c[2]]).collect();

    let mut bytes = Vec::new();
    {
        let mut encoder = Encoder::new(&mut bytes, indexed.width, indexed.height);
        encoder.set_color(ColorType::Indexed);
        encoder.set_depth(depth);
        encoder.set_palette(rgb);
        if indexed.has_transparency() {
            let alpha: Vec<u8> = indexed.palette.iter().map(|c| c[3]).collect();
            encoder.set_trns(alpha);
        }
        encoder.set_compression(compression_preset(compression));
        encoder.set_filter(FilterType::NoFilter);
        encoder.set_adaptive_filter(AdaptiveFilterType::NonAdaptive);

        let mut writer = encoder
            .write_header()
            .map_err(|e| RenderError::Encoding(e.to_string()))?;
        writer
            .write_image_data(&data)
            .map_err(|e| RenderError::Encoding(e.to_string()))?;
        writer
            .finish()
            .map_err(|e| RenderError::Encoding(e.to_string()))?;
    }

    log::debug!(
        "Encoded {}x{} PNG: {} colors at {} bit(s), {} bytes",
        indexed.width,
        indexed.height,
        indexed.palette.len(),
        bits(depth),
        bytes.len()
    );
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GenericImageView;

    fn checker(width: u32, height: u32, palette: Vec<[u8; 4]>) -> IndexedImage {
        let colors = palette.len() as u32;
        let indices = (0..height)
            .flat_map(|y| (0..width).map(move |x| ((x + y) % colors) as u8))
            .collect();
        IndexedImage {
            width,
            height,
            palette,
            indices,
        }
    }

    #[test]
    fn test_depth_selection() {
        assert_eq!(bit_depth(2), BitDepth::One);
        assert_eq!(bit_depth(3), BitDepth::Two);
        assert_eq!(bit_depth(16), BitDepth::Four);
        assert_eq!(bit_depth(17), BitDepth::Eight);
        assert_eq!(bit_depth(256), BitDepth::Eight);
    }

    #[test]
    fn test_row_packing() {
        let indexed = checker(5, 2, vec![[0, 0, 0, 255], [255, 255, 255, 255]]);
        // 0 1 0 1 0 -> 0b0101_0000, затем 1 0 1 0 1 -> 0b1010_1000
        assert_eq!(pack_rows(&indexed, BitDepth::One), vec![0b0101_0000, 0b1010_1000]);

        let indexed = checker(3, 1, vec![[0; 4], [1; 4], [2; 4], [3; 4]]);
        assert_eq!(pack_rows(&indexed, BitDepth::Two), vec![0b0001_1000]);
    }

    #[test]
    fn test_png_decodes_back() {
        let palette = vec![[255, 255, 255, 255], [0, 0, 0, 255], [200, 0, 0, 255]];
        let indexed = checker(7, 3, palette);
        let bytes = encode_png(&indexed, 9).unwrap();

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (7, 3));
        let rgba = decoded.to_rgba8();
        for y in 0..3 {
            for x in 0..7 {
                assert_eq!(rgba.get_pixel(x, y).0, indexed.color_at(x, y));
            }
        }
    }

    #[test]
    fn test_transparency_chunk() {
        let opaque = checker(4, 4, vec![[255, 255, 255, 255], [0, 0, 0, 255]]);
        let clear = checker(4, 4, vec![[255, 255, 255, 255], [255, 255, 255, 0]]);
        let has_trns = |bytes: &[u8]| bytes.windows(4).any(|w| w == b"tRNS");

        assert!(!has_trns(&encode_png(&opaque, 6).unwrap()));
        let bytes = encode_png(&clear, 6).unwrap();
        assert!(has_trns(&bytes));
        let rgba = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(rgba.get_pixel(1, 0).0, [255, 255, 255, 0]);
    }

    #[test]
    fn test_compression_presets() {
        assert!(matches!(compression_preset(0), Compression::Fast));
        assert!(matches!(compression_preset(5), Compression::Default));
        assert!(matches!(compression_preset(9), Compression::Best));
    }
}
