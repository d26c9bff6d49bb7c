//! Rendered codes must stay readable by an independent decoder

use image::{Rgba, RgbaImage};
use qr_render::{render_text, EcLevel, LogoAsset, ModuleStyle, RenderConfig};

const PAYLOAD: &str = "https://example.com/menu?table=12";

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn decode_png(png: &[u8]) -> Option<String> {
    let gray = image::load_from_memory(png).ok()?.to_luma8();
    let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
        gray.width() as usize,
        gray.height() as usize,
        |x, y| gray.get_pixel(x as u32, y as u32)[0],
    );
    prepared
        .detect_grids()
        .into_iter()
        .find_map(|grid| grid.decode().ok().map(|(_, content)| content))
}

#[test]
fn test_styles_decode() {
    init_logger();
    for style in [
        ModuleStyle::PlainSquare,
        ModuleStyle::RoundedSquare,
        ModuleStyle::GappedSquare,
    ] {
        let config = RenderConfig {
            size: 400,
            module_style: style,
            ..RenderConfig::default()
        };
        let output = render_text(PAYLOAD, &config, None).unwrap();
        assert_eq!(
            decode_png(&output.png).as_deref(),
            Some(PAYLOAD),
            "style {} is not readable",
            style.as_str()
        );
    }
}

#[test]
fn test_small_logo_decodes_at_level_h() {
    init_logger();
    let config = RenderConfig {
        size: 400,
        module_style: ModuleStyle::PlainSquare,
        ec_level: EcLevel::H,
        logo_scale: 0.1,
        logo_padding: 4,
        ..RenderConfig::default()
    };
    let logo = LogoAsset::from_image(RgbaImage::from_pixel(32, 32, Rgba([30, 90, 200, 255]))).unwrap();
    let output = render_text(PAYLOAD, &config, Some(&logo)).unwrap();
    assert!(output.warnings.is_empty());
    assert_eq!(decode_png(&output.png).as_deref(), Some(PAYLOAD));
}
