//! Generator of a gallery of styled QR codes
//!
//! Usage: cargo run -p qr-render --example gen_gallery

use std::fs;
use std::path::Path;

use anyhow::Context;
use image::{Rgba, RgbaImage};
use qr_render::{presets, render, EcLevel, EyeShape, EyeStyle, LogoAsset, ModuleMatrix, ModuleStyle, RenderConfig};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let output_dir = Path::new("generated_gallery");
    if output_dir.exists() {
        fs::remove_dir_all(output_dir)?;
    }
    fs::create_dir_all(output_dir)?;

    println!("Generating gallery in {:?}", output_dir);

    let (matrix, _) = ModuleMatrix::encode("https://example.com/gallery", EcLevel::H)
        .context("failed to encode gallery payload")?;
    let logo = badge_logo(160);
    let mut count = 0;

    // 1. Presets, with and without a logo
    for preset in presets::all() {
        let config = RenderConfig {
            size: 512,
            ec_level: EcLevel::H,
            ..preset.config
        };
        save(output_dir, &format!("preset_{}.png", preset.name), &render(&matrix, &config, None)?.png)?;
        save(output_dir, &format!("preset_{}_logo.png", preset.name), &render(&matrix, &config, Some(&logo))?.png)?;
        count += 2;
    }

    // 2. Every module style with every eye shape
    for style in ModuleStyle::ALL {
        for shape in EyeShape::ALL {
            let config = RenderConfig {
                size: 384,
                module_style: style,
                eye_shape: shape,
                ..RenderConfig::default()
            };
            let name = format!("style_{}_{}.png", style.as_str(), shape.as_str());
            save(output_dir, &name, &render(&matrix, &config, None)?.png)?;
            count += 1;
        }
    }

    // 3. Ring eyes on a rounded canvas
    let config = RenderConfig {
        size: 512,
        eye_style: EyeStyle::SingleRing,
        canvas_radius: 64,
        ec_level: EcLevel::H,
        ..RenderConfig::default()
    };
    let output = render(&matrix, &config, Some(&logo))?;
    for warning in &output.warnings {
        println!("warning: {}", warning);
    }
    save(output_dir, "single_ring_rounded.png", &output.png)?;
    count += 1;

    println!("Generated {} images.", count);
    Ok(())
}

/// Круглый значок с прозрачным фоном
fn badge_logo(size: u32) -> LogoAsset {
    let r = size as f32 / 2.0;
    let img = RgbaImage::from_fn(size, size, |x, y| {
        let dx = x as f32 + 0.5 - r;
        let dy = y as f32 + 0.5 - r;
        if dx * dx + dy * dy <= r * r {
            Rgba([230, 60, 50, 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    });
    LogoAsset::from_image(img).expect("badge has a non-zero size")
}

fn save(dir: &Path, name: &str, png: &[u8]) -> anyhow::Result<()> {
    fs::write(dir.join(name), png).with_context(|| format!("failed to write {}", name))
}
