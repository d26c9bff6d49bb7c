//! Встроенные наборы стилей

use serde::Serialize;

use crate::{ModuleStyle, RenderConfig, Rgb};

/// Именованная конфигурация
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preset {
    pub name: &'static str,
    pub description: &'static str,
    pub config: RenderConfig,
}

pub const NAMES: [&str; 6] = ["classic", "modern", "dots", "retro", "dark", "neon"];

/// Пресет по имени (без учёта регистра)
pub fn preset(name: &str) -> Option<Preset> {
    let base = RenderConfig::default();
    let preset = match name.to_ascii_lowercase().as_str() {
        "classic" => Preset {
            name: "classic",
            description: "Black square modules on white",
            config: RenderConfig {
                module_style: ModuleStyle::PlainSquare,
                ..base
            },
        },
        "modern" => Preset {
            name: "modern",
            description: "Soft rounded modules in near-black",
            config: RenderConfig {
                module_style: ModuleStyle::RoundedSquare,
                foreground: Rgb::new(0x1a, 0x1a, 0x1a),
                logo_radius: 32,
                ..base
            },
        },
        "dots" => Preset {
            name: "dots",
            description: "Blue dots",
            config: RenderConfig {
                module_style: ModuleStyle::Dot,
                foreground: Rgb::new(0x25, 0x63, 0xeb),
                ..base
            },
        },
        "retro" => Preset {
            name: "retro",
            description: "Brown squares on wheat, narrow border",
            config: RenderConfig {
                module_style: ModuleStyle::PlainSquare,
                foreground: Rgb::new(0x8b, 0x45, 0x13),
                background: Rgb::new(0xf5, 0xde, 0xb3),
                logo_radius: 8,
                border: 3,
                ..base
            },
        },
        "dark" => Preset {
            name: "dark",
            description: "White rounded modules on a dark background",
            config: RenderConfig {
                module_style: ModuleStyle::RoundedSquare,
                foreground: Rgb::WHITE,
                background: Rgb::new(0x04, 0x07, 0x0b),
                logo_radius: 16,
                ..base
            },
        },
        "neon" => Preset {
            name: "neon",
            description: "Bright green on charcoal",
            config: RenderConfig {
                module_style: ModuleStyle::RoundedSquare,
                foreground: Rgb::new(0x00, 0xff, 0x88),
                background: Rgb::new(0x1a, 0x1a, 0x1a),
                logo_radius: 20,
                ..base
            },
        },
        _ => return None,
    };
    Some(preset)
}

/// Все встроенные пресеты в фиксированном порядке
pub fn all() -> Vec<Preset> {
    NAMES.iter().filter_map(|name| preset(name)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_presets_are_valid() {
        let presets = all();
        assert_eq!(presets.len(), NAMES.len());
        for p in presets {
            assert!(p.config.validate().is_ok(), "preset {}", p.name);
        }
    }

    #[test]
    fn test_lookup() {
        let retro = preset("Retro").unwrap();
        assert_eq!(retro.config.border, 3);
        assert_eq!(retro.config.background.to_hex(), "#F5DEB3");
        assert!(preset("unknown").is_none());
    }
}
