//! WASM bindings для рендеринга QR-кодов
//!
//! Предоставляет JavaScript API для генерации стилизованных QR-кодов

use js_sys::{Object, Reflect, Uint8Array};
use qr_render::{presets, LogoAsset, RenderConfig, RenderError, RenderOutput, StyleCatalog};
use wasm_bindgen::prelude::*;

/// Инициализация panic hook и логирования
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Debug).ok();
    log::info!("QR Render WASM module initialized");
}

/// Ошибка движка в виде JS-исключения; для ошибок конфигурации указывается поле
fn js_error(err: RenderError) -> JsError {
    match err.field() {
        Some(field) => JsError::new(&format!("{} [field: {}]", err, field)),
        None => JsError::new(&err.to_string()),
    }
}

fn parse_config(config: JsValue) -> Result<RenderConfig, JsError> {
    if config.is_undefined() || config.is_null() {
        return Ok(RenderConfig::default());
    }
    serde_wasm_bindgen::from_value(config).map_err(|e| JsError::new(&e.to_string()))
}

fn set(target: &Object, key: &str, value: &JsValue) -> Result<(), JsError> {
    Reflect::set(target, &JsValue::from_str(key), value)
        .map(|_| ())
        .map_err(|_| JsError::new(&format!("Failed to set '{}' on result", key)))
}

/// Упаковка результата в JS-объект `{ png, width, height, paletteSize, warnings, logo }`
fn output_to_js(output: &RenderOutput) -> Result<JsValue, JsError> {
    for warning in &output.warnings {
        web_sys::console::warn_1(&JsValue::from_str(&warning.to_string()));
    }

    let result = Object::new();
    set(&result, "png", &Uint8Array::from(output.png.as_slice()).into())?;
    set(&result, "width", &JsValue::from(output.width))?;
    set(&result, "height", &JsValue::from(output.height))?;
    set(&result, "paletteSize", &JsValue::from(output.palette_len as u32))?;

    let warnings = serde_wasm_bindgen::to_value(&output.warnings)
        .map_err(|e| JsError::new(&e.to_string()))?;
    set(&result, "warnings", &warnings)?;
    let logo = serde_wasm_bindgen::to_value(&output.logo)
        .map_err(|e| JsError::new(&e.to_string()))?;
    set(&result, "logo", &logo)?;

    Ok(result.into())
}

/// JavaScript-доступный рендерер с фиксированной конфигурацией
#[wasm_bindgen]
pub struct WasmQRRenderer {
    config: RenderConfig,
}

#[wasm_bindgen]
impl WasmQRRenderer {
    /// Создание рендерера; `config` - объект с полями RenderConfig или undefined
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<WasmQRRenderer, JsError> {
        let config = parse_config(config)?;
        config.validate().map_err(js_error)?;
        Ok(Self { config })
    }

    /// Создание рендерера из встроенного пресета
    #[wasm_bindgen(js_name = withPreset)]
    pub fn with_preset(name: &str) -> Result<WasmQRRenderer, JsError> {
        let preset = presets::preset(name)
            .ok_or_else(|| JsError::new(&format!("Unknown preset '{}'", name)))?;
        Ok(Self {
            config: preset.config,
        })
    }

    /// Текущая конфигурация в виде объекта
    #[wasm_bindgen(getter)]
    pub fn config(&self) -> Result<JsValue, JsError> {
        serde_wasm_bindgen::to_value(&self.config).map_err(|e| JsError::new(&e.to_string()))
    }

    /// Генерация QR-кода
    ///
    /// @param text - текст или URL
    /// @param logo - Uint8Array с PNG/JPEG логотипа или undefined
    /// @returns Object с PNG и отчётом о рендеринге
    pub fn render(&self, text: &str, logo: Option<Vec<u8>>) -> Result<JsValue, JsError> {
        let logo = match logo {
            Some(bytes) => Some(LogoAsset::from_bytes(&bytes).map_err(js_error)?),
            None => None,
        };
        let output = qr_render::render_text(text, &self.config, logo.as_ref()).map_err(js_error)?;
        output_to_js(&output)
    }
}

/// Удобная функция для разовой генерации
#[wasm_bindgen(js_name = renderQr)]
pub fn render_qr(text: &str, config: JsValue, logo: Option<Vec<u8>>) -> Result<JsValue, JsError> {
    WasmQRRenderer::new(config)?.render(text, logo)
}

/// Допустимые значения всех параметров
#[wasm_bindgen(js_name = styles)]
pub fn styles() -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(&StyleCatalog::current()).map_err(|e| JsError::new(&e.to_string()))
}

/// Встроенные пресеты
#[wasm_bindgen(js_name = presets)]
pub fn list_presets() -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(&presets::all()).map_err(|e| JsError::new(&e.to_string()))
}

/// Информация о версии
#[wasm_bindgen(js_name = version)]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
