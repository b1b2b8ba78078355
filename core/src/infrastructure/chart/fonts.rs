use std::{path::Path, sync::OnceLock};

use plotters::style::{FontStyle, register_font};
use tracing::info;

use crate::domain::common::entities::app_errors::CoreError;

/// Family name every chart text style refers to
pub const CHART_FONT_FAMILY: &str = "sans-serif";

/// DejaVu Sans, used when no font is configured
static BUNDLED_FONT: &[u8] = include_bytes!("../../../assets/fonts/DejaVuSans.ttf");

static FONT_REGISTRATION: OnceLock<Result<(), String>> = OnceLock::new();

/// Registers the chart font family, once per process.
///
/// The plotters font registry is global, so the first caller's
/// `configured` path wins.
pub fn ensure_chart_font(configured: Option<&Path>) -> Result<(), CoreError> {
    FONT_REGISTRATION
        .get_or_init(|| register(configured))
        .clone()
        .map_err(CoreError::RenderError)
}

fn register(configured: Option<&Path>) -> Result<(), String> {
    let (source, bytes): (String, &'static [u8]) = match configured {
        Some(path) => {
            let bytes = std::fs::read(path)
                .map_err(|e| format!("cannot read chart font {}: {e}", path.display()))?;
            (
                path.display().to_string(),
                Box::leak(bytes.into_boxed_slice()),
            )
        }
        None => ("bundled DejaVu Sans".to_string(), BUNDLED_FONT),
    };

    register_font(CHART_FONT_FAMILY, FontStyle::Normal, bytes)
        .map_err(|_| format!("{source} is not a usable TrueType font"))?;

    info!(font = %source, "Registered chart font");
    Ok(())
}
