use std::path::Path;

use serde::Serialize;

use crate::raw::RawReportConfig;
use crate::{ConfigError, Result, load_toml};

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct PanelGeometry {
    pub width_px: u32,
    pub height_px: u32,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct DisplayConfig {
    pub show: bool,
    pub viewer: Option<String>,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct ReportConfig {
    pub stride: PanelGeometry,
    pub block: PanelGeometry,
    pub display: DisplayConfig,
}

impl ReportConfig {
    /// Load from an optional TOML file, filling defaults for unset keys.
    ///
    /// With no path the built-in defaults are returned unchanged.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut raw = match path {
            Some(path) => load_toml::<_, RawReportConfig>(path)?,
            None => RawReportConfig::default(),
        };
        raw.fill_default();
        Self::from_raw(raw)
    }

    pub fn from_raw(raw: RawReportConfig) -> Result<Self> {
        let stride = panel_geometry("stride", &raw.stride)?;
        let block = panel_geometry("block", &raw.block)?;

        Ok(Self {
            stride,
            block,
            display: DisplayConfig {
                show: raw.display.show.unwrap_or(true),
                viewer: raw.display.viewer,
            },
        })
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        use crate::raw::{
            DEFAULT_BLOCK_HEIGHT_PX, DEFAULT_BLOCK_WIDTH_PX, DEFAULT_STRIDE_HEIGHT_PX,
            DEFAULT_STRIDE_WIDTH_PX,
        };

        Self {
            stride: PanelGeometry {
                width_px: DEFAULT_STRIDE_WIDTH_PX,
                height_px: DEFAULT_STRIDE_HEIGHT_PX,
            },
            block: PanelGeometry {
                width_px: DEFAULT_BLOCK_WIDTH_PX,
                height_px: DEFAULT_BLOCK_HEIGHT_PX,
            },
            display: DisplayConfig {
                show: true,
                viewer: None,
            },
        }
    }
}

fn panel_geometry(section: &str, raw: &crate::raw::RawPanelGeometry) -> Result<PanelGeometry> {
    let width_px = raw
        .width_px
        .ok_or_else(|| ConfigError::Invalid(format!("[{section}] width_px is unset")))?;
    let height_px = raw
        .height_px
        .ok_or_else(|| ConfigError::Invalid(format!("[{section}] height_px is unset")))?;

    if width_px == 0 || height_px == 0 {
        return Err(ConfigError::Invalid(format!(
            "[{section}] chart dimensions must be positive ({width_px}x{height_px})"
        )));
    }

    Ok(PanelGeometry {
        width_px,
        height_px,
    })
}

#[cfg(test)]
mod tests {
    use super::ReportConfig;
    use crate::raw::{
        DEFAULT_BLOCK_HEIGHT_PX, DEFAULT_STRIDE_WIDTH_PX, RawPanelGeometry, RawReportConfig,
    };

    #[test]
    fn defaults_fill_all_sections() {
        let cfg = ReportConfig::default();
        assert_eq!(cfg.stride.width_px, DEFAULT_STRIDE_WIDTH_PX);
        assert_eq!(cfg.block.height_px, DEFAULT_BLOCK_HEIGHT_PX);
        assert!(cfg.display.show);
        assert!(cfg.display.viewer.is_none());
    }

    #[test]
    fn partial_toml_fills_missing_keys() {
        let mut raw: RawReportConfig =
            toml::from_str("[stride]\nwidth_px = 2100\n\n[display]\nshow = false\n")
                .expect("valid TOML");
        raw.fill_default();

        let cfg = ReportConfig::from_raw(raw).expect("valid config");
        assert_eq!(cfg.stride.width_px, 2100);
        assert_eq!(cfg.stride.height_px, 1500);
        assert!(!cfg.display.show);
    }

    #[test]
    fn rejects_zero_dimensions() {
        let mut raw = RawReportConfig {
            block: RawPanelGeometry {
                width_px: Some(0),
                height_px: None,
            },
            ..Default::default()
        };
        raw.fill_default();

        let err = ReportConfig::from_raw(raw).expect_err("zero width should be rejected");
        assert!(err.to_string().contains("block"));
    }
}
