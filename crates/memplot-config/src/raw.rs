use serde::{Deserialize, Serialize};

use crate::fill_default;

/// Chart geometry of the stride figure at 300 DPI (14 x 5 inches).
pub const DEFAULT_STRIDE_WIDTH_PX: u32 = 4200;
pub const DEFAULT_STRIDE_HEIGHT_PX: u32 = 1500;

/// Chart geometry of the block figure at 300 DPI (14 x 6 inches).
pub const DEFAULT_BLOCK_WIDTH_PX: u32 = 4200;
pub const DEFAULT_BLOCK_HEIGHT_PX: u32 = 1800;

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct RawReportConfig {
    #[serde(default)]
    pub stride: RawPanelGeometry,
    #[serde(default)]
    pub block: RawPanelGeometry,
    #[serde(default)]
    pub display: RawDisplayConfig,
}

impl RawReportConfig {
    pub fn fill_default(&mut self) {
        self.stride
            .fill_default(DEFAULT_STRIDE_WIDTH_PX, DEFAULT_STRIDE_HEIGHT_PX);
        self.block
            .fill_default(DEFAULT_BLOCK_WIDTH_PX, DEFAULT_BLOCK_HEIGHT_PX);
        self.display.fill_default();
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct RawPanelGeometry {
    pub width_px: Option<u32>,
    pub height_px: Option<u32>,
}

impl RawPanelGeometry {
    pub fn fill_default(&mut self, width_px: u32, height_px: u32) {
        fill_default!(
            self,
            width_px: width_px,
            height_px: height_px,
        );
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct RawDisplayConfig {
    pub show: Option<bool>,
    pub viewer: Option<String>,
}

impl RawDisplayConfig {
    pub fn fill_default(&mut self) {
        fill_default!(self, show: true);
    }
}
