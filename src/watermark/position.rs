use clap::ValueEnum;
use serde::Deserialize;
use std::fmt;

/// Where the watermark is anchored on the base image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WatermarkPosition {
    TopLeft,
    BottomLeft,
    TopRight,
    BottomRight,
    #[default]
    Center,
}

impl WatermarkPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            WatermarkPosition::TopLeft => "top-left",
            WatermarkPosition::BottomLeft => "bottom-left",
            WatermarkPosition::TopRight => "top-right",
            WatermarkPosition::BottomRight => "bottom-right",
            WatermarkPosition::Center => "center",
        }
    }

    /// Top-left corner of the watermark, in base image coordinates.
    ///
    /// Either component goes negative when the watermark is larger than the
    /// base along that axis. Centering uses floor division.
    pub fn offset(&self, base: (u32, u32), mark: (u32, u32)) -> (i64, i64) {
        let (base_width, base_height) = (base.0 as i64, base.1 as i64);
        let (mark_width, mark_height) = (mark.0 as i64, mark.1 as i64);

        match self {
            WatermarkPosition::TopLeft => (0, 0),
            WatermarkPosition::BottomLeft => (0, base_height - mark_height),
            WatermarkPosition::TopRight => (base_width - mark_width, 0),
            WatermarkPosition::BottomRight => {
                (base_width - mark_width, base_height - mark_height)
            }
            WatermarkPosition::Center => (
                (base_width - mark_width).div_euclid(2),
                (base_height - mark_height).div_euclid(2),
            ),
        }
    }
}

impl fmt::Display for WatermarkPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
