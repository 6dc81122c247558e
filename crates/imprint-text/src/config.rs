use imprint_scene::ScaleLimits;

use crate::decoration::BackgroundStyle;
use crate::error::{TextError, TextResult};
use crate::layer::FontSizeLimits;

/// Tunables for text entities.
#[derive(Debug, Clone, PartialEq)]
pub struct TextEntityConfig {
    /// Buffer width (and wrap width) as a percentage of canvas width.
    pub width_percent: u32,
    /// Buffer height never drops below this fraction of canvas height.
    pub min_height_fraction: f32,
    /// Line height as a multiple of the font size.
    pub line_height: f32,
    pub background: BackgroundStyle,
    pub font_limits: FontSizeLimits,
    pub scale_limits: ScaleLimits,
    /// Largest buffer, in pixels, the allocator will hand out.
    pub max_buffer_pixels: u64,
}

impl Default for TextEntityConfig {
    fn default() -> Self {
        Self {
            width_percent: 60,
            min_height_fraction: 0.13,
            line_height: 1.2,
            background: BackgroundStyle::default(),
            font_limits: FontSizeLimits::default(),
            scale_limits: ScaleLimits::default(),
            max_buffer_pixels: 1 << 25,
        }
    }
}

impl TextEntityConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_width_percent(mut self, percent: u32) -> Self {
        self.width_percent = percent;
        self
    }

    pub fn with_min_height_fraction(mut self, fraction: f32) -> Self {
        self.min_height_fraction = fraction;
        self
    }

    pub fn with_line_height(mut self, line_height: f32) -> Self {
        self.line_height = line_height;
        self
    }

    pub fn with_background(mut self, background: BackgroundStyle) -> Self {
        self.background = background;
        self
    }

    pub fn with_font_limits(mut self, limits: FontSizeLimits) -> Self {
        self.font_limits = limits;
        self
    }

    pub fn with_scale_limits(mut self, limits: ScaleLimits) -> Self {
        self.scale_limits = limits;
        self
    }

    pub fn with_max_buffer_pixels(mut self, pixels: u64) -> Self {
        self.max_buffer_pixels = pixels;
        self
    }

    pub fn validate(&self) -> TextResult<()> {
        if self.width_percent == 0 || self.width_percent > 100 {
            return Err(TextError::InvalidConfig(format!(
                "width_percent must be in 1..=100, got {}",
                self.width_percent
            )));
        }
        if !(self.min_height_fraction > 0.0 && self.min_height_fraction <= 1.0) {
            return Err(TextError::InvalidConfig(format!(
                "min_height_fraction must be in (0, 1], got {}",
                self.min_height_fraction
            )));
        }
        if !(self.line_height.is_finite() && self.line_height > 0.0) {
            return Err(TextError::InvalidConfig(format!(
                "line_height must be positive, got {}",
                self.line_height
            )));
        }
        let font = &self.font_limits;
        if !(font.min > 0.0 && font.min <= font.max && font.max <= 1.0 && font.step > 0.0) {
            return Err(TextError::InvalidConfig(format!(
                "font size limits out of range: {:?}",
                font
            )));
        }
        let scale = &self.scale_limits;
        if !(scale.min > 0.0 && scale.min <= scale.max) {
            return Err(TextError::InvalidConfig(format!(
                "scale limits out of range: {:?}",
                scale
            )));
        }
        if self.max_buffer_pixels == 0 {
            return Err(TextError::InvalidConfig(String::from(
                "max_buffer_pixels must be non-zero",
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(TextEntityConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        assert!(
            TextEntityConfig::new()
                .with_width_percent(0)
                .validate()
                .is_err()
        );
        assert!(
            TextEntityConfig::new()
                .with_min_height_fraction(1.5)
                .validate()
                .is_err()
        );
        assert!(
            TextEntityConfig::new()
                .with_line_height(f32::NAN)
                .validate()
                .is_err()
        );
        assert!(
            TextEntityConfig::new()
                .with_max_buffer_pixels(0)
                .validate()
                .is_err()
        );
    }
}
