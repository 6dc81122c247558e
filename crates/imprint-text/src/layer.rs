use imprint_core::Color;

use crate::font::{FontAttributes, FontDescriptor};

/// Bounds and step for font sizes, as fractions of canvas width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSizeLimits {
    pub initial: f32,
    pub step: f32,
    pub min: f32,
    pub max: f32,
}

impl FontSizeLimits {
    pub fn clamp(&self, size_fraction: f32) -> f32 {
        size_fraction.clamp(self.min, self.max)
    }
}

impl Default for FontSizeLimits {
    fn default() -> Self {
        Self {
            initial: 0.075,
            step: 0.008,
            min: 0.01,
            max: 1.0,
        }
    }
}

/// Editable state of a text overlay: the string and its font.
///
/// Every mutation invalidates the entity's raster buffer; the owning entity
/// re-lays out after each edit.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayer {
    text: String,
    font: FontDescriptor,
}

impl TextLayer {
    pub fn new(text: impl Into<String>, font: FontDescriptor) -> Self {
        Self {
            text: text.into(),
            font,
        }
    }

    /// Layer with the initial font size and black sans-serif text.
    pub fn with_defaults(text: impl Into<String>, limits: &FontSizeLimits) -> Self {
        Self::new(
            text,
            FontDescriptor::new(limits.initial, Color::BLACK, FontAttributes::default()),
        )
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn font(&self) -> &FontDescriptor {
        &self.font
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn set_color(&mut self, color: Color) {
        self.font.color = color;
    }

    /// Returns true if the size changed.
    pub fn increase_font_size(&mut self, limits: &FontSizeLimits) -> bool {
        self.step_font_size(limits.step, limits)
    }

    /// Returns true if the size changed.
    pub fn decrease_font_size(&mut self, limits: &FontSizeLimits) -> bool {
        self.step_font_size(-limits.step, limits)
    }

    fn step_font_size(&mut self, delta: f32, limits: &FontSizeLimits) -> bool {
        let next = limits.clamp(self.font.size_fraction + delta);
        if next == self.font.size_fraction {
            return false;
        }
        self.font.size_fraction = next;
        true
    }
}
