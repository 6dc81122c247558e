use std::sync::{Arc, RwLock, RwLockWriteGuard};

use cosmic_text::{Attrs, Family, Style, Weight, fontdb};

use imprint_core::Color;

use crate::error::TextResult;

const DEFAULT_LOCALE: &str = "en-US";

/// Faces available to the shaper, before they are handed to a [`FontSystem`].
pub struct FontDatabase {
    inner: fontdb::Database,
}

impl FontDatabase {
    /// Database populated from the platform's installed fonts.
    pub fn new() -> Self {
        let mut inner = fontdb::Database::new();
        inner.load_system_fonts();
        Self { inner }
    }

    pub fn empty() -> Self {
        Self {
            inner: fontdb::Database::new(),
        }
    }

    /// Add the faces of a bundled `.ttf`/`.otf`/`.ttc` file.
    pub fn load_font_file(&mut self, path: impl AsRef<std::path::Path>) -> TextResult<()> {
        self.inner.load_font_file(path)?;
        Ok(())
    }

    pub fn has_family(&self, family: &str) -> bool {
        self.inner
            .faces()
            .flat_map(|face| face.families.iter())
            .any(|(name, _)| name == family)
    }

    /// Number of faces, not families.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for FontDatabase {
    fn default() -> Self {
        Self::new()
    }
}

/// Shaping state shared by every entity drawing text.
///
/// Clones point at the same underlying system.
#[derive(Clone)]
pub struct FontSystem {
    shared: Arc<RwLock<cosmic_text::FontSystem>>,
}

impl FontSystem {
    pub fn new(db: FontDatabase) -> Self {
        let locale = sys_locale::get_locale().unwrap_or_else(|| DEFAULT_LOCALE.to_string());
        let system = cosmic_text::FontSystem::new_with_locale_and_db(locale, db.inner);
        Self {
            shared: Arc::new(RwLock::new(system)),
        }
    }

    pub fn with_system_fonts() -> Self {
        Self::new(FontDatabase::new())
    }

    /// Exclusive access for shaping or glyph rasterization.
    pub(crate) fn lock(&self) -> TextResult<RwLockWriteGuard<'_, cosmic_text::FontSystem>> {
        Ok(self.shared.write()?)
    }
}

impl Default for FontSystem {
    fn default() -> Self {
        Self::with_system_fonts()
    }
}

/// Typeface reference handed to the shaper.
///
/// `weight` is on the usual 100..=900 scale. Generic families
/// ("sans-serif", "serif", "monospace") resolve through the database's
/// fallbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontAttributes {
    pub family: String,
    pub weight: u16,
    pub italic: bool,
}

impl FontAttributes {
    pub const REGULAR: u16 = 400;
    pub const BOLD: u16 = 700;

    pub fn new(family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            weight: Self::REGULAR,
            italic: false,
        }
    }

    pub fn sans_serif() -> Self {
        Self::new("sans-serif")
    }

    pub fn with_weight(mut self, weight: u16) -> Self {
        self.weight = weight.clamp(100, 900);
        self
    }

    pub fn bold(self) -> Self {
        self.with_weight(Self::BOLD)
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub(crate) fn to_cosmic(&self) -> Attrs<'_> {
        let family = match self.family.as_str() {
            "sans-serif" => Family::SansSerif,
            "serif" => Family::Serif,
            "monospace" => Family::Monospace,
            name => Family::Name(name),
        };
        let style = if self.italic { Style::Italic } else { Style::Normal };
        Attrs::new()
            .family(family)
            .weight(Weight(self.weight))
            .style(style)
    }
}

impl Default for FontAttributes {
    fn default() -> Self {
        Self::sans_serif()
    }
}

/// Font of a text layer, sized relative to the canvas.
///
/// `size_fraction` is the font size as a fraction of canvas width, so the
/// same layer renders proportionally on any canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct FontDescriptor {
    pub size_fraction: f32,
    pub color: Color,
    pub typeface: FontAttributes,
}

impl FontDescriptor {
    pub fn new(size_fraction: f32, color: Color, typeface: FontAttributes) -> Self {
        Self {
            size_fraction,
            color,
            typeface,
        }
    }

    /// Absolute font size in pixels for a canvas of the given width.
    pub fn pixel_size(&self, canvas_width: u32) -> f32 {
        self.size_fraction * canvas_width as f32
    }
}
