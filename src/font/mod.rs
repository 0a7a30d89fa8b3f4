//! # Font Management
//!
//! Character advance widths for text measurement.
//!
//! The standard PDF fonts (Helvetica, Courier) are always available and need
//! no font data. Custom TrueType/OpenType fonts can be registered from raw
//! bytes; their horizontal metrics are read with ttf-parser. Glyph shaping
//! and embedding are the canvas's business, not ours.

pub mod metrics;

use std::collections::HashMap;

use crate::style::FontSpec;
pub use metrics::StandardFontMetrics;

/// Line height as a multiple of font size, shared by every font.
pub const LINE_HEIGHT_FACTOR: f64 = 1.2;

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct FontKey {
    pub family: String,
    pub bold: bool,
}

impl FontKey {
    fn new(family: &str, bold: bool) -> Self {
        Self {
            family: family.to_string(),
            bold,
        }
    }
}

/// The standard fonts we carry width tables for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    Courier,
    CourierBold,
}

impl StandardFont {
    pub fn metrics(&self) -> &'static StandardFontMetrics {
        match self {
            Self::Helvetica => &metrics::HELVETICA,
            Self::HelveticaBold => &metrics::HELVETICA_BOLD,
            Self::Courier | Self::CourierBold => &metrics::COURIER,
        }
    }
}

/// Parsed metrics from a TrueType/OpenType font via ttf-parser.
#[derive(Debug, Clone)]
pub struct CustomFontMetrics {
    pub units_per_em: u16,
    pub advance_widths: HashMap<char, u16>,
    pub default_advance: u16,
}

impl CustomFontMetrics {
    /// Get the advance width of a character in points.
    pub fn char_width(&self, ch: char, font_size: f64) -> f64 {
        let w = self
            .advance_widths
            .get(&ch)
            .copied()
            .unwrap_or(self.default_advance);
        (w as f64 / self.units_per_em as f64) * font_size
    }

    /// Parse metrics from font data. Returns `None` if the data is not a
    /// font ttf-parser can read.
    pub fn from_font_data(data: &[u8]) -> Option<Self> {
        let face = ttf_parser::Face::parse(data, 0).ok()?;
        let units_per_em = face.units_per_em();

        let mut codepoints = Vec::new();
        if let Some(cmap) = face.tables().cmap {
            for subtable in cmap.subtables {
                if subtable.is_unicode() {
                    subtable.codepoints(|cp| codepoints.push(cp));
                }
            }
        }

        let mut advance_widths = HashMap::new();
        for ch in codepoints.into_iter().filter_map(char::from_u32) {
            if let Some(glyph_id) = face.glyph_index(ch) {
                let advance = face.glyph_hor_advance(glyph_id).unwrap_or(0);
                advance_widths.insert(ch, advance);
            }
        }

        let default_advance = match advance_widths.get(&' ') {
            Some(&w) if w > 0 => w,
            _ => units_per_em / 2,
        };

        Some(CustomFontMetrics {
            units_per_em,
            advance_widths,
            default_advance,
        })
    }
}

#[derive(Debug, Clone)]
pub enum FontData {
    /// One of the standard PDF fonts.
    Standard(StandardFont),
    /// A registered TrueType/OpenType font.
    Custom(CustomFontMetrics),
}

/// Borrowed view of whichever metrics a font spec resolves to.
#[derive(Debug, Clone, Copy)]
enum ResolvedMetrics<'a> {
    Standard(&'static StandardFontMetrics),
    Custom(&'a CustomFontMetrics),
}

/// A font registry that maps family + boldness to font data.
#[derive(Debug)]
pub struct FontRegistry {
    fonts: HashMap<FontKey, FontData>,
}

impl Default for FontRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FontRegistry {
    pub fn new() -> Self {
        let standard_mappings = [
            (("Helvetica", false), StandardFont::Helvetica),
            (("Helvetica", true), StandardFont::HelveticaBold),
            (("Courier", false), StandardFont::Courier),
            (("Courier", true), StandardFont::CourierBold),
        ];

        let fonts = standard_mappings
            .into_iter()
            .map(|((family, bold), font)| (FontKey::new(family, bold), FontData::Standard(font)))
            .collect();

        Self { fonts }
    }

    /// Look up a font, falling back to the regular face of the same family
    /// and then to Helvetica.
    fn resolve(&self, family: &str, bold: bool) -> ResolvedMetrics<'_> {
        let candidates = [
            FontKey::new(family, bold),
            FontKey::new(family, false),
        ];
        for key in &candidates {
            match self.fonts.get(key) {
                Some(FontData::Standard(font)) => return ResolvedMetrics::Standard(font.metrics()),
                Some(FontData::Custom(metrics)) => return ResolvedMetrics::Custom(metrics),
                None => {}
            }
        }

        let fallback = if bold {
            StandardFont::HelveticaBold
        } else {
            StandardFont::Helvetica
        };
        ResolvedMetrics::Standard(fallback.metrics())
    }

    /// Register a custom font. Data ttf-parser cannot read is ignored and the
    /// family keeps measuring with the fallback metrics.
    pub fn register(&mut self, family: &str, bold: bool, data: &[u8]) -> bool {
        match CustomFontMetrics::from_font_data(data) {
            Some(metrics) => {
                self.fonts
                    .insert(FontKey::new(family, bold), FontData::Custom(metrics));
                true
            }
            None => {
                log::warn!("Unreadable font data for {family} bold={bold}; using Helvetica metrics");
                false
            }
        }
    }
}

/// Shared font context used by text measurement.
///
/// Immutable once built, so one context can serve any number of concurrent
/// renders by shared reference.
#[derive(Debug, Default)]
pub struct FontContext {
    registry: FontRegistry,
}

impl FontContext {
    pub fn new() -> Self {
        Self {
            registry: FontRegistry::new(),
        }
    }

    /// Register a custom font for `family`. Returns whether the data parsed.
    pub fn register_font(&mut self, family: &str, bold: bool, data: &[u8]) -> bool {
        self.registry.register(family, bold, data)
    }

    /// Get the advance width of a single character in points.
    pub fn char_width(&self, ch: char, font: &FontSpec) -> f64 {
        match self.registry.resolve(&font.family, font.is_bold()) {
            ResolvedMetrics::Standard(m) => m.char_width(ch, font.size),
            ResolvedMetrics::Custom(m) => m.char_width(ch, font.size),
        }
    }
}
