//! # Style and Layout Configuration
//!
//! Colors, font descriptors, alignment, and the tunable constants of the
//! invoice layout. Everything here is plain data with `Default` impls and
//! serde derives, so a partial JSON config fills in from the defaults.

use serde::{Deserialize, Serialize};

/// An RGBA color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64, // 0.0 - 1.0
    pub g: f64,
    pub b: f64,
    #[serde(default = "opaque")]
    pub a: f64,
}

fn opaque() -> f64 {
    1.0
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };

    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Parse `#rgb` or `#rrggbb`. Returns `None` for anything else.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }
        let (r, g, b) = match hex.len() {
            3 => {
                let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).ok()?;
                let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).ok()?;
                let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).ok()?;
                (r, g, b)
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                (r, g, b)
            }
            _ => return None,
        };
        Some(Self::rgb(
            r as f64 / 255.0,
            g as f64 / 255.0,
            b as f64 / 255.0,
        ))
    }

    /// Like [`Color::from_hex`], falling back to black on malformed input.
    pub fn hex(hex: &str) -> Self {
        Self::from_hex(hex).unwrap_or(Color::BLACK)
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    #[default]
    Left,
    Right,
}

/// A font descriptor: family, size in points, and CSS-style weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontSpec {
    pub family: String,
    pub size: f64,
    #[serde(default = "default_weight")]
    pub weight: u32,
}

fn default_weight() -> u32 {
    400
}

impl FontSpec {
    pub fn regular(family: &str, size: f64) -> Self {
        Self {
            family: family.to_string(),
            size,
            weight: 400,
        }
    }

    pub fn bold(family: &str, size: f64) -> Self {
        Self {
            family: family.to_string(),
            size,
            weight: 700,
        }
    }

    pub fn is_bold(&self) -> bool {
        self.weight >= 600
    }
}

/// Tunable constants of the invoice layout.
///
/// All lengths are in points (1/72 inch).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Font family used for every text run.
    pub font_family: String,

    // ── Columns ────────────────────────────────────────────────
    /// Width of the 1-based item index column.
    pub index_column_width: f64,
    /// Width of the right-aligned amount column.
    pub amount_column_width: f64,
    /// Horizontal gap between adjacent columns.
    pub column_gap: f64,

    // ── Vertical rhythm ────────────────────────────────────────
    /// Padding added below every item row.
    pub row_padding: f64,
    /// Space between the header, bill-to, table, and totals blocks.
    pub block_gap: f64,
    /// Vertical padding inside the shaded table header band.
    pub table_header_padding: f64,

    // ── Type sizes ─────────────────────────────────────────────
    pub business_name_size: f64,
    pub heading_size: f64,
    pub meta_size: f64,
    pub table_header_size: f64,
    pub body_size: f64,
    pub annotation_size: f64,
    pub total_size: f64,
    pub footer_size: f64,

    // ── Colors ─────────────────────────────────────────────────
    pub text_color: Color,
    pub muted_color: Color,
    pub rule_color: Color,
    pub header_fill: Color,

    /// Logo images are scaled to this height, keeping their aspect ratio.
    pub logo_max_height: f64,
    /// Label drawn at the top of every continuation page.
    pub continuation_label: String,
    /// Stamp "Page i of n" into the reserved footer band.
    pub page_numbers: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            font_family: "Helvetica".to_string(),
            index_column_width: 28.0,
            amount_column_width: 96.0,
            column_gap: 12.0,
            row_padding: 6.0,
            block_gap: 16.0,
            table_header_padding: 4.0,
            business_name_size: 20.0,
            heading_size: 18.0,
            meta_size: 9.0,
            table_header_size: 9.0,
            body_size: 10.0,
            annotation_size: 8.0,
            total_size: 12.0,
            footer_size: 9.0,
            text_color: Color::hex("#1f2328"),
            muted_color: Color::hex("#6e7781"),
            rule_color: Color::hex("#d0d7de"),
            header_fill: Color::hex("#f6f8fa"),
            logo_max_height: 48.0,
            continuation_label: "Items (continued)".to_string(),
            page_numbers: true,
        }
    }
}

impl LayoutConfig {
    pub fn regular(&self, size: f64) -> FontSpec {
        FontSpec::regular(&self.font_family, size)
    }

    pub fn bold(&self, size: f64) -> FontSpec {
        FontSpec::bold(&self.font_family, size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parses_short_and_long_forms() {
        let short = Color::from_hex("#fff").unwrap();
        assert_eq!(short, Color::WHITE);
        let long = Color::from_hex("336699").unwrap();
        assert!((long.r - 0.2).abs() < 1e-9);
        assert!((long.g - 0.4).abs() < 1e-9);
        assert!((long.b - 0.6).abs() < 1e-9);
    }

    #[test]
    fn malformed_hex_is_rejected() {
        assert!(Color::from_hex("#12345").is_none());
        assert!(Color::from_hex("#gggggg").is_none());
        assert!(Color::from_hex("#ééé").is_none());
        assert_eq!(Color::hex("nope"), Color::BLACK);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: LayoutConfig =
            serde_json::from_str(r#"{ "rowPadding": 2, "pageNumbers": false }"#).unwrap();
        assert_eq!(config.row_padding, 2.0);
        assert!(!config.page_numbers);
        assert_eq!(config.amount_column_width, 96.0);
        assert_eq!(config.continuation_label, "Items (continued)");
    }

    #[test]
    fn weight_threshold_marks_bold() {
        assert!(FontSpec::bold("Helvetica", 10.0).is_bold());
        assert!(!FontSpec::regular("Helvetica", 10.0).is_bold());
        let semibold = FontSpec {
            weight: 600,
            ..FontSpec::regular("Helvetica", 10.0)
        };
        assert!(semibold.is_bold());
    }
}
