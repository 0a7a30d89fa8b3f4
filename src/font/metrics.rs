//! Advance widths for the standard PDF fonts, in 1/1000 em.
//!
//! Tables cover printable ASCII (U+0020..=U+007E) and come from the Adobe
//! Core 14 AFM files. A handful of common non-ASCII characters (currency
//! symbols, typographic quotes, the multiplication sign) are mapped
//! explicitly; everything else uses the font's fallback advance.

/// Width table for one of the standard fonts.
#[derive(Debug)]
pub struct StandardFontMetrics {
    ascii: &'static [u16; 95],
    extra: &'static [(char, u16)],
    fallback: u16,
}

impl StandardFontMetrics {
    /// Advance width of `ch` in points at `font_size`.
    pub fn char_width(&self, ch: char, font_size: f64) -> f64 {
        let units = match ch {
            ' '..='~' => self.ascii[ch as usize - 0x20],
            _ => self
                .extra
                .iter()
                .find(|(c, _)| *c == ch)
                .map(|(_, w)| *w)
                .unwrap_or(self.fallback),
        };
        units as f64 / 1000.0 * font_size
    }
}

pub static HELVETICA: StandardFontMetrics = StandardFontMetrics {
    ascii: &[
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
        278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
        667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
        278, 278, 278, 469, 556, 333, // '['..'`'
        556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
        556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
        334, 260, 334, 584, // '{'..'~'
    ],
    extra: &[
        ('\u{00A0}', 278),
        ('\u{00D7}', 584),
        ('\u{00A3}', 556),
        ('\u{00A5}', 556),
        ('\u{20AC}', 556),
        ('\u{20B9}', 556),
        ('\u{2013}', 556),
        ('\u{2014}', 1000),
        ('\u{2018}', 222),
        ('\u{2019}', 222),
        ('\u{201C}', 333),
        ('\u{201D}', 333),
        ('\u{2022}', 350),
        ('\u{2026}', 1000),
    ],
    fallback: 556,
};

pub static HELVETICA_BOLD: StandardFontMetrics = StandardFontMetrics {
    ascii: &[
        278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
        333, 333, 584, 584, 584, 611, 975, // ':'..'@'
        722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, // 'A'..'M'
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
        333, 278, 333, 584, 556, 333, // '['..'`'
        556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, // 'a'..'m'
        611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // 'n'..'z'
        389, 280, 389, 584, // '{'..'~'
    ],
    extra: &[
        ('\u{00A0}', 278),
        ('\u{00D7}', 584),
        ('\u{00A3}', 556),
        ('\u{00A5}', 556),
        ('\u{20AC}', 556),
        ('\u{20B9}', 556),
        ('\u{2013}', 556),
        ('\u{2014}', 1000),
        ('\u{2018}', 278),
        ('\u{2019}', 278),
        ('\u{201C}', 500),
        ('\u{201D}', 500),
        ('\u{2022}', 350),
        ('\u{2026}', 1000),
    ],
    fallback: 611,
};

/// Courier is monospaced; every glyph advances 600 units.
pub static COURIER: StandardFontMetrics = StandardFontMetrics {
    ascii: &[600; 95],
    extra: &[],
    fallback: 600,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helvetica_space_width() {
        let w = HELVETICA.char_width(' ', 12.0);
        assert!((w - 3.336).abs() < 0.001);
    }

    #[test]
    fn ascii_table_is_aligned() {
        assert_eq!(HELVETICA.char_width('A', 1000.0), 667.0);
        assert_eq!(HELVETICA.char_width('z', 1000.0), 500.0);
        assert_eq!(HELVETICA.char_width('~', 1000.0), 584.0);
        assert_eq!(HELVETICA_BOLD.char_width('m', 1000.0), 889.0);
        assert_eq!(HELVETICA_BOLD.char_width('@', 1000.0), 975.0);
    }

    #[test]
    fn courier_is_monospaced() {
        assert_eq!(COURIER.char_width('i', 10.0), COURIER.char_width('M', 10.0));
        assert!((COURIER.char_width('\u{4E2D}', 10.0) - 6.0).abs() < 1e-9);
    }

    #[test]
    fn non_ascii_uses_extras_then_fallback() {
        assert_eq!(HELVETICA.char_width('\u{20AC}', 1000.0), 556.0);
        assert_eq!(HELVETICA.char_width('\u{4E2D}', 1000.0), 556.0);
        assert_eq!(HELVETICA_BOLD.char_width('\u{4E2D}', 1000.0), 611.0);
    }
}
