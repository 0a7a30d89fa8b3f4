//! # Text Measurement
//!
//! The layout engine only ever asks two questions about text: how tall is
//! this string once wrapped to a width, and how much of it fits in a given
//! height. [`TextMeasurer`] is the provider seam for the first question;
//! [`TextMetrics`] pins a font and width to a provider and answers both.
//!
//! [`FontContext`] is the built-in provider. It breaks lines greedily at
//! UAX#14 break opportunities, honours hard newlines, lets trailing spaces
//! hang past the edge, and force-breaks a word wider than the whole line.

pub mod split;

pub use split::{split, Split};

use unicode_linebreak::{linebreaks, BreakOpportunity};

use crate::font::{FontContext, LINE_HEIGHT_FACTOR};
use crate::style::FontSpec;

/// Measures wrapped text. Implementations must be deterministic: identical
/// arguments always produce identical results.
pub trait TextMeasurer {
    /// Height of one line of text in `font`.
    fn line_height(&self, font: &FontSpec) -> f64;

    /// Height of `text` word-wrapped to `width`. Empty text has height 0.
    /// Must stay finite for any width, including `width <= 0`.
    fn wrapped_height(&self, text: &str, font: &FontSpec, width: f64) -> f64;
}

/// A line of text after line-breaking.
#[derive(Debug, Clone, PartialEq)]
pub struct BrokenLine {
    pub text: String,
    /// Width of the line excluding hanging whitespace.
    pub width: f64,
}

fn is_newline(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Compute UAX#14 break opportunities indexed by char position.
///
/// Each entry is the break opportunity *before* that character. Index 0 is
/// always `None`.
fn compute_break_opportunities(text: &str) -> Vec<Option<BreakOpportunity>> {
    let char_count = text.chars().count();
    let mut result = vec![None; char_count];

    let mut byte_to_char = vec![0usize; text.len() + 1];
    for (char_idx, (byte_idx, _)) in text.char_indices().enumerate() {
        byte_to_char[byte_idx] = char_idx;
    }
    byte_to_char[text.len()] = char_count;

    for (byte_offset, opp) in linebreaks(text) {
        let char_idx = byte_to_char[byte_offset];
        // A break at the very end of the text never starts a new line.
        if char_idx < char_count {
            result[char_idx] = Some(opp);
        }
    }

    result
}

/// Byte offset of every char boundary, so `bounds[n]` ends an n-char prefix.
pub(crate) fn char_boundaries(text: &str) -> Vec<usize> {
    text.char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect()
}

impl FontContext {
    /// Break `text` into lines no wider than `max_width`.
    pub fn break_into_lines(&self, text: &str, font: &FontSpec, max_width: f64) -> Vec<BrokenLine> {
        if text.is_empty() {
            return Vec::new();
        }

        let chars: Vec<char> = text.chars().collect();
        let widths: Vec<f64> = chars
            .iter()
            .map(|&ch| if is_newline(ch) { 0.0 } else { self.char_width(ch, font) })
            .collect();
        let break_opps = compute_break_opportunities(text);

        let mut lines = Vec::new();
        let mut line_start = 0;
        let mut line_width = 0.0;
        let mut last_break: Option<usize> = None;

        for (i, &ch) in chars.iter().enumerate() {
            match break_opps[i] {
                Some(BreakOpportunity::Mandatory) => {
                    lines.push(make_line(&chars[line_start..i], &widths[line_start..i]));
                    line_start = i;
                    line_width = 0.0;
                    last_break = None;
                }
                Some(BreakOpportunity::Allowed) => last_break = Some(i),
                None => {}
            }

            let w = widths[i];
            let overflows = line_width + w > max_width && line_start < i;
            if !overflows || ch.is_whitespace() {
                line_width += w;
                continue;
            }

            match last_break {
                Some(bp) if bp > line_start => {
                    lines.push(make_line(&chars[line_start..bp], &widths[line_start..bp]));
                    line_start = bp;
                    line_width = widths[bp..=i].iter().sum();
                }
                _ => {
                    // No break opportunity on this line: force-break the word
                    lines.push(make_line(&chars[line_start..i], &widths[line_start..i]));
                    line_start = i;
                    line_width = w;
                }
            }
            last_break = None;
        }

        if line_start < chars.len() {
            lines.push(make_line(&chars[line_start..], &widths[line_start..]));
        }

        lines
    }
}

fn make_line(chars: &[char], widths: &[f64]) -> BrokenLine {
    let mut end = chars.len();
    while end > 0 && chars[end - 1].is_whitespace() {
        end -= 1;
    }
    BrokenLine {
        text: chars[..end].iter().collect(),
        width: widths[..end].iter().sum(),
    }
}

impl TextMeasurer for FontContext {
    fn line_height(&self, font: &FontSpec) -> f64 {
        font.size * LINE_HEIGHT_FACTOR
    }

    fn wrapped_height(&self, text: &str, font: &FontSpec, width: f64) -> f64 {
        self.break_into_lines(text, font, width).len() as f64 * self.line_height(font)
    }
}

/// A font and wrap width pinned to a measurement provider.
#[derive(Clone)]
pub struct TextMetrics<'a> {
    measurer: &'a dyn TextMeasurer,
    font: FontSpec,
    width: f64,
}

impl<'a> TextMetrics<'a> {
    pub fn new(measurer: &'a dyn TextMeasurer, font: FontSpec, width: f64) -> Self {
        Self {
            measurer,
            font,
            width,
        }
    }

    pub fn font(&self) -> &FontSpec {
        &self.font
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn line_height(&self) -> f64 {
        self.measurer.line_height(&self.font)
    }

    /// Wrapped height of `text`.
    pub fn height(&self, text: &str) -> f64 {
        self.measurer.wrapped_height(text, &self.font, self.width)
    }

    /// Whether `text` fits in `max_height`. Exact fits count.
    pub fn fits(&self, text: &str, max_height: f64) -> bool {
        self.height(text) <= max_height
    }

    /// Length in chars of the longest prefix of `text` that fits in
    /// `max_height`, found by binary search over `[0, len]`.
    pub fn longest_fitting_prefix(&self, text: &str, max_height: f64) -> usize {
        let bounds = char_boundaries(text);
        let mut lo = 0;
        let mut hi = bounds.len() - 1;
        while lo < hi {
            let mid = lo + (hi - lo + 1) / 2;
            if self.fits(&text[..bounds[mid]], max_height) {
                lo = mid;
            } else {
                hi = mid - 1;
            }
        }
        lo
    }
}

impl std::fmt::Debug for TextMetrics<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextMetrics")
            .field("font", &self.font)
            .field("width", &self.width)
            .finish_non_exhaustive()
    }
}
