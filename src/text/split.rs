//! Word-safe splitting of a string at a height limit.
//!
//! The split point is found by binary search over character positions, then
//! snapped back to the nearest whitespace so no word is cut across a page
//! boundary. The whitespace character at the break is dropped from both
//! halves.
//!
//! Known limitation: a single token too long to fit at all is consumed one
//! character at a time. It is neither hyphenated nor shrunk.

use super::{char_boundaries, TextMetrics};

/// The result of splitting a string at a height limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    /// The part that fits. Never empty when the input was non-empty.
    pub fitting: String,
    /// What is left for the next page, `None` when nothing remains.
    pub remainder: Option<String>,
}

impl Split {
    fn whole(text: &str) -> Self {
        Self {
            fitting: text.to_string(),
            remainder: None,
        }
    }

    fn at(text: &str, fitting_end: usize, remainder_start: usize) -> Self {
        let remainder = &text[remainder_start..];
        Self {
            fitting: text[..fitting_end].to_string(),
            remainder: (!remainder.is_empty()).then(|| remainder.to_string()),
        }
    }
}

/// Split `text` into the longest word-safe prefix whose wrapped height is at
/// most `max_height`, and the remainder.
pub fn split(metrics: &TextMetrics<'_>, text: &str, max_height: f64) -> Split {
    if text.is_empty() || metrics.fits(text, max_height) {
        return Split::whole(text);
    }

    let chars: Vec<char> = text.chars().collect();
    let bounds = char_boundaries(text);
    // The whole text does not fit, so `best < chars.len()`.
    let best = metrics.longest_fitting_prefix(text, max_height);

    let snapped = (0..=best.min(chars.len() - 1))
        .rev()
        .find(|&i| chars[i].is_whitespace());

    match snapped {
        Some(cut) if cut > 0 => Split::at(text, bounds[cut], bounds[cut + 1]),
        _ => {
            let forced = chars.len().min(1);
            log::debug!(
                "No word-safe break within {max_height:.1}pt at width {:.1}; forcing {forced} char",
                metrics.width()
            );
            Split::at(text, bounds[forced], bounds[forced])
        }
    }
}
