//! # Row Composition
//!
//! Places one line item as one or more physical rows. The first row carries
//! the item number, the amount, and the bold title. Body text that does not
//! fit is split word-safely and continues on the next page as body-only
//! rows. The unit breakdown goes under the last piece of body text. A title
//! taller than a whole page is split the same way before any body is drawn.

use super::flow::PageFlow;
use super::geometry::ColumnLayout;
use super::normalize::NormalizedItem;
use super::{TextRole, TextRun};
use crate::model::LineItem;
use crate::money::{format_money, unit_breakdown};
use crate::style::{FontSpec, LayoutConfig, TextAlign};
use crate::text::{split, Split, TextMetrics};

pub struct RowComposer<'c> {
    config: &'c LayoutConfig,
    columns: ColumnLayout,
    currency: &'c str,
}

impl<'c> RowComposer<'c> {
    pub fn new(config: &'c LayoutConfig, columns: ColumnLayout, currency: &'c str) -> Self {
        Self {
            config,
            columns,
            currency,
        }
    }

    /// Place item number `number` (1-based), breaking pages as needed.
    pub fn place(&self, flow: &mut PageFlow<'_>, number: usize, item: &LineItem) {
        let config = self.config;
        let desc = self.columns.description;
        let measurer = flow.measurer();

        let body_font = config.regular(config.body_size);
        let title_font = config.bold(config.body_size);
        let note_font = config.regular(config.annotation_size);
        let body_metrics = TextMetrics::new(measurer, body_font.clone(), desc.width);
        let title_metrics = TextMetrics::new(measurer, title_font.clone(), desc.width);
        let note_metrics = TextMetrics::new(measurer, note_font.clone(), desc.width);
        let body_line = body_metrics.line_height();

        let NormalizedItem { title, body } = item.normalized();

        let mut title_rest = title;
        let mut remainder = body;
        let mut breakdown = item.shows_unit_breakdown().then(|| {
            unit_breakdown(
                item.display_quantity(),
                item.display_unit_price(),
                self.currency,
            )
        });
        let mut first = true;

        loop {
            let title_height = title_rest
                .as_deref()
                .map(|t| title_metrics.height(t))
                .unwrap_or(0.0);
            flow.ensure_space(body_line.max(title_height));

            let row_top = flow.y();
            let bottom = flow.content_bottom();

            // A title taller than the page is split like a body
            let title_piece = title_rest
                .take()
                .map(|t| split(&title_metrics, &t, bottom - row_top));
            let title_drawn = title_piece
                .as_ref()
                .map(|p| title_metrics.height(&p.fitting))
                .unwrap_or(0.0);
            let body_top = row_top + title_drawn;
            // A fresh page always has room for a body line below its headers
            let fresh_row = flow.at_page_top() && title_piece.is_none();
            let body_starved =
                remainder.is_some() && bottom - body_top <= body_line && !fresh_row;

            // Nothing but the body would go on this row: retry it on a new page
            if body_starved && title_piece.is_none() {
                flow.start_new_page();
                continue;
            }

            let mut row_height: f64 = 0.0;
            let mut text_y = row_top;

            if first {
                let idx = self.columns.index;
                let amt = self.columns.amount;
                let h_index = flow.draw_text(
                    TextRun::new(number.to_string(), body_font.clone(), TextRole::ItemIndex)
                        .at(idx.x, row_top, idx.width)
                        .color(config.muted_color),
                );
                let h_amount = flow.draw_text(
                    TextRun::new(
                        format_money(item.amount(), self.currency),
                        body_font.clone(),
                        TextRole::ItemAmount,
                    )
                    .at(amt.x, row_top, amt.width)
                    .align(TextAlign::Right)
                    .color(config.text_color),
                );
                row_height = h_index.max(h_amount).max(body_line);
            }

            if let Some(Split {
                fitting,
                remainder: rest,
            }) = title_piece
            {
                text_y += flow.draw_text(
                    TextRun::new(fitting, title_font.clone(), TextRole::ItemTitle)
                        .at(desc.x, row_top, desc.width)
                        .color(config.text_color),
                );
                title_rest = rest;
            }

            // The body waits for the whole title, and for a line of room
            if title_rest.is_none() && !body_starved {
                if let Some(text) = remainder.take() {
                    let Split {
                        fitting,
                        remainder: rest,
                    } = split(&body_metrics, &text, bottom - text_y);
                    text_y += flow.draw_text(
                        TextRun::new(fitting, body_font.clone(), TextRole::ItemBody)
                            .at(desc.x, text_y, desc.width)
                            .color(config.text_color),
                    );
                    remainder = rest;
                }
            }

            if title_rest.is_none() && remainder.is_none() {
                if let Some(note) = breakdown.take() {
                    let room = bottom - text_y;
                    if note_metrics.fits(&note, room) {
                        text_y += self.draw_note(flow, note, text_y, &note_font);
                    } else if flow.at_page_top() && text_y <= row_top {
                        // Nothing else fits anywhere better: split it here
                        let Split {
                            fitting,
                            remainder: rest,
                        } = split(&note_metrics, &note, room);
                        text_y += self.draw_note(flow, fitting, text_y, &note_font);
                        breakdown = rest;
                    } else {
                        breakdown = Some(note);
                    }
                }
            }

            flow.advance(row_height.max(text_y - row_top));
            first = false;

            if title_rest.is_none() && remainder.is_none() && breakdown.is_none() {
                break;
            }
            flow.start_new_page();
        }
    }

    fn draw_note(&self, flow: &mut PageFlow<'_>, note: String, y: f64, font: &FontSpec) -> f64 {
        let desc = self.columns.description;
        flow.draw_text(
            TextRun::new(note, font.clone(), TextRole::UnitBreakdown)
                .at(desc.x, y, desc.width)
                .color(self.config.muted_color),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FontContext;
    use crate::layout::geometry::PageGeometry;
    use crate::layout::{DrawCommand, Page};

    fn place(items: &[LineItem], skip: f64) -> Vec<Page> {
        let fonts = FontContext::new();
        let config = LayoutConfig::default();
        let geometry = PageGeometry::letter();
        let columns = ColumnLayout::new(&geometry, &config).unwrap();
        let mut flow = PageFlow::new(&fonts, &config, geometry, columns, "INV-1");
        flow.skip(skip);
        let rows = RowComposer::new(&config, columns, "USD");
        for (i, item) in items.iter().enumerate() {
            rows.place(&mut flow, i + 1, item);
        }
        flow.finish()
    }

    fn texts(page: &Page, role: TextRole) -> Vec<String> {
        page.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text(run) if run.role == role => Some(run.text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn short_item_is_one_row() {
        let pages = place(&[LineItem::new(1, 50.0).with_title("Paint")], 0.0);
        assert_eq!(pages.len(), 1);
        assert_eq!(texts(&pages[0], TextRole::ItemIndex), vec!["1"]);
        assert_eq!(texts(&pages[0], TextRole::ItemAmount), vec!["$50.00"]);
        assert_eq!(texts(&pages[0], TextRole::ItemTitle), vec!["Paint"]);
        assert!(texts(&pages[0], TextRole::ItemBody).is_empty());
        assert!(texts(&pages[0], TextRole::UnitBreakdown).is_empty());
    }

    #[test]
    fn multi_quantity_gets_breakdown() {
        let pages = place(&[LineItem::new(5, 10.0).with_title("Brushes")], 0.0);
        assert_eq!(texts(&pages[0], TextRole::ItemAmount), vec!["$50.00"]);
        assert_eq!(
            texts(&pages[0], TextRole::UnitBreakdown),
            vec!["5 x $10.00 each"]
        );
    }

    #[test]
    fn empty_item_still_takes_a_line() {
        let fonts = FontContext::new();
        let config = LayoutConfig::default();
        let geometry = PageGeometry::letter();
        let columns = ColumnLayout::new(&geometry, &config).unwrap();
        let mut flow = PageFlow::new(&fonts, &config, geometry, columns, "");
        let before = flow.y();
        RowComposer::new(&config, columns, "USD").place(&mut flow, 1, &LineItem::new(1, 0.0));
        let line = config.body_size * crate::font::LINE_HEIGHT_FACTOR;
        assert!((flow.y() - before - line - config.row_padding).abs() < 1e-9);
    }

    #[test]
    fn long_body_continues_on_next_page_without_index() {
        let body = "lorem ipsum dolor sit amet ".repeat(120);
        let item = LineItem::new(2, 75.0)
            .with_title("Site survey")
            .with_description(body.trim());
        let pages = place(&[item], 500.0);
        assert!(pages.len() >= 2);
        assert_eq!(texts(&pages[0], TextRole::ItemIndex), vec!["1"]);
        for page in &pages[1..] {
            assert!(texts(page, TextRole::ItemIndex).is_empty());
            assert!(texts(page, TextRole::ItemAmount).is_empty());
        }
        let last = pages.last().unwrap();
        assert_eq!(
            texts(last, TextRole::UnitBreakdown),
            vec!["2 x $75.00 each"]
        );
        let segments: Vec<String> = pages
            .iter()
            .flat_map(|p| texts(p, TextRole::ItemBody))
            .collect();
        assert_eq!(segments.join(" "), body.trim());
    }

    #[test]
    fn starved_untitled_body_moves_whole_row() {
        let fonts = FontContext::new();
        let config = LayoutConfig::default();
        let geometry = PageGeometry::letter();
        let columns = ColumnLayout::new(&geometry, &config).unwrap();
        let mut flow = PageFlow::new(&fonts, &config, geometry, columns, "");
        // Leave exactly one body line on the page
        let line = config.body_size * crate::font::LINE_HEIGHT_FACTOR;
        let remaining = flow.remaining();
        flow.skip(remaining - line);
        let item = LineItem::new(1, 10.0).with_description(&"word ".repeat(20));
        RowComposer::new(&config, columns, "USD").place(&mut flow, 1, &item);
        let pages = flow.finish();
        assert_eq!(pages.len(), 2);
        assert!(texts(&pages[0], TextRole::ItemIndex).is_empty());
        assert_eq!(texts(&pages[1], TextRole::ItemIndex), vec!["1"]);
    }

    fn assert_within_page(pages: &[Page]) {
        let geometry = PageGeometry::letter();
        for page in pages {
            for command in &page.commands {
                let (top, bottom) = command.vertical_extent();
                assert!(
                    top >= geometry.inset - 1e-9 && bottom <= geometry.content_bottom() + 1e-9,
                    "page {} {:?} spans {top}..{bottom}",
                    page.index,
                    command
                );
            }
        }
    }

    #[test]
    fn starved_titled_body_continues_without_index() {
        let fonts = FontContext::new();
        let config = LayoutConfig::default();
        let geometry = PageGeometry::letter();
        let columns = ColumnLayout::new(&geometry, &config).unwrap();
        let mut flow = PageFlow::new(&fonts, &config, geometry, columns, "");
        // Room for the title line and half a body line
        let line = config.body_size * crate::font::LINE_HEIGHT_FACTOR;
        let remaining = flow.remaining();
        flow.skip(remaining - 1.5 * line);
        let item = LineItem::new(1, 10.0)
            .with_title("Prep")
            .with_description("Sand and fill the hallway walls before priming");
        RowComposer::new(&config, columns, "USD").place(&mut flow, 1, &item);
        let pages = flow.finish();

        assert_eq!(pages.len(), 2);
        assert_eq!(texts(&pages[0], TextRole::ItemIndex), vec!["1"]);
        assert_eq!(texts(&pages[0], TextRole::ItemAmount), vec!["$10.00"]);
        assert_eq!(texts(&pages[0], TextRole::ItemTitle), vec!["Prep"]);
        assert!(texts(&pages[0], TextRole::ItemBody).is_empty());
        assert!(texts(&pages[1], TextRole::ItemIndex).is_empty());
        assert_eq!(
            texts(&pages[1], TextRole::ItemBody),
            vec!["Sand and fill the hallway walls before priming"]
        );
        assert_within_page(&pages);
    }

    #[test]
    fn title_taller_than_page_is_split() {
        let title = "word ".repeat(1500);
        let body = "body ".repeat(40);
        let item = LineItem::new(1, 10.0)
            .with_title(title.trim())
            .with_description(body.trim());
        let pages = place(&[item], 0.0);

        assert!(pages.len() >= 2);
        assert_within_page(&pages);
        let titles: Vec<String> = pages
            .iter()
            .flat_map(|p| texts(p, TextRole::ItemTitle))
            .collect();
        assert_eq!(titles.join(" "), title.trim());
        let bodies: Vec<String> = pages
            .iter()
            .flat_map(|p| texts(p, TextRole::ItemBody))
            .collect();
        assert_eq!(bodies.join(" "), body.trim());
        let indices: Vec<String> = pages
            .iter()
            .flat_map(|p| texts(p, TextRole::ItemIndex))
            .collect();
        assert_eq!(indices, vec!["1"]);
    }

    #[test]
    fn oversized_breakdown_moves_to_next_page() {
        let fonts = FontContext::new();
        let config = LayoutConfig {
            annotation_size: 40.0,
            ..LayoutConfig::default()
        };
        let geometry = PageGeometry::letter();
        let columns = ColumnLayout::new(&geometry, &config).unwrap();
        let mut flow = PageFlow::new(&fonts, &config, geometry, columns, "");
        let remaining = flow.remaining();
        flow.skip(remaining - 20.0);
        RowComposer::new(&config, columns, "USD").place(&mut flow, 1, &LineItem::new(5, 10.0));
        let pages = flow.finish();

        assert_eq!(pages.len(), 2);
        assert_eq!(texts(&pages[0], TextRole::ItemIndex), vec!["1"]);
        assert!(texts(&pages[0], TextRole::UnitBreakdown).is_empty());
        assert_eq!(
            texts(&pages[1], TextRole::UnitBreakdown),
            vec!["5 x $10.00 each"]
        );
        assert_within_page(&pages);
    }
}
