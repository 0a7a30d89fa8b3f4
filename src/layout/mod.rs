//! # Page-Aware Invoice Layout
//!
//! The invoice is never laid out on an infinite canvas and sliced afterwards.
//! Every block asks "does this fit?" before it is drawn:
//!
//! 1. Open a page with known dimensions and a cursor at the top margin
//! 2. Before placing a block, reserve its height with [`PageFlow::ensure_space`]
//! 3. If it fits, draw it and move the cursor down
//! 4. If it doesn't, finish the page, open the next one, redraw the running
//!    table header, and draw it there
//! 5. Item descriptions that can't fit are split at a word boundary and the
//!    rest continues on the next page
//!
//! The output is a [`PaginatedDocument`]: pages of positioned draw commands,
//! ready for a canvas to turn into PDF bytes or pixels.

pub mod flow;
pub mod geometry;
pub mod normalize;
pub mod row;

use serde::Serialize;

use crate::error::LayoutError;
use crate::model::{BillTo, BrandingSnapshot, InvoiceSnapshot, LogoImage};
use crate::money::format_money;
use crate::style::{Color, FontSpec, LayoutConfig, TextAlign};
use crate::text::{split, TextMeasurer, TextMetrics};

use flow::PageFlow;
use geometry::{ColumnLayout, PageGeometry};
use row::RowComposer;

/// Share of the content width given to the left half of the header blocks.
const LEFT_BLOCK_SHARE: f64 = 0.55;
/// Width of the right-aligned labels in the totals block.
const TOTALS_LABEL_WIDTH: f64 = 120.0;
/// Space between the branding block and the accent stripe under it.
const STRIPE_GAP: f64 = 8.0;
const STRIPE_HEIGHT: f64 = 3.0;
const RULE_HEIGHT: f64 = 1.5;
const RULE_GAP: f64 = 4.0;
const DIVIDER_WIDTH: f64 = 0.75;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// What a text run shows, for renderers that tag structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TextRole {
    BusinessName,
    Tagline,
    DocumentTitle,
    InvoiceMeta,
    BillToLabel,
    BillToName,
    BillToLine,
    TableHeader,
    ContinuationHeader,
    ItemIndex,
    ItemTitle,
    ItemBody,
    ItemAmount,
    UnitBreakdown,
    TotalsLabel,
    TotalsValue,
    FooterNote,
    PageNumber,
}

/// A string drawn word-wrapped inside a box `width` wide whose top-left
/// corner is `(x, y)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRun {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    /// Wrapped height as measured during layout.
    pub height: f64,
    pub font: FontSpec,
    pub align: TextAlign,
    pub color: Color,
    pub role: TextRole,
}

impl TextRun {
    pub fn new(text: impl Into<String>, font: FontSpec, role: TextRole) -> Self {
        Self {
            text: text.into(),
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            font,
            align: TextAlign::Left,
            color: Color::BLACK,
            role,
        }
    }

    pub fn at(mut self, x: f64, y: f64, width: f64) -> Self {
        self.x = x;
        self.y = y;
        self.width = width;
        self
    }

    pub fn align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

/// What to actually draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum DrawCommand {
    Text(TextRun),
    FilledRect {
        rect: Rect,
        color: Color,
    },
    Line {
        from: Point,
        to: Point,
        color: Color,
        width: f64,
    },
    Image {
        rect: Rect,
        image: LogoImage,
    },
}

impl DrawCommand {
    /// Vertical extent `(top, bottom)` of the command on its page.
    pub fn vertical_extent(&self) -> (f64, f64) {
        match self {
            DrawCommand::Text(run) => (run.y, run.y + run.height),
            DrawCommand::FilledRect { rect, .. } | DrawCommand::Image { rect, .. } => {
                (rect.y, rect.y + rect.height)
            }
            DrawCommand::Line { from, to, .. } => (from.y.min(to.y), from.y.max(to.y)),
        }
    }
}

/// One finished page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    /// Zero-based position in the document.
    pub index: usize,
    /// Body content, all within the page's content area.
    pub commands: Vec<DrawCommand>,
    /// Stamps drawn in the reserved footer band.
    pub footer: Vec<DrawCommand>,
}

impl Page {
    pub fn text_runs(&self) -> impl Iterator<Item = &TextRun> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text(run) => Some(run),
            _ => None,
        })
    }
}

/// The engine's only output: fixed-size pages of draw commands.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaginatedDocument {
    pub width: f64,
    pub height: f64,
    pub pages: Vec<Page>,
}

impl PaginatedDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Serialize the laid-out pages for inspection or debugging tools.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Top-level driver: lays out one invoice, block by block.
pub struct DocumentAssembler<'a> {
    measurer: &'a dyn TextMeasurer,
    config: &'a LayoutConfig,
}

impl<'a> DocumentAssembler<'a> {
    pub fn new(measurer: &'a dyn TextMeasurer, config: &'a LayoutConfig) -> Self {
        Self { measurer, config }
    }

    fn height(&self, text: &str, font: &FontSpec, width: f64) -> f64 {
        self.measurer.wrapped_height(text, font, width)
    }

    pub fn assemble(
        &self,
        invoice: &InvoiceSnapshot,
        branding: &BrandingSnapshot,
        footer_text: &str,
        geometry: PageGeometry,
    ) -> Result<PaginatedDocument, LayoutError> {
        geometry.validate()?;
        let columns = ColumnLayout::new(&geometry, self.config)?;
        let mut flow = PageFlow::new(
            self.measurer,
            self.config,
            geometry,
            columns,
            &invoice.number,
        );
        self.check_continuation_room(&flow)?;

        self.draw_branding(&mut flow, invoice, branding);
        self.draw_bill_to(&mut flow, &invoice.bill_to);

        // Keep the table header with at least the first row's first line
        let body_line = self
            .measurer
            .line_height(&self.config.regular(self.config.body_size));
        flow.ensure_space(flow.table_header_height() + body_line);
        flow.draw_table_header();

        let rows = RowComposer::new(self.config, columns, &invoice.currency);
        for (i, item) in invoice.items.iter().enumerate() {
            rows.place(&mut flow, i + 1, item);
        }

        self.draw_totals(&mut flow, invoice, branding);
        self.draw_footer_note(&mut flow, footer_text);

        let mut pages = flow.finish();
        if self.config.page_numbers {
            self.stamp_page_numbers(&mut pages, &geometry);
        }

        log::info!(
            "Laid out invoice {} ({} items) on {} page(s)",
            invoice.number,
            invoice.items.len(),
            pages.len()
        );

        Ok(PaginatedDocument {
            width: geometry.width,
            height: geometry.height,
            pages,
        })
    }

    /// Continuation pages must leave room for more than one body line below
    /// their headers, or a long body could never be placed.
    fn check_continuation_room(&self, flow: &PageFlow<'_>) -> Result<(), LayoutError> {
        let geometry = flow.geometry();
        let body_top = geometry.inset + flow.continuation_header_height();
        let body_line = self
            .measurer
            .line_height(&self.config.regular(self.config.body_size));
        let room = geometry.content_bottom() - body_top;
        if room <= body_line {
            return Err(LayoutError::InvalidGeometry(format!(
                "continuation pages leave {room:.1}pt below the headers, need more than {body_line:.1}pt"
            )));
        }
        Ok(())
    }

    fn draw_branding(
        &self,
        flow: &mut PageFlow<'_>,
        invoice: &InvoiceSnapshot,
        branding: &BrandingSnapshot,
    ) {
        let config = self.config;
        let geometry = *flow.geometry();
        let left = geometry.content_left();
        let left_width = geometry.content_width() * LEFT_BLOCK_SHARE;
        let right_x = left + left_width;
        let right_width = geometry.content_width() - left_width;

        let logo = branding
            .logo
            .as_ref()
            .and_then(|logo| logo.fitted_size(config.logo_max_height).map(|s| (logo, s)));
        let (name_x, logo_height) = match logo {
            Some((_, (w, h))) => (left + w + config.column_gap, h),
            None => (left, 0.0),
        };
        let name_width = (left + left_width - name_x).max(0.0);

        let name_font = config.bold(config.business_name_size);
        let tagline_font = config.regular(config.meta_size);
        let title_font = config.bold(config.heading_size);
        let meta_font = config.regular(config.meta_size);

        let tagline = branding
            .tagline
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty());
        let meta_lines = [
            format!("No. {}", invoice.number),
            format!("Issued {}", invoice.issue_date),
            format!("Due {}", invoice.due_date),
        ];

        let name_height = self.height(&branding.business_name, &name_font, name_width);
        let tagline_height = tagline
            .map(|t| self.height(t, &tagline_font, name_width))
            .unwrap_or(0.0);
        let title_height = self.height("INVOICE", &title_font, right_width);
        let meta_heights: Vec<f64> = meta_lines
            .iter()
            .map(|m| self.height(m, &meta_font, right_width))
            .collect();

        let left_height = logo_height.max(name_height + tagline_height);
        let right_height = title_height + meta_heights.iter().sum::<f64>();
        let block_height = left_height.max(right_height);

        let top = flow.ensure_space(block_height + STRIPE_GAP + STRIPE_HEIGHT);

        if let Some((image, (w, h))) = logo {
            flow.push(DrawCommand::Image {
                rect: Rect {
                    x: left,
                    y: top,
                    width: w,
                    height: h,
                },
                image: image.clone(),
            });
        }
        flow.draw_text(
            TextRun::new(
                branding.business_name.as_str(),
                name_font,
                TextRole::BusinessName,
            )
            .at(name_x, top, name_width)
            .color(config.text_color),
        );
        if let Some(t) = tagline {
            flow.draw_text(
                TextRun::new(t, tagline_font, TextRole::Tagline)
                    .at(name_x, top + name_height, name_width)
                    .color(config.muted_color),
            );
        }

        let mut y = top;
        y += flow.draw_text(
            TextRun::new("INVOICE", title_font, TextRole::DocumentTitle)
                .at(right_x, y, right_width)
                .align(TextAlign::Right)
                .color(branding.accent),
        );
        for line in meta_lines {
            y += flow.draw_text(
                TextRun::new(line, meta_font.clone(), TextRole::InvoiceMeta)
                    .at(right_x, y, right_width)
                    .align(TextAlign::Right)
                    .color(config.muted_color),
            );
        }

        let stripe_y = top + block_height + STRIPE_GAP;
        flow.push(DrawCommand::FilledRect {
            rect: Rect {
                x: left,
                y: stripe_y,
                width: geometry.content_width(),
                height: STRIPE_HEIGHT,
            },
            color: branding.accent,
        });

        flow.skip(block_height + STRIPE_GAP + STRIPE_HEIGHT + config.block_gap);
    }

    fn draw_bill_to(&self, flow: &mut PageFlow<'_>, bill_to: &BillTo) {
        let config = self.config;
        let name = bill_to.name.trim();
        let lines: Vec<&str> = bill_to
            .lines
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect();
        if name.is_empty() && lines.is_empty() {
            return;
        }

        let geometry = *flow.geometry();
        let x = geometry.content_left();
        let width = geometry.content_width() * LEFT_BLOCK_SHARE;
        let label_font = config.bold(config.meta_size);
        let name_font = config.bold(config.body_size);
        let line_font = config.regular(config.meta_size);

        let mut parts = vec![("BILL TO", label_font, TextRole::BillToLabel, config.muted_color)];
        if !name.is_empty() {
            parts.push((name, name_font, TextRole::BillToName, config.text_color));
        }
        for line in lines {
            parts.push((line, line_font.clone(), TextRole::BillToLine, config.text_color));
        }

        let block_height: f64 = parts
            .iter()
            .map(|(text, font, _, _)| self.height(text, font, width))
            .sum();
        let mut y = flow.ensure_space(block_height);
        for (text, font, role, color) in parts {
            y += flow.draw_text(TextRun::new(text, font, role).at(x, y, width).color(color));
        }

        flow.skip(block_height + config.block_gap);
    }

    fn draw_totals(
        &self,
        flow: &mut PageFlow<'_>,
        invoice: &InvoiceSnapshot,
        branding: &BrandingSnapshot,
    ) {
        let config = self.config;
        let geometry = *flow.geometry();
        let amount_col = flow.columns().amount;
        let label_width = TOTALS_LABEL_WIDTH;
        let label_x = amount_col.x - config.column_gap - label_width;
        let regular = config.regular(config.body_size);
        let bold = config.bold(config.total_size);

        let mut rows = vec![("Subtotal", invoice.subtotal)];
        if invoice.tax != 0.0 && invoice.tax.is_finite() {
            rows.push(("Tax", invoice.tax));
        }
        let row_heights: Vec<f64> = rows
            .iter()
            .map(|(label, value)| {
                let value = format_money(*value, &invoice.currency);
                self.height(label, &regular, label_width)
                    .max(self.height(&value, &regular, amount_col.width))
            })
            .collect();
        let total_value = format_money(invoice.total, &invoice.currency);
        let total_height = self
            .height("Total", &bold, label_width)
            .max(self.height(&total_value, &bold, amount_col.width));

        let divider_gap = config.block_gap / 2.0;
        let block_height = divider_gap
            + row_heights.iter().sum::<f64>()
            + RULE_GAP
            + RULE_HEIGHT
            + RULE_GAP
            + total_height;

        let top = flow.ensure_space(block_height);
        flow.push(DrawCommand::Line {
            from: Point {
                x: geometry.content_left(),
                y: top,
            },
            to: Point {
                x: geometry.content_right(),
                y: top,
            },
            color: config.rule_color,
            width: DIVIDER_WIDTH,
        });

        let mut y = top + divider_gap;
        for ((label, value), h) in rows.into_iter().zip(row_heights) {
            self.draw_total_row(flow, label, value, y, regular.clone(), invoice, label_x);
            y += h;
        }

        y += RULE_GAP;
        flow.push(DrawCommand::FilledRect {
            rect: Rect {
                x: label_x,
                y,
                width: amount_col.right() - label_x,
                height: RULE_HEIGHT,
            },
            color: branding.accent,
        });
        y += RULE_HEIGHT + RULE_GAP;
        self.draw_total_row(flow, "Total", invoice.total, y, bold, invoice, label_x);

        flow.skip(block_height);
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_total_row(
        &self,
        flow: &mut PageFlow<'_>,
        label: &str,
        value: f64,
        y: f64,
        font: FontSpec,
        invoice: &InvoiceSnapshot,
        label_x: f64,
    ) {
        let config = self.config;
        let amount_col = flow.columns().amount;
        flow.draw_text(
            TextRun::new(label, font.clone(), TextRole::TotalsLabel)
                .at(label_x, y, TOTALS_LABEL_WIDTH)
                .align(TextAlign::Right)
                .color(config.muted_color),
        );
        flow.draw_text(
            TextRun::new(
                format_money(value, &invoice.currency),
                font,
                TextRole::TotalsValue,
            )
            .at(amount_col.x, y, amount_col.width)
            .align(TextAlign::Right)
            .color(config.text_color),
        );
    }

    /// The footer note flows like an item body: whatever does not fit on the
    /// page continues on the next.
    fn draw_footer_note(&self, flow: &mut PageFlow<'_>, footer_text: &str) {
        let text = footer_text.trim();
        if text.is_empty() {
            return;
        }

        let config = self.config;
        let geometry = *flow.geometry();
        let metrics = TextMetrics::new(
            self.measurer,
            config.regular(config.footer_size),
            geometry.content_width(),
        );
        let line = metrics.line_height();

        let gap = config.block_gap;
        flow.ensure_space(gap + metrics.height(text).min(line));
        flow.skip(gap);

        let mut rest = Some(text.to_string());
        while let Some(text) = rest.take() {
            if flow.remaining() < line {
                flow.start_new_page();
            }
            let piece = split(&metrics, &text, flow.remaining());
            let y = flow.y();
            let h = flow.draw_text(
                TextRun::new(piece.fitting, metrics.font().clone(), TextRole::FooterNote)
                    .at(geometry.content_left(), y, geometry.content_width())
                    .color(config.muted_color),
            );
            flow.skip(h);
            rest = piece.remainder;
            if rest.is_some() {
                flow.start_new_page();
            }
        }
    }

    fn stamp_page_numbers(&self, pages: &mut [Page], geometry: &PageGeometry) {
        let config = self.config;
        let font = config.regular(config.annotation_size);
        let line = self.measurer.line_height(&font);
        let y = geometry.content_bottom() + ((geometry.footer_reserve - line) / 2.0).max(0.0);
        let total = pages.len();

        for page in pages.iter_mut() {
            let label = format!("Page {} of {}", page.index + 1, total);
            let height = self.height(&label, &font, geometry.content_width());
            page.footer.push(DrawCommand::Text(TextRun {
                height,
                ..TextRun::new(label, font.clone(), TextRole::PageNumber)
                    .at(geometry.content_left(), y, geometry.content_width())
                    .align(TextAlign::Right)
                    .color(config.muted_color)
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FontContext;
    use crate::model::LineItem;

    fn invoice(items: Vec<LineItem>) -> InvoiceSnapshot {
        InvoiceSnapshot {
            number: "INV-0042".to_string(),
            currency: "USD".to_string(),
            issue_date: "2026-03-01".to_string(),
            due_date: "2026-03-31".to_string(),
            bill_to: BillTo {
                name: "Widget Industries".to_string(),
                lines: vec!["42 Harbor Rd".to_string(), "ap@widget.test".to_string()],
            },
            subtotal: 50.0,
            tax: 0.0,
            total: 50.0,
            items,
        }
    }

    fn assemble(invoice: &InvoiceSnapshot, footer: &str) -> PaginatedDocument {
        let fonts = FontContext::new();
        let config = LayoutConfig::default();
        DocumentAssembler::new(&fonts, &config)
            .assemble(
                invoice,
                &BrandingSnapshot::new("Acme Painting"),
                footer,
                PageGeometry::letter(),
            )
            .unwrap()
    }

    fn roles(page: &Page) -> Vec<TextRole> {
        page.text_runs().map(|r| r.role).collect()
    }

    #[test]
    fn blocks_are_drawn_in_order() {
        let doc = assemble(
            &invoice(vec![LineItem::new(1, 50.0).with_title("Paint")]),
            "Thanks for your business",
        );
        assert_eq!(doc.page_count(), 1);
        let roles = roles(&doc.pages[0]);
        let pos = |role| roles.iter().position(|r| *r == role).unwrap();
        assert!(pos(TextRole::BusinessName) < pos(TextRole::BillToLabel));
        assert!(pos(TextRole::BillToLabel) < pos(TextRole::TableHeader));
        assert!(pos(TextRole::TableHeader) < pos(TextRole::ItemIndex));
        assert!(pos(TextRole::ItemIndex) < pos(TextRole::TotalsLabel));
        assert!(pos(TextRole::TotalsLabel) < pos(TextRole::FooterNote));
    }

    #[test]
    fn empty_bill_to_is_skipped() {
        let mut inv = invoice(vec![]);
        inv.bill_to = BillTo::default();
        let doc = assemble(&inv, "");
        assert!(!roles(&doc.pages[0]).contains(&TextRole::BillToLabel));
        assert!(!roles(&doc.pages[0]).contains(&TextRole::FooterNote));
    }

    #[test]
    fn long_bill_to_spills_onto_a_plain_page() {
        let mut inv = invoice(vec![LineItem::new(1, 50.0).with_title("Paint")]);
        inv.bill_to.lines = (1..=56).map(|i| format!("Address line {i}")).collect();
        let doc = assemble(&inv, "");
        assert!(doc.page_count() >= 2);

        let count = |page: &Page, role| roles(page).iter().filter(|r| **r == role).count();
        let first = &doc.pages[0];
        assert_eq!(count(first, TextRole::BusinessName), 1);
        assert_eq!(count(first, TextRole::BillToLine), 0);
        assert_eq!(count(first, TextRole::TableHeader), 0);

        // Bill-to, one table header, and the row; no continuation band
        let second = &doc.pages[1];
        assert_eq!(roles(second)[0], TextRole::BillToLabel);
        assert_eq!(count(second, TextRole::BillToLine), 56);
        assert_eq!(count(second, TextRole::ContinuationHeader), 0);
        assert_eq!(count(second, TextRole::TableHeader), 3);
        assert_eq!(count(second, TextRole::ItemIndex), 1);
    }

    #[test]
    fn rows_after_the_table_starts_get_continuation_headers() {
        let items = (1..=80)
            .map(|i| LineItem::new(1, 1.0).with_title(&format!("Line {i}")))
            .collect();
        let doc = assemble(&invoice(items), "");
        assert!(doc.page_count() >= 2);
        for page in &doc.pages[1..] {
            let roles = roles(page);
            assert_eq!(roles[0], TextRole::ContinuationHeader);
            assert_eq!(
                roles.iter().filter(|r| **r == TextRole::TableHeader).count(),
                3
            );
        }
    }

    #[test]
    fn page_numbers_live_in_footer_band() {
        let doc = assemble(&invoice(vec![]), "");
        let page = &doc.pages[0];
        assert_eq!(page.footer.len(), 1);
        let DrawCommand::Text(stamp) = &page.footer[0] else {
            panic!("expected a text stamp");
        };
        assert_eq!(stamp.text, "Page 1 of 1");
        assert!(stamp.y >= PageGeometry::letter().content_bottom());
        assert!(stamp.y + stamp.height <= 792.0 - 36.0 + 1e-9);
    }

    #[test]
    fn long_footer_note_flows_to_next_page() {
        let note = "Payment is due within thirty days of the invoice date. ".repeat(150);
        let doc = assemble(&invoice(vec![]), &note);
        assert!(doc.page_count() >= 2);
        let pieces: Vec<String> = doc
            .pages
            .iter()
            .flat_map(|p| p.text_runs())
            .filter(|r| r.role == TextRole::FooterNote)
            .map(|r| r.text.clone())
            .collect();
        assert_eq!(pieces.join(" "), note.trim());
    }

    #[test]
    fn squashed_continuation_pages_are_rejected() {
        let fonts = FontContext::new();
        let config = LayoutConfig::default();
        let geometry = PageGeometry {
            width: 612.0,
            height: 90.0,
            inset: 20.0,
            footer_reserve: 10.0,
        };
        let err = DocumentAssembler::new(&fonts, &config)
            .assemble(
                &invoice(vec![]),
                &BrandingSnapshot::new("Acme"),
                "",
                geometry,
            )
            .unwrap_err();
        assert!(matches!(err, LayoutError::InvalidGeometry(_)));
    }
}
