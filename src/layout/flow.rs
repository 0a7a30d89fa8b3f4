//! # Page Flow
//!
//! The pagination state machine. Tracks the vertical cursor on the open
//! page, decides when a placement needs a fresh page, and owns the list of
//! finished pages.
//!
//! Once the item table has started, every new page opens with a short
//! "continued" header and the same three-column table header, so rows that
//! resume on a new page are never orphaned from their column labels. Blocks
//! that spill over before the table starts get a plain page.

use super::geometry::{ColumnLayout, PageGeometry};
use super::{DrawCommand, Page, Rect, TextRole, TextRun};
use crate::style::{LayoutConfig, TextAlign};
use crate::text::TextMeasurer;

pub struct PageFlow<'a> {
    measurer: &'a dyn TextMeasurer,
    config: &'a LayoutConfig,
    geometry: PageGeometry,
    columns: ColumnLayout,
    /// Printed opposite the continuation label, e.g. the invoice number.
    continuation_meta: String,
    y: f64,
    /// Cursor position right after the page's fixed headers.
    page_top: f64,
    /// Set by the first table header; later pages repeat the headers.
    table_started: bool,
    commands: Vec<DrawCommand>,
    pages: Vec<Page>,
}

impl<'a> PageFlow<'a> {
    /// Open the first page with the cursor at the inset.
    pub fn new(
        measurer: &'a dyn TextMeasurer,
        config: &'a LayoutConfig,
        geometry: PageGeometry,
        columns: ColumnLayout,
        continuation_meta: &str,
    ) -> Self {
        Self {
            measurer,
            config,
            geometry,
            columns,
            continuation_meta: continuation_meta.to_string(),
            y: geometry.inset,
            page_top: geometry.inset,
            table_started: false,
            commands: Vec::new(),
            pages: Vec::new(),
        }
    }

    pub fn measurer(&self) -> &'a dyn TextMeasurer {
        self.measurer
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn columns(&self) -> &ColumnLayout {
        &self.columns
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn content_bottom(&self) -> f64 {
        self.geometry.content_bottom()
    }

    pub fn remaining(&self) -> f64 {
        self.content_bottom() - self.y
    }

    /// Zero-based index of the open page.
    pub fn page_index(&self) -> usize {
        self.pages.len()
    }

    /// Nothing has been placed below the page's fixed headers yet.
    pub fn at_page_top(&self) -> bool {
        self.y <= self.page_top
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    /// Measure `run` at its width, record the height, and draw it. Returns
    /// the height.
    pub fn draw_text(&mut self, mut run: TextRun) -> f64 {
        run.height = self
            .measurer
            .wrapped_height(&run.text, &run.font, run.width);
        let height = run.height;
        self.commands.push(DrawCommand::Text(run));
        height
    }

    /// Make sure `required` points fit below the cursor, breaking to a new
    /// page if they don't. Returns the cursor to draw at.
    ///
    /// A page with nothing below its headers is never abandoned: a block
    /// taller than a whole page is placed where it is.
    pub fn ensure_space(&mut self, required: f64) -> f64 {
        if self.y + required > self.content_bottom() {
            if self.at_page_top() {
                log::debug!(
                    "Block of {required:.1}pt exceeds the usable height of page {}; placing anyway",
                    self.page_index() + 1
                );
            } else {
                self.start_new_page();
            }
        }
        self.y
    }

    /// Move the cursor down past a row, plus the row padding.
    pub fn advance(&mut self, consumed: f64) {
        self.y += consumed + self.config.row_padding;
    }

    /// Move the cursor down without row padding.
    pub fn skip(&mut self, height: f64) {
        self.y += height;
    }

    /// Whether the item table header has been drawn yet.
    pub fn table_started(&self) -> bool {
        self.table_started
    }

    /// Close the open page and start the next one, with the continuation
    /// headers once the table has started.
    pub fn start_new_page(&mut self) {
        let finished = Page {
            index: self.pages.len(),
            commands: std::mem::take(&mut self.commands),
            footer: Vec::new(),
        };
        log::debug!(
            "Page break after page {} ({} commands, cursor at {:.1})",
            finished.index + 1,
            finished.commands.len(),
            self.y
        );
        self.pages.push(finished);

        self.y = self.geometry.inset;
        if self.table_started {
            self.draw_continuation_header();
            self.draw_table_header();
        }
        self.page_top = self.y;
    }

    fn continuation_label_height(&self) -> f64 {
        let font = self.config.bold(self.config.meta_size);
        self.measurer.line_height(&font) + self.config.block_gap / 2.0
    }

    pub fn table_header_height(&self) -> f64 {
        let font = self.config.bold(self.config.table_header_size);
        self.measurer.line_height(&font) + 2.0 * self.config.table_header_padding
    }

    /// Height of the fixed headers on every continuation page.
    pub fn continuation_header_height(&self) -> f64 {
        self.continuation_label_height() + self.table_header_height()
    }

    fn draw_continuation_header(&mut self) {
        let config = self.config;
        let x = self.geometry.content_left();
        let width = self.geometry.content_width();
        let y = self.y;

        self.draw_text(
            TextRun::new(
                config.continuation_label.as_str(),
                config.bold(config.meta_size),
                TextRole::ContinuationHeader,
            )
            .at(x, y, width)
            .color(config.text_color),
        );
        if !self.continuation_meta.is_empty() {
            self.draw_text(
                TextRun::new(
                    self.continuation_meta.as_str(),
                    config.regular(config.meta_size),
                    TextRole::InvoiceMeta,
                )
                .at(x, y, width)
                .align(TextAlign::Right)
                .color(config.muted_color),
            );
        }

        self.y += self.continuation_label_height();
    }

    /// Draw the shaded "# / Description / Amount" band at the cursor.
    pub fn draw_table_header(&mut self) {
        let config = self.config;
        let height = self.table_header_height();
        let y = self.y;
        let text_y = y + config.table_header_padding;
        let font = config.bold(config.table_header_size);
        let cols = self.columns;

        self.push(DrawCommand::FilledRect {
            rect: Rect {
                x: self.geometry.content_left(),
                y,
                width: self.geometry.content_width(),
                height,
            },
            color: config.header_fill,
        });

        let labels = [
            ("#", cols.index, TextAlign::Left),
            ("Description", cols.description, TextAlign::Left),
            ("Amount", cols.amount, TextAlign::Right),
        ];
        for (label, col, align) in labels {
            self.draw_text(
                TextRun::new(label, font.clone(), TextRole::TableHeader)
                    .at(col.x, text_y, col.width)
                    .align(align)
                    .color(config.muted_color),
            );
        }

        self.y += height;
        self.table_started = true;
    }

    /// Close the open page and hand back every page in order.
    pub fn finish(mut self) -> Vec<Page> {
        let last = Page {
            index: self.pages.len(),
            commands: std::mem::take(&mut self.commands),
            footer: Vec::new(),
        };
        self.pages.push(last);
        self.pages
    }
}
