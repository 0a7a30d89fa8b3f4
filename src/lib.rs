//! # Invoice Pager
//!
//! A page-native layout engine for invoices.
//!
//! An invoice is laid out directly onto fixed-size pages. Every block, every
//! item row, and every piece of item description is placed with the page
//! boundary as a hard constraint. Rows that don't fit move to the next page;
//! long descriptions are split at a word boundary and continue there, under a
//! repeated table header.
//!
//! ## Architecture
//!
//! ```text
//! Input (snapshots or JSON)
//!       ↓
//!   [model]    Invoice, branding, line items
//!       ↓
//!   [text]     Measure and split wrapped text
//!       ↓
//!   [layout]   Page-aware placement into draw commands
//!       ↓
//!   [canvas]   Replay onto a rendering backend
//! ```

pub mod canvas;
pub mod error;
pub mod font;
pub mod layout;
pub mod model;
pub mod money;
pub mod style;
pub mod text;

pub use canvas::Canvas;
pub use error::LayoutError;
pub use font::FontContext;
pub use layout::geometry::PageGeometry;
pub use layout::{DocumentAssembler, DrawCommand, Page, PaginatedDocument, TextRole, TextRun};
pub use model::{BillTo, BrandingSnapshot, InvoiceSnapshot, LineItem, LogoImage, RenderRequest};
pub use style::LayoutConfig;
pub use text::TextMeasurer;

/// Lay out an invoice with the built-in font metrics and default styling.
pub fn render(
    invoice: &InvoiceSnapshot,
    branding: &BrandingSnapshot,
    footer_text: &str,
    geometry: PageGeometry,
) -> Result<PaginatedDocument, LayoutError> {
    let font_context = FontContext::new();
    let config = LayoutConfig::default();
    render_with(invoice, branding, footer_text, geometry, &config, &font_context)
}

/// Lay out an invoice with a caller-supplied configuration and measurer.
pub fn render_with(
    invoice: &InvoiceSnapshot,
    branding: &BrandingSnapshot,
    footer_text: &str,
    geometry: PageGeometry,
    config: &LayoutConfig,
    measurer: &dyn TextMeasurer,
) -> Result<PaginatedDocument, LayoutError> {
    DocumentAssembler::new(measurer, config).assemble(invoice, branding, footer_text, geometry)
}

/// Lay out an invoice described as a JSON [`RenderRequest`].
pub fn render_json(json: &str) -> Result<PaginatedDocument, LayoutError> {
    let request: RenderRequest = serde_json::from_str(json)?;
    let font_context = FontContext::new();
    render_with(
        &request.invoice,
        &request.branding,
        &request.footer_text,
        request.geometry,
        &request.config,
        &font_context,
    )
}
