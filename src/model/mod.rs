//! # Invoice Model
//!
//! The input side of the engine: already-resolved snapshots handed over by
//! the surrounding application. Nothing here is fetched, validated against a
//! backend, or looked up dynamically. Branding in particular is a concrete
//! struct, populated once by the caller.

use serde::{Deserialize, Serialize};

use crate::layout::geometry::PageGeometry;
use crate::layout::normalize::{normalize_item, NormalizedItem};
use crate::style::{Color, LayoutConfig};

/// Everything needed to lay out one invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceSnapshot {
    /// Human-facing invoice number, e.g. "INV-0042".
    pub number: String,
    /// ISO 4217 currency code.
    #[serde(default = "default_currency")]
    pub currency: String,
    pub issue_date: String,
    pub due_date: String,
    #[serde(default)]
    pub bill_to: BillTo,
    pub subtotal: f64,
    #[serde(default)]
    pub tax: f64,
    pub total: f64,
    #[serde(default)]
    pub items: Vec<LineItem>,
}

fn default_currency() -> String {
    "USD".to_string()
}

/// The party being invoiced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillTo {
    pub name: String,
    /// Address, email, and similar lines, printed in order.
    #[serde(default)]
    pub lines: Vec<String>,
}

/// One billed line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub quantity: i64,
    pub unit_price: f64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: String,
}

impl LineItem {
    pub fn new(quantity: i64, unit_price: f64) -> Self {
        Self {
            quantity,
            unit_price,
            title: None,
            description: String::new(),
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Quantity used for display math, never below 1.
    pub fn display_quantity(&self) -> i64 {
        self.quantity.max(1)
    }

    /// Unit price used for display math, never negative.
    pub fn display_unit_price(&self) -> f64 {
        if self.unit_price.is_finite() {
            self.unit_price.max(0.0)
        } else {
            0.0
        }
    }

    pub fn amount(&self) -> f64 {
        self.display_quantity() as f64 * self.display_unit_price()
    }

    /// Whether the row gets an "N x price each" annotation.
    pub fn shows_unit_breakdown(&self) -> bool {
        self.display_quantity() > 1 && self.amount() > 0.0
    }

    /// The canonical (title, body) pair. Use this wherever an item's label is
    /// shown so previews and documents agree.
    pub fn normalized(&self) -> NormalizedItem {
        normalize_item(self.title.as_deref(), Some(&self.description))
    }
}

/// Business branding resolved by the application layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandingSnapshot {
    pub business_name: String,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default = "default_accent")]
    pub accent: Color,
    #[serde(default)]
    pub logo: Option<LogoImage>,
}

fn default_accent() -> Color {
    Color::hex("#0969da")
}

impl BrandingSnapshot {
    pub fn new(business_name: &str) -> Self {
        Self {
            business_name: business_name.to_string(),
            tagline: None,
            accent: default_accent(),
            logo: None,
        }
    }
}

/// An already-decoded logo. The engine only reads its pixel dimensions to
/// size it; the bytes are passed through to the canvas untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoImage {
    pub width: u32,
    pub height: u32,
    #[serde(default, skip_serializing)]
    pub data: Vec<u8>,
}

impl LogoImage {
    /// Size in points when scaled to `max_height`, or `None` for an image
    /// with a zero dimension.
    pub fn fitted_size(&self, max_height: f64) -> Option<(f64, f64)> {
        if self.width == 0 || self.height == 0 || max_height <= 0.0 {
            return None;
        }
        let h = max_height.min(self.height as f64);
        let w = h * self.width as f64 / self.height as f64;
        Some((w, h))
    }
}

/// A complete render request, as accepted by [`crate::render_json`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    pub invoice: InvoiceSnapshot,
    pub branding: BrandingSnapshot,
    #[serde(default)]
    pub footer_text: String,
    #[serde(default)]
    pub geometry: PageGeometry,
    #[serde(default)]
    pub config: LayoutConfig,
}
