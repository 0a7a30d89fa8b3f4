//! Page geometry and the three-column item table.

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;
use crate::style::LayoutConfig;

/// Fixed page size with a uniform margin and a reserved footer band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
    /// Uniform margin on all four sides.
    pub inset: f64,
    /// Height kept free above the bottom margin for page stamps.
    pub footer_reserve: f64,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::letter()
    }
}

impl PageGeometry {
    /// US Letter, 0.5 inch margin.
    pub fn letter() -> Self {
        Self {
            width: 612.0,
            height: 792.0,
            inset: 36.0,
            footer_reserve: 24.0,
        }
    }

    /// ISO A4, 0.5 inch margin.
    pub fn a4() -> Self {
        Self {
            width: 595.28,
            height: 841.89,
            ..Self::letter()
        }
    }

    /// Lowest y any body content may reach.
    pub fn content_bottom(&self) -> f64 {
        self.height - self.inset - self.footer_reserve
    }

    pub fn content_width(&self) -> f64 {
        self.width - 2.0 * self.inset
    }

    pub fn content_left(&self) -> f64 {
        self.inset
    }

    pub fn content_right(&self) -> f64 {
        self.width - self.inset
    }

    /// Reject geometry that leaves no room to lay anything out.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let dims = [self.width, self.height, self.inset, self.footer_reserve];
        if dims.iter().any(|v| !v.is_finite()) {
            return Err(LayoutError::InvalidGeometry(format!(
                "dimensions must be finite, got {self:?}"
            )));
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(LayoutError::InvalidGeometry(format!(
                "page size {}x{} must be positive",
                self.width, self.height
            )));
        }
        if self.inset < 0.0 || self.footer_reserve < 0.0 {
            return Err(LayoutError::InvalidGeometry(format!(
                "inset {} and footer reserve {} must not be negative",
                self.inset, self.footer_reserve
            )));
        }
        if self.content_bottom() <= self.inset {
            return Err(LayoutError::InvalidGeometry(format!(
                "content bottom {} must lie below the inset {}",
                self.content_bottom(),
                self.inset
            )));
        }
        if self.content_width() <= 0.0 {
            return Err(LayoutError::InvalidGeometry(format!(
                "inset {} leaves no content width on a {}pt wide page",
                self.inset, self.width
            )));
        }
        Ok(())
    }
}

/// One column: x-origin and width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Column {
    pub x: f64,
    pub width: f64,
}

impl Column {
    pub fn right(&self) -> f64 {
        self.x + self.width
    }
}

/// Index, description, and amount columns, computed once per render.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColumnLayout {
    pub index: Column,
    pub description: Column,
    pub amount: Column,
}

impl ColumnLayout {
    /// The description column takes whatever the fixed-width columns and
    /// gaps leave over.
    pub fn new(geometry: &PageGeometry, config: &LayoutConfig) -> Result<Self, LayoutError> {
        let fixed = [
            config.index_column_width,
            config.amount_column_width,
            config.column_gap,
        ];
        if fixed.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(LayoutError::InvalidColumns(format!(
                "column widths and gap must be non-negative, got index {} amount {} gap {}",
                config.index_column_width, config.amount_column_width, config.column_gap
            )));
        }

        let content_width = geometry.content_width();
        let description_width = content_width
            - config.index_column_width
            - config.amount_column_width
            - 2.0 * config.column_gap;
        if description_width <= 0.0 {
            return Err(LayoutError::InvalidColumns(format!(
                "index {} + amount {} + gaps {} leave no description width in {}",
                config.index_column_width,
                config.amount_column_width,
                2.0 * config.column_gap,
                content_width
            )));
        }

        let left = geometry.content_left();
        let index = Column {
            x: left,
            width: config.index_column_width,
        };
        let description = Column {
            x: index.right() + config.column_gap,
            width: description_width,
        };
        let amount = Column {
            x: geometry.content_right() - config.amount_column_width,
            width: config.amount_column_width,
        };

        Ok(Self {
            index,
            description,
            amount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letter_content_area() {
        let g = PageGeometry::letter();
        assert_eq!(g.content_bottom(), 792.0 - 36.0 - 24.0);
        assert_eq!(g.content_width(), 540.0);
        assert!(g.validate().is_ok());
        assert!(PageGeometry::a4().validate().is_ok());
    }

    #[test]
    fn degenerate_geometry_is_rejected() {
        let squashed = PageGeometry {
            height: 80.0,
            ..PageGeometry::letter()
        };
        assert!(matches!(
            squashed.validate(),
            Err(LayoutError::InvalidGeometry(_))
        ));

        let zero = PageGeometry {
            width: 0.0,
            ..PageGeometry::letter()
        };
        assert!(zero.validate().is_err());

        let nan = PageGeometry {
            inset: f64::NAN,
            ..PageGeometry::letter()
        };
        assert!(nan.validate().is_err());

        let negative = PageGeometry {
            footer_reserve: -1.0,
            ..PageGeometry::letter()
        };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn columns_fill_content_width() {
        let g = PageGeometry::letter();
        let config = LayoutConfig::default();
        let cols = ColumnLayout::new(&g, &config).unwrap();
        assert_eq!(cols.index.x, 36.0);
        assert_eq!(cols.amount.right(), 576.0);
        let total = cols.index.width
            + cols.description.width
            + cols.amount.width
            + 2.0 * config.column_gap;
        assert!((total - g.content_width()).abs() < 1e-9);
        assert!((cols.description.right() + config.column_gap - cols.amount.x).abs() < 1e-9);
    }

    #[test]
    fn oversized_columns_are_rejected() {
        let config = LayoutConfig {
            amount_column_width: 600.0,
            ..LayoutConfig::default()
        };
        let err = ColumnLayout::new(&PageGeometry::letter(), &config).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidColumns(_)));
    }
}
