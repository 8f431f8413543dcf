//! Listing tables
//!
//! Two representations of the used-car data flow through the pipeline:
//!
//! ```text
//! RawTable                          (as read from the source file)
//! ├─ headers: brand, year, price (eur), mileage (kms), ...
//! └─ rows: Vec<Vec<String>>
//!         │ preprocess
//!         ▼
//! CleanedTable                      (written to the cleaned file)
//! ├─ headers: raw headers (price, mileage renamed) + derived columns
//! └─ rows: Vec<CleanedRow>
//!     ├─ fields: raw text of every source column
//!     └─ listing: CleanedListing    (typed, coerced values)
//! ```
//!
//! The analysis stage reads the cleaned file back as [`CleanedListing`]
//! records through `serde`; columns it does not know about are ignored.
//!
//! Missing values are `None`. In the cleaned file they are written as empty
//! fields, and infinite values as `inf` / `-inf`.

use serde::{Deserialize, Serialize};

use crate::{brand::BrandClass, preprocess::PreprocessSummary};

/// Column names of the source table.
pub mod raw_column {
    pub const BRAND: &str = "brand";
    pub const YEAR: &str = "year";
    pub const PRICE: &str = "price (eur)";
    pub const MILEAGE: &str = "mileage (kms)";
}

/// Column names of the cleaned table.
pub mod column {
    pub const BRAND: &str = "brand";
    pub const PRICE: &str = "price";
    pub const MILEAGE: &str = "mileage";
    pub const CAR_AGE: &str = "car_age";
    pub const PRICE_PER_KM: &str = "price_per_km";
    pub const BRAND_CLASSIFICATION: &str = "brand_classification";
    pub const LOG_PRICE: &str = "log_price";
    pub const LOG_MILEAGE: &str = "log_mileage";

    /// Derived columns, in the order they are appended.
    pub const DERIVED: [&str; 5] = [
        CAR_AGE,
        PRICE_PER_KM,
        BRAND_CLASSIFICATION,
        LOG_PRICE,
        LOG_MILEAGE,
    ];
}

/// Untyped table with named columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Index of the column named `name`.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One cleaned listing with its derived attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanedListing {
    pub brand: String,
    pub price: Option<f64>,
    pub mileage: Option<f64>,
    pub car_age: Option<f64>,
    pub price_per_km: Option<f64>,
    pub brand_classification: BrandClass,
    pub log_price: Option<f64>,
    pub log_mileage: Option<f64>,
}

impl CleanedListing {
    /// Values of the derived columns formatted for the cleaned file, in
    /// [`column::DERIVED`] order.
    #[must_use]
    pub fn derived_fields(&self) -> [String; 5] {
        [
            format_value(self.car_age),
            format_value(self.price_per_km),
            self.brand_classification.as_str().to_owned(),
            format_value(self.log_price),
            format_value(self.log_mileage),
        ]
    }
}

/// A cleaned row: the source fields plus the typed listing derived from them.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedRow {
    pub fields: Vec<String>,
    pub listing: CleanedListing,
}

/// Result of preprocessing, ready to be written out.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedTable {
    /// Source headers followed by [`column::DERIVED`].
    pub headers: Vec<String>,
    pub rows: Vec<CleanedRow>,
    pub summary: PreprocessSummary,
    pub(crate) price_index: usize,
    pub(crate) mileage_index: usize,
}

impl CleanedTable {
    /// Output records, one per row, aligned with [`CleanedTable::headers`].
    ///
    /// The price and mileage columns hold the coerced numbers rather than the
    /// source text.
    pub fn records(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        self.rows.iter().map(|row| {
            let mut record = row
                .fields
                .iter()
                .enumerate()
                .map(|(idx, field)| {
                    if idx == self.price_index {
                        format_value(row.listing.price)
                    } else if idx == self.mileage_index {
                        format_value(row.listing.mileage)
                    } else {
                        field.clone()
                    }
                })
                .collect::<Vec<_>>();
            record.extend(row.listing.derived_fields());
            record
        })
    }

    /// Typed listings in row order.
    pub fn listings(&self) -> impl Iterator<Item = &CleanedListing> + '_ {
        self.rows.iter().map(|row| &row.listing)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Formats an optional number for the cleaned file: empty when missing.
#[must_use]
pub fn format_value(value: Option<f64>) -> String {
    value.map_or_else(String::new, |v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(None), "");
        assert_eq!(format_value(Some(25_000.0)), "25000");
        assert_eq!(format_value(Some(0.5)), "0.5");
        assert_eq!(format_value(Some(f64::INFINITY)), "inf");
        assert_eq!("inf".parse::<f64>().unwrap(), f64::INFINITY);
    }

    #[test]
    fn test_column_index() {
        let table = RawTable {
            headers: vec!["brand".into(), "year".into()],
            rows: vec![],
        };
        assert_eq!(table.column_index("year"), Some(1));
        assert_eq!(table.column_index("Year"), None);
        assert!(table.is_empty());
    }
}
