//! Cleaning and feature derivation
//!
//! [`Preprocessor::clean`] turns a [`RawTable`] into a [`CleanedTable`]:
//!
//! - `price (eur)` and `mileage (kms)` are renamed to `price` and `mileage`
//!   and coerced to numbers; text that does not parse becomes missing
//! - `car_age = reference_year − year`
//! - `price_per_km = price / mileage` (infinite for zero mileage, missing
//!   for `0 / 0`)
//! - `brand_classification` from the [`BrandCatalog`]; rows of unknown
//!   brands are dropped
//! - `log_price = ln(1 + price)`, `log_mileage = ln(1 + mileage)`
//!
//! Row order is preserved and no row is dropped for a missing value.

use crate::{
    brand::BrandCatalog,
    listing::{CleanedListing, CleanedRow, CleanedTable, RawTable, column, raw_column},
};

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum PreprocessError {
    #[display("required column '{column}' not found in input table")]
    MissingColumn { column: &'static str },
}

/// Counters describing one preprocessing run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreprocessSummary {
    pub rows_read: usize,
    pub rows_kept: usize,
    pub dropped_unknown: usize,
    /// Kept rows whose price did not parse.
    pub missing_price: usize,
    pub missing_mileage: usize,
    pub missing_year: usize,
    pub infinite_price_per_km: usize,
}

/// Applies the cleaning rules with an injected brand catalog.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    catalog: BrandCatalog,
    reference_year: i32,
}

struct ColumnIndices {
    brand: usize,
    year: usize,
    price: usize,
    mileage: usize,
}

impl ColumnIndices {
    fn locate(table: &RawTable) -> Result<Self, PreprocessError> {
        let find = |column: &'static str| {
            table
                .column_index(column)
                .ok_or(PreprocessError::MissingColumn { column })
        };
        Ok(Self {
            brand: find(raw_column::BRAND)?,
            year: find(raw_column::YEAR)?,
            price: find(raw_column::PRICE)?,
            mileage: find(raw_column::MILEAGE)?,
        })
    }
}

impl Preprocessor {
    #[must_use]
    pub fn new(catalog: BrandCatalog, reference_year: i32) -> Self {
        Self {
            catalog,
            reference_year,
        }
    }

    /// Cleans `table` and derives the feature columns.
    ///
    /// # Errors
    ///
    /// Returns [`PreprocessError::MissingColumn`] if any of `brand`, `year`,
    /// `price (eur)` or `mileage (kms)` is absent.
    pub fn clean(&self, table: &RawTable) -> Result<CleanedTable, PreprocessError> {
        let indices = ColumnIndices::locate(table)?;

        let mut headers = table
            .headers
            .iter()
            .map(|header| match header.as_str() {
                raw_column::PRICE => column::PRICE.to_owned(),
                raw_column::MILEAGE => column::MILEAGE.to_owned(),
                _ => header.clone(),
            })
            .collect::<Vec<_>>();
        headers.extend(column::DERIVED.iter().map(|&c| c.to_owned()));

        let mut summary = PreprocessSummary {
            rows_read: table.len(),
            ..PreprocessSummary::default()
        };
        let mut rows = Vec::with_capacity(table.len());
        for fields in &table.rows {
            let field = |idx: usize| fields.get(idx).map_or("", String::as_str);
            let brand = field(indices.brand);
            let Some(brand_classification) = self.catalog.classify(brand) else {
                summary.dropped_unknown += 1;
                continue;
            };

            let price = coerce_number(field(indices.price));
            let mileage = coerce_number(field(indices.mileage));
            let year = coerce_number(field(indices.year));
            let listing = CleanedListing {
                brand: brand.to_owned(),
                price,
                mileage,
                car_age: year.map(|y| f64::from(self.reference_year) - y),
                price_per_km: price
                    .zip(mileage)
                    .and_then(|(p, m)| non_nan(p / m)),
                brand_classification,
                log_price: price.and_then(|p| non_nan(p.ln_1p())),
                log_mileage: mileage.and_then(|m| non_nan(m.ln_1p())),
            };

            summary.missing_price += usize::from(listing.price.is_none());
            summary.missing_mileage += usize::from(listing.mileage.is_none());
            summary.missing_year += usize::from(listing.car_age.is_none());
            summary.infinite_price_per_km +=
                usize::from(listing.price_per_km.is_some_and(f64::is_infinite));
            rows.push(CleanedRow {
                fields: fields.clone(),
                listing,
            });
        }
        summary.rows_kept = rows.len();

        Ok(CleanedTable {
            headers,
            rows,
            summary,
            price_index: indices.price,
            mileage_index: indices.mileage,
        })
    }
}

/// Parses a numeric field; anything that is not a number is missing.
///
/// ```
/// use carprice_analysis::preprocess::coerce_number;
///
/// assert_eq!(coerce_number(" 12500 "), Some(12500.0));
/// assert_eq!(coerce_number("1.5e3"), Some(1500.0));
/// assert_eq!(coerce_number("n/a"), None);
/// assert_eq!(coerce_number(""), None);
/// ```
#[must_use]
pub fn coerce_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().and_then(non_nan)
}

fn non_nan(value: f64) -> Option<f64> {
    (!value.is_nan()).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brand::{BrandClass, BrandLists};

    fn raw(rows: &[[&str; 5]]) -> RawTable {
        RawTable {
            headers: ["brand", "model", "year", "price (eur)", "mileage (kms)"]
                .map(String::from)
                .to_vec(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|&f| f.to_owned()).collect())
                .collect(),
        }
    }

    fn preprocessor() -> Preprocessor {
        Preprocessor::new(BrandCatalog::default(), crate::DEFAULT_REFERENCE_YEAR)
    }

    #[test]
    fn test_derived_columns() {
        let table = raw(&[["Audi", "A4", "2019", "24000", "60000"]]);
        let cleaned = preprocessor().clean(&table).unwrap();
        let listing = &cleaned.rows[0].listing;

        assert_eq!(listing.brand_classification, BrandClass::Luxury);
        assert_eq!(listing.car_age, Some(6.0));
        assert_eq!(listing.price_per_km, Some(0.4));
        assert_eq!(listing.log_price, Some(24_000.0_f64.ln_1p()));
        assert_eq!(listing.log_mileage, Some(60_000.0_f64.ln_1p()));
    }

    #[test]
    fn test_headers_renamed_and_extended() {
        let cleaned = preprocessor().clean(&raw(&[])).unwrap();
        assert_eq!(
            cleaned.headers,
            [
                "brand",
                "model",
                "year",
                "price",
                "mileage",
                "car_age",
                "price_per_km",
                "brand_classification",
                "log_price",
                "log_mileage",
            ]
        );
    }

    #[test]
    fn test_unknown_brands_dropped_in_order() {
        let table = raw(&[
            ["Toyota", "Yaris", "2015", "8000", "90000"],
            ["Trabant", "601", "1980", "3000", "150000"],
            ["Porsche", "911", "2021", "95000", "15000"],
            ["toyota", "Corolla", "2016", "9000", "80000"],
        ]);
        let cleaned = preprocessor().clean(&table).unwrap();

        let brands = cleaned
            .listings()
            .map(|l| l.brand.as_str())
            .collect::<Vec<_>>();
        assert_eq!(brands, ["Toyota", "Porsche"]);
        assert_eq!(cleaned.summary.rows_read, 4);
        assert_eq!(cleaned.summary.rows_kept, 2);
        assert_eq!(cleaned.summary.dropped_unknown, 2);
    }

    #[test]
    fn test_non_numeric_becomes_missing() {
        let table = raw(&[["Ford", "Focus", "unknown", "call us", "75000"]]);
        let cleaned = preprocessor().clean(&table).unwrap();
        let listing = &cleaned.rows[0].listing;

        assert_eq!(listing.price, None);
        assert_eq!(listing.car_age, None);
        assert_eq!(listing.price_per_km, None);
        assert_eq!(listing.log_price, None);
        assert_eq!(listing.mileage, Some(75_000.0));
        assert_eq!(cleaned.summary.missing_price, 1);
        assert_eq!(cleaned.summary.missing_year, 1);
        assert_eq!(cleaned.summary.missing_mileage, 0);
    }

    #[test]
    fn test_zero_mileage_price_per_km() {
        let table = raw(&[
            ["Kia", "Ceed", "2024", "21000", "0"],
            ["Kia", "Picanto", "2024", "0", "0"],
        ]);
        let cleaned = preprocessor().clean(&table).unwrap();

        assert_eq!(cleaned.rows[0].listing.price_per_km, Some(f64::INFINITY));
        assert_eq!(cleaned.rows[1].listing.price_per_km, None);
        assert_eq!(cleaned.rows[1].listing.log_mileage, Some(0.0));
        assert_eq!(cleaned.summary.infinite_price_per_km, 1);
    }

    #[test]
    fn test_log_below_minus_one_is_missing() {
        let table = raw(&[["Opel", "Corsa", "2010", "-5", "-1"]]);
        let cleaned = preprocessor().clean(&table).unwrap();
        let listing = &cleaned.rows[0].listing;

        assert_eq!(listing.log_price, None);
        assert_eq!(listing.log_mileage, Some(f64::NEG_INFINITY));
    }

    #[test]
    fn test_missing_column() {
        let mut table = raw(&[]);
        table.headers[4] = "mileage".into();
        let err = preprocessor().clean(&table).unwrap_err();
        assert!(matches!(
            err,
            PreprocessError::MissingColumn {
                column: "mileage (kms)"
            }
        ));
        assert_eq!(
            err.to_string(),
            "required column 'mileage (kms)' not found in input table"
        );
    }

    #[test]
    fn test_records_hold_coerced_values() {
        let table = raw(&[["SEAT", "Ibiza", "2018", " 11000 ", "abc"]]);
        let cleaned = preprocessor().clean(&table).unwrap();
        let records = cleaned.records().collect::<Vec<_>>();
        let log_price = 11_000.0_f64.ln_1p().to_string();

        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0],
            [
                "SEAT",
                "Ibiza",
                "2018",
                "11000",
                "",
                "7",
                "",
                "economy",
                log_price.as_str(),
                "",
            ]
        );
    }

    #[test]
    fn test_custom_reference_year_and_catalog() {
        let lists = BrandLists {
            luxury: vec![],
            performance: vec!["Lada".into()],
            economy: vec![],
        };
        let preprocessor = Preprocessor::new(BrandCatalog::from_lists(&lists), 2000);
        let table = raw(&[
            ["Lada", "Niva", "1990", "900", "200000"],
            ["BMW", "M3", "1995", "5000", "300000"],
        ]);
        let cleaned = preprocessor.clean(&table).unwrap();

        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned.rows[0].listing.car_age, Some(10.0));
        assert_eq!(
            cleaned.rows[0].listing.brand_classification,
            BrandClass::Performance
        );
    }
}
