//! CSV input and output for listing tables.

use std::path::{Path, PathBuf};

use crate::listing::{CleanedListing, CleanedTable, RawTable};

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum LoadError {
    #[display("failed to read CSV file {}", path.display())]
    Read {
        path: PathBuf,
        source: csv::Error,
    },
    #[display("malformed record {record} in {}", path.display())]
    Record {
        path: PathBuf,
        record: usize,
        source: csv::Error,
    },
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("failed to write CSV file {}", path.display())]
pub struct SaveError {
    path: PathBuf,
    source: csv::Error,
}

/// Reads a CSV file with a header row as untyped text.
///
/// # Errors
///
/// Returns [`LoadError`] if the file cannot be opened or a record is
/// malformed (for example, has the wrong number of fields).
pub fn read_raw_table(path: &Path) -> Result<RawTable, LoadError> {
    let read_error = |source| LoadError::Read {
        path: path.to_owned(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(read_error)?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(read_error)?
        .iter()
        .map(str::to_owned)
        .collect();

    let rows = reader
        .records()
        .enumerate()
        .map(|(idx, record)| {
            record
                .map(|record| record.iter().map(str::to_owned).collect::<Vec<_>>())
                .map_err(|source| LoadError::Record {
                    path: path.to_owned(),
                    record: idx + 1,
                    source,
                })
        })
        .collect::<Result<Vec<Vec<String>>, _>>()?;

    Ok(RawTable { headers, rows })
}

/// Reads the typed listings of a cleaned table.
///
/// Columns other than the ones [`CleanedListing`] names are ignored.
///
/// # Errors
///
/// Returns [`LoadError`] if the file cannot be opened or a record does not
/// deserialize, such as an unknown brand classification.
pub fn read_cleaned_listings(path: &Path) -> Result<Vec<CleanedListing>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|source| LoadError::Read {
            path: path.to_owned(),
            source,
        })?;

    reader
        .deserialize::<CleanedListing>()
        .enumerate()
        .map(|(idx, record)| {
            record.map_err(|source| LoadError::Record {
                path: path.to_owned(),
                record: idx + 1,
                source,
            })
        })
        .collect()
}

/// Writes a cleaned table, replacing any existing file.
///
/// # Errors
///
/// Returns [`SaveError`] if the file cannot be created or written.
pub fn write_cleaned_table(path: &Path, table: &CleanedTable) -> Result<(), SaveError> {
    let save_error = |source| SaveError {
        path: path.to_owned(),
        source,
    };
    let mut writer = csv::Writer::from_path(path).map_err(save_error)?;
    writer.write_record(&table.headers).map_err(save_error)?;
    for record in table.records() {
        writer.write_record(&record).map_err(save_error)?;
    }
    writer
        .flush()
        .map_err(|err| save_error(csv::Error::from(err)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::{
        brand::{BrandCatalog, BrandClass},
        preprocess::Preprocessor,
    };

    const RAW: &str = "\
brand,model,year,price (eur),mileage (kms)
BMW,320d,2018,21500,98000
Dacia,Sandero,2019,7000,60000
Tesla,Model 3,2022,38000,0
Ford,Fiesta,2014,,120000
";

    #[test]
    fn test_raw_table_roundtrip_through_cleaning() {
        let dir = tempfile::tempdir().unwrap();
        let raw_path = dir.path().join("used_cars_data.csv");
        let cleaned_path = dir.path().join("processed_used_cars.csv");
        fs::write(&raw_path, RAW).unwrap();

        let raw = read_raw_table(&raw_path).unwrap();
        assert_eq!(raw.headers.len(), 5);
        assert_eq!(raw.len(), 4);

        let cleaned = Preprocessor::new(BrandCatalog::default(), 2025)
            .clean(&raw)
            .unwrap();
        write_cleaned_table(&cleaned_path, &cleaned).unwrap();

        let text = fs::read_to_string(&cleaned_path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some(
                "brand,model,year,price,mileage,car_age,price_per_km,\
                 brand_classification,log_price,log_mileage"
            )
        );
        assert!(text.contains(",inf,performance,"));

        let listings = read_cleaned_listings(&cleaned_path).unwrap();
        assert_eq!(listings.len(), 3);
        assert_eq!(listings, cleaned.listings().cloned().collect::<Vec<_>>());

        let tesla = &listings[1];
        assert_eq!(tesla.brand_classification, BrandClass::Performance);
        assert_eq!(tesla.price_per_km, Some(f64::INFINITY));
        let ford = &listings[2];
        assert_eq!(ford.price, None);
        assert_eq!(ford.log_price, None);
        assert_eq!(ford.car_age, Some(11.0));
    }

    #[test]
    fn test_write_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        fs::write(&path, "stale content that is much longer than the new one\n".repeat(50))
            .unwrap();

        let raw = RawTable {
            headers: ["brand", "year", "price (eur)", "mileage (kms)"]
                .map(String::from)
                .to_vec(),
            rows: vec![],
        };
        let cleaned = Preprocessor::new(BrandCatalog::default(), 2025)
            .clean(&raw)
            .unwrap();
        write_cleaned_table(&path, &cleaned).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_raw_table(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Read { .. }));
    }

    #[test]
    fn test_unknown_classification_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("processed.csv");
        fs::write(
            &path,
            "brand,price,mileage,car_age,price_per_km,brand_classification,log_price,log_mileage\n\
             Skoda,1,1,1,1,budget,1,1\n",
        )
        .unwrap();

        let err = read_cleaned_listings(&path).unwrap_err();
        assert!(matches!(err, LoadError::Record { record: 1, .. }));
    }
}
