//! Brand classification
//!
//! Every listing's `brand` is mapped to a [`BrandClass`] through a
//! [`BrandCatalog`]. The catalog is an immutable lookup table built once from
//! three brand lists and passed to whoever needs it.
//!
//! Matching is exact and case-sensitive. A brand that appears in no list is
//! unknown and [`BrandCatalog::classify`] returns `None` for it; preprocessing
//! drops such rows.
//!
//! # Examples
//!
//! ```
//! use carprice_analysis::brand::{BrandCatalog, BrandClass};
//!
//! let catalog = BrandCatalog::default();
//! assert_eq!(catalog.classify("BMW"), Some(BrandClass::Luxury));
//! assert_eq!(catalog.classify("Tesla"), Some(BrandClass::Performance));
//! assert_eq!(catalog.classify("bmw"), None);
//! ```

use std::{collections::HashMap, fmt};

use serde::{Deserialize, Serialize};

/// Market segment of a car brand.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum BrandClass {
    Luxury,
    Performance,
    Economy,
}

impl fmt::Display for BrandClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_str(), f)
    }
}

impl BrandClass {
    /// All classes, in lookup precedence order.
    pub const ALL: [BrandClass; 3] = [
        BrandClass::Luxury,
        BrandClass::Performance,
        BrandClass::Economy,
    ];

    /// Lowercase name as written to the cleaned table.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            BrandClass::Luxury => "luxury",
            BrandClass::Performance => "performance",
            BrandClass::Economy => "economy",
        }
    }
}

/// Brand lists per class, the serialized form of a catalog.
///
/// ```json
/// {
///   "luxury": ["BMW", "Audi"],
///   "performance": ["Porsche"],
///   "economy": ["Toyota"]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandLists {
    #[serde(default)]
    pub luxury: Vec<String>,
    #[serde(default)]
    pub performance: Vec<String>,
    #[serde(default)]
    pub economy: Vec<String>,
}

impl Default for BrandLists {
    fn default() -> Self {
        fn owned(brands: &[&str]) -> Vec<String> {
            brands.iter().map(|&b| b.to_owned()).collect()
        }
        Self {
            luxury: owned(&["BMW", "Mercedes-Benz", "Audi", "Lexus"]),
            performance: owned(&["Porsche", "Tesla", "Alfa Romeo"]),
            economy: owned(&[
                "Toyota",
                "Honda",
                "Ford",
                "Hyundai",
                "Kia",
                "Opel",
                "SEAT",
                "Volkswagen",
                "Renault",
                "Peugeot",
            ]),
        }
    }
}

impl BrandLists {
    fn list(&self, class: BrandClass) -> &[String] {
        match class {
            BrandClass::Luxury => &self.luxury,
            BrandClass::Performance => &self.performance,
            BrandClass::Economy => &self.economy,
        }
    }
}

/// Immutable brand → class lookup.
#[derive(Debug, Clone)]
pub struct BrandCatalog {
    classes: HashMap<String, BrandClass>,
}

impl Default for BrandCatalog {
    fn default() -> Self {
        Self::from_lists(&BrandLists::default())
    }
}

impl BrandCatalog {
    /// Builds a catalog from brand lists.
    ///
    /// A brand listed under several classes takes the first one in
    /// [`BrandClass::ALL`] order.
    #[must_use]
    pub fn from_lists(lists: &BrandLists) -> Self {
        let mut classes = HashMap::new();
        for class in BrandClass::ALL {
            for brand in lists.list(class) {
                classes.entry(brand.clone()).or_insert(class);
            }
        }
        Self { classes }
    }

    /// Class of `brand`, or `None` if the brand is unknown.
    #[must_use]
    pub fn classify(&self, brand: &str) -> Option<BrandClass> {
        self.classes.get(brand).copied()
    }

    /// Number of known brands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_covers_all_lists() {
        let catalog = BrandCatalog::default();
        assert_eq!(catalog.len(), 17);
        assert_eq!(catalog.classify("Mercedes-Benz"), Some(BrandClass::Luxury));
        assert_eq!(catalog.classify("Alfa Romeo"), Some(BrandClass::Performance));
        assert_eq!(catalog.classify("SEAT"), Some(BrandClass::Economy));
    }

    #[test]
    fn test_exact_case_sensitive_match() {
        let catalog = BrandCatalog::default();
        assert_eq!(catalog.classify("Seat"), None);
        assert_eq!(catalog.classify(" BMW"), None);
        assert_eq!(catalog.classify("Skoda"), None);
    }

    #[test]
    fn test_first_list_wins_on_overlap() {
        let lists = BrandLists {
            luxury: vec!["Volvo".into()],
            performance: vec![],
            economy: vec!["Volvo".into(), "Dacia".into()],
        };
        let catalog = BrandCatalog::from_lists(&lists);
        assert_eq!(catalog.classify("Volvo"), Some(BrandClass::Luxury));
        assert_eq!(catalog.classify("Dacia"), Some(BrandClass::Economy));
    }

    #[test]
    fn test_lists_from_json() {
        let lists: BrandLists =
            serde_json::from_str(r#"{ "luxury": ["Genesis"], "economy": ["Dacia"] }"#).unwrap();
        assert!(lists.performance.is_empty());
        let catalog = BrandCatalog::from_lists(&lists);
        assert_eq!(catalog.classify("Genesis"), Some(BrandClass::Luxury));
        assert_eq!(catalog.classify("BMW"), None);
    }

    #[test]
    fn test_class_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&BrandClass::Performance).unwrap(),
            "\"performance\""
        );
        assert_eq!(BrandClass::Economy.to_string(), "economy");
    }
}
