//! Enumeration types for the store simulation.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Product categories
// ---------------------------------------------------------------------------

/// The kind of product a customer came to buy.
///
/// The set is closed: every store layout maps each known category to one
/// department. Labels that match nothing resolve to [`Unknown`], which the
/// layout routes straight to the exit.
///
/// [`Unknown`]: ProductCategory::Unknown
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ProductCategory {
    /// Milk, cheese, yoghurt.
    Dairy,
    /// Fresh vegetables.
    Vegetables,
    /// Meat counter.
    Meat,
    /// Bakery.
    Bread,
    /// Sugar and sweets.
    Sugar,
    /// Sentinel for labels that match no known category.
    Unknown,
}

impl ProductCategory {
    /// Every category that has a department in the standard layout.
    pub const KNOWN: [Self; 5] = [
        Self::Dairy,
        Self::Vegetables,
        Self::Meat,
        Self::Bread,
        Self::Sugar,
    ];

    /// Machine-friendly slug (matches the serde representation).
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Dairy => "dairy",
            Self::Vegetables => "vegetables",
            Self::Meat => "meat",
            Self::Bread => "bread",
            Self::Sugar => "sugar",
            Self::Unknown => "unknown",
        }
    }

    /// Display name of the department that sells this category.
    pub const fn department_name(self) -> &'static str {
        match self {
            Self::Dairy => "Молочный отдел",
            Self::Vegetables => "Отдел овощей",
            Self::Meat => "Отдел мяса",
            Self::Bread => "Отдел хлеба",
            Self::Sugar => "Отдел сахара",
            Self::Unknown => "Unknown",
        }
    }

    /// Resolve a free-form label to a category.
    ///
    /// A label matches a category when it equals the slug or is contained
    /// in the department name, compared case-insensitively. The first
    /// match in [`KNOWN`](Self::KNOWN) order wins. Empty or unmatched
    /// labels yield [`Unknown`](Self::Unknown).
    pub fn from_label(label: &str) -> Self {
        let needle = label.trim().to_lowercase();
        if needle.is_empty() {
            return Self::Unknown;
        }
        Self::KNOWN
            .iter()
            .copied()
            .find(|category| {
                category.slug() == needle
                    || category.department_name().to_lowercase().contains(&needle)
            })
            .unwrap_or(Self::Unknown)
    }
}

impl core::fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.department_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_department_names() {
        assert_eq!(
            ProductCategory::from_label("Отдел овощей"),
            ProductCategory::Vegetables
        );
        assert_eq!(
            ProductCategory::from_label("Молочный отдел"),
            ProductCategory::Dairy
        );
    }

    #[test]
    fn resolves_slugs_case_insensitively() {
        assert_eq!(ProductCategory::from_label("MEAT"), ProductCategory::Meat);
        assert_eq!(ProductCategory::from_label(" sugar "), ProductCategory::Sugar);
    }

    #[test]
    fn resolves_partial_department_name() {
        assert_eq!(ProductCategory::from_label("хлеба"), ProductCategory::Bread);
    }

    #[test]
    fn unmatched_and_empty_labels_are_unknown() {
        assert_eq!(ProductCategory::from_label("Electronics"), ProductCategory::Unknown);
        assert_eq!(ProductCategory::from_label(""), ProductCategory::Unknown);
        assert_eq!(ProductCategory::from_label("   "), ProductCategory::Unknown);
    }

    #[test]
    fn serde_uses_slugs() {
        let json = serde_json::to_string(&ProductCategory::Vegetables).ok();
        assert_eq!(json.as_deref(), Some("\"vegetables\""));
    }
}
