//! Shared domain types for the capture-and-staging pipeline

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered field map for one inventory part.
///
/// Keys come from the QR payload (e.g. `pc`, `qty`, `pm`) plus enrichment
/// fields. Insertion order is preserved so staged JSON reads in scan order.
pub type FieldMap = IndexMap<String, Option<String>>;

/// One inventory part: parsed QR fields merged with vendor enrichment.
///
/// A `None` value is an explicit absent marker (field was present in the
/// payload but empty), distinct from the key being missing entirely.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartRecord {
    pub fields: FieldMap,
}

impl PartRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Present (non-absent) value for a field.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(|v| v.as_deref())
    }

    pub fn set(&mut self, key: impl Into<String>, value: Option<String>) {
        self.fields.insert(key.into(), value);
    }

    /// Vendor part code (`pc`), the required field for a valid record.
    pub fn part_code(&self) -> Option<&str> {
        self.get("pc")
    }

    /// Quantity as an integer, only when the `qty` field is all digits.
    pub fn quantity(&self) -> Option<i64> {
        let qty = self.get("qty")?;
        if !qty.is_empty() && qty.chars().all(|c| c.is_ascii_digit()) {
            qty.parse().ok()
        } else {
            None
        }
    }

    /// Unit price carried by the record, if parseable.
    pub fn unit_price(&self) -> Option<f64> {
        self.get("unit_price")?.parse().ok()
    }
}

/// Descriptive fields fetched from the vendor catalog for one part code.
///
/// All fields are optional: a failed or partial fetch yields an empty or
/// partially filled value, never an error.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VendorInfo {
    pub manufacturer: Option<String>,
    pub mfr_part_number: Option<String>,
    pub package: Option<String>,
    pub description: Option<String>,
    pub unit_price: Option<f64>,
}

impl VendorInfo {
    pub fn is_empty(&self) -> bool {
        self.manufacturer.is_none()
            && self.mfr_part_number.is_none()
            && self.package.is_none()
            && self.description.is_none()
            && self.unit_price.is_none()
    }

    /// Merge into a parsed record. Present enrichment fields overwrite
    /// same-named parsed fields; absent ones leave the parsed value alone.
    /// Inventory-specific fields (`pc`, `qty`) are never produced here, so
    /// the parsed values stay authoritative for them.
    pub fn apply_to(&self, record: &mut PartRecord) {
        if let Some(v) = &self.manufacturer {
            record.set("manufacturer", Some(v.clone()));
        }
        if let Some(v) = &self.mfr_part_number {
            record.set("mfr_part_number", Some(v.clone()));
        }
        if let Some(v) = &self.package {
            record.set("package", Some(v.clone()));
        }
        if let Some(v) = &self.description {
            record.set("description", Some(v.clone()));
        }
        if let Some(p) = self.unit_price {
            record.set("unit_price", Some(p.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> PartRecord {
        let mut r = PartRecord::new();
        for (k, v) in pairs {
            r.set(*k, Some(v.to_string()));
        }
        r
    }

    #[test]
    fn enrichment_overwrites_descriptive_fields_only() {
        let mut rec = record(&[("pc", "C1"), ("qty", "2"), ("package", "SOT23")]);
        let info = VendorInfo {
            package: Some("SOT-23-5".to_string()),
            manufacturer: Some("ACME".to_string()),
            ..Default::default()
        };

        info.apply_to(&mut rec);

        assert_eq!(rec.get("package"), Some("SOT-23-5"));
        assert_eq!(rec.get("manufacturer"), Some("ACME"));
        assert_eq!(rec.get("qty"), Some("2"));
        assert_eq!(rec.get("pc"), Some("C1"));
    }

    #[test]
    fn absent_enrichment_fields_leave_parsed_values() {
        let mut rec = record(&[("pc", "C1"), ("description", "from qr")]);
        VendorInfo::default().apply_to(&mut rec);
        assert_eq!(rec.get("description"), Some("from qr"));
    }

    #[test]
    fn quantity_requires_all_digits() {
        assert_eq!(record(&[("qty", "25")]).quantity(), Some(25));
        assert_eq!(record(&[("qty", "25x")]).quantity(), None);
        assert_eq!(record(&[("pc", "C1")]).quantity(), None);
    }

    #[test]
    fn unit_price_round_trips_through_string_field() {
        let mut rec = PartRecord::new();
        let info = VendorInfo {
            unit_price: Some(0.1234),
            ..Default::default()
        };
        info.apply_to(&mut rec);
        assert_eq!(rec.unit_price(), Some(0.1234));
    }

    #[test]
    fn staged_json_preserves_field_order() {
        let rec = record(&[("pc", "C123"), ("qty", "5"), ("pm", "NE555")]);
        let json = serde_json::to_string(&rec).unwrap();
        assert_eq!(json, r#"{"pc":"C123","qty":"5","pm":"NE555"}"#);
    }
}
