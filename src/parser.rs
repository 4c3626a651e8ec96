//! Structured-text parser for QR payloads
//!
//! LCSC-style QR codes carry a brace-wrapped, comma-separated list of
//! `key:value` items, e.g. `{pc:C123456,on:SO-1234,pm:NE555DR,qty:50}`.

use crate::types::PartRecord;

/// Parse a raw QR payload into a part record.
///
/// Returns `None` unless the payload yields a non-empty `pc` (part code)
/// field. Items without a colon are ignored; an empty value after trimming
/// one layer of surrounding double quotes becomes an explicit absent marker.
/// Deterministic and side-effect free.
pub fn parse_payload(raw: &str) -> Option<PartRecord> {
    let body = strip_wrapper(raw.trim());

    let mut record = PartRecord::new();
    for item in body.split(',') {
        let Some((key, value)) = item.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        let value = strip_quotes(value.trim());
        record.set(key, (!value.is_empty()).then(|| value.to_string()));
    }

    if record.part_code().is_some() {
        Some(record)
    } else {
        None
    }
}

/// Strip a single leading and trailing layer of brace/bracket characters.
/// A no-op when the characters are absent, so unbalanced input is tolerated.
fn strip_wrapper(s: &str) -> &str {
    let s = s
        .strip_prefix('{')
        .or_else(|| s.strip_prefix('['))
        .unwrap_or(s);
    s.strip_suffix('}')
        .or_else(|| s.strip_suffix(']'))
        .unwrap_or(s)
}

/// Strip one layer of surrounding double quotes from a value.
fn strip_quotes(s: &str) -> &str {
    let s = s.strip_prefix('"').unwrap_or(s);
    s.strip_suffix('"').unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_braced_payload() {
        let rec = parse_payload("{pc:\"C123\", qty:5}").unwrap();
        assert_eq!(rec.get("pc"), Some("C123"));
        assert_eq!(rec.get("qty"), Some("5"));
    }

    #[test]
    fn missing_part_code_yields_none() {
        assert!(parse_payload("{qty:5}").is_none());
    }

    #[test]
    fn empty_payload_yields_none() {
        assert!(parse_payload("").is_none());
    }

    #[test]
    fn empty_part_code_is_absent_not_empty_string() {
        // `pc` present but empty after quote trimming counts as absent
        assert!(parse_payload("{pc:\"\", qty:5}").is_none());
    }

    #[test]
    fn value_splits_on_first_colon_only() {
        let rec = parse_payload("{pc:C1,url:https://example.com}").unwrap();
        assert_eq!(rec.get("url"), Some("https://example.com"));
    }

    #[test]
    fn items_without_colon_are_ignored() {
        let rec = parse_payload("{pc:C1,garbage,qty:3}").unwrap();
        assert_eq!(rec.get("qty"), Some("3"));
        assert!(!rec.fields.contains_key("garbage"));
    }

    #[test]
    fn unbalanced_wrappers_are_tolerated() {
        assert!(parse_payload("[pc:C9").is_some());
        assert!(parse_payload("pc:C9}").is_some());
    }

    #[test]
    fn parsing_is_idempotent() {
        let raw = "{pc:C123456,on:SO-1,pm:NE555DR,qty:50,note:\"\"}";
        assert_eq!(parse_payload(raw), parse_payload(raw));
    }

    #[test]
    fn empty_quoted_value_stored_as_absent_marker() {
        let rec = parse_payload("{pc:C1,note:\"\"}").unwrap();
        assert_eq!(rec.fields.get("note"), Some(&None));
        assert_eq!(rec.get("note"), None);
    }
}
