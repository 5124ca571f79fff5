//! Field access and filtering for upstream outline records.
//!
//! Records are loosely-typed maps whose schema varies between upstream
//! releases. Lookups therefore go through candidate field lists instead of
//! fixed struct fields, and every unexamined field passes through untouched.

use serde_json::Value;

/// Field candidates holding the company name, in lookup order.
pub const NAME_FIELDS: &[&str] = &["corpNm", "corpName"];

/// Field candidates holding the corporate registration number, in lookup order.
pub const REGISTRATION_FIELDS: &[&str] = &["crno", "jurirno"];

/// Returns the first candidate field that holds a non-empty string.
pub fn field_str<'a>(record: &'a Value, candidates: &[&str]) -> Option<&'a str> {
    candidates
        .iter()
        .find_map(|key| record.get(key).and_then(Value::as_str).filter(|s| !s.is_empty()))
}

/// Resolved company name of a record, or `""` when absent.
pub fn corp_name(record: &Value) -> &str {
    field_str(record, NAME_FIELDS).unwrap_or("")
}

/// Resolved registration number of a record, or `""` when absent.
pub fn registration_number(record: &Value) -> &str {
    field_str(record, REGISTRATION_FIELDS).unwrap_or("")
}

/// Substring re-filter applied to upstream records before they are returned.
///
/// The upstream service already filters by company name, but its matching is
/// broader than callers expect; this narrows the result set locally. Both
/// predicates are case-sensitive substring checks and an empty keyword always
/// matches, so the default filter passes every record through in order.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    name: String,
    registration_number: String,
}

impl RecordFilter {
    /// Creates a filter from the raw query parameters; absent parameters
    /// disable their predicate.
    pub fn new(name: Option<&str>, registration_number: Option<&str>) -> Self {
        Self {
            name: name.unwrap_or_default().to_string(),
            registration_number: registration_number.unwrap_or_default().to_string(),
        }
    }

    /// Checks whether a record satisfies both predicates.
    pub fn matches(&self, record: &Value) -> bool {
        let name_ok = self.name.is_empty() || corp_name(record).contains(&self.name);
        let registration_ok = self.registration_number.is_empty()
            || registration_number(record).contains(&self.registration_number);
        name_ok && registration_ok
    }

    /// Keeps the matching records, preserving upstream order.
    pub fn apply(&self, records: Vec<Value>) -> Vec<Value> {
        records
            .into_iter()
            .filter(|record| self.matches(record))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample_records() -> Vec<Value> {
        vec![
            json!({ "corpNm": "삼성전자(주)", "crno": "1301110006246", "enpBsadr": "수원시" }),
            json!({ "corpNm": "삼성물산(주)", "crno": "1101110031998" }),
            json!({ "corpNm": "엘지전자(주)", "crno": "1101110124150" }),
        ]
    }

    #[test]
    fn test_empty_filter_keeps_everything_in_order() {
        let filter = RecordFilter::new(None, None);

        let kept = filter.apply(sample_records());

        assert_eq!(kept.len(), 3);
        assert_eq!(corp_name(&kept[0]), "삼성전자(주)");
        assert_eq!(corp_name(&kept[2]), "엘지전자(주)");
    }

    #[test]
    fn test_name_substring_narrows_results() {
        let filter = RecordFilter::new(Some("삼성"), None);

        let kept = filter.apply(sample_records());

        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|r| corp_name(r).contains("삼성")));
    }

    #[test]
    fn test_registration_number_narrows_results() {
        let filter = RecordFilter::new(None, Some("1301110006246"));

        let kept = filter.apply(sample_records());

        assert_eq!(kept.len(), 1);
        assert_eq!(corp_name(&kept[0]), "삼성전자(주)");
    }

    #[test]
    fn test_both_predicates_must_hold() {
        let filter = RecordFilter::new(Some("삼성"), Some("1101110031998"));

        let kept = filter.apply(sample_records());

        assert_eq!(kept.len(), 1);
        assert_eq!(corp_name(&kept[0]), "삼성물산(주)");

        // A matching registration number does not rescue a non-matching name
        let filter = RecordFilter::new(Some("엘지"), Some("1301110006246"));
        assert!(filter.apply(sample_records()).is_empty());
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let records = vec![json!({ "corpNm": "Acme Holdings" })];
        let filter = RecordFilter::new(Some("acme"), None);

        assert!(filter.apply(records).is_empty());
    }

    #[test]
    fn test_fallback_fields_are_consulted() {
        let record = json!({ "corpName": "Fallback Co", "jurirno": "9901110000001" });

        assert_eq!(corp_name(&record), "Fallback Co");
        assert_eq!(registration_number(&record), "9901110000001");

        let filter = RecordFilter::new(Some("Fallback"), Some("990111"));
        assert!(filter.matches(&record));
    }

    #[test]
    fn test_empty_primary_field_falls_through() {
        let record = json!({ "corpNm": "", "corpName": "Secondary Name" });

        assert_eq!(corp_name(&record), "Secondary Name");
    }

    #[test]
    fn test_non_string_fields_are_skipped() {
        let record = json!({ "corpNm": 42, "corpName": "Numeric Front", "crno": null });

        assert_eq!(corp_name(&record), "Numeric Front");
        assert_eq!(registration_number(&record), "");
    }

    #[test]
    fn test_keyword_rejects_record_without_fields() {
        let filter = RecordFilter::new(Some("삼성"), None);

        assert!(!filter.matches(&json!({ "enpBsadr": "수원시" })));
        assert!(!filter.matches(&json!("bare string record")));
    }
}
