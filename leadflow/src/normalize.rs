//! Result normalization: the parse-or-degrade boundary.
//!
//! This is the single point where untrusted provider text becomes trusted
//! structured data. A response that fails to parse degrades to an empty
//! result with a logged diagnostic instead of failing the pipeline; nothing
//! downstream re-validates.

use serde::de::DeserializeOwned;

use crate::records::{CompanyRecord, OutreachRecord};

/// Strips Markdown code-fence wrapping from a provider response.
///
/// Removes ```json and ``` markers and trims surrounding whitespace. Calling
/// this on input without fences returns the input unchanged.
#[must_use]
pub fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

/// Parses a provider response into company records.
///
/// Order is preserved exactly as the provider emitted it. On parse failure
/// the response is logged and an empty vector is returned.
#[must_use]
pub fn parse_company_records(raw: &str) -> Vec<CompanyRecord> {
    parse_records(raw, "company records")
}

/// Parses the final stage's output into outreach records, with the same
/// degrade-not-fail policy as [`parse_company_records`].
#[must_use]
pub fn parse_outreach_records(raw: &str) -> Vec<OutreachRecord> {
    parse_records(raw, "outreach records")
}

fn parse_records<T: DeserializeOwned>(raw: &str, what: &str) -> Vec<T> {
    let cleaned = strip_code_fences(raw);
    match serde_json::from_str::<Vec<T>>(&cleaned) {
        Ok(records) => records,
        Err(err) => {
            tracing::warn!(
                error = %err,
                preview = %preview(&cleaned),
                "received non-JSON response while parsing {what}, degrading to empty result"
            );
            Vec::new()
        }
    }
}

fn preview(text: &str) -> &str {
    let end = text
        .char_indices()
        .nth(80)
        .map_or(text.len(), |(idx, _)| idx);
    &text[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const FIVE_RECORDS: &str = r#"[
        {"name": "Alpha", "website": "alpha.io", "description": "a", "headquarters": "Austin, USA",
         "employee_count": "10", "funding_status": "Seed", "product_list": "A1, A2",
         "competitor_list": "B", "founded_year": "2021", "revenue_range": "$1M"},
        {"name": "Beta", "website": "beta.io", "description": "b", "headquarters": "Boston, USA",
         "employee_count": "20", "funding_status": "Series A", "product_list": "B1",
         "competitor_list": "A", "founded_year": "2020", "revenue_range": "$2M"},
        {"name": "Gamma", "website": "gamma.io", "description": "c", "headquarters": "Georgia, USA",
         "employee_count": "30", "funding_status": "Series B", "product_list": "G1, G2, G3",
         "competitor_list": "D", "founded_year": "2019", "revenue_range": "$3M"},
        {"name": "Delta", "website": "delta.io", "description": "d", "headquarters": "Denver, USA",
         "employee_count": "40", "funding_status": "Seed", "product_list": "D1",
         "competitor_list": "G", "founded_year": "2018", "revenue_range": "$4M"},
        {"name": "Epsilon", "website": "epsilon.io", "description": "e", "headquarters": "Eugene, USA",
         "employee_count": "50", "funding_status": "Series C", "product_list": "E1, E2",
         "competitor_list": "A, B", "founded_year": "2017", "revenue_range": "$5M"}
    ]"#;

    #[test]
    fn test_strip_fences() {
        let wrapped = "```json\n[{\"name\": \"A\"}]\n```";
        assert_eq!(strip_code_fences(wrapped), "[{\"name\": \"A\"}]");
    }

    #[test]
    fn test_strip_fences_idempotent_on_plain_input() {
        let plain = r#"[{"name": "A"}]"#;
        assert_eq!(strip_code_fences(plain), plain);
        assert_eq!(strip_code_fences(&strip_code_fences(plain)), plain);
    }

    #[test]
    fn test_parse_five_records_preserves_order_and_fields() {
        let records = parse_company_records(FIVE_RECORDS);
        assert_eq!(records.len(), 5);

        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Beta", "Gamma", "Delta", "Epsilon"]);

        assert_eq!(records[0].headquarters, "Austin, USA");
        assert_eq!(records[0].product_list, vec!["A1", "A2"]);
        assert_eq!(records[4].competitor_list, vec!["A", "B"]);
        assert_eq!(records[4].revenue_range, "$5M");
    }

    #[test]
    fn test_parse_fenced_records() {
        let wrapped = format!("```json\n{FIVE_RECORDS}\n```");
        assert_eq!(parse_company_records(&wrapped).len(), 5);
    }

    #[test]
    fn test_parse_invalid_json_degrades_to_empty() {
        assert!(parse_company_records("not json").is_empty());
        assert!(parse_company_records("").is_empty());
        assert!(parse_company_records(r#"{"name": "object not array"}"#).is_empty());
    }

    #[test]
    fn test_parse_outreach_records() {
        let raw = r#"[{"company_name": "Acme", "subject": "Hi", "body": "Hello there",
                       "website": "acme.io", "headquarters": "Austin", "funding_status": "Seed"}]"#;
        let records = parse_outreach_records(raw);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].company_name, "Acme");
    }
}
