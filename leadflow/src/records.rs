//! Structured records parsed from provider responses.

use serde::{Deserialize, Deserializer, Serialize};

use crate::utils::word_count;

/// A company record as returned by the company-search capability.
///
/// Records are produced only by the normalizer
/// ([`parse_company_records`](crate::normalize::parse_company_records));
/// they are never hand-constructed elsewhere. List fields arrive from the
/// provider as comma-joined strings and are split during deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRecord {
    /// Company name.
    #[serde(default)]
    pub name: String,
    /// Company website.
    #[serde(default)]
    pub website: String,
    /// Brief company description.
    #[serde(default)]
    pub description: String,
    /// Headquarters location.
    #[serde(default)]
    pub headquarters: String,
    /// Approximate employee count, as reported.
    #[serde(default)]
    pub employee_count: String,
    /// Funding status (e.g., "Series A").
    #[serde(default)]
    pub funding_status: String,
    /// Products, in the order the provider listed them.
    #[serde(default, deserialize_with = "comma_list")]
    pub product_list: Vec<String>,
    /// Competitors, in the order the provider listed them.
    #[serde(default, deserialize_with = "comma_list")]
    pub competitor_list: Vec<String>,
    /// Founding year, as reported.
    #[serde(default)]
    pub founded_year: String,
    /// Revenue range (e.g., "$10M-$50M").
    #[serde(default)]
    pub revenue_range: String,
}

/// An outreach email drafted by the final pipeline stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutreachRecord {
    /// The target company's name.
    #[serde(default, alias = "name")]
    pub company_name: String,
    /// The target company's website.
    #[serde(default)]
    pub website: String,
    /// The target company's headquarters.
    #[serde(default)]
    pub headquarters: String,
    /// The target company's funding status.
    #[serde(default)]
    pub funding_status: String,
    /// The email subject line.
    #[serde(default, alias = "email_subject")]
    pub subject: String,
    /// The email body. Contract: between 50 and 125 words inclusive.
    #[serde(default, alias = "email_body")]
    pub body: String,
}

impl OutreachRecord {
    /// Word count of the email body.
    #[must_use]
    pub fn body_word_count(&self) -> usize {
        word_count(&self.body)
    }
}

/// Accepts either a comma-joined string or a JSON array of strings.
fn comma_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Joined(String),
        Items(Vec<String>),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Joined(joined) => Ok(joined
            .split(',')
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect()),
        Raw::Items(items) => Ok(items),
    }
}
