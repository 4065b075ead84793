//! Request and result types for search and scraping
//!
//! Request types double as MCP tool parameters, so they carry `JsonSchema`
//! descriptions and keep the wire names agents already use (`q`, `gl`, `hl`,
//! `includeMarkdown`).

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use url::Url;

use crate::error::{ScrapeError, ScrapeResult};
use crate::extract::Extraction;

// ============================================================================
// Search
// ============================================================================

/// Time window filter, sent as Google's `tbs` value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum TimeRange {
    #[serde(rename = "qdr:h", alias = "past_hour", alias = "hour")]
    PastHour,
    #[serde(rename = "qdr:d", alias = "past_day", alias = "day")]
    PastDay,
    #[serde(rename = "qdr:w", alias = "past_week", alias = "week")]
    PastWeek,
    #[serde(rename = "qdr:m", alias = "past_month", alias = "month")]
    PastMonth,
    #[serde(rename = "qdr:y", alias = "past_year", alias = "year")]
    PastYear,
}

/// A Google search through Serper. Unset optional fields are left out of the
/// outbound payload entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SearchQuery {
    #[serde(rename = "q")]
    #[schemars(description = "Search query string")]
    pub query: String,

    #[serde(rename = "gl")]
    #[schemars(description = "Region code in ISO 3166-1 alpha-2 format (e.g., 'us')")]
    pub region: String,

    #[serde(rename = "hl")]
    #[schemars(description = "Language code in ISO 639-1 format (e.g., 'en')")]
    pub language: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Number of results to return (default: 10)")]
    pub num: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Page number of results to return (default: 1)")]
    pub page: Option<u32>,

    #[serde(rename = "tbs", default, skip_serializing_if = "Option::is_none")]
    #[schemars(
        description = "Time filter: 'qdr:h' past hour, 'qdr:d' past day, 'qdr:w' past week, 'qdr:m' past month, 'qdr:y' past year"
    )]
    pub time_range: Option<TimeRange>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Location hint (e.g., 'SoHo, New York, United States')")]
    pub location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Whether to autocorrect spelling in the query")]
    pub autocorrect: Option<bool>,
}

impl SearchQuery {
    pub fn new(
        query: impl Into<String>,
        region: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            query: query.into(),
            region: region.into(),
            language: language.into(),
            num: None,
            page: None,
            time_range: None,
            location: None,
            autocorrect: None,
        }
    }
}

// ============================================================================
// Scraping requests
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PageRequest {
    #[schemars(description = "The URL of the webpage to scrape")]
    pub url: String,

    #[serde(
        rename = "includeMarkdown",
        default,
        deserialize_with = "deserialize_lenient_bool"
    )]
    #[schemars(description = "Whether to include a markdown rendering (default: false)")]
    pub include_markdown: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BatchPageRequest {
    #[schemars(description = "URLs to scrape in parallel; results keep this order")]
    pub urls: Vec<String>,

    #[serde(
        rename = "includeMarkdown",
        default,
        deserialize_with = "deserialize_lenient_bool"
    )]
    #[schemars(description = "Whether to include markdown for every page (default: false)")]
    pub include_markdown: bool,
}

impl BatchPageRequest {
    /// Reject an empty list or any entry that is not an absolute http(s) URL
    pub fn validate(&self) -> ScrapeResult<()> {
        if self.urls.is_empty() {
            return Err(ScrapeError::InvalidRequest(
                "urls must contain at least one URL".to_string(),
            ));
        }

        for (index, raw) in self.urls.iter().enumerate() {
            let parsed = Url::parse(raw).map_err(|e| {
                ScrapeError::InvalidRequest(format!("urls[{index}] '{raw}' is not a valid URL: {e}"))
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ScrapeError::InvalidRequest(format!(
                    "urls[{index}] '{raw}' must use http or https"
                )));
            }
        }

        Ok(())
    }
}

/// Accept `true`/`false` as well as the string and integer spellings LLM
/// callers tend to produce. `null` reads as false.
pub fn deserialize_lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient {
        Bool(bool),
        Int(i64),
        Str(String),
    }

    match Option::<Lenient>::deserialize(deserializer)? {
        None => Ok(false),
        Some(Lenient::Bool(b)) => Ok(b),
        Some(Lenient::Int(n)) => Ok(n != 0),
        Some(Lenient::Str(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "y" | "on" => Ok(true),
            "false" | "0" | "no" | "n" | "off" | "" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "expected a boolean, got '{other}'"
            ))),
        },
    }
}

// ============================================================================
// Scraping results
// ============================================================================

/// One `<meta>` element. At least one field is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaTag {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl MetaTag {
    pub fn has_any_value(&self) -> bool {
        self.name.is_some() || self.property.is_some() || self.content.is_some()
    }
}

/// A JSON-LD script block that parsed successfully
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredDataBlock {
    /// Script contents, trimmed
    pub raw: String,
    pub parsed: serde_json::Value,
}

/// Outcome of scraping one URL.
///
/// Built only through [`PageResult::success`] and [`PageResult::failure`]:
/// either `html` is non-empty and `error` is `None`, or `html` is empty,
/// every derived field is empty, and `error` holds the cause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    pub url: String,
    /// When scraping of this URL started
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub html: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub meta_tags: Vec<MetaTag>,
    pub json_ld: Vec<StructuredDataBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PageResult {
    /// `html` must be non-empty; the fetcher refuses empty bodies.
    pub fn success(
        url: impl Into<String>,
        timestamp: DateTime<Utc>,
        html: String,
        extraction: Extraction,
        markdown: Option<String>,
    ) -> Self {
        debug_assert!(!html.is_empty(), "successful page with empty html");
        Self {
            url: url.into(),
            timestamp,
            title: extraction.title,
            html,
            markdown,
            text: Some(extraction.text),
            meta_tags: extraction.meta_tags,
            json_ld: extraction.json_ld,
            error: None,
        }
    }

    pub fn failure(url: impl Into<String>, timestamp: DateTime<Utc>, error: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timestamp,
            title: None,
            html: String::new(),
            markdown: None,
            text: None,
            meta_tags: Vec::new(),
            json_ld: Vec::new(),
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Success/failure counts for a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn from_results(results: &[PageResult]) -> Self {
        let succeeded = results.iter().filter(|r| r.is_success()).count();
        Self {
            total: results.len(),
            succeeded,
            failed: results.len() - succeeded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_minimal_query_has_only_required_keys() {
        let query = SearchQuery::new("rust async", "us", "en");
        let value = serde_json::to_value(&query).unwrap();

        assert_eq!(value, json!({ "q": "rust async", "gl": "us", "hl": "en" }));
    }

    #[test]
    fn test_full_query_uses_upstream_names() {
        let query = SearchQuery {
            num: Some(20),
            page: Some(2),
            time_range: Some(TimeRange::PastWeek),
            location: Some("California, United States".to_string()),
            autocorrect: Some(false),
            ..SearchQuery::new("tokio", "de", "de")
        };
        let value = serde_json::to_value(&query).unwrap();

        assert_eq!(value["tbs"], "qdr:w");
        assert_eq!(value["num"], 20);
        assert_eq!(value["page"], 2);
        assert_eq!(value["location"], "California, United States");
        assert_eq!(value["autocorrect"], false);
        assert_eq!(value.as_object().unwrap().len(), 8);
    }

    #[test]
    fn test_time_range_accepts_long_names() {
        let query: SearchQuery = serde_json::from_value(json!({
            "q": "news", "gl": "gb", "hl": "en", "tbs": "past_day"
        }))
        .unwrap();
        assert_eq!(query.time_range, Some(TimeRange::PastDay));
    }

    #[test]
    fn test_page_request_lenient_markdown_flag() {
        let req: PageRequest =
            serde_json::from_value(json!({ "url": "https://a.test", "includeMarkdown": "true" }))
                .unwrap();
        assert!(req.include_markdown);

        let req: PageRequest = serde_json::from_value(json!({ "url": "https://a.test" })).unwrap();
        assert!(!req.include_markdown);

        let req: PageRequest =
            serde_json::from_value(json!({ "url": "https://a.test", "includeMarkdown": null }))
                .unwrap();
        assert!(!req.include_markdown);

        let bad = serde_json::from_value::<PageRequest>(
            json!({ "url": "https://a.test", "includeMarkdown": "maybe" }),
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_batch_validate() {
        let empty = BatchPageRequest {
            urls: vec![],
            include_markdown: false,
        };
        assert!(matches!(empty.validate(), Err(ScrapeError::InvalidRequest(_))));

        let relative = BatchPageRequest {
            urls: vec!["https://ok.test".to_string(), "/relative".to_string()],
            include_markdown: false,
        };
        let err = relative.validate().unwrap_err().to_string();
        assert!(err.contains("urls[1]"));

        let ftp = BatchPageRequest {
            urls: vec!["ftp://files.test/a".to_string()],
            include_markdown: false,
        };
        assert!(ftp.validate().is_err());

        let good = BatchPageRequest {
            urls: vec!["https://a.test".to_string(), "http://b.test/x?y=1".to_string()],
            include_markdown: true,
        };
        assert!(good.validate().is_ok());
    }

    #[test]
    fn test_failure_invariant() {
        let result = PageResult::failure("https://down.test", Utc::now(), "connection refused");
        assert!(!result.is_success());
        assert!(result.html.is_empty());
        assert!(result.title.is_none() && result.text.is_none() && result.markdown.is_none());
        assert!(result.meta_tags.is_empty() && result.json_ld.is_empty());

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["error"], "connection refused");
        assert!(value.get("title").is_none());
    }

    #[test]
    fn test_success_invariant() {
        let extraction = Extraction {
            title: Some("Hi".to_string()),
            text: "Hi".to_string(),
            meta_tags: vec![],
            json_ld: vec![],
        };
        let result = PageResult::success(
            "https://up.test",
            Utc::now(),
            "<title>Hi</title>".to_string(),
            extraction,
            None,
        );
        assert!(result.is_success());
        assert!(!result.html.is_empty());
        assert_eq!(result.text.as_deref(), Some("Hi"));
    }

    #[test]
    fn test_batch_summary() {
        let now = Utc::now();
        let results = vec![
            PageResult::failure("https://a.test", now, "boom"),
            PageResult::success(
                "https://b.test",
                now,
                "<p>x</p>".to_string(),
                Extraction::default(),
                None,
            ),
        ];
        let summary = BatchSummary::from_results(&results);
        assert_eq!(
            summary,
            BatchSummary {
                total: 2,
                succeeded: 1,
                failed: 1
            }
        );
    }

    #[test]
    fn test_meta_tag_predicate() {
        let empty = MetaTag {
            name: None,
            property: None,
            content: None,
        };
        assert!(!empty.has_any_value());

        let described = MetaTag {
            content: Some("x".to_string()),
            ..empty
        };
        assert!(described.has_any_value());
    }
}
