//! Structured data extraction from HTML
//!
//! Pulls the title, `<meta>` tags, JSON-LD blocks and visible text out of a
//! parsed document. html5ever recovers from any input, so extraction never
//! fails: malformed markup just yields whatever structure the parser rebuilt.
//! Meta tags without usable attributes and JSON-LD that does not parse are
//! filtered out of the produced sequences.

use scraper::{ElementRef, Html, Node, Selector};
use std::sync::LazyLock;

use crate::types::{MetaTag, StructuredDataBlock};

static TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("title").unwrap());
static META: LazyLock<Selector> = LazyLock::new(|| Selector::parse("meta").unwrap());
static SCRIPT: LazyLock<Selector> = LazyLock::new(|| Selector::parse("script").unwrap());

const JSON_LD_TYPE: &str = "application/ld+json";

/// Elements whose contents are never visible text
const HIDDEN_TAGS: &[&str] = &["script", "style"];

/// Everything derived from a page's HTML except markdown
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub title: Option<String>,
    pub text: String,
    pub meta_tags: Vec<MetaTag>,
    pub json_ld: Vec<StructuredDataBlock>,
}

pub fn extract(document: &Html) -> Extraction {
    Extraction {
        title: title(document),
        text: visible_text(document),
        meta_tags: meta_tags(document),
        json_ld: structured_data(document),
    }
}

/// Parse and extract in one step
pub fn extract_html(html: &str) -> Extraction {
    extract(&Html::parse_document(html))
}

/// Trimmed text of the first `<title>`; absent when missing or blank
pub fn title(document: &Html) -> Option<String> {
    let element = document.select(&TITLE).next()?;
    let text: String = element.text().collect();
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// One entry per `<meta>` with a non-empty name, property or content, in
/// document order
pub fn meta_tags(document: &Html) -> Vec<MetaTag> {
    document
        .select(&META)
        .map(|element| {
            let attr = |key: &str| {
                element
                    .value()
                    .attr(key)
                    .filter(|v| !v.is_empty())
                    .map(str::to_string)
            };
            MetaTag {
                name: attr("name"),
                property: attr("property"),
                content: attr("content"),
            }
        })
        .filter(MetaTag::has_any_value)
        .collect()
}

/// `<script type="application/ld+json">` blocks whose contents parse as JSON
pub fn structured_data(document: &Html) -> Vec<StructuredDataBlock> {
    document
        .select(&SCRIPT)
        .filter(|script| is_json_ld(script))
        .map(|script| script.text().collect::<String>().trim().to_string())
        .filter_map(|raw| {
            let parsed = serde_json::from_str(&raw).ok()?;
            Some(StructuredDataBlock { raw, parsed })
        })
        .collect()
}

fn is_json_ld(script: &ElementRef<'_>) -> bool {
    script
        .value()
        .attr("type")
        .is_some_and(|t| t.trim().eq_ignore_ascii_case(JSON_LD_TYPE))
}

/// Every visible text node in document order, trimmed, blank ones dropped,
/// joined with newlines
pub fn visible_text(document: &Html) -> String {
    let mut pieces = Vec::new();
    collect_text(document.root_element(), &mut pieces);
    pieces.join("\n")
}

/// Visible text under `element`, each node trimmed and concatenated with no
/// separator
pub fn element_text(element: ElementRef<'_>) -> String {
    let mut pieces = Vec::new();
    collect_text(element, &mut pieces);
    pieces.concat()
}

// Walks with an explicit stack; nesting depth is attacker-controlled.
fn collect_text<'a>(element: ElementRef<'a>, pieces: &mut Vec<&'a str>) {
    if is_hidden(element) {
        return;
    }

    // Children are pushed in reverse so they pop in document order.
    let mut stack: Vec<_> = element.children().rev().collect();
    while let Some(node) = stack.pop() {
        match node.value() {
            Node::Text(text) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    pieces.push(trimmed);
                }
            }
            Node::Element(_) => {
                if ElementRef::wrap(node).is_some_and(|child| !is_hidden(child)) {
                    stack.extend(node.children().rev());
                }
            }
            _ => {}
        }
    }
}

fn is_hidden(element: ElementRef<'_>) -> bool {
    HIDDEN_TAGS.contains(&element.value().name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_title_first_and_trimmed() {
        let html = "<html><head><title>  First  </title><title>Second</title></head></html>";
        assert_eq!(extract_html(html).title.as_deref(), Some("First"));
    }

    #[test]
    fn test_title_absent() {
        assert!(extract_html("<p>No title here</p>").title.is_none());
        assert!(extract_html("<title>   </title>").title.is_none());
    }

    #[test]
    fn test_charset_meta_dropped() {
        let html = r#"<head><meta charset="utf-8"></head>"#;
        assert!(extract_html(html).meta_tags.is_empty());
    }

    #[test]
    fn test_description_meta_kept() {
        let html = r#"<head><meta charset="utf-8"><meta name="description" content="x"></head>"#;
        let tags = extract_html(html).meta_tags;
        assert_eq!(
            tags,
            vec![MetaTag {
                name: Some("description".to_string()),
                property: None,
                content: Some("x".to_string()),
            }]
        );
    }

    #[test]
    fn test_meta_document_order_and_empty_values() {
        let html = r#"<head>
            <meta property="og:title" content="OG">
            <meta name="" content="">
            <meta name="viewport" content="width=device-width">
        </head>"#;
        let tags = extract_html(html).meta_tags;
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].property.as_deref(), Some("og:title"));
        assert_eq!(tags[1].name.as_deref(), Some("viewport"));
    }

    #[test]
    fn test_invalid_json_ld_dropped() {
        let html = r#"<head>
            <script type="application/ld+json">{"@type": "Article", "headline": "Hi"}</script>
            <script type="application/ld+json">{"@type": "Broken",</script>
        </head>"#;
        let blocks = extract_html(html).json_ld;
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].parsed, json!({ "@type": "Article", "headline": "Hi" }));
        assert_eq!(blocks[0].raw, r#"{"@type": "Article", "headline": "Hi"}"#);
    }

    #[test]
    fn test_json_ld_quoting_and_attribute_order() {
        let html = r#"
            <script id="a" type='application/ld+json' data-x="1">[1, 2]</script>
            <script type="APPLICATION/LD+JSON">{"a": true}</script>
            <script type="application/json">{"not": "ld"}</script>
            <script>var x = 1;</script>
        "#;
        let blocks = extract_html(html).json_ld;
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].parsed, json!([1, 2]));
        assert_eq!(blocks[1].parsed, json!({ "a": true }));
    }

    #[test]
    fn test_visible_text_skips_script_and_style() {
        let html = r#"<html><head><title>T</title><style>p { color: red }</style></head>
            <body><h1> Heading </h1><script>alert("x")</script><p>Para <b>bold</b></p></body></html>"#;
        assert_eq!(extract_html(html).text, "T\nHeading\nPara\nbold");
    }

    #[test]
    fn test_element_text_concatenates() {
        let document = Html::parse_fragment("<h2> Hello <em>big</em> world </h2>");
        let h2 = document.select(&Selector::parse("h2").unwrap()).next().unwrap();
        assert_eq!(element_text(h2), "Hellobigworld");
    }

    #[test]
    fn test_garbage_input_degrades() {
        let extraction = extract_html("<<<not really </html> markup");
        assert!(extraction.title.is_none());
        assert!(extraction.meta_tags.is_empty());
        assert!(!extraction.text.is_empty());
    }

    #[test]
    fn test_deeply_nested_markup() {
        let depth = 20_000;
        let html = format!("{}deep{}", "<div>".repeat(depth), "</div>".repeat(depth));
        let document = Html::parse_document(&html);

        assert_eq!(visible_text(&document), "deep");
        let body = document.select(&Selector::parse("body").unwrap()).next().unwrap();
        assert_eq!(element_text(body), "deep");
    }

    #[test]
    fn test_hidden_tags_nested_inside_text() {
        let html = "<div>a<span>b<script>no</script>c</span><style>x</style>d</div>";
        let document = Html::parse_fragment(html);
        let div = document.select(&Selector::parse("div").unwrap()).next().unwrap();
        assert_eq!(element_text(div), "abcd");
    }

    #[test]
    fn test_deterministic() {
        let html = r#"<title>A</title><meta name="k" content="v"><p>one</p><p>two</p>"#;
        assert_eq!(extract_html(html), extract_html(html));
    }
}
