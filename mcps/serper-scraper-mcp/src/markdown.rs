//! Best-effort HTML to markdown
//!
//! Starts from the page's visible text (see [`crate::extract::visible_text`]) and
//! decorates it by locating each element's text in the whole string and
//! replacing it. Stages run in a fixed order, each on the previous stage's
//! output:
//!
//! 1. headings, `h6` down to `h1` → `### text\n`
//! 2. `strong`/`b` → `**text**`
//! 3. `em`/`i` → `*text*`
//! 4. `li` under `ul` → `* text`
//! 5. `li` under `ol` → `N. text`, one counter for the whole page
//! 6. `a[href]` → `[text](href)`
//!
//! Replacement is by exact string match, so every occurrence of an element's
//! text is rewritten, including occurrences that came from other elements.
//! `<h1>Intro</h1><p>Intro again</p>` turns both into `# Intro`. Reordering
//! the stages changes output when emphasis sits inside headings or lists.

use scraper::{Html, Selector};
use std::sync::LazyLock;

use crate::extract::{element_text, visible_text};

static HEADINGS: LazyLock<[Selector; 6]> = LazyLock::new(|| {
    std::array::from_fn(|i| Selector::parse(&format!("h{}", i + 1)).unwrap())
});
static BOLD: LazyLock<Selector> = LazyLock::new(|| Selector::parse("strong, b").unwrap());
static ITALIC: LazyLock<Selector> = LazyLock::new(|| Selector::parse("em, i").unwrap());
static UNORDERED: LazyLock<Selector> = LazyLock::new(|| Selector::parse("ul").unwrap());
static ORDERED: LazyLock<Selector> = LazyLock::new(|| Selector::parse("ol").unwrap());
static LIST_ITEM: LazyLock<Selector> = LazyLock::new(|| Selector::parse("li").unwrap());
static LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());

/// Render the document as markdown
pub fn render(document: &Html) -> String {
    let mut text = visible_text(document);

    for level in (1..=6).rev() {
        let prefix = "#".repeat(level);
        for heading in document.select(&HEADINGS[level - 1]) {
            let heading_text = element_text(heading);
            text = replace_all(&text, &heading_text, |t| format!("{prefix} {t}\n"));
        }
    }

    for bold in document.select(&BOLD) {
        text = replace_all(&text, &element_text(bold), |t| format!("**{t}**"));
    }

    for italic in document.select(&ITALIC) {
        text = replace_all(&text, &element_text(italic), |t| format!("*{t}*"));
    }

    for list in document.select(&UNORDERED) {
        for item in list.select(&LIST_ITEM) {
            text = replace_all(&text, &element_text(item), |t| format!("* {t}"));
        }
    }

    // Numbering continues across every <ol> on the page.
    let mut counter = 1;
    for list in document.select(&ORDERED) {
        for item in list.select(&LIST_ITEM) {
            let item_text = element_text(item);
            if item_text.is_empty() {
                continue;
            }
            text = text.replace(&item_text, &format!("{counter}. {item_text}"));
            counter += 1;
        }
    }

    for link in document.select(&LINK) {
        let href = link.value().attr("href").unwrap_or_default();
        text = replace_all(&text, &element_text(link), |t| format!("[{t}]({href})"));
    }

    text
}

/// Parse and render in one step
pub fn render_html(html: &str) -> String {
    render(&Html::parse_document(html))
}

// An empty needle would match between every character.
fn replace_all(text: &str, needle: &str, decorate: impl Fn(&str) -> String) -> String {
    if needle.is_empty() {
        return text.to_string();
    }
    text.replace(needle, &decorate(needle))
}
