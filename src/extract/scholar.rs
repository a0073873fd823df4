//! Google Scholar result extractor
//!
//! Parses rendered result pages with `scraper`. Every optional field
//! defaults to empty/zero when the markup lacks it, so a page with odd
//! results still yields the results it can.

use super::types::{ExtractionRules, FooterRule, ResultExtractor};
use crate::error::{Error, Result};
use crate::types::{Author, Page, Record};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

/// Base that relative result links are resolved against
pub const DEFAULT_LINK_BASE: &str = "https://scholar.google.com";

/// Name used for authors elided from the author line
pub const ET_AL: &str = "et al.";

/// Ways an elided author list shows up in serialized markup
const ELLIPSES: [&str; 3] = ["\u{2026}", "&#x2026;", "&hellip;"];

/// Separator between the author list and the venue on the author line
const VENUE_SEPARATOR: &str = " - ";

/// Regex for "About 1,234 results"; a number glued to a digit or comma is
/// a malformed separator and is not accepted
static RESULT_COUNT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^\d,])(\d{1,3}(?:,\d{3})+|\d+)(?:\.\d+)?\s+results?\b").unwrap()
});

static ANCHOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());

/// Parse the provider's result count text.
///
/// Returns `None` when the text is absent, non-numeric, or uses malformed
/// thousands separators.
pub fn parse_result_count(text: &str) -> Option<u64> {
    let caps = RESULT_COUNT_REGEX.captures(text)?;
    caps.get(1)?.as_str().replace(',', "").parse().ok()
}

#[derive(Debug, Clone)]
struct Selectors {
    record: Selector,
    title: Selector,
    title_link: Selector,
    authors: Selector,
    description: Selector,
    footer: Selector,
    pdf_link: Selector,
    result_count: Selector,
    nav_next_icon: Selector,
    nav_previous_icon: Selector,
}

impl Selectors {
    fn compile(rules: &ExtractionRules) -> Result<Self> {
        Ok(Self {
            record: parse_selector(&rules.record)?,
            title: parse_selector(&rules.title)?,
            title_link: parse_selector(&rules.title_link)?,
            authors: parse_selector(&rules.authors)?,
            description: parse_selector(&rules.description)?,
            footer: parse_selector(&rules.footer)?,
            pdf_link: parse_selector(&rules.pdf_link)?,
            result_count: parse_selector(&rules.result_count)?,
            nav_next_icon: parse_selector(&rules.nav_next_icon)?,
            nav_previous_icon: parse_selector(&rules.nav_previous_icon)?,
        })
    }
}

fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| Error::extraction(format!("invalid selector '{css}': {e:?}")))
}

/// HTML extractor for Google Scholar result pages
#[derive(Debug, Clone)]
pub struct ScholarExtractor {
    rules: ExtractionRules,
    link_base: Url,
    selectors: Selectors,
}

impl ScholarExtractor {
    /// Create an extractor with the current rules
    pub fn new() -> Result<Self> {
        Self::with_rules(ExtractionRules::current(), DEFAULT_LINK_BASE)
    }

    /// Create an extractor with custom rules and link base
    pub fn with_rules(rules: ExtractionRules, link_base: &str) -> Result<Self> {
        let selectors = Selectors::compile(&rules)?;
        Ok(Self {
            rules,
            link_base: Url::parse(link_base)?,
            selectors,
        })
    }

    /// Rules in use
    pub fn rules(&self) -> &ExtractionRules {
        &self.rules
    }

    fn extract_record(&self, element: ElementRef<'_>) -> Option<Record> {
        let heading = element.select(&self.selectors.title).next()?;
        let title = if self.rules.strip_title_markers {
            let mut text = String::new();
            text_without_spans(heading, &mut text);
            collapse(&text)
        } else {
            text_of(heading)
        };

        let mut record = Record {
            title,
            url: element
                .select(&self.selectors.title_link)
                .next()
                .and_then(|link| self.href(link))
                .unwrap_or_default(),
            authors: element
                .select(&self.selectors.authors)
                .next()
                .map(|line| parse_authors(&line.inner_html(), |href| self.resolve(href)))
                .unwrap_or_default(),
            description: element
                .select(&self.selectors.description)
                .next()
                .map(text_of)
                .unwrap_or_default(),
            pdf_url: element
                .select(&self.selectors.pdf_link)
                .next()
                .and_then(|link| self.href(link)),
            ..Default::default()
        };

        self.apply_footer(element, &mut record);
        Some(record)
    }

    fn apply_footer(&self, element: ElementRef<'_>, record: &mut Record) {
        let Some(footer) = element.select(&self.selectors.footer).next() else {
            return;
        };
        let links: Vec<ElementRef<'_>> = footer.select(&ANCHOR).collect();

        match &self.rules.footer_rule {
            FooterRule::ByText {
                cited_prefix,
                related_prefix,
            } => {
                for link in &links {
                    let text = text_of(*link);
                    if let Some(count) = text.strip_prefix(cited_prefix.as_str()) {
                        record.cited_count = parse_count(count);
                        record.cited_url = self.href(*link);
                    } else if text.starts_with(related_prefix.as_str()) {
                        record.related_url = self.href(*link);
                    }
                }
            }
            FooterRule::ByIndex {
                cited,
                related,
                cited_prefix,
                related_prefix,
            } => {
                if let Some(link) = links.get(*cited) {
                    let text = text_of(*link);
                    if let Some(pos) = text.find(cited_prefix.as_str()) {
                        record.cited_count = parse_count(&text[pos + cited_prefix.len()..]);
                    }
                    record.cited_url = self.href(*link);
                }
                if let Some(link) = links.get(*related) {
                    if text_of(*link).contains(related_prefix.as_str()) {
                        record.related_url = self.href(*link);
                    }
                }
            }
        }
    }

    /// Navigation links are always absolute so they can be fetched directly
    fn nav_link(&self, document: &Html, icon: &Selector) -> Option<String> {
        let icon = document.select(icon).next()?;
        let anchor = icon.parent().and_then(ElementRef::wrap)?;
        let href = anchor.value().attr("href").map(str::trim)?;
        if href.is_empty() {
            return None;
        }
        self.link_base.join(href).ok().map(String::from)
    }

    fn href(&self, link: ElementRef<'_>) -> Option<String> {
        link.value()
            .attr("href")
            .map(str::trim)
            .filter(|href| !href.is_empty())
            .map(|href| self.resolve(href))
    }

    fn resolve(&self, href: &str) -> String {
        if !self.rules.absolute_links {
            return href.to_string();
        }
        self.link_base
            .join(href)
            .map_or_else(|_| href.to_string(), String::from)
    }
}

impl ResultExtractor for ScholarExtractor {
    fn extract(&self, body: &str) -> Result<Page> {
        let document = Html::parse_document(body);

        let records: Vec<Record> = document
            .select(&self.selectors.record)
            .filter_map(|element| self.extract_record(element))
            .collect();

        let total_results = document
            .select(&self.selectors.result_count)
            .next()
            .and_then(|element| parse_result_count(&text_of(element)));
        if total_results.is_none() {
            debug!("No parseable result count, treating page as complete");
        }

        let page = Page {
            records,
            total_results,
            next_url: self.nav_link(&document, &self.selectors.nav_next_icon),
            prev_url: self.nav_link(&document, &self.selectors.nav_previous_icon),
        };

        debug!(
            records = page.records.len(),
            total = ?page.total_results,
            has_next = page.next_url.is_some(),
            has_prev = page.prev_url.is_some(),
            "Extracted page"
        );
        Ok(page)
    }
}

/// Parse the author line's HTML into authors.
///
/// The line reads `A, B, C - Venue, Year - host`; only the part before the
/// first separator names authors. A leading or trailing ellipsis marks
/// elided authors and becomes an "et al." entry at that end.
pub(crate) fn parse_authors(html: &str, resolve: impl Fn(&str) -> String) -> Vec<Author> {
    let normalized = html.replace("&nbsp;", " ").replace('\u{a0}', " ");
    let mut names = normalized
        .split(VENUE_SEPARATOR)
        .next()
        .unwrap_or_default()
        .trim();

    let mut elided_tail = false;
    if let Some(rest) = ELLIPSES.iter().find_map(|e| names.strip_suffix(*e)) {
        names = rest.trim_end();
        elided_tail = true;
    }

    let mut elided_head = false;
    if let Some(rest) = ELLIPSES.iter().find_map(|e| names.strip_prefix(*e)) {
        names = rest.trim_start_matches([',', ' ']);
        elided_head = true;
    }

    let mut authors: Vec<Author> = names
        .split(", ")
        .filter_map(|fragment| parse_author(fragment, &resolve))
        .collect();

    if elided_head {
        authors.insert(0, Author::new(ET_AL));
    }
    if elided_tail {
        authors.push(Author::new(ET_AL));
    }
    authors
}

fn parse_author(fragment: &str, resolve: &impl Fn(&str) -> String) -> Option<Author> {
    let html = Html::parse_fragment(fragment);
    let author = match html.select(&ANCHOR).next() {
        Some(link) => Author {
            name: text_of(link),
            url: link.value().attr("href").map(resolve).unwrap_or_default(),
        },
        None => Author::new(collapse(&html.root_element().text().collect::<String>())),
    };
    (!author.name.is_empty()).then_some(author)
}

/// Digits at the start of `text`, ignoring thousands separators
fn parse_count(text: &str) -> u64 {
    text.trim()
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == ',')
        .filter(char::is_ascii_digit)
        .collect::<String>()
        .parse()
        .unwrap_or(0)
}

fn text_of(element: ElementRef<'_>) -> String {
    collapse(&element.text().collect::<String>())
}

fn text_without_spans(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child) = ElementRef::wrap(child) {
            if child.value().name() != "span" {
                text_without_spans(child, out);
            }
        }
    }
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
