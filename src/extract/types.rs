//! Extractor types and traits
//!
//! Defines the extraction seam and the versioned rule sets the HTML
//! extractor runs with.

use crate::error::Result;
use crate::types::Page;
use serde::{Deserialize, Serialize};

/// Turns a raw page body into a [`Page`]
pub trait ResultExtractor: Send + Sync {
    /// Extract records, total count and navigation links from a page body.
    ///
    /// Missing optional fields must default rather than fail.
    fn extract(&self, body: &str) -> Result<Page>;
}

/// Revision of the provider markup a rule set targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleVersion {
    /// Older markup: footer links found by position, links left relative
    Legacy,
    /// Current markup: footer links found by text, links made absolute
    #[default]
    Current,
}

/// How citation and related-results links are located in a result footer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FooterRule {
    /// Match footer links by their leading text
    ByText {
        /// Text starting the citation link, followed by the count
        cited_prefix: String,
        /// Text starting the related-results link
        related_prefix: String,
    },
    /// Take footer links at fixed positions.
    ///
    /// The link at `cited` always supplies the citation URL; its count is
    /// only read when the text carries `cited_prefix`. The link at `related`
    /// is only used when its text carries `related_prefix`.
    ByIndex {
        /// Position of the citation link
        cited: usize,
        /// Position of the related-results link
        related: usize,
        /// Text starting the citation link, followed by the count
        cited_prefix: String,
        /// Text starting the related-results link
        related_prefix: String,
    },
}

/// CSS selectors and behaviour switches for one markup revision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRules {
    /// Markup revision
    pub version: RuleVersion,
    /// One element per search result
    pub record: String,
    /// Title heading inside a result
    pub title: String,
    /// Title link inside a result
    pub title_link: String,
    /// Author/venue line inside a result
    pub authors: String,
    /// Snippet inside a result
    pub description: String,
    /// Footer holding citation and related links
    pub footer: String,
    /// Full-text document link inside a result
    pub pdf_link: String,
    /// Element carrying the "About N results" text
    pub result_count: String,
    /// Icon inside the next-page link
    pub nav_next_icon: String,
    /// Icon inside the previous-page link
    pub nav_previous_icon: String,
    /// Footer link lookup
    pub footer_rule: FooterRule,
    /// Drop `span` markers such as `[PDF]` from titles
    pub strip_title_markers: bool,
    /// Resolve relative links against the link base
    pub absolute_links: bool,
}

const CITED_PREFIX: &str = "Cited by ";
const RELATED_PREFIX: &str = "Related articles";

impl ExtractionRules {
    /// Rules for a markup revision
    pub fn for_version(version: RuleVersion) -> Self {
        match version {
            RuleVersion::Legacy => Self::legacy(),
            RuleVersion::Current => Self::current(),
        }
    }

    /// Rules for the current markup
    pub fn current() -> Self {
        Self {
            version: RuleVersion::Current,
            record: "div.gs_r".to_string(),
            title: "h3".to_string(),
            title_link: "h3 a".to_string(),
            authors: ".gs_a".to_string(),
            description: ".gs_rs".to_string(),
            footer: ".gs_ri .gs_fl".to_string(),
            pdf_link: ".gs_ggs a, .gs_or_ggsm a".to_string(),
            result_count: "#gs_ab_md".to_string(),
            nav_next_icon: ".gs_ico_nav_next".to_string(),
            nav_previous_icon: ".gs_ico_nav_previous".to_string(),
            footer_rule: FooterRule::ByText {
                cited_prefix: CITED_PREFIX.to_string(),
                related_prefix: RELATED_PREFIX.to_string(),
            },
            strip_title_markers: true,
            absolute_links: true,
        }
    }

    /// Rules for the older markup
    pub fn legacy() -> Self {
        Self {
            version: RuleVersion::Legacy,
            footer_rule: FooterRule::ByIndex {
                cited: 0,
                related: 1,
                cited_prefix: CITED_PREFIX.to_string(),
                related_prefix: RELATED_PREFIX.to_string(),
            },
            strip_title_markers: false,
            absolute_links: false,
            ..Self::current()
        }
    }
}

impl Default for ExtractionRules {
    fn default() -> Self {
        Self::current()
    }
}
