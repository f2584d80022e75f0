//! Wiki-link and embed resolution.
//!
//! Obsidian notes link to each other with `[[target]]` and pull media in with
//! `![[target]]`. Both forms accept an alias after a pipe:
//!
//! ```text
//! [[Recipes]]                 → <a href="Recipes.html">Recipes</a>
//! [[Recipes|my recipes]]      → <a href="Recipes.html">my recipes</a>
//! ![[cat.png]]                → <img src="static/images/cat.png" alt="cat.png">
//! ![[cat.png|a sleepy cat]]   → <img src="static/images/cat.png" alt="a sleepy cat">
//! ```
//!
//! Links are never nested and never span lines. Anything that does not match
//! (a lone `[[`, an empty target, a newline inside the brackets) is left
//! exactly as written. Targets are not checked against the vault: a link to a
//! note that does not exist still becomes an anchor.

use maud::html;
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// URL prefix for embedded media, relative to a generated page.
pub const IMAGES_URL_PREFIX: &str = "static/images/";

static WIKILINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(!)?\[\[([^\]|\n]+)(?:\|([^\]\n]+))?\]\]").expect("valid wikilink regex")
});

/// A single wiki-link occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRef {
    /// `true` for `![[...]]` media embeds.
    pub embed: bool,
    pub target: String,
    pub alias: Option<String>,
}

impl LinkRef {
    fn from_captures(caps: &Captures<'_>) -> Self {
        let alias = caps
            .get(3)
            .map(|m| m.as_str().trim().to_string())
            .filter(|a| !a.is_empty());
        Self {
            embed: caps.get(1).is_some(),
            target: caps[2].trim().to_string(),
            alias,
        }
    }

    /// Text shown to the reader: the alias when present, else the target.
    pub fn label(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.target)
    }

    /// Render as an `<img>` (embeds) or `<a>` (plain links).
    pub fn to_html(&self) -> String {
        let markup = if self.embed {
            html! { img src={ (IMAGES_URL_PREFIX) (self.target) } alt=(self.label()); }
        } else {
            html! { a href={ (self.target) ".html" } { (self.label()) } }
        };
        markup.into_string()
    }
}

/// Replace every wiki-link and embed in `text` with its HTML form.
pub fn resolve_links(text: &str) -> String {
    WIKILINK_RE
        .replace_all(text, |caps: &Captures<'_>| {
            let link = LinkRef::from_captures(caps);
            if link.target.is_empty() {
                // Whitespace-only target: keep the original text.
                return caps[0].to_string();
            }
            link.to_html()
        })
        .into_owned()
}

/// All well-formed wiki-links in `text`, in order of appearance.
pub fn references(text: &str) -> Vec<LinkRef> {
    WIKILINK_RE
        .captures_iter(text)
        .map(|caps| LinkRef::from_captures(&caps))
        .filter(|link| !link.target.is_empty())
        .collect()
}
