//! Callout blocks.
//!
//! Obsidian writes admonitions as blockquotes with a bracketed type marker on
//! the first line. The lines that follow belong to the same callout for as
//! long as they keep the `>` prefix:
//!
//! ```text
//! > [!warning] Mind the gap
//! > between the train
//! >
//! > and the platform
//! ```
//!
//! becomes a single block
//!
//! ```text
//! <div class="callout warning"><p>Mind the gap<br>between the train<br><br>and the platform</p></div>
//! ```
//!
//! Accepted markers are `[!word]` (any word, lowercased, with an optional
//! `+`/`-` fold marker after the bracket), a bare `[!]` for a note, and the
//! short marks `[?]`, `[i]`, `[x]` for question, info and warning.
//!
//! A quote line without a marker that is not continuing a callout is a plain
//! blockquote and is emitted on its own with the `blockquote` class. Every
//! block is written on a single line so the Markdown renderer downstream keeps
//! it as one raw HTML block.

use maud::{PreEscaped, html};
use regex::Regex;
use std::sync::LazyLock;

/// Class used for quote lines that carry no type marker.
pub const PLAIN_BLOCKQUOTE_CLASS: &str = "blockquote";

static QUOTE_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*>\s*(?:\[\s*(![A-Za-z][\w-]*|!|\?|i|x)\s*\][+-]?)?(\s*)(.*?)\s*$")
        .expect("valid callout regex")
});

/// One parsed `>` line.
#[derive(Debug, Clone, PartialEq, Eq)]
struct QuoteLine<'a> {
    kind: Option<String>,
    content: &'a str,
}

fn parse_quote_line(line: &str) -> Option<QuoteLine<'_>> {
    let caps = QUOTE_LINE_RE.captures(line)?;
    let gap = caps.get(2).map_or("", |m| m.as_str());
    let content = caps.get(3).map_or("", |m| m.as_str());
    // `> [!x](url)` is a link at the start of a quote, not a marker. The
    // paren has to touch the bracket.
    if caps.get(1).is_some() && gap.is_empty() && content.starts_with('(') {
        let rest = line.trim_start().trim_start_matches('>').trim_start();
        return Some(QuoteLine {
            kind: None,
            content: rest,
        });
    }
    Some(QuoteLine {
        kind: caps.get(1).map(|m| callout_class(m.as_str())),
        content,
    })
}

/// Map a raw marker (`!warning`, `?`, `i`, ...) to its CSS class.
fn callout_class(marker: &str) -> String {
    match marker {
        "!" => "note".to_string(),
        "?" => "question".to_string(),
        "i" => "info".to_string(),
        "x" => "warning".to_string(),
        word => word.trim_start_matches('!').to_ascii_lowercase(),
    }
}

/// Render one callout block. Content is inserted as-is: it is already
/// link-resolved HTML/Markdown text.
fn render_block(kind: &str, lines: &[&str]) -> String {
    let class = format!("callout {kind}");
    html! {
        div class=(class) {
            p { (PreEscaped(lines.join("<br>"))) }
        }
    }
    .into_string()
}

/// Parser state: idle, or accumulating the lines of an open callout.
#[derive(Debug, Default)]
enum State<'a> {
    #[default]
    Idle,
    InCallout { kind: String, lines: Vec<&'a str> },
}

/// Line-by-line driver holding the state and the output buffer.
#[derive(Debug, Default)]
struct CalloutParser<'a> {
    state: State<'a>,
    out: Vec<String>,
}

impl<'a> CalloutParser<'a> {
    fn feed(&mut self, line: &'a str) {
        let Some(quote) = parse_quote_line(line) else {
            self.flush();
            self.out.push(line.to_string());
            return;
        };

        match quote.kind {
            Some(kind) => {
                self.flush();
                self.state = State::InCallout {
                    kind,
                    lines: vec![quote.content],
                };
            }
            None => match &mut self.state {
                State::InCallout { lines, .. } => lines.push(quote.content),
                State::Idle => {
                    self.out
                        .push(render_block(PLAIN_BLOCKQUOTE_CLASS, &[quote.content]));
                }
            },
        }
    }

    /// Close the open callout, if any, and emit it.
    fn flush(&mut self) {
        if let State::InCallout { kind, lines } = std::mem::take(&mut self.state) {
            self.out.push(render_block(&kind, &lines));
        }
    }

    fn finish(mut self) -> Vec<String> {
        self.flush();
        self.out
    }
}

/// Replace callout and blockquote syntax in `text` with HTML blocks.
///
/// Lines are split on `\n`; lines that are not part of a quote come back
/// unchanged and in order.
pub fn convert_callouts(text: &str) -> String {
    let mut parser = CalloutParser::default();
    for line in text.split('\n') {
        parser.feed(line);
    }
    parser.finish().join("\n")
}
