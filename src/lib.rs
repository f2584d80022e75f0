//! # vault-site
//!
//! Turns a folder of Obsidian-flavored Markdown notes into a static site that a
//! small web app can serve as is: one HTML page per note, an index page, and
//! the vault's images and attachments copied next to them.
//!
//! ```text
//! pages/                     app_frontend/
//! ├── recipes.md        →    ├── templates/recipes.html
//! ├── cat.png           →    ├── static/images/cat.png
//! ├── taxes-2024.pdf    →    ├── static/extra_files/taxes-2024.pdf
//! │                          ├── templates/index.html
//! │                          ├── static/style.css
//! └── config.toml            └── manifest.json
//! ```
//!
//! # Note Dialect
//!
//! Beyond CommonMark (plus tables, strikethrough and task lists), notes may use:
//!
//! - `[[target]]` and `[[target|label]]` wiki-links, rendered as links to
//!   `target.html`
//! - `![[file.png]]` embeds, rendered as images from `static/images/`
//! - `> [!kind]` callouts, rendered as `<div class="callout kind">`
//! - `$...$` and `$$...$$` math, typeset in the browser by KaTeX
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`links`] | Wiki-link and embed rewriting |
//! | [`callouts`] | Quote-block state machine producing callout divs |
//! | [`code`] | Backtick code spans and fenced blocks to styled HTML |
//! | [`compile`] | The per-note pipeline, Markdown rendering included |
//! | [`template`] | Maud page shell, navigation bar and index body |
//! | [`scan`] | Vault listing and classification |
//! | [`naming`] | Filename to title and output filename |
//! | [`config`] | `config.toml` loading, validation and stock defaults |
//! | [`assets`] | Stylesheet, image and attachment copying |
//! | [`site`] | Build orchestration, index and manifest |
//! | [`types`] | Types shared across modules (`PageEntry`, `Document`) |
//! | [`output`] | Console formatting for `build` and `check` |
//!
//! # Failure Model
//!
//! A build fails outright only when the vault is missing, the config is
//! invalid, or the output tree cannot be created. A note that cannot be read
//! or written is reported and left off the index; the rest of the site is
//! still generated.

pub mod assets;
pub mod callouts;
pub mod code;
pub mod compile;
pub mod config;
pub mod links;
pub mod naming;
pub mod output;
pub mod scan;
pub mod site;
pub mod template;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
