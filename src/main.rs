use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use vault_site::{config, output, scan, site, template};

fn version_string() -> &'static str {
    let describe = env!("VAULT_SITE_DESCRIBE");
    if describe.is_empty() {
        env!("CARGO_PKG_VERSION")
    } else {
        describe
    }
}

#[derive(Parser)]
#[command(name = "vault-site")]
#[command(about = "Turn an Obsidian vault into a static HTML site")]
#[command(long_about = "\
Turn an Obsidian vault into a static HTML site

Every top-level file of the vault is picked up. Notes become pages, images
and other files are copied next to them.

Vault structure:

  pages/
  ├── config.toml        # Site config (optional)
  ├── recipes.md         # Note  → templates/recipes.html
  ├── cat.png            # Image → static/images/cat.png
  ├── taxes-2024.pdf     # Other → static/extra_files/taxes-2024.pdf
  └── .obsidian/         # Hidden files and subdirectories are skipped

Supported in notes: [[wiki-links]], [[target|aliases]], ![[embeds.png]],
> [!note] callouts, fenced code, and $math$ rendered with KaTeX.

Set RUST_LOG=debug for diagnostics.
Run 'vault-site gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Vault directory
    #[arg(long, default_value = "pages", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "app_frontend", global = true)]
    output: PathBuf,

    /// Stylesheet copied to static/style.css
    #[arg(long, default_value = "templates/style.css", global = true)]
    stylesheet: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Generate the site (the default)
    Build,
    /// List what a build would pick up, without writing anything
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
    /// Print the stock stylesheet
    GenStyle,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command.unwrap_or(Command::Build) {
        Command::Build => {
            let site_config = site::prepare(&cli.source)?;
            let paths = site::BuildPaths {
                source: cli.source,
                output: cli.output,
                stylesheet: cli.stylesheet,
            };
            site::build(&paths, &site_config, &mut |event| {
                output::print_build_event(&event)
            })?;
        }
        Command::Check => {
            let site_config = site::prepare(&cli.source)?;
            let inventory = scan::scan(&cli.source, &site_config)?;
            let summaries = site::survey(&inventory);
            output::print_check_output(&inventory, &summaries);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::GenStyle => {
            print!("{}", template::STOCK_STYLESHEET);
        }
    }

    Ok(())
}
