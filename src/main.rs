use asset_library::clipboard::SystemClipboard;
use asset_library::config::{self, LibraryConfig};
use asset_library::i18n::Lang;
use asset_library::session::Session;
use asset_library::source::ManifestSource;
use asset_library::{output, render, scan};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "asset-library")]
#[command(about = "Static asset library: image folders → manifest → gallery page")]
#[command(long_about = "\
Static asset library: image folders → manifest → gallery page

Each category is a folder under the project root. Files directly inside a
category form the \"root\" group; each sub-folder forms a named group.

Project structure:

  ./
  ├── library.toml          # Optional config (run 'asset-library gen-config')
  ├── avatars/              # Category
  │   ├── avatar-1.png
  │   └── avatar-2.png
  ├── icons/
  │   ├── logo.svg          # Group \"root\"
  │   └── brands/           # Group \"brands\"
  │       └── github.svg
  ├── photos/               # Missing folders are fine (empty category)
  └── data/manifest.json    # Written by 'scan'

Set RUST_LOG=debug for detailed diagnostics.")]
#[command(version)]
struct Cli {
    /// Project root containing the category folders
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Config file (default: <root>/library.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

/// Flags for commands that render a page.
#[derive(clap::Args, Clone)]
struct RenderArgs {
    /// Manifest file or http(s) URL (default: the configured output path)
    #[arg(long)]
    manifest: Option<ManifestSource>,

    /// Free-text filter applied to every category
    #[arg(long, default_value = "")]
    query: String,

    /// Active group for a category, as CATEGORY=GROUP (repeatable)
    #[arg(long = "group", value_parser = parse_group_selection)]
    groups: Vec<(String, String)>,

    /// Manifest path of an item to show in the preview panel
    #[arg(long)]
    preview: Option<String>,

    /// Interface language (en, zh); overrides site.lang
    #[arg(long)]
    lang: Option<Lang>,

    /// Output HTML file, relative to the root
    #[arg(long, default_value = "dist/index.html")]
    out: PathBuf,
}

#[derive(Subcommand)]
enum Command {
    /// Scan category folders and write the manifest
    Scan,
    /// List manifest items matching a query
    Search {
        /// Matched against "category group filename", case-insensitive
        #[arg(default_value = "")]
        query: String,
        /// Manifest file or http(s) URL (default: the configured output path)
        #[arg(long)]
        manifest: Option<ManifestSource>,
        /// Print matches as JSON
        #[arg(long)]
        json: bool,
    },
    /// Render the gallery page from a manifest
    Render(RenderArgs),
    /// Scan, then render from the fresh manifest
    Build(RenderArgs),
    /// Print (or copy) the direct link for a manifest path
    Link {
        /// Manifest path, e.g. icons/logo.svg
        path: String,
        /// Copy the link to the system clipboard
        #[arg(long)]
        copy: bool,
        /// Manifest file or http(s) URL (default: the configured output path)
        #[arg(long)]
        manifest: Option<ManifestSource>,
    },
    /// Print a stock library.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => config::load_config_file(path)?,
        None => config::load_config(&cli.root)?,
    };

    match cli.command {
        Command::Scan => {
            let built = scan::build_manifest(&cli.root, &config)?;
            output::print_scan_output(&built, &cli.root);
        }
        Command::Search {
            query,
            manifest,
            json,
        } => {
            let source = manifest.unwrap_or_else(|| default_source(&cli.root, &config));
            let session = loaded_session(&config, &source)?;
            let matches = session.index().search(&query);
            if json {
                println!("{}", serde_json::to_string_pretty(&matches)?);
            } else {
                output::print_search_results(&matches);
            }
        }
        Command::Render(args) => {
            render_page(&cli.root, &config, &args)?;
        }
        Command::Build(args) => {
            println!("==> Scanning {}", cli.root.display());
            let built = scan::build_manifest(&cli.root, &config)?;
            output::print_scan_output(&built, &cli.root);

            println!("==> Rendering");
            let args = RenderArgs {
                manifest: args
                    .manifest
                    .or(Some(ManifestSource::File(built.manifest_path))),
                ..args
            };
            render_page(&cli.root, &config, &args)?;
        }
        Command::Link {
            path,
            copy,
            manifest,
        } => {
            let source = manifest.unwrap_or_else(|| default_source(&cli.root, &config));
            let mut session = loaded_session(&config, &source)?;
            if !session.open_preview(&path) {
                return Err(format!("'{path}' is not listed in {source}").into());
            }
            if copy {
                let outcome = session.copy_link(&SystemClipboard);
                println!("{}", output::format_copy_outcome(&outcome));
            } else if let Some(item) = session.view().preview() {
                println!("{}", item.url);
            }
        }
        Command::GenConfig => unreachable!("handled before config loading"),
    }

    Ok(())
}

fn default_source(root: &Path, config: &LibraryConfig) -> ManifestSource {
    ManifestSource::File(root.join(&config.output))
}

/// Load a manifest for a command that cannot work without one.
fn loaded_session(
    config: &LibraryConfig,
    source: &ManifestSource,
) -> Result<Session, Box<dyn std::error::Error>> {
    let mut session = Session::new(&config.site.base_url, &config.categories);
    session.reload(source);
    match session.last_error() {
        Some(err) => Err(format!("cannot load {source}: {err}").into()),
        None => Ok(session),
    }
}

/// Render a page. A failed load still produces a page with a failed status.
fn render_page(
    root: &Path,
    config: &LibraryConfig,
    args: &RenderArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = args
        .manifest
        .clone()
        .unwrap_or_else(|| default_source(root, config));

    let mut site = config.site.clone();
    if let Some(lang) = args.lang {
        site.lang = lang;
    }

    let mut session = Session::new(&site.base_url, &config.categories);
    session.set_query(&args.query);
    for (category, group) in &args.groups {
        session.set_active_group(category, group);
    }
    session.reload(&source);
    if let Some(path) = &args.preview
        && !session.open_preview(path)
    {
        log::warn!("preview item '{path}' is not in the manifest");
    }

    let out = root.join(&args.out);
    render::write_page(render::render_session(&session, &site), &out)?;
    output::print_render_output(&session.page(), session.status(), &out);
    Ok(())
}

fn parse_group_selection(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((category, group)) if !category.is_empty() && !group.is_empty() => {
            Ok((category.to_string(), group.to_string()))
        }
        _ => Err(format!("expected CATEGORY=GROUP, got '{s}'")),
    }
}
