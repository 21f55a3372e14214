use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::path::PathBuf;
use tokio::sync::mpsc;
use url::Url;

mod app;
mod ui;

use app::{App, AppEvent};
use blogfeed::config::Config;
use blogfeed::controller::deeplink::{sanitize_slug, slug_from_url};
use blogfeed::controller::mode::PageMode;
use blogfeed::controller::FeedController;
use blogfeed::feed::{build_client, Fetcher};
use blogfeed::render::html::HtmlPort;
use blogfeed::template::PageTemplate;

/// Get the default config file path (~/.config/blogfeed/config.toml)
fn default_config_path() -> Option<PathBuf> {
    let home = std::env::var_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("blogfeed")
            .join("config.toml"),
    )
}

#[derive(Parser, Debug)]
#[command(
    name = "blogfeed",
    version,
    about = "Fetch, filter and paginate a blog's article feed"
)]
struct Cli {
    /// Config file (default: ~/.config/blogfeed/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the article endpoint
    #[arg(long, global = true, value_name = "URL")]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the feed as HTML, into a page template or as bare fragments
    Render(RenderArgs),
    /// Browse the feed in the terminal
    Browse(BrowseArgs),
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum ModeArg {
    /// Pick from the template's containers (list when there is no template)
    Auto,
    List,
    Preview,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// HTML page containing `blog-articles` or `home-articles`
    #[arg(long, value_name = "FILE")]
    template: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = ModeArg::Auto)]
    mode: ModeArg,

    /// Tag filter (substring match)
    #[arg(long)]
    tag: Option<String>,

    /// Case-insensitive search over title, content and summary
    #[arg(long)]
    search: Option<String>,

    /// Page to render (clamped to the available pages)
    #[arg(long)]
    page: Option<usize>,

    /// Deep-link slug
    #[arg(long, conflicts_with = "link")]
    slug: Option<String>,

    /// Page address carrying a `?slug=` or `?page=` parameter
    #[arg(long, value_name = "URL")]
    link: Option<String>,

    /// Expand this article in the list
    #[arg(long, value_name = "SLUG")]
    expand: Option<String>,

    /// Write the result here instead of stdout
    #[arg(long, short, value_name = "FILE")]
    output: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
struct BrowseArgs {
    #[arg(long)]
    tag: Option<String>,

    #[arg(long)]
    search: Option<String>,

    /// Open with this article expanded
    #[arg(long)]
    slug: Option<String>,
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match cli.config.clone().or_else(default_config_path) {
        Some(path) => Config::load(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(endpoint) = &cli.endpoint {
        config.endpoint = endpoint.clone();
    }
    Ok(config)
}

fn build_fetcher(config: &Config) -> Result<Fetcher> {
    let endpoint = config.endpoint_url().context("Invalid endpoint")?;
    let client = build_client().context("Failed to create HTTP client")?;
    Ok(Fetcher::new(client, endpoint, config.timeout()))
}

/// Sanitized deep-link slug from `--slug` or `--link`.
fn requested_slug(slug: Option<&str>, link: Option<&str>) -> Result<Option<String>> {
    if let Some(raw) = slug {
        return Ok(sanitize_slug(raw));
    }
    match link {
        Some(link) => {
            let url = Url::parse(link).with_context(|| format!("Invalid link: {}", link))?;
            Ok(slug_from_url(&url))
        }
        None => Ok(None),
    }
}

/// Page number from a `?page=` parameter in `--link`.
fn page_from_link(link: &str) -> Option<usize> {
    let url = Url::parse(link).ok()?;
    let (_, value) = url.query_pairs().find(|(key, _)| key == "page")?;
    value.parse().ok()
}

async fn run_render(config: &Config, args: RenderArgs) -> Result<()> {
    let mut template = args
        .template
        .as_deref()
        .map(PageTemplate::load)
        .transpose()
        .context("Failed to load template")?;

    let mode = match (args.mode, &template) {
        (ModeArg::Auto, Some(page)) => PageMode::select(page, config.preview_count()),
        (ModeArg::Auto, None) | (ModeArg::List, _) => PageMode::List,
        (ModeArg::Preview, _) => PageMode::Preview {
            count: config.preview_count(),
        },
    };
    tracing::debug!(?mode, "Selected page mode");

    let mut controller = FeedController::new(config.feed_settings(), mode);
    controller.set_filter(
        args.tag.as_deref().unwrap_or(""),
        args.search.as_deref().unwrap_or(""),
    );
    if let Some(slug) = requested_slug(args.slug.as_deref(), args.link.as_deref())? {
        controller.open_deep_link(slug);
    }

    if controller.begin_load() {
        let fetcher = build_fetcher(config)?;
        let result = fetcher.fetch_articles().await;
        if let Ok(parsed) = &result {
            tracing::info!(
                articles = parsed.articles.len(),
                skipped = parsed.skipped,
                "Fetched articles"
            );
        }
        controller.finish_load(result);
    } else {
        tracing::warn!("Template has no feed container, leaving it unchanged");
    }

    if let Some(page) = args
        .page
        .or_else(|| args.link.as_deref().and_then(page_from_link))
    {
        controller.go_to_page(page);
    }
    if let Some(slug) = args.expand.as_deref().and_then(sanitize_slug) {
        if !controller.accordion().is_expanded(&slug) {
            controller.toggle(&slug);
        }
    }

    let mut port = match config.site().context("Invalid site_url")? {
        Some(site) => HtmlPort::with_site(site),
        None => HtmlPort::new(),
    };
    controller.render(&mut port);

    let output = match template.as_mut() {
        Some(page) => {
            page.fill(mode, &port);
            page.as_str().to_string()
        }
        None => port.fragments(),
    };

    match &args.output {
        Some(path) => std::fs::write(path, output)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(output.as_bytes())
                .context("Failed to write to stdout")?;
        }
    }
    Ok(())
}

async fn run_browse(config: &Config, args: BrowseArgs) -> Result<()> {
    let fetcher = build_fetcher(config)?;
    let site = config.site().context("Invalid site_url")?;

    let mut controller = FeedController::new(config.feed_settings(), PageMode::List);
    controller.set_filter(
        args.tag.as_deref().unwrap_or(""),
        args.search.as_deref().unwrap_or(""),
    );
    if let Some(slug) = args.slug.as_deref().and_then(sanitize_slug) {
        controller.open_deep_link(slug);
    }

    let mut app = App::new(controller, fetcher, site);
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(8);
    ui::run(&mut app, event_tx, event_rx).await
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut cli = Cli::parse();
    let config = load_config(&cli)?;
    config.endpoint_url().context("Invalid endpoint")?;

    match cli.command.take() {
        Some(Command::Render(args)) => run_render(&config, args).await,
        Some(Command::Browse(args)) => run_browse(&config, args).await,
        None => run_browse(&config, BrowseArgs::default()).await,
    }
}
