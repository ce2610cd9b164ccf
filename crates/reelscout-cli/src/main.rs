//! reelscout - browse and search TMDB movies, TV shows and people.

/// Application configuration (TOML).
mod config;
/// Terminal UI components.
mod tui;

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

use crate::config::{AppConfig, TmdbConfig, TmdbCredentials, resolve_config_path};
use reelscout_api::tmdb::{
    Feed, ImageSize, MediaItem, MediaType, Route, TmdbApi, TmdbClient, TmdbCredits, image_url,
};
use reelscout_browse::{
    ListStatus, MediaDetails, PagedList, SearchSource, TmdbCatalog, TypeaheadSearch,
};

/// Cast entries shown by `details`.
const CAST_LIMIT: usize = 10;

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Write logs to this file instead of the terminal.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Load pages of a feed (e.g. "movie/popular", "trending/all/week").
    List(ListArgs),
    /// Search movies, TV shows and people.
    Search(SearchArgs),
    /// Show a movie, TV show or person with credits.
    Details(DetailsArgs),
    /// Show the episodes of a TV season.
    Season(SeasonArgs),
    /// List genre IDs for `list discover/... --genre`.
    Genres(GenresArgs),
    /// Resolve an image path to a full URL.
    Image(ImageArgs),
    /// Browse feeds in the terminal.
    Browse(BrowseArgs),
    /// Generate shell completions.
    Completions(CompletionsArgs),
    /// Show or initialise the config file.
    Config(ConfigCommand),
}

/// Arguments for the `list` subcommand.
#[derive(clap::Args)]
struct ListArgs {
    /// Feed path: movie/{popular,top_rated,now_playing,upcoming},
    /// tv/{popular,top_rated,on_the_air,airing_today}, person/popular,
    /// trending/{all,movie,tv,person}/{day,week}, discover/{movie,tv}.
    feed: String,

    /// Number of pages to load.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=500))]
    pages: u32,

    /// Sort order for discover feeds (e.g. "vote_average.desc").
    #[arg(long)]
    sort: Option<String>,

    /// Genre ID filter for discover feeds.
    #[arg(long)]
    genre: Option<u32>,
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Search query.
    query: String,

    /// Maximum number of results to print.
    #[arg(long, default_value_t = 20)]
    limit: usize,
}

/// Arguments for the `details` subcommand.
#[derive(clap::Args)]
struct DetailsArgs {
    /// Media type: movie, tv or person.
    media: String,

    /// TMDB ID.
    id: u64,
}

/// Arguments for the `season` subcommand.
#[derive(clap::Args)]
struct SeasonArgs {
    /// TMDB TV series ID.
    tv_id: u64,

    /// Season number.
    season: u32,
}

/// Arguments for the `genres` subcommand.
#[derive(clap::Args)]
struct GenresArgs {
    /// Media type: movie or tv.
    media: String,
}

/// Arguments for the `image` subcommand.
#[derive(clap::Args)]
struct ImageArgs {
    /// Image path as returned by the API (e.g. "/abc.jpg").
    path: String,

    /// Size bucket: w92, w154, w185, w342, w500, w780, h632, original.
    #[arg(long, default_value = "w342")]
    size: String,
}

/// Arguments for the `browse` subcommand.
#[derive(clap::Args)]
struct BrowseArgs {
    /// Feed to open first. Added as a tab if not configured.
    #[arg(long)]
    feed: Option<String>,
}

/// Arguments for the `completions` subcommand.
#[derive(clap::Args)]
struct CompletionsArgs {
    /// Target shell.
    shell: Shell,
}

/// Arguments for the `config` subcommand.
#[derive(clap::Args)]
struct ConfigCommand {
    /// Config subcommand to run.
    #[command(subcommand)]
    command: ConfigSubcommands,
}

/// Available config subcommands.
#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Print the effective config (secrets masked).
    Show,
    /// Write the default config file.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

/// Builds a `TmdbClient` from the environment and config.
///
/// # Errors
///
/// Returns an error if no credentials are available, the base URL is
/// invalid, or the client fails to build.
#[instrument(skip_all)]
fn build_tmdb_client(config: &TmdbConfig) -> Result<TmdbClient> {
    let credentials = config.credentials(
        std::env::var("TMDB_API_TOKEN").ok(),
        std::env::var("TMDB_API_KEY").ok(),
    )?;

    let mut builder = TmdbClient::builder()
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .language(&config.language)
        .include_adult(config.include_adult);
    builder = match credentials {
        TmdbCredentials::Token(token) => builder.api_token(token),
        TmdbCredentials::ApiKey(key) => builder.api_key(key),
    };
    if let Some(region) = &config.region {
        builder = builder.region(region);
    }
    if let Some(base_url) = &config.base_url {
        let url = Url::parse(base_url).with_context(|| format!("invalid base_url: {base_url}"))?;
        builder = builder.base_url(url);
    }

    builder.build().context("failed to build TMDB client")
}

/// Parses the `list` feed and applies discover filters.
fn parse_list_feed(args: &ListArgs) -> Result<Feed> {
    let mut feed: Feed = args
        .feed
        .parse()
        .with_context(|| format!("invalid feed: {}", args.feed))?;

    if args.sort.is_some() || args.genre.is_some() {
        let Feed::Discover(discover) = &mut feed else {
            bail!("--sort and --genre apply to discover feeds only");
        };
        if let Some(sort) = &args.sort {
            discover.sort_by.clone_from(sort);
        }
        if let Some(genre) = args.genre {
            discover.genre = Some(genre);
        }
    }

    Ok(feed)
}

/// Prints media items as a tab-separated table.
fn print_items(items: &[MediaItem]) {
    tracing::info!("Type\tID\tYear\tTitle");
    for item in items {
        tracing::info!(
            "{}\t{}\t{}\t{}",
            item.media_type,
            item.id,
            item.year()
                .map_or_else(|| String::from("-"), |y| y.to_string()),
            item.title,
        );
    }
}

/// Runs the `list` subcommand.
///
/// # Errors
///
/// Returns an error if the feed is invalid, the client fails to build, or
/// a page request fails.
#[instrument(skip_all)]
async fn run_list(args: &ListArgs, config: &AppConfig) -> Result<()> {
    let feed = parse_list_feed(args)?;
    let catalog = TmdbCatalog::new(build_tmdb_client(&config.tmdb)?);

    let mut list =
        PagedList::new(feed.clone()).with_page_ceiling(config.browse.list_page_ceiling());
    let mut next = Some(list.reset(feed.clone()));
    let mut loaded: u32 = 0;
    while let Some(ticket) = next.take() {
        list.drive(&catalog, ticket).await;
        loaded = loaded.saturating_add(1);
        if loaded < args.pages {
            next = list.load_next();
        }
    }

    if let Some(error) = &list.state().error {
        bail!("TMDB {feed} request failed: {error}");
    }

    print_items(list.items());
    tracing::info!(
        "{} items, {} pages, status: {}",
        list.items().len(),
        list.state().page,
        list.status()
    );
    if list.status() == ListStatus::Idle {
        tracing::info!("More pages available (--pages {}).", loaded.saturating_add(1));
    }

    Ok(())
}

/// Runs the `search` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the request fails.
#[instrument(skip_all)]
async fn run_search(args: &SearchArgs, config: &AppConfig) -> Result<()> {
    let mut search = TypeaheadSearch::new(Duration::ZERO);
    let now = Instant::now();
    search.input(&args.query, now);
    let Some(ticket) = search.poll(now) else {
        tracing::info!("Empty query, nothing to search.");
        return Ok(());
    };

    let catalog = TmdbCatalog::new(build_tmdb_client(&config.tmdb)?);
    let results = catalog
        .search(ticket.query())
        .await
        .context("TMDB search/multi request failed")?;
    search.complete(&ticket, Ok(results));

    let results = search.results().unwrap_or_default();
    if results.is_empty() {
        tracing::info!("No results for \"{}\".", ticket.query());
        return Ok(());
    }
    tracing::info!("Results: {}", results.len());
    print_items(results.get(..args.limit.min(results.len())).unwrap_or_default());

    Ok(())
}

/// Prints the leading cast and the directors/creators of a credit list.
fn print_credits(credits: &TmdbCredits) {
    if !credits.cast.is_empty() {
        tracing::info!("Cast:");
    }
    for cast in credits.cast.iter().take(CAST_LIMIT) {
        tracing::info!(
            "  {} as {}",
            cast.name
                .as_deref()
                .or(cast.title.as_deref())
                .unwrap_or("-"),
            cast.character.as_deref().unwrap_or("-"),
        );
    }
    for crew in credits
        .crew
        .iter()
        .filter(|c| matches!(c.job.as_deref(), Some("Director" | "Creator")))
    {
        tracing::info!(
            "{}: {}",
            crew.job.as_deref().unwrap_or("-"),
            crew.name.as_deref().or(crew.title.as_deref()).unwrap_or("-"),
        );
    }
}

/// Runs the `details` subcommand.
///
/// # Errors
///
/// Returns an error if the media type is invalid, the client fails to
/// build, or a request fails.
#[instrument(skip_all)]
async fn run_details(args: &DetailsArgs, config: &AppConfig) -> Result<()> {
    let media: MediaType = args.media.parse()?;
    let catalog = TmdbCatalog::new(build_tmdb_client(&config.tmdb)?);

    let details = catalog
        .details(Route::new(media, args.id))
        .await
        .context("TMDB details request failed")?;

    tracing::info!("ID: {}", details.route().id);
    tracing::info!("Title: {}", details.title());
    match &details {
        MediaDetails::Movie { details, .. } => {
            tracing::info!("Original Title: {}", details.original_title);
            tracing::info!(
                "Release Date: {}",
                details.release_date.as_deref().unwrap_or("-")
            );
            tracing::info!(
                "Runtime: {}min",
                details
                    .runtime
                    .map_or_else(|| String::from("-"), |r| r.to_string())
            );
            tracing::info!("Rating: {:.1} ({} votes)", details.vote_average, details.vote_count);
            tracing::info!(
                "Genres: {}",
                details
                    .genres
                    .iter()
                    .map(|g| g.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
        MediaDetails::TvShow { details, .. } => {
            tracing::info!("Original Name: {}", details.original_name);
            tracing::info!(
                "First Air Date: {}",
                details.first_air_date.as_deref().unwrap_or("-")
            );
            tracing::info!("Status: {}", details.status.as_deref().unwrap_or("-"));
            tracing::info!("Seasons: {}", details.number_of_seasons);
            tracing::info!("Episodes: {}", details.number_of_episodes);
        }
        MediaDetails::Person { details, .. } => {
            tracing::info!(
                "Known For: {}",
                details.known_for_department.as_deref().unwrap_or("-")
            );
            tracing::info!("Birthday: {}", details.birthday.as_deref().unwrap_or("-"));
            tracing::info!(
                "Place of Birth: {}",
                details.place_of_birth.as_deref().unwrap_or("-")
            );
        }
    }
    tracing::info!("URL: {}", details.route().web_url());
    tracing::info!("---");
    print_credits(details.credits());

    Ok(())
}

/// Runs the `season` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the request fails.
#[instrument(skip_all)]
async fn run_season(args: &SeasonArgs, config: &AppConfig) -> Result<()> {
    let client = build_tmdb_client(&config.tmdb)?;

    let season = client
        .tv_season(args.tv_id, args.season)
        .await
        .context("TMDB tv season request failed")?;

    tracing::info!(
        "Season {}: {}",
        season.season_number,
        season.name.as_deref().unwrap_or("-")
    );
    tracing::info!("Episodes:");
    for ep in &season.episodes {
        tracing::info!(
            "  E{:02}: {} (air_date: {}, runtime: {}min)",
            ep.episode_number,
            ep.name,
            ep.air_date.as_deref().unwrap_or("-"),
            ep.runtime
                .map_or_else(|| String::from("-"), |r| r.to_string()),
        );
    }

    Ok(())
}

/// Runs the `genres` subcommand.
///
/// # Errors
///
/// Returns an error if the media type is invalid, the client fails to
/// build, or the request fails.
#[instrument(skip_all)]
async fn run_genres(args: &GenresArgs, config: &AppConfig) -> Result<()> {
    let media: MediaType = args.media.parse()?;
    if media == MediaType::Person {
        bail!("genres exist for movie and tv only");
    }
    let client = build_tmdb_client(&config.tmdb)?;

    let genres = client
        .genres(media)
        .await
        .context("TMDB genre list request failed")?;

    tracing::info!("ID\tName");
    for genre in &genres {
        tracing::info!("{}\t{}", genre.id, genre.name);
    }

    Ok(())
}

/// Runs the `image` subcommand.
///
/// # Errors
///
/// Returns an error if the size is unknown or the path is empty.
fn run_image(args: &ImageArgs) -> Result<()> {
    let size: ImageSize = args.size.parse()?;
    let url = image_url(Some(&args.path), size).context("image path is empty")?;
    tracing::info!("{url}");
    Ok(())
}

/// Runs the `browse` subcommand.
///
/// # Errors
///
/// Returns an error if a feed is invalid, the client fails to build, or
/// the TUI fails.
#[instrument(skip_all)]
async fn run_browse(args: &BrowseArgs, config: &AppConfig) -> Result<()> {
    let mut tabs = config.browse.parsed_feeds()?;
    let mut initial = 0;
    if let Some(feed) = &args.feed {
        let feed: Feed = feed
            .parse()
            .with_context(|| format!("invalid feed: {feed}"))?;
        initial = match tabs.iter().position(|f| *f == feed) {
            Some(i) => i,
            None => {
                tabs.insert(0, feed);
                0
            }
        };
    }
    if tabs.is_empty() {
        bail!("no feeds configured in [browse] feeds");
    }

    let catalog = TmdbCatalog::new(build_tmdb_client(&config.tmdb)?);
    tui::run_browser(catalog, tabs, initial, &config.browse)
        .await
        .context("browser TUI failed")
}

/// Runs the `config` subcommand.
///
/// # Errors
///
/// Returns an error if the config cannot be read, serialized or written.
fn run_config(command: &ConfigSubcommands, path: &Path) -> Result<()> {
    match command {
        ConfigSubcommands::Show => {
            let config = AppConfig::load(path)?;
            let text = toml::to_string_pretty(&config.masked())
                .context("failed to serialize config to TOML")?;
            tracing::info!("# {}", path.display());
            for line in text.lines() {
                tracing::info!("{line}");
            }
        }
        ConfigSubcommands::Init { force } => {
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            AppConfig::default().save(path)?;
            tracing::info!("Wrote {}", path.display());
        }
    }
    Ok(())
}

/// Initialises the tracing subscriber.
///
/// Logs go to `log_file` when given. The interactive browser owns the
/// terminal, so without a log file it only logs (to stderr) when `RUST_LOG`
/// is set.
///
/// # Errors
///
/// Returns an error if the log file cannot be created.
fn init_tracing(log_file: Option<&Path>, interactive: bool) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let (writer, ansi) = match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        None if interactive && std::env::var_os("RUST_LOG").is_none() => {
            (BoxMakeWriter::new(io::sink), false)
        }
        None if interactive => (BoxMakeWriter::new(io::stderr), true),
        None => (BoxMakeWriter::new(io::stdout), true),
    };

    #[cfg(not(feature = "otel"))]
    {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_ansi(ansi)
            .with_writer(writer)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_ansi(ansi)
            .with_writer(writer);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    Ok(())
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Completions(args) = &cli.command {
        clap_complete::generate(args.shell, &mut Cli::command(), "reelscout", &mut io::stdout());
        return Ok(());
    }

    let interactive = matches!(cli.command, Commands::Browse(_));
    init_tracing(cli.log_file.as_deref(), interactive)?;

    let config_path = resolve_config_path(cli.dir.as_ref())?;
    if let Commands::Config(cmd) = &cli.command {
        return run_config(&cmd.command, &config_path);
    }
    let config = AppConfig::load(&config_path)?;

    match &cli.command {
        Commands::List(args) => run_list(args, &config).await,
        Commands::Search(args) => run_search(args, &config).await,
        Commands::Details(args) => run_details(args, &config).await,
        Commands::Season(args) => run_season(args, &config).await,
        Commands::Genres(args) => run_genres(args, &config).await,
        Commands::Image(args) => run_image(args),
        Commands::Browse(args) => run_browse(args, &config).await,
        Commands::Completions(_) | Commands::Config(_) => Ok(()),
    }
}
