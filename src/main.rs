use clap::{ArgAction, Parser, Subcommand};
use cliclack::{confirm, intro, log, note, outro, outro_cancel, select, spinner};
use tracing_subscriber::EnvFilter;

mod analysis;
mod automerge;
mod config;
mod display;
mod duplicates;
mod error;
mod menu;
mod merge;
mod model;
mod normalize;
mod operations;
mod quota;
mod service;
mod session;
mod youtube;

use analysis::Analysis;
use error::Result;
use merge::MergeOptions;
use quota::QuotaStatus;
use service::PlaylistService;
use session::Session;
use youtube::YouTubeClient;

#[derive(Parser, Debug)]
#[command(version, about = "Find and merge duplicate YouTube playlists")]
struct Cli {
    /// The command to execute (asks for a mode when omitted)
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log more details to stderr (-v for info, -vv for debug)
    #[clap(short = 'v', long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage the tool configuration
    Config(config::ConfigArgs),
    /// List your playlists
    List {
        /// Print the playlists as JSON
        #[clap(long)]
        json: bool,
    },
    /// Show library statistics and duplicate groups without changing anything
    Analyze {
        /// Only fetch the first page of playlists to save quota
        #[clap(short = 'l', long)]
        lightweight: bool,
    },
    /// Merge every duplicate group into its largest playlist
    Merge {
        /// Show what would be merged without making changes
        #[clap(short = 'd', long)]
        dry_run: bool,
        /// Do not ask for confirmation
        #[clap(short = 'y', long)]
        yes: bool,
    },
    /// Merge, rename, delete and reorder playlists one operation at a time
    Manage,
    /// Check whether API quota is left
    Quota,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        let _ = outro_cancel(format!("❌ {e}"));
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,playdedup={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    // Fails only when a provider is already installed, which is fine
    let _ = rustls::crypto::ring::default_provider().install_default();

    let command = match cli.command {
        Some(Commands::Config(args)) => return handle_config(args),
        command => command,
    };

    let cfg = config::Config::read()?;
    let client = YouTubeClient::new(cfg.oauth2_json()?).await?;
    let options = MergeOptions {
        insert_delay: cfg.insert_delay(),
        ..Default::default()
    };

    match command {
        Some(Commands::List { json }) => handle_list(&client, json).await,
        Some(Commands::Analyze { lightweight }) => handle_analyze(&client, lightweight).await,
        Some(Commands::Merge { dry_run, yes }) => {
            let options = MergeOptions { dry_run, ..options };
            handle_merge(&client, &options, yes).await
        }
        Some(Commands::Manage) => {
            intro("🎮 Manual Mode")?;
            let mut session = load_session(&client).await?;
            menu::manual_menu(&client, &mut session, &options).await
        }
        Some(Commands::Quota) => handle_quota(&client).await,
        // Handled before connecting
        Some(Commands::Config(_)) => Ok(()),
        None => handle_interactive(&client, &options).await,
    }
}

fn handle_config(args: config::ConfigArgs) -> Result<()> {
    intro("📝 Configuration")?;

    let mut cfg = config::Config::read().unwrap_or_default();

    if args.reset {
        let confirmed = confirm("Are you sure you want to reset the configuration?").interact()?;

        if confirmed {
            cfg = config::Config::default();
            cfg.write()?;
            outro("✅ Configuration reset successfully")?;
        }
        return Ok(());
    }

    if let Some(path) = args.oauth2_json {
        cfg.set_oauth_path(path);
        cfg.write()?;
        log::success("OAuth2 JSON path set successfully")?;
    }

    if let Some(delay) = args.insert_delay {
        cfg.insert_delay_ms = delay;
        cfg.write()?;
        log::success(format!("Insert delay set to {delay} ms"))?;
    }

    if args.list {
        note(
            "OAuth2 JSON path",
            cfg.oauth2_json.as_deref().unwrap_or("<not set>"),
        )?;
        note("Insert delay", format!("{} ms", cfg.insert_delay_ms))?;
        note("Configuration directory", config::config_dir()?.display())?;
    }

    outro("✅ Done")?;
    Ok(())
}

async fn load_session(service: &dyn PlaylistService) -> Result<Session> {
    let sp = spinner();
    sp.start("Fetching your playlists...");
    let playlists = service.list_playlists().await;
    sp.stop("Fetched playlists");

    Ok(Session::new(playlists?))
}

async fn handle_list(service: &dyn PlaylistService, json: bool) -> Result<()> {
    if json {
        let playlists = service.list_playlists().await?;
        println!("{}", serde_json::to_string_pretty(&playlists)?);
        return Ok(());
    }

    intro("🎵 Your Playlists")?;
    let session = load_session(service).await?;
    display::playlists(&session.playlists)?;
    outro("✅ Done")?;
    Ok(())
}

async fn handle_analyze(service: &dyn PlaylistService, lightweight: bool) -> Result<()> {
    intro(if lightweight {
        "📊 Playlist Analysis (Lightweight)"
    } else {
        "📊 Playlist Analysis"
    })?;

    let session = if lightweight {
        log::remark("Only the first page of playlists is fetched to save quota")?;
        let sp = spinner();
        sp.start("Fetching playlist metadata...");
        let page = service.list_playlist_page(None).await;
        sp.stop("Fetched playlist metadata");
        Session::new(page?.items)
    } else {
        load_session(service).await?
    };

    display::analysis(&Analysis::of(&session.playlists, &session.duplicates))?;
    display::duplicates(&session.duplicates)?;
    outro("✅ Analysis completed")?;
    Ok(())
}

async fn handle_merge(
    service: &dyn PlaylistService,
    options: &MergeOptions,
    yes: bool,
) -> Result<()> {
    intro(if options.dry_run {
        "🔍 Automatic Merge (Dry Run)"
    } else {
        "🤖 Automatic Merge"
    })?;

    let mut session = load_session(service).await?;
    display::duplicates(&session.duplicates)?;
    auto_merge(service, &mut session, options, yes).await
}

async fn auto_merge(
    service: &dyn PlaylistService,
    session: &mut Session,
    options: &MergeOptions,
    yes: bool,
) -> Result<()> {
    if session.duplicates.is_empty() {
        outro("✅ No duplicates found to merge!")?;
        return Ok(());
    }

    if !options.dry_run && !yes {
        log::info(
            "The playlist with the most videos in each group will be kept.\n\
             Source playlists will be deleted after a successful merge.",
        )?;
        if !confirm("Proceed with automatic merge?")
            .initial_value(false)
            .interact()?
        {
            outro("Nothing changed")?;
            return Ok(());
        }
    }

    let sp = spinner();
    sp.start(format!(
        "Merging {} duplicate groups...",
        session.duplicates.len()
    ));
    let report = automerge::auto_merge(service, session, options).await;
    sp.stop("Automatic merge finished");

    display::auto_merge_report(&report, options.dry_run)?;
    outro(if options.dry_run {
        "✅ Dry run completed"
    } else {
        "🎉 Automatic merge completed!"
    })?;
    Ok(())
}

async fn handle_quota(service: &dyn PlaylistService) -> Result<()> {
    intro("🔍 YouTube API Quota Checker")?;

    let sp = spinner();
    sp.start("Testing API access...");
    let status = quota::check_quota(service).await;
    sp.stop("API tested");

    let costs = quota::OPERATION_COSTS
        .iter()
        .map(|(operation, units)| format!("  • {operation} - {units} units"))
        .collect::<Vec<_>>()
        .join("\n");
    let info = format!(
        "YouTube Data API v3 has a default quota of {} units per day\n{costs}",
        quota::DAILY_QUOTA
    );

    match status {
        QuotaStatus::Available => {
            log::success("API is working! Quota is available.")?;
            note("📊 Quota information", info)?;
            note(
                "💡 Tips to manage quota",
                "Run `analyze` first, it only uses list calls\n\
                 Use `merge --dry-run` to see the cost of a merge\n\
                 Quota resets daily",
            )?;
        }
        QuotaStatus::Exceeded => {
            log::error("Quota exceeded! You've used up your daily API quota.")?;
            note(
                "🕐 Solutions",
                "Wait until tomorrow, the quota resets daily\n\
                 Check your quota usage in the Google Cloud Console",
            )?;
        }
        QuotaStatus::Failed(message) => log::error(format!("API error: {message}"))?,
    }

    outro("✅ Done")?;
    Ok(())
}

async fn handle_interactive(service: &dyn PlaylistService, options: &MergeOptions) -> Result<()> {
    intro("🎵 YouTube Playlist Manager")?;

    let mut session = load_session(service).await?;
    if session.playlists.is_empty() {
        outro("No playlists found")?;
        return Ok(());
    }

    display::playlists(&session.playlists)?;
    display::duplicates(&session.duplicates)?;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Mode {
        Automatic,
        Manual,
        Analysis,
    }

    let mode = select("Select mode")
        .item(Mode::Automatic, "🤖 Automatic Mode", "Smart merge all duplicates")
        .item(Mode::Manual, "🎮 Manual Mode", "Control each operation")
        .item(Mode::Analysis, "📊 Analysis Only", "Just show what needs to be done")
        .interact()?;

    match mode {
        Mode::Automatic => auto_merge(service, &mut session, options, false).await,
        Mode::Manual => menu::manual_menu(service, &mut session, options).await,
        Mode::Analysis => {
            display::analysis(&Analysis::of(&session.playlists, &session.duplicates))?;
            outro("✅ Analysis completed")?;
            Ok(())
        }
    }
}
