//! Vibe Studio CLI: build a project from photos, clips and music, then
//! render it into a vertical short-form video.
//!
//! Usage:
//!   vibe init [OPTIONS]                 Create a new project file
//!   vibe add <PROJECT> <FILES>...       Add media or audio files
//!   vibe remove <PROJECT> <ID>          Remove a media item or audio track
//!   vibe reorder <PROJECT> <IDS>...     Set the timeline order
//!   vibe set <PROJECT> [OPTIONS]        Edit project, media or track settings
//!   vibe trim <PROJECT> <ID> [OPTIONS]  Re-encode a clip to a time window
//!   vibe generate <PROJECT>             Render the final video
//!   vibe info <PROJECT>                 Show project information
//!   vibe categories                     List categories and audio vibes
//!   vibe check                          Check the encoder and directories

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use vibe_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "vibe",
    about = "Turn photos, clips and music into vertical short-form videos",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new project file
    Init {
        /// Where to write the project file
        #[arg(short, long, default_value = "project.json")]
        output: PathBuf,

        /// Category (selects the colour grade)
        #[arg(short, long, default_value = "motivational")]
        category: String,

        /// Audio vibe
        #[arg(long, default_value = "energetic")]
        vibe: String,

        /// Target duration in seconds
        #[arg(short, long, default_value = "30")]
        duration: f64,
    },

    /// Add media or audio files to a project
    Add {
        /// Path to the project file
        project: PathBuf,

        /// Files to add (images, videos, audio)
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Remove a media item or audio track
    Remove {
        /// Path to the project file
        project: PathBuf,

        /// Media item or audio track id
        id: String,
    },

    /// Set the timeline order from a list of media ids
    Reorder {
        /// Path to the project file
        project: PathBuf,

        /// Media ids in the desired order
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Edit project, media item or audio track settings
    Set(SetArgs),

    /// Re-encode a video clip to a time window
    Trim {
        /// Path to the project file
        project: PathBuf,

        /// Media item id
        id: String,

        /// Start of the window (seconds)
        #[arg(long, default_value = "0")]
        start: f64,

        /// End of the window (seconds)
        #[arg(long)]
        end: Option<f64>,
    },

    /// Render the final video
    Generate {
        /// Path to the project file
        project: PathBuf,

        /// Override the target duration (seconds)
        #[arg(short, long)]
        duration: Option<f64>,

        /// Output width
        #[arg(long)]
        width: Option<u32>,

        /// Output height
        #[arg(long)]
        height: Option<u32>,

        /// Output frame rate
        #[arg(long)]
        fps: Option<u32>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show project information
    Info {
        /// Path to the project file
        project: PathBuf,

        /// Print the project as JSON
        #[arg(long)]
        json: bool,
    },

    /// List categories and audio vibes
    Categories,

    /// Check the encoder and directories
    Check,
}

/// Options of `vibe set`.
#[derive(Args)]
pub struct SetArgs {
    /// Path to the project file
    pub project: PathBuf,

    /// Project category
    #[arg(long)]
    pub category: Option<String>,

    /// Project audio vibe
    #[arg(long)]
    pub vibe: Option<String>,

    /// Target duration in seconds
    #[arg(long)]
    pub target: Option<f64>,

    /// Percentage of the clips' own audio to keep (0-100)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub video_volume: Option<u8>,

    /// Media item to edit
    #[arg(long, conflicts_with = "track")]
    pub media: Option<String>,

    /// Trim start (seconds)
    #[arg(long, requires = "media")]
    pub trim_start: Option<f64>,

    /// Trim end (seconds)
    #[arg(long, requires = "media", conflicts_with = "clear_trim_end")]
    pub trim_end: Option<f64>,

    /// Remove the trim end
    #[arg(long, requires = "media")]
    pub clear_trim_end: bool,

    /// Display duration (seconds)
    #[arg(long, requires = "media", conflicts_with = "clear_duration")]
    pub duration: Option<f64>,

    /// Use the automatic display duration
    #[arg(long, requires = "media")]
    pub clear_duration: bool,

    /// Caption text
    #[arg(long, requires = "media")]
    pub caption: Option<String>,

    /// Timeline position
    #[arg(long, requires = "media")]
    pub position: Option<i64>,

    /// Audio track to edit
    #[arg(long)]
    pub track: Option<String>,

    /// Track volume (0-100)
    #[arg(long, requires = "track", value_parser = clap::value_parser!(u8).range(0..=100))]
    pub volume: Option<u8>,

    /// Track role
    #[arg(long, requires = "track")]
    pub role: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load();

    // Initialize logging
    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    vibe_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Init {
            output,
            category,
            vibe,
            duration,
        } => commands::init::run(output, category, vibe, duration),
        Commands::Add { project, files } => commands::add::run(&config, project, files).await,
        Commands::Remove { project, id } => commands::remove::run(project, id),
        Commands::Reorder { project, ids } => commands::reorder::run(project, ids),
        Commands::Set(args) => commands::set::run(args),
        Commands::Trim {
            project,
            id,
            start,
            end,
        } => commands::trim::run(&config, project, id, start, end).await,
        Commands::Generate {
            project,
            duration,
            width,
            height,
            fps,
            json,
        } => commands::generate::run(&config, project, duration, width, height, fps, json).await,
        Commands::Info { project, json } => commands::info::run(project, json),
        Commands::Categories => commands::categories::run(),
        Commands::Check => commands::check::run(&config).await,
    }
}
