use std::io::Read;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use cordoba::config::Config;
use cordoba::models::Post;
use cordoba::output::terminal;
use cordoba::pipeline;
use cordoba::vision::google::GoogleVisionClient;
use cordoba::vision::traits::VisionClient;

/// Cordoba: summarize the faces, colors, and subjects of a social feed.
///
/// Sends each post's image to Cloud Vision and reduces the annotations to a
/// dominant emotion, a dominant color, and the top subjects.
#[derive(Parser)]
#[command(name = "cordoba", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Annotate a single image and print the raw annotation record
    AnalyzeImage {
        /// Publicly reachable image URL
        url: String,
    },

    /// Summarize a feed export (Graph API media JSON)
    Summarize {
        /// Path to the posts JSON file, or `-` for stdin
        posts: String,

        /// Max posts to analyze (default: CORDOBA_IMAGE_CAP or 25)
        #[arg(long)]
        cap: Option<usize>,

        /// Print the summary as JSON instead of a formatted report
        #[arg(long)]
        json: bool,
    },

    /// Serve the JSON API
    #[cfg(feature = "web")]
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "5000")]
        port: u16,

        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("cordoba=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::AnalyzeImage { url } => {
            let vision = GoogleVisionClient::from_config(&config)?;
            let annotation = vision.analyze_image(&url).await?;
            println!("{}", serde_json::to_string_pretty(&annotation)?);
        }

        Commands::Summarize { posts, cap, json } => {
            let vision = GoogleVisionClient::from_config(&config)?;
            let posts = read_posts(&posts)?;
            let cap = cap.unwrap_or(config.image_cap);

            info!(posts = posts.len(), cap = cap, "Loaded feed");

            let spinner = ProgressBar::new_spinner();
            spinner.set_style(ProgressStyle::default_spinner().template("  {spinner} {msg}")?);
            spinner.set_message(format!(
                "Analyzing {} images...",
                cap.min(posts.len())
            ));
            spinner.enable_steady_tick(Duration::from_millis(100));

            let result = pipeline::analyze_posts(&vision, &posts, cap).await;
            spinner.finish_and_clear();
            let (images, summary) = result?;

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                terminal::display_batch(&images);
                terminal::display_summary(&summary, images.len());
                if posts.len() > images.len() {
                    println!(
                        "{}",
                        format!(
                            "Skipped {} posts beyond the cap of {cap}.",
                            posts.len() - images.len()
                        )
                        .dimmed()
                    );
                }
            }
        }

        #[cfg(feature = "web")]
        Commands::Serve { port, bind } => {
            let vision = GoogleVisionClient::from_config(&config)?;
            cordoba::web::run_server(config, std::sync::Arc::new(vision), port, &bind).await?;
        }
    }

    Ok(())
}

/// Read a feed export from a file, or from stdin when `source` is `-`.
fn read_posts(source: &str) -> Result<Vec<Post>> {
    let raw = if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read posts from stdin")?;
        buf
    } else {
        std::fs::read_to_string(source).with_context(|| format!("Failed to read {source}"))?
    };

    Post::parse_feed(&raw).with_context(|| format!("{source} is not a Graph API media list"))
}
