mod builder;
mod config;
mod s3;
mod sync;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::info;

use config::Config;
use s3::S3Client;

#[derive(Parser, Debug)]
#[command(
    name = "site-deploy",
    version = env!("CARGO_PKG_VERSION"),
    about = "Build a static website and publish it to S3",
    long_about = "Runs the site build, then mirrors the build output into an S3 bucket. \
                  Every visible file becomes a public-read object keyed by its path \
                  relative to the output directory, with a Content-Type inferred from its name.",
    after_help = "Examples:\n  \
                  site-deploy build                       # Run the build command\n  \
                  site-deploy deploy                      # Upload dist/ to the bucket\n  \
                  site-deploy publish                     # Build, then deploy if the build succeeded\n  \
                  site-deploy deploy --root public --bucket my-site\n\n\
                  Configuration (.env):\n  \
                  AWS_REGION=us-west-2\n  \
                  SITE_BUCKET=liminal.quuux.org\n  \
                  SITE_ROOT=dist\n  \
                  SITE_BUILD_COMMAND=\"yarn build\"\n  \
                  SITE_BUILD_PATH=/opt/homebrew/bin"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Local directory to upload (overrides SITE_ROOT)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Destination bucket (overrides SITE_BUCKET)
    #[arg(long, global = true)]
    bucket: Option<String>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Commands {
    /// Run the site build command
    Build,
    /// Upload the build output to the bucket
    Deploy,
    /// Build, then deploy only if the build succeeded
    Publish,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file early to get LOG_LEVEL
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL")
        .ok()
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "info".to_string());

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .or_else(|_| tracing_subscriber::EnvFilter::try_new(&log_level))
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(root) = cli.root {
        config = config.with_root(root);
    }
    if let Some(bucket) = cli.bucket {
        config = config.with_bucket(bucket);
    }

    match cli.command {
        Commands::Build => build(&config),
        Commands::Deploy => deploy(&config).await,
        Commands::Publish => {
            build(&config)?;
            deploy(&config).await
        }
    }
}

fn build(config: &Config) -> Result<()> {
    println!(
        "{}",
        style(format!("🔨 Building: {}", config.build_command))
            .cyan()
            .bold()
    );

    let dir = std::env::current_dir().context("Failed to resolve working directory")?;
    builder::run_build(&config.build_command, &config.build_path, &dir)?;

    println!("{}", style("✓ Build finished").green());
    Ok(())
}

async fn deploy(config: &Config) -> Result<()> {
    info!("Site Deploy v{}", env!("CARGO_PKG_VERSION"));
    config.validate_s3()?;
    println!(
        "{}",
        style(format!(
            "📦 Target: s3://{} from {}",
            config.bucket,
            config.root.display()
        ))
        .cyan()
        .bold()
    );

    let store = S3Client::new(config).await?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{pos}] {msg}")
            .context("Invalid progress template")?,
    );
    pb.enable_steady_tick(Duration::from_millis(100));

    let started = Instant::now();
    let result = sync::sync_dir(&store, &config.root, &config.bucket, Some(&pb)).await;
    pb.finish_and_clear();
    let report = result.with_context(|| format!("Deploy to s3://{} failed", config.bucket))?;

    println!(
        "{}",
        style(format!(
            "Summary: {} uploaded ({} bytes) in {:.2}s",
            report.uploaded,
            report.bytes,
            started.elapsed().as_secs_f64()
        ))
        .bold()
    );

    Ok(())
}
