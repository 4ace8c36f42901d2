use bing_images_e2e::{ImageSearchSuite, SuiteConfig};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "bing-images-e2e",
    about = "End-to-end checks for the Bing image search flow"
)]
struct Args {
    /// Line-delimited keyword file, one search term per line
    #[arg(long, default_value = "data/keywords.txt")]
    keywords: PathBuf,

    /// Minimum acceptable number of matched thumbnails
    #[arg(long, default_value_t = 25)]
    min_images: usize,

    /// Run with a visible browser window
    #[arg(long)]
    headed: bool,

    /// Wait budget for each polled condition, in milliseconds
    #[arg(long, default_value_t = 10_000)]
    timeout_ms: u64,

    /// Delay between predicate evaluations, in milliseconds
    #[arg(long, default_value_t = 250)]
    poll_ms: u64,

    /// Write the JSON report to this path on completion
    #[arg(long)]
    report: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut config = SuiteConfig {
        keywords_path: args.keywords,
        min_image_count: args.min_images,
        wait_timeout_ms: args.timeout_ms,
        poll_interval_ms: args.poll_ms,
        ..SuiteConfig::default()
    };
    config.browser.headless = !args.headed;

    info!("starting the Bing image search suite");
    let mut suite = ImageSearchSuite::new(config).await?;
    let report = suite.run().await;

    print!("{}", report.render());
    if let Some(path) = args.report {
        std::fs::write(&path, report.to_json()?)?;
        info!(path = %path.display(), "wrote JSON report");
    }

    if report.passed() {
        info!("all steps passed");
        Ok(())
    } else {
        error!("suite failed");
        std::process::exit(1);
    }
}
