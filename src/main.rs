//! # Cat Ink CLI
//!
//! Command-line interface for the e-paper cat server.
//!
//! ## Usage
//!
//! ```bash
//! # Serve on $PORT (default 5000), regenerating every 3 minutes
//! cat-ink serve
//!
//! # AI sketches instead of catalog photos, cached for an hour
//! cat-ink serve --source prompt --cache-ttl 3600
//!
//! # Render one image to a file without starting a server
//! cat-ink render --out cat.bmp
//! ```

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use cat_ink::{
    CatInkError, DisplayConfig, Pipeline, PipelineConfig,
    render::dither::DitheringAlgorithm,
    server::{self, ServerConfig},
    source::{HttpProvider, ProviderConfig, RetryPolicy, SourceMode},
};

/// Cat Ink - dithered cat pictures for three-color e-paper
#[derive(Parser, Debug)]
#[command(name = "cat-ink")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Address to bind
        #[arg(long, env = "HOST", default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[arg(long, env = "PORT", default_value_t = 5000)]
        port: u16,

        /// Seconds a generated image is served before regenerating
        #[arg(long, env = "CAT_INK_CACHE_TTL", default_value_t = 180)]
        cache_ttl: u64,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },
    /// Produce one image and write it to a file
    Render {
        /// Output BMP path
        #[arg(long, short, value_name = "FILE", default_value = "cat-ink.bmp")]
        out: PathBuf,

        /// Render a local image file instead of fetching one
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },
}

/// Options shared by every command that runs the pipeline.
#[derive(Args, Debug)]
struct PipelineArgs {
    /// Panel width in pixels
    #[arg(long, env = "CAT_INK_WIDTH", default_value_t = DisplayConfig::EPD_7IN5_B.width)]
    width: u32,

    /// Panel height in pixels
    #[arg(long, env = "CAT_INK_HEIGHT", default_value_t = DisplayConfig::EPD_7IN5_B.height)]
    height: u32,

    /// Where pictures come from: catalog or prompt
    #[arg(long, env = "CAT_INK_SOURCE", default_value = "catalog")]
    source: SourceMode,

    /// Dithering algorithm: floyd-steinberg, atkinson or none
    #[arg(long, env = "CAT_INK_DITHER", default_value = "floyd-steinberg")]
    dither: DitheringAlgorithm,

    /// Catalog lookups with a preferred tag before the unfiltered fallback
    #[arg(long, default_value_t = 3)]
    attempts: u32,

    /// Preferred catalog tag (repeatable)
    #[arg(long = "tag", value_name = "TAG", default_values = ["black", "white"])]
    tags: Vec<String>,

    /// Sketch prompt for prompt mode (repeatable; defaults to a built-in list)
    #[arg(long = "prompt", value_name = "TEXT")]
    prompts: Vec<String>,

    /// Catalog base URL
    #[arg(long, env = "CAT_INK_CATALOG_URL", default_value = "https://cataas.com")]
    catalog_url: String,

    /// Generative provider base URL
    #[arg(long, env = "CAT_INK_PROMPT_URL", default_value = "https://image.pollinations.ai")]
    prompt_url: String,

    /// Width requested from the catalog when downloading
    #[arg(long)]
    width_hint: Option<u32>,

    /// Metadata query timeout in seconds
    #[arg(long, default_value_t = 5)]
    metadata_timeout: u64,

    /// Image download timeout in seconds
    #[arg(long, default_value_t = 30)]
    download_timeout: u64,
}

impl PipelineArgs {
    fn into_config(self) -> Result<PipelineConfig, CatInkError> {
        Ok(PipelineConfig {
            display: DisplayConfig::checked(self.width, self.height)?,
            dither: self.dither,
            mode: self.source,
            retry: RetryPolicy {
                attempts: self.attempts,
                preferred_tags: self.tags,
            },
            prompts: self.prompts,
            provider: ProviderConfig {
                catalog_url: self.catalog_url,
                prompt_url: self.prompt_url,
                width_hint: self.width_hint,
                metadata_timeout: Duration::from_secs(self.metadata_timeout),
                download_timeout: Duration::from_secs(self.download_timeout),
            },
        })
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = run(cli.command).await {
        tracing::error!(error = %e, "exiting");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(command: Commands) -> Result<(), CatInkError> {
    match command {
        Commands::Serve {
            host,
            port,
            cache_ttl,
            pipeline,
        } => {
            let config = ServerConfig {
                listen_addr: format!("{}:{}", host, port),
                cache_ttl: Duration::from_secs(cache_ttl),
                pipeline: pipeline.into_config()?,
            };
            server::serve(config).await
        }
        Commands::Render {
            out,
            input,
            pipeline,
        } => {
            let config = pipeline.into_config()?;
            let bmp = match input {
                Some(path) => {
                    let data = std::fs::read(&path)?;
                    cat_ink::pipeline::render_bitmap(&data, config.display, config.dither)?
                }
                None => {
                    let provider = HttpProvider::new(config.provider.clone())?;
                    let pipeline = Pipeline::new(&config, Arc::new(provider));
                    pipeline.produce_fresh().await?.to_vec()
                }
            };

            std::fs::write(&out, &bmp)?;
            println!(
                "Saved {}x{} bitmap to {}",
                config.display.width,
                config.display.height,
                out.display()
            );
            Ok(())
        }
    }
}
