//! ILI9486 demo for Raspberry Pi
//!
//! Brings up the panel from a JSON config and then:
//! - shows a color-bar test pattern, or
//! - clears the screen to black, or
//! - displays an image file scaled to the panel

use clap::Parser;
use ili9486_rpi::image_proc::{self, FitMode};
use ili9486_rpi::prelude::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "ili9486-demo")]
#[command(about = "ILI9486 TFT demo for Raspberry Pi")]
#[command(version)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = ili9486_rpi::config::DEFAULT_CONFIG_PATH)]
    config: String,

    /// Origin code 0-3 (overrides config orientation)
    #[arg(long)]
    origin: Option<u8>,

    /// Image file to display
    #[arg(short, long)]
    image: Option<String>,

    /// Crop the image to cover the panel instead of letterboxing it
    #[arg(long)]
    crop: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Show test pattern and exit
    #[arg(long)]
    test: bool,

    /// Clear display and exit
    #[arg(long)]
    clear: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    init_logging(args.verbose);

    let mut config = DisplayConfig::load(&args.config).unwrap_or_else(|e| {
        tracing::warn!("Failed to load config from {}: {}", args.config, e);
        tracing::info!("Using default configuration");
        DisplayConfig::default()
    });
    if let Some(origin) = args.origin {
        config.orientation = Orientation::from_origin(origin)?;
    }

    let transport = RppalTransport::open(config.spi.bus, config.spi.slave_select)?;
    let mut lcd = Ili9486::from_config(transport, &config)?;
    lcd.begin()?;

    if args.test {
        tracing::info!("Running test pattern...");
        lcd.test_pattern()?;
        return Ok(());
    }

    if args.clear {
        tracing::info!("Clearing display...");
        lcd.clear(Color565::BLACK.to_rgb())?;
        lcd.display(None, None)?;
        return Ok(());
    }

    if let Some(path) = &args.image {
        let mode = if args.crop {
            FitMode::Crop
        } else {
            FitMode::Letterbox
        };
        image_proc::show_image_file(&mut lcd, path, mode)?;
        return Ok(());
    }

    tracing::warn!("Nothing to do: pass --test, --clear or --image");
    Ok(())
}

/// Initialize tracing/logging
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("ili9486_rpi={},ili9486_demo={}", level, level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}
