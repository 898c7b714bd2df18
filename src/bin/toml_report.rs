use anyhow::Context;
use clap::Parser;
use launch_analytics::domain::ports::ConfigProvider;
use launch_analytics::utils::error::ErrorSeverity;
use launch_analytics::utils::{logger, validation::Validate};
use launch_analytics::{EtlEngine, LaunchPipeline, LocalStorage, SiteSelection, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-report")]
#[command(about = "Launch report driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "launch-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override the analysed site (ALL for every site)
    #[arg(long)]
    site: Option<String>,

    /// Show what would be processed without fetching anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = TomlConfig::from_file(&args.config)
        .with_context(|| format!("failed to load config file '{}'", args.config))?;

    if config.json_logs() {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("📁 Loaded configuration from: {}", args.config);

    if let Some(site) = &args.site {
        config.analysis.site = Some(site.clone());
        tracing::info!("🔧 Site overridden to: {}", site);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be fetched or written");
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = LaunchPipeline::new(storage, config);
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            println!("✅ Launch report completed");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Report: {}", config.report.name);
    if let Some(description) = &config.report.description {
        println!("  Description: {}", description);
    }
    println!("  Source: {}", config.dataset_url());
    println!("  Output: {}/{}", config.output_path(), config.archive_filename());

    match config.site_selection() {
        SiteSelection::All => println!("  Site: all sites"),
        SiteSelection::Site(name) => println!("  Site: {}", name),
    }

    let bound = |value: Option<f64>| {
        value
            .map(|v| format!("{} kg", v))
            .unwrap_or_else(|| "dataset".to_string())
    };
    println!(
        "  Payload: {} .. {}",
        bound(config.payload_min()),
        bound(config.payload_max())
    );
    println!("  Strict coordinates: {}", config.strict_coordinates());

    for proximity in config.proximities() {
        println!(
            "  Proximity: {} near {} at {}",
            proximity.name, proximity.site, proximity.coordinate
        );
    }

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}
