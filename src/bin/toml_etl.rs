use catalog_etl::core::normalize::platform_table;
use catalog_etl::core::Pipeline;
use catalog_etl::domain::ports::ConfigProvider;
use catalog_etl::utils::{logger, validation::Validate};
use catalog_etl::{CatalogPipeline, EtlEngine, HttpPublisher, LocalStorage, TomlConfig};
use clap::Parser;

#[derive(Parser)]
#[command(name = "toml-etl")]
#[command(about = "Catalog conversion driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "catalog-etl.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Skip publishing even when endpoints are configured
    #[arg(long)]
    no_publish: bool,

    /// Parse and encode without writing or publishing anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 載入 TOML 配置
    let config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    logger::init_logger(args.verbose, config.log_level(), config.log_format());
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config, &args);

    let storage = LocalStorage::new(".".to_string());

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be written or published");
        let pipeline = CatalogPipeline::new(storage, config);
        return perform_dry_run(&pipeline).await;
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    let publisher = if args.no_publish || config.publish_endpoints().is_empty() {
        None
    } else {
        Some(HttpPublisher::new(
            config.publish_endpoints().to_vec(),
            config.publish_timeout(),
        )?)
    };

    let pipeline = CatalogPipeline::new(storage, config);
    let mut engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);
    if let Some(publisher) = publisher {
        engine = engine.with_publisher(Box::new(publisher));
    }

    match engine.run().await {
        Ok(report) => {
            println!(
                "✅ Converted {} products ({} rows dropped)",
                report.products, report.rows_dropped
            );
            println!("📁 Output saved to: {}", report.output_path);
            if let Some(publish) = &report.publish {
                println!(
                    "📡 Published {}/{} events",
                    publish.published(),
                    publish.outcomes.len()
                );
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Conversion failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = e.severity().exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!(
        "  Pipeline: {} v{}",
        config.pipeline.name,
        config.pipeline.version.as_deref().unwrap_or("0")
    );
    println!("  Source: {} ({})", config.input_path(), config.platform());
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.output_formats().join(", "));

    if let Some(archive) = config.compression_filename() {
        println!("  Compression: {} (ZIP)", archive);
    }

    if !config.publish_endpoints().is_empty() && !args.no_publish {
        println!("  Publish: {} endpoint(s)", config.publish_endpoints().len());
    }

    if let Some(extra) = config.extra_aliases() {
        let table = platform_table(config.platform()).with_extra_aliases(extra);
        println!("  Id aliases: {}", table.id.join(", "));
        println!("  Title aliases: {}", table.title.join(", "));
    }

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

async fn perform_dry_run(
    pipeline: &CatalogPipeline<LocalStorage, TomlConfig>,
) -> anyhow::Result<()> {
    let batch = pipeline.extract().await?;
    println!("🔍 Dry Run Analysis:");
    println!("  Rows read: {}", batch.rows_read);
    println!("  Rows dropped: {}", batch.rows_dropped);
    println!("  Products: {}", batch.products.len());

    let result = pipeline.transform(batch).await?;
    if let Some(first) = result.events.first() {
        println!();
        println!("First event:");
        println!("{}", serde_json::to_string_pretty(first)?);
    }

    println!();
    println!("✅ Dry run complete. Remove --dry-run to write outputs.");
    Ok(())
}
