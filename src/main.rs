use catalog_etl::utils::{logger, validation::Validate};
use catalog_etl::{CatalogPipeline, CliConfig, EtlEngine, HttpPublisher, LocalStorage};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting catalog-etl CLI");
    tracing::debug!("CLI config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let publisher = if config.publish_endpoints.is_empty() {
        None
    } else {
        Some(HttpPublisher::new(
            config.publish_endpoints.clone(),
            config.publish_timeout,
        )?)
    };

    // 輸入與輸出路徑都相對於目前目錄
    let storage = LocalStorage::new(".".to_string());
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
