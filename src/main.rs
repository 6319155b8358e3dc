use clap::Parser;
use deal_scout::core::report;
use deal_scout::utils::error::{ErrorSeverity, ScoutError};
use deal_scout::utils::{logger, validation::Validate};
use deal_scout::{CliArgs, LocalStorage, ScanEngine, ScanPipeline, ScoutConfig};

fn exit_code(e: &ScoutError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn fail(context: &str, e: &ScoutError) -> ! {
    tracing::error!(
        "❌ {}: {} (Category: {:?}, Severity: {:?})",
        context,
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
    std::process::exit(exit_code(e));
}

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    if args.log_json {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("📁 Loading configuration from: {}", args.config);

    let mut config = match ScoutConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => fail(&format!("Failed to load config file '{}'", args.config), &e),
    };

    args.apply_overrides(&mut config);

    if let Err(e) = config.validate() {
        fail("Configuration validation failed", &e);
    }
    tracing::info!("✅ Configuration loaded and validated for '{}'", config.scan_name());

    println!("{}", report::filter_summary(&config.filters, &config.models));

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let seller_questions = config.seller_questions();
    let source = LocalStorage::new(".".to_string());
    let sink = LocalStorage::new(config.load.output_path.clone());
    let pipeline = match ScanPipeline::new(source, sink, config) {
        Ok(pipeline) => pipeline,
        Err(e) => fail("Failed to prepare scan", &e),
    };
    let engine = ScanEngine::new_with_monitoring(pipeline, monitor_enabled);

    let results = if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - no output will be written");
        match engine.preview().await {
            Ok(results) => results,
            Err(e) => fail("Scan failed", &e),
        }
    } else {
        match engine.run().await {
            Ok(outcome) => {
                println!("📁 Output saved to: {}", outcome.output);
                outcome.results
            }
            Err(e) => fail("Scan failed", &e),
        }
    };

    println!("\n{}\n", report::run_summary(&results, &seller_questions));

    let deals = report::good_deals_listing(&results);
    if !deals.is_empty() {
        println!("{}", deals);
    }
}
