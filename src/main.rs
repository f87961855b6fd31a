use clap::Parser;
use result_portal::adapters::http;
use result_portal::config::cli::CliArgs;
use result_portal::core::ScoringProvider;
use result_portal::utils::{logger, validation::Validate};
use result_portal::{build_source, AppConfig, LookupService};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = CliArgs::parse();

    // 載入 TOML 配置
    let mut config = match AppConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 初始化日誌
    if config.logging.json() {
        logger::init_json_logger(config.logging.level(), args.verbose);
    } else {
        logger::init_cli_logger(config.logging.level(), args.verbose);
    }

    tracing::info!("🚀 Starting result-portal");
    tracing::info!("📁 Loaded configuration from: {}", args.config);
    args.apply_overrides(&mut config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    tracing::info!(
        "📐 Total marks policy: {:?}, unmatched columns: {:?}",
        config.scoring.total_marks_policy(),
        config.scoring.unknown_columns()
    );

    let source = match build_source(&config.source) {
        Ok(source) => source,
        Err(e) => {
            tracing::error!("❌ Could not create data source: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };
    let service = Arc::new(LookupService::new(source, &config.scoring));

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - fetching the sheet once");
        match service.inspect().await {
            Ok(report) => {
                println!("✅ Sheet reachable: {} student rows", report.rows);
                println!("📚 Subjects: {}", report.subjects.join(", "));
                println!("🔢 Marks columns: {}", report.component_columns);
                println!("📏 Max marks columns: {}", report.max_marks_columns);
                if !report.skipped_columns.is_empty() {
                    println!("⏭️  Ignored columns: {}", report.skipped_columns.join(", "));
                }
            }
            Err(e) => {
                tracing::error!("❌ Dry run failed: {}", e);
                tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
                eprintln!("❌ {}", e);
                std::process::exit(2);
            }
        }
        return Ok(());
    }

    let listener = tokio::net::TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!("🌐 Listening on {}", listener.local_addr()?);

    http::serve(listener, http::router(service)).await?;

    tracing::info!("👋 Server stopped");
    Ok(())
}
