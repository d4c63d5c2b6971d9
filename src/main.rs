use clap::Parser;
use review_dashboard::app::{self, RunSettings};
use review_dashboard::utils::error::{DashboardError, ErrorSeverity};
use review_dashboard::utils::{logger, validation::Validate};
use review_dashboard::{CliConfig, LocalStorage};

fn exit_code(e: &DashboardError) -> i32 {
    match e.severity() {
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn report(e: &DashboardError) {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting review-dashboard");
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        report(&e);
        std::process::exit(exit_code(&e));
    }

    if config.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    let settings = RunSettings {
        page: config.page,
        format: config.format,
        export: config.export.clone(),
        interactive: config.interactive,
    };
    let storage = LocalStorage::new(config.data_dir.clone());
    let criteria = config.criteria();
    let delimiter = config.delimiter as u8;
    let monitor = config.monitor;

    let mut session =
        match app::open_session(storage.clone(), config, criteria, monitor).await {
            Ok(session) => session,
            Err(e) => {
                report(&e);
                std::process::exit(exit_code(&e));
            }
        };

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    app::present(
        &mut session,
        &storage,
        delimiter,
        &settings,
        stdin.lock(),
        &mut stdout,
    )
    .await?;

    tracing::info!("✅ Done");
    Ok(())
}
