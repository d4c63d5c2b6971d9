use clap::Parser;
use review_dashboard::app::{self, RunSettings};
use review_dashboard::core::ConfigProvider;
use review_dashboard::utils::error::ErrorSeverity;
use review_dashboard::utils::{logger, validation::Validate};
use review_dashboard::{FilterCriteria, LocalStorage, OutputFormat, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-dashboard")]
#[command(about = "Doctor review dashboard driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "dashboard.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override the keyword filter from config
    #[arg(long)]
    search: Option<String>,

    /// Page to show first
    #[arg(long, default_value = "1")]
    page: usize,

    /// Override the output format from config
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Read commands from stdin after the first page
    #[arg(short, long)]
    interactive: bool,

    /// Show what would be loaded without reading the datasets
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    let verbose = args.verbose || config.verbose();
    if config.json_logs() {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }

    tracing::info!("🚀 Starting TOML-based review dashboard");
    tracing::info!("📁 Configuration loaded from: {}", args.config);

    // 套用命令列覆蓋設定
    if let Some(search) = &args.search {
        let filters = config.filters.get_or_insert_with(Default::default);
        filters.keyword = Some(search.clone());
        tracing::info!("🔧 Keyword overridden to: '{}'", search);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    let criteria = config.criteria();
    display_config_summary(&config, &criteria, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - datasets will not be read");
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let settings = RunSettings {
        page: args.page,
        format: args.format.unwrap_or_else(|| config.output_format()),
        export: config.export_path().map(str::to_string),
        interactive: args.interactive,
    };
    let storage = LocalStorage::new(config.data_dir().to_string());
    let delimiter = config.delimiter();

    let mut session = match app::open_session(storage.clone(), config, criteria, monitor_enabled).await {
        Ok(session) => session,
        Err(e) => {
            tracing::error!(
                "❌ Loading failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    };

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    app::present(&mut session, &storage, delimiter, &settings, stdin.lock(), &mut stdout).await?;

    Ok(())
}

fn display_config_summary(config: &TomlConfig, criteria: &FilterCriteria, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Dashboard: {}", config.dashboard.name);
    if let Some(description) = &config.dashboard.description {
        println!("  Description: {}", description);
    }
    println!("  Data dir: {}", config.data_dir());
    println!("  Doctors: {}", config.doctors_file());
    println!("  Reviews: {}", config.reviews_file());
    println!("  Delimiter: {:?}", config.delimiter() as char);
    println!("  Page size: {}", config.page_size());
    println!("  Join: {}", config.join_mode());

    if !criteria.is_empty() {
        println!("  Filters:");
        if !criteria.name.is_empty() {
            println!("    name ~ {}", criteria.name);
        }
        if !criteria.specialty.is_empty() {
            println!("    specialty ~ {}", criteria.specialty);
        }
        if !criteria.institution.is_empty() {
            println!("    institution ~ {}", criteria.institution);
        }
        if let Some(degrees) = &criteria.degrees {
            let list: Vec<&str> = degrees.iter().map(String::as_str).collect();
            println!("    degree in [{}]", list.join(", "));
        }
        if criteria.min_experience > 0 {
            println!("    experience >= {}", criteria.min_experience);
        }
        if criteria.min_rating > 0.0 {
            println!("    rating >= {}", criteria.min_rating);
        }
        if !criteria.keyword.is_empty() {
            println!("    keyword: {}", criteria.keyword);
        }
    }

    if let Some(export) = config.export_path() {
        println!("  Export: {}", export);
    }

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}
