use clap::Parser;
use section_nav::utils::{logger, validation::Validate};
use section_nav::{CliConfig, MemoryPage, NavConfig, Simulator};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🚀 Starting nav-sim");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 載入並驗證配置
    let config = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            NavConfig::from_file(path)
        }
        None => Ok(NavConfig::default()),
    };
    let config = match config.and_then(|config| config.validate().map(|_| config)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    let mut page = MemoryPage::academic_site();
    page.set_viewport_width(cli.width);

    let mut simulator = match Simulator::new(page, &config) {
        Ok(simulator) => simulator,
        Err(e) => {
            tracing::error!("❌ Navigator initialisation failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(2);
        }
    };

    tracing::info!("🎬 Replaying {} steps", cli.steps.len());
    if let Err(e) = simulator.run(&cli.steps).await {
        tracing::error!("❌ Session failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(2);
    }

    let report = simulator.report();
    println!("{}", serde_json::to_string_pretty(&report)?);

    tracing::info!("✅ Session finished on '{}'", report.current_section);
    Ok(())
}
