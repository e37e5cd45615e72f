use clap::Parser;
use payplan::core::schedule;
use payplan::utils::{error::PlanError, logger, validation::Validate};
use payplan::{CliConfig, LocalStorage, PlanEngine};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting payplan CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        fail(&e);
    }

    let storage = LocalStorage::new(config.output_path.clone());
    let engine = PlanEngine::new(storage);

    if config.dry_run {
        tracing::info!("🔍 DRY RUN MODE - no files will be written");
        match engine.preview(&config) {
            Ok(plan) => {
                println!("{}", schedule::summary(&plan));
                println!();
                print!("{}", schedule::to_csv(&plan)?);
            }
            Err(e) => fail(&e),
        }
        return Ok(());
    }

    match engine.run(&config).await {
        Ok(report) => {
            tracing::info!("✅ Payment plan '{}' calculated", report.name);
            println!("{}", schedule::summary(&report.plan));
            for file in &report.written_files {
                println!("📁 Saved: {}", engine.storage().full_path(file).display());
            }
        }
        Err(e) => fail(&e),
    }

    Ok(())
}

fn fail(e: &PlanError) {
    tracing::error!(
        "❌ Payment plan failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    let exit_code = e.exit_code();
    if exit_code > 0 {
        std::process::exit(exit_code);
    }
}
