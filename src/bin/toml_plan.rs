use anyhow::Context;
use clap::Parser;
use payplan::config::toml_config::{ResolvedPlan, TomlConfig};
use payplan::core::schedule;
use payplan::utils::{logger, validation::Validate};
use payplan::{LocalStorage, PlanEngine};

#[derive(Parser)]
#[command(name = "toml-plan")]
#[command(about = "Calculate every payment plan listed in a TOML file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "payplan.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override the output directory from the config
    #[arg(long)]
    output_path: Option<String>,

    /// Show the plans without writing files
    #[arg(long)]
    dry_run: bool,

    /// Keep going when a plan is rejected
    #[arg(long)]
    keep_going: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = TomlConfig::from_file(&args.config)
        .with_context(|| format!("Failed to load config file '{}'", args.config))?;

    if config.json_logs() {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("📁 Loaded configuration from: {}", args.config);

    if let Some(path) = &args.output_path {
        config.output.path = Some(path.clone());
        tracing::info!("🔧 Output path overridden to: {}", path);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code().max(1));
    }

    let plans = config.resolved_plans()?;
    display_config_summary(&config, &plans, &args);

    let engine = PlanEngine::new(LocalStorage::new(config.output_path().to_string()));
    let mut failures = 0usize;

    for plan in &plans {
        let outcome = if args.dry_run {
            engine.preview(plan).map(|p| {
                println!("== {} ==", plan.name);
                println!("{}", schedule::summary(&p));
                println!();
            })
        } else {
            engine.run(plan).await.map(|report| {
                for file in &report.written_files {
                    println!("📁 {}: {}", report.name, engine.storage().full_path(file).display());
                }
            })
        };

        if let Err(e) = outcome {
            failures += 1;
            tracing::error!(
                "❌ Plan '{}' failed: {} (Category: {:?}, Severity: {:?})",
                plan.name,
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}: {}", plan.name, e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            if !args.keep_going {
                std::process::exit(e.exit_code().max(1));
            }
        }
    }

    tracing::info!(
        "✅ Processed {} plans ({} failed)",
        plans.len(),
        failures
    );

    if failures > 0 {
        std::process::exit(2);
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, plans: &[ResolvedPlan], args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.output.formats.join(", "));
    println!("  Plans: {}", plans.len());

    for plan in plans {
        println!(
            "    {} - {:.2} (down {:.2}) over {} installments at {} / month, from {}",
            plan.name,
            plan.request.total_amount,
            plan.request.down_payment,
            plan.request.number_of_installments,
            plan.request.interest_rate,
            plan.start_date
        );
    }

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}
