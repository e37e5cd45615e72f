use anyhow::Result;
use payplan::config::toml_config::TomlConfig;
use payplan::core::Storage;
use payplan::utils::validation::Validate;
use payplan::{LocalStorage, OutputFormat, PlanEngine, PlanError};
use tempfile::TempDir;

fn config_for(output_path: &str) -> String {
    format!(
        r#"
[output]
path = "{}"
formats = ["csv", "tsv", "json"]

[defaults]
start_date = "2026-01-01"

[[plans]]
name = "estate-retainer"
total_amount = 15000
number_of_installments = 6
interest_rate = 0.02

[[plans]]
name = "family-law"
total_amount = 8000
down_payment = 2000
number_of_installments = 4
"#,
        output_path.replace('\\', "/")
    )
}

#[tokio::test]
async fn test_engine_writes_every_format_for_every_plan() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_string_lossy().to_string();

    let config = TomlConfig::from_toml_str(&config_for(&output_path))?;
    config.validate()?;

    let engine = PlanEngine::new(LocalStorage::new(config.output_path().to_string()));
    let plans = config.resolved_plans()?;

    let mut reports = Vec::new();
    for plan in &plans {
        reports.push(engine.run(plan).await?);
    }

    assert_eq!(reports.len(), 2);
    assert_eq!(
        reports[0].written_files,
        vec![
            "estate-retainer.csv".to_string(),
            "estate-retainer.tsv".to_string(),
            "estate-retainer.json".to_string(),
        ]
    );

    let csv = std::fs::read_to_string(temp_dir.path().join("family-law.csv"))?;
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[1], "1,2026-01-31,1500.00,0.00,1500.00,4500.00");

    let json = engine.storage().read_file("estate-retainer.json").await?;
    let value: serde_json::Value = serde_json::from_slice(&json)?;
    assert_eq!(value["installments"].as_array().map(|a| a.len()), Some(6));
    assert_eq!(value["installments"][5]["remaining_balance"], 0.0);

    Ok(())
}

#[tokio::test]
async fn test_engine_rejects_invalid_plan_without_writing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_string_lossy().to_string();

    let toml_content = format!(
        r#"
[output]
path = "{}"
formats = ["csv"]

[[plans]]
name = "overpaid"
total_amount = 500
down_payment = 900
number_of_installments = 3
"#,
        output_path.replace('\\', "/")
    );

    let config = TomlConfig::from_toml_str(&toml_content)?;
    config.validate()?;

    let engine = PlanEngine::new(LocalStorage::new(output_path));
    let plans = config.resolved_plans()?;
    let err = engine.run(&plans[0]).await.unwrap_err();

    assert!(matches!(err, PlanError::InvalidAmount { .. }));
    assert!(!temp_dir.path().join("overpaid.csv").exists());

    Ok(())
}

#[tokio::test]
async fn test_preview_does_not_touch_storage() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().join("never-created");

    let config = TomlConfig::from_toml_str(&config_for(&output_path.to_string_lossy()))?;
    let engine = PlanEngine::new(LocalStorage::new(config.output_path().to_string()));

    let plans = config.resolved_plans()?;
    assert_eq!(plans[0].formats[2], OutputFormat::Json);

    let plan = engine.preview(&plans[0])?;
    assert_eq!(plan.installments.len(), 6);
    assert!(!output_path.exists());

    Ok(())
}
