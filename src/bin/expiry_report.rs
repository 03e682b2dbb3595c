//! Prints the expiry state of a JSON export of compliance records.
//!
//! Usage: `expiry_report <records.json>`

use std::env;
use std::fs;

use config::Config;
use dotenvy::dotenv;

use compliance_client::domain::expiry::Severity;
use compliance_client::domain::record::ComplianceRecord;
use compliance_client::models::config::ClientConfig;
use compliance_client::services::expiry::ExpiryEvaluator;

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::StrongAlert => "EXPIRED",
        Severity::Caution => "SOON",
        Severity::Default => "OK",
    }
}

fn load_records(path: &str) -> Result<Vec<ComplianceRecord>, String> {
    let raw = fs::read_to_string(path).map_err(|err| format!("cannot read {path}: {err}"))?;
    serde_json::from_str(&raw).map_err(|err| format!("cannot parse {path}: {err}"))
}

fn main() {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    // Select config profile (defaults to `local`).
    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    let settings = Config::builder()
        // Add `./config/default.yaml`
        .add_source(config::File::with_name("config/default"))
        // Add environment-specific overrides
        .add_source(config::File::with_name(&format!("config/{app_env}")).required(false))
        // Add settings from the environment (with a prefix of APP)
        .add_source(config::Environment::with_prefix("APP"))
        .build();

    let settings = match settings {
        Ok(settings) => settings,
        Err(err) => {
            log::error!("Error loading settings: {err}");
            std::process::exit(1);
        }
    };

    let client_config = match settings.try_deserialize::<ClientConfig>() {
        Ok(client_config) => client_config,
        Err(err) => {
            log::error!("Error loading client config: {err}");
            std::process::exit(1);
        }
    };

    let Some(path) = env::args().nth(1) else {
        log::error!("Usage: expiry_report <records.json>");
        std::process::exit(2);
    };

    let records = match load_records(&path) {
        Ok(records) => records,
        Err(err) => {
            log::error!("{err}");
            std::process::exit(1);
        }
    };

    let evaluator = ExpiryEvaluator::system(client_config.expiry_warning_days);

    let summary = evaluator.summarize(&records);
    log::info!(
        "{} records: {} expired, {} expiring soon, {} valid",
        summary.total,
        summary.expired,
        summary.expiring_soon,
        summary.valid
    );

    let reminders = evaluator.due_reminders(&records, &client_config.reminder_windows);

    for row in evaluator.rows(records) {
        println!(
            "{:<8} {:>6} days  {} ({})",
            severity_label(row.severity),
            row.status.days_until_expiry,
            row.record.title,
            row.record.kind.as_str()
        );
    }

    if reminders.is_empty() {
        return;
    }

    println!();
    for reminder in &reminders {
        println!(
            "Reminder ({} day window): {} expires in {} days",
            reminder.window_days, reminder.title, reminder.days_until_expiry
        );
    }
}
