// caresense-cli/src/main.rs
// CareSense CLI - symptom triage and doctor directory from the terminal

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

use caresense_sdk::config::{ApiConfig, ServiceConfig, DEFAULT_PROVIDER};
use caresense_sdk::search::{DirectorySearchEngine, RefreshOutcome, Taxonomy, ViewMode};
use caresense_sdk::{DirectoryClient, DirectoryRecord, IntakeController, Notification, RecordId, TriageClient, TriageResult};

#[derive(Parser)]
#[command(name = "caresense")]
#[command(about = "CareSense AI symptom triage and doctor directory")]
struct Cli {
    /// Backend base URL (overrides CARESENSE_API_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Request timeout in seconds (overrides CARESENSE_API_TIMEOUT)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Describe symptoms and get an AI triage suggestion
    Triage {
        /// Symptom description
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Browse the doctor directory
    Doctors {
        /// Category id (see `caresense categories`)
        #[arg(long, default_value = "all")]
        category: String,
        /// Filter by name, specialty or location
        #[arg(long)]
        query: Option<String>,
        /// Show every match instead of the preview
        #[arg(long)]
        all: bool,
        /// Show the detail view for a doctor id
        #[arg(long)]
        select: Option<String>,
    },
    /// List directory categories
    Categories,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Load environment variables
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Triage { ref text } => {
            let config = load_config(&cli)?;
            run_triage(config, &text.join(" ")).await
        }
        Commands::Doctors {
            ref category,
            ref query,
            all,
            ref select,
        } => {
            let config = load_config(&cli)?;
            run_doctors(config, category, query.as_deref(), all, select.as_deref()).await
        }
        Commands::Categories => {
            for category in Taxonomy::standard().iter() {
                if category.specialty_matches.is_empty() {
                    println!("{:<12} {}", category.id, category.label);
                } else {
                    println!(
                        "{:<12} {} ({})",
                        category.id,
                        category.label,
                        category.specialty_matches.join(", ")
                    );
                }
            }
            Ok(())
        }
    }
}

/// Environment configuration with command-line overrides applied
fn load_config(cli: &Cli) -> anyhow::Result<ApiConfig> {
    let mut config = ApiConfig::from_provider(&**DEFAULT_PROVIDER).context("Invalid CARESENSE_* configuration")?;

    if let Some(ref base_url) = cli.base_url {
        config.base_url = base_url.clone();
    }

    if let Some(seconds) = cli.timeout {
        config.timeout_ms = seconds.saturating_mul(1000);
    }

    config.validate()?;
    log::debug!("Using backend {}", config.base_url);
    Ok(config)
}

async fn run_triage(config: ApiConfig, text: &str) -> anyhow::Result<()> {
    let controller = IntakeController::new(TriageClient::new_with_config(config)?);

    let (result, notification) = controller.submit_and_notify(text).await;
    match result {
        Some(result) => {
            println!("{}", notification);
            print_triage_result(&result);
            Ok(())
        }
        None => bail!("{}", notification),
    }
}

fn print_triage_result(result: &TriageResult) {
    println!();
    println!("Triage level: {} ({})", result.urgency_or_placeholder(), result.priority_band());
    println!();
    println!("{}", result.advice_or_placeholder());

    if !result.possible_causes.is_empty() {
        println!();
        println!("Possible causes:");
        for cause in &result.possible_causes {
            println!("  - {}", cause);
        }
    }

    let contacts = result.emergency_contacts();
    if !contacts.is_empty() {
        println!();
        println!("If this is an emergency, call:");
        for contact in contacts {
            println!("  {:<5} {}", contact.number, contact.label);
        }
    }
}

async fn run_doctors(
    config: ApiConfig,
    category: &str,
    query: Option<&str>,
    all: bool,
    select: Option<&str>,
) -> anyhow::Result<()> {
    let mode = if all { ViewMode::Full } else { ViewMode::Preview };
    let engine = DirectorySearchEngine::new(DirectoryClient::new_with_config(config)?).with_view_mode(mode);

    engine.set_active_category(category)?;
    if let Some(query) = query {
        engine.set_query(query);
    }

    if let RefreshOutcome::Failed(e) = engine.refresh().await {
        log::error!("Directory fetch failed: {}", e);
        bail!("{}", Notification::directory_failed());
    }

    let view = engine.view();
    if let Some(notification) = Notification::for_directory(&engine.status(), &view) {
        println!("{}", notification);
    }

    for record in &view.records {
        print_doctor_card(record);
    }

    if view.shows_view_all() {
        println!();
        println!(
            "Showing {} of {} doctor(s). Run with --all to view all doctors.",
            view.records.len(),
            view.total_matches
        );
    }

    if let Some(id) = select {
        if !engine.select_record(&RecordId::new(id)) {
            bail!("No doctor with id {}", id);
        }
        if let Some(record) = engine.selected_record() {
            print_doctor_detail(&record);
        }
    }

    Ok(())
}

fn print_doctor_card(record: &DirectoryRecord) {
    print!(
        "[{}] {} | {} | {} | {:.1}",
        record.id,
        record.display_name,
        record.specialty_label,
        record.location_label(),
        record.rating_or_default()
    );
    if let Some(ref availability) = record.availability_label {
        print!(" | {}", availability);
    }
    println!();
}

fn print_doctor_detail(record: &DirectoryRecord) {
    println!();
    println!("{}", record.display_name);
    println!("  Specialty:   {}", record.specialty_label);
    println!("  Location:    {}", record.location_label());
    println!("  Rating:      {:.1}", record.rating_or_default());
    println!("  Experience:  {}", record.experience_label());
    println!("  Fee:         {}", record.fee_label());

    let optional = [
        ("Availability", &record.availability_label),
        ("Hospital", &record.affiliated_facility),
        ("Phone", &record.phone),
        ("Languages", &record.spoken_languages),
        ("Website", &record.website_url),
    ];
    for (label, value) in optional {
        if let Some(value) = value {
            println!("  {:<12} {}", format!("{}:", label), value);
        }
    }
}
