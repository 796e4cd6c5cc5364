use clap::{Parser, Subcommand};
use emr_core::constants::DEFAULT_BUSY_TIMEOUT_MS;
use emr_core::repositories::catalog::DiagnosisCatalog;
use emr_core::seed::{seed_catalog, SeedMode, SeedOutcome};
use emr_core::{
    Consultation, CoreConfig, EmrError, EmrResult, EmrService, Pagination, DEFAULT_DATABASE_PATH,
};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Number of catalog entries echoed after seeding.
const SEED_SAMPLE_SIZE: usize = 10;

#[derive(Parser)]
#[command(name = "emr")]
#[command(about = "ClinicCare EMR database CLI")]
struct Cli {
    /// SQLite database file
    #[arg(long, global = true, env = "EMR_DATABASE_PATH", default_value = DEFAULT_DATABASE_PATH)]
    database: PathBuf,

    /// Milliseconds to wait on a locked database
    #[arg(long, global = true, env = "EMR_BUSY_TIMEOUT_MS", default_value_t = DEFAULT_BUSY_TIMEOUT_MS)]
    busy_timeout_ms: u64,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the schema and load the ICD-10 diagnosis catalog
    Seed {
        /// Replace an existing catalog without asking
        #[arg(long)]
        force: bool,
    },
    /// Search diagnosis codes by code or description
    Search {
        /// Search term (optional)
        term: Option<String>,
    },
    /// List consultations, newest first
    List {
        #[arg(long)]
        skip: Option<i64>,
        #[arg(long)]
        limit: Option<i64>,
    },
    /// Show one consultation
    Show {
        /// Consultation id
        id: i64,
    },
    /// Permanently delete a consultation
    Delete {
        /// Consultation id
        id: i64,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("emr=warn".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = Arc::new(CoreConfig::new(
        cli.database,
        Duration::from_millis(cli.busy_timeout_ms),
    )?);
    let service = EmrService::new(cfg);

    match cli.command {
        Some(Commands::Seed { force }) => {
            let mode = if force {
                SeedMode::Force
            } else {
                SeedMode::Interactive
            };
            let outcome = seed_catalog(service.database(), mode, |existing| {
                let stdin = std::io::stdin();
                confirm_replace(existing, &mut stdin.lock(), &mut std::io::stdout())
            })?;

            match outcome {
                SeedOutcome::Declined { existing } => {
                    println!("Kept existing catalog of {} codes.", existing);
                }
                SeedOutcome::Seeded { removed, inserted } => {
                    if removed > 0 {
                        println!("Removed {} existing codes.", removed);
                    }
                    println!("Inserted {} diagnosis codes.", inserted);
                    println!("\nSample codes:");
                    let conn = service.database().connect()?;
                    for code in DiagnosisCatalog::new(&conn).first(SEED_SAMPLE_SIZE)? {
                        println!("  {}: {}", code.code, code.description);
                    }
                }
            }
        }
        Some(Commands::Search { term }) => {
            let codes = service.search_diagnosis_codes(term.as_deref())?;
            if codes.is_empty() {
                println!("No diagnosis codes found.");
            }
            for code in codes {
                println!("{}: {}", code.code, code.description);
            }
        }
        Some(Commands::List { skip, limit }) => {
            let page = service.list_consultations(Pagination::new(skip, limit)?)?;
            if page.consultations.is_empty() {
                println!("No consultations found.");
            }
            for consultation in &page.consultations {
                println!("{}", summary_line(consultation));
            }
            println!("Total: {}", page.total);
        }
        Some(Commands::Show { id }) => {
            let consultation = service.get_consultation(id)?;
            print!("{}", details(&consultation));
        }
        Some(Commands::Delete { id }) => {
            service.delete_consultation(id)?;
            println!("Deleted consultation {}", id);
        }
        None => {
            println!("Use 'emr --help' for commands");
        }
    }

    Ok(())
}

/// Asks whether to replace `existing` catalog rows. Anything but `y`/`yes` declines.
fn confirm_replace<R, W>(existing: i64, input: &mut R, output: &mut W) -> EmrResult<bool>
where
    R: BufRead,
    W: Write,
{
    write!(
        output,
        "The diagnosis catalog already has {} codes. Replace them? [y/N] ",
        existing
    )
    .map_err(EmrError::Prompt)?;
    output.flush().map_err(EmrError::Prompt)?;

    let mut answer = String::new();
    input.read_line(&mut answer).map_err(EmrError::Prompt)?;
    let answer = answer.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}

fn summary_line(c: &Consultation) -> String {
    format!(
        "ID: {}, Patient: {}, Date: {}, Codes: {}",
        c.id,
        c.patient_name,
        c.consultation_date.format("%Y-%m-%d %H:%M"),
        c.diagnosis_codes.as_slice().join(", ")
    )
}

fn details(c: &Consultation) -> String {
    format!(
        "ID: {}\nPatient: {}\nConsultation date: {}\nCreated: {}\nDiagnosis codes: {}\nTreatment notes:\n{}\n",
        c.id,
        c.patient_name,
        c.consultation_date.to_rfc3339(),
        c.created_at.to_rfc3339(),
        c.diagnosis_codes.as_slice().join(", "),
        c.treatment_notes
    )
}
