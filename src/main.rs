mod error;
mod lookup;
mod models;
mod utils;

use clap::{Parser, Subcommand};
use dotenv::dotenv;
use log::{error, info};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

use crate::lookup::LookupController;
use crate::models::{LookupOutcome, LookupRequest, SEMESTERS};
use crate::utils::display::{results_table, student_info_block};
use crate::utils::portal::{PortalClient, PortalConfig};

#[derive(Parser)]
#[command(name = "diu-results")]
#[command(about = "Fetches DIU semester results and computes the CGPA", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up one semester's results for a student
    Fetch {
        #[arg(long)]
        student_id: String,
        /// Semester code, e.g. 243 (see `semesters`)
        #[arg(long)]
        semester: String,
    },
    /// List the semester codes the portal accepts
    Semesters,
}

// Entry point for the async main function, powered by tokio runtime.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loads environment variables from a `.env` file, if present.
    dotenv().ok();

    // Initializes logging with simplelog to the terminal with mixed output (both stdout and stderr) and automatic color support.
    TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto
    ).unwrap();

    let cli = Cli::parse();

    match cli.command {
        Commands::Semesters => {
            for semester in SEMESTERS {
                println!("{}  {}", semester.code, semester.label);
            }
        }
        Commands::Fetch {
            student_id,
            semester,
        } => {
            let config = PortalConfig::from_env()?;
            let client = PortalClient::new(config)?;
            let mut controller = LookupController::new(client);
            let request = LookupRequest {
                student_id,
                semester_id: semester,
            };

            if let Err(e) = controller.submit_lookup(&request).await {
                error!("Lookup failed: {}", e);
                std::process::exit(1);
            }

            if let LookupOutcome::Success { student, courses } = controller.outcome() {
                info!("Results retrieved successfully");
                println!("{}", student_info_block(student));
                println!();
                println!("{}", results_table(courses));
            }
        }
    }

    Ok(())
}
