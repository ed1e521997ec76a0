use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use grade_aggregates::config::{Settings, DEFAULT_THRESHOLD};
use grade_aggregates::db::{self, PgSource};
use grade_aggregates::models::{Aggregate, ClassAverage, ThresholdStats};
use grade_aggregates::source::{MemorySource, RecordSource};
use grade_aggregates::{csv_records, logging, queries, report};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

#[derive(Parser)]
#[command(name = "grade-aggregates")]
#[command(about = "Weighted class averages and threshold statistics for learner grades", long_about = None)]
struct Cli {
    #[command(flatten)]
    engine: EngineArgs,

    /// Read records from a score CSV instead of Postgres
    #[arg(long, global = true)]
    from_csv: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct EngineArgs {
    #[arg(long, global = true, env = "GRADES_EXAM_WEIGHT", default_value_t = 0.5)]
    exam_weight: f64,
    #[arg(long, global = true, env = "GRADES_QUIZ_WEIGHT", default_value_t = 0.3)]
    quiz_weight: f64,
    #[arg(long, global = true, env = "GRADES_HOMEWORK_WEIGHT", default_value_t = 0.2)]
    homework_weight: f64,
    /// Averages strictly above this count as passing
    #[arg(long, global = true, env = "GRADES_THRESHOLD", default_value_t = DEFAULT_THRESHOLD)]
    threshold: f64,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema and indexes
    InitDb,
    /// Load demo grade records
    Seed,
    /// Import score rows from a CSV file
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Weighted average per class for one learner
    ClassAverages {
        #[arg(allow_negative_numbers = true)]
        learner_id: i64,
    },
    /// Threshold statistics across all records, or for one class
    Stats {
        #[arg(allow_negative_numbers = true)]
        class_id: Option<i64>,
    },
    /// Generate a markdown report
    Report {
        #[arg(long, allow_negative_numbers = true)]
        class: Option<i64>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

async fn connect() -> anyhow::Result<PgPool> {
    let database_url = std::env::var("DATABASE_URL")
        .context("DATABASE_URL must be set to a production Postgres instance")?;

    PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("failed to connect to Postgres")
}

async fn open_source(from_csv: Option<&PathBuf>) -> anyhow::Result<Box<dyn RecordSource>> {
    match from_csv {
        Some(path) => {
            let records = csv_records::read_records(path)?;
            info!(records = records.len(), path = %path.display(), "loaded records from csv");
            Ok(Box::new(MemorySource::new(records)))
        }
        None => Ok(Box::new(PgSource::new(connect().await?))),
    }
}

fn print_averages(learner_id: i64, averages: &[ClassAverage], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(averages)?);
        return Ok(());
    }

    println!("Class averages for learner {learner_id}:");
    for average in averages {
        if average.avg.is_nan() {
            println!("- class {}: incomplete (missing score types)", average.class_id);
        } else {
            println!("- class {}: {:.2}", average.class_id, average.avg);
        }
    }
    Ok(())
}

fn print_stats(stats: &ThresholdStats, threshold: f64, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(stats)?);
        return Ok(());
    }

    println!(
        "{} of {} enrollments above {:.1} ({:.1}%)",
        stats.above_threshold_count,
        stats.total_learners,
        threshold,
        stats.above_threshold_percentage
    );
    Ok(())
}

impl EngineArgs {
    fn settings(&self) -> anyhow::Result<Settings> {
        Settings::from_raw(
            self.exam_weight,
            self.quiz_weight,
            self.homework_weight,
            self.threshold,
        )
        .context("invalid engine configuration")
    }
}

fn no_data_output(message: &str, json: bool) -> String {
    if json {
        serde_json::json!({ "error": message }).to_string()
    } else {
        message.to_string()
    }
}

fn no_data(message: &str, json: bool) -> anyhow::Result<ExitCode> {
    println!("{}", no_data_output(message, json));
    Ok(ExitCode::FAILURE)
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    logging::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::InitDb => {
            db::init_db(&connect().await?).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            db::seed(&connect().await?).await?;
            println!("Seed data inserted.");
        }
        Commands::Import { csv } => {
            let written = db::import_csv(&connect().await?, &csv).await?;
            println!("Wrote {written} grade records from {}.", csv.display());
        }
        Commands::ClassAverages { learner_id } => {
            let settings = cli.engine.settings()?;
            let source = open_source(cli.from_csv.as_ref()).await?;
            match queries::learner_class_averages(source.as_ref(), learner_id, &settings.weights)
                .await?
            {
                Aggregate::NoData => {
                    return no_data(
                        &format!("No grade records found for learner {learner_id}."),
                        cli.json,
                    );
                }
                Aggregate::Data(averages) => print_averages(learner_id, &averages, cli.json)?,
            }
        }
        Commands::Stats { class_id } => {
            let settings = cli.engine.settings()?;
            let source = open_source(cli.from_csv.as_ref()).await?;
            let result = match class_id {
                Some(class_id) => {
                    queries::class_stats(source.as_ref(), class_id, settings.threshold).await?
                }
                None => queries::overall_stats(source.as_ref(), settings.threshold).await?,
            };

            match result {
                Aggregate::NoData => {
                    let message = match class_id {
                        Some(class_id) => format!("No data found for class {class_id}."),
                        None => "No grade records found.".to_string(),
                    };
                    return no_data(&message, cli.json);
                }
                Aggregate::Data(stats) => {
                    print_stats(&stats, settings.threshold.value(), cli.json)?
                }
            }
        }
        Commands::Report { class, out } => {
            let settings = cli.engine.settings()?;
            let source = open_source(cli.from_csv.as_ref()).await?;
            let records = match class {
                Some(class_id) => source.find_by_class(class_id).await?,
                None => source.find_all().await?,
            };
            let report = report::build_report(
                class,
                settings.threshold,
                &settings.weights,
                chrono::Utc::now().date_naive(),
                &records,
            );
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(ExitCode::SUCCESS)
}
