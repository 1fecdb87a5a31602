use clap::{Parser, Subcommand};

use bokibank::models::QuestionRecord;
use bokibank::report::ValidationReport;
use bokibank::store::{ContentStore, JsonStore, SqliteStore};

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate every question record and print a report grouped by
    /// violation kind. Exits non-zero if any record is invalid.
    Validate {
        /// JSON question bank file.
        #[arg(long, env)]
        json: Option<String>,

        /// SQLite database URL or path.
        #[arg(long, env)]
        database: Option<String>,
    },

    /// Copy all records from a JSON bank into a SQLite database.
    Import {
        /// JSON question bank file to read.
        #[arg(long, env)]
        json: String,

        /// SQLite database URL or path to write.
        #[arg(long, env)]
        database: String,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "bokibank=info".to_owned());
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();

    match args.command {
        Command::Validate { json, database } => {
            let records = load_records(json, database).await?;
            let report = ValidationReport::build(&records);
            print!("{}", report.render());
            if !report.is_clean() {
                std::process::exit(1);
            }
        }
        Command::Import { json, database } => {
            let records = JsonStore::new(json).load_all_questions().await?;
            let store = SqliteStore::new(&database).await?;
            store.save_questions(&records).await?;
            println!(
                "imported {} questions, database now holds {}",
                records.len(),
                store.questions_count().await?
            );
        }
    }

    Ok(())
}

async fn load_records(
    json: Option<String>,
    database: Option<String>,
) -> color_eyre::Result<Vec<QuestionRecord>> {
    match (json, database) {
        (Some(path), None) => JsonStore::new(path).load_all_questions().await,
        (None, Some(url)) => SqliteStore::new(&url).await?.load_all_questions().await,
        _ => Err(color_eyre::eyre::eyre!(
            "pass exactly one of --json or --database"
        )),
    }
}
