//! CLI smoke entry point.
//!
//! # Responsibility
//! - Open the store selected by `TREENOTE_DB_PATH` (or the first argument),
//!   run `init`, and print a deterministic summary.
//! - `tree` as the next argument prints every folder with its note count.

use std::error::Error;
use std::process::ExitCode;
use treenote_core::config::DB_PATH_ENV;
use treenote_core::{Store, StoreOptions};

const LOG_DIR_ENV: &str = "TREENOTE_LOG_DIR";

#[tokio::main]
async fn main() -> ExitCode {
    match run(std::env::args().skip(1).collect()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("event=cli_run module=cli status=error error={err}");
            eprintln!("treenote: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Vec<String>) -> Result<(), Box<dyn Error>> {
    if let Ok(log_dir) = std::env::var(LOG_DIR_ENV) {
        treenote_core::init_logging(&treenote_core::log_level_from_env(), &log_dir)?;
    }

    let mut args = args.into_iter();
    let mut options = StoreOptions::from_env();
    let mut command = None;
    if let Some(first) = args.next() {
        if first == "tree" {
            command = Some(first);
        } else {
            options = StoreOptions::sqlite(options.name, first);
            command = args.next();
        }
    }

    let store = Store::open(&options)?;
    let report = store.init().await?;

    println!("treenote_core ping={}", treenote_core::ping());
    println!("treenote_core version={}", treenote_core::core_version());
    println!("store name={}", store.name());
    println!(
        "init folders_created={} notes_scanned={}",
        report.folders_created, report.notes_scanned
    );

    match command.as_deref() {
        None => {
            let folders = store.list_folders().await?;
            let notes = store.list_notes().await?;
            println!("folders={} notes={}", folders.len(), notes.len());
        }
        Some("tree") => {
            for folder in store.list_folders().await? {
                let notes = store.list_notes_in_folder(&folder.path).await?;
                println!("{} notes={}", folder.path, notes.len());
            }
        }
        Some(other) => {
            return Err(format!(
                "unknown command `{other}`; usage: treenote [db_path] [tree] (or set {DB_PATH_ENV})"
            )
            .into());
        }
    }
    Ok(())
}
