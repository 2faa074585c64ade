//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `wordpool_core` linkage without a mobile runtime.
//! - Optionally summarize a SQLite-backed store: `wordpool_cli [DB_PATH]`.
//! - Write logs under `WORDPOOL_LOG_DIR` when it is set.

use std::process::ExitCode;
use std::sync::Arc;
use wordpool_core::{SettingsRepository, SqliteKvStore, SystemClock, WordRepository};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    println!("wordpool_core ping={}", wordpool_core::ping());
    println!("wordpool_core version={}", wordpool_core::core_version());

    if let Ok(log_dir) = std::env::var("WORDPOOL_LOG_DIR") {
        let level = wordpool_core::default_log_level();
        if let Err(err) = wordpool_core::init_logging(level, &log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let Some(db_path) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };

    let store = match SqliteKvStore::open(&db_path) {
        Ok(store) => Arc::new(store),
        Err(err) => {
            eprintln!("cannot open store `{db_path}`: {err}");
            return ExitCode::FAILURE;
        }
    };

    let words = WordRepository::new(store.clone(), Arc::new(SystemClock));
    let settings = SettingsRepository::new(store).load().await;
    let all = words.list_all().await;
    let pool = all.iter().filter(|word| word.is_eligible()).count();
    let learned = all.iter().filter(|word| word.is_learned).count();

    println!("words total={} pool={} learned={}", all.len(), pool, learned);
    println!(
        "reminders enabled={} window={:02}:00-{:02}:00",
        settings.enabled, settings.start_hour, settings.end_hour
    );
    ExitCode::SUCCESS
}
