//! CLI smoke entry point.
//!
//! Opens the configured store, loads the reference catalog and prints a short
//! summary. Exits non-zero when any step fails.

use std::process::ExitCode;
use tonguetag_core::db::open_db;
use tonguetag_core::{CoreConfig, FeatureCategory, ReferenceRepository, SqliteReferenceRepository};

fn main() -> ExitCode {
    println!("tonguetag_core ping={}", tonguetag_core::ping());
    println!("tonguetag_core version={}", tonguetag_core::core_version());

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("tonguetag_cli error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    let config = CoreConfig::from_env().map_err(|err| format!("config: {err}"))?;
    let file_logging = config
        .init_logging()
        .map_err(|err| format!("logging: {err}"))?;
    println!("file_logging={file_logging} level={}", config.log_level);

    let conn = open_db(&config.db_path)
        .map_err(|err| format!("open `{}`: {err}", config.db_path.display()))?;
    let catalog = SqliteReferenceRepository::new(&conn)
        .load_catalog()
        .map_err(|err| format!("catalog: {err}"))?;

    println!("db_path={}", config.db_path.display());
    println!(
        "atoms={} composites={} tongue_shapes={}",
        catalog.atoms().len(),
        catalog.composites().len(),
        catalog.features_in(FeatureCategory::TongueShape).len()
    );
    log::info!("event=cli_probe module=cli status=ok");
    Ok(())
}
