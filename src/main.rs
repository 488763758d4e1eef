use kindle_highlights::config::Config;
use kindle_highlights::db::{init_db, insert_highlight};
use kindle_highlights::import::{filter_by_date, find_clippings_files};
use kindle_highlights::parser::parse_clippings_bytes;
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::load().unwrap_or_else(|e| {
        tracing::error!(error = %e, "invalid configuration");
        std::process::exit(1);
    });

    let files = find_clippings_files(Path::new(&config.clippings_path));
    if files.is_empty() {
        tracing::error!(path = %config.clippings_path, "no clippings file found");
        std::process::exit(1);
    }
    tracing::info!(count = files.len(), "found clippings files");

    let conn = init_db(Path::new(&config.database_path)).unwrap_or_else(|e| {
        tracing::error!(error = %e, path = %config.database_path, "failed to open database");
        std::process::exit(1);
    });

    for file in files {
        let bytes = std::fs::read(&file).unwrap_or_else(|e| {
            tracing::error!(error = %e, path = ?file, "failed to read clippings file");
            std::process::exit(1);
        });
        let highlights = parse_clippings_bytes(&bytes).unwrap_or_else(|e| {
            tracing::error!(error = %e, path = ?file, "failed to parse clippings file");
            std::process::exit(1);
        });
        let parsed = highlights.len();

        let highlights = match config.date_range {
            Some((from, to)) => filter_by_date(highlights, from, to),
            None => highlights,
        };

        let mut inserted = 0;
        for highlight in &highlights {
            match insert_highlight(&conn, highlight) {
                Ok(true) => inserted += 1,
                Ok(false) => {}
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        title = %highlight.book.title,
                        "failed to store highlight"
                    );
                    std::process::exit(1);
                }
            }
        }

        tracing::info!(
            path = ?file,
            parsed,
            kept = highlights.len(),
            inserted,
            "imported clippings"
        );
    }
}
