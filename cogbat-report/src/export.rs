use std::fs;
use std::path::{Path, PathBuf};

use cogbat_experiment::{CompletedSession, TaskKind};
use serde::Serialize;
use time::OffsetDateTime;
use time::macros::format_description;
use tracing::info;

use crate::error::ReportError;
use crate::summary::Summary;
use crate::table::render_table;

#[derive(Serialize)]
struct JsonExport<'a> {
    summary: Summary,
    #[serde(flatten)]
    session: &'a CompletedSession,
}

/// `YYYYMMDD_HHMMSS` for file names.
pub fn timestamp_slug(at: OffsetDateTime) -> String {
    at.format(&format_description!(
        "[year][month][day]_[hour][minute][second]"
    ))
    .unwrap_or_else(|_| "export".into())
}

/// `<task>_results_<participant>_<stamp>.<ext>`, with anything outside
/// `[A-Za-z0-9_-]` in the identifier replaced by `_`.
pub fn export_filename(task: TaskKind, participant: &str, stamp: &str, ext: &str) -> String {
    let participant: String = participant
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{}_results_{participant}_{stamp}.{ext}", task.slug())
}

pub fn export_csv(dir: &Path, session: &CompletedSession) -> Result<PathBuf, ReportError> {
    let body = render_table(session)?;
    write_export(dir, session, "csv", body)
}

pub fn export_json(dir: &Path, session: &CompletedSession) -> Result<PathBuf, ReportError> {
    let export = JsonExport {
        summary: Summary::from_log(&session.log),
        session,
    };
    let body = serde_json::to_string_pretty(&export)?;
    write_export(dir, session, "json", body)
}

fn write_export(
    dir: &Path,
    session: &CompletedSession,
    ext: &str,
    body: String,
) -> Result<PathBuf, ReportError> {
    fs::create_dir_all(dir).map_err(|source| ReportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let name = export_filename(
        session.task,
        session.participant.identifier(),
        &timestamp_slug(session.completed_at),
        ext,
    );
    let path = dir.join(name);
    fs::write(&path, body).map_err(|source| ReportError::Io {
        path: path.clone(),
        source,
    })?;
    info!(path = %path.display(), trials = session.log.len(), "results exported");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn slug_is_compact_utc_stamp() {
        assert_eq!(
            timestamp_slug(datetime!(2026-10-16 09:05:07 UTC)),
            "20261016_090507"
        );
    }

    #[test]
    fn filename_sanitizes_identifier() {
        assert_eq!(
            export_filename(TaskKind::Stroop, "Ada Lovelace/1", "20261016_090507", "csv"),
            "stroop_results_Ada_Lovelace_1_20261016_090507.csv"
        );
        assert_eq!(
            export_filename(TaskKind::DigitSpanStaircase, "p-01", "x", "json"),
            "digit_span_staircase_results_p-01_x.json"
        );
    }
}
