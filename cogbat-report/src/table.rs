//! Delimited text table: a key/value header block, a blank line, then one
//! row per trial.

use std::str::FromStr;

use cogbat_core::{Credit, TrialResult};
use cogbat_experiment::{CompletedSession, TaskKind};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::error::ReportError;

const COLUMNS: [&str; 7] = [
    "trial",
    "stimulus",
    "condition",
    "expected",
    "response",
    "correct",
    "reaction_time_s",
];
const CREDIT_COLUMNS: [&str; 2] = ["hits", "total"];

/// A table read back from text.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTable {
    pub participant: String,
    pub attributes: Vec<(String, String)>,
    pub task: String,
    pub completed_at: String,
    pub columns: Vec<String>,
    pub rows: Vec<TrialResult>,
}

impl ParsedTable {
    pub fn task_kind(&self) -> Option<TaskKind> {
        self.task.parse().ok()
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn completed_at(&self) -> Option<OffsetDateTime> {
        OffsetDateTime::parse(&self.completed_at, &Rfc3339).ok()
    }
}

/// Renders the session stamped with its own completion time.
pub fn render_table(session: &CompletedSession) -> Result<String, ReportError> {
    render_table_at(session, session.completed_at)
}

pub fn render_table_at(
    session: &CompletedSession,
    completed_at: OffsetDateTime,
) -> Result<String, ReportError> {
    let with_credit =
        session.task == TaskKind::WordRecall || session.log.iter().any(|r| r.credit.is_some());

    let mut rows: Vec<Vec<String>> = Vec::with_capacity(session.log.len() + 8);
    rows.push(vec![
        "participant".to_string(),
        session.participant.identifier().to_string(),
    ]);
    for (key, value) in session.participant.attributes() {
        rows.push(vec![key.clone(), value.clone()]);
    }
    rows.push(vec!["task".to_string(), session.task.slug().to_string()]);
    rows.push(vec!["completed_at".to_string(), completed_at.format(&Rfc3339)?]);
    rows.push(Vec::new());

    let mut header: Vec<String> = COLUMNS.iter().map(|c| c.to_string()).collect();
    if with_credit {
        header.extend(CREDIT_COLUMNS.iter().map(|c| c.to_string()));
    }
    rows.push(header);

    for result in &session.log {
        let mut row = vec![
            result.trial.to_string(),
            result.stimulus.clone(),
            result.condition.clone(),
            result.expected.clone(),
            result.response.clone(),
            result.correct.to_string(),
            result.reaction_time_s.to_string(),
        ];
        if with_credit {
            match result.credit {
                Some(credit) => {
                    row.push(credit.hits.to_string());
                    row.push(credit.total.to_string());
                }
                None => row.extend([String::new(), String::new()]),
            }
        }
        rows.push(row);
    }

    let mut out = String::new();
    for row in rows {
        let line = row
            .iter()
            .map(|field| escape_field(field))
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&line);
        out.push('\n');
    }
    Ok(out)
}

/// Quotes fields holding a delimiter, quote or line break.
fn escape_field(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    let needs_quotes =
        value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r');
    if needs_quotes {
        let escaped = value.replace('"', "\"\"");
        format!("\"{escaped}\"")
    } else {
        value.to_string()
    }
}

pub fn parse_table(text: &str) -> Result<ParsedTable, ReportError> {
    let records = split_records(text)?;
    let blank = records
        .iter()
        .position(|(_, fields)| is_blank(fields))
        .ok_or_else(|| ReportError::parse(1, "no blank line after the header block"))?;
    let (meta, body) = records.split_at(blank);

    let mut pairs = Vec::with_capacity(meta.len());
    for (line, fields) in meta {
        match fields.as_slice() {
            [key, value] => pairs.push((*line, key.clone(), value.clone())),
            _ => {
                return Err(ReportError::parse(
                    *line,
                    format!("expected key,value but found {} fields", fields.len()),
                ));
            }
        }
    }
    let participant = take_key(pairs.first().cloned(), "participant", 1)?;
    let completed_at = take_key(pairs.pop(), "completed_at", blank)?;
    let task = take_key(pairs.pop(), "task", blank)?;
    let attributes = pairs
        .into_iter()
        .skip(1)
        .map(|(_, key, value)| (key, value))
        .collect();

    let mut body = body.iter().skip(1).filter(|(_, fields)| !is_blank(fields));
    let (header_line, columns) = body
        .next()
        .ok_or_else(|| ReportError::parse(blank + 1, "missing column header"))?;
    let with_credit = column_layout(*header_line, columns)?;

    let mut rows: Vec<TrialResult> = Vec::new();
    for (line, fields) in body {
        let row = parse_row(*line, fields, with_credit)?;
        if rows.last().is_some_and(|prev| prev.trial >= row.trial) {
            return Err(ReportError::parse(*line, "trial numbers must increase"));
        }
        rows.push(row);
    }

    Ok(ParsedTable {
        participant,
        attributes,
        task,
        completed_at,
        columns: columns.clone(),
        rows,
    })
}

fn take_key(
    pair: Option<(usize, String, String)>,
    expected: &str,
    fallback_line: usize,
) -> Result<String, ReportError> {
    match pair {
        Some((_, key, value)) if key == expected => Ok(value),
        Some((line, key, _)) => Err(ReportError::parse(
            line,
            format!("expected `{expected}` but found `{key}`"),
        )),
        None => Err(ReportError::parse(
            fallback_line,
            format!("missing `{expected}`"),
        )),
    }
}

/// Returns whether the credit columns are present.
fn column_layout(line: usize, columns: &[String]) -> Result<bool, ReportError> {
    let base = columns.len() >= COLUMNS.len()
        && columns.iter().zip(COLUMNS).all(|(have, want)| have == want);
    let rest = columns.get(COLUMNS.len()..).unwrap_or_default();
    if base && rest.is_empty() {
        return Ok(false);
    }
    if base && rest.iter().map(String::as_str).eq(CREDIT_COLUMNS) {
        return Ok(true);
    }
    Err(ReportError::parse(
        line,
        format!("unexpected columns: {}", columns.join(",")),
    ))
}

fn parse_row(line: usize, fields: &[String], with_credit: bool) -> Result<TrialResult, ReportError> {
    let width = COLUMNS.len() + if with_credit { CREDIT_COLUMNS.len() } else { 0 };
    if fields.len() != width {
        return Err(ReportError::parse(
            line,
            format!("expected {width} fields but found {}", fields.len()),
        ));
    }
    let credit = if with_credit && !(fields[7].is_empty() && fields[8].is_empty()) {
        Some(Credit {
            hits: parse_field(line, "hits", &fields[7])?,
            total: parse_field(line, "total", &fields[8])?,
        })
    } else {
        None
    };
    Ok(TrialResult {
        trial: parse_field(line, "trial", &fields[0])?,
        stimulus: fields[1].clone(),
        condition: fields[2].clone(),
        expected: fields[3].clone(),
        response: fields[4].clone(),
        correct: parse_field(line, "correct", &fields[5])?,
        reaction_time_s: parse_field(line, "reaction_time_s", &fields[6])?,
        credit,
    })
}

fn parse_field<T: FromStr>(line: usize, column: &str, raw: &str) -> Result<T, ReportError> {
    raw.parse()
        .map_err(|_| ReportError::parse(line, format!("invalid {column}: {raw:?}")))
}

fn is_blank(fields: &[String]) -> bool {
    matches!(fields, [only] if only.is_empty())
}

/// Splits text into records of fields, each tagged with the line it starts
/// on. Quoted fields may span lines.
fn split_records(text: &str) -> Result<Vec<(usize, Vec<String>)>, ReportError> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut line = 1;
    let mut start = 1;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if quoted {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => quoted = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }
        match c {
            '"' if field.is_empty() => quoted = true,
            ',' => fields.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                fields.push(std::mem::take(&mut field));
                records.push((start, std::mem::take(&mut fields)));
                line += 1;
                start = line;
            }
            _ => field.push(c),
        }
    }
    if quoted {
        return Err(ReportError::parse(start, "unterminated quoted field"));
    }
    if !field.is_empty() || !fields.is_empty() {
        fields.push(field);
        records.push((start, fields));
    }
    Ok(records)
}
