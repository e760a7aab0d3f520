//! Stimulus generators and scorers, one per task.

mod card_sort;
mod digit_span;
mod flanker;
mod stroop;
mod word_recall;

pub use card_sort::CardSortTask;
pub use digit_span::DigitSpanTask;
pub use flanker::FlankerTask;
pub use stroop::StroopTask;
pub use word_recall::WordRecallTask;

/// Trimmed, lower-cased, inner whitespace collapsed to single spaces.
pub(crate) fn normalize_label(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
