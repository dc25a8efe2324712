//! Update note preview truncation.

/// Notes shorter than this render in full; longer ones are cut for the
/// collapsed preview.
pub const NOTE_PREVIEW_LIMIT: usize = 150;

/// Collapsed-or-expanded note text. Expanded notes and notes shorter than
/// [`NOTE_PREVIEW_LIMIT`] characters pass through unchanged; everything
/// else is the first [`NOTE_PREVIEW_LIMIT`] characters plus "...".
pub fn truncate_notes(notes: &str, expanded: bool) -> String {
    truncate_notes_at(notes, expanded, NOTE_PREVIEW_LIMIT)
}

/// [`truncate_notes`] with an explicit limit.
pub fn truncate_notes_at(notes: &str, expanded: bool, limit: usize) -> String {
    if expanded || notes.chars().count() < limit {
        return notes.to_string();
    }
    let head: String = notes.chars().take(limit).collect();
    format!("{}...", head)
}
