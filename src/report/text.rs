//! Line text for the record sheet

use crate::asset::Asset;
use crate::fields::or_dash;
use crate::history::HistoryEntry;
use crate::screen::Screen;

/// Limit for profile field values
pub const PROFILE_VALUE_LIMIT: usize = 80;

/// Limit for list lines (screens, assets, history)
pub const LIST_LINE_LIMIT: usize = 115;

pub const ELLIPSIS: &str = "...";

/// Cap `text` at `max` characters, marking the cut with an ellipsis
pub fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}{}", &text[..cut], ELLIPSIS),
        None => text.to_string(),
    }
}

pub fn screen_line(screen: &Screen) -> String {
    let line = format!(
        "- {} | {} | {}\" | {} | Input: {} | Pos: {} | Status: {}",
        screen.brand,
        screen.reference,
        screen.inches,
        screen.orientation,
        screen.input_port,
        screen.position,
        screen.status,
    );
    truncate(&line, LIST_LINE_LIMIT)
}

pub fn asset_line(asset: &Asset) -> String {
    let line = format!(
        "- {} | {} | Serial: {} | Lot: {} | Pos: {} | Status: {}",
        asset.asset_type,
        or_dash(asset.brand_model.as_deref()),
        or_dash(asset.serial.as_deref()),
        or_dash(asset.lot.as_deref()),
        or_dash(asset.position.as_deref()),
        asset.status,
    );
    truncate(&line, LIST_LINE_LIMIT)
}

/// The entry line, plus the resolution line when the entry has one
pub fn history_lines(entry: &HistoryEntry) -> Vec<String> {
    let mut lines = vec![truncate(
        &format!(
            "- Ticket: {} | {} | Status: {} | Tech: {} | {}",
            entry.ticket_code,
            entry.issue_date,
            entry.status,
            or_dash(entry.technician.as_deref()),
            entry.issue_desc,
        ),
        LIST_LINE_LIMIT,
    )];

    if let Some(resolution) = entry.resolution.as_deref().filter(|r| !r.trim().is_empty()) {
        lines.push(truncate(
            &format!(
                "  -> Resolution ({}): {}",
                or_dash(entry.resolution_date.as_deref()),
                resolution
            ),
            LIST_LINE_LIMIT,
        ));
    }
    lines
}

/// Profile value: `-` when absent, capped at the profile limit
pub fn profile_value(value: Option<&str>) -> String {
    truncate(or_dash(value), PROFILE_VALUE_LIMIT)
}
