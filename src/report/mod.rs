//! Store record sheet - a printable A4 summary of one store
//!
//! The sheet lists the store profile followed by its screens, assets and
//! support history. Building the page model ([`StoreReport::layout`]) is
//! separate from writing it out ([`pdf::write_pdf`]), so pagination can be
//! checked without reading PDF bytes back.

pub mod layout;
pub mod pdf;
pub mod text;

use std::path::{Path, PathBuf};
use chrono::{Local, NaiveDateTime};
use crate::asset::Asset;
use crate::history::HistoryEntry;
use crate::screen::Screen;
use crate::storage::Database;
use crate::store::Store;
use crate::Result;
use layout::{FontWeight, Layout, LEFT_MARGIN, PAGE_HEIGHT};

pub const TITLE: &str = "STORE RECORD SHEET";
pub const PROFILE_HEADING: &str = "1) Store Profile";
pub const SCREENS_HEADING: &str = "2) Screens";
pub const ASSETS_HEADING: &str = "3) Assets";
pub const HISTORY_HEADING: &str = "4) History";

const NO_SCREENS: &str = "- No screens recorded";
const NO_ASSETS: &str = "- No assets recorded";
const NO_HISTORY: &str = "- No history recorded";

/// Where profile values start
const VALUE_COLUMN: f32 = 180.0;
const TITLE_TOP: f32 = 50.0;
const LIST_FONT_SIZE: f32 = 9.0;
const LIST_LINE_HEIGHT: f32 = 12.0;

/// Everything the sheet shows for one store
#[derive(Debug, Clone)]
pub struct StoreReport {
    pub store: Store,
    pub screens: Vec<Screen>,
    pub assets: Vec<Asset>,
    /// Most recent issue first
    pub history: Vec<HistoryEntry>,
}

/// Result of writing a sheet to disk
#[derive(Debug, Clone, serde::Serialize)]
pub struct RenderSummary {
    pub path: PathBuf,
    pub pages: usize,
    pub lines: usize,
}

impl StoreReport {
    /// Read the store and its child records; `NotFound` if the store is missing
    pub fn load(db: &Database, store_id: i64) -> Result<Self> {
        let store = db.get_store(store_id)?;
        Ok(Self {
            screens: db.list_screens(store.id)?,
            assets: db.list_assets(store.id)?,
            history: db.list_history(store.id)?,
            store,
        })
    }

    /// Lay the sheet out on A4 pages
    pub fn layout(&self, generated_at: NaiveDateTime) -> Layout {
        let mut page = Layout::new(PAGE_HEIGHT - TITLE_TOP);

        page.text(LEFT_MARGIN, 14.0, FontWeight::Bold, TITLE);
        page.advance(15.0);
        page.text(
            LEFT_MARGIN,
            9.0,
            FontWeight::Regular,
            format!("Generated: {}", generated_at.format("%Y-%m-%d %H:%M")),
        );
        page.advance(10.0);
        page.rule();
        page.advance(18.0);

        page.text(LEFT_MARGIN, 12.0, FontWeight::Bold, PROFILE_HEADING);
        page.advance(18.0);
        for (label, value) in self.profile_fields() {
            page.text(LEFT_MARGIN, 10.0, FontWeight::Bold, format!("{}:", label));
            page.text(VALUE_COLUMN, 10.0, FontWeight::Regular, value);
            page.advance(14.0);
        }
        section_break(&mut page);

        let screens: Vec<Vec<String>> = self.screens.iter().map(|s| vec![text::screen_line(s)]).collect();
        list_section(&mut page, SCREENS_HEADING, &screens, NO_SCREENS);
        section_break(&mut page);

        let assets: Vec<Vec<String>> = self.assets.iter().map(|a| vec![text::asset_line(a)]).collect();
        list_section(&mut page, ASSETS_HEADING, &assets, NO_ASSETS);
        section_break(&mut page);

        let history: Vec<Vec<String>> = self.history.iter().map(text::history_lines).collect();
        list_section(&mut page, HISTORY_HEADING, &history, NO_HISTORY);

        page
    }

    fn profile_fields(&self) -> Vec<(&'static str, String)> {
        let s = &self.store;
        vec![
            ("Code", text::profile_value(Some(&s.code))),
            ("Name", text::profile_value(Some(&s.name))),
            ("Address", text::profile_value(s.address.as_deref())),
            ("Zone", text::profile_value(s.zone.as_deref())),
            ("Region", text::profile_value(s.region.as_deref())),
            ("Contact 1", text::profile_value(Some(&s.contact.summary()))),
            ("Contact 2", text::profile_value(Some(&s.contact_2.summary()))),
            ("Email", text::profile_value(s.email.as_deref())),
            ("Notes", text::profile_value(s.notes.as_deref())),
        ]
    }
}

fn section_break(page: &mut Layout) {
    page.advance(6.0);
    page.rule();
    page.advance(18.0);
}

/// Heading plus one group of lines per record; page breaks are checked after
/// each record so a record's lines stay together on a page
fn list_section(page: &mut Layout, heading: &str, records: &[Vec<String>], placeholder: &str) {
    page.text(LEFT_MARGIN, 12.0, FontWeight::Bold, heading);
    page.advance(16.0);

    if records.is_empty() {
        page.text(LEFT_MARGIN, LIST_FONT_SIZE, FontWeight::Regular, placeholder);
        page.advance(14.0);
        return;
    }

    for lines in records {
        for line in lines {
            page.text(LEFT_MARGIN, LIST_FONT_SIZE, FontWeight::Regular, line.as_str());
            page.advance(LIST_LINE_HEIGHT);
        }
        page.check_page_break();
    }
}

/// File name used when the caller gives none: `Record_<code>.pdf`
pub fn default_file_name(store: &Store) -> String {
    let code: String = store
        .code
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("Record_{}.pdf", code)
}

/// Load a store and write its record sheet to `path`
pub fn render_store_report(db: &Database, store_id: i64, path: &Path) -> Result<RenderSummary> {
    let report = StoreReport::load(db, store_id)?;
    let layout = report.layout(Local::now().naive_local());

    let title = format!("{} - {}", TITLE, report.store.code);
    pdf::write_pdf(&layout, &title, path)?;

    let summary = RenderSummary {
        path: path.to_path_buf(),
        pages: layout.page_count(),
        lines: layout.texts().count(),
    };
    tracing::info!(
        "Wrote record sheet for {} to {} ({} pages)",
        report.store.code,
        path.display(),
        summary.pages
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{AssetInput, AssetType};
    use crate::history::HistoryInput;
    use crate::screen::ScreenInput;
    use crate::store::StoreInput;
    use crate::Error;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn generated_at() -> NaiveDateTime {
        date("2024-06-01").and_hms_opt(9, 30, 0).unwrap()
    }

    /// Text drawn after `heading` and before `next` (or the end)
    fn section<'a>(layout: &'a Layout, heading: &str, next: Option<&str>) -> Vec<&'a str> {
        layout
            .texts()
            .skip_while(|t| *t != heading)
            .skip(1)
            .take_while(|t| Some(*t) != next)
            .collect()
    }

    fn scenario_db() -> (Database, i64) {
        let db = Database::open_in_memory().unwrap();
        let store = db.create_store(&StoreInput::new("LOC-001", "Mall Central")).unwrap();
        db.add_screen(store.id, &ScreenInput::new("LG", "49UH5F", 55, "muro caja")).unwrap();
        db.add_history(
            store.id,
            &HistoryInput::new("ZD-1", date("2024-01-01"), "pantalla apagada"),
        )
        .unwrap();
        (db, store.id)
    }

    #[test]
    fn test_end_to_end_single_page() {
        let (db, store_id) = scenario_db();
        let layout = StoreReport::load(&db, store_id).unwrap().layout(generated_at());

        assert_eq!(layout.page_count(), 1);
        let texts: Vec<&str> = layout.texts().collect();
        assert_eq!(texts[0], TITLE);
        assert_eq!(texts[1], "Generated: 2024-06-01 09:30");

        let profile = section(&layout, PROFILE_HEADING, Some(SCREENS_HEADING));
        assert_eq!(&profile[..2], &["Code:", "LOC-001"]);
        assert!(profile.contains(&"- | -"));

        let screens = section(&layout, SCREENS_HEADING, Some(ASSETS_HEADING));
        assert_eq!(
            screens,
            vec!["- LG | 49UH5F | 55\" | Horizontal | Input: HDMI1 | Pos: muro caja | Status: Operativa"]
        );

        assert_eq!(section(&layout, ASSETS_HEADING, Some(HISTORY_HEADING)), vec![NO_ASSETS]);

        let history = section(&layout, HISTORY_HEADING, None);
        assert_eq!(history.len(), 1);
        assert!(history[0].contains("ZD-1"));
        assert!(history[0].contains("pantalla apagada"));
    }

    #[test]
    fn test_blank_text_columns_render_as_dash() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stores.db");
        let db = Database::open(&path).unwrap();
        {
            let conn = rusqlite::Connection::open(&path).unwrap();
            conn.execute(
                "INSERT INTO stores (code, name, address, zone, region, contact_name, contact_phone, \
                 contact_name_2, contact_phone_2, contact_email, notes, created_at) \
                 VALUES ('LOC-010', 'Plaza', '', '', '', '', '', '', '', '', '', '2023-01-01T00:00:00')",
                [],
            )
            .unwrap();
        }
        let store = db.find_store_by_code("LOC-010").unwrap().unwrap();
        assert!(store.contact.is_empty());

        let layout = StoreReport::load(&db, store.id).unwrap().layout(generated_at());
        let profile = section(&layout, PROFILE_HEADING, Some(SCREENS_HEADING));
        let value_of = |label: &str| {
            let at = profile.iter().position(|t| *t == label).unwrap();
            profile[at + 1]
        };
        assert_eq!(value_of("Zone:"), "-");
        assert_eq!(value_of("Contact 1:"), "- | -");
        assert_eq!(value_of("Contact 2:"), "- | -");
        assert_eq!(value_of("Email:"), "-");
    }

    #[test]
    fn test_render_writes_one_file() {
        let (db, store_id) = scenario_db();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Record_LOC-001.pdf");

        let summary = render_store_report(&db, store_id, &path).unwrap();
        assert_eq!(summary.pages, 1);
        assert_eq!(summary.path, path);
        assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_missing_store_is_not_found() {
        let db = Database::open_in_memory().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.pdf");

        let err = render_store_report(&db, 7, &path).unwrap_err();
        assert!(matches!(err, Error::NotFound { entity: "store", id: 7 }));
        assert!(!path.exists());
    }

    #[test]
    fn test_empty_store_uses_placeholders() {
        let db = Database::open_in_memory().unwrap();
        let store = db.create_store(&StoreInput::new("LOC-002", "Vacío")).unwrap();
        let layout = StoreReport::load(&db, store.id).unwrap().layout(generated_at());

        assert_eq!(section(&layout, SCREENS_HEADING, Some(ASSETS_HEADING)), vec![NO_SCREENS]);
        assert_eq!(section(&layout, HISTORY_HEADING, None), vec![NO_HISTORY]);
    }

    #[test]
    fn test_long_lists_paginate_without_loss() {
        let db = Database::open_in_memory().unwrap();
        let store = db.create_store(&StoreInput::new("LOC-003", "Grande")).unwrap();
        for i in 0..60 {
            db.add_screen(store.id, &ScreenInput::new("LG", format!("REF-{}", i), 55, "pared")).unwrap();
        }
        for i in 0..40 {
            let mut input = AssetInput::new(AssetType::Player);
            input.serial = Some(format!("SN-{}", i));
            db.add_asset(store.id, &input).unwrap();
        }
        for day in 1..=28 {
            let mut input = HistoryInput::new(
                format!("ZD-{}", day),
                date(&format!("2024-02-{:02}", day)),
                "revisión",
            );
            input.resolution = Some("ok".into());
            db.add_history(store.id, &input).unwrap();
        }

        let report = StoreReport::load(&db, store.id).unwrap();
        let layout = report.layout(generated_at());
        assert!(layout.page_count() > 1);

        let expected: Vec<String> = report
            .screens
            .iter()
            .map(text::screen_line)
            .chain(report.assets.iter().map(text::asset_line))
            .chain(report.history.iter().flat_map(text::history_lines))
            .collect();
        let drawn: Vec<&str> = layout
            .texts()
            .skip_while(|t| *t != SCREENS_HEADING)
            .filter(|t| t.starts_with("- ") || t.starts_with("  -> "))
            .collect();
        assert_eq!(drawn, expected);

        for page in layout.pages() {
            for element in &page.elements {
                if let layout::Element::Text { y, .. } = element {
                    assert!(*y > 0.0);
                }
            }
        }
    }

    #[test]
    fn test_history_renders_most_recent_first() {
        let db = Database::open_in_memory().unwrap();
        let store = db.create_store(&StoreInput::new("LOC-004", "Orden")).unwrap();
        for (code, day) in [("T1", "2024-01-01"), ("T2", "2024-03-01"), ("T3", "2024-02-01")] {
            db.add_history(store.id, &HistoryInput::new(code, date(day), "x")).unwrap();
        }

        let layout = StoreReport::load(&db, store.id).unwrap().layout(generated_at());
        let tickets: Vec<&str> = section(&layout, HISTORY_HEADING, None)
            .into_iter()
            .map(|line| line.split(" | ").next().unwrap())
            .collect();
        assert_eq!(tickets, vec!["- Ticket: T2", "- Ticket: T3", "- Ticket: T1"]);
    }

    #[test]
    fn test_profile_values_truncated() {
        let db = Database::open_in_memory().unwrap();
        let mut input = StoreInput::new("LOC-005", "Notas largas");
        input.notes = Some("n".repeat(100));
        let store = db.create_store(&input).unwrap();

        let layout = StoreReport::load(&db, store.id).unwrap().layout(generated_at());
        let expected = format!("{}...", "n".repeat(80));
        assert!(layout.texts().any(|t| t == expected));
    }

    #[test]
    fn test_default_file_name() {
        let db = Database::open_in_memory().unwrap();
        let store = db.create_store(&StoreInput::new("LOC 01/B", "x")).unwrap();
        assert_eq!(default_file_name(&store), "Record_LOC_01_B.pdf");
    }
}
