//! Terminal messages for the CLI
//!
//! Color is used only when stdout is a terminal and `NO_COLOR` is unset.

use crate::ui::Icons;
use owo_colors::{OwoColorize, Style};
use std::sync::OnceLock;

static PALETTE: OnceLock<Palette> = OnceLock::new();

/// Styles for the kinds of text the CLI prints
#[derive(Debug, Clone)]
pub struct Palette {
    pub heading: Style,
    pub saved: Style,
    pub failure: Style,
    pub caution: Style,
    pub label: Style,
    pub muted: Style,
}

impl Palette {
    fn detect() -> Self {
        let no_color = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        if no_color || !console::Term::stdout().is_term() {
            Self::plain()
        } else {
            Self::colored()
        }
    }

    pub fn colored() -> Self {
        Self {
            heading: Style::new().cyan().bold(),
            saved: Style::new().green().bold(),
            failure: Style::new().red().bold(),
            caution: Style::new().yellow().bold(),
            label: Style::new().white().dimmed(),
            muted: Style::new().bright_black(),
        }
    }

    pub fn plain() -> Self {
        let none = Style::new();
        Self {
            heading: none.clone(),
            saved: none.clone(),
            failure: none.clone(),
            caution: none.clone(),
            label: none.clone(),
            muted: none,
        }
    }
}

pub fn palette() -> &'static Palette {
    PALETTE.get_or_init(Palette::detect)
}

fn paint(text: &str, style: &Style) -> String {
    text.style(style.clone()).to_string()
}

pub fn header(icon: &str, text: &str) {
    println!("{} {}", icon, paint(text, &palette().heading));
}

pub fn section(icon: &str, title: &str) {
    println!();
    header(icon, title);
}

pub fn success(label: &str) {
    println!("{} {}", Icons::CHECK, paint(label, &palette().saved));
}

pub fn error(label: &str) {
    eprintln!("{} {}", Icons::CROSS, paint(label, &palette().failure));
}

pub fn warn(label: &str) {
    eprintln!("{} {}", Icons::WARN, paint(label, &palette().caution));
}

/// `ℹ️ Label: value`
pub fn info(label: &str, value: &str) {
    println!("{} {}: {}", Icons::INFO, paint(label, &palette().label), value);
}

pub fn summary_row(label: &str, value: &str) {
    println!("  {} {}", paint(label, &palette().label), value);
}

pub fn muted(text: &str) -> String {
    paint(text, &palette().muted)
}

/// `✨ screen #3 saved`
pub fn record_saved(kind: &str, id: i64) {
    println!("{} {} {}", Icons::NEW, kind, paint(&format!("#{} saved", id), &palette().saved));
}

pub fn record_deleted(kind: &str, id: i64) {
    println!("{} {} {}", Icons::DEL, kind, paint(&format!("#{} deleted", id), &palette().caution));
}
