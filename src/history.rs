//! Support history - tickets and maintenance records per store
//!
//! Entries created before tickets were tracked are converted on open and
//! carry [`MISSING_TICKET_CODE`] as their ticket code.

use crate::fields::{closed_enum, format_date, optional, required};
use crate::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Ticket code given to entries converted from the pre-ticket layout
pub const MISSING_TICKET_CODE: &str = "SIN-TICKET";

closed_enum! {
    /// Lifecycle of a ticket
    pub enum TicketStatus as "ticket status", default Open {
        Open => "Abierto",
        InProgress => "En proceso",
        Resolved => "Resuelto",
        Closed => "Cerrado",
    }
}

/// A stored history row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub store_id: i64,
    /// Ticket identifier from the helpdesk (e.g. `ZD-12345`)
    pub ticket_code: String,
    /// Issue date as stored (`YYYY-MM-DD`)
    pub issue_date: String,
    pub issue_desc: String,
    pub resolution_date: Option<String>,
    pub resolution: Option<String>,
    pub status: TicketStatus,
    pub technician: Option<String>,
    pub created_at: String,
}

/// A date on a history input: parsed from user input, or stored text carried
/// over unchanged from an existing row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryDate {
    Parsed(NaiveDate),
    /// Rows converted from older layouts may hold non-ISO or empty text
    Stored(String),
}

impl EntryDate {
    /// Text written to the date column
    pub fn to_text(&self) -> String {
        match self {
            EntryDate::Parsed(date) => format_date(*date),
            EntryDate::Stored(text) => text.clone(),
        }
    }
}

impl From<NaiveDate> for EntryDate {
    fn from(date: NaiveDate) -> Self {
        EntryDate::Parsed(date)
    }
}

/// Fields supplied when recording or editing a history entry.
///
/// Resolution date and resolution text are independent; either may be set
/// without the other.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryInput {
    pub ticket_code: String,
    pub issue_date: EntryDate,
    pub issue_desc: String,
    pub resolution_date: Option<EntryDate>,
    pub resolution: Option<String>,
    pub status: TicketStatus,
    pub technician: Option<String>,
}

impl HistoryInput {
    pub fn new(
        ticket_code: impl Into<String>,
        issue_date: impl Into<EntryDate>,
        issue_desc: impl Into<String>,
    ) -> Self {
        Self {
            ticket_code: ticket_code.into(),
            issue_date: issue_date.into(),
            issue_desc: issue_desc.into(),
            resolution_date: None,
            resolution: None,
            status: TicketStatus::default(),
            technician: None,
        }
    }

    /// Trim text fields; ticket code and description are required
    pub fn normalized(&self) -> Result<Self> {
        Ok(Self {
            ticket_code: required("ticket_code", &self.ticket_code)?,
            issue_date: self.issue_date.clone(),
            issue_desc: required("issue_desc", &self.issue_desc)?,
            resolution_date: self.resolution_date.clone(),
            resolution: optional(self.resolution.as_deref()),
            status: self.status,
            technician: optional(self.technician.as_deref()),
        })
    }

    pub(crate) fn issue_date_text(&self) -> String {
        self.issue_date.to_text()
    }

    pub(crate) fn resolution_date_text(&self) -> Option<String> {
        self.resolution_date.as_ref().map(EntryDate::to_text)
    }
}

/// Editable fields of a stored entry; dates keep their stored text
impl From<&HistoryEntry> for HistoryInput {
    fn from(entry: &HistoryEntry) -> Self {
        Self {
            ticket_code: entry.ticket_code.clone(),
            issue_date: EntryDate::Stored(entry.issue_date.clone()),
            issue_desc: entry.issue_desc.clone(),
            resolution_date: entry.resolution_date.clone().map(EntryDate::Stored),
            resolution: entry.resolution.clone(),
            status: entry.status,
            technician: entry.technician.clone(),
        }
    }
}
