//! Screens - display devices installed at a store

use crate::fields::{closed_enum, optional, required};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Smallest and largest accepted diagonal, in inches
pub const INCHES_RANGE: std::ops::RangeInclusive<u32> = 10..=200;

closed_enum! {
    /// Mounting orientation of a screen
    pub enum Orientation as "orientation", default Horizontal {
        Horizontal => "Horizontal",
        Vertical => "Vertical",
    }
}

closed_enum! {
    /// Video input the player is connected to
    pub enum InputPort as "input_port", default Hdmi1 {
        Hdmi1 => "HDMI1",
        Hdmi2 => "HDMI2",
        Hdmi3 => "HDMI3",
        DisplayPort => "DP",
    }
}

closed_enum! {
    /// Operational status of a screen
    pub enum ScreenStatus as "screen status", default Operational {
        Operational => "Operativa",
        Faulty => "Con falla",
        Retired => "Retirada",
    }
}

/// A stored screen row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Screen {
    pub id: i64,
    pub store_id: i64,
    pub brand: String,
    /// Model reference (e.g. `49UH5F`)
    pub reference: String,
    pub inches: u32,
    pub orientation: Orientation,
    /// Free-text physical position ("muro caja", "entrada", ...)
    pub position: String,
    pub input_port: InputPort,
    pub status: ScreenStatus,
    pub notes: Option<String>,
}

/// Fields supplied when adding or editing a screen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenInput {
    pub brand: String,
    pub reference: String,
    pub inches: u32,
    pub orientation: Orientation,
    pub position: String,
    pub input_port: InputPort,
    pub status: ScreenStatus,
    pub notes: Option<String>,
}

impl ScreenInput {
    pub fn new(
        brand: impl Into<String>,
        reference: impl Into<String>,
        inches: u32,
        position: impl Into<String>,
    ) -> Self {
        Self {
            brand: brand.into(),
            reference: reference.into(),
            inches,
            orientation: Orientation::default(),
            position: position.into(),
            input_port: InputPort::default(),
            status: ScreenStatus::default(),
            notes: None,
        }
    }

    /// Trim text fields; brand, reference and position are required
    pub fn normalized(&self) -> Result<Self> {
        if !INCHES_RANGE.contains(&self.inches) {
            return Err(Error::invalid(
                "inches",
                format!(
                    "{} is outside {}..={}",
                    self.inches,
                    INCHES_RANGE.start(),
                    INCHES_RANGE.end()
                ),
            ));
        }

        Ok(Self {
            brand: required("brand", &self.brand)?,
            reference: required("reference", &self.reference)?,
            inches: self.inches,
            orientation: self.orientation,
            position: required("position", &self.position)?,
            input_port: self.input_port,
            status: self.status,
            notes: optional(self.notes.as_deref()),
        })
    }
}

impl From<&Screen> for ScreenInput {
    fn from(screen: &Screen) -> Self {
        Self {
            brand: screen.brand.clone(),
            reference: screen.reference.clone(),
            inches: screen.inches,
            orientation: screen.orientation,
            position: screen.position.clone(),
            input_port: screen.input_port,
            status: screen.status,
            notes: screen.notes.clone(),
        }
    }
}
