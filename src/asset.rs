//! Assets - non-display hardware installed at a store

use crate::fields::{closed_enum, optional};
use crate::Result;
use serde::{Deserialize, Serialize};

closed_enum! {
    /// Kind of hardware
    pub enum AssetType as "asset_type", default Other {
        Nuc => "NUC",
        Router => "Router",
        Splitter => "Splitter",
        Player => "Player",
        Controller => "Controladora",
        Switch => "Switch",
        Other => "Otro",
    }
}

closed_enum! {
    /// Operational status of an asset
    pub enum AssetStatus as "asset status", default Operational {
        Operational => "Operativo",
        Faulty => "Con falla",
        Retired => "Retirado",
    }
}

/// A stored asset row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    pub id: i64,
    pub store_id: i64,
    pub asset_type: AssetType,
    pub brand_model: Option<String>,
    pub serial: Option<String>,
    pub lot: Option<String>,
    pub position: Option<String>,
    pub status: AssetStatus,
    pub notes: Option<String>,
}

/// Fields supplied when adding or editing an asset
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetInput {
    pub asset_type: AssetType,
    pub brand_model: Option<String>,
    pub serial: Option<String>,
    pub lot: Option<String>,
    pub position: Option<String>,
    pub status: AssetStatus,
    pub notes: Option<String>,
}

impl AssetInput {
    pub fn new(asset_type: AssetType) -> Self {
        Self {
            asset_type,
            ..Default::default()
        }
    }

    /// Trim text fields; assets have no required text
    pub fn normalized(&self) -> Result<Self> {
        Ok(Self {
            asset_type: self.asset_type,
            brand_model: optional(self.brand_model.as_deref()),
            serial: optional(self.serial.as_deref()),
            lot: optional(self.lot.as_deref()),
            position: optional(self.position.as_deref()),
            status: self.status,
            notes: optional(self.notes.as_deref()),
        })
    }
}

impl From<&Asset> for AssetInput {
    fn from(asset: &Asset) -> Self {
        Self {
            asset_type: asset.asset_type,
            brand_model: asset.brand_model.clone(),
            serial: asset.serial.clone(),
            lot: asset.lot.clone(),
            position: asset.position.clone(),
            status: asset.status,
            notes: asset.notes.clone(),
        }
    }
}
