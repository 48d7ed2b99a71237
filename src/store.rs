//! Store records - the root entity
//!
//! A store is one physical retail location, identified by a unique business
//! `code`. Screens, assets and history entries all belong to a store and are
//! removed with it.

use crate::fields::{optional, or_dash, required};
use crate::Result;
use serde::{Deserialize, Serialize};

/// A contact person (name + phone), both optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: Option<String>,
    pub phone: Option<String>,
}

impl Contact {
    pub fn new(name: Option<&str>, phone: Option<&str>) -> Self {
        Self {
            name: name.map(str::to_string),
            phone: phone.map(str::to_string),
        }
    }

    fn normalized(&self) -> Self {
        Self {
            name: optional(self.name.as_deref()),
            phone: optional(self.phone.as_deref()),
        }
    }

    /// True when neither part has text; blank text counts as missing
    pub fn is_empty(&self) -> bool {
        or_dash(self.name.as_deref()) == "-" && or_dash(self.phone.as_deref()) == "-"
    }

    /// `name | phone`, with `-` for missing parts
    pub fn summary(&self) -> String {
        format!(
            "{} | {}",
            or_dash(self.name.as_deref()),
            or_dash(self.phone.as_deref())
        )
    }
}

/// A stored store row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Store {
    pub id: i64,
    /// Unique business code (e.g. `LOC-001`)
    pub code: String,
    pub name: String,
    pub address: Option<String>,
    pub zone: Option<String>,
    pub region: Option<String>,
    pub contact: Contact,
    pub contact_2: Contact,
    pub email: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
}

impl Store {
    /// `code - name (ID:n)`, as shown in pickers and listings
    pub fn label(&self) -> String {
        format!("{} - {} (ID:{})", self.code, self.name, self.id)
    }
}

/// Fields supplied when creating or updating a store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreInput {
    pub code: String,
    pub name: String,
    pub address: Option<String>,
    pub zone: Option<String>,
    pub region: Option<String>,
    pub contact: Contact,
    pub contact_2: Contact,
    pub email: Option<String>,
    pub notes: Option<String>,
}

impl StoreInput {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Trim every field and check that code and name are present
    pub fn normalized(&self) -> Result<Self> {
        Ok(Self {
            code: required("code", &self.code)?,
            name: required("name", &self.name)?,
            address: optional(self.address.as_deref()),
            zone: optional(self.zone.as_deref()),
            region: optional(self.region.as_deref()),
            contact: self.contact.normalized(),
            contact_2: self.contact_2.normalized(),
            email: optional(self.email.as_deref()),
            notes: optional(self.notes.as_deref()),
        })
    }
}

impl From<&Store> for StoreInput {
    fn from(store: &Store) -> Self {
        Self {
            code: store.code.clone(),
            name: store.name.clone(),
            address: store.address.clone(),
            zone: store.zone.clone(),
            region: store.region.clone(),
            contact: store.contact.clone(),
            contact_2: store.contact_2.clone(),
            email: store.email.clone(),
            notes: store.notes.clone(),
        }
    }
}
