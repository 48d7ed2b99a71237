use crate::fields::or_dash;
use crate::{Asset, HistoryEntry, Screen, Store};
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Field")]
    pub field: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

/// Two-column field/value table
pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            field: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn kv_table(rows: &[(&str, String)]) -> String {
    let mut builder = TableBuilder::new();
    for (label, value) in rows {
        builder.add_row(label, value);
    }
    builder.build()
}

/// Table of arbitrary rows; empty string when there are none
pub fn rows_table<T: Tabled>(rows: &[T]) -> String {
    if rows.is_empty() {
        return String::new();
    }
    Table::new(rows).with(Style::rounded()).to_string()
}

fn dash(value: &Option<String>) -> String {
    or_dash(value.as_deref()).to_string()
}

#[derive(Tabled)]
pub struct StoreRow {
    #[tabled(rename = "ID")]
    pub id: i64,
    #[tabled(rename = "Code")]
    pub code: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Zone")]
    pub zone: String,
    #[tabled(rename = "Region")]
    pub region: String,
    #[tabled(rename = "Contact")]
    pub contact: String,
}

impl From<&Store> for StoreRow {
    fn from(store: &Store) -> Self {
        Self {
            id: store.id,
            code: store.code.clone(),
            name: store.name.clone(),
            zone: dash(&store.zone),
            region: dash(&store.region),
            contact: store.contact.summary(),
        }
    }
}

#[derive(Tabled)]
pub struct ScreenRow {
    #[tabled(rename = "ID")]
    pub id: i64,
    #[tabled(rename = "Brand")]
    pub brand: String,
    #[tabled(rename = "Reference")]
    pub reference: String,
    #[tabled(rename = "Inches")]
    pub inches: u32,
    #[tabled(rename = "Orientation")]
    pub orientation: String,
    #[tabled(rename = "Input")]
    pub input_port: String,
    #[tabled(rename = "Position")]
    pub position: String,
    #[tabled(rename = "Status")]
    pub status: String,
}

impl From<&Screen> for ScreenRow {
    fn from(screen: &Screen) -> Self {
        Self {
            id: screen.id,
            brand: screen.brand.clone(),
            reference: screen.reference.clone(),
            inches: screen.inches,
            orientation: screen.orientation.to_string(),
            input_port: screen.input_port.to_string(),
            position: screen.position.clone(),
            status: screen.status.to_string(),
        }
    }
}

#[derive(Tabled)]
pub struct AssetRow {
    #[tabled(rename = "ID")]
    pub id: i64,
    #[tabled(rename = "Type")]
    pub asset_type: String,
    #[tabled(rename = "Brand/Model")]
    pub brand_model: String,
    #[tabled(rename = "Serial")]
    pub serial: String,
    #[tabled(rename = "Lot")]
    pub lot: String,
    #[tabled(rename = "Position")]
    pub position: String,
    #[tabled(rename = "Status")]
    pub status: String,
}

impl From<&Asset> for AssetRow {
    fn from(asset: &Asset) -> Self {
        Self {
            id: asset.id,
            asset_type: asset.asset_type.to_string(),
            brand_model: dash(&asset.brand_model),
            serial: dash(&asset.serial),
            lot: dash(&asset.lot),
            position: dash(&asset.position),
            status: asset.status.to_string(),
        }
    }
}

#[derive(Tabled)]
pub struct HistoryRow {
    #[tabled(rename = "ID")]
    pub id: i64,
    #[tabled(rename = "Ticket")]
    pub ticket_code: String,
    #[tabled(rename = "Date")]
    pub issue_date: String,
    #[tabled(rename = "Status")]
    pub status: String,
    #[tabled(rename = "Technician")]
    pub technician: String,
    #[tabled(rename = "Issue")]
    pub issue_desc: String,
    #[tabled(rename = "Resolution")]
    pub resolution: String,
}

impl From<&HistoryEntry> for HistoryRow {
    fn from(entry: &HistoryEntry) -> Self {
        let resolution = match (dash(&entry.resolution_date), dash(&entry.resolution)) {
            (date, text) if date == "-" && text == "-" => date,
            (date, text) => format!("{} {}", date, text),
        };
        Self {
            id: entry.id,
            ticket_code: entry.ticket_code.clone(),
            issue_date: entry.issue_date.clone(),
            status: entry.status.to_string(),
            technician: dash(&entry.technician),
            issue_desc: entry.issue_desc.clone(),
            resolution,
        }
    }
}

/// Rows for any record type with a row conversion
pub fn record_rows<'a, T: 'a, R: From<&'a T>>(records: &'a [T]) -> Vec<R> {
    records.iter().map(R::from).collect()
}
