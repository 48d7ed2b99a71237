//! Database schema definitions

/// Schema version recorded in `PRAGMA user_version` once migrations finish
pub const SCHEMA_VERSION: i64 = 4;

/// SQL to create the stores table
pub const CREATE_STORES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS stores (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    code TEXT UNIQUE NOT NULL,
    name TEXT NOT NULL,
    address TEXT,
    zone TEXT,
    region TEXT,
    contact_name TEXT,
    contact_phone TEXT,
    contact_email TEXT,
    notes TEXT,
    created_at TEXT NOT NULL,
    contact_name_2 TEXT,
    contact_phone_2 TEXT
)
"#;

/// SQL to create the screens table
pub const CREATE_SCREENS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS screens (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    store_id INTEGER NOT NULL,
    brand TEXT NOT NULL,
    reference TEXT NOT NULL,
    inches INTEGER NOT NULL,
    orientation TEXT NOT NULL,
    position TEXT NOT NULL,
    status TEXT NOT NULL,
    notes TEXT,
    input_port TEXT NOT NULL DEFAULT 'HDMI1',
    FOREIGN KEY (store_id) REFERENCES stores(id) ON DELETE CASCADE
)
"#;

/// SQL to create the assets table
pub const CREATE_ASSETS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS assets (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    store_id INTEGER NOT NULL,
    asset_type TEXT NOT NULL,
    brand_model TEXT,
    serial TEXT,
    lot TEXT,
    position TEXT,
    status TEXT NOT NULL,
    notes TEXT,
    FOREIGN KEY (store_id) REFERENCES stores(id) ON DELETE CASCADE
)
"#;

/// Column list of the ticket-based history table, shared by the direct
/// create and the side table used when converting the legacy layout
const HISTORY_COLUMNS: &str = r#"
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    store_id INTEGER NOT NULL,
    ticket_code TEXT NOT NULL,
    issue_date TEXT NOT NULL,
    issue_desc TEXT NOT NULL,
    resolution_date TEXT,
    resolution TEXT,
    status TEXT NOT NULL DEFAULT 'Abierto',
    technician TEXT,
    created_at TEXT NOT NULL,
    FOREIGN KEY (store_id) REFERENCES stores(id) ON DELETE CASCADE
"#;

/// Name of the side table used while converting legacy history
pub const HISTORY_SIDE_TABLE: &str = "history_new";

/// SQL to create a ticket-based history table under `name`
pub fn create_history_table(name: &str) -> String {
    format!("CREATE TABLE IF NOT EXISTS {name} ({HISTORY_COLUMNS})")
}

/// Copies every legacy row (`date`/`type`/`responsible`/`detail`) into the
/// side table. `?1` is today's date, `?2` the migration timestamp.
pub const COPY_LEGACY_HISTORY: &str = r#"
INSERT INTO history_new (store_id, ticket_code, issue_date, issue_desc, status, technician, created_at)
SELECT
    store_id,
    'SIN-TICKET',
    COALESCE(date, ?1),
    COALESCE(detail, ''),
    'Abierto',
    responsible,
    ?2
FROM history
ORDER BY rowid
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_screens_store ON screens(store_id)",
    "CREATE INDEX IF NOT EXISTS idx_assets_store ON assets(store_id)",
    "CREATE INDEX IF NOT EXISTS idx_history_store_date ON history(store_id, issue_date)",
    "CREATE INDEX IF NOT EXISTS idx_stores_name ON stores(name)",
];

/// A column that older databases may lack, with the definition used to add it
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub name: &'static str,
    pub definition: &'static str,
}

const fn col(name: &'static str, definition: &'static str) -> Column {
    Column { name, definition }
}

/// Backfillable store columns. `id` and `code` are never added after the
/// fact: a stores table without them is not one this schema recognises.
pub const STORE_COLUMNS: &[Column] = &[
    col("name", "TEXT NOT NULL DEFAULT ''"),
    col("address", "TEXT"),
    col("zone", "TEXT"),
    col("region", "TEXT"),
    col("contact_name", "TEXT"),
    col("contact_phone", "TEXT"),
    col("contact_email", "TEXT"),
    col("notes", "TEXT"),
    col("created_at", "TEXT NOT NULL DEFAULT ''"),
    col("contact_name_2", "TEXT"),
    col("contact_phone_2", "TEXT"),
];

/// Backfillable screen columns
pub const SCREEN_COLUMNS: &[Column] = &[
    col("brand", "TEXT NOT NULL DEFAULT ''"),
    col("reference", "TEXT NOT NULL DEFAULT ''"),
    col("inches", "INTEGER NOT NULL DEFAULT 0"),
    col("orientation", "TEXT NOT NULL DEFAULT 'Horizontal'"),
    col("position", "TEXT NOT NULL DEFAULT ''"),
    col("status", "TEXT NOT NULL DEFAULT 'Operativa'"),
    col("notes", "TEXT"),
    col("input_port", "TEXT NOT NULL DEFAULT 'HDMI1'"),
];

/// Backfillable asset columns
pub const ASSET_COLUMNS: &[Column] = &[
    col("asset_type", "TEXT NOT NULL DEFAULT 'Otro'"),
    col("brand_model", "TEXT"),
    col("serial", "TEXT"),
    col("lot", "TEXT"),
    col("position", "TEXT"),
    col("status", "TEXT NOT NULL DEFAULT 'Operativo'"),
    col("notes", "TEXT"),
];

/// Backfillable history columns (ticket-based layout)
pub const HISTORY_COLUMNS_BACKFILL: &[Column] = &[
    col("issue_date", "TEXT NOT NULL DEFAULT ''"),
    col("issue_desc", "TEXT NOT NULL DEFAULT ''"),
    col("resolution_date", "TEXT"),
    col("resolution", "TEXT"),
    col("status", "TEXT NOT NULL DEFAULT 'Abierto'"),
    col("technician", "TEXT"),
    col("created_at", "TEXT NOT NULL DEFAULT ''"),
];

/// Tables created by the core step, with their backfillable columns
pub fn core_tables() -> [(&'static str, &'static str, &'static [Column]); 3] {
    [
        ("stores", CREATE_STORES_TABLE, STORE_COLUMNS),
        ("screens", CREATE_SCREENS_TABLE, SCREEN_COLUMNS),
        ("assets", CREATE_ASSETS_TABLE, ASSET_COLUMNS),
    ]
}
