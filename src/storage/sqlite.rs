//! SQLite storage implementation

use std::path::{Path, PathBuf};
use std::time::Duration;
use rusqlite::{Connection, params, OptionalExtension};
use crate::{Result, Error};
use crate::asset::{Asset, AssetInput};
use crate::fields::{column_choice, now_timestamp};
use crate::history::{HistoryEntry, HistoryInput};
use crate::screen::{Screen, ScreenInput};
use crate::store::{Contact, Store, StoreInput};
use super::migrate::{self, MigrationReport};
use super::schema;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const STORE_SELECT: &str = "SELECT id, code, name, address, zone, region, contact_name, contact_phone, \
     contact_name_2, contact_phone_2, contact_email, notes, created_at FROM stores";

const SCREEN_SELECT: &str = "SELECT id, store_id, brand, reference, inches, orientation, position, \
     input_port, status, notes FROM screens";

const ASSET_SELECT: &str = "SELECT id, store_id, asset_type, brand_model, serial, lot, position, \
     status, notes FROM assets";

const HISTORY_SELECT: &str = "SELECT id, store_id, ticket_code, issue_date, issue_desc, \
     resolution_date, resolution, status, technician, created_at FROM history";

/// Where connections come from
enum Backend {
    /// A database file; every operation opens and closes its own connection
    File(PathBuf),
    /// A single in-memory connection (for testing)
    Memory(Connection),
}

/// SQLite-backed storage for stores and their equipment and history
pub struct Database {
    backend: Backend,
    migration: MigrationReport,
}

impl Database {
    /// Open a database file (creates if doesn't exist) and migrate its schema
    pub fn open(path: &Path) -> Result<Self> {
        let conn = connect(path)?;
        let migration = migrate::run(&conn)?;
        Ok(Self {
            backend: Backend::File(path.to_path_buf()),
            migration,
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let migration = migrate::run(&conn)?;
        Ok(Self {
            backend: Backend::Memory(conn),
            migration,
        })
    }

    /// Path of the database file, if file-backed
    pub fn path(&self) -> Option<&Path> {
        match &self.backend {
            Backend::File(path) => Some(path),
            Backend::Memory(_) => None,
        }
    }

    /// What the schema migration changed when this database was opened
    pub fn migration_report(&self) -> &MigrationReport {
        &self.migration
    }

    /// Run `f` with a connection that is released when `f` returns
    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        match &self.backend {
            Backend::File(path) => {
                let conn = connect(path)?;
                f(&conn)
            }
            Backend::Memory(conn) => f(conn),
        }
    }

    // ========== Store Operations ==========

    /// Create a store; the code must not be in use
    pub fn create_store(&self, input: &StoreInput) -> Result<Store> {
        let input = input.normalized()?;
        let id = self.with_conn(|conn| {
            conn.execute(
                r#"
                INSERT INTO stores (
                    code, name, address, zone, region,
                    contact_name, contact_phone, contact_name_2, contact_phone_2,
                    contact_email, notes, created_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
                "#,
                params![
                    input.code,
                    input.name,
                    input.address,
                    input.zone,
                    input.region,
                    input.contact.name,
                    input.contact.phone,
                    input.contact_2.name,
                    input.contact_2.phone,
                    input.email,
                    input.notes,
                    now_timestamp(),
                ],
            )
            .map_err(|e| map_code_conflict(e, &input.code))?;
            Ok(conn.last_insert_rowid())
        })?;
        tracing::debug!("Created store {} ({})", input.code, id);
        self.get_store(id)
    }

    /// Get a store by id
    pub fn get_store(&self, id: i64) -> Result<Store> {
        self.with_conn(|conn| {
            conn.query_row(&format!("{} WHERE id = ?1", STORE_SELECT), [id], row_to_store)
                .optional()?
                .ok_or_else(|| Error::not_found("store", id))
        })
    }

    /// Get a store by its exact code
    pub fn find_store_by_code(&self, code: &str) -> Result<Option<Store>> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("{} WHERE code = ?1", STORE_SELECT),
                [code.trim()],
                row_to_store,
            )
            .optional()
            .map_err(Into::into)
        })
    }

    /// List all stores ordered by name
    pub fn list_stores(&self) -> Result<Vec<Store>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("{} ORDER BY name, id", STORE_SELECT))?;
            let stores = stmt
                .query_map([], row_to_store)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(stores)
        })
    }

    /// Find stores whose code or name contains `query`
    pub fn search_stores(&self, query: &str) -> Result<Vec<Store>> {
        let pattern = format!("%{}%", escape_like(query.trim()));
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                r"{} WHERE code LIKE ?1 ESCAPE '\' OR name LIKE ?1 ESCAPE '\' ORDER BY name, id",
                STORE_SELECT
            ))?;
            let stores = stmt
                .query_map([pattern], row_to_store)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(stores)
        })
    }

    /// Replace every editable field of a store
    pub fn update_store(&self, id: i64, input: &StoreInput) -> Result<Store> {
        let input = input.normalized()?;
        self.with_conn(|conn| {
            let changed = conn
                .execute(
                    r#"
                    UPDATE stores
                    SET code = ?1, name = ?2, address = ?3, zone = ?4, region = ?5,
                        contact_name = ?6, contact_phone = ?7,
                        contact_name_2 = ?8, contact_phone_2 = ?9,
                        contact_email = ?10, notes = ?11
                    WHERE id = ?12
                    "#,
                    params![
                        input.code,
                        input.name,
                        input.address,
                        input.zone,
                        input.region,
                        input.contact.name,
                        input.contact.phone,
                        input.contact_2.name,
                        input.contact_2.phone,
                        input.email,
                        input.notes,
                        id,
                    ],
                )
                .map_err(|e| map_code_conflict(e, &input.code))?;
            expect_changed(changed, "store", id)
        })?;
        self.get_store(id)
    }

    /// Delete a store together with its screens, assets and history
    pub fn delete_store(&self, id: i64) -> Result<()> {
        self.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM stores WHERE id = ?1", [id])?;
            expect_changed(changed, "store", id)
        })?;
        tracing::debug!("Deleted store {}", id);
        Ok(())
    }

    // ========== Screen Operations ==========

    /// Add a screen to a store
    pub fn add_screen(&self, store_id: i64, input: &ScreenInput) -> Result<Screen> {
        let input = input.normalized()?;
        let id = self.with_conn(|conn| {
            ensure_store(conn, store_id)?;
            conn.execute(
                r#"
                INSERT INTO screens (store_id, brand, reference, inches, orientation, position, input_port, status, notes)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
                params![
                    store_id,
                    input.brand,
                    input.reference,
                    input.inches,
                    input.orientation.as_str(),
                    input.position,
                    input.input_port.as_str(),
                    input.status.as_str(),
                    input.notes,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })?;
        self.get_screen(id)
    }

    /// Get a screen by id
    pub fn get_screen(&self, id: i64) -> Result<Screen> {
        self.with_conn(|conn| {
            conn.query_row(&format!("{} WHERE id = ?1", SCREEN_SELECT), [id], row_to_screen)
                .optional()?
                .ok_or_else(|| Error::not_found("screen", id))
        })
    }

    /// List a store's screens in insertion order
    pub fn list_screens(&self, store_id: i64) -> Result<Vec<Screen>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("{} WHERE store_id = ?1 ORDER BY id ASC", SCREEN_SELECT))?;
            let screens = stmt
                .query_map([store_id], row_to_screen)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(screens)
        })
    }

    pub fn update_screen(&self, id: i64, input: &ScreenInput) -> Result<Screen> {
        let input = input.normalized()?;
        self.with_conn(|conn| {
            let changed = conn.execute(
                r#"
                UPDATE screens
                SET brand = ?1, reference = ?2, inches = ?3, orientation = ?4,
                    position = ?5, input_port = ?6, status = ?7, notes = ?8
                WHERE id = ?9
                "#,
                params![
                    input.brand,
                    input.reference,
                    input.inches,
                    input.orientation.as_str(),
                    input.position,
                    input.input_port.as_str(),
                    input.status.as_str(),
                    input.notes,
                    id,
                ],
            )?;
            expect_changed(changed, "screen", id)
        })?;
        self.get_screen(id)
    }

    pub fn delete_screen(&self, id: i64) -> Result<()> {
        self.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM screens WHERE id = ?1", [id])?;
            expect_changed(changed, "screen", id)
        })
    }

    // ========== Asset Operations ==========

    /// Add an asset to a store
    pub fn add_asset(&self, store_id: i64, input: &AssetInput) -> Result<Asset> {
        let input = input.normalized()?;
        let id = self.with_conn(|conn| {
            ensure_store(conn, store_id)?;
            conn.execute(
                r#"
                INSERT INTO assets (store_id, asset_type, brand_model, serial, lot, position, status, notes)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
                params![
                    store_id,
                    input.asset_type.as_str(),
                    input.brand_model,
                    input.serial,
                    input.lot,
                    input.position,
                    input.status.as_str(),
                    input.notes,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })?;
        self.get_asset(id)
    }

    pub fn get_asset(&self, id: i64) -> Result<Asset> {
        self.with_conn(|conn| {
            conn.query_row(&format!("{} WHERE id = ?1", ASSET_SELECT), [id], row_to_asset)
                .optional()?
                .ok_or_else(|| Error::not_found("asset", id))
        })
    }

    /// List a store's assets in insertion order
    pub fn list_assets(&self, store_id: i64) -> Result<Vec<Asset>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("{} WHERE store_id = ?1 ORDER BY id ASC", ASSET_SELECT))?;
            let assets = stmt
                .query_map([store_id], row_to_asset)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(assets)
        })
    }

    pub fn update_asset(&self, id: i64, input: &AssetInput) -> Result<Asset> {
        let input = input.normalized()?;
        self.with_conn(|conn| {
            let changed = conn.execute(
                r#"
                UPDATE assets
                SET asset_type = ?1, brand_model = ?2, serial = ?3, lot = ?4,
                    position = ?5, status = ?6, notes = ?7
                WHERE id = ?8
                "#,
                params![
                    input.asset_type.as_str(),
                    input.brand_model,
                    input.serial,
                    input.lot,
                    input.position,
                    input.status.as_str(),
                    input.notes,
                    id,
                ],
            )?;
            expect_changed(changed, "asset", id)
        })?;
        self.get_asset(id)
    }

    pub fn delete_asset(&self, id: i64) -> Result<()> {
        self.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM assets WHERE id = ?1", [id])?;
            expect_changed(changed, "asset", id)
        })
    }

    // ========== History Operations ==========

    /// Record a ticket against a store
    pub fn add_history(&self, store_id: i64, input: &HistoryInput) -> Result<HistoryEntry> {
        let input = input.normalized()?;
        let id = self.with_conn(|conn| {
            ensure_store(conn, store_id)?;
            conn.execute(
                r#"
                INSERT INTO history
                (store_id, ticket_code, issue_date, issue_desc, resolution_date, resolution, status, technician, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
                params![
                    store_id,
                    input.ticket_code,
                    input.issue_date_text(),
                    input.issue_desc,
                    input.resolution_date_text(),
                    input.resolution,
                    input.status.as_str(),
                    input.technician,
                    now_timestamp(),
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })?;
        tracing::debug!("Recorded ticket {} for store {}", input.ticket_code, store_id);
        self.get_history(id)
    }

    pub fn get_history(&self, id: i64) -> Result<HistoryEntry> {
        self.with_conn(|conn| {
            conn.query_row(&format!("{} WHERE id = ?1", HISTORY_SELECT), [id], row_to_history)
                .optional()?
                .ok_or_else(|| Error::not_found("history entry", id))
        })
    }

    /// List a store's history, most recent issue first
    pub fn list_history(&self, store_id: i64) -> Result<Vec<HistoryEntry>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "{} WHERE store_id = ?1 ORDER BY issue_date DESC, id DESC",
                HISTORY_SELECT
            ))?;
            let entries = stmt
                .query_map([store_id], row_to_history)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(entries)
        })
    }

    pub fn update_history(&self, id: i64, input: &HistoryInput) -> Result<HistoryEntry> {
        let input = input.normalized()?;
        self.with_conn(|conn| {
            let changed = conn.execute(
                r#"
                UPDATE history
                SET ticket_code = ?1, issue_date = ?2, issue_desc = ?3, resolution_date = ?4,
                    resolution = ?5, status = ?6, technician = ?7
                WHERE id = ?8
                "#,
                params![
                    input.ticket_code,
                    input.issue_date_text(),
                    input.issue_desc,
                    input.resolution_date_text(),
                    input.resolution,
                    input.status.as_str(),
                    input.technician,
                    id,
                ],
            )?;
            expect_changed(changed, "history entry", id)
        })?;
        self.get_history(id)
    }

    pub fn delete_history(&self, id: i64) -> Result<()> {
        self.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM history WHERE id = ?1", [id])?;
            expect_changed(changed, "history entry", id)
        })
    }

    // ========== Statistics ==========

    /// Get database statistics
    pub fn stats(&self) -> Result<DbStats> {
        self.with_conn(|conn| {
            let count = |table: &str| -> Result<usize> {
                let n: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))?;
                Ok(n as usize)
            };
            Ok(DbStats {
                stores: count("stores")?,
                screens: count("screens")?,
                assets: count("assets")?,
                history: count("history")?,
                schema_version: conn.query_row("PRAGMA user_version", [], |row| row.get(0))?,
            })
        })
    }
}

/// Open a connection with foreign keys enforced
fn connect(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    Ok(conn)
}

fn ensure_store(conn: &Connection, store_id: i64) -> Result<()> {
    let found = conn
        .query_row("SELECT id FROM stores WHERE id = ?1", [store_id], |row| row.get::<_, i64>(0))
        .optional()?;
    found.map(|_| ()).ok_or_else(|| Error::not_found("store", store_id))
}

fn expect_changed(changed: usize, entity: &'static str, id: i64) -> Result<()> {
    if changed == 0 {
        return Err(Error::not_found(entity, id));
    }
    Ok(())
}

/// Turn a UNIQUE violation on `stores.code` into `DuplicateCode`
fn map_code_conflict(err: rusqlite::Error, code: &str) -> Error {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            Error::DuplicateCode(code.to_string())
        }
        _ => err.into(),
    }
}

/// Escape `LIKE` wildcards so user input matches literally
fn escape_like(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for c in query.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn row_to_store(row: &rusqlite::Row) -> rusqlite::Result<Store> {
    Ok(Store {
        id: row.get(0)?,
        code: row.get(1)?,
        name: row.get(2)?,
        address: row.get(3)?,
        zone: row.get(4)?,
        region: row.get(5)?,
        contact: Contact {
            name: row.get(6)?,
            phone: row.get(7)?,
        },
        contact_2: Contact {
            name: row.get(8)?,
            phone: row.get(9)?,
        },
        email: row.get(10)?,
        notes: row.get(11)?,
        created_at: row.get(12)?,
    })
}

fn row_to_screen(row: &rusqlite::Row) -> rusqlite::Result<Screen> {
    Ok(Screen {
        id: row.get(0)?,
        store_id: row.get(1)?,
        brand: row.get(2)?,
        reference: row.get(3)?,
        inches: row.get(4)?,
        orientation: column_choice(row, 5)?,
        position: row.get(6)?,
        input_port: column_choice(row, 7)?,
        status: column_choice(row, 8)?,
        notes: row.get(9)?,
    })
}

fn row_to_asset(row: &rusqlite::Row) -> rusqlite::Result<Asset> {
    Ok(Asset {
        id: row.get(0)?,
        store_id: row.get(1)?,
        asset_type: column_choice(row, 2)?,
        brand_model: row.get(3)?,
        serial: row.get(4)?,
        lot: row.get(5)?,
        position: row.get(6)?,
        status: column_choice(row, 7)?,
        notes: row.get(8)?,
    })
}

fn row_to_history(row: &rusqlite::Row) -> rusqlite::Result<HistoryEntry> {
    Ok(HistoryEntry {
        id: row.get(0)?,
        store_id: row.get(1)?,
        ticket_code: row.get(2)?,
        issue_date: row.get(3)?,
        issue_desc: row.get(4)?,
        resolution_date: row.get(5)?,
        resolution: row.get(6)?,
        status: column_choice(row, 7)?,
        technician: row.get(8)?,
        created_at: row.get(9)?,
    })
}

/// Database statistics
#[derive(Debug, Clone, serde::Serialize)]
pub struct DbStats {
    pub stores: usize,
    pub screens: usize,
    pub assets: usize,
    pub history: usize,
    pub schema_version: i64,
}

impl DbStats {
    pub fn is_current(&self) -> bool {
        self.schema_version == schema::SCHEMA_VERSION
    }
}

impl std::fmt::Display for DbStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Database Statistics:")?;
        writeln!(f, "  Stores: {}", self.stores)?;
        writeln!(f, "  Screens: {}", self.screens)?;
        writeln!(f, "  Assets: {}", self.assets)?;
        writeln!(f, "  History: {}", self.history)?;
        writeln!(f, "  Schema version: {}", self.schema_version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::AssetType;
    use crate::history::TicketStatus;
    use crate::screen::{InputPort, Orientation, ScreenStatus};
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sample_store(db: &Database, code: &str) -> Store {
        db.create_store(&StoreInput::new(code, format!("Store {}", code))).unwrap()
    }

    #[test]
    fn test_store_crud() {
        let db = Database::open_in_memory().unwrap();

        let mut input = StoreInput::new("LOC-001", "Mall Central");
        input.contact_2 = Contact::new(Some("Ana"), Some("555-0101"));
        let store = db.create_store(&input).unwrap();
        assert_eq!(store.code, "LOC-001");
        assert_eq!(store.contact_2.name.as_deref(), Some("Ana"));
        assert!(!store.created_at.is_empty());

        let mut edit = StoreInput::from(&store);
        edit.name = "Mall Central Norte".into();
        let updated = db.update_store(store.id, &edit).unwrap();
        assert_eq!(updated.name, "Mall Central Norte");
        assert_eq!(updated.created_at, store.created_at);

        db.delete_store(store.id).unwrap();
        assert!(matches!(db.get_store(store.id), Err(Error::NotFound { entity: "store", .. })));
    }

    #[test]
    fn test_duplicate_code_is_rejected() {
        let db = Database::open_in_memory().unwrap();
        sample_store(&db, "LOC-001");

        let err = db.create_store(&StoreInput::new("LOC-001", "Other")).unwrap_err();
        assert!(matches!(err, Error::DuplicateCode(ref code) if code == "LOC-001"));
        assert_eq!(db.list_stores().unwrap().len(), 1);

        let second = sample_store(&db, "LOC-002");
        let err = db
            .update_store(second.id, &StoreInput::new("LOC-001", "Renamed"))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateCode(_)));
        assert_eq!(db.get_store(second.id).unwrap().code, "LOC-002");
    }

    #[test]
    fn test_validation_happens_before_write() {
        let db = Database::open_in_memory().unwrap();
        let err = db.create_store(&StoreInput::new("", "No code")).unwrap_err();
        assert!(matches!(err, Error::Validation { field: "code", .. }));
        assert_eq!(db.stats().unwrap().stores, 0);
    }

    #[test]
    fn test_search_matches_code_or_name() {
        let db = Database::open_in_memory().unwrap();
        db.create_store(&StoreInput::new("LOC-001", "Mall Central")).unwrap();
        db.create_store(&StoreInput::new("LOC-002", "Cenco Alto")).unwrap();
        db.create_store(&StoreInput::new("X_9", "Plaza")).unwrap();

        assert_eq!(db.search_stores("loc").unwrap().len(), 2);
        let hits = db.search_stores("central").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].code, "LOC-001");

        // `_` is literal, not a wildcard
        assert_eq!(db.search_stores("_").unwrap().len(), 1);
        assert!(db.search_stores("zzz").unwrap().is_empty());
    }

    #[test]
    fn test_list_stores_ordered_by_name() {
        let db = Database::open_in_memory().unwrap();
        db.create_store(&StoreInput::new("B", "Zeta")).unwrap();
        db.create_store(&StoreInput::new("A", "Alfa")).unwrap();
        let names: Vec<_> = db.list_stores().unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Alfa", "Zeta"]);
        assert_eq!(db.find_store_by_code("A").unwrap().unwrap().name, "Alfa");
        assert!(db.find_store_by_code("nope").unwrap().is_none());
    }

    #[test]
    fn test_screen_crud() {
        let db = Database::open_in_memory().unwrap();
        let store = sample_store(&db, "LOC-001");

        let mut input = ScreenInput::new("LG", "49UH5F", 55, "muro caja");
        input.orientation = Orientation::Vertical;
        let screen = db.add_screen(store.id, &input).unwrap();
        assert_eq!(screen.input_port, InputPort::Hdmi1);
        assert_eq!(screen.orientation, Orientation::Vertical);

        let mut edit = ScreenInput::from(&screen);
        edit.status = ScreenStatus::Faulty;
        edit.input_port = InputPort::DisplayPort;
        let updated = db.update_screen(screen.id, &edit).unwrap();
        assert_eq!(updated.status, ScreenStatus::Faulty);
        assert_eq!(updated.input_port, InputPort::DisplayPort);

        db.delete_screen(screen.id).unwrap();
        assert!(db.list_screens(store.id).unwrap().is_empty());
        assert!(matches!(db.delete_screen(screen.id), Err(Error::NotFound { .. })));
    }

    #[test]
    fn test_child_of_missing_store_is_not_found() {
        let db = Database::open_in_memory().unwrap();
        let err = db
            .add_screen(42, &ScreenInput::new("LG", "49UH5F", 55, "caja"))
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { entity: "store", id: 42 }));
        assert!(matches!(
            db.add_asset(42, &AssetInput::new(AssetType::Nuc)),
            Err(Error::NotFound { entity: "store", .. })
        ));
    }

    #[test]
    fn test_asset_crud() {
        let db = Database::open_in_memory().unwrap();
        let store = sample_store(&db, "LOC-001");

        let mut input = AssetInput::new(AssetType::Player);
        input.serial = Some("SN-77".into());
        let asset = db.add_asset(store.id, &input).unwrap();
        assert_eq!(asset.asset_type, AssetType::Player);
        assert_eq!(asset.serial.as_deref(), Some("SN-77"));

        let mut edit = AssetInput::from(&asset);
        edit.lot = Some("L-3".into());
        assert_eq!(db.update_asset(asset.id, &edit).unwrap().lot.as_deref(), Some("L-3"));
        assert!(matches!(db.update_asset(999, &edit), Err(Error::NotFound { entity: "asset", .. })));
    }

    #[test]
    fn test_history_ordering() {
        let db = Database::open_in_memory().unwrap();
        let store = sample_store(&db, "LOC-001");

        let ids: Vec<i64> = ["2024-01-01", "2024-03-01", "2024-02-01"]
            .iter()
            .map(|d| {
                db.add_history(store.id, &HistoryInput::new("ZD-1", date(d), "novedad"))
                    .unwrap()
                    .id
            })
            .collect();

        let order: Vec<i64> = db.list_history(store.id).unwrap().iter().map(|h| h.id).collect();
        assert_eq!(order, vec![ids[1], ids[2], ids[0]]);
    }

    #[test]
    fn test_history_ties_break_by_id_desc() {
        let db = Database::open_in_memory().unwrap();
        let store = sample_store(&db, "LOC-001");
        let first = db.add_history(store.id, &HistoryInput::new("A", date("2024-01-01"), "x")).unwrap();
        let second = db.add_history(store.id, &HistoryInput::new("B", date("2024-01-01"), "y")).unwrap();

        let order: Vec<i64> = db.list_history(store.id).unwrap().iter().map(|h| h.id).collect();
        assert_eq!(order, vec![second.id, first.id]);
    }

    #[test]
    fn test_history_resolution_is_independent() {
        let db = Database::open_in_memory().unwrap();
        let store = sample_store(&db, "LOC-001");

        let mut input = HistoryInput::new("ZD-9", date("2024-05-01"), "sin señal");
        input.resolution_date = Some(date("2024-05-02").into());
        let entry = db.add_history(store.id, &input).unwrap();
        assert_eq!(entry.resolution_date.as_deref(), Some("2024-05-02"));
        assert_eq!(entry.resolution, None);

        let mut edit = input.clone();
        edit.resolution_date = None;
        edit.resolution = Some("cable reemplazado".into());
        edit.status = TicketStatus::Resolved;
        let updated = db.update_history(entry.id, &edit).unwrap();
        assert_eq!(updated.resolution_date, None);
        assert_eq!(updated.resolution.as_deref(), Some("cable reemplazado"));
        assert_eq!(updated.status, TicketStatus::Resolved);
    }

    #[test]
    fn test_delete_store_cascades() {
        let db = Database::open_in_memory().unwrap();
        let store = sample_store(&db, "LOC-001");
        let other = sample_store(&db, "LOC-002");

        for _ in 0..3 {
            db.add_screen(store.id, &ScreenInput::new("LG", "49UH5F", 55, "caja")).unwrap();
        }
        db.add_asset(store.id, &AssetInput::new(AssetType::Router)).unwrap();
        db.add_history(store.id, &HistoryInput::new("ZD-1", date("2024-01-01"), "x")).unwrap();
        db.add_screen(other.id, &ScreenInput::new("Samsung", "QM55", 55, "entrada")).unwrap();

        db.delete_store(store.id).unwrap();

        assert!(db.list_screens(store.id).unwrap().is_empty());
        assert!(db.list_assets(store.id).unwrap().is_empty());
        assert!(db.list_history(store.id).unwrap().is_empty());
        assert_eq!(db.list_screens(other.id).unwrap().len(), 1);
    }

    #[test]
    fn test_file_backed_open_per_operation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stores.db");

        let db = Database::open(&path).unwrap();
        assert_eq!(db.path(), Some(path.as_path()));
        assert_eq!(db.migration_report().created_tables.len(), 4);
        let store = sample_store(&db, "LOC-001");
        db.add_screen(store.id, &ScreenInput::new("LG", "49UH5F", 55, "caja")).unwrap();
        db.delete_store(store.id).unwrap();
        assert!(db.list_screens(store.id).unwrap().is_empty());
        drop(db);

        let reopened = Database::open(&path).unwrap();
        assert!(!reopened.migration_report().changed());
        let stats = reopened.stats().unwrap();
        assert_eq!(stats.stores, 0);
        assert!(stats.is_current());
    }

    #[test]
    fn test_legacy_file_is_upgraded_on_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.db");
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute_batch(
                r#"
                CREATE TABLE stores (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    code TEXT UNIQUE NOT NULL,
                    name TEXT NOT NULL,
                    created_at TEXT NOT NULL
                );
                CREATE TABLE history (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    store_id INTEGER NOT NULL,
                    date TEXT, type TEXT, responsible TEXT, detail TEXT
                );
                INSERT INTO stores (code, name, created_at) VALUES ('LOC-001', 'Mall', '2023-01-01T00:00:00');
                INSERT INTO history (store_id, date, type, responsible, detail)
                    VALUES (1, '2023-02-01', 'Visita', 'Juan', 'pantalla apagada');
                "#,
            )
            .unwrap();
        }

        let db = Database::open(&path).unwrap();
        assert_eq!(db.migration_report().legacy_history_rows, Some(1));
        let store = db.find_store_by_code("LOC-001").unwrap().unwrap();
        assert_eq!(store.contact_2, Contact::default());

        let history = db.list_history(store.id).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].ticket_code, crate::history::MISSING_TICKET_CODE);
        assert_eq!(history[0].issue_desc, "pantalla apagada");
        assert_eq!(history[0].technician.as_deref(), Some("Juan"));
        assert_eq!(history[0].status, TicketStatus::Open);
        drop(db);

        let again = Database::open(&path).unwrap();
        assert_eq!(again.migration_report().legacy_history_rows, None);
        assert_eq!(again.list_history(store.id).unwrap().len(), 1);
    }
}
