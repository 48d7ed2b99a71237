//! Schema evolution
//!
//! Brings any database this application has ever written up to the current
//! layout. Every step is idempotent and the whole list runs inside a single
//! transaction, so a failure leaves the file exactly as it was found.
//!
//! Known prior layouts:
//! - freshly created (no tables)
//! - stores without the second contact
//! - screens without `input_port`
//! - history in the pre-ticket layout (`date`/`type`/`responsible`/`detail`)

use rusqlite::{Connection, OptionalExtension};
use crate::fields::{now_timestamp, today};
use crate::{Error, Result};
use super::schema::{self, Column};

/// One versioned, idempotent migration step
pub struct Migration {
    pub version: i64,
    pub name: &'static str,
    apply: fn(&Connection, &mut MigrationReport) -> rusqlite::Result<()>,
}

impl Migration {
    pub fn apply(&self, conn: &Connection, report: &mut MigrationReport) -> Result<()> {
        (self.apply)(conn, report).map_err(|source| Error::Migration {
            step: self.name,
            source,
        })
    }
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "create_core_tables",
        apply: create_core_tables,
    },
    Migration {
        version: 2,
        name: "backfill_core_columns",
        apply: backfill_core_columns,
    },
    Migration {
        version: 3,
        name: "history_ticket_shape",
        apply: history_ticket_shape,
    },
    Migration {
        version: 4,
        name: "create_indexes",
        apply: create_indexes,
    },
];

/// All migration steps, in the order they run
pub fn migrations() -> &'static [Migration] {
    MIGRATIONS
}

/// What a migration run changed
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct MigrationReport {
    /// Schema version found before the run (`PRAGMA user_version`)
    pub from_version: i64,
    pub to_version: i64,
    /// Tables created because they were absent
    pub created_tables: Vec<String>,
    /// Columns added to existing tables, as `table.column`
    pub added_columns: Vec<String>,
    /// Rows converted from the legacy history layout, if it was found
    pub legacy_history_rows: Option<usize>,
}

impl MigrationReport {
    pub fn changed(&self) -> bool {
        !self.created_tables.is_empty()
            || !self.added_columns.is_empty()
            || self.legacy_history_rows.is_some()
    }
}

impl std::fmt::Display for MigrationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "schema v{} -> v{}", self.from_version, self.to_version)?;
        if !self.created_tables.is_empty() {
            write!(f, ", created {}", self.created_tables.join(", "))?;
        }
        if !self.added_columns.is_empty() {
            write!(f, ", added {}", self.added_columns.join(", "))?;
        }
        if let Some(rows) = self.legacy_history_rows {
            write!(f, ", converted {} legacy history rows", rows)?;
        }
        Ok(())
    }
}

/// Run every migration step inside one transaction
pub fn run(conn: &Connection) -> Result<MigrationReport> {
    let tx = conn.unchecked_transaction()?;
    let mut report = MigrationReport {
        from_version: user_version(&tx)?,
        ..Default::default()
    };

    for migration in migrations() {
        tracing::debug!("Applying migration {} ({})", migration.version, migration.name);
        migration.apply(&tx, &mut report)?;
    }

    report.to_version = schema::SCHEMA_VERSION;
    tx.pragma_update(None, "user_version", schema::SCHEMA_VERSION)?;
    tx.commit()?;

    if report.changed() {
        tracing::info!("Schema migrated: {}", report);
    } else {
        tracing::debug!("Schema up to date (v{})", report.to_version);
    }
    Ok(report)
}

fn user_version(conn: &Connection) -> Result<i64> {
    Ok(conn.query_row("PRAGMA user_version", [], |row| row.get(0))?)
}

/// Check whether a table exists
pub fn table_exists(conn: &Connection, table: &str) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [table],
        |row| row.get::<_, String>(0),
    )
    .optional()
    .map(|name| name.is_some())
}

/// Check whether a table has a column
pub fn column_exists(conn: &Connection, table: &str, column: &str) -> rusqlite::Result<bool> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1)")?;
    let names = stmt
        .query_map([table], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(names.iter().any(|name| name == column))
}

/// Add every missing column of `table`
fn ensure_columns(
    conn: &Connection,
    table: &str,
    columns: &[Column],
    report: &mut MigrationReport,
) -> rusqlite::Result<()> {
    for column in columns {
        if !column_exists(conn, table, column.name)? {
            conn.execute_batch(&format!(
                "ALTER TABLE {} ADD COLUMN {} {};",
                table, column.name, column.definition
            ))?;
            tracing::info!("Added column {}.{}", table, column.name);
            report.added_columns.push(format!("{}.{}", table, column.name));
        }
    }
    Ok(())
}

fn create_core_tables(conn: &Connection, report: &mut MigrationReport) -> rusqlite::Result<()> {
    for (table, ddl, _) in schema::core_tables() {
        if !table_exists(conn, table)? {
            conn.execute_batch(ddl)?;
            report.created_tables.push(table.to_string());
        }
    }
    Ok(())
}

fn backfill_core_columns(conn: &Connection, report: &mut MigrationReport) -> rusqlite::Result<()> {
    for (table, _, columns) in schema::core_tables() {
        ensure_columns(conn, table, columns, report)?;
    }
    Ok(())
}

fn history_ticket_shape(conn: &Connection, report: &mut MigrationReport) -> rusqlite::Result<()> {
    if !table_exists(conn, "history")? {
        conn.execute_batch(&schema::create_history_table("history"))?;
        report.created_tables.push("history".to_string());
        return Ok(());
    }

    if column_exists(conn, "history", "ticket_code")? {
        return ensure_columns(conn, "history", schema::HISTORY_COLUMNS_BACKFILL, report);
    }

    tracing::info!("Converting legacy history table to ticket layout");
    conn.execute_batch(&format!("DROP TABLE IF EXISTS {};", schema::HISTORY_SIDE_TABLE))?;
    conn.execute_batch(&schema::create_history_table(schema::HISTORY_SIDE_TABLE))?;
    let copied = conn.execute(schema::COPY_LEGACY_HISTORY, [today(), now_timestamp()])?;
    conn.execute_batch(&format!(
        "DROP TABLE history; ALTER TABLE {} RENAME TO history;",
        schema::HISTORY_SIDE_TABLE
    ))?;
    report.legacy_history_rows = Some(copied);
    Ok(())
}

fn create_indexes(conn: &Connection, _report: &mut MigrationReport) -> rusqlite::Result<()> {
    for stmt in schema::CREATE_INDEXES {
        conn.execute_batch(stmt)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        conn
    }

    fn count(conn: &Connection, table: &str) -> i64 {
        conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))
            .unwrap()
    }

    /// Stores without the second contact, screens without input port,
    /// history in the pre-ticket layout
    fn seed_oldest_layout(conn: &Connection) {
        conn.execute_batch(
            r#"
            CREATE TABLE stores (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                code TEXT UNIQUE NOT NULL,
                name TEXT NOT NULL,
                address TEXT, zone TEXT, region TEXT,
                contact_name TEXT, contact_phone TEXT, contact_email TEXT,
                notes TEXT,
                created_at TEXT NOT NULL
            );
            CREATE TABLE screens (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                store_id INTEGER NOT NULL,
                brand TEXT NOT NULL, reference TEXT NOT NULL, inches INTEGER NOT NULL,
                orientation TEXT NOT NULL, position TEXT NOT NULL, status TEXT NOT NULL,
                notes TEXT,
                FOREIGN KEY (store_id) REFERENCES stores(id) ON DELETE CASCADE
            );
            CREATE TABLE history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                store_id INTEGER NOT NULL,
                date TEXT,
                type TEXT,
                responsible TEXT,
                detail TEXT,
                FOREIGN KEY (store_id) REFERENCES stores(id) ON DELETE CASCADE
            );
            INSERT INTO stores (code, name, created_at) VALUES ('LOC-001', 'Mall Central', '2023-05-01T10:00:00');
            INSERT INTO screens (store_id, brand, reference, inches, orientation, position, status)
                VALUES (1, 'LG', '49UH5F', 55, 'Horizontal', 'muro caja', 'Operativa');
            INSERT INTO history (store_id, date, type, responsible, detail)
                VALUES (1, '2023-06-01', 'Visita', 'Juan', 'cambio de cable');
            INSERT INTO history (store_id, date, type, responsible, detail)
                VALUES (1, NULL, 'Llamada', NULL, NULL);
            "#,
        )
        .unwrap();
    }

    #[test]
    fn test_fresh_database_gets_all_tables() {
        let conn = raw_conn();
        let report = run(&conn).unwrap();

        for table in ["stores", "screens", "assets", "history"] {
            assert!(table_exists(&conn, table).unwrap(), "missing {}", table);
        }
        assert_eq!(report.created_tables, vec!["stores", "screens", "assets", "history"]);
        assert!(report.added_columns.is_empty());
        assert_eq!(report.legacy_history_rows, None);
        assert_eq!(user_version(&conn).unwrap(), schema::SCHEMA_VERSION);
    }

    #[test]
    fn test_upgrades_old_columns_keeping_rows() {
        let conn = raw_conn();
        seed_oldest_layout(&conn);

        let report = run(&conn).unwrap();

        assert!(column_exists(&conn, "stores", "contact_name_2").unwrap());
        assert!(column_exists(&conn, "stores", "contact_phone_2").unwrap());
        assert!(column_exists(&conn, "screens", "input_port").unwrap());
        assert!(report.added_columns.contains(&"screens.input_port".to_string()));
        assert_eq!(count(&conn, "stores"), 1);
        assert_eq!(count(&conn, "screens"), 1);

        let port: String = conn
            .query_row("SELECT input_port FROM screens WHERE id = 1", [], |row| row.get(0))
            .unwrap();
        assert_eq!(port, "HDMI1");
    }

    #[test]
    fn test_converts_legacy_history() {
        let conn = raw_conn();
        seed_oldest_layout(&conn);

        let report = run(&conn).unwrap();
        assert_eq!(report.legacy_history_rows, Some(2));
        assert!(column_exists(&conn, "history", "ticket_code").unwrap());
        assert!(!column_exists(&conn, "history", "detail").unwrap());
        assert!(!table_exists(&conn, schema::HISTORY_SIDE_TABLE).unwrap());

        let rows: Vec<(String, String, String, String, Option<String>)> = conn
            .prepare("SELECT ticket_code, issue_date, issue_desc, status, technician FROM history ORDER BY id")
            .unwrap()
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?)))
            .unwrap()
            .collect::<rusqlite::Result<_>>()
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0],
            (
                "SIN-TICKET".to_string(),
                "2023-06-01".to_string(),
                "cambio de cable".to_string(),
                "Abierto".to_string(),
                Some("Juan".to_string())
            )
        );
        assert_eq!(rows[1].1, today());
        assert_eq!(rows[1].2, "");
        assert_eq!(rows[1].4, None);
    }

    #[test]
    fn test_second_run_is_a_no_op() {
        let conn = raw_conn();
        seed_oldest_layout(&conn);
        run(&conn).unwrap();

        let snapshot = |conn: &Connection| -> Vec<(i64, String, String, String)> {
            conn.prepare("SELECT id, ticket_code, issue_desc, created_at FROM history ORDER BY id")
                .unwrap()
                .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)))
                .unwrap()
                .collect::<rusqlite::Result<_>>()
                .unwrap()
        };
        let before = snapshot(&conn);

        let report = run(&conn).unwrap();
        assert!(!report.changed());
        assert_eq!(report.from_version, schema::SCHEMA_VERSION);
        assert_eq!(snapshot(&conn), before);
    }

    #[test]
    fn test_backfills_partial_ticket_history() {
        let conn = raw_conn();
        conn.execute_batch(
            r#"
            CREATE TABLE history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                store_id INTEGER NOT NULL,
                ticket_code TEXT NOT NULL,
                issue_date TEXT NOT NULL,
                issue_desc TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .unwrap();

        let report = run(&conn).unwrap();
        assert_eq!(report.legacy_history_rows, None);
        for column in ["resolution_date", "resolution", "status", "technician"] {
            assert!(column_exists(&conn, "history", column).unwrap(), "missing {}", column);
        }
    }

    #[test]
    fn test_failure_rolls_back_every_step() {
        let conn = raw_conn();
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
                note TEXT
            );
            INSERT INTO history (store_id, note) VALUES (1, 'x');
            "#,
        )
        .unwrap();

        let err = run(&conn).unwrap_err();
        assert!(matches!(err, Error::Migration { step: "history_ticket_shape", .. }));

        assert!(!column_exists(&conn, "stores", "contact_name_2").unwrap());
        assert!(!table_exists(&conn, "screens").unwrap());
        assert!(column_exists(&conn, "history", "note").unwrap());
        assert_eq!(count(&conn, "history"), 1);
        assert_eq!(user_version(&conn).unwrap(), 0);
    }
}
