//! SQLite registry of uploaded data sources.

use common::model::datasource::{DataSource, DataSourceType, Table};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};

use super::table::read_table;
use crate::config::AppConfig;
use crate::error::{ConfigurationError, MergeError};

pub fn open(database_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(database_path)?;
    conn.execute(
        "CREATE TABLE IF NOT EXISTS data_sources (
            id TEXT PRIMARY KEY,
            md5 TEXT NOT NULL,
            headers TEXT NOT NULL,
            row_count INTEGER NOT NULL,
            created_at TEXT NOT NULL
        )",
        [],
    )?;
    Ok(conn)
}

pub fn save_data_source(conn: &Connection, ds: &DataSource) -> rusqlite::Result<()> {
    let headers = serde_json::to_string(&ds.headers)
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
    conn.execute(
        "INSERT OR REPLACE INTO data_sources (id, md5, headers, row_count, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            ds.id,
            ds.md5,
            headers,
            ds.row_count as i64,
            chrono::Local::now().to_rfc3339()
        ],
    )?;
    Ok(())
}

pub fn find_data_source(conn: &Connection, id: &str) -> rusqlite::Result<Option<DataSource>> {
    conn.query_row(
        "SELECT id, md5, headers, row_count FROM data_sources WHERE id = ?1",
        params![id],
        |row| {
            let headers: String = row.get(2)?;
            let headers: Vec<String> = serde_json::from_str(&headers).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
            })?;
            Ok(DataSource {
                id: row.get(0)?,
                md5: row.get(1)?,
                headers,
                row_count: row.get::<_, i64>(3)? as usize,
                source_type: DataSourceType::Csv,
            })
        },
    )
    .optional()
}

/// Location of the stored file, `{uploads_dir}/{id}_{md5}.csv`.
pub fn data_source_path(uploads_dir: &str, id: &str, md5: &str) -> PathBuf {
    Path::new(uploads_dir).join(format!("{}_{}.csv", id, md5))
}

/// Loads the registered table as an immutable snapshot.
pub fn load_table(config: &AppConfig, id: &str) -> Result<Table, MergeError> {
    let conn = open(&config.database_path)?;
    let ds = find_data_source(&conn, id)?
        .ok_or_else(|| ConfigurationError::DataSourceNotFound(id.to_string()))?;
    let table = read_table(&data_source_path(&config.uploads_dir, &ds.id, &ds.md5))
        .map_err(MergeError::DataSource)?;
    Ok(table)
}
