use crate::config::AppConfig;
use crate::services::data_sources::csv::store::{self, data_source_path};
use crate::services::data_sources::csv::table::parse_table;
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse, Responder};
use common::model::datasource::{DataSource, DataSourceType};
use futures_util::StreamExt;
use log::info;
use md5::Context;
use regex::Regex;
use serde::Deserialize;
use serde_json::from_slice;
use std::fs;
use std::sync::LazyLock;

// Letters, digits, spaces, '-' and '_', which covers every schema field name.
static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}\p{M}\p{N}\s\-_]+$").expect("valid header regex"));

// Client-chosen ids become part of a file name under the uploads directory.
static ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid id regex"));

/// Optional metadata sent in the `json` part before the file.
#[derive(Deserialize, Default)]
struct UploadMeta {
    #[serde(default)]
    id: Option<String>,
}

/// Validate each header cell.
fn validate_header_cells(headers: &[String]) -> Result<(), String> {
    if headers.is_empty() {
        return Err("CSV header row is missing".to_string());
    }
    for cell in headers {
        if cell.is_empty() {
            return Err("CSV header cells must not be empty".to_string());
        }
        if !HEADER_RE.is_match(cell) {
            return Err(format!(
                "CSV header '{}' may only contain letters, digits, spaces, '-' and '_'",
                cell
            ));
        }
    }
    Ok(())
}

/// Blank ids are replaced by a fresh UUID; anything else must match [`ID_RE`].
fn data_source_id(requested: Option<String>) -> Result<String, String> {
    match requested.map(|id| id.trim().to_string()) {
        Some(id) if id.is_empty() => Ok(uuid::Uuid::new_v4().to_string()),
        Some(id) if ID_RE.is_match(&id) => Ok(id),
        Some(id) => Err(format!(
            "Data source id '{}' may only contain ASCII letters, digits, '-' and '_'",
            id
        )),
        None => Ok(uuid::Uuid::new_v4().to_string()),
    }
}

/// - On success: `200 OK` with the registered `DataSource` as JSON.
/// - On failure: `400 Bad Request` with the error message.
pub(crate) async fn process(config: web::Data<AppConfig>, payload: Multipart) -> impl Responder {
    match upload_data_source(&config, payload).await {
        Ok(ds) => HttpResponse::Ok().json(ds),
        Err(e) => HttpResponse::BadRequest().body(format!("Error: {}", e)),
    }
}

/// Stores an uploaded CSV as `{uploads_dir}/{id}_{md5}.csv` and registers it.
async fn upload_data_source(
    config: &AppConfig,
    mut payload: Multipart,
) -> Result<DataSource, Box<dyn std::error::Error>> {
    let mut meta = UploadMeta::default();
    let mut bytes: Vec<u8> = Vec::new();
    let mut md5_hasher = Context::new();
    let mut file_seen = false;

    while let Some(item) = payload.next().await {
        let mut field = item?;
        let part_name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));

        match part_name.as_deref() {
            Some("file") => {
                let filename = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename().map(|f| f.to_string()))
                    .unwrap_or_default();
                if !filename.to_lowercase().ends_with(".csv") {
                    return Err("The file must end with .csv".into());
                }
                while let Some(chunk) = field.next().await {
                    let chunk = chunk?;
                    md5_hasher.consume(&chunk);
                    bytes.extend_from_slice(&chunk);
                }
                file_seen = true;
            }
            Some("json") => {
                let mut json = Vec::new();
                while let Some(chunk) = field.next().await {
                    json.extend_from_slice(&chunk?);
                }
                meta = from_slice(&json)?;
            }
            _ => {}
        }
    }

    if !file_seen {
        return Err("Missing file".into());
    }

    let id = data_source_id(meta.id)?;
    let content = String::from_utf8(bytes).map_err(|_| "CSV file is not valid UTF-8")?;
    let table = parse_table(&content)?;
    validate_header_cells(&table.headers)?;

    let ds = DataSource {
        id,
        md5: format!("{:x}", md5_hasher.finalize()),
        headers: table.headers,
        row_count: table.rows.len(),
        source_type: DataSourceType::Csv,
    };

    fs::create_dir_all(&config.uploads_dir)?;
    fs::write(data_source_path(&config.uploads_dir, &ds.id, &ds.md5), &content)?;
    let conn = store::open(&config.database_path)?;
    store::save_data_source(&conn, &ds)?;

    info!(
        "Registered data source {} ({} rows, md5 {})",
        ds.id, ds.row_count, ds.md5
    );
    Ok(ds)
}
