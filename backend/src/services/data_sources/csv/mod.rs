//! CSV data sources: upload, mapping, verification and job status.
//!
//! Routes under `/api/data_sources/csv`:
//! - `POST /upload`: multipart/form-data with an optional `json` part
//!   (`{"id": ...}`) and a `file` part holding the CSV. The file is stored
//!   under a name derived from its MD5 hash and registered in SQLite.
//!
//! - `POST /mapping`: resolves the field-to-column mapping for a variant and
//!   returns one binding per mapped field with a sample value from the first
//!   row. Unresolved required fields are rejected.
//!
//! - `POST /verify`: starts a background job that normalizes and validates
//!   every row and completes with a `VerifyReport`. Returns the `job_id`.
//!
//! - `GET /status/{job_id}`: polls the `JobStatus` of any background job.

use crate::config::AppConfig;
use crate::error::MergeError;
use crate::job_controller::status;
use actix_web::web::{get, post, scope, Data, Json};
use actix_web::{HttpResponse, Responder, Scope};
use common::model::csv::ColumnBinding;
use common::requests::VerifyCsvRequest;

pub mod mapping;
pub mod store;
pub mod table;
mod upload;
mod verify;

const API_PATH: &str = "/api/data_sources/csv";

/// Configures and returns the Actix scope for CSV data source routes.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/upload", post().to(upload::process))
        .route("/mapping", post().to(resolve_bindings))
        .route("/verify", post().to(verify::process))
        .route("/status/{job_id}", get().to(status::process))
}

async fn resolve_bindings(config: Data<AppConfig>, req: Json<VerifyCsvRequest>) -> impl Responder {
    let req = req.into_inner();
    let result = actix_web::web::block(move || -> Result<Vec<ColumnBinding>, MergeError> {
        let table = store::load_table(&config, &req.data_source_id)?;
        let resolved = mapping::resolve_mapping(&table.headers, req.variant, &req.mapping)?;
        Ok(mapping::bindings(&resolved, &table, req.variant))
    })
    .await;

    match result {
        Ok(Ok(bindings)) => HttpResponse::Ok().json(bindings),
        Ok(Err(e)) => HttpResponse::BadRequest().body(e.to_string()),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}
