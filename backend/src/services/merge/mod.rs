//! Batch send orchestration and its HTTP surface.
//!
//! - `POST /api/merge/start`: starts a batch, returns `{"job_id": ...}`.
//! - `GET /api/merge/status/{job_id}`: current `JobStatus`; finished jobs
//!   carry the `BatchSummary` JSON.
//! - `POST /api/merge/stop/{job_id}`: stops the batch between recipients.

pub mod log_sink;
pub mod orchestrator;
mod start;
mod stop;

use crate::job_controller::status;
use actix_web::web;

const API_PATH: &str = "/api/merge";

pub fn configure_routes() -> actix_web::Scope {
    web::scope(API_PATH)
        .route("/start", web::post().to(start::process))
        .route("/status/{job_id}", web::get().to(status::process))
        .route("/stop/{job_id}", web::post().to(stop::process))
}
