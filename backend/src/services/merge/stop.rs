use crate::job_controller::state::JobsState;
use actix_web::{web, HttpResponse, Responder};
use log::info;

/// `POST /api/merge/stop/{job_id}`: the batch ends before its next recipient.
pub(crate) async fn process(job_id: web::Path<String>, state: web::Data<JobsState>) -> impl Responder {
    let job_id = job_id.into_inner();
    if state.request_stop(&job_id).await {
        info!("Stop requested for merge job {}", job_id);
        HttpResponse::Accepted().json(serde_json::json!({ "job_id": job_id, "stopping": true }))
    } else {
        HttpResponse::NotFound().body("Job ID not found or already finished")
    }
}
