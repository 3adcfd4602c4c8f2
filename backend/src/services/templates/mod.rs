//! # Template Service Module
//!
//! The mail-merge rendering engine and its HTTP routes under `/api/templates`.
//!
//! ## Sub-modules:
//! - `schema`: field schemas, derivation rules and subject patterns per variant.
//! - `normalize`: raw row to `RecipientRecord`.
//! - `validate`: required fields, address format and the variant's extra field.
//! - `render`: subject, HTML and plain-text bodies (`certificate` and `event`
//!   hold the skeletons and conditional sections).
//! - `preview`: rendered samples of the first valid rows.

mod certificate;
mod event;
pub mod normalize;
pub mod placeholder;
mod preview;
pub mod render;
pub mod schema;
pub mod validate;

use actix_web::web::{get, post, scope, Path};
use actix_web::{HttpResponse, Responder, Scope};
use common::model::template::TemplateVariant;

const API_PATH: &str = "/api/templates";

/// Configures the `/api/templates` scope.
///
/// *   **`GET /schema/{variant}`**: required and optional fields, the default
///     subject and the extra required field of `certificate`,
///     `certificate-hosted` or `event`.
/// *   **`POST /preview`**: renders the first valid rows of an uploaded table
///     with a `PreviewRequest`; nothing is sent or logged.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/schema/{variant}", get().to(get_schema))
        .route("/preview", post().to(preview::process))
}

async fn get_schema(variant: Path<String>) -> impl Responder {
    let variant: TemplateVariant = match variant.parse() {
        Ok(variant) => variant,
        Err(e) => return HttpResponse::NotFound().body(e),
    };
    let fields = schema::schema(variant);
    HttpResponse::Ok().json(serde_json::json!({
        "variant": variant.to_string(),
        "name": variant.display_name(),
        "required": fields.required,
        "optional": fields.optional,
        "default_subject": schema::default_subject_pattern(variant),
        "extra_required": schema::extra_requirement(variant).field,
        "requires_attachment": variant.requires_attachment(),
    }))
}
