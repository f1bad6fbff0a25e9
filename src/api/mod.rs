use rocket::{
    http::Status,
    serde::json::{json, Json, Value},
    Catcher, Request, Route,
};

mod admin;
mod analytics;
mod ballot;
mod cards;
mod decisions;
mod text;
mod users;

pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(ballot::routes());
    routes.extend(decisions::routes());
    routes.extend(cards::routes());
    routes.extend(users::routes());
    routes.extend(analytics::routes());
    routes.extend(text::routes());
    routes.extend(admin::routes());
    routes
}

/// Catchers answering framework-level failures with the same `{error}` body
/// as handler errors.
pub fn catchers() -> Vec<Catcher> {
    catchers![not_found, unprocessable, default_catcher]
}

#[catch(404)]
fn not_found(req: &Request<'_>) -> Json<Value> {
    Json(json!({ "error": format!("Not found: {}", req.uri()) }))
}

// Rocket answers 422 for bodies that parse as JSON but not as the expected
// type; handlers take bodies as `Result` so this is only a fallback.
#[catch(422)]
fn unprocessable() -> (Status, Json<Value>) {
    (
        Status::BadRequest,
        Json(json!({ "error": "Request body does not match the expected schema" })),
    )
}

#[catch(default)]
fn default_catcher(status: Status, _req: &Request<'_>) -> (Status, Json<Value>) {
    let message = match status.code {
        500..=599 => "Internal server error".to_string(),
        _ => status.reason_lossy().to_string(),
    };
    (status, Json(json!({ "error": message })))
}
