use rocket::{
    serde::json::{self, Json},
    Route,
};

use crate::error::{Error, Result};
use crate::model::api::AnalyticsRequest;
use crate::service::analytics;
use crate::store::Repository;

pub fn routes() -> Vec<Route> {
    routes![record]
}

#[post("/analytics", data = "<body>")]
async fn record(
    body: std::result::Result<Json<AnalyticsRequest>, json::Error<'_>>,
    repo: Repository,
) -> Result<()> {
    let request = body.map_err(Error::from_json)?.into_inner();
    analytics::record(&*repo, request).await
}
