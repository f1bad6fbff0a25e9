use rocket::{
    serde::json::{self, Json},
    Route, State,
};

use crate::error::{Error, Result};
use crate::model::api::{BiasCheckRequest, BiasVerdict, SimplifiedMeasure};
use crate::service::text::TextService;
use crate::store::Repository;

pub fn routes() -> Vec<Route> {
    routes![simplify_measure, bias_check]
}

#[post("/measures/<measure_id>/simplify")]
async fn simplify_measure(
    measure_id: &str,
    repo: Repository,
    text: &State<TextService>,
) -> Result<Json<SimplifiedMeasure>> {
    let measure = repo
        .measure(measure_id)
        .await?
        .ok_or_else(|| Error::not_found(format!("Ballot measure '{measure_id}'")))?;
    let simplified = text.simplify(&measure).await?;
    Ok(Json(SimplifiedMeasure {
        measure_id: measure.id,
        simplified,
    }))
}

#[post("/bias-check", data = "<body>")]
async fn bias_check(
    body: std::result::Result<Json<BiasCheckRequest>, json::Error<'_>>,
    text: &State<TextService>,
) -> Result<Json<BiasVerdict>> {
    let request = body.map_err(Error::from_json)?.into_inner();
    if request.text.trim().is_empty() {
        return Err(Error::bad_request("text must not be empty"));
    }
    let verdict = text.check_bias(&request.text).await?;
    Ok(Json(verdict))
}
