use crate::error::{Error, Result};
use crate::model::{
    common::{is_pilot_state, Zipcode},
    db::Location,
};
use crate::store::Store;

/// Look up the location of a ZIP code.
///
/// Unknown ZIP codes are `NotFound`; known ones outside the pilot states are
/// `Unsupported`, carrying the resolved location so callers can say where it is.
pub async fn resolve(store: &dyn Store, zipcode: &Zipcode) -> Result<Location> {
    let location = store
        .location(zipcode.as_str())
        .await?
        .ok_or_else(|| Error::not_found(format!("ZIP code '{zipcode}'")))?;

    if !is_pilot_state(&location.state) {
        return Err(Error::unsupported_location(location));
    }
    Ok(location)
}
