use std::ops::Deref;

use log::error;
use rocket::{
    http::Status,
    request::{self, FromRequest, Request},
};

use crate::Config;

/// The host the request was addressed to, used to build share URLs.
/// Falls back to the configured hostname when the request has no `Host` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHost(String);

impl Deref for RequestHost {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for RequestHost {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let header = req
            .headers()
            .get_one("Host")
            .map(str::trim)
            .filter(|host| !host.is_empty());
        if let Some(host) = header {
            return request::Outcome::Success(Self(host.to_string()));
        }
        if let Some(host) = req.host() {
            return request::Outcome::Success(Self(host.to_string()));
        }
        match req.rocket().state::<Config>() {
            Some(config) => request::Outcome::Success(Self(config.hostname().to_string())),
            None => {
                error!("No config in managed state");
                request::Outcome::Failure((Status::InternalServerError, ()))
            }
        }
    }
}
