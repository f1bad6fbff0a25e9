use log::{debug, error};
use mongodb::error::Error as DbError;
use rocket::{
    http::{Status, StatusClass},
    response::{self, Responder},
    serde::json::{self, json, Json, Value},
    Request,
};
use thiserror::Error;

use crate::logging::RequestId;
use crate::model::db::Location;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("Storage failure: {0}")]
    Storage(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("Text service failure: {0}")]
    TextService(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("State '{state}' is not supported yet")]
    Unsupported {
        state: String,
        location: Option<Box<Location>>,
    },
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Unavailable: {0}")]
    Unavailable(String),
}

impl Error {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn forbidden(what: impl Into<String>) -> Self {
        Self::Forbidden(what.into())
    }

    pub fn bad_request(what: impl Into<String>) -> Self {
        Self::BadRequest(what.into())
    }

    /// A location that resolved fine but lies outside the pilot states.
    pub fn unsupported_location(location: Location) -> Self {
        Self::Unsupported {
            state: location.state.clone(),
            location: Some(Box::new(location)),
        }
    }

    /// A bare state code outside the pilot states.
    pub fn unsupported_state(state: impl Into<String>) -> Self {
        Self::Unsupported {
            state: state.into(),
            location: None,
        }
    }

    /// Convert a rejected JSON request body into a validation error.
    pub fn from_json(err: json::Error<'_>) -> Self {
        match err {
            json::Error::Io(e) => Self::BadRequest(format!("Could not read request body: {e}")),
            json::Error::Parse(_, e) => Self::BadRequest(format!("Invalid request body: {e}")),
        }
    }

    pub fn status(&self) -> Status {
        match self {
            Self::BadRequest(_) | Self::Unsupported { .. } => Status::BadRequest,
            Self::Forbidden(_) => Status::Forbidden,
            Self::NotFound(_) => Status::NotFound,
            Self::Conflict(_) => Status::Conflict,
            Self::Db(_) | Self::Storage(_) => Status::InternalServerError,
            Self::Http(_) | Self::TextService(_) => Status::BadGateway,
            Self::Unavailable(_) => Status::ServiceUnavailable,
        }
    }

    /// The JSON body shown to the caller. Server-side failures are reduced to
    /// a generic message.
    fn body(&self) -> Value {
        match self {
            Self::Db(_) | Self::Storage(_) => json!({ "error": "Internal server error" }),
            Self::Http(_) => json!({ "error": "Text service unavailable" }),
            Self::Unsupported { state, location } => json!({
                "error": self.to_string(),
                "supported": false,
                "state": state,
                "county": location.as_ref().map(|l| l.county.as_str()),
                "city": location.as_ref().map(|l| l.city.as_str()),
            }),
            _ => json!({ "error": self.to_string() }),
        }
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'o> {
        let status = self.status();
        let id = RequestId::of(req);
        match status.class() {
            StatusClass::ServerError => error!("req{id} {} {}: {self}", req.method(), req.uri()),
            _ => debug!("req{id} {} {}: {self}", req.method(), req.uri()),
        }
        (status, Json(self.body())).respond_to(req)
    }
}
