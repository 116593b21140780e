//! API error surface.
//!
//! Every failure is reported as `{"error":{"code":..,"info":..}}` with HTTP
//! 200 and a `MediaWiki-API-Error` header, the host API's convention.

use crate::permissions::PermissionError;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;
use wsslots_edit::EditError;
use wsslots_model::StoreError;

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("The \"{0}\" module requires a POST request.")]
    MustBePosted(String),

    #[error("Unrecognized value for parameter \"action\": {0}.")]
    UnknownAction(String),

    #[error("{0}")]
    MissingParam(String),

    #[error("The parameters \"{0}\" and \"{1}\" can not be used together.")]
    InvalidParamMix(&'static str, &'static str),

    #[error("Unrecognized value for parameter \"{param}\": {value}.")]
    BadValue { param: &'static str, value: String },

    #[error("Invalid value \"{value}\" for integer parameter \"{param}\".")]
    BadInteger { param: &'static str, value: String },

    #[error("Bad title \"{0}\".")]
    InvalidTitle(String),

    #[error("There is no page with ID {0}.")]
    NoSuchPageId(String),

    #[error("Invalid CSRF token.")]
    BadToken,

    #[error(transparent)]
    Permission(#[from] PermissionError),

    #[error(transparent)]
    Edit(#[from] EditError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// The API error code reported to the client.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::MustBePosted(_) => "mustbeposted",
            Self::UnknownAction(_) => "unknown_action",
            Self::MissingParam(_) => "missingparam",
            Self::InvalidParamMix(..) => "invalidparammix",
            Self::BadValue { .. } => "badvalue",
            Self::BadInteger { .. } => "badinteger",
            Self::InvalidTitle(_) => "invalidtitle",
            Self::NoSuchPageId(_) => "nosuchpageid",
            Self::BadToken => "badtoken",
            Self::Permission(e) => e.code(),
            Self::Edit(e) => e.code(),
            Self::Store(e) => e.code(),
            Self::Internal(_) => "internal_api_error",
        }
    }

    pub(crate) fn missing(param: &str) -> Self {
        Self::MissingParam(format!("The \"{param}\" parameter must be set."))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.code();
        let body = json!({
            "error": {
                "code": code,
                "info": self.to_string(),
            }
        });
        ([("mediawiki-api-error", code)], Json(body)).into_response()
    }
}
