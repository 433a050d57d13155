use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use service::auth::{Error as AuthError, ErrorKind as AuthErrorKind};

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error(AuthError);

impl StdError for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

// List of possible StatusCode variants https://docs.rs/http/latest/http/status/struct.StatusCode.html
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self.0.kind {
            AuthErrorKind::InvalidToken | AuthErrorKind::ExpiredToken => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED").into_response()
            }
            AuthErrorKind::MissingSecret | AuthErrorKind::Other => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR").into_response()
            }
        }
    }
}

impl<E> From<E> for Error
where
    E: Into<AuthError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
