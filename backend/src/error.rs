use rocket::http::Status;
use rocket::response::Responder;
use rocket::serde::json::Json;
use shared::{ErrorResponse, ValidationError};
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Party not found")]
    NotFound,
    #[error("Invalid party ID")]
    InvalidId,
    #[error("Unknown sort order: {0}")]
    InvalidSort(String),
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("Possible profanity detected in {0}")]
    Inappropriate(&'static str),
    #[error("A party named {0:?} already exists")]
    DuplicateName(String),
    #[error("Admin session required")]
    Unauthorized,
    #[error("Too many failed attempts. Please try again in {0} minutes.")]
    RateLimited(i64),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> Status {
        match self {
            ApiError::NotFound => Status::NotFound,
            ApiError::InvalidId
            | ApiError::InvalidSort(_)
            | ApiError::Validation(_)
            | ApiError::Inappropriate(_) => Status::BadRequest,
            ApiError::DuplicateName(_) => Status::Conflict,
            ApiError::Unauthorized => Status::Unauthorized,
            ApiError::RateLimited(_) => Status::TooManyRequests,
            ApiError::Internal(_) => Status::InternalServerError,
        }
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for ApiError {
    fn respond_to(self, req: &'r rocket::Request<'_>) -> rocket::response::Result<'o> {
        let status = self.status();
        let message = match &self {
            ApiError::Internal(detail) => {
                error!("{} {} failed: {}", req.method(), req.uri(), detail);
                "An internal server error occurred.".to_string()
            }
            other => other.to_string(),
        };

        rocket::Response::build_from(Json(ErrorResponse::new(message)).respond_to(req)?)
            .status(status)
            .ok()
    }
}
