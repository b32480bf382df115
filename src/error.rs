use actix_web::{HttpResponse, ResponseError};
use actix_web::error::BlockingError;
use actix_web::http::StatusCode;
use failure::Fail;

/// Faults that abort a request. Form validation problems are not in here,
/// those are rendered back into the form.
#[derive(Debug, Fail)]
pub enum AppError {
    #[fail(display = "database error: {}", _0)]
    Database(#[cause] diesel::result::Error),

    #[fail(display = "database pool error: {}", _0)]
    Pool(#[cause] diesel::r2d2::PoolError),

    #[fail(display = "migration failed: {}", _0)]
    Migration(String),

    #[fail(display = "template error: {}", _0)]
    Template(#[cause] handlebars::RenderError),

    #[fail(display = "video search failed: {}", _0)]
    Search(#[cause] reqwest::Error),

    #[fail(display = "channel {} points at missing subscriber {}", channel, subscriber)]
    MissingSubscriber { channel: i32, subscriber: i32 },

    #[fail(display = "blocking database task was cancelled")]
    Canceled,
}

impl From<diesel::result::Error> for AppError {
    fn from(e: diesel::result::Error) -> Self {
        AppError::Database(e)
    }
}

impl From<diesel::r2d2::PoolError> for AppError {
    fn from(e: diesel::r2d2::PoolError) -> Self {
        AppError::Pool(e)
    }
}

impl From<handlebars::RenderError> for AppError {
    fn from(e: handlebars::RenderError) -> Self {
        AppError::Template(e)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Search(e)
    }
}

impl From<BlockingError> for AppError {
    fn from(_: BlockingError) -> Self {
        AppError::Canceled
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        error!("request failed: {}", self);
        HttpResponse::build(self.status_code())
            .content_type("text/html; charset=utf-8")
            .body(include_str!("../templates/server_error.html"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn every_fault_is_a_server_error() {
        let e = AppError::MissingSubscriber { channel: 3, subscriber: 9 };
        assert_eq!(e.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(e.to_string(), "channel 3 points at missing subscriber 9");
    }

    #[actix_web::test]
    async fn error_page_hides_details() {
        let e = AppError::Migration("secret detail".to_string());
        let resp = e.error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains("Something went wrong"));
        assert!(!body.contains("secret detail"));
        assert!(!body.contains("migration failed"));
    }
}
