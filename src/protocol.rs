use actix_web::{http::StatusCode, HttpResponse, HttpResponseBuilder};
use tracing::error;

use crate::{
    error::{NotFoundError, StorageError, ValidationError},
    render::{ErrorPage, Markup},
};

pub fn html(status: StatusCode, body: Markup) -> HttpResponse {
    html_builder(status).body(body.into_string())
}

pub fn html_builder(status: StatusCode) -> HttpResponseBuilder {
    let mut builder = HttpResponse::build(status);
    builder.content_type("text/html; charset=utf-8");
    builder
}

pub fn status_of(err: &anyhow::Error) -> StatusCode {
    if err.is::<NotFoundError>() {
        StatusCode::NOT_FOUND
    } else if err.is::<ValidationError>() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// Renders the error page. Server-side failures keep their details in the log.
pub fn error_response(err: &anyhow::Error) -> HttpResponse {
    let status = status_of(err);
    if err.is::<StorageError>() {
        error!(status = status.as_u16(), "comment store failure: {:#}", err);
    } else {
        error!(status = status.as_u16(), "request failed: {:#}", err);
    }

    let detail = format!("{:#}", err);
    let message = if status.is_server_error() {
        "The comment board is unavailable right now."
    } else {
        detail.as_str()
    };
    html(status, ErrorPage { status, message }.render())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use std::path::PathBuf;

    #[test]
    fn maps_error_kinds_to_statuses() {
        let not_found = anyhow::Error::new(NotFoundError("a.png".to_string()));
        assert_eq!(status_of(&not_found), StatusCode::NOT_FOUND);

        let invalid: anyhow::Result<()> = Err(ValidationError::EmptyUpload.into());
        let invalid = invalid.context("reading submission").unwrap_err();
        assert_eq!(status_of(&invalid), StatusCode::BAD_REQUEST);

        let storage = anyhow::Error::new(StorageError::Read {
            path: PathBuf::from("data.json"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        });
        assert_eq!(status_of(&storage), StatusCode::INTERNAL_SERVER_ERROR);

        assert_eq!(
            status_of(&anyhow::anyhow!("other")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_web::test]
    async fn server_errors_hide_details() {
        let storage = anyhow::Error::new(StorageError::Read {
            path: PathBuf::from("/secret/data.json"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        });
        let response = error_response(&storage);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = actix_web::body::to_bytes(response.into_body()).await.unwrap();
        let body = std::str::from_utf8(&body).unwrap();
        assert!(!body.contains("/secret/data.json"));
        assert!(!body.contains("denied"));
        assert!(body.contains("The comment board is unavailable right now."));
    }
}
