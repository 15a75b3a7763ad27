use actix_multipart::{Field, Multipart, MultipartError};
use actix_web::{cookie::Cookie, HttpRequest};
use futures_util::StreamExt;
use percent_encoding::{percent_decode_str, utf8_percent_encode, NON_ALPHANUMERIC};

use super::requests::{BoardQuery, PhotoField, SubmitRequest};
use crate::{error::ValidationError, models::comments::DEFAULT_USERNAME};

pub const ACCOUNT_COOKIE: &str = "account";
const MAX_FIELD_BYTES: usize = 64 * 1024;

/// Account name for a board view: `?account=`, then the cookie, then the default.
pub fn get_account_name(req: &HttpRequest, query: &BoardQuery) -> String {
    query
        .account
        .clone()
        .filter(|name| !name.is_empty())
        .or_else(|| {
            req.cookie(ACCOUNT_COOKIE)
                .map(|cookie| percent_decode_str(cookie.value()).decode_utf8_lossy().into_owned())
                .filter(|name| !name.is_empty())
        })
        .unwrap_or_else(|| DEFAULT_USERNAME.to_string())
}

pub fn account_cookie(name: &str) -> Cookie<'static> {
    Cookie::build(
        ACCOUNT_COOKIE,
        utf8_percent_encode(name, NON_ALPHANUMERIC).to_string(),
    )
    .path("/")
    .http_only(true)
    .finish()
}

pub async fn read_submission(
    mut payload: Multipart,
    max_upload_bytes: usize,
) -> Result<SubmitRequest, ValidationError> {
    let mut request = SubmitRequest::default();

    while let Some(field) = payload.next().await {
        let mut field = field.map_err(malformed)?;
        let disposition = field.content_disposition();
        let name = disposition.get_name().unwrap_or_default().to_string();
        let filename = disposition.get_filename().map(str::to_string);

        match name.as_str() {
            "photo" => {
                // Oversized photos are drained so the text fields after them still
                // reach the re-rendered form.
                let bytes = match read_bounded(&mut field, max_upload_bytes).await? {
                    Some(bytes) => bytes,
                    None => {
                        request.photo_error = Some(ValidationError::UploadTooLarge {
                            limit: max_upload_bytes,
                        });
                        continue;
                    }
                };
                // Browsers send an empty, unnamed part when no file was picked.
                match filename {
                    Some(filename) if !filename.is_empty() => {
                        request.photo = Some(PhotoField { filename, bytes })
                    }
                    _ => {}
                }
            }
            "account" | "hashtags" | "comments" => {
                let too_large = ValidationError::FieldTooLarge(name.clone());
                let bytes = read_field(&mut field, MAX_FIELD_BYTES, too_large).await?;
                let value = String::from_utf8(bytes).map_err(|_| {
                    ValidationError::MalformedForm(format!("field '{}' is not UTF-8", name))
                })?;
                match name.as_str() {
                    "account" => request.account = Some(value),
                    "hashtags" => request.hashtags = Some(value),
                    _ => request.comments = Some(value),
                }
            }
            _ => {
                while let Some(chunk) = field.next().await {
                    chunk.map_err(malformed)?;
                }
            }
        }
    }

    Ok(request)
}

async fn read_field(
    field: &mut Field,
    limit: usize,
    too_large: ValidationError,
) -> Result<Vec<u8>, ValidationError> {
    let mut buf = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(malformed)?;
        if buf.len() + chunk.len() > limit {
            return Err(too_large);
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf)
}

/// Reads at most `limit` bytes; a longer field is consumed and yields `None`.
async fn read_bounded(
    field: &mut Field,
    limit: usize,
) -> Result<Option<Vec<u8>>, ValidationError> {
    let mut buf = Vec::new();
    let mut overflow = false;
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(malformed)?;
        if overflow || buf.len() + chunk.len() > limit {
            overflow = true;
            buf = Vec::new();
            continue;
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(if overflow { None } else { Some(buf) })
}

fn malformed(err: MultipartError) -> ValidationError {
    ValidationError::MalformedForm(err.to_string())
}
