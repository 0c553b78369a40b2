//! Request body extractor for carro writes.
//!
//! Accepts either a JSON object or a `multipart/form-data` form. Multipart text
//! parts are folded into the same flat map a JSON body produces, so validation
//! does not care which encoding the client used. A file part named `foto`
//! becomes the uploaded photo.

use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::Json;
use concessionaria_core::carro::FIELD_FOTO;
use serde_json::{Map, Value};

use crate::error::AppError;
use crate::photos::UploadedPhoto;

/// Parsed body of a create or update request.
#[derive(Debug, Default)]
pub struct CarroPayload {
    /// Field values keyed by wire name.
    pub fields: Map<String, Value>,
    /// The `foto` file part, when the form carried one.
    pub foto: Option<UploadedPhoto>,
}

impl<S> FromRequest<S> for CarroPayload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        if is_multipart {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            from_multipart(multipart).await
        } else {
            let Json(value) = Json::<Value>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            match value {
                Value::Object(fields) => Ok(Self { fields, foto: None }),
                _ => Err(AppError::BadRequest(
                    "Expected a JSON object with carro fields".into(),
                )),
            }
        }
    }
}

async fn from_multipart(mut multipart: Multipart) -> Result<CarroPayload, AppError> {
    let mut payload = CarroPayload::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name.is_empty() {
            continue;
        }

        if name == FIELD_FOTO {
            if let Some(file_name) = field.file_name().map(str::to_string) {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                // Browsers send an empty file part when no file was chosen.
                if !bytes.is_empty() {
                    payload.foto = Some(UploadedPhoto {
                        file_name,
                        bytes: bytes.to_vec(),
                    });
                }
                continue;
            }
        }

        let text = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        // An empty `foto` text part is how HTML forms clear a file input.
        let value = if name == FIELD_FOTO && text.is_empty() {
            Value::Null
        } else {
            Value::String(text)
        };
        payload.fields.insert(name, value);
    }

    Ok(payload)
}
