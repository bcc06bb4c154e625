//! Request body extractor accepting either JSON or URL-encoded forms.

use axum::{
    Form, Json,
    extract::{
        FromRequest, Request,
        rejection::{FormRejection, JsonRejection},
    },
    http::{StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};

/// Deserializes the body as a form when the content type says so, as JSON
/// otherwise.
pub struct JsonOrForm<T>(pub T);

/// Why a body could not be read. Handlers that answer in their own envelope
/// take `Result<JsonOrForm<T>, BodyRejection>` and map it themselves.
#[derive(Debug)]
pub struct BodyRejection {
    pub status: StatusCode,
    pub message: String,
}

impl IntoResponse for BodyRejection {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}

impl<S, T> FromRequest<S> for JsonOrForm<T>
where
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    Form<T>: FromRequest<S, Rejection = FormRejection>,
{
    type Rejection = BodyRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"));

        if is_form {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|rejection| BodyRejection {
                    status: rejection.status(),
                    message: rejection.body_text(),
                })?;
            Ok(Self(value))
        } else {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|rejection| BodyRejection {
                    status: rejection.status(),
                    message: rejection.body_text(),
                })?;
            Ok(Self(value))
        }
    }
}
