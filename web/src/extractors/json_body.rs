use crate::Error;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header, HeaderMap},
};
use domain::error::ValidationErrorKind;
use log::*;
use serde_json::{json, Value};

/// A JSON request body, read leniently.
///
/// Requests whose content type is not `application/json` (structured suffixes such as
/// `application/merge-patch+json` included), or with an empty body, yield an empty object.
/// A body that fails to parse, or whose top level value is neither an object nor an
/// array, is rejected as invalid JSON. Failing to read the body at all (for example
/// exceeding the body limit) is an unexpected error.
pub(crate) struct JsonBody(pub Value);

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !has_json_content_type(req.headers()) {
            trace!("Request has no JSON content type, using an empty body");
            return Ok(JsonBody(json!({})));
        }

        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            if rejection.status().as_u16() == 413 {
                Error::unexpected("request entity too large")
            } else {
                Error::unexpected(rejection.body_text())
            }
        })?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(JsonBody(json!({})));
        }

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(value) if value.is_object() || value.is_array() => Ok(JsonBody(value)),
            Ok(_) => {
                debug!("Rejecting JSON body with a scalar top level value");
                Err(ValidationErrorKind::InvalidJson.into())
            }
            Err(e) => {
                debug!("Rejecting malformed JSON body: {e}");
                Err(ValidationErrorKind::InvalidJson.into())
            }
        }
    }
}

fn has_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return false;
    };
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    essence == "application/json"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        response::IntoResponse,
    };

    async fn extract(content_type: Option<&str>, body: &str) -> Result<Value, StatusCode> {
        let mut builder = HttpRequest::builder().method("POST").uri("/api/meetings");
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        let request = builder.body(Body::from(body.to_string())).unwrap();
        JsonBody::from_request(request, &())
            .await
            .map(|JsonBody(value)| value)
            .map_err(|err| err.into_response().status())
    }

    #[tokio::test]
    async fn test_object_body_is_extracted() {
        let value = extract(Some("application/json; charset=utf-8"), r#"{"subject":"Sync"}"#)
            .await
            .unwrap();
        assert_eq!(value, json!({"subject": "Sync"}));
    }

    #[tokio::test]
    async fn test_missing_content_type_yields_empty_object() {
        let value = extract(None, r#"{"subject":"Sync"}"#).await.unwrap();
        assert_eq!(value, json!({}));

        let value = extract(Some("text/plain"), "{").await.unwrap();
        assert_eq!(value, json!({}));

        let value = extract(Some("application/merge-patch+json"), r#"{"subject":"Sync"}"#)
            .await
            .unwrap();
        assert_eq!(value, json!({}));
    }

    #[tokio::test]
    async fn test_empty_body_yields_empty_object() {
        assert_eq!(extract(Some("application/json"), "  ").await.unwrap(), json!({}));
    }

    #[tokio::test]
    async fn test_malformed_or_scalar_body_is_bad_request() {
        for body in [r#"{"subject":"#, "42", r#""text""#, "null"] {
            assert_eq!(
                extract(Some("application/json"), body).await.err(),
                Some(StatusCode::BAD_REQUEST),
                "{body}"
            );
        }
    }

    #[test]
    fn test_json_content_types() {
        let mut headers = HeaderMap::new();
        for (content_type, expected) in [
            ("application/json", true),
            ("Application/JSON", true),
            ("application/merge-patch+json", false),
            ("application/vnd.api+json", false),
            ("text/json", false),
            ("application/x-www-form-urlencoded", false),
        ] {
            headers.insert(header::CONTENT_TYPE, content_type.parse().unwrap());
            assert_eq!(has_json_content_type(&headers), expected, "{content_type}");
        }
    }
}
