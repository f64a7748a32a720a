//! Request handler
//!
//! One handler serves every path. The object key is the request path with a
//! single leading slash stripped and no further normalization; traversal
//! segments like `..` are passed through to the store, whose own path rules
//! reject them. Authorization denials and missing objects are mapped here;
//! store failures propagate and surface as a 500.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::header::{
    HeaderName, HeaderValue, ALLOW, CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_ENCODING,
    CONTENT_LANGUAGE, CONTENT_LENGTH, CONTENT_TYPE, LAST_MODIFIED,
};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use object_store::Attribute;

use super::AppState;
use crate::auth::AUTH_HEADER;
use crate::error::Error;
use crate::store::StoredObject;

/// Methods the gateway serves, in `Allow` header form
const ALLOWED_METHODS: &str = "GET, PUT, DELETE";

pub(super) async fn handle_request(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Response, Error> {
    let (parts, body) = request.into_parts();
    let method = parts.method;

    // Strip one leading slash; the remainder is the object key, verbatim
    let key = parts.uri.path().strip_prefix('/').unwrap_or("").to_string();

    let supported = method == Method::GET || method == Method::PUT || method == Method::DELETE;
    if !supported {
        return Ok((
            StatusCode::METHOD_NOT_ALLOWED,
            [(ALLOW, ALLOWED_METHODS)],
            format!("Method {} not allowed", method),
        )
            .into_response());
    }

    let supplied_secret = parts
        .headers
        .get(AUTH_HEADER)
        .and_then(|v| v.to_str().ok());

    if !state.authorizer.authorize(&method, &key, supplied_secret) {
        tracing::warn!(%method, %key, "unauthorized request");
        return Ok((StatusCode::UNAUTHORIZED, "Unauthorized").into_response());
    }

    if method == Method::PUT {
        state.bucket.put(&key, body.into_data_stream()).await?;
        tracing::info!(%key, "wrote object");
        Ok(format!("Successfully wrote to {}", key).into_response())
    } else if method == Method::GET {
        match state.bucket.get(&key).await? {
            Some(object) => Ok(object_response(object)),
            None => Ok((
                StatusCode::NOT_FOUND,
                format!("Object {} does not exist", key),
            )
                .into_response()),
        }
    } else {
        state.bucket.delete(&key).await?;
        tracing::info!(%key, "deleted object");
        Ok(format!("Successfully deleted {}", key).into_response())
    }
}

/// Build a 200 response streaming the object, relaying the store's content
/// metadata and integrity tag.
fn object_response(object: StoredObject) -> Response {
    let mut headers = HeaderMap::new();

    for (attribute, value) in object.attributes.iter() {
        let name = match attribute {
            Attribute::ContentType => CONTENT_TYPE,
            Attribute::CacheControl => CACHE_CONTROL,
            Attribute::ContentDisposition => CONTENT_DISPOSITION,
            Attribute::ContentEncoding => CONTENT_ENCODING,
            Attribute::ContentLanguage => CONTENT_LANGUAGE,
            _ => continue,
        };
        if let Ok(value) = HeaderValue::from_str(value) {
            headers.insert(name, value);
        }
    }

    if let Ok(value) = HeaderValue::from_str(&object.size.to_string()) {
        headers.insert(CONTENT_LENGTH, value);
    }
    let last_modified = object
        .last_modified
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string();
    if let Ok(value) = HeaderValue::from_str(&last_modified) {
        headers.insert(LAST_MODIFIED, value);
    }
    if let Some(e_tag) = &object.e_tag {
        if let Ok(value) = HeaderValue::from_str(e_tag) {
            // Integrity tag, exposed verbatim
            headers.insert(HeaderName::from_static("e-tag"), value);
        }
    }

    let mut response = Response::new(Body::from_stream(object.stream));
    *response.headers_mut() = headers;
    response
}
