use std::convert::Infallible;

use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use serde_json::{Map, Value};

/// Request body as a JSON object.
///
/// Anything that is not a JSON object (empty body, bad JSON, an array) is
/// read as `{}`, so required-field checks report the problem instead of the
/// extractor.
#[derive(Debug, Default)]
pub struct JsonBody(pub Map<String, Value>);

#[axum::async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Ok(bytes) = Bytes::from_request(req, state).await else {
            return Ok(Self::default());
        };
        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(map)) => Ok(Self(map)),
            _ => Ok(Self::default()),
        }
    }
}

/// Query string pairs in request order.
///
/// Never rejects: repeated keys are kept and [`QueryParams::first`] picks
/// the first one, an unparsable query reads as empty.
#[derive(Debug, Default)]
pub struct QueryParams(pub Vec<(String, String)>);

impl QueryParams {
    pub fn first(&self, key: &str) -> Option<&str> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for QueryParams
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let pairs = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .map(|Query(pairs)| pairs)
            .unwrap_or_default();
        Ok(Self(pairs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request as HttpRequest;

    async fn params(uri: &str) -> QueryParams {
        let (mut parts, _) = HttpRequest::builder().uri(uri).body(()).unwrap().into_parts();
        QueryParams::from_request_parts(&mut parts, &()).await.unwrap()
    }

    #[tokio::test]
    async fn first_value_wins_for_repeated_keys() {
        let q = params("/tasks?projectId=1&projectId=2").await;
        assert_eq!(q.first("projectId"), Some("1"));
        assert_eq!(q.first("email"), None);
    }

    #[tokio::test]
    async fn values_are_percent_decoded() {
        let q = params("/users?email=ana%40corp.io").await;
        assert_eq!(q.first("email"), Some("ana@corp.io"));
        assert!(params("/users").await.0.is_empty());
    }
}
