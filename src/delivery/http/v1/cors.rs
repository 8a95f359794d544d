//! Origin negotiation for browser clients.
//!
//! Every response carries the same fixed CORS header block; only
//! `Access-Control-Allow-Origin` depends on the request. An allowed origin is
//! echoed back, anything else gets the first configured origin.

use axum::http::{
    header::{self, InvalidHeaderValue},
    HeaderMap, HeaderValue,
};

const LOCALHOST_PREFIX: &str = "http://localhost:";
const ALLOW_METHODS: &str = "OPTIONS,GET,POST,PUT,DELETE";
const ALLOW_HEADERS: &str =
    "Content-Type,X-Api-Key,X-Amz-Date,Authorization,X-Api-Stage,X-Requested-With,Accept,Origin";
const MAX_AGE_SECS: &str = "3600";

#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allowed_origins: Vec<HeaderValue>,
}

impl CorsPolicy {
    /// Builds a policy from an ordered allow-list. An empty list falls back to
    /// the production site.
    pub fn new<I, S>(allowed_origins: I) -> Result<Self, InvalidHeaderValue>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut origins = allowed_origins
            .into_iter()
            .map(|origin| HeaderValue::from_str(origin.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        if origins.is_empty() {
            origins.push(HeaderValue::from_static("https://arthritisease.org"));
        }
        Ok(Self {
            allowed_origins: origins,
        })
    }

    pub fn is_allowed(&self, origin: &HeaderValue) -> bool {
        self.allowed_origins.contains(origin)
            || origin
                .to_str()
                .is_ok_and(|o| o.starts_with(LOCALHOST_PREFIX))
    }

    pub fn resolve_origin(&self, origin: Option<&HeaderValue>) -> HeaderValue {
        match origin {
            Some(origin) if self.is_allowed(origin) => origin.clone(),
            _ => self.allowed_origins[0].clone(),
        }
    }

    pub fn apply(&self, origin: Option<&HeaderValue>, headers: &mut HeaderMap) {
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            self.resolve_origin(origin),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        );
        headers.insert(
            header::ACCESS_CONTROL_MAX_AGE,
            HeaderValue::from_static(MAX_AGE_SECS),
        );
        headers.insert(header::VARY, HeaderValue::from_static("Origin"));
    }
}
