//! Request description and path template rendering.
//!
//! An [`ApiRequest`] names an [`Endpoint`] and carries everything needed to
//! send it: path parameters for the template, single- and multi-value query
//! parameters, and an optional JSON or multipart body. The client turns it into
//! an HTTP request in [`TrackerClient::execute`](super::TrackerClient::execute).

use std::collections::BTreeMap;

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::Serialize;

use super::error::{ApiError, Result};
use super::pagination::PageResponse;
use super::types::FileUpload;
use super::urls::Endpoint;

/// Form field name used for uploaded files.
pub const MULTIPART_FIELD_NAME: &str = "filename";

/// Request payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(serde_json::Value),
    Multipart(FileUpload),
}

/// A fully described API call, ready to be executed.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    endpoint: &'static Endpoint,
    path_params: BTreeMap<String, String>,
    query: BTreeMap<String, String>,
    multi_query: BTreeMap<String, Vec<String>>,
    body: RequestBody,
}

impl ApiRequest {
    pub fn new(endpoint: &'static Endpoint) -> Self {
        Self {
            endpoint,
            path_params: BTreeMap::new(),
            query: BTreeMap::new(),
            multi_query: BTreeMap::new(),
            body: RequestBody::Empty,
        }
    }

    /// Set the value for a `{name}` placeholder.
    pub fn path(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.path_params.insert(name.into(), value.to_string());
        self
    }

    /// Set a single-value query parameter, replacing any previous value.
    pub fn query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.insert(name.into(), value.to_string());
        self
    }

    /// Set a query parameter only when a value is present.
    pub fn query_opt(self, name: impl Into<String>, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.query(name, value),
            None => self,
        }
    }

    /// Set a query parameter that is repeated once per value (`expand=a&expand=b`).
    ///
    /// An empty value list leaves the parameter out.
    pub fn query_values<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        if !values.is_empty() {
            self.multi_query.insert(name.into(), values);
        }
        self
    }

    /// Serialize `body` as the JSON payload.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        let value = serde_json::to_value(body)?;
        self.body = if value.is_null() {
            RequestBody::Empty
        } else {
            RequestBody::Json(value)
        };
        Ok(self)
    }

    /// Send `file` as a multipart form with a single field.
    pub fn multipart(mut self, file: FileUpload) -> Self {
        self.body = RequestBody::Multipart(file);
        self
    }

    pub fn endpoint(&self) -> &'static Endpoint {
        self.endpoint
    }

    pub fn path_params(&self) -> &BTreeMap<String, String> {
        &self.path_params
    }

    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    pub(crate) fn into_body(self) -> RequestBody {
        self.body
    }

    /// Query pairs in send order: single values first, then repeated keys.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .query
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        for (name, values) in &self.multi_query {
            pairs.extend(values.iter().map(|v| (name.clone(), v.clone())));
        }
        pairs
    }

    /// Render the endpoint template with the path parameters.
    pub fn render_path(&self) -> Result<String> {
        render_path(self.endpoint.template, &self.path_params)
    }
}

/// Substitute every `{name}` in `template` with its percent-encoded value.
///
/// # Errors
///
/// Returns `ApiError::MalformedRequest` if a placeholder has no value or the
/// value is empty.
pub fn render_path(template: &str, params: &BTreeMap<String, String>) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let end = after.find('}').ok_or_else(|| {
            ApiError::MalformedRequest(format!("unterminated placeholder in '{}'", template))
        })?;
        let name = &after[..end];
        let value = params
            .get(name)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                ApiError::MalformedRequest(format!(
                    "missing path parameter '{}' for '{}'",
                    name, template
                ))
            })?;
        out.push_str(&encode_path_segment(value));
        rest = &after[end + 1..];
    }
    out.push_str(rest);

    Ok(out)
}

/// Characters allowed unescaped inside a path segment besides the unreserved set.
const SEGMENT_SAFE: &[char] = &[':', '@', '$', '&', '+', ',', ';', '='];

/// Percent-encode `value` as a single path segment.
///
/// `/`, `?`, `#`, `%` and spaces are escaped; `:` and `@` stay as-is, so
/// `login:12345` and `jane@example.com` go out unchanged.
pub fn encode_path_segment(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut start = 0;
    for (i, c) in value.char_indices() {
        if SEGMENT_SAFE.contains(&c) {
            out.push_str(&urlencoding::encode(&value[start..i]));
            out.push(c);
            start = i + c.len_utf8();
        }
    }
    out.push_str(&urlencoding::encode(&value[start..]));
    out
}

/// Status and headers of a successful response.
#[derive(Debug, Clone)]
pub struct ResponseMeta {
    pub status: StatusCode,
    pub headers: HeaderMap,
}

impl ResponseMeta {
    /// Pagination totals from `X-Total-Pages` / `X-Total-Count`.
    pub fn page_info(&self) -> PageResponse {
        PageResponse::from_headers(&self.headers)
    }
}

/// A decoded response body with its metadata.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub data: T,
    pub meta: ResponseMeta,
}

impl<T> ApiResponse<T> {
    pub fn into_data(self) -> T {
        self.data
    }
}
