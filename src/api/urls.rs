//! Endpoint table for the Tracker REST API v2.
//!
//! Templates are relative to the client's base URL and may contain `{name}`
//! placeholders that are filled from an [`ApiRequest`](super::request::ApiRequest)'s
//! path parameters.

use reqwest::Method;

/// A single API operation: HTTP method, path template, and body kind.
#[derive(Debug, Clone)]
pub struct Endpoint {
    pub method: Method,
    pub template: &'static str,
    /// The body is a multipart form instead of JSON.
    pub multipart: bool,
}

impl Endpoint {
    const fn json(method: Method, template: &'static str) -> Self {
        Self {
            method,
            template,
            multipart: false,
        }
    }

    const fn multipart(method: Method, template: &'static str) -> Self {
        Self {
            method,
            template,
            multipart: true,
        }
    }

    /// Names of the `{placeholder}` tokens in the template, in order.
    pub fn placeholders(&self) -> Vec<&'static str> {
        placeholders(self.template)
    }
}

/// Extract `{name}` tokens from a template.
pub(crate) fn placeholders(template: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) => {
                names.push(&after[..end]);
                rest = &after[end + 1..];
            }
            None => break,
        }
    }
    names
}

pub static ISSUE_CREATE: Endpoint = Endpoint::json(Method::POST, "/issues/");
pub static ISSUE_GET: Endpoint = Endpoint::json(Method::GET, "/issues/{issue_id}");
pub static ISSUE_MODIFY: Endpoint = Endpoint::json(Method::PATCH, "/issues/{issue_id}");
pub static ISSUES_COUNT: Endpoint = Endpoint::json(Method::POST, "/issues/_count");
pub static ISSUES_SEARCH: Endpoint = Endpoint::json(Method::POST, "/issues/_search");
pub static ISSUE_TRANSITIONS: Endpoint =
    Endpoint::json(Method::GET, "/issues/{issue_id}/transitions");
pub static ISSUE_TRANSITION_EXECUTE: Endpoint = Endpoint::json(
    Method::POST,
    "/issues/{issue_id}/transitions/{transition_id}/_execute",
);

pub static COMMENT_CREATE: Endpoint = Endpoint::json(Method::POST, "/issues/{issue_id}/comments");
pub static COMMENTS_LIST: Endpoint = Endpoint::json(Method::GET, "/issues/{issue_id}/comments");
pub static COMMENT_GET: Endpoint =
    Endpoint::json(Method::GET, "/issues/{issue_id}/comments/{comment_id}");
pub static COMMENT_UPDATE: Endpoint =
    Endpoint::json(Method::PATCH, "/issues/{issue_id}/comments/{comment_id}");
pub static COMMENT_DELETE: Endpoint =
    Endpoint::json(Method::DELETE, "/issues/{issue_id}/comments/{comment_id}");

pub static ATTACHMENT_UPLOAD: Endpoint = Endpoint::multipart(Method::POST, "/attachments/");
pub static ISSUE_ATTACHMENTS: Endpoint =
    Endpoint::json(Method::GET, "/issues/{issue_id}/attachments");
pub static ISSUE_ATTACHMENT_GET: Endpoint =
    Endpoint::json(Method::GET, "/issues/{issue_id}/attachments/{attachment_id}");
pub static ISSUE_ATTACH_FILE: Endpoint =
    Endpoint::multipart(Method::POST, "/issues/{issue_id}/attachments");
pub static ISSUE_ATTACHMENT_DELETE: Endpoint =
    Endpoint::json(Method::DELETE, "/issues/{issue_id}/attachments/{file_id}");

pub static PRIORITIES_LIST: Endpoint = Endpoint::json(Method::GET, "/priorities/");
pub static PRIORITY_GET: Endpoint = Endpoint::json(Method::GET, "/priorities/{priority_id}");

pub static MYSELF: Endpoint = Endpoint::json(Method::GET, "/myself");
pub static USERS_LIST: Endpoint = Endpoint::json(Method::GET, "/users/");
pub static USER_GET: Endpoint = Endpoint::json(Method::GET, "/users/{login_or_user_id}");

pub static COMPONENT_CREATE: Endpoint = Endpoint::json(Method::POST, "/components/");
pub static COMPONENTS_LIST: Endpoint = Endpoint::json(Method::GET, "/components/");
pub static COMPONENT_GET: Endpoint = Endpoint::json(Method::GET, "/components/{component_id}");
pub static COMPONENT_UPDATE: Endpoint =
    Endpoint::json(Method::PATCH, "/components/{component_id}");
