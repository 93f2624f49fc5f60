//! Tracker API request and response types.
//!
//! Response types default every missing field so that sparse payloads (the API
//! omits unset fields) still decode. Request types skip empty fields on the wire.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::Result;
use super::values::{PriorityLevel, Resolution, TransitionKind};

/// Reference to an entity in a request body (`{"id": ..., "key": ...}`).
///
/// Either field may be left empty; empty fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectKey {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub key: String,
}

impl ObjectKey {
    pub fn new(id: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            key: key.into(),
        }
    }

    pub fn from_id(id: impl Into<String>) -> Self {
        Self::new(id, "")
    }

    pub fn from_key(key: impl Into<String>) -> Self {
        Self::new("", key)
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_empty() && self.key.is_empty()
    }
}

/// Shared shape of entity references in responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectRef {
    /// URL of the referenced API resource.
    #[serde(rename = "self")]
    pub self_url: String,
    pub id: String,
    /// Display name.
    pub display: String,
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display)
    }
}

/// An [`ObjectRef`] that also carries a key (queues, statuses, types, priorities).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyedRef {
    #[serde(flatten)]
    pub base: ObjectRef,
    pub key: String,
}

impl fmt::Display for KeyedRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key)
    }
}

pub type IssueParent = KeyedRef;
pub type IssueType = KeyedRef;
pub type IssuePriority = KeyedRef;
pub type IssueQueue = KeyedRef;
pub type IssueStatus = KeyedRef;
pub type UserRef = ObjectRef;
pub type AttachmentRef = ObjectRef;

/// Status category of an issue status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssueStatusType {
    pub id: String,
    pub display: String,
    pub key: String,
}

/// Agile board an issue belongs to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Board {
    /// Numeric on most installations, string on some.
    pub id: Value,
    pub name: String,
}

// ---------------------------------------------------------------------------
// Issues
// ---------------------------------------------------------------------------

/// A Tracker issue.
///
/// Returned by create, get, modify and search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Issue {
    #[serde(rename = "self")]
    pub self_url: String,
    pub id: String,
    /// Human key, e.g. `QUEUE-123`.
    pub key: String,
    /// Incremented on every change.
    pub version: i64,
    pub last_comment_updated_at: Option<String>,
    pub summary: String,
    pub boards: Vec<Board>,
    pub status_start_time: Option<String>,
    pub parent: Option<IssueParent>,
    pub updated_by: Option<UserRef>,
    pub description: Option<String>,
    pub sprint: Vec<ObjectRef>,
    #[serde(rename = "type")]
    pub issue_type: Option<IssueType>,
    pub priority: Option<IssuePriority>,
    pub created_at: Option<String>,
    pub followers: Vec<UserRef>,
    pub created_by: Option<UserRef>,
    pub assignee: Option<UserRef>,
    pub votes: i64,
    pub comment_with_external_message_count: i64,
    pub comment_without_external_message_count: i64,
    pub queue: Option<IssueQueue>,
    pub updated_at: Option<String>,
    pub status: Option<IssueStatus>,
    pub status_type: Option<IssueStatusType>,
    pub favorite: bool,
    /// Present when requested with `expand=attachments`.
    pub attachments: Vec<AttachmentRef>,
    /// Present when requested with `expand=transitions`.
    pub transitions: Vec<ObjectRef>,
    pub tags: Vec<String>,
}

impl Issue {
    pub fn status_key(&self) -> Option<&str> {
        self.status.as_ref().map(|s| s.key.as_str())
    }

    pub fn queue_key(&self) -> Option<&str> {
        self.queue.as_ref().map(|q| q.key.as_str())
    }

    /// Assignee display name, or "Unassigned".
    pub fn assignee_name(&self) -> &str {
        self.assignee
            .as_ref()
            .map(|a| a.display.as_str())
            .unwrap_or("Unassigned")
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.summary)
    }
}

/// Body of `POST /issues/`.
///
/// Polymorphic fields (`parent`, `type`, `assignee`, ...) accept either a key/login
/// string or an object, so they are kept as raw JSON values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueCreateRequest {
    pub summary: String,
    pub queue: ObjectKey,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `md` for YFM markup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markup_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sprint: Vec<Value>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub issue_type: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub followers: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<Value>,
    /// Idempotency key; a repeated value yields 409 instead of a duplicate issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachment_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub description_attachment_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl IssueCreateRequest {
    pub fn new(queue_key: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            queue: ObjectKey::from_key(queue_key),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_priority(mut self, priority: PriorityLevel) -> Self {
        self.priority = Some(object_key_value(&priority.to_object_key()));
        self
    }

    pub fn with_assignee(mut self, login: impl Into<String>) -> Self {
        self.assignee = Some(Value::String(login.into()));
        self
    }

    pub fn with_unique(mut self, unique: impl Into<String>) -> Self {
        self.unique = Some(unique.into());
        self
    }
}

fn object_key_value(key: &ObjectKey) -> Value {
    let mut map = Map::new();
    if !key.id.is_empty() {
        map.insert("id".to_string(), Value::String(key.id.clone()));
    }
    if !key.key.is_empty() {
        map.insert("key".to_string(), Value::String(key.key.clone()));
    }
    Value::Object(map)
}

/// Follower changes in a modify request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowersChange {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub add: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub remove: Vec<String>,
}

/// Sprint reference in a modify request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SprintRef {
    pub id: String,
}

/// Body of `PATCH /issues/{issue_id}`. Only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueModifyRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<ObjectKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markup_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sprint: Option<SprintRef>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub issue_type: Option<ObjectKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<ObjectKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub followers: Option<FollowersChange>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachment_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub description_attachment_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl IssueModifyRequest {
    pub fn with_priority(mut self, priority: PriorityLevel) -> Self {
        self.priority = Some(priority.to_object_key());
        self
    }
}

/// Body of `POST /issues/_count`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IssueCountRequest {
    /// Field name to value filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Map<String, Value>>,
    /// Query language filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

/// Body of `POST /issues/_search`.
///
/// The API honours only one selector, in this order: `queue`, `keys`,
/// `filter` (+ `order`), `query`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IssueSearchRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keys: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Map<String, Value>>,
    /// `[+/-]<field_key>`, only together with `filter`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

impl IssueSearchRequest {
    pub fn queue(queue: impl Into<String>) -> Self {
        Self {
            queue: Some(queue.into()),
            ..Default::default()
        }
    }

    pub fn keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn query(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Default::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// An available workflow transition of an issue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transition {
    #[serde(rename = "self")]
    pub self_url: String,
    /// Transition id, e.g. `start_progress`.
    pub id: String,
    pub display: String,
    /// Status the issue moves to.
    pub to: Option<KeyedRef>,
}

/// Body of `POST /issues/{issue_id}/transitions/{transition_id}/_execute`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<Resolution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl TransitionRequest {
    /// Preset body for a standard transition.
    ///
    /// `assignee` is only attached for transitions that take one; `Close`
    /// resolves as fixed unless `close_wont_fix` is used.
    pub fn for_kind(kind: TransitionKind, assignee: Option<&str>) -> Self {
        let mut req = Self::default();
        if kind.accepts_assignee() {
            req.assignee = assignee.map(str::to_string);
        }
        if kind == TransitionKind::Close {
            req.resolution = Some(Resolution::Fixed);
        }
        req
    }

    pub fn close_wont_fix() -> Self {
        Self {
            resolution: Some(Resolution::WontFix),
            ..Default::default()
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

/// Body of `POST /issues/{issue_id}/comments`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachment_ids: Vec<String>,
    /// Logins or ids of users to summon.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub summonees: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub maillist_summonees: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markup_type: Option<String>,
}

impl CommentRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

/// Body of `PATCH /issues/{issue_id}/comments/{comment_id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentUpdateRequest {
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachment_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markup_type: Option<String>,
}

/// A comment on an issue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Comment {
    #[serde(rename = "self")]
    pub self_url: String,
    /// Numeric id; also the watermark for comment pagination.
    pub id: i64,
    pub long_id: String,
    pub text: String,
    pub text_html: Option<String>,
    pub attachments: Vec<AttachmentRef>,
    pub created_by: Option<UserRef>,
    pub updated_by: Option<UserRef>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub summonees: Vec<UserRef>,
    pub maillist_summonees: Vec<ObjectRef>,
    pub version: i64,
    /// `standard`, `incoming` or `outcoming`.
    #[serde(rename = "type")]
    pub comment_type: String,
    /// `internal` or `email`.
    pub transport: String,
}

// ---------------------------------------------------------------------------
// Priorities
// ---------------------------------------------------------------------------

/// Priority name: a single string when `localized=true`, per-language otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriorityName {
    Localized(String),
    Translations(HashMap<String, String>),
}

impl Default for PriorityName {
    fn default() -> Self {
        PriorityName::Localized(String::new())
    }
}

impl PriorityName {
    /// Name in the given language, falling back to any available translation.
    pub fn get(&self, lang: &str) -> Option<&str> {
        match self {
            PriorityName::Localized(name) => Some(name),
            PriorityName::Translations(names) => names
                .get(lang)
                .or_else(|| names.values().next())
                .map(String::as_str),
        }
    }
}

/// A priority definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Priority {
    #[serde(rename = "self")]
    pub self_url: String,
    pub id: i64,
    pub key: String,
    pub version: i64,
    pub name: PriorityName,
    pub description: Option<String>,
    /// Display weight.
    pub order: i64,
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// A Tracker user account. Returned by `/myself` and `/users/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "self")]
    pub self_url: String,
    pub uid: i64,
    pub login: String,
    pub tracker_uid: i64,
    pub passport_uid: i64,
    pub cloud_uid: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub display: String,
    pub email: String,
    /// Full access (`false` means read only).
    pub has_license: bool,
    /// Removed from the organization.
    pub dismissed: bool,
    pub disable_notifications: bool,
    pub first_login_date: Option<String>,
    pub last_login_date: Option<String>,
    pub welcome_mail_sent: bool,
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display)
    }
}

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

/// Body of `POST /components/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentRequest {
    pub name: String,
    /// Queue key.
    pub queue: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Owner login.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead: Option<String>,
    /// Assign the owner as default executor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assign_auto: Option<bool>,
}

impl ComponentRequest {
    pub fn new(queue: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            queue: queue.into(),
            ..Default::default()
        }
    }
}

/// Body of `PATCH /components/{component_id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assign_auto: Option<bool>,
}

/// A queue component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Component {
    #[serde(rename = "self")]
    pub self_url: String,
    pub id: i64,
    /// Incremented on every change; required for updates.
    pub version: i64,
    pub name: String,
    pub queue: Option<IssueQueue>,
    pub description: Option<String>,
    pub lead: Option<UserRef>,
    pub assign_auto: bool,
}

// ---------------------------------------------------------------------------
// Attachments
// ---------------------------------------------------------------------------

/// File metadata of an attachment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileMetadata {
    /// Image size in pixels, e.g. `640x480`.
    pub size: Option<String>,
}

/// An uploaded file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Attachment {
    #[serde(rename = "self")]
    pub self_url: String,
    pub id: String,
    pub name: String,
    /// Download URL.
    pub content: String,
    /// Preview URL, images only.
    pub thumbnail: Option<String>,
    pub created_by: Option<UserRef>,
    pub created_at: Option<String>,
    pub mimetype: String,
    /// Size in bytes.
    pub size: i64,
    pub metadata: Option<FileMetadata>,
}

/// A file to send as the multipart body of an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub file_name: String,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: None,
            bytes: bytes.into(),
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Read a file from disk, naming the upload after the file.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string());
        Ok(Self::new(file_name, bytes))
    }
}
