//! Symbolic values with fixed wire representations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::{ApiError, Result};
use super::types::ObjectKey;

/// Built-in issue priority levels.
///
/// The numeric id and the key are both sent when setting an issue's priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriorityLevel {
    Trivial,
    Minor,
    Normal,
    Critical,
    Blocker,
}

impl PriorityLevel {
    pub const ALL: [PriorityLevel; 5] = [
        PriorityLevel::Trivial,
        PriorityLevel::Minor,
        PriorityLevel::Normal,
        PriorityLevel::Critical,
        PriorityLevel::Blocker,
    ];

    pub fn id(&self) -> i64 {
        match self {
            PriorityLevel::Trivial => 1,
            PriorityLevel::Minor => 2,
            PriorityLevel::Normal => 3,
            PriorityLevel::Critical => 4,
            PriorityLevel::Blocker => 5,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            PriorityLevel::Trivial => "trivial",
            PriorityLevel::Minor => "minor",
            PriorityLevel::Normal => "normal",
            PriorityLevel::Critical => "critical",
            PriorityLevel::Blocker => "blocker",
        }
    }

    /// Look up a level by its numeric id.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` for ids outside `1..=5`.
    pub fn from_id(id: i64) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|level| level.id() == id)
            .ok_or_else(|| ApiError::Validation(format!("unknown priority: {}", id)))
    }

    /// The `{id, key}` reference used in issue create/modify bodies.
    pub fn to_object_key(&self) -> ObjectKey {
        ObjectKey::new(self.id().to_string(), self.key())
    }
}

impl fmt::Display for PriorityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for PriorityLevel {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|level| level.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| ApiError::Validation(format!("unknown priority: {}", s)))
    }
}

/// Issue resolution set when closing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Resolution {
    Fixed,
    WontFix,
    CantReproduce,
    Duplicate,
    Later,
    Overfulfilled,
    Successful,
    DontDo,
}

impl Resolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::Fixed => "fixed",
            Resolution::WontFix => "wontFix",
            Resolution::CantReproduce => "cantReproduce",
            Resolution::Duplicate => "duplicate",
            Resolution::Later => "later",
            Resolution::Overfulfilled => "overfulfilled",
            Resolution::Successful => "successful",
            Resolution::DontDo => "dontDo",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Standard workflow transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    StartProgress,
    StopProgress,
    NeedInfo,
    ProvideInfo,
    Close,
    Reopen,
}

impl TransitionKind {
    /// Transition id as used in `/transitions/{transition_id}/_execute`.
    pub fn id(&self) -> &'static str {
        match self {
            TransitionKind::StartProgress => "start_progress",
            TransitionKind::StopProgress => "stop_progress",
            TransitionKind::NeedInfo => "need_info",
            TransitionKind::ProvideInfo => "provide_info",
            TransitionKind::Close => "close",
            TransitionKind::Reopen => "reopen",
        }
    }

    /// Whether the transition takes an assignee in its body.
    pub fn accepts_assignee(&self) -> bool {
        matches!(
            self,
            TransitionKind::StartProgress | TransitionKind::NeedInfo | TransitionKind::ProvideInfo
        )
    }
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for TransitionKind {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "start_progress" => Ok(TransitionKind::StartProgress),
            "stop_progress" => Ok(TransitionKind::StopProgress),
            "need_info" => Ok(TransitionKind::NeedInfo),
            "provide_info" => Ok(TransitionKind::ProvideInfo),
            "close" => Ok(TransitionKind::Close),
            "reopen" => Ok(TransitionKind::Reopen),
            other => Err(ApiError::Validation(format!("unknown transition: {}", other))),
        }
    }
}

/// Extra data to include when listing comments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CommentExpand {
    #[default]
    None,
    Attachments,
    Html,
    All,
}

impl CommentExpand {
    /// Wire value for the `expand` query parameter, `None` when it should be omitted.
    pub fn as_query(&self) -> Option<&'static str> {
        match self {
            CommentExpand::None => None,
            CommentExpand::Attachments => Some("attachments"),
            CommentExpand::Html => Some("html"),
            CommentExpand::All => Some("all"),
        }
    }
}
