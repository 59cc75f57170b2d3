//! Comment entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{CommentId, IssueId, UserId};

/// A comment left on an issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    /// Random identifier.
    pub id: CommentId,
    /// Parent issue. Never changes after creation.
    pub issue_id: IssueId,
    /// Writer, cleared when the account is deleted.
    pub author_id: Option<UserId>,
    /// Comment body.
    pub description: String,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Creates a new comment with a fresh random id.
    pub fn new(issue_id: IssueId, author_id: UserId, description: impl Into<String>) -> Self {
        Self {
            id: CommentId::new_v4(),
            issue_id,
            author_id: Some(author_id),
            description: description.into(),
            created_at: Utc::now(),
        }
    }

    /// Returns true if the user wrote this comment.
    pub fn is_author(&self, user_id: UserId) -> bool {
        self.author_id == Some(user_id)
    }
}
