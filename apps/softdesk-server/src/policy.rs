//! Access control decisions.
//!
//! Each operation has its own policy function built from a few predicates.
//! Predicates are evaluated in order and the first denial wins. Visibility
//! (404 for resources outside the requester's projects) is handled before
//! any of these run, see [`crate::scope`].

use entities::{Comment, Issue, Project, User, UserId};

use crate::error::{ServerError, ServerResult};

/// Why a request was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    NotSelf,
    NotAuthor,
    NotProjectAuthor,
    NotContributor,
}

impl DenyReason {
    /// Stable reason code.
    pub fn code(self) -> &'static str {
        match self {
            Self::NotSelf => "not_self",
            Self::NotAuthor => "not_author",
            Self::NotProjectAuthor => "not_project_author",
            Self::NotContributor => "not_contributor",
        }
    }

    fn message(self) -> &'static str {
        match self {
            Self::NotSelf => "You can only manage your own account.",
            Self::NotAuthor => "Only the author can modify this resource.",
            Self::NotProjectAuthor => "Only the project author can manage contributors.",
            Self::NotContributor => "You must be a contributor of this project.",
        }
    }
}

/// Outcome of a policy evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    fn require(condition: bool, reason: DenyReason) -> Self {
        if condition {
            Self::Allow
        } else {
            Self::Deny(reason)
        }
    }

    /// Evaluates `next` only if this decision allows.
    pub fn and_then(self, next: impl FnOnce() -> Decision) -> Decision {
        match self {
            Self::Allow => next(),
            deny => deny,
        }
    }

    pub fn is_allowed(self) -> bool {
        self == Self::Allow
    }

    /// Turns a denial into a 403 error.
    pub fn enforce(self, requester: UserId) -> ServerResult<()> {
        match self {
            Self::Allow => Ok(()),
            Self::Deny(reason) => {
                tracing::warn!(user_id = %requester, reason = reason.code(), "Permission denied");
                Err(ServerError::PermissionDenied(format!(
                    "{} ({})",
                    reason.message(),
                    reason.code()
                )))
            }
        }
    }
}

// ============================================================================
// Predicates
// ============================================================================

fn is_self(requester: UserId, target: UserId) -> Decision {
    Decision::require(requester == target, DenyReason::NotSelf)
}

/// Strict authorship. A resource whose author was deleted has no author.
fn is_author(authored: bool) -> Decision {
    Decision::require(authored, DenyReason::NotAuthor)
}

fn is_project_author(requester: UserId, project: &Project) -> Decision {
    Decision::require(project.is_author(requester), DenyReason::NotProjectAuthor)
}

fn is_contributor(requester: UserId, project: &Project) -> Decision {
    Decision::require(project.is_contributor(requester), DenyReason::NotContributor)
}

// ============================================================================
// Operations
// ============================================================================

/// Reading, updating or deleting an account.
pub fn manage_account(requester: UserId, target: &User) -> Decision {
    is_self(requester, target.id)
}

/// Updating or deleting a project.
pub fn modify_project(requester: UserId, project: &Project) -> Decision {
    is_author(project.is_author(requester))
}

/// Adding or removing contributors.
pub fn manage_contributors(requester: UserId, project: &Project) -> Decision {
    is_project_author(requester, project)
}

pub fn create_issue(requester: UserId, project: &Project) -> Decision {
    is_contributor(requester, project)
}

/// Updating or deleting an issue.
pub fn modify_issue(requester: UserId, project: &Project, issue: &Issue) -> Decision {
    is_contributor(requester, project).and_then(|| is_author(issue.is_author(requester)))
}

pub fn create_comment(requester: UserId, project: &Project) -> Decision {
    is_contributor(requester, project)
}

/// Updating or deleting a comment.
pub fn modify_comment(requester: UserId, project: &Project, comment: &Comment) -> Decision {
    is_contributor(requester, project).and_then(|| is_author(comment.is_author(requester)))
}
