//! Request bodies and query parameters.

use entities::{IssuePriority, IssueStatus, IssueType, ProjectCategory, UserId};
use serde::{Deserialize, Serialize};

// ============================================================================
// User Requests
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub age: u32,
    #[serde(default)]
    pub can_be_contacted: bool,
    #[serde(default)]
    pub can_data_be_shared: bool,
}

/// Full replacement of an account's profile. The password only changes when
/// one is supplied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub age: u32,
    #[serde(default)]
    pub can_be_contacted: bool,
    #[serde(default)]
    pub can_data_be_shared: bool,
    #[serde(default)]
    pub password: Option<String>,
}

// ============================================================================
// Token Requests
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh: String,
}

// ============================================================================
// Project Requests
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub category: ProjectCategory,
}

/// Projects are updated with the same fields they are created with.
pub type UpdateProjectRequest = CreateProjectRequest;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddContributorRequest {
    pub user_id: UserId,
}

// ============================================================================
// Issue Requests
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateIssueRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub priority: IssuePriority,
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    #[serde(default)]
    pub status: IssueStatus,
    #[serde(default)]
    pub assigned_to: Option<UserId>,
}

pub type UpdateIssueRequest = CreateIssueRequest;

// ============================================================================
// Comment Requests
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCommentRequest {
    pub description: String,
}

pub type UpdateCommentRequest = CreateCommentRequest;

// ============================================================================
// Pagination
// ============================================================================

/// Query parameters accepted by every list endpoint.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ListQuery {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}
