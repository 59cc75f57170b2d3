//! Project-related entity definitions.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ProjectId, UserId};

/// Platform a project targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectCategory {
    /// Back-end service.
    Backend,
    /// Front-end application.
    Frontend,
    /// iOS application.
    Ios,
    /// Android application.
    Android,
}

/// Set of users allowed to see a project and work on its issues.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContributorSet(BTreeSet<UserId>);

impl ContributorSet {
    /// Creates a set holding a single member.
    pub fn with_member(user_id: UserId) -> Self {
        let mut set = Self::default();
        set.add(user_id);
        set
    }

    /// Adds a member. Returns false if the user was already a member.
    pub fn add(&mut self, user_id: UserId) -> bool {
        self.0.insert(user_id)
    }

    /// Removes a member. Returns false if the user was not a member.
    pub fn remove(&mut self, user_id: UserId) -> bool {
        self.0.remove(&user_id)
    }

    /// Returns true if the user is a member.
    pub fn contains(&self, user_id: UserId) -> bool {
        self.0.contains(&user_id)
    }

    /// Iterates over members in id order.
    pub fn iter(&self) -> impl Iterator<Item = UserId> + '_ {
        self.0.iter().copied()
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the set has no members.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A project owned by its author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier.
    pub id: ProjectId,
    /// Owning user. Never changes after creation.
    pub author_id: UserId,
    /// Project name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Target platform.
    pub category: ProjectCategory,
    /// Members, always including the author.
    pub contributors: ContributorSet,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Returns true if the user owns this project.
    pub fn is_author(&self, user_id: UserId) -> bool {
        self.author_id == user_id
    }

    /// Returns true if the user is a member of this project.
    pub fn is_contributor(&self, user_id: UserId) -> bool {
        self.contributors.contains(user_id)
    }
}

/// Data required to create a project. The store assigns the id.
#[derive(Debug, Clone)]
pub struct NewProject {
    pub author_id: UserId,
    pub name: String,
    pub description: String,
    pub category: ProjectCategory,
}

impl NewProject {
    /// Creates project data with an empty description.
    pub fn new(author_id: UserId, name: impl Into<String>, category: ProjectCategory) -> Self {
        Self {
            author_id,
            name: name.into(),
            description: String::new(),
            category,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Builds the stored record with the author as its first contributor.
    pub fn into_project(self, id: ProjectId) -> Project {
        Project {
            id,
            author_id: self.author_id,
            name: self.name,
            description: self.description,
            category: self.category,
            contributors: ContributorSet::with_member(self.author_id),
            created_at: Utc::now(),
        }
    }
}
