//! Entity models
//!
//! Rows as stored by the persistence gateway. Field names match the stored
//! column names, so a row serializes to the same JSON the store returns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::tags::parse_tags;

/// Idea lifecycle stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum IdeaStatus {
    #[default]
    Backlog,
    Exploring,
    Validating,
    Building,
    Launched,
}

impl IdeaStatus {
    pub const ALL: [IdeaStatus; 5] = [
        IdeaStatus::Backlog,
        IdeaStatus::Exploring,
        IdeaStatus::Validating,
        IdeaStatus::Building,
        IdeaStatus::Launched,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IdeaStatus::Backlog => "Backlog",
            IdeaStatus::Exploring => "Exploring",
            IdeaStatus::Validating => "Validating",
            IdeaStatus::Building => "Building",
            IdeaStatus::Launched => "Launched",
        }
    }
}

impl fmt::Display for IdeaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IdeaStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IdeaStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Unknown idea status: {}", s))
    }
}

/// Top-level category grouping ideas, highlights and subreddits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Niche {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Number of rows owned by one niche, per dependent table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityCounts {
    #[serde(rename = "ideasCount")]
    pub ideas: i64,
    #[serde(rename = "highlightsCount")]
    pub highlights: i64,
    #[serde(rename = "subredditsCount")]
    pub subreddits: i64,
}

/// Niche listing row: the niche itself plus its dependent counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NicheWithCounts {
    #[serde(flatten)]
    pub niche: Niche,
    #[serde(flatten)]
    pub counts: EntityCounts,
}

/// Product idea with its ICE rating
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Idea {
    pub id: Uuid,
    pub title: String,
    pub problem: Option<String>,
    pub solution: Option<String>,
    pub audience: Option<String>,
    pub status: IdeaStatus,
    pub impact: i32,
    pub confidence: i32,
    pub effort: i32,
    pub ice_score: f64,
    pub notes: Option<String>,
    pub source_url: Option<String>,
    pub tags: Option<String>,
    pub niche_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Idea {
    pub fn tag_list(&self) -> Vec<String> {
        parse_tags(self.tags.as_deref())
    }
}

/// Saved quote, optionally linked to the idea it supports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    pub id: Uuid,
    pub quote: String,
    pub permalink: Option<String>,
    pub subreddit: Option<String>,
    pub author: Option<String>,
    pub upvotes: Option<i64>,
    pub notes: Option<String>,
    pub tags: Option<String>,
    pub niche_id: Uuid,
    /// Weak reference; the idea may have been deleted since
    pub idea_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Highlight {
    pub fn tag_list(&self) -> Vec<String> {
        parse_tags(self.tags.as_deref())
    }
}

/// Tracked online community
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subreddit {
    pub id: Uuid,
    pub name: String,
    pub url: String,
    pub subscriber_count: i64,
    pub notes: Option<String>,
    pub niche_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
