//! Idea service
//!
//! Every create and update recomputes `ice_score` from the post-default
//! ratings; a score sent by the client is never stored.

use chrono::{DateTime, Utc};
use nicheboard_common::calculate_ice_score;
use nicheboard_common::db::{Idea, IdeaStatus};
use nicheboard_common::scoring::{rating_or_default, MAX_RATING, MIN_RATING};
use nicheboard_common::store::{from_row, to_row, SelectQuery, Store, Table};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::{
    check_max_len, check_url, invalid, now, optional_text, parse_id, tags_field, ServiceError,
    ServiceResult, TagsInput,
};

/// Create/update request body
///
/// Keys are camelCase (`sourceUrl`, `nicheId`); snake_case is accepted too.
/// Unknown keys, `ice_score` included, are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeaPayload {
    pub title: Option<String>,
    pub problem: Option<String>,
    pub solution: Option<String>,
    pub audience: Option<String>,
    pub status: Option<String>,
    pub impact: Option<i32>,
    pub confidence: Option<i32>,
    pub effort: Option<i32>,
    pub notes: Option<String>,
    #[serde(alias = "source_url")]
    pub source_url: Option<String>,
    pub tags: Option<TagsInput>,
    #[serde(alias = "niche_id")]
    pub niche_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct IdeaRecord {
    title: String,
    problem: Option<String>,
    solution: Option<String>,
    audience: Option<String>,
    status: IdeaStatus,
    impact: i32,
    confidence: i32,
    effort: i32,
    ice_score: f64,
    notes: Option<String>,
    source_url: Option<String>,
    tags: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    niche_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
}

fn rating(value: Option<i32>, label: &str) -> ServiceResult<i32> {
    let rating = rating_or_default(value);
    if rating < MIN_RATING {
        invalid(format!("{} must be at least {}", label, MIN_RATING))
    } else if rating > MAX_RATING {
        invalid(format!("{} must be at most {}", label, MAX_RATING))
    } else {
        Ok(rating)
    }
}

fn status(value: Option<String>) -> ServiceResult<IdeaStatus> {
    match optional_text(value) {
        None => Ok(IdeaStatus::default()),
        Some(s) => s.trim().parse().map_err(|_| {
            let allowed: Vec<&str> = IdeaStatus::ALL.iter().map(IdeaStatus::as_str).collect();
            ServiceError::Validation(format!("Status must be one of {}", allowed.join(", ")))
        }),
    }
}

impl IdeaPayload {
    /// Validate and normalize everything except the owning niche
    fn into_record(self, title: String) -> ServiceResult<IdeaRecord> {
        check_max_len(Some(title.as_str()), 200, "Title must be less than 200 characters")?;

        let problem = optional_text(self.problem);
        check_max_len(problem.as_deref(), 1000, "Problem must be less than 1000 characters")?;
        let solution = optional_text(self.solution);
        check_max_len(solution.as_deref(), 1000, "Solution must be less than 1000 characters")?;
        let audience = optional_text(self.audience);
        check_max_len(audience.as_deref(), 200, "Audience must be less than 200 characters")?;
        let notes = optional_text(self.notes);
        check_max_len(notes.as_deref(), 1000, "Notes must be less than 1000 characters")?;
        let source_url = optional_text(self.source_url)
            .map(|url| check_url(&url, 500, "URL must be less than 500 characters"))
            .transpose()?;
        let tags = tags_field(self.tags.as_ref())?;

        let status = status(self.status)?;
        let impact = rating(self.impact, "Impact")?;
        let confidence = rating(self.confidence, "Confidence")?;
        let effort = rating(self.effort, "Effort")?;

        Ok(IdeaRecord {
            title,
            problem,
            solution,
            audience,
            status,
            impact,
            confidence,
            effort,
            ice_score: calculate_ice_score(impact, confidence, effort),
            notes,
            source_url,
            tags,
            niche_id: None,
            updated_at: None,
        })
    }
}

/// Ideas, highest ICE score first, optionally limited to one niche
pub async fn list(store: &dyn Store, niche_id: Option<&str>) -> ServiceResult<Vec<Idea>> {
    let query = SelectQuery::new()
        .filter_opt("niche_id", niche_id)
        .order_desc("ice_score");

    let ideas = store
        .select(Table::Ideas, &query)
        .await?
        .into_iter()
        .map(from_row)
        .collect::<nicheboard_common::Result<Vec<Idea>>>()?;

    Ok(ideas)
}

pub async fn get(store: &dyn Store, id: &str) -> ServiceResult<Option<Idea>> {
    match store.fetch_by_id(Table::Ideas, id).await? {
        Some(row) => Ok(Some(from_row(row)?)),
        None => Ok(None),
    }
}

pub async fn create(store: &dyn Store, mut payload: IdeaPayload) -> ServiceResult<Idea> {
    let title = optional_text(payload.title.take());
    let niche_id = optional_text(payload.niche_id.take());
    let (Some(title), Some(niche_id)) = (title, niche_id) else {
        return invalid("Title and nicheId are required");
    };
    let niche_id = parse_id(&niche_id, "Must be a valid niche ID")?;

    let mut record = payload.into_record(title)?;
    record.niche_id = Some(niche_id);

    let row = store.insert(Table::Ideas, to_row(&record)?).await?;
    let idea: Idea = from_row(row)?;

    info!(idea_id = %idea.id, niche_id = %idea.niche_id, ice_score = idea.ice_score, "Created idea");
    Ok(idea)
}

/// Full-payload update. The owning niche cannot be changed.
pub async fn update(store: &dyn Store, id: &str, mut payload: IdeaPayload) -> ServiceResult<Idea> {
    let Some(title) = optional_text(payload.title.take()) else {
        return invalid("Title is required");
    };

    let mut record = payload.into_record(title)?;
    record.updated_at = Some(now());

    let row = store.update(Table::Ideas, id, to_row(&record)?).await?;
    Ok(from_row(row)?)
}

/// Hard delete; highlights that reference the idea keep their `idea_id`
pub async fn delete(store: &dyn Store, id: &str) -> ServiceResult<()> {
    store.delete(Table::Ideas, id).await?;
    info!(idea_id = %id, "Deleted idea");
    Ok(())
}
