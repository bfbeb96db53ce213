//! Subreddit service

use chrono::{DateTime, Utc};
use nicheboard_common::db::Subreddit;
use nicheboard_common::store::{from_row, to_row, SelectQuery, Store, Table};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::{check_max_len, check_url, invalid, now, optional_text, parse_id, ServiceResult};

/// Create/update request body (camelCase keys, snake_case accepted)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubredditPayload {
    pub name: Option<String>,
    pub url: Option<String>,
    #[serde(alias = "subscriber_count")]
    pub subscriber_count: Option<i64>,
    pub notes: Option<String>,
    #[serde(alias = "niche_id")]
    pub niche_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct SubredditRecord {
    name: String,
    url: String,
    subscriber_count: i64,
    notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    niche_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
}

impl SubredditPayload {
    fn into_record(self, name: String, url: String) -> ServiceResult<SubredditRecord> {
        check_max_len(Some(name.as_str()), 100, "Name must be less than 100 characters")?;
        let url = check_url(&url, 200, "URL must be less than 200 characters")?;

        let subscriber_count = self.subscriber_count.unwrap_or(0);
        if subscriber_count < 0 {
            return invalid("Subscriber count must be non-negative");
        }

        let notes = optional_text(self.notes);
        check_max_len(notes.as_deref(), 1000, "Notes must be less than 1000 characters")?;

        Ok(SubredditRecord {
            name,
            url,
            subscriber_count,
            notes,
            niche_id: None,
            updated_at: None,
        })
    }
}

/// Subreddits, largest first, optionally limited to one niche
pub async fn list(store: &dyn Store, niche_id: Option<&str>) -> ServiceResult<Vec<Subreddit>> {
    let query = SelectQuery::new()
        .filter_opt("niche_id", niche_id)
        .order_desc("subscriber_count");

    let subreddits = store
        .select(Table::Subreddits, &query)
        .await?
        .into_iter()
        .map(from_row)
        .collect::<nicheboard_common::Result<Vec<Subreddit>>>()?;

    Ok(subreddits)
}

pub async fn get(store: &dyn Store, id: &str) -> ServiceResult<Option<Subreddit>> {
    match store.fetch_by_id(Table::Subreddits, id).await? {
        Some(row) => Ok(Some(from_row(row)?)),
        None => Ok(None),
    }
}

pub async fn create(store: &dyn Store, mut payload: SubredditPayload) -> ServiceResult<Subreddit> {
    let name = optional_text(payload.name.take());
    let url = optional_text(payload.url.take());
    let niche_id = optional_text(payload.niche_id.take());
    let (Some(name), Some(url), Some(niche_id)) = (name, url, niche_id) else {
        return invalid("Name, url, and nicheId are required");
    };
    let niche_id = parse_id(&niche_id, "Must be a valid niche ID")?;

    let mut record = payload.into_record(name, url)?;
    record.niche_id = Some(niche_id);

    let row = store.insert(Table::Subreddits, to_row(&record)?).await?;
    let subreddit: Subreddit = from_row(row)?;

    info!(subreddit_id = %subreddit.id, name = %subreddit.name, "Created subreddit");
    Ok(subreddit)
}

/// Full-payload update. The owning niche cannot be changed.
pub async fn update(
    store: &dyn Store,
    id: &str,
    mut payload: SubredditPayload,
) -> ServiceResult<Subreddit> {
    let name = optional_text(payload.name.take());
    let url = optional_text(payload.url.take());
    let (Some(name), Some(url)) = (name, url) else {
        return invalid("Name and url are required");
    };

    let mut record = payload.into_record(name, url)?;
    record.updated_at = Some(now());

    let row = store.update(Table::Subreddits, id, to_row(&record)?).await?;
    Ok(from_row(row)?)
}

pub async fn delete(store: &dyn Store, id: &str) -> ServiceResult<()> {
    store.delete(Table::Subreddits, id).await?;
    info!(subreddit_id = %id, "Deleted subreddit");
    Ok(())
}
