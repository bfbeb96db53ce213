//! Highlight service

use chrono::{DateTime, Utc};
use nicheboard_common::db::Highlight;
use nicheboard_common::store::{from_row, to_row, SelectQuery, Store, Table};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::{
    check_max_len, check_url, invalid, now, optional_text, parse_id, tags_field, ServiceResult,
    TagsInput,
};

/// Create/update request body (camelCase keys, snake_case accepted)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightPayload {
    pub quote: Option<String>,
    pub permalink: Option<String>,
    pub subreddit: Option<String>,
    pub author: Option<String>,
    pub upvotes: Option<i64>,
    pub notes: Option<String>,
    pub tags: Option<TagsInput>,
    #[serde(alias = "niche_id")]
    pub niche_id: Option<String>,
    #[serde(alias = "idea_id")]
    pub idea_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct HighlightRecord {
    quote: String,
    permalink: Option<String>,
    subreddit: Option<String>,
    author: Option<String>,
    upvotes: Option<i64>,
    notes: Option<String>,
    tags: Option<String>,
    idea_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    niche_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
}

impl HighlightPayload {
    fn into_record(self, quote: String) -> ServiceResult<HighlightRecord> {
        check_max_len(Some(quote.as_str()), 2000, "Quote must be less than 2000 characters")?;

        let permalink = optional_text(self.permalink)
            .map(|url| check_url(&url, 500, "URL must be less than 500 characters"))
            .transpose()?;
        let subreddit = optional_text(self.subreddit);
        check_max_len(subreddit.as_deref(), 100, "Subreddit must be less than 100 characters")?;
        let author = optional_text(self.author);
        check_max_len(author.as_deref(), 100, "Author must be less than 100 characters")?;
        let notes = optional_text(self.notes);
        check_max_len(notes.as_deref(), 1000, "Notes must be less than 1000 characters")?;
        let tags = tags_field(self.tags.as_ref())?;

        // Zero upvotes are stored as null, like any other blank optional
        let upvotes = match self.upvotes {
            Some(n) if n < 0 => return invalid("Upvotes must be non-negative"),
            Some(0) | None => None,
            Some(n) => Some(n),
        };

        let idea_id = optional_text(self.idea_id)
            .map(|id| parse_id(&id, "Must be a valid idea ID"))
            .transpose()?;

        Ok(HighlightRecord {
            quote,
            permalink,
            subreddit,
            author,
            upvotes,
            notes,
            tags,
            idea_id,
            niche_id: None,
            updated_at: None,
        })
    }
}

/// Highlights, newest first, optionally limited to a niche and/or an idea
pub async fn list(
    store: &dyn Store,
    niche_id: Option<&str>,
    idea_id: Option<&str>,
) -> ServiceResult<Vec<Highlight>> {
    let query = SelectQuery::new()
        .filter_opt("niche_id", niche_id)
        .filter_opt("idea_id", idea_id)
        .order_desc("created_at");

    let highlights = store
        .select(Table::Highlights, &query)
        .await?
        .into_iter()
        .map(from_row)
        .collect::<nicheboard_common::Result<Vec<Highlight>>>()?;

    Ok(highlights)
}

pub async fn get(store: &dyn Store, id: &str) -> ServiceResult<Option<Highlight>> {
    match store.fetch_by_id(Table::Highlights, id).await? {
        Some(row) => Ok(Some(from_row(row)?)),
        None => Ok(None),
    }
}

pub async fn create(store: &dyn Store, mut payload: HighlightPayload) -> ServiceResult<Highlight> {
    let quote = optional_text(payload.quote.take());
    let niche_id = optional_text(payload.niche_id.take());
    let (Some(quote), Some(niche_id)) = (quote, niche_id) else {
        return invalid("Quote and nicheId are required");
    };
    let niche_id = parse_id(&niche_id, "Must be a valid niche ID")?;

    let mut record = payload.into_record(quote)?;
    record.niche_id = Some(niche_id);

    let row = store.insert(Table::Highlights, to_row(&record)?).await?;
    let highlight: Highlight = from_row(row)?;

    info!(highlight_id = %highlight.id, niche_id = %highlight.niche_id, "Created highlight");
    Ok(highlight)
}

/// Full-payload update. The idea link may change; the owning niche may not.
pub async fn update(
    store: &dyn Store,
    id: &str,
    mut payload: HighlightPayload,
) -> ServiceResult<Highlight> {
    let Some(quote) = optional_text(payload.quote.take()) else {
        return invalid("Quote is required");
    };

    let mut record = payload.into_record(quote)?;
    record.updated_at = Some(now());

    let row = store.update(Table::Highlights, id, to_row(&record)?).await?;
    Ok(from_row(row)?)
}

pub async fn delete(store: &dyn Store, id: &str) -> ServiceResult<()> {
    store.delete(Table::Highlights, id).await?;
    info!(highlight_id = %id, "Deleted highlight");
    Ok(())
}
