//! Niche service
//!
//! The only writer of `niches.slug`: the slug is derived from the name on
//! every create and update. Listings carry per-niche dependent counts that are
//! fetched concurrently and degrade to zero individually.

use chrono::{DateTime, Utc};
use futures::future::join_all;
use nicheboard_common::db::{EntityCounts, Niche, NicheWithCounts};
use nicheboard_common::slugify;
use nicheboard_common::store::{from_row, to_row, Filter, SelectQuery, Store, Table};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use super::{check_max_len, invalid, now, optional_text, ServiceResult};

/// Create/update request body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NichePayload {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
struct NicheRecord {
    name: String,
    slug: String,
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
}

impl NichePayload {
    fn into_record(self) -> ServiceResult<NicheRecord> {
        let Some(name) = optional_text(self.name) else {
            return invalid("Name is required");
        };
        check_max_len(Some(name.as_str()), 100, "Name must be less than 100 characters")?;

        let description = optional_text(self.description);
        check_max_len(
            description.as_deref(),
            500,
            "Description must be less than 500 characters",
        )?;

        let slug = slugify(&name);
        if slug.is_empty() {
            return invalid("Name must contain at least one letter or number");
        }

        Ok(NicheRecord {
            name,
            slug,
            description,
            updated_at: None,
        })
    }
}

/// All niches, newest first, each with its dependent counts
pub async fn list(store: &dyn Store) -> ServiceResult<Vec<NicheWithCounts>> {
    let rows = store
        .select(Table::Niches, &SelectQuery::new().order_desc("created_at"))
        .await?;

    let niches = rows
        .into_iter()
        .map(from_row::<Niche>)
        .collect::<nicheboard_common::Result<Vec<_>>>()?;

    let counted = join_all(niches.into_iter().map(|niche| async move {
        let counts = counts(store, niche.id).await;
        NicheWithCounts { niche, counts }
    }))
    .await;

    Ok(counted)
}

pub async fn get(store: &dyn Store, id: &str) -> ServiceResult<Option<Niche>> {
    match store.fetch_by_id(Table::Niches, id).await? {
        Some(row) => Ok(Some(from_row(row)?)),
        None => Ok(None),
    }
}

pub async fn get_by_slug(store: &dyn Store, slug: &str) -> ServiceResult<Option<Niche>> {
    let rows = store
        .select(Table::Niches, &SelectQuery::new().filter("slug", slug))
        .await?;

    match rows.into_iter().next() {
        Some(row) => Ok(Some(from_row(row)?)),
        None => Ok(None),
    }
}

/// Insert a niche and return it with its counts.
///
/// The counts are read back after the insert in separate calls, so they are
/// not atomic with it.
pub async fn create(store: &dyn Store, payload: NichePayload) -> ServiceResult<NicheWithCounts> {
    let record = payload.into_record()?;
    let row = store.insert(Table::Niches, to_row(&record)?).await?;
    let niche: Niche = from_row(row)?;

    info!(niche_id = %niche.id, slug = %niche.slug, "Created niche");

    let counts = counts(store, niche.id).await;
    Ok(NicheWithCounts { niche, counts })
}

pub async fn update(store: &dyn Store, id: &str, payload: NichePayload) -> ServiceResult<Niche> {
    let mut record = payload.into_record()?;
    record.updated_at = Some(now());

    let row = store.update(Table::Niches, id, to_row(&record)?).await?;
    Ok(from_row(row)?)
}

/// Hard delete; ideas, highlights and subreddits of the niche are left in place
pub async fn delete(store: &dyn Store, id: &str) -> ServiceResult<()> {
    store.delete(Table::Niches, id).await?;
    info!(niche_id = %id, "Deleted niche");
    Ok(())
}

/// Dependent counts for one niche. A failed count is logged and reported as 0.
pub async fn counts(store: &dyn Store, niche_id: Uuid) -> EntityCounts {
    let (ideas, highlights, subreddits) = tokio::join!(
        count_or_zero(store, Table::Ideas, niche_id),
        count_or_zero(store, Table::Highlights, niche_id),
        count_or_zero(store, Table::Subreddits, niche_id),
    );

    EntityCounts {
        ideas,
        highlights,
        subreddits,
    }
}

async fn count_or_zero(store: &dyn Store, table: Table, niche_id: Uuid) -> i64 {
    let filter = [Filter::eq("niche_id", niche_id.to_string())];
    match store.count(table, &filter).await {
        Ok(count) => count,
        Err(e) => {
            warn!(
                niche_id = %niche_id,
                table = table.name(),
                error = %e,
                "Count failed, reporting 0"
            );
            0
        }
    }
}
