//! Admin tasks behind `nicheboard-admin`: sample-data seeding and a plain-text
//! report of what the store holds.
//!
//! Seeding goes through the entity services so seeded rows get the same
//! slugs, scores and normalization as rows created over HTTP.

use nicheboard_common::human_format::{format_date, format_date_time, format_number};
use nicheboard_common::join_tags;
use nicheboard_common::Store;
use tracing::info;

use crate::services::highlights::{self, HighlightPayload};
use crate::services::ideas::{self, IdeaPayload};
use crate::services::niches::{self, NichePayload};
use crate::services::subreddits::{self, SubredditPayload};
use crate::services::{ServiceError, ServiceResult};

/// Niche that owns all seeded ideas, highlights and subreddits
const SEED_OWNER_SLUG: &str = "hobbies-diy";

/// Rows created by [`seed`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub niches: usize,
    pub ideas: usize,
    pub highlights: usize,
    pub subreddits: usize,
}

fn seed_niches() -> Vec<NichePayload> {
    [
        ("Hobbies & DIY", "Creative hobbies and do-it-yourself projects"),
        ("Health & Fitness", "Health, wellness, and fitness related content"),
        ("Technology", "Tech startups, software, and digital products"),
    ]
    .into_iter()
    .map(|(name, description)| NichePayload {
        name: Some(name.to_string()),
        description: Some(description.to_string()),
    })
    .collect()
}

fn seed_ideas(niche_id: &str) -> Vec<IdeaPayload> {
    vec![
        IdeaPayload {
            title: Some("Custom Woodworking Plans".into()),
            problem: Some("People struggle to find quality woodworking plans".into()),
            solution: Some(
                "Create detailed, step-by-step woodworking plans with video tutorials".into(),
            ),
            audience: Some("DIY enthusiasts and woodworkers".into()),
            status: Some("Exploring".into()),
            impact: Some(4),
            confidence: Some(3),
            effort: Some(2),
            notes: Some("This could be a great passive income stream".into()),
            source_url: Some("https://example.com".into()),
            tags: Some("woodworking, plans, diy".into()),
            niche_id: Some(niche_id.to_string()),
        },
        IdeaPayload {
            title: Some("Gardening App for Beginners".into()),
            problem: Some(
                "New gardeners don't know when to plant or how to care for plants".into(),
            ),
            solution: Some("Mobile app with planting schedules and care reminders".into()),
            audience: Some("Beginner gardeners".into()),
            status: Some("Backlog".into()),
            impact: Some(3),
            confidence: Some(4),
            effort: Some(3),
            notes: Some("Could integrate with weather data".into()),
            source_url: Some(String::new()),
            tags: Some("gardening, app, mobile".into()),
            niche_id: Some(niche_id.to_string()),
        },
    ]
}

/// Highlights in the same order as [`seed_ideas`]; each links to its idea
fn seed_highlights(niche_id: &str, idea_ids: &[String]) -> Vec<HighlightPayload> {
    let samples = [
        (
            "Start with simple projects and gradually work your way up to more complex builds.",
            "https://reddit.com/r/woodworking/comments/example",
            "r/woodworking",
            "woodworker123",
            45,
            "Great advice for beginners",
            "planning, materials",
        ),
        (
            "Patience is key in gardening. Plants grow at their own pace.",
            "https://reddit.com/r/gardening/comments/example",
            "r/gardening",
            "gardenmaster",
            23,
            "Encouraging for new gardeners",
            "patience, learning",
        ),
    ];

    samples
        .into_iter()
        .enumerate()
        .map(
            |(i, (quote, permalink, subreddit, author, upvotes, notes, tags))| HighlightPayload {
                quote: Some(quote.to_string()),
                permalink: Some(permalink.to_string()),
                subreddit: Some(subreddit.to_string()),
                author: Some(author.to_string()),
                upvotes: Some(upvotes),
                notes: Some(notes.to_string()),
                tags: Some(tags.into()),
                niche_id: Some(niche_id.to_string()),
                idea_id: idea_ids.get(i).cloned(),
            },
        )
        .collect()
}

fn seed_subreddits(niche_id: &str) -> Vec<SubredditPayload> {
    [
        (
            "r/woodworking",
            "https://reddit.com/r/woodworking",
            2_500_000,
            "Great community for woodworking projects and advice",
        ),
        (
            "r/gardening",
            "https://reddit.com/r/gardening",
            1_800_000,
            "Helpful tips and inspiration for gardeners",
        ),
    ]
    .into_iter()
    .map(|(name, url, subscribers, notes)| SubredditPayload {
        name: Some(name.to_string()),
        url: Some(url.to_string()),
        subscriber_count: Some(subscribers),
        notes: Some(notes.to_string()),
        niche_id: Some(niche_id.to_string()),
    })
    .collect()
}

/// Insert the sample data set. Refuses to run twice against the same store.
pub async fn seed(store: &dyn Store) -> ServiceResult<SeedSummary> {
    if niches::get_by_slug(store, SEED_OWNER_SLUG).await?.is_some() {
        return Err(ServiceError::Validation(format!(
            "Store already contains the '{}' niche; refusing to seed twice",
            SEED_OWNER_SLUG
        )));
    }

    let mut summary = SeedSummary::default();
    let mut owner_id = None;

    for payload in seed_niches() {
        let created = niches::create(store, payload).await?;
        if created.niche.slug == SEED_OWNER_SLUG {
            owner_id = Some(created.niche.id.to_string());
        }
        summary.niches += 1;
    }
    info!(count = summary.niches, "Seeded niches");

    let owner_id = owner_id.ok_or_else(|| {
        ServiceError::Validation(format!("Seed niche '{}' was not created", SEED_OWNER_SLUG))
    })?;

    let mut idea_ids = Vec::new();
    for payload in seed_ideas(&owner_id) {
        let idea = ideas::create(store, payload).await?;
        idea_ids.push(idea.id.to_string());
        summary.ideas += 1;
    }
    info!(count = summary.ideas, "Seeded ideas");

    for payload in seed_highlights(&owner_id, &idea_ids) {
        highlights::create(store, payload).await?;
        summary.highlights += 1;
    }
    info!(count = summary.highlights, "Seeded highlights");

    for payload in seed_subreddits(&owner_id) {
        subreddits::create(store, payload).await?;
        summary.subreddits += 1;
    }
    info!(count = summary.subreddits, "Seeded subreddits");

    Ok(summary)
}

fn quote_preview(quote: &str) -> String {
    const PREVIEW_CHARS: usize = 50;
    if quote.chars().count() <= PREVIEW_CHARS {
        quote.to_string()
    } else {
        let prefix: String = quote.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", prefix.trim_end())
    }
}

/// Plain-text summary of every table: a count line, then one line per row
pub async fn report(store: &dyn Store) -> ServiceResult<Vec<String>> {
    let mut lines = Vec::new();

    let niches = niches::list(store).await?;
    lines.push(format!("Niches: {}", niches.len()));
    for n in &niches {
        lines.push(format!(
            "  - {} ({}) created {}: {} ideas, {} highlights, {} subreddits",
            n.niche.name,
            n.niche.slug,
            format_date(&n.niche.created_at),
            n.counts.ideas,
            n.counts.highlights,
            n.counts.subreddits
        ));
    }

    let ideas = ideas::list(store, None).await?;
    lines.push(format!("Ideas: {}", ideas.len()));
    for idea in &ideas {
        let tags = idea.tag_list();
        let mut line = format!("  - {} [{}] ICE {:.2}", idea.title, idea.status, idea.ice_score);
        if !tags.is_empty() {
            line.push_str(&format!(" #{}", join_tags(&tags)));
        }
        lines.push(line);
    }

    let highlights = highlights::list(store, None, None).await?;
    lines.push(format!("Highlights: {}", highlights.len()));
    for h in &highlights {
        lines.push(format!(
            "  - {} (saved {})",
            quote_preview(&h.quote),
            format_date_time(&h.created_at)
        ));
    }

    let subreddits = subreddits::list(store, None).await?;
    lines.push(format!("Subreddits: {}", subreddits.len()));
    for s in &subreddits {
        lines.push(format!(
            "  - {} ({} subscribers)",
            s.name,
            format_number(s.subscriber_count)
        ));
    }

    Ok(lines)
}
