//! Query layer over the venue, artist and show tables.
//!
//! Every time-dependent read takes the reference instant `now` from the caller.
//! A show is *upcoming* when `start_time > now` and *past* when
//! `start_time <= now`, so a show starting exactly at `now` is past and every
//! show lands in exactly one of the two lists.

pub mod artist;
pub mod show;
pub mod venue;

use chrono::{DateTime, Utc};
use sea_orm::sea_query::{LikeExpr, SimpleExpr};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter};

use crate::entities::show as show_entity;

/// A venue or artist reduced to what listings and search results display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectSummary {
    pub id: i64,
    pub name: String,
    pub num_upcoming_shows: u64,
}

#[derive(Debug, Clone)]
pub struct SearchResults<T> {
    pub count: usize,
    pub data: Vec<T>,
}

impl<T> From<Vec<T>> for SearchResults<T> {
    fn from(data: Vec<T>) -> Self {
        Self {
            count: data.len(),
            data,
        }
    }
}

/// Shows of one venue or artist split around `now`, each list newest first.
#[derive(Debug, Clone)]
pub struct ShowSplit<T> {
    pub past: Vec<T>,
    pub upcoming: Vec<T>,
}

impl<T> ShowSplit<T> {
    pub fn past_count(&self) -> usize {
        self.past.len()
    }

    pub fn upcoming_count(&self) -> usize {
        self.upcoming.len()
    }
}

/// Which foreign key of `shows` a per-subject query filters on.
#[derive(Debug, Clone, Copy)]
pub(crate) enum ShowOwner {
    Venue(i64),
    Artist(i64),
}

impl ShowOwner {
    fn condition(self) -> SimpleExpr {
        match self {
            ShowOwner::Venue(id) => show_entity::Column::VenueId.eq(id),
            ShowOwner::Artist(id) => show_entity::Column::ArtistId.eq(id),
        }
    }
}

pub(crate) fn upcoming_condition(now: DateTime<Utc>) -> SimpleExpr {
    show_entity::Column::StartTime.gt(now)
}

pub(crate) fn past_condition(now: DateTime<Utc>) -> SimpleExpr {
    show_entity::Column::StartTime.lte(now)
}

pub(crate) async fn count_upcoming_shows<C>(
    conn: &C,
    owner: ShowOwner,
    now: DateTime<Utc>,
) -> color_eyre::Result<u64>
where
    C: ConnectionTrait,
{
    show_entity::Entity::find()
        .filter(owner.condition())
        .filter(upcoming_condition(now))
        .count(conn)
        .await
        .map_err(|e| color_eyre::eyre::eyre!("Failed to count upcoming shows: {}", e))
}

/// Case-folded form of a name, stored in the `search_name` columns.
///
/// SQLite's LIKE only folds ASCII letters, so both sides of a name search are
/// folded here instead.
pub(crate) fn fold_case(name: &str) -> String {
    name.to_lowercase()
}

/// Substring LIKE pattern for the case-folded `term`, wildcards escaped.
pub(crate) fn substring_pattern(term: &str) -> LikeExpr {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in fold_case(term).chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    LikeExpr::new(escaped).escape('\\')
}
