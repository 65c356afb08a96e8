use std::sync::Arc;

use chrono::{DateTime, Utc};
use color_eyre::eyre::{Result, eyre};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DbErr, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select, Set, TransactionTrait,
};
use tracing::instrument;

use crate::database::Database;
use crate::entities::{artist, show, venue};
use crate::services::{SearchResults, substring_pattern};

/// A show joined to its artist and venue.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct ShowListing {
    pub id: i64,
    pub venue_id: i64,
    pub venue_name: String,
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: DateTime<Utc>,
}

pub struct ShowService {
    db: Arc<Database>,
}

impl ShowService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Every show, newest first.
    pub async fn list(&self) -> Result<Vec<ShowListing>> {
        Self::listings()
            .order_by_desc(show::Column::StartTime)
            .into_model::<ShowListing>()
            .all(&self.db.conn)
            .await
            .map_err(|e| eyre!("Failed to fetch shows: {}", e))
    }

    /// Shows whose artist name or venue name contains `search_term`, ignoring case.
    #[instrument(skip(self))]
    pub async fn search(&self, search_term: &str) -> Result<SearchResults<ShowListing>> {
        let shows = Self::listings()
            .filter(
                Condition::any()
                    .add(artist::Column::SearchName.like(substring_pattern(search_term)))
                    .add(venue::Column::SearchName.like(substring_pattern(search_term))),
            )
            .order_by_desc(show::Column::StartTime)
            .into_model::<ShowListing>()
            .all(&self.db.conn)
            .await
            .map_err(|e| eyre!("Failed to search shows: {}", e))?;

        Ok(shows.into())
    }

    /// Book `artist_id` at `venue_id`. Fails when either side does not exist.
    #[instrument(skip(self))]
    pub async fn create(
        &self,
        artist_id: i64,
        venue_id: i64,
        start_time: DateTime<Utc>,
    ) -> Result<show::Model> {
        let model = show::ActiveModel {
            artist_id: Set(artist_id),
            venue_id: Set(venue_id),
            start_time: Set(start_time),
            ..Default::default()
        };

        let created = self
            .db
            .conn
            .transaction::<_, show::Model, DbErr>(|txn| {
                Box::pin(async move { model.insert(txn).await })
            })
            .await
            .map_err(|e| eyre!("Failed to create show: {}", e))?;

        log::info!(
            "Show created: artist {} at venue {} on {} (ID: {})",
            created.artist_id,
            created.venue_id,
            created.start_time,
            created.id
        );
        Ok(created)
    }

    /// Shows inner-joined to both sides, projected onto `ShowListing`.
    fn listings() -> Select<show::Entity> {
        show::Entity::find()
            .select_only()
            .column_as(show::Column::Id, "id")
            .column_as(show::Column::VenueId, "venue_id")
            .column_as(venue::Column::Name, "venue_name")
            .column_as(show::Column::ArtistId, "artist_id")
            .column_as(artist::Column::Name, "artist_name")
            .column_as(artist::Column::ImageLink, "artist_image_link")
            .column_as(show::Column::StartTime, "start_time")
            .join(JoinType::InnerJoin, show::Relation::Artist.def())
            .join(JoinType::InnerJoin, show::Relation::Venue.def())
    }
}
