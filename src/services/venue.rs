use std::sync::Arc;

use chrono::{DateTime, Utc};
use color_eyre::eyre::{Result, eyre};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::instrument;

use crate::database::Database;
use crate::entities::{artist, show, venue};
use crate::services::{
    SearchResults, ShowOwner, ShowSplit, SubjectSummary, count_upcoming_shows, fold_case,
    past_condition, substring_pattern, upcoming_condition,
};

/// Every writable venue column. Used for both create and edit, an edit
/// overwrites all of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueFields {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub genres: Vec<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

impl VenueFields {
    pub(crate) fn into_active_model(self) -> venue::ActiveModel {
        let mut model = venue::ActiveModel {
            ..Default::default()
        };
        self.apply(&mut model);
        model
    }

    fn apply(self, model: &mut venue::ActiveModel) {
        model.search_name = Set(fold_case(&self.name));
        model.name = Set(self.name);
        model.city = Set(self.city);
        model.state = Set(self.state);
        model.address = Set(self.address);
        model.phone = Set(self.phone);
        model.image_link = Set(self.image_link);
        model.facebook_link = Set(self.facebook_link);
        model.website = Set(self.website);
        model.genres = Set(self.genres.into());
        model.seeking_talent = Set(self.seeking_talent);
        model.seeking_description = Set(self.seeking_description);
    }
}

impl From<venue::Model> for VenueFields {
    fn from(model: venue::Model) -> Self {
        Self {
            name: model.name,
            city: model.city,
            state: model.state,
            address: model.address,
            phone: model.phone,
            image_link: model.image_link,
            facebook_link: model.facebook_link,
            website: model.website,
            genres: model.genres.0,
            seeking_talent: model.seeking_talent,
            seeking_description: model.seeking_description,
        }
    }
}

/// Venues sharing one (city, state) pair.
#[derive(Debug, Clone)]
pub struct VenueArea {
    pub city: String,
    pub state: String,
    pub venues: Vec<SubjectSummary>,
}

/// A show as seen from the venue page: who plays and when.
#[derive(Debug, Clone)]
pub struct VenueShow {
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct VenueDetail {
    pub venue: venue::Model,
    pub shows: ShowSplit<VenueShow>,
}

pub struct VenueService {
    db: Arc<Database>,
}

impl VenueService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// All venues grouped by area. Areas are ordered by state then city and the
    /// venues inside an area by name.
    #[instrument(skip(self))]
    pub async fn list_by_area(&self, now: DateTime<Utc>) -> Result<Vec<VenueArea>> {
        let venues = venue::Entity::find()
            .order_by_asc(venue::Column::State)
            .order_by_asc(venue::Column::City)
            .order_by_asc(venue::Column::Name)
            .all(&self.db.conn)
            .await
            .map_err(|e| eyre!("Failed to fetch venues: {}", e))?;

        let mut areas: Vec<VenueArea> = Vec::new();
        for venue in venues {
            let summary = self.summarize(&venue, now).await?;

            match areas.last_mut() {
                Some(area) if area.city == venue.city && area.state == venue.state => {
                    area.venues.push(summary);
                }
                _ => areas.push(VenueArea {
                    city: venue.city,
                    state: venue.state,
                    venues: vec![summary],
                }),
            }
        }

        Ok(areas)
    }

    /// Case-insensitive substring search on the venue name.
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        search_term: &str,
        now: DateTime<Utc>,
    ) -> Result<SearchResults<SubjectSummary>> {
        let venues = venue::Entity::find()
            .filter(venue::Column::SearchName.like(substring_pattern(search_term)))
            .order_by_asc(venue::Column::Name)
            .all(&self.db.conn)
            .await
            .map_err(|e| eyre!("Failed to search venues: {}", e))?;

        let mut data = Vec::with_capacity(venues.len());
        for venue in &venues {
            data.push(self.summarize(venue, now).await?);
        }

        Ok(data.into())
    }

    pub async fn get(&self, id: i64) -> Result<Option<venue::Model>> {
        venue::Entity::find_by_id(id)
            .one(&self.db.conn)
            .await
            .map_err(|e| eyre!("Failed to find venue {}: {}", id, e))
    }

    /// The venue together with its past and upcoming shows.
    #[instrument(skip(self))]
    pub async fn detail(&self, id: i64, now: DateTime<Utc>) -> Result<Option<VenueDetail>> {
        let Some(venue) = self.get(id).await? else {
            return Ok(None);
        };

        let past = self.shows_matching(id, past_condition(now)).await?;
        let upcoming = self.shows_matching(id, upcoming_condition(now)).await?;

        Ok(Some(VenueDetail {
            venue,
            shows: ShowSplit { past, upcoming },
        }))
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: VenueFields) -> Result<venue::Model> {
        let model = input.into_active_model();

        let created = self
            .db
            .conn
            .transaction::<_, venue::Model, DbErr>(|txn| {
                Box::pin(async move { model.insert(txn).await })
            })
            .await
            .map_err(|e| eyre!("Failed to create venue: {}", e))?;

        log::info!("Venue created: '{}' (ID: {})", created.name, created.id);
        Ok(created)
    }

    /// Overwrite every field of an existing venue. `None` when the id is unknown.
    #[instrument(skip(self, input))]
    pub async fn update(&self, id: i64, input: VenueFields) -> Result<Option<venue::Model>> {
        let updated = self
            .db
            .conn
            .transaction::<_, Option<venue::Model>, DbErr>(|txn| {
                Box::pin(async move {
                    let Some(existing) = venue::Entity::find_by_id(id).one(txn).await? else {
                        return Ok(None);
                    };

                    let mut model: venue::ActiveModel = existing.into();
                    input.apply(&mut model);
                    model.update(txn).await.map(Some)
                })
            })
            .await
            .map_err(|e| eyre!("Failed to update venue {}: {}", id, e))?;

        if let Some(venue) = &updated {
            log::info!("Venue updated: '{}' (ID: {})", venue.name, venue.id);
        }
        Ok(updated)
    }

    /// Delete a venue. Its shows go with it through the foreign key cascade.
    /// Returns the deleted venue, `None` when the id is unknown.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<Option<venue::Model>> {
        let deleted = self
            .db
            .conn
            .transaction::<_, Option<venue::Model>, DbErr>(|txn| {
                Box::pin(async move {
                    let Some(existing) = venue::Entity::find_by_id(id).one(txn).await? else {
                        return Ok(None);
                    };

                    venue::Entity::delete_by_id(id).exec(txn).await?;
                    Ok(Some(existing))
                })
            })
            .await
            .map_err(|e| eyre!("Failed to delete venue {}: {}", id, e))?;

        if let Some(venue) = &deleted {
            log::info!("Venue deleted: '{}' (ID: {})", venue.name, venue.id);
        }
        Ok(deleted)
    }

    async fn summarize(&self, venue: &venue::Model, now: DateTime<Utc>) -> Result<SubjectSummary> {
        let num_upcoming_shows =
            count_upcoming_shows(&self.db.conn, ShowOwner::Venue(venue.id), now).await?;

        Ok(SubjectSummary {
            id: venue.id,
            name: venue.name.clone(),
            num_upcoming_shows,
        })
    }

    async fn shows_matching(
        &self,
        venue_id: i64,
        time_condition: sea_orm::sea_query::SimpleExpr,
    ) -> Result<Vec<VenueShow>> {
        let rows = show::Entity::find()
            .filter(show::Column::VenueId.eq(venue_id))
            .filter(time_condition)
            .order_by_desc(show::Column::StartTime)
            .find_also_related(artist::Entity)
            .all(&self.db.conn)
            .await
            .map_err(|e| eyre!("Failed to fetch shows for venue {}: {}", venue_id, e))?;

        rows.into_iter()
            .map(|(show, artist)| {
                let artist = artist
                    .ok_or_else(|| eyre!("Show {} has no associated artist", show.id))?;
                Ok(VenueShow {
                    artist_id: artist.id,
                    artist_name: artist.name,
                    artist_image_link: artist.image_link,
                    start_time: show.start_time,
                })
            })
            .collect()
    }
}
