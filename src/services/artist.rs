use std::sync::Arc;

use chrono::{DateTime, Utc};
use color_eyre::eyre::{Result, eyre};
use sea_orm::sea_query::SimpleExpr;
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

/// Every writable artist column; edits replace all of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistFields {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub genres: Vec<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

impl ArtistFields {
    pub(crate) fn into_active_model(self) -> artist::ActiveModel {
        let mut model = artist::ActiveModel {
            ..Default::default()
        };
        self.apply(&mut model);
        model
    }

    fn apply(self, model: &mut artist::ActiveModel) {
        model.search_name = Set(fold_case(&self.name));
        model.name = Set(self.name);
        model.city = Set(self.city);
        model.state = Set(self.state);
        model.phone = Set(self.phone);
        model.genres = Set(self.genres.into());
        model.image_link = Set(self.image_link);
        model.facebook_link = Set(self.facebook_link);
        model.website = Set(self.website);
        model.seeking_venue = Set(self.seeking_venue);
        model.seeking_description = Set(self.seeking_description);
    }
}

impl From<artist::Model> for ArtistFields {
    fn from(model: artist::Model) -> Self {
        Self {
            name: model.name,
            city: model.city,
            state: model.state,
            phone: model.phone,
            genres: model.genres.0,
            image_link: model.image_link,
            facebook_link: model.facebook_link,
            website: model.website,
            seeking_venue: model.seeking_venue,
            seeking_description: model.seeking_description,
        }
    }
}

/// A show as seen from the artist page: where and when.
#[derive(Debug, Clone)]
pub struct ArtistShow {
    pub venue_id: i64,
    pub venue_name: String,
    pub venue_image_link: Option<String>,
    pub start_time: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ArtistDetail {
    pub artist: artist::Model,
    pub shows: ShowSplit<ArtistShow>,
}

pub struct ArtistService {
    db: Arc<Database>,
}

impl ArtistService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> Result<Vec<artist::Model>> {
        artist::Entity::find()
            .order_by_asc(artist::Column::Name)
            .all(&self.db.conn)
            .await
            .map_err(|e| eyre!("Failed to fetch artists: {}", e))
    }

    #[instrument(skip(self))]
    pub async fn search(
        &self,
        search_term: &str,
        now: DateTime<Utc>,
    ) -> Result<SearchResults<SubjectSummary>> {
        let artists = artist::Entity::find()
            .filter(artist::Column::SearchName.like(substring_pattern(search_term)))
            .order_by_asc(artist::Column::Name)
            .all(&self.db.conn)
            .await
            .map_err(|e| eyre!("Failed to search artists: {}", e))?;

        let mut data = Vec::with_capacity(artists.len());
        for artist in artists {
            let num_upcoming_shows =
                count_upcoming_shows(&self.db.conn, ShowOwner::Artist(artist.id), now).await?;
            data.push(SubjectSummary {
                id: artist.id,
                name: artist.name,
                num_upcoming_shows,
            });
        }

        Ok(data.into())
    }

    pub async fn get(&self, id: i64) -> Result<Option<artist::Model>> {
        artist::Entity::find_by_id(id)
            .one(&self.db.conn)
            .await
            .map_err(|e| eyre!("Failed to find artist {}: {}", id, e))
    }

    #[instrument(skip(self))]
    pub async fn detail(&self, id: i64, now: DateTime<Utc>) -> Result<Option<ArtistDetail>> {
        let Some(artist) = self.get(id).await? else {
            return Ok(None);
        };

        let past = self.shows_matching(id, past_condition(now)).await?;
        let upcoming = self.shows_matching(id, upcoming_condition(now)).await?;

        Ok(Some(ArtistDetail {
            artist,
            shows: ShowSplit { past, upcoming },
        }))
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: ArtistFields) -> Result<artist::Model> {
        let model = input.into_active_model();

        let created = self
            .db
            .conn
            .transaction::<_, artist::Model, DbErr>(|txn| {
                Box::pin(async move { model.insert(txn).await })
            })
            .await
            .map_err(|e| eyre!("Failed to create artist: {}", e))?;

        log::info!("Artist created: '{}' (ID: {})", created.name, created.id);
        Ok(created)
    }

    #[instrument(skip(self, input))]
    pub async fn update(&self, id: i64, input: ArtistFields) -> Result<Option<artist::Model>> {
        let updated = self
            .db
            .conn
            .transaction::<_, Option<artist::Model>, DbErr>(|txn| {
                Box::pin(async move {
                    let Some(existing) = artist::Entity::find_by_id(id).one(txn).await? else {
                        return Ok(None);
                    };

                    let mut model: artist::ActiveModel = existing.into();
                    input.apply(&mut model);
                    model.update(txn).await.map(Some)
                })
            })
            .await
            .map_err(|e| eyre!("Failed to update artist {}: {}", id, e))?;

        if let Some(artist) = &updated {
            log::info!("Artist updated: '{}' (ID: {})", artist.name, artist.id);
        }
        Ok(updated)
    }

    /// Delete an artist; the foreign key cascade removes its shows.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<Option<artist::Model>> {
        let deleted = self
            .db
            .conn
            .transaction::<_, Option<artist::Model>, DbErr>(|txn| {
                Box::pin(async move {
                    let Some(existing) = artist::Entity::find_by_id(id).one(txn).await? else {
                        return Ok(None);
                    };

                    artist::Entity::delete_by_id(id).exec(txn).await?;
                    Ok(Some(existing))
                })
            })
            .await
            .map_err(|e| eyre!("Failed to delete artist {}: {}", id, e))?;

        if let Some(artist) = &deleted {
            log::info!("Artist deleted: '{}' (ID: {})", artist.name, artist.id);
        }
        Ok(deleted)
    }

    async fn shows_matching(
        &self,
        artist_id: i64,
        time_condition: SimpleExpr,
    ) -> Result<Vec<ArtistShow>> {
        let rows = show::Entity::find()
            .filter(show::Column::ArtistId.eq(artist_id))
            .filter(time_condition)
            .order_by_desc(show::Column::StartTime)
            .find_also_related(venue::Entity)
            .all(&self.db.conn)
            .await
            .map_err(|e| eyre!("Failed to fetch shows for artist {}: {}", artist_id, e))?;

        rows.into_iter()
            .map(|(show, venue)| {
                let venue =
                    venue.ok_or_else(|| eyre!("Show {} has no associated venue", show.id))?;
                Ok(ArtistShow {
                    venue_id: venue.id,
                    venue_name: venue.name,
                    venue_image_link: venue.image_link,
                    start_time: show.start_time,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{
        fixed_now, hours_from, insert_artist, insert_show, insert_venue, new_artist, test_db,
    };

    #[tokio::test]
    async fn test_create_then_get_round_trips_every_field() {
        let db = test_db().await;
        let service = ArtistService::new(db);

        let fields = ArtistFields {
            name: "Guns N Petals".into(),
            city: "San Francisco".into(),
            state: "CA".into(),
            phone: Some("326-123-5000".into()),
            genres: vec!["Rock n Roll".into()],
            image_link: Some("https://images.example.com/petals.jpg".into()),
            facebook_link: Some("https://www.facebook.com/GunsNPetals".into()),
            website: Some("https://www.gunsnpetalsband.com".into()),
            seeking_venue: true,
            seeking_description: Some("Looking for shows to perform at in the area!".into()),
        };

        let created = service.create(fields.clone()).await.unwrap();
        let fetched = service.get(created.id).await.unwrap().unwrap();

        assert_eq!(ArtistFields::from(fetched), fields);
    }

    #[tokio::test]
    async fn test_list_orders_by_name() {
        let db = test_db().await;
        insert_artist(&db, "The Wild Sax Band").await;
        insert_artist(&db, "Guns N Petals").await;
        insert_artist(&db, "Matt Quevedo").await;

        let artists = ArtistService::new(db).list().await.unwrap();
        let names: Vec<_> = artists.iter().map(|a| a.name.as_str()).collect();

        assert_eq!(names, vec!["Guns N Petals", "Matt Quevedo", "The Wild Sax Band"]);
    }

    #[tokio::test]
    async fn test_search_examples() {
        let db = test_db().await;
        let now = fixed_now();
        let petals = insert_artist(&db, "Guns N Petals").await;
        insert_artist(&db, "Matt Quevedo").await;
        insert_artist(&db, "The Wild Sax Band").await;
        let venue = insert_venue(&db, "The Musical Hop", "San Francisco", "CA").await;
        insert_show(&db, petals, venue, hours_from(now, 5)).await;
        insert_show(&db, petals, venue, hours_from(now, -5)).await;
        let service = ArtistService::new(db);

        let results = service.search("guns", now).await.unwrap();
        assert_eq!(results.count, 1);
        assert_eq!(results.data[0].id, petals);
        assert_eq!(results.data[0].num_upcoming_shows, 1);

        let results = service.search("band", now).await.unwrap();
        assert_eq!(results.count, 1);
        assert_eq!(results.data[0].name, "The Wild Sax Band");

        let results = service.search("A", now).await.unwrap();
        assert_eq!(results.count, 3);

        let results = service.search("xyz", now).await.unwrap();
        assert_eq!(results.count, 0);
    }

    #[tokio::test]
    async fn test_search_folds_non_ascii_case() {
        let db = test_db().await;
        let now = fixed_now();
        let elan = insert_artist(&db, "Élan Vital").await;
        insert_artist(&db, "Guns N Petals").await;
        let service = ArtistService::new(db);

        for term in ["élan", "ÉLAN", "Élan vital"] {
            let results = service.search(term, now).await.unwrap();
            assert_eq!(results.count, 1, "{term}");
            assert_eq!(results.data[0].id, elan);
            assert_eq!(results.data[0].name, "Élan Vital");
        }
    }

    #[tokio::test]
    async fn test_search_follows_renamed_artist() {
        let db = test_db().await;
        let now = fixed_now();
        let id = insert_artist(&db, "Guns N Petals").await;
        let service = ArtistService::new(db);

        service
            .update(id, new_artist("Ünder The Sea"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(service.search("petals", now).await.unwrap().count, 0);
        assert_eq!(service.search("ünder", now).await.unwrap().count, 1);
    }

    #[tokio::test]
    async fn test_detail_carries_venue_rows() {
        let db = test_db().await;
        let now = fixed_now();
        let artist = insert_artist(&db, "Guns N Petals").await;
        let hop = insert_venue(&db, "The Musical Hop", "San Francisco", "CA").await;
        let park =
            insert_venue(&db, "Park Square Live Music & Coffee", "San Francisco", "CA").await;
        insert_show(&db, artist, hop, hours_from(now, -10)).await;
        insert_show(&db, artist, park, hours_from(now, 10)).await;
        insert_show(&db, artist, hop, hours_from(now, 20)).await;

        let detail = ArtistService::new(db)
            .detail(artist, now)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(detail.artist.name, "Guns N Petals");
        assert_eq!(detail.shows.past_count(), 1);
        assert_eq!(detail.shows.past[0].venue_id, hop);
        assert_eq!(detail.shows.past[0].venue_name, "The Musical Hop");
        assert_eq!(detail.shows.upcoming_count(), 2);
        assert_eq!(detail.shows.upcoming[0].venue_id, hop);
        assert_eq!(detail.shows.upcoming[1].venue_id, park);
    }

    #[tokio::test]
    async fn test_update_replaces_fields() {
        let db = test_db().await;
        let service = ArtistService::new(db);
        let created = service.create(new_artist("Matt Quevedo")).await.unwrap();

        let replacement = ArtistFields {
            genres: vec!["Jazz".into(), "Swing".into()],
            seeking_venue: true,
            seeking_description: Some("Anywhere with a piano".into()),
            ..new_artist("Matt Quevedo Trio")
        };
        let updated = service
            .update(created.id, replacement.clone())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(ArtistFields::from(updated), replacement);
        assert!(service.update(9999, new_artist("Ghost")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_cascades_to_shows() {
        let db = test_db().await;
        let now = fixed_now();
        let artist = insert_artist(&db, "Guns N Petals").await;
        let venue = insert_venue(&db, "The Musical Hop", "San Francisco", "CA").await;
        insert_show(&db, artist, venue, hours_from(now, 1)).await;

        let service = ArtistService::new(db.clone());
        assert!(service.delete(artist).await.unwrap().is_some());
        assert!(service.get(artist).await.unwrap().is_none());

        let remaining = show::Entity::find().all(&db.conn).await.unwrap();
        assert!(remaining.is_empty());
    }
}
