use std::sync::Arc;

use chrono::{DateTime, Utc};
use color_eyre::{
    Result,
    eyre::{Context, eyre},
};
use sea_orm::{
    ActiveModelTrait, DbErr, EntityTrait, PaginatorTrait, Set, TransactionTrait,
};

use crate::database::Database;
use crate::entities::{show, venue};
use crate::services::artist::ArtistFields;
use crate::services::venue::VenueFields;

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn some(value: &str) -> Option<String> {
    Some(value.to_string())
}

fn sample_venues() -> Vec<VenueFields> {
    vec![
        VenueFields {
            name: "The Musical Hop".to_string(),
            city: "San Francisco".to_string(),
            state: "CA".to_string(),
            address: some("1015 Folsom Street"),
            phone: some("123-123-1234"),
            image_link: some(
                "https://images.unsplash.com/photo-1543900694-133f37abaaa5?ixlib=rb-1.2.1&auto=format&fit=crop&w=400&q=60",
            ),
            facebook_link: some("https://www.facebook.com/TheMusicalHop"),
            website: some("https://www.themusicalhop.com"),
            genres: strings(&["Jazz", "Reggae", "Swing", "Classical", "Folk"]),
            seeking_talent: true,
            seeking_description: some(
                "We are on the lookout for a local artist to play every two weeks. Please call us.",
            ),
        },
        VenueFields {
            name: "The Dueling Pianos Bar".to_string(),
            city: "New York".to_string(),
            state: "NY".to_string(),
            address: some("335 Delancey Street"),
            phone: some("914-003-1132"),
            image_link: some(
                "https://images.unsplash.com/photo-1497032205916-ac775f0649ae?ixlib=rb-1.2.1&auto=format&fit=crop&w=750&q=80",
            ),
            facebook_link: some("https://www.facebook.com/theduelingpianos"),
            website: some("https://www.theduelingpianos.com"),
            genres: strings(&["Classical", "R&B", "Hip-Hop"]),
            seeking_talent: false,
            seeking_description: None,
        },
        VenueFields {
            name: "Park Square Live Music & Coffee".to_string(),
            city: "San Francisco".to_string(),
            state: "CA".to_string(),
            address: some("34 Whiskey Moore Ave"),
            phone: some("415-000-1234"),
            image_link: some(
                "https://images.unsplash.com/photo-1485686531765-ba63b07845a7?ixlib=rb-1.2.1&auto=format&fit=crop&w=747&q=80",
            ),
            facebook_link: some("https://www.facebook.com/ParkSquareLiveMusicAndCoffee"),
            website: some("https://www.parksquarelivemusicandcoffee.com"),
            genres: strings(&["Rock n Roll", "Jazz", "Classical", "Folk"]),
            seeking_talent: false,
            seeking_description: None,
        },
    ]
}

fn sample_artists() -> Vec<ArtistFields> {
    vec![
        ArtistFields {
            name: "Guns N Petals".to_string(),
            city: "San Francisco".to_string(),
            state: "CA".to_string(),
            phone: some("326-123-5000"),
            genres: strings(&["Rock n Roll"]),
            image_link: some(
                "https://images.unsplash.com/photo-1549213783-8284d0336c4f?ixlib=rb-1.2.1&auto=format&fit=crop&w=300&q=80",
            ),
            facebook_link: some("https://www.facebook.com/GunsNPetals"),
            website: some("https://www.gunsnpetalsband.com"),
            seeking_venue: true,
            seeking_description: some(
                "Looking for shows to perform at in the San Francisco Bay Area!",
            ),
        },
        ArtistFields {
            name: "Matt Quevedo".to_string(),
            city: "New York".to_string(),
            state: "NY".to_string(),
            phone: some("300-400-5000"),
            genres: strings(&["Jazz"]),
            image_link: some(
                "https://images.unsplash.com/photo-1495223153807-b916f75de8c5?ixlib=rb-1.2.1&auto=format&fit=crop&w=334&q=80",
            ),
            facebook_link: some("https://www.facebook.com/mattquevedo923251523"),
            website: None,
            seeking_venue: false,
            seeking_description: None,
        },
        ArtistFields {
            name: "The Wild Sax Band".to_string(),
            city: "San Francisco".to_string(),
            state: "CA".to_string(),
            phone: some("432-325-5432"),
            genres: strings(&["Jazz", "Classical"]),
            image_link: some(
                "https://images.unsplash.com/photo-1558369981-f9ca78462e61?ixlib=rb-1.2.1&auto=format&fit=crop&w=794&q=80",
            ),
            facebook_link: None,
            website: None,
            seeking_venue: false,
            seeking_description: None,
        },
    ]
}

/// (venue index, artist index, start time) into the sample lists above.
const SAMPLE_SHOWS: [(usize, usize, &str); 5] = [
    (0, 0, "2019-05-21T21:30:00Z"),
    (2, 1, "2019-06-15T23:00:00Z"),
    (2, 2, "2035-04-01T20:00:00Z"),
    (2, 2, "2035-04-08T20:00:00Z"),
    (2, 2, "2035-04-15T20:00:00Z"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub venues: usize,
    pub artists: usize,
    pub shows: usize,
}

/// Load the sample venues, artists and shows. Does nothing when any venue
/// already exists and returns `None` in that case.
pub async fn seed(db: Arc<Database>) -> Result<Option<SeedSummary>> {
    let existing = venue::Entity::find()
        .count(&db.conn)
        .await
        .wrap_err("Failed to count venues")?;
    if existing > 0 {
        log::info!("Database already has {} venues, skipping seed", existing);
        return Ok(None);
    }

    let shows = SAMPLE_SHOWS
        .iter()
        .map(|&(venue_index, artist_index, start_time)| {
            let start_time = DateTime::parse_from_rfc3339(start_time)
                .map_err(|e| eyre!("Invalid sample start time {}: {}", start_time, e))?
                .with_timezone(&Utc);
            Ok((venue_index, artist_index, start_time))
        })
        .collect::<Result<Vec<_>>>()?;

    // All or nothing, a partial seed would make the next run skip
    let summary = db
        .conn
        .transaction::<_, SeedSummary, DbErr>(|txn| {
            Box::pin(async move {
                let mut venue_ids = Vec::new();
                for fields in sample_venues() {
                    venue_ids.push(fields.into_active_model().insert(txn).await?.id);
                }

                let mut artist_ids = Vec::new();
                for fields in sample_artists() {
                    artist_ids.push(fields.into_active_model().insert(txn).await?.id);
                }

                for &(venue_index, artist_index, start_time) in &shows {
                    show::ActiveModel {
                        artist_id: Set(artist_ids[artist_index]),
                        venue_id: Set(venue_ids[venue_index]),
                        start_time: Set(start_time),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?;
                }

                Ok(SeedSummary {
                    venues: venue_ids.len(),
                    artists: artist_ids.len(),
                    shows: shows.len(),
                })
            })
        })
        .await
        .map_err(|e| eyre!("Failed to seed sample data: {}", e))?;

    log::info!(
        "Seeded {} venues, {} artists and {} shows",
        summary.venues,
        summary.artists,
        summary.shows
    );
    Ok(Some(summary))
}
