use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use sea_orm::{ConnectOptions, ConnectionTrait, Database as SeaDatabase};

use crate::database::Database;
use crate::services::artist::{ArtistFields, ArtistService};
use crate::services::show::ShowService;
use crate::services::venue::{VenueFields, VenueService};

pub async fn test_db() -> Arc<Database> {
    // A single connection, otherwise every pooled connection sees its own empty
    // in-memory database.
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);

    let conn = SeaDatabase::connect(opt).await.unwrap();

    // Enable foreign keys
    conn.execute_unprepared("PRAGMA foreign_keys = ON")
        .await
        .unwrap();

    Arc::new(Database::migrated(conn).await.unwrap())
}

/// Fixed reference instant so time-split assertions are deterministic.
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-06-01T20:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

pub fn hours_from(now: DateTime<Utc>, hours: i64) -> DateTime<Utc> {
    now + Duration::hours(hours)
}

pub fn new_venue(name: &str, city: &str, state: &str) -> VenueFields {
    VenueFields {
        name: name.to_string(),
        city: city.to_string(),
        state: state.to_string(),
        address: Some("1015 Folsom Street".to_string()),
        phone: Some("123-123-1234".to_string()),
        image_link: None,
        facebook_link: None,
        website: None,
        genres: vec!["Jazz".to_string()],
        seeking_talent: false,
        seeking_description: None,
    }
}

pub fn new_artist(name: &str) -> ArtistFields {
    ArtistFields {
        name: name.to_string(),
        city: "San Francisco".to_string(),
        state: "CA".to_string(),
        phone: Some("326-123-5000".to_string()),
        genres: vec!["Rock n Roll".to_string()],
        image_link: None,
        facebook_link: None,
        website: None,
        seeking_venue: false,
        seeking_description: None,
    }
}

pub async fn insert_venue(db: &Arc<Database>, name: &str, city: &str, state: &str) -> i64 {
    VenueService::new(db.clone())
        .create(new_venue(name, city, state))
        .await
        .unwrap()
        .id
}

pub async fn insert_artist(db: &Arc<Database>, name: &str) -> i64 {
    ArtistService::new(db.clone())
        .create(new_artist(name))
        .await
        .unwrap()
        .id
}

pub async fn insert_show(
    db: &Arc<Database>,
    artist_id: i64,
    venue_id: i64,
    start_time: DateTime<Utc>,
) -> i64 {
    ShowService::new(db.clone())
        .create(artist_id, venue_id, start_time)
        .await
        .unwrap()
        .id
}
