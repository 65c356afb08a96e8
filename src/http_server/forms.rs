use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::services::artist::ArtistFields;
use crate::services::venue::VenueFields;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Missing required field: {0}")]
    Missing(&'static str),
    #[error("Invalid value for {field}: {value:?}")]
    Invalid { field: &'static str, value: String },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchForm {
    pub search_term: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct VenueForm {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: String,
    pub image_link: String,
    pub facebook_link: String,
    pub website: String,
    pub genres: Vec<String>,
    pub seeking_talent: Option<String>,
    pub seeking_description: String,
}

impl VenueForm {
    pub fn into_fields(self) -> Result<VenueFields, FormError> {
        Ok(VenueFields {
            name: required("name", self.name)?,
            city: required("city", self.city)?,
            state: required("state", self.state)?,
            address: Some(required("address", self.address)?),
            phone: optional(self.phone),
            image_link: optional(self.image_link),
            facebook_link: optional(self.facebook_link),
            website: optional(self.website),
            genres: genres(self.genres),
            seeking_talent: checked(self.seeking_talent.as_deref()),
            seeking_description: optional(self.seeking_description),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ArtistForm {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub image_link: String,
    pub facebook_link: String,
    pub website: String,
    pub genres: Vec<String>,
    pub seeking_venue: Option<String>,
    pub seeking_description: String,
}

impl ArtistForm {
    pub fn into_fields(self) -> Result<ArtistFields, FormError> {
        Ok(ArtistFields {
            name: required("name", self.name)?,
            city: required("city", self.city)?,
            state: required("state", self.state)?,
            phone: optional(self.phone),
            genres: genres(self.genres),
            image_link: optional(self.image_link),
            facebook_link: optional(self.facebook_link),
            website: optional(self.website),
            seeking_venue: checked(self.seeking_venue.as_deref()),
            seeking_description: optional(self.seeking_description),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ShowForm {
    pub artist_id: String,
    pub venue_id: String,
    pub start_time: String,
}

/// A validated show submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewShow {
    pub artist_id: i64,
    pub venue_id: i64,
    pub start_time: DateTime<Utc>,
}

impl ShowForm {
    pub fn into_new_show(self) -> Result<NewShow, FormError> {
        Ok(NewShow {
            artist_id: parse_id("artist_id", self.artist_id)?,
            venue_id: parse_id("venue_id", self.venue_id)?,
            start_time: parse_start_time(&required("start_time", self.start_time)?)?,
        })
    }
}

/// Blank means empty or whitespace only. Anything else is kept as submitted.
fn required(field: &'static str, value: String) -> Result<String, FormError> {
    if value.trim().is_empty() {
        return Err(FormError::Missing(field));
    }
    Ok(value)
}

fn optional(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn genres(values: Vec<String>) -> Vec<String> {
    values.into_iter().filter_map(optional).collect()
}

fn checked(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("y" | "on" | "true")
    )
}

fn parse_id(field: &'static str, value: String) -> Result<i64, FormError> {
    let value = required(field, value)?;
    value
        .trim()
        .parse()
        .map_err(|_| FormError::Invalid { field, value })
}

/// Parse a submitted start time. Values without an offset are taken as UTC.
pub fn parse_start_time(raw: &str) -> Result<DateTime<Utc>, FormError> {
    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
    ];

    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| FormError::Invalid {
            field: "start_time",
            value: raw.to_string(),
        })
}
