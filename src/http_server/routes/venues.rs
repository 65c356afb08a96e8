use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
};
use axum_extra::extract::{CookieJar, Form};
use chrono::Utc;

use crate::http_server::{
    error::HttpError,
    flash,
    forms::{SearchForm, VenueForm},
    pages,
    state::AppState,
};
use crate::services::venue::VenueFields;

type Page = Result<(CookieJar, Html<String>), HttpError>;

pub async fn list(State(app_state): State<Arc<AppState>>, jar: CookieJar) -> Page {
    let areas = app_state.venues().list_by_area(Utc::now()).await?;
    let (jar, message) = flash::take(jar);
    Ok((jar, pages::venues(message.as_deref(), &areas)))
}

pub async fn search(
    State(app_state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<SearchForm>,
) -> Page {
    let results = app_state
        .venues()
        .search(&form.search_term, Utc::now())
        .await?;
    let (jar, message) = flash::take(jar);
    Ok((
        jar,
        pages::subject_search(message.as_deref(), "/venues", &form.search_term, &results),
    ))
}

pub async fn detail(
    State(app_state): State<Arc<AppState>>,
    Path(venue_id): Path<i64>,
    jar: CookieJar,
) -> Page {
    let detail = app_state
        .venues()
        .detail(venue_id, Utc::now())
        .await?
        .ok_or(HttpError::NotFound)?;
    let (jar, message) = flash::take(jar);
    Ok((jar, pages::venue_detail(message.as_deref(), &detail)))
}

pub async fn new_form(jar: CookieJar) -> (CookieJar, Html<String>) {
    let (jar, message) = flash::take(jar);
    (jar, pages::venue_form(message.as_deref(), None))
}

pub async fn create(
    State(app_state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<VenueForm>,
) -> (CookieJar, Redirect) {
    let name = form.name.trim().to_string();
    let outcome = match form.into_fields() {
        Ok(fields) => app_state.venues().create(fields).await,
        Err(e) => Err(e.into()),
    };

    let message = match outcome {
        Ok(venue) => format!("Venue {} was successfully listed!", venue.name),
        Err(e) => {
            log::error!("Failed to list venue '{}': {:?}", name, e);
            format!("An error occurred. Venue {} could not be listed.", name)
        }
    };
    (flash::push(jar, message), Redirect::to("/"))
}

pub async fn edit_form(
    State(app_state): State<Arc<AppState>>,
    Path(venue_id): Path<i64>,
    jar: CookieJar,
) -> Page {
    let venue = app_state
        .venues()
        .get(venue_id)
        .await?
        .ok_or(HttpError::NotFound)?;
    let fields = VenueFields::from(venue);
    let (jar, message) = flash::take(jar);
    Ok((
        jar,
        pages::venue_form(message.as_deref(), Some((venue_id, &fields))),
    ))
}

pub async fn update(
    State(app_state): State<Arc<AppState>>,
    Path(venue_id): Path<i64>,
    jar: CookieJar,
    Form(form): Form<VenueForm>,
) -> Result<(CookieJar, Redirect), HttpError> {
    let name = form.name.trim().to_string();
    let outcome = match form.into_fields() {
        Ok(fields) => app_state.venues().update(venue_id, fields).await,
        Err(e) => Err(e.into()),
    };

    let message = match outcome {
        Ok(Some(venue)) => format!("Venue {} was successfully updated!", venue.name),
        Ok(None) => return Err(HttpError::NotFound),
        Err(e) => {
            log::error!("Failed to update venue {}: {:?}", venue_id, e);
            format!("An error occurred. Venue {} could not be updated.", name)
        }
    };
    Ok((
        flash::push(jar, message),
        Redirect::to(&format!("/venues/{venue_id}")),
    ))
}

pub async fn delete(
    State(app_state): State<Arc<AppState>>,
    Path(venue_id): Path<i64>,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    let message = match app_state.venues().delete(venue_id).await {
        Ok(Some(venue)) => format!("Venue {} was successfully deleted!", venue.name),
        Ok(None) => {
            log::warn!("Venue {} not found for deletion", venue_id);
            "An error occurred. This venue could not be deleted.".to_string()
        }
        Err(e) => {
            log::error!("Failed to delete venue {}: {:?}", venue_id, e);
            "An error occurred. This venue could not be deleted.".to_string()
        }
    };
    (flash::push(jar, message), Redirect::to("/venues"))
}
