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
    forms::{ArtistForm, SearchForm},
    pages,
    state::AppState,
};
use crate::services::artist::ArtistFields;

type Page = Result<(CookieJar, Html<String>), HttpError>;

pub async fn list(State(app_state): State<Arc<AppState>>, jar: CookieJar) -> Page {
    let artists = app_state.artists().list().await?;
    let (jar, message) = flash::take(jar);
    Ok((jar, pages::artists(message.as_deref(), &artists)))
}

pub async fn search(
    State(app_state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<SearchForm>,
) -> Page {
    let results = app_state
        .artists()
        .search(&form.search_term, Utc::now())
        .await?;
    let (jar, message) = flash::take(jar);
    Ok((
        jar,
        pages::subject_search(message.as_deref(), "/artists", &form.search_term, &results),
    ))
}

pub async fn detail(
    State(app_state): State<Arc<AppState>>,
    Path(artist_id): Path<i64>,
    jar: CookieJar,
) -> Page {
    let detail = app_state
        .artists()
        .detail(artist_id, Utc::now())
        .await?
        .ok_or(HttpError::NotFound)?;
    let (jar, message) = flash::take(jar);
    Ok((jar, pages::artist_detail(message.as_deref(), &detail)))
}

pub async fn new_form(jar: CookieJar) -> (CookieJar, Html<String>) {
    let (jar, message) = flash::take(jar);
    (jar, pages::artist_form(message.as_deref(), None))
}

pub async fn create(
    State(app_state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<ArtistForm>,
) -> (CookieJar, Redirect) {
    let name = form.name.trim().to_string();
    let outcome = match form.into_fields() {
        Ok(fields) => app_state.artists().create(fields).await,
        Err(e) => Err(e.into()),
    };

    let message = match outcome {
        Ok(artist) => format!("Artist {} was successfully listed!", artist.name),
        Err(e) => {
            log::error!("Failed to list artist '{}': {:?}", name, e);
            format!("An error occurred. Artist {} could not be listed.", name)
        }
    };
    (flash::push(jar, message), Redirect::to("/"))
}

pub async fn edit_form(
    State(app_state): State<Arc<AppState>>,
    Path(artist_id): Path<i64>,
    jar: CookieJar,
) -> Page {
    let artist = app_state
        .artists()
        .get(artist_id)
        .await?
        .ok_or(HttpError::NotFound)?;
    let fields = ArtistFields::from(artist);
    let (jar, message) = flash::take(jar);
    Ok((
        jar,
        pages::artist_form(message.as_deref(), Some((artist_id, &fields))),
    ))
}

pub async fn update(
    State(app_state): State<Arc<AppState>>,
    Path(artist_id): Path<i64>,
    jar: CookieJar,
    Form(form): Form<ArtistForm>,
) -> Result<(CookieJar, Redirect), HttpError> {
    let name = form.name.trim().to_string();
    let outcome = match form.into_fields() {
        Ok(fields) => app_state.artists().update(artist_id, fields).await,
        Err(e) => Err(e.into()),
    };

    let message = match outcome {
        Ok(Some(artist)) => format!("Artist {} was successfully updated!", artist.name),
        Ok(None) => return Err(HttpError::NotFound),
        Err(e) => {
            log::error!("Failed to update artist {}: {:?}", artist_id, e);
            format!("An error occurred. Artist {} could not be updated.", name)
        }
    };
    Ok((
        flash::push(jar, message),
        Redirect::to(&format!("/artists/{artist_id}")),
    ))
}

pub async fn delete(
    State(app_state): State<Arc<AppState>>,
    Path(artist_id): Path<i64>,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    let message = match app_state.artists().delete(artist_id).await {
        Ok(Some(artist)) => format!("Artist {} was successfully deleted!", artist.name),
        Ok(None) => {
            log::warn!("Artist {} not found for deletion", artist_id);
            "An error occurred. This artist could not be deleted.".to_string()
        }
        Err(e) => {
            log::error!("Failed to delete artist {}: {:?}", artist_id, e);
            "An error occurred. This artist could not be deleted.".to_string()
        }
    };
    (flash::push(jar, message), Redirect::to("/artists"))
}
