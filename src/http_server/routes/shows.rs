use std::sync::Arc;

use axum::{
    extract::State,
    response::{Html, Redirect},
};
use axum_extra::extract::{CookieJar, Form};

use crate::http_server::{
    error::HttpError,
    flash,
    forms::{SearchForm, ShowForm},
    pages,
    state::AppState,
};

pub async fn list(
    State(app_state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<(CookieJar, Html<String>), HttpError> {
    let shows = app_state.shows().list().await?;
    let (jar, message) = flash::take(jar);
    Ok((jar, pages::shows(message.as_deref(), &shows)))
}

pub async fn search(
    State(app_state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<SearchForm>,
) -> Result<(CookieJar, Html<String>), HttpError> {
    let results = app_state.shows().search(&form.search_term).await?;
    let (jar, message) = flash::take(jar);
    Ok((
        jar,
        pages::show_search(message.as_deref(), &form.search_term, &results),
    ))
}

pub async fn new_form(jar: CookieJar) -> (CookieJar, Html<String>) {
    let (jar, message) = flash::take(jar);
    (jar, pages::show_form(message.as_deref()))
}

pub async fn create(
    State(app_state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<ShowForm>,
) -> (CookieJar, Redirect) {
    let outcome = match form.into_new_show() {
        Ok(show) => {
            app_state
                .shows()
                .create(show.artist_id, show.venue_id, show.start_time)
                .await
        }
        Err(e) => Err(e.into()),
    };

    let message = match outcome {
        Ok(_) => "Show was successfully listed!",
        Err(e) => {
            log::error!("Failed to list show: {:?}", e);
            "An error occurred. Show could not be listed."
        }
    };
    (flash::push(jar, message), Redirect::to("/"))
}
