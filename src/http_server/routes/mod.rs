pub mod artists;
pub mod shows;
pub mod venues;

use axum::response::{Html, IntoResponse};
use axum_extra::extract::CookieJar;

use crate::http_server::{error::HttpError, flash, pages};

pub async fn home(jar: CookieJar) -> (CookieJar, Html<String>) {
    let (jar, message) = flash::take(jar);
    (jar, pages::home(message.as_deref()))
}

pub async fn not_found() -> impl IntoResponse {
    HttpError::NotFound
}
