//! One-shot notices carried across a post/redirect/get hop in a cookie.

use axum_extra::extract::cookie::{Cookie, CookieJar};

const FLASH_COOKIE: &str = "flash";

/// Queue `message` for the next rendered page.
pub fn push(jar: CookieJar, message: impl AsRef<str>) -> CookieJar {
    jar.add(
        Cookie::build((FLASH_COOKIE, message.as_ref().to_owned()))
            .path("/")
            .http_only(true),
    )
}

/// Take the pending message, if any, and clear the cookie.
pub fn take(jar: CookieJar) -> (CookieJar, Option<String>) {
    let Some(cookie) = jar.get(FLASH_COOKIE) else {
        return (jar, None);
    };

    // The jar percent-decodes on extraction and encodes on response.
    let message = Some(cookie.value().to_owned()).filter(|message| !message.is_empty());

    let jar = jar.remove(Cookie::build((FLASH_COOKIE, "")).path("/"));
    (jar, message)
}
