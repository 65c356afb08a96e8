//! Server-rendered HTML pages.
//!
//! Pages are assembled with `format!`. Every value that came from a user or the
//! database goes through [`escape`] before it is interpolated.

use std::fmt::Write;

use axum::response::Html;
use chrono::{DateTime, Utc};

use crate::entities::artist;
use crate::services::artist::{ArtistDetail, ArtistFields, ArtistShow};
use crate::services::{SearchResults, SubjectSummary};
use crate::services::show::ShowListing;
use crate::services::venue::{VenueArea, VenueDetail, VenueFields, VenueShow};

const START_TIME_FORMAT: &str = "%a %b %-d, %Y %-I:%M%p";

const GENRES: [&str; 19] = [
    "Alternative",
    "Blues",
    "Classical",
    "Country",
    "Electronic",
    "Folk",
    "Funk",
    "Hip-Hop",
    "Heavy Metal",
    "Instrumental",
    "Jazz",
    "Musical Theatre",
    "Pop",
    "Punk",
    "R&B",
    "Reggae",
    "Rock n Roll",
    "Soul",
    "Other",
];

pub fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn format_start_time(start_time: &DateTime<Utc>) -> String {
    start_time.format(START_TIME_FORMAT).to_string()
}

fn layout(title: &str, flash: Option<&str>, body: &str) -> Html<String> {
    let flash = flash
        .map(|message| format!(r#"<p class="flash">{}</p>"#, escape(message)))
        .unwrap_or_default();

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} | Fyyur</title>
    <style>
        body {{ font-family: sans-serif; margin: 0 auto; max-width: 960px; padding: 0 16px; }}
        nav a {{ margin-right: 12px; }}
        .flash {{ background: #eef6ee; border: 1px solid #9c9; padding: 8px; }}
        .muted {{ color: #777; }}
        img.thumb {{ max-height: 64px; }}
        label {{ display: block; margin-top: 8px; }}
    </style>
</head>
<body>
    <nav>
        <a href="/">Fyyur</a>
        <a href="/venues">Venues</a>
        <a href="/artists">Artists</a>
        <a href="/shows">Shows</a>
    </nav>
    {flash}
    <main>
{body}
    </main>
</body>
</html>"#,
        title = escape(title),
    ))
}

fn search_box(action: &str, placeholder: &str) -> String {
    format!(
        r#"<form method="post" action="{action}">
    <input type="search" name="search_term" placeholder="{placeholder}">
    <button type="submit">Search</button>
</form>"#
    )
}

fn optional_row(label: &str, value: Option<&str>) -> String {
    match value {
        Some(value) => format!("<dt>{label}</dt><dd>{}</dd>", escape(value)),
        None => String::new(),
    }
}

fn link_row(label: &str, value: Option<&str>) -> String {
    match value {
        Some(value) => {
            let value = escape(value);
            format!(r#"<dt>{label}</dt><dd><a href="{value}">{value}</a></dd>"#)
        }
        None => String::new(),
    }
}

fn image(link: Option<&str>, alt: &str) -> String {
    match link {
        Some(link) => format!(
            r#"<img class="thumb" src="{}" alt="{}">"#,
            escape(link),
            escape(alt)
        ),
        None => String::new(),
    }
}

fn genre_list(genres: &[String]) -> String {
    if genres.is_empty() {
        return String::new();
    }
    let items: Vec<String> = genres.iter().map(|g| escape(g)).collect();
    format!(r#"<p class="muted">{}</p>"#, items.join(" &middot; "))
}

fn seeking(flag: bool, what: &str, description: Option<&str>) -> String {
    if !flag {
        return format!(r#"<p class="muted">Not currently seeking {what}</p>"#);
    }
    format!(
        "<p><strong>Currently seeking {what}</strong></p>{}",
        description
            .map(|d| format!("<p>{}</p>", escape(d)))
            .unwrap_or_default()
    )
}

fn subject_list(base: &str, subjects: &[SubjectSummary]) -> String {
    let mut html = String::from("<ul>\n");
    for subject in subjects {
        let _ = writeln!(
            html,
            r#"    <li><a href="{base}/{id}">{name}</a> <span class="muted">({count} upcoming)</span></li>"#,
            id = subject.id,
            name = escape(&subject.name),
            count = subject.num_upcoming_shows,
        );
    }
    html.push_str("</ul>");
    html
}

pub fn home(flash: Option<&str>) -> Html<String> {
    layout(
        "Home",
        flash,
        r#"<h1>Fyyur</h1>
<p>Find venues and artists, and book shows between them.</p>
<ul>
    <li><a href="/venues/create">Post a venue</a></li>
    <li><a href="/artists/create">Post an artist</a></li>
    <li><a href="/shows/create">Post a show</a></li>
</ul>"#,
    )
}

pub fn venues(flash: Option<&str>, areas: &[VenueArea]) -> Html<String> {
    let mut body = format!("<h1>Venues</h1>\n{}\n", search_box("/venues/search", "Find a venue"));
    if areas.is_empty() {
        body.push_str(r#"<p class="muted">No venues listed yet.</p>"#);
    }
    for area in areas {
        let _ = write!(
            body,
            "<h2>{}, {}</h2>\n{}\n",
            escape(&area.city),
            escape(&area.state),
            subject_list("/venues", &area.venues)
        );
    }
    layout("Venues", flash, &body)
}

pub fn artists(flash: Option<&str>, artists: &[artist::Model]) -> Html<String> {
    let mut body = format!(
        "<h1>Artists</h1>\n{}\n<ul>\n",
        search_box("/artists/search", "Find an artist")
    );
    for artist in artists {
        let _ = writeln!(
            body,
            r#"    <li><a href="/artists/{}">{}</a></li>"#,
            artist.id,
            escape(&artist.name)
        );
    }
    body.push_str("</ul>");
    layout("Artists", flash, &body)
}

/// Results page shared by venue and artist search; `base` is `/venues` or `/artists`.
pub fn subject_search(
    flash: Option<&str>,
    base: &str,
    search_term: &str,
    results: &SearchResults<SubjectSummary>,
) -> Html<String> {
    let body = format!(
        "<h1>Number of search results for \"{term}\": {count}</h1>\n{search}\n{list}",
        term = escape(search_term),
        count = results.count,
        search = search_box(&format!("{base}/search"), "Search again"),
        list = subject_list(base, &results.data),
    );
    layout("Search", flash, &body)
}

fn venue_shows(title: &str, count: usize, shows: &[VenueShow]) -> String {
    let mut html = format!("<h2>{count} {title}</h2>\n<ul>\n");
    for show in shows {
        let _ = writeln!(
            html,
            r#"    <li>{img} <a href="/artists/{id}">{name}</a> {time}</li>"#,
            img = image(show.artist_image_link.as_deref(), &show.artist_name),
            id = show.artist_id,
            name = escape(&show.artist_name),
            time = format_start_time(&show.start_time),
        );
    }
    html.push_str("</ul>");
    html
}

pub fn venue_detail(flash: Option<&str>, detail: &VenueDetail) -> Html<String> {
    let venue = &detail.venue;
    let body = format!(
        r#"<h1>{name}</h1>
<p class="muted">ID: {id}</p>
{genres}
{image}
<dl>
<dt>Location</dt><dd>{city}, {state}</dd>
{address}{phone}{website}{facebook}
</dl>
{seeking}
{past}
{upcoming}
<p><a href="/venues/{id}/edit">Edit</a></p>
<form method="post" action="/venues/{id}">
    <button type="submit">Delete</button>
</form>"#,
        name = escape(&venue.name),
        id = venue.id,
        genres = genre_list(&venue.genres.0),
        image = image(venue.image_link.as_deref(), &venue.name),
        city = escape(&venue.city),
        state = escape(&venue.state),
        address = optional_row("Address", venue.address.as_deref()),
        phone = optional_row("Phone", venue.phone.as_deref()),
        website = link_row("Website", venue.website.as_deref()),
        facebook = link_row("Facebook", venue.facebook_link.as_deref()),
        seeking = seeking(
            venue.seeking_talent,
            "talent",
            venue.seeking_description.as_deref()
        ),
        past = venue_shows("Past Shows", detail.shows.past_count(), &detail.shows.past),
        upcoming = venue_shows(
            "Upcoming Shows",
            detail.shows.upcoming_count(),
            &detail.shows.upcoming
        ),
    );
    layout(&venue.name, flash, &body)
}

fn artist_shows(title: &str, count: usize, shows: &[ArtistShow]) -> String {
    let mut html = format!("<h2>{count} {title}</h2>\n<ul>\n");
    for show in shows {
        let _ = writeln!(
            html,
            r#"    <li>{img} <a href="/venues/{id}">{name}</a> {time}</li>"#,
            img = image(show.venue_image_link.as_deref(), &show.venue_name),
            id = show.venue_id,
            name = escape(&show.venue_name),
            time = format_start_time(&show.start_time),
        );
    }
    html.push_str("</ul>");
    html
}

pub fn artist_detail(flash: Option<&str>, detail: &ArtistDetail) -> Html<String> {
    let artist = &detail.artist;
    let body = format!(
        r#"<h1>{name}</h1>
<p class="muted">ID: {id}</p>
{genres}
{image}
<dl>
<dt>Location</dt><dd>{city}, {state}</dd>
{phone}{website}{facebook}
</dl>
{seeking}
{past}
{upcoming}
<p><a href="/artists/{id}/edit">Edit</a></p>
<form method="post" action="/artists/{id}">
    <button type="submit">Delete</button>
</form>"#,
        name = escape(&artist.name),
        id = artist.id,
        genres = genre_list(&artist.genres.0),
        image = image(artist.image_link.as_deref(), &artist.name),
        city = escape(&artist.city),
        state = escape(&artist.state),
        phone = optional_row("Phone", artist.phone.as_deref()),
        website = link_row("Website", artist.website.as_deref()),
        facebook = link_row("Facebook", artist.facebook_link.as_deref()),
        seeking = seeking(
            artist.seeking_venue,
            "performance venues",
            artist.seeking_description.as_deref()
        ),
        past = artist_shows("Past Shows", detail.shows.past_count(), &detail.shows.past),
        upcoming = artist_shows(
            "Upcoming Shows",
            detail.shows.upcoming_count(),
            &detail.shows.upcoming
        ),
    );
    layout(&artist.name, flash, &body)
}

fn show_list(shows: &[ShowListing]) -> String {
    let mut html = String::from("<ul>\n");
    for show in shows {
        let _ = writeln!(
            html,
            r#"    <li>{time}: {img} <a href="/artists/{artist_id}">{artist}</a> at <a href="/venues/{venue_id}">{venue}</a></li>"#,
            time = format_start_time(&show.start_time),
            img = image(show.artist_image_link.as_deref(), &show.artist_name),
            artist_id = show.artist_id,
            artist = escape(&show.artist_name),
            venue_id = show.venue_id,
            venue = escape(&show.venue_name),
        );
    }
    html.push_str("</ul>");
    html
}

pub fn shows(flash: Option<&str>, shows: &[ShowListing]) -> Html<String> {
    let body = format!(
        "<h1>Shows</h1>\n{}\n{}",
        search_box("/shows/search", "Find a show by artist or venue"),
        show_list(shows)
    );
    layout("Shows", flash, &body)
}

pub fn show_search(
    flash: Option<&str>,
    search_term: &str,
    results: &SearchResults<ShowListing>,
) -> Html<String> {
    let body = format!(
        "<h1>Number of search results for \"{}\": {}</h1>\n{}\n{}",
        escape(search_term),
        results.count,
        search_box("/shows/search", "Search again"),
        show_list(&results.data)
    );
    layout("Search", flash, &body)
}

fn text_input(name: &str, label: &str, value: Option<&str>, required: bool) -> String {
    format!(
        r#"<label for="{name}">{label}</label>
<input type="text" id="{name}" name="{name}" value="{value}"{required}>"#,
        value = value.map(escape).unwrap_or_default(),
        required = if required { " required" } else { "" },
    )
}

fn genre_select(selected: &[String]) -> String {
    let mut html = String::from(
        r#"<label for="genres">Genres</label>
<select id="genres" name="genres" multiple>
"#,
    );
    let extra = selected
        .iter()
        .filter(|g| !GENRES.contains(&g.as_str()))
        .map(String::as_str);
    for genre in GENRES.iter().copied().chain(extra) {
        let is_selected = selected.iter().any(|g| g == genre);
        let _ = writeln!(
            html,
            r#"    <option value="{value}"{selected}>{value}</option>"#,
            value = escape(genre),
            selected = if is_selected { " selected" } else { "" },
        );
    }
    html.push_str("</select>");
    html
}

fn checkbox(name: &str, label: &str, checked: bool) -> String {
    format!(
        r#"<label><input type="checkbox" name="{name}" value="y"{checked}> {label}</label>"#,
        checked = if checked { " checked" } else { "" },
    )
}

/// New-venue form when `existing` is `None`, otherwise the edit form for venue `id`.
pub fn venue_form(flash: Option<&str>, existing: Option<(i64, &VenueFields)>) -> Html<String> {
    let (title, action) = match existing {
        Some((id, _)) => ("Edit venue".to_string(), format!("/venues/{id}/edit")),
        None => ("List a new venue".to_string(), "/venues/create".to_string()),
    };
    let fields = existing.map(|(_, fields)| fields);

    let body = format!(
        r#"<h1>{title}</h1>
<form method="post" action="{action}">
{name}
{city}
{state}
{address}
{phone}
{image_link}
{facebook_link}
{website}
{genres}
{seeking_talent}
{seeking_description}
<p><button type="submit">Save</button></p>
</form>"#,
        name = text_input("name", "Name", fields.map(|f| f.name.as_str()), true),
        city = text_input("city", "City", fields.map(|f| f.city.as_str()), true),
        state = text_input("state", "State", fields.map(|f| f.state.as_str()), true),
        address = text_input(
            "address",
            "Address",
            fields.and_then(|f| f.address.as_deref()),
            true
        ),
        phone = text_input("phone", "Phone", fields.and_then(|f| f.phone.as_deref()), false),
        image_link = text_input(
            "image_link",
            "Image link",
            fields.and_then(|f| f.image_link.as_deref()),
            false
        ),
        facebook_link = text_input(
            "facebook_link",
            "Facebook link",
            fields.and_then(|f| f.facebook_link.as_deref()),
            false
        ),
        website = text_input(
            "website",
            "Website",
            fields.and_then(|f| f.website.as_deref()),
            false
        ),
        genres = genre_select(fields.map(|f| f.genres.as_slice()).unwrap_or_default()),
        seeking_talent = checkbox(
            "seeking_talent",
            "Seeking talent",
            fields.is_some_and(|f| f.seeking_talent)
        ),
        seeking_description = text_input(
            "seeking_description",
            "Seeking description",
            fields.and_then(|f| f.seeking_description.as_deref()),
            false
        ),
    );
    layout(&title, flash, &body)
}

/// New-artist form when `existing` is `None`, otherwise the edit form for artist `id`.
pub fn artist_form(flash: Option<&str>, existing: Option<(i64, &ArtistFields)>) -> Html<String> {
    let (title, action) = match existing {
        Some((id, _)) => ("Edit artist".to_string(), format!("/artists/{id}/edit")),
        None => ("List a new artist".to_string(), "/artists/create".to_string()),
    };
    let fields = existing.map(|(_, fields)| fields);

    let body = format!(
        r#"<h1>{title}</h1>
<form method="post" action="{action}">
{name}
{city}
{state}
{phone}
{image_link}
{facebook_link}
{website}
{genres}
{seeking_venue}
{seeking_description}
<p><button type="submit">Save</button></p>
</form>"#,
        name = text_input("name", "Name", fields.map(|f| f.name.as_str()), true),
        city = text_input("city", "City", fields.map(|f| f.city.as_str()), true),
        state = text_input("state", "State", fields.map(|f| f.state.as_str()), true),
        phone = text_input("phone", "Phone", fields.and_then(|f| f.phone.as_deref()), false),
        image_link = text_input(
            "image_link",
            "Image link",
            fields.and_then(|f| f.image_link.as_deref()),
            false
        ),
        facebook_link = text_input(
            "facebook_link",
            "Facebook link",
            fields.and_then(|f| f.facebook_link.as_deref()),
            false
        ),
        website = text_input(
            "website",
            "Website",
            fields.and_then(|f| f.website.as_deref()),
            false
        ),
        genres = genre_select(fields.map(|f| f.genres.as_slice()).unwrap_or_default()),
        seeking_venue = checkbox(
            "seeking_venue",
            "Seeking venues",
            fields.is_some_and(|f| f.seeking_venue)
        ),
        seeking_description = text_input(
            "seeking_description",
            "Seeking description",
            fields.and_then(|f| f.seeking_description.as_deref()),
            false
        ),
    );
    layout(&title, flash, &body)
}

pub fn show_form(flash: Option<&str>) -> Html<String> {
    let body = format!(
        r#"<h1>List a new show</h1>
<form method="post" action="/shows/create">
{artist_id}
{venue_id}
<label for="start_time">Start time</label>
<input type="datetime-local" id="start_time" name="start_time" required>
<p><button type="submit">Save</button></p>
</form>"#,
        artist_id = text_input("artist_id", "Artist ID", None, true),
        venue_id = text_input("venue_id", "Venue ID", None, true),
    );
    layout("New show", flash, &body)
}

pub fn not_found() -> Html<String> {
    layout(
        "Not found",
        None,
        r#"<h1>404</h1>
<p>Sorry, the page you were looking for does not exist.</p>
<p><a href="/">Back home</a></p>"#,
    )
}

pub fn server_error() -> Html<String> {
    layout(
        "Server error",
        None,
        r#"<h1>500</h1>
<p>Something went wrong. Please try again later.</p>
<p><a href="/">Back home</a></p>"#,
    )
}
