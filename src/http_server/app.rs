use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use color_eyre::eyre::{Context, eyre};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::{
    database::Database,
    http_server::{
        routes::{self, artists, shows, venues},
        state::AppState,
    },
};

pub fn build_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::home))
        .route("/venues", get(venues::list))
        .route("/venues/search", post(venues::search))
        .route("/venues/create", get(venues::new_form).post(venues::create))
        .route("/venues/{id}", get(venues::detail).post(venues::delete))
        .route(
            "/venues/{id}/edit",
            get(venues::edit_form).post(venues::update),
        )
        .route("/artists", get(artists::list))
        .route("/artists/search", post(artists::search))
        .route(
            "/artists/create",
            get(artists::new_form).post(artists::create),
        )
        .route("/artists/{id}", get(artists::detail).post(artists::delete))
        .route(
            "/artists/{id}/edit",
            get(artists::edit_form).post(artists::update),
        )
        .route("/shows", get(shows::list))
        .route("/shows/search", post(shows::search))
        .route("/shows/create", get(shows::new_form).post(shows::create))
        .fallback(routes::not_found)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(app_state)
}

pub async fn start(port: u16, database: Database) -> color_eyre::Result<()> {
    let app_state = Arc::new(AppState::new(Arc::new(database)));
    let app = build_router(app_state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .wrap_err_with(|| eyre!("Failed to bind to port {}", port))?;
    log::info!("Fyyur listening on http://0.0.0.0:{}", port);

    axum::serve(listener, app)
        .await
        .wrap_err("Failed to start HTTP server")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
        response::Response,
    };
    use chrono::Utc;
    use sea_orm::EntityTrait;
    use tower::ServiceExt;

    use super::*;
    use crate::entities::{artist, show, venue};
    use crate::services::venue::VenueService;
    use crate::test_utils::{hours_from, insert_artist, insert_show, insert_venue, test_db};

    async fn app() -> (Router, Arc<Database>) {
        let db = test_db().await;
        (build_router(Arc::new(AppState::new(db.clone()))), db)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn form_request(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn location(response: &Response) -> &str {
        response
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap()
    }

    /// The decoded flash message a response queued, if any.
    fn flash_cookie(response: &Response) -> Option<String> {
        response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(|value| value.strip_prefix("flash="))
            .map(|value| value.split(';').next().unwrap_or_default())
            .filter(|value| !value.is_empty())
            .map(|value| urlencoding::decode(value).unwrap().into_owned())
    }

    #[tokio::test]
    async fn test_home_page() {
        let (app, _) = app().await;
        let response = app.oneshot(get_request("/")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("<h1>Fyyur</h1>"));
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let (app, _) = app().await;
        let response = app.oneshot(get_request("/nowhere")).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("<h1>404</h1>"));
    }

    #[tokio::test]
    async fn test_missing_venue_and_artist_are_404() {
        let (app, _) = app().await;

        for uri in ["/venues/42", "/venues/42/edit", "/artists/42", "/artists/42/edit"] {
            let response = app.clone().oneshot(get_request(uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_create_venue_redirects_home_with_flash() {
        let (app, db) = app().await;
        let body = "name=The+Musical+Hop&city=San+Francisco&state=CA\
            &address=1015+Folsom+Street&phone=123-123-1234\
            &genres=Jazz&genres=Reggae&genres=Swing&seeking_talent=y\
            &seeking_description=We+are+on+the+lookout";

        let response = app
            .oneshot(form_request("/venues/create", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
        assert_eq!(
            flash_cookie(&response).as_deref(),
            Some("Venue The Musical Hop was successfully listed!")
        );

        let venues = venue::Entity::find().all(&db.conn).await.unwrap();
        assert_eq!(venues.len(), 1);
        assert_eq!(venues[0].genres.0, vec!["Jazz", "Reggae", "Swing"]);
        assert!(venues[0].seeking_talent);
        assert_eq!(venues[0].website, None);
    }

    #[tokio::test]
    async fn test_create_venue_missing_required_field_writes_nothing() {
        let (app, db) = app().await;
        let body = "name=The+Musical+Hop&city=San+Francisco&state=CA";

        let response = app
            .oneshot(form_request("/venues/create", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            flash_cookie(&response).as_deref(),
            Some("An error occurred. Venue The Musical Hop could not be listed.")
        );
        assert!(venue::Entity::find().all(&db.conn).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_flash_is_rendered_once_and_cleared() {
        let (app, _) = app().await;
        let request = Request::builder()
            .uri("/")
            .header(header::COOKIE, "flash=Show%20was%20successfully%20listed%21")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        // Removal cookie with an empty value
        assert_eq!(flash_cookie(&response), None);
        assert!(
            response
                .headers()
                .get_all(header::SET_COOKIE)
                .iter()
                .any(|v| v.to_str().unwrap().starts_with("flash=;"))
        );
        assert!(
            body_text(response)
                .await
                .contains("Show was successfully listed!")
        );
    }

    #[tokio::test]
    async fn test_venue_detail_lists_upcoming_show() {
        let (app, db) = app().await;
        let venue_id = insert_venue(&db, "The Musical Hop", "San Francisco", "CA").await;
        let artist_id = insert_artist(&db, "Guns N Petals").await;
        insert_show(&db, artist_id, venue_id, hours_from(Utc::now(), 48)).await;

        let response = app
            .oneshot(get_request(&format!("/venues/{venue_id}")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let page = body_text(response).await;
        assert!(page.contains("1 Upcoming Shows"));
        assert!(page.contains("0 Past Shows"));
        assert!(page.contains("Guns N Petals"));
    }

    #[tokio::test]
    async fn test_venue_page_escapes_names() {
        let (app, db) = app().await;
        let venue_id = insert_venue(&db, "<script>alert(1)</script>", "Oakland", "CA").await;

        let page = body_text(
            app.clone()
                .oneshot(get_request(&format!("/venues/{venue_id}")))
                .await
                .unwrap(),
        )
        .await;
        assert!(page.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!page.contains("<script>alert(1)</script>"));

        let page = body_text(app.oneshot(get_request("/venues")).await.unwrap()).await;
        assert!(page.contains("<h2>Oakland, CA</h2>"));
        assert!(!page.contains("<script>"));
    }

    #[tokio::test]
    async fn test_search_venues_and_artists() {
        let (app, db) = app().await;
        insert_venue(&db, "The Musical Hop", "San Francisco", "CA").await;
        insert_venue(&db, "Park Square Live Music & Coffee", "San Francisco", "CA").await;
        insert_artist(&db, "Guns N Petals").await;

        let page = body_text(
            app.clone()
                .oneshot(form_request("/venues/search", "search_term=Music"))
                .await
                .unwrap(),
        )
        .await;
        assert!(page.contains(r#"Number of search results for "Music": 2"#));

        let page = body_text(
            app.oneshot(form_request("/artists/search", "search_term=guns"))
                .await
                .unwrap(),
        )
        .await;
        assert!(page.contains(r#"Number of search results for "guns": 1"#));
        assert!(page.contains("Guns N Petals"));
    }

    #[tokio::test]
    async fn test_update_venue_overwrites_fields() {
        let (app, db) = app().await;
        let venue_id = insert_venue(&db, "The Musical Hop", "San Francisco", "CA").await;
        let body = "name=The+Dueling+Pianos+Bar&city=New+York&state=NY&address=335+Delancey+Street";

        let response = app
            .oneshot(form_request(&format!("/venues/{venue_id}/edit"), body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), format!("/venues/{venue_id}"));
        assert_eq!(
            flash_cookie(&response).as_deref(),
            Some("Venue The Dueling Pianos Bar was successfully updated!")
        );

        let stored = VenueService::new(db).get(venue_id).await.unwrap().unwrap();
        assert_eq!(stored.name, "The Dueling Pianos Bar");
        assert_eq!(stored.city, "New York");
        assert_eq!(stored.phone, None);
        assert!(stored.genres.0.is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_artist_is_404() {
        let (app, _) = app().await;
        let body = "name=Nobody&city=Nowhere&state=NV";

        let response = app
            .oneshot(form_request("/artists/42/edit", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_venue_cascades_to_shows() {
        let (app, db) = app().await;
        let venue_id = insert_venue(&db, "The Musical Hop", "San Francisco", "CA").await;
        let artist_id = insert_artist(&db, "Guns N Petals").await;
        insert_show(&db, artist_id, venue_id, hours_from(Utc::now(), 5)).await;

        let response = app
            .oneshot(form_request(&format!("/venues/{venue_id}"), ""))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/venues");
        assert_eq!(
            flash_cookie(&response).as_deref(),
            Some("Venue The Musical Hop was successfully deleted!")
        );
        assert!(show::Entity::find().all(&db.conn).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_artist_flashes_error() {
        let (app, _) = app().await;

        let response = app
            .oneshot(form_request("/artists/42", ""))
            .await
            .unwrap();

        assert_eq!(location(&response), "/artists");
        assert_eq!(
            flash_cookie(&response).as_deref(),
            Some("An error occurred. This artist could not be deleted.")
        );

        // Encoded once by the cookie jar, never twice
        let raw = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find(|value| value.starts_with("flash="))
            .unwrap();
        assert!(raw.starts_with("flash=An%20error%20occurred."), "{raw}");
        assert!(!raw.contains("%25"), "{raw}");
    }

    #[tokio::test]
    async fn test_create_artist_stores_fields_as_submitted() {
        let (app, db) = app().await;
        let body = "name=++Guns+N+Petals+&city=San+Francisco&state=CA&phone=+555+\
            &genres=Rock+n+Roll&facebook_link=&seeking_venue=y";

        let response = app
            .oneshot(form_request("/artists/create", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
        assert_eq!(
            flash_cookie(&response).as_deref(),
            Some("Artist   Guns N Petals  was successfully listed!")
        );

        let artists = artist::Entity::find().all(&db.conn).await.unwrap();
        assert_eq!(artists.len(), 1);
        assert_eq!(artists[0].name, "  Guns N Petals ");
        assert_eq!(artists[0].phone.as_deref(), Some(" 555 "));
        assert_eq!(artists[0].facebook_link, None);
        assert_eq!(artists[0].genres.0, vec!["Rock n Roll"]);
        assert!(artists[0].seeking_venue);
    }

    #[tokio::test]
    async fn test_create_show_then_list() {
        let (app, db) = app().await;
        let venue_id = insert_venue(&db, "The Musical Hop", "San Francisco", "CA").await;
        let artist_id = insert_artist(&db, "Guns N Petals").await;
        let body = format!(
            "artist_id={artist_id}&venue_id={venue_id}&start_time=2035-04-01T20%3A00"
        );

        let response = app
            .clone()
            .oneshot(form_request("/shows/create", &body))
            .await
            .unwrap();
        assert_eq!(
            flash_cookie(&response).as_deref(),
            Some("Show was successfully listed!")
        );

        let page = body_text(app.oneshot(get_request("/shows")).await.unwrap()).await;
        assert!(page.contains("Sun Apr 1, 2035 8:00PM"));
        assert!(page.contains("Guns N Petals"));
        assert!(page.contains("The Musical Hop"));
    }

    #[tokio::test]
    async fn test_create_show_with_missing_artist_writes_nothing() {
        let (app, db) = app().await;
        let venue_id = insert_venue(&db, "The Musical Hop", "San Francisco", "CA").await;
        let body = format!("artist_id=999&venue_id={venue_id}&start_time=2035-04-01+20%3A00");

        let response = app
            .oneshot(form_request("/shows/create", &body))
            .await
            .unwrap();

        assert_eq!(
            flash_cookie(&response).as_deref(),
            Some("An error occurred. Show could not be listed.")
        );
        assert!(show::Entity::find().all(&db.conn).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_shows_by_venue_name() {
        let (app, db) = app().await;
        let hop = insert_venue(&db, "The Musical Hop", "San Francisco", "CA").await;
        let pianos = insert_venue(&db, "The Dueling Pianos Bar", "New York", "NY").await;
        let artist_id = insert_artist(&db, "Guns N Petals").await;
        insert_show(&db, artist_id, hop, hours_from(Utc::now(), 1)).await;
        insert_show(&db, artist_id, pianos, hours_from(Utc::now(), 2)).await;

        let page = body_text(
            app.oneshot(form_request("/shows/search", "search_term=pianos"))
                .await
                .unwrap(),
        )
        .await;

        assert!(page.contains(r#"Number of search results for "pianos": 1"#));
        assert!(page.contains("The Dueling Pianos Bar"));
        assert!(!page.contains("The Musical Hop"));
    }
}
