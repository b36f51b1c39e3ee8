//! HTTP route handlers.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use askama::Template;
use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tracing::{error, warn};

use crate::cache::query_key;
use crate::feed::Snapshot;
use crate::prefs::PreferenceError;
use crate::pricing::{fuel_statistics, summarize};
use crate::query::{QueryEngine, QueryRequest};

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Preference key holding the colour theme.
const THEME_KEY: &str = "theme";

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/about", get(about_page))
        .route("/api/stations", get(list_stations))
        .route("/api/stations/query", post(query_stations))
        .route("/api/stations/:id", get(get_station))
        .route("/api/regions", get(list_regions))
        .route("/api/brands", get(list_brands))
        .route("/api/stats", get(stats))
        .route("/api/preferences", get(list_preferences))
        .route(
            "/api/preferences/:key",
            get(get_preference)
                .put(put_preference)
                .delete(delete_preference),
        )
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(not_found)
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Check if request accepts HTML.
fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

fn render<T: Template>(template: &T) -> Result<Html<String>, AppError> {
    template.render().map(Html).map_err(|e| AppError::Internal {
        message: format!("Template error: {}", e),
    })
}

async fn theme(state: &AppState) -> String {
    state
        .prefs
        .get(THEME_KEY)
        .await
        .filter(|t| t == "dark")
        .unwrap_or_else(|| "light".to_string())
}

/// Run a query against the current snapshot, going through the page cache.
async fn run_query(
    state: &AppState,
    snapshot: &Snapshot,
    request: QueryRequest,
) -> Arc<StationsResponse> {
    let key = query_key(snapshot.generation, &request);
    let classifier = Arc::clone(&state.classifier);
    let stations = Arc::clone(&snapshot.stations);

    state
        .query_cache
        .get_or_compute(key, move || {
            let engine = QueryEngine::new(&classifier);
            let page = engine.query(&stations, &request);
            StationsResponse::from_page(&page, &request.filter)
        })
        .await
}

fn request_from_query(state: &AppState, query: &StationsQuery) -> Result<QueryRequest, AppError> {
    let location = query
        .user_location()
        .map_err(|message| AppError::BadRequest { message })?;

    Ok(QueryRequest::new(query.filter())
        .with_page(query.page())
        .with_page_size(state.page_size)
        .with_user_location(location))
}

/// Region summaries with live station counts, unclassified last.
fn region_summaries(state: &AppState, snapshot: &Snapshot) -> Vec<RegionSummary> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for station in snapshot.stations.iter() {
        let region = state.classifier.classify_station(station);
        *counts.entry(region.id.as_str()).or_default() += 1;
    }

    state
        .classifier
        .regions()
        .iter()
        .chain(std::iter::once(state.classifier.unclassified()))
        .map(|r| RegionSummary {
            id: r.id.clone(),
            name: r.name.clone(),
            description: r.description.clone(),
            color: r.color.clone(),
            station_count: counts.get(r.id.as_str()).copied().unwrap_or(0),
        })
        .collect()
}

/// Distinct brands, deduplicated and sorted case-insensitively.
///
/// The first spelling seen for a brand is the one returned.
fn distinct_brands(snapshot: &Snapshot) -> Vec<String> {
    let mut brands: BTreeMap<String, String> = BTreeMap::new();
    for brand in snapshot.stations.iter().filter_map(|s| s.brand.as_deref()) {
        let brand = brand.trim();
        if brand.is_empty() {
            continue;
        }
        brands
            .entry(brand.to_lowercase())
            .or_insert_with(|| brand.to_string());
    }
    brands.into_values().collect()
}

fn cards(response: &StationsResponse, prefs: &BTreeMap<String, String>) -> Vec<StationCardView> {
    response
        .stations
        .iter()
        .map(|s| StationCardView::from_view(s, prefs))
        .collect()
}

/// Index page with filter form and the first page of results.
async fn index_page(
    State(state): State<AppState>,
    Query(query): Query<StationsQuery>,
) -> Result<Html<String>, AppError> {
    // The form never shows an error for a bad location; it just drops it
    let request = match request_from_query(&state, &query) {
        Ok(request) => request,
        Err(_) => QueryRequest::new(query.filter())
            .with_page(query.page())
            .with_page_size(state.page_size),
    };

    let snapshot = state.directory.snapshot().await;
    let prefs = state.prefs.all().await;
    let response = run_query(&state, &snapshot, request).await;
    let filter = &response.filter;

    let template = IndexTemplate {
        theme: theme(&state).await,
        search: query.search.clone().unwrap_or_default(),
        min_price: query.min_price.clone().unwrap_or_default(),
        max_price: query.max_price.clone().unwrap_or_default(),
        fuels: fuel_options(filter.fuel_type.as_ref()),
        brands: brand_options(&distinct_brands(&snapshot), filter.brand.as_deref()),
        regions: region_options(&region_summaries(&state, &snapshot), filter.region.as_deref()),
        sorts: sort_options(filter.sort_by),
        stations: cards(&response, &prefs),
        pagination: PaginationView::from(&response.pagination),
    };

    render(&template)
}

/// About page.
async fn about_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let snapshot = state.directory.snapshot().await;
    render(&AboutTemplate {
        theme: theme(&state).await,
        regions: region_summaries(&state, &snapshot),
    })
}

/// Filtered, sorted, paginated station list.
///
/// Returns an HTML fragment for `Accept: text/html`, JSON otherwise.
async fn list_stations(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<StationsQuery>,
) -> Result<Response, AppError> {
    let request = request_from_query(&state, &query)?;
    let snapshot = state.directory.snapshot().await;
    let response = run_query(&state, &snapshot, request).await;

    if accepts_html(&headers) {
        let prefs = state.prefs.all().await;
        let template = StationListTemplate {
            stations: cards(&response, &prefs),
            pagination: PaginationView::from(&response.pagination),
        };
        Ok(render(&template)?.into_response())
    } else {
        Ok(Json(response.as_ref().clone()).into_response())
    }
}

/// Structured query with a JSON filter body.
async fn query_stations(
    State(state): State<AppState>,
    payload: Result<Json<QueryBody>, JsonRejection>,
) -> Result<Json<StationsResponse>, AppError> {
    let Json(body) = payload?;
    let request = QueryRequest::new(body.filter)
        .with_page(body.page.unwrap_or(1))
        .with_page_size(state.page_size)
        .with_user_location(body.user_location);

    let snapshot = state.directory.snapshot().await;
    let response = run_query(&state, &snapshot, request).await;
    Ok(Json(response.as_ref().clone()))
}

/// One station with its derived values.
async fn get_station(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StationView>, AppError> {
    let snapshot = state.directory.snapshot().await;
    let station = snapshot
        .stations
        .iter()
        .find(|s| s.id == id)
        .ok_or_else(|| AppError::NotFound {
            message: format!("Station {id} not found"),
        })?;

    let engine = QueryEngine::new(&state.classifier);
    Ok(Json(StationView::from_match(&engine.annotate(station, None))))
}

async fn list_regions(State(state): State<AppState>) -> Json<RegionsResponse> {
    let snapshot = state.directory.snapshot().await;
    Json(RegionsResponse {
        regions: region_summaries(&state, &snapshot),
    })
}

async fn list_brands(State(state): State<AppState>) -> Json<BrandsResponse> {
    let snapshot = state.directory.snapshot().await;
    Json(BrandsResponse {
        brands: distinct_brands(&snapshot),
    })
}

/// Per-fuel market statistics over every station.
async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let snapshot = state.directory.snapshot().await;
    let priced_station_count = snapshot
        .stations
        .iter()
        .filter(|s| summarize(&s.fuel_prices).best.is_some())
        .count();

    Json(StatsResponse {
        station_count: snapshot.stations.len(),
        priced_station_count,
        fuels: fuel_statistics(&snapshot.stations),
        generation: snapshot.generation,
        loaded_at: snapshot.loaded_at,
        cached_pages: state.query_cache.entry_count(),
    })
}

async fn list_preferences(State(state): State<AppState>) -> Json<PreferencesResponse> {
    Json(PreferencesResponse {
        preferences: state.prefs.all().await,
    })
}

async fn get_preference(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<PreferenceResponse>, AppError> {
    let value = state
        .prefs
        .get(&key)
        .await
        .ok_or_else(|| AppError::NotFound {
            message: format!("Preference {key} not set"),
        })?;

    Ok(Json(PreferenceResponse { key, value }))
}

async fn put_preference(
    State(state): State<AppState>,
    Path(key): Path<String>,
    payload: Result<Json<PreferenceBody>, JsonRejection>,
) -> Result<Json<PreferenceResponse>, AppError> {
    let Json(body) = payload?;
    state.prefs.set(&key, body.value.clone()).await?;
    Ok(Json(PreferenceResponse {
        key,
        value: body.value,
    }))
}

async fn delete_preference(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<StatusCode, AppError> {
    match state.prefs.remove(&key).await? {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => Err(AppError::NotFound {
            message: format!("Preference {key} not set"),
        }),
    }
}

/// Unknown routes: an HTML error page for browsers, JSON for everyone else.
async fn not_found(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if accepts_html(&headers) {
        let template = ErrorTemplate {
            theme: theme(&state).await,
            title: "Not found".to_string(),
            message: "There is nothing at this address.".to_string(),
        };
        match render(&template) {
            Ok(html) => (StatusCode::NOT_FOUND, html).into_response(),
            Err(e) => e.into_response(),
        }
    } else {
        AppError::NotFound {
            message: "Not found".to_string(),
        }
        .into_response()
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<PreferenceError> for AppError {
    fn from(e: PreferenceError) -> Self {
        match e {
            PreferenceError::InvalidKey { .. } => AppError::BadRequest {
                message: e.to_string(),
            },
            _ => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest {
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(status = status.as_u16(), %message, "request failed");
        } else {
            warn!(status = status.as_u16(), %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheConfig;
    use crate::domain::{Coordinates, FuelPriceEntry, FuelType, Station};
    use crate::feed::{FeedSource, StationDirectory};
    use crate::prefs::PreferenceStore;
    use crate::regions::melbourne_regions;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use serde_json::{Value, json};
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn station(
        id: &str,
        name: &str,
        brand: &str,
        at: (f64, f64),
        prices: &[(FuelType, f64)],
    ) -> Station {
        let mut s = Station::new(id, name);
        s.brand = Some(brand.to_string());
        s.location = Coordinates::new(at.0, at.1).ok();
        s.fuel_prices = prices
            .iter()
            .map(|(f, p)| FuelPriceEntry::new(f.clone(), Some(*p)))
            .collect();
        s
    }

    fn stations() -> Vec<Station> {
        vec![
            station(
                "1",
                "Shell CBD",
                "Shell",
                (-37.8170, 144.9670),
                &[(FuelType::Unleaded, 185.9), (FuelType::Diesel, 190.0)],
            ),
            station(
                "2",
                "BP Yarra",
                "BP",
                (-37.8230, 145.0010),
                &[(FuelType::Diesel, 176.8)],
            ),
            station(
                "3",
                "7-Eleven Coburg",
                "7-Eleven",
                (-37.7440, 144.9660),
                &[(FuelType::Unleaded, 172.5)],
            ),
            station("4", "Shell Sunshine", "shell", (-37.7880, 144.8320), &[]),
        ]
    }

    async fn app() -> (Router, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let directory =
            StationDirectory::empty(FeedSource::Fixture(dir.path().join("unused.json")), None);
        directory.replace(stations()).await;

        let prefs = PreferenceStore::open(dir.path().join("prefs.json"))
            .await
            .unwrap();
        let state = AppState::new(directory, melbourne_regions(), &CacheConfig::default(), prefs)
            .with_page_size(2);

        (create_router(state, "static"), dir)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
        let (status, body) = send(app, Request::get(uri).body(Body::empty()).unwrap()).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn ids(body: &Value) -> Vec<&str> {
        body["stations"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["id"].as_str().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn health_check() {
        let (app, _dir) = app().await;
        let (status, body) = send(&app, Request::get("/health").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"ok");
    }

    #[tokio::test]
    async fn default_listing_is_name_sorted_and_paged() {
        let (app, _dir) = app().await;
        let (status, body) = get_json(&app, "/api/stations").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&body), vec!["3", "2"]);
        assert_eq!(body["pagination"]["totalCount"], 4);
        assert_eq!(body["pagination"]["totalPages"], 2);

        let (_, page2) = get_json(&app, "/api/stations?page=2").await;
        assert_eq!(ids(&page2), vec!["1", "4"]);

        let (_, clamped) = get_json(&app, "/api/stations?page=99").await;
        assert_eq!(clamped["pagination"]["currentPage"], 2);
    }

    #[tokio::test]
    async fn diesel_price_low() {
        let (app, _dir) = app().await;
        let (_, body) = get_json(&app, "/api/stations?fuelType=diesel&sortBy=price-low").await;

        assert_eq!(ids(&body), vec!["2", "1"]);
        assert_eq!(body["stations"][0]["region"]["id"], "eastern");
        assert_eq!(body["stations"][1]["region"]["id"], "cbd");
        assert_eq!(body["filter"]["fuelType"], "diesel");
    }

    #[tokio::test]
    async fn distance_sort_with_location() {
        let (app, _dir) = app().await;
        let (_, body) =
            get_json(&app, "/api/stations?sortBy=distance&lat=-37.745&lng=144.966").await;

        assert_eq!(ids(&body), vec!["3", "1"]);
        assert!(body["stations"][0]["distanceKm"].as_f64().unwrap() < 1.0);
    }

    #[tokio::test]
    async fn bad_location_is_rejected() {
        let (app, _dir) = app().await;
        let (status, body) = get_json(&app, "/api/stations?lat=-37.8").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("together"));
    }

    #[tokio::test]
    async fn html_fragment_for_browsers() {
        let (app, _dir) = app().await;
        let request = Request::get("/api/stations?search=coburg")
            .header(header::ACCEPT, "text/html")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, request).await;
        let html = String::from_utf8(body).unwrap();

        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("7-Eleven Coburg"));
        assert!(!html.contains("BP Yarra"));
    }

    #[tokio::test]
    async fn post_query() {
        let (app, _dir) = app().await;
        let request = Request::post("/api/stations/query")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({"filter": {"brand": "shell", "priceRange": {"min": "180"}}}).to_string(),
            ))
            .unwrap();
        let (status, body) = send(&app, request).await;
        let body: Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&body), vec!["1"]);
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn post_query_with_non_string_sort_uses_name_order() {
        let (app, _dir) = app().await;
        let request = post_json(
            "/api/stations/query",
            json!({"filter": {"fuelType": "diesel", "sortBy": 5}}),
        );
        let (status, body) = send(&app, request).await;
        let body: Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&body), vec!["2", "1"]);
        assert_eq!(body["filter"]["sortBy"], "name");
    }

    #[tokio::test]
    async fn malformed_query_body_is_a_json_bad_request() {
        let (app, _dir) = app().await;

        for bad in [
            json!({"page": -1}),
            json!({"userLocation": {"lat": 0.0, "lng": 0.0}}),
        ] {
            let (status, body) = send(&app, post_json("/api/stations/query", bad.clone())).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body: {bad}");
            let body: Value = serde_json::from_slice(&body).unwrap();
            assert!(body["error"].is_string(), "body: {bad}");
        }

        let request = Request::post("/api/stations/query")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn malformed_preference_body_is_a_json_bad_request() {
        let (app, _dir) = app().await;
        let request = Request::put("/api/preferences/theme")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"colour": "dark"}).to_string()))
            .unwrap();
        let (status, body) = send(&app, request).await;
        let body: Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn station_detail() {
        let (app, _dir) = app().await;
        let (status, body) = get_json(&app, "/api/stations/2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "BP Yarra");
        assert_eq!(body["bestPrice"], 176.8);

        let (status, body) = get_json(&app, "/api/stations/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn regions_with_counts() {
        let (app, _dir) = app().await;
        let (_, body) = get_json(&app, "/api/regions").await;
        let regions = body["regions"].as_array().unwrap();

        let count = |id: &str| {
            regions
                .iter()
                .find(|r| r["id"] == id)
                .map(|r| r["stationCount"].as_u64().unwrap())
        };
        assert_eq!(count("cbd"), Some(1));
        assert_eq!(count("eastern"), Some(1));
        assert_eq!(count("northern"), Some(1));
        assert_eq!(count("western"), Some(1));
        assert_eq!(regions.last().unwrap()["id"], "unclassified");
    }

    #[tokio::test]
    async fn brands_are_deduplicated() {
        let (app, _dir) = app().await;
        let (_, body) = get_json(&app, "/api/brands").await;
        assert_eq!(body["brands"], json!(["7-Eleven", "BP", "Shell"]));
    }

    #[tokio::test]
    async fn stats_per_fuel() {
        let (app, _dir) = app().await;
        let (_, body) = get_json(&app, "/api/stats").await;

        assert_eq!(body["stationCount"], 4);
        assert_eq!(body["pricedStationCount"], 3);
        assert_eq!(body["fuels"][0]["fuelType"], "unleaded");
        assert_eq!(body["fuels"][0]["stationCount"], 2);
        assert_eq!(body["fuels"][0]["min"], 172.5);
        assert!(body["cachedPages"].is_u64());
    }

    #[tokio::test]
    async fn preference_lifecycle() {
        let (app, _dir) = app().await;

        let put = Request::put("/api/preferences/theme")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"value": "dark"}).to_string()))
            .unwrap();
        let (status, _) = send(&app, put).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = get_json(&app, "/api/preferences/theme").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["value"], "dark");

        let (_, all) = get_json(&app, "/api/preferences").await;
        assert_eq!(all["preferences"]["theme"], "dark");

        let delete = Request::delete("/api/preferences/theme")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&app, delete).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = get_json(&app, "/api/preferences/theme").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn index_renders_filter_form() {
        let (app, _dir) = app().await;
        let request = Request::get("/?fuelType=diesel")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, request).await;
        let html = String::from_utf8(body).unwrap();

        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("<form id=\"filters\""));
        assert!(html.contains("value=\"diesel\" selected"));
        assert!(html.contains("BP Yarra"));
    }

    #[tokio::test]
    async fn about_lists_regions() {
        let (app, _dir) = app().await;
        let (status, body) = send(&app, Request::get("/about").body(Body::empty()).unwrap()).await;
        let html = String::from_utf8(body).unwrap();

        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Eastern Suburbs"));
        assert!(html.contains("Other Areas"));
    }

    #[tokio::test]
    async fn unknown_route() {
        let (app, _dir) = app().await;
        let (status, body) = get_json(&app, "/nowhere").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Not found");

        let request = Request::get("/nowhere")
            .header(header::ACCEPT, "text/html")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(String::from_utf8(body).unwrap().contains("Not found"));
    }
}
