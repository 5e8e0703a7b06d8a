//! HTTP request handlers for the tours API
//!
//! Handlers translate requests into repository calls and wrap results in
//! the `{"status": "success", ...}` envelope. All validation and lifecycle
//! rules live below this layer.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::database::AppState;
use crate::error::{AppError, AppResult};
use crate::model::{Difficulty, Projection, TourInput, TourView, UserInput, UserView};
use crate::query::{Pipeline, SortField, SortKey, TourFilter, TourQuery, Visibility};
use crate::stats::{difficulty_stats, monthly_plan};
use crate::validation::field_error;

/// Query parameters for listing tours
///
/// # Example
/// Query string: `?difficulty=easy&maxPrice=500&sort=-ratingsAverage,price&page=2&limit=20`
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct TourListParams {
    pub difficulty: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_rating: Option<f64>,
    pub max_duration: Option<f64>,
    /// Comma-separated sort keys, `-` prefix for descending
    pub sort: Option<String>,
    /// Comma-separated field list; `createdAt` adds the creation time
    pub fields: Option<String>,
    /// Page number for pagination (starts from 1)
    pub page: Option<usize>,
    /// Number of items per page, maximum is 100
    pub limit: Option<usize>,
}

impl TourListParams {
    fn into_query(self) -> AppResult<(TourQuery, Projection)> {
        let mut filter = TourFilter::default();
        if let Some(difficulty) = self.difficulty.as_deref() {
            let difficulty: Difficulty = difficulty.parse().map_err(|_| {
                field_error(
                    "difficulty",
                    "enum",
                    crate::validation::messages::DIFFICULTY,
                )
            })?;
            filter = filter.difficulty(difficulty);
        }
        filter.min_price = self.min_price;
        filter.max_price = self.max_price;
        filter.min_rating = self.min_rating;
        filter.max_duration = self.max_duration;

        let sort = match self.sort.as_deref() {
            Some(list) => SortKey::parse_list(list).map_err(|field| {
                field_error("sort", "field", format!("Cannot sort tours by '{field}'"))
            })?,
            None => Vec::new(),
        };

        let query = TourQuery::new(filter).sort(sort).page(
            self.page.unwrap_or(1),
            self.limit.unwrap_or(TourQuery::DEFAULT_LIMIT),
        );
        Ok((query, Projection::from_fields(self.fields.as_deref())))
    }
}

fn tours_response(query: &TourQuery, tours: Vec<TourView>) -> impl IntoResponse {
    Json(json!({
        "status": "success",
        "results": tours.len(),
        "page": query.page,
        "limit": query.limit,
        "data": { "tours": tours }
    }))
}

/// Creates a new tour
///
/// # Response
///
/// - **201 Created** - Tour stored, body carries the tour view
/// - **400 Bad Request** - A field violates its constraints
pub async fn create_tour(
    State(state): State<AppState>,
    Json(payload): Json<TourInput>,
) -> AppResult<impl IntoResponse> {
    let tour = state.tours.create(payload)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "data": { "tour": TourView::from(tour) }
        })),
    ))
}

/// Lists public tours with filtering, sorting and pagination
pub async fn list_tours(
    State(state): State<AppState>,
    Query(params): Query<TourListParams>,
) -> AppResult<impl IntoResponse> {
    let (query, projection) = params.into_query()?;
    let tours = state.tours.find(&query, Visibility::Public)?;
    let views = tours
        .into_iter()
        .map(|tour| TourView::project(tour, projection))
        .collect();
    Ok(tours_response(&query, views))
}

/// The five best-rated tours, cheapest first among equal ratings
pub async fn top_cheap_tours(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let query = TourQuery::default()
        .sort(vec![
            SortKey::desc(SortField::RatingsAverage),
            SortKey::asc(SortField::Price),
        ])
        .page(1, 5);
    let tours = state.tours.find(&query, Visibility::Public)?;
    let views = tours.into_iter().map(TourView::from).collect();
    Ok(tours_response(&query, views))
}

pub async fn get_tour(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let tour = state.tours.find_by_id(&id, Visibility::Public)?;
    Ok(Json(json!({
        "status": "success",
        "data": { "tour": TourView::from(tour) }
    })))
}

/// Applies a partial update; the full merged tour is re-validated
pub async fn update_tour(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<TourInput>,
) -> AppResult<impl IntoResponse> {
    let tour = state.tours.update(&id, payload, Visibility::Public)?;
    Ok(Json(json!({
        "status": "success",
        "data": { "tour": TourView::from(tour) }
    })))
}

pub async fn delete_tour(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    state.tours.delete(&id, Visibility::Public)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Per-difficulty statistics over tours rated 4.5 or better
pub async fn tour_stats(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let pipeline = Pipeline::new().filter(TourFilter::default().min_rating(4.5));
    let tours = state.tours.aggregate(pipeline, Visibility::Public)?;
    Ok(Json(json!({
        "status": "success",
        "data": { "stats": difficulty_stats(&tours) }
    })))
}

/// Tour starts per month of `year`, busiest month first
pub async fn get_monthly_plan(
    Path(year): Path<i32>,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let tours = state.tours.aggregate(Pipeline::new(), Visibility::Public)?;
    let plan = monthly_plan(&tours, year);
    Ok(Json(json!({
        "status": "success",
        "results": plan.len(),
        "data": { "plan": plan }
    })))
}

/// Registers a new user
///
/// # Response
///
/// - **201 Created** - User stored with a hashed password
/// - **400 Bad Request** - Invalid field, taken email, or mismatched passwords
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<UserInput>,
) -> AppResult<impl IntoResponse> {
    let user = state.users.create(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "data": { "user": UserView::from(user) }
        })),
    ))
}

pub async fn list_users(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let users: Vec<UserView> = state.users.list()?.into_iter().map(UserView::from).collect();
    Ok(Json(json!({
        "status": "success",
        "results": users.len(),
        "data": { "users": users }
    })))
}

pub async fn get_user(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let user = state.users.find_by_id(&id)?;
    Ok(Json(json!({
        "status": "success",
        "data": { "user": UserView::from(user) }
    })))
}

/// Applies a partial update; the password is only re-hashed when supplied
pub async fn update_user(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<UserInput>,
) -> AppResult<impl IntoResponse> {
    let user = state.users.update(&id, payload).await?;
    Ok(Json(json!({
        "status": "success",
        "data": { "user": UserView::from(user) }
    })))
}

pub async fn delete_user(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    state.users.delete(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Fallback for unknown routes
pub async fn not_found() -> AppError {
    AppError::NotFound("Can't find this route on this server".to_string())
}
