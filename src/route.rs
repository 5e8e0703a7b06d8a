//! Route definitions for the tours API
//!
//! This module configures all HTTP routes and maps them to their respective handlers.

use axum::routing::get;
use axum::Router;

use crate::database::AppState;
use crate::handler::{
    create_tour, create_user, delete_tour, delete_user, get_monthly_plan, get_tour, get_user,
    list_tours, list_users, not_found, top_cheap_tours, tour_stats, update_tour, update_user,
};

/// Creates and configures the Axum application router with all routes
///
/// # Route Definitions
///
/// - `GET|POST /api/v1/tours` - List public tours / create a tour
/// - `GET /api/v1/tours/top-5-cheap` - Best-rated, cheapest tours
/// - `GET /api/v1/tours/tour-stats` - Statistics grouped by difficulty
/// - `GET /api/v1/tours/monthly-plan/{year}` - Tour starts per month
/// - `GET|PATCH|DELETE /api/v1/tours/{id}` - Single tour
/// - `GET|POST /api/v1/users` - List / register users
/// - `GET|PATCH|DELETE /api/v1/users/{id}` - Single user
///
/// # Example Usage
///
/// ```no_run
/// # use natours::database::{init_db, AppState};
/// # use natours::route::create_app;
/// # let db = init_db("data.db").unwrap();
/// let app = create_app(AppState::new(db));
/// // axum::serve(listener, app).await.unwrap();
/// ```
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/tours", get(list_tours).post(create_tour))
        .route("/api/v1/tours/top-5-cheap", get(top_cheap_tours))
        .route("/api/v1/tours/tour-stats", get(tour_stats))
        .route("/api/v1/tours/monthly-plan/{year}", get(get_monthly_plan))
        .route(
            "/api/v1/tours/{id}",
            get(get_tour).patch(update_tour).delete(delete_tour),
        )
        .route("/api/v1/users", get(list_users).post(create_user))
        .route(
            "/api/v1/users/{id}",
            get(get_user).patch(update_user).delete(delete_user),
        )
        .fallback(not_found)
        .with_state(state)
}
