//! REST resources under /api.

use super::RouteBoth;
use crate::handlers::{accounts, inventory, logs, medicines, pharmacies};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn api_routes(state: AppState) -> Router {
    Router::<AppState>::new()
        .route_both("/users", get(accounts::list).post(accounts::register))
        .route_both("/users/me", get(accounts::me))
        .route_both(
            "/users/:id",
            get(accounts::read).patch(accounts::update).delete(accounts::delete),
        )
        .route_both("/pharmacies", get(pharmacies::list).post(pharmacies::create))
        .route_both(
            "/pharmacies/:id",
            get(pharmacies::read).patch(pharmacies::update).delete(pharmacies::delete),
        )
        .route_both(
            "/pharmacists",
            get(pharmacies::list_pharmacists).post(pharmacies::create_pharmacist),
        )
        .route_both(
            "/pharmacists/:id",
            get(pharmacies::read_pharmacist).delete(pharmacies::delete_pharmacist),
        )
        .route_both("/medicines", get(medicines::list).post(medicines::create))
        .route_both(
            "/medicines/:id",
            get(medicines::read).patch(medicines::update).delete(medicines::delete),
        )
        .route_both("/inventory", get(inventory::list).post(inventory::create))
        .route_both(
            "/inventory/:id",
            get(inventory::read).patch(inventory::update).delete(inventory::delete),
        )
        .route_both(
            "/search-logs",
            get(logs::list_search_logs).post(logs::create_search_log),
        )
        .route_both("/search-logs/:id", get(logs::read_search_log))
        .route_both(
            "/sms-requests",
            post(logs::create_sms_request).get(logs::list_sms_requests),
        )
        .route_both("/sms-requests/:id", get(logs::read_sms_request))
        .with_state(state)
}
