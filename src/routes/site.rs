//! Top-level routes: home page, account actions, medicine search, own inventory.

use super::RouteBoth;
use crate::handlers::{accounts, home, inventory, medicines};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn site_routes(state: AppState) -> Router {
    Router::<AppState>::new()
        .route("/", get(home::home))
        .route_both("/register", post(accounts::register))
        .route_both("/login", post(accounts::login))
        .route_both("/logout", post(accounts::logout))
        .route_both("/medicine/search", get(medicines::search))
        .route_both(
            "/pharmacy/inventory",
            get(inventory::own_inventory).post(inventory::add_medicine),
        )
        .with_state(state)
}
