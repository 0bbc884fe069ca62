//! HTTP routes.
//!
//! Each handler issues a single full-history log query against the node.
//! Nothing is cached between requests.

use alloy::primitives::Address;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::state::AppState;

/// Service name reported by `GET /`.
pub const SERVICE_NAME: &str = "Dexterity backend";

/// One entry of the capability listing.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RouteInfo {
    /// Request path.
    pub path: &'static str,
    /// What the route returns.
    pub description: &'static str,
}

/// Every route the service exposes, in listing order.
pub const ROUTES: &[RouteInfo] = &[
    RouteInfo {
        path: "/",
        description: "return backend title",
    },
    RouteInfo {
        path: "/tokens",
        description: "return existing tokens in dexterity",
    },
    RouteInfo {
        path: "/swaps",
        description: "return swap count that have been executed in dexterity",
    },
    RouteInfo {
        path: "/traders",
        description: "return users of the protocol",
    },
    RouteInfo {
        path: "/holders",
        description: "return depositors of the protocol",
    },
];

/// Body of `GET /`.
#[derive(Debug, Clone, Serialize)]
pub struct Index {
    /// Service name.
    pub name: &'static str,
    /// Available routes.
    pub routes: &'static [RouteInfo],
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/tokens", get(tokens))
        .route("/swaps", get(swaps))
        .route("/traders", get(traders))
        .route("/holders", get(holders))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index() -> Json<Index> {
    Json(Index {
        name: SERVICE_NAME,
        routes: ROUTES,
    })
}

/// Manifest names of every token that has a pool; `null` where the
/// manifest did not create the token.
async fn tokens(State(state): State<AppState>) -> Result<Json<Vec<Option<String>>>, ApiError> {
    let addresses = state.dexterity.token_addresses().await?;
    let names = addresses
        .into_iter()
        .map(|address| {
            let name = state.manifest.contract_name_at(address);
            if name.is_none() {
                tracing::debug!(%address, "token has no manifest entry");
            }
            name.map(str::to_owned)
        })
        .collect();
    Ok(Json(names))
}

async fn swaps(State(state): State<AppState>) -> Result<Json<usize>, ApiError> {
    Ok(Json(state.dexterity.swap_count().await?))
}

async fn traders(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(render(&state.dexterity.traders().await?)))
}

async fn holders(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(render(&state.dexterity.holders().await?)))
}

/// Lowercase `0x`-prefixed hex, one per address.
fn render(addresses: &[Address]) -> Vec<String> {
    addresses.iter().map(|a| format!("{a:#x}")).collect()
}
