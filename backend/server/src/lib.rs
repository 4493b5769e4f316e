//! Documentation of the cake bakery storefront API.
//!
//!
//!
//! # General Infrastructure
//! - Storefront client (single-page app) talks JSON to this server under `/api`
//! - Server keeps no state of its own between requests, everything lives in Redis
//! - Optionally serves the built client from `STATIC_DIR`, so one container is enough
//!
//!
//!
//! # Routes
//!
//! | Route | Who |
//! |---|---|
//! | `POST /api/auth/signup`, `POST /api/auth/login` | anyone |
//! | `GET /api/auth/me` | signed in |
//! | `GET /api/cakes`, `GET /api/cakes/{id}` | anyone |
//! | `POST/PUT/DELETE /api/cakes[/{id}]` | admin |
//! | `GET/POST /api/orders`, `GET/DELETE /api/orders/{id}` | signed in, own orders unless admin |
//! | `PUT /api/orders/{id}` | admin |
//! | `PUT /api/users/profile` | signed in |
//! | `GET /api/users[/{id}]`, `PUT /api/users/{id}/role`, `DELETE /api/users/{id}` | admin |
//! | `GET /api/health` | anyone |
//!
//!
//!
//! # Notes
//!
//! ## Pricing
//! Totals are frozen when the order is placed: base price × size multiplier × quantity.
//! Sizes missing from the multiplier table price at the base, which hides typos. Left as is
//! for now, unknown sizes show up in the debug log.
//!
//! ## Cancelling
//! Cancelling an order deletes it. Owners can only do that while it is still pending,
//! admins at any time.
//!
//!
//!
//! # Setup
//!
//! Run against a local Redis.
//! ```sh
//! echo "JWT_SECRET=change-me" > .env
//! cargo run -p bakery
//! ```
//!
//! Run without Redis, nothing persisted.
//! ```sh
//! STORE_BACKEND=memory cargo run -p bakery
//! ```
//!
//! Seed the admin account and sample cakes.
//! ```sh
//! cargo run -p seed -- --admin-password admin123
//! ```
use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{
        HeaderValue, Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::{get, post, put},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod memory;
pub mod repository;
pub mod routes;
pub mod search;
pub mod state;
pub mod store;
pub mod utils;

use config::Config;
use error::StartupError;
use routes::{auth as accounts, cakes, health, orders, users};
use state::State;

pub async fn start_server() -> Result<(), StartupError> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Loading config...");
    let config = Config::load()?;

    info!("Initializing state...");
    let state = State::new(config).await?;

    info!("Starting server...");

    let address = format!("0.0.0.0:{}", state.config.port);
    let app = app(state);

    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

pub fn app(state: Arc<State>) -> Router {
    let api = Router::new()
        .route("/api/health", get(health::health_handler))
        .route("/api/auth/signup", post(accounts::signup_handler))
        .route("/api/auth/login", post(accounts::login_handler))
        .route("/api/auth/me", get(accounts::me_handler))
        .route(
            "/api/cakes",
            get(cakes::list_cakes_handler).post(cakes::create_cake_handler),
        )
        .route(
            "/api/cakes/{id}",
            get(cakes::get_cake_handler)
                .put(cakes::update_cake_handler)
                .delete(cakes::delete_cake_handler),
        )
        .route(
            "/api/orders",
            get(orders::list_orders_handler).post(orders::create_order_handler),
        )
        .route(
            "/api/orders/{id}",
            get(orders::get_order_handler)
                .put(orders::update_order_handler)
                .delete(orders::delete_order_handler),
        )
        .route("/api/users", get(users::list_users_handler))
        .route("/api/users/profile", put(users::update_profile_handler))
        .route(
            "/api/users/{id}",
            get(users::get_user_handler).delete(users::delete_user_handler),
        )
        .route("/api/users/{id}/role", put(users::update_role_handler));

    let api = match &state.config.static_dir {
        Some(dir) => {
            info!("Serving client from {}", dir.display());
            api.fallback_service(
                ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html"))),
            )
        }
        None => api,
    };

    api.layer(cors(&state.config.cors_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors(origin: &str) -> CorsLayer {
    let allow_origin = if origin.trim() == "*" {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = origin
            .split(',')
            .filter_map(|o| {
                HeaderValue::from_str(o.trim())
                    .map_err(|e| warn!("Ignoring CORS origin {o:?}: {e}"))
                    .ok()
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
