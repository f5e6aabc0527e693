use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post, put},
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use std::{sync::Arc, time::Duration};

use crate::{JwtKeys, accounts, auth, budgets, categories, tags, transactions};
use engine::Engine;

/// Runtime options of the HTTP layer.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub jwt_secret: String,
    pub token_ttl_minutes: i64,
    /// Browser origins allowed by CORS.
    pub cors_origins: Vec<String>,
}

impl ServerConfig {
    /// Config with the given signing secret, a one-day token lifetime and
    /// the local development origins.
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_ttl_minutes: 24 * 60,
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:3001".to_string(),
            ],
        }
    }
}

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub keys: Arc<JwtKeys>,
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("ignoring invalid CORS origin '{origin}'");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}

fn protected_routes() -> Router<ServerState> {
    Router::new()
        .route("/auth/me", get(auth::me))
        .route("/accounts", get(accounts::list).post(accounts::create))
        .route("/accounts/active", get(accounts::list_active))
        .route("/accounts/inactive", get(accounts::list_inactive))
        .route("/accounts/type/{account_type}", get(accounts::list_by_type))
        .route(
            "/accounts/{id}",
            get(accounts::get)
                .put(accounts::update)
                .delete(accounts::delete),
        )
        .route("/accounts/{id}/balance", put(accounts::update_balance))
        .route("/categories", get(categories::list).post(categories::create))
        .route("/categories/root", get(categories::list_roots))
        .route(
            "/categories/type/{category_type}",
            get(categories::list_by_type),
        )
        .route("/categories/parent/{id}", get(categories::list_children))
        .route(
            "/categories/{id}",
            get(categories::get)
                .put(categories::update)
                .delete(categories::delete),
        )
        .route("/tags", get(tags::list).post(tags::create))
        .route(
            "/tags/{id}",
            get(tags::get).put(tags::update).delete(tags::delete),
        )
        .route("/budgets", get(budgets::list).post(budgets::create))
        .route("/budgets/active", get(budgets::list_active))
        .route("/budgets/current", get(budgets::list_current))
        .route("/budgets/category/{id}", get(budgets::list_by_category))
        .route("/budgets/account/{id}", get(budgets::list_by_account))
        .route("/budgets/period/{period}", get(budgets::list_by_period))
        .route(
            "/budgets/{id}",
            get(budgets::get).put(budgets::update).delete(budgets::delete),
        )
        .route(
            "/transactions",
            get(transactions::list).post(transactions::create),
        )
        .route("/transactions/range", get(transactions::list_range))
        .route(
            "/transactions/type/{transaction_type}",
            get(transactions::list_by_type),
        )
        .route(
            "/transactions/category/{id}",
            get(transactions::list_by_category),
        )
        .route(
            "/transactions/account/{id}",
            get(transactions::list_by_account),
        )
        .route(
            "/transactions/{id}",
            get(transactions::get)
                .put(transactions::update)
                .delete(transactions::delete),
        )
}

fn router(state: ServerState, cors_origins: &[String]) -> Router {
    let protected = protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_user));

    let api = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .merge(protected);

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origins))
        .with_state(state)
}

/// Build the full application router.
pub fn app(engine: Engine, config: &ServerConfig) -> Router {
    let state = ServerState {
        engine: Arc::new(engine),
        keys: Arc::new(JwtKeys::new(&config.jwt_secret, config.token_ttl_minutes)),
    };
    router(state, &config.cors_origins)
}

pub async fn run_with_listener(
    engine: Engine,
    config: &ServerConfig,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app(engine, config)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_requires_an_explicit_secret() {
        let config = ServerConfig::new("s3cret");
        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.token_ttl_minutes, 1440);
        assert_eq!(config.cors_origins.len(), 2);
    }
}
