/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use lifesync_api::{app::{build_router, AppState}, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let app = build_router(AppState::new(pool, config));
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:3001").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    middleware::{auth::require_auth, security::SecurityHeadersLayer},
    routes,
};
use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, patch, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// JWT signing secret
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete router
///
/// ```text
/// /                         service metadata (public)
/// /api/health               health check (public)
/// /api/auth                 register, login (public); profile and
///                           member accounts (authenticated)
/// /api/expenses             \
/// /api/incomes               |
/// /api/budgets               |
/// /api/savings               |  family-scoped records
/// /api/tasks                 |  (authenticated)
/// /api/reminders             |
/// /api/health-records        |
/// /api/family-members        |
/// /api/family-numbers       /
/// ```
///
/// Layers, outermost first: security headers, CORS, request tracing.
/// Authentication is a route layer, so unknown paths still return 404.
pub fn build_router(state: AppState) -> Router {
    let auth = from_fn_with_state(state.clone(), require_auth);

    let auth_routes = Router::new()
        .route("/me", get(routes::auth::me).put(routes::auth::update_me))
        .route("/change-password", put(routes::auth::change_password))
        .route("/logout", post(routes::auth::logout))
        .route(
            "/family-members",
            get(routes::auth::list_family_members).post(routes::auth::create_family_member),
        )
        .route(
            "/family-members/:id",
            put(routes::auth::update_family_member).delete(routes::auth::delete_family_member),
        )
        .route(
            "/family-members/:id/reset-password",
            put(routes::auth::reset_member_password),
        )
        .route_layer(auth.clone())
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    let expense_routes = Router::new()
        .route("/", get(routes::expenses::list).post(routes::expenses::create))
        .route("/summary/monthly", get(routes::expenses::monthly_summary))
        .route(
            "/:id",
            get(routes::expenses::get)
                .put(routes::expenses::update)
                .delete(routes::expenses::delete),
        );

    let income_routes = Router::new()
        .route("/", get(routes::incomes::list).post(routes::incomes::create))
        .route("/summary/monthly", get(routes::incomes::monthly_summary))
        .route(
            "/:id",
            get(routes::incomes::get)
                .put(routes::incomes::update)
                .delete(routes::incomes::delete),
        );

    let budget_routes = Router::new()
        .route("/", get(routes::budgets::list).post(routes::budgets::create))
        .route("/current", get(routes::budgets::current))
        .route("/over-budget", get(routes::budgets::over_budget))
        .route(
            "/:id",
            get(routes::budgets::get)
                .put(routes::budgets::update)
                .delete(routes::budgets::delete),
        )
        .route("/:id/spend", patch(routes::budgets::spend));

    let savings_routes = Router::new()
        .route("/", get(routes::savings::list).post(routes::savings::create))
        .route("/summary", get(routes::savings::summary))
        .route(
            "/:id",
            get(routes::savings::get)
                .put(routes::savings::update)
                .delete(routes::savings::delete),
        )
        .route("/:id/contribute", patch(routes::savings::contribute));

    let task_routes = Router::new()
        .route("/", get(routes::tasks::list).post(routes::tasks::create))
        .route("/today", get(routes::tasks::today))
        .route("/overdue", get(routes::tasks::overdue))
        .route(
            "/:id",
            get(routes::tasks::get)
                .put(routes::tasks::update)
                .delete(routes::tasks::delete),
        )
        .route("/:id/complete", patch(routes::tasks::complete));

    let reminder_routes = Router::new()
        .route("/", get(routes::reminders::list).post(routes::reminders::create))
        .route("/pending", get(routes::reminders::pending))
        .route("/overdue", get(routes::reminders::overdue))
        .route(
            "/:id",
            get(routes::reminders::get)
                .put(routes::reminders::update)
                .delete(routes::reminders::delete),
        )
        .route("/:id/pay", patch(routes::reminders::pay));

    let health_record_routes = Router::new()
        .route(
            "/",
            get(routes::health_records::list).post(routes::health_records::create),
        )
        .route("/upcoming-visits", get(routes::health_records::upcoming_visits))
        .route("/member/:member_name", get(routes::health_records::for_member))
        .route(
            "/:id",
            get(routes::health_records::get)
                .put(routes::health_records::update)
                .delete(routes::health_records::delete),
        );

    let family_member_routes = Router::new()
        .route(
            "/",
            get(routes::family_members::list).post(routes::family_members::create),
        )
        .route(
            "/:id",
            get(routes::family_members::get)
                .put(routes::family_members::update)
                .delete(routes::family_members::delete),
        );

    let family_number_routes = Router::new()
        .route(
            "/",
            get(routes::family_numbers::list).post(routes::family_numbers::create),
        )
        .route("/bulk", post(routes::family_numbers::create_bulk))
        .route("/emergency", get(routes::family_numbers::emergency))
        .route("/category/:category", get(routes::family_numbers::by_category))
        .route(
            "/:id",
            get(routes::family_numbers::get)
                .put(routes::family_numbers::update)
                .delete(routes::family_numbers::delete),
        );

    let household_routes = Router::new()
        .nest("/expenses", expense_routes)
        .nest("/incomes", income_routes)
        .nest("/budgets", budget_routes)
        .nest("/savings", savings_routes)
        .nest("/tasks", task_routes)
        .nest("/reminders", reminder_routes)
        .nest("/health-records", health_record_routes)
        .nest("/family-members", family_member_routes)
        .nest("/family-numbers", family_number_routes)
        .route_layer(auth);

    let api_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/auth", auth_routes)
        .merge(household_routes);

    Router::new()
        .route("/", get(routes::root::index))
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config))
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// CORS: anything goes for `*`, otherwise only the configured origins
fn cors_layer(config: &Config) -> CorsLayer {
    if config.allows_any_origin() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
