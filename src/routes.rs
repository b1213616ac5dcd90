use crate::auth::middleware::{authenticate, require_admin, require_dealer};
use crate::handlers::{auth, customers, dealer_portal, dealers, employees, health, search};
use crate::state::AppState;
use crate::utils::rate_limit::rate_limit_middleware;
use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, patch, post, put},
    Extension, Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

pub fn build_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(health::health_check))
        .route("/auth/admin/login", post(auth::admin_login))
        .route("/auth/dealer/login", post(auth::dealer_login))
        .route("/auth/forgot-password", post(auth::forgot_password))
        .route("/auth/refresh-token", post(auth::refresh_token));

    // Routes open to any authenticated role.
    let any_role = Router::new()
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::current_user))
        .route("/auth/profile", put(auth::update_profile))
        .route("/users/change-password", post(auth::change_password))
        .route("/search", get(search::universal_search))
        .route("/check-aadhar", get(search::check_aadhar));

    let admin = Router::new()
        .route("/dealers", get(dealers::list_dealers).post(dealers::create_dealer))
        .route(
            "/dealers/{id}",
            get(dealers::get_dealer)
                .patch(dealers::update_dealer)
                .delete(dealers::delete_dealer),
        )
        .route("/dealers/reset-password", post(dealers::reset_dealer_password))
        .route("/admin/audit-logs", get(dealers::admin_audit_logs))
        .route_layer(middleware::from_fn(require_admin));

    let dealer = Router::new()
        .route(
            "/employees",
            get(employees::list_employees).post(employees::create_employee),
        )
        .route("/employees/{id}", patch(employees::update_employee))
        .route("/employees/{id}/terminate", post(employees::terminate_employee))
        .route(
            "/customers",
            get(customers::list_customers).post(customers::create_customer),
        )
        .route("/customers/{id}", patch(customers::update_customer))
        .route("/dealer/profile", get(dealer_portal::dealer_profile))
        .route("/dealer/audit-logs", get(dealer_portal::dealer_audit_logs))
        .route_layer(middleware::from_fn(require_dealer));

    let protected = any_role
        .merge(admin)
        .merge(dealer)
        .route_layer(middleware::from_fn(authenticate));

    let api = public
        .merge(protected)
        .layer(middleware::from_fn(rate_limit_middleware))
        .layer(Extension(state.rate_limiter.clone()))
        .layer(Extension(state.jwt.clone()));

    Router::new()
        .route("/", get(health::welcome))
        .nest("/api/v1", api)
        .fallback(health::not_found)
        .layer(CatchPanicLayer::custom(crate::utils::error::handle_panic))
        .layer(cors_layer(&state))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let origins: Vec<HeaderValue> = state
        .settings
        .cors
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
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
}
