// src/routes.rs

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{Method, header},
    middleware,
    routing::{get, post, put},
};
use tower_http::{
    cors::{AllowCredentials, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    config::Config,
    handlers::{blogs, root, users},
    state::AppState,
    utils::jwt::auth_middleware,
};

/// Cross-origin policy: only the configured origin may call the API from a
/// browser, with credentials. Applied once for the whole router.
pub fn cors_layer(config: &Config) -> CorsLayer {
    let allowed = config.cors_origin.clone();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list([allowed.clone()]))
        .allow_credentials(AllowCredentials::predicate(move |origin, _| {
            *origin == allowed
        }))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

/// User route group, mounted under `/api`.
fn user_routes(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/register", post(users::register))
        .route("/login", post(users::login))
        .route("/users", get(users::list_users))
        .route("/users/{id}", get(users::get_user));

    let protected = Router::new()
        .route("/me", get(users::me))
        .route(
            "/users/{id}",
            put(users::update_user).delete(users::delete_user),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    public.merge(protected)
}

/// Blog route group, mounted under `/api`.
fn blog_routes(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/blogs", get(blogs::list_blogs))
        .route("/blogs/{id}", get(blogs::get_blog));

    let protected = Router::new()
        .route("/blogs", post(blogs::create_blog))
        .route(
            "/blogs/{id}",
            put(blogs::update_blog).delete(blogs::delete_blog),
        )
        .route(
            "/upload",
            post(blogs::upload_image)
                .layer(DefaultBodyLimit::max(state.config.upload_limit_bytes)),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    public.merge(protected)
}

/// Assembles the main application router.
///
/// * `GET /` and `POST /` root handlers.
/// * User and blog route groups under `/api`.
/// * Global middleware: request tracing and the cross-origin policy.
pub fn create_router(state: AppState) -> Router {
    let api = user_routes(&state).merge(blog_routes(&state));

    Router::new()
        .route("/", get(root::index).post(root::echo))
        .nest("/api", api)
        // Global Middleware (applied from outside in)
        .layer(cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;

    const ALLOWED: &str = "http://localhost:3000";

    fn app() -> Router {
        let config = Config::from_lookup(|key| match key {
            "DATABASE_URL" => Some("postgres://localhost:1/unused".to_string()),
            "JWT_SECRET" => Some("routes_test_secret".to_string()),
            _ => None,
        })
        .unwrap();
        let pool = PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .unwrap();

        create_router(AppState::new(pool, config))
    }

    fn preflight(origin: &str) -> Request<Body> {
        Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/blogs")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn allowed_origin_gets_credentialed_cors_headers() {
        let response = app().oneshot(preflight(ALLOWED)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], ALLOWED);
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    }

    #[tokio::test]
    async fn other_origin_gets_neither_origin_nor_credentials() {
        for request in [
            preflight("http://evil.example.com"),
            Request::builder()
                .uri("/")
                .header(header::ORIGIN, "http://evil.example.com")
                .body(Body::empty())
                .unwrap(),
        ] {
            let response = app().oneshot(request).await.unwrap();

            let headers = response.headers();
            assert!(headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
            assert!(headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).is_none());
        }
    }
}
