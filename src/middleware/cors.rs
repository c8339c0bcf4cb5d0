use anyhow::Context;
use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::AppConfig;

/// Cookies ride along on every request, so origins are listed explicitly.
pub fn cors_layer(cfg: &AppConfig) -> anyhow::Result<CorsLayer> {
    let origins = cfg
        .cors_origins()
        .into_iter()
        .map(|origin| {
            HeaderValue::from_str(origin.trim_end_matches('/'))
                .with_context(|| format!("invalid CORS origin '{origin}'"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]))
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode, header},
        routing::get,
    };
    use tower::ServiceExt;

    use crate::config::AppConfig;

    use super::cors_layer;

    async fn preflight(origin: &str) -> axum::response::Response {
        let mut cfg = AppConfig::default();
        cfg.general.client_url = "http://client.test/".to_string();
        let app = Router::new()
            .route("/ping", get(|| async { "pong" }))
            .layer(cors_layer(&cfg).expect("cors layer"));

        app.oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/ping")
                .header(header::ORIGIN, origin)
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn allows_configured_client_with_credentials() {
        let response = preflight("http://client.test").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://client.test"
        );
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS],
            "true"
        );
    }

    #[tokio::test]
    async fn ignores_unlisted_origin() {
        let response = preflight("http://evil.test").await;

        assert!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .is_none()
        );
    }
}
