use std::sync::Arc;

use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::store::SubmissionStore;

const INDEX_HTML: &str = include_str!("../assets/index.html");

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SubmissionStore>,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS]);

    Router::new()
        .route("/", get(index))
        .route("/save", post(save_polygon))
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn healthz() -> Response {
    (StatusCode::OK, "ok").into_response()
}

async fn save_polygon(State(state): State<AppState>, Json(payload): Json<Value>) -> Response {
    match state.store.append(payload).await {
        Ok(count) => {
            info!(count, path = %state.store.path().display(), "polygon saved");
            Json(json!({ "success": true })).into_response()
        }
        Err(err) => {
            error!("saving polygon failed: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": err.to_string() })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AppState, router};
    use crate::store::SubmissionStore;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use formats::load_submissions;
    use serde_json::{Value, json};
    use std::path::Path;
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn app(path: &Path) -> (axum::Router, Arc<SubmissionStore>) {
        let store = Arc::new(SubmissionStore::open(path).unwrap());
        let app = router(AppState {
            store: store.clone(),
        });
        (app, store)
    }

    fn save_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/save")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(resp: axum::response::Response) -> Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn save_acknowledges_and_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Lacs.json");
        let (app, _store) = app(&path).await;

        let feature = json!({
            "type": "Feature",
            "properties": {"nom": "Étang", "lien": "https://example.org"},
            "geometry": {"type": "Polygon", "coordinates": [[[2.0, 49.0], [2.1, 49.0], [2.1, 49.1], [2.0, 49.0]]]}
        });
        let resp = app
            .clone()
            .oneshot(save_request(&feature.to_string()))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await, json!({"success": true}));

        let resp = app.oneshot(save_request(r#"{"partial": true}"#)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        assert_eq!(
            load_submissions(&path).unwrap(),
            vec![feature, json!({"partial": true})]
        );
    }

    #[tokio::test]
    async fn malformed_json_is_rejected_without_touching_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Lacs.json");
        let (app, store) = app(&path).await;

        let resp = app.oneshot(save_request("{not json")).await.unwrap();
        assert!(resp.status().is_client_error());
        assert!(store.is_empty().await);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn write_failure_reports_unsuccessful() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("Lacs.json");
        let (app, _store) = app(&path).await;

        let resp = app.oneshot(save_request("{}")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(resp).await["success"], json!(false));
    }

    #[tokio::test]
    async fn index_serves_landing_page() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _store) = app(&dir.path().join("Lacs.json")).await;

        let resp = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("fetch(\"/save\""));
    }
}
