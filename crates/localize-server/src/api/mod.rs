mod search;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{
        header::{self, HeaderValue},
        Method,
    },
    routing::get,
    Json, Router,
};
use localize_stores::SearchEngine;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::middleware::request_id;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<SearchEngine>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    stores: usize,
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::OPTIONS, Method::GET])
        .allow_headers([header::CONTENT_TYPE])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(search::search))
        .route("/health", get(health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum::middleware::from_fn(request_id))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::ACCESS_CONTROL_ALLOW_METHODS,
                    HeaderValue::from_static("OPTIONS,GET"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::ACCESS_CONTROL_ALLOW_HEADERS,
                    HeaderValue::from_static("Content-Type"),
                ))
                .layer(build_cors()),
        )
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<HealthData> {
    Json(HealthData {
        status: "ok",
        stores: state.engine.store_count(),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use localize_core::{
        AvailabilityFeature, FeatureProperties, NormalizedProduct, Price, StoreAddressMap,
        StoreLocation, StoreRecord,
    };
    use localize_stores::StoreAdapter;
    use tower::ServiceExt;

    use super::*;

    #[derive(Debug)]
    struct FixedStore {
        price: f64,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl StoreAdapter for FixedStore {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn product_search(
            &self,
            query: &str,
            store_addresses: &StoreAddressMap,
        ) -> Vec<NormalizedProduct> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let location = StoreLocation {
                lat: 52.52,
                lon: 13.40,
            };
            store_addresses.insert_if_absent(
                "FIXED_1",
                &StoreRecord {
                    address: serde_json::json!({ "street": "Teststraße 1" }),
                    location,
                },
            );
            vec![NormalizedProduct {
                gtin: "4005808890507".to_string(),
                title: format!("Result for {query}"),
                image_url: String::new(),
                price: Price {
                    value: self.price,
                    formatted_value: "1,95 €".to_string(),
                },
                available_at: vec![AvailabilityFeature::at(
                    FeatureProperties {
                        store_id: "FIXED_1".to_string(),
                        in_stock: true,
                        formatted_price: "1,95 €".to_string(),
                        stock_level: Some(3),
                        url: "https://example.test/p".to_string(),
                    },
                    &location,
                )],
            }]
        }
    }

    fn app_with_price(price: f64) -> (Router, Arc<FixedStore>) {
        let store = Arc::new(FixedStore {
            price,
            calls: AtomicUsize::new(0),
        });
        let engine = SearchEngine::new(vec![Arc::clone(&store) as Arc<dyn StoreAdapter>]);
        let app = build_app(AppState {
            engine: Arc::new(engine),
        });
        (app, store)
    }

    async fn send_get(app: Router, uri: &str) -> Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response")
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        String::from_utf8(bytes.to_vec()).expect("utf-8 body")
    }

    #[tokio::test]
    async fn missing_query_is_bad_request() {
        let (app, store) = app_with_price(1.95);
        let response = send_get(app, "/").await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, "No query provided");
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_query_returns_empty_payload_without_searching() {
        let (app, store) = app_with_price(1.95);
        let response = send_get(app, "/?q=").await;

        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value =
            serde_json::from_str(&body_text(response).await).expect("json parse");
        assert_eq!(json, serde_json::json!({ "products": [], "storeAddresses": {} }));
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn search_returns_merged_products_and_addresses() {
        let (app, _store) = app_with_price(1.95);
        let response = send_get(app, "/?q=nivea%20creme").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            Some("application/json")
        );
        let json: serde_json::Value =
            serde_json::from_str(&body_text(response).await).expect("json parse");
        let product = &json["products"][0];
        assert_eq!(product["gtin"], "4005808890507");
        assert_eq!(product["title"], "Result for nivea creme");
        assert_eq!(product["priceRange"]["formattedMin"], "1,95 €");
        assert_eq!(product["availableAt"]["features"][0]["properties"]["stockLevel"], 3);
        assert_eq!(
            json["storeAddresses"]["FIXED_1"]["address"]["street"],
            "Teststraße 1"
        );
    }

    #[tokio::test]
    async fn repeated_query_uses_first_value() {
        let (app, store) = app_with_price(1.95);
        let response = send_get(app, "/?q=seife&q=creme").await;

        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value =
            serde_json::from_str(&body_text(response).await).expect("json parse");
        assert_eq!(json["products"][0]["title"], "Result for seife");
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn merge_failure_is_internal_server_error() {
        let (app, _store) = app_with_price(f64::NAN);
        let response = send_get(app, "/?q=nivea").await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(response).await, "Internal Server Error.");
    }

    #[tokio::test]
    async fn responses_carry_cors_and_request_id_headers() {
        let (app, _store) = app_with_price(1.95);
        let response = send_get(app, "/?q=nivea").await;

        let headers = response.headers();
        let value = |name: header::HeaderName| headers.get(name).and_then(|v| v.to_str().ok());
        assert_eq!(value(header::ACCESS_CONTROL_ALLOW_ORIGIN), Some("*"));
        assert_eq!(value(header::ACCESS_CONTROL_ALLOW_METHODS), Some("OPTIONS,GET"));
        assert_eq!(value(header::ACCESS_CONTROL_ALLOW_HEADERS), Some("Content-Type"));
        assert!(headers.contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn bad_request_also_carries_cors_headers() {
        let (app, _store) = app_with_price(1.95);
        let response = send_get(app, "/").await;

        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .and_then(|v| v.to_str().ok()),
            Some("*")
        );
    }

    #[tokio::test]
    async fn health_reports_store_count() {
        let (app, _store) = app_with_price(1.95);
        let response = send_get(app, "/health").await;

        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value =
            serde_json::from_str(&body_text(response).await).expect("json parse");
        assert_eq!(json, serde_json::json!({ "status": "ok", "stores": 1 }));
    }
}
