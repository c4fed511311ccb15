//! Integration tests for `DmAdapter::product_search`.
//!
//! Both dm APIs are served by one `wiremock` server per test.

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use localize_core::{StoreAddressMap, StoreDirectory};
use localize_stores::{DmAdapter, DmSettings, StoreAdapter, StoreHttpClient};

fn directory() -> StoreDirectory {
    StoreDirectory::from_json(
        r#"{
            "1000": { "address": { "street": "Alexanderplatz 1", "zip": "10178" }, "location": { "lat": 52.5219, "lon": 13.4132 } },
            "2000": { "address": { "street": "Kastanienallee 2", "zip": "10435" }, "location": { "lat": 52.5390, "lon": 13.4090 } }
        }"#,
    )
    .expect("valid test directory")
}

fn adapter(server: &MockServer) -> DmAdapter {
    DmAdapter::new(
        StoreHttpClient::new(5, "localize-test/0.1").expect("failed to build test client"),
        DmSettings {
            product_search_api: server.uri(),
            store_availability_api: server.uri(),
            max_concurrent_requests: 4,
        },
        directory(),
    )
}

fn product_json(
    dan: i64,
    gtin: i64,
    title: &str,
    value: f64,
    formatted: &str,
) -> serde_json::Value {
    json!({
        "dan": dan,
        "gtin": gtin,
        "title": title,
        "imageUrlTemplates": [
            format!("https://media.dm-static.com/images/{{transformations}}/{dan}")
        ],
        "price": { "value": value, "formattedValue": formatted },
        "relativeProductUrl": format!("/p{dan}.html")
    })
}

async fn mount_search(server: &MockServer, query: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/de/search"))
        .and(query_param("query", query))
        .and(query_param("searchType", "product"))
        .and(query_param("type", "search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(server)
        .await;
}

fn availability_path(dan: i64) -> String {
    format!("/store-availability/DE/products/dans/{dan}/availability-with-listing")
}

#[tokio::test]
async fn product_search_maps_products_and_availability() {
    let server = MockServer::start().await;
    mount_search(
        &server,
        "nivea",
        json!({
            "products": [product_json(595420, 4005808890507, "Nivea Creme", 1.95, "1,95 €")]
        }),
    )
    .await;

    Mock::given(method("GET"))
        .and(path(availability_path(595420)))
        .and(query_param("storeNumbers", "1000,2000"))
        .and(query_param("view", "basic"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({
            "storeAvailability": [
                { "store": { "storeNumber": "1000" }, "inStock": true, "stockLevel": 12 },
                { "store": { "storeNumber": "2000" }, "inStock": false, "stockLevel": 0 }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let addresses = StoreAddressMap::new();
    let products = adapter(&server).product_search("nivea", &addresses).await;

    assert_eq!(products.len(), 1);
    let product = &products[0];
    assert_eq!(product.gtin, "4005808890507");
    assert_eq!(product.title, "Nivea Creme");
    assert_eq!(
        product.image_url,
        "https://media.dm-static.com/images/f_auto,q_auto,c_fit,h_270,w_260/595420"
    );
    assert_eq!(product.price.formatted_value, "1,95 €");

    assert_eq!(product.available_at.len(), 1);
    let feature = &product.available_at[0];
    assert_eq!(feature.properties.store_id, "DM_1000");
    assert_eq!(feature.properties.stock_level, Some(12));
    assert_eq!(feature.properties.url, "https://www.dm.de/p595420.html");
    assert_eq!(feature.geometry.coordinates, [13.4132, 52.5219]);

    let addresses = addresses.into_inner();
    assert_eq!(addresses.len(), 1);
    assert_eq!(addresses["DM_1000"].address["street"], "Alexanderplatz 1");
}

#[tokio::test]
async fn product_search_returns_empty_on_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/de/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let addresses = StoreAddressMap::new();
    let products = adapter(&server).product_search("nivea", &addresses).await;

    assert!(products.is_empty());
    assert!(addresses.is_empty());
}

#[tokio::test]
async fn product_search_returns_empty_on_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/de/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let products = adapter(&server)
        .product_search("nivea", &StoreAddressMap::new())
        .await;
    assert!(products.is_empty());
}

#[tokio::test]
async fn product_search_returns_empty_when_products_missing() {
    let server = MockServer::start().await;
    mount_search(&server, "nivea", json!({ "count": 0 })).await;

    let products = adapter(&server)
        .product_search("nivea", &StoreAddressMap::new())
        .await;
    assert!(products.is_empty());
}

#[tokio::test]
async fn failed_availability_only_empties_that_product() {
    let server = MockServer::start().await;
    mount_search(
        &server,
        "creme",
        json!({ "products": [
            product_json(1, 111, "First", 1.0, "1,00 €"),
            product_json(2, 222, "Second", 2.0, "2,00 €")
        ] }),
    )
    .await;

    Mock::given(method("GET"))
        .and(path(availability_path(1)))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(availability_path(2)))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({
            "storeAvailability": [{ "store": { "storeNumber": 2000 }, "inStock": true }]
        })))
        .mount(&server)
        .await;

    let addresses = StoreAddressMap::new();
    let products = adapter(&server).product_search("creme", &addresses).await;

    let gtins: Vec<&str> = products.iter().map(|p| p.gtin.as_str()).collect();
    assert_eq!(gtins, vec!["111", "222"], "search order must be preserved");
    assert!(products[0].available_at.is_empty());
    assert_eq!(products[1].available_at.len(), 1);
    assert_eq!(products[1].available_at[0].properties.store_id, "DM_2000");
    assert_eq!(addresses.len(), 1);
}

#[tokio::test]
async fn product_with_null_price_is_dropped_with_whole_response() {
    let server = MockServer::start().await;
    mount_search(
        &server,
        "creme",
        json!({ "products": [{ "dan": 1, "gtin": 1, "title": "Broken", "price": null }] }),
    )
    .await;

    let products = adapter(&server)
        .product_search("creme", &StoreAddressMap::new())
        .await;
    assert!(products.is_empty());
}

#[tokio::test]
async fn product_without_gtin_is_dropped() {
    let server = MockServer::start().await;
    let mut without_gtin = product_json(1, 0, "No GTIN", 1.0, "1,00 €");
    without_gtin
        .as_object_mut()
        .expect("fixture is an object")
        .remove("gtin");
    mount_search(
        &server,
        "creme",
        json!({ "products": [without_gtin, product_json(2, 222, "Kept", 2.0, "2,00 €")] }),
    )
    .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({ "storeAvailability": [] })))
        .mount(&server)
        .await;

    let products = adapter(&server)
        .product_search("creme", &StoreAddressMap::new())
        .await;
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].gtin, "222");
}

#[tokio::test]
async fn product_without_gtin_registers_no_store() {
    let server = MockServer::start().await;
    let mut without_gtin = product_json(595420, 0, "No GTIN", 1.95, "1,95 €");
    without_gtin
        .as_object_mut()
        .expect("fixture is an object")
        .remove("gtin");
    mount_search(&server, "nivea", json!({ "products": [without_gtin] })).await;
    Mock::given(method("GET"))
        .and(path(availability_path(595420)))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({
            "storeAvailability": [{ "store": { "storeNumber": "1000" }, "inStock": true }]
        })))
        .expect(0)
        .mount(&server)
        .await;

    let addresses = StoreAddressMap::new();
    let products = adapter(&server).product_search("nivea", &addresses).await;

    assert!(products.is_empty());
    assert!(addresses.is_empty());
}
