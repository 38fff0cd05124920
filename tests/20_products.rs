mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use common::product_payload;

#[tokio::test]
async fn only_sellers_can_create_products() -> Result<()> {
    let app = common::test_app();
    let (_, customer) = app.register("Cal", "cal@example.com", "customer").await?;

    let (status, body) = app
        .request("POST", "/api/products", Some(&customer), Some(product_payload("Lamp", 25.0, 3)))
        .await?;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Seller account required");
    Ok(())
}

#[tokio::test]
async fn create_product_persists_the_validated_payload() -> Result<()> {
    let app = common::test_app();
    let (seller_id, token) = app.register("Sal", "sal@example.com", "seller").await?;

    let (status, body) = app
        .request(
            "POST",
            "/api/products",
            Some(&token),
            Some(json!({
                "name": "  Walnut desk ",
                "description": "Solid walnut, oiled finish, cable tray included.",
                "price": "449.999",
                "category": "furniture",
                "stock": "12",
                "images": ["https://cdn.example.com/desk.jpg", " https://cdn.example.com/desk2.jpg "],
                "unknown_field": "stripped",
            })),
        )
        .await?;

    assert_eq!(status, StatusCode::CREATED);
    let product = &body["data"];
    assert_eq!(product["name"], "Walnut desk");
    assert_eq!(product["price"], 450.0);
    assert_eq!(product["stock"], 12);
    assert_eq!(product["status"], "active");
    assert_eq!(product["seller"], seller_id.as_str());
    assert_eq!(
        product["images"],
        json!(["https://cdn.example.com/desk.jpg", "https://cdn.example.com/desk2.jpg"])
    );
    assert!(product.get("unknown_field").is_none());
    Ok(())
}

#[tokio::test]
async fn empty_create_payload_reports_all_six_fields() -> Result<()> {
    let app = common::test_app();
    let (_, token) = app.register("Sal", "sal@example.com", "seller").await?;

    let (status, body) = app.request("POST", "/api/products", Some(&token), Some(json!({}))).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["name", "description", "price", "category", "stock", "images"]);
    Ok(())
}

#[tokio::test]
async fn zero_stock_creates_out_of_stock_products() -> Result<()> {
    let app = common::test_app();
    let (_, token) = app.register("Sal", "sal@example.com", "seller").await?;

    let product = app.create_product(&token, product_payload("Lamp", 25.0, 0)).await?;
    assert_eq!(product["status"], "out_of_stock");
    Ok(())
}

#[tokio::test]
async fn restocking_reactivates_an_out_of_stock_product() -> Result<()> {
    let app = common::test_app();
    let (_, token) = app.register("Sal", "sal@example.com", "seller").await?;
    let product = app.create_product(&token, product_payload("Lamp", 25.0, 5)).await?;
    let id = product["id"].as_str().unwrap();

    let (status, body) = app
        .request("PUT", &format!("/api/products/{id}"), Some(&token), Some(json!({ "stock": 0 })))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "out_of_stock");

    let (status, body) = app
        .request("PUT", &format!("/api/products/{id}"), Some(&token), Some(json!({ "stock": 5 })))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "active");
    assert_eq!(body["data"]["stock"], 5);
    Ok(())
}

#[tokio::test]
async fn seller_chosen_inactive_survives_restocks() -> Result<()> {
    let app = common::test_app();
    let (_, token) = app.register("Sal", "sal@example.com", "seller").await?;
    let product = app.create_product(&token, product_payload("Lamp", 25.0, 5)).await?;
    let id = product["id"].as_str().unwrap();

    let (_, body) = app
        .request(
            "PUT",
            &format!("/api/products/{id}"),
            Some(&token),
            Some(json!({ "status": "inactive" })),
        )
        .await?;
    assert_eq!(body["data"]["status"], "inactive");

    let (_, body) = app
        .request("PUT", &format!("/api/products/{id}"), Some(&token), Some(json!({ "stock": 7 })))
        .await?;
    assert_eq!(body["data"]["status"], "inactive");
    Ok(())
}

#[tokio::test]
async fn ownership_is_enforced_after_existence() -> Result<()> {
    let app = common::test_app();
    let (_, owner) = app.register("Ann", "ann@example.com", "seller").await?;
    let (_, intruder) = app.register("Bob", "bob@example.com", "seller").await?;
    let product = app.create_product(&owner, product_payload("Lamp", 25.0, 5)).await?;
    let id = product["id"].as_str().unwrap();

    // Another seller hitting an existing product: 403.
    let (status, body) = app
        .request("PUT", &format!("/api/products/{id}"), Some(&intruder), Some(json!({ "stock": 1 })))
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Not authorized to update this product");

    let (status, body) = app
        .request("DELETE", &format!("/api/products/{id}"), Some(&intruder), None)
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Not authorized to delete this product");

    // A nonexistent product: 404, never 403, even for a non-owner.
    let missing = Uuid::new_v4();
    let (status, body) = app
        .request("PUT", &format!("/api/products/{missing}"), Some(&intruder), Some(json!({ "stock": 1 })))
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Product not found");
    Ok(())
}

#[tokio::test]
async fn malformed_product_ids_read_as_not_found() -> Result<()> {
    let app = common::test_app();
    let (_, token) = app.register("Sal", "sal@example.com", "seller").await?;

    let (status, body) = app.request("GET", "/api/products/not-an-id", None, None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Resource not found");

    let (status, _) = app
        .request("DELETE", "/api/products/not-an-id", Some(&token), None)
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn delete_removes_the_product() -> Result<()> {
    let app = common::test_app();
    let (_, token) = app.register("Sal", "sal@example.com", "seller").await?;
    let product = app.create_product(&token, product_payload("Lamp", 25.0, 5)).await?;
    let id = product["id"].as_str().unwrap();

    let (status, body) = app
        .request("DELETE", &format!("/api/products/{id}"), Some(&token), None)
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Product deleted successfully");

    let (status, _) = app.request("GET", &format!("/api/products/{id}"), None, None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn update_validates_partial_payloads() -> Result<()> {
    let app = common::test_app();
    let (_, token) = app.register("Sal", "sal@example.com", "seller").await?;
    let product = app.create_product(&token, product_payload("Lamp", 25.0, 5)).await?;
    let id = product["id"].as_str().unwrap();

    let (status, body) = app
        .request(
            "PUT",
            &format!("/api/products/{id}"),
            Some(&token),
            Some(json!({ "price": -1, "description": "short" })),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["description", "price"]);
    Ok(())
}

#[tokio::test]
async fn seller_dashboard_returns_own_listings_and_stats() -> Result<()> {
    let app = common::test_app();
    let (_, sal) = app.register("Sal", "sal@example.com", "seller").await?;
    let (_, ann) = app.register("Ann", "ann@example.com", "seller").await?;

    app.create_product(&sal, product_payload("Lamp", 25.0, 5)).await?;
    app.create_product(&sal, product_payload("Rug", 80.0, 0)).await?;
    app.create_product(&ann, product_payload("Vase", 30.0, 2)).await?;

    let (status, body) = app.request("GET", "/api/products/seller", Some(&sal), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["stats"]["totalProducts"], 2);
    assert_eq!(body["stats"]["active"], 1);
    assert_eq!(body["stats"]["outOfStock"], 1);
    assert_eq!(body["stats"]["totalStock"], 5);

    // Customers have no dashboard.
    let (_, cal) = app.register("Cal", "cal@example.com", "customer").await?;
    let (status, _) = app.request("GET", "/api/products/seller", Some(&cal), None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    Ok(())
}
