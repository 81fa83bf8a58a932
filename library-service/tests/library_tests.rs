mod common;

use common::TestApp;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_reader_lists_books() {
    let app = TestApp::spawn().await;
    app.seed_book("Dune", 2).await;
    app.seed_book("Children of Dune", 1).await;

    let response = app
        .get_authenticated("/books", &app.token_for(&app.reader))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Children of Dune", "Dune"]);
}

#[tokio::test]
async fn test_admin_book_lifecycle() {
    let app = TestApp::spawn().await;
    let token = app.token_for(&app.admin);

    let created = app
        .post_authenticated("/admin/books", &token)
        .json(&json!({
            "name": "Hyperion",
            "author": "Dan Simmons",
            "genre": "Science Fiction",
            "copies": 3
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(created.status(), StatusCode::CREATED);
    let created: serde_json::Value = created.json().await.unwrap();
    let book_id = created["data"]["id"].as_str().unwrap().to_string();

    let updated = app
        .put_authenticated(&format!("/admin/books/{}", book_id), &token)
        .json(&json!({
            "name": "Hyperion",
            "author": "Dan Simmons",
            "genre": "Science Fiction",
            "copies": 5
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(updated.status(), StatusCode::OK);
    let updated: serde_json::Value = updated.json().await.unwrap();
    assert_eq!(updated["data"]["copies"], 5);

    let deleted = app
        .delete(&format!("/admin/books/{}", book_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let missing = app
        .get_authenticated(&format!("/admin/books/{}", book_id), &token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reader_cannot_manage_books() {
    let app = TestApp::spawn().await;

    let response = app
        .post_authenticated("/admin/books", &app.token_for(&app.reader))
        .json(&json!({
            "name": "Hyperion",
            "author": "Dan Simmons",
            "genre": "Science Fiction",
            "copies": 3
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_create_book_with_negative_copies_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app
        .post_authenticated("/admin/books", &app.token_for(&app.admin))
        .json(&json!({
            "name": "Hyperion",
            "author": "Dan Simmons",
            "genre": "Science Fiction",
            "copies": -1
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_borrow_and_return_flow() {
    let app = TestApp::spawn().await;
    let book = app.seed_book("Dune", 1).await;
    let token = app.token_for(&app.reader);

    let borrowed = app
        .post_authenticated("/borrow", &token)
        .json(&json!({ "book_id": book.id.to_string() }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(borrowed.status(), StatusCode::CREATED);
    let borrowed: serde_json::Value = borrowed.json().await.unwrap();
    assert_eq!(borrowed["data"]["user_id"], app.reader.id.to_string());
    assert!(borrowed["data"]["returned_at"].is_null());
    let borrow_id = borrowed["data"]["id"].as_str().unwrap().to_string();

    let out_of_stock = app
        .post_authenticated("/borrow", &token)
        .json(&json!({ "book_id": book.id.to_string() }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(out_of_stock.status(), StatusCode::CONFLICT);

    let returned = app
        .put_authenticated("/borrow", &token)
        .json(&json!({ "borrow_id": borrow_id }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(returned.status(), StatusCode::OK);
    let returned: serde_json::Value = returned.json().await.unwrap();
    assert!(returned["data"]["returned_at"].is_string());

    let returned_again = app
        .put_authenticated("/borrow", &token)
        .json(&json!({ "borrow_id": borrow_id }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(returned_again.status(), StatusCode::CONFLICT);

    let by_book: serde_json::Value = app
        .get_authenticated(&format!("/borrow/book/{}", book.id), &token)
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .unwrap();
    assert_eq!(by_book["data"].as_array().unwrap().len(), 1);

    let by_user: serde_json::Value = app
        .get_authenticated(&format!("/borrow/user/{}", app.reader.id), &token)
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .unwrap();
    assert_eq!(by_user["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_reader_cannot_borrow_for_someone_else() {
    let app = TestApp::spawn().await;
    let book = app.seed_book("Dune", 1).await;

    let response = app
        .post_authenticated("/borrow", &app.token_for(&app.reader))
        .json(&json!({
            "book_id": book.id.to_string(),
            "user_id": app.admin.id.to_string()
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_borrows_on_behalf_of_reader() {
    let app = TestApp::spawn().await;
    let book = app.seed_book("Dune", 1).await;

    let response = app
        .post_authenticated("/borrow", &app.token_for(&app.admin))
        .json(&json!({
            "book_id": book.id.to_string(),
            "user_id": app.reader.id.to_string()
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["user_id"], app.reader.id.to_string());
}

#[tokio::test]
async fn test_borrow_unknown_book_is_not_found() {
    let app = TestApp::spawn().await;

    let response = app
        .post_authenticated("/borrow", &app.token_for(&app.reader))
        .json(&json!({ "book_id": uuid::Uuid::new_v4().to_string() }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_only_borrower_may_return() {
    let app = TestApp::spawn().await;
    let book = app.seed_book("Dune", 1).await;
    let reader_token = app.token_for(&app.reader);

    let borrowed: serde_json::Value = app
        .post_authenticated("/borrow", &reader_token)
        .json(&json!({ "book_id": book.id.to_string() }))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .unwrap();
    let borrow_id = borrowed["data"]["id"].as_str().unwrap().to_string();

    let registered = app
        .post("/user/adduser")
        .json(&json!({
            "username": "mallory",
            "name": "Mallory",
            "password": "not_my_book"
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(registered.status(), StatusCode::CREATED);

    let login: serde_json::Value = app
        .post("/authenticate")
        .json(&json!({ "username": "mallory", "password": "not_my_book" }))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .unwrap();
    let mallory_token = login["data"]["token"].as_str().unwrap().to_string();

    let hijacked = app
        .put_authenticated("/borrow", &mallory_token)
        .json(&json!({ "borrow_id": borrow_id }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(hijacked.status(), StatusCode::FORBIDDEN);

    let stock: serde_json::Value = app
        .get_authenticated(
            &format!("/admin/books/{}", book.id),
            &app.token_for(&app.admin),
        )
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .unwrap();
    assert_eq!(stock["data"]["copies"], 0);

    let returned = app
        .put_authenticated("/borrow", &reader_token)
        .json(&json!({ "borrow_id": borrow_id }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(returned.status(), StatusCode::OK);
}
