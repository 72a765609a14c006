//! Request dispatch
//!
//! Each handler is a synchronous function over the storage layer; the server
//! runs them on blocking worker threads. Client-caused failures (bad query,
//! unknown car, stale token) become error responses; anything else bubbles
//! up and is reported as an internal error.

use crate::error::Result;
use crate::query::Interpreter;
use crate::server::api::{ApiRequest, ApiResponse};
use crate::storage::{StorageManager, User};
use serde_json::json;

/// Handle one decoded request
pub fn dispatch(
    storage: &StorageManager,
    interpreter: &Interpreter,
    request: ApiRequest,
) -> ApiResponse {
    let result = match request {
        ApiRequest::ParseQuery { query } => parse_query(interpreter, query),
        ApiRequest::SearchCars { filters } => {
            let items = storage.catalog.search(&filters);
            items.map(|items| ApiResponse::ok(json!({ "items": items })))
        }
        ApiRequest::NaturalSearch { query } => natural_search(storage, interpreter, query),
        ApiRequest::ListCars => storage
            .catalog
            .list()
            .map(|items| ApiResponse::ok(json!({ "items": items }))),
        ApiRequest::GetCar { id } => storage
            .catalog
            .get(id)
            .map(|car| ApiResponse::ok(json!(car))),
        ApiRequest::Register {
            email,
            password,
            name,
        } => {
            let name = name.unwrap_or_else(|| "User".to_string());
            storage
                .accounts
                .register(&email, &password, &name)
                .map(session_response)
        }
        ApiRequest::Login { email, password } => storage
            .accounts
            .login(&email, &password)
            .map(session_response),
        ApiRequest::Logout { token } => storage
            .accounts
            .logout(&token)
            .map(|_| ApiResponse::ok(json!({ "logged_out": true }))),
        ApiRequest::Favorites { token } => favorites(storage, &token),
        ApiRequest::ToggleFavorite { token, car_id } => toggle_favorite(storage, &token, car_id),
        ApiRequest::AddReview {
            token,
            car_id,
            rating,
            body,
        } => add_review(storage, &token, car_id, rating, &body),
        ApiRequest::ListReviews { car_id } => storage
            .accounts
            .list_reviews(car_id)
            .map(|items| ApiResponse::ok(json!({ "items": items }))),
        ApiRequest::CreatePost { token, title, body } => create_post(storage, &token, &title, &body),
        ApiRequest::ListPosts => storage
            .accounts
            .list_posts()
            .map(|items| ApiResponse::ok(json!({ "items": items }))),
        ApiRequest::Status => storage
            .stats()
            .map(|stats| ApiResponse::ok(json!({ "stats": stats }))),
    };

    match result {
        Ok(response) => response,
        Err(e) if e.is_client_error() => ApiResponse::error(e.to_string()),
        Err(e) => {
            tracing::error!("Request failed: {}", e);
            ApiResponse::error("Internal server error")
        }
    }
}

fn parse_query(interpreter: &Interpreter, query: Option<String>) -> Result<ApiResponse> {
    let query = query.ok_or(crate::error::WheelhouseError::InvalidQuery)?;
    let filters = interpreter.interpret(&query)?;
    Ok(ApiResponse::ok(json!({ "filters": filters })))
}

fn natural_search(
    storage: &StorageManager,
    interpreter: &Interpreter,
    query: Option<String>,
) -> Result<ApiResponse> {
    let query = query.ok_or(crate::error::WheelhouseError::InvalidQuery)?;
    let filters = interpreter.interpret(&query)?;
    let items = storage.catalog.search(&filters)?;
    Ok(ApiResponse::ok(json!({ "filters": filters, "items": items })))
}

fn session_response((token, user): (String, User)) -> ApiResponse {
    ApiResponse::ok(json!({ "token": token, "user": user }))
}

fn favorites(storage: &StorageManager, token: &str) -> Result<ApiResponse> {
    let user = storage.accounts.authenticate(token)?;
    let ids = storage.accounts.favorites(user.id)?;
    let items = storage.catalog.get_many(&ids)?;
    Ok(ApiResponse::ok(json!({ "items": items })))
}

fn toggle_favorite(storage: &StorageManager, token: &str, car_id: i64) -> Result<ApiResponse> {
    let user = storage.accounts.authenticate(token)?;
    // Reject unknown cars before touching the favorites table.
    storage.catalog.get(car_id)?;
    let favorite = storage.accounts.toggle_favorite(user.id, car_id)?;
    let favorites = storage.accounts.favorites(user.id)?;
    Ok(ApiResponse::ok(json!({
        "favorite": favorite,
        "favorites": favorites,
    })))
}

fn add_review(
    storage: &StorageManager,
    token: &str,
    car_id: i64,
    rating: i64,
    body: &str,
) -> Result<ApiResponse> {
    let user = storage.accounts.authenticate(token)?;
    storage.catalog.get(car_id)?;
    let review = storage.accounts.add_review(car_id, user.id, rating, body)?;
    Ok(ApiResponse::ok(json!({ "review": review })))
}

fn create_post(
    storage: &StorageManager,
    token: &str,
    title: &str,
    body: &str,
) -> Result<ApiResponse> {
    let user = storage.accounts.authenticate(token)?;
    let post = storage.accounts.create_post(user.id, title, body)?;
    Ok(ApiResponse::ok(json!({ "post": post })))
}
