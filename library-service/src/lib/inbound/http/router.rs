use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::authenticate::authenticate;
use super::handlers::books::create_book;
use super::handlers::books::delete_book;
use super::handlers::books::get_book;
use super::handlers::books::list_books;
use super::handlers::books::update_book;
use super::handlers::borrows::borrow_book;
use super::handlers::borrows::borrows_by_book;
use super::handlers::borrows::borrows_by_principal;
use super::handlers::borrows::list_borrows;
use super::handlers::borrows::return_book;
use super::handlers::principals::create_principal;
use super::handlers::principals::current_principal;
use super::handlers::principals::get_principal;
use super::handlers::principals::list_principals;
use super::handlers::principals::register;
use super::handlers::principals::update_principal;
use super::middleware::authenticate as authenticate_request;
use super::middleware::authorize;
use super::middleware::AuthorizationGate;
use crate::auth::ports::AuthenticationServicePort;
use crate::book::ports::BookServicePort;
use crate::borrow::ports::BorrowServicePort;
use crate::principal::models::Role;
use crate::principal::ports::PrincipalServicePort;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthenticationServicePort>,
    pub principal_service: Arc<dyn PrincipalServicePort>,
    pub book_service: Arc<dyn BookServicePort>,
    pub borrow_service: Arc<dyn BorrowServicePort>,
}

pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/authenticate", post(authenticate))
        .route("/user/adduser", post(register))
        .route("/books", get(list_books));

    let reader_routes = Router::new()
        .route("/user/me", get(current_principal))
        .route(
            "/borrow",
            get(list_borrows).post(borrow_book).put(return_book),
        )
        .route("/borrow/user/:user_id", get(borrows_by_principal))
        .route("/borrow/book/:book_id", get(borrows_by_book))
        .route_layer(middleware::from_fn_with_state(
            AuthorizationGate::require_any([Role::admin(), Role::user()]),
            authorize,
        ));

    let admin_routes = Router::new()
        .route("/admin/users", get(list_principals).post(create_principal))
        .route(
            "/admin/users/:user_id",
            get(get_principal).put(update_principal),
        )
        .route("/admin/books", get(list_books).post(create_book))
        .route(
            "/admin/books/:book_id",
            get(get_book).put(update_book).delete(delete_book),
        )
        .route_layer(middleware::from_fn_with_state(
            AuthorizationGate::require(Role::admin()),
            authorize,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            // Headers stay out of the span: they carry bearer tokens.
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(reader_routes)
        .merge(admin_routes)
        .layer(middleware::from_fn_with_state(
            state.auth_service.clone(),
            authenticate_request,
        ))
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
