use std::future::{ready, Ready};

use axum::{
    http::{Method, Uri},
    routing::{any, delete, get, post, put},
    Router,
};

use crate::app::errors::ApiError;

pub mod greetings;
pub mod users;

/// Router for every endpoint.
///
/// Method and path are matched together. A known path with the wrong method
/// answers 405 through its method fallback; an unknown path answers 404
/// through the router fallback. Identifier segments are captured as raw
/// strings and parsed by the handlers.
pub fn router() -> Router {
    Router::new()
        .route(
            "/create-user",
            post(users::create_user).fallback(only(Method::POST)),
        )
        .route(
            "/get-user/:id",
            get(users::get_user).fallback(only(Method::GET)),
        )
        .route(
            "/update-user/:id",
            put(users::update_user).fallback(only(Method::PUT)),
        )
        .route(
            "/delete-user/:id",
            delete(users::delete_user).fallback(only(Method::DELETE)),
        )
        .route(
            "/get-users",
            get(users::list_users).fallback(only(Method::GET)),
        )
        .route("/name/*name", any(greetings::name_greeting))
        .route("/json/*name", any(greetings::json_greeting))
        .fallback(no_route)
}

/// Method fallback answering `MethodMismatch` for the allowed `method`.
fn only(method: Method) -> impl FnOnce() -> Ready<ApiError> + Clone + Send + Sync + 'static {
    move || ready(ApiError::MethodMismatch(method))
}

async fn no_route(method: Method, uri: Uri) -> ApiError {
    ApiError::NoRoute {
        method,
        path: uri.path().to_string(),
    }
}
