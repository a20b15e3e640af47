// Book handlers module
// One store call per request, bounded by the configured deadline

use bson::oid::ObjectId;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use std::future::Future;

use super::error::{ApiError, ApiResult};
use super::types::{BookBody, DeleteResult, InsertResult, UpdateResult};
use crate::config::AppState;
use crate::http::{health_response, json_response, FormValues};
use crate::logger;
use crate::store::{Book, BookFields, StoreResult};

type HandlerResult = ApiResult<Response<Full<Bytes>>>;

/// Run a store call under the per-request deadline.
///
/// The future is dropped on expiry, which also cancels the driver operation.
async fn store_call<T>(state: &AppState, call: impl Future<Output = StoreResult<T>>) -> ApiResult<T> {
    let deadline = state.config.store_deadline();
    match tokio::time::timeout(deadline, call).await {
        Ok(result) => result.map_err(ApiError::from),
        Err(_) => Err(ApiError::DependencyUnavailable(format!(
            "store call exceeded {}ms deadline",
            deadline.as_millis()
        ))),
    }
}

/// Parse a 24-char hex identifier before any store call is made
fn parse_id(raw: &str) -> ApiResult<ObjectId> {
    ObjectId::parse_str(raw)
        .map_err(|e| ApiError::InvalidArgument(format!("malformed id {raw:?}: {e}")))
}

fn book_fields(form: &FormValues) -> BookFields {
    BookFields {
        name: form.value("name").to_string(),
        author: form.value("author").to_string(),
        publication_date: form.value("publication_date").to_string(),
    }
}

/// POST /api/v1/books
pub async fn create_book(state: &AppState, form: &FormValues) -> HandlerResult {
    let book = Book::new(book_fields(form));
    logger::log_debug(&format!("Creating book {}", book.id.to_hex()));

    let ack = store_call(state, state.store.insert(&book)).await?;
    Ok(json_response(StatusCode::OK, &InsertResult::from(ack)))
}

/// GET /api/v1/books
pub async fn list_books(state: &AppState) -> HandlerResult {
    let books = store_call(state, state.store.find_all()).await?;
    let body: Vec<BookBody> = books.into_iter().map(BookBody::from).collect();
    Ok(json_response(StatusCode::OK, &body))
}

/// GET /api/v1/book/{id}
pub async fn get_book(state: &AppState, raw_id: &str) -> HandlerResult {
    let id = parse_id(raw_id)?;
    match store_call(state, state.store.find_by_id(id)).await? {
        Some(book) => Ok(json_response(StatusCode::OK, &BookBody::from(book))),
        None => Err(ApiError::NotFound(format!("book {} not found", id.to_hex()))),
    }
}

/// PUT /api/v1/books
pub async fn update_book(state: &AppState, form: &FormValues) -> HandlerResult {
    let id = parse_id(form.value("id"))?;
    let fields = book_fields(form);

    let ack = store_call(state, state.store.update_by_id(id, &fields)).await?;
    logger::log_debug(&format!(
        "Updated book {}: matched {}, modified {}",
        id.to_hex(),
        ack.matched_count,
        ack.modified_count
    ));
    Ok(json_response(StatusCode::OK, &UpdateResult::from(ack)))
}

/// DELETE /api/v1/book/{id}
pub async fn delete_book(state: &AppState, raw_id: &str) -> HandlerResult {
    let id = parse_id(raw_id)?;
    let ack = store_call(state, state.store.delete_by_id(id)).await?;
    Ok(json_response(StatusCode::OK, &DeleteResult::from(ack)))
}

/// Readiness probe: the service is ready when the store answers a ping
pub async fn readiness(state: &AppState) -> Response<Full<Bytes>> {
    match store_call(state, state.store.ping()).await {
        Ok(()) => health_response(StatusCode::OK, "ok"),
        Err(e) => {
            logger::log_warning(&format!("Readiness check failed: {e}"));
            health_response(StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        let id = ObjectId::new();
        assert_eq!(parse_id(&id.to_hex()).unwrap(), id);

        for raw in ["", "not-an-id", "64b7f0c2a1b2c3d4e5f6071", "zzb7f0c2a1b2c3d4e5f60718"] {
            let err = parse_id(raw).unwrap_err();
            assert!(matches!(err, ApiError::InvalidArgument(_)), "{raw}");
        }
    }
}
