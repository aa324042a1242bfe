//! Book handlers.
//!
//! Every route here runs for the tenant the middleware resolved from the
//! request host; the gateway confines storage access to that tenant's schema.

use atrium_persistence::core::Backend;
use atrium_persistence::types::{Book, BookUpdate, NewBook};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RestResult;
use crate::extractors::{JsonBody, RecordId, TenantExtractor};
use crate::state::AppState;

/// Body of `POST /books` and `PUT /books/{id}`.
#[derive(Debug, Deserialize)]
pub struct BookBody {
    /// The book's name.
    pub name: String,
}

/// A book as returned by the API.
#[derive(Debug, Serialize)]
pub struct BookResponse {
    /// Id within the tenant's schema.
    pub id: i64,
    /// The book's name.
    pub name: String,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            name: book.name,
        }
    }
}

/// Lists the tenant's books.
pub async fn list_books_handler<B: Backend>(
    State(state): State<AppState<B>>,
    tenant: TenantExtractor,
) -> RestResult<Json<Vec<BookResponse>>> {
    debug!(tenant = %tenant, "Processing book list request");

    let books = state.books().list(tenant.context()).await?;
    Ok(Json(books.into_iter().map(BookResponse::from).collect()))
}

/// Reads one book.
pub async fn get_book_handler<B: Backend>(
    State(state): State<AppState<B>>,
    tenant: TenantExtractor,
    RecordId(id): RecordId,
) -> RestResult<Json<BookResponse>> {
    debug!(tenant = %tenant, id, "Processing book read request");

    let book = state.books().get(tenant.context(), id).await?;
    Ok(Json(book.into()))
}

/// Creates a book in the tenant's schema.
///
/// # Response
///
/// - `201 Created` - `{id, name}`
/// - `400 Bad Request` - Malformed body or empty name
/// - `404 Not Found` - Host names an unregistered tenant
/// - `409 Conflict` - Tenant is not active
pub async fn create_book_handler<B: Backend>(
    State(state): State<AppState<B>>,
    tenant: TenantExtractor,
    JsonBody(body): JsonBody<BookBody>,
) -> RestResult<Response> {
    debug!(tenant = %tenant, "Processing book create request");

    let book = state
        .books()
        .create(tenant.context(), NewBook::new(body.name))
        .await?;
    Ok((StatusCode::CREATED, Json(BookResponse::from(book))).into_response())
}

/// Renames a book.
///
/// An empty name is rejected before storage is touched.
pub async fn update_book_handler<B: Backend>(
    State(state): State<AppState<B>>,
    tenant: TenantExtractor,
    RecordId(id): RecordId,
    JsonBody(body): JsonBody<BookBody>,
) -> RestResult<Json<BookResponse>> {
    debug!(tenant = %tenant, id, "Processing book update request");

    let book = state
        .books()
        .update(tenant.context(), id, BookUpdate::new(body.name))
        .await?;
    Ok(Json(book.into()))
}

/// Deletes a book.
pub async fn delete_book_handler<B: Backend>(
    State(state): State<AppState<B>>,
    tenant: TenantExtractor,
    RecordId(id): RecordId,
) -> RestResult<StatusCode> {
    debug!(tenant = %tenant, id, "Processing book delete request");

    state.books().delete(tenant.context(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
