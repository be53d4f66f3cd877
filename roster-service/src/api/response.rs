//! Response types for list and item handlers
//!
//! List responses keep the body a plain JSON array and carry page metadata
//! in the `X-Pagination` header.

use axum::{
    http::{HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::query::{PagedResult, PaginationMeta};

/// Header carrying [`PaginationMeta`] as JSON
pub static PAGINATION_HEADER: HeaderName = HeaderName::from_static("x-pagination");

/// A page of records with its metadata header
#[derive(Debug, Clone)]
pub struct PagedResponse<T> {
    items: Vec<T>,
    meta: PaginationMeta,
}

impl<T> PagedResponse<T> {
    /// Create a paged response
    pub const fn new(items: Vec<T>, meta: PaginationMeta) -> Self {
        Self { items, meta }
    }

    /// Page metadata
    pub const fn meta(&self) -> &PaginationMeta {
        &self.meta
    }
}

impl<T> From<PagedResult<T>> for PagedResponse<T> {
    fn from(page: PagedResult<T>) -> Self {
        let (items, meta) = page.into_parts();
        Self::new(items, meta)
    }
}

impl<T: Serialize> IntoResponse for PagedResponse<T> {
    fn into_response(self) -> Response {
        let mut response = Json(self.items).into_response();

        match serde_json::to_string(&self.meta)
            .ok()
            .and_then(|json| HeaderValue::from_str(&json).ok())
        {
            Some(value) => {
                response
                    .headers_mut()
                    .insert(PAGINATION_HEADER.clone(), value);
            }
            None => tracing::warn!(meta = ?self.meta, "Could not encode pagination header"),
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_body_is_array_and_header_has_meta() {
        let response =
            PagedResponse::new(vec![1, 2, 3], PaginationMeta::new(2, 3, 9)).into_response();

        assert_eq!(response.status(), StatusCode::OK);

        let header = response.headers().get(&PAGINATION_HEADER).unwrap();
        let meta: PaginationMeta = serde_json::from_str(header.to_str().unwrap()).unwrap();
        assert_eq!(meta, PaginationMeta::new(2, 3, 9));

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"[1,2,3]");
    }

    #[test]
    fn test_from_paged_result() {
        let page = crate::query::paginate(vec!["a", "b", "c"], 2, 2);
        let response = PagedResponse::from(page);
        assert_eq!(response.meta().total_count, 3);
        assert_eq!(response.items, vec!["c"]);
    }
}
