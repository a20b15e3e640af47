//! Route table for the book API
//!
//! Exact method + path matching under `/api/v1`, with the `{id}` segment
//! extracted for the single-book routes.

use hyper::Method;

pub const BASE_PATH: &str = "/api/v1";

const COLLECTION_METHODS: &str = "GET, POST, PUT";
const ITEM_METHODS: &str = "GET, DELETE";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    /// POST /books
    CreateBook,
    /// GET /books
    ListBooks,
    /// PUT /books
    UpdateBook,
    /// GET /book/{id}
    GetBook { id: &'a str },
    /// DELETE /book/{id}
    DeleteBook { id: &'a str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteMatch<'a> {
    Found(Route<'a>),
    /// Path exists but not for this method; carries the `Allow` value
    MethodNotAllowed(&'static str),
    NotFound,
}

/// Resolve a request to one of the five book routes
pub fn match_route<'a>(method: &Method, path: &'a str) -> RouteMatch<'a> {
    let Some(rest) = path.strip_prefix(BASE_PATH) else {
        return RouteMatch::NotFound;
    };

    if rest == "/books" {
        return match *method {
            Method::POST => RouteMatch::Found(Route::CreateBook),
            Method::GET => RouteMatch::Found(Route::ListBooks),
            Method::PUT => RouteMatch::Found(Route::UpdateBook),
            _ => RouteMatch::MethodNotAllowed(COLLECTION_METHODS),
        };
    }

    if let Some(id) = rest.strip_prefix("/book/").filter(|s| is_path_segment(s)) {
        return match *method {
            Method::GET => RouteMatch::Found(Route::GetBook { id }),
            Method::DELETE => RouteMatch::Found(Route::DeleteBook { id }),
            _ => RouteMatch::MethodNotAllowed(ITEM_METHODS),
        };
    }

    RouteMatch::NotFound
}

fn is_path_segment(s: &str) -> bool {
    !s.is_empty() && !s.contains('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_routes() {
        assert_eq!(
            match_route(&Method::POST, "/api/v1/books"),
            RouteMatch::Found(Route::CreateBook)
        );
        assert_eq!(
            match_route(&Method::GET, "/api/v1/books"),
            RouteMatch::Found(Route::ListBooks)
        );
        assert_eq!(
            match_route(&Method::PUT, "/api/v1/books"),
            RouteMatch::Found(Route::UpdateBook)
        );
        assert_eq!(
            match_route(&Method::DELETE, "/api/v1/books"),
            RouteMatch::MethodNotAllowed("GET, POST, PUT")
        );
    }

    #[test]
    fn test_item_routes_extract_id() {
        let id = "64b7f0c2a1b2c3d4e5f60718";
        let path = format!("/api/v1/book/{id}");
        assert_eq!(
            match_route(&Method::GET, &path),
            RouteMatch::Found(Route::GetBook { id })
        );
        assert_eq!(
            match_route(&Method::DELETE, &path),
            RouteMatch::Found(Route::DeleteBook { id })
        );
        assert_eq!(
            match_route(&Method::PUT, &path),
            RouteMatch::MethodNotAllowed("GET, DELETE")
        );
    }

    #[test]
    fn test_unmatched_paths() {
        assert_eq!(match_route(&Method::GET, "/"), RouteMatch::NotFound);
        assert_eq!(match_route(&Method::GET, "/api/v1/books/"), RouteMatch::NotFound);
        assert_eq!(match_route(&Method::GET, "/api/v1/book/"), RouteMatch::NotFound);
        assert_eq!(match_route(&Method::GET, "/api/v1/book/a/b"), RouteMatch::NotFound);
        assert_eq!(match_route(&Method::GET, "/api/v2/books"), RouteMatch::NotFound);
    }
}
