use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{Form, Json, Multipart, Path, Query};
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::{get, patch, post, put};
use axum::Router;

use crate::*;

type Pairs = Vec<(String, String)>;

/// Serve the library on a fresh local port, returning its base address.
pub async fn launch_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router()).await.unwrap();
    });

    format!("http://{addr}")
}

fn router() -> Router {
    Router::new()
        .route("/v1/shelves/{shelf}", get(get_shelf))
        .route("/v1/shelves/{shelf}/books", get(list_books).post(create_book))
        .route(
            "/v1/shelves/{shelf}/books/{book}",
            patch(update_book).delete(delete_book),
        )
        .route("/v1/shelves/{shelf}/books/{book}/reviews", post(submit_review))
        .route("/v1/shelves/{shelf}/books/{book}/cover", post(upload_cover))
        .route("/v1/shelves/{shelf}/books/{book}/content", put(put_content))
}

fn first(pairs: &Pairs, key: &str) -> Option<String> {
    pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
}

fn all(pairs: &Pairs, key: &str) -> Vec<String> {
    pairs
        .iter()
        .filter(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
        .collect()
}

async fn get_shelf(Path(shelf): Path<String>) -> Result<Json<Shelf>, (StatusCode, &'static str)> {
    match shelf.as_str() {
        "missing" => Err((StatusCode::NOT_FOUND, "no such shelf")),
        "broken" => Err((StatusCode::OK, "{\"name\":")),
        slow if slow.starts_with("slow") => {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(Json(Shelf::default()))
        }
        _ => Ok(Json(Shelf {
            name: format!("shelves/{shelf}"),
            theme: "fiction".to_owned(),
        })),
    }
}

async fn list_books(Path(shelf): Path<String>, Query(params): Query<Pairs>) -> Json<ListBooksResponse> {
    let page_size = first(&params, "page_size")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    let filter = first(&params, "filter").unwrap_or_default();

    let books = all(&params, "tags")
        .into_iter()
        .take(page_size)
        .map(|tag| Book {
            name: format!("shelves/{shelf}/books/{tag}"),
            title: filter.clone(),
        })
        .collect();

    Json(ListBooksResponse { books })
}

async fn create_book(
    Path(shelf): Path<String>,
    Query(params): Query<Pairs>,
    Json(book): Json<Book>,
) -> Json<Book> {
    let id = first(&params, "request_id").unwrap_or_default();

    Json(Book {
        name: format!("shelves/{shelf}/books/{id}"),
        title: book.title,
    })
}

async fn update_book(
    Path((shelf, book)): Path<(String, String)>,
    Json(req): Json<UpdateBookRequest>,
) -> Result<Json<Book>, StatusCode> {
    if req.name != format!("shelves/{shelf}/books/{book}") {
        return Err(StatusCode::BAD_REQUEST);
    }

    Ok(Json(Book {
        name: req.name,
        title: req.title,
    }))
}

async fn delete_book(Path((_shelf, _book)): Path<(String, String)>) -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn submit_review(
    Path((_shelf, book)): Path<(String, String)>,
    Form(form): Form<Pairs>,
) -> Json<Review> {
    Json(Review {
        book,
        rating: first(&form, "rating")
            .and_then(|v| v.parse().ok())
            .unwrap_or_default(),
        comment: first(&form, "comment").unwrap_or_default(),
        tags: all(&form, "tags"),
    })
}

async fn upload_cover(
    Path((_shelf, book)): Path<(String, String)>,
    mut multipart: Multipart,
) -> Json<Cover> {
    let mut cover = Cover {
        book,
        ..Default::default()
    };

    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("caption") => cover.caption = field.text().await.unwrap(),
            Some("image") => {
                cover.file_name = field.file_name().unwrap_or_default().to_owned();
                cover.size = field.bytes().await.unwrap().len() as u64;
            }
            _ => {}
        }
    }

    Json(cover)
}

async fn put_content(
    Path((_shelf, book)): Path<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> Json<Content> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned();

    Json(Content {
        book,
        content_type,
        size: body.len() as u64,
    })
}
