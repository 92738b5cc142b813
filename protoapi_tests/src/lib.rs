//! Message types of the `library.v1` package and the client generated for it
//! by `build.rs`.
//!
//! Messages follow the JSON mapping of protobuf: fields holding their default
//! value may be left out.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

include!(concat!(env!("OUT_DIR"), "/library/v1/library.api.rs"));


#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Shelf {
    pub name: String,
    pub theme: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GetShelfRequest {
    pub shelf: String,
}

/// Positions are keyed by `(row, column)`, which has no JSON form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrangeBooksRequest {
    pub shelf: String,
    pub positions: HashMap<(i32, i32), String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Book {
    pub name: String,
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListBooksRequest {
    pub shelf: String,
    pub page_size: i32,
    pub filter: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListBooksResponse {
    pub books: Vec<Book>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateBookRequest {
    pub shelf: String,
    pub book: Book,
    pub request_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateBookRequest {
    pub name: String,
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeleteBookRequest {
    pub shelf: String,
    pub book: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishBookRequest {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Empty {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmitReviewRequest {
    pub shelf: String,
    pub book: String,
    pub rating: i32,
    pub comment: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Review {
    pub book: String,
    pub rating: i32,
    pub comment: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadCoverRequest {
    pub shelf: String,
    pub book: String,
    pub caption: String,
    pub image: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cover {
    pub book: String,
    pub caption: String,
    pub file_name: String,
    pub size: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PutContentRequest {
    pub shelf: String,
    pub book: String,
    pub content: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Content {
    pub book: String,
    pub content_type: String,
    pub size: u64,
}
