use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use protoapi::reqwest::header::CONTENT_TYPE;
use protoapi::{
    async_trait, with_addr, with_request_hook, with_response_hook, CallContext, ClientError,
    Decode, Request, RequestHook, Response, ResponseHook,
};
use rstest::rstest;

use crate::library_v1::*;
use crate::*;

#[derive(Debug, Clone, PartialEq)]
struct Recorded {
    method: String,
    url: String,
    content_type: Option<String>,
    body: Option<Vec<u8>>,
}

/// Records requests instead of sending them, answering with a fixed body.
#[derive(Clone)]
struct Recorder {
    requests: Arc<Mutex<Vec<Recorded>>>,
    reply: &'static str,
}

impl Recorder {
    fn new(reply: &'static str) -> Self {
        Self {
            requests: Arc::default(),
            reply,
        }
    }

    fn last(&self) -> Recorded {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }

    fn count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl RequestHook for Recorder {
    async fn execute(
        &self,
        _ctx: &CallContext,
        _client: &protoapi::reqwest::Client,
        req: Request,
    ) -> protoapi::Result<Response> {
        self.requests.lock().unwrap().push(Recorded {
            method: req.method().to_string(),
            url: req.url().to_string(),
            content_type: req
                .headers()
                .get(CONTENT_TYPE)
                .map(|v| v.to_str().unwrap().to_owned()),
            body: req.body().and_then(|b| b.as_bytes()).map(<[u8]>::to_vec),
        });

        let resp = axum::http::Response::builder()
            .status(200)
            .body(self.reply.to_owned())
            .unwrap();

        Ok(Response::from(resp))
    }
}

struct Failing;

#[async_trait]
impl RequestHook for Failing {
    async fn execute(
        &self,
        _ctx: &CallContext,
        _client: &protoapi::reqwest::Client,
        _req: Request,
    ) -> protoapi::Result<Response> {
        Err(ClientError::hook("transport unavailable"))
    }
}

/// Ignores the response, decoding a fixed document instead.
struct Canned(&'static str);

#[async_trait]
impl ResponseHook for Canned {
    async fn decode(
        &self,
        _ctx: &CallContext,
        _resp: Response,
        out: &mut dyn Decode,
    ) -> protoapi::Result<()> {
        out.decode_json(self.0.as_bytes()).map_err(ClientError::Decode)
    }
}

fn ctx() -> CallContext {
    CallContext::background()
}

#[tokio::test]
async fn default_address_from_package() {
    let recorder = Recorder::new("{}");
    let shelves = new_shelves_service([with_request_hook(recorder.clone())]);

    shelves
        .get_shelf(&ctx(), &GetShelfRequest { shelf: "1".to_owned() }, &[])
        .await
        .unwrap();

    assert_eq!(recorder.last().url, "https://library.v1/v1/shelves/1");
}

#[tokio::test]
async fn per_call_options_do_not_stick() {
    let recorder = Recorder::new("{}");
    let shelves = new_shelves_service([
        with_addr("http://primary"),
        with_request_hook(recorder.clone()),
    ]);
    let req = GetShelfRequest { shelf: "1".to_owned() };

    shelves
        .get_shelf(&ctx(), &req, &[with_addr("http://secondary/")])
        .await
        .unwrap();
    assert_eq!(recorder.last().url, "http://secondary/v1/shelves/1");

    shelves.get_shelf(&ctx(), &req, &[]).await.unwrap();
    assert_eq!(recorder.last().url, "http://primary/v1/shelves/1");
}

#[tokio::test]
async fn later_construction_options_win() {
    let first = Recorder::new("{}");
    let second = Recorder::new("{}");
    let shelves = new_shelves_service([
        with_request_hook(first.clone()),
        with_request_hook(second.clone()),
    ]);

    shelves
        .get_shelf(&ctx(), &GetShelfRequest::default(), &[])
        .await
        .unwrap();

    assert_eq!(first.count(), 0);
    assert_eq!(second.count(), 1);
}

#[tokio::test]
async fn bare_get_has_no_body() {
    let recorder = Recorder::new("{}");
    let shelves = new_shelves_service([with_request_hook(recorder.clone())]);

    shelves
        .get_shelf(&ctx(), &GetShelfRequest { shelf: "1".to_owned() }, &[])
        .await
        .unwrap();

    let recorded = recorder.last();
    assert_eq!(recorded.method, "GET");
    assert_eq!(recorded.content_type, None);
    assert_eq!(recorded.body, None);
}

#[tokio::test]
async fn query_string() {
    let recorder = Recorder::new("{}");
    let books = new_books_service([with_request_hook(recorder.clone())]);

    books
        .list_books(
            &ctx(),
            &ListBooksRequest {
                shelf: "s 1".to_owned(),
                page_size: 10,
                filter: Some("a b".to_owned()),
                tags: vec!["x".to_owned(), "y".to_owned()],
            },
            &[],
        )
        .await
        .unwrap();

    assert_eq!(
        recorder.last().url,
        "https://library.v1/v1/shelves/s%201/books?page_size=10&filter=a+b&tags=x&tags=y"
    );
}

#[tokio::test]
async fn unset_optional_is_omitted() {
    let recorder = Recorder::new("{}");
    let books = new_books_service([with_request_hook(recorder.clone())]);

    books
        .list_books(
            &ctx(),
            &ListBooksRequest {
                shelf: "1".to_owned(),
                ..Default::default()
            },
            &[],
        )
        .await
        .unwrap();

    assert_eq!(
        recorder.last().url,
        "https://library.v1/v1/shelves/1/books?page_size=0"
    );
}

#[tokio::test]
async fn custom_verb_and_multi_segment_path() {
    let recorder = Recorder::new("{}");
    let books = new_books_service([with_request_hook(recorder.clone())]);

    books
        .publish_book(
            &ctx(),
            &PublishBookRequest {
                name: "shelves/1/books/2".to_owned(),
            },
            &[],
        )
        .await
        .unwrap();

    let recorded = recorder.last();
    assert_eq!(recorded.method, "POST");
    assert_eq!(recorded.url, "https://library.v1/v1/shelves/1/books/2:publish");
    assert_eq!(recorded.body, None);
}

#[tokio::test]
async fn json_body_and_remaining_query() {
    let recorder = Recorder::new("{}");
    let books = new_books_service([with_request_hook(recorder.clone())]);

    books
        .create_book(
            &ctx(),
            &CreateBookRequest {
                shelf: "1".to_owned(),
                book: Book {
                    name: String::new(),
                    title: "Dune".to_owned(),
                },
                request_id: "42".to_owned(),
            },
            &[],
        )
        .await
        .unwrap();

    let recorded = recorder.last();
    assert_eq!(recorded.url, "https://library.v1/v1/shelves/1/books?request_id=42");
    assert_eq!(recorded.content_type.as_deref(), Some("application/json"));

    let body: serde_json::Value = serde_json::from_slice(&recorded.body.unwrap()).unwrap();
    assert_eq!(body, serde_json::json!({ "name": "", "title": "Dune" }));
}

#[rstest]
#[case::form("application/x-www-form-urlencoded")]
#[case::multipart("multipart/form-data; boundary=")]
#[case::bytes("application/json")]
#[tokio::test]
async fn content_types(#[case] expected: &str) {
    let recorder = Recorder::new("{}");
    let books = new_books_service([with_request_hook(recorder.clone())]);

    match expected {
        "application/x-www-form-urlencoded" => {
            books
                .submit_review(&ctx(), &SubmitReviewRequest::default(), &[])
                .await
                .unwrap();
        }
        "application/json" => {
            books
                .put_content(&ctx(), &PutContentRequest::default(), &[])
                .await
                .unwrap();
        }
        _ => {
            books
                .upload_cover(&ctx(), &UploadCoverRequest::default(), &[])
                .await
                .unwrap();
        }
    };

    let content_type = recorder.last().content_type.unwrap();
    assert!(content_type.starts_with(expected), "{content_type}");
}

#[tokio::test]
async fn multipart_body_is_closed() {
    let recorder = Recorder::new("{}");
    let books = new_books_service([with_request_hook(recorder.clone())]);

    books
        .upload_cover(
            &ctx(),
            &UploadCoverRequest {
                caption: "front".to_owned(),
                image: vec![1, 2, 3],
                ..Default::default()
            },
            &[],
        )
        .await
        .unwrap();

    let recorded = recorder.last();
    let boundary = recorded
        .content_type
        .unwrap()
        .rsplit("boundary=")
        .next()
        .unwrap()
        .to_owned();
    let body = recorded.body.unwrap();

    assert!(body.ends_with(format!("--{boundary}--\r\n").as_bytes()));
}

#[tokio::test]
async fn encode_error_before_request() {
    let recorder = Recorder::new("{}");
    let shelves = new_shelves_service([with_request_hook(recorder.clone())]);

    let err = shelves
        .arrange_books(
            &ctx(),
            &ArrangeBooksRequest {
                shelf: "1".to_owned(),
                positions: HashMap::from([((0, 1), "shelves/1/books/2".to_owned())]),
            },
            &[],
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Encode(_)), "{err}");
    assert_eq!(recorder.count(), 0);
}

#[tokio::test]
async fn invalid_address_before_request() {
    let recorder = Recorder::new("{}");
    let shelves = new_shelves_service([
        with_addr("not an address"),
        with_request_hook(recorder.clone()),
    ]);

    let err = shelves
        .get_shelf(&ctx(), &GetShelfRequest { shelf: "1".to_owned() }, &[])
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Url { .. }), "{err}");
    assert_eq!(recorder.count(), 0);
}

#[tokio::test]
async fn request_hook_error_propagates() {
    let shelves = new_shelves_service([with_request_hook(Failing)]);

    let err = shelves
        .get_shelf(&ctx(), &GetShelfRequest::default(), &[])
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Hook(_)));
    assert_eq!(err.to_string(), "transport unavailable");
}

#[tokio::test]
async fn response_hook_decodes() {
    let shelves = new_shelves_service([
        with_request_hook(Recorder::new("")),
        with_response_hook(Canned(r#"{"name":"shelves/canned","theme":"poetry"}"#)),
    ]);

    let shelf = shelves
        .get_shelf(&ctx(), &GetShelfRequest::default(), &[])
        .await
        .unwrap();

    assert_eq!(shelf.name, "shelves/canned");
    assert_eq!(shelf.theme, "poetry");
}

#[tokio::test]
async fn empty_reply_keeps_default() {
    let shelves = new_shelves_service([with_request_hook(Recorder::new(""))]);

    let shelf = shelves
        .get_shelf(&ctx(), &GetShelfRequest::default(), &[])
        .await
        .unwrap();

    assert_eq!(shelf, Shelf::default());
}
