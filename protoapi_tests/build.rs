use std::path::PathBuf;

use protoapi_codegen::{
    BindingOptions, BodyEncoding, Config, FieldKind, FileDescriptor, HttpRule, MessageField,
    MethodDescriptor, ServiceDescriptor, Verb,
};

fn method(
    name: &str,
    comment: &str,
    input: &str,
    output: &str,
    fields: &[(&str, FieldKind)],
    rule: HttpRule,
) -> MethodDescriptor {
    MethodDescriptor {
        name: name.to_owned(),
        comment: comment.to_owned(),
        input_type: format!(".library.v1.{input}"),
        output_type: format!(".library.v1.{output}"),
        input_fields: fields
            .iter()
            .map(|(name, kind)| MessageField::new(*name, *kind))
            .collect(),
        rule,
    }
}

fn library() -> FileDescriptor {
    use FieldKind::*;

    let shelves = ServiceDescriptor {
        name: "Shelves".to_owned(),
        methods: vec![method(
            "GetShelf",
            "returns a shelf",
            "GetShelfRequest",
            "Shelf",
            &[("shelf", Scalar)],
            HttpRule::new(Verb::Get, "/v1/shelves/{shelf}", ""),
        ),
        method(
            "ArrangeBooks",
            "places books at shelf positions",
            "ArrangeBooksRequest",
            "Shelf",
            &[("shelf", Scalar), ("positions", Message)],
            HttpRule::new(Verb::Post, "/v1/shelves/{shelf}:arrange", "positions"),
        )],
        ..Default::default()
    };

    let books = ServiceDescriptor {
        name: "Books".to_owned(),
        methods: vec![
            method(
                "ListBooks",
                "lists books of a shelf",
                "ListBooksRequest",
                "ListBooksResponse",
                &[
                    ("shelf", Scalar),
                    ("page_size", Scalar),
                    ("filter", Optional),
                    ("tags", Repeated),
                ],
                HttpRule::new(Verb::Get, "/v1/shelves/{shelf}/books", ""),
            ),
            method(
                "CreateBook",
                "creates a book",
                "CreateBookRequest",
                "Book",
                &[("shelf", Scalar), ("book", Message), ("request_id", Scalar)],
                HttpRule::new(Verb::Post, "/v1/shelves/{shelf}/books", "book"),
            ),
            method(
                "UpdateBook",
                "updates a book",
                "UpdateBookRequest",
                "Book",
                &[("name", Scalar), ("title", Scalar)],
                HttpRule::new(Verb::Patch, "/v1/{name=shelves/*/books/*}", "*"),
            ),
            method(
                "DeleteBook",
                "deletes a book",
                "DeleteBookRequest",
                "Empty",
                &[("shelf", Scalar), ("book", Scalar)],
                HttpRule::new(Verb::Delete, "/v1/shelves/{shelf}/books/{book}", ""),
            ),
            method(
                "PublishBook",
                "",
                "PublishBookRequest",
                "Book",
                &[("name", Scalar)],
                HttpRule::new(Verb::Post, "/v1/{name=shelves/*/books/*}:publish", ""),
            ),
            method(
                "SubmitReview",
                "reviews a book",
                "SubmitReviewRequest",
                "Review",
                &[
                    ("shelf", Scalar),
                    ("book", Scalar),
                    ("rating", Scalar),
                    ("comment", Scalar),
                    ("tags", Repeated),
                ],
                HttpRule::new(Verb::Post, "/v1/shelves/{shelf}/books/{book}/reviews", "*")
                    .with_options(BindingOptions::new(BodyEncoding::Form)),
            ),
            method(
                "UploadCover",
                "uploads a cover image",
                "UploadCoverRequest",
                "Cover",
                &[
                    ("shelf", Scalar),
                    ("book", Scalar),
                    ("caption", Scalar),
                    ("image", Bytes),
                ],
                HttpRule::new(Verb::Post, "/v1/shelves/{shelf}/books/{book}/cover", "*")
                    .with_options(BindingOptions::new(BodyEncoding::Multipart)),
            ),
            method(
                "PutContent",
                "replaces the content of a book",
                "PutContentRequest",
                "Content",
                &[("shelf", Scalar), ("book", Scalar), ("content", Bytes)],
                HttpRule::new(Verb::Put, "/v1/shelves/{shelf}/books/{book}/content", "content"),
            ),
        ],
        ..Default::default()
    };

    FileDescriptor {
        name: "library/v1/library.proto".to_owned(),
        package: "library.v1".to_owned(),
        services: vec![shelves, books],
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=build.rs");

    let out_dir = PathBuf::from(std::env::var("OUT_DIR")?);

    for file in protoapi_codegen::generate(&[library()], &Config::default())? {
        let path = out_dir.join(&file.name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, file.content)?;
    }

    Ok(())
}
