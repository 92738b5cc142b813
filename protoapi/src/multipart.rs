//! `multipart/form-data` bodies built on `reqwest::multipart`.
//!
//! [`Writer`] collects parts into a [`Form`] and hands the form over to the
//! slot it was created with when dropped, on any exit path of the scope owning
//! the writer. [`encode`] then turns the closed form into an in-memory body.

use std::fmt::Display;

use futures::TryStreamExt;
pub use reqwest::multipart::{Form, Part};

use crate::request::Body;
use crate::Result;

/// Media type of multipart bodies, without the boundary parameter.
pub const CONTENT_TYPE: &str = "multipart/form-data";

pub struct Writer<'f> {
    slot: &'f mut Option<Form>,
    form: Option<Form>,
}

impl<'f> Writer<'f> {
    pub fn new(slot: &'f mut Option<Form>) -> Self {
        Self {
            slot,
            form: Some(Form::new()),
        }
    }

    /// Write a text part.
    pub fn write_field(&mut self, name: &str, value: impl Display) {
        let (name, value) = (name.to_owned(), value.to_string());
        self.update(|form| form.text(name, value));
    }

    /// Write a binary part with a file name.
    pub fn write_file(&mut self, name: &str, file_name: &str, data: &[u8]) {
        let name = name.to_owned();
        let part = Part::bytes(data.to_vec()).file_name(file_name.to_owned());
        self.update(|form| form.part(name, part));
    }

    /// Hand the form over to the slot. Called on drop, repeated calls are no-ops.
    pub fn close(&mut self) {
        if let Some(form) = self.form.take() {
            *self.slot = Some(form);
        }
    }

    fn update(&mut self, write: impl FnOnce(Form) -> Form) {
        debug_assert!(self.form.is_some(), "part written after close");
        self.form = self.form.take().map(write);
    }
}

impl Drop for Writer<'_> {
    fn drop(&mut self) {
        self.close();
    }
}

/// Full `Content-Type` value of `form`, boundary included.
pub fn content_type(form: &Form) -> String {
    format!("{CONTENT_TYPE}; boundary={}", form.boundary())
}

/// Body and content type of an encoded form.
#[derive(Debug)]
pub struct Encoded {
    pub content_type: String,
    pub body: Body,
}

/// Encode `form` into a buffered body. A form without parts encodes to an
/// empty body.
pub async fn encode(form: Form) -> Result<Encoded> {
    let content_type = content_type(&form);

    let buf = form
        .into_stream()
        .try_fold(Vec::new(), |mut buf, chunk| async move {
            buf.extend_from_slice(&chunk);
            Ok(buf)
        })
        .await?;

    Ok(Encoded {
        content_type,
        body: Body::from(buf),
    })
}
