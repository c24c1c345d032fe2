use async_trait::async_trait;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, HeaderMap};
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use std::time::Duration;

use crate::domain::http::{HttpMethod, MultipartForm, OutgoingRequest, RawResponse, RequestBody};
use crate::domain::ports::Transport;

// Thin reqwest transport; all auth and decoding policy lives above it.
#[derive(Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }
}

fn method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn multipart(form: MultipartForm) -> Form {
    let mut out = Form::new();
    if let Some(file) = form.file {
        out = out.part("file", Part::bytes(file.bytes).file_name(file.file_name));
    }
    for (name, value) in form.fields {
        out = out.text(name, value);
    }
    out
}

fn header(headers: &HeaderMap, name: reqwest::header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: OutgoingRequest) -> Result<RawResponse, String> {
        let mut builder = self.http.request(method(request.method), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.body(value.to_string()),
            // reqwest sets the multipart content type and boundary itself.
            RequestBody::Multipart(form) => builder.multipart(multipart(form)),
        };

        let response = builder.send().await.map_err(|e| e.to_string())?;
        let status = response.status().as_u16();
        let content_type = header(response.headers(), CONTENT_TYPE);
        let content_length = header(response.headers(), CONTENT_LENGTH);
        let body = response.text().await.map_err(|e| e.to_string())?;

        Ok(RawResponse {
            status,
            content_type,
            content_length,
            body,
        })
    }
}
