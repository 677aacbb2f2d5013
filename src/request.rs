use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    Method, Url,
};
use serde::Serialize;

use crate::{CodeRefsError, Result};

/// An outbound request that can be sent any number of times.
///
/// Unlike [`reqwest::Request`], nothing here is consumed by sending: every
/// attempt gets its own copy through [`RequestDescriptor::to_request`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestDescriptor {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
}

impl RequestDescriptor {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Sets a header, replacing any existing value under the same
    /// (case-insensitive) name.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serializes `value` as the JSON body. Headers are left untouched.
    pub fn json<T: Serialize + ?Sized>(self, value: &T) -> Result<Self> {
        let bytes =
            serde_json::to_vec(value).map_err(|err| CodeRefsError::Encode(err.to_string()))?;
        Ok(self.body(bytes))
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body_bytes(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// Builds a fresh sendable request carrying this descriptor's method,
    /// URL, headers and body.
    pub fn to_request(&self) -> reqwest::Request {
        let mut request = reqwest::Request::new(self.method.clone(), self.url.clone());
        *request.headers_mut() = self.headers.clone();
        if let Some(body) = &self.body {
            *request.body_mut() = Some(body.clone().into());
        }
        request
    }
}

#[cfg(test)]
mod tests {
    use reqwest::{
        header::{HeaderName, HeaderValue, CONTENT_TYPE},
        Method, Url,
    };

    use super::RequestDescriptor;

    fn descriptor() -> RequestDescriptor {
        RequestDescriptor::new(Method::POST, Url::parse("https://example.com/x").unwrap())
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .json(&["main"])
            .unwrap()
    }

    #[test]
    fn header_names_replace_case_insensitively() {
        let request = descriptor().header(
            HeaderName::from_static("content-type"),
            HeaderValue::from_static("text/plain"),
        );
        assert_eq!(request.headers().len(), 1);
        assert_eq!(request.headers()[CONTENT_TYPE], "text/plain");
    }

    #[test]
    fn to_request_leaves_descriptor_intact() {
        let descriptor = descriptor();
        let first = descriptor.to_request();
        let second = descriptor.to_request();

        for request in [&first, &second] {
            assert_eq!(request.method(), Method::POST);
            assert_eq!(request.url().as_str(), "https://example.com/x");
            assert_eq!(request.headers()[CONTENT_TYPE], "application/json");
            let body = request.body().and_then(|body| body.as_bytes());
            assert_eq!(body, Some(&b"[\"main\"]"[..]));
        }
        assert_eq!(descriptor.body_bytes(), Some(&b"[\"main\"]"[..]));
    }
}
