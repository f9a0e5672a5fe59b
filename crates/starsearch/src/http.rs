//! Transport seam shared by the GraphQL client and the page crawler.
//!
//! Everything that leaves the process goes through [`HttpTransport`], so the
//! whole pipeline can run against canned responses in tests.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
        })
    }
}

/// Header list in send order. Lookups go through [`header_get`].
pub type HttpHeaders = Vec<(String, String)>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HttpHeaders,
    pub body: Vec<u8>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// POST with a JSON payload; sets `Content-Type` accordingly.
    pub fn post_json(url: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body,
        }
    }

    #[must_use]
    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HttpHeaders,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// 2xx only; redirects are followed by the transport before this is seen.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self.status, 200..=299)
    }

    /// Body decoded as UTF-8, replacing invalid sequences.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("no canned response for {method} {url}")]
    Unrouted { method: HttpMethod, url: String },
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError>;
}

/// First value for `name`, compared case-insensitively.
#[must_use]
pub fn header_get<'a>(headers: &'a HttpHeaders, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find_map(|(key, value)| key.eq_ignore_ascii_case(name).then_some(value.as_str()))
}

/// Transport backed by a pooled [`reqwest::Client`].
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, HttpError> {
        reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map(Self::new)
            .map_err(transport_error)
    }
}

fn transport_error(err: reqwest::Error) -> HttpError {
    HttpError::Transport(err.to_string())
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let mut builder = match method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url).body(body),
        };
        for (name, value) in &headers {
            builder = builder.header(name, value);
        }

        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                Some((name.as_str().to_string(), value.to_str().ok()?.to_string()))
            })
            .collect();
        let body = response.bytes().await.map_err(transport_error)?.to_vec();

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
pub(crate) use mock::MockTransport;

#[cfg(test)]
mod mock {
    use std::collections::{HashMap, VecDeque};
    use std::sync::{Arc, Mutex, MutexGuard};

    use super::*;

    type Reply = Result<HttpResponse, String>;

    /// Replays queued replies per method and URL, recording every request.
    #[derive(Clone, Default)]
    pub(crate) struct MockTransport {
        state: Arc<Mutex<MockState>>,
    }

    #[derive(Default)]
    struct MockState {
        replies: HashMap<(HttpMethod, String), VecDeque<Reply>>,
        seen: Vec<HttpRequest>,
    }

    impl MockTransport {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        fn state(&self) -> MutexGuard<'_, MockState> {
            self.state.lock().expect("mock state lock")
        }

        pub(crate) fn push_response(
            &self,
            method: HttpMethod,
            url: impl Into<String>,
            response: HttpResponse,
        ) {
            self.enqueue(method, url.into(), Ok(response));
        }

        pub(crate) fn push_transport_error(
            &self,
            method: HttpMethod,
            url: impl Into<String>,
            message: impl Into<String>,
        ) {
            self.enqueue(method, url.into(), Err(message.into()));
        }

        fn enqueue(&self, method: HttpMethod, url: String, reply: Reply) {
            self.state()
                .replies
                .entry((method, url))
                .or_default()
                .push_back(reply);
        }

        pub(crate) fn requests(&self) -> Vec<HttpRequest> {
            self.state().seen.clone()
        }
    }

    #[async_trait]
    impl HttpTransport for MockTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
            let mut state = self.state();
            let (method, url) = (request.method, request.url.clone());
            state.seen.push(request);

            let reply = state
                .replies
                .get_mut(&(method, url.clone()))
                .and_then(VecDeque::pop_front)
                .ok_or(HttpError::Unrouted { method, url })?;
            reply.map_err(HttpError::Transport)
        }
    }
}
