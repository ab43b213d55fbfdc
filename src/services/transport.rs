//! Remote Transport
//!
//! The grid talks to a remote endpoint through the [`Transport`] trait: issue
//! a GET with query parameters, get back one page of records and the total
//! row count. [`HttpTransport`] is the reqwest-backed implementation.

use std::time::Duration;

use futures::future::BoxFuture;
use serde_json::Value;

use crate::components::composite::data_grid::Record;
use crate::error::{Error, Result};
use crate::services::runtime::run_in_tokio;

/// A GET request: endpoint plus ordered query parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteQuery {
    pub url: String,
    pub params: Vec<(String, String)>,
}

impl RemoteQuery {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            params: Vec::new(),
        }
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.params.push((name.into(), value.into()));
    }

    /// First value for a parameter name
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// One page of records plus the total row count on the server
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemotePage {
    pub records: Vec<Record>,
    pub total_count: usize,
}

/// HTTP-capable client used by remote grids
pub trait Transport: Send + Sync + 'static {
    /// Issue a GET and resolve to a page, or fail without retrying
    fn get(&self, query: RemoteQuery) -> BoxFuture<'static, Result<RemotePage>>;
}

/// Where records and the total count live in a response body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseShape {
    pub records_key: String,
    pub total_key: String,
}

impl Default for ResponseShape {
    fn default() -> Self {
        Self {
            records_key: "data".to_string(),
            total_key: "total".to_string(),
        }
    }
}

/// Extract a [`RemotePage`] from a JSON response body.
///
/// A missing total falls back to the number of records returned.
pub fn parse_response(mut body: Value, shape: &ResponseShape) -> Result<RemotePage> {
    let total = body.get(&shape.total_key).and_then(Value::as_u64);

    let items = match body.get_mut(&shape.records_key).map(Value::take) {
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(Error::Transport {
                message: format!("response field `{}` is not an array", shape.records_key),
            });
        }
        None => {
            return Err(Error::Transport {
                message: format!("response has no `{}` field", shape.records_key),
            });
        }
    };

    let records = items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(record) => Ok(record),
            _ => Err(Error::malformed(
                format!("{}[{i}]", shape.records_key),
                "record is not an object",
            )),
        })
        .collect::<Result<Vec<_>>>()?;

    let total_count = total.map_or(records.len(), |n| n as usize);
    Ok(RemotePage {
        records,
        total_count,
    })
}

/// reqwest-backed transport
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    shape: ResponseShape,
    timeout: Option<Duration>,
}

impl HttpTransport {
    pub fn new(shape: ResponseShape) -> Self {
        Self::with_client(reqwest::Client::new(), shape)
    }

    /// Use a preconfigured client (auth headers, proxies, ...)
    pub fn with_client(client: reqwest::Client, shape: ResponseShape) -> Self {
        Self {
            client,
            shape,
            timeout: None,
        }
    }

    /// Set the per-request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl Transport for HttpTransport {
    fn get(&self, query: RemoteQuery) -> BoxFuture<'static, Result<RemotePage>> {
        let client = self.client.clone();
        let shape = self.shape.clone();
        let timeout = self.timeout;

        Box::pin(run_in_tokio(fetch_page(client, shape, timeout, query)))
    }
}

async fn fetch_page(
    client: reqwest::Client,
    shape: ResponseShape,
    timeout: Option<Duration>,
    query: RemoteQuery,
) -> Result<RemotePage> {
    tracing::debug!(url = %query.url, params = ?query.params, "GET page");

    let mut request = client.get(&query.url).query(&query.params);
    if let Some(timeout) = timeout {
        request = request.timeout(timeout);
    }

    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(Error::Transport {
            message: format!("HTTP {}: {}", status.as_u16(), body),
        });
    }

    let body: Value = response.json().await?;
    parse_response(body, &shape)
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use super::*;

    /// Scripted transport: replays queued responses and records queries
    #[derive(Default)]
    pub struct MockTransport {
        responses: Mutex<VecDeque<Result<RemotePage>>>,
        queries: Mutex<Vec<RemoteQuery>>,
    }

    impl MockTransport {
        pub fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        pub fn respond(&self, response: Result<RemotePage>) {
            self.responses.lock().expect("lock").push_back(response);
        }

        pub fn queries(&self) -> Vec<RemoteQuery> {
            self.queries.lock().expect("lock").clone()
        }
    }

    impl Transport for MockTransport {
        fn get(&self, query: RemoteQuery) -> BoxFuture<'static, Result<RemotePage>> {
            self.queries.lock().expect("lock").push(query);
            let next = self
                .responses
                .lock()
                .expect("lock")
                .pop_front()
                .unwrap_or_else(|| {
                    Err(Error::Transport {
                        message: "no response queued".to_string(),
                    })
                });
            Box::pin(futures::future::ready(next))
        }
    }
}
