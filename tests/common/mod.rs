#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use openweather_mcp::{
    ApiKey, Endpoints, OpenWeather, Query, Units, Upstream, UpstreamError,
};
use serde_json::Value;

pub const API_KEY: &str = "test-key";

/// Canned upstream behavior for one call.
#[derive(Debug, Clone)]
pub enum Reply {
    Json(Value),
    Status(u16, &'static str),
    BadJson,
    Transport,
}

/// Records every call and replays queued replies keyed by URL.
#[derive(Clone, Default)]
pub struct MockUpstream {
    replies: Arc<Mutex<HashMap<String, VecDeque<Reply>>>>,
    calls: Arc<Mutex<Vec<(String, Query)>>>,
}

impl MockUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, url: impl Into<String>, reply: Reply) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .entry(url.into())
            .or_default()
            .push_back(reply);
        self
    }

    pub fn calls(&self) -> Vec<(String, Query)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, url: &str) -> Vec<Query> {
        self.calls()
            .into_iter()
            .filter(|(u, _)| u == url)
            .map(|(_, q)| q)
            .collect()
    }
}

async fn transport_error() -> reqwest::Error {
    reqwest::Client::new()
        .get("not a url")
        .send()
        .await
        .unwrap_err()
}

#[async_trait]
impl Upstream for MockUpstream {
    async fn get_json(&self, url: &str, query: &Query) -> Result<Value, UpstreamError> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), query.clone()));

        let reply = self
            .replies
            .lock()
            .unwrap()
            .get_mut(url)
            .and_then(|queue| queue.pop_front());

        match reply {
            Some(Reply::Json(value)) => Ok(value),
            Some(Reply::Status(status, message)) => Err(UpstreamError::Status {
                status,
                message: message.to_string(),
            }),
            Some(Reply::BadJson) => {
                Err(serde_json::from_str::<Value>("<html>").unwrap_err().into())
            }
            Some(Reply::Transport) => Err(transport_error().await.into()),
            None => panic!("unexpected upstream call to {url}"),
        }
    }
}

pub fn endpoints() -> Endpoints {
    Endpoints::with_root("http://upstream.test")
}

pub fn api(mock: &MockUpstream) -> Arc<OpenWeather<MockUpstream>> {
    Arc::new(OpenWeather::new(
        mock.clone(),
        ApiKey::new(API_KEY).unwrap(),
        endpoints(),
        Units::Metric,
    ))
}

pub fn query_value<'a>(query: &'a Query, key: &str) -> Option<&'a str> {
    query
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v.as_str())
}
