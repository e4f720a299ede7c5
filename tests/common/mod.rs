#![allow(dead_code)]

use async_trait::async_trait;
use avito_scout::error::ExtractError;
use avito_scout::scrapers::{ExtractRequest, Extractor};
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Which schema a request asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Pagination,
    Listings,
}

fn kind_of(request: &ExtractRequest) -> Kind {
    if request.schema["properties"].get("page_links").is_some() {
        Kind::Pagination
    } else {
        Kind::Listings
    }
}

/// Extractor that replays canned responses per (kind, url).
///
/// Each call pops the next response; the last one repeats once the queue is
/// down to a single entry. Unscripted calls fail with a 404.
#[derive(Default)]
pub struct ScriptedExtractor {
    script: Mutex<HashMap<(Kind, String), VecDeque<Result<Value, ExtractError>>>>,
    calls: Mutex<Vec<(Kind, String)>>,
}

impl ScriptedExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(self, kind: Kind, url: &str, response: Result<Value, ExtractError>) -> Self {
        self.script
            .lock()
            .unwrap()
            .entry((kind, url.to_string()))
            .or_default()
            .push_back(response);
        self
    }

    pub fn calls(&self) -> Vec<(Kind, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn listing_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|(kind, _)| *kind == Kind::Listings)
            .map(|(_, url)| url)
            .collect()
    }
}

#[async_trait]
impl Extractor for ScriptedExtractor {
    async fn extract(&self, request: &ExtractRequest) -> Result<Value, ExtractError> {
        let kind = kind_of(request);
        self.calls.lock().unwrap().push((kind, request.url.clone()));

        let mut script = self.script.lock().unwrap();
        let Some(queue) = script.get_mut(&(kind, request.url.clone())) else {
            return Err(ExtractError::Http { status: 404, body: format!("unscripted {}", request.url) });
        };

        if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue.front().unwrap().clone()
        }
    }

    fn backend_name(&self) -> &'static str {
        "Scripted"
    }
}

pub fn links(paths: &[&str]) -> Value {
    json!({ "page_links": paths.iter().map(|p| json!({ "link": p })).collect::<Vec<_>>() })
}

pub fn listings(titles: &[&str]) -> Value {
    json!({
        "listings": titles
            .iter()
            .map(|t| json!({ "title": t, "price": "10 000 000 ₽", "location": "Москва" }))
            .collect::<Vec<_>>()
    })
}

pub fn rate_limited() -> Result<Value, ExtractError> {
    Err(ExtractError::RateLimited("429 Too Many Requests".to_string()))
}

pub fn server_error() -> Result<Value, ExtractError> {
    Err(ExtractError::Http { status: 500, body: "internal error".to_string() })
}
