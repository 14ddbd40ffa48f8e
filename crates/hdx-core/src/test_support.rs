//! In-memory connection for driving the poller and paginator in tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use crate::error::{ProtocolError, TransportError};
use crate::fhir::{Page, QueryStatus};
use crate::traits::FhirConnection;
use crate::types::{BaseUrl, RecordId};
use crate::Result;

/// One scripted answer to a status check.
#[derive(Debug, Clone, Copy)]
pub enum Reply {
    Status(u16),
    Fail,
}

/// Answers status checks from a script (repeating the last reply once the
/// script runs out) and serves pages by exact URL.
pub struct ScriptedConnection {
    base: BaseUrl,
    replies: Mutex<VecDeque<Reply>>,
    last_reply: Mutex<Option<Reply>>,
    status_checks: Mutex<usize>,
    pages: HashMap<String, Value>,
    page_requests: Mutex<Vec<String>>,
}

impl ScriptedConnection {
    pub fn new() -> Self {
        Self {
            base: BaseUrl::new("https://fhir.test").unwrap(),
            replies: Mutex::new(VecDeque::new()),
            last_reply: Mutex::new(None),
            status_checks: Mutex::new(0),
            pages: HashMap::new(),
            page_requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_statuses(replies: impl IntoIterator<Item = Reply>) -> Self {
        let conn = Self::new();
        conn.replies.lock().unwrap().extend(replies);
        conn
    }

    /// Serve `body` for `url` (absolute).
    pub fn page(mut self, url: &str, body: Value) -> Self {
        self.pages.insert(url.to_string(), body);
        self
    }

    pub fn status_checks(&self) -> usize {
        *self.status_checks.lock().unwrap()
    }

    pub fn page_requests(&self) -> Vec<String> {
        self.page_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl FhirConnection for ScriptedConnection {
    fn base_url(&self) -> &BaseUrl {
        &self.base
    }

    async fn query_status(&self, _patient: &RecordId) -> Result<QueryStatus> {
        *self.status_checks.lock().unwrap() += 1;

        let reply = {
            let mut last = self.last_reply.lock().unwrap();
            let reply = self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .or(*last)
                .expect("status script is empty");
            *last = Some(reply);
            reply
        };

        match reply {
            Reply::Status(status) => Ok(QueryStatus::from_status(status, None)),
            Reply::Fail => Err(TransportError::Connection {
                message: "connection reset".to_string(),
            }
            .into()),
        }
    }

    async fn fetch_page(&self, url: &Url) -> Result<Page> {
        self.page_requests.lock().unwrap().push(url.to_string());

        match self.pages.get(url.as_str()) {
            Some(body) => Ok(serde_json::from_value(body.clone()).unwrap()),
            None => Err(ProtocolError::new(404, url.as_str(), None).into()),
        }
    }
}
