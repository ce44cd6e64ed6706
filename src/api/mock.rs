//! Recording transport for controller tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::api::{ApiRequest, ApiResponse, Method, Transport};
use crate::error::{AppError, Result};

enum Reply {
    Respond(ApiResponse),
    Fail,
}

#[derive(Default)]
struct State {
    replies: HashMap<(Method, String), VecDeque<Reply>>,
    calls: Vec<ApiRequest>,
}

/// Spy transport: replays queued answers per `(method, path)` and records
/// every request. The last queued answer for a route is reused once the
/// queue would run dry. Unknown routes answer 404.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<State>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, method: Method, path: &str, status: u16, body: Value) {
        self.push(
            method,
            path,
            Reply::Respond(ApiResponse {
                status,
                body: Some(body),
            }),
        );
    }

    pub fn fail(&self, method: Method, path: &str) {
        self.push(method, path, Reply::Fail);
    }

    fn push(&self, method: Method, path: &str, reply: Reply) {
        let mut state = self.state.lock().unwrap();
        state
            .replies
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
    }

    pub fn calls(&self) -> Vec<ApiRequest> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|c| c.method == method && c.path == path)
            .count()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let mut state = self.state.lock().unwrap();
        let key = (request.method, request.path.clone());
        state.calls.push(request);

        let Some(queue) = state.replies.get_mut(&key) else {
            return Ok(ApiResponse {
                status: 404,
                body: None,
            });
        };
        let reply = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().map(|r| match r {
                Reply::Respond(response) => Reply::Respond(response.clone()),
                Reply::Fail => Reply::Fail,
            })
        };

        match reply {
            Some(Reply::Respond(response)) => Ok(response),
            Some(Reply::Fail) | None => Err(AppError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            ))),
        }
    }
}
