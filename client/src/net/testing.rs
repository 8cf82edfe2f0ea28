//! Scripted transport for exercising `ApiClient` without a browser.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use futures::channel::oneshot;

use super::api::{ApiError, HttpRequest, HttpResponse, Transport};
use super::api::ApiClient;
use super::signal::UnauthorizedSignal;
use crate::util::token_store::MemoryTokenStore;

type Reply = Result<HttpResponse, ApiError>;

enum Scripted {
    Ready(Reply),
    Deferred(oneshot::Receiver<Reply>),
}

/// Replays queued replies in order and records every request it sees.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    replies: Arc<Mutex<VecDeque<Scripted>>>,
    sent: Arc<Mutex<Vec<HttpRequest>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, reply: Reply) {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Scripted::Ready(reply));
    }

    pub fn push_json(&self, status: u16, body: serde_json::Value) {
        self.push(Ok(HttpResponse::new(status, body.to_string())));
    }

    /// Queue a reply that stays pending until the returned sender fires.
    pub fn push_deferred(&self) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Scripted::Deferred(rx));
        tx
    }

    pub fn sent(&self) -> Vec<HttpRequest> {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Reply {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner).push(request);
        let next = self.replies.lock().unwrap_or_else(PoisonError::into_inner).pop_front();
        match next {
            Some(Scripted::Ready(reply)) => reply,
            Some(Scripted::Deferred(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(ApiError::Network("deferred reply dropped".to_owned()))),
            None => Err(ApiError::Network("no scripted reply".to_owned())),
        }
    }
}

pub type TestApi = ApiClient<ScriptedTransport, MemoryTokenStore>;

/// Client over a fresh scripted transport, sharing `tokens` and `signal`.
pub fn test_api(tokens: &MemoryTokenStore, signal: &UnauthorizedSignal) -> (TestApi, ScriptedTransport) {
    let transport = ScriptedTransport::new();
    let api = ApiClient::new(transport.clone(), tokens.clone(), signal.clone(), "http://api.test/api/");
    (api, transport)
}
