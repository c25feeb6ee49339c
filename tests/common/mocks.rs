use async_trait::async_trait;
use matchcast::{
    Error, Result,
    llm::{LlmClient, StructuredRequest},
};
use std::collections::VecDeque;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};
use tokio::sync::{Semaphore, oneshot};

/// Scripted reply for one model call. `Err` becomes a provider failure.
pub type MockReply = std::result::Result<String, String>;

fn into_result(reply: MockReply) -> Result<String> {
    reply.map_err(Error::llm)
}

/// Mock LLM client for testing
#[derive(Debug, Default)]
pub struct MockLlmClient {
    pub responses: Arc<Mutex<Vec<MockReply>>>,
    pub requests: Arc<Mutex<Vec<StructuredRequest>>>,
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(self, text: &str) -> Self {
        self.add_reply(Ok(text.to_string()));
        self
    }

    pub fn with_error(self, error: &str) -> Self {
        self.add_reply(Err(error.to_string()));
        self
    }

    pub fn add_reply(&self, reply: MockReply) {
        self.responses.lock().unwrap().push(reply);
    }

    pub fn get_requests(&self) -> Vec<StructuredRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn generate_structured(&self, request: StructuredRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request);

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(Error::llm("No more mock responses available"));
        }

        into_result(responses.remove(0))
    }

    fn model(&self) -> String {
        "mock-model".to_string()
    }
}

/// LLM client whose calls block until the test releases them.
///
/// Each call takes the next gate in order and announces itself on `entered`.
#[derive(Debug)]
pub struct GatedLlmClient {
    gates: Mutex<VecDeque<oneshot::Receiver<MockReply>>>,
    pub entered: Semaphore,
    pub calls: AtomicUsize,
}

impl GatedLlmClient {
    pub fn new() -> Self {
        Self {
            gates: Mutex::new(VecDeque::new()),
            entered: Semaphore::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    /// Queues a gate for the next call; send on the returned handle to release it.
    pub fn add_gate(&self) -> oneshot::Sender<MockReply> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().push_back(rx);
        tx
    }

    pub async fn wait_entered(&self) {
        self.entered
            .acquire()
            .await
            .expect("semaphore closed")
            .forget();
    }
}

#[async_trait]
impl LlmClient for GatedLlmClient {
    async fn generate_structured(&self, _request: StructuredRequest) -> Result<String> {
        let gate = self.gates.lock().unwrap().pop_front();
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.entered.add_permits(1);

        let Some(gate) = gate else {
            return Err(Error::llm("No gate queued"));
        };

        match gate.await {
            Ok(reply) => into_result(reply),
            Err(_) => Err(Error::llm("Gate dropped")),
        }
    }

    fn model(&self) -> String {
        "gated-model".to_string()
    }
}
