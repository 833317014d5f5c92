use std::sync::Arc;

use futures::StreamExt;
use ollaix_core::Model;
use ollaix_providers::{CancelToken, ChatController, ChatRequest, StreamEvent};
use tokio::{sync::mpsc, task::JoinHandle};

/// Messages from background controller tasks to the event loop
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Result of the model list fetch
    Models(Result<Vec<Model>, String>),
    /// One event from the stream started as `generation`
    Stream { generation: u64, event: StreamEvent },
    /// The task for `generation` has exited
    Finished { generation: u64 },
}

struct ActiveSend {
    generation: u64,
    cancel: CancelToken,
    handle: JoinHandle<()>,
}

/// Runs controller calls off the event loop and tags their output
///
/// Each send gets a new generation number. Events from an older generation
/// are stale and must be dropped by the receiver, which is how a cancelled
/// or superseded reply is kept out of the transcript.
pub struct ChatSession {
    controller: Arc<dyn ChatController>,
    events: mpsc::UnboundedSender<SessionEvent>,
    generation: u64,
    active: Option<ActiveSend>,
}

impl ChatSession {
    pub fn new(controller: Arc<dyn ChatController>) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        (Self { controller, events, generation: 0, active: None }, rx)
    }

    /// Fetch the model list in the background
    pub fn load_models(&self) {
        let controller = Arc::clone(&self.controller);
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = controller.list_models().await.map_err(|e| e.to_string());
            if let Err(e) = &result {
                tracing::warn!(error = %e, "model list fetch failed");
            }
            let _ = events.send(SessionEvent::Models(result));
        });
    }

    /// Start streaming a reply; any send still running is cancelled first
    pub fn send(&mut self, request: ChatRequest) -> u64 {
        self.cancel();
        self.generation += 1;
        let generation = self.generation;

        tracing::info!(generation, model = %request.model, prior = request.prior.len(), "starting send");

        let controller = Arc::clone(&self.controller);
        let events = self.events.clone();
        let cancel = CancelToken::new();
        let task_cancel = cancel.clone();

        let handle = tokio::spawn(async move {
            match controller.send_message(request, task_cancel.clone()).await {
                Ok(mut stream) => {
                    while let Some(event) = stream.next().await {
                        if task_cancel.is_cancelled() {
                            break;
                        }
                        let terminal = event.is_terminal();
                        if events.send(SessionEvent::Stream { generation, event }).is_err() || terminal {
                            break;
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(generation, error = %e, "send failed");
                    let event = StreamEvent::Error(e.to_string());
                    let _ = events.send(SessionEvent::Stream { generation, event });
                }
            }
            let _ = events.send(SessionEvent::Finished { generation });
        });

        self.active = Some(ActiveSend { generation, cancel, handle });
        generation
    }

    /// Cancel the running send; returns whether one was running
    ///
    /// The generation is bumped so anything the task already queued is stale.
    pub fn cancel(&mut self) -> bool {
        let Some(active) = self.active.take() else {
            return false;
        };
        active.cancel.cancel();
        self.generation += 1;
        tracing::info!(generation = active.generation, "send cancelled");
        true
    }

    /// Whether events tagged `generation` belong to the running send
    pub fn is_current(&self, generation: u64) -> bool {
        self.active.as_ref().is_some_and(|a| a.generation == generation)
    }

    /// Forget the send for `generation` once its task has exited
    pub fn finish(&mut self, generation: u64) {
        if self.is_current(generation) {
            self.active = None;
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        if let Some(active) = self.active.take() {
            active.cancel.cancel();
            active.handle.abort();
        }
    }
}
