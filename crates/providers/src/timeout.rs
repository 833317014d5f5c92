use crate::controller::{ChatController, ChatStream};
use crate::types::*;
use futures::StreamExt;
use ollaix_core::{Model, Result};
use std::sync::Arc;
use std::time::Duration;

/// Ends a stream with an error when no event arrives within `stall`
///
/// On expiry the inner controller is cancelled so it can release its
/// resources.
pub struct TimeoutController {
    inner: Arc<dyn ChatController>,
    stall: Duration,
}

impl TimeoutController {
    pub fn new(inner: Arc<dyn ChatController>, stall: Duration) -> Self {
        Self { inner, stall }
    }
}

#[async_trait::async_trait]
impl ChatController for TimeoutController {
    async fn list_models(&self) -> Result<Vec<Model>> {
        self.inner.list_models().await
    }

    async fn send_message<'a>(&'a self, request: ChatRequest, cancel: CancelToken) -> Result<ChatStream<'a>> {
        let mut inner = self.inner.send_message(request, cancel.clone()).await?;
        let stall = self.stall;

        let stream = async_stream::stream! {
            loop {
                match tokio::time::timeout(stall, inner.next()).await {
                    Ok(Some(event)) => {
                        let terminal = event.is_terminal();
                        yield event;
                        if terminal {
                            return;
                        }
                    }
                    Ok(None) => return,
                    Err(_) => {
                        tracing::warn!(stall_ms = stall.as_millis() as u64, "chat stream stalled");
                        cancel.cancel();
                        yield StreamEvent::Error(format!("timed out after {}s without a response", stall.as_secs()));
                        return;
                    }
                }
            }
        };

        Ok(Box::pin(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockController, MockEvent, MockResponse};
    use ollaix_core::Turn;

    fn request() -> ChatRequest {
        ChatRequest::new("mock-model", Turn::user("q"), vec![])
    }

    #[tokio::test]
    async fn test_timeout_passes_through() {
        let mock = MockController::new(vec![MockResponse::Text { content: "ok".into(), thinking: None }]);
        let controller = TimeoutController::new(Arc::new(mock), Duration::from_secs(1));

        let events: Vec<_> = controller.send_message(request(), CancelToken::new()).await.unwrap().collect().await;
        assert_eq!(events, vec![StreamEvent::Content("ok".into()), StreamEvent::Done]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_on_stall() {
        let mock = MockController::new(vec![MockResponse::Sequence {
            events: vec![
                MockEvent::Content { text: "part".into() },
                MockEvent::Delay { ms: 60_000 },
                MockEvent::Content { text: "late".into() },
            ],
        }]);
        let controller = TimeoutController::new(Arc::new(mock), Duration::from_secs(5));
        let cancel = CancelToken::new();

        let events: Vec<_> = controller.send_message(request(), cancel.clone()).await.unwrap().collect().await;
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], StreamEvent::Content("part".into()));
        assert!(matches!(&events[1], StreamEvent::Error(msg) if msg.contains("timed out")));
        assert!(cancel.is_cancelled());
    }
}
