use futures::stream::Stream;
use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use crate::dummy::DummyController;
use crate::mock::MockController;
use crate::timeout::TimeoutController;
use crate::types::*;
use ollaix_core::{Model, Result};

/// Boxed stream of chat events borrowed from a controller
pub type ChatStream<'a> = Pin<Box<dyn Stream<Item = StreamEvent> + Send + 'a>>;

/// Backend that lists models and streams replies
///
/// A stream yields deltas in order and ends with exactly one terminal
/// `Done` or `Error` event. Implementations stop yielding once the cancel
/// token fires.
#[async_trait::async_trait]
pub trait ChatController: Send + Sync {
    /// Models available for selection
    async fn list_models(&self) -> Result<Vec<Model>>;

    /// Stream the assistant reply to `request.turn`
    async fn send_message<'a>(&'a self, request: ChatRequest, cancel: CancelToken) -> Result<ChatStream<'a>>;
}

/// Where the controller gets its replies
#[derive(Debug, Clone, Default)]
pub enum ControllerKind {
    /// Scripted replies from a TOML file
    Mock(std::path::PathBuf),
    /// Random lorem-ipsum replies
    #[default]
    Dummy,
}

pub struct ControllerFactory;

impl ControllerFactory {
    /// Build a controller, optionally wrapped with a stall timeout
    pub fn create(kind: &ControllerKind, stall_timeout: Option<Duration>) -> Result<Arc<dyn ChatController>> {
        let controller: Arc<dyn ChatController> = match kind {
            ControllerKind::Mock(path) => Arc::new(MockController::from_file(path)?),
            ControllerKind::Dummy => Arc::new(DummyController::new()),
        };

        Ok(match stall_timeout {
            Some(timeout) => Arc::new(TimeoutController::new(controller, timeout)),
            None => controller,
        })
    }

    pub fn from_mock_path(path: Option<&Path>) -> ControllerKind {
        match path {
            Some(path) => ControllerKind::Mock(path.to_path_buf()),
            None => ControllerKind::Dummy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use ollaix_core::Turn;
    use std::io::Write;

    #[tokio::test]
    async fn test_factory_dummy() {
        let controller = ControllerFactory::create(&ControllerKind::Dummy, None).unwrap();
        let models = controller.list_models().await.unwrap();
        assert_eq!(models[0].id, crate::dummy::DUMMY_MODEL_ID);
    }

    #[tokio::test]
    async fn test_factory_mock_with_timeout() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[[responses]]\ntype = \"text\"\ncontent = \"scripted\"").unwrap();

        let kind = ControllerFactory::from_mock_path(Some(file.path()));
        let controller = ControllerFactory::create(&kind, Some(Duration::from_secs(5))).unwrap();

        let request = ChatRequest::new("mock-model", Turn::user("hi"), vec![]);
        let events: Vec<StreamEvent> =
            controller.send_message(request, CancelToken::new()).await.unwrap().collect().await;
        assert_eq!(events, vec![StreamEvent::Content("scripted".into()), StreamEvent::Done]);
    }

    #[test]
    fn test_factory_missing_mock_file() {
        let kind = ControllerKind::Mock("/nonexistent/mock.toml".into());
        assert!(ControllerFactory::create(&kind, None).is_err());
    }

    #[test]
    fn test_from_mock_path() {
        assert!(matches!(ControllerFactory::from_mock_path(None), ControllerKind::Dummy));
        assert!(matches!(
            ControllerFactory::from_mock_path(Some(Path::new("m.toml"))),
            ControllerKind::Mock(_)
        ));
    }
}
