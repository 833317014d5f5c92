pub mod controller;
pub mod dummy;
pub mod mock;
pub mod timeout;
pub mod types;
pub mod update_probe;

pub use controller::{ChatController, ChatStream, ControllerFactory, ControllerKind};
pub use dummy::{DUMMY_MODEL_ID, DummyController, DummyTiming};
pub use mock::{MOCK_MODEL_ID, MockController, MockEvent, MockResponse};
pub use timeout::TimeoutController;
pub use types::{CancelToken, ChatMessage, ChatRequest, StreamEvent};
pub use update_probe::{
    Connectivity, HttpUpdateProbe, ReleaseRegistration, SharedConnectivity, TickOutcome, UpdateChecker, UpdateEvent,
    UpdateProbe, UpdateRegistration,
};

pub use ollaix_core::{Error, Result};
