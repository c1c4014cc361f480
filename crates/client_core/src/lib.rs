//! Client side of the webhook transformer: debounced triggering, the request
//! cycle against the remote transform endpoint, and the display state it feeds.

pub mod controller;
pub mod debounce;
pub mod transport;

pub use controller::{
    ControllerEvent, ControllerSettings, ControllerSnapshot, CycleOutcome, CycleReport,
    TransformController, TriggerControl, DEFAULT_DEBOUNCE,
};
pub use debounce::Debouncer;
pub use transport::{
    EndpointError, HttpTransformTransport, TransformTransport, DEFAULT_ENDPOINT_PATH,
    DEFAULT_REQUEST_TIMEOUT,
};
