//! Face (transport session) related types.
//!
//! A face is the consumer's session with a forwarding node. It is an
//! external collaborator of this core: implementations own connection
//! management and wire encoding, and are specified here only at their
//! interface boundary.

use crate::*;
#[cfg(any(test, feature = "mockall"))]
use mockall::automock;
use std::sync::Arc;

/// A session with a forwarding node over which requests are expressed.
#[cfg_attr(any(test, feature = "mockall"), automock)]
pub trait Face: 'static + Send + Sync + std::fmt::Debug {
    /// Express one request over this face.
    ///
    /// The returned future resolves exactly once: with
    /// [FetchOutcome::Data] if a data object arrived within the request
    /// lifetime, or [FetchOutcome::Timeout] if it did not. An `Err`
    /// result is a transport failure, not a timeout.
    fn express_request(
        &self,
        request: Request,
    ) -> BoxFut<'_, ImResult<FetchOutcome>>;

    /// Close this face. Session-level events stop after the
    /// [FaceHandler::on_close] notification fires.
    fn close(&self) -> BoxFut<'_, ()>;
}

/// Trait-object [Face].
pub type DynFace = Arc<dyn Face>;

/// Handler for session-level events coming out of a face.
pub trait FaceHandler: 'static + Send + Sync + std::fmt::Debug {
    /// The face is open and requests can be expressed.
    fn on_open(&self) {}

    /// The face has closed.
    fn on_close(&self) {}

    /// The face failed, e.g. the connection to the forwarder errored.
    /// This is informational: the face itself decides whether the
    /// session survives.
    fn on_error(&self, reason: String) {
        drop(reason);
    }
}

/// Trait-object [FaceHandler].
pub type DynFaceHandler = Arc<dyn FaceHandler>;

/// A factory for constructing Face instances.
pub trait FaceFactory: 'static + Send + Sync + std::fmt::Debug {
    /// Help the builder construct a default config from the chosen
    /// module factories.
    fn default_config(&self, config: &mut config::Config) -> ImResult<()>;

    /// Construct a face instance. Opening the session is part of
    /// construction: the handler receives [FaceHandler::on_open] once
    /// the face is usable.
    fn create(
        &self,
        builder: Arc<builder::Builder>,
        handler: DynFaceHandler,
    ) -> BoxFut<'static, ImResult<DynFace>>;
}

/// Trait-object [FaceFactory].
pub type DynFaceFactory = Arc<dyn FaceFactory>;
