//! InfoMax consumer module related types.

use crate::*;
use std::sync::Arc;

/// Handler for events coming out of an InfoMax consumer session.
///
/// Each callback is invoked at most once per corresponding session or
/// round-trip event, in the order the underlying events occur. The
/// session holds this handler as a passed-in interface value and never
/// holds the consumer object itself, so no reference cycle can form.
pub trait ConsumerHandler: 'static + Send + Sync + std::fmt::Debug {
    /// The session with the forwarder is open.
    fn on_open(&self) {}

    /// The session with the forwarder has closed.
    fn on_close(&self) {}

    /// A fetched element has arrived.
    ///
    /// `request` carries the element request name as issued. The
    /// response name has been normalized: the origin prefix components
    /// are stripped, leaving only the consumer-relevant suffix.
    fn on_data(&self, request: Request, response: Response);

    /// The underlying session reported a failure. The walk state is not
    /// reset by this event.
    fn on_error(&self, reason: String) {
        drop(reason);
    }
}

/// Trait-object [ConsumerHandler].
pub type DynConsumerHandler = Arc<dyn ConsumerHandler>;

/// Trait for implementing an InfoMax retrieval consumer.
///
/// A consumer discovers a list of content identifiers rooted under its
/// origin prefix via one round trip, then fetches each identified
/// element through a strictly sequential series of further round trips.
pub trait Consumer: 'static + Send + Sync + std::fmt::Debug {
    /// Discover and fetch up to `count` elements related to the origin
    /// prefix, in least-shared-prefix order.
    fn get(&self, count: u32) -> BoxFut<'_, ImResult<()>>;

    /// Discover and fetch elements related to the given suffix, in
    /// most-shared-prefix order.
    fn get_nearest_neighbor(&self, suffix: String)
        -> BoxFut<'_, ImResult<()>>;

    /// Close the session. Any in-flight walk is cancelled; no further
    /// handler callbacks fire after [ConsumerHandler::on_close].
    fn close(&self) -> BoxFut<'_, ()>;
}

/// Trait-object [Consumer].
pub type DynConsumer = Arc<dyn Consumer>;

/// A factory for constructing Consumer instances.
pub trait ConsumerFactory: 'static + Send + Sync + std::fmt::Debug {
    /// Help the builder construct a default config from the chosen
    /// module factories.
    fn default_config(&self, config: &mut config::Config) -> ImResult<()>;

    /// Construct a consumer instance rooted at the given origin prefix.
    /// The face is created (and opened) from the builder's face factory
    /// as part of construction.
    fn create(
        &self,
        builder: Arc<builder::Builder>,
        prefix: Name,
        handler: DynConsumerHandler,
    ) -> BoxFut<'static, ImResult<DynConsumer>>;
}

/// Trait-object [ConsumerFactory].
pub type DynConsumerFactory = Arc<dyn ConsumerFactory>;
