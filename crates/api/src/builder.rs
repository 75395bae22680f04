//! Builder-related types.

use crate::*;
use std::sync::Arc;

/// The general InfoMax builder.
/// This contains both configuration and factory instances,
/// allowing construction of runtime module instances.
#[derive(Debug)]
pub struct Builder {
    /// The module configuration to be used when building modules.
    /// This can be loaded from disk or modified before freezing the builder.
    pub config: crate::config::Config,

    /// The [face::FaceFactory] to be used for creating
    /// [face::Face] instances.
    pub face: face::DynFaceFactory,

    /// The [consumer::ConsumerFactory] to be used for creating
    /// [consumer::Consumer] instances.
    pub consumer: consumer::DynConsumerFactory,
}

impl Builder {
    /// Construct a default config given the configured module factories.
    /// Note, this should be called before freezing the Builder instance
    /// in an Arc<>.
    pub fn set_default_config(&mut self) -> ImResult<()> {
        let Self {
            config,
            face,
            consumer,
        } = self;

        face.default_config(config)?;
        consumer.default_config(config)?;

        Ok(())
    }

    /// Freeze the builder so module factories can hold it while
    /// constructing their instances.
    pub fn build(self) -> Arc<Self> {
        Arc::new(self)
    }
}
