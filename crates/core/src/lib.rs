#![deny(missing_docs)]
//! InfoMax list-driven retrieval consumer for name-based networks.

use infomax_api::{builder::Builder, config::Config};

/// Construct a default builder.
///
/// - `face` - The default face is [factories::MemFaceFactory].
///            Note: this face answers from in-process published data;
///            production deployments provide a face backed by a real
///            forwarder session.
/// - `consumer` - The default consumer module is
///                [factories::CoreConsumerFactory].
pub fn default_builder() -> Builder {
    Builder {
        config: Config::default(),
        face: factories::MemFaceFactory::create(),
        consumer: factories::CoreConsumerFactory::create(),
    }
}

pub mod factories;
