#![deny(missing_docs)]
//! InfoMax API contains the retrieval consumer module traits and the basic
//! types required to define the api of those traits.
//!
//! If you want to run an InfoMax consumer, please see the infomax_core crate.

/// Boxed future type.
pub type BoxFut<'a, T> =
    std::pin::Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

pub mod builder;
pub mod config;
pub mod consumer;
pub mod face;

mod error;
pub use error::*;

mod name;
pub use name::*;

pub mod protocol;
pub use protocol::{FetchOutcome, Request, Response};
