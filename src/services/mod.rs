//! Services composing adapters, exchangers and storage

pub mod dispatcher;

pub use dispatcher::ServiceDispatcher;
