pub mod raw_client;

#[cfg(test)]
pub mod mock_raw_client;

#[cfg(test)]
pub use mock_raw_client::{MockCall, MockRawClient};

pub use raw_client::{cancellable, HttpRawClient, RawClient, RawResponse, DEFAULT_TIMEOUT};
