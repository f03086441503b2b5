//! Client relay: submits user lines to the gateway with bounded retry and
//! hands formatted replies to a view.

pub mod client;
pub mod format;
pub mod retry;
pub mod transport;
pub mod view;
