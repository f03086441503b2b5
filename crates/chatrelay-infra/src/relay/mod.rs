//! Client-side transport to the backend gateway.

pub mod http_transport;

pub use http_transport::HttpGatewayTransport;
