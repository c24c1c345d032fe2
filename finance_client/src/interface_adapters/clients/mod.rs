// Outbound HTTP: the raw transport and the credential-aware client on top of it.

pub mod authenticated;
pub mod transport;

pub use authenticated::{ApiClient, ApiRequest};
pub use transport::ReqwestTransport;
