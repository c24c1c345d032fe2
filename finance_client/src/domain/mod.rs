// Domain layer: session record, endpoint table, resource records and ports.

pub mod endpoints;
pub mod errors;
pub mod http;
pub mod ports;
pub mod records;
pub mod session;

pub use endpoints::Endpoint;
pub use errors::{ActionError, AuthError, ClientError};
pub use http::{HttpMethod, OutgoingRequest, RawResponse, RequestBody};
pub use ports::{Clock, KeyValueStore, MessageKind, Navigator, ResourceView, Transport};
pub use session::{Route, Session};
