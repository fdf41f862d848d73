pub mod client;
pub mod params;
pub mod request;
pub mod transport;
pub mod types;

pub use client::RestClient;
pub use params::{ParamPair, ParamValue, Params};
pub use request::RequestConfig;
pub use transport::{HttpTransport, Transport, TransportRequest, TransportResponse};
pub use types::{DispatchOutcome, Method, ResponseBodyPolicy};
