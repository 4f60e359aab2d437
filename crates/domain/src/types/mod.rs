//! Domain data types

pub mod credentials;
pub mod request;
pub mod result;

pub use credentials::{AuthMode, Credentials, JwtCredentials, OAuth2Credentials};
pub use request::{HttpMethod, HttpRequestSpec, LogicalRequest, Resource};
pub use result::{ItemOutcome, ItemOutput, ItemResult};
