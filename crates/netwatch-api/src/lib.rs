// netwatch-api: HTTP clients for the external lookup services (public address + geolocation)

pub mod error;
pub mod geo;
pub mod public_ip;
pub mod transport;

pub use error::Error;
pub use geo::{GeoClient, GeoLocation, GeoResponse};
pub use public_ip::PublicIpClient;
pub use transport::TransportConfig;
