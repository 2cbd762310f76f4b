pub mod transport;

pub use transport::{BwsTransport, CallOutcome, ProbeResult, ResponseMetadata};
