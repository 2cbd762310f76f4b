pub mod context;
pub mod operation;
pub mod request;
pub mod verbosity;

pub use context::{ConnectionContext, Credentials, Deadline, Transport};
pub use operation::{Operation, Probe};
pub use request::Validate;
pub use verbosity::Verbosity;
