//! Domain model (IDs, task status, task-local errors).

pub mod errors;
pub mod ids;
pub mod status;

pub use errors::{ErrorKind, TaskError};
pub use ids::{Id, IdMarker, SchedulerId, TaskId};
pub use status::TaskStatus;
