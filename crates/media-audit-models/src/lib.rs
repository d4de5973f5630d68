pub mod library;
pub mod managed;
pub mod request;
pub mod snapshot;
pub mod watch;

pub use library::{LibraryItem, MediaKind, UserAccount};
pub use managed::ManagedMediaRecord;
pub use request::MediaRequest;
pub use snapshot::{SizeOnDisk, Snapshot, StaleCandidate};
pub use watch::{WatchStatus, NO_PROGRESS_LABEL, WATCHED_LABEL};
