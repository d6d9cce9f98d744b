pub mod cached;
pub mod notification;
pub mod release;

pub use cached::CachedVersion;
pub use notification::{Delivery, Notification};
pub use release::{ReleaseRecord, SourceKind};
