pub mod item;
pub mod publisher;
pub mod snapshot;

pub use item::{FeedItem, ParsedItem};
pub use publisher::Publisher;
pub use snapshot::{Snapshot, SnapshotItem, SnapshotMastodon, SnapshotSite, SnapshotStatus};
