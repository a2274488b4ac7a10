mod store;

pub use store::{TopicEntry, TopicStatus, TopicStore, UNUSED_MARKER, USED_MARKER};
