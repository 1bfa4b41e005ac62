//! Tag strings of the codec.
//!
//! Tags are unique within one codec; [`TAGS`] lists all of them.

/// Unordered map.
pub const TAG_MAP: &str = "iM";

/// Insertion-ordered map.
pub const TAG_ORDERED_MAP: &str = "iOM";

/// Sequence.
pub const TAG_LIST: &str = "iL";

/// Unordered set.
pub const TAG_SET: &str = "iS";

/// Insertion-ordered set.
pub const TAG_ORDERED_SET: &str = "iOS";

/// Protobuf message: `[fully-qualified name, base64 payload]`.
pub const TAG_MESSAGE: &str = "PB";

/// Opaque value, decoded as null.
pub const TAG_OPAQUE: &str = "_";

pub const TAGS: [&str; 7] = [
    TAG_MAP,
    TAG_ORDERED_MAP,
    TAG_LIST,
    TAG_SET,
    TAG_ORDERED_SET,
    TAG_MESSAGE,
    TAG_OPAQUE,
];
