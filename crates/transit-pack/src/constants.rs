//! Reserved characters and markers of the transit JSON format.

/// Escape prefix for scalar encodings (`~i42`, `~_`, `~~literal`).
pub const ESC: char = '~';

/// Prefix of cache codes (`^0`, `^1A`).
pub const SUB: char = '^';

/// Reserved for future use; strings starting with it are escaped.
pub const RES: char = '`';

/// Prefix of tag strings in the first slot of a tagged array.
pub const TAG_PREFIX: &str = "~#";

/// First element of an array-encoded native map.
pub const MAP_AS_ARRAY: &str = "^ ";

/// Tag wrapping a scalar root value.
pub const QUOTE_TAG: &str = "'";

/// Number of digits available to one cache code position.
pub const CACHE_CODE_DIGITS: usize = 44;

/// Cache capacity; the cache resets once it is full.
pub const MAX_CACHE_ENTRIES: usize = CACHE_CODE_DIGITS * CACHE_CODE_DIGITS;

/// Character that encodes digit `0` of a cache code.
pub const BASE_CHAR_INDEX: u8 = 48;

/// Shortest string length that is worth caching, exclusive.
pub const MIN_SIZE_CACHEABLE: usize = 3;

/// Largest integer that survives a round trip through an IEEE-754 double.
pub const MAX_SAFE_INTEGER: i64 = (1 << 53) - 1;
