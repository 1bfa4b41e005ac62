//! Transit JSON: a self-describing tagged-value format layered on JSON.
//!
//! Every non-native value travels as a short tag plus a representation built
//! from other values, for example `["~#point",[1,2]]`. This crate implements
//! the format (escaping, scalar encodings, the key/tag cache, root quoting,
//! verbose mode) and leaves the mapping between a value model and tags to
//! handler implementations:
//!
//! - [`WriteHandler`] names the tag and representation of each value;
//! - [`ReadHandler`] rebuilds a value from a tag and a decoded representation;
//! - [`MapBuilder`] and [`FromGround`] build native maps and scalars.
//!
//! ```
//! use transit_pack::{PlainJson, Reader, Writer};
//!
//! let writer = Writer::new(PlainJson);
//! let reader = Reader::new(PlainJson, PlainJson);
//! let value = serde_json::json!({"~tilde": [1, "^caret"]});
//! let text = writer.write(&value).unwrap();
//! assert_eq!(text, r#"["^ ","~~tilde",[1,"~^caret"]]"#);
//! assert_eq!(reader.read::<serde_json::Value>(&text).unwrap(), value);
//! ```

mod constants;
mod error;
mod handler;
mod json;
mod reader;
mod writer;

pub mod cache;

pub use constants::{MAP_AS_ARRAY, MAX_SAFE_INTEGER, QUOTE_TAG, TAG_PREFIX};
pub use error::TransitError;
pub use handler::{FromGround, Ground, MapBuilder, ReadHandler, Rep, WriteHandler};
pub use json::PlainJson;
pub use reader::Reader;
pub use writer::{Writer, WriterOptions};
