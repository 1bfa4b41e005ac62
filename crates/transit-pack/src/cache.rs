//! Key and tag cache shared by the writer and the reader.
//!
//! In non-verbose mode every map key and every tag string longer than three
//! characters is written in full the first time it appears and replaced by a
//! short code (`^0`, `^1`, ..., `^1A`) afterwards. Both sides number the
//! entries in document order, so the reader rebuilds exactly the table the
//! writer used.

use std::collections::HashMap;

use crate::constants::{
    BASE_CHAR_INDEX, CACHE_CODE_DIGITS, MAP_AS_ARRAY, MAX_CACHE_ENTRIES, MIN_SIZE_CACHEABLE, SUB,
};
use crate::TransitError;

/// Whether `s` takes part in caching when written in the given position.
pub fn is_cacheable(s: &str, as_map_key: bool) -> bool {
    if s.len() <= MIN_SIZE_CACHEABLE {
        return false;
    }
    as_map_key || s.starts_with("~#") || s.starts_with("~$") || s.starts_with("~:")
}

/// Whether `s` is a cache code rather than a literal string.
pub fn is_cache_code(s: &str) -> bool {
    s.starts_with(SUB) && s != MAP_AS_ARRAY && s.len() > 1
}

/// Converts a cache index into its wire code.
pub fn index_to_code(index: usize) -> String {
    let digit = |d: usize| char::from(d as u8 + BASE_CHAR_INDEX);
    let hi = index / CACHE_CODE_DIGITS;
    let lo = index % CACHE_CODE_DIGITS;
    if hi == 0 {
        format!("{SUB}{}", digit(lo))
    } else {
        format!("{SUB}{}{}", digit(hi), digit(lo))
    }
}

/// Converts a wire code back into a cache index.
pub fn code_to_index(code: &str) -> Result<usize, TransitError> {
    let digits = code.as_bytes();
    let value = |b: u8| -> Result<usize, TransitError> {
        let d = b.checked_sub(BASE_CHAR_INDEX).map(usize::from);
        match d {
            Some(d) if d < CACHE_CODE_DIGITS => Ok(d),
            _ => Err(TransitError::malformed(format!("bad cache code `{code}`"))),
        }
    };
    match digits {
        [b'^', lo] => value(*lo),
        [b'^', hi, lo] => Ok(value(*hi)? * CACHE_CODE_DIGITS + value(*lo)?),
        _ => Err(TransitError::malformed(format!("bad cache code `{code}`"))),
    }
}

/// Writer side: string → code.
#[derive(Debug, Default)]
pub struct WriteCache {
    index: usize,
    codes: HashMap<String, String>,
}

impl WriteCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the string to put on the wire for `s`: either `s` itself
    /// (registering it when cacheable) or the code of an earlier occurrence.
    pub fn write(&mut self, s: String, as_map_key: bool) -> String {
        if !is_cacheable(&s, as_map_key) {
            return s;
        }
        if let Some(code) = self.codes.get(&s) {
            return code.clone();
        }
        if self.index == MAX_CACHE_ENTRIES {
            tracing::trace!(entries = self.index, "transit write cache reset");
            self.codes.clear();
            self.index = 0;
        }
        self.codes.insert(s.clone(), index_to_code(self.index));
        self.index += 1;
        s
    }
}

/// Reader side: code → string.
#[derive(Debug, Default)]
pub struct ReadCache {
    entries: Vec<String>,
}

impl ReadCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves a wire string: cache codes are looked up, cacheable literals
    /// are recorded, everything else passes through.
    pub fn read(&mut self, s: &str, as_map_key: bool) -> Result<String, TransitError> {
        if is_cache_code(s) {
            let index = code_to_index(s)?;
            return self
                .entries
                .get(index)
                .cloned()
                .ok_or_else(|| TransitError::malformed(format!("unknown cache code `{s}`")));
        }
        if is_cacheable(s, as_map_key) {
            if self.entries.len() == MAX_CACHE_ENTRIES {
                tracing::trace!(entries = self.entries.len(), "transit read cache reset");
                self.entries.clear();
            }
            self.entries.push(s.to_owned());
        }
        Ok(s.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_through_indices() {
        assert_eq!(index_to_code(0), "^0");
        assert_eq!(index_to_code(43), "^[");
        assert_eq!(index_to_code(44), "^10");
        for index in [0, 1, 43, 44, 45, 1000, MAX_CACHE_ENTRIES - 1] {
            assert_eq!(code_to_index(&index_to_code(index)).unwrap(), index);
        }
    }

    #[test]
    fn only_long_keys_and_tags_are_cacheable() {
        assert!(!is_cacheable("abc", true));
        assert!(is_cacheable("abcd", true));
        assert!(!is_cacheable("abcd", false));
        assert!(is_cacheable("~#iOM", false));
        assert!(is_cacheable("~#iM", false));
        assert!(!is_cacheable("~#'", false));
    }

    #[test]
    fn map_marker_is_not_a_cache_code() {
        assert!(!is_cache_code("^ "));
        assert!(!is_cache_code("^"));
        assert!(is_cache_code("^0"));
    }

    #[test]
    fn writer_and_reader_agree_on_codes() {
        let mut w = WriteCache::new();
        let mut r = ReadCache::new();
        let first = w.write("~#iOM".to_owned(), false);
        let key = w.write("name".to_owned(), true);
        let again = w.write("~#iOM".to_owned(), false);
        assert_eq!(first, "~#iOM");
        assert_eq!(key, "name");
        assert_eq!(again, "^0");

        assert_eq!(r.read(&first, false).unwrap(), "~#iOM");
        assert_eq!(r.read(&key, true).unwrap(), "name");
        assert_eq!(r.read(&again, false).unwrap(), "~#iOM");
        assert_eq!(r.read("^1", true).unwrap(), "name");
    }

    #[test]
    fn unknown_code_is_malformed() {
        let mut r = ReadCache::new();
        assert!(matches!(r.read("^5", false), Err(TransitError::Malformed(_))));
    }

    #[test]
    fn write_cache_resets_when_full() {
        let mut w = WriteCache::new();
        for i in 0..MAX_CACHE_ENTRIES {
            w.write(format!("key-{i}"), true);
        }
        // Table is full: the next new entry clears it and takes slot 0.
        assert_eq!(w.write("fresh".to_owned(), true), "fresh");
        assert_eq!(w.write("fresh".to_owned(), true), "^0");
        assert_eq!(w.write("key-0".to_owned(), true), "key-0");
    }
}
