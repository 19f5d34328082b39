//! String interner for identifier and slot names.
//!
//! Every identifier the parser sees and every slot name the runtime installs
//! goes through one interner, so slot tables key on `Name` instead of text.
//! Interned strings are leaked and live for the rest of the process.

use super::Name;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Interner shared between the parser and a runtime.
pub type SharedInterner = Arc<StringInterner>;

/// Error when interning a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternError {
    /// More than `u32::MAX` distinct strings.
    Overflow { count: usize },
}

impl std::fmt::Display for InternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InternError::Overflow { count } => write!(
                f,
                "interner exceeded capacity: {count} strings, max is {}",
                u32::MAX
            ),
        }
    }
}

impl std::error::Error for InternError {}

#[derive(Default)]
struct InternTable {
    map: FxHashMap<&'static str, Name>,
    strings: Vec<&'static str>,
}

/// Thread-safe string interner.
///
/// Reads take a shared lock, so a parser running on one thread and a
/// runtime on another can intern into the same table.
pub struct StringInterner {
    table: RwLock<InternTable>,
}

impl StringInterner {
    /// Create an interner with the empty string at [`Name::EMPTY`].
    pub fn new() -> Self {
        let mut table = InternTable::default();
        table.map.insert("", Name::EMPTY);
        table.strings.push("");
        StringInterner {
            table: RwLock::new(table),
        }
    }

    /// Create an interner already wrapped for sharing.
    pub fn shared() -> SharedInterner {
        Arc::new(Self::new())
    }

    /// Try to intern a string, returning its Name or an error on overflow.
    pub fn try_intern(&self, s: &str) -> Result<Name, InternError> {
        if let Some(&name) = self.table.read().map.get(s) {
            return Ok(name);
        }

        let mut table = self.table.write();
        // Another writer may have won the race between the two locks.
        if let Some(&name) = table.map.get(s) {
            return Ok(name);
        }

        let index = u32::try_from(table.strings.len()).map_err(|_| InternError::Overflow {
            count: table.strings.len(),
        })?;
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        let name = Name::from_index(index);
        table.strings.push(leaked);
        table.map.insert(leaked, name);
        Ok(name)
    }

    /// Intern a string, returning its Name.
    ///
    /// # Panics
    /// Panics if more than `u32::MAX` distinct strings are interned.
    #[inline]
    pub fn intern(&self, s: &str) -> Name {
        self.try_intern(s).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Look up the text of an interned name.
    ///
    /// # Panics
    /// Panics if `name` came from a different interner and is out of range.
    pub fn lookup(&self, name: Name) -> &'static str {
        self.table.read().strings[name.index()]
    }

    /// Find the name for `s` without interning it.
    pub fn get(&self, s: &str) -> Option<Name> {
        self.table.read().map.get(s).copied()
    }

    /// Number of interned strings, including the empty string.
    pub fn len(&self) -> usize {
        self.table.read().strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_is_pre_interned() {
        let interner = StringInterner::new();
        assert_eq!(interner.intern(""), Name::EMPTY);
        assert_eq!(interner.lookup(Name::EMPTY), "");
        assert_eq!(interner.len(), 1);
    }

    #[test]
    fn interning_is_idempotent() {
        let interner = StringInterner::new();
        let a = interner.intern("setSlot");
        let b = interner.intern("setSlot");
        let c = interner.intern("getSlot");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(interner.lookup(c), "getSlot");
        assert_eq!(interner.get("setSlot"), Some(a));
        assert_eq!(interner.get("missing"), None);
    }

    #[test]
    fn shared_interner_across_threads() {
        let interner = StringInterner::shared();
        let other = Arc::clone(&interner);
        let handle = std::thread::spawn(move || other.intern("fromThread"));
        let name = match handle.join() {
            Ok(name) => name,
            Err(_) => panic!("interning thread panicked"),
        };
        assert_eq!(interner.lookup(name), "fromThread");
    }
}
