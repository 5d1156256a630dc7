//! Session-scoped names for pattern captures (`is var arg1`, `is { } arg2`).

use std::sync::atomic::{AtomicU32, Ordering};
use vbcs_common::LoweringOptions;

/// Hands out `arg1`, `arg2`, ... for one conversion session.
///
/// Names never repeat within a session, so captures in sibling expressions of
/// the same method body cannot collide.
#[derive(Debug)]
pub struct TempNames {
    prefix: String,
    counter: AtomicU32,
}

impl Default for TempNames {
    fn default() -> Self {
        TempNames::new("arg")
    }
}

impl TempNames {
    pub fn new(prefix: &str) -> Self {
        TempNames {
            prefix: prefix.to_string(),
            counter: AtomicU32::new(0),
        }
    }

    pub fn from_options(options: &LoweringOptions) -> Self {
        TempNames::new(&options.temp_name_prefix)
    }

    /// Get next temporary name
    pub fn next_name(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}{}", self.prefix, n)
    }

    /// Number of names handed out so far.
    pub fn issued(&self) -> u32 {
        self.counter.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
#[path = "../tests/temp_names.rs"]
mod tests;
