//! # warden-patterns
//!
//! The compiled pattern groups and language map shared by every
//! enforcement hook (spec §4.4, §4.5). Patterns are compiled once per
//! process via [`once_cell::sync::Lazy`] statics and exposed as small,
//! named, testable functions so hooks never hand-roll a regex inline.
//!
//! ```rust
//! use warden_patterns::intent;
//!
//! let score = intent::classify("please implement the retry logic");
//! assert_eq!(score.primary_intent.as_str(), "mutate");
//! ```

pub mod escape;
pub mod incompleteness;
pub mod intent;
pub mod langmap;
pub mod mocks;
pub mod names;
pub mod paths;
pub mod reasoning;

pub use intent::{classify, IntentCategory, IntentScore};
pub use langmap::{detect_language, LanguageProfile};
