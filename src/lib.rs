//! Text matching for the climate community site.
//!
//! Two independent matchers live here. [`faq::answer`] fires every knowledge
//! base rule whose topic words all occur in a question and joins their
//! answers. [`search::search`] filters diary entries and memes by
//! case-insensitive substring and lists diary hits before meme hits.
//!
//! Both are pure functions over caller-supplied data; storage, rendering and
//! sessions belong to the web layer.

pub mod cli;
pub mod error;
pub mod eval;
pub mod faq;
pub mod knowledge;
pub mod normalize;
pub mod output;
pub mod runner;
pub mod search;
pub mod storage;

pub use error::{MatchError, Result};
pub use faq::{FALLBACK_ANSWER, answer, firing_entries};
pub use knowledge::{KnowledgeBase, KnowledgeEntry, SharedKnowledgeBase};
pub use normalize::normalize;
pub use search::{DiaryRecord, MatchResult, MemeRecord, RecordKind, SearchableRecord, search};
