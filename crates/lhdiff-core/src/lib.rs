//! lhdiff Core — line-level correspondence between successive file versions

pub mod model;
pub mod normalize;
pub mod align;
pub mod prune;
pub mod score;
pub mod matcher;
pub mod expand;
pub mod chain;
pub mod config;
pub mod error;


pub use model::{Line, Version, CandidatePool, CandidatePair, SimilarityScore, MatchedSet, Target, EntryKind, MappingEntry, MappingTable, PairStats, Transition, FileChain};
pub use normalize::normalize_line;
pub use align::{Alignment, align};
pub use prune::{fingerprint, hamming_distance, prune};
pub use score::{CONTENT_WEIGHT, edit_ratio, context_similarity, score_pair};
pub use matcher::{Match, assign};
pub use expand::expand;
pub use chain::LineTracker;
pub use config::PipelineConfig;
pub use error::{LhDiffError, Result};
