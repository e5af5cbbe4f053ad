mod assemble;
mod candidates;
mod channel;
mod filter;
mod scoring;

pub(crate) use assemble::{RankedCandidate, assemble_items};
pub(crate) use candidates::{Candidate, merge_candidates};
pub(crate) use channel::classify;
pub(crate) use filter::apply_policy;
pub(crate) use scoring::RelevanceScorer;
