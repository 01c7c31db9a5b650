pub mod scoring_client;

pub use scoring_client::{ProposalReceipt, ScoringApi, ScoringClient};
