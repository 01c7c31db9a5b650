pub mod answer_set;
pub mod override_payload;
pub mod question;
pub mod recommendation;

pub use answer_set::AnswerSet;
pub use override_payload::{ChampionAttributes, OverridePayload, ATTRIBUTE_KEYS};
pub use question::Question;
pub use recommendation::{Reason, RecommendationItem, ScoringRequest};
