pub mod quiz_session;

pub use quiz_session::{AnswerOutcome, Progress, QuizSession, SessionState};
