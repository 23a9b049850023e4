pub mod answer;
pub mod child;
pub mod conversation;
pub mod report;
pub mod response;
pub mod summary;

pub use answer::{AnswerBucket, NewAnswer, QuestionAnswer};
pub use child::{Child, Gender};
pub use conversation::ConversationLog;
pub use report::{ConcernBand, FinalReport, ReviewStage, ViewerCapability};
pub use response::{AssessmentStatus, Response};
pub use summary::PoolSummary;
