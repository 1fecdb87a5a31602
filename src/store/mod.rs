// Content store - provides data access layer for the question bank

use color_eyre::Result;

use crate::models::QuestionRecord;

mod json;
mod sqlite;

pub use json::JsonStore;
pub use sqlite::SqliteStore;

/// A backing store for question records. The validator and grader only
/// ever go through this seam, so the JSON bundle used in development and
/// the SQLite database shipped to devices are interchangeable.
#[allow(async_fn_in_trait)]
pub trait ContentStore {
    /// All records, ordered by question id.
    async fn load_all_questions(&self) -> Result<Vec<QuestionRecord>>;

    /// Upsert the given records, keyed by id.
    async fn save_questions(&self, records: &[QuestionRecord]) -> Result<()>;

    async fn get_question(&self, question_id: &str) -> Result<Option<QuestionRecord>>;
}
