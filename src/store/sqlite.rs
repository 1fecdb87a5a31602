use std::str::FromStr;

use color_eyre::{eyre::eyre, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};

use super::ContentStore;
use crate::models::{Category, QuestionRecord};

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn new(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;

        // Verify connection
        let one: i32 = sqlx::query_scalar("SELECT 1").fetch_one(&pool).await?;
        assert_eq!(one, 1);

        create_schema(&pool).await?;

        tracing::info!("database connection has been verified");

        Ok(Self { pool })
    }
}

async fn create_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS questions (
            id TEXT PRIMARY KEY,
            category TEXT NOT NULL,
            question_text TEXT NOT NULL,
            answer_template TEXT NOT NULL,
            correct_answer TEXT NOT NULL,
            explanation TEXT NOT NULL,
            difficulty INTEGER NOT NULL,
            tags TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

fn record_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<QuestionRecord> {
    let category: String = row.get("category");
    let difficulty: i64 = row.get("difficulty");

    Ok(QuestionRecord {
        id: row.get("id"),
        category: Category::from_str(&category).map_err(|message| eyre!(message))?,
        question_text: row.get("question_text"),
        answer_template: row.get("answer_template"),
        correct_answer: row.get("correct_answer"),
        explanation: row.get("explanation"),
        difficulty: u8::try_from(difficulty).unwrap_or(u8::MAX),
        tags: row.get("tags"),
    })
}

impl ContentStore for SqliteStore {
    async fn load_all_questions(&self) -> Result<Vec<QuestionRecord>> {
        let rows = sqlx::query(
            "SELECT id, category, question_text, answer_template, correct_answer, explanation, difficulty, tags FROM questions ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(record_from_row).collect()
    }

    async fn save_questions(&self, records: &[QuestionRecord]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        for record in records {
            sqlx::query(
                r#"
                INSERT INTO questions (id, category, question_text, answer_template, correct_answer, explanation, difficulty, tags)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                ON CONFLICT(id) DO UPDATE SET
                    category = excluded.category,
                    question_text = excluded.question_text,
                    answer_template = excluded.answer_template,
                    correct_answer = excluded.correct_answer,
                    explanation = excluded.explanation,
                    difficulty = excluded.difficulty,
                    tags = excluded.tags
                "#,
            )
            .bind(&record.id)
            .bind(record.category.as_str())
            .bind(&record.question_text)
            .bind(&record.answer_template)
            .bind(&record.correct_answer)
            .bind(&record.explanation)
            .bind(i64::from(record.difficulty))
            .bind(&record.tags)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(count = records.len(), "saved question records");

        Ok(())
    }

    async fn get_question(&self, question_id: &str) -> Result<Option<QuestionRecord>> {
        let row = sqlx::query(
            "SELECT id, category, question_text, answer_template, correct_answer, explanation, difficulty, tags FROM questions WHERE id = $1",
        )
        .bind(question_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(record_from_row(&row)?)),
            None => Ok(None),
        }
    }
}

impl SqliteStore {
    /// Row count without loading the records, for import summaries.
    pub async fn questions_count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM questions")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
