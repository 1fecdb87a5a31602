use std::path::PathBuf;

use color_eyre::{eyre::WrapErr, Result};

use super::ContentStore;
use crate::models::QuestionRecord;

/// File-backed store over the bundled JSON question bank. The file holds
/// a single array of records; the whole bank fits comfortably in memory.
#[derive(Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read_records(&self) -> Result<Vec<QuestionRecord>> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .wrap_err_with(|| format!("failed to read {}", self.path.display()))?;
        let records: Vec<QuestionRecord> = serde_json::from_str(&raw)
            .wrap_err_with(|| format!("{} is not a valid question bank", self.path.display()))?;

        Ok(records)
    }
}

impl ContentStore for JsonStore {
    async fn load_all_questions(&self) -> Result<Vec<QuestionRecord>> {
        let mut records = self.read_records().await?;
        records.sort_by(|a, b| a.id.cmp(&b.id));

        Ok(records)
    }

    async fn save_questions(&self, records: &[QuestionRecord]) -> Result<()> {
        let mut merged = match tokio::fs::try_exists(&self.path).await? {
            true => self.read_records().await?,
            false => Vec::new(),
        };

        for record in records {
            match merged.iter_mut().find(|existing| existing.id == record.id) {
                Some(existing) => *existing = record.clone(),
                None => merged.push(record.clone()),
            }
        }
        merged.sort_by(|a, b| a.id.cmp(&b.id));

        let raw = serde_json::to_string_pretty(&merged)?;
        tokio::fs::write(&self.path, raw)
            .await
            .wrap_err_with(|| format!("failed to write {}", self.path.display()))?;

        tracing::info!(count = records.len(), "saved question records");

        Ok(())
    }

    async fn get_question(&self, question_id: &str) -> Result<Option<QuestionRecord>> {
        let records = self.read_records().await?;

        Ok(records.into_iter().find(|record| record.id == question_id))
    }
}
