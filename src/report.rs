//! Bank-wide validation report.
//!
//! Aggregates per-record validation results into one text report grouped
//! by violation kind, which is the shape the content repair workflow
//! wants: fix all MalformedJson first, then all shape mismatches, and so
//! on. Warnings (duplicated explanations) are listed but never affect the
//! clean/dirty verdict.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::models::QuestionRecord;
use crate::validate::{self, ViolationKind};

pub struct ValidationReport {
    pub total: usize,
    pub invalid: usize,
    /// (question id, violation text) per kind, in input order.
    pub by_kind: BTreeMap<ViolationKind, Vec<(String, String)>>,
    /// Explanation texts shared by more than one question.
    pub duplicate_explanations: Vec<(String, Vec<String>)>,
}

impl ValidationReport {
    pub fn build(records: &[QuestionRecord]) -> Self {
        let mut invalid = 0;
        let mut by_kind: BTreeMap<ViolationKind, Vec<(String, String)>> = BTreeMap::new();

        for record in records {
            let result = validate::validate(record);
            if result.is_valid() {
                continue;
            }
            invalid += 1;
            for violation in result.violations() {
                by_kind
                    .entry(violation.kind())
                    .or_default()
                    .push((record.id.clone(), violation.to_string()));
            }
        }

        Self {
            total: records.len(),
            invalid,
            by_kind,
            duplicate_explanations: find_duplicate_explanations(records),
        }
    }

    /// No violations. Warnings do not count.
    pub fn is_clean(&self) -> bool {
        self.invalid == 0
    }

    pub fn violation_count(&self) -> usize {
        self.by_kind.values().map(Vec::len).sum()
    }

    pub fn render(&self) -> String {
        let mut out = String::new();

        for (kind, entries) in &self.by_kind {
            let _ = writeln!(out, "{} ({})", kind.as_str(), entries.len());
            for (id, text) in entries {
                let _ = writeln!(out, "  {id}: {text}");
            }
            out.push('\n');
        }

        if !self.duplicate_explanations.is_empty() {
            let _ = writeln!(
                out,
                "warning: {} explanation(s) shared by multiple questions",
                self.duplicate_explanations.len()
            );
            for (_, ids) in &self.duplicate_explanations {
                let _ = writeln!(out, "  {}", ids.join(", "));
            }
            out.push('\n');
        }

        if self.is_clean() {
            let _ = writeln!(out, "{} questions checked, all valid", self.total);
        } else {
            let _ = writeln!(
                out,
                "{} questions checked, {} invalid ({} violations)",
                self.total,
                self.invalid,
                self.violation_count()
            );
        }

        out
    }
}

/// Copy-pasted explanations are a known content smell: the text no longer
/// matches the numbers in the question it was pasted under.
fn find_duplicate_explanations(records: &[QuestionRecord]) -> Vec<(String, Vec<String>)> {
    let mut by_text: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for record in records {
        let text = record.explanation.trim();
        if text.is_empty() {
            continue;
        }
        by_text.entry(text).or_default().push(record.id.clone());
    }

    by_text
        .into_iter()
        .filter(|(_, ids)| ids.len() > 1)
        .map(|(text, ids)| (text.to_string(), ids))
        .collect()
}
