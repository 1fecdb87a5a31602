//! Answer grading.
//!
//! Compares a learner submission against the typed correct answer and
//! reports a verdict plus field-level diffs, so the explanation UI can
//! highlight exactly what was wrong. Grading is total over the declared
//! field set: a missing leaf field is a mismatch, never an error. Only a
//! submission that cannot be interpreted at all is rejected.

use std::collections::{BTreeMap, BTreeSet};

use color_eyre::eyre::{eyre, WrapErr};
use serde_json::Value;

use crate::models::{
    BalanceLine, CorrectAnswer, JournalLine, LedgerLine, TemplateType, Voucher,
};
use crate::store::ContentStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDiff {
    pub field: String,
    pub expected: String,
    pub actual: String,
}

impl FieldDiff {
    fn new(field: impl Into<String>, expected: impl ToString, actual: impl ToString) -> Self {
        Self {
            field: field.into(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeResult {
    pub correct: bool,
    pub field_diffs: Vec<FieldDiff>,
}

impl GradeResult {
    fn from_diffs(field_diffs: Vec<FieldDiff>) -> Self {
        Self {
            correct: field_diffs.is_empty(),
            field_diffs,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GradeError {
    /// The submission cannot be interpreted against the known schema;
    /// surfaced as "cannot grade", distinct from an incorrect verdict.
    #[error("submission rejected: {0}")]
    SubmissionRejected(String),

    /// The correct answer does not belong to the declared template type.
    /// Indicates a bug in the calling code, not bad user input.
    #[error("correct answer does not match template type {0}")]
    AnswerTypeMismatch(TemplateType),
}

/// Grade one submission. Both sides are assumed to have passed schema
/// validation for `template_type`.
pub fn grade(
    template_type: TemplateType,
    correct: &CorrectAnswer,
    submitted: &Value,
) -> Result<GradeResult, GradeError> {
    if !correct.matches(template_type) {
        return Err(GradeError::AnswerTypeMismatch(template_type));
    }

    if !submitted.is_object() {
        return Err(GradeError::SubmissionRejected(
            "submission is not a JSON object".to_string(),
        ));
    }

    let diffs = match correct {
        CorrectAnswer::Journal { entries } => grade_journal(entries, submitted)?,
        CorrectAnswer::Ledger { entries } => grade_ledger(entries, submitted)?,
        CorrectAnswer::Voucher { vouchers } => grade_voucher(vouchers, submitted)?,
        CorrectAnswer::SingleChoice { selected } => grade_single_choice(selected, submitted),
        CorrectAnswer::MultipleChoice { selected_options } => {
            grade_multiple_choice(selected_options, submitted)?
        }
        CorrectAnswer::Balance { entries } => grade_balance(entries, submitted)?,
    };

    Ok(GradeResult::from_diffs(diffs))
}

/// Grade a submission against the stored record for `question_id`,
/// resolving the template type and correct answer through the store.
pub async fn grade_submission<S: ContentStore>(
    store: &S,
    question_id: &str,
    submitted: &Value,
) -> color_eyre::Result<GradeResult> {
    let record = store
        .get_question(question_id)
        .await?
        .ok_or_else(|| eyre!("question not found: {question_id}"))?;

    let template: Value = serde_json::from_str(&record.answer_template)
        .wrap_err_with(|| format!("stored template for {question_id} is not valid JSON"))?;
    let type_name = template
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| eyre!("stored template for {question_id} has no type"))?;
    let template_type: TemplateType = type_name
        .parse()
        .map_err(|message: String| eyre!(message))?;

    let correct = CorrectAnswer::parse(template_type, &record.correct_answer)
        .wrap_err_with(|| format!("stored correct answer for {question_id} does not parse"))?;

    Ok(grade(template_type, &correct, submitted)?)
}

// Lenient accessors: absent or mistyped leaves grade as mismatches.

fn str_of(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn int_of(value: &Value, key: &str) -> i64 {
    value.get(key).and_then(Value::as_i64).unwrap_or(0)
}

/// Extract an array field from the submission. Absent means empty; a
/// non-array value means the submission is not interpretable.
fn array_of<'a>(value: &'a Value, key: &str) -> Result<Vec<&'a Value>, GradeError> {
    match value.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items.iter().collect()),
        Some(_) => Err(GradeError::SubmissionRejected(format!(
            "`{key}` is not an array"
        ))),
    }
}

fn grade_journal(
    correct: &[JournalLine],
    submitted: &Value,
) -> Result<Vec<FieldDiff>, GradeError> {
    let user_values = array_of(submitted, "entries")?;
    let mut diffs = Vec::new();

    if user_values.len() != correct.len() {
        diffs.push(FieldDiff::new(
            "entries",
            format!("{} entries", correct.len()),
            format!("{} entries", user_values.len()),
        ));
    }

    let mut user: Vec<JournalLine> = user_values
        .iter()
        .map(|v| JournalLine {
            debit_account: str_of(v, "debit_account"),
            debit_amount: int_of(v, "debit_amount"),
            credit_account: str_of(v, "credit_account"),
            credit_amount: int_of(v, "credit_amount"),
        })
        .collect();
    let mut correct: Vec<JournalLine> = correct.to_vec();

    // Double-entry lines may be listed in either order; compare as a
    // multiset when the answer has more than one line.
    if correct.len() > 1 {
        let key = |line: &JournalLine| {
            (
                line.debit_account.clone(),
                line.credit_account.clone(),
                line.debit_amount,
                line.credit_amount,
            )
        };
        correct.sort_by_key(key);
        user.sort_by_key(key);
    }

    for (index, (expected, actual)) in correct.iter().zip(user.iter()).enumerate() {
        push_if_ne(
            &mut diffs,
            format!("entries[{index}].debit_account"),
            &expected.debit_account,
            &actual.debit_account,
        );
        push_if_ne(
            &mut diffs,
            format!("entries[{index}].debit_amount"),
            &expected.debit_amount,
            &actual.debit_amount,
        );
        push_if_ne(
            &mut diffs,
            format!("entries[{index}].credit_account"),
            &expected.credit_account,
            &actual.credit_account,
        );
        push_if_ne(
            &mut diffs,
            format!("entries[{index}].credit_amount"),
            &expected.credit_amount,
            &actual.credit_amount,
        );
    }

    Ok(diffs)
}

fn grade_ledger(
    correct: &[LedgerLine],
    submitted: &Value,
) -> Result<Vec<FieldDiff>, GradeError> {
    let user = array_of(submitted, "entries")?;
    let mut diffs = Vec::new();

    if user.len() != correct.len() {
        diffs.push(FieldDiff::new(
            "entries",
            format!("{} entries", correct.len()),
            format!("{} entries", user.len()),
        ));
    }

    // Ledger entries are chronological; order matters.
    for (index, (expected, actual)) in correct.iter().zip(user.iter()).enumerate() {
        grade_ledger_line(&mut diffs, &format!("entries[{index}]"), expected, actual);
    }

    Ok(diffs)
}

fn grade_ledger_line(diffs: &mut Vec<FieldDiff>, base: &str, expected: &LedgerLine, actual: &Value) {
    push_if_ne(
        diffs,
        format!("{base}.date"),
        &expected.date,
        &str_of(actual, "date"),
    );
    push_if_ne(
        diffs,
        format!("{base}.description"),
        &expected.description,
        &str_of(actual, "description"),
    );
    push_if_ne(
        diffs,
        format!("{base}.debit"),
        &expected.debit,
        &int_of(actual, "debit"),
    );
    push_if_ne(
        diffs,
        format!("{base}.credit"),
        &expected.credit,
        &int_of(actual, "credit"),
    );
    if let Some(balance) = expected.balance {
        push_if_ne(
            diffs,
            format!("{base}.balance"),
            &balance,
            &int_of(actual, "balance"),
        );
    }
}

fn grade_voucher(
    correct: &[Voucher],
    submitted: &Value,
) -> Result<Vec<FieldDiff>, GradeError> {
    let user = array_of(submitted, "vouchers")?;
    let mut diffs = Vec::new();

    if user.len() != correct.len() {
        diffs.push(FieldDiff::new(
            "vouchers",
            format!("{} vouchers", correct.len()),
            format!("{} vouchers", user.len()),
        ));
    }

    for (index, (expected, actual)) in correct.iter().zip(user.iter()).enumerate() {
        let base = format!("vouchers[{index}]");
        push_if_ne(
            &mut diffs,
            format!("{base}.type"),
            &expected.voucher_type,
            &str_of(actual, "type"),
        );

        let user_entries = array_of(actual, "entries")?;
        if user_entries.len() != expected.entries.len() {
            diffs.push(FieldDiff::new(
                format!("{base}.entries"),
                format!("{} entries", expected.entries.len()),
                format!("{} entries", user_entries.len()),
            ));
        }

        // Within a voucher, entries follow the ledger rule: ordered compare.
        for (line_index, (line, actual_line)) in
            expected.entries.iter().zip(user_entries.iter()).enumerate()
        {
            let line_base = format!("{base}.entries[{line_index}]");
            if let Some(date) = &line.date {
                push_if_ne(
                    &mut diffs,
                    format!("{line_base}.date"),
                    date,
                    &str_of(actual_line, "date"),
                );
            }
            push_if_ne(
                &mut diffs,
                format!("{line_base}.account"),
                &line.account,
                &str_of(actual_line, "account"),
            );
            push_if_ne(
                &mut diffs,
                format!("{line_base}.amount"),
                &line.amount,
                &int_of(actual_line, "amount"),
            );
            if let Some(description) = &line.description {
                push_if_ne(
                    &mut diffs,
                    format!("{line_base}.description"),
                    description,
                    &str_of(actual_line, "description"),
                );
            }
        }
    }

    Ok(diffs)
}

fn grade_single_choice(selected: &str, submitted: &Value) -> Vec<FieldDiff> {
    let actual = str_of(submitted, "selected");
    let mut diffs = Vec::new();
    if selected != actual {
        diffs.push(FieldDiff::new("selected", selected, actual));
    }
    diffs
}

fn grade_multiple_choice(
    selected_options: &[String],
    submitted: &Value,
) -> Result<Vec<FieldDiff>, GradeError> {
    let user_values = array_of(submitted, "selected_options")?;

    let expected: BTreeSet<&str> = selected_options.iter().map(String::as_str).collect();
    let actual: BTreeSet<&str> = user_values
        .iter()
        .filter_map(|v| v.as_str())
        .collect();

    let mut diffs = Vec::new();
    if expected != actual {
        diffs.push(FieldDiff::new(
            "selected_options",
            render_set(&expected),
            render_set(&actual),
        ));
    }
    Ok(diffs)
}

fn grade_balance(
    correct: &[BalanceLine],
    submitted: &Value,
) -> Result<Vec<FieldDiff>, GradeError> {
    let user_values = array_of(submitted, "entries")?;

    let expected: BTreeMap<String, (i64, i64)> = correct
        .iter()
        .map(|line| (line.account.clone(), (line.debit, line.credit)))
        .collect();
    let actual: BTreeMap<String, (i64, i64)> = user_values
        .iter()
        .map(|v| (str_of(v, "account"), (int_of(v, "debit"), int_of(v, "credit"))))
        .collect();

    let mut diffs = Vec::new();
    let accounts: BTreeSet<&str> = expected
        .keys()
        .map(String::as_str)
        .chain(actual.keys().map(String::as_str))
        .collect();

    for account in accounts {
        match (expected.get(account), actual.get(account)) {
            (Some(want), Some(got)) => {
                push_if_ne(
                    &mut diffs,
                    format!("{account}.debit"),
                    &want.0,
                    &got.0,
                );
                push_if_ne(
                    &mut diffs,
                    format!("{account}.credit"),
                    &want.1,
                    &got.1,
                );
            }
            (Some(want), None) => {
                diffs.push(FieldDiff::new(
                    account,
                    format!("debit {} / credit {}", want.0, want.1),
                    "(missing)",
                ));
            }
            (None, Some(got)) => {
                diffs.push(FieldDiff::new(
                    account,
                    "(missing)",
                    format!("debit {} / credit {}", got.0, got.1),
                ));
            }
            (None, None) => unreachable!(),
        }
    }

    Ok(diffs)
}

fn push_if_ne<T: PartialEq + ToString>(
    diffs: &mut Vec<FieldDiff>,
    field: String,
    expected: &T,
    actual: &T,
) {
    if expected != actual {
        diffs.push(FieldDiff::new(field, expected.to_string(), actual.to_string()));
    }
}

fn render_set(set: &BTreeSet<&str>) -> String {
    set.iter().copied().collect::<Vec<_>>().join(", ")
}
