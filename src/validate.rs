//! Schema validation for question records.
//!
//! Runs as a batch lint over the whole content bank: every check collects
//! its violations instead of failing fast, so one pass over the corpus
//! yields the complete repair list. Pure functions, no I/O.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde_json::Value;

use crate::contract;
use crate::models::{QuestionRecord, TemplateType};
use crate::names;

/// One content defect in a record. Data problems are values, never errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    MalformedJson {
        field: &'static str,
        message: String,
    },
    UnknownTemplateType {
        found: String,
    },
    TemplateShapeMismatch {
        missing: Vec<String>,
    },
    AnswerShapeMismatch {
        missing: Vec<String>,
    },
    ElementShapeMismatch {
        path: String,
        index: usize,
        missing: Vec<String>,
    },
    InvalidDate {
        path: String,
        value: String,
    },
    /// 借方合計と貸方合計の不一致
    ImbalancedEntry {
        debit_total: i64,
        credit_total: i64,
    },
    InvalidMetadata {
        field: &'static str,
        message: String,
    },
}

impl Violation {
    pub fn kind(&self) -> ViolationKind {
        match self {
            Violation::MalformedJson { .. } => ViolationKind::MalformedJson,
            Violation::UnknownTemplateType { .. } => ViolationKind::UnknownTemplateType,
            Violation::TemplateShapeMismatch { .. } => ViolationKind::TemplateShapeMismatch,
            Violation::AnswerShapeMismatch { .. } => ViolationKind::AnswerShapeMismatch,
            Violation::ElementShapeMismatch { .. } => ViolationKind::ElementShapeMismatch,
            Violation::InvalidDate { .. } => ViolationKind::InvalidDate,
            Violation::ImbalancedEntry { .. } => ViolationKind::ImbalancedEntry,
            Violation::InvalidMetadata { .. } => ViolationKind::InvalidMetadata,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::MalformedJson { field, message } => {
                write!(f, "{field} is not valid JSON: {message}")
            }
            Violation::UnknownTemplateType { found } => {
                write!(f, "unknown template type `{found}`")
            }
            Violation::TemplateShapeMismatch { missing } => {
                write!(f, "template missing/invalid keys: {}", missing.join(", "))
            }
            Violation::AnswerShapeMismatch { missing } => {
                write!(
                    f,
                    "correct answer missing/invalid keys: {}",
                    missing.join(", ")
                )
            }
            Violation::ElementShapeMismatch {
                path,
                index,
                missing,
            } => {
                write!(
                    f,
                    "{path}[{index}] missing/invalid keys: {}",
                    missing.join(", ")
                )
            }
            Violation::InvalidDate { path, value } => {
                write!(f, "{path} = \"{value}\" is not a calendar date")
            }
            Violation::ImbalancedEntry {
                debit_total,
                credit_total,
            } => {
                write!(
                    f,
                    "debit total {debit_total} != credit total {credit_total} (difference {})",
                    (debit_total - credit_total).abs()
                )
            }
            Violation::InvalidMetadata { field, message } => {
                write!(f, "{field}: {message}")
            }
        }
    }
}

/// Grouping key for report output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ViolationKind {
    MalformedJson,
    UnknownTemplateType,
    TemplateShapeMismatch,
    AnswerShapeMismatch,
    ElementShapeMismatch,
    InvalidDate,
    ImbalancedEntry,
    InvalidMetadata,
}

impl ViolationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationKind::MalformedJson => "MalformedJson",
            ViolationKind::UnknownTemplateType => "UnknownTemplateType",
            ViolationKind::TemplateShapeMismatch => "TemplateShapeMismatch",
            ViolationKind::AnswerShapeMismatch => "AnswerShapeMismatch",
            ViolationKind::ElementShapeMismatch => "ElementShapeMismatch",
            ViolationKind::InvalidDate => "InvalidDate",
            ViolationKind::ImbalancedEntry => "ImbalancedEntry",
            ViolationKind::InvalidMetadata => "InvalidMetadata",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid(Vec<Violation>),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn violations(&self) -> &[Violation] {
        match self {
            ValidationResult::Valid => &[],
            ValidationResult::Invalid(violations) => violations,
        }
    }
}

/// Validate one record against its declared template type's contracts.
pub fn validate(record: &QuestionRecord) -> ValidationResult {
    let mut violations = Vec::new();

    let template = parse_json(&record.answer_template, "answer_template", &mut violations);
    let answer = parse_json(&record.correct_answer, "correct_answer", &mut violations);
    if let Some(tags) = &record.tags {
        parse_json(tags, "tags", &mut violations);
    }

    let template_type = template.as_ref().and_then(|t| {
        match t.get("type").and_then(Value::as_str) {
            None => {
                violations.push(Violation::UnknownTemplateType {
                    found: "(no type key)".to_string(),
                });
                None
            }
            Some(name) => match TemplateType::from_str(name) {
                Ok(template_type) => Some(template_type),
                Err(_) => {
                    violations.push(Violation::UnknownTemplateType {
                        found: name.to_string(),
                    });
                    None
                }
            },
        }
    });

    if let (Some(template_type), Some(template)) = (template_type, &template) {
        let report = contract::check(template, contract::template_contract(template_type));
        if !report.is_clean() {
            violations.push(Violation::TemplateShapeMismatch {
                missing: report.flattened(),
            });
        }
    }

    if let (Some(template_type), Some(answer)) = (template_type, &answer) {
        let report = contract::check(answer, contract::answer_contract(template_type));
        if !report.missing.is_empty() {
            violations.push(Violation::AnswerShapeMismatch {
                missing: report.missing.clone(),
            });
        }
        for issue in report.elements {
            violations.push(Violation::ElementShapeMismatch {
                path: issue.path,
                index: issue.index,
                missing: issue.missing,
            });
        }

        check_domain(template_type, answer, &mut violations);
    }

    check_metadata(record, &mut violations);

    if violations.is_empty() {
        ValidationResult::Valid
    } else {
        ValidationResult::Invalid(violations)
    }
}

fn parse_json(
    raw: &str,
    field: &'static str,
    violations: &mut Vec<Violation>,
) -> Option<Value> {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => Some(value),
        Err(err) => {
            violations.push(Violation::MalformedJson {
                field,
                message: err.to_string(),
            });
            None
        }
    }
}

/// Cheap domain sanity checks: calendar-valid dates, balanced totals.
fn check_domain(template_type: TemplateType, answer: &Value, violations: &mut Vec<Violation>) {
    match template_type {
        TemplateType::JournalEntry => {
            if let Some(entries) = answer.get("entries").and_then(Value::as_array) {
                let debit_total: i64 = entries.iter().map(|e| int_of(e, "debit_amount")).sum();
                let credit_total: i64 = entries.iter().map(|e| int_of(e, "credit_amount")).sum();
                if debit_total != credit_total {
                    violations.push(Violation::ImbalancedEntry {
                        debit_total,
                        credit_total,
                    });
                }
            }
        }
        TemplateType::LedgerEntry => {
            if let Some(entries) = answer.get("entries").and_then(Value::as_array) {
                check_dates(entries, "entries", violations);
            }
        }
        TemplateType::VoucherEntry => {
            if let Some(vouchers) = answer.get("vouchers").and_then(Value::as_array) {
                for (index, voucher) in vouchers.iter().enumerate() {
                    if let Some(entries) = voucher.get("entries").and_then(Value::as_array) {
                        check_dates(entries, &format!("vouchers[{index}].entries"), violations);
                    }
                }
            }
        }
        TemplateType::TrialBalance
        | TemplateType::Worksheet
        | TemplateType::FinancialStatement => {
            if let Some(entries) = answer.get("entries").and_then(Value::as_array) {
                let debit_total: i64 = entries.iter().map(|e| int_of(e, "debit")).sum();
                let credit_total: i64 = entries.iter().map(|e| int_of(e, "credit")).sum();
                if debit_total != credit_total {
                    violations.push(Violation::ImbalancedEntry {
                        debit_total,
                        credit_total,
                    });
                }
            }
        }
        TemplateType::SingleChoice | TemplateType::MultipleChoice => {}
    }
}

fn check_dates(entries: &[Value], path: &str, violations: &mut Vec<Violation>) {
    for (index, entry) in entries.iter().enumerate() {
        if let Some(date) = entry.get("date").and_then(Value::as_str) {
            if !is_calendar_date(date) {
                violations.push(Violation::InvalidDate {
                    path: format!("{path}[{index}].date"),
                    value: date.to_string(),
                });
            }
        }
    }
}

/// Accepts "M/D" or "Y/M/D". "8/33" and friends are content bugs.
fn is_calendar_date(date: &str) -> bool {
    let parts: Vec<&str> = date.split('/').collect();
    let (year, month, day) = match parts.as_slice() {
        [month, day] => (names::DATE_CHECK_YEAR, *month, *day),
        [year, month, day] => match year.parse::<i32>() {
            Ok(year) => (year, *month, *day),
            Err(_) => return false,
        },
        _ => return false,
    };

    let (Ok(month), Ok(day)) = (month.parse::<u32>(), day.parse::<u32>()) else {
        return false;
    };

    NaiveDate::from_ymd_opt(year, month, day).is_some()
}

fn int_of(value: &Value, key: &str) -> i64 {
    value.get(key).and_then(Value::as_i64).unwrap_or(0)
}

/// Id format, difficulty range and non-empty explanation.
fn check_metadata(record: &QuestionRecord, violations: &mut Vec<Violation>) {
    let prefix = record.category.id_prefix();
    let digits_ok = record
        .id
        .strip_prefix(prefix)
        .is_some_and(|rest| rest.len() == names::ID_DIGITS && rest.bytes().all(|b| b.is_ascii_digit()));
    if !digits_ok {
        violations.push(Violation::InvalidMetadata {
            field: "id",
            message: format!(
                "`{}` does not match {prefix}{} for category {}",
                record.id,
                "n".repeat(names::ID_DIGITS),
                record.category
            ),
        });
    }

    if !(names::MIN_DIFFICULTY..=names::MAX_DIFFICULTY).contains(&record.difficulty) {
        violations.push(Violation::InvalidMetadata {
            field: "difficulty",
            message: format!(
                "{} outside {}..={}",
                record.difficulty,
                names::MIN_DIFFICULTY,
                names::MAX_DIFFICULTY
            ),
        });
    }

    if record.explanation.trim().is_empty() {
        violations.push(Violation::InvalidMetadata {
            field: "explanation",
            message: "empty explanation".to_string(),
        });
    }
}
