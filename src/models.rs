use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::names;

/// 出題分野（仕訳・帳簿・試算表）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Journal,
    Ledger,
    TrialBalance,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Journal => "journal",
            Category::Ledger => "ledger",
            Category::TrialBalance => "trial_balance",
        }
    }

    /// Question ids are prefixed by section: Q_J_nnn, Q_L_nnn, Q_T_nnn.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            Category::Journal => names::JOURNAL_ID_PREFIX,
            Category::Ledger => names::LEDGER_ID_PREFIX,
            Category::TrialBalance => names::TRIAL_BALANCE_ID_PREFIX,
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "journal" => Ok(Category::Journal),
            "ledger" => Ok(Category::Ledger),
            "trial_balance" => Ok(Category::TrialBalance),
            other => Err(format!("unknown category: {other}")),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One exam question as stored in the content bank. The template, answer
/// and tags fields hold raw JSON; they are checked once by the validator
/// and parsed into typed values for grading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: String,
    pub category: Category,
    pub question_text: String,
    pub answer_template: String,
    pub correct_answer: String,
    pub explanation: String,
    pub difficulty: u8,
    #[serde(default)]
    pub tags: Option<String>,
}

/// Closed set of answer-template types. Everything outside this set is a
/// content bug, reported as `UnknownTemplateType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateType {
    JournalEntry,
    LedgerEntry,
    VoucherEntry,
    SingleChoice,
    MultipleChoice,
    TrialBalance,
    Worksheet,
    FinancialStatement,
}

impl TemplateType {
    pub const ALL: &'static [TemplateType] = &[
        TemplateType::JournalEntry,
        TemplateType::LedgerEntry,
        TemplateType::VoucherEntry,
        TemplateType::SingleChoice,
        TemplateType::MultipleChoice,
        TemplateType::TrialBalance,
        TemplateType::Worksheet,
        TemplateType::FinancialStatement,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateType::JournalEntry => "journal_entry",
            TemplateType::LedgerEntry => "ledger_entry",
            TemplateType::VoucherEntry => "voucher_entry",
            TemplateType::SingleChoice => "single_choice",
            TemplateType::MultipleChoice => "multiple_choice",
            TemplateType::TrialBalance => "trial_balance",
            TemplateType::Worksheet => "worksheet",
            TemplateType::FinancialStatement => "financial_statement",
        }
    }

    /// trial_balance, worksheet and financial_statement share one answer
    /// shape: a list of account balances that must net to zero.
    pub fn is_balance_family(&self) -> bool {
        matches!(
            self,
            TemplateType::TrialBalance
                | TemplateType::Worksheet
                | TemplateType::FinancialStatement
        )
    }
}

impl FromStr for TemplateType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "journal_entry" => Ok(TemplateType::JournalEntry),
            "ledger_entry" => Ok(TemplateType::LedgerEntry),
            "voucher_entry" => Ok(TemplateType::VoucherEntry),
            "single_choice" => Ok(TemplateType::SingleChoice),
            "multiple_choice" => Ok(TemplateType::MultipleChoice),
            "trial_balance" => Ok(TemplateType::TrialBalance),
            "worksheet" => Ok(TemplateType::Worksheet),
            "financial_statement" => Ok(TemplateType::FinancialStatement),
            other => Err(format!("unknown template type: {other}")),
        }
    }
}

impl fmt::Display for TemplateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Typed correct-answer data. Parsed once from the record's raw JSON with
// the template type as the external tag.

/// 仕訳1行（借方・貸方は常に同額）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalLine {
    pub debit_account: String,
    pub debit_amount: i64,
    pub credit_account: String,
    pub credit_amount: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerLine {
    pub date: String,
    pub description: String,
    #[serde(default)]
    pub debit: i64,
    #[serde(default)]
    pub credit: i64,
    #[serde(default)]
    pub balance: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoucherLine {
    #[serde(default)]
    pub date: Option<String>,
    pub account: String,
    pub amount: i64,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voucher {
    #[serde(rename = "type")]
    pub voucher_type: String,
    pub entries: Vec<VoucherLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceLine {
    pub account: String,
    #[serde(default)]
    pub debit: i64,
    #[serde(default)]
    pub credit: i64,
}

/// The graded truth for one question, tagged by its template type.
#[derive(Debug, Clone, PartialEq)]
pub enum CorrectAnswer {
    Journal { entries: Vec<JournalLine> },
    Ledger { entries: Vec<LedgerLine> },
    Voucher { vouchers: Vec<Voucher> },
    SingleChoice { selected: String },
    MultipleChoice { selected_options: Vec<String> },
    Balance { entries: Vec<BalanceLine> },
}

#[derive(Deserialize)]
struct EntriesWrapper<T> {
    entries: Vec<T>,
}

#[derive(Deserialize)]
struct VouchersWrapper {
    vouchers: Vec<Voucher>,
}

#[derive(Deserialize)]
struct SelectedWrapper {
    selected: String,
}

#[derive(Deserialize)]
struct SelectedOptionsWrapper {
    selected_options: Vec<String>,
}

impl CorrectAnswer {
    /// Parse the raw correct-answer JSON for a record of the given template
    /// type. Callers are expected to have run the validator first; a parse
    /// failure here means corrupt content, not a user error.
    pub fn parse(template_type: TemplateType, json: &str) -> serde_json::Result<Self> {
        let answer = match template_type {
            TemplateType::JournalEntry => CorrectAnswer::Journal {
                entries: serde_json::from_str::<EntriesWrapper<JournalLine>>(json)?.entries,
            },
            TemplateType::LedgerEntry => CorrectAnswer::Ledger {
                entries: serde_json::from_str::<EntriesWrapper<LedgerLine>>(json)?.entries,
            },
            TemplateType::VoucherEntry => CorrectAnswer::Voucher {
                vouchers: serde_json::from_str::<VouchersWrapper>(json)?.vouchers,
            },
            TemplateType::SingleChoice => CorrectAnswer::SingleChoice {
                selected: serde_json::from_str::<SelectedWrapper>(json)?.selected,
            },
            TemplateType::MultipleChoice => CorrectAnswer::MultipleChoice {
                selected_options: serde_json::from_str::<SelectedOptionsWrapper>(json)?
                    .selected_options,
            },
            TemplateType::TrialBalance
            | TemplateType::Worksheet
            | TemplateType::FinancialStatement => CorrectAnswer::Balance {
                entries: serde_json::from_str::<EntriesWrapper<BalanceLine>>(json)?.entries,
            },
        };

        Ok(answer)
    }

    /// Whether this answer belongs to the given template type's family.
    pub fn matches(&self, template_type: TemplateType) -> bool {
        match self {
            CorrectAnswer::Journal { .. } => template_type == TemplateType::JournalEntry,
            CorrectAnswer::Ledger { .. } => template_type == TemplateType::LedgerEntry,
            CorrectAnswer::Voucher { .. } => template_type == TemplateType::VoucherEntry,
            CorrectAnswer::SingleChoice { .. } => template_type == TemplateType::SingleChoice,
            CorrectAnswer::MultipleChoice { .. } => template_type == TemplateType::MultipleChoice,
            CorrectAnswer::Balance { .. } => template_type.is_balance_family(),
        }
    }
}
