//! Per-template-type structural contracts.
//!
//! One static `FieldContract` per template type, for both the template JSON
//! and the correct-answer JSON. The historical bug class in this content
//! bank was "answer shape does not match the declared template type";
//! centralizing the contract here replaces the per-question ad-hoc checks
//! the old repair tooling used.

use serde_json::Value;

use crate::models::TemplateType;

/// Expected JSON shape for one key.
#[derive(Debug, Clone, Copy)]
pub enum Shape {
    Str,
    Int,
    Bool,
    /// Array of plain strings.
    StrArray { non_empty: bool },
    /// Array of objects, each checked against `elem`.
    Array {
        elem: &'static [Field],
        non_empty: bool,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub shape: Shape,
    pub required: bool,
}

/// Structural contract for one JSON document.
#[derive(Debug, Clone, Copy)]
pub struct FieldContract {
    pub fields: &'static [Field],
}

const fn req(name: &'static str, shape: Shape) -> Field {
    Field {
        name,
        shape,
        required: true,
    }
}

const fn opt(name: &'static str, shape: Shape) -> Field {
    Field {
        name,
        shape,
        required: false,
    }
}

// Input field descriptors used by journal and voucher templates.
const INPUT_FIELD: &[Field] = &[req("name", Shape::Str), req("label", Shape::Str)];

const LEDGER_COLUMN: &[Field] = &[req("name", Shape::Str), req("label", Shape::Str)];

const VOUCHER_BLOCK: &[Field] = &[
    req("type", Shape::Str),
    req(
        "fields",
        Shape::Array {
            elem: INPUT_FIELD,
            non_empty: true,
        },
    ),
];

const JOURNAL_TEMPLATE: FieldContract = FieldContract {
    fields: &[
        req(
            "fields",
            Shape::Array {
                elem: INPUT_FIELD,
                non_empty: true,
            },
        ),
        opt("allow_multiple_entries", Shape::Bool),
    ],
};

const LEDGER_TEMPLATE: FieldContract = FieldContract {
    fields: &[
        req(
            "columns",
            Shape::Array {
                elem: LEDGER_COLUMN,
                non_empty: true,
            },
        ),
        opt("account_name", Shape::Str),
        opt("max_entries", Shape::Int),
    ],
};

const VOUCHER_TEMPLATE: FieldContract = FieldContract {
    fields: &[req(
        "vouchers",
        Shape::Array {
            elem: VOUCHER_BLOCK,
            non_empty: true,
        },
    )],
};

const CHOICE_TEMPLATE: FieldContract = FieldContract {
    fields: &[req("options", Shape::StrArray { non_empty: true })],
};

const BALANCE_TEMPLATE: FieldContract = FieldContract {
    fields: &[
        req("accounts", Shape::StrArray { non_empty: true }),
        req("columns", Shape::StrArray { non_empty: true }),
        opt("totals", Shape::Bool),
    ],
};

const JOURNAL_LINE: &[Field] = &[
    req("debit_account", Shape::Str),
    req("debit_amount", Shape::Int),
    req("credit_account", Shape::Str),
    req("credit_amount", Shape::Int),
];

const LEDGER_LINE: &[Field] = &[
    req("date", Shape::Str),
    req("description", Shape::Str),
    opt("debit", Shape::Int),
    opt("credit", Shape::Int),
    opt("balance", Shape::Int),
];

const VOUCHER_LINE: &[Field] = &[
    opt("date", Shape::Str),
    req("account", Shape::Str),
    req("amount", Shape::Int),
    opt("description", Shape::Str),
];

const VOUCHER_ANSWER_BLOCK: &[Field] = &[
    req("type", Shape::Str),
    req(
        "entries",
        Shape::Array {
            elem: VOUCHER_LINE,
            non_empty: true,
        },
    ),
];

const BALANCE_LINE: &[Field] = &[
    req("account", Shape::Str),
    opt("debit", Shape::Int),
    opt("credit", Shape::Int),
];

const JOURNAL_ANSWER: FieldContract = FieldContract {
    fields: &[req(
        "entries",
        Shape::Array {
            elem: JOURNAL_LINE,
            non_empty: true,
        },
    )],
};

const LEDGER_ANSWER: FieldContract = FieldContract {
    fields: &[req(
        "entries",
        Shape::Array {
            elem: LEDGER_LINE,
            non_empty: true,
        },
    )],
};

const VOUCHER_ANSWER: FieldContract = FieldContract {
    fields: &[req(
        "vouchers",
        Shape::Array {
            elem: VOUCHER_ANSWER_BLOCK,
            non_empty: true,
        },
    )],
};

const SINGLE_CHOICE_ANSWER: FieldContract = FieldContract {
    fields: &[req("selected", Shape::Str)],
};

const MULTIPLE_CHOICE_ANSWER: FieldContract = FieldContract {
    fields: &[req("selected_options", Shape::StrArray { non_empty: true })],
};

const BALANCE_ANSWER: FieldContract = FieldContract {
    fields: &[req(
        "entries",
        Shape::Array {
            elem: BALANCE_LINE,
            non_empty: true,
        },
    )],
};

/// Contract the answer template JSON must satisfy for this type.
pub fn template_contract(template_type: TemplateType) -> &'static FieldContract {
    match template_type {
        TemplateType::JournalEntry => &JOURNAL_TEMPLATE,
        TemplateType::LedgerEntry => &LEDGER_TEMPLATE,
        TemplateType::VoucherEntry => &VOUCHER_TEMPLATE,
        TemplateType::SingleChoice | TemplateType::MultipleChoice => &CHOICE_TEMPLATE,
        TemplateType::TrialBalance
        | TemplateType::Worksheet
        | TemplateType::FinancialStatement => &BALANCE_TEMPLATE,
    }
}

/// Contract the correct-answer JSON must satisfy for this type.
pub fn answer_contract(template_type: TemplateType) -> &'static FieldContract {
    match template_type {
        TemplateType::JournalEntry => &JOURNAL_ANSWER,
        TemplateType::LedgerEntry => &LEDGER_ANSWER,
        TemplateType::VoucherEntry => &VOUCHER_ANSWER,
        TemplateType::SingleChoice => &SINGLE_CHOICE_ANSWER,
        TemplateType::MultipleChoice => &MULTIPLE_CHOICE_ANSWER,
        TemplateType::TrialBalance
        | TemplateType::Worksheet
        | TemplateType::FinancialStatement => &BALANCE_ANSWER,
    }
}

/// A missing or mistyped field inside one element of an object array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementIssue {
    /// Array path, e.g. "entries" or "vouchers[0].entries".
    pub path: String,
    pub index: usize,
    pub missing: Vec<String>,
}

/// Outcome of checking a JSON document against a contract.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckReport {
    /// Missing or invalid top-level keys.
    pub missing: Vec<String>,
    pub elements: Vec<ElementIssue>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.elements.is_empty()
    }

    /// All offending keys flattened into one list, element issues included
    /// as "path[index].key".
    pub fn flattened(&self) -> Vec<String> {
        let mut keys = self.missing.clone();
        for issue in &self.elements {
            for key in &issue.missing {
                keys.push(format!("{}[{}].{}", issue.path, issue.index, key));
            }
        }
        keys
    }
}

/// Check a parsed JSON document against a contract. Collects every problem
/// rather than stopping at the first one.
pub fn check(value: &Value, contract: &FieldContract) -> CheckReport {
    let mut report = CheckReport::default();
    report.missing = check_object(value, contract.fields, "", &mut report.elements);
    report
}

fn check_object(
    value: &Value,
    fields: &[Field],
    base: &str,
    elements: &mut Vec<ElementIssue>,
) -> Vec<String> {
    let mut missing = Vec::new();

    let Some(object) = value.as_object() else {
        missing.push("(not an object)".to_string());
        return missing;
    };

    for field in fields {
        let Some(found) = object.get(field.name) else {
            if field.required {
                missing.push(field.name.to_string());
            }
            continue;
        };

        match field.shape {
            Shape::Str => {
                if !found.is_string() {
                    missing.push(field.name.to_string());
                }
            }
            Shape::Int => {
                if found.as_i64().is_none() {
                    missing.push(field.name.to_string());
                }
            }
            Shape::Bool => {
                if !found.is_boolean() {
                    missing.push(field.name.to_string());
                }
            }
            Shape::StrArray { non_empty } => {
                let ok = found.as_array().is_some_and(|items| {
                    items.iter().all(Value::is_string) && (!non_empty || !items.is_empty())
                });
                if !ok {
                    missing.push(field.name.to_string());
                }
            }
            Shape::Array { elem, non_empty } => {
                let path = if base.is_empty() {
                    field.name.to_string()
                } else {
                    format!("{base}.{}", field.name)
                };

                let Some(items) = found.as_array() else {
                    missing.push(field.name.to_string());
                    continue;
                };

                if non_empty && items.is_empty() {
                    missing.push(field.name.to_string());
                }

                for (index, item) in items.iter().enumerate() {
                    let item_base = format!("{path}[{index}]");
                    let item_missing = check_object(item, elem, &item_base, elements);
                    if !item_missing.is_empty() {
                        elements.push(ElementIssue {
                            path: path.clone(),
                            index,
                            missing: item_missing,
                        });
                    }
                }
            }
        }
    }

    missing
}
