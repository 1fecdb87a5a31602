#![allow(dead_code)]

use bokibank::models::{Category, QuestionRecord};
use bokibank::store::SqliteStore;

pub async fn create_test_store() -> SqliteStore {
    use std::sync::atomic::{AtomicU32, Ordering};
    static COUNTER: AtomicU32 = AtomicU32::new(0);
    let id = COUNTER.fetch_add(1, Ordering::SeqCst);
    let path =
        std::env::temp_dir().join(format!("bokibank_test_{}_{}.db", std::process::id(), id));
    // Clean up leftover file from previous runs
    let _ = std::fs::remove_file(&path);
    SqliteStore::new(&path.display().to_string())
        .await
        .expect("failed to create test database")
}

pub fn temp_json_path() -> std::path::PathBuf {
    use std::sync::atomic::{AtomicU32, Ordering};
    static COUNTER: AtomicU32 = AtomicU32::new(0);
    let id = COUNTER.fetch_add(1, Ordering::SeqCst);
    let path =
        std::env::temp_dir().join(format!("bokibank_test_{}_{}.json", std::process::id(), id));
    let _ = std::fs::remove_file(&path);
    path
}

fn record(
    id: &str,
    category: Category,
    template: &str,
    answer: &str,
    explanation: &str,
) -> QuestionRecord {
    QuestionRecord {
        id: id.to_string(),
        category,
        question_text: "次の取引について答えなさい。".to_string(),
        answer_template: template.to_string(),
        correct_answer: answer.to_string(),
        explanation: explanation.to_string(),
        difficulty: 2,
        tags: Some(r#"["基礎"]"#.to_string()),
    }
}

/// 現金100,000円を元入れして開業した。
pub fn journal_question() -> QuestionRecord {
    record(
        "Q_J_001",
        Category::Journal,
        r#"{
            "type": "journal_entry",
            "fields": [
                {"name": "debit_account", "label": "借方科目"},
                {"name": "debit_amount", "label": "借方金額"},
                {"name": "credit_account", "label": "貸方科目"},
                {"name": "credit_amount", "label": "貸方金額"}
            ]
        }"#,
        r#"{
            "entries": [
                {"debit_account": "現金", "debit_amount": 100000,
                 "credit_account": "資本金", "credit_amount": 100000}
            ]
        }"#,
        "元入れによる開業なので、借方は現金、貸方は資本金となります。",
    )
}

/// 2行仕訳（商品を仕入れ、代金の一部を現金で支払った）
pub fn journal_question_two_lines() -> QuestionRecord {
    record(
        "Q_J_002",
        Category::Journal,
        r#"{
            "type": "journal_entry",
            "allow_multiple_entries": true,
            "fields": [
                {"name": "debit_account", "label": "借方科目"},
                {"name": "debit_amount", "label": "借方金額"},
                {"name": "credit_account", "label": "貸方科目"},
                {"name": "credit_amount", "label": "貸方金額"}
            ]
        }"#,
        r#"{
            "entries": [
                {"debit_account": "仕入", "debit_amount": 30000,
                 "credit_account": "現金", "credit_amount": 30000},
                {"debit_account": "仕入", "debit_amount": 50000,
                 "credit_account": "買掛金", "credit_amount": 50000}
            ]
        }"#,
        "仕入80,000円のうち現金払いが30,000円、残額は買掛金です。",
    )
}

pub fn ledger_question() -> QuestionRecord {
    record(
        "Q_L_001",
        Category::Ledger,
        r#"{
            "type": "ledger_entry",
            "account_name": "現金",
            "columns": [
                {"name": "date", "label": "日付"},
                {"name": "description", "label": "摘要"},
                {"name": "debit", "label": "借方"},
                {"name": "credit", "label": "貸方"},
                {"name": "balance", "label": "残高"}
            ]
        }"#,
        r#"{
            "entries": [
                {"date": "4/1", "description": "前期繰越", "debit": 50000, "credit": 0, "balance": 50000},
                {"date": "4/5", "description": "売上", "debit": 20000, "credit": 0, "balance": 70000},
                {"date": "4/10", "description": "仕入", "debit": 0, "credit": 30000, "balance": 40000}
            ]
        }"#,
        "現金勘定は借方残高です。日付順に記入します。",
    )
}

pub fn voucher_question() -> QuestionRecord {
    record(
        "Q_J_003",
        Category::Journal,
        r#"{
            "type": "voucher_entry",
            "vouchers": [
                {"type": "入金伝票", "fields": [
                    {"name": "account", "label": "科目"},
                    {"name": "amount", "label": "金額"}
                ]},
                {"type": "振替伝票", "fields": [
                    {"name": "account", "label": "科目"},
                    {"name": "amount", "label": "金額"}
                ]}
            ]
        }"#,
        r#"{
            "vouchers": [
                {"type": "入金伝票", "entries": [
                    {"account": "売掛金", "amount": 40000}
                ]},
                {"type": "振替伝票", "entries": [
                    {"account": "売掛金", "amount": 60000},
                    {"account": "売上", "amount": 60000}
                ]}
            ]
        }"#,
        "一部現金取引は入金伝票と振替伝票に分けて起票します。",
    )
}

pub fn single_choice_question() -> QuestionRecord {
    record(
        "Q_T_001",
        Category::TrialBalance,
        r#"{
            "type": "single_choice",
            "options": ["1", "2", "3", "4"]
        }"#,
        r#"{"selected": "2"}"#,
        "貸倒引当金は売掛金の評価勘定なので、選択肢2が正解です。",
    )
}

pub fn multiple_choice_question() -> QuestionRecord {
    record(
        "Q_T_002",
        Category::TrialBalance,
        r#"{
            "type": "multiple_choice",
            "options": ["現金", "売掛金", "建物", "借入金"]
        }"#,
        r#"{"selected_options": ["現金", "売掛金", "建物"]}"#,
        "資産に属するのは現金・売掛金・建物です。借入金は負債です。",
    )
}

pub fn trial_balance_question() -> QuestionRecord {
    record(
        "Q_T_003",
        Category::TrialBalance,
        r#"{
            "type": "trial_balance",
            "accounts": ["現金", "売掛金", "買掛金", "資本金"],
            "columns": ["debit", "credit"],
            "totals": true
        }"#,
        r#"{
            "entries": [
                {"account": "現金", "debit": 80000, "credit": 0},
                {"account": "売掛金", "debit": 40000, "credit": 0},
                {"account": "買掛金", "debit": 0, "credit": 20000},
                {"account": "資本金", "debit": 0, "credit": 100000}
            ]
        }"#,
        "借方合計と貸方合計はともに120,000円で一致します。",
    )
}

/// Every builder above, as one clean bank.
pub fn valid_bank() -> Vec<QuestionRecord> {
    vec![
        journal_question(),
        journal_question_two_lines(),
        ledger_question(),
        voucher_question(),
        single_choice_question(),
        multiple_choice_question(),
        trial_balance_question(),
    ]
}
