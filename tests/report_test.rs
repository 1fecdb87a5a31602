mod common;

use bokibank::report::ValidationReport;
use bokibank::validate::ViolationKind;

#[test]
fn clean_bank_yields_clean_report() {
    let report = ValidationReport::build(&common::valid_bank());

    assert!(report.is_clean());
    assert_eq!(report.invalid, 0);
    assert!(report.render().contains("all valid"));
}

#[test]
fn violations_are_grouped_by_kind() {
    let mut bank = common::valid_bank();
    bank[0].answer_template = "{broken".to_string();
    bank[1].difficulty = 9;
    bank[2].difficulty = 0;

    let report = ValidationReport::build(&bank);

    assert!(!report.is_clean());
    assert_eq!(report.invalid, 3);
    assert_eq!(report.by_kind[&ViolationKind::MalformedJson].len(), 1);
    assert_eq!(report.by_kind[&ViolationKind::InvalidMetadata].len(), 2);

    let rendered = report.render();
    assert!(rendered.contains("MalformedJson (1)"));
    assert!(rendered.contains("InvalidMetadata (2)"));
    assert!(rendered.contains("Q_J_001"));
}

#[test]
fn duplicate_explanations_warn_but_stay_clean() {
    let mut bank = common::valid_bank();
    let shared = bank[0].explanation.clone();
    bank[1].explanation = shared;

    let report = ValidationReport::build(&bank);

    assert!(report.is_clean());
    assert_eq!(report.duplicate_explanations.len(), 1);
    assert!(report.render().contains("warning"));
}
