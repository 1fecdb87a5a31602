mod common;

use bokibank::grade::grade_submission;
use bokibank::store::{ContentStore, JsonStore};
use serde_json::json;

#[tokio::test]
async fn sqlite_roundtrip_preserves_records() {
    let store = common::create_test_store().await;
    let bank = common::valid_bank();

    store.save_questions(&bank).await.unwrap();
    let loaded = store.load_all_questions().await.unwrap();

    assert_eq!(loaded.len(), bank.len());
    let mut expected = bank.clone();
    expected.sort_by(|a, b| a.id.cmp(&b.id));
    assert_eq!(loaded, expected);
}

#[tokio::test]
async fn sqlite_get_question_by_id() {
    let store = common::create_test_store().await;
    store
        .save_questions(&common::valid_bank())
        .await
        .unwrap();

    let found = store.get_question("Q_L_001").await.unwrap();
    assert_eq!(found.unwrap().id, "Q_L_001");

    let missing = store.get_question("Q_J_999").await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn sqlite_save_is_an_upsert() {
    let store = common::create_test_store().await;
    let mut record = common::journal_question();
    store.save_questions(std::slice::from_ref(&record)).await.unwrap();

    record.explanation = "差し替え後の解説です。".to_string();
    store.save_questions(std::slice::from_ref(&record)).await.unwrap();

    let loaded = store.load_all_questions().await.unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].explanation, "差し替え後の解説です。");
    assert_eq!(store.questions_count().await.unwrap(), 1);
}

#[tokio::test]
async fn json_roundtrip_preserves_records() {
    let path = common::temp_json_path();
    let store = JsonStore::new(&path);
    let bank = common::valid_bank();

    store.save_questions(&bank).await.unwrap();
    let loaded = store.load_all_questions().await.unwrap();

    let mut expected = bank.clone();
    expected.sort_by(|a, b| a.id.cmp(&b.id));
    assert_eq!(loaded, expected);

    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn json_save_merges_by_id() {
    let path = common::temp_json_path();
    let store = JsonStore::new(&path);

    store
        .save_questions(&[common::journal_question()])
        .await
        .unwrap();
    let mut updated = common::journal_question();
    updated.difficulty = 4;
    store
        .save_questions(&[updated, common::ledger_question()])
        .await
        .unwrap();

    let loaded = store.load_all_questions().await.unwrap();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].id, "Q_J_001");
    assert_eq!(loaded[0].difficulty, 4);

    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn grade_submission_resolves_through_the_store() {
    let store = common::create_test_store().await;
    store
        .save_questions(&common::valid_bank())
        .await
        .unwrap();

    let result = grade_submission(&store, "Q_T_001", &json!({"selected": "2"}))
        .await
        .unwrap();
    assert!(result.correct);

    let result = grade_submission(&store, "Q_T_001", &json!({"selected": "3"}))
        .await
        .unwrap();
    assert!(!result.correct);
}

#[tokio::test]
async fn grade_submission_unknown_question_is_an_error() {
    let store = common::create_test_store().await;

    let err = grade_submission(&store, "Q_J_404", &json!({"selected": "1"})).await;
    assert!(err.is_err());
}
