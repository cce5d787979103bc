use assert_matches::assert_matches;
use uuid::Uuid;

use patient_cell::models::{AppendHistoryRequest, PatientError};
use patient_cell::services::{HistoryLedger, PatientService};
use shared_database::Collection;
use shared_utils::test_utils::{MockRecords, TestContext};

fn note(doctor_id: Uuid, text: &str) -> AppendHistoryRequest {
    AppendHistoryRequest {
        doctor_id: Some(doctor_id),
        note: Some(text.to_string()),
    }
}

async fn seeded_patient(ctx: &TestContext) -> Uuid {
    let id = Uuid::new_v4();
    ctx.seed(Collection::Patients, MockRecords::patient(id)).await;
    id
}

#[tokio::test]
async fn test_append_assigns_id_and_keeps_order() {
    let ctx = TestContext::new();
    let patient_id = seeded_patient(&ctx).await;
    let ledger = HistoryLedger::from_state(&ctx.state);
    let doctor_id = Uuid::new_v4();

    ledger.append_history(patient_id, note(doctor_id, "Prise de sang pour bilan annuel")).await.unwrap();
    let patient = ledger.append_history(patient_id, note(doctor_id, "Varicelle")).await.unwrap();

    let notes: Vec<&str> = patient.history.iter().map(|e| e.note.as_str()).collect();
    assert_eq!(notes, vec!["Prise de sang pour bilan annuel", "Varicelle"]);
    assert_ne!(patient.history[0].id, patient.history[1].id);
    assert!(patient.history.iter().all(|e| e.doctor_id == doctor_id));

    let reloaded = PatientService::from_state(&ctx.state).get_patient(patient_id).await.unwrap();
    assert_eq!(reloaded.history, patient.history);
}

#[tokio::test]
async fn test_append_to_missing_patient_is_not_found() {
    let ctx = TestContext::new();
    let ledger = HistoryLedger::from_state(&ctx.state);

    let result = ledger.append_history(Uuid::new_v4(), note(Uuid::new_v4(), "Otite")).await;
    assert_matches!(result, Err(PatientError::NotFound));
}

#[tokio::test]
async fn test_append_requires_doctor_and_note() {
    let ctx = TestContext::new();
    let patient_id = seeded_patient(&ctx).await;
    let ledger = HistoryLedger::from_state(&ctx.state);

    let result = ledger
        .append_history(patient_id, AppendHistoryRequest { doctor_id: None, note: Some(" ".to_string()) })
        .await;

    match result {
        Err(PatientError::MalformedRequest { fields }) => assert_eq!(fields, vec!["doctorId", "note"]),
        other => panic!("expected MalformedRequest, got {:?}", other),
    }
}

#[tokio::test]
async fn test_remove_unknown_entry_is_idempotent() {
    let ctx = TestContext::new();
    let patient_id = seeded_patient(&ctx).await;
    let ledger = HistoryLedger::from_state(&ctx.state);

    let before = ledger.append_history(patient_id, note(Uuid::new_v4(), "Otite")).await.unwrap();
    let after = ledger.remove_history(patient_id, Uuid::new_v4()).await.unwrap();

    assert_eq!(after.history, before.history);
}

#[tokio::test]
async fn test_remove_on_missing_patient_is_not_found() {
    let ctx = TestContext::new();
    let ledger = HistoryLedger::from_state(&ctx.state);

    let result = ledger.remove_history(Uuid::new_v4(), Uuid::new_v4()).await;
    assert_matches!(result, Err(PatientError::NotFound));
}

#[tokio::test]
async fn test_append_then_remove_restores_history() {
    let ctx = TestContext::new();
    let patient_id = seeded_patient(&ctx).await;
    let ledger = HistoryLedger::from_state(&ctx.state);
    let doctor_id = Uuid::new_v4();

    let original = ledger.append_history(patient_id, note(doctor_id, "Suivi annuel")).await.unwrap();

    let appended = ledger.append_history(patient_id, note(doctor_id, "Otite")).await.unwrap();
    let new_entry = appended.history.last().unwrap().id;

    let restored = ledger.remove_history(patient_id, new_entry).await.unwrap();
    assert_eq!(restored.history, original.history);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_appends_lose_no_entries() {
    let ctx = TestContext::new();
    let patient_id = seeded_patient(&ctx).await;
    let doctor_id = Uuid::new_v4();

    let tasks = (0..10).map(|i| {
        let state = ctx.state.clone();
        tokio::spawn(async move {
            HistoryLedger::from_state(&state)
                .append_history(patient_id, note(doctor_id, &format!("Consultation {}", i)))
                .await
        })
    });

    for joined in futures::future::join_all(tasks).await {
        joined.expect("task completes").expect("append succeeds");
    }

    let patient = PatientService::from_state(&ctx.state).get_patient(patient_id).await.unwrap();
    assert_eq!(patient.history.len(), 10);
}
