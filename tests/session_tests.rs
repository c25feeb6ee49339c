use matchcast::prediction::{PredictionClient, PredictionSession, PredictionState};
use pretty_assertions::assert_eq;
use std::sync::{Arc, atomic::Ordering};

mod common;

use common::{
    mocks::{GatedLlmClient, MockLlmClient},
    test_utils::{SOFASCORE_URL, sample_prediction_json, sample_prediction_text},
};

fn gated_setup() -> (Arc<PredictionSession>, PredictionClient, Arc<GatedLlmClient>) {
    let gated = Arc::new(GatedLlmClient::new());
    let client = PredictionClient::with_llm_client(gated.clone());
    (Arc::new(PredictionSession::new()), client, gated)
}

fn spawn_analyze(
    session: &Arc<PredictionSession>,
    client: &PredictionClient,
) -> tokio::task::JoinHandle<matchcast::prediction::PredictionOutcome> {
    let session = session.clone();
    let client = client.clone();
    tokio::spawn(async move { session.analyze(&client, SOFASCORE_URL, None, None).await })
}

#[test_log::test(tokio::test)]
async fn test_busy_only_while_call_in_flight() {
    let (session, client, gated) = gated_setup();
    let gate = gated.add_gate();

    assert!(!session.is_busy());

    let handle = spawn_analyze(&session, &client);
    gated.wait_entered().await;

    assert!(session.is_busy());
    assert_eq!(session.state().await, PredictionState::Loading);

    gate.send(Ok(sample_prediction_text())).unwrap();
    let outcome = handle.await.unwrap();

    assert!(outcome.is_prediction());
    assert!(!session.is_busy());
    match session.state().await {
        PredictionState::Settled { outcome, .. } => assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            sample_prediction_json()
        ),
        other => panic!("expected settled state, got {:?}", other),
    }
}

#[test_log::test(tokio::test)]
async fn test_busy_cleared_after_failure() {
    let (session, client, gated) = gated_setup();
    let gate = gated.add_gate();

    let handle = spawn_analyze(&session, &client);
    gated.wait_entered().await;
    assert!(session.is_busy());

    gate.send(Err("connection reset".to_string())).unwrap();
    let outcome = handle.await.unwrap();

    assert_eq!(
        outcome.error().unwrap().error,
        "AI analysis failed: connection reset"
    );
    assert!(!session.is_busy());
    assert!(matches!(
        session.state().await,
        PredictionState::Settled { .. }
    ));
}

#[tokio::test]
async fn test_validation_failure_settles_without_model_call() {
    let mock = Arc::new(MockLlmClient::new());
    let client = PredictionClient::with_llm_client(mock.clone());
    let session = PredictionSession::new();

    let outcome = session.analyze(&client, "   ", None, None).await;

    assert!(outcome.is_error());
    assert_eq!(mock.call_count(), 0);
    assert!(!session.is_busy());
    assert_eq!(session.generation(), 1);
}

#[test_log::test(tokio::test)]
async fn test_late_result_of_superseded_call_is_discarded() {
    let (session, client, gated) = gated_setup();
    let first_gate = gated.add_gate();
    let second_gate = gated.add_gate();

    let first = spawn_analyze(&session, &client);
    gated.wait_entered().await;
    let second = spawn_analyze(&session, &client);
    gated.wait_entered().await;
    assert_eq!(gated.calls.load(Ordering::SeqCst), 2);

    let mut newer = sample_prediction_json();
    newer["analysis"] = "second request".into();
    second_gate.send(Ok(newer.to_string())).unwrap();
    second.await.unwrap();
    assert!(session.is_busy());

    first_gate.send(Ok(sample_prediction_text())).unwrap();
    let late = first.await.unwrap();

    // The late caller still gets its own answer
    assert!(late.is_prediction());
    assert!(!session.is_busy());
    match session.state().await {
        PredictionState::Settled { outcome, .. } => {
            assert_eq!(outcome.prediction().unwrap().analysis, "second request")
        }
        other => panic!("expected settled state, got {:?}", other),
    }
}

#[tokio::test]
async fn test_superseded_call_finishing_first_keeps_loading() {
    let (session, client, gated) = gated_setup();
    let first_gate = gated.add_gate();
    let second_gate = gated.add_gate();

    let first = spawn_analyze(&session, &client);
    gated.wait_entered().await;
    let second = spawn_analyze(&session, &client);
    gated.wait_entered().await;

    first_gate.send(Ok(sample_prediction_text())).unwrap();
    first.await.unwrap();
    assert_eq!(session.state().await, PredictionState::Loading);
    assert!(session.is_busy());

    second_gate.send(Ok(sample_prediction_text())).unwrap();
    second.await.unwrap();
    assert!(matches!(
        session.state().await,
        PredictionState::Settled { .. }
    ));
    assert_eq!(session.generation(), 2);
}
