use std::sync::Arc;

use services::{DeckService, SessionLoopService};
use storage::repository::{CardRecord, DeckRecord, Storage};
use study_core::model::{CardOrder, CardSide, DeckId, MaxCycles, SessionConfig};
use study_core::{EndReason, Outcome};

fn record(id: &str, cards: &[(&str, &str, &str)]) -> DeckRecord {
    DeckRecord {
        id: id.to_owned(),
        title: "Smoke Deck".into(),
        description: Some("three Spanish words".into()),
        prompt: None,
        cards: cards
            .iter()
            .map(|(id, front, back)| CardRecord {
                id: (*id).to_owned(),
                front: (*front).to_owned(),
                back: (*back).to_owned(),
                uid: None,
            })
            .collect(),
    }
}

#[tokio::test]
async fn session_loop_runs_to_all_correct() {
    let storage = Storage::in_memory();
    let decks = DeckService::new(Arc::clone(&storage.decks));
    let deck_id = decks
        .create_deck(record(
            "spanish",
            &[("1", "hola", "hello"), ("2", "adiós", "goodbye"), ("3", "gracias", "thanks")],
        ))
        .await
        .unwrap();

    let loop_svc = SessionLoopService::new(Arc::clone(&storage.decks));
    let config =
        SessionConfig::new(CardSide::Front, MaxCycles::new(4).unwrap(), CardOrder::Original);
    let mut session = loop_svc.start_session(&deck_id, config).await.unwrap();

    // miss "adiós" once, then get it right on the retry
    let mut shown = Vec::new();
    while !session.is_complete() {
        let front = session.shown_face().unwrap().to_owned();
        let correct = !(front == "adiós" && session.progress().cycle == 1);
        shown.push(front);
        loop_svc.answer_current(&mut session, correct).unwrap();
    }

    assert_eq!(shown, ["hola", "adiós", "gracias", "adiós"]);

    let report = session.report();
    assert_eq!(report.end_reason, Some(EndReason::AllCorrect));
    assert_eq!(report.cycles_run, 2);
    assert_eq!(report.scores.right_on_first_try.correct, 2);
    assert_eq!(report.scores.right_on_first_try.percent, 67);
    assert_eq!(report.scores.overall.percent, 100);
    assert_eq!(report.outcomes[1].outcome, Outcome::CorrectOnRetry);
}

#[tokio::test]
async fn session_loop_stops_at_ceiling() {
    let storage = Storage::in_memory();
    let decks = DeckService::new(Arc::clone(&storage.decks));
    let deck_id = decks
        .create_deck(record("pair", &[("x", "x-front", "x-back"), ("y", "y-front", "y-back")]))
        .await
        .unwrap();

    let loop_svc = SessionLoopService::new(Arc::clone(&storage.decks));
    let config =
        SessionConfig::new(CardSide::Back, MaxCycles::new(2).unwrap(), CardOrder::Original);
    let mut session = loop_svc.start_session(&deck_id, config).await.unwrap();
    assert_eq!(session.shown_face(), Some("x-back"));

    let mut answers = 0;
    while !session.is_complete() {
        loop_svc.answer_current(&mut session, false).unwrap();
        answers += 1;
    }

    assert_eq!(answers, 4);
    let report = session.report();
    assert_eq!(report.end_reason, Some(EndReason::CeilingReached));
    assert_eq!(report.breakdown.missed, 2);
    assert_eq!(report.missed().count(), 2);
    assert!(loop_svc.answer_current(&mut session, true).is_err());
}

#[tokio::test]
async fn session_loop_reports_missing_deck() {
    let storage = Storage::in_memory();
    let loop_svc = SessionLoopService::new(storage.decks);
    let missing = DeckId::new("nowhere").unwrap();

    let err = loop_svc
        .start_session(&missing, SessionConfig::default())
        .await
        .err()
        .unwrap();
    assert!(matches!(
        err,
        services::SessionError::Storage(storage::StorageError::NotFound)
    ));
}
