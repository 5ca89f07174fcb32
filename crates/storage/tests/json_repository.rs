use storage::json::JsonDeckRepository;
use storage::repository::{CardRecord, DeckRecord, DeckRepository, StorageError};
use study_core::model::{Deck, DeckId};

fn build_deck(id: &str, card_ids: &[&str]) -> Deck {
    DeckRecord {
        id: id.to_owned(),
        title: format!("Deck {id}"),
        description: None,
        prompt: Some("greetings in Spanish".into()),
        cards: card_ids
            .iter()
            .map(|card_id| CardRecord {
                id: (*card_id).to_owned(),
                front: format!("Q{card_id}"),
                back: format!("A{card_id}"),
                uid: None,
            })
            .collect(),
    }
    .into_deck()
    .unwrap()
}

#[tokio::test]
async fn json_roundtrip_writes_pretty_file_named_after_deck() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonDeckRepository::new(dir.path());
    let deck = build_deck("spanish", &["1", "2"]);

    repo.upsert_deck(&deck).await.unwrap();

    let raw = std::fs::read_to_string(dir.path().join("spanish.json")).unwrap();
    assert!(raw.contains("\n  \"title\": \"Deck spanish\""));

    let fetched = repo.get_deck(deck.id()).await.unwrap();
    assert_eq!(fetched.cards().len(), 2);
    assert_eq!(fetched.prompt(), Some("greetings in Spanish"));
    assert_eq!(fetched.cards()[1].uid().as_str(), "spanish:2");
}

#[tokio::test]
async fn json_reads_hand_written_deck_without_uids() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("capitals.json"),
        r#"{
            "id": "capitals",
            "title": "Capitals",
            "cards": [
                {"id": "fr", "front": "France", "back": "Paris"},
                {"id": "de", "front": "Germany", "back": "Berlin", "uid": "geo:de"}
            ]
        }"#,
    )
    .unwrap();

    let repo = JsonDeckRepository::new(dir.path());
    let deck = repo
        .get_deck(&DeckId::new("capitals").unwrap())
        .await
        .unwrap();

    assert_eq!(deck.cards()[0].uid().as_str(), "capitals:fr");
    assert_eq!(deck.cards()[1].uid().as_str(), "geo:de");
}

#[tokio::test]
async fn json_rejects_id_that_differs_from_file_stem() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("wrong.json"),
        r#"{"id": "right", "title": "T", "cards": []}"#,
    )
    .unwrap();

    let repo = JsonDeckRepository::new(dir.path());
    let err = repo
        .get_deck(&DeckId::new("wrong").unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Serialization(_)));
}

#[tokio::test]
async fn json_list_skips_invalid_files() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonDeckRepository::new(dir.path());
    repo.upsert_deck(&build_deck("b", &["1"])).await.unwrap();
    repo.upsert_deck(&build_deck("a", &["1", "2"])).await.unwrap();
    std::fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
    std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let summaries = repo.list_decks().await.unwrap();
    let listed: Vec<_> = summaries
        .iter()
        .map(|s| (s.id.as_str(), s.card_count))
        .collect();
    assert_eq!(listed, [("a", 2), ("b", 1)]);
}

#[tokio::test]
async fn json_list_on_missing_directory_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonDeckRepository::new(dir.path().join("not-there"));
    assert!(repo.list_decks().await.unwrap().is_empty());
}

#[tokio::test]
async fn json_insert_new_deck_never_overwrites() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonDeckRepository::new(dir.path());
    let deck = build_deck("verbs", &["1"]);

    let first = repo.insert_new_deck(&deck).await.unwrap();
    let second = repo.insert_new_deck(&deck).await.unwrap();
    let third = repo.insert_new_deck(&deck).await.unwrap();

    assert_eq!(first.as_str(), "verbs");
    assert_eq!(second.as_str(), "verbs-2");
    assert_eq!(third.as_str(), "verbs-3");

    let stored = repo.get_deck(&third).await.unwrap();
    assert_eq!(stored.id().as_str(), "verbs-3");
    assert_eq!(stored.cards()[0].uid().as_str(), "verbs-3:1");

    // no temp files left behind
    let leftovers = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().starts_with(".deck-"))
        .count();
    assert_eq!(leftovers, 0);
}

#[tokio::test]
async fn json_insert_keeps_uids_unique_when_rehoming() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonDeckRepository::new(dir.path());
    let deck = DeckRecord {
        id: "a".into(),
        title: "A".into(),
        description: None,
        prompt: None,
        cards: vec![
            CardRecord {
                id: "1".into(),
                front: "one".into(),
                back: "uno".into(),
                uid: None,
            },
            CardRecord {
                id: "2".into(),
                front: "two".into(),
                back: "dos".into(),
                uid: Some("a-2:1".into()),
            },
        ],
    }
    .into_deck()
    .unwrap();

    repo.insert_new_deck(&deck).await.unwrap();
    let second = repo.insert_new_deck(&deck).await.unwrap();
    assert_eq!(second.as_str(), "a-3");

    let stored = repo.get_deck(&second).await.unwrap();
    let uids: Vec<_> = stored.cards().iter().map(|c| c.uid().as_str()).collect();
    assert_eq!(uids, ["a-3:1", "a-2:1"]);

    let listed: Vec<_> = repo
        .list_decks()
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.id.to_string())
        .collect();
    assert_eq!(listed, ["a", "a-3"]);
}
