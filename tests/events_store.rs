mod common;

use std::collections::HashSet;

use common::{event, file_app, test_app};
use devevent_app::modules::events::models::EventCandidate;
use devevent_app::modules::events::store::{EventStoreError, SIMILAR_EVENTS_LIMIT};
use devevent_app::{EventStore, ValidationError};

#[tokio::test]
async fn create_stores_canonical_record() {
    let app = test_app().await;
    let store = EventStore::new(app.db.clone());

    let created = store
        .create(event("KubeCon + CloudNativeCon Europe 2026", &["cloud", "kubernetes"]))
        .await
        .unwrap();
    assert_eq!(created.slug, "kubecon-cloudnativecon-europe-2026");
    assert_eq!(created.time, "09:30");
    assert_eq!(created.date, "2026-05-20");

    let fetched = store
        .find_by_slug("kubecon-cloudnativecon-europe-2026")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.tags, vec!["cloud", "kubernetes"]);
    assert_eq!(fetched.agenda, vec!["Opening", "Talks"]);
}

#[tokio::test]
async fn invalid_payload_writes_nothing() {
    let app = test_app().await;
    let store = EventStore::new(app.db.clone());

    let err = store
        .create(EventCandidate {
            time: "24:00".to_string(),
            ..event("Late Night Hack", &["hackathon"])
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        EventStoreError::Validation(ValidationError::InvalidTime(_))
    ));
    assert!(store.list(50).await.unwrap().is_empty());
}

async fn assert_one_winner(store: &EventStore) {
    let titles = [
        "Rust Nation 2026",
        "rust nation 2026!",
        "  RUST -- Nation 2026 ",
        "Rust/Nation/2026",
        "rust_nation_2026",
        "RUST NATION 2026",
    ];
    let tasks: Vec<_> = titles
        .iter()
        .map(|title| {
            let store = store.clone();
            let candidate = event(title, &["rust"]);
            tokio::spawn(async move { store.create(candidate).await })
        })
        .collect();

    let mut created = 0;
    let mut rejected = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(event) => {
                assert_eq!(event.slug, "rust-nation-2026");
                created += 1;
            }
            Err(EventStoreError::DuplicateSlug(slug)) => {
                assert_eq!(slug, "rust-nation-2026");
                rejected += 1;
            }
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(rejected, titles.len() - 1);
    assert_eq!(store.list(50).await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_titles_with_same_slug_yield_one_event() {
    let app = test_app().await;
    assert_one_winner(&EventStore::new(app.db.clone())).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn parallel_writers_on_pooled_file_yield_one_event() {
    let app = file_app("parallel-slugs").await;
    assert_one_winner(&EventStore::new(app.db.clone())).await;
}

#[tokio::test]
async fn update_recomputes_slug_only_when_title_changes() {
    let app = test_app().await;
    let store = EventStore::new(app.db.clone());
    let original = store
        .create(event("Next.js Conf 2025", &["nextjs"]))
        .await
        .unwrap();

    let same_title = store
        .update(
            &original.slug,
            EventCandidate {
                venue: "Ace Hotel".to_string(),
                time: "14:05".to_string(),
                ..EventCandidate::from(&original)
            },
        )
        .await
        .unwrap();
    assert_eq!(same_title.slug, "next-js-conf-2025");
    assert_eq!(same_title.venue, "Ace Hotel");
    assert_eq!(same_title.time, "14:05");
    assert_eq!(same_title.created_at, original.created_at);

    let retitled = store
        .update(
            &original.slug,
            EventCandidate {
                title: "Next.js Conf 2026".to_string(),
                date: "2026-11-12T10:00:00Z".to_string(),
                ..EventCandidate::from(&same_title)
            },
        )
        .await
        .unwrap();
    assert_eq!(retitled.slug, "next-js-conf-2026");
    assert_eq!(retitled.date, "2026-11-12");
    assert!(store.find_by_slug("next-js-conf-2025").await.unwrap().is_none());
}

#[tokio::test]
async fn update_ignores_client_slug_when_title_is_kept() {
    let app = test_app().await;
    let store = EventStore::new(app.db.clone());
    let original = store.create(event("RustConf 2026", &["rust"])).await.unwrap();

    for sent in ["Not A Slug!/..", "rustconf", ""] {
        let updated = store
            .update(
                &original.slug,
                EventCandidate {
                    slug: Some(sent.to_string()),
                    ..EventCandidate::from(&original)
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.slug, "rustconf-2026");
    }

    let stored = store.find_by_slug("rustconf-2026").await.unwrap().unwrap();
    assert_eq!(stored.id, original.id);
    assert!(store.find_by_slug("Not A Slug!/..").await.unwrap().is_none());
}

#[tokio::test]
async fn resubmitting_stored_record_changes_nothing() {
    let app = test_app().await;
    let store = EventStore::new(app.db.clone());
    let original = store
        .create(EventCandidate {
            date: "2026/05/20".to_string(),
            time: "0930".to_string(),
            tags: vec![" cloud ".to_string(), "cloud".to_string(), "ai".to_string()],
            ..event("Cloud + AI Summit", &[])
        })
        .await
        .unwrap();

    let updated = store
        .update(&original.slug, EventCandidate::from(&original))
        .await
        .unwrap();
    assert_eq!(updated.id, original.id);
    assert_eq!(EventCandidate::from(&updated), EventCandidate::from(&original));

    let stored = store.find_by_slug(&original.slug).await.unwrap().unwrap();
    assert_eq!(EventCandidate::from(&stored), EventCandidate::from(&original));
    assert_eq!(stored.tags, vec!["cloud", "ai"]);
    assert_eq!((stored.date.as_str(), stored.time.as_str()), ("2026-05-20", "09:30"));
}

#[tokio::test]
async fn update_of_unknown_slug_is_not_found() {
    let app = test_app().await;
    let store = EventStore::new(app.db.clone());
    let err = store
        .update("nope", event("Nope", &["x"]))
        .await
        .unwrap_err();
    assert!(matches!(err, EventStoreError::NotFound(slug) if slug == "nope"));
}

#[tokio::test]
async fn update_into_taken_slug_is_rejected() {
    let app = test_app().await;
    let store = EventStore::new(app.db.clone());
    store.create(event("RustConf", &["rust"])).await.unwrap();
    let other = store.create(event("GopherCon", &["go"])).await.unwrap();

    let err = store
        .update(
            &other.slug,
            EventCandidate {
                title: "RustConf".to_string(),
                ..EventCandidate::from(&other)
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EventStoreError::DuplicateSlug(slug) if slug == "rustconf"));
}

#[tokio::test]
async fn similar_events_share_a_tag_and_exclude_the_source() {
    let app = test_app().await;
    let store = EventStore::new(app.db.clone());

    let source = store
        .create(event("Cloud Native Day", &["cloud", "kubernetes"]))
        .await
        .unwrap();
    store.create(event("Cloud Summit", &["cloud"])).await.unwrap();
    store
        .create(event("K8s and AI", &["kubernetes", "ai"]))
        .await
        .unwrap();
    store.create(event("AI Forum", &["ai"])).await.unwrap();

    let similar = store.find_similar(&source.slug).await.unwrap();
    let slugs: HashSet<_> = similar.iter().map(|e| e.slug.as_str()).collect();
    assert_eq!(slugs, HashSet::from(["cloud-summit", "k8s-and-ai"]));
}

#[tokio::test]
async fn similar_events_are_capped() {
    let app = test_app().await;
    let store = EventStore::new(app.db.clone());

    let source = store.create(event("Rust Week", &["rust"])).await.unwrap();
    for n in 0..6 {
        store
            .create(event(&format!("Rust Meetup {n}"), &["rust", "meetup"]))
            .await
            .unwrap();
    }

    let similar = store.find_similar(&source.slug).await.unwrap();
    assert_eq!(similar.len() as i64, SIMILAR_EVENTS_LIMIT);
    assert!(similar.iter().all(|e| e.id != source.id));

    // Same query, same answer.
    let again = store.find_similar(&source.slug).await.unwrap();
    assert_eq!(
        similar.iter().map(|e| e.id).collect::<Vec<_>>(),
        again.iter().map(|e| e.id).collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn similar_events_for_unknown_slug_is_empty() {
    let app = test_app().await;
    let store = EventStore::new(app.db.clone());
    store.create(event("Cloud Summit", &["cloud"])).await.unwrap();

    assert!(store.find_similar("does-not-exist").await.unwrap().is_empty());
}
