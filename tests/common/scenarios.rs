//! Database fixture scenarios shared by the environment-backed and
//! container-backed test suites.
//!
//! Each scenario returns `Availability` so the caller decides whether an
//! absent server is a skip.

use doclingtaxa::config::MongoConfig;
use doclingtaxa::fixtures::{run_session, Availability, MongoSession};
use doclingtaxa::storage::collection_counts;
use futures::FutureExt;
use mongodb::bson::{doc, Document};
use mongodb::Database;
use std::panic::AssertUnwindSafe;

async fn seed(db: &Database) {
    db.collection::<Document>("documents")
        .insert_many(vec![
            doc! { "file": "monografia_01.pdf", "pages": 212 },
            doc! { "file": "monografia_02.pdf", "pages": 87 },
        ])
        .await
        .expect("seed documents");

    db.collection::<Document>("taxa")
        .insert_many(vec![
            doc! { "genus": "Bothrops", "species": "jararaca" },
            doc! { "genus": "Crotalus", "species": "durissus" },
        ])
        .await
        .expect("seed taxa");

    db.collection::<Document>("pages")
        .insert_one(doc! { "document": "monografia_01.pdf", "number": 1 })
        .await
        .expect("seed pages");
}

/// Every collection is empty after `clean_test_db`, and no collection is dropped.
pub async fn clean_empties_every_collection(config: &MongoConfig) -> Availability<()> {
    run_session(config, |session| async move {
        seed(&session.database()).await;

        let (db, report) = session.clean_test_db_with_report().await.expect("clean test db");

        assert_eq!(report.total_deleted(), 5);
        assert_eq!(report.collections.len(), 3);

        let counts = collection_counts(&db).await.expect("count documents");
        assert_eq!(counts.len(), 3, "collections must survive cleaning: {:?}", counts);
        assert!(counts.values().all(|&n| n == 0), "leftover documents: {:?}", counts);
    })
    .await
}

/// Documents written by one test are gone when the next test cleans.
pub async fn leftovers_do_not_leak(config: &MongoConfig) -> Availability<()> {
    run_session(config, |session| async move {
        // first test
        let db = session.clean_test_db().await.expect("clean before first test");
        seed(&db).await;

        // second test
        let db = session.clean_test_db().await.expect("clean before second test");
        let counts = collection_counts(&db).await.expect("count documents");
        assert!(counts.values().all(|&n| n == 0), "leaked documents: {:?}", counts);
    })
    .await
}

/// Views are left alone; only the collections behind them are emptied.
pub async fn clean_skips_views(config: &MongoConfig) -> Availability<()> {
    run_session(config, |session| async move {
        let db = session.database();
        seed(&db).await;
        db.create_collection("taxa_by_genus")
            .view_on("taxa".to_string())
            .pipeline(vec![doc! { "$sort": { "genus": 1 } }])
            .await
            .expect("create view");

        let (db, report) =
            session.clean_test_db_with_report().await.expect("clean with a view present");

        assert!(report.collections.iter().all(|c| c.collection != "taxa_by_genus"));
        assert_eq!(report.total_deleted(), 5);

        let names = db.list_collection_names().await.expect("list namespaces");
        assert!(names.contains(&"taxa_by_genus".to_string()), "view must survive: {:?}", names);
    })
    .await
}

/// Cleaning a database that has no collections succeeds and reports nothing.
pub async fn clean_on_empty_database(config: &MongoConfig) -> Availability<()> {
    run_session(config, |session| async move {
        let (_, report) = session.clean_test_db_with_report().await.expect("clean empty db");
        assert!(report.collections.is_empty());
        assert_eq!(report.total_deleted(), 0);
    })
    .await
}

/// Teardown of a database that was never created is a no-op, and repeating it is fine.
pub async fn teardown_is_idempotent(config: &MongoConfig) -> Availability<()> {
    let first = match MongoSession::acquire(config).await {
        Availability::Ready(session) => session,
        Availability::Unavailable(reason) => return Availability::Unavailable(reason),
    };
    first.teardown().await.expect("drop nonexistent database");

    match MongoSession::acquire(config).await {
        Availability::Ready(session) => {
            session.teardown().await.expect("drop database again");
            Availability::Ready(())
        }
        Availability::Unavailable(reason) => Availability::Unavailable(reason),
    }
}

/// After teardown the session database no longer exists on the server.
pub async fn teardown_drops_database(config: &MongoConfig) -> Availability<()> {
    let name = match run_session(config, |session| async move {
        seed(&session.database()).await;
        session.database_name().to_string()
    })
    .await
    {
        Availability::Ready(name) => name,
        Availability::Unavailable(reason) => return Availability::Unavailable(reason),
    };

    let observer = match MongoSession::acquire(config).await {
        Availability::Ready(session) => session,
        Availability::Unavailable(reason) => return Availability::Unavailable(reason),
    };
    let databases = observer.client().list_database_names().await.expect("list databases");
    observer.close().await;

    assert!(!databases.contains(&name), "{} still exists: {:?}", name, databases);
    Availability::Ready(())
}

/// A panicking test body still tears the session down, and the panic propagates.
pub async fn teardown_runs_after_panic(config: &MongoConfig) -> Availability<()> {
    let observer = match MongoSession::acquire(config).await {
        Availability::Ready(session) => session,
        Availability::Unavailable(reason) => return Availability::Unavailable(reason),
    };

    let (tx, rx) = std::sync::mpsc::channel::<String>();
    let outcome = AssertUnwindSafe(run_session(config, move |session| async move {
        seed(&session.database()).await;
        tx.send(session.database_name().to_string()).expect("report database name");
        panic!("test body failed");
    }))
    .catch_unwind()
    .await;

    assert!(outcome.is_err(), "the body's panic must reach the caller");

    let name = rx.recv().expect("body ran before panicking");
    let databases = observer.client().list_database_names().await.expect("list databases");
    observer.close().await;

    assert!(!databases.contains(&name), "{} survived a panicking test", name);
    Availability::Ready(())
}
