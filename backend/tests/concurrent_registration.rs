//! Concurrency guarantees of the portal service under parallel callers.

use std::collections::HashSet;
use std::sync::Arc;

use complaint_portal::domain::ports::{ComplaintCommand, ComplaintQuery, UserAccounts};
use complaint_portal::domain::{ComplaintDraft, ComplaintPortalService, ErrorCode};
use complaint_portal::outbound::identity::RandomHexIdentityGenerator;
use complaint_portal::outbound::memory::InMemoryRecordStore;
use rstest::{fixture, rstest};

type Portal = ComplaintPortalService<InMemoryRecordStore, RandomHexIdentityGenerator>;

#[fixture]
fn portal() -> Arc<Portal> {
    Arc::new(ComplaintPortalService::new(
        Arc::new(InMemoryRecordStore::new()),
        Arc::new(RandomHexIdentityGenerator),
    ))
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn same_email_registers_exactly_once(portal: Arc<Portal>) {
    let attempts: Vec<_> = (0..32)
        .map(|n| {
            let portal = portal.clone();
            tokio::spawn(async move { portal.register(&format!("User {n}"), "a@x.com").await })
        })
        .collect();

    let mut created = 0;
    for attempt in attempts {
        match attempt.await.expect("task joins") {
            Ok(_) => created += 1,
            Err(error) => assert_eq!(error.code(), ErrorCode::AlreadyExists),
        }
    }
    assert_eq!(created, 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn distinct_emails_receive_unique_identities(portal: Arc<Portal>) {
    let attempts: Vec<_> = (0..64)
        .map(|n| {
            let portal = portal.clone();
            tokio::spawn(async move {
                portal
                    .register(&format!("User {n}"), &format!("user{n}@x.com"))
                    .await
            })
        })
        .collect();

    let mut ids = HashSet::new();
    let mut secrets = HashSet::new();
    for attempt in attempts {
        let user = attempt.await.expect("task joins").expect("registered");
        ids.insert(user.id().to_string());
        secrets.insert(user.secret_code().expose().to_owned());
    }
    assert_eq!(ids.len(), 64);
    assert_eq!(secrets.len(), 64);
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn parallel_submissions_are_all_listed(portal: Arc<Portal>) {
    let user = portal.register("Alice", "a@x.com").await.expect("register");
    let secret = user.secret_code().expose().to_owned();

    let submissions: Vec<_> = (0..20)
        .map(|n| {
            let portal = portal.clone();
            let secret = secret.clone();
            tokio::spawn(async move {
                let draft = ComplaintDraft {
                    title: format!("Complaint {n}"),
                    summary: "summary".to_owned(),
                    severity: n,
                };
                portal.submit(&secret, draft).await
            })
        })
        .collect();
    for submission in submissions {
        submission.await.expect("task joins").expect("submitted");
    }

    let listed = portal.user_complaints(&secret).await.expect("list");
    let ids: HashSet<String> = listed.iter().map(|c| c.id().to_string()).collect();
    assert_eq!(listed.len(), 20);
    assert_eq!(ids.len(), 20);
}
