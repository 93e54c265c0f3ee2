mod common;

use mockall::{predicate::eq, Sequence};
use pretty_assertions::assert_eq;
use sesplan_client::actions::{commit_intervals, CommitReport};
use sesplan_client::mock::MockSlotAvailability;
use sesplan_core::availability::coalesce::Interval;
use sesplan_core::availability::selection::SelectionIntent;
use sesplan_core::errors::SesplanError;

use common::{stored, utc};

fn two_intervals() -> Vec<Interval<chrono::DateTime<chrono::Utc>>> {
    vec![
        Interval { start: utc(10, 0), end: utc(11, 30) },
        Interval { start: utc(12, 0), end: utc(12, 30) },
    ]
}

#[tokio::test]
async fn test_conflict_on_add_is_swallowed_and_both_calls_are_made() {
    let mut api = MockSlotAvailability::new();
    let mut seq = Sequence::new();

    api.expect_set_my_slot_availability()
        .withf(|session_id, slot_id, window| {
            *session_id == 3
                && *slot_id == 11
                && window.available_from == "2024-05-01T10:00:00.000Z"
                && window.available_to == "2024-05-01T11:30:00.000Z"
        })
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, slot_id, window| Ok(stored(slot_id, &window)));

    api.expect_set_my_slot_availability()
        .withf(|_, _, window| window.available_from == "2024-05-01T12:00:00.000Z")
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _, _| Err(SesplanError::Conflict("Overlapping availability".to_string())));

    let report = commit_intervals(&api, 3, 11, SelectionIntent::Add, &two_intervals())
        .await
        .unwrap();

    assert_eq!(report, CommitReport { submitted: 2, conflicts: 1 });
}

#[tokio::test]
async fn test_other_errors_abort_remaining_submissions() {
    let mut api = MockSlotAvailability::new();

    api.expect_set_my_slot_availability()
        .times(1)
        .returning(|_, _, _| Err(SesplanError::Api { status: 500, detail: "boom".to_string() }));

    let err = commit_intervals(&api, 3, 11, SelectionIntent::Add, &two_intervals())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn test_remove_deletes_each_interval_by_range() {
    let mut api = MockSlotAvailability::new();
    let mut seq = Sequence::new();

    api.expect_delete_my_slot_availability()
        .with(eq(3), eq(11), eq(Some((utc(10, 0), utc(11, 30)))))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _, _| Ok(()));
    api.expect_delete_my_slot_availability()
        .with(eq(3), eq(11), eq(Some((utc(12, 0), utc(12, 30)))))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _, _| Ok(()));

    let report = commit_intervals(&api, 3, 11, SelectionIntent::Remove, &two_intervals())
        .await
        .unwrap();

    assert_eq!(report, CommitReport { submitted: 2, conflicts: 0 });
}

#[tokio::test]
async fn test_conflict_on_remove_is_not_swallowed() {
    let mut api = MockSlotAvailability::new();

    api.expect_delete_my_slot_availability()
        .times(1)
        .returning(|_, _, _| Err(SesplanError::Conflict("locked".to_string())));

    let err = commit_intervals(&api, 3, 11, SelectionIntent::Remove, &two_intervals())
        .await
        .unwrap_err();

    assert!(err.is_conflict());
}

#[tokio::test]
async fn test_invalid_ids_never_reach_the_backend() {
    let api = MockSlotAvailability::new();

    let err = commit_intervals(&api, 3, 0, SelectionIntent::Add, &two_intervals())
        .await
        .unwrap_err();
    assert!(matches!(err, SesplanError::Validation(_)));

    let err = commit_intervals(&api, -1, 11, SelectionIntent::Remove, &two_intervals())
        .await
        .unwrap_err();
    assert!(matches!(err, SesplanError::Validation(_)));
}

#[tokio::test]
async fn test_nothing_to_commit() {
    let api = MockSlotAvailability::new();

    let report = commit_intervals(&api, 3, 11, SelectionIntent::Add, &[]).await.unwrap();

    assert_eq!(report, CommitReport::default());
}
