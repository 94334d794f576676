mod common;

use common::*;
use ldn_notify_core::collaborators::{InMemoryRequestExecutor, ScriptedOutcome};
use ldn_notify_core::models::RawMessage;
use ldn_notify_core::{MessageCollection, NotifyConfig, NotifyError, SharedMessageCollection};

#[test]
fn test_should_format_message_labels() {
    let harness = TestHarness::new();
    let messages = mock_unformatted_admin_notify_messages();

    let formatted = harness.service.format_message_labels(messages[0].clone());

    assert_eq!(formatted, mock_admin_notify_messages()[0]);
}

#[tokio::test]
async fn test_should_get_details_for_messages() {
    let harness = TestHarness::new();

    let detailed = harness
        .service
        .get_detailed_messages(mock_unformatted_admin_notify_messages())
        .await;

    assert_eq!(detailed.len(), 2);
    assert_eq!(detailed[0].ldn_service, TEST_LDN_SERVICE_NAME);
    assert_eq!(detailed[0].related_item, TEST_RELATED_ITEM_NAME);
    // target/object take precedence on the outgoing message
    assert_eq!(detailed[1].ldn_service, "secondLdnService");
    assert_eq!(detailed[1].related_item, "secondRelatedItem");
    assert!(harness.notifications.notices().is_empty());
}

#[tokio::test]
async fn test_should_reprocess_message() {
    let harness = TestHarness::new();
    let messages = harness
        .service
        .find_messages(mock_unformatted_admin_notify_messages())
        .await
        .unwrap();
    let original = messages.snapshot();
    let first = original.as_slice()[0].clone();

    let reprocessed = harness
        .service
        .reprocess_message(&first, &messages)
        .await
        .unwrap();

    assert_eq!(reprocessed.len(), 2);
    assert_eq!(reprocessed, original);
    assert_eq!(harness.executor.sent_requests().len(), 1);
}

#[tokio::test]
async fn test_reprocess_replaces_by_identity() {
    let executor = InMemoryRequestExecutor::new(ENDPOINT_URL);
    let harness = TestHarness::with_collaborators(
        executor,
        service_directory(),
        item_directory(),
        NotifyConfig::default(),
    );
    let messages = harness
        .service
        .find_messages(mock_unformatted_admin_notify_messages())
        .await
        .unwrap();
    let before = messages.snapshot();
    let failed = before.as_slice()[1].clone();
    let failed_id = failed.identifier().unwrap().to_string();

    let mut retried = RawMessage::new(failed_id.clone());
    retried.queue_status_label = Some("QUEUE_STATUS_QUEUED_FOR_RETRY".to_string());
    retried.queue_attempts = Some(0);
    harness
        .executor
        .set_outcome(failed_id.clone(), ScriptedOutcome::Updated(retried));

    let after = harness
        .service
        .reprocess_message(&failed, &messages)
        .await
        .unwrap();

    assert_eq!(after.len(), before.len());
    assert_eq!(after.identifiers(), before.identifiers());
    for (old, new) in before.iter().zip(after.iter()) {
        if new.identifier() == Some(failed_id.as_str()) {
            assert_ne!(old, new);
            assert_eq!(new.label, "notify-queue-status.queued_for_retry");
            assert_eq!(new.ldn_service, "secondLdnService");
            assert_eq!(new.related_item, "secondRelatedItem");
        } else {
            assert_eq!(old, new);
        }
    }
}

#[tokio::test]
async fn test_failed_reprocess_keeps_row_actionable() {
    let executor = InMemoryRequestExecutor::new(ENDPOINT_URL);
    let harness = TestHarness::with_collaborators(
        executor,
        service_directory(),
        item_directory(),
        NotifyConfig::default(),
    );
    let messages = harness
        .service
        .find_messages(mock_unformatted_admin_notify_messages())
        .await
        .unwrap();
    let before = messages.snapshot();
    let failed = before.as_slice()[1].clone();
    let failed_id = failed.identifier().unwrap().to_string();
    harness.executor.set_outcome(
        failed_id.clone(),
        ScriptedOutcome::Rejected {
            status_code: 503,
            message: "Service Unavailable".to_string(),
        },
    );

    let error = harness
        .service
        .reprocess_message(&failed, &messages)
        .await
        .unwrap_err();
    assert!(error.is_retryable());
    assert_eq!(messages.snapshot(), before);

    // resubmission succeeds once the server recovers
    harness
        .executor
        .set_outcome(failed_id, ScriptedOutcome::Unchanged);
    let after = harness
        .service
        .reprocess_message(&failed, &messages)
        .await
        .unwrap();
    assert_eq!(after, before);
}

#[tokio::test]
async fn test_missing_references_skip_lookups() {
    let harness = TestHarness::new();

    let detailed = harness
        .service
        .get_detailed_messages(vec![RawMessage::new("urn:uuid:no-refs")])
        .await;

    assert_eq!(detailed[0].ldn_service, "");
    assert_eq!(detailed[0].related_item, "");
    assert_eq!(harness.services.lookup_count(), 0);
    assert_eq!(harness.items.lookup_count(), 0);
}

#[tokio::test]
async fn test_deleted_service_degrades_with_notice() {
    let harness = TestHarness::new();
    harness.services.remove(FIRST_SERVICE_ID);

    let detailed = harness
        .service
        .get_detailed_messages(mock_unformatted_admin_notify_messages())
        .await;

    assert_eq!(detailed.len(), 2);
    assert_eq!(detailed[0].ldn_service, "");
    assert_eq!(detailed[0].related_item, TEST_RELATED_ITEM_NAME);
    assert_eq!(detailed[1].ldn_service, "secondLdnService");
    assert_eq!(harness.notifications.notices().len(), 1);
}

#[tokio::test]
async fn test_reprocess_rejects_message_from_another_collection() {
    let harness = TestHarness::new();
    let detailed = harness
        .service
        .get_detailed_messages(mock_unformatted_admin_notify_messages())
        .await;
    let only_second =
        SharedMessageCollection::new(MessageCollection::new(vec![detailed[1].clone()]).unwrap());

    let result = harness
        .service
        .reprocess_message(&detailed[0], &only_second)
        .await;

    assert!(matches!(result, Err(NotifyError::MessageNotFound { .. })));
    assert!(harness.executor.sent_requests().is_empty());
}

#[tokio::test]
async fn test_unchanged_reprocess_survives_lookup_outage() {
    let harness = TestHarness::new();
    let messages = harness
        .service
        .find_messages(mock_unformatted_admin_notify_messages())
        .await
        .unwrap();
    let before = messages.snapshot();
    let first = before.as_slice()[0].clone();
    harness.services.remove(FIRST_SERVICE_ID);
    let lookups = harness.services.lookup_count();

    let after = harness
        .service
        .reprocess_message(&first, &messages)
        .await
        .unwrap();

    assert_eq!(after, before);
    assert_eq!(after.as_slice()[0].ldn_service, TEST_LDN_SERVICE_NAME);
    assert_eq!(harness.services.lookup_count(), lookups);
    assert!(harness.notifications.notices().is_empty());
}

#[tokio::test]
async fn test_updated_reprocess_keeps_names_on_lookup_outage() {
    let harness = TestHarness::new();
    let messages = harness
        .service
        .find_messages(mock_unformatted_admin_notify_messages())
        .await
        .unwrap();
    let first = messages.snapshot().as_slice()[0].clone();
    let first_id = first.identifier().unwrap().to_string();

    let mut retried = RawMessage::new(first_id.clone());
    retried.queue_status_label = Some("QUEUE_STATUS_QUEUED_FOR_RETRY".to_string());
    harness
        .executor
        .set_outcome(first_id, ScriptedOutcome::Updated(retried));
    harness.services.remove(FIRST_SERVICE_ID);

    let after = harness
        .service
        .reprocess_message(&first, &messages)
        .await
        .unwrap();

    let merged = &after.as_slice()[0];
    assert_eq!(merged.label, "notify-queue-status.queued_for_retry");
    assert_eq!(merged.ldn_service, TEST_LDN_SERVICE_NAME);
    assert_eq!(merged.related_item, TEST_RELATED_ITEM_NAME);
    // the failed lookup is still reported
    assert_eq!(harness.notifications.notices().len(), 1);
}
