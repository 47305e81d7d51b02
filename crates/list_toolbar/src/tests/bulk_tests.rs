use super::*;
use anyhow::anyhow;
use async_trait::async_trait;
use tokio::sync::Mutex;

#[derive(Default)]
struct RecordingExecutor {
    calls: Mutex<Vec<BulkAction>>,
    fail_with: Option<String>,
}

#[async_trait]
impl BatchExecutor for RecordingExecutor {
    async fn delete_all(&self) -> Result<()> {
        self.calls.lock().await.push(BulkAction::DeleteAll);
        match &self.fail_with {
            Some(err) => Err(anyhow!(err.clone())),
            None => Ok(()),
        }
    }

    async fn purge_all(&self) -> Result<()> {
        self.calls.lock().await.push(BulkAction::PurgeAll);
        match &self.fail_with {
            Some(err) => Err(anyhow!(err.clone())),
            None => Ok(()),
        }
    }
}

const PURGEABLE: ItemCapabilities = ItemCapabilities {
    supports_purge: true,
};

#[test]
fn empty_list_disables_every_action() {
    let availability = BulkActionAvailability::compute(0, PURGEABLE);
    assert!(!availability.delete_all_enabled);
    assert!(!availability.purge_all_enabled);
}

#[test]
fn non_empty_list_enables_delete() {
    let availability = BulkActionAvailability::compute(5, PURGEABLE);
    assert!(availability.delete_all_enabled);
    assert!(availability.purge_all_enabled);
}

#[test]
fn purge_requires_capability() {
    let availability = BulkActionAvailability::compute(5, ItemCapabilities::default());
    assert!(availability.delete_all_enabled);
    assert!(!availability.purge_all_enabled);
    assert!(!availability.is_enabled(BulkAction::PurgeAll));
}

#[tokio::test]
async fn disabled_action_never_reaches_executor() {
    let executor = RecordingExecutor::default();
    let gate = BulkActionGate::new(PURGEABLE);

    let outcome = gate
        .run(BulkAction::DeleteAll, 0, &executor)
        .await
        .expect("skip");
    assert_eq!(outcome, BulkDispatch::Skipped);
    assert!(executor.calls.lock().await.is_empty());
}

#[tokio::test]
async fn enabled_action_is_delegated_once() {
    let executor = RecordingExecutor::default();
    let gate = BulkActionGate::new(PURGEABLE);

    let outcome = gate
        .run(BulkAction::PurgeAll, 3, &executor)
        .await
        .expect("dispatch");
    assert_eq!(outcome, BulkDispatch::Dispatched);
    assert_eq!(*executor.calls.lock().await, vec![BulkAction::PurgeAll]);
}

#[tokio::test]
async fn executor_failure_propagates_without_retry() {
    let executor = RecordingExecutor {
        fail_with: Some("backend rejected batch".into()),
        ..Default::default()
    };
    let gate = BulkActionGate::new(ItemCapabilities::default());

    let err = gate
        .run(BulkAction::DeleteAll, 2, &executor)
        .await
        .expect_err("should fail");
    assert!(err.to_string().contains("backend rejected batch"));
    assert_eq!(executor.calls.lock().await.len(), 1);
}
