use super::*;
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::{Mutex, Notify};

struct TestLookup {
    plans: Vec<&'static str>,
    fail_with: Option<String>,
    gate: Option<Arc<Notify>>,
    seen_policies: Arc<Mutex<Vec<FetchPolicy>>>,
}

impl TestLookup {
    fn with_plans(plans: Vec<&'static str>) -> Self {
        Self {
            plans,
            fail_with: None,
            gate: None,
            seen_policies: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn failing(err: impl Into<String>) -> Self {
        let mut lookup = Self::with_plans(Vec::new());
        lookup.fail_with = Some(err.into());
        lookup
    }

    fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }
}

#[async_trait]
impl ResourceLookup for TestLookup {
    async fn query(
        &self,
        _parent: &ParentRef,
        policy: FetchPolicy,
    ) -> Result<LookupResponse, LookupError> {
        self.seen_policies.lock().await.push(policy);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if let Some(err) = &self.fail_with {
            return Err(LookupError::unavailable(err.clone()));
        }
        Ok(LookupResponse::from_plans(self.plans.iter().copied()))
    }
}

fn parent() -> Option<ParentRef> {
    ParentRef::from_parts(Some("space-a"), Some("team"))
}

#[tokio::test]
async fn activate_without_parent_opens_without_plan() {
    let mut wizard = WizardTrigger::new(Arc::new(TestLookup::with_plans(vec!["x"])), None, None);

    assert!(wizard.activate());
    assert!(wizard.is_open());
    assert_eq!(wizard.state().phase, WizardPhase::Open);
    assert!(wizard.state().resolved_plan.is_none());
    assert!(!wizard.is_resolving());
    assert!(!wizard.settle().await);
}

#[tokio::test]
async fn activate_resolves_first_plan() {
    let lookup = TestLookup::with_plans(vec!["plan-a", "plan-b"]);
    let policies = Arc::clone(&lookup.seen_policies);
    let mut wizard = WizardTrigger::new(Arc::new(lookup), parent(), None);

    assert!(wizard.activate());
    assert!(wizard.is_open());
    assert!(wizard.settle().await);

    assert_eq!(wizard.state().phase, WizardPhase::Open);
    assert_eq!(wizard.state().resolved_plan, Some(PlanId::from("plan-a")));
    assert_eq!(*policies.lock().await, vec![FetchPolicy::NetworkOnly]);
}

#[tokio::test]
async fn failed_lookup_still_opens_without_plan() {
    let mut wizard = WizardTrigger::new(
        Arc::new(TestLookup::failing("connection refused")),
        parent(),
        None,
    );

    wizard.activate();
    wizard.settle().await;

    assert!(wizard.is_open());
    assert_eq!(wizard.state().phase, WizardPhase::Open);
    assert!(wizard.state().resolved_plan.is_none());
}

#[tokio::test]
async fn empty_lookup_result_opens_without_plan() {
    let mut wizard = WizardTrigger::new(Arc::new(TestLookup::with_plans(vec![])), parent(), None);

    wizard.activate();
    wizard.settle().await;

    assert_eq!(wizard.state().phase, WizardPhase::Open);
    assert!(wizard.state().resolved_plan.is_none());
}

#[tokio::test]
async fn wizard_is_open_while_lookup_is_pending() {
    let gate = Arc::new(Notify::new());
    let lookup = TestLookup::with_plans(vec!["plan-a"]).gated(Arc::clone(&gate));
    let mut wizard = WizardTrigger::new(Arc::new(lookup), parent(), None);

    wizard.activate();
    assert_eq!(wizard.state().phase, WizardPhase::Opening);
    assert!(wizard.is_open());
    assert!(wizard.state().resolved_plan.is_none());
    assert!(!wizard.try_settle());

    gate.notify_one();
    wizard.settle().await;
    assert_eq!(wizard.state().resolved_plan, Some(PlanId::from("plan-a")));
}

#[tokio::test]
async fn try_settle_applies_an_arrived_result() {
    let mut wizard =
        WizardTrigger::new(Arc::new(TestLookup::with_plans(vec!["plan-b"])), parent(), None);
    wizard.activate();

    let mut settled = false;
    for _ in 0..50 {
        if wizard.try_settle() {
            settled = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    assert!(settled);
    assert_eq!(wizard.state().resolved_plan, Some(PlanId::from("plan-b")));
}

#[tokio::test]
async fn closing_during_lookup_discards_late_result() {
    let gate = Arc::new(Notify::new());
    let lookup = TestLookup::with_plans(vec!["stale"]).gated(Arc::clone(&gate));
    let mut wizard = WizardTrigger::new(Arc::new(lookup), parent(), None);

    wizard.activate();
    assert!(wizard.close());
    gate.notify_one();
    tokio::task::yield_now().await;

    assert!(!wizard.is_open());
    assert!(!wizard.is_resolving());
    assert!(!wizard.settle().await);
    assert_eq!(*wizard.state(), WizardState::default());
}

#[tokio::test]
async fn reactivation_starts_from_a_fresh_state() {
    let mut wizard =
        WizardTrigger::new(Arc::new(TestLookup::with_plans(vec!["plan-a"])), parent(), None);
    wizard.activate();
    wizard.settle().await;
    wizard.close();

    wizard.activate();
    assert_eq!(wizard.state().phase, WizardPhase::Opening);
    assert!(wizard.state().resolved_plan.is_none());
}

#[tokio::test]
async fn activate_while_open_is_a_no_op() {
    let mut wizard = WizardTrigger::new(Arc::new(TestLookup::with_plans(vec![])), None, None);
    assert!(wizard.activate());
    assert!(!wizard.activate());
    assert!(wizard.is_open());

    assert!(wizard.close());
    assert!(!wizard.is_open());
}

#[tokio::test]
async fn activate_while_opening_keeps_the_pending_lookup() {
    let gate = Arc::new(Notify::new());
    let lookup = TestLookup::with_plans(vec!["plan-a"]).gated(Arc::clone(&gate));
    let seen = Arc::clone(&lookup.seen_policies);
    let mut wizard = WizardTrigger::new(Arc::new(lookup), parent(), None);

    assert!(wizard.activate());
    assert!(!wizard.activate());
    assert_eq!(wizard.state().phase, WizardPhase::Opening);

    gate.notify_one();
    assert!(wizard.settle().await);
    assert_eq!(wizard.state().phase, WizardPhase::Open);
    assert_eq!(seen.lock().await.len(), 1);
}

#[test]
fn activate_outside_runtime_opens_without_plan() {
    let lookup = TestLookup::with_plans(vec!["plan-a"]);
    let seen = Arc::clone(&lookup.seen_policies);
    let mut wizard = WizardTrigger::new(Arc::new(lookup), parent(), None);

    assert!(wizard.activate());
    assert_eq!(wizard.state().phase, WizardPhase::Open);
    assert!(wizard.state().resolved_plan.is_none());
    assert!(!wizard.is_resolving());
    assert!(seen.try_lock().expect("uncontended").is_empty());
}

#[tokio::test]
async fn dropping_trigger_aborts_pending_lookup() {
    let gate = Arc::new(Notify::new());
    let lookup = Arc::new(TestLookup::with_plans(vec!["plan-a"]).gated(Arc::clone(&gate)));
    let mut wizard = WizardTrigger::new(lookup.clone(), parent(), None);

    wizard.activate();
    tokio::task::yield_now().await;
    drop(wizard);
    tokio::task::yield_now().await;

    // Only the test keeps the lookup alive once the aborted task is gone.
    for _ in 0..50 {
        if Arc::strong_count(&lookup) == 1 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(Arc::strong_count(&lookup), 1);
}

#[tokio::test]
async fn completion_requests_refetch_once_when_enabled() {
    let mut wizard = WizardTrigger::new(Arc::new(TestLookup::with_plans(vec![])), None, Some(true));
    wizard.activate();
    assert_eq!(wizard.state().refetch_on_create, Some(true));

    assert!(wizard.complete());
    assert!(!wizard.is_open());
    assert!(wizard.take_refetch_request());
    assert!(!wizard.take_refetch_request());
}

#[tokio::test]
async fn completion_without_refetch_hook_requests_nothing() {
    let mut wizard = WizardTrigger::new(Arc::new(TestLookup::with_plans(vec![])), None, None);
    assert!(!wizard.complete());

    wizard.activate();
    assert!(wizard.complete());
    assert!(!wizard.take_refetch_request());
}
