use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::action::Action;
use crate::guard::FetchGuard;
use crate::source::RepoSource;
use crate::state::{Panel, ViewAction, ViewState};
use crate::types::{CategoryKey, RepositoryRecord};

/// Owns the selected language, the per-language results and the set of
/// languages already requested. Fetch results come back as
/// [`Action::View`] on `action_tx` and are applied with [`apply`].
///
/// [`apply`]: PopularController::apply
pub struct PopularController {
    selected: CategoryKey,
    state: ViewState,
    guard: FetchGuard,
    source: Arc<dyn RepoSource>,
    action_tx: mpsc::UnboundedSender<Action>,
    disposed: CancellationToken,
}

impl PopularController {
    pub fn new(
        source: Arc<dyn RepoSource>,
        action_tx: mpsc::UnboundedSender<Action>,
        initial: CategoryKey,
    ) -> Self {
        Self {
            selected: initial,
            state: ViewState::default(),
            guard: FetchGuard::default(),
            source,
            action_tx,
            disposed: CancellationToken::new(),
        }
    }

    /// Fetch the initial language if nobody has yet.
    pub fn start(&mut self) {
        self.ensure_fetched();
    }

    pub fn current(&self) -> &CategoryKey {
        &self.selected
    }

    pub fn select(&mut self, key: CategoryKey) {
        self.selected = key;
        self.ensure_fetched();
    }

    pub fn apply(&mut self, action: ViewAction) {
        let state = std::mem::take(&mut self.state);
        self.state = state.reduce(action);
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading(&self.selected)
    }

    pub fn panel(&self) -> Panel<'_> {
        self.state.panel(&self.selected)
    }

    pub fn current_repos(&self) -> &[RepositoryRecord] {
        self.state.repos(&self.selected).unwrap_or_default()
    }

    /// Stop dispatching results. Requests already in flight still run to
    /// completion, their results are dropped.
    pub fn dispose(&self) {
        self.disposed.cancel();
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.is_cancelled()
    }

    fn ensure_fetched(&mut self) {
        if self.is_disposed() {
            return;
        }
        // Claimed before the request starts so that flipping back and forth
        // between languages never issues a second request.
        if !self.guard.claim(&self.selected) {
            tracing::debug!(key = %self.selected, "already fetched, skipping");
            return;
        }
        self.spawn_fetch(self.selected.clone());
    }

    fn spawn_fetch(&self, key: CategoryKey) {
        let tx = self.action_tx.clone();
        let source = Arc::clone(&self.source);
        let disposed = self.disposed.clone();
        tracing::debug!(%key, source = source.name(), "fetching popular repos");

        tokio::spawn(async move {
            // Nothing above debug here: stderr is the terminal while the TUI runs.
            let action = match source.fetch_popular(&key).await {
                Ok(repos) => Action::View(ViewAction::Success { key, repos }),
                Err(e) => {
                    tracing::debug!(%key, "fetch failed: {}", e);
                    Action::from(e)
                }
            };

            if disposed.is_cancelled() {
                tracing::debug!("controller disposed, dropping fetch result");
                return;
            }
            tx.send(action).ok();
        });
    }
}

impl Drop for PopularController {
    fn drop(&mut self) {
        self.disposed.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::Notify;
    use tokio::time::timeout;
    use tracing::Level;
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    use super::*;
    use crate::error::{PopularError, Result};
    use crate::state::tests::records;

    const TEST_TIMEOUT: Duration = Duration::from_secs(2);

    #[derive(Debug, Default)]
    struct MockSource {
        state: Mutex<MockSourceState>,
        gates: HashMap<CategoryKey, Arc<Notify>>,
    }

    #[derive(Debug, Default)]
    struct MockSourceState {
        calls: Vec<CategoryKey>,
        responses: HashMap<CategoryKey, std::result::Result<usize, String>>,
    }

    impl MockSource {
        fn respond(&self, key: &str, response: std::result::Result<usize, String>) {
            self.state
                .lock()
                .unwrap()
                .responses
                .insert(CategoryKey::from(key), response);
        }

        fn calls(&self) -> Vec<CategoryKey> {
            self.state.lock().unwrap().calls.clone()
        }

        /// Hold requests for `key` until `gate` is notified.
        fn gate(mut self, key: &str, gate: Arc<Notify>) -> Self {
            self.gates.insert(CategoryKey::from(key), gate);
            self
        }
    }

    #[async_trait]
    impl RepoSource for MockSource {
        fn name(&self) -> &str {
            "mock"
        }

        async fn fetch_popular(&self, key: &CategoryKey) -> Result<Vec<RepositoryRecord>> {
            let response = {
                let mut state = self.state.lock().unwrap();
                state.calls.push(key.clone());
                state.responses.get(key).cloned().unwrap_or(Ok(0))
            };
            if let Some(gate) = self.gates.get(key) {
                gate.notified().await;
            }
            response
                .map(|n| records(key.as_str(), n))
                .map_err(PopularError::Api)
        }
    }

    fn controller(
        source: Arc<MockSource>,
        initial: &str,
    ) -> (PopularController, mpsc::UnboundedReceiver<Action>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (PopularController::new(source, tx, initial.into()), rx)
    }

    async fn next_view_action(rx: &mut mpsc::UnboundedReceiver<Action>) -> ViewAction {
        match timeout(TEST_TIMEOUT, rx.recv())
            .await
            .expect("action timeout")
            .expect("channel closed")
        {
            Action::View(action) => action,
            other => panic!("expected view action, got {other:?}"),
        }
    }

    async fn pump(controller: &mut PopularController, rx: &mut mpsc::UnboundedReceiver<Action>) {
        let action = next_view_action(rx).await;
        controller.apply(action);
    }

    #[tokio::test]
    async fn initial_key_is_fetched_on_start() {
        let source = Arc::new(MockSource::default());
        source.respond("All", Ok(30));
        let (mut ctl, mut rx) = controller(source.clone(), "All");

        ctl.start();
        assert!(ctl.is_loading());
        pump(&mut ctl, &mut rx).await;

        assert_eq!(ctl.current_repos().len(), 30);
        assert_eq!(ctl.state().error(), None);
        assert!(!ctl.is_loading());
        assert_eq!(source.calls(), vec![CategoryKey::from("All")]);
    }

    #[tokio::test]
    async fn selecting_new_language_keeps_previous_data() {
        let source = Arc::new(MockSource::default());
        source.respond("All", Ok(30));
        source.respond("Ruby", Ok(12));
        let (mut ctl, mut rx) = controller(source.clone(), "All");

        ctl.start();
        pump(&mut ctl, &mut rx).await;

        ctl.select("Ruby".into());
        assert!(ctl.is_loading());
        pump(&mut ctl, &mut rx).await;

        assert!(!ctl.is_loading());
        assert_eq!(ctl.current_repos().len(), 12);
        assert_eq!(ctl.state().repos(&"All".into()).unwrap().len(), 30);
        assert_eq!(ctl.state().error(), None);
    }

    #[tokio::test]
    async fn each_key_is_requested_once() {
        let source = Arc::new(MockSource::default());
        let (mut ctl, mut rx) = controller(source.clone(), "All");

        ctl.start();
        for key in ["Ruby", "All", "Ruby", "Java", "All", "Java", "Ruby"] {
            ctl.select(key.into());
        }
        for _ in 0..3 {
            pump(&mut ctl, &mut rx).await;
        }

        let mut calls = source.calls();
        calls.sort();
        assert_eq!(
            calls,
            vec![
                CategoryKey::from("All"),
                CategoryKey::from("Java"),
                CategoryKey::from("Ruby"),
            ]
        );
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn failure_is_permanent_for_that_key() {
        let source = Arc::new(MockSource::default());
        source.respond("All", Ok(30));
        source.respond("PHP", Err("Network error".to_string()));
        let (mut ctl, mut rx) = controller(source.clone(), "All");

        ctl.start();
        pump(&mut ctl, &mut rx).await;
        ctl.select("PHP".into());
        pump(&mut ctl, &mut rx).await;

        assert_eq!(ctl.state().error(), Some("Network error"));
        assert!(ctl.state().repos(&"PHP".into()).is_none());
        assert_eq!(ctl.panel(), Panel::Failed("Network error"));

        ctl.select("All".into());
        ctl.select("PHP".into());
        assert!(!ctl.is_loading());
        assert_eq!(source.calls().len(), 2);
        assert_eq!(ctl.state().repos(&"All".into()).unwrap().len(), 30);
    }

    #[tokio::test]
    async fn error_surfaces_next_to_other_languages_grid() {
        let source = Arc::new(MockSource::default());
        source.respond("All", Ok(3));
        source.respond("PHP", Err("Network error".to_string()));
        let (mut ctl, mut rx) = controller(source, "All");

        ctl.start();
        pump(&mut ctl, &mut rx).await;
        ctl.select("PHP".into());
        pump(&mut ctl, &mut rx).await;
        ctl.select("All".into());

        match ctl.panel() {
            Panel::Grid { repos, error } => {
                assert_eq!(repos.len(), 3);
                assert_eq!(error, Some("Network error"));
            }
            other => panic!("expected grid, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unknown_language_is_accepted() {
        let source = Arc::new(MockSource::default());
        let (mut ctl, mut rx) = controller(source.clone(), "All");

        ctl.select("Brainfudge".into());
        assert_eq!(ctl.current(), &CategoryKey::from("Brainfudge"));
        pump(&mut ctl, &mut rx).await;

        assert!(ctl.current_repos().is_empty());
        assert!(!ctl.is_loading());
    }

    #[tokio::test]
    async fn disposed_controller_drops_late_results() {
        let gate = Arc::new(Notify::new());
        let source = Arc::new(MockSource::default().gate("All", gate.clone()));
        let (mut ctl, mut rx) = controller(source.clone(), "All");

        ctl.start();
        // Let the spawned task reach the gate.
        tokio::task::yield_now().await;
        ctl.dispose();
        gate.notify_one();

        let received = timeout(Duration::from_millis(200), rx.recv()).await;
        assert!(!matches!(received, Ok(Some(_))));
        assert_eq!(source.calls().len(), 1);

        ctl.select("Ruby".into());
        assert_eq!(source.calls().len(), 1);
    }

    #[tokio::test]
    async fn results_apply_in_completion_order() {
        let all_gate = Arc::new(Notify::new());
        let source = Arc::new(MockSource::default().gate("All", all_gate.clone()));
        source.respond("All", Ok(2));
        source.respond("Ruby", Ok(4));
        let (mut ctl, mut rx) = controller(source.clone(), "All");

        ctl.start();
        ctl.select("Ruby".into());

        let first = next_view_action(&mut rx).await;
        assert!(matches!(
            &first,
            ViewAction::Success { key, .. } if key.as_str() == "Ruby"
        ));
        assert_eq!(
            source.calls(),
            vec![CategoryKey::from("All"), CategoryKey::from("Ruby")]
        );
        ctl.apply(first);
        assert!(ctl.state().repos(&"All".into()).is_none());

        all_gate.notify_one();
        pump(&mut ctl, &mut rx).await;

        assert_eq!(ctl.state().repos(&"All".into()).unwrap().len(), 2);
        assert_eq!(ctl.state().repos(&"Ruby".into()).unwrap().len(), 4);
        assert_eq!(ctl.current_repos().len(), 4);
    }

    #[tokio::test]
    async fn fetch_failure_logs_nothing_above_debug() {
        let warnings = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(WarnCounter(warnings.clone()));
        let _guard = tracing::subscriber::set_default(subscriber);

        let source = Arc::new(MockSource::default());
        source.respond("PHP", Err("Network error".to_string()));
        let (mut ctl, mut rx) = controller(source, "PHP");

        ctl.start();
        pump(&mut ctl, &mut rx).await;

        assert_eq!(ctl.state().error(), Some("Network error"));
        assert_eq!(warnings.load(Ordering::SeqCst), 0);
    }

    /// Counts events at WARN or ERROR.
    struct WarnCounter(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> Layer<S> for WarnCounter {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() <= Level::WARN {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }
}
