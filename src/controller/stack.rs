//! Card-stack state machine
//!
//! Owns the deck cursor and the gesture/animation state. A released gesture
//! is classified once; non-Cancel outcomes enter `Transitioning` and the
//! matching side effects are committed exactly once, in order, when the exit
//! animation completes. Gestures arriving while a transition is in flight
//! are ignored until the stack returns to `Idle`.

use std::time::Instant;

use chrono::Utc;

use crate::model::{Deck, DeckView, GestureSampler, Outcome, StackPhase, Viewport};

use super::animator::{Animator, Completion};
use super::classify::{classify, Thresholds};
use super::AppController;

/// State owned exclusively by the stack controller.
pub(crate) struct StackState {
    pub deck: Deck,
    pub phase: StackPhase,
    pub sampler: GestureSampler,
    pub animator: Animator,
    pub viewport: Viewport,
}

impl StackState {
    pub fn new() -> Self {
        Self {
            deck: Deck::default(),
            phase: StackPhase::Empty,
            sampler: GestureSampler::new(),
            animator: Animator::new(),
            viewport: Viewport::default(),
        }
    }
}

impl AppController {
    // ========================================================================
    // Pointer stream
    // ========================================================================

    /// Begin a gesture at `(x, y)` in device-independent units.
    pub async fn pointer_down(&self, x: f32, y: f32, now: Instant) {
        let mut stack = self.stack.lock().await;
        match stack.phase {
            StackPhase::Idle => {}
            StackPhase::Transitioning { .. } => {
                // Fatal to the gesture, not to the app.
                tracing::debug!("Gesture ignored: transition in flight");
                return;
            }
            StackPhase::Empty => return,
        }
        if !stack.animator.begin_gesture() {
            tracing::debug!("Gesture ignored: prior completion unresolved");
            return;
        }
        stack.sampler.begin(x, y, now);
    }

    pub async fn pointer_move(&self, x: f32, y: f32, now: Instant) {
        let mut stack = self.stack.lock().await;
        if let Some(sample) = stack.sampler.update(x, y, now) {
            let viewport = stack.viewport;
            stack.animator.apply_drag(&sample, &viewport);
        }
    }

    /// Terminate the gesture: classify the final sample and act on it.
    pub async fn pointer_up(&self, now: Instant) {
        let mut stack = self.stack.lock().await;
        if !stack.sampler.is_active() {
            return;
        }
        let sample = stack.sampler.finish();
        let thresholds = Thresholds::for_viewport(&stack.viewport);
        let outcome = classify(&sample, &thresholds);
        tracing::debug!(?sample, ?outcome, "Gesture released");
        self.resolve_outcome(&mut stack, outcome, now);
    }

    /// Keyboard fallback: route an outcome through the same transition and
    /// commit path a gesture would take.
    pub async fn trigger_outcome(&self, outcome: Outcome, now: Instant) {
        let mut stack = self.stack.lock().await;
        if stack.phase != StackPhase::Idle || stack.sampler.is_active() {
            return;
        }
        self.resolve_outcome(&mut stack, outcome, now);
    }

    /// Act on a classified outcome. Caller holds the stack lock and has
    /// verified the phase is `Idle`.
    fn resolve_outcome(&self, stack: &mut StackState, outcome: Outcome, now: Instant) {
        match outcome {
            Outcome::Cancel => {
                stack.animator.start_settle(now);
            }
            Outcome::Retreat if stack.deck.cursor() == 0 => {
                // Boundary guard: visually reject, no cursor change, no
                // side effect.
                tracing::debug!("Retreat at first card, bouncing");
                stack.animator.start_bounce(now);
            }
            outcome => {
                let viewport = stack.viewport;
                if let Some(run) = stack.animator.start_exit(outcome, &viewport, now) {
                    stack.phase = StackPhase::Transitioning {
                        run,
                        outcome,
                        index: stack.deck.cursor(),
                    };
                    tracing::debug!(run, ?outcome, cursor = stack.deck.cursor(), "Transition started");
                }
            }
        }
    }

    // ========================================================================
    // Frame tick
    // ========================================================================

    /// Step the animation to `now` and commit a finished transition.
    pub async fn tick(&self, now: Instant) {
        let completion = {
            let mut stack = self.stack.lock().await;
            stack.animator.advance(now)
        };
        if let Some(completion) = completion {
            self.commit_transition(completion).await;
        }
    }

    /// Atomic post-animation commit: (a) like effects, (b) swipe counter,
    /// (c) cursor move, (d) last-used refresh. Fires once per resolved
    /// gesture; stale or duplicate completions are discarded.
    async fn commit_transition(&self, completion: Completion) {
        let mut stack = self.stack.lock().await;
        let StackPhase::Transitioning { run, outcome, index } = stack.phase else {
            tracing::debug!(run = completion.run, "Completion outside Transitioning, ignored");
            return;
        };
        if completion.run != run {
            tracing::debug!(got = completion.run, want = run, "Stale completion, ignored");
            return;
        }

        let item_id = stack.deck.get(index).map(|r| r.id.clone());
        let model = self.model.lock().await;
        let store = model.get_store();

        // (a) Like: toggle the like set, then ensure the item counts as
        // discovered.
        if outcome == Outcome::Like {
            if let Some(id) = &item_id {
                let now_liked = model.toggle_liked(id).await;
                model.mark_discovered(id).await;
                tracing::info!(id = %id, now_liked, "Like toggled");
                if let Some(store) = &store {
                    if let Err(e) = store.toggle_like(id).await {
                        tracing::warn!(id = %id, error = %e, "Like write failed");
                        model.set_notice(format!("Could not save like: {e}")).await;
                    }
                    if let Err(e) = store.mark_discovered(id).await {
                        tracing::warn!(id = %id, error = %e, "Discovered write failed");
                        model.set_notice(format!("Could not save discovery: {e}")).await;
                    }
                }
            }
        }

        // (b) Swipe counter.
        let total = model.count_swipe().await;
        if let Some(store) = &store {
            if let Err(e) = store.record_swipe().await {
                tracing::warn!(error = %e, "Swipe count write failed");
                model.set_notice(format!("Could not save stats: {e}")).await;
            }
        }

        // (c) Cursor move.
        match outcome {
            Outcome::Like | Outcome::Advance => stack.deck.advance(),
            Outcome::Retreat => {
                stack.deck.retreat();
            }
            Outcome::Cancel => {}
        }

        // (d) Last-used refresh.
        model.touch_last_used(Utc::now()).await;
        if let Some(store) = &store {
            if let Err(e) = store.touch_last_used().await {
                tracing::warn!(error = %e, "Last-used write failed");
            }
        }

        stack.animator.reset();
        stack.phase = if stack.deck.is_empty() {
            StackPhase::Empty
        } else {
            StackPhase::Idle
        };
        tracing::info!(
            ?outcome,
            cursor = stack.deck.cursor(),
            total_swipes = total,
            "Transition committed"
        );
    }

    // ========================================================================
    // Deck lifecycle
    // ========================================================================

    /// Fetch a fresh deck snapshot. Failure leaves the stack in its empty
    /// display state with the reload affordance intact.
    pub async fn reload_deck(&self) {
        {
            let model = self.model.lock().await;
            model.set_loading(true).await;
        }

        match self.provider.fetch_deck().await {
            Ok(items) => {
                let mut stack = self.stack.lock().await;
                stack.deck = Deck::new(items);
                stack.sampler = GestureSampler::new();
                stack.animator.reset();
                stack.phase = if stack.deck.is_empty() {
                    StackPhase::Empty
                } else {
                    StackPhase::Idle
                };
                tracing::info!(len = stack.deck.len(), "Deck loaded");
                drop(stack);
                let model = self.model.lock().await;
                model.set_loading(false).await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Deck fetch failed");
                let mut stack = self.stack.lock().await;
                stack.deck = Deck::default();
                stack.animator.reset();
                stack.phase = StackPhase::Empty;
                drop(stack);
                let model = self.model.lock().await;
                model.set_loading(false).await;
                model.set_notice(Self::format_error(&e)).await;
            }
        }
    }

    /// Record the interaction area in device-independent units.
    pub async fn set_viewport(&self, viewport: Viewport) {
        self.stack.lock().await.viewport = viewport;
    }

    /// Assemble the per-frame snapshot the view renders from.
    pub async fn deck_view(&self) -> DeckView {
        let (active, next, position, card, preview, empty) = {
            let stack = self.stack.lock().await;
            (
                stack.deck.active().cloned(),
                stack.deck.upcoming().cloned(),
                if stack.deck.is_empty() {
                    (0, 0)
                } else {
                    (stack.deck.cursor() + 1, stack.deck.len())
                },
                stack.animator.card(),
                stack.animator.preview(),
                stack.deck.is_empty(),
            )
        };

        let model = self.model.lock().await;
        let library = model.library_snapshot().await;
        let active_liked = active
            .as_ref()
            .map(|r| library.liked.contains(&r.id))
            .unwrap_or(false);

        DeckView {
            active,
            next,
            position,
            card,
            preview,
            active_liked,
            liked_count: library.liked.len(),
            discovered_count: library.discovered.len(),
            total_swipes: library.stats.total_swipes,
            empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;

    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use tokio::sync::Mutex;

    use crate::model::{AppModel, LibrarySnapshot, LibraryStore, Release, ReleaseProvider};

    fn release(id: &str) -> Release {
        Release {
            id: id.to_string(),
            title: format!("Release {id}"),
            artists: vec!["Artist".to_string()],
            release_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            cover_url: String::new(),
            link_url: String::new(),
            video_url: None,
        }
    }

    struct StubProvider {
        items: Vec<Release>,
        fail: bool,
    }

    #[async_trait]
    impl ReleaseProvider for StubProvider {
        async fn fetch_deck(&self) -> Result<Vec<Release>> {
            if self.fail {
                Err(anyhow!("provider offline"))
            } else {
                Ok(self.items.clone())
            }
        }
    }

    #[derive(Default)]
    struct StubStore {
        liked: StdMutex<HashSet<String>>,
        discovered: StdMutex<HashSet<String>>,
        swipes: StdMutex<u64>,
        touches: StdMutex<u64>,
        fail_writes: bool,
    }

    #[async_trait]
    impl LibraryStore for StubStore {
        async fn load(&self) -> Result<LibrarySnapshot> {
            Ok(LibrarySnapshot::default())
        }

        async fn toggle_like(&self, id: &str) -> Result<bool> {
            if self.fail_writes {
                return Err(anyhow!("disk full"));
            }
            let mut liked = self.liked.lock().unwrap();
            if liked.remove(id) {
                Ok(false)
            } else {
                liked.insert(id.to_string());
                Ok(true)
            }
        }

        async fn mark_discovered(&self, id: &str) -> Result<()> {
            if self.fail_writes {
                return Err(anyhow!("disk full"));
            }
            self.discovered.lock().unwrap().insert(id.to_string());
            Ok(())
        }

        async fn record_swipe(&self) -> Result<()> {
            if self.fail_writes {
                return Err(anyhow!("disk full"));
            }
            *self.swipes.lock().unwrap() += 1;
            Ok(())
        }

        async fn touch_last_used(&self) -> Result<()> {
            *self.touches.lock().unwrap() += 1;
            Ok(())
        }
    }

    async fn setup(ids: &[&str]) -> (AppController, Arc<StubStore>) {
        setup_with(ids, false).await
    }

    async fn setup_with(ids: &[&str], fail_writes: bool) -> (AppController, Arc<StubStore>) {
        let store = Arc::new(StubStore { fail_writes, ..StubStore::default() });
        let mut model = AppModel::new();
        model.set_store(store.clone());
        let provider = Arc::new(StubProvider {
            items: ids.iter().map(|id| release(id)).collect(),
            fail: false,
        });
        let controller = AppController::new(Arc::new(Mutex::new(model)), provider);
        controller.reload_deck().await;
        (controller, store)
    }

    /// Run an outcome through the transition path and settle its animation.
    async fn swipe(controller: &AppController, outcome: Outcome, t0: Instant) {
        controller.trigger_outcome(outcome, t0).await;
        controller.tick(t0 + Duration::from_millis(350)).await;
    }

    #[tokio::test]
    async fn like_then_advance_end_to_end() {
        let (controller, store) = setup(&["a", "b", "c"]).await;
        let t0 = Instant::now();

        swipe(&controller, Outcome::Like, t0).await;
        let view = controller.deck_view().await;
        assert_eq!(view.position, (2, 3));
        assert_eq!(view.liked_count, 1);
        assert!(view.discovered_count >= 1);
        assert_eq!(view.total_swipes, 1);
        assert!(store.liked.lock().unwrap().contains("a"));
        assert!(store.discovered.lock().unwrap().contains("a"));

        swipe(&controller, Outcome::Advance, t0 + Duration::from_secs(1)).await;
        let view = controller.deck_view().await;
        assert_eq!(view.position, (3, 3));
        assert_eq!(view.total_swipes, 2);
        assert_eq!(view.liked_count, 1);
        assert_eq!(*store.swipes.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn double_like_restores_like_state() {
        let (controller, store) = setup(&["a", "b"]).await;
        let t0 = Instant::now();

        swipe(&controller, Outcome::Like, t0).await;
        // Back to "a", like it again.
        swipe(&controller, Outcome::Retreat, t0 + Duration::from_secs(1)).await;
        swipe(&controller, Outcome::Like, t0 + Duration::from_secs(2)).await;

        assert!(!store.liked.lock().unwrap().contains("a"));
        let view = controller.deck_view().await;
        assert_eq!(view.liked_count, 0);
        // Discovery is append-only even when the like is undone.
        assert!(store.discovered.lock().unwrap().contains("a"));
        assert_eq!(view.total_swipes, 3);
    }

    #[tokio::test]
    async fn retreat_at_first_card_is_a_no_op_bounce() {
        let (controller, store) = setup(&["a", "b"]).await;
        let t0 = Instant::now();

        controller.trigger_outcome(Outcome::Retreat, t0).await;
        // Let the bounce and spring play out.
        let mut now = t0;
        for _ in 0..300 {
            now += Duration::from_millis(16);
            controller.tick(now).await;
        }

        let view = controller.deck_view().await;
        assert_eq!(view.position, (1, 2));
        assert_eq!(view.total_swipes, 0);
        assert_eq!(*store.swipes.lock().unwrap(), 0);
        assert!(store.discovered.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn cancel_commits_nothing() {
        let (controller, store) = setup(&["a", "b"]).await;
        let t0 = Instant::now();

        // Sub-threshold drag: 40 of the 160-unit swipe threshold.
        controller.set_viewport(Viewport { width: 640.0, height: 480.0 }).await;
        controller.pointer_down(100.0, 100.0, t0).await;
        controller.pointer_move(140.0, 110.0, t0 + Duration::from_millis(50)).await;
        controller.pointer_up(t0 + Duration::from_millis(100)).await;

        let mut now = t0;
        for _ in 0..300 {
            now += Duration::from_millis(16);
            controller.tick(now).await;
        }

        let view = controller.deck_view().await;
        assert_eq!(view.position, (1, 2));
        assert_eq!(view.total_swipes, 0);
        assert_eq!(*store.swipes.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn gesture_swipe_commits_only_after_animation() {
        let (controller, store) = setup(&["a", "b", "c"]).await;
        let t0 = Instant::now();
        controller.set_viewport(Viewport { width: 640.0, height: 480.0 }).await;

        // Slow drag well past the 160-unit threshold.
        controller.pointer_down(100.0, 100.0, t0).await;
        controller.pointer_move(200.0, 100.0, t0 + Duration::from_millis(200)).await;
        controller.pointer_move(300.0, 100.0, t0 + Duration::from_millis(400)).await;
        controller.pointer_up(t0 + Duration::from_millis(400)).await;

        // Mid-animation: nothing committed yet.
        controller.tick(t0 + Duration::from_millis(500)).await;
        assert_eq!(controller.deck_view().await.position, (1, 3));
        assert_eq!(*store.swipes.lock().unwrap(), 0);

        // Animation done: committed exactly once.
        controller.tick(t0 + Duration::from_millis(701)).await;
        assert_eq!(controller.deck_view().await.position, (2, 3));
        assert_eq!(*store.swipes.lock().unwrap(), 1);

        // Extra ticks never double-commit.
        controller.tick(t0 + Duration::from_millis(800)).await;
        assert_eq!(controller.deck_view().await.position, (2, 3));
        assert_eq!(*store.swipes.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn gesture_during_transition_is_ignored() {
        let (controller, _store) = setup(&["a", "b", "c"]).await;
        let t0 = Instant::now();

        controller.trigger_outcome(Outcome::Advance, t0).await;
        // Attempt a new gesture while the exit is in flight.
        controller.pointer_down(100.0, 100.0, t0 + Duration::from_millis(100)).await;
        controller.pointer_move(400.0, 100.0, t0 + Duration::from_millis(150)).await;
        controller.pointer_up(t0 + Duration::from_millis(200)).await;

        controller.tick(t0 + Duration::from_millis(350)).await;
        // Only the original Advance committed.
        let view = controller.deck_view().await;
        assert_eq!(view.position, (2, 3));
        assert_eq!(view.total_swipes, 1);
    }

    #[tokio::test]
    async fn cursor_stays_in_bounds_over_many_swipes() {
        let (controller, _store) = setup(&["a", "b", "c"]).await;
        let mut now = Instant::now();
        for step in 0..40 {
            let outcome = match step % 4 {
                0 => Outcome::Advance,
                1 => Outcome::Like,
                2 => Outcome::Retreat,
                _ => Outcome::Advance,
            };
            swipe(&controller, outcome, now).await;
            now += Duration::from_secs(1);
            let view = controller.deck_view().await;
            let (pos, len) = view.position;
            assert!(pos >= 1 && pos <= len, "position {pos} out of 1..={len}");
        }
    }

    #[tokio::test]
    async fn advance_past_last_card_wraps_to_first() {
        let (controller, _store) = setup(&["a", "b"]).await;
        let mut now = Instant::now();
        for _ in 0..2 {
            swipe(&controller, Outcome::Advance, now).await;
            now += Duration::from_secs(1);
        }
        assert_eq!(controller.deck_view().await.position, (1, 2));
    }

    #[tokio::test]
    async fn write_failure_keeps_cursor_and_memory_state() {
        let (controller, store) = setup_with(&["a", "b"], true).await;
        let t0 = Instant::now();

        swipe(&controller, Outcome::Like, t0).await;

        // Store rejected everything, but the in-memory state moved on.
        assert!(store.liked.lock().unwrap().is_empty());
        let view = controller.deck_view().await;
        assert_eq!(view.position, (2, 2));
        assert_eq!(view.liked_count, 1);
        assert_eq!(view.total_swipes, 1);

        let model = controller.model.lock().await;
        let ui = model.get_ui_state().await;
        assert!(ui.notice.is_some());
    }

    #[tokio::test]
    async fn failed_fetch_leaves_empty_state_with_notice() {
        let store = Arc::new(StubStore::default());
        let mut model = AppModel::new();
        model.set_store(store);
        let provider = Arc::new(StubProvider { items: vec![], fail: true });
        let controller = AppController::new(Arc::new(Mutex::new(model)), provider);

        controller.reload_deck().await;
        let view = controller.deck_view().await;
        assert!(view.empty);
        assert_eq!(view.position, (0, 0));

        let model = controller.model.lock().await;
        assert!(model.get_ui_state().await.notice.is_some());
    }

    #[tokio::test]
    async fn empty_then_nonempty_deck_resets_to_first_card() {
        let store = Arc::new(StubStore::default());
        let mut model = AppModel::new();
        model.set_store(store);
        let provider = Arc::new(StubProvider { items: vec![], fail: false });
        let controller = AppController::new(Arc::new(Mutex::new(model)), provider);

        controller.reload_deck().await;
        assert!(controller.deck_view().await.empty);
        // Gestures in the empty state do nothing.
        controller.trigger_outcome(Outcome::Advance, Instant::now()).await;

        let controller = AppController {
            provider: Arc::new(StubProvider { items: vec![release("a")], fail: false }),
            ..controller
        };
        controller.reload_deck().await;
        let view = controller.deck_view().await;
        assert!(!view.empty);
        assert_eq!(view.position, (1, 1));
    }
}
