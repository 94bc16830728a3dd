use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
    time::Duration,
};

use serde::Serialize;
use tokio::{
    runtime::Handle,
    sync::broadcast,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::corpus::{Coordinate, Corpus, SectionLayout};

use super::HighlightState;

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_error, log_info, log_warn};

pub const DEFAULT_ADVANCE_INTERVAL: Duration = Duration::from_secs(5);

const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum HighlightOrigin {
    /// The user picked this item.
    Selected,
    /// The timer moved on to this item.
    Advanced,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HighlightEvent {
    pub coordinate: Coordinate,
    pub origin: HighlightOrigin,
}

/// The one pending advance chain. Dropping the slot's contents without
/// calling `cancel` would leave the task running, so every path that clears
/// the slot goes through `cancel` or through the chain finishing itself.
struct AdvanceChain {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl AdvanceChain {
    fn cancel(self) {
        self.token.cancel();
        self.task.abort();
    }
}

struct SchedulerState {
    highlight: HighlightState,
    layout: SectionLayout,
    chain: Option<AdvanceChain>,
}

impl SchedulerState {
    fn cancel_chain(&mut self) -> bool {
        match self.chain.take() {
            Some(chain) => {
                chain.cancel();
                true
            }
            None => false,
        }
    }
}

struct Shared {
    state: Mutex<SchedulerState>,
    events: broadcast::Sender<HighlightEvent>,
    interval: Duration,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, SchedulerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, coordinate: Coordinate, origin: HighlightOrigin) {
        // No subscribers is fine; the state is still readable by polling.
        let _ = self.events.send(HighlightEvent { coordinate, origin });
    }

    /// Runs one timer step for the chain owning `token`. Returns `false` when
    /// the chain should end.
    fn advance_chain(&self, token: &CancellationToken) -> bool {
        let mut state = self.lock();

        // Checked under the lock: a retarget or stop that already ran has
        // cancelled this token, and its chain must not emit anything more.
        if token.is_cancelled() {
            return false;
        }

        let next = state.highlight.advance(&state.layout);
        state.highlight = next;

        match next {
            HighlightState::Highlighting { coordinate } => {
                log_debug!(
                    "highlight advanced to section {} item {}",
                    coordinate.section_index,
                    coordinate.item_index
                );
                self.emit(coordinate, HighlightOrigin::Advanced);
                true
            }
            HighlightState::Idle => {
                // This chain is the one in the slot; it ends on its own.
                state.chain = None;
                log_info!("highlight sequence reached the end");
                false
            }
        }
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        let state = self
            .state
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(chain) = state.chain.take() {
            chain.cancel();
        }
    }
}

/// Walks the highlight through the corpus one item per interval.
///
/// Cheap to clone; all clones drive the same state. At most one advance
/// chain exists at a time: `retarget` and `stop` cancel the current chain
/// before doing anything else, and dropping the last handle cancels it too.
#[derive(Clone)]
pub struct HighlightScheduler {
    shared: Arc<Shared>,
}

impl HighlightScheduler {
    pub fn new(layout: SectionLayout, interval: Duration) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(SchedulerState {
                    highlight: HighlightState::Idle,
                    layout,
                    chain: None,
                }),
                events,
                interval,
            }),
        }
    }

    pub fn for_corpus(corpus: &Corpus) -> Self {
        Self::new(SectionLayout::from(corpus), DEFAULT_ADVANCE_INTERVAL)
    }

    pub fn interval(&self) -> Duration {
        self.shared.interval
    }

    pub fn state(&self) -> HighlightState {
        self.shared.lock().highlight
    }

    pub fn current_coordinate(&self) -> Option<Coordinate> {
        self.state().coordinate()
    }

    /// Whether an advance is pending.
    pub fn is_running(&self) -> bool {
        self.shared.lock().chain.is_some()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<HighlightEvent> {
        self.shared.events.subscribe()
    }

    /// Starts a new sequence at `coordinate`, replacing any running one.
    ///
    /// The event for `coordinate` is sent before this returns. A coordinate
    /// outside the current layout leaves the scheduler idle. Must be called
    /// from within a Tokio runtime; outside one the item is highlighted but
    /// nothing is scheduled.
    pub fn retarget(&self, coordinate: Coordinate) {
        let mut state = self.shared.lock();
        state.cancel_chain();

        if !state.layout.contains(coordinate) {
            log_warn!(
                "ignoring highlight request outside corpus: section {} item {}",
                coordinate.section_index,
                coordinate.item_index
            );
            state.highlight = HighlightState::Idle;
            return;
        }

        state.highlight = HighlightState::Highlighting { coordinate };
        self.shared.emit(coordinate, HighlightOrigin::Selected);

        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(err) => {
                log_error!("cannot schedule highlight advance: {err}");
                return;
            }
        };

        let token = CancellationToken::new();
        let task = runtime.spawn(run_chain(
            Arc::downgrade(&self.shared),
            token.clone(),
            self.shared.interval,
        ));
        state.chain = Some(AdvanceChain { token, task });

        log_debug!(
            "highlight retargeted to section {} item {}",
            coordinate.section_index,
            coordinate.item_index
        );
    }

    /// Cancels any pending advance and clears the highlight. Idempotent.
    pub fn stop(&self) {
        let mut state = self.shared.lock();
        if state.cancel_chain() {
            log_debug!("highlight sequence stopped");
        }
        state.highlight = HighlightState::Idle;
    }

    /// Installs the coordinate space of a new corpus. Any running sequence
    /// belongs to the old corpus and is stopped first.
    pub fn replace_layout(&self, layout: SectionLayout) {
        let mut state = self.shared.lock();
        state.cancel_chain();
        state.highlight = HighlightState::Idle;
        state.layout = layout;
    }

    pub fn replace_corpus(&self, corpus: &Corpus) {
        self.replace_layout(SectionLayout::from(corpus));
    }
}

/// Timer driver for one chain. Holds only a weak reference so a dropped
/// scheduler is not kept alive by its own timer.
async fn run_chain(shared: Weak<Shared>, token: CancellationToken, period: Duration) {
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let Some(shared) = shared.upgrade() else {
            break;
        };
        if !shared.advance_chain(&token) {
            break;
        }
    }
}
