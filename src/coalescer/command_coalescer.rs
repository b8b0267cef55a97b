// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The debounce buffer between characteristic writes and light commands.

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use serde_json::{Map, Value};
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};

use super::{CoalescerConfig, DownstreamAction};
use crate::command::{Command, DerivedCommand, LightCommand, ServiceCall};
use crate::error::{Error, Result};
use crate::event::{CoalescerEvent, EventBus};
use crate::field::{Field, FieldId, PendingBatch};
use crate::state::{CharacteristicState, CharacteristicUpdate, LightState};

/// Whether a batch is waiting for its debounce window to elapse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// No pending writes and no timer.
    Idle,
    /// Writes are pending and a flush is scheduled.
    Pending,
}

/// Collects characteristic writes and emits one merged [`LightCommand`] per
/// quiet period.
///
/// Every accepted write restarts the debounce window. When the window
/// elapses without further writes the batch is flushed: conflicting writes
/// have already been evicted, a pending power-off wins over everything else,
/// and the [`DownstreamAction`] is invoked once with the merged command.
///
/// Dropping the coalescer cancels the timer. The pending batch is then
/// flushed or discarded depending on
/// [`CoalescerConfig::flush_on_teardown`].
///
/// # Examples
///
/// ```
/// use accessory_coalescer::coalescer::{CoalescerConfig, CommandCoalescer};
/// use accessory_coalescer::command::LightCommand;
/// use accessory_coalescer::error::ActionError;
/// use accessory_coalescer::field::Field;
/// use accessory_coalescer::types::{Brightness, Hue, Saturation};
///
/// #[tokio::main]
/// async fn main() -> accessory_coalescer::Result<()> {
///     let action = |command: LightCommand, description: Option<String>| async move {
///         println!("{command}: {}", description.unwrap_or_default());
///         Ok::<(), ActionError>(())
///     };
///
///     let coalescer = CommandCoalescer::new(CoalescerConfig::light(), action)?;
///     let mut events = coalescer.subscribe();
///
///     coalescer.submit([Field::Brightness(Brightness::new(80)?)]);
///     coalescer.submit([
///         Field::Hue(Hue::new(120)?),
///         Field::Saturation(Saturation::new(50)?),
///     ]);
///
///     // One flush for both writes
///     let event = events.recv().await.unwrap();
///     println!("{event}");
///     Ok(())
/// }
/// ```
pub struct CommandCoalescer<A: DownstreamAction> {
    shared: Arc<Shared<A>>,
}

struct Shared<A> {
    config: CoalescerConfig,
    action: A,
    events: EventBus,
    runtime: Handle,
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    batch: PendingBatch,
    timer: Option<JoinHandle<()>>,
    // Bumped whenever the timer is replaced or cancelled
    generation: u64,
    characteristics: CharacteristicState,
}

impl<A: DownstreamAction> CommandCoalescer<A> {
    /// Creates a coalescer on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if `config` fails validation and
    /// `Error::NoRuntime` if called outside a tokio runtime.
    pub fn new(config: CoalescerConfig, action: A) -> Result<Self> {
        config.validate()?;
        let runtime = Handle::try_current().map_err(|_| Error::NoRuntime)?;

        tracing::debug!(
            window = ?config.window,
            fields = %config.fields,
            "Created command coalescer"
        );

        Ok(Self {
            shared: Arc::new(Shared {
                events: EventBus::with_capacity(config.event_capacity),
                config,
                action,
                runtime,
                inner: Mutex::new(Inner::default()),
            }),
        })
    }

    /// Buffers field writes and restarts the debounce window.
    ///
    /// Writes to fields this light does not declare are ignored. A write
    /// evicts pending writes from conflicting groups, then replaces any
    /// pending write to the same field. A call that accepts nothing leaves
    /// the timer untouched.
    pub fn submit(&self, fields: impl IntoIterator<Item = Field>) {
        let shared = &self.shared;
        let mut inner = shared.inner.lock();
        let mut accepted = false;

        for field in fields {
            if !shared.config.fields.contains(field.id()) {
                tracing::debug!(%field, "Ignoring write to undeclared field");
                continue;
            }
            let evicted = inner.batch.merge(field, &shared.config.conflicts);
            if !evicted.is_empty() {
                tracing::debug!(%field, %evicted, "Evicted conflicting writes");
            }
            accepted = true;
        }

        if !accepted {
            return;
        }

        tracing::debug!(pending = %inner.batch.ids(), "Buffered writes");
        self.restart_timer(&mut inner);
    }

    /// Buffers writes given as a JSON object keyed by field name.
    ///
    /// Keys may be characteristic names (`"On"`, `"Hue"`) or field
    /// identifiers (`"power"`, `"color-temperature"`). Unknown keys and
    /// invalid values are ignored.
    ///
    /// ```
    /// use accessory_coalescer::coalescer::{CoalescerConfig, CommandCoalescer};
    /// use accessory_coalescer::command::LightCommand;
    /// use accessory_coalescer::error::ActionError;
    /// use accessory_coalescer::field::FieldId;
    /// use serde_json::json;
    ///
    /// # #[tokio::main]
    /// # async fn main() -> accessory_coalescer::Result<()> {
    /// let action = |_: LightCommand, _: Option<String>| async { Ok::<(), ActionError>(()) };
    /// let coalescer = CommandCoalescer::new(CoalescerConfig::light(), action)?;
    ///
    /// let json = json!({"Brightness": 40, "Hue": 500, "Sparkle": true});
    /// coalescer.submit_json(json.as_object().unwrap());
    ///
    /// // The out-of-range hue and the unknown key were dropped.
    /// assert_eq!(coalescer.pending().ids().len(), 1);
    /// assert!(coalescer.pending().contains(FieldId::Brightness));
    /// # Ok(())
    /// # }
    /// ```
    pub fn submit_json(&self, values: &Map<String, Value>) {
        let fields: Vec<Field> = values
            .iter()
            .filter_map(|(key, value)| {
                let parsed = key
                    .parse::<FieldId>()
                    .map_err(Error::from)
                    .and_then(|id| Field::from_json(id, value));
                match parsed {
                    Ok(field) => Some(field),
                    Err(e) => {
                        tracing::debug!(key = %key, %value, error = %e, "Ignoring invalid write");
                        None
                    }
                }
            })
            .collect();
        self.submit(fields);
    }

    /// Flushes the pending batch immediately, without waiting for the
    /// window to elapse.
    ///
    /// The downstream action is spawned, not awaited. Returns `true` if a
    /// command was dispatched.
    pub fn flush_now(&self) -> bool {
        let derived = {
            let mut inner = self.shared.inner.lock();
            Self::cancel_timer(&mut inner);
            self.shared.take_command(&mut inner)
        };

        match derived {
            Some(derived) => {
                self.spawn_dispatch(derived);
                true
            }
            None => false,
        }
    }

    /// Applies a platform state snapshot to the known characteristic
    /// values and returns what the accessory should publish.
    ///
    /// The known values fill in missing halves of a color at flush time.
    pub fn sync_state(&self, state: &LightState) -> CharacteristicUpdate {
        self.shared.inner.lock().characteristics.apply(state)
    }

    /// Returns a copy of the known characteristic values.
    #[must_use]
    pub fn characteristics(&self) -> CharacteristicState {
        self.shared.inner.lock().characteristics.clone()
    }

    /// Returns the current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        if self.shared.inner.lock().batch.is_empty() {
            Phase::Idle
        } else {
            Phase::Pending
        }
    }

    /// Returns a copy of the pending batch.
    #[must_use]
    pub fn pending(&self) -> PendingBatch {
        self.shared.inner.lock().batch.clone()
    }

    /// Subscribes to flush outcome events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CoalescerEvent> {
        self.shared.events.subscribe()
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &CoalescerConfig {
        &self.shared.config
    }

    /// Builds the platform service call for `command`, targeting the
    /// configured entity.
    #[must_use]
    pub fn service_call(&self, command: &LightCommand) -> ServiceCall {
        command.to_service_call(self.shared.config.entity_id.as_deref())
    }

    /// Tears the coalescer down.
    ///
    /// Equivalent to dropping it: the timer is cancelled and the pending
    /// batch is flushed or discarded per configuration.
    pub fn shutdown(self) {
        drop(self);
    }

    fn restart_timer(&self, inner: &mut Inner) {
        Self::cancel_timer(inner);

        let generation = inner.generation;
        let deadline = Instant::now() + self.shared.config.window;
        let shared = Arc::downgrade(&self.shared);

        inner.timer = Some(self.shared.runtime.spawn(Shared::run_timer(
            shared, generation, deadline,
        )));
        tracing::trace!(generation, "Armed debounce timer");
    }

    fn cancel_timer(inner: &mut Inner) {
        inner.generation = inner.generation.wrapping_add(1);
        if let Some(timer) = inner.timer.take() {
            timer.abort();
            tracing::trace!(generation = inner.generation, "Cancelled debounce timer");
        }
    }

    fn spawn_dispatch(&self, derived: DerivedCommand) {
        let shared = Arc::clone(&self.shared);
        self.shared.runtime.spawn(async move {
            shared.dispatch(derived).await;
        });
    }
}

impl<A: DownstreamAction> Shared<A> {
    async fn run_timer(shared: Weak<Self>, generation: u64, deadline: Instant) {
        sleep_until(deadline).await;

        let Some(shared) = shared.upgrade() else {
            return;
        };
        if let Some(derived) = shared.take_expired(generation) {
            shared.dispatch(derived).await;
        }
    }

    /// Takes the batch if the timer for `generation` is still current.
    fn take_expired(&self, generation: u64) -> Option<DerivedCommand> {
        let mut inner = self.inner.lock();
        if inner.generation != generation {
            tracing::trace!(generation, "Stale debounce timer");
            return None;
        }
        inner.timer = None;
        self.take_command(&mut inner)
    }

    fn take_command(&self, inner: &mut Inner) -> Option<DerivedCommand> {
        let batch = inner.batch.take();
        let derived = LightCommand::derive(
            &batch,
            &inner.characteristics,
            self.config.off_triggers,
            self.config.white_mode,
        );
        inner.characteristics.record(&batch);
        derived
    }

    async fn dispatch(&self, derived: DerivedCommand) {
        let DerivedCommand {
            command,
            description,
        } = derived;

        let call = command.to_service_call(self.config.entity_id.as_deref());
        tracing::debug!(
            service = call.service,
            params = %call.params,
            %description,
            "Flushing batch"
        );
        self.events
            .publish(CoalescerEvent::flushed(command, description.clone()));

        if let Err(e) = self.action.apply(command, Some(description)).await {
            tracing::warn!(%command, error = %e, "Downstream action failed");
            self.events
                .publish(CoalescerEvent::action_failed(command, &e));
        }
    }
}

impl<A: DownstreamAction> Drop for CommandCoalescer<A> {
    fn drop(&mut self) {
        let derived = {
            let mut inner = self.shared.inner.lock();
            Self::cancel_timer(&mut inner);

            if inner.batch.is_empty() {
                return;
            }
            if !self.shared.config.flush_on_teardown {
                let fields = inner.batch.take().ids();
                tracing::warn!(%fields, "Discarding pending writes at teardown");
                self.shared.events.publish(CoalescerEvent::Discarded { fields });
                return;
            }
            self.shared.take_command(&mut inner)
        };

        if let Some(derived) = derived {
            tracing::debug!("Flushing pending writes at teardown");
            self.spawn_dispatch(derived);
        }
    }
}

impl<A: DownstreamAction> fmt::Debug for CommandCoalescer<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandCoalescer")
            .field("config", &self.shared.config)
            .field("pending", &self.pending())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::sync::mpsc;

    use super::*;
    use crate::error::ActionError;
    use crate::types::{Brightness, Hue};

    fn recording() -> (
        impl DownstreamAction,
        mpsc::UnboundedReceiver<(LightCommand, Option<String>)>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let action = move |command: LightCommand, description: Option<String>| {
            let _ = tx.send((command, description));
            async { Ok::<(), ActionError>(()) }
        };
        (action, rx)
    }

    #[test]
    fn new_requires_runtime() {
        let action = |_: LightCommand, _: Option<String>| async { Ok::<(), ActionError>(()) };
        let result = CommandCoalescer::new(CoalescerConfig::light(), action);
        assert!(matches!(result, Err(Error::NoRuntime)));
    }

    #[tokio::test]
    async fn new_validates_config() {
        let (action, _rx) = recording();
        let config = CoalescerConfig::light().with_window(Duration::ZERO);
        assert!(matches!(
            CommandCoalescer::new(config, action),
            Err(Error::Config(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn phase_follows_batch() {
        let (action, mut rx) = recording();
        let coalescer = CommandCoalescer::new(CoalescerConfig::light(), action).unwrap();
        assert_eq!(coalescer.phase(), Phase::Idle);

        coalescer.submit([Field::Power(true)]);
        assert_eq!(coalescer.phase(), Phase::Pending);

        let (command, _) = rx.recv().await.unwrap();
        assert!(!command.is_off());
        assert_eq!(coalescer.phase(), Phase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn ignored_submit_does_not_arm_timer() {
        let (action, _rx) = recording();
        let coalescer = CommandCoalescer::new(CoalescerConfig::dimmable(), action).unwrap();

        coalescer.submit([Field::Hue(Hue::new(10).unwrap())]);
        assert_eq!(coalescer.phase(), Phase::Idle);
        assert!(coalescer.shared.inner.lock().timer.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn flush_now_skips_window() {
        let (action, mut rx) = recording();
        let coalescer = CommandCoalescer::new(CoalescerConfig::light(), action).unwrap();

        coalescer.submit([Field::Brightness(Brightness::new(30).unwrap())]);
        assert!(coalescer.flush_now());
        assert!(!coalescer.flush_now());

        let (_, description) = rx.recv().await.unwrap();
        assert_eq!(description.as_deref(), Some("brightness at 30%"));

        // The cancelled timer never fires a second flush
        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn service_call_targets_entity() {
        let (action, _rx) = recording();
        let config = CoalescerConfig::light().with_entity_id("light.hallway");
        let coalescer = CommandCoalescer::new(config, action).unwrap();

        let call = coalescer.service_call(&LightCommand::TurnOff);
        assert_eq!(call.params, serde_json::json!({"entity_id": "light.hallway"}));
    }

    #[tokio::test]
    async fn sync_state_updates_fallbacks() {
        let (action, _rx) = recording();
        let coalescer = CommandCoalescer::new(CoalescerConfig::light(), action).unwrap();

        let update = coalescer.sync_state(
            &LightState::from_json(r#"{"state": "on", "attributes": {"hs_color": [90.0, 20.0]}}"#)
                .unwrap(),
        );
        assert_eq!(update.values.len(), 3);
        assert_eq!(coalescer.characteristics().hue().value(), 90);
    }
}
