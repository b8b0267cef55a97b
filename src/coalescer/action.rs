// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The downstream side of the coalescer.

use std::future::Future;

use crate::command::LightCommand;
use crate::error::ActionError;

/// Applies a flushed command to the real light.
///
/// Called at most once per flush, from a task on the coalescer's runtime.
/// Errors are logged and published as events; the coalescer never retries.
///
/// Any `Fn(LightCommand, Option<String>) -> impl Future` closure is an action:
///
/// ```
/// use accessory_coalescer::command::{Command, LightCommand};
/// use accessory_coalescer::coalescer::DownstreamAction;
/// use accessory_coalescer::error::ActionError;
///
/// fn assert_action<A: DownstreamAction>(_: &A) {}
///
/// let action = |command: LightCommand, _description: Option<String>| async move {
///     println!("{}", command.service());
///     Ok::<(), ActionError>(())
/// };
/// assert_action(&action);
/// ```
pub trait DownstreamAction: Send + Sync + 'static {
    /// Applies `command`. `description` summarizes the merged changes.
    ///
    /// # Errors
    ///
    /// Returns `ActionError` if the command could not be applied.
    fn apply(
        &self,
        command: LightCommand,
        description: Option<String>,
    ) -> impl Future<Output = Result<(), ActionError>> + Send;
}

impl<F, Fut> DownstreamAction for F
where
    F: Fn(LightCommand, Option<String>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), ActionError>> + Send,
{
    fn apply(
        &self,
        command: LightCommand,
        description: Option<String>,
    ) -> impl Future<Output = Result<(), ActionError>> + Send {
        self(command, description)
    }
}

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;

    use super::*;

    #[derive(Default)]
    struct Recorder {
        applied: Mutex<Vec<LightCommand>>,
    }

    impl DownstreamAction for Recorder {
        async fn apply(
            &self,
            command: LightCommand,
            _description: Option<String>,
        ) -> Result<(), ActionError> {
            self.applied.lock().push(command);
            Ok(())
        }
    }

    #[tokio::test]
    async fn closure_is_an_action() {
        let action = |command: LightCommand, _: Option<String>| async move {
            if command.is_off() {
                Err(ActionError::Rejected("busy".to_string()))
            } else {
                Ok(())
            }
        };

        let err = action.apply(LightCommand::TurnOff, None).await.unwrap_err();
        assert_eq!(err.to_string(), "command rejected: busy");
    }

    #[tokio::test]
    async fn struct_action_records() {
        let recorder = Recorder::default();

        recorder.apply(LightCommand::TurnOff, None).await.unwrap();
        assert_eq!(*recorder.applied.lock(), vec![LightCommand::TurnOff]);
    }
}
