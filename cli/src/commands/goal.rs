use anyhow::Result;

use nutriwise_core::{Action, Database, Tracker};

use super::dispatch;

/// Input that is not a positive number resets the goal to the default.
pub(crate) fn cmd_goal(tracker: &mut Tracker<Database>, value: &str, json: bool) -> Result<()> {
    dispatch(
        tracker,
        Action::SetGoal {
            input: value.to_string(),
        },
        json,
    )
}
