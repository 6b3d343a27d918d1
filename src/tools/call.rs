//! tools::call
//!
//! A resolved, locally validated tool invocation.
//!
//! [`ToolCall::parse`] runs every check that needs no remote: name
//! resolution, argument decoding, then uid, direction and sort. A call that
//! parses is ready to execute; one that does not never reaches a transport.

use serde_json::Value;
use tracing::debug;

use super::args::{
    validate_args, validate_direction, validate_sort, validate_uid, CreateEnvironmentArgs,
    EnvironmentIdArgs, ForkEnvironmentArgs, GetEnvironmentForksArgs, ListEnvironmentsArgs,
    UpdateEnvironmentArgs,
};
use super::error::ToolError;
use super::operation::Operation;

/// One invocation with its typed arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolCall {
    ListEnvironments(ListEnvironmentsArgs),
    GetEnvironment(EnvironmentIdArgs),
    CreateEnvironment(CreateEnvironmentArgs),
    UpdateEnvironment(UpdateEnvironmentArgs),
    DeleteEnvironment(EnvironmentIdArgs),
    ForkEnvironment(ForkEnvironmentArgs),
    ListForks(GetEnvironmentForksArgs),
    MergeFork(EnvironmentIdArgs),
    PullEnvironment(EnvironmentIdArgs),
}

impl ToolCall {
    /// Resolve `name` and validate `args` without issuing any request.
    ///
    /// # Errors
    ///
    /// - `MethodNotFound` for an unknown name, before the bag is looked at
    /// - `InvalidRequest` for a malformed bag, uid, direction or sort
    pub fn parse(name: &str, args: Value) -> Result<Self, ToolError> {
        let Some(op) = Operation::from_tool_name(name) else {
            debug!(tool = name, "unknown tool");
            return Err(ToolError::method_not_found(name));
        };
        let message = op.invalid_args_message();

        let call = match op {
            Operation::ListEnvironments => ToolCall::ListEnvironments(validate_args(args, message)?),
            Operation::GetEnvironment => ToolCall::GetEnvironment(validate_args(args, message)?),
            Operation::CreateEnvironment => {
                ToolCall::CreateEnvironment(validate_args(args, message)?)
            }
            Operation::UpdateEnvironment => {
                ToolCall::UpdateEnvironment(validate_args(args, message)?)
            }
            Operation::DeleteEnvironment => {
                ToolCall::DeleteEnvironment(validate_args(args, message)?)
            }
            Operation::ForkEnvironment => ToolCall::ForkEnvironment(validate_args(args, message)?),
            Operation::ListForks => {
                let a: GetEnvironmentForksArgs = validate_args(args, message)?;
                validate_uid(&a.environment_id)?;
                validate_direction(a.direction.as_deref())?;
                validate_sort(a.sort.as_deref())?;
                ToolCall::ListForks(a)
            }
            Operation::MergeFork => ToolCall::MergeFork(validate_args(args, message)?),
            Operation::PullEnvironment => ToolCall::PullEnvironment(validate_args(args, message)?),
        };

        if let Some(environment_id) = call.environment_id() {
            validate_uid(environment_id)?;
        }
        Ok(call)
    }

    /// The operation this call runs.
    pub fn operation(&self) -> Operation {
        match self {
            ToolCall::ListEnvironments(_) => Operation::ListEnvironments,
            ToolCall::GetEnvironment(_) => Operation::GetEnvironment,
            ToolCall::CreateEnvironment(_) => Operation::CreateEnvironment,
            ToolCall::UpdateEnvironment(_) => Operation::UpdateEnvironment,
            ToolCall::DeleteEnvironment(_) => Operation::DeleteEnvironment,
            ToolCall::ForkEnvironment(_) => Operation::ForkEnvironment,
            ToolCall::ListForks(_) => Operation::ListForks,
            ToolCall::MergeFork(_) => Operation::MergeFork,
            ToolCall::PullEnvironment(_) => Operation::PullEnvironment,
        }
    }

    /// The addressed environment, for operations that take one.
    pub fn environment_id(&self) -> Option<&str> {
        match self {
            ToolCall::ListEnvironments(_) | ToolCall::CreateEnvironment(_) => None,
            ToolCall::GetEnvironment(a)
            | ToolCall::DeleteEnvironment(a)
            | ToolCall::MergeFork(a)
            | ToolCall::PullEnvironment(a) => Some(a.environment_id.as_str()),
            ToolCall::UpdateEnvironment(a) => Some(a.environment_id.as_str()),
            ToolCall::ForkEnvironment(a) => Some(a.environment_id.as_str()),
            ToolCall::ListForks(a) => Some(a.environment_id.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::args::{INVALID_DIRECTION, INVALID_UID};
    use crate::tools::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn unknown_name_ignores_bag() {
        let err = ToolCall::parse("bogus", json!(42)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MethodNotFound);
    }

    #[test]
    fn resolves_every_operation() {
        let id = json!({"environmentId": "1-a", "workspace": "w", "name": "n", "values": []});
        for op in Operation::ALL {
            let call = ToolCall::parse(op.tool_name(), id.clone()).unwrap();
            assert_eq!(call.operation(), op);
        }
    }

    #[test]
    fn uid_checked_for_addressed_operations() {
        let err = ToolCall::parse("pull_environment", json!({"environmentId": "1-a/../x"}))
            .unwrap_err();
        assert_eq!(err, ToolError::invalid_request(INVALID_UID));

        let call = ToolCall::parse("list_environments", json!({})).unwrap();
        assert_eq!(call.environment_id(), None);
    }

    #[test]
    fn fork_listing_parameters_checked() {
        let err = ToolCall::parse(
            "get_environment_forks",
            json!({"environmentId": "1-a", "direction": "up"}),
        )
        .unwrap_err();
        assert_eq!(err, ToolError::invalid_request(INVALID_DIRECTION));
    }
}
