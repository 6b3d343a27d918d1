//! tools::operation
//!
//! The closed set of operations and their dispatch names.

use std::fmt;

/// An environment operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListEnvironments,
    GetEnvironment,
    CreateEnvironment,
    UpdateEnvironment,
    DeleteEnvironment,
    ForkEnvironment,
    ListForks,
    MergeFork,
    PullEnvironment,
}

impl Operation {
    /// Every operation, in advertisement order.
    pub const ALL: [Operation; 9] = [
        Operation::ListEnvironments,
        Operation::GetEnvironment,
        Operation::CreateEnvironment,
        Operation::UpdateEnvironment,
        Operation::DeleteEnvironment,
        Operation::ForkEnvironment,
        Operation::ListForks,
        Operation::MergeFork,
        Operation::PullEnvironment,
    ];

    /// The stable name a host dispatches on.
    pub fn tool_name(self) -> &'static str {
        match self {
            Operation::ListEnvironments => "list_environments",
            Operation::GetEnvironment => "get_environment",
            Operation::CreateEnvironment => "create_environment",
            Operation::UpdateEnvironment => "update_environment",
            Operation::DeleteEnvironment => "delete_environment",
            Operation::ForkEnvironment => "create_environment_fork",
            Operation::ListForks => "get_environment_forks",
            Operation::MergeFork => "merge_environment_fork",
            Operation::PullEnvironment => "pull_environment",
        }
    }

    /// Resolve a dispatch name.
    pub fn from_tool_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.tool_name() == name)
    }

    /// Message raised when the argument bag has the wrong shape.
    pub fn invalid_args_message(self) -> &'static str {
        match self {
            Operation::ListEnvironments => "Invalid list environments arguments",
            Operation::GetEnvironment => "Invalid get environment arguments",
            Operation::CreateEnvironment => "Invalid create environment arguments",
            Operation::UpdateEnvironment => "Invalid update environment arguments",
            Operation::DeleteEnvironment => "Invalid delete environment arguments",
            Operation::ForkEnvironment => "Invalid fork environment arguments",
            Operation::ListForks => "Invalid get environment forks arguments",
            Operation::MergeFork => "Invalid merge environment fork arguments",
            Operation::PullEnvironment => "Invalid pull environment arguments",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tool_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for op in Operation::ALL {
            assert_eq!(Operation::from_tool_name(op.tool_name()), Some(op));
        }
    }

    #[test]
    fn unknown_name() {
        assert_eq!(Operation::from_tool_name("list_monitors"), None);
        assert_eq!(Operation::from_tool_name(""), None);
    }

    #[test]
    fn display_is_tool_name() {
        assert_eq!(Operation::MergeFork.to_string(), "merge_environment_fork");
    }
}
