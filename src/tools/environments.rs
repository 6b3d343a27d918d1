//! tools::environments
//!
//! Environment lifecycle and branch operations.
//!
//! # Design
//!
//! [`EnvironmentTools`] is a thin, validated relay over a [`Transport`].
//! Each operation:
//!
//! 1. validates its inputs (shape, uid, listing parameters), failing with
//!    `InvalidRequest` before any request is issued,
//! 2. builds a normalized request and issues exactly one call,
//! 3. back-fills `uid` on every resource in the response, or classifies
//!    the failure through the operation's status table.
//!
//! Fork, merge and pull only trigger the remote side's computation. Nothing
//! here tracks fork status, caches state, or reconciles values locally; a
//! merge or pull against a non-fork is rejected by the remote and surfaces
//! as `InvalidRequest`.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use envforge::tools::EnvironmentTools;
//! use envforge::transport::mock::MockTransport;
//!
//! # tokio_test::block_on(async {
//! let transport = MockTransport::new();
//! let parent = transport.seed_environment("Main", vec![]);
//! let tools = EnvironmentTools::new(Arc::new(transport));
//!
//! let fork = tools.fork_environment(&parent, "w1", None).await.unwrap();
//! let child = fork["uid"].as_str().unwrap();
//! let merged = tools.merge_environment_fork(child).await.unwrap();
//! assert_eq!(merged["uid"], parent.as_str());
//! # });
//! ```

use std::sync::Arc;

use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use super::args::{validate_direction, validate_sort, validate_uid};
use super::classify::{classify_operation, SERVER_ERROR};
use super::error::ToolError;
use super::operation::Operation;
use crate::core::types::{normalize_variables, VariableInput};
use crate::core::uid::backfill_uid;
use crate::transport::{ApiRequest, Method, Transport};

/// Collection endpoint for environments.
const ENVIRONMENTS_PATH: &str = "/environments";

/// Optional listing parameters for [`EnvironmentTools::get_environment_forks`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForkListing {
    pub cursor: Option<String>,
    pub direction: Option<String>,
    pub limit: Option<u32>,
    pub sort: Option<String>,
}

/// Environment operations over an injected transport.
#[derive(Clone)]
pub struct EnvironmentTools {
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for EnvironmentTools {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvironmentTools")
            .field("transport", &self.transport.name())
            .finish()
    }
}

impl EnvironmentTools {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Issue one request, classifying any failure for `op`.
    async fn call(&self, op: Operation, request: ApiRequest) -> Result<Value, ToolError> {
        debug!(operation = %op, method = %request.method, path = %request.path, "dispatching");
        self.transport
            .send(request)
            .await
            .map(|response| response.data)
            .map_err(|e| classify_operation(op, &e))
    }

    /// List environments, optionally scoped to a workspace.
    ///
    /// An empty workspace string is treated as no workspace.
    pub async fn list_environments(&self, workspace: Option<&str>) -> Result<Value, ToolError> {
        let query = workspace
            .filter(|w| !w.is_empty())
            .map(|w| vec![("workspace".to_string(), w.to_string())])
            .unwrap_or_default();
        let request = ApiRequest::new(Method::Get, ENVIRONMENTS_PATH).with_query(query);

        let data = self.call(Operation::ListEnvironments, request).await?;
        let environments = backfill_collection(data, "environments")?;
        Ok(json!({ "environments": environments }))
    }

    /// Fetch one environment.
    pub async fn get_environment(&self, environment_id: &str) -> Result<Value, ToolError> {
        let uid = validate_uid(environment_id)?;
        let request = ApiRequest::new(Method::Get, environment_path(uid.as_str()));

        let data = self.call(Operation::GetEnvironment, request).await?;
        Ok(backfill_uid(data))
    }

    /// Create an environment in `workspace`.
    ///
    /// Every variable is normalized before sending. An empty workspace
    /// string sends no workspace reference. A variable with an empty key
    /// is rejected before any request.
    pub async fn create_environment(
        &self,
        workspace: &str,
        name: &str,
        values: Vec<VariableInput>,
    ) -> Result<Value, ToolError> {
        if !values.iter().all(VariableInput::is_well_formed) {
            return Err(invalid_args(Operation::CreateEnvironment));
        }

        let mut body = Map::new();
        body.insert(
            "environment".into(),
            json!({ "name": name, "values": normalize_variables(values) }),
        );
        if !workspace.is_empty() {
            body.insert("workspace".into(), workspace_ref(workspace));
        }

        let request = ApiRequest::new(Method::Post, ENVIRONMENTS_PATH).with_body(Value::Object(body));
        let data = self.call(Operation::CreateEnvironment, request).await?;
        Ok(backfill_uid(data))
    }

    /// Partially update an environment.
    ///
    /// Only supplied fields are sent; an omitted field is absent from the
    /// body rather than empty, so the remote leaves it untouched.
    pub async fn update_environment(
        &self,
        environment_id: &str,
        name: Option<&str>,
        values: Option<Vec<VariableInput>>,
    ) -> Result<Value, ToolError> {
        let uid = validate_uid(environment_id)?;
        if let Some(values) = &values {
            if !values.iter().all(VariableInput::is_well_formed) {
                return Err(invalid_args(Operation::UpdateEnvironment));
            }
        }

        let mut patch = Map::new();
        if let Some(name) = name {
            patch.insert("name".into(), Value::String(name.to_string()));
        }
        if let Some(values) = values {
            patch.insert("values".into(), json!(normalize_variables(values)));
        }

        let request = ApiRequest::new(Method::Put, environment_path(uid.as_str()))
            .with_body(json!({ "environment": patch }));
        let data = self.call(Operation::UpdateEnvironment, request).await?;
        Ok(backfill_uid(data))
    }

    /// Delete an environment, returning the remote acknowledgment as-is.
    pub async fn delete_environment(&self, environment_id: &str) -> Result<Value, ToolError> {
        let uid = validate_uid(environment_id)?;
        let request = ApiRequest::new(Method::Delete, environment_path(uid.as_str()));
        self.call(Operation::DeleteEnvironment, request).await
    }

    /// Fork an environment into `workspace`, which must be non-empty.
    pub async fn fork_environment(
        &self,
        environment_id: &str,
        workspace: &str,
        fork_name: Option<&str>,
    ) -> Result<Value, ToolError> {
        if workspace.is_empty() {
            return Err(invalid_args(Operation::ForkEnvironment));
        }
        let uid = validate_uid(environment_id)?;

        let mut body = Map::new();
        body.insert("workspace".into(), workspace_ref(workspace));
        if let Some(fork_name) = fork_name {
            body.insert("forkName".into(), Value::String(fork_name.to_string()));
        }

        let request = ApiRequest::new(Method::Post, format!("{}/forks", environment_path(uid.as_str())))
            .with_body(Value::Object(body));
        let data = self.call(Operation::ForkEnvironment, request).await?;
        Ok(backfill_uid(data))
    }

    /// List the forks of an environment.
    ///
    /// The remote's pagination state (`meta`) is relayed when present.
    pub async fn get_environment_forks(
        &self,
        environment_id: &str,
        listing: ForkListing,
    ) -> Result<Value, ToolError> {
        let uid = validate_uid(environment_id)?;
        let direction = validate_direction(listing.direction.as_deref())?;
        let sort = validate_sort(listing.sort.as_deref())?;

        let mut query = Vec::new();
        if let Some(cursor) = listing.cursor {
            query.push(("cursor".to_string(), cursor));
        }
        if let Some(direction) = direction {
            query.push(("direction".to_string(), direction.to_string()));
        }
        if let Some(limit) = listing.limit {
            query.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(sort) = sort {
            query.push(("sort".to_string(), sort.to_string()));
        }

        let request = ApiRequest::new(Method::Get, format!("{}/forks", environment_path(uid.as_str())))
            .with_query(query);
        let mut data = self.call(Operation::ListForks, request).await?;

        let meta = data.get_mut("meta").map(Value::take);
        let forks = backfill_collection(data, "forks")?;

        let mut out = Map::new();
        out.insert("forks".into(), Value::Array(forks));
        if let Some(meta) = meta.filter(|m| !m.is_null()) {
            out.insert("meta".into(), meta);
        }
        Ok(Value::Object(out))
    }

    /// Merge a fork into its parent. Returns the post-merge parent.
    pub async fn merge_environment_fork(&self, environment_id: &str) -> Result<Value, ToolError> {
        let uid = validate_uid(environment_id)?;
        let request = ApiRequest::new(Method::Post, format!("{}/merges", environment_path(uid.as_str())));
        let data = self.call(Operation::MergeFork, request).await?;
        Ok(backfill_uid(data))
    }

    /// Pull parent changes into a fork. Returns the post-pull fork.
    pub async fn pull_environment(&self, environment_id: &str) -> Result<Value, ToolError> {
        let uid = validate_uid(environment_id)?;
        let request = ApiRequest::new(Method::Post, format!("{}/pulls", environment_path(uid.as_str())));
        let data = self.call(Operation::PullEnvironment, request).await?;
        Ok(backfill_uid(data))
    }
}

fn environment_path(uid: &str) -> String {
    format!("{}/{}", ENVIRONMENTS_PATH, uid)
}

fn invalid_args(op: Operation) -> ToolError {
    debug!(operation = %op, "argument shape check failed");
    ToolError::invalid_request(op.invalid_args_message())
}

fn workspace_ref(workspace: &str) -> Value {
    json!({ "id": workspace, "type": "workspace" })
}

/// Take `field` out of a response and back-fill uid on every element.
fn backfill_collection(mut data: Value, field: &str) -> Result<Vec<Value>, ToolError> {
    match data.get_mut(field).map(Value::take) {
        Some(Value::Array(items)) => Ok(items.into_iter().map(backfill_uid).collect()),
        _ => {
            warn!(field, "response is missing its collection field");
            Err(ToolError::internal(SERVER_ERROR))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::error::ErrorKind;
    use crate::transport::mock::MockTransport;

    fn tools() -> (MockTransport, EnvironmentTools) {
        let transport = MockTransport::new();
        let tools = EnvironmentTools::new(Arc::new(transport.clone()));
        (transport, tools)
    }

    fn var(key: &str, value: &str) -> VariableInput {
        serde_json::from_value(json!({"key": key, "value": value})).unwrap()
    }

    #[test]
    fn collection_backfill() {
        let data = json!({"environments": [{"id": "a", "owner": "1"}, {"id": "b", "owner": "2"}]});
        let items = backfill_collection(data, "environments").unwrap();
        assert_eq!(items[0]["uid"], "1-a");
        assert_eq!(items[1]["uid"], "2-b");
    }

    #[test]
    fn collection_missing_is_internal() {
        let err = backfill_collection(json!({"other": []}), "forks").unwrap_err();
        assert_eq!(err, ToolError::internal(SERVER_ERROR));
    }

    #[tokio::test]
    async fn invalid_uid_issues_no_request() {
        let (transport, tools) = tools();

        for result in [
            tools.get_environment("bad").await,
            tools.delete_environment("-x").await,
            tools.update_environment("x-", Some("n"), None).await,
            tools.fork_environment("bad", "w", None).await,
            tools
                .get_environment_forks("bad", ForkListing::default())
                .await,
            tools.merge_environment_fork("bad").await,
            tools.pull_environment("bad").await,
        ] {
            assert_eq!(result.unwrap_err().kind, ErrorKind::InvalidRequest);
        }
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn create_then_get_round_trip() {
        let (_transport, tools) = tools();
        let created = tools
            .create_environment("w1", "Env", vec![var("a", "1")])
            .await
            .unwrap();
        let uid = created["uid"].as_str().unwrap().to_string();

        let fetched = tools.get_environment(&uid).await.unwrap();
        assert_eq!(fetched["uid"], uid.as_str());
        assert_eq!(
            fetched["values"][0],
            json!({"key": "a", "value": "1", "type": "default", "enabled": true})
        );
    }

    #[tokio::test]
    async fn update_body_omits_unsupplied_fields() {
        let (transport, tools) = tools();
        let uid = transport.seed_environment("Env", vec![]);

        tools
            .update_environment(&uid, Some("Renamed"), None)
            .await
            .unwrap();

        let request = transport.requests().pop().unwrap();
        assert_eq!(request.body, Some(json!({"environment": {"name": "Renamed"}})));
    }

    #[tokio::test]
    async fn fork_list_meta_relayed() {
        let (transport, tools) = tools();
        let parent = transport.seed_environment("Main", vec![]);
        tools.fork_environment(&parent, "w", Some("f1")).await.unwrap();

        let listed = tools
            .get_environment_forks(&parent, ForkListing::default())
            .await
            .unwrap();
        assert_eq!(listed["forks"].as_array().unwrap().len(), 1);
        assert_eq!(listed["forks"][0]["forkName"], "f1");
        assert!(listed["forks"][0]["uid"].is_string());
        assert_eq!(listed["meta"]["total"], 1);
    }

    #[tokio::test]
    async fn empty_workspace_lists_unscoped() {
        let (transport, tools) = tools();
        transport.seed_environment("Dev", vec![]);

        let listed = tools.list_environments(Some("")).await.unwrap();
        assert_eq!(listed["environments"].as_array().unwrap().len(), 1);

        let request = transport.requests().pop().unwrap();
        assert!(request.query.is_empty());
    }

    #[tokio::test]
    async fn direct_calls_check_shape() {
        let (transport, tools) = tools();
        let uid = transport.seed_environment("Env", vec![]);

        let err = tools
            .create_environment("w1", "Env", vec![var("", "1")])
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ToolError::invalid_request("Invalid create environment arguments")
        );

        let err = tools
            .update_environment(&uid, None, Some(vec![var("", "1")]))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ToolError::invalid_request("Invalid update environment arguments")
        );

        let err = tools.fork_environment(&uid, "", None).await.unwrap_err();
        assert_eq!(
            err,
            ToolError::invalid_request("Invalid fork environment arguments")
        );

        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn remote_failure_is_classified() {
        let transport = MockTransport::new().fail_with(404);
        let tools = EnvironmentTools::new(Arc::new(transport));
        let err = tools.get_environment("1-abc").await.unwrap_err();
        assert_eq!(err, ToolError::invalid_request("Environment not found"));
    }
}
