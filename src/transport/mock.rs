//! transport::mock
//!
//! In-memory simulation of the remote environment service.
//!
//! # Design
//!
//! The mock implements [`Transport`] by routing requests to an in-memory
//! store. It models enough of the remote side to exercise every operation:
//! environments, fork edges (child → parent), creation order for fork
//! listing, cursor pagination, merge (child values replace the parent's) and
//! pull (parent values replace the child's).
//!
//! Every request is recorded, including ones that fail, so tests can assert
//! that validation failures never reached the transport.
//!
//! # Example
//!
//! ```
//! use envforge::transport::mock::MockTransport;
//! use envforge::transport::Transport;
//!
//! # tokio_test::block_on(async {
//! let transport = MockTransport::new();
//! let uid = transport.seed_environment("Staging", vec![]);
//!
//! let resp = transport.get(&format!("/environments/{}", uid), vec![]).await.unwrap();
//! assert_eq!(resp.data["name"], "Staging");
//! assert_eq!(transport.request_count(), 1);
//! # });
//! ```

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Value};

use super::traits::{ApiRequest, ApiResponse, Method, Transport, TransportError};
use crate::core::uid::construct_uid;

/// Owner id used when none is configured.
pub const DEFAULT_OWNER: &str = "12345678";

/// Default page size for fork listing.
const DEFAULT_FORK_LIMIT: usize = 10;

/// Mock transport for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone)]
pub struct MockTransport {
    inner: Arc<Mutex<MockTransportInner>>,
}

#[derive(Debug)]
struct MockTransportInner {
    /// Owner id assigned to created environments.
    owner: String,
    /// Stored environments by uid.
    environments: BTreeMap<String, StoredEnvironment>,
    /// Creation sequence counter.
    next_seq: u64,
    /// Status to fail every request with (for testing error paths).
    fail_with: Option<u16>,
    /// Recorded requests for verification.
    requests: Vec<ApiRequest>,
}

/// An environment as held by the mock service.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredEnvironment {
    pub id: String,
    pub owner: String,
    pub name: String,
    pub values: Vec<Value>,
    pub workspace: Option<String>,
    /// Parent uid, set for forks.
    pub parent: Option<String>,
    pub fork_name: Option<String>,
    pub created_at: DateTime<Utc>,
    seq: u64,
}

impl StoredEnvironment {
    pub fn uid(&self) -> String {
        construct_uid(&self.owner, &self.id)
    }

    fn created_at_text(&self) -> String {
        self.created_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    fn full_view(&self) -> Value {
        json!({
            "id": self.id,
            "owner": self.owner,
            "name": self.name,
            "values": self.values,
            "createdAt": self.created_at_text(),
            "isPublic": false,
        })
    }

    fn summary_view(&self) -> Value {
        json!({
            "id": self.id,
            "owner": self.owner,
            "name": self.name,
            "createdAt": self.created_at_text(),
            "isPublic": false,
        })
    }

    fn fork_view(&self) -> Value {
        json!({
            "id": self.id,
            "owner": self.owner,
            "name": self.name,
            "forkName": self.fork_name,
            "createdAt": self.created_at_text(),
        })
    }
}

impl MockTransport {
    /// Create an empty mock service.
    pub fn new() -> Self {
        Self::with_owner(DEFAULT_OWNER)
    }

    /// Create an empty mock service whose environments belong to `owner`.
    pub fn with_owner(owner: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockTransportInner {
                owner: owner.into(),
                environments: BTreeMap::new(),
                next_seq: 1,
                fail_with: None,
                requests: Vec::new(),
            })),
        }
    }

    /// Configure every subsequent request to fail with `status`.
    ///
    /// A status of `0` simulates a network failure with no status at all.
    pub fn fail_with(self, status: u16) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.fail_with = Some(status);
        }
        self
    }

    /// Clear the failure configuration.
    pub fn clear_failure(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_with = None;
    }

    /// Insert an environment directly, bypassing the request log.
    ///
    /// Returns the new environment's uid.
    pub fn seed_environment(&self, name: &str, values: Vec<Value>) -> String {
        let mut inner = self.inner.lock().unwrap();
        inner.insert(name.to_string(), values, None, None, None)
    }

    /// Get all recorded requests.
    pub fn requests(&self) -> Vec<ApiRequest> {
        let inner = self.inner.lock().unwrap();
        inner.requests.clone()
    }

    /// Number of requests received.
    pub fn request_count(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.requests.len()
    }

    /// Clear recorded requests.
    pub fn clear_requests(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.requests.clear();
    }

    /// Get a stored environment by uid (for test verification).
    pub fn environment(&self, uid: &str) -> Option<StoredEnvironment> {
        let inner = self.inner.lock().unwrap();
        inner.environments.get(uid).cloned()
    }

    /// Count of stored environments, forks included.
    pub fn environment_count(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.environments.len()
    }

    /// Route one request against the store.
    fn handle(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let mut inner = self.inner.lock().unwrap();
        inner.requests.push(request.clone());

        match inner.fail_with {
            Some(0) => return Err(TransportError::Network("simulated network failure".into())),
            Some(status) => return Err(status_error(status, "simulated failure")),
            None => {}
        }

        let rest = request
            .path
            .strip_prefix("/environments")
            .ok_or_else(|| status_error(404, "unknown path"))?;
        let segments: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();

        let data = match (request.method, segments.as_slice()) {
            (Method::Get, []) => inner.list(request),
            (Method::Post, []) => inner.create(request),
            (Method::Get, [uid]) => inner.get(uid),
            (Method::Put, [uid]) => inner.update(uid, request),
            (Method::Delete, [uid]) => inner.delete(uid),
            (Method::Post, [uid, "forks"]) => inner.fork(uid, request),
            (Method::Get, [uid, "forks"]) => inner.list_forks(uid, request),
            (Method::Post, [uid, "merges"]) => inner.merge(uid),
            (Method::Post, [uid, "pulls"]) => inner.pull(uid),
            _ => Err(status_error(404, "unknown path")),
        }?;

        Ok(ApiResponse { status: 200, data })
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn status_error(status: u16, message: &str) -> TransportError {
    TransportError::Status {
        status,
        message: message.to_string(),
    }
}

impl MockTransportInner {
    fn insert(
        &mut self,
        name: String,
        values: Vec<Value>,
        workspace: Option<String>,
        parent: Option<String>,
        fork_name: Option<String>,
    ) -> String {
        let seq = self.next_seq;
        self.next_seq += 1;

        let env = StoredEnvironment {
            id: uuid::Uuid::new_v4().to_string(),
            owner: self.owner.clone(),
            name,
            values,
            workspace,
            parent,
            fork_name,
            created_at: Utc::now(),
            seq,
        };
        let uid = env.uid();
        self.environments.insert(uid.clone(), env);
        uid
    }

    fn lookup(&self, uid: &str) -> Result<&StoredEnvironment, TransportError> {
        self.environments
            .get(uid)
            .ok_or_else(|| status_error(404, "environment not found"))
    }

    fn list(&self, request: &ApiRequest) -> Result<Value, TransportError> {
        let workspace = request.query_param("workspace");
        let mut envs: Vec<&StoredEnvironment> = self
            .environments
            .values()
            .filter(|e| workspace.is_none() || e.workspace.as_deref() == workspace)
            .collect();
        envs.sort_by_key(|e| e.seq);

        Ok(json!({
            "environments": envs.iter().map(|e| e.summary_view()).collect::<Vec<_>>()
        }))
    }

    fn create(&mut self, request: &ApiRequest) -> Result<Value, TransportError> {
        let body = request
            .body
            .as_ref()
            .ok_or_else(|| status_error(400, "missing body"))?;
        let env = body
            .get("environment")
            .ok_or_else(|| status_error(400, "missing environment"))?;
        let name = env
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| status_error(400, "missing name"))?;
        let values = match env.get("values") {
            Some(Value::Array(v)) => v.clone(),
            None => Vec::new(),
            Some(_) => return Err(status_error(400, "values must be an array")),
        };
        let workspace = body
            .get("workspace")
            .and_then(|w| w.get("id"))
            .and_then(Value::as_str)
            .map(str::to_string);

        let uid = self.insert(name.to_string(), values, workspace, None, None);
        let env = self.lookup(&uid)?;
        Ok(json!({"id": env.id, "owner": env.owner, "name": env.name}))
    }

    fn get(&self, uid: &str) -> Result<Value, TransportError> {
        Ok(self.lookup(uid)?.full_view())
    }

    fn update(&mut self, uid: &str, request: &ApiRequest) -> Result<Value, TransportError> {
        let patch = request
            .body
            .as_ref()
            .and_then(|b| b.get("environment"))
            .and_then(Value::as_object)
            .cloned()
            .ok_or_else(|| status_error(400, "missing environment"))?;

        let env = self
            .environments
            .get_mut(uid)
            .ok_or_else(|| status_error(404, "environment not found"))?;

        if let Some(name) = patch.get("name") {
            env.name = name
                .as_str()
                .ok_or_else(|| status_error(400, "name must be a string"))?
                .to_string();
        }

        if let Some(values) = patch.get("values") {
            let values = values
                .as_array()
                .ok_or_else(|| status_error(400, "values must be an array"))?;
            // Upsert by key; unmentioned variables are kept
            for incoming in values {
                let key = incoming.get("key").cloned();
                match env.values.iter_mut().find(|v| v.get("key").cloned() == key) {
                    Some(existing) => *existing = incoming.clone(),
                    None => env.values.push(incoming.clone()),
                }
            }
        }

        Ok(env.full_view())
    }

    fn delete(&mut self, uid: &str) -> Result<Value, TransportError> {
        let env = self
            .environments
            .remove(uid)
            .ok_or_else(|| status_error(404, "environment not found"))?;
        Ok(json!({"environment": {"id": env.id, "uid": env.uid()}}))
    }

    fn fork(&mut self, uid: &str, request: &ApiRequest) -> Result<Value, TransportError> {
        let parent = self.lookup(uid)?.clone();

        let body = request
            .body
            .as_ref()
            .ok_or_else(|| status_error(400, "missing body"))?;
        let workspace = body
            .get("workspace")
            .and_then(|w| w.get("id"))
            .and_then(Value::as_str)
            .ok_or_else(|| status_error(400, "missing workspace"))?
            .to_string();
        let fork_name = body
            .get("forkName")
            .and_then(Value::as_str)
            .map(str::to_string);

        let child = self.insert(
            parent.name.clone(),
            parent.values.clone(),
            Some(workspace),
            Some(parent.uid()),
            fork_name,
        );
        Ok(self.lookup(&child)?.fork_view())
    }

    fn list_forks(&self, uid: &str, request: &ApiRequest) -> Result<Value, TransportError> {
        self.lookup(uid)?;

        let descending = match request.query_param("direction") {
            None | Some("desc") => true,
            Some("asc") => false,
            Some(_) => return Err(status_error(400, "invalid direction")),
        };
        if let Some(sort) = request.query_param("sort") {
            if sort != "createdAt" {
                return Err(status_error(400, "invalid sort"));
            }
        }
        let limit = match request.query_param("limit") {
            Some(l) => l
                .parse::<usize>()
                .map_err(|_| status_error(400, "invalid limit"))?,
            None => DEFAULT_FORK_LIMIT,
        };
        let offset = match request.query_param("cursor") {
            Some(c) => c
                .parse::<usize>()
                .map_err(|_| status_error(400, "invalid cursor"))?,
            None => 0,
        };

        let mut forks: Vec<&StoredEnvironment> = self
            .environments
            .values()
            .filter(|e| e.parent.as_deref() == Some(uid))
            .collect();
        forks.sort_by_key(|e| e.seq);
        if descending {
            forks.reverse();
        }

        let total = forks.len();
        let page: Vec<Value> = forks
            .iter()
            .skip(offset)
            .take(limit)
            .map(|e| e.fork_view())
            .collect();
        let next = offset + page.len();
        let next_cursor = (next < total).then(|| next.to_string());

        Ok(json!({
            "forks": page,
            "meta": {"total": total, "nextCursor": next_cursor}
        }))
    }

    /// Resolve a fork and its parent uid, rejecting non-forks with 400.
    fn fork_edge(&self, uid: &str) -> Result<(String, String), TransportError> {
        let child = self.lookup(uid)?;
        let parent = child
            .parent
            .clone()
            .ok_or_else(|| status_error(400, "environment is not a fork"))?;
        self.lookup(&parent)?;
        Ok((child.uid(), parent))
    }

    fn merge(&mut self, uid: &str) -> Result<Value, TransportError> {
        let (child, parent) = self.fork_edge(uid)?;
        let values = self.lookup(&child)?.values.clone();

        let parent = self
            .environments
            .get_mut(&parent)
            .ok_or_else(|| status_error(404, "environment not found"))?;
        parent.values = values;
        Ok(parent.full_view())
    }

    fn pull(&mut self, uid: &str) -> Result<Value, TransportError> {
        let (child, parent) = self.fork_edge(uid)?;
        let values = self.lookup(&parent)?.values.clone();

        let child = self
            .environments
            .get_mut(&child)
            .ok_or_else(|| status_error(404, "environment not found"))?;
        child.values = values;
        Ok(child.full_view())
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.handle(&request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(key: &str, value: &str) -> Value {
        json!({"key": key, "value": value, "type": "default", "enabled": true})
    }

    #[tokio::test]
    async fn create_then_get() {
        let t = MockTransport::new();
        let created = t
            .post(
                "/environments",
                Some(json!({"environment": {"name": "Dev", "values": [var("a", "1")]}})),
            )
            .await
            .unwrap();
        let uid = construct_uid(
            created.data["owner"].as_str().unwrap(),
            created.data["id"].as_str().unwrap(),
        );

        let fetched = t.get(&format!("/environments/{}", uid), vec![]).await.unwrap();
        assert_eq!(fetched.data["name"], "Dev");
        assert_eq!(fetched.data["values"][0]["key"], "a");
    }

    #[tokio::test]
    async fn list_filters_by_workspace() {
        let t = MockTransport::new();
        t.post(
            "/environments",
            Some(json!({"environment": {"name": "A"}, "workspace": {"id": "w1", "type": "workspace"}})),
        )
        .await
        .unwrap();
        t.post("/environments", Some(json!({"environment": {"name": "B"}})))
            .await
            .unwrap();

        let all = t.get("/environments", vec![]).await.unwrap();
        assert_eq!(all.data["environments"].as_array().unwrap().len(), 2);

        let scoped = t
            .get("/environments", vec![("workspace".into(), "w1".into())])
            .await
            .unwrap();
        let envs = scoped.data["environments"].as_array().unwrap();
        assert_eq!(envs.len(), 1);
        assert_eq!(envs[0]["name"], "A");
    }

    #[tokio::test]
    async fn update_upserts_by_key() {
        let t = MockTransport::new();
        let uid = t.seed_environment("Dev", vec![var("a", "1"), var("b", "2")]);

        t.put(
            &format!("/environments/{}", uid),
            json!({"environment": {"values": [var("b", "20"), var("c", "3")]}}),
        )
        .await
        .unwrap();

        let env = t.environment(&uid).unwrap();
        assert_eq!(env.name, "Dev");
        assert_eq!(env.values, vec![var("a", "1"), var("b", "20"), var("c", "3")]);
    }

    #[tokio::test]
    async fn get_missing_is_404() {
        let t = MockTransport::new();
        let err = t.get("/environments/1-nope", vec![]).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn fork_merge_pull_cycle() {
        let t = MockTransport::new();
        let parent = t.seed_environment("Main", vec![var("a", "1")]);

        let fork = t
            .post(
                &format!("/environments/{}/forks", parent),
                Some(json!({"workspace": {"id": "w2", "type": "workspace"}})),
            )
            .await
            .unwrap();
        let child = construct_uid(
            fork.data["owner"].as_str().unwrap(),
            fork.data["id"].as_str().unwrap(),
        );
        assert_eq!(t.environment(&child).unwrap().parent, Some(parent.clone()));

        // Child diverges, then merges back
        t.put(
            &format!("/environments/{}", child),
            json!({"environment": {"values": [var("a", "2")]}}),
        )
        .await
        .unwrap();
        let merged = t
            .post(&format!("/environments/{}/merges", child), None)
            .await
            .unwrap();
        assert_eq!(merged.data["values"][0]["value"], "2");
        assert_eq!(t.environment(&parent).unwrap().values, vec![var("a", "2")]);

        // Parent moves on, child pulls
        t.put(
            &format!("/environments/{}", parent),
            json!({"environment": {"values": [var("b", "9")]}}),
        )
        .await
        .unwrap();
        t.post(&format!("/environments/{}/pulls", child), None)
            .await
            .unwrap();
        assert_eq!(
            t.environment(&child).unwrap().values,
            vec![var("a", "2"), var("b", "9")]
        );
    }

    #[tokio::test]
    async fn merge_non_fork_is_400() {
        let t = MockTransport::new();
        let uid = t.seed_environment("Main", vec![]);
        let err = t
            .post(&format!("/environments/{}/merges", uid), None)
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(400));
    }

    #[tokio::test]
    async fn fork_listing_pages() {
        let t = MockTransport::new();
        let parent = t.seed_environment("Main", vec![]);
        for _ in 0..3 {
            t.post(
                &format!("/environments/{}/forks", parent),
                Some(json!({"workspace": {"id": "w", "type": "workspace"}})),
            )
            .await
            .unwrap();
        }

        let page = t
            .get(
                &format!("/environments/{}/forks", parent),
                vec![("limit".into(), "2".into()), ("direction".into(), "asc".into())],
            )
            .await
            .unwrap();
        assert_eq!(page.data["forks"].as_array().unwrap().len(), 2);
        assert_eq!(page.data["meta"]["nextCursor"], "2");
        assert_eq!(page.data["meta"]["total"], 3);

        let rest = t
            .get(
                &format!("/environments/{}/forks", parent),
                vec![("cursor".into(), "2".into()), ("direction".into(), "asc".into())],
            )
            .await
            .unwrap();
        assert_eq!(rest.data["forks"].as_array().unwrap().len(), 1);
        assert!(rest.data["meta"]["nextCursor"].is_null());
    }

    #[tokio::test]
    async fn fail_with_records_request() {
        let t = MockTransport::new().fail_with(503);
        let err = t.get("/environments", vec![]).await.unwrap_err();
        assert_eq!(err.status(), Some(503));
        assert_eq!(t.request_count(), 1);

        t.clear_failure();
        assert!(t.get("/environments", vec![]).await.is_ok());
    }

    #[tokio::test]
    async fn fail_with_zero_is_network_error() {
        let t = MockTransport::new().fail_with(0);
        let err = t.get("/environments", vec![]).await.unwrap_err();
        assert!(matches!(err, TransportError::Network(_)));
    }

    #[tokio::test]
    async fn delete_removes() {
        let t = MockTransport::new();
        let uid = t.seed_environment("Dev", vec![]);
        let ack = t.delete(&format!("/environments/{}", uid)).await.unwrap();
        assert_eq!(ack.data["environment"]["uid"], uid.as_str());
        assert_eq!(t.environment_count(), 0);
    }
}
