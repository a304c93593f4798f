// This file is part of the terraform-provider-fmgdevice project
//
// Copyright (C) the terraform-provider-fmgdevice authors, 2024-2026. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License")
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use tokio::sync::RwLock;
use tracing::{debug, warn};
use url::Url;

pub mod error;

pub use error::{Error, Result};

const LOGIN_URL: &str = "/sys/login/user";
const RETRY_DELAY: Duration = Duration::from_millis(500);

// JSON-RPC status codes returned by FortiManager
const ERR_OBJECT_NOT_EXIST: i64 = -3;
const ERR_NO_PERMISSION: i64 = -11;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Add,
    Set,
    Update,
    Delete,
    Exec,
}

impl Verb {
    pub fn as_str(self) -> &'static str {
        match self {
            Verb::Get => "get",
            Verb::Add => "add",
            Verb::Set => "set",
            Verb::Update => "update",
            Verb::Delete => "delete",
            Verb::Exec => "exec",
        }
    }
}

impl std::fmt::Display for Verb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Verb {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "get" => Ok(Verb::Get),
            "add" => Ok(Verb::Add),
            "set" => Ok(Verb::Set),
            "update" => Ok(Verb::Update),
            "delete" => Ok(Verb::Delete),
            "exec" => Ok(Verb::Exec),
            other => Err(Error::Method(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkspaceMode {
    #[default]
    Disabled,
    Normal,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Host name, address, or full URL of the FortiManager.
    pub hostname: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub access_token: Option<String>,
    pub adom: String,
    /// Device targeted when a resource does not name one itself.
    pub device_name: Option<String>,
    pub device_vdom: Option<String>,
    pub insecure: bool,
    pub timeout: Duration,
    /// Total attempts per request, transport failures only.
    pub retries: u32,
    pub workspace_mode: WorkspaceMode,
    /// `key=value` pairs merged into import IDs that omit them.
    pub import_options: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hostname: String::new(),
            username: None,
            password: None,
            access_token: None,
            adom: "root".to_string(),
            device_name: None,
            device_vdom: None,
            insecure: false,
            timeout: Duration::from_secs(60),
            retries: 1,
            workspace_mode: WorkspaceMode::Disabled,
            import_options: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RpcEnvelope {
    #[serde(default)]
    result: Vec<RpcResult>,
    #[serde(default)]
    session: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RpcResult {
    status: RpcStatus,
    #[serde(default)]
    data: Option<JsonValue>,
}

#[derive(Debug, Deserialize)]
struct RpcStatus {
    code: i64,
    #[serde(default)]
    message: String,
}

/// JSON-RPC client for the FortiManager API.
///
/// All calls go through a single `POST /jsonrpc` endpoint. The client
/// authenticates either with an access token passed as a query
/// parameter or with a login session that is opened lazily and replayed
/// once when the device reports it expired.
#[derive(Debug)]
pub struct FortiClient {
    cfg: Config,
    http: reqwest::Client,
    endpoint: Url,
    session: RwLock<Option<String>>,
    seq: AtomicU64,
}

impl FortiClient {
    pub fn new(cfg: Config) -> Result<Self> {
        let base = if cfg.hostname.contains("://") {
            cfg.hostname.clone()
        } else {
            format!("https://{}", cfg.hostname)
        };
        let mut endpoint = Url::parse(&base)?;
        endpoint.set_path("/jsonrpc");
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(cfg.insecure)
            .timeout(cfg.timeout)
            .build()?;
        Ok(Self {
            cfg,
            http,
            endpoint,
            session: RwLock::new(None),
            seq: AtomicU64::new(1),
        })
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Fetch an object, mapping the "object does not exist" answer to
    /// `None` so callers can drop deleted resources from the state.
    pub async fn get(&self, url: &str) -> Result<Option<JsonValue>> {
        match self.request(Verb::Get, url, None).await {
            Ok(value) => Ok(Some(value)),
            Err(Error::NotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }

    pub async fn add(&self, url: &str, data: JsonValue) -> Result<()> {
        self.apply(Verb::Add, url, Some(data)).await.map(|_| ())
    }

    pub async fn set(&self, url: &str, data: JsonValue) -> Result<()> {
        self.apply(Verb::Set, url, Some(data)).await.map(|_| ())
    }

    pub async fn update(&self, url: &str, data: JsonValue) -> Result<()> {
        self.apply(Verb::Update, url, Some(data)).await.map(|_| ())
    }

    pub async fn delete(&self, url: &str) -> Result<()> {
        self.apply(Verb::Delete, url, None).await.map(|_| ())
    }

    /// Run an arbitrary request, routing mutations through the
    /// workspace wrapper.
    pub async fn run(&self, verb: Verb, url: &str, data: Option<JsonValue>) -> Result<JsonValue> {
        match verb {
            Verb::Get => self.request(verb, url, data).await,
            _ => self.apply(verb, url, data).await,
        }
    }

    /// Perform a mutation. When the ADOM runs in workspace mode the
    /// change is wrapped in a lock / commit / unlock sequence.
    async fn apply(&self, verb: Verb, url: &str, data: Option<JsonValue>) -> Result<JsonValue> {
        if self.cfg.workspace_mode != WorkspaceMode::Normal {
            return self.request(verb, url, data).await;
        }
        let adom = &self.cfg.adom;
        self.request(Verb::Exec, &format!("/dvmdb/adom/{adom}/workspace/lock"), None)
            .await?;
        let result = match self.request(verb, url, data).await {
            Ok(value) => self
                .request(Verb::Exec, &format!("/dvmdb/adom/{adom}/workspace/commit"), None)
                .await
                .map(|_| value),
            Err(err) => Err(err),
        };
        if let Err(err) = self
            .request(Verb::Exec, &format!("/dvmdb/adom/{adom}/workspace/unlock"), None)
            .await
        {
            warn!(error = %err, "failed to unlock workspace");
        }
        result
    }

    async fn request(&self, verb: Verb, url: &str, data: Option<JsonValue>) -> Result<JsonValue> {
        let attempts = self.cfg.retries.max(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.request_once(verb, url, data.clone()).await {
                Err(err) if err.is_transient() && attempt < attempts => {
                    warn!(url, attempt, error = %err, "request failed, retrying");
                    tokio::time::sleep(RETRY_DELAY).await;
                }
                result => return result,
            }
        }
    }

    async fn request_once(&self, verb: Verb, url: &str, data: Option<JsonValue>) -> Result<JsonValue> {
        let session = self.ensure_session().await?;
        match self.rpc(verb, url, data.clone(), session.as_deref()).await {
            Err(Error::Api {
                code: ERR_NO_PERMISSION,
                ..
            }) if session.is_some() => {
                // the cached session has expired, open a fresh one and replay
                warn!(url, "session rejected, logging in again");
                let session = self.login().await?;
                *self.session.write().await = Some(session.clone());
                self.rpc(verb, url, data, Some(&session)).await
            }
            result => result,
        }
    }

    async fn rpc(
        &self,
        verb: Verb,
        url: &str,
        data: Option<JsonValue>,
        session: Option<&str>,
    ) -> Result<JsonValue> {
        let body = self.payload(verb, url, data, session);
        debug!(method = verb.as_str(), url, "forwarding JSON-RPC request");
        let envelope = self.post(&body).await?;
        let result = envelope
            .result
            .into_iter()
            .next()
            .ok_or_else(|| Error::Envelope("empty result array".to_string()))?;
        match result.status.code {
            0 => Ok(result.data.unwrap_or(JsonValue::Null)),
            ERR_OBJECT_NOT_EXIST => Err(Error::NotFound(url.to_string())),
            code => Err(Error::Api {
                code,
                message: result.status.message,
                url: url.to_string(),
            }),
        }
    }

    async fn post(&self, body: &JsonValue) -> Result<RpcEnvelope> {
        let mut endpoint = self.endpoint.clone();
        if let Some(token) = &self.cfg.access_token {
            endpoint.query_pairs_mut().append_pair("access_token", token);
        }
        let response = self.http.post(endpoint).json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status(status));
        }
        Ok(response.json().await?)
    }

    fn payload(
        &self,
        verb: Verb,
        url: &str,
        data: Option<JsonValue>,
        session: Option<&str>,
    ) -> JsonValue {
        let id = self.seq.fetch_add(1, Ordering::Relaxed);
        let mut params = serde_json::Map::new();
        params.insert("url".to_string(), json!(url));
        if let Some(data) = data {
            params.insert("data".to_string(), data);
        }
        let mut body = json!({
            "id": id,
            "method": verb.as_str(),
            "params": [JsonValue::Object(params)],
        });
        if let Some(session) = session {
            body["session"] = json!(session);
        }
        body
    }

    async fn ensure_session(&self) -> Result<Option<String>> {
        if self.cfg.access_token.is_some() {
            return Ok(None);
        }
        if let Some(session) = self.session.read().await.clone() {
            return Ok(Some(session));
        }
        let mut guard = self.session.write().await;
        if let Some(session) = guard.clone() {
            // another task logged in while we waited for the lock
            return Ok(Some(session));
        }
        let session = self.login().await?;
        *guard = Some(session.clone());
        Ok(Some(session))
    }

    async fn login(&self) -> Result<String> {
        let (Some(username), Some(password)) = (&self.cfg.username, &self.cfg.password) else {
            return Err(Error::Auth(
                "no access token and no username/password configured".to_string(),
            ));
        };
        debug!(host = %self.endpoint, "opening session");
        let body = self.payload(
            Verb::Exec,
            LOGIN_URL,
            Some(json!({"user": username, "passwd": password})),
            None,
        );
        let envelope = self.post(&body).await?;
        let result = envelope
            .result
            .into_iter()
            .next()
            .ok_or_else(|| Error::Envelope("empty result array".to_string()))?;
        if result.status.code != 0 {
            return Err(Error::Auth(result.status.message));
        }
        envelope
            .session
            .ok_or_else(|| Error::Envelope("login response carried no session".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbs_parse_from_their_wire_names() {
        assert_eq!("get".parse::<Verb>().ok(), Some(Verb::Get));
        assert_eq!("exec".parse::<Verb>().ok(), Some(Verb::Exec));
        assert!("put".parse::<Verb>().is_err());
        assert_eq!(Verb::Update.to_string(), "update");
    }

    #[test]
    fn bare_hostnames_become_https_endpoints() {
        let client = FortiClient::new(Config {
            hostname: "fmg.example.com".to_string(),
            ..Config::default()
        })
        .unwrap();
        assert_eq!(client.endpoint.as_str(), "https://fmg.example.com/jsonrpc");

        let client = FortiClient::new(Config {
            hostname: "http://10.0.0.1:8080".to_string(),
            ..Config::default()
        })
        .unwrap();
        assert_eq!(client.endpoint.as_str(), "http://10.0.0.1:8080/jsonrpc");
    }

    #[test]
    fn payloads_carry_session_and_sequence() {
        let client = FortiClient::new(Config {
            hostname: "fmg".to_string(),
            ..Config::default()
        })
        .unwrap();
        let first = client.payload(Verb::Get, "/a", None, Some("SID"));
        let second = client.payload(Verb::Set, "/b", Some(json!({"k": "v"})), None);
        assert_eq!(first["id"], json!(1));
        assert_eq!(first["method"], json!("get"));
        assert_eq!(first["session"], json!("SID"));
        assert_eq!(first["params"][0]["url"], json!("/a"));
        assert_eq!(second["id"], json!(2));
        assert_eq!(second["params"][0]["data"], json!({"k": "v"}));
        assert!(second.get("session").is_none());
    }
}
