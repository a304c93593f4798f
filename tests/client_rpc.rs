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

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use terraform_provider_fmgdevice::client::{Config, Error, FortiClient, Verb, WorkspaceMode};

fn password_client(server: &MockServer) -> FortiClient {
    FortiClient::new(Config {
        hostname: server.uri(),
        username: Some("tf".to_string()),
        password: Some("secret".to_string()),
        ..Config::default()
    })
    .unwrap()
}

fn token_client(server: &MockServer, cfg: Config) -> FortiClient {
    FortiClient::new(Config {
        hostname: server.uri(),
        access_token: Some("TOK".to_string()),
        ..cfg
    })
    .unwrap()
}

fn rpc_ok(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "result": [{"status": {"code": 0, "message": "OK"}, "data": data}],
    }))
}

fn rpc_err(code: i64, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "result": [{"status": {"code": code, "message": message}}],
    }))
}

#[tokio::test]
async fn sessions_open_once_and_are_shared() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/jsonrpc"))
        .and(body_partial_json(json!({
            "method": "exec",
            "params": [{"url": "/sys/login/user", "data": {"user": "tf", "passwd": "secret"}}],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [{"status": {"code": 0, "message": "OK"}}],
            "session": "SID1",
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/jsonrpc"))
        .and(body_partial_json(json!({"method": "get", "session": "SID1"})))
        .respond_with(rpc_ok(json!({"adjacency-check": "enable"})))
        .expect(2)
        .mount(&server)
        .await;

    let client = password_client(&server);
    let url = "/pm/config/device/FGT1/vdom/root/router/isis";
    let first = client.get(url).await.unwrap().unwrap();
    let second = client.get(url).await.unwrap().unwrap();
    assert_eq!(first["adjacency-check"], json!("enable"));
    assert_eq!(first, second);
}

#[tokio::test]
async fn access_tokens_ride_the_query_string() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/jsonrpc"))
        .and(query_param("access_token", "TOK"))
        .and(body_partial_json(json!({"method": "get"})))
        .respond_with(rpc_ok(json!({"dh-mode": "hardware"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = token_client(&server, Config::default());
    let obj = client
        .get("/pm/config/device/FGT1/vdom/root/system/ike")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(obj["dh-mode"], json!("hardware"));
}

#[tokio::test]
async fn absent_objects_read_as_none() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/jsonrpc"))
        .respond_with(rpc_err(-3, "Object does not exist"))
        .mount(&server)
        .await;

    let client = token_client(&server, Config::default());
    let url = "/pm/config/device/FGT1/vdom/root/system/sdwan/health-check/gone";
    assert!(client.get(url).await.unwrap().is_none());

    // delete keeps the NotFound flavor so callers can treat it as done
    match client.delete(url).await {
        Err(Error::NotFound(missing)) => assert_eq!(missing, url),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn api_errors_carry_code_and_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/jsonrpc"))
        .respond_with(rpc_err(-10, "The data is invalid for selected url"))
        .mount(&server)
        .await;

    let client = token_client(&server, Config::default());
    let err = client
        .set("/pm/config/device/FGT1/vdom/root/router/isis", json!({}))
        .await
        .unwrap_err();
    match err {
        Error::Api { code, message, url } => {
            assert_eq!(code, -10);
            assert_eq!(message, "The data is invalid for selected url");
            assert!(url.ends_with("router/isis"));
        }
        other => panic!("expected Api, got {other:?}"),
    }
}

#[tokio::test]
async fn expired_sessions_replay_the_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/jsonrpc"))
        .and(body_partial_json(json!({"method": "exec"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [{"status": {"code": 0, "message": "OK"}}],
            "session": "STALE",
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/jsonrpc"))
        .and(body_partial_json(json!({"method": "exec"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [{"status": {"code": 0, "message": "OK"}}],
            "session": "FRESH",
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/jsonrpc"))
        .and(body_partial_json(json!({"method": "get", "session": "STALE"})))
        .respond_with(rpc_err(-11, "No permission for the resource"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/jsonrpc"))
        .and(body_partial_json(json!({"method": "get", "session": "FRESH"})))
        .respond_with(rpc_ok(json!({"name": "wan-quality"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = password_client(&server);
    let obj = client
        .get("/pm/config/device/FGT1/vdom/root/system/sdwan/health-check/wan-quality")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(obj["name"], json!("wan-quality"));
}

#[tokio::test]
async fn server_errors_retry_up_to_the_budget() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/jsonrpc"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/jsonrpc"))
        .respond_with(rpc_ok(json!({"override": "enable"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = token_client(
        &server,
        Config {
            retries: 3,
            ..Config::default()
        },
    );
    let obj = client
        .get("/pm/config/device/FGT1/vdom/root/endpoint-control/settings")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(obj["override"], json!("enable"));
}

#[tokio::test]
async fn workspace_mode_brackets_changes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/jsonrpc"))
        .and(body_partial_json(json!({
            "method": "exec",
            "params": [{"url": "/dvmdb/adom/prod/workspace/lock"}],
        })))
        .respond_with(rpc_ok(json!(null)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/jsonrpc"))
        .and(body_partial_json(json!({
            "method": "set",
            "params": [{"data": {"is-type": "level-1-2"}}],
        })))
        .respond_with(rpc_ok(json!(null)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/jsonrpc"))
        .and(body_partial_json(json!({
            "method": "exec",
            "params": [{"url": "/dvmdb/adom/prod/workspace/commit"}],
        })))
        .respond_with(rpc_ok(json!(null)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/jsonrpc"))
        .and(body_partial_json(json!({
            "method": "exec",
            "params": [{"url": "/dvmdb/adom/prod/workspace/unlock"}],
        })))
        .respond_with(rpc_ok(json!(null)))
        .expect(1)
        .mount(&server)
        .await;

    let client = token_client(
        &server,
        Config {
            adom: "prod".to_string(),
            workspace_mode: WorkspaceMode::Normal,
            ..Config::default()
        },
    );
    client
        .set(
            "/pm/config/device/FGT1/vdom/root/router/isis",
            json!({"is-type": "level-1-2"}),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn workspace_failures_skip_commit_but_unlock() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/jsonrpc"))
        .and(body_partial_json(json!({
            "params": [{"url": "/dvmdb/adom/root/workspace/lock"}],
        })))
        .respond_with(rpc_ok(json!(null)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/jsonrpc"))
        .and(body_partial_json(json!({"method": "add"})))
        .respond_with(rpc_err(-10, "The data is invalid for selected url"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/jsonrpc"))
        .and(body_partial_json(json!({
            "params": [{"url": "/dvmdb/adom/root/workspace/commit"}],
        })))
        .respond_with(rpc_ok(json!(null)))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/jsonrpc"))
        .and(body_partial_json(json!({
            "params": [{"url": "/dvmdb/adom/root/workspace/unlock"}],
        })))
        .respond_with(rpc_ok(json!(null)))
        .expect(1)
        .mount(&server)
        .await;

    let client = token_client(
        &server,
        Config {
            workspace_mode: WorkspaceMode::Normal,
            ..Config::default()
        },
    );
    let err = client
        .add(
            "/pm/config/device/FGT1/global/system/automation-action",
            json!({"name": ""}),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Api { code: -10, .. }));
}

#[tokio::test]
async fn login_failures_are_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/jsonrpc"))
        .respond_with(rpc_err(-22, "Login fail"))
        .expect(1)
        .mount(&server)
        .await;

    let client = password_client(&server);
    let err = client
        .get("/pm/config/device/FGT1/vdom/root/router/multicast")
        .await
        .unwrap_err();
    match err {
        Error::Auth(message) => assert_eq!(message, "Login fail"),
        other => panic!("expected Auth, got {other:?}"),
    }
}

#[tokio::test]
async fn raw_calls_pass_the_verb_through() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/jsonrpc"))
        .and(body_partial_json(json!({
            "method": "exec",
            "params": [{"url": "/sys/proxy/json"}],
        })))
        .respond_with(rpc_ok(json!([{"target": "FGT1", "status": "OK"}])))
        .expect(1)
        .mount(&server)
        .await;

    let client = token_client(&server, Config::default());
    let answer = client
        .run(Verb::Exec, "/sys/proxy/json", Some(json!({"action": "get"})))
        .await
        .unwrap();
    assert_eq!(answer[0]["status"], json!("OK"));
}
