mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{ping_request, TestServer};

async fn setup(server: &TestServer) -> Result<(String, i64, i64)> {
    let token = server.sign_up("alice", "pw1").await?;
    let folder_id = server.create_folder(&token, "Work").await?["id"].as_i64().expect("id");
    let res = server.create_request(&token, folder_id, ping_request()).await?;
    anyhow::ensure!(res.status() == StatusCode::OK, "create request failed: {}", res.status());
    let request_id = res.json::<Value>().await?["id"].as_i64().expect("request id");
    Ok((token, folder_id, request_id))
}

#[tokio::test]
async fn create_returns_request_with_parameters() -> Result<()> {
    let server = TestServer::spawn().await?;
    let token = server.sign_up("alice", "pw1").await?;
    let folder_id = server.create_folder(&token, "Work").await?["id"].as_i64().expect("id");

    let res = server.create_request(&token, folder_id, ping_request()).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let request = res.json::<Value>().await?;
    assert_eq!(request["name"], "ping");
    assert_eq!(request["folderId"], folder_id);
    assert_eq!(request["userId"], "alice");
    assert_eq!(request["method"], "GET");
    assert_eq!(request["protocolHeader"], "http");

    let params = request["parameters"].as_array().expect("parameters");
    assert_eq!(params.len(), 2);
    assert!(params.iter().all(|p| p["requestId"] == request["id"]));
    Ok(())
}

#[tokio::test]
async fn create_rejects_unknown_method() -> Result<()> {
    let server = TestServer::spawn().await?;
    let token = server.sign_up("alice", "pw1").await?;
    let folder_id = server.create_folder(&token, "Work").await?["id"].as_i64().expect("id");

    let mut body = ping_request();
    body["method"] = json!("FETCH");
    let res = server.create_request(&token, folder_id, body).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn update_replaces_content_but_not_name() -> Result<()> {
    let server = TestServer::spawn().await?;
    let (token, folder_id, request_id) = setup(&server).await?;

    let res = server
        .client
        .patch(server.url("/request"))
        .header("Authorization", &token)
        .json(&json!({
            "id": request_id,
            "name": "ignored",
            "folderId": folder_id + 100,
            "url": "example.org/v2",
            "protocolHeader": "https",
            "method": "POST",
            "result": "{\"ok\":true}",
            "parameters": [
                { "kind": "json_body", "key": "payload", "value": "{}" }
            ]
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let request = server.get_request(&token, request_id).await?.json::<Value>().await?;
    assert_eq!(request["name"], "ping");
    assert_eq!(request["folderId"], folder_id);
    assert_eq!(request["url"], "example.org/v2");
    assert_eq!(request["protocolHeader"], "https");
    assert_eq!(request["method"], "POST");
    assert_eq!(request["result"], "{\"ok\":true}");
    let params = request["parameters"].as_array().expect("parameters");
    assert_eq!(params.len(), 1);
    assert_eq!(params[0]["kind"], "json_body");
    Ok(())
}

#[tokio::test]
async fn rename_changes_only_the_name() -> Result<()> {
    let server = TestServer::spawn().await?;
    let (token, _, request_id) = setup(&server).await?;

    // Give every content field a non-default value first
    let res = server
        .client
        .patch(server.url("/request"))
        .header("Authorization", &token)
        .json(&json!({
            "id": request_id,
            "url": "example.org/status",
            "protocolHeader": "https",
            "method": "HEAD",
            "result": "200 OK",
            "parameters": [
                { "kind": "header", "key": "Accept", "value": "*/*" },
                { "kind": "form_body", "key": "k", "value": "v" }
            ]
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let mut before = server.get_request(&token, request_id).await?.json::<Value>().await?;

    let res = server
        .client
        .patch(server.url("/request/rename"))
        .header("Authorization", &token)
        .query(&[("requestId", request_id.to_string()), ("name", "health".to_string())])
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.json::<Value>().await?["message"].is_string());

    let mut after = server.get_request(&token, request_id).await?.json::<Value>().await?;
    assert_eq!(after["name"], "health");

    before.as_object_mut().expect("object").remove("name");
    after.as_object_mut().expect("object").remove("name");
    assert_eq!(before, after);
    Ok(())
}

#[tokio::test]
async fn transfer_between_own_folders() -> Result<()> {
    let server = TestServer::spawn().await?;
    let (token, _, request_id) = setup(&server).await?;
    let archive = server.create_folder(&token, "Archive").await?["id"].as_i64().expect("id");

    let res = server
        .client
        .patch(server.url("/request/transfer"))
        .header("Authorization", &token)
        .query(&[("requestId", request_id), ("folderId", archive)])
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let request = server.get_request(&token, request_id).await?.json::<Value>().await?;
    assert_eq!(request["folderId"], archive);
    Ok(())
}

#[tokio::test]
async fn delete_request() -> Result<()> {
    let server = TestServer::spawn().await?;
    let (token, _, request_id) = setup(&server).await?;

    let res = server
        .client
        .delete(server.url("/request"))
        .header("Authorization", &token)
        .query(&[("requestId", request_id)])
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = server.get_request(&token, request_id).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["code"], "NOT_FOUND");
    Ok(())
}
