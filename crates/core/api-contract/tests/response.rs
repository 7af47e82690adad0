use api_contract::{ErrorBody, HeartbeatAck, HeartbeatRequest, StoreStatusDto};

#[test]
fn heartbeat_request_tolerates_missing_id() {
    let req: HeartbeatRequest = serde_json::from_str("{}").expect("parse");
    assert!(req.loja_id.is_none());

    let req: HeartbeatRequest = serde_json::from_str(r#"{"loja_id":"loja-7"}"#).expect("parse");
    assert_eq!(req.loja_id.as_deref(), Some("loja-7"));
}

#[test]
fn heartbeat_ack_names_store() {
    let ack = HeartbeatAck::for_store("loja-7");
    assert_eq!(ack.message, "Heartbeat recebido para loja loja-7");
}

#[test]
fn status_dto_serializes_null_ping() {
    let dto = StoreStatusDto {
        loja_id: "loja-1".to_string(),
        ultimo_ping: None,
        status: "offline".to_string(),
    };
    let value = serde_json::to_value(&dto).expect("json");
    assert_eq!(
        value,
        serde_json::json!({ "loja_id": "loja-1", "ultimo_ping": null, "status": "offline" })
    );
}

#[test]
fn error_body_shape() {
    let value = serde_json::to_value(ErrorBody::new("boom")).expect("json");
    assert_eq!(value, serde_json::json!({ "error": "boom" }));
}
