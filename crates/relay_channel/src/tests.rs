use crate::frame::{ClientFrame, ServerFrame};
use crate::{ChannelError, InputChannel, MemoryBinder, Message, OutputChannel};
use serde_json::json;

#[test]
fn test_empty_message_is_preserved() {
    let message = Message::from("");
    assert!(message.is_empty());
    assert_eq!(message.payload(), "");
}

#[test]
fn test_payload_survives_json_framing_unchanged() {
    let payload = "héllo \"wörld\"\n\t{}";
    let text = ClientFrame::publish("messages", &Message::new(payload))
        .encode()
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["payload"], payload);

    let inbound = json!({ "type": "message", "topic": "messages", "payload": payload }).to_string();
    match ServerFrame::decode(&inbound).unwrap() {
        ServerFrame::Message { payload: decoded, .. } => assert_eq!(decoded, payload),
        other => panic!("unexpected frame {other:?}"),
    }
}

#[test]
fn test_handshake_frames_shape() {
    let login = ClientFrame::Login {
        username: "admin".to_string(),
        password: "password".to_string(),
    };
    let value: serde_json::Value = serde_json::from_str(&login.encode().unwrap()).unwrap();
    assert_eq!(
        value,
        json!({ "type": "login", "username": "admin", "password": "password" })
    );

    assert_eq!(
        ServerFrame::decode(r#"{"type":"login_response","token":"abc"}"#).unwrap(),
        ServerFrame::LoginResponse {
            token: "abc".to_string()
        }
    );
    assert_eq!(
        ServerFrame::decode(r#"{"type":"authenticated"}"#).unwrap(),
        ServerFrame::Authenticated {}
    );
}

#[test]
fn test_publish_frame_shape() {
    let frame = ClientFrame::publish("messages", &Message::new("test123"));
    let value: serde_json::Value = serde_json::from_str(&frame.encode().unwrap()).unwrap();
    assert_eq!(
        value,
        json!({ "type": "publish", "topic": "messages", "payload": "test123", "qos": 0 })
    );
}

#[test]
fn test_subscribe_frame_shape() {
    let frame = ClientFrame::subscribe("messages");
    let value: serde_json::Value = serde_json::from_str(&frame.encode().unwrap()).unwrap();
    assert_eq!(value, json!({ "type": "subscribe", "topic": "messages" }));
}

#[test]
fn test_server_message_frame_ignores_extra_fields() {
    let text = json!({
        "type": "message",
        "topic": "messages",
        "payload": "hello",
        "timestamp": 1_700_000_000_000i64,
        "message_id": "abc",
        "qos": 0
    })
    .to_string();

    assert_eq!(
        ServerFrame::decode(&text).unwrap(),
        ServerFrame::Message {
            topic: "messages".to_string(),
            payload: "hello".to_string(),
        }
    );
}

#[test]
fn test_server_frame_decode_error_is_not_fatal() {
    let err = ServerFrame::decode(r#"{"type":"pong","at":1}"#).unwrap_err();
    assert!(matches!(err, ChannelError::Decode(_)));
    assert!(!err.is_fatal());
}

#[test]
fn test_unavailable_and_closed_are_unavailable() {
    assert!(ChannelError::Unavailable("down".into()).is_unavailable());
    assert!(ChannelError::Closed.is_unavailable());
    assert!(ChannelError::Rejected("must authenticate first".into()).is_unavailable());
    assert!(ChannelError::Rejected("must authenticate first".into()).is_fatal());
    assert!(!ChannelError::Transport("bad".into()).is_unavailable());
    assert!(ChannelError::Transport("bad".into()).is_fatal());
}

#[tokio::test]
async fn test_memory_binder_delivers_to_every_input() {
    let binder = MemoryBinder::default();
    let mut first = binder.input();
    let mut second = binder.input();

    binder.output().send(Message::new("hello")).await.unwrap();

    assert_eq!(first.recv().await.unwrap(), Some(Message::new("hello")));
    assert_eq!(second.recv().await.unwrap(), Some(Message::new("hello")));
}

#[tokio::test]
async fn test_memory_binder_same_payload_twice_is_two_messages() {
    let binder = MemoryBinder::default();
    let mut input = binder.input();
    let output = binder.output();

    output.send(Message::new("dup")).await.unwrap();
    output.send(Message::new("dup")).await.unwrap();

    assert_eq!(input.recv().await.unwrap(), Some(Message::new("dup")));
    assert_eq!(input.recv().await.unwrap(), Some(Message::new("dup")));
}

#[tokio::test]
async fn test_memory_send_without_inputs_is_ok() {
    let binder = MemoryBinder::default();
    assert!(binder.output().send(Message::new("nobody")).await.is_ok());
}

#[tokio::test]
async fn test_memory_input_ends_when_binder_dropped() {
    let binder = MemoryBinder::default();
    let mut input = binder.input();
    let output = binder.output();
    output.send(Message::new("last")).await.unwrap();
    drop(output);
    drop(binder);

    assert_eq!(input.recv().await.unwrap(), Some(Message::new("last")));
    assert_eq!(input.recv().await.unwrap(), None);
}

#[tokio::test]
async fn test_memory_input_skips_lagged_messages() {
    let binder = MemoryBinder::new(2);
    let mut input = binder.input();
    let output = binder.output();

    for payload in ["one", "two", "three"] {
        output.send(Message::new(payload)).await.unwrap();
    }

    assert_eq!(input.recv().await.unwrap(), Some(Message::new("two")));
    assert_eq!(input.recv().await.unwrap(), Some(Message::new("three")));
}
