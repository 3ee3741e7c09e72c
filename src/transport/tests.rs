use std::convert::Infallible;
use std::time::Duration;

use axum::extract::ws::{CloseFrame, Message as WsMessage};
use futures_util::{StreamExt, sink, stream};
use tokio::time::timeout;

use crate::broker::{Broker, Payload};
use crate::transport::websocket::{frame_to_payload, payload_to_frame, read_half, write_half};

const WAIT: Duration = Duration::from_secs(2);

#[test]
fn test_data_frames_convert_to_payloads() {
    assert_eq!(
        frame_to_payload(WsMessage::Text("hello".into())),
        Some(Payload::from("hello"))
    );
    assert_eq!(
        frame_to_payload(WsMessage::Binary(vec![0u8, 159].into())),
        Some(Payload::from(vec![0u8, 159]))
    );
    assert_eq!(frame_to_payload(WsMessage::Ping(vec![1u8].into())), None);
    assert_eq!(frame_to_payload(WsMessage::Pong(vec![1u8].into())), None);
    assert_eq!(frame_to_payload(WsMessage::Close(None)), None);
}

#[test]
fn test_payloads_keep_their_frame_kind() {
    assert_eq!(
        payload_to_frame(&Payload::from("hi")),
        WsMessage::Text("hi".into())
    );
    assert_eq!(
        payload_to_frame(&Payload::from(vec![7u8, 8])),
        WsMessage::Binary(vec![7u8, 8].into())
    );
}

#[tokio::test]
async fn test_read_half_publishes_data_frames_until_close() {
    let broker = Broker::new(10);
    let mut sub = broker.subscribe(["room"]).unwrap();

    let frames = vec![
        Ok::<_, Infallible>(WsMessage::Text("one".into())),
        Ok(WsMessage::Ping(vec![1u8].into())),
        Ok(WsMessage::Binary(vec![2u8, 3].into())),
        Ok(WsMessage::Close(Some(CloseFrame {
            code: 1000,
            reason: "bye".into(),
        }))),
        Ok(WsMessage::Text("after close".into())),
    ];
    let mut inbound = stream::iter(frames);

    read_half(&mut inbound, &broker, "room", "test-conn").await;
    broker.topics().await.unwrap();

    assert_eq!(sub.recv().await.unwrap().payload, Payload::from("one"));
    assert_eq!(sub.recv().await.unwrap().payload, Payload::from(vec![2u8, 3]));
    assert!(sub.try_recv().is_err());
}

#[tokio::test]
async fn test_read_half_stops_on_read_error() {
    let broker = Broker::new(10);
    let mut sub = broker.subscribe(["room"]).unwrap();

    let frames = vec![
        Ok(WsMessage::Text("before".into())),
        Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset")),
        Ok(WsMessage::Text("never".into())),
    ];
    let mut inbound = stream::iter(frames);

    read_half(&mut inbound, &broker, "room", "test-conn").await;
    broker.topics().await.unwrap();

    assert_eq!(sub.recv().await.unwrap().payload, Payload::from("before"));
    assert!(sub.try_recv().is_err());
}

#[tokio::test]
async fn test_read_half_stops_when_broker_is_gone() {
    let broker = Broker::new(10);
    broker.shutdown().unwrap();
    broker.closed().await;

    let mut inbound = stream::iter(vec![Ok::<_, Infallible>(WsMessage::Text("x".into()))])
        .chain(stream::pending());

    timeout(WAIT, read_half(&mut inbound, &broker, "room", "test-conn"))
        .await
        .expect("reader should stop once publishing fails");
}

#[tokio::test]
async fn test_write_half_drains_until_subscription_retired() {
    let broker = Broker::new(10);
    let sub = broker.subscribe(["out"]).unwrap();

    broker.publish("text", ["out"]).unwrap();
    broker.publish(vec![9u8], ["out"]).unwrap();
    broker.close_topic(["out"]).unwrap();

    let mut outbound: Vec<WsMessage> = Vec::new();
    timeout(WAIT, write_half(&mut outbound, sub, "test-conn"))
        .await
        .expect("writer should stop once the subscription is retired");

    assert_eq!(
        outbound,
        vec![
            WsMessage::Text("text".into()),
            WsMessage::Binary(vec![9u8].into())
        ]
    );
}

#[tokio::test]
async fn test_write_half_stops_on_write_error() {
    let broker = Broker::new(10);
    let sub = broker.subscribe(["out"]).unwrap();
    broker.publish("doomed", ["out"]).unwrap();

    let mut failing = Box::pin(sink::unfold((), |_, _frame: WsMessage| async {
        Err::<(), _>(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone"))
    }));

    timeout(WAIT, write_half(&mut failing, sub, "test-conn"))
        .await
        .expect("writer should stop on the first failed write");

    // the endpoint is still registered until the gateway unsubscribes it
    assert_eq!(broker.topics().await.unwrap()[0].subscribers, 1);
}
