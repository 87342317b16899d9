//! NatsBroker against a real server
//!
//! Run with `cargo test -p messaging --features nats -- --ignored`.

#![cfg(feature = "nats")]

use bytes::Bytes;
use messaging::nats::{NatsBroker, NatsConfig};
use messaging::{BusError, MessageBroker};
use std::time::Duration;
use test_utils::{TestDataBuilder, TestNats};

const TIMEOUT: Duration = Duration::from_millis(500);

async fn connect(nats: &TestNats) -> NatsBroker {
    let config = NatsConfig::new(nats.connection_string()).with_client_name("messaging-test");
    NatsBroker::connect(&config).await.unwrap()
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_request_reply_through_queue_group() {
    let nats = TestNats::new().await;
    let broker = connect(&nats).await;
    let data = TestDataBuilder::from_test_name("test_request_reply_through_queue_group");
    let subject = format!("{}.getall", data.subject_prefix("products"));

    let mut stream = broker
        .queue_subscribe(&subject, &data.queue_group("workers"))
        .await
        .unwrap();
    broker.flush().await.unwrap();

    let responder = connect(&nats).await;
    tokio::spawn(async move {
        if let Some(message) = stream.next().await {
            let reply = message.reply.expect("request carries a reply subject");
            responder
                .publish(&reply, Bytes::from_static(br#"{"status":"success","data":[]}"#))
                .await
                .unwrap();
            responder.flush().await.unwrap();
        }
    });

    let reply = broker.request(&subject, Bytes::new(), TIMEOUT).await.unwrap();
    assert_eq!(reply.as_ref(), br#"{"status":"success","data":[]}"#);
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_request_without_subscribers_reports_no_responders() {
    let nats = TestNats::new().await;
    let broker = connect(&nats).await;

    let err = broker
        .request("nobody.listens", Bytes::new(), TIMEOUT)
        .await
        .unwrap_err();
    assert!(matches!(err, BusError::NoResponders(_)), "got {:?}", err);
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_unsubscribed_stream_stops_receiving() {
    let nats = TestNats::new().await;
    let broker = connect(&nats).await;

    let mut stream = broker.queue_subscribe("products.delete", "workers").await.unwrap();
    stream.unsubscribe().await.unwrap();
    broker.flush().await.unwrap();

    let err = broker
        .request("products.delete", Bytes::from_static(br#"{"id":1}"#), TIMEOUT)
        .await
        .unwrap_err();
    assert!(err.is_timeout() || matches!(err, BusError::NoResponders(_)));
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_drain_closes_connection() {
    let nats = TestNats::new().await;
    let broker = connect(&nats).await;
    let observer = connect(&nats).await;

    let _stream = broker.queue_subscribe("products.getall", "workers").await.unwrap();
    broker.flush().await.unwrap();
    broker.drain().await.unwrap();

    let err = observer
        .request("products.getall", Bytes::new(), TIMEOUT)
        .await
        .unwrap_err();
    assert!(err.is_timeout() || matches!(err, BusError::NoResponders(_)));
}
