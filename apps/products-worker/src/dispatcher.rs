//! Translation of one inbound bus message into one usecase call and one reply.

use domain_products::{
    CreateProduct, Operation, Product, ProductError, ProductId, ProductName, ProductUsecase,
    StockUpdate, Subjects,
};
use messaging::{BusError, Envelope, EnvelopeStatus, MessageBroker, ReceivedMessage, RpcMetrics};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, instrument, warn};

/// Run `operation` against the usecase and wrap the outcome in an envelope.
///
/// Never fails: decode problems and usecase errors become `fail` or `error`
/// envelopes, so every message gets exactly one reply.
#[instrument(skip(usecase, payload), fields(bytes = payload.len()))]
pub async fn dispatch<U>(usecase: &U, operation: Operation, payload: &[u8]) -> Envelope
where
    U: ProductUsecase + ?Sized,
{
    match operation {
        Operation::Create => match decode::<CreateProduct>(payload) {
            Ok(input) => classify(usecase.create(input).await),
            Err(envelope) => envelope,
        },
        // A missing product is the caller's problem whatever the cause
        Operation::GetById => match decode::<ProductId>(payload) {
            Ok(query) => lookup(usecase.get_by_id(query.id).await),
            Err(envelope) => envelope,
        },
        Operation::GetByName => match decode::<ProductName>(payload) {
            Ok(query) => lookup(usecase.get_by_name(&query.name).await),
            Err(envelope) => envelope,
        },
        Operation::GetAll => classify(usecase.get_all().await),
        Operation::Update => match decode::<Product>(payload) {
            Ok(product) => classify(usecase.update(product).await),
            Err(envelope) => envelope,
        },
        Operation::Delete => match decode::<ProductId>(payload) {
            Ok(query) => classify(usecase.delete(query.id).await.map(|()| Value::Null)),
            Err(envelope) => envelope,
        },
        Operation::UpdateStock => match decode::<StockUpdate>(payload) {
            Ok(update) => classify(usecase.update_stock(update.id, update.stock).await),
            Err(envelope) => envelope,
        },
    }
}

/// Handle one delivery end to end and publish the reply.
///
/// Returns the status of the published reply, or `None` when the message
/// carried no reply destination and was dropped.
#[instrument(skip_all, fields(subject = %message.subject))]
pub async fn handle_message<B, U>(
    broker: &B,
    usecase: &U,
    subjects: &Subjects,
    metrics: &RpcMetrics,
    message: ReceivedMessage,
) -> Result<Option<EnvelopeStatus>, BusError>
where
    B: MessageBroker + ?Sized,
    U: ProductUsecase + ?Sized,
{
    let started = Instant::now();
    metrics.message_received(&message.subject);

    let Some(reply_to) = message.reply.as_deref() else {
        warn!("Message has no reply destination, dropping it");
        return Ok(None);
    };

    let envelope = match subjects.operation(&message.subject) {
        Some(operation) => dispatch(usecase, operation, &message.payload).await,
        None => Envelope::fail(format!("unknown operation '{}'", message.subject)),
    };

    let status = envelope.status();
    broker.publish(reply_to, envelope.to_reply()).await?;

    metrics.reply_published(&message.subject, status, started.elapsed());
    debug!(%status, "Reply published");
    Ok(Some(status))
}

fn decode<T: DeserializeOwned>(payload: &[u8]) -> Result<T, Envelope> {
    serde_json::from_slice(payload).map_err(|e| Envelope::fail(e.to_string()))
}

fn classify<T: Serialize>(result: Result<T, ProductError>) -> Envelope {
    match result {
        Ok(data) => Envelope::success_from(&data),
        Err(e) if e.is_client_fault() => Envelope::fail(e.to_string()),
        Err(e) => Envelope::error(e.to_string()),
    }
}

fn lookup(result: Result<Product, ProductError>) -> Envelope {
    match result {
        Ok(product) => Envelope::success_from(&product),
        Err(e) => Envelope::fail(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use domain_products::ProductResult;
    use mockall::mock;

    mock! {
        Usecase {}

        #[async_trait]
        impl ProductUsecase for Usecase {
            async fn create(&self, input: CreateProduct) -> ProductResult<Product>;
            async fn get_by_id(&self, id: u64) -> ProductResult<Product>;
            async fn get_by_name(&self, name: &str) -> ProductResult<Product>;
            async fn get_all(&self) -> ProductResult<Vec<Product>>;
            async fn update(&self, product: Product) -> ProductResult<Product>;
            async fn delete(&self, id: u64) -> ProductResult<()>;
            async fn update_stock(&self, id: u64, stock: f64) -> ProductResult<Product>;
        }
    }

    fn widget(id: u64) -> Product {
        Product {
            id,
            name: "Widget".to_string(),
            description: String::new(),
            unit: "unit".to_string(),
            price: 9.99,
            stock: 0.0,
            is_active: false,
        }
    }

    #[tokio::test]
    async fn test_create_success_carries_entity() {
        let mut usecase = MockUsecase::new();
        usecase
            .expect_create()
            .returning(|input| Ok(Product::from_create(1, input)));

        let envelope = dispatch(
            &usecase,
            Operation::Create,
            br#"{"name":"Widget","unit":"unit","price":9.99}"#,
        )
        .await;

        assert_eq!(envelope, Envelope::success(serde_json::to_value(widget(1)).unwrap()));
    }

    #[tokio::test]
    async fn test_malformed_body_is_fail_without_calling_usecase() {
        let mut usecase = MockUsecase::new();
        usecase.expect_create().never();

        let envelope = dispatch(&usecase, Operation::Create, b"{not json").await;
        assert_eq!(envelope.status(), EnvelopeStatus::Fail);
    }

    #[tokio::test]
    async fn test_create_duplicate_is_fail_and_outage_is_error() {
        let mut usecase = MockUsecase::new();
        let mut calls = 0;
        usecase.expect_create().times(2).returning(move |input| {
            calls += 1;
            if calls == 1 {
                Err(ProductError::DuplicateName(input.name))
            } else {
                Err(ProductError::Repository("database unavailable".into()))
            }
        });

        let body = br#"{"name":"Widget","unit":"unit","price":9.99}"#;

        let duplicate = dispatch(&usecase, Operation::Create, body).await;
        assert_eq!(duplicate.status(), EnvelopeStatus::Fail);

        let outage = dispatch(&usecase, Operation::Create, body).await;
        assert_eq!(outage.status(), EnvelopeStatus::Error);
        assert_eq!(outage.message(), Some("Repository error: database unavailable"));
    }

    #[tokio::test]
    async fn test_lookup_failures_are_always_fail() {
        let mut usecase = MockUsecase::new();
        usecase
            .expect_get_by_id()
            .returning(|_| Err(ProductError::Repository("timeout".into())));
        usecase
            .expect_get_by_name()
            .returning(|name| Err(ProductError::NameNotFound(name.to_string())));

        let by_id = dispatch(&usecase, Operation::GetById, br#"{"id":999}"#).await;
        assert_eq!(by_id.status(), EnvelopeStatus::Fail);

        let by_name = dispatch(&usecase, Operation::GetByName, br#"{"name":"Nope"}"#).await;
        assert_eq!(by_name.status(), EnvelopeStatus::Fail);
    }

    #[tokio::test]
    async fn test_get_by_id_not_found_message() {
        let mut usecase = MockUsecase::new();
        usecase
            .expect_get_by_id()
            .withf(|id| *id == 999)
            .returning(|id| Err(ProductError::NotFound(id)));

        let envelope = dispatch(&usecase, Operation::GetById, br#"{"id":999}"#).await;
        assert!(envelope.message().unwrap().contains("does not exist"));
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_fail() {
        let mut usecase = MockUsecase::new();
        usecase.expect_get_by_id().never();

        let envelope = dispatch(&usecase, Operation::GetById, br#"{"id":"abc"}"#).await;
        assert_eq!(envelope.status(), EnvelopeStatus::Fail);
    }

    #[tokio::test]
    async fn test_get_all_ignores_body() {
        let mut usecase = MockUsecase::new();
        usecase
            .expect_get_all()
            .returning(|| Ok(vec![widget(1), widget(2)]));

        let envelope = dispatch(&usecase, Operation::GetAll, b"").await;
        match envelope {
            Envelope::Success { data } => assert_eq!(data.as_array().unwrap().len(), 2),
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_delete_success_has_null_data() {
        let mut usecase = MockUsecase::new();
        usecase.expect_delete().returning(|_| Ok(()));

        let envelope = dispatch(&usecase, Operation::Delete, br#"{"id":1}"#).await;
        assert_eq!(envelope.encode().unwrap().as_ref(), br#"{"status":"success","data":null}"#);
    }

    #[tokio::test]
    async fn test_update_stock_negative_is_fail() {
        let mut usecase = MockUsecase::new();
        usecase
            .expect_update_stock()
            .returning(|_, stock| Err(ProductError::NegativeStock(stock)));

        let envelope =
            dispatch(&usecase, Operation::UpdateStock, br#"{"id":1,"stock":-5}"#).await;
        assert_eq!(envelope.status(), EnvelopeStatus::Fail);
    }

    #[tokio::test]
    async fn test_update_passes_full_entity() {
        let mut usecase = MockUsecase::new();
        usecase
            .expect_update()
            .withf(|product| product.id == 3 && product.price == 12.5)
            .returning(Ok);

        let body = br#"{"id":3,"name":"Widget","unit":"unit","price":12.5,"stock":1,"is_active":true}"#;
        let envelope = dispatch(&usecase, Operation::Update, body).await;
        assert_eq!(envelope.status(), EnvelopeStatus::Success);
    }
}
