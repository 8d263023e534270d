use async_trait::async_trait;
use lapin::{
    BasicProperties, Channel, Connection, ConnectionProperties, ExchangeKind,
    options::{
        BasicPublishOptions, ConfirmSelectOptions, ExchangeDeclareOptions, QueueBindOptions,
        QueueDeclareOptions,
    },
    types::FieldTable,
};
use log::{debug, info, trace};

use super::Error;
use crate::{params, traits};

const CONTENT_TYPE: &str = "application/json";
const PERSISTENT: u8 = 2;

/// Publisher over an AMQP 0-9-1 broker.
///
/// Topology (direct exchange, queue, binding) is declared once when
/// connecting, all of it durable. Messages are persistent and confirmed.
pub struct AmqpPublisher {
    // Dropping the connection closes the channel
    _conn: Connection,
    channel: Channel,
    exchange: String,
    routing_key: String,
}

impl AmqpPublisher {
    pub async fn connect(params: &params::AmqpParams) -> Result<Self, Error> {
        debug!("connecting to amqp broker");
        let conn = Connection::connect(&params.url, ConnectionProperties::default()).await?;
        let channel = conn.create_channel().await?;

        channel
            .confirm_select(ConfirmSelectOptions::default())
            .await?;

        channel
            .exchange_declare(
                &params.exchange,
                ExchangeKind::Direct,
                ExchangeDeclareOptions {
                    durable: true,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await?;

        channel
            .queue_declare(
                &params.queue,
                QueueDeclareOptions {
                    durable: true,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await?;

        channel
            .queue_bind(
                &params.queue,
                &params.exchange,
                &params.binding_key,
                QueueBindOptions::default(),
                FieldTable::default(),
            )
            .await?;

        info!(
            "publishing notifications to exchange `{}` (queue `{}`, key `{}`)",
            params.exchange, params.queue, params.binding_key
        );

        Ok(Self {
            _conn: conn,
            channel,
            exchange: params.exchange.clone(),
            routing_key: params.binding_key.clone(),
        })
    }
}

#[async_trait]
impl traits::Publisher for AmqpPublisher {
    async fn publish(&self, payload: &[u8]) -> Result<(), Error> {
        let message_id = uuid::Uuid::new_v4().to_string();
        let timestamp = chrono::Utc::now().timestamp().max(0) as u64;

        let properties = BasicProperties::default()
            .with_content_type(CONTENT_TYPE.to_owned().into())
            .with_delivery_mode(PERSISTENT)
            .with_message_id(message_id.clone().into())
            .with_timestamp(timestamp);

        let confirmation = self
            .channel
            .basic_publish(
                &self.exchange,
                &self.routing_key,
                BasicPublishOptions::default(),
                payload,
                properties,
            )
            .await?
            .await?;

        if confirmation.is_nack() {
            return Err(Error::Nacked);
        }

        trace!("notification `{}` confirmed", message_id);
        Ok(())
    }
}
