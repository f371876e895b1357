use crate::components::google_calendar::models::TokenRecord;
use crate::components::google_calendar::store::TokenStore;
use crate::error::{storage_error, AppResult, Error};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client as RedisClient};
use tokio::sync::mpsc;
use tracing::{debug, info};

// Redis key constants
pub mod keys {
    pub const GOOGLE_TOKENS_PREFIX: &str = "ikhalenda:google_tokens";

    /// Key holding one user's token record
    pub fn google_tokens(user_id: &str) -> String {
        format!("{}:{}", GOOGLE_TOKENS_PREFIX, user_id)
    }
}

/// The Redis actor that processes messages
pub struct RedisActor {
    client: RedisClient,
    connection: Option<ConnectionManager>,
    command_rx: mpsc::Receiver<RedisCommand>,
}

/// Commands that can be sent to the Redis actor
pub enum RedisCommand {
    GetToken(String, mpsc::Sender<AppResult<Option<TokenRecord>>>),
    SaveToken(TokenRecord, mpsc::Sender<AppResult<()>>),
    Shutdown,
}

/// Handle for communicating with the Redis actor
#[derive(Clone)]
pub struct RedisActorHandle {
    command_tx: mpsc::Sender<RedisCommand>,
}

impl RedisActorHandle {
    /// Get a user's token record from Redis
    pub async fn get_token(&self, user_id: &str) -> AppResult<Option<TokenRecord>> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(RedisCommand::GetToken(user_id.to_string(), response_tx))
            .await
            .map_err(|e| storage_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| storage_error("Response channel closed"))?
    }

    /// Save a token record to Redis, replacing any previous one
    pub async fn save_token(&self, record: TokenRecord) -> AppResult<()> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(RedisCommand::SaveToken(record, response_tx))
            .await
            .map_err(|e| storage_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| storage_error("Response channel closed"))?
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> AppResult<()> {
        let _ = self.command_tx.send(RedisCommand::Shutdown).await;
        Ok(())
    }
}

#[async_trait]
impl TokenStore for RedisActorHandle {
    async fn get_token(&self, user_id: &str) -> AppResult<Option<TokenRecord>> {
        RedisActorHandle::get_token(self, user_id).await
    }

    async fn save_token(&self, record: TokenRecord) -> AppResult<()> {
        RedisActorHandle::save_token(self, record).await
    }
}

impl RedisActor {
    /// Create a new actor and return its handle.
    ///
    /// Only the URL is checked here; the connection is opened on first use.
    pub fn new(redis_url: &str) -> AppResult<(Self, RedisActorHandle)> {
        let (command_tx, command_rx) = mpsc::channel(32);

        let client = RedisClient::open(redis_url)
            .map_err(|e| storage_error(&format!("Failed to create Redis client: {}", e)))?;

        let actor = Self {
            client,
            connection: None,
            command_rx,
        };

        let handle = RedisActorHandle { command_tx };

        Ok((actor, handle))
    }

    /// Start the actor's processing loop
    pub async fn run(&mut self) {
        info!("Redis actor started");

        // Process commands
        while let Some(cmd) = self.command_rx.recv().await {
            match cmd {
                RedisCommand::GetToken(user_id, response_tx) => {
                    let result = self.get_token_from_redis(&user_id).await;
                    let _ = response_tx.send(result).await;
                }
                RedisCommand::SaveToken(record, response_tx) => {
                    let result = self.save_token_to_redis(record).await;
                    let _ = response_tx.send(result).await;
                }
                RedisCommand::Shutdown => {
                    info!("Redis actor shutting down");
                    break;
                }
            }
        }

        info!("Redis actor shut down");
    }

    /// Get a redis connection, opening it on first use
    async fn get_redis_connection(&mut self) -> AppResult<ConnectionManager> {
        if let Some(connection) = &self.connection {
            return Ok(connection.clone());
        }

        let connection = ConnectionManager::new(self.client.clone())
            .await
            .map_err(|e| storage_error(&format!("Failed to connect to Redis: {}", e)))?;
        debug!("Connected to Redis");

        self.connection = Some(connection.clone());
        Ok(connection)
    }

    /// Get a token record from Redis
    async fn get_token_from_redis(&mut self, user_id: &str) -> AppResult<Option<TokenRecord>> {
        let mut redis_conn = self.get_redis_connection().await?;

        let token_json: Option<String> = redis_conn
            .get(keys::google_tokens(user_id))
            .await
            .map_err(|e| storage_error(&format!("Failed to read token from Redis: {}", e)))?;

        match token_json {
            Some(json) => {
                let record = serde_json::from_str(&json)
                    .map_err(|e| -> Error { storage_error(&format!("Failed to deserialize token: {}", e)) })?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    /// Save a token record to Redis
    async fn save_token_to_redis(&mut self, record: TokenRecord) -> AppResult<()> {
        let mut redis_conn = self.get_redis_connection().await?;

        let token_json = serde_json::to_string(&record)?;

        () = redis_conn
            .set(keys::google_tokens(&record.user_id), token_json)
            .await
            .map_err(|e| storage_error(&format!("Failed to save token to Redis: {}", e)))?;

        Ok(())
    }
}
