// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use std::fmt;
use tokio::sync::Mutex;
use tracing::info;
use vitrage_model::Quote;

#[derive(Debug)]
pub struct RepositoryError(pub String);

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::error::Error for RepositoryError {}

/// Where accepted quotes go. The handler only depends on this trait, so the
/// delivery mechanism (log shipper, mailer, database) can change without
/// touching the HTTP layer.
#[async_trait]
pub trait QuoteRepository: Send + Sync + 'static {
    async fn save(&self, quote: &Quote) -> Result<(), RepositoryError>;
}

/// Emits each accepted quote as a structured log record. Downstream log
/// shipping picks these up for fulfilment.
pub struct LogQuoteRepository;

#[async_trait]
impl QuoteRepository for LogQuoteRepository {
    async fn save(&self, quote: &Quote) -> Result<(), RepositoryError> {
        let payload = serde_json::to_string(quote)
            .map_err(|e| RepositoryError(format!("quote serialization failed: {e}")))?;
        info!(
            target: "vitrage_quotes",
            quote_id = %quote.id.as_str(),
            received_at = quote.received_at_millis,
            total_cents = quote.data.total_price.amount(),
            lines = quote.data.lines.len(),
            payload = %payload,
            "quote accepted"
        );
        Ok(())
    }
}

/// In-memory sink used by the integration tests.
#[derive(Default)]
pub struct MemoryQuoteRepository {
    quotes: Mutex<Vec<Quote>>,
}

impl MemoryQuoteRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn saved(&self) -> Vec<Quote> {
        self.quotes.lock().await.clone()
    }
}

#[async_trait]
impl QuoteRepository for MemoryQuoteRepository {
    async fn save(&self, quote: &Quote) -> Result<(), RepositoryError> {
        self.quotes.lock().await.push(quote.clone());
        Ok(())
    }
}
