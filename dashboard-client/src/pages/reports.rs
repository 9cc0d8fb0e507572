//! Message reports: date-filtered search, delete and compose.

use async_trait::async_trait;
use shared::models::{CreateMessageRequest, Message, MessageFilters, Paginated};
use tracing::{info, warn};

use crate::{
    api::ApiClient,
    error::ApiError,
    pagination::{FetchOutcome, PagedList, PageSource},
};

/// Confirmation shown after a message was posted.
pub const MESSAGE_SENT: &str = "Message sent successfully!";

/// Why a message could not be sent.
#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    /// Blank text; nothing was sent.
    #[error("Message cannot be empty.")]
    Empty,
    /// The API refused or could not be reached.
    #[error("Failed to send message. Please try again.")]
    Rejected(#[source] ApiError),
}

/// A delete was refused; the row stays in place.
#[derive(Debug, thiserror::Error)]
#[error("You do not have permission to delete this message.")]
pub struct DeleteError {
    /// Message that was not deleted.
    pub id: i64,
    /// Underlying API failure.
    #[source]
    pub source: ApiError,
}

/// `/messages/` as a page source.
#[derive(Debug, Clone)]
pub struct MessageSource {
    api: ApiClient,
}

impl MessageSource {
    /// Source reading through `api`.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl PageSource for MessageSource {
    type Item = Message;
    type Filters = MessageFilters;

    async fn fetch_page(
        &self,
        page: u32,
        filters: &MessageFilters,
    ) -> Result<Paginated<Message>, ApiError> {
        self.api.list_messages(page, filters).await
    }
}

/// The Reports view.
#[derive(Debug)]
pub struct ReportsPage {
    api: ApiClient,
    list: PagedList<MessageSource>,
}

impl ReportsPage {
    /// Page reading through `api`. Nothing is shown until the first search.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            list: PagedList::new(MessageSource::new(api.clone())),
            api,
        }
    }

    /// Underlying list, for navigation and rendering.
    #[must_use]
    pub const fn list(&self) -> &PagedList<MessageSource> {
        &self.list
    }

    /// Runs a new search from page 1.
    ///
    /// # Errors
    /// Returns the API error when the page cannot be loaded.
    pub async fn search(&self, filters: MessageFilters) -> Result<FetchOutcome, ApiError> {
        self.list.search(filters).await
    }

    /// Runs a new search and jumps straight to `page`.
    ///
    /// # Errors
    /// Returns the API error when the page cannot be loaded.
    pub async fn search_page(
        &self,
        filters: MessageFilters,
        page: u32,
    ) -> Result<FetchOutcome, ApiError> {
        self.list.search_at(filters, page).await
    }

    /// `"Showing {shown} of {total} results"`.
    #[must_use]
    pub fn summary(&self) -> String {
        format!("Showing {} results", self.list.summary())
    }

    /// Deletes message `id`, then drops exactly that row from the page.
    ///
    /// The total count is left as fetched.
    ///
    /// # Errors
    /// Any API failure, reported as a permission problem.
    pub async fn delete(&self, id: i64) -> Result<(), DeleteError> {
        if let Err(source) = self.api.delete_message(id).await {
            warn!(id, error = %source, "failed to delete message");
            return Err(DeleteError { id, source });
        }
        self.list.remove_where(|message| message.id == id);
        info!(id, "message deleted");
        Ok(())
    }

    /// Posts `text` and re-fetches the page being shown.
    ///
    /// A failed refresh after a successful post is logged, not returned.
    ///
    /// # Errors
    /// [`ComposeError::Empty`] for blank text without a request, otherwise
    /// [`ComposeError::Rejected`].
    pub async fn send_message(&self, text: &str) -> Result<&'static str, ComposeError> {
        if text.trim().is_empty() {
            return Err(ComposeError::Empty);
        }
        self.api
            .create_message(&CreateMessageRequest {
                message: text.to_string(),
            })
            .await
            .map_err(|err| {
                warn!(error = %err, "failed to send message");
                ComposeError::Rejected(err)
            })?;

        if let Err(err) = self.list.refresh().await {
            warn!(error = %err, "failed to refresh reports after sending");
        }
        Ok(MESSAGE_SENT)
    }
}
