use async_trait::async_trait;
use shared::models::{Paginated, User};

use crate::{
    api::ApiClient,
    error::ApiError,
    pagination::{FetchOutcome, PagedList, PageSource},
};

/// `/users/` as a page source.
#[derive(Debug, Clone)]
pub struct UserSource {
    api: ApiClient,
}

impl UserSource {
    /// Source reading through `api`.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl PageSource for UserSource {
    type Item = User;
    type Filters = ();

    async fn fetch_page(&self, page: u32, _filters: &()) -> Result<Paginated<User>, ApiError> {
        self.api.list_users(page).await
    }
}

/// Paginated user directory.
#[derive(Debug)]
pub struct UsersPage {
    list: PagedList<UserSource>,
}

impl UsersPage {
    /// Page reading through `api`; nothing is fetched until [`Self::open`].
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            list: PagedList::new(UserSource::new(api)),
        }
    }

    /// Loads page 1.
    ///
    /// # Errors
    /// Returns the API error when the first page cannot be loaded.
    pub async fn open(&self) -> Result<FetchOutcome, ApiError> {
        self.list.fetch_page(1).await
    }

    /// Underlying list, for navigation and rendering.
    #[must_use]
    pub const fn list(&self) -> &PagedList<UserSource> {
        &self.list
    }
}
