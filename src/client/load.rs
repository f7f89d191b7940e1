//! Page data loads
//!
//! A [`PageLoad`] runs a page's backend fetch on its own task. Dropping the
//! handle aborts the task, so leaving a page before its data arrives does not
//! leave a request running on behalf of a page nobody is looking at.

use serde_json::Value;
use std::sync::Arc;
use tokio::task::JoinHandle;

use super::cache::RequestCache;
use super::error::{ClientError, ClientResult};
use crate::routing::Page;

/// In-progress data load for one mounted page
#[derive(Debug)]
pub struct PageLoad {
    page: Page,
    endpoint: Option<String>,
    token: Option<String>,
    task: Option<JoinHandle<ClientResult<Arc<Value>>>>,
}

impl PageLoad {
    /// Start loading `endpoint` for `page`
    ///
    /// Must be called from within a Tokio runtime. A page without an endpoint
    /// gets a load that completes immediately with no data.
    pub fn spawn(
        cache: Arc<RequestCache>,
        page: Page,
        endpoint: Option<String>,
        token: Option<String>,
    ) -> Self {
        let task = endpoint.clone().map(|endpoint| {
            let token = token.clone();
            tokio::spawn(async move { cache.fetch(&endpoint, token.as_deref()).await })
        });

        Self {
            page,
            endpoint,
            token,
            task,
        }
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    /// Token the fetch was sent with
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, |t| t.is_finished())
    }

    /// Stop the load without waiting for it
    pub fn abort(&mut self) {
        if let Some(task) = self.task.take() {
            if !task.is_finished() {
                tracing::debug!(page = %self.page.slug(), "Aborting page load");
            }
            task.abort();
        }
    }

    /// Wait for the page's data
    pub async fn finish(mut self) -> ClientResult<Option<Arc<Value>>> {
        let Some(task) = self.task.take() else {
            return Ok(None);
        };

        match task.await {
            Ok(result) => result.map(Some),
            Err(e) if e.is_cancelled() => Err(ClientError::Cancelled),
            Err(e) => Err(ClientError::Request(format!("page load failed: {}", e))),
        }
    }
}

impl Drop for PageLoad {
    fn drop(&mut self) {
        self.abort();
    }
}
