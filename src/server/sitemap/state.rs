//! Centralized state management for the sitemap server
use std::{fmt, sync::Arc};

use url::Url;

use super::client::ContentLister;

/// Global, read-only state
pub trait Global {
    /// Where the content list comes from
    fn lister(&self) -> &dyn ContentLister;
    /// Prefix of every sitemap location
    fn base_url(&self) -> &Url;
}

/// Application state
#[derive(Clone)]
pub struct App {
    /// Content service client
    pub lister: Arc<dyn ContentLister>,
    /// Prefix of every sitemap location
    pub base_url: Url,
}

impl Global for App {
    fn lister(&self) -> &dyn ContentLister {
        self.lister.as_ref()
    }

    fn base_url(&self) -> &Url {
        &self.base_url
    }
}

impl fmt::Debug for App {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "Sitemap for {}", self.base_url)
    }
}
