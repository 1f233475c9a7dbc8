use std::net::SocketAddr;
use std::path::PathBuf;

use crate::client::view_state::AllocationSortKey;

pub const DEFAULT_PAGE_SIZE: usize = 8;

/// Defaults for the allocation table of the client page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListConfig {
    /// Rows per page.
    pub page_size: usize,
    /// Column the table is ordered by when the URL names none.
    pub sort_property: AllocationSortKey,
    /// Most recently modified allocations first by default.
    pub sort_descending: bool,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            sort_property: AllocationSortKey::ModifyIndex,
            sort_descending: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    pub listen_addr: SocketAddr,
    /// JSON file with the node records served by the dashboard.
    pub fixture_path: Option<PathBuf>,
    pub list: ListConfig,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            // SAFETY: This is a hardcoded valid address that will always parse
            listen_addr: "127.0.0.1:4646"
                .parse()
                .expect("default listen address is valid"),
            fixture_path: None,
            list: ListConfig::default(),
        }
    }
}

impl ConsoleConfig {
    pub fn new(listen_addr: SocketAddr) -> Self {
        Self {
            listen_addr,
            ..Default::default()
        }
    }

    pub fn with_fixture(mut self, path: PathBuf) -> Self {
        self.fixture_path = Some(path);
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.list.page_size = page_size.max(1);
        self
    }
}
