use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::ListConfig;
use crate::error::{ConsoleError, Result};

/// Allocation field the table can be ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AllocationSortKey {
    #[default]
    ModifyIndex,
    ShortId,
    Name,
    JobId,
    TaskGroup,
    ClientStatus,
    CreateTime,
    ModifyTime,
}

impl AllocationSortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            AllocationSortKey::ModifyIndex => "modifyIndex",
            AllocationSortKey::ShortId => "shortId",
            AllocationSortKey::Name => "name",
            AllocationSortKey::JobId => "jobId",
            AllocationSortKey::TaskGroup => "taskGroup",
            AllocationSortKey::ClientStatus => "clientStatus",
            AllocationSortKey::CreateTime => "createTime",
            AllocationSortKey::ModifyTime => "modifyTime",
        }
    }
}

impl std::fmt::Display for AllocationSortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AllocationSortKey {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "modifyIndex" => Ok(AllocationSortKey::ModifyIndex),
            "shortId" => Ok(AllocationSortKey::ShortId),
            "name" => Ok(AllocationSortKey::Name),
            "jobId" => Ok(AllocationSortKey::JobId),
            "taskGroup" => Ok(AllocationSortKey::TaskGroup),
            "clientStatus" => Ok(AllocationSortKey::ClientStatus),
            "createTime" => Ok(AllocationSortKey::CreateTime),
            "modifyTime" => Ok(AllocationSortKey::ModifyTime),
            other => Err(ConsoleError::InvalidQuery {
                param: "sort",
                value: other.to_string(),
            }),
        }
    }
}

/// Raw query parameters of the client page, as they appear in the URL.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientQuery {
    pub page: Option<u32>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub desc: Option<bool>,
    pub preemptions: Option<bool>,
}

/// Mutable inputs of the allocation list. Never persisted other than
/// through the query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub search_term: String,
    pub sort_property: AllocationSortKey,
    pub sort_descending: bool,
    current_page: u32,
    page_size: usize,
    pub only_preemptions: bool,
    defaults: ListConfig,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(&ListConfig::default())
    }
}

impl ViewState {
    pub fn new(config: &ListConfig) -> Self {
        Self {
            search_term: String::new(),
            sort_property: config.sort_property,
            sort_descending: config.sort_descending,
            current_page: 1,
            page_size: config.page_size.max(1),
            only_preemptions: false,
            defaults: config.clone(),
        }
    }

    /// Build a view state from query parameters, filling in defaults for
    /// anything absent. A `page` of zero is clamped to the first page.
    pub fn from_query(config: &ListConfig, query: &ClientQuery) -> Result<Self> {
        let mut state = Self::new(config);
        if let Some(page) = query.page {
            state.set_current_page(page);
        }
        if let Some(search) = &query.search {
            state.search_term = search.clone();
        }
        if let Some(sort) = &query.sort {
            state.sort_property = sort.parse()?;
        }
        if let Some(desc) = query.desc {
            state.sort_descending = desc;
        }
        if let Some(preemptions) = query.preemptions {
            state.only_preemptions = preemptions;
        }
        Ok(state)
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn set_current_page(&mut self, page: u32) {
        self.current_page = page.max(1);
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Query parameters that differ from the defaults, in URL order.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if self.current_page != 1 {
            pairs.push(("page", self.current_page.to_string()));
        }
        if !self.search_term.is_empty() {
            pairs.push(("search", self.search_term.clone()));
        }
        if self.sort_property != self.defaults.sort_property {
            pairs.push(("sort", self.sort_property.to_string()));
        }
        if self.sort_descending != self.defaults.sort_descending {
            pairs.push(("desc", self.sort_descending.to_string()));
        }
        if self.only_preemptions {
            pairs.push(("preemptions", "true".to_string()));
        }
        pairs
    }
}
