//! Live search session state / 搜索会话状态

use serde::{Deserialize, Serialize};

use crate::models::SearchFilter;

/// First page number of every query
pub const FIRST_PAGE: u32 = 1;

/// Query, filter and paging state of one screen / 搜索会话
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSession {
    query: Option<String>,
    page: u32,
    filter: SearchFilter,
    generation: u64,
    in_flight: bool,
}

/// Snapshot of the parameters a fetch was dispatched with / 请求凭据
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub query: String,
    pub page: u32,
    pub filter: SearchFilter,
}

/// Whether a completed fetch still belongs to the live session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Current,
    Stale,
}

impl SearchSession {
    pub fn new(filter: SearchFilter) -> Self {
        Self {
            query: None,
            page: FIRST_PAGE,
            filter,
            generation: 0,
            in_flight: false,
        }
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn filter(&self) -> SearchFilter {
        self.filter
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// A query has been submitted
    pub fn is_active(&self) -> bool {
        self.query.is_some()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Start a new query at page 1; supersedes anything in flight / 开始新查询
    pub fn begin(&mut self, query: &str) -> FetchTicket {
        self.query = Some(query.to_string());
        self.page = FIRST_PAGE;
        self.generation += 1;
        self.in_flight = true;
        self.ticket()
    }

    /// Ticket for the current page, unless idle or already fetching / 下一页
    pub fn next_page(&mut self) -> Option<FetchTicket> {
        if self.query.is_none() || self.in_flight {
            return None;
        }
        self.in_flight = true;
        Some(self.ticket())
    }

    /// Switch filter; returns false when it is unchanged / 切换搜索类型
    pub fn set_filter(&mut self, filter: SearchFilter) -> bool {
        if self.filter == filter {
            return false;
        }
        self.filter = filter;
        true
    }

    /// Settle a fetch. Page advances only for a current, successful one / 完成请求
    pub fn complete(&mut self, ticket: &FetchTicket, success: bool) -> Completion {
        if ticket.generation != self.generation {
            return Completion::Stale;
        }
        self.in_flight = false;
        if success {
            self.page = ticket.page + 1;
        }
        Completion::Current
    }

    /// Release the in-flight slot of a fetch that will never settle / 放弃请求
    pub fn abandon(&mut self, generation: u64) {
        if generation == self.generation {
            self.in_flight = false;
        }
    }

    fn ticket(&self) -> FetchTicket {
        FetchTicket {
            generation: self.generation,
            query: self.query.clone().unwrap_or_default(),
            page: self.page,
            filter: self.filter,
        }
    }
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new(SearchFilter::default())
    }
}
