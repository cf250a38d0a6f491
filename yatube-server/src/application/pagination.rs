use crate::infrastructure::config::PaginationConfig;

const MAX_OFFSET: usize = i64::MAX as usize;

/// A resolved limit/offset window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: usize,
    pub offset: usize,
}

impl PageRequest {
    /// Builds a window from raw query values. A missing, malformed or zero
    /// limit falls back to the default and is capped at the maximum; a
    /// malformed offset starts from the beginning. Offsets are capped at
    /// `i64::MAX` so they always fit a SQL `OFFSET`.
    pub fn resolve(limit: Option<&str>, offset: Option<&str>, config: &PaginationConfig) -> Self {
        let limit = limit
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|limit| *limit > 0)
            .unwrap_or(config.default_limit)
            .min(config.max_limit);
        let offset = offset
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .unwrap_or(0)
            .min(MAX_OFFSET);
        Self { limit, offset }
    }
}

#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Total number of records across all pages.
    pub count: usize,
    pub request: PageRequest,
}

impl<T> Page<T> {
    pub fn next_offset(&self) -> Option<usize> {
        self.request
            .offset
            .checked_add(self.request.limit)
            .filter(|next| *next < self.count)
    }

    pub fn previous_offset(&self) -> Option<usize> {
        (self.request.offset > 0).then(|| self.request.offset.saturating_sub(self.request.limit))
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            count: self.count,
            request: self.request,
        }
    }
}
