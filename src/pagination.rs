//! This modules defines the common functionality for paging data.

/// The config for pagination
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The maximum transactions to return per page when not specified in a request.
    pub default_page_size: u64,
    /// The maximum number of pages to show in the pagination indicator.
    pub max_pages: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 10,
            max_pages: 5,
        }
    }
}

/// A request for one page of query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// The 1-based page number.
    page: u64,
    /// The number of results per page, or `None` for all results.
    page_size: Option<u64>,
}

impl PageRequest {
    /// Request page `page` of `page_size` results.
    ///
    /// Page 0 is treated as the first page, and a page size of zero means
    /// there is no limit, in which case every page is the whole result set.
    pub fn new(page: u64, page_size: u64) -> Self {
        if page_size == 0 {
            return Self::all();
        }

        Self {
            page: page.max(1),
            page_size: Some(page_size),
        }
    }

    /// Request every result in one page.
    pub fn all() -> Self {
        Self {
            page: 1,
            page_size: None,
        }
    }

    /// Fill in missing parameters from `config`.
    pub fn from_query(
        page: Option<u64>,
        page_size: Option<u64>,
        config: &PaginationConfig,
    ) -> Self {
        Self::new(
            page.unwrap_or(config.default_page),
            page_size.unwrap_or(config.default_page_size),
        )
    }

    /// The SQL `LIMIT`, where -1 means no limit.
    pub fn limit(&self) -> i64 {
        self.page_size
            .map_or(-1, |page_size| i64::try_from(page_size).unwrap_or(i64::MAX))
    }

    /// The SQL `OFFSET`, i.e. the number of results on the preceding pages.
    pub fn offset(&self) -> i64 {
        self.page_size.map_or(0, |page_size| {
            let offset = (self.page - 1).saturating_mul(page_size);
            i64::try_from(offset).unwrap_or(i64::MAX)
        })
    }
}

/// The number of pages needed to show `item_count` items, `page_size` at a
/// time.
///
/// There is always at least one page, even when there are no items.
pub fn page_count(item_count: u64, page_size: u64) -> u64 {
    item_count.div_ceil(page_size.max(1)).max(1)
}

/// Clamp `page` to the range `[1, page_count]`.
pub fn clamp_page(page: u64, page_count: u64) -> u64 {
    page.clamp(1, page_count.max(1))
}

#[derive(Debug, PartialEq, Eq)]
pub enum PaginationIndicator {
    Page(u64),
    CurrPage(u64),
    Ellipsis,
    NextButton(u64),
    BackButton(u64),
}

pub fn create_pagination_indicators(
    curr_page: u64,
    page_count: u64,
    max_pages: u64,
) -> Vec<PaginationIndicator> {
    let map_page = |page| {
        if page == curr_page {
            PaginationIndicator::CurrPage(page)
        } else {
            PaginationIndicator::Page(page)
        }
    };

    let mut indicators: Vec<PaginationIndicator> = if page_count <= max_pages {
        (1..=page_count).map(map_page).collect()
    } else if curr_page <= (max_pages / 2) {
        (1..=max_pages).map(map_page).collect()
    } else if curr_page > (page_count - max_pages / 2) {
        ((page_count - max_pages + 1)..=page_count)
            .map(map_page)
            .collect()
    } else {
        ((curr_page - max_pages / 2)..=(curr_page + max_pages / 2))
            .map(map_page)
            .collect()
    };

    if page_count > max_pages {
        if curr_page > (max_pages / 2) + 1 {
            indicators.insert(0, PaginationIndicator::Page(1));
            indicators.insert(1, PaginationIndicator::Ellipsis);
        }

        if curr_page < (page_count - max_pages / 2) {
            indicators.push(PaginationIndicator::Ellipsis);
            indicators.push(PaginationIndicator::Page(page_count));
        }
    }

    if curr_page > 1 {
        indicators.insert(0, PaginationIndicator::BackButton(curr_page - 1));
    }

    if curr_page < page_count {
        indicators.push(PaginationIndicator::NextButton(curr_page + 1));
    }

    indicators
}
