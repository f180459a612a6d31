/// Records shown per page.
pub const PAGE_SIZE: usize = 24;

/// How many page-number controls the pagination window holds at most.
const MAX_PAGE_BUTTONS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    /// 1-based current page.
    pub current_page: usize,
    pub page_size: usize,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            current_page: 1,
            page_size: PAGE_SIZE,
        }
    }
}

impl PageState {
    pub fn new(current_page: usize, page_size: usize) -> Self {
        Self {
            current_page,
            page_size,
        }
    }

    /// Back to page 1; called whenever the query changes.
    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    pub fn set_page(&mut self, page: usize) {
        self.current_page = page.max(1);
    }
}

/// One pagination control for the presentation layer to render. Prev/Next
/// carry the page they navigate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageControl {
    Prev(usize),
    Page { number: usize, active: bool },
    Ellipsis,
    Next(usize),
}

pub fn total_pages(total_records: usize, page_size: usize) -> usize {
    total_records.div_ceil(page_size)
}

/// The slice of `items` belonging to the current page. A `current_page`
/// past the end yields an empty slice; clamping is the caller's concern
/// (every query change resets to page 1).
pub fn page_slice<'a, T>(items: &'a [T], state: &PageState) -> &'a [T] {
    let start = state
        .current_page
        .saturating_sub(1)
        .saturating_mul(state.page_size);
    if start >= items.len() {
        return &[];
    }
    let end = (start + state.page_size).min(items.len());
    &items[start..end]
}

/// The pagination controls for the current state: prev/next arrows, a
/// window of at most five page numbers centered on the current page, and
/// first/last pages with ellipsis markers when the window is clipped.
pub fn controls(total_records: usize, state: &PageState) -> Vec<PageControl> {
    let total = total_pages(total_records, state.page_size);
    if total <= 1 {
        return Vec::new();
    }

    // An out-of-range current_page still yields usable navigation: the
    // bar is derived as if on the last page, while the (empty) slice
    // itself stays uncorrected.
    let current = state.current_page.min(total);
    let mut out = Vec::new();

    if current > 1 {
        out.push(PageControl::Prev(current - 1));
    }

    let mut start = current.saturating_sub(MAX_PAGE_BUTTONS / 2).max(1);
    let end = (start + MAX_PAGE_BUTTONS - 1).min(total);
    if end - start + 1 < MAX_PAGE_BUTTONS {
        start = end.saturating_sub(MAX_PAGE_BUTTONS - 1).max(1);
    }

    if start > 1 {
        out.push(PageControl::Page {
            number: 1,
            active: false,
        });
        if start > 2 {
            out.push(PageControl::Ellipsis);
        }
    }

    for number in start..=end {
        out.push(PageControl::Page {
            number,
            active: number == current,
        });
    }

    if end < total {
        if end < total - 1 {
            out.push(PageControl::Ellipsis);
        }
        out.push(PageControl::Page {
            number: total,
            active: false,
        });
    }

    if current < total {
        out.push(PageControl::Next(current + 1));
    }

    out
}
