use serde::Serialize;

pub const PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    current_page: usize,
    page_size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            current_page: 1,
            page_size: PAGE_SIZE,
        }
    }
}

impl Pagination {
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self, len: usize) -> usize {
        len.div_ceil(self.page_size)
    }

    pub fn page<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.current_page.saturating_sub(1) * self.page_size;
        if start >= items.len() {
            return &[];
        }
        let end = (start + self.page_size).min(items.len());
        &items[start..end]
    }

    /// Returns whether the page changed.
    pub fn next(&mut self, len: usize) -> bool {
        let last = self.total_pages(len).max(1);
        if self.current_page >= last {
            return false;
        }
        self.current_page += 1;
        true
    }

    pub fn prev(&mut self) -> bool {
        if self.current_page <= 1 {
            return false;
        }
        self.current_page -= 1;
        true
    }

    pub fn reset(&mut self) {
        self.current_page = 1;
    }
}
