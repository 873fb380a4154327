//! crates/admin_dashboard_core/src/pagination.rs
//!
//! Client-side paging over a store's collection. The backend returns whole
//! collections; views slice them here.

#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// Zero-based.
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub total_pages: usize,
}

pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> Page<'_, T> {
    let page_size = page_size.max(1);
    let total = items.len();
    let total_pages = total.div_ceil(page_size);
    let start = page.saturating_mul(page_size).min(total);
    let end = start.saturating_add(page_size).min(total);
    Page {
        items: &items[start..end],
        page,
        page_size,
        total,
        total_pages,
    }
}
