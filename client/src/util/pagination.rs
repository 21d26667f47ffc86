//! Page-number window for the table pagination control.
//!
//! DESIGN
//! ======
//! The window keeps `max_visible` consecutive pages around the current one,
//! shifted to stay inside `1..=total`. The first and last pages are always
//! reachable, with an ellipsis standing in for any gap of two or more pages.

#[cfg(test)]
#[path = "pagination_test.rs"]
mod pagination_test;

pub const DEFAULT_MAX_VISIBLE: u32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageItem {
    Page(u32),
    Ellipsis,
}

/// Visible pagination entries for `current` of `total` pages.
///
/// `current` is clamped into range and `max_visible` is at least one.
pub fn page_items(current: u32, total: u32, max_visible: u32) -> Vec<PageItem> {
    if total == 0 {
        return Vec::new();
    }
    let max_visible = max_visible.max(1);
    if total <= max_visible {
        return (1..=total).map(PageItem::Page).collect();
    }

    let current = current.clamp(1, total);
    let left = max_visible / 2;
    let right = max_visible - left - 1;

    let (start, end) = if current <= left {
        (1, max_visible)
    } else if current >= total - right {
        (total - max_visible + 1, total)
    } else {
        (current - left, current + right)
    };

    let mut items = Vec::with_capacity(max_visible as usize + 4);
    if start > 1 {
        items.push(PageItem::Page(1));
        if start > 2 {
            items.push(PageItem::Ellipsis);
        }
    }
    items.extend((start..=end).map(PageItem::Page));
    if end < total {
        if end < total - 1 {
            items.push(PageItem::Ellipsis);
        }
        items.push(PageItem::Page(total));
    }
    items
}

pub fn has_previous(current: u32) -> bool {
    current > 1
}

pub fn has_next(current: u32, total: u32) -> bool {
    current < total
}

/// Target of the "previous" button; stays on page 1.
pub fn previous_page(current: u32) -> u32 {
    current.saturating_sub(1).max(1)
}

/// Target of the "next" button; stays on the last page.
pub fn next_page(current: u32, total: u32) -> u32 {
    current.saturating_add(1).min(total.max(1))
}
