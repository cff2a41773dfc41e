/// Position in a wrapping list whose length may change between reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    position: usize,
}

impl Cursor {
    pub fn index(&self, len: usize) -> usize {
        if len == 0 {
            0
        } else {
            self.position % len
        }
    }

    pub fn next(&mut self, len: usize) {
        if len > 0 {
            self.position = (self.index(len) + 1) % len;
        }
    }

    pub fn prev(&mut self, len: usize) {
        if len > 0 {
            self.position = (self.index(len) + len - 1) % len;
        }
    }
}

pub fn page_count(len: usize, per_page: usize) -> usize {
    if per_page == 0 {
        0
    } else {
        len.div_ceil(per_page)
    }
}

/// Items of page `page`, an empty slice when out of range.
pub fn page<T>(items: &[T], page: usize, per_page: usize) -> &[T] {
    let start = page.saturating_mul(per_page);
    if start >= items.len() {
        return &[];
    }
    &items[start..(start + per_page).min(items.len())]
}
