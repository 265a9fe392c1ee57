//! Page arithmetic for offset-based list endpoints.

use std::num::NonZeroUsize;

/// Page layout of a list of `total` records shown `page_size` at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    total: usize,
    page_size: NonZeroUsize,
    /// 1-indexed.
    current: usize,
}

/// One page control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLink {
    /// 1-indexed page number.
    pub number: usize,
    /// `skip` to send when this page is requested.
    pub offset: usize,
    pub active: bool,
}

impl Pagination {
    pub fn new(total: usize, page_size: NonZeroUsize, current: usize) -> Self {
        Self {
            total,
            page_size,
            current,
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn page_size(&self) -> usize {
        self.page_size.get()
    }

    pub fn current(&self) -> usize {
        self.current
    }

    /// `ceil(total / page_size)`; zero for an empty list.
    pub fn page_count(&self) -> usize {
        self.total.div_ceil(self.page_size.get())
    }

    /// Offset of a 1-indexed page. Page numbers are not clamped.
    pub fn offset_of(&self, page: usize) -> usize {
        offset_of(page, self.page_size)
    }

    /// One link per page, in order.
    pub fn links(&self) -> impl Iterator<Item = PageLink> + '_ {
        (1..=self.page_count()).map(move |number| PageLink {
            number,
            offset: self.offset_of(number),
            active: number == self.current,
        })
    }
}

/// `(page - 1) * page_size`, with page 0 treated as page 1.
pub fn offset_of(page: usize, page_size: NonZeroUsize) -> usize {
    page.saturating_sub(1) * page_size.get()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_page_count_is_ceiling() {
        assert_eq!(Pagination::new(0, size(10), 1).page_count(), 0);
        assert_eq!(Pagination::new(1, size(10), 1).page_count(), 1);
        assert_eq!(Pagination::new(10, size(10), 1).page_count(), 1);
        assert_eq!(Pagination::new(11, size(10), 1).page_count(), 2);
        assert_eq!(Pagination::new(7, size(1), 1).page_count(), 7);
    }

    #[test]
    fn test_links_match_count_and_offsets() {
        for total in 0..60 {
            for page_size in 1..12 {
                let pagination = Pagination::new(total, size(page_size), 1);
                let links: Vec<PageLink> = pagination.links().collect();
                assert_eq!(links.len(), total.div_ceil(page_size));
                for link in &links {
                    assert_eq!(link.offset, (link.number - 1) * page_size);
                }
            }
        }
    }

    #[test]
    fn test_active_link() {
        let pagination = Pagination::new(35, size(10), 3);
        let active: Vec<usize> = pagination
            .links()
            .filter(|l| l.active)
            .map(|l| l.number)
            .collect();
        assert_eq!(active, vec![3]);
        assert_eq!(pagination.offset_of(3), 20);
    }

    #[test]
    fn test_empty_list_has_no_links() {
        assert_eq!(Pagination::new(0, size(10), 1).links().count(), 0);
    }

    #[test]
    fn test_offset_of_page_zero() {
        assert_eq!(offset_of(0, size(10)), 0);
    }
}
