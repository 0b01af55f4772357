use serde::{Deserialize, Serialize};

/// One page of a filtered, ordered result set.
///
/// `total_elements` is the filtered count before pagination, so it is
/// independent of how many items this particular page carries.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page_index: u64,
    pub page_size: u64,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, page_index: u64, page_size: u64, total_elements: u64) -> Self {
        Page {
            items,
            page_index,
            page_size,
            total_elements,
            total_pages: total_pages(total_elements, page_size),
        }
    }

    pub fn empty(page_index: u64, page_size: u64) -> Self {
        Self::new(Vec::new(), page_index, page_size, 0)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.page_index + 1 < self.total_pages
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page_index: self.page_index,
            page_size: self.page_size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }

    pub fn try_map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<Page<U>, E> {
        let items = self.items.into_iter().map(f).collect::<Result<Vec<_>, _>>()?;
        Ok(Page {
            items,
            page_index: self.page_index,
            page_size: self.page_size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        })
    }
}

/// `ceil(total / size)`; a zero size yields zero pages.
pub fn total_pages(total_elements: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total_elements.div_ceil(page_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(2, 1), 2);
        assert_eq!(total_pages(5, 0), 0);
    }

    #[test]
    fn test_has_next() {
        let page = Page::new(vec![1], 0, 1, 2);
        assert!(page.has_next());
        let last = Page::new(vec![2], 1, 1, 2);
        assert!(!last.has_next());
    }

    #[test]
    fn test_try_map_keeps_metadata() {
        let page = Page::new(vec!["1", "2"], 3, 2, 8);
        let mapped: Page<i32> = page.try_map(|s| s.parse::<i32>()).unwrap();
        assert_eq!(mapped.items, vec![1, 2]);
        assert_eq!(mapped.page_index, 3);
        assert_eq!(mapped.total_pages, 4);

        let failed: Result<Page<i32>, _> = Page::new(vec!["x"], 0, 1, 1).try_map(|s| s.parse());
        assert!(failed.is_err());
    }
}
