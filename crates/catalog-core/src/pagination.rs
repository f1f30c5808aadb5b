use catalog_models::Page;

/// Slice one page out of `items`.
///
/// Pages are 1-based. `page = 0` slices like page 1 but is reported as given; a page past the
/// end yields an empty slice with the real totals. `per_page = 0` yields an empty page with
/// `pages = 0`.
pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> Page<T> {
    let total = items.len();

    if per_page == 0 {
        return Page {
            page,
            per_page,
            total,
            pages: 0,
            items: Vec::new(),
        };
    }

    let pages = total.div_ceil(per_page);
    let start = page.saturating_sub(1).saturating_mul(per_page);
    let slice = if start >= total {
        Vec::new()
    } else {
        let end = start.saturating_add(per_page).min(total);
        items[start..end].to_vec()
    };

    Page {
        page,
        per_page,
        total,
        pages,
        items: slice,
    }
}

/// Clamp a requested page into `[1, max(pages, 1)]`
pub fn clamp_page(page: usize, pages: usize) -> usize {
    page.clamp(1, pages.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        let page = paginate::<u32>(&[], 1, 10);
        assert_eq!(
            page,
            Page {
                page: 1,
                per_page: 10,
                total: 0,
                pages: 0,
                items: Vec::new()
            }
        );
        assert!(!page.needs_controls());
        assert_eq!(page.page_numbers().count(), 0);
    }

    #[test]
    fn test_middle_and_last_page() {
        let items: Vec<usize> = (0..25).collect();

        let second = paginate(&items, 2, 10);
        assert_eq!(second.items, (10..20).collect::<Vec<_>>());
        assert_eq!(second.pages, 3);
        assert!(second.has_previous());
        assert!(second.has_next());

        let third = paginate(&items, 3, 10);
        assert_eq!(third.items, vec![20, 21, 22, 23, 24]);
        assert_eq!(third.pages, 3);
        assert!(!third.has_next());
        assert_eq!(third.page_numbers().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_out_of_range_page_is_empty() {
        let items: Vec<usize> = (0..25).collect();
        let page = paginate(&items, 7, 10);
        assert!(page.items.is_empty());
        assert_eq!(page.total, 25);
        assert_eq!(page.pages, 3);
        assert_eq!(page.page, 7);
    }

    #[test]
    fn test_page_zero_and_per_page_zero() {
        let items: Vec<usize> = (0..5).collect();

        let zero = paginate(&items, 0, 2);
        assert_eq!(zero.page, 0);
        assert_eq!(zero.items, vec![0, 1]);

        let none = paginate(&items, 1, 0);
        assert_eq!(none.pages, 0);
        assert!(none.items.is_empty());
        assert_eq!(none.total, 5);
    }

    #[test]
    fn test_single_page_needs_no_controls() {
        let items = vec!["a", "b"];
        let page = paginate(&items, 1, 10);
        assert_eq!(page.pages, 1);
        assert!(!page.needs_controls());
        assert!(!page.has_previous());
    }

    #[test]
    fn test_clamp_page() {
        assert_eq!(clamp_page(0, 3), 1);
        assert_eq!(clamp_page(2, 3), 2);
        assert_eq!(clamp_page(9, 3), 3);
        assert_eq!(clamp_page(4, 0), 1);
    }
}
