use super::*;

fn pagination(current_page: u32, total_pages: u32) -> Pagination {
    Pagination { current_page, total_pages, total_logs: 120, limit: 25 }
}

#[test]
fn page_label_reports_position_and_total() {
    assert_eq!(page_label(&pagination(2, 5)), "Page 2 of 5 (Total: 120)");
}

#[test]
fn pager_hidden_for_single_page() {
    assert!(!shows_pager(&pagination(1, 1)));
    assert!(!shows_pager(&pagination(1, 0)));
    assert!(shows_pager(&pagination(1, 2)));
}

#[test]
fn next_and_previous_stay_within_total_pages() {
    let last = pagination(5, 5);
    let query = LogQuery { page: 5, limit: 25 };
    assert!(query.next(Some(&last)).is_none());
    assert_eq!(query.previous(), Some(LogQuery { page: 4, limit: 25 }));
}
