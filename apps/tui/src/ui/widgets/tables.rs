use std::ops::Range;

/// First row to draw so `selected_index` stays on screen.
pub const fn scroll_offset(
    total_rows: usize,
    max_visible_rows: usize,
    selected_index: usize,
) -> usize {
    if total_rows <= max_visible_rows || selected_index < max_visible_rows {
        return 0;
    }

    selected_index + 1 - max_visible_rows
}

/// Columns that fit in `available` cells, one cell of spacing apart, with
/// `selected` always inside the range. The leftmost columns are preferred.
pub fn column_window(widths: &[u16], available: u16, selected: usize) -> Range<usize> {
    if widths.is_empty() {
        return 0..0;
    }
    let selected = selected.min(widths.len() - 1);

    let mut start = 0;
    while start < selected && window_end(widths, available, start) <= selected {
        start += 1;
    }
    start..window_end(widths, available, start)
}

fn window_end(widths: &[u16], available: u16, start: usize) -> usize {
    let mut used: u16 = 0;
    let mut end = start;
    while end < widths.len() {
        let spacing = u16::from(end > start);
        let next = used.saturating_add(widths[end]).saturating_add(spacing);
        if next > available && end > start {
            break;
        }
        used = next;
        end += 1;
    }
    end
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_keeps_selection_visible() {
        assert_eq!(scroll_offset(5, 10, 4), 0);
        assert_eq!(scroll_offset(20, 5, 3), 0);
        assert_eq!(scroll_offset(20, 5, 5), 1);
        assert_eq!(scroll_offset(20, 5, 19), 15);
    }

    #[test]
    fn window_starts_left_when_selection_fits() {
        let widths = [10, 10, 10, 10, 10];
        assert_eq!(column_window(&widths, 32, 0), 0..3);
        assert_eq!(column_window(&widths, 32, 2), 0..3);
    }

    #[test]
    fn window_slides_to_reach_selection() {
        let widths = [10, 10, 10, 10, 10];
        assert_eq!(column_window(&widths, 32, 3), 1..4);
        assert_eq!(column_window(&widths, 32, 4), 2..5);
    }

    #[test]
    fn narrow_area_still_shows_selected_column() {
        let widths = [18, 10, 10];
        assert_eq!(column_window(&widths, 5, 1), 1..2);
        assert_eq!(column_window(&[], 40, 0), 0..0);
    }
}
