//! # Row Width Distribution
//!
//! Horizontal division of a row among its children. Children with a width
//! directive get exactly what they ask for; the rest grow equally into
//! whatever is left. When explicit requests oversubscribe the row they
//! shrink proportionally, so the row never outgrows its parent.

/// Distribute remaining space among items based on grow factors.
pub fn distribute_grow(items: &mut [(f64, f64)], remaining: f64) {
    // items: [(current_width, grow)]
    let total_grow: f64 = items.iter().map(|(_, g)| g).sum();
    if total_grow <= 0.0 || remaining <= 0.0 {
        return;
    }
    for (width, grow) in items.iter_mut() {
        *width += remaining * (*grow / total_grow);
    }
}

/// Shrink items to fit within available space, in proportion to width.
pub fn distribute_shrink(items: &mut [(f64, f64)], overflow: f64) {
    // items: [(current_width, shrink)]
    let total_shrink_weighted: f64 = items.iter().map(|(w, s)| w * s).sum();
    if total_shrink_weighted <= 0.0 || overflow >= 0.0 {
        return;
    }
    let overflow = overflow.abs();
    for (width, shrink) in items.iter_mut() {
        let factor = (*width * *shrink) / total_shrink_weighted;
        *width -= overflow * factor;
        *width = width.max(0.0);
    }
}

/// Final widths for row children.
///
/// `requests[i]` is the resolved width directive of child `i`, or `None`
/// for an implicit child. `gap` is inserted between neighbours.
pub fn row_widths(requests: &[Option<f64>], content_width: f64, gap: f64) -> Vec<f64> {
    if requests.is_empty() {
        return Vec::new();
    }
    let gaps = gap * (requests.len() - 1) as f64;
    let available = (content_width - gaps).max(0.0);

    // Explicit children shrink (factor 1) but never grow; implicit ones
    // start at zero and grow equally.
    let mut explicit: Vec<(f64, f64)> = requests
        .iter()
        .map(|r| (r.unwrap_or(0.0).max(0.0), if r.is_some() { 1.0 } else { 0.0 }))
        .collect();
    let explicit_total: f64 = explicit.iter().map(|(w, _)| w).sum();
    distribute_shrink(&mut explicit, available - explicit_total);

    let used: f64 = explicit.iter().map(|(w, _)| w).sum();
    let mut items: Vec<(f64, f64)> = explicit
        .iter()
        .zip(requests)
        .map(|(&(w, _), r)| (w, if r.is_none() { 1.0 } else { 0.0 }))
        .collect();
    distribute_grow(&mut items, available - used);

    items.into_iter().map(|(w, _)| w).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_implicit_columns_grow_evenly_into_slack() {
        // A 1/2 column beside two implicit ones in a 600pt row.
        let mut cols = vec![(300.0, 0.0), (0.0, 1.0), (0.0, 1.0)];
        distribute_grow(&mut cols, 300.0);
        assert_eq!(cols[0].0, 300.0);
        assert_eq!(cols[1].0, 150.0);
        assert_eq!(cols[2].0, 150.0);

        // No slack, nothing moves.
        distribute_grow(&mut cols, -10.0);
        assert_eq!(cols[1].0, 150.0);
    }

    #[test]
    fn test_oversized_columns_shrink_by_width() {
        // 2/3 + 2/3 requested in a 600pt row: each gives back in proportion.
        let mut cols = vec![(400.0, 1.0), (200.0, 1.0), (100.0, 0.0)];
        distribute_shrink(&mut cols, -150.0);
        assert!((cols[0].0 - 300.0).abs() < 1e-9);
        assert!((cols[1].0 - 150.0).abs() < 1e-9);
        assert_eq!(cols[2].0, 100.0);
    }

    #[test]
    fn test_explicit_thirds() {
        let third = 720.0 / 3.0;
        let widths = row_widths(&[Some(third), Some(third), Some(third)], 720.0, 0.0);
        for w in widths {
            assert!((w - 240.0).abs() < 1.0);
        }
    }

    #[test]
    fn test_implicit_children_share_remainder() {
        let widths = row_widths(&[Some(300.0), None, None], 700.0, 0.0);
        assert_eq!(widths, vec![300.0, 200.0, 200.0]);
    }

    #[test]
    fn test_gaps_come_out_of_implicit_share() {
        let widths = row_widths(&[Some(200.0), None], 620.0, 20.0);
        assert_eq!(widths, vec![200.0, 400.0]);
    }

    #[test]
    fn test_oversubscribed_explicit_shrinks() {
        let widths = row_widths(&[Some(500.0), Some(500.0), None], 600.0, 0.0);
        assert!((widths[0] - 300.0).abs() < 1e-9);
        assert!((widths[1] - 300.0).abs() < 1e-9);
        assert_eq!(widths[2], 0.0);
    }
}
