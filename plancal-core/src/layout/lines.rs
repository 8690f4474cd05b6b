use std::collections::BTreeMap;

use super::fragment::Fragment;

/// Rebuild visual rows from fragments.
///
/// Fragments of the same page whose `y` rounds to the same value at
/// `decimals` decimals form one row. Rows come top to bottom, and the texts
/// of a row are joined left to right with single spaces. Blank rows are kept.
pub fn reconstruct_lines(fragments: &[Fragment], decimals: u32) -> Vec<String> {
    let mut rows: BTreeMap<(usize, i64), Vec<&Fragment>> = BTreeMap::new();
    for fragment in fragments {
        rows.entry((fragment.page(), row_key(fragment.y(), decimals)))
            .or_default()
            .push(fragment);
    }

    rows.into_values()
        .map(|mut row| {
            row.sort_by(|a, b| {
                a.x()
                    .total_cmp(&b.x())
                    .then_with(|| a.text().cmp(b.text()))
            });
            row.iter()
                .map(|fragment| fragment.text())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

/// `y` rounded to `decimals` decimals, scaled to an integer so it can key a map.
fn row_key(y: f32, decimals: u32) -> i64 {
    (y as f64 * 10f64.powi(decimals as i32)).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(x: f32, y: f32, text: &str) -> Fragment {
        Fragment::new(1, x, y, text).expect("valid fragment")
    }

    #[test]
    fn test_rows_top_to_bottom() {
        let fragments = vec![
            fragment(0.1, 0.52, "09:00-12:00 Réunion"),
            fragment(0.1, 0.21, "lun. 7"),
        ];

        assert_eq!(
            reconstruct_lines(&fragments, 1),
            vec!["lun. 7", "09:00-12:00 Réunion"]
        );
    }

    #[test]
    fn test_close_fragments_share_a_row() {
        let fragments = vec![
            fragment(0.6, 0.33, "(salle A)"),
            fragment(0.1, 0.31, "14:00-16:00"),
            fragment(0.3, 0.34, "Formation"),
            fragment(0.1, 0.36, "mer. 9"),
        ];

        assert_eq!(
            reconstruct_lines(&fragments, 1),
            vec!["14:00-16:00 Formation (salle A)", "mer. 9"]
        );
    }

    #[test]
    fn test_row_order_does_not_depend_on_input_order() {
        let fragments = vec![
            fragment(0.7, 0.5, "C"),
            fragment(0.1, 0.5, "A"),
            fragment(0.4, 0.5, "B"),
            fragment(0.4, 0.5, "B2"),
        ];

        let expected = vec!["A B B2 C".to_string()];
        let mut permuted = fragments.clone();
        for _ in 0..fragments.len() {
            permuted.rotate_left(1);
            assert_eq!(reconstruct_lines(&permuted, 1), expected);
            permuted.reverse();
            assert_eq!(reconstruct_lines(&permuted, 1), expected);
        }
    }

    #[test]
    fn test_pages_are_not_merged() {
        let fragments = vec![
            Fragment::new(2, 0.1, 0.1, "mar. 8").expect("valid fragment"),
            fragment(0.1, 0.9, "lun. 7"),
        ];

        assert_eq!(reconstruct_lines(&fragments, 1), vec!["lun. 7", "mar. 8"]);
    }

    #[test]
    fn test_tolerance_follows_decimals() {
        let fragments = vec![fragment(0.1, 0.31, "A"), fragment(0.2, 0.34, "B")];

        assert_eq!(reconstruct_lines(&fragments, 1), vec!["A B"]);
        assert_eq!(reconstruct_lines(&fragments, 2), vec!["A", "B"]);
    }

    #[test]
    fn test_blank_rows_are_kept() {
        let fragments = vec![fragment(0.1, 0.1, "  "), fragment(0.1, 0.5, "lun. 7")];

        assert_eq!(reconstruct_lines(&fragments, 1), vec!["  ", "lun. 7"]);
    }
}
