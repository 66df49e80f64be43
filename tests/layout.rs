use playbook_pdf::layout::{LayoutError, Overflow, Separator, arrange_in_two};

#[test]
fn fills_column_one_then_moves_to_column_two() {
    let text = "A\nB\n  \u{2022} C\n  \u{2022} D\nE\nF";
    let split = arrange_in_two(text, 4, Separator::BULLET).unwrap();
    assert_eq!(split.column1, "A\nB\n  \u{2022} C");
    // The first group of column 2 gets no bullet.
    assert_eq!(split.column2, "D\nE\nF");
    assert!(split.overflows.is_empty());
}

#[test]
fn single_short_group_leaves_column_two_empty() {
    let split = arrange_in_two("Captain (80 points)", 5, Separator::BULLET).unwrap();
    assert_eq!(split.column1, "Captain (80 points)");
    assert_eq!(split.column2, "");
    assert!(split.overflows.is_empty());
}

#[test]
fn zero_line_limit_is_an_error() {
    assert_eq!(
        arrange_in_two("A", 0, Separator::LINE),
        Err(LayoutError::ZeroLineLimit)
    );
}

#[test]
fn paragraph_break_costs_one_line() {
    let split = arrange_in_two("A\nB\n\nC\n\nD", 4, Separator::PARAGRAPH).unwrap();
    assert_eq!(split.column1, "A\nB\n\nC");
    assert_eq!(split.column2, "D");
    assert!(split.overflows.is_empty());
}

#[test]
fn bulleted_paragraphs() {
    let sep = Separator {
        group: "\n\n",
        continuation: "\u{2022}",
    };
    let text = "A\nB\n\n\u{2022}C\n\n\u{2022}D\nE\nF";
    let split = arrange_in_two(text, 4, sep).unwrap();
    assert_eq!(split.column1, "A\nB\n\n\u{2022}C");
    assert_eq!(split.column2, "D\nE\nF");
    assert!(split.overflows.is_empty());
}

#[test]
fn later_groups_of_column_two_are_prefixed() {
    let split = arrange_in_two("A\nB\n  \u{2022} C\n  \u{2022} D", 2, Separator::BULLET).unwrap();
    assert_eq!(split.column1, "A\nB");
    assert_eq!(split.column2, "C\n  \u{2022} D");
    assert!(split.overflows.is_empty());
}

#[test]
fn oversized_first_group_stays_whole_and_is_reported() {
    let text = "L1\nL2\nL3\nL4\nL5\n\nX";
    let split = arrange_in_two(text, 3, Separator::PARAGRAPH).unwrap();
    assert_eq!(split.column1, "L1\nL2\nL3\nL4\nL5");
    assert_eq!(split.column2, "X");
    assert_eq!(
        split.overflows,
        vec![Overflow {
            column: 1,
            lines: 5,
            text: "L1\nL2\nL3\nL4\nL5".to_string(),
        }]
    );
}

#[test]
fn column_two_overflow_is_reported_once() {
    let text = "A\nB\n\nC\nD\nE\n\nF";
    let split = arrange_in_two(text, 2, Separator::PARAGRAPH).unwrap();
    assert_eq!(split.column1, "A\nB");
    assert_eq!(split.column2, "C\nD\nE\n\nF");
    assert_eq!(split.overflows.len(), 1);
    assert_eq!(split.overflows[0].column, 2);
    assert_eq!(split.overflows[0].lines, 3);
    assert_eq!(split.overflows[0].text, "C\nD\nE");
}

#[test]
fn blank_lines_cost_nothing() {
    let split = arrange_in_two("A\n   \n  \u{2022} B", 2, Separator::BULLET).unwrap();
    assert_eq!(split.column1, "A\n  \u{2022} B");
    assert_eq!(split.column2, "");
}

#[test]
fn empty_text_gives_empty_columns() {
    let split = arrange_in_two("", 3, Separator::LINE).unwrap();
    assert_eq!(split.column1, "");
    assert_eq!(split.column2, "");
    assert!(split.overflows.is_empty());

    let split = arrange_in_two(" \n \n", 3, Separator::PARAGRAPH).unwrap();
    assert_eq!(split.column1, "");
    assert_eq!(split.column2, "");
}

#[test]
fn empty_group_separator_keeps_text_in_one_group() {
    let sep = Separator {
        group: "",
        continuation: "",
    };
    let split = arrange_in_two("A\n\nB\nC", 2, sep).unwrap();
    assert_eq!(split.column1, "A\nB\nC");
    assert_eq!(split.column2, "");
    assert_eq!(split.overflows.len(), 1);
}

#[test]
fn separator_blank_line_cost() {
    assert_eq!(Separator::LINE.blank_lines(), 0);
    assert_eq!(Separator::BULLET.blank_lines(), 0);
    assert_eq!(Separator::PARAGRAPH.blank_lines(), 1);
    let wide = Separator {
        group: "\n\n\n",
        continuation: "",
    };
    assert_eq!(wide.blank_lines(), 2);
}

#[test]
fn lines_are_kept_in_order() {
    let text = "Unit (100 points)\n  \u{2022} 1x Sergeant\n    Bolt pistol\n  \u{2022} 4x Troopers\n    Boltgun";
    let split = arrange_in_two(text, 3, Separator::BULLET).unwrap();
    let joined: Vec<&str> = split
        .column1
        .lines()
        .chain(split.column2.lines())
        .map(|l| l.trim_start_matches("  \u{2022} "))
        .collect();
    assert_eq!(
        joined,
        vec![
            "Unit (100 points)",
            "1x Sergeant",
            "    Bolt pistol",
            "4x Troopers",
            "    Boltgun"
        ]
    );
}

#[test]
fn zero_line_limit_message() {
    assert_eq!(
        LayoutError::ZeroLineLimit.to_string(),
        "a column must hold at least one line"
    );
    let err: playbook_pdf::Error = LayoutError::ZeroLineLimit.into();
    assert!(err.to_string().contains("at least one line"));
}
