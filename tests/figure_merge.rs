mod common;

use common::{line, recorder};
use panoplot::plots::{AxesOptions, Figure, FigureConfig, Lifecycle, PlotKind, PlotOptions};
use panoplot::SharedBackend;
use proptest::prelude::*;

/// Figure with one axes per entry of `panels`, each holding the named plots.
fn figure(backend: &SharedBackend, ncols: usize, panels: &[&[&str]]) -> Figure {
    let config = FigureConfig {
        ncols,
        ..Default::default()
    };
    let mut fig = Figure::new(config, backend).unwrap();
    for names in panels {
        let index = fig.add_axes(AxesOptions::default()).unwrap().index();
        for name in names.iter() {
            fig.add_plot(index, PlotKind::Line, line(name), PlotOptions::default())
                .unwrap();
        }
    }
    fig
}

fn names(fig: &Figure, index: usize) -> Vec<String> {
    fig.get_axes(index)
        .unwrap()
        .plots()
        .iter()
        .map(|p| p.data().name().to_string())
        .collect()
}

#[test]
fn overlay_merges_matching_panels_and_drops_the_rest() {
    let (recording, backend) = recorder();
    let a = figure(&backend, 2, &[&["a1"], &["a2"]]);

    // Indices are consecutive, so B's panel 1 exists but holds no plots.
    let b = figure(&backend, 3, &[&[], &["b2"], &["b3"]]);

    let merged = (&a * &b).unwrap();
    assert_eq!(merged.state(), Lifecycle::Closed);
    assert_eq!(merged.axes().keys().copied().collect::<Vec<_>>(), vec![1, 2]);
    assert_eq!(names(&merged, 1), vec!["a1"]);
    assert_eq!(names(&merged, 2), vec!["a2", "b2"]);
    assert!(merged.get_axes(3).is_none());

    // Operands are untouched.
    assert_eq!(names(&a, 2), vec!["a2"]);
    assert!(recording.borrow().is_open(a.handle().unwrap()));
    assert!(recording.borrow().is_open(b.handle().unwrap()));
}

#[test]
fn overlay_with_no_shared_panels_is_a_structural_copy() {
    let (_, backend) = recorder();
    let a = figure(&backend, 1, &[&["a1", "a2"]]);
    let empty = figure(&backend, 1, &[]);

    let merged = (&a * &empty).unwrap();
    assert_eq!(merged.axes_count(), 1);
    assert_eq!(names(&merged, 1), vec!["a1", "a2"]);
    assert_eq!(merged.get_axes(1).unwrap().plots(), a.get_axes(1).unwrap().plots());
}

#[test]
fn concat_appends_and_renumbers() {
    let (_, backend) = recorder();
    let a = figure(&backend, 2, &[&["a1"], &["a2"]]);
    let b = figure(&backend, 1, &[&["b1"]]);

    let joined = (&a + &b).unwrap();
    assert_eq!(joined.axes_count(), 3);
    assert_eq!(joined.nrows(), 2);
    assert_eq!(joined.ncols(), 2);
    assert_eq!(names(&joined, 3), vec!["b1"]);
    assert_eq!(joined.state(), Lifecycle::Closed);

    // B keeps its own numbering.
    assert_eq!(b.axes_list()[0].index(), 1);
}

#[test]
fn concat_of_empty_figures_keeps_one_row() {
    let (_, backend) = recorder();
    let a = figure(&backend, 3, &[]);
    let b = figure(&backend, 2, &[]);
    let joined = (&a + &b).unwrap();
    assert_eq!(joined.axes_count(), 0);
    assert_eq!(joined.nrows(), 1);
}

#[test]
fn merged_figures_can_be_saved() {
    let (_, backend) = recorder();
    let a = figure(&backend, 1, &[&["a1"]]);
    let b = figure(&backend, 1, &[&["b1"]]);
    let mut joined = (&(&a + &b).unwrap() * &a).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("joined.txt");
    joined.save(&path, 150).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("[1/2x1]"));
    assert!(text.contains("[2/2x1]"));
    assert_eq!(text.matches("line a1").count(), 2);
}

proptest! {
    #[test]
    fn concat_counts_and_numbering(ncols in 1usize..4, left in 0usize..6, right in 0usize..6) {
        let (_, backend) = recorder();
        let left_panels: Vec<&[&str]> = vec![&["l"]; left];
        let right_panels: Vec<&[&str]> = vec![&["r"]; right];
        let a = figure(&backend, ncols, &left_panels);
        let b = figure(&backend, 2, &right_panels);

        let joined = (&a + &b).unwrap();
        let total = left + right;
        prop_assert_eq!(joined.axes_count(), total);
        prop_assert_eq!(joined.nrows(), total.div_ceil(ncols).max(1));

        let indices: Vec<usize> = joined.axes_list().iter().map(|a| a.index()).collect();
        prop_assert_eq!(indices, (1..=total).collect::<Vec<_>>());
        for index in left + 1..=total {
            prop_assert_eq!(names(&joined, index), vec!["r".to_string()]);
        }
    }

    #[test]
    fn overlay_keeps_left_layout(left in 0usize..5, right in 0usize..5) {
        let (_, backend) = recorder();
        let left_panels: Vec<&[&str]> = vec![&["l"]; left];
        let right_panels: Vec<&[&str]> = vec![&["r"]; right];
        let a = figure(&backend, 2, &left_panels);
        let b = figure(&backend, 2, &right_panels);

        let merged = (&a * &b).unwrap();
        prop_assert_eq!(merged.axes_count(), left);
        prop_assert_eq!(merged.nrows(), a.nrows());
        for index in 1..=left {
            let expected = if index <= right { vec!["l", "r"] } else { vec!["l"] };
            prop_assert_eq!(names(&merged, index), expected);
        }
    }
}
