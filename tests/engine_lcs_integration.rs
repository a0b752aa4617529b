use dp_stepper::{reference, Phase, StepEngine};

#[test]
fn skull_and_bones_matches_reference() {
    let (x, y) = ("skullandbones", "lullabybabies");
    let mut engine = StepEngine::new(x, y).unwrap();
    let steps = engine.run_to_end();
    assert_eq!(steps, engine.max_step_index());
    assert_eq!(engine.state().phase, Phase::Done);

    let xs: Vec<char> = x.chars().collect();
    let ys: Vec<char> = y.chars().collect();
    let expected = reference::lcs_length(&xs, &ys);
    assert_eq!(expected, 7);
    let (n, m) = (xs.len() as isize, ys.len() as isize);
    assert_eq!(engine.value_at(n - 1, m - 1).unwrap(), Some(expected));
    assert_eq!(engine.lcs_length(), Ok(expected));

    let lcs = engine.traceback().unwrap();
    let lcs_chars: Vec<char> = lcs.chars().collect();
    assert_eq!(lcs_chars.len() as u32, expected);
    assert!(reference::is_subsequence(&lcs_chars, &xs));
    assert!(reference::is_subsequence(&lcs_chars, &ys));
}

#[test]
fn every_interior_cell_matches_full_table() {
    let (x, y) = ("ACCGGTCGAGTGCGCGGAAGCCGGCCGAA", "GTCGTTCGGAATGCCGTTGCTCTGTAAA");
    let mut engine = StepEngine::new(x, y).unwrap();
    engine.run_to_end();
    let dp = reference::lcs_table(x.as_bytes(), y.as_bytes());
    for i in 0..x.len() {
        for j in 0..y.len() {
            assert_eq!(
                engine.value_at(i as isize, j as isize).unwrap(),
                Some(dp[i + 1][j + 1]),
                "cell ({i}, {j})"
            );
        }
    }
    assert_eq!(engine.lcs_length(), Ok(20));
}

#[test]
fn empty_x_reaches_done_with_zeros() {
    let mut engine = StepEngine::new("", "abc").unwrap();
    assert_eq!(engine.max_step_index(), 10);
    engine.run_to_end();
    assert!(engine.is_done());
    let snap = engine.snapshot_table();
    for row in -1..=0 {
        for col in -1..=3 {
            if let Some(v) = snap.get(row, col) {
                assert_eq!(v, 0, "cell ({row}, {col})");
            }
        }
    }
    assert_eq!(snap.filled(), 2 + 4);
    assert_eq!(engine.lcs_length(), Ok(0));
    assert_eq!(engine.traceback().as_deref(), Ok(""));
}

#[test]
fn empty_y_and_both_empty() {
    for (x, y) in [("abc", ""), ("", "")] {
        let mut engine = StepEngine::new(x, y).unwrap();
        engine.run_to_end();
        assert!(engine.is_done());
        assert_eq!(engine.lcs_length(), Ok(0));
        assert!(engine.current_value().is_err());
    }
}

#[test]
fn identical_inputs_give_full_length() {
    let s = "HELLO";
    let mut engine = StepEngine::new(s, s).unwrap();
    engine.run_to_end();
    assert_eq!(engine.lcs_length(), Ok(5));
    assert_eq!(engine.traceback().as_deref(), Ok(s));
}

#[test]
fn unicode_symbols_are_single_positions() {
    let mut engine = StepEngine::new("αβγ", "βγδ").unwrap();
    assert_eq!(engine.sequences().n(), 3);
    engine.run_to_end();
    assert_eq!(engine.traceback().as_deref(), Ok("βγ"));
}
