//! Integration tests for serial and parallel LU elimination
//!
//! Covers reconstruction accuracy, serial/parallel agreement for a range of
//! worker counts, the one-shot nature of elimination, and the degenerate
//! inputs (empty, 1x1, zero pivot).

use math_audio_lu::{
    EliminationEngine, EliminationMode, EngineState, LuError, MatrixStore, eliminate_parallel,
    eliminate_serial, random_diagonally_dominant, random_matrix, read_matrix,
    reconstruction_error, split_lu,
};
use std::io::Cursor;

fn factored_serial(input: &MatrixStore) -> MatrixStore {
    let mut m = input.clone();
    eliminate_serial(&mut m);
    m
}

fn factored_parallel(input: &MatrixStore, workers: usize) -> MatrixStore {
    let mut m = input.clone();
    eliminate_parallel(&mut m, workers).expect("parallel elimination should succeed");
    m
}

#[test]
fn serial_reconstructs_input() {
    for (n, seed) in [(2, 1), (5, 2), (17, 3), (64, 4)] {
        let input = random_diagonally_dominant(n, Some(seed)).unwrap();
        let lu = factored_serial(&input);
        let err = reconstruction_error(&input, &lu).unwrap();
        assert!(err < 1e-9, "n={n}: relative error {err}");
    }
}

#[test]
fn uniform_random_input_reconstructs() {
    // Uniform entries in [-10, 10): leading minors are non-zero with probability 1.
    let input = random_matrix(12, -10.0, 10.0, Some(99)).unwrap();
    let lu = factored_serial(&input);
    assert!(reconstruction_error(&input, &lu).unwrap() < 1e-9);
}

#[test]
fn factors_have_triangular_shape() {
    let input = random_diagonally_dominant(6, Some(11)).unwrap();
    let (l, u) = split_lu(&factored_serial(&input));
    for i in 0..6 {
        assert_eq!(l[[i, i]], 1.0);
        for j in i + 1..6 {
            assert_eq!(l[[i, j]], 0.0);
            assert_eq!(u[[j, i]], 0.0);
        }
    }
}

#[test]
fn parallel_is_bit_identical_to_serial() {
    let n = 33;
    let input = random_diagonally_dominant(n, Some(2024)).unwrap();
    let serial = factored_serial(&input);

    for workers in [1, 2, 3, 4, 8, n, n + 5] {
        let parallel = factored_parallel(&input, workers);
        assert!(
            parallel.bitwise_eq(&serial),
            "workers={workers}: max diff {}",
            parallel.max_abs_diff(&serial).unwrap()
        );
    }
}

#[test]
fn parallel_matches_serial_on_uniform_input() {
    let input = random_matrix(40, -1.0, 1.0, Some(5)).unwrap();
    let serial = factored_serial(&input);
    for workers in [2, 7] {
        assert!(factored_parallel(&input, workers).bitwise_eq(&serial));
    }
}

#[test]
fn huge_worker_count_matches_serial() {
    let input =
        MatrixStore::from_rows(&[[2.0, 1.0, 1.0], [4.0, 3.0, 3.0], [8.0, 7.0, 9.0]]).unwrap();
    let parallel = factored_parallel(&input, 100_000);
    assert!(parallel.bitwise_eq(&factored_serial(&input)));
    assert_eq!(parallel.as_slice(), &[2.0, 1.0, 1.0, 2.0, 1.0, 1.0, 4.0, 3.0, 2.0]);
}

#[test]
fn single_worker_equals_serial() {
    let input = random_matrix(9, -5.0, 5.0, Some(8)).unwrap();
    assert!(factored_parallel(&input, 1).bitwise_eq(&factored_serial(&input)));
}

#[test]
fn elimination_is_not_idempotent() {
    let input = MatrixStore::from_rows(&[[4.0, 3.0], [6.0, 3.0]]).unwrap();
    let once = factored_serial(&input);
    let twice = factored_serial(&once);
    assert!(!twice.bitwise_eq(&once));
    // Row 1 is re-eliminated with the stored multiplier: 1.5 / 4.
    assert_eq!(twice.as_slice(), &[4.0, 3.0, 0.375, -2.625]);
}

#[test]
fn worked_example_2x2_both_modes() {
    let input = MatrixStore::from_rows(&[[4.0, 3.0], [6.0, 3.0]]).unwrap();
    let expected = [4.0, 3.0, 1.5, -1.5];

    assert_eq!(factored_serial(&input).as_slice(), &expected);
    for workers in [1, 2, 4] {
        assert_eq!(factored_parallel(&input, workers).as_slice(), &expected);
    }
}

#[test]
fn zero_pivot_propagates_infinities_both_modes() {
    let input = MatrixStore::from_rows(&[[0.0, 1.0], [1.0, 1.0]]).unwrap();

    for m in [factored_serial(&input), factored_parallel(&input, 3)] {
        assert_eq!(m.get(0, 0), 0.0);
        assert_eq!(m.get(0, 1), 1.0);
        assert_eq!(m.get(1, 0), f64::INFINITY);
        assert_eq!(m.get(1, 1), f64::NEG_INFINITY);
    }
}

#[test]
fn zero_pivot_poisons_later_rounds_identically() {
    let input =
        MatrixStore::from_rows(&[[1.0, 2.0, 3.0], [2.0, 4.0, 1.0], [5.0, 1.0, 2.0]]).unwrap();
    let serial = factored_serial(&input);
    // Round 1 pivot is 4 - 2*2 = 0.
    assert_eq!(serial.get(1, 1), 0.0);
    assert!(serial.get(2, 1).is_infinite());
    assert!(serial.get(2, 2).is_infinite() || serial.get(2, 2).is_nan());
    assert!(factored_parallel(&input, 2).bitwise_eq(&serial));
}

#[test]
fn empty_matrix_both_modes() {
    let mut m = MatrixStore::new(0).unwrap();
    eliminate_serial(&mut m);
    eliminate_parallel(&mut m, 4).unwrap();
    assert!(m.is_empty());
    assert!(m.dump().trim().is_empty());
}

#[test]
fn one_by_one_unchanged() {
    let input = MatrixStore::from_rows(&[[-3.25]]).unwrap();
    assert_eq!(factored_serial(&input).as_slice(), &[-3.25]);
    assert_eq!(factored_parallel(&input, 4).as_slice(), &[-3.25]);
}

#[test]
fn invalid_worker_count_is_reported_before_work() {
    let mut m = MatrixStore::from_rows(&[[4.0, 3.0], [6.0, 3.0]]).unwrap();
    let err = eliminate_parallel(&mut m, 0).unwrap_err();
    assert!(err.is_config_error());
    assert!(matches!(err, LuError::InvalidWorkerCount { workers: 0 }));
    assert_eq!(m.as_slice(), &[4.0, 3.0, 6.0, 3.0]);
}

#[test]
fn engine_runs_each_mode_to_done() {
    let input = random_diagonally_dominant(10, Some(6)).unwrap();
    let mut results = Vec::new();
    for mode in [
        EliminationMode::Serial,
        EliminationMode::Parallel { workers: 3 },
    ] {
        let mut engine = EliminationEngine::new(mode);
        let mut m = input.clone();
        engine.run(&mut m).unwrap();
        assert_eq!(engine.state(), EngineState::Done);
        results.push(m);
    }
    assert!(results[0].bitwise_eq(&results[1]));
}

#[test]
fn independent_decompositions_run_concurrently() {
    let inputs: Vec<MatrixStore> = (0..4)
        .map(|seed| random_diagonally_dominant(20, Some(seed)).unwrap())
        .collect();
    let expected: Vec<MatrixStore> = inputs.iter().map(factored_serial).collect();

    std::thread::scope(|s| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|input| s.spawn(move || factored_parallel(input, 3)))
            .collect();
        for (handle, want) in handles.into_iter().zip(&expected) {
            assert!(handle.join().unwrap().bitwise_eq(want));
        }
    });
}

#[test]
fn dump_size_boundary() {
    let small = random_matrix(10, 0.0, 1.0, Some(1)).unwrap();
    let dump = small.dump();
    assert!(dump.ends_with("\n\n"));
    assert_eq!(dump.lines().count(), 11);
    assert!(dump.lines().take(10).all(|l| l.starts_with('\t')));

    let large = random_matrix(11, 0.0, 1.0, Some(1)).unwrap();
    assert!(large.dump().is_empty());
}

#[test]
fn loaded_matrix_factors_like_literal() {
    let loaded = read_matrix(Cursor::new("4 3\n6 3\n")).unwrap();
    assert_eq!(factored_parallel(&loaded, 2).as_slice(), &[4.0, 3.0, 1.5, -1.5]);
}

#[test]
fn micro_fixture_from_disk() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("data/micro.txt");
    let input = math_audio_lu::load_matrix(&path).unwrap();
    assert_eq!(input.size(), 4);

    let expected = [
        2.0, 1.0, 1.0, 0.0, //
        2.0, 1.0, 1.0, 1.0, //
        4.0, 3.0, 2.0, 2.0, //
        3.0, 4.0, 1.0, 2.0,
    ];
    assert_eq!(factored_serial(&input).as_slice(), &expected);
    assert_eq!(factored_parallel(&input, 4).as_slice(), &expected);
}
