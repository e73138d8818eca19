use glob::glob;

fn residuals_are_small(system: &pose_matrix::LinearSystem, solutions: &[Vec<f64>]) -> bool {
    system.rhs().iter().zip(solutions).all(|(b, x)| {
        let ax = system.coefficients().mul_vec(x).unwrap();
        ax.iter()
            .zip(b)
            .all(|(lhs, rhs)| (lhs - rhs).abs() <= 1e-10 * (1.0 + rhs.abs()))
    })
}

fn process_path(path: &str) -> (Vec<String>, Vec<String>) {
    let paths = glob(path).unwrap();
    let mut failures = vec![];
    let mut successes = vec![];
    for path in paths {
        let name = path.unwrap();
        let file = std::fs::File::open(name.clone()).unwrap();
        let solved = pose_matrix::load(file).and_then(|system| {
            let solutions = system.solve()?;
            Ok(residuals_are_small(&system, &solutions))
        });
        match solved {
            Ok(true) => successes.push(name.to_str().unwrap().to_owned()),
            Ok(false) | Err(_) => failures.push(name.to_str().unwrap().to_owned()),
        }
    }
    (successes, failures)
}

#[test]
fn solve_valid_systems() {
    let rv = process_path("test-cases/valid/*.yaml");
    assert!(!rv.0.is_empty());
    assert!(rv.1.is_empty(), "{:?}", rv.1);
}

#[test]
fn reject_invalid_systems() {
    let rv = process_path("test-cases/invalid/*.yaml");
    assert!(!rv.1.is_empty());
    assert!(rv.0.is_empty(), "{:?}", rv.0);
}

#[test]
fn three_by_three_solutions() {
    let file = std::fs::File::open("test-cases/valid/three_by_three.yaml").unwrap();
    let system = pose_matrix::load(file).unwrap();
    let solutions = system.solve().unwrap();
    let expected = [[1.0, 1.0, 1.0], [1.0, 0.0, 2.0]];
    for (x, e) in solutions.iter().zip(expected.iter()) {
        for (xi, ei) in x.iter().zip(e.iter()) {
            approx::assert_relative_eq!(*xi, *ei, epsilon = 1e-12);
        }
    }
}

#[test]
fn gaussian_kernel_inverse_is_symmetric() {
    // Solving against the identity columns gives the inverse.
    let file = std::fs::File::open("test-cases/valid/gaussian_kernel.yaml").unwrap();
    let system = pose_matrix::load(file).unwrap();
    let columns = system.solve().unwrap();
    for i in 0..system.dimension() {
        for j in 0..system.dimension() {
            approx::assert_relative_eq!(columns[i][j], columns[j][i], epsilon = 1e-10);
        }
    }
}

#[test]
fn signed_and_magnitude_fixtures_agree() {
    let load = |path: &str| pose_matrix::load(std::fs::File::open(path).unwrap()).unwrap();
    let signed = load("test-cases/valid/negative_column_signed.yaml");
    let magnitude = load("test-cases/valid/negative_column_magnitude.yaml");
    assert_eq!(signed.coefficients(), magnitude.coefficients());
    assert_ne!(signed.pivoting(), magnitude.pivoting());
    let x = signed.solve().unwrap();
    let y = magnitude.solve().unwrap();
    for (xi, yi) in x[0].iter().zip(y[0].iter()) {
        approx::assert_relative_eq!(*xi, *yi, epsilon = 1e-12);
    }
}

#[cfg(feature = "json")]
#[test]
fn json_input() {
    let json = r#"{"coefficients": [[2, 0], [0, 4]], "rhs": [[2, 2]], "pivoting": "magnitude"}"#;
    let system = pose_matrix::loads_json(json).unwrap();
    assert_eq!(system.solve().unwrap(), vec![vec![1.0, 0.5]]);
    let system = pose_matrix::load_json(json.as_bytes()).unwrap();
    assert_eq!(system.pivoting(), pose_matrix::PivotStrategy::Magnitude);
}
