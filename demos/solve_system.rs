use anyhow::Result;

fn load_yaml(path: &str) -> Result<pose_matrix::LinearSystem> {
    let file = std::fs::File::open(path)?;
    let system = pose_matrix::load(file)?;
    Ok(system)
}

fn display_system<T>(system: &T)
where
    T: std::fmt::Display,
{
    println!("We can print the system as a YAML string:\n");
    println!("{system}");
}

fn factorization_details(system: &pose_matrix::LinearSystem) -> Result<()> {
    println!("Description: {}", system.description().unwrap_or("None"));
    println!("Pivoting: {:?}", system.pivoting());

    let lu = pose_matrix::LuFactorization::with_strategy(
        system.coefficients().clone(),
        system.pivoting(),
    )?;

    // The factors are packed into a single matrix
    println!("\nPacked factors:\n{}", lu.factors());
    println!("L:\n{}", lu.lower());
    println!("U:\n{}", lu.upper());

    print!("Row permutation: [");
    for p in lu.pivots() {
        print!("{p}, ");
    }
    println!("]");
    Ok(())
}

fn solve_and_check(system: &pose_matrix::LinearSystem) -> Result<()> {
    println!("\nSolutions:\n");
    let solutions = system.solve()?;
    for (i, (b, x)) in system.rhs().iter().zip(solutions.iter()).enumerate() {
        let ax = system.coefficients().mul_vec(x)?;
        let residual = ax
            .iter()
            .zip(b)
            .map(|(lhs, rhs)| (lhs - rhs).abs())
            .fold(0.0, f64::max);
        println!("rhs {i}");
        println!("\tb: {b:?}");
        println!("\tx: {x:?}");
        println!("\tmax residual: {residual:e}");
    }
    Ok(())
}

fn do_work(path: &str) -> Result<()> {
    let system = load_yaml(path)?;

    display_system(&system);

    factorization_details(&system)?;

    solve_and_check(&system)?;

    Ok(())
}

fn main() {
    env_logger::init();
    let mut inputs = std::env::args().skip(1).peekable();
    if inputs.peek().is_none() {
        do_work("test-cases/valid/gaussian_kernel.yaml").unwrap();
    }
    for input in inputs {
        println!("processing file {input}");
        if let Err(e) = do_work(&input) {
            eprintln!("{input}: {e}");
        }
    }
}

#[test]
fn test_gaussian_kernel() {
    do_work("test-cases/valid/gaussian_kernel.yaml").unwrap();
}
