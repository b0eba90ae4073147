use clap::Parser;
use matrix_mul::timing::{Stopwatch, Timings};
use matrix_mul::{Config, Error, Job, MatrixMul, Plan, serial};
use matrix_types::{Generator, Matrix};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: matrix-mul [-dr] -x val [-y val] [-z val] [-s t] [-n val] [-T]";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::parse();
    let plan = match config.plan() {
        Ok(plan) => plan,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("{}", USAGE);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&plan) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run(plan: &Plan) -> Result<(), Error> {
    let mut generator = Generator::new(plan.fill);
    let (inputs, result, timings) = match plan.job {
        Job::Product { rows, inner, cols } => {
            let mut a = Matrix::zeros(rows, inner)?;
            let mut b = Matrix::zeros(inner, cols)?;
            generator.fill(&mut a);
            generator.fill(&mut b);

            let stopwatch = Stopwatch::start();
            let c = if plan.serial {
                serial::multiply(&a, &b)?
            } else {
                MatrixMul::new(plan.workers).multiply(&a, &b)?
            };
            let timings = stopwatch.stop();

            (vec![("A", a), ("B", b)], ("C", c), timings)
        }
        Job::Power { n, rounds } => {
            let mut a = Matrix::zeros(n, n)?;
            generator.fill(&mut a);

            let stopwatch = Stopwatch::start();
            let b = if plan.serial {
                serial::square(&a, rounds)?
            } else {
                MatrixMul::new(plan.workers).square(&a, rounds)?
            };
            let timings = stopwatch.stop();

            (vec![("", a)], ("", b), timings)
        }
    };

    report(plan, &inputs, &result, &timings);
    Ok(())
}

fn report(plan: &Plan, inputs: &[(&str, Matrix)], result: &(&str, Matrix), timings: &Timings) {
    if plan.debug {
        for (name, matrix) in inputs {
            println!("-------------- original {}matrix ------------------", label(name));
            print!("{}", matrix);
        }
        let (name, matrix) = result;
        println!("--------------  result {}matrix ------------------", label(name));
        print!("{}", matrix);
    }

    if plan.timed {
        println!();
        println!("{}", timings);
    }
}

fn label(name: &str) -> String {
    if name.is_empty() {
        String::new()
    } else {
        format!("{} ", name)
    }
}
