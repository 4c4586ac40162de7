use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Write};
use std::path::PathBuf;
use tabula_solver::{Basis, Method, Observer, Silent, Solution, Solver, Status, Tableau};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "tabula")]
#[command(about = "Exact rational simplex solver with Gomory cutting planes", long_about = None)]
struct Cli {
    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a tableau stored as numerator and denominator files
    Solve {
        /// File of little-endian i32 numerators
        numerators: PathBuf,
        /// File of little-endian i32 denominators
        denominators: PathBuf,
        /// Tableau rows, objective row included
        rows: usize,
        /// Tableau columns, right-hand side included
        cols: usize,
        #[command(flatten)]
        options: SolveOptions,
    },
    /// Solve a JSON problem description (A, b, c, optional mode and basis)
    Problem {
        /// The problem file
        file: PathBuf,
        #[command(flatten)]
        options: SolveOptions,
    },
    /// Convert a JSON problem description into numerator and denominator files
    Pack {
        /// The problem file
        file: PathBuf,
        /// Output file for numerators
        numerators: PathBuf,
        /// Output file for denominators
        denominators: PathBuf,
    },
    /// Print a stored tableau
    Show {
        numerators: PathBuf,
        denominators: PathBuf,
        rows: usize,
        cols: usize,
    },
}

#[derive(clap::Args)]
struct SolveOptions {
    /// Method: S (simplex), TPS (two-phase), DS (dual simplex) or CP (cutting plane)
    #[arg(short, long)]
    method: Option<Method>,
    /// Starting basis, one 1-based column per constraint row
    #[arg(short, long, value_delimiter = ',')]
    basis: Option<Vec<usize>>,
    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Pretty)]
    format: Format,
    /// Do not print the iteration trace
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Pretty,
    Json,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Solve {
            numerators,
            denominators,
            rows,
            cols,
            options,
        } => {
            let tableau = match tabula_io::load_tableau(&numerators, &denominators, rows, cols) {
                Ok(t) => t,
                Err(e) => {
                    eprintln!("Load error: {}", e);
                    std::process::exit(1);
                }
            };
            let mut solver = Solver::new().with_method(options.method.unwrap_or_default());
            if let Some(basis) = &options.basis {
                solver = solver.with_basis(Basis::new(basis.clone()));
            }
            run(tableau, solver, &options);
        }
        Commands::Problem { file, options } => {
            let problem = match tabula_io::Problem::load(&file) {
                Ok(p) => p,
                Err(e) => {
                    eprintln!("Problem error: {}", e);
                    std::process::exit(1);
                }
            };
            let (tableau, mut solver) = match problem.tableau().and_then(|t| Ok((t, problem.solver()?))) {
                Ok(pair) => pair,
                Err(e) => {
                    eprintln!("Problem error: {}", e);
                    std::process::exit(1);
                }
            };
            // Command-line options win over the file.
            if let Some(method) = options.method {
                solver = solver.with_method(method);
            }
            if let Some(basis) = &options.basis {
                solver = solver.with_basis(Basis::new(basis.clone()));
            }
            run(tableau, solver, &options);
        }
        Commands::Pack {
            file,
            numerators,
            denominators,
        } => {
            let tableau = match tabula_io::Problem::load(&file).and_then(|p| p.tableau()) {
                Ok(t) => t,
                Err(e) => {
                    eprintln!("Problem error: {}", e);
                    std::process::exit(1);
                }
            };
            if let Err(e) = tabula_io::save_tableau(&tableau, &numerators, &denominators) {
                eprintln!("Write error: {}", e);
                std::process::exit(1);
            }
            println!(
                "Wrote {} x {} tableau to {} and {}",
                tableau.nr_rows() + 1,
                tableau.nr_columns() + 1,
                numerators.display(),
                denominators.display()
            );
        }
        Commands::Show {
            numerators,
            denominators,
            rows,
            cols,
        } => match tabula_io::load_tableau(&numerators, &denominators, rows, cols) {
            Ok(tableau) => {
                let basis = tabula_solver::search_starting_basis(&tableau);
                println!("{}", tabula_io::render_tableau(&tableau, basis.as_ref()));
            }
            Err(e) => {
                eprintln!("Load error: {}", e);
                std::process::exit(1);
            }
        },
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        std::process::exit(1);
    }
}

fn run(mut tableau: Tableau, solver: Solver, options: &SolveOptions) {
    let result = if options.quiet {
        solver.solve_observed(&mut tableau, &mut Silent)
    } else if options.format == Format::Json {
        // Keep stdout clean for the JSON document.
        trace(&solver, &mut tableau, io::stderr().lock())
    } else {
        trace(&solver, &mut tableau, io::stdout().lock())
    };

    let solution = match result {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Solve error: {}", e);
            std::process::exit(1);
        }
    };

    match options.format {
        Format::Json => match serde_json::to_string_pretty(&solution) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing solution: {}", e);
                std::process::exit(1);
            }
        },
        Format::Pretty => print_solution(&solver, &solution),
    }

    if solution.status != Status::Optimal {
        std::process::exit(1);
    }
}

fn trace<W: Write>(
    solver: &Solver,
    tableau: &mut Tableau,
    out: W,
) -> Result<Solution, tabula_solver::SolveError> {
    let mut printer = tabula_io::Printer::new(out);
    let result = solver.solve_observed(tableau, &mut printer as &mut dyn Observer<i32>);
    if let Err(e) = printer.finish() {
        eprintln!("Error writing trace: {}", e);
    }
    result
}

fn print_solution(solver: &Solver, solution: &Solution) {
    println!();
    println!("Method: {}", solver.method());
    match solution.status {
        Status::Optimal => {
            println!("Status: OPTIMAL");
            if let Some(cost) = &solution.objective_value {
                println!("Cost: {}", cost);
            }
            let basis: Vec<String> = solution.basis.iter().map(|col| format!("x[{}]", col)).collect();
            println!("Basis: {}", basis.join(" "));
            println!();
            println!("Values:");
            for (i, value) in solution.values.iter().enumerate() {
                println!("  x[{}] = {}", i + 1, value);
            }
            if solver.method() == Method::CuttingPlane {
                println!();
                println!("Cuts added: {}", solution.cuts);
            }
        }
        Status::Infeasible => {
            println!("Status: INFEASIBLE");
            println!("No solution exists that satisfies all constraints.");
        }
        Status::Unbounded => {
            println!("Status: UNBOUNDED");
            println!("The problem has no finite optimal solution.");
        }
    }
}
