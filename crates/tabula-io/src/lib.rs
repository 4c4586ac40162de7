mod loader;
mod problem;
mod render;

pub use loader::{LoadError, Stream, load_tableau, read_tableau, save_tableau, write_tableau};
pub use problem::{Coefficient, Problem, ProblemError};
pub use render::{Printer, render_tableau};
