use clap::Parser;
use clausium::{
    cli::{self, Args},
    dimacs::{DimacsParser, ExtendedParseError},
    Solver, SolverResult, Verdict,
};
use miette::Result;
use std::io::Cursor;

fn main() -> Result<SolverResult> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let contents = cli::read_input(&args)?;
    let reader = Cursor::new(&contents);

    let mut solver: Solver = match DimacsParser::new(reader).parse() {
        Ok(solver) => solver,
        Err(err) => Err(ExtendedParseError { source_code: contents, related: vec![err] })?,
    };
    solver.set_propagation(args.propagation);

    let verdict = solver.solve();
    match &verdict {
        Verdict::Sat(model) => println!("sat\n{model}"),
        Verdict::Unsat => println!("unsat"),
    }

    Ok(verdict.result())
}
