use crate::solver::PropagationMode;
use clap::Parser;
use miette::{Diagnostic, Result};
use std::{io::Read, path::PathBuf};
use thiserror::Error;

#[derive(Debug, Parser)]
#[command(version, about = "A DPLL satisfiability solver for DIMACS CNF formulas")]
pub struct Args {
    /// Path to a DIMACS CNF file, reads from stdin when omitted
    pub input: Option<PathBuf>,

    /// Unit propagation strategy
    #[arg(long, value_enum, default_value_t = PropagationMode::Watched)]
    pub propagation: PropagationMode,
}

#[derive(Debug, Error, Diagnostic)]
pub enum InputError {
    #[error("Path {} does not exist", path.display())]
    FileDoesNotExist { path: PathBuf },

    #[error("{} is not a file", path.display())]
    NotAFile { path: PathBuf },

    #[error("Cannot read file {}: {}", path.display(), err)]
    CannotReadFile { path: PathBuf, err: std::io::Error },

    #[error("Cannot read from stdin: {}", err)]
    CannotReadStdIn { err: std::io::Error },
}

pub fn read_input(args: &Args) -> Result<Vec<u8>> {
    let Some(path) = &args.input else {
        tracing::info!("No input file provided, read from stdin");
        let mut buffer = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buffer)
            .map_err(|err| InputError::CannotReadStdIn { err })?;
        return Ok(buffer);
    };
    if !path.exists() {
        return Err(InputError::FileDoesNotExist { path: path.clone() }.into());
    }
    if !path.is_file() {
        return Err(InputError::NotAFile { path: path.clone() }.into());
    }
    let contents = std::fs::read(path)
        .map_err(|err| InputError::CannotReadFile { path: path.clone(), err })?;
    Ok(contents)
}
