//! Parser for the DIMACS CNF input file format.
//! The format specification is provided at <https://www.satcompetition.org/2009/format-benchmarks2009.html>.

use crate::literal::{Lit, Var};
use miette::{Diagnostic, SourceSpan};
use std::{
    io::{Bytes, Read},
    iter::Peekable,
};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
#[error("Cannot parse DIMACS")]
#[diagnostic()]
pub struct ExtendedParseError {
    #[source_code]
    pub source_code: Vec<u8>,

    #[related]
    pub related: Vec<ParseError>,
}

#[derive(Debug, Error, Diagnostic)]
pub enum ParseError {
    #[error("The underlying IO has failed")]
    IO(#[from] std::io::Error),

    #[error("Invalid header: {}", reason)]
    #[diagnostic()]
    InvalidHeader {
        reason: HeaderError,

        #[label]
        err_span: SourceSpan,
    },

    #[error("Unexpected end of file")]
    UnexpectedEndOfFile {
        #[label]
        err_span: SourceSpan,
    },

    #[error("Unexpected character")]
    #[diagnostic()]
    UnexpectedChar {
        #[label]
        err_span: SourceSpan,
    },

    #[error("Invalid integer")]
    InvalidInt {
        #[label]
        err_span: SourceSpan,
    },

    #[error("Literal {val} is out of bound")]
    LiteralOutOfBound {
        val: i64,

        #[label]
        err_span: SourceSpan,
    },

    #[error(
        "Number of clauses does not match header: expected {}, but found {} clauses",
        expected,
        found
    )]
    NumClausesMismatch { expected: u32, found: u32 },
}

#[derive(Debug, Error, Diagnostic)]
pub enum HeaderError {
    #[error("`p cnf` prefix missing or invalid")]
    InvalidPrefix,

    #[error("Invalid variable count")]
    InvalidVariableCount,

    #[error("Invalid clause count")]
    InvalidClauseCount,
}

/// An instance of an implementor can be derived from a textual representation
/// of a CNF formula in the DIMACS format.
pub trait FromDimacs: Default {
    fn set_num_variables(&mut self, variables: u32);
    fn set_num_clauses(&mut self, clauses: u32);
    fn add_clause(&mut self, lits: &[Lit]);
}

#[derive(Debug)]
pub struct DimacsParser<R: Read> {
    bytes: Peekable<Bytes<R>>,
    declared_clauses: Option<u32>,
    num_clauses_read: u32,

    offset: usize,
}

impl<R: Read> DimacsParser<R> {
    pub fn new(reader: R) -> Self {
        Self {
            bytes: reader.bytes().peekable(),
            declared_clauses: None,
            num_clauses_read: 0,
            offset: 0,
        }
    }

    /// Parses a DIMACS file and returns the representation `F`.
    ///
    /// # Errors
    ///
    /// This function will return an error if the read content is not valid DIMACS.
    /// The function propagates underlying IO failures.
    pub fn parse<F: FromDimacs>(&mut self) -> Result<F, ParseError> {
        let mut result = F::default();
        self.parse_preamble(&mut result)?;
        self.parse_clauses(&mut result)?;

        // check that number of clauses match the header, if one was given
        if let Some(expected) = self.declared_clauses {
            if self.num_clauses_read != expected {
                return Err(ParseError::NumClausesMismatch {
                    expected,
                    found: self.num_clauses_read,
                });
            }
        }

        Ok(result)
    }

    /// Comment lines `c ...` followed by an optional `p cnf ...` header.
    /// The header is optional as the clauses themselves determine the
    /// variable count; when present it is validated.
    fn parse_preamble<F: FromDimacs>(&mut self, result: &mut F) -> Result<(), ParseError> {
        while let Some(b) = self.skip_whitespace_and_peek()? {
            match b {
                b'c' => {
                    // start of a comment line, ignore remaining line
                    self.skip_line()?;
                }
                b'p' => {
                    // `p cnf [NUM_VARIABLES] [NUM_CLAUSES]` header
                    self.expect(&b"p cnf"[..]).map_err(|_| ParseError::InvalidHeader {
                        reason: HeaderError::InvalidPrefix,
                        err_span: self.err_span(),
                    })?;

                    // parse variable count
                    self.skip_whitespace_and_peek()?.ok_or_else(|| {
                        ParseError::UnexpectedEndOfFile { err_span: self.err_span() }
                    })?;
                    let num_variables: u32 =
                        self.parse_int().map_err(|err| ParseError::InvalidHeader {
                            reason: HeaderError::InvalidVariableCount,
                            err_span: err.err_span().unwrap_or_else(|| self.err_span()),
                        })?;
                    if i64::from(num_variables) > i64::from(Var::MAX_VAR.to_dimacs()) {
                        return Err(ParseError::InvalidHeader {
                            reason: HeaderError::InvalidVariableCount,
                            err_span: self.err_span(),
                        });
                    }

                    // parse clause count
                    self.skip_whitespace_and_peek()?.ok_or_else(|| {
                        ParseError::UnexpectedEndOfFile { err_span: self.err_span() }
                    })?;
                    let num_clauses: u32 =
                        self.parse_int().map_err(|err| ParseError::InvalidHeader {
                            reason: HeaderError::InvalidClauseCount,
                            err_span: err.err_span().unwrap_or_else(|| self.err_span()),
                        })?;

                    self.declared_clauses = Some(num_clauses);
                    result.set_num_variables(num_variables);
                    result.set_num_clauses(num_clauses);
                    return Ok(());
                }
                b'-' | (b'0'..=b'9') => {
                    // no header, clauses start immediately
                    return Ok(());
                }
                _ => return Err(ParseError::UnexpectedChar { err_span: self.err_offset().into() }),
            }
        }
        Ok(())
    }

    /// Parses clauses until EOF. Comment and problem lines between clauses
    /// are skipped, a clause without literals is dropped.
    fn parse_clauses<F: FromDimacs>(&mut self, result: &mut F) -> Result<(), ParseError> {
        let mut clause = Vec::new();
        while let Some(b) = self.skip_whitespace_and_peek()? {
            if b == b'c' || b == b'p' {
                self.skip_line()?;
                continue;
            }
            clause.clear();
            loop {
                self.skip_whitespace_and_peek()?
                    .ok_or_else(|| ParseError::UnexpectedEndOfFile { err_span: self.err_span() })?;
                let start_offset = self.err_offset();
                let lit: i32 = self.parse_int()?;
                if lit == 0 {
                    break;
                }
                if !(Lit::MIN_LIT.to_dimacs()..=Lit::MAX_LIT.to_dimacs()).contains(&lit) {
                    return Err(ParseError::LiteralOutOfBound {
                        val: lit.into(),
                        err_span: (start_offset..self.err_offset()).into(),
                    });
                }
                clause.push(Lit::from_dimacs(lit));
            }
            self.num_clauses_read += 1;
            if !clause.is_empty() {
                result.add_clause(&clause);
            }
        }
        Ok(())
    }

    /// Consumes the next byte in the input.
    /// Returns the byte or `None` in the case of EOF.
    fn next_byte(&mut self) -> Result<Option<u8>, ParseError> {
        let byte = self.bytes.next().transpose()?;
        if byte.is_some() {
            self.offset += 1;
        }
        Ok(byte)
    }

    /// Returns the next byte value without consuming.
    fn peek_byte(&mut self) -> Option<u8> {
        match self.bytes.peek() {
            Some(Ok(b)) => Some(*b),
            _ => None,
        }
    }

    /// Consumes input up to and including the next line break.
    fn skip_line(&mut self) -> Result<(), ParseError> {
        while let Some(b) = self.next_byte()? {
            if b == b'\n' {
                break;
            }
        }
        Ok(())
    }

    /// Skips input bytes until a non-ASCII whitespace character is found.
    /// Returns the first non-ASCII whitespace character (if not EOF).
    fn skip_whitespace_and_peek(&mut self) -> Result<Option<u8>, ParseError> {
        while let Some(b) = self.peek_byte() {
            if !b.is_ascii_whitespace() {
                return Ok(Some(b));
            }
            self.next_byte()?;
        }
        Ok(None)
    }

    fn expect(&mut self, value: &[u8]) -> Result<(), ParseError> {
        for (&expected, found) in value.iter().zip(&mut self.bytes) {
            let found = found?;
            self.offset += 1;
            if found != expected {
                return Err(ParseError::UnexpectedChar { err_span: self.err_offset().into() });
            }
        }
        Ok(())
    }

    fn parse_int<I>(&mut self) -> Result<I, ParseError>
    where
        I: TryFrom<i64>,
    {
        let start_span = self.err_offset();
        let mut parsed: i64 = 0;
        let mut is_negated = false;
        while let Some(b) = self.next_byte()? {
            match b {
                b'-' => {
                    if is_negated {
                        return Err(ParseError::InvalidInt { err_span: self.err_span() });
                    }
                    is_negated = true;
                }
                b @ b'0'..=b'9' => {
                    let val = i64::from(b - b'0');
                    parsed = if let Some(parsed) =
                        parsed.checked_mul(10).and_then(|res| res.checked_add(val))
                    {
                        parsed
                    } else {
                        // overflow while parsing integer
                        return Err(ParseError::InvalidInt {
                            err_span: (start_span..self.err_offset()).into(),
                        });
                    }
                }
                b => {
                    if !b.is_ascii_whitespace() {
                        return Err(ParseError::InvalidInt {
                            err_span: (start_span..self.err_offset()).into(),
                        });
                    }
                    break;
                }
            }
        }
        if is_negated {
            parsed = -parsed;
        }
        I::try_from(parsed).map_err(|_| {
            ParseError::LiteralOutOfBound {
                val: parsed,
                // reduce end offset by one, as last byte was a whitespace
                err_span: (start_span..self.err_offset().saturating_sub(1)).into(),
            }
        })
    }

    fn err_offset(&self) -> usize {
        self.offset
    }

    fn err_span(&self) -> SourceSpan {
        self.offset.saturating_sub(1).into()
    }
}

impl ParseError {
    fn err_span(&self) -> Option<SourceSpan> {
        match self {
            ParseError::InvalidInt { err_span }
            | ParseError::LiteralOutOfBound { err_span, .. } => Some(*err_span),
            _ => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::cnf::Cnf;
    use proptest::prelude::*;
    use std::io::Cursor;

    proptest! {
        #[test]
        fn doesnt_crash(s in ".*") {
            let reader = Cursor::new(s);
            let _cnf: Option<Cnf> = DimacsParser::new(reader).parse().ok();
        }

        #[test]
        fn roundtrip_from_cnf(input in crate::cnf::strategy::cnf(100, 0..40, 1..10)) {
            let dimacs = format!("{input}");
            let reader = Cursor::new(dimacs);
            let parsed: Cnf = DimacsParser::new(reader).parse()?;
            assert_eq!(parsed, input);
        }
    }

    macro_rules! expect_error {
        ( $input:expr, $pat:pat ) => {
            let reader = std::io::Cursor::new(&$input);
            match DimacsParser::new(reader).parse::<crate::cnf::Cnf>() {
                Ok(parsed) => panic!("Expected error but got {:?}", parsed),
                Err(err) => match err {
                    $pat => (),
                    _ => panic!("Unexpected error {:?}", err),
                },
            }
        };
    }

    #[test]
    fn minimal() -> Result<(), ParseError> {
        let dimacs = "p cnf 0 0";
        let reader = Cursor::new(dimacs);
        let cnf: Cnf = DimacsParser::new(reader).parse()?;
        assert_eq!(cnf.num_clauses(), 0);
        Ok(())
    }

    #[test]
    fn no_header() -> Result<(), ParseError> {
        let dimacs = "1 2 3 0\n-1 -2 0\n";
        let reader = Cursor::new(dimacs);
        let cnf: Cnf = DimacsParser::new(reader).parse()?;
        assert_eq!(cnf.num_clauses(), 2);
        assert_eq!(cnf.num_vars(), 3);
        Ok(())
    }

    #[test]
    fn simple() -> Result<(), ParseError> {
        let dimacs = "
		c satisfiable.cnf
		p cnf 3 4
		-1 2 -3 0
		2 3 0
		-2 3 0
		1 3 0
		";
        let reader = Cursor::new(dimacs);
        let cnf: Cnf = DimacsParser::new(reader).parse()?;
        assert_eq!(cnf.num_clauses(), 4);
        assert_eq!(cnf.num_vars(), 3);
        Ok(())
    }

    #[test]
    fn comments_between_clauses() -> Result<(), ParseError> {
        let dimacs = "p cnf 2 2\nc first\n1 2 0\nc second\n-1 0\n";
        let reader = Cursor::new(dimacs);
        let cnf: Cnf = DimacsParser::new(reader).parse()?;
        assert_eq!(cnf.num_clauses(), 2);
        Ok(())
    }

    #[test]
    fn empty_clause_is_dropped() -> Result<(), ParseError> {
        let dimacs = "p cnf 2 2\n0\n1 2 0\n";
        let reader = Cursor::new(dimacs);
        let cnf: Cnf = DimacsParser::new(reader).parse()?;
        assert_eq!(cnf.num_clauses(), 1);
        Ok(())
    }

    #[test]
    fn header_var_count_is_respected() -> Result<(), ParseError> {
        let dimacs = "p cnf 10 1\n1 2 0\n";
        let reader = Cursor::new(dimacs);
        let cnf: Cnf = DimacsParser::new(reader).parse()?;
        assert_eq!(cnf.num_vars(), 10);
        Ok(())
    }

    #[test]
    fn out_of_bound() {
        // i32::MAX = 2147483647 is the largest representable literal
        // i32::MIN = -2147483648 is not a valid literal
        expect_error!(b"p cnf 0 0\n1 2147483648 3 0", ParseError::LiteralOutOfBound { .. });
        expect_error!(b"p cnf 0 0\n1 -2147483648 3 0", ParseError::LiteralOutOfBound { .. });
    }

    #[test]
    fn end_of_file() {
        expect_error!(b"p cnf 0 0\n1 2 3 0\n-1 2 3", ParseError::UnexpectedEndOfFile { .. });
    }

    #[test]
    fn header() -> Result<(), ParseError> {
        let dimacs = "p cnf     10      0";
        let reader = Cursor::new(dimacs);
        let _cnf: Cnf = DimacsParser::new(reader).parse()?;

        expect_error!(
            b"p dnf 2 2",
            ParseError::InvalidHeader { reason: HeaderError::InvalidPrefix, .. }
        );
        expect_error!(
            b"pcnf 2 2",
            ParseError::InvalidHeader { reason: HeaderError::InvalidPrefix, .. }
        );
        expect_error!(
            b"p cnf -2 2",
            ParseError::InvalidHeader { reason: HeaderError::InvalidVariableCount, .. }
        );
        expect_error!(
            b"p cnf 2 -2",
            ParseError::InvalidHeader { reason: HeaderError::InvalidClauseCount, .. }
        );
        Ok(())
    }

    #[test]
    fn num_clauses() {
        expect_error!(
            b"p cnf 3 2\n1 -2 0\n2 -3 0\n3 -1 0\n",
            ParseError::NumClausesMismatch { expected: 2, found: 3 }
        );
    }
}
