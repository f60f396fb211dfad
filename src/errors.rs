//! spec.md 7: one error kind per phase, rendered as the single diagnostic line the CLI prints
//! to stderr before exiting non-zero. Internal functions propagate with `anyhow::Result` and
//! attach phase context with `.context(...)`; at the phase boundary that context is folded
//! into one of these variants.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("parse error: {0}")]
    Parse(String),
    #[error("translate error: {0}")]
    Translate(String),
    #[error("automaton error: {0}")]
    Automaton(String),
    #[error("compile error: {0}")]
    Compile(String),
    #[error("emit error: {0}")]
    Emit(String),
}

impl CompileError {
    pub fn parse(err: anyhow::Error) -> Self {
        CompileError::Parse(format!("{err:#}"))
    }
    pub fn translate(err: anyhow::Error) -> Self {
        CompileError::Translate(format!("{err:#}"))
    }
    pub fn automaton(err: anyhow::Error) -> Self {
        CompileError::Automaton(format!("{err:#}"))
    }
    pub fn compile(err: anyhow::Error) -> Self {
        CompileError::Compile(format!("{err:#}"))
    }
    pub fn emit(err: anyhow::Error) -> Self {
        CompileError::Emit(format!("{err:#}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_phase() {
        let e = CompileError::automaton(anyhow::anyhow!("missing initial state"));
        assert_eq!(e.to_string(), "automaton error: missing initial state");
    }
}
