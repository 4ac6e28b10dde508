//! Macro-choice spec parsing
//!
//! Each `--define` argument describes one compile-time macro and the values
//! it may take, in the format `FOO=[BAR|BAZ]`. A brace-delimited group on
//! the left varies several macros in lockstep, with each choice supplying
//! one value per macro: `{TILE_M,TILE_N}=[{8,8}|{16,8}]`.

use thiserror::Error;

/// Error parsing a macro-choice string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// No `=` separating the macro group from its choices
    #[error("missing '=' in define spec '{0}'")]
    MissingEquals(String),

    /// Macro group side is empty (or contains an empty name)
    #[error("empty macro group in define spec '{0}'")]
    EmptyMacroGroup(String),

    /// Choice list is not wrapped in `[...]`
    #[error("choices must be a '[..]' list in define spec '{0}'")]
    MissingBrackets(String),

    /// A `{...}` group is opened but not closed, or closed but not opened
    #[error("unbalanced braces in '{group}' of define spec '{spec}'")]
    UnbalancedBraces { spec: String, group: String },

    /// No choices between the brackets
    #[error("no choices given in define spec '{0}'")]
    EmptyChoices(String),

    /// A linked choice's value count doesn't match the macro group
    #[error(
        "choice '{choice}' has {choice_arity} value(s) but the macro group has \
         {macro_arity} in define spec '{spec}'"
    )]
    ArityMismatch {
        spec: String,
        choice: String,
        macro_arity: usize,
        choice_arity: usize,
    },
}

/// One parsed `--define`: a macro group plus its allowed value tuples.
///
/// Invariant: every tuple in `choices` has exactly `macros.len()` values,
/// enforced at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefineSpec {
    macros: Vec<String>,
    choices: Vec<Vec<String>>,
}

impl DefineSpec {
    /// Parse a `FOO=[BAR|BAZ]` or `{A,B}=[{1,2}|{3,4}]` string.
    ///
    /// Pure function: no I/O, no side effects.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let (lhs, rhs) = input
            .split_once('=')
            .ok_or_else(|| ParseError::MissingEquals(input.to_string()))?;

        let macros = parse_group(input, lhs)?;
        if macros.iter().any(|m| m.is_empty()) {
            return Err(ParseError::EmptyMacroGroup(input.to_string()));
        }

        let choice_list = rhs
            .strip_prefix('[')
            .and_then(|r| r.strip_suffix(']'))
            .ok_or_else(|| ParseError::MissingBrackets(input.to_string()))?;
        if choice_list.is_empty() {
            return Err(ParseError::EmptyChoices(input.to_string()));
        }

        let mut choices = Vec::new();
        for choice in choice_list.split('|') {
            let values = parse_group(input, choice)?;
            if values.len() != macros.len() {
                return Err(ParseError::ArityMismatch {
                    spec: input.to_string(),
                    choice: choice.to_string(),
                    macro_arity: macros.len(),
                    choice_arity: values.len(),
                });
            }
            choices.push(values);
        }

        Ok(Self { macros, choices })
    }

    /// Macro names varied by this spec (length 1 unless linked).
    pub fn macros(&self) -> &[String] {
        &self.macros
    }

    /// Allowed value tuples, each of the same arity as `macros()`.
    pub fn choices(&self) -> &[Vec<String>] {
        &self.choices
    }

    /// Number of choices this spec contributes to the product.
    pub fn choice_count(&self) -> usize {
        self.choices.len()
    }
}

/// Split a bare name or a `{A,B}` group into its components.
fn parse_group(spec: &str, group: &str) -> Result<Vec<String>, ParseError> {
    let opened = group.starts_with('{');
    let closed = group.ends_with('}');
    // A one-character group can only be `{` or `}` alone, never both, so
    // opened && closed implies the slice below is in bounds.
    if opened != closed {
        return Err(ParseError::UnbalancedBraces {
            spec: spec.to_string(),
            group: group.to_string(),
        });
    }
    if opened {
        let inner = &group[1..group.len() - 1];
        Ok(inner.split(',').map(str::to_string).collect())
    } else {
        Ok(vec![group.to_string()])
    }
}
