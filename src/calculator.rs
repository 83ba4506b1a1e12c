//! User-defined calculators: named inputs plus one formula over them.
//!
//! Storage is the caller's concern. This module checks a definition before it
//! is saved and turns raw input text into bindings when it is used.

use crate::ast::{variable_names, Bindings, Evaluator, Parser, SpannedToken, Token};
use crate::error::FormulaError;
use crate::functions::{self, constants};
use log::debug;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct InputField {
    pub id: String,
    /// The variable name the formula refers to.
    pub name: String,
    pub placeholder: String,
    pub default_value: Option<String>,
}

impl InputField {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        placeholder: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            placeholder: placeholder.into(),
            default_value: None,
        }
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}

/// A calculator definition before it has an id or timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculatorTemplate {
    pub name: String,
    pub description: Option<String>,
    pub inputs: Vec<InputField>,
    pub formula: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Calculator {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub inputs: Vec<InputField>,
    pub formula: String,
    /// Milliseconds since the Unix epoch.
    pub created_at: u64,
    pub updated_at: u64,
}

/// A reason a calculator definition cannot be saved.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DefinitionIssue {
    #[error("calculator name is required")]
    MissingName,

    #[error("at least one input field is required")]
    NoInputs,

    #[error("input {index} needs a name")]
    MissingInputName { index: usize },

    #[error("input name '{name}' must start with a letter and contain only letters, digits and '_'")]
    InvalidInputName { index: usize, name: String },

    #[error("input name '{name}' is reserved")]
    ReservedInputName { index: usize, name: String },

    #[error("input name '{name}' is used more than once")]
    DuplicateInputName { index: usize, name: String },

    #[error("formula is required")]
    MissingFormula,

    #[error("unknown variables: {}", .0.join(", "))]
    UnknownVariables(Vec<String>),

    #[error("invalid formula: {0}")]
    InvalidFormula(FormulaError),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalculatorError {
    #[error("missing values for: {}", .0.join(", "))]
    MissingValues(Vec<String>),

    #[error("invalid number for {input}: {value:?}")]
    InvalidNumber { input: String, value: String },

    #[error(transparent)]
    Formula(#[from] FormulaError),
}

impl Calculator {
    pub fn from_template(template: CalculatorTemplate, id: impl Into<String>, timestamp: u64) -> Self {
        Self {
            id: id.into(),
            name: template.name,
            description: template.description,
            inputs: template.inputs,
            formula: template.formula,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Replaces the definition, keeping the id and creation time.
    pub fn update(&mut self, template: CalculatorTemplate, timestamp: u64) {
        self.name = template.name;
        self.description = template.description;
        self.inputs = template.inputs;
        self.formula = template.formula;
        self.updated_at = timestamp;
    }

    pub fn input_names(&self) -> Vec<&str> {
        self.inputs.iter().map(|input| input.name.as_str()).collect()
    }

    /// Every problem that should block saving this definition. Empty means
    /// the calculator is usable.
    ///
    /// Formula checks only run once the inputs themselves are sound.
    pub fn check(&self) -> Vec<DefinitionIssue> {
        let mut issues = Vec::new();

        if self.name.trim().is_empty() {
            issues.push(DefinitionIssue::MissingName);
        }
        if self.inputs.is_empty() {
            issues.push(DefinitionIssue::NoInputs);
        }

        let mut seen: Vec<&str> = Vec::new();
        for (index, input) in self.inputs.iter().enumerate() {
            let name = input.name.as_str();
            let issue = if name.trim().is_empty() {
                Some(DefinitionIssue::MissingInputName { index })
            } else if !is_identifier(name) {
                Some(DefinitionIssue::InvalidInputName {
                    index,
                    name: name.to_string(),
                })
            } else if functions::is_function(name) || constants::is_constant(name) {
                Some(DefinitionIssue::ReservedInputName {
                    index,
                    name: name.to_string(),
                })
            } else if seen.contains(&name) {
                Some(DefinitionIssue::DuplicateInputName {
                    index,
                    name: name.to_string(),
                })
            } else {
                seen.push(name);
                None
            };
            issues.extend(issue);
        }

        if self.formula.trim().is_empty() {
            issues.push(DefinitionIssue::MissingFormula);
        } else if issues.is_empty() {
            if let Err(issue) = self.check_formula() {
                issues.push(issue);
            }
        }

        if !issues.is_empty() {
            debug!("Calculator {:?} has {} issue(s)", self.name, issues.len());
        }
        issues
    }

    fn check_formula(&self) -> Result<(), DefinitionIssue> {
        let tokens = Parser::tokenize(&self.formula).map_err(DefinitionIssue::InvalidFormula)?;
        let names = self.input_names();
        let unknown: Vec<String> = variable_names(&tokens)
            .into_iter()
            .filter(|variable| !names.contains(&variable.as_str()))
            .collect();
        if !unknown.is_empty() {
            return Err(DefinitionIssue::UnknownVariables(unknown));
        }

        let placeholders: Bindings = names.iter().map(|name| (name.to_string(), 1.0)).collect();
        Evaluator::uncached()
            .evaluate_expression(&self.formula, &placeholders)
            .map(|_| ())
            .map_err(DefinitionIssue::InvalidFormula)
    }

    /// Turns raw input text, keyed by input id, into bindings keyed by input
    /// name.
    ///
    /// A blank or absent value falls back to the input's default. Every input
    /// still without a value is reported together.
    pub fn bindings(&self, values: &HashMap<String, String>) -> Result<Bindings, CalculatorError> {
        let raw: Vec<(&InputField, Option<&str>)> = self
            .inputs
            .iter()
            .map(|input| (input, raw_value(input, values)))
            .collect();

        let missing: Vec<String> = raw
            .iter()
            .filter(|(_, value)| value.is_none())
            .map(|(input, _)| input.name.clone())
            .collect();
        if !missing.is_empty() {
            return Err(CalculatorError::MissingValues(missing));
        }

        let mut bindings = Bindings::with_capacity(raw.len());
        for (input, value) in raw {
            let value = value.unwrap_or_default();
            let number = value
                .parse::<f64>()
                .ok()
                .filter(|number| number.is_finite())
                .ok_or_else(|| CalculatorError::InvalidNumber {
                    input: input.name.clone(),
                    value: value.to_string(),
                })?;
            bindings.insert(input.name.clone(), number);
        }
        Ok(bindings)
    }

    /// Evaluates the formula against raw input text keyed by input id.
    pub fn calculate(
        &self,
        evaluator: &Evaluator,
        values: &HashMap<String, String>,
    ) -> Result<f64, CalculatorError> {
        let bindings = self.bindings(values)?;
        debug!("Calculating {:?} with {} inputs", self.name, bindings.len());
        Ok(evaluator.evaluate_expression(&self.formula, &bindings)?)
    }
}

fn raw_value<'a>(input: &'a InputField, values: &'a HashMap<String, String>) -> Option<&'a str> {
    let non_blank = |value: &'a String| Some(value.trim()).filter(|value| !value.is_empty());
    values
        .get(&input.id)
        .and_then(non_blank)
        .or_else(|| input.default_value.as_ref().and_then(non_blank))
}

/// Whether `name` lexes as exactly one identifier.
fn is_identifier(name: &str) -> bool {
    matches!(
        Parser::tokenize(name).as_deref(),
        Ok([SpannedToken { token: Token::Identifier(identifier), .. }]) if identifier == name
    )
}
