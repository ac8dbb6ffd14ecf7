//! Variable schema validation and value normalization
//!
//! Validation runs before a template is rendered for persistence.
//! Missing required variables are hard errors. Type checks are
//! advisory for number/date/currency (values often arrive as
//! pre-formatted display strings, e.g. currency with locale
//! separators); only boolean is enforced strictly.

use std::collections::HashMap;

use contract_types::{Variable, VariableType};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single validation finding.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationIssue {
    #[error("required variable '{name}' is missing")]
    MissingRequiredVariable { name: String },

    #[error("variable '{name}' does not look like a {expected} value")]
    TypeMismatch {
        name: String,
        expected: VariableType,
    },
}

/// Trimmed values ready for rendering, plus any advisory findings.
#[derive(Debug, Clone)]
pub struct NormalizedValues {
    pub values: HashMap<String, String>,
    /// Advisory type mismatches that did not block validation.
    pub warnings: Vec<ValidationIssue>,
}

/// Validate `values` against a template's declared schema.
///
/// On success returns the normalized values: every supplied string is
/// trimmed and absent non-required variables are filled with the empty
/// string. Hard errors (missing required variables, malformed
/// booleans) are collected and returned together so the operator sees
/// the full list at once.
pub fn validate_values(
    schema: &[Variable],
    values: &HashMap<String, String>,
) -> Result<NormalizedValues, Vec<ValidationIssue>> {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut normalized = HashMap::new();

    for var in schema {
        let supplied = values.get(&var.name).map(|v| v.trim());

        match supplied {
            None | Some("") => {
                if var.required {
                    errors.push(ValidationIssue::MissingRequiredVariable {
                        name: var.name.clone(),
                    });
                } else {
                    normalized.insert(var.name.clone(), String::new());
                }
            }
            Some(value) => {
                match type_check(var.var_type, value) {
                    TypeCheck::Ok => {}
                    TypeCheck::Advisory => warnings.push(ValidationIssue::TypeMismatch {
                        name: var.name.clone(),
                        expected: var.var_type,
                    }),
                    TypeCheck::Hard => errors.push(ValidationIssue::TypeMismatch {
                        name: var.name.clone(),
                        expected: var.var_type,
                    }),
                }
                normalized.insert(var.name.clone(), value.to_string());
            }
        }
    }

    // Values without a declared variable are kept trimmed; the renderer
    // only consumes names that appear as tokens anyway.
    for (name, value) in values {
        normalized
            .entry(name.clone())
            .or_insert_with(|| value.trim().to_string());
    }

    if errors.is_empty() {
        Ok(NormalizedValues {
            values: normalized,
            warnings,
        })
    } else {
        Err(errors)
    }
}

enum TypeCheck {
    Ok,
    Advisory,
    Hard,
}

fn type_check(var_type: VariableType, value: &str) -> TypeCheck {
    match var_type {
        VariableType::Text => TypeCheck::Ok,
        // Booleans feed conditional clauses downstream, so "trueish"
        // display strings are not acceptable.
        VariableType::Boolean => {
            if value == "true" || value == "false" {
                TypeCheck::Ok
            } else {
                TypeCheck::Hard
            }
        }
        // Numbers, dates and currency may arrive pre-formatted
        // ("1.250.000 VND", "01/01/2025"), so the check is lenient: at
        // least one digit somewhere.
        VariableType::Number | VariableType::Date | VariableType::Currency => {
            if value.chars().any(|c| c.is_ascii_digit()) {
                TypeCheck::Ok
            } else {
                TypeCheck::Advisory
            }
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: if every required variable has a non-blank value,
        /// validation succeeds.
        #[test]
        fn required_present_always_ok(
            names in prop::collection::hash_set("[a-z_]{1,10}", 1..6),
            value in "[a-z0-9]{1,10}",
        ) {
            let schema: Vec<Variable> = names
                .iter()
                .map(|n| Variable {
                    name: n.clone(),
                    var_type: VariableType::Text,
                    required: true,
                    description: None,
                })
                .collect();
            let values: HashMap<String, String> =
                names.iter().map(|n| (n.clone(), value.clone())).collect();

            prop_assert!(validate_values(&schema, &values).is_ok());
        }

        /// Property: every required variable left out is reported.
        #[test]
        fn missing_required_all_reported(
            names in prop::collection::hash_set("[a-z_]{1,10}", 1..6),
        ) {
            let schema: Vec<Variable> = names
                .iter()
                .map(|n| Variable {
                    name: n.clone(),
                    var_type: VariableType::Text,
                    required: true,
                    description: None,
                })
                .collect();

            let errors = validate_values(&schema, &HashMap::new()).unwrap_err();
            prop_assert_eq!(errors.len(), names.len());
        }
    }
}
