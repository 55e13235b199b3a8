use serde::Serialize;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::error::{AppError, AppResult};

/// One failed constraint on one field, reported with the field's JSON name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

/// Run the record's declarative constraints and collect every violation.
pub fn check<T: Validate>(record: &T) -> Result<(), Vec<FieldViolation>> {
    record.validate().map_err(violations)
}

/// Same as [`check`], mapped into the API error taxonomy.
pub fn ensure_valid<T: Validate>(record: &T) -> AppResult<()> {
    check(record).map_err(AppError::InvalidFields)
}

fn violations(errors: ValidationErrors) -> Vec<FieldViolation> {
    let mut out = Vec::new();
    collect(&errors, "", &mut out);
    // errors() is a HashMap
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}

fn collect(errors: &ValidationErrors, prefix: &str, out: &mut Vec<FieldViolation>) {
    for (field, kind) in errors.errors() {
        let field = format!("{}{}", prefix, camel_case(field));
        match kind {
            ValidationErrorsKind::Field(errs) => {
                out.extend(errs.iter().map(|e| FieldViolation {
                    field: field.clone(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                }));
            }
            ValidationErrorsKind::Struct(inner) => {
                collect(inner, &format!("{}.", field), out);
            }
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect(inner, &format!("{}[{}].", field, index), out);
                }
            }
        }
    }
}

fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Validate)]
    struct Sample {
        #[validate(range(min = 1, max = 10, message = "must be between 1 and 10"))]
        mood_level: i32,
        #[validate(range(min = 1, max = 10))]
        stress_level: Option<i32>,
    }

    #[test]
    fn test_collects_all_violations_with_json_names() {
        let sample = Sample {
            mood_level: 11,
            stress_level: Some(0),
        };
        let found = check(&sample).unwrap_err();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].field, "moodLevel");
        assert_eq!(found[0].message, "must be between 1 and 10");
        assert_eq!(found[1].field, "stressLevel");
        assert_eq!(found[1].message, "range");
    }

    #[test]
    fn test_absent_optional_fields_pass() {
        let sample = Sample {
            mood_level: 5,
            stress_level: None,
        };
        assert!(check(&sample).is_ok());
    }
}
