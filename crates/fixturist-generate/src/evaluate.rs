use serde_json::Value;

use fixturist_plan::FieldConstraint;

use crate::errors::GenerationError;

/// Produce a value for `path` that satisfies `constraint`.
///
/// Values from explicit directives are generated once and rejected on
/// mismatch. Anything else is regenerated until it passes, giving up after
/// `max_attempts` retries. A field that yields nothing is checked as `null`.
pub fn evaluate<F>(
    path: &str,
    constraint: &dyn FieldConstraint,
    explicit: bool,
    max_attempts: u32,
    mut generate: F,
) -> Result<Option<Value>, GenerationError>
where
    F: FnMut() -> Result<Option<Value>, GenerationError>,
{
    if explicit {
        let value = generate()?;
        if satisfies(constraint, value.as_ref()) {
            return Ok(value);
        }
        return Err(GenerationError::ConstraintConflict {
            path: path.to_string(),
            constraint: format!("{constraint:?}"),
        });
    }

    let mut attempt = 0_u32;
    loop {
        let value = generate()?;
        attempt += 1;
        if satisfies(constraint, value.as_ref()) {
            return Ok(value);
        }
        if attempt > max_attempts {
            return Err(GenerationError::ConstraintExhausted {
                path: path.to_string(),
                constraint: format!("{constraint:?}"),
                attempts: max_attempts,
            });
        }
    }
}

fn satisfies(constraint: &dyn FieldConstraint, value: Option<&Value>) -> bool {
    match value {
        Some(value) => constraint.is_valid(value),
        None => constraint.is_valid(&Value::Null),
    }
}
