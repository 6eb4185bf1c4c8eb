use crate::{ErrorLocation, ModelError};

/// **VALUE**: Verifies that `ErrorLocation::here()` captures this file with a real position.
///
/// **WHY THIS MATTERS**: Every error in the workspace carries an ErrorLocation. If capture
/// breaks, log lines for lock, IPC and lifecycle failures lose their only pointer back
/// into the code.
///
/// **BUG THIS CATCHES**: Would catch if `#[track_caller]` is dropped from `here()` and the
/// location starts pointing into `error_location.rs` of the error module instead.
#[test]
fn given_caller_when_here_called_then_captures_calling_file() {
    // GIVEN/WHEN: Capturing the location at this call site
    let location = ErrorLocation::here();

    // THEN: The tests file is recorded, not the error module
    assert!(
        location.file.contains("tests"),
        "Should capture caller file, got {}",
        location.file
    );
    assert!(location.line > 0, "Should capture line number");
    assert!(location.column > 0, "Should capture column number");
}

/// **VALUE**: Verifies that ErrorLocation Display formatting produces `[file:line:column]`.
///
/// **WHY THIS MATTERS**: All error Display impls append the location. A format change would
/// make every critical log line harder to read.
///
/// **BUG THIS CATCHES**: Would catch a Display rewrite that drops the brackets or a field.
#[test]
fn given_error_location_when_formatted_then_produces_bracketed_format() {
    // GIVEN: An ErrorLocation
    let location = ErrorLocation::here();

    // WHEN: Formatting as string
    let formatted = format!("{location}");

    // THEN: Should produce "[file:line:column]"
    assert!(formatted.starts_with('['), "Should start with '['");
    assert!(formatted.ends_with(']'), "Should end with ']'");
    assert!(
        formatted.contains(&format!(":{}:{}]", location.line, location.column)),
        "Should end with line and column"
    );
}

/// **VALUE**: Verifies that ModelError constructors record where they were called from.
///
/// **BUG THIS CATCHES**: Would catch if the constructor loses `#[track_caller]` and all
/// validation errors point into model_error.rs.
#[test]
fn given_model_error_constructor_when_called_then_location_is_call_site() {
    // WHEN: Building a validation error here
    let err = ModelError::validation("bad");

    // THEN: Location points at this test file
    match err {
        ModelError::Validation { location, message } => {
            assert_eq!(message, "bad");
            assert!(
                !location.file.contains("model_error.rs"),
                "Location should be the call site"
            );
        }
        other => panic!("Expected Validation, got {other:?}"),
    }
}
