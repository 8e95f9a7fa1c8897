//! Workflow commands understood by the Actions runner.

/// Escape a message for use as workflow command data.
fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Equivalent of `core.setFailed`: annotate the step with the error. The
/// caller is responsible for the non-zero exit.
pub fn set_failed(message: &str) {
    println!("::error::{}", escape_data(message));
}
