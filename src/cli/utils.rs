use std::io::{self, BufRead, Write};

use serde_json::{json, Value};
use crate::cli::OutputFormat;
use crate::error::ApiError;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(target), Some(Value::Object(extra))) = (response.as_object_mut(), data) {
                target.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(
    output_format: &OutputFormat,
    message: &str,
    error_code: Option<&str>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&error_response(message, error_code))?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Report a failed command, with the backend error code when there is one
pub fn output_failure(output_format: &OutputFormat, err: &anyhow::Error) -> anyhow::Result<()> {
    output_error(output_format, &format!("{:#}", err), error_code_of(err))
}

fn error_code_of(err: &anyhow::Error) -> Option<&'static str> {
    err.downcast_ref::<ApiError>().map(ApiError::error_code)
}

fn error_response(message: &str, error_code: Option<&str>) -> Value {
    let mut response = json!({
        "success": false,
        "error": message
    });

    if let Some(code) = error_code {
        response["error_code"] = json!(code);
    }
    response
}

/// Output an empty collection in the appropriate format
pub fn output_empty_collection(
    output_format: &OutputFormat,
    collection_name: &str,
    message: &str,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({
                collection_name: []
            }))?);
        }
        OutputFormat::Text => {
            println!("{}", message);
        }
    }
    Ok(())
}

/// Print a JSON document as-is
pub fn output_json(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Prompt on stderr and read one line from stdin, without the newline
pub fn prompt_line(prompt: &str) -> anyhow::Result<String> {
    eprint!("{}", prompt);
    io::stderr().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Use the provided value or prompt for it
pub fn value_or_prompt(provided: Option<String>, prompt: &str) -> anyhow::Result<String> {
    match provided {
        Some(value) => Ok(value),
        None => prompt_line(prompt),
    }
}

/// Ask a yes/no question, defaulting to no
pub fn confirm(question: &str) -> anyhow::Result<bool> {
    let answer = prompt_line(&format!("{} [y/N] ", question))?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// `1 role` / `2 roles`
pub fn plural(count: usize, one: &str, many: &str) -> String {
    format!("{} {}", count, if count == 1 { one } else { many })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yes_answers() {
        assert!(is_yes("y"));
        assert!(is_yes(" YES "));
        assert!(!is_yes(""));
        assert!(!is_yes("no"));
    }

    #[test]
    fn error_json_carries_code() {
        assert_eq!(
            error_response("Role not found", Some("NOT_FOUND")),
            json!({ "success": false, "error": "Role not found", "error_code": "NOT_FOUND" })
        );
        assert_eq!(error_response("Not logged in", None), json!({ "success": false, "error": "Not logged in" }));
    }

    #[test]
    fn error_code_found_through_context() {
        let err = anyhow::Error::new(ApiError::Unauthorized("expired".into())).context("Session expired");
        assert_eq!(error_code_of(&err), Some("UNAUTHORIZED"));
        assert_eq!(error_code_of(&anyhow::anyhow!("plain")), None);
    }

    #[test]
    fn pluralizes() {
        assert_eq!(plural(1, "access", "accesses"), "1 access");
        assert_eq!(plural(3, "access", "accesses"), "3 accesses");
        assert_eq!(plural(0, "role", "roles"), "0 roles");
    }
}
