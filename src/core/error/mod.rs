use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigInvalidJson,
    ConfigInvalidValue,

    ValidationMissingArgument,
    ValidationInvalidArgument,

    ModuleNotFound,
    TargetNotFound,

    RewriteReadFailed,
    RewriteWriteFailed,
    RewritePermissionFailed,
    RewriteCollision,
    RewriteNotFound,

    GitCommandFailed,
    BuildCommandFailed,

    InternalIoError,
    InternalJsonError,
    InternalUnexpected,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ConfigInvalidJson => "config.invalid_json",
            ErrorCode::ConfigInvalidValue => "config.invalid_value",

            ErrorCode::ValidationMissingArgument => "validation.missing_argument",
            ErrorCode::ValidationInvalidArgument => "validation.invalid_argument",

            ErrorCode::ModuleNotFound => "module.not_found",
            ErrorCode::TargetNotFound => "target.not_found",

            ErrorCode::RewriteReadFailed => "rewrite.read_failed",
            ErrorCode::RewriteWriteFailed => "rewrite.write_failed",
            ErrorCode::RewritePermissionFailed => "rewrite.permission_failed",
            ErrorCode::RewriteCollision => "rewrite.collision",
            ErrorCode::RewriteNotFound => "rewrite.not_found",

            ErrorCode::GitCommandFailed => "git.command_failed",
            ErrorCode::BuildCommandFailed => "build.command_failed",

            ErrorCode::InternalIoError => "internal.io_error",
            ErrorCode::InternalJsonError => "internal.json_error",
            ErrorCode::InternalUnexpected => "internal.unexpected",
        }
    }

    /// Whether this code belongs to the tree rewrite engine.
    pub fn is_rewrite(&self) -> bool {
        matches!(
            self,
            ErrorCode::RewriteReadFailed
                | ErrorCode::RewriteWriteFailed
                | ErrorCode::RewritePermissionFailed
                | ErrorCode::RewriteCollision
                | ErrorCode::RewriteNotFound
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidJsonDetails {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidValueDetails {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub problem: String,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub hints: Vec<Hint>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotFoundDetails {
    pub id: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub available: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingArgumentDetails {
    pub args: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidArgumentDetails {
    pub field: String,
    pub problem: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tried: Option<Vec<String>>,
}

/// Path-level failure inside the rewrite engine.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewritePathDetails {
    pub path: String,
    pub operation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteCollisionDetails {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandFailedDetails {
    pub command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stderr: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalIoErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalJsonErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

fn to_details<T: Serialize>(details: T) -> Value {
    serde_json::to_value(details).unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            hints: Vec::new(),
        }
    }

    pub fn validation_missing_argument(args: Vec<String>) -> Self {
        Self::new(
            ErrorCode::ValidationMissingArgument,
            "Missing required argument",
            to_details(MissingArgumentDetails { args }),
        )
    }

    pub fn validation_invalid_argument(
        field: impl Into<String>,
        problem: impl Into<String>,
        id: Option<String>,
        tried: Option<Vec<String>>,
    ) -> Self {
        let problem = problem.into();
        let details = to_details(InvalidArgumentDetails {
            field: field.into(),
            problem: problem.clone(),
            id,
            tried,
        });

        Self::new(
            ErrorCode::ValidationInvalidArgument,
            format!("Invalid argument: {}", problem),
            details,
        )
    }

    pub fn module_not_found(id: impl Into<String>, available: Vec<String>) -> Self {
        let id = id.into();
        let hint = if available.is_empty() {
            "No modules are configured. Add entries under \"modules\" in rebrand.json".to_string()
        } else {
            format!("Configured modules: {}", available.join(", "))
        };
        Self::new(
            ErrorCode::ModuleNotFound,
            format!("Module '{}' not found", id),
            to_details(NotFoundDetails { id, available }),
        )
        .with_hint(hint)
        .with_hint("Run 'rebrand modules' to list configured modules")
    }

    pub fn target_not_found(id: impl Into<String>, available: Vec<String>) -> Self {
        let id = id.into();
        let hint = format!("Known targets: {}", available.join(", "));
        Self::new(
            ErrorCode::TargetNotFound,
            format!("Invalid target version: {}", id),
            to_details(NotFoundDetails { id, available }),
        )
        .with_hint(hint)
    }

    pub fn rewrite_read_failed(
        path: impl Into<String>,
        operation: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self::rewrite_path(ErrorCode::RewriteReadFailed, "Read failed", path, operation, Some(error.into()))
    }

    pub fn rewrite_write_failed(
        path: impl Into<String>,
        operation: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self::rewrite_path(ErrorCode::RewriteWriteFailed, "Write failed", path, operation, Some(error.into()))
    }

    pub fn rewrite_permission_failed(path: impl Into<String>, error: impl Into<String>) -> Self {
        Self::rewrite_path(
            ErrorCode::RewritePermissionFailed,
            "Failed to restore permissions",
            path,
            "set permissions",
            Some(error.into()),
        )
    }

    pub fn rewrite_not_found(path: impl Into<String>, operation: impl Into<String>) -> Self {
        Self::rewrite_path(ErrorCode::RewriteNotFound, "Path disappeared", path, operation, None)
    }

    fn rewrite_path(
        code: ErrorCode,
        summary: &str,
        path: impl Into<String>,
        operation: impl Into<String>,
        error: Option<String>,
    ) -> Self {
        let path = path.into();
        let operation = operation.into();
        let message = match &error {
            Some(e) => format!("{} ({} {}): {}", summary, operation, path, e),
            None => format!("{} ({} {})", summary, operation, path),
        };
        Self::new(
            code,
            message,
            to_details(RewritePathDetails {
                path,
                operation,
                error,
            }),
        )
    }

    pub fn rewrite_collision(from: impl Into<String>, to: impl Into<String>) -> Self {
        let from = from.into();
        let to = to.into();
        Self::new(
            ErrorCode::RewriteCollision,
            format!("Destination path already exists: {} (renaming {})", to, from),
            to_details(RewriteCollisionDetails { from, to }),
        )
        .with_hint("Rules rename onto an existing path; adjust the rule or remove the existing entry")
    }

    pub fn git_command_failed(details: CommandFailedDetails) -> Self {
        let message = format!("{} failed", details.command);
        Self::new(ErrorCode::GitCommandFailed, message, to_details(details))
    }

    pub fn build_command_failed(details: CommandFailedDetails) -> Self {
        let message = match details.exit_code {
            Some(code) => format!("{} failed (exit code {})", details.command, code),
            None => format!("{} failed", details.command),
        };
        let mut err = Self::new(ErrorCode::BuildCommandFailed, message, to_details(details));
        if let Some(127) = err.details.get("exitCode").and_then(Value::as_i64) {
            err = err.with_hint(
                "Command not found. Check that the build tool is installed and in PATH",
            );
        }
        err
    }

    pub fn config_invalid_json(path: impl Into<String>, err: serde_json::Error) -> Self {
        let details = to_details(ConfigInvalidJsonDetails {
            path: path.into(),
            error: err.to_string(),
        });

        Self::new(
            ErrorCode::ConfigInvalidJson,
            "Invalid JSON in configuration",
            details,
        )
    }

    pub fn config_invalid_value(
        key: impl Into<String>,
        value: Option<String>,
        problem: impl Into<String>,
    ) -> Self {
        let problem = problem.into();
        let details = to_details(ConfigInvalidValueDetails {
            key: key.into(),
            value,
            problem: problem.clone(),
        });

        Self::new(
            ErrorCode::ConfigInvalidValue,
            format!("Invalid configuration value: {}", problem),
            details,
        )
    }

    pub fn internal_io(error: impl Into<String>, context: Option<String>) -> Self {
        let details = to_details(InternalIoErrorDetails {
            error: error.into(),
            context,
        });

        Self::new(ErrorCode::InternalIoError, "IO error", details)
    }

    pub fn internal_json(error: impl Into<String>, context: Option<String>) -> Self {
        let details = to_details(InternalJsonErrorDetails {
            error: error.into(),
            context,
        });

        Self::new(ErrorCode::InternalJsonError, "JSON error", details)
    }

    pub fn internal_unexpected(error: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InternalUnexpected,
            "Unexpected error",
            serde_json::json!({ "error": error.into() }),
        )
    }

    pub fn with_hint(mut self, message: impl Into<String>) -> Self {
        self.hints.push(Hint {
            message: message.into(),
        });
        self
    }

    /// Attach an extra key to the details object, keeping the code intact.
    pub fn with_detail(mut self, key: &str, value: Value) -> Self {
        match &mut self.details {
            Value::Object(map) => {
                map.insert(key.to_string(), value);
            }
            other => {
                let previous = std::mem::take(other);
                let mut map = serde_json::Map::new();
                if !previous.is_null() {
                    map.insert("cause".to_string(), previous);
                }
                map.insert(key.to_string(), value);
                *other = Value::Object(map);
            }
        }
        self
    }

    pub fn with_message_prefix(mut self, prefix: impl AsRef<str>) -> Self {
        self.message = format!("{}: {}", prefix.as_ref(), self.message);
        self
    }
}
