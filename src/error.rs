//! Error types for the conversion engine.
//!
//! Every failure surfaces as a single [`Error`] value and aborts the whole
//! call; nothing is retried and no partially-built object graph is ever
//! returned. The variants separate two failure families that need different
//! fixes:
//!
//! - [`Error::Structure`] — the *schema* cannot support the request: a JSON
//!   key with no matching field, an assignment to an ignored field, a target
//!   kind with no rule for the given JSON variant class.
//! - [`Error::Data`] — the schema is fine but the *value* is not: a wrong
//!   JSON variant, an out-of-range number, an unknown enum variant name, a
//!   character string that is not exactly one character long.
//!
//! Custom-hook failures are re-wrapped as [`Error::Hook`] naming the owning
//! type, so the hook's own message survives as the source.

use thiserror::Error;

/// Represents all possible conversion failures.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The target type's schema cannot satisfy the request.
    #[error("structure error: {0}")]
    Structure(String),

    /// The JSON value does not fit the target type.
    #[error("data error: {0}")]
    Data(String),

    /// A custom conversion hook failed.
    #[error("custom conversion failed for {type_name}: {source}")]
    Hook {
        type_name: &'static str,
        #[source]
        source: Box<Error>,
    },

    /// Generic message.
    #[error("{0}")]
    Message(String),
}

impl Error {
    /// Creates a structure error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use json_auto::Error;
    ///
    /// let err = Error::structure("no field matches key \"fred\"");
    /// assert!(err.to_string().contains("fred"));
    /// ```
    pub fn structure(msg: impl Into<String>) -> Self {
        Error::Structure(msg.into())
    }

    /// Creates a data error.
    pub fn data(msg: impl Into<String>) -> Self {
        Error::Data(msg.into())
    }

    /// Wraps a custom-hook failure, naming the type that owns the hook.
    pub fn hook(type_name: &'static str, source: Error) -> Self {
        Error::Hook {
            type_name,
            source: Box::new(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hook_error_names_the_owner() {
        let err = Error::hook("DecHex", Error::data("inconsistent values"));
        let text = err.to_string();
        assert!(text.contains("DecHex"));
        assert!(text.contains("inconsistent values"));
    }
}
