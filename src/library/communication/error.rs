use std::error::Error;
use std::fmt::{self, Display, Formatter};

/// Type erased error which retains the error chain information
///
/// Flattens an error and all its [`sources`](Error::source) into a list of
/// human-readable causes. API facing code uses this to embed the underlying
/// cause of a failure in a response message without ever exposing a stack
/// trace or a debug representation to the caller.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct CauseChain(Vec<String>);

impl CauseChain {
    /// Creates a new instance from any error type
    pub fn new<E: Error + 'static>(error: &E) -> Self {
        (error as &(dyn Error + 'static)).into()
    }

    /// Consumes the chain and returns the underlying list of causes
    pub fn into_causes(self) -> Vec<String> {
        self.0
    }
}

#[cfg(test)]
impl CauseChain {
    fn new_with_causes(causes: Vec<String>) -> Self {
        Self(causes)
    }
}

impl Display for CauseChain {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "unknown error");
        }

        write!(f, "{}", self.0.join(": "))
    }
}

impl From<&(dyn Error + 'static)> for CauseChain {
    fn from(error: &(dyn Error + 'static)) -> Self {
        let mut source: Option<&(dyn Error + 'static)> = Some(error);
        let mut causes: Vec<String> = Vec::new();

        while let Some(error) = source {
            causes.push(error.to_string());
            source = error.source();
        }

        Self(causes)
    }
}

#[cfg(test)]
mod does {
    use super::*;
    use pretty_assertions::assert_eq;
    use thiserror::Error;

    #[derive(Error, Debug)]
    enum TestError {
        #[error("outer error")]
        Outer(#[source] std::num::ParseIntError),
    }

    #[test]
    fn handle_no_cause() {
        let chain = CauseChain::new_with_causes(Vec::new());
        assert_eq!(chain.to_string(), "unknown error");
    }

    #[test]
    fn collect_nested_causes() {
        let inner = "NaN".parse::<u64>().unwrap_err();
        let error = TestError::Outer(inner.clone());
        let chain = CauseChain::new(&error);

        assert_eq!(
            chain.into_causes(),
            vec!["outer error".to_string(), inner.to_string()]
        );
    }

    #[test]
    fn format_compactly() {
        let chain = CauseChain::new_with_causes(vec![
            String::from("cause1"),
            String::from("cause2"),
            String::from("cause3"),
        ]);

        assert_eq!(chain.to_string(), "cause1: cause2: cause3");
    }
}
