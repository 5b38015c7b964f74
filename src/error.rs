use std::borrow::Cow;

use swc_core::common::{errors::HANDLER, Span};

/// A violated macro contract.
///
/// Every failure of the transform is this one kind; the message is what the
/// build reports, anchored at `span` when the offending node has a real one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct MacroError {
    span: Span,
    message: Cow<'static, str>,
}

impl MacroError {
    pub fn new(span: Span, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Report through the diagnostics handler of the running SWC pass.
    pub fn emit(&self) {
        HANDLER.with(|handler| handler.struct_span_err(self.span, &self.message).emit());
    }
}

/// Fails with `message` unless `condition` holds.
pub(crate) fn invariant(
    condition: bool,
    span: Span,
    message: &'static str,
) -> Result<(), MacroError> {
    if condition {
        return Ok(());
    }
    Err(MacroError::new(span, message))
}

#[cfg(test)]
mod tests {
    use swc_core::common::DUMMY_SP;

    use super::*;

    #[test]
    fn displays_the_bare_message() {
        let err = MacroError::new(DUMMY_SP, "Can not find function to decorate");
        assert_eq!(err.to_string(), "Can not find function to decorate");
        assert_eq!(err.message(), "Can not find function to decorate");
    }

    #[test]
    fn invariant_passes_through_when_holding() {
        assert!(invariant(true, DUMMY_SP, "unused").is_ok());
        let err = invariant(false, DUMMY_SP, "Expression not found").unwrap_err();
        assert_eq!(err.message(), "Expression not found");
    }
}
