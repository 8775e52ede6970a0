//! Contains the common [`ErrorKind`] trait used by all errors to display user-facing error
//! messages, and the [`Error`] type returned by every fallible operation of the symbolic kernel.
//!
//! Errors are raised against the textual form of the expression that could not be built, such as
//! `gamma(-2)` or `log(0)`. That text doubles as the source of the [`ariadne`] report, so a report
//! always highlights the whole offending expression.

use ariadne::{Color, Label, Report, ReportKind, Source};
use std::{any::Any, fmt::{self, Debug, Display}, io, ops::Range};

/// The color to use to highlight expressions.
pub const EXPR: Color = Color::RGB(52, 235, 152);

/// Represents any kind of error that can occur during some operation.
///
/// This trait is usually derived with `#[derive(ErrorKind)]` from the `cas-attrs` crate.
pub trait ErrorKind: Debug + Send + Sync {
    /// Returns the error as [`Any`], so that callers can inspect the concrete kind.
    fn as_any(&self) -> &dyn Any;

    /// The message displayed at the top of the report.
    fn message(&self) -> String;

    /// The text of the label pointing at the offending expression.
    fn label(&self) -> String {
        String::new()
    }

    /// Optional help text describing what the user can do about the error.
    fn help(&self) -> Option<String> {
        None
    }
}

/// An error associated with the expression it originated from.
#[derive(Debug)]
pub struct Error {
    /// The expression that this error originated from, in its displayed form.
    pub expr: String,

    /// The kind of error that occurred.
    pub kind: Box<dyn ErrorKind>,
}

impl Error {
    /// Creates a new error for the given expression text and kind.
    pub fn new(expr: impl ToString, kind: impl ErrorKind + 'static) -> Self {
        Self { expr: expr.to_string(), kind: Box::new(kind) }
    }

    /// Returns the concrete error kind if it is of type `K`.
    pub fn kind<K: ErrorKind + 'static>(&self) -> Option<&K> {
        self.kind.as_any().downcast_ref::<K>()
    }

    /// Returns true if the error kind is of type `K`.
    pub fn is<K: ErrorKind + 'static>(&self) -> bool {
        self.kind::<K>().is_some()
    }

    /// The span covering the whole expression.
    fn span(&self) -> Range<usize> {
        0..self.expr.len()
    }

    /// Build a report from this error kind.
    pub fn build_report<'a>(&self, src_id: &'a str) -> Report<(&'a str, Range<usize>)> {
        let mut label = Label::new((src_id, self.span())).with_color(EXPR);
        let label_str = self.kind.label();
        if !label_str.is_empty() {
            label = label.with_message(label_str);
        }

        let mut builder = Report::build(ReportKind::Error, src_id, 0)
            .with_message(self.kind.message())
            .with_label(label);

        if let Some(help) = self.kind.help() {
            builder.set_help(help);
        }

        builder.finish()
    }

    /// Writes the report for this error to the given writer, using the expression text as the
    /// report source.
    pub fn write_report<W: io::Write>(&self, src_id: &str, writer: W) -> io::Result<()> {
        self.build_report(src_id).write((src_id, Source::from(&self.expr)), writer)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.message(), self.expr)
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use cas_attrs::ErrorKind;
    use pretty_assertions::assert_eq;
    use super::*;

    #[derive(Debug, ErrorKind)]
    #[error(
        message = "complex infinity is not yet implemented",
        label = "this expression has a pole",
        help = format!("`{}` is singular here", function),
    )]
    struct Pole {
        function: &'static str,
    }

    #[derive(Debug, ErrorKind)]
    #[error(message = "something else went wrong")]
    struct Other;

    fn render(error: &Error) -> String {
        let mut out = Vec::new();
        error.write_report("input", &mut out).unwrap();
        String::from_utf8(strip_ansi_escapes::strip(out)).unwrap()
    }

    #[test]
    fn downcast_kind() {
        let error = Error::new("gamma(-2)", Pole { function: "gamma" });
        assert!(error.is::<Pole>());
        assert!(!error.is::<Other>());
        assert_eq!(error.kind::<Pole>().map(|k| k.function), Some("gamma"));
    }

    #[test]
    fn display_message() {
        let error = Error::new("gamma(-2)", Pole { function: "gamma" });
        assert_eq!(error.to_string(), "complex infinity is not yet implemented: gamma(-2)");
    }

    #[test]
    fn report_contents() {
        let error = Error::new("gamma(-2)", Pole { function: "gamma" });
        let report = render(&error);
        assert!(report.contains("complex infinity is not yet implemented"));
        assert!(report.contains("gamma(-2)"));
        assert!(report.contains("this expression has a pole"));
        assert!(report.contains("`gamma` is singular here"));
    }

    #[test]
    fn report_without_label() {
        let report = render(&Error::new("x", Other));
        assert!(report.contains("something else went wrong"));
    }
}
