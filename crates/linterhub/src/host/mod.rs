//! Terminal implementations of the host capabilities.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use linterhub_integration::{CallError, Diagnostic, DiagnosticsSink, HostCapabilities, TracingLogger};

mod tracker;

pub use tracker::SpinnerStatus;

pub fn capabilities(project: &Path) -> HostCapabilities {
    HostCapabilities {
        logger:      Arc::new(TracingLogger),
        status:      Arc::new(SpinnerStatus::default()),
        diagnostics: Arc::new(PrintSink),
        paths:       Arc::new(relative_to(project.to_path_buf())),
    }
}

/// Prints analysis output as pretty JSON on stdout.
pub struct PrintSink;

impl PrintSink {
    fn parse(output: &str) -> Result<Vec<Diagnostic>, CallError> {
        match serde_json::from_str(output) {
            Ok(Diagnostic::Array(items)) => Ok(items),
            Ok(Diagnostic::Null) => Ok(Vec::new()),
            Ok(other) => Ok(vec![other]),
            Err(e) => Err(CallError::Diagnostics(e.to_string())),
        }
    }
}

impl DiagnosticsSink for PrintSink {
    fn publish(&self, output: &str, document: Option<&str>) -> Result<Vec<Diagnostic>, CallError> {
        let diagnostics = Self::parse(output)?;
        if let Some(document) = document {
            println!("# {document}");
        }
        for diagnostic in &diagnostics {
            let pretty = serde_json::to_string_pretty(diagnostic).map_err(CallError::Json)?;
            println!("{pretty}");
        }
        Ok(diagnostics)
    }
}

/// Paths under `project` become project-relative; separators become `/`.
pub fn relative_to(project: PathBuf) -> impl Fn(&str) -> String + Send + Sync {
    move |raw: &str| {
        let path = Path::new(raw);
        path.strip_prefix(&project)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_to_project() {
        let project = tempfile::tempdir().unwrap();
        let normalize = relative_to(project.path().to_path_buf());
        let inside = project.path().join("src").join("a.js");
        assert_eq!(normalize(&inside.to_string_lossy()), "src/a.js");
        assert_eq!(normalize("lib\\b.js"), "lib/b.js");
    }

    #[test]
    fn test_sink_accepts_array_object_and_null() {
        assert_eq!(PrintSink::parse(r#"[{"a":1},{"b":2}]"#).unwrap().len(), 2);
        assert_eq!(PrintSink::parse(r#"{"a":1}"#).unwrap().len(), 1);
        assert!(PrintSink::parse("null").unwrap().is_empty());
        assert!(matches!(PrintSink::parse("oops"), Err(CallError::Diagnostics(_))));
    }
}
