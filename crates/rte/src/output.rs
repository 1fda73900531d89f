//! Terminal output.
//!
//! Rendered HTML goes to stdout; status messages go to stderr so the
//! fragment can be piped or redirected cleanly.

use std::io::Write;

use console::{Style, Term};

/// Status output on stderr.
pub(crate) struct Output {
    term: Term,
    ok: Style,
    warn: Style,
    err: Style,
    label: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            ok: Style::new().green(),
            warn: Style::new().yellow(),
            err: Style::new().red(),
            label: Style::new().cyan().bold(),
        }
    }

    /// `label: value`, label highlighted.
    pub(crate) fn field(&self, label: &str, value: &str) {
        let _ = self
            .term
            .write_line(&format!("{} {value}", self.label.apply_to(format!("{label}:"))));
    }

    pub(crate) fn success(&self, msg: &str) {
        let _ = self.term.write_line(&self.ok.apply_to(msg).to_string());
    }

    pub(crate) fn warning(&self, msg: &str) {
        let _ = self.term.write_line(&self.warn.apply_to(msg).to_string());
    }

    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&self.err.apply_to(msg).to_string());
    }

    /// Write a rendered fragment to stdout.
    pub(crate) fn html(html: &str) -> std::io::Result<()> {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(html.as_bytes())?;
        stdout.write_all(b"\n")?;
        stdout.flush()
    }
}
