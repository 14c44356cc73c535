/// Post-processing applied to every generated unit before it is compared and written.
#[derive(Default)]
pub enum SourceFormatter {
    /// Keeps the generated text as is.
    #[default]
    Identity,
    /// Pipes the generated text through `rustfmt`.
    Rustfmt(xshell::Shell),
}

impl SourceFormatter {
    pub fn rustfmt() -> Result<Self, xshell::Error> {
        Ok(Self::Rustfmt(xshell::Shell::new()?))
    }

    pub fn format(&self, code: String) -> Result<String, xshell::Error> {
        use xshell::cmd;

        let Self::Rustfmt(shell) = self else {
            return Ok(code);
        };

        let mut formatted = cmd!(shell, "rustfmt --edition 2021")
            .stdin(code.clone())
            .read()
            .inspect_err(|_| {
                tracing::error!("Failed to format file:\n{code}");
            })?;

        // `read` strips the final newline.
        formatted.push('\n');

        Ok(formatted)
    }
}

impl std::fmt::Debug for SourceFormatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identity => f.write_str("Identity"),
            Self::Rustfmt(_) => f.write_str("Rustfmt"),
        }
    }
}
