use clap::ValueEnum;

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub(crate) enum LogLevel {
    /// Completely disables logging
    Off,
    /// Only errors from the generator
    Error,
    /// Warnings and errors from the generator
    Warn,
    /// Info, warning and error messages from the generator
    #[default]
    Info,
    /// Debug, info, warning and error messages from the generator
    Debug,
    /// Trace, debug, info, warning and error messages from all dependencies
    Trace,
}

impl LogLevel {
    pub(crate) fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "facade=error,facade_codegen=error,facade_schema=error,off",
            LogLevel::Warn => "facade=warn,facade_codegen=warn,facade_schema=warn,off",
            LogLevel::Info => "facade=info,facade_codegen=info,facade_schema=info,off",
            LogLevel::Debug => "facade=debug,facade_codegen=debug,facade_schema=debug,off",
            LogLevel::Trace => "trace",
        }
    }
}
