use clap::ValueEnum;

/// When to style console status lines with ANSI colors.
///
/// - `Auto`: style only when stdout is a terminal and `NO_COLOR` is unset
///   (default behaviour).
/// - `Always`: always emit escape codes, e.g. when piping through `less -R`.
/// - `Never`: plain text only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

impl Default for ColorMode {
    fn default() -> Self {
        ColorMode::Auto
    }
}

impl ColorMode {
    /// Decide whether to emit styling, given whether the output is a terminal
    /// and whether `NO_COLOR` is present in the environment.
    pub fn enabled(self, is_terminal: bool, no_color_env: bool) -> bool {
        match self {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => is_terminal && !no_color_env,
        }
    }
}
