use anstyle::{AnsiColor, Color, Style};

pub const COLOR_ENV: &str = "CASTSVG_COLOR";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Auto,
    Always,
    Never,
}

impl OutputMode {
    pub fn from_env() -> Self {
        Self::from_value(std::env::var(COLOR_ENV).ok().as_deref())
    }

    pub fn from_value(value: Option<&str>) -> Self {
        match value {
            Some("always") => OutputMode::Always,
            Some("never") => OutputMode::Never,
            _ => OutputMode::Auto,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub muted: Style,
    pub warning: Style,
    pub error: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            muted: Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightBlack))),
            warning: Style::new()
                .fg_color(Some(Color::Ansi(AnsiColor::Yellow)))
                .bold(),
            error: Style::new()
                .fg_color(Some(Color::Ansi(AnsiColor::Red)))
                .bold(),
        }
    }
}

pub fn resolve_color_enabled(mode: OutputMode, is_tty: bool) -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    match mode {
        OutputMode::Always => true,
        OutputMode::Never => false,
        OutputMode::Auto => is_tty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_mode_reads_known_values() {
        assert_eq!(OutputMode::from_value(Some("always")), OutputMode::Always);
        assert_eq!(OutputMode::from_value(Some("never")), OutputMode::Never);
        assert_eq!(OutputMode::from_value(Some("sometimes")), OutputMode::Auto);
        assert_eq!(OutputMode::from_value(None), OutputMode::Auto);
    }

    #[test]
    fn never_mode_disables_color_even_on_tty() {
        assert!(!resolve_color_enabled(OutputMode::Never, true));
    }
}
