//! Terminal styling shared by the report formatter and the banner

/// Text styles used in console output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Green,
    Grey,
    Yellow,
    Red,
    Underline,
}

/// Apply `style` to `text`, or return it untouched when colors are off
#[cfg(feature = "colors")]
pub fn paint(text: &str, style: Style, use_colors: bool) -> String {
    use colored::Colorize;

    if !use_colors {
        return text.to_string();
    }

    match style {
        Style::Green => text.green().to_string(),
        Style::Grey => text.bright_black().to_string(),
        Style::Yellow => text.yellow().to_string(),
        Style::Red => text.red().to_string(),
        Style::Underline => text.underline().to_string(),
    }
}

#[cfg(not(feature = "colors"))]
pub fn paint(text: &str, _style: Style, _use_colors: bool) -> String {
    text.to_string()
}
