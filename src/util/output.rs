use std::io::{self, Write};

use console::style;

pub fn info(message: &str) {
    let _ = writeln!(io::stderr(), "{}", message);
}

pub fn warn(message: &str) {
    let _ = writeln!(io::stderr(), "{}", style(message).yellow());
}

pub fn error(message: &str) {
    let _ = writeln!(io::stderr(), "{} {}", style("error:").red().bold(), message);
}

/// Dimmed heading for text listings, e.g. `dependencies of g:a:v at 1700000000000`.
pub fn heading(message: &str) {
    let _ = writeln!(io::stderr(), "{}", style(message).dim());
}

/// Writes `lines` to stdout, one per line, in one locked pass.
pub fn print_lines<I, S>(lines: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    for line in lines {
        if writeln!(handle, "{}", line.as_ref()).is_err() {
            break;
        }
    }
}

pub fn set_colors(enabled: bool) {
    console::set_colors_enabled(enabled);
    console::set_colors_enabled_stderr(enabled);
}
