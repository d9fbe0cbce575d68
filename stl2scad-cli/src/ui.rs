//! Utilities for printing and everything related to "UI".
//!
//! All status messages go to stdout. Log records of the library are printed
//! to stderr by `env_logger` and are not affected by anything in here.

use std::io::{stdout, Write};

use term_painter::{Color, Style, ToStyle};


macro_rules! print_msg {
    ($kind:ident: $icon:literal => $fmt:literal $($args:tt)*) => {{
        crate::ui::print_msg(crate::ui::MsgKind::$kind, $icon, &format!($fmt $($args)*));
    }};
}

/// Prints a progress line, evaluates `$body` and then marks the line as done
/// with the elapsed time. If `$body` returns early (e.g. via `?`), the line
/// is never marked as done.
macro_rules! progress {
    ([$fmt:literal $($args:tt)*] => $body:tt) => {{
        let label = format!($fmt $($args)*);
        crate::ui::progress_start(&label);

        let before = std::time::Instant::now();
        let out = $body;
        crate::ui::progress_done(&label, before.elapsed());

        out
    }};
}

macro_rules! info {
    () => { info!("") };
    ($($t:tt)*) => {
        print_msg!(Info: 'i' => $($t)*);
    };
}

macro_rules! warn {
    () => { warn!("") };
    ($($t:tt)*) => {
        print_msg!(Warning: 'w' => $($t)*);
    };
}

macro_rules! error {
    () => { error!("") };
    ($($t:tt)*) => {
        print_msg!(Error: '!' => $($t)*);
    };
}

pub enum MsgKind {
    Error,
    Warning,
    Info,
    Progress,
}

impl MsgKind {
    pub fn icon_style(&self) -> Style {
        match self {
            MsgKind::Error => Color::Red.bold(),
            MsgKind::Warning => Color::Yellow.bold(),
            MsgKind::Info => Color::Blue.bold(),
            MsgKind::Progress => Color::Green.bold(),
        }
    }

    pub fn body_style(&self) -> Style {
        match self {
            MsgKind::Error => Color::BrightRed.to_style(),
            MsgKind::Warning => Color::BrightYellow.to_style(),
            MsgKind::Info => Color::NotSet.to_style(),
            MsgKind::Progress => Color::NotSet.to_style(),
        }
    }
}

/// Prints `[icon] body`, rewrapped for the terminal width. Continuation lines
/// are indented below the icon.
pub fn print_msg(kind: MsgKind, icon: char, body: &str) {
    let icon_style = kind.icon_style();
    let body_style = kind.body_style();

    let line_len = std::cmp::min(
        100,
        term_size::dimensions().map(|(w, _)| w).unwrap_or(80),
    ).saturating_sub(7);
    let lines = wrap(body, line_len);

    icon_style.with(|| print!("[{}] ", icon));
    for (i, line) in lines.iter().enumerate() {
        let prefix = match i {
            0 => "",
            _ if i == lines.len() - 1 => "    └ ",
            _ => "    │ ",
        };

        println!("{}{}", icon_style.paint(prefix), body_style.paint(line));
    }
}

pub fn progress_start(label: &str) {
    let kind = MsgKind::Progress;
    print!("{} ", kind.icon_style().paint("[…]"));
    print!("{}", kind.body_style().paint(format!("{} ... ", label)));
    let _ = stdout().flush();
}

pub fn progress_done(label: &str, time: std::time::Duration) {
    let kind = MsgKind::Progress;
    print!("\r{} ", kind.icon_style().paint("[✓]"));
    print!("{}", kind.body_style().paint(format!("{} ... ", label)));
    println!("{} (in {:.2?})", kind.icon_style().paint("done"), time);
}

/// Splits `body` into lines of at most `line_len` characters (unless a single
/// word is longer). Whitespace between words collapses into one space.
pub fn wrap(body: &str, line_len: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in body.split_whitespace() {
        let current_len = current.chars().count();
        if current_len > 0 && current_len + 1 + word.chars().count() > line_len {
            lines.push(current.clone());
            current.clear();
        }

        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    lines.push(current);

    lines
}

/// Formats the given integer with `,` as thousand separator.
pub fn fmt_with_thousand_sep(mut v: u64) -> String {
    let mut groups = vec![v % 1000];
    v /= 1000;
    while v != 0 {
        groups.push(v % 1000);
        v /= 1000;
    }

    let mut out = groups.pop().unwrap_or(0).to_string();
    for group in groups.iter().rev() {
        out.push_str(&format!(",{:03}", group));
    }

    out
}
