use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::results::Outcome;

/// `m:ss` countdown label
pub fn format_clock(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Cut `text` to at most `max` terminal columns, marking the cut with an
/// ellipsis
pub fn fit_width(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

pub fn outcome_label(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Correct => "Correct!",
        Outcome::Wrong => "Wrong",
        Outcome::Skipped => "Skipped",
        Outcome::TimedOut => "Time's up",
    }
}

/// Format a percentage without a trailing `.0`
pub fn format_percent(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}%", val.round())
    } else {
        format!("{val:.1}%")
    }
}
