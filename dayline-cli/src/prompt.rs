//! Line prompts shared by `dayline add` and the shell.

use anyhow::{Result, bail};
use dayline_core::NewGoal;
use std::io::{BufRead, Write};

pub fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, label: &str) -> Result<String> {
    write!(out, "{}: ", label)?;
    out.flush().ok();
    let mut s = String::new();
    if input.read_line(&mut s)? == 0 {
        bail!("input closed");
    }
    Ok(s.trim().to_string())
}

/// Prompt with a default shown in brackets; blank input takes the default.
pub fn prompt_or<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    label: &str,
    default: &str,
) -> Result<String> {
    let s = prompt(input, out, &format!("{} [{}]", label, default))?;
    Ok(if s.is_empty() { default.to_string() } else { s })
}

/// Fill the blanks of a partially specified goal interactively.
///
/// Values are kept as text; `NewGoal::into_goal` does the validation.
pub fn complete_draft<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    mut draft: NewGoal,
    default_target: &str,
) -> Result<NewGoal> {
    if draft.description.trim().is_empty() {
        draft.description = prompt(input, out, "Description")?;
    }
    if draft.frequency.trim().is_empty() {
        draft.frequency = prompt_or(input, out, "Frequency (daily/weekly/one-time)", "daily")?;
    }
    if draft.frequency.trim().eq_ignore_ascii_case("weekly")
        && draft.week_day.as_deref().is_none_or(|d| d.trim().is_empty())
    {
        draft.week_day = Some(prompt(input, out, "Week day (e.g. Monday)")?);
    }
    if draft.target_date.trim().is_empty() {
        draft.target_date = prompt_or(input, out, "Target date (YYYY-MM-DD)", default_target)?;
    }
    if draft.priority.trim().is_empty() {
        draft.priority = prompt_or(input, out, "Priority (high/medium/low)", "medium")?;
    }
    if draft.daily_minutes <= 0 {
        let raw = prompt_or(input, out, "Minutes per session", "30")?;
        draft.daily_minutes = raw.parse().unwrap_or(0);
    }
    Ok(draft)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn fills_missing_fields_with_defaults() {
        let mut input = Cursor::new("Stretch\nweekly\nFriday\n\n\n20\n");
        let mut out = Vec::new();
        let draft = complete_draft(&mut input, &mut out, NewGoal::default(), "2026-12-31").unwrap();

        assert_eq!(draft.description, "Stretch");
        assert_eq!(draft.frequency, "weekly");
        assert_eq!(draft.week_day.as_deref(), Some("Friday"));
        assert_eq!(draft.target_date, "2026-12-31");
        assert_eq!(draft.priority, "medium");
        assert_eq!(draft.daily_minutes, 20);
    }

    #[test]
    fn keeps_given_fields() {
        let given = NewGoal {
            description: "Read".to_string(),
            frequency: "daily".to_string(),
            week_day: None,
            target_date: "2026-06-30".to_string(),
            priority: "high".to_string(),
            daily_minutes: 15,
        };
        let mut input = Cursor::new("");
        let mut out = Vec::new();
        let draft = complete_draft(&mut input, &mut out, given.clone(), "2026-12-31").unwrap();
        assert_eq!(draft, given);
        assert!(out.is_empty());
    }

    #[test]
    fn closed_input_is_an_error() {
        let mut input = Cursor::new("");
        let mut out = Vec::new();
        assert!(prompt(&mut input, &mut out, "Description").is_err());
    }
}
