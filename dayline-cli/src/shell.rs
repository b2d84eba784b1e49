//! Interactive line shell: the CLI commands without re-launching.

use anyhow::{Result, bail};
use dayline_core::{GoalId, NewGoal};
use dayline_store::{Clock, ConfigRepository, GoalRepository, Planner};
use std::io::{BufRead, Write};

use crate::{prompt, render};

const HELP: &str = "\
Commands:
  schedule            show today's timeline
  goals               list goals with their numbers
  add                 add a goal (prompts for each field)
  complete N          mark goal N done for today
  skip N [reason]     record a skip for goal N
  delete N            remove goal N
  config              show start time, hours and fixed blocks
  start HH:MM         set the day's start time
  hours N             set available hours (1-24)
  help                this text
  quit                leave the shell";

pub fn run_shell<R, C, I, W>(planner: &Planner<R, C>, input: &mut I, out: &mut W) -> Result<()>
where
    R: GoalRepository + ConfigRepository,
    C: Clock,
    I: BufRead,
    W: Write,
{
    writeln!(out, "dayline shell. Type `help` for commands, `quit` to leave.")?;

    loop {
        write!(out, "dayline> ")?;
        out.flush().ok();

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match run_line(planner, line, input, out) {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            // errors are reported and the shell keeps going
            Err(e) => writeln!(out, "error: {:#}", e)?,
        }
    }
    Ok(())
}

enum Flow {
    Continue,
    Quit,
}

fn run_line<R, C, I, W>(
    planner: &Planner<R, C>,
    line: &str,
    input: &mut I,
    out: &mut W,
) -> Result<Flow>
where
    R: GoalRepository + ConfigRepository,
    C: Clock,
    I: BufRead,
    W: Write,
{
    let (cmd, rest) = match line.split_once(char::is_whitespace) {
        Some((c, r)) => (c, r.trim()),
        None => (line, ""),
    };

    match cmd.to_lowercase().as_str() {
        "quit" | "exit" | "q" => return Ok(Flow::Quit),
        "help" | "?" => writeln!(out, "{}", HELP)?,
        "schedule" | "s" => {
            let s = planner.schedule()?;
            write!(out, "{}", render::render_schedule(&s, planner.today()))?;
        }
        "goals" | "g" => {
            let goals = planner.goals()?;
            write!(out, "{}", render::render_goals(&goals, planner.today()))?;
        }
        "add" => {
            let default_target = planner.today().format("%Y-12-31").to_string();
            let draft = prompt::complete_draft(input, out, NewGoal::default(), &default_target)?;
            let g = planner.add_goal(draft)?;
            writeln!(out, "Added: {}", g.description)?;
        }
        "complete" | "done" => {
            let id = goal_at(planner, rest)?;
            let g = planner.complete(id)?;
            writeln!(out, "Completed {}", render::render_goal_line(&g))?;
        }
        "skip" => {
            let (n, reason) = match rest.split_once(char::is_whitespace) {
                Some((n, r)) => (n, Some(r.trim())),
                None => (rest, None),
            };
            let id = goal_at(planner, n)?;
            let g = planner.skip(id, reason)?;
            writeln!(out, "Skipped {}", g.description)?;
        }
        "delete" | "rm" => {
            let id = goal_at(planner, rest)?;
            let g = planner.delete_goal(id)?;
            writeln!(out, "Deleted {}", g.description)?;
        }
        "config" => {
            let cfg = planner.config()?;
            write!(out, "{}", render::render_config(&cfg))?;
        }
        "start" => {
            let cfg = planner.set_start_time(rest)?;
            writeln!(out, "Start time set to {}", cfg.start_time)?;
        }
        "hours" => {
            let hours: i64 = rest
                .parse()
                .map_err(|_| anyhow::anyhow!("expected a number of hours, got '{}'", rest))?;
            let cfg = planner.set_available_hours(hours)?;
            writeln!(out, "Available hours set to {}", cfg.available_hours)?;
        }
        other => writeln!(out, "Unknown command '{}'. Type `help`.", other)?,
    }
    Ok(Flow::Continue)
}

/// Map a 1-based list position (as printed by `goals`) to a goal id.
pub fn goal_at<R, C>(planner: &Planner<R, C>, n: &str) -> Result<GoalId>
where
    R: GoalRepository + ConfigRepository,
    C: Clock,
{
    let n: usize = n
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("expected a goal number, got '{}'", n))?;
    let goals = planner.goals()?;
    match n.checked_sub(1).and_then(|i| goals.get(i)) {
        Some(g) => Ok(g.id),
        None => bail!("no goal number {} ({} goals)", n, goals.len()),
    }
}
