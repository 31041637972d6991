use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::annotation::{parse_partial_date, Annotations, PartialDate};
use crate::query::{self, Collator};
use crate::render::render_table;

pub const GREETING: &str = "Please, write your command!";
pub const WRONG_COMMAND: &str = "wrong command";

static USER_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L}0-9_\s]+$").expect("valid user name regex"));

/// Everything a user can type at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Exit,
    Show,
    Important,
    ByUser(String),
    SortByImportance,
    SortByUser,
    SortByDate,
    ByDate(PartialDate),
}

/// Recognises one input line. Returns `None` for anything outside the grammar.
pub fn parse_command(input: &str) -> Option<Command> {
    let input = input.trim();
    let command = match input {
        "exit" => Command::Exit,
        "show" => Command::Show,
        "important" => Command::Important,
        "sort importance" => Command::SortByImportance,
        "sort user" => Command::SortByUser,
        "sort date" => Command::SortByDate,
        _ => {
            if let Some(name) = input.strip_prefix("user ") {
                if !USER_NAME.is_match(name) {
                    return None;
                }
                Command::ByUser(name.trim().to_owned())
            } else if let Some(token) = input.strip_prefix("date ") {
                Command::ByDate(parse_partial_date(token)?)
            } else {
                return None;
            }
        }
    };
    Some(command)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Table(Vec<String>),
    Exit,
}

/// Runs commands against the annotations loaded at startup.
pub struct Session {
    annotations: Annotations,
    collator: Box<dyn Collator>,
}

impl Session {
    pub fn new(annotations: Annotations, collator: Box<dyn Collator>) -> Self {
        Self {
            annotations,
            collator,
        }
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    pub fn execute(&self, command: &Command) -> Outcome {
        let all = self.annotations.view();
        let view = match command {
            Command::Exit => return Outcome::Exit,
            Command::Show => all,
            Command::Important => query::important(&all),
            Command::ByUser(name) => query::by_user(&all, name),
            Command::SortByImportance => query::sort_by_importance(&all),
            Command::SortByUser => query::sort_by_user(&all, self.collator.as_ref()),
            Command::SortByDate => query::sort_by_date(&all),
            Command::ByDate(threshold) => query::after_date(&all, threshold),
        };
        tracing::debug!(?command, rows = view.len(), "executed command");
        Outcome::Table(render_table(&view))
    }

    /// Reads commands line by line until `exit` or end of input.
    pub fn run_interactive<R, W>(&self, mut input: R, out: &mut W, prompt: bool) -> Result<()>
    where
        R: BufRead,
        W: Write,
    {
        writeln!(out, "{GREETING}")?;
        let mut line = String::new();
        loop {
            if prompt {
                write!(out, "> ")?;
                out.flush()?;
            }
            line.clear();
            let read = input.read_line(&mut line).context("reading command")?;
            if read == 0 {
                return Ok(());
            }
            if line.trim().is_empty() {
                continue;
            }
            match parse_command(&line).map(|command| self.execute(&command)) {
                Some(Outcome::Exit) => return Ok(()),
                Some(Outcome::Table(lines)) => write_lines(out, &lines)?,
                None => writeln!(out, "{WRONG_COMMAND}")?,
            }
        }
    }

    /// Executes a single command given on the command line.
    pub fn run_once<W: Write>(&self, input: &str, out: &mut W) -> Result<()> {
        let Some(command) = parse_command(input) else {
            bail!("{WRONG_COMMAND}: {input}");
        };
        if let Outcome::Table(lines) = self.execute(&command) {
            write_lines(out, &lines)?;
        }
        Ok(())
    }
}

fn write_lines<W: Write>(out: &mut W, lines: &[String]) -> Result<()> {
    for line in lines {
        writeln!(out, "{line}")?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::annotation::{build_annotations, SourceFile};
    use crate::query::Russian;

    type TestResult<T = ()> = Result<T>;

    fn session() -> Session {
        let content = "// todo Alex;2020-10;add feature!!\n// TODO you can do it\n// todo ;2016;add x\n";
        let annotations = build_annotations(&[SourceFile::new("index.js", content)]);
        Session::new(annotations, Box::new(Russian))
    }

    fn output_of(session: &Session, input: &str) -> TestResult<String> {
        let mut out = Vec::new();
        session.run_interactive(input.as_bytes(), &mut out, false)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn parses_fixed_commands() {
        assert_eq!(parse_command("exit"), Some(Command::Exit));
        assert_eq!(parse_command("show\n"), Some(Command::Show));
        assert_eq!(parse_command("important"), Some(Command::Important));
        assert_eq!(parse_command("sort importance"), Some(Command::SortByImportance));
        assert_eq!(parse_command("sort user"), Some(Command::SortByUser));
        assert_eq!(parse_command("sort date"), Some(Command::SortByDate));
    }

    #[test]
    fn parses_user_names_in_any_script() {
        assert_eq!(parse_command("user Alex"), Some(Command::ByUser("Alex".into())));
        assert_eq!(parse_command("user Вася_2"), Some(Command::ByUser("Вася_2".into())));
        assert_eq!(parse_command("user a-b"), None);
        assert_eq!(parse_command("user"), None);
    }

    #[test]
    fn parses_date_thresholds() {
        assert_matches!(
            parse_command("date 2020-10"),
            Some(Command::ByDate(date)) if date.year() == 2020 && date.month() == Some(10)
        );
        assert_matches!(parse_command("date 2018"), Some(Command::ByDate(_)));
        assert_eq!(parse_command("date tomorrow"), None);
        assert_eq!(parse_command("date 2020-1"), None);
    }

    #[test]
    fn out_of_range_dates_are_wrong_commands() -> TestResult {
        assert_eq!(parse_command("date 2020-13"), None);
        assert_eq!(parse_command("date 2020-02-32"), None);
        let output = output_of(&session(), "date 2020-13\n")?;
        assert_eq!(output.lines().collect::<Vec<_>>(), vec![GREETING, WRONG_COMMAND]);
        Ok(())
    }

    #[test]
    fn rejects_unknown_commands() {
        assert_eq!(parse_command("sort"), None);
        assert_eq!(parse_command("SHOW"), None);
        assert_eq!(parse_command("remove all"), None);
    }

    #[test]
    fn show_lists_everything_in_file_order() {
        let session = session();
        let Outcome::Table(lines) = session.execute(&Command::Show) else {
            panic!("show renders a table");
        };
        assert_eq!(lines.len(), 8);
        assert!(lines[4].contains("add feature"));
        assert!(lines[5].contains("you can do it"));
        assert!(lines[6].contains("add x"));
    }

    #[test]
    fn empty_filters_render_no_results() {
        let session = session();
        let Outcome::Table(lines) = session.execute(&Command::ByUser("nobody".into())) else {
            panic!("user filter renders a table");
        };
        assert_eq!(lines.len(), 6);
        assert!(lines[4].contains("NO RESULTS"));
    }

    #[test]
    fn sorting_does_not_change_later_shows() {
        let session = session();
        let _ = session.execute(&Command::SortByDate);
        let Outcome::Table(lines) = session.execute(&Command::Show) else {
            panic!("show renders a table");
        };
        assert!(lines[4].contains("add feature"));
    }

    #[test]
    fn interactive_loop_reports_wrong_commands_and_stops_at_exit() -> TestResult {
        let output = output_of(&session(), "bogus\n\nimportant\nexit\nshow\n")?;
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines[0], GREETING);
        assert_eq!(lines[1], WRONG_COMMAND);
        assert!(lines[2].contains("RESULTS"));
        assert!(lines[6].contains("add feature"));
        // `show` after `exit` is never executed.
        assert_eq!(lines.len(), 8);
        Ok(())
    }

    #[test]
    fn interactive_loop_ends_with_input() -> TestResult {
        let output = output_of(&session(), "date 2017\n")?;
        assert!(output.contains("add feature"));
        assert!(!output.contains("add x"));
        Ok(())
    }

    #[test]
    fn one_shot_rejects_unknown_commands() {
        let mut out = Vec::new();
        let err = session().run_once("frobnicate", &mut out).expect_err("unknown");
        assert!(err.to_string().contains(WRONG_COMMAND));
        assert!(out.is_empty());
    }
}
