use crate::app::render::render;
use crate::config::OutputFormat;
use crate::core::engine::Session;
use anyhow::{anyhow, bail, Context};
use std::collections::BTreeSet;
use std::io::{BufRead, Write};

pub const HELP: &str = "\
Commands:
  next | n                 next page
  prev | p                 previous page
  page <N>                 jump to page N
  size <N>                 rows per page (0 = all)
  search <words...>        keyword filter and highlight (empty clears)
  name <text>              doctor name contains
  specialty <text>         specialty contains
  institution <text>       place of work contains
  degree <a,b,...>         accepted degrees (empty clears)
  min-exp <N>              minimum years of experience
  min-rating <X>           minimum doctor rating
  clear                    drop every filter
  help                     this text
  quit | q                 leave";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Next,
    Prev,
    Page(usize),
    PageSize(usize),
    Search(String),
    Name(String),
    Specialty(String),
    Institution(String),
    Degrees(Option<BTreeSet<String>>),
    MinExperience(u32),
    MinRating(f64),
    Clear,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> anyhow::Result<Command> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_lowercase().as_str() {
        "next" | "n" => Command::Next,
        "prev" | "p" => Command::Prev,
        "page" => Command::Page(rest.parse().context("page expects a number")?),
        "size" => Command::PageSize(rest.parse().context("size expects a number")?),
        "search" => Command::Search(rest.to_string()),
        "name" => Command::Name(rest.to_string()),
        "specialty" => Command::Specialty(rest.to_string()),
        "institution" => Command::Institution(rest.to_string()),
        "degree" => {
            let degrees: BTreeSet<String> = rest
                .split(',')
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string)
                .collect();
            Command::Degrees(if degrees.is_empty() { None } else { Some(degrees) })
        }
        "min-exp" => Command::MinExperience(rest.parse().context("min-exp expects a whole number")?),
        "min-rating" => {
            let rating: f64 = rest
                .replace(',', ".")
                .parse()
                .context("min-rating expects a number")?;
            if !(0.0..=5.0).contains(&rating) {
                bail!("min-rating must be between 0 and 5");
            }
            Command::MinRating(rating)
        }
        "clear" => Command::Clear,
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        "" => return Err(anyhow!("empty command")),
        other => bail!("unknown command '{}', type help", other),
    };
    Ok(command)
}

/// Apply a command to the session. Returns false when the loop should stop.
pub fn apply(session: &mut Session, command: Command) -> bool {
    match command {
        Command::Next => {
            session.next_page();
        }
        Command::Prev => {
            session.prev_page();
        }
        Command::Page(page) => session.go_to_page(page),
        Command::PageSize(size) => session.set_page_size(size),
        Command::Search(keyword) => session.update_criteria(|c| c.keyword = keyword),
        Command::Name(name) => session.update_criteria(|c| c.name = name),
        Command::Specialty(specialty) => session.update_criteria(|c| c.specialty = specialty),
        Command::Institution(institution) => {
            session.update_criteria(|c| c.institution = institution)
        }
        Command::Degrees(degrees) => session.update_criteria(|c| c.degrees = degrees),
        Command::MinExperience(years) => session.update_criteria(|c| c.min_experience = years),
        Command::MinRating(rating) => session.update_criteria(|c| c.min_rating = rating),
        Command::Clear => session.set_criteria(Default::default()),
        Command::Help => {}
        Command::Quit => return false,
    }
    true
}

/// Read commands line by line, re-rendering the page after each one.
pub fn run<R: BufRead, W: Write>(
    session: &mut Session,
    input: R,
    out: &mut W,
    format: OutputFormat,
) -> anyhow::Result<()> {
    write!(out, "> ")?;
    out.flush()?;

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            write!(out, "> ")?;
            out.flush()?;
            continue;
        }

        match parse_command(&line) {
            Ok(Command::Help) => writeln!(out, "{}", HELP)?,
            Ok(command) => {
                tracing::debug!("Command: {:?}", command);
                if !apply(session, command) {
                    break;
                }
                match session.render() {
                    Ok(page) => render(&page, format, out)?,
                    Err(e) => {
                        tracing::warn!("⚠️ Render failed: {}", e);
                        writeln!(out, "❌ {}", e.user_friendly_message())?;
                    }
                }
            }
            Err(e) => writeln!(out, "❌ {}", e)?,
        }

        write!(out, "> ")?;
        out.flush()?;
    }

    Ok(())
}
