// tinyc: lexer, parser and problem reporting for the tiny language

use std::error::Error;
use std::fs;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};

use clap::{ArgAction, CommandFactory, Parser as CliParser, Subcommand, ValueEnum};
use clap_complete::Shell;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use tinyc::diagnostics::{CodeProblem, LineTable, ProblemCode, ProblemHandler, Renderer};
use tinyc::parser::ast::ProgramUnit;
use tinyc::parser::{parse_file, Dump, Lexer, Token};
use tinyc::ui::App;

#[derive(Debug, CliParser)]
#[command(
    name = "tinyc",
    version,
    about = "Lexer and parser for the tiny programming language"
)]
struct Cli {
    /// Increase logging verbosity (-v: debug, -vv+: trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// When to colour diagnostics
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto, global = true)]
    color: ColorChoice,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print every token of a file, then its problems
    Lex { file: PathBuf },
    /// Parse a file, print its syntax tree, then its problems
    Parse { file: PathBuf },
    /// Browse a file's source, tokens and problems in the terminal
    View { file: PathBuf },
    /// Lex each line read from stdin, printing its tokens and problems
    #[command(name = "lexprompt")]
    LexPrompt,
    /// Parse each line read from stdin, printing its tree and problems
    #[command(name = "parserprompt")]
    ParserPrompt,
    /// Print a shell completion script
    #[command(after_help = "Example: source <(tinyc completion bash)")]
    Completion {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// File name shown in diagnostics for prompt input
const PROMPT_FILE: &str = "<repl>";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    fn enabled(self) -> bool {
        match self {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => {
                std::env::var_os("NO_COLOR").is_none() && io::stderr().is_terminal()
            }
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let color = cli.color.enabled();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(directive_for_verbosity(cli.verbose))),
        )
        .with_ansi(color)
        .with_writer(io::stderr)
        .init();

    let ok = match &cli.command {
        Command::Lex { file } => lex(file, color)?,
        Command::Parse { file } => parse(file, color)?,
        Command::View { file } => view(file, color)?,
        Command::LexPrompt => lex_prompt(color)?,
        Command::ParserPrompt => parser_prompt(color)?,
        Command::Completion { shell } => {
            clap_complete::generate(*shell, &mut Cli::command(), "tinyc", &mut io::stdout());
            true
        }
    };

    if !ok {
        std::process::exit(1);
    }

    Ok(())
}

fn directive_for_verbosity(v: u8) -> &'static str {
    match v {
        0 => "tinyc=info",
        1 => "tinyc=debug",
        _ => "tinyc=trace",
    }
}

/// Read `file`, reporting a global problem when it cannot be read.
fn read_source(file: &Path, name: &str, color: bool) -> Result<Option<Vec<u8>>, Box<dyn Error>> {
    match fs::read(file) {
        Ok(source) => {
            debug!(file = name, bytes = source.len(), "read source");
            Ok(Some(source))
        }
        Err(err) => {
            debug!(file = name, error = %err, "failed to read source");
            let mut problems = ProblemHandler::new();
            problems.add(CodeProblem::global_error(ProblemCode::UnableToReadFile(
                name.to_string(),
            )));
            report(&[], &LineTable::default(), &problems, color)?;
            Ok(None)
        }
    }
}

fn report(
    source: &[u8],
    lines: &LineTable,
    problems: &ProblemHandler,
    color: bool,
) -> io::Result<()> {
    let mut err = io::stderr().lock();
    Renderer::new(source, lines)
        .with_color(color)
        .render_diagnostics(&mut err, problems)?;
    err.flush()
}

fn lex(file: &Path, color: bool) -> Result<bool, Box<dyn Error>> {
    let name = file.display().to_string();
    let Some(source) = read_source(file, &name, color)? else {
        return Ok(false);
    };

    let mut problems = ProblemHandler::new();
    let mut lexer = Lexer::new(&name, &source, &mut problems);
    let tokens = lexer.tokenize();
    let lines = lexer.into_line_table();

    print_tokens(&tokens)?;
    report(&source, &lines, &problems, color)?;
    Ok(problems.ok())
}

fn parse(file: &Path, color: bool) -> Result<bool, Box<dyn Error>> {
    let name = file.display().to_string();
    let Some(source) = read_source(file, &name, color)? else {
        return Ok(false);
    };

    let mut problems = ProblemHandler::new();
    let (unit, lines) = parse_file(&name, &source, &mut problems);

    if let Some(unit) = &unit {
        print_tree(unit)?;
    }

    report(&source, &lines, &problems, color)?;
    Ok(problems.ok())
}

fn print_tokens(tokens: &[Token]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    for token in tokens {
        writeln!(out, "{}", token)?;
    }
    out.flush()
}

fn print_tree(unit: &ProgramUnit) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{}", unit.dump(0))?;
    out.flush()
}

/// Problems of one prompt line, without the final abort notice.
fn report_line(
    line: &[u8],
    lines: &LineTable,
    problems: &ProblemHandler,
    color: bool,
) -> io::Result<()> {
    let mut err = io::stderr().lock();
    Renderer::new(line, lines)
        .with_color(color)
        .render_problems(&mut err, problems.problems())?;
    err.flush()
}

/// Runs `handle` on every stdin line (line break stripped) until end of input.
fn prompt(mut handle: impl FnMut(&[u8]) -> io::Result<()>) -> Result<bool, Box<dyn Error>> {
    for line in io::stdin().lock().split(b'\n') {
        let mut line = line?;
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        handle(&line)?;
    }
    Ok(true)
}

fn lex_prompt(color: bool) -> Result<bool, Box<dyn Error>> {
    prompt(|line| {
        let mut problems = ProblemHandler::new();
        let mut lexer = Lexer::new(PROMPT_FILE, line, &mut problems);
        let tokens = lexer.tokenize();
        let lines = lexer.into_line_table();

        print_tokens(&tokens)?;
        report_line(line, &lines, &problems, color)
    })
}

fn parser_prompt(color: bool) -> Result<bool, Box<dyn Error>> {
    prompt(|line| {
        let mut problems = ProblemHandler::new();
        let (unit, lines) = parse_file(PROMPT_FILE, line, &mut problems);

        if let Some(unit) = &unit {
            print_tree(unit)?;
        }
        report_line(line, &lines, &problems, color)
    })
}

fn view(file: &Path, color: bool) -> Result<bool, Box<dyn Error>> {
    let name = file.display().to_string();
    let Some(source) = read_source(file, &name, color)? else {
        return Ok(false);
    };

    let mut app = App::new(&name, &source);

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res?;
    Ok(app.error_count == 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directive_defaults() {
        assert_eq!(directive_for_verbosity(0), "tinyc=info");
        assert_eq!(directive_for_verbosity(1), "tinyc=debug");
        assert_eq!(directive_for_verbosity(7), "tinyc=trace");
    }

    #[test]
    fn color_choice_overrides() {
        assert!(ColorChoice::Always.enabled());
        assert!(!ColorChoice::Never.enabled());
    }

    #[test]
    fn cli_parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["tinyc", "parse", "main.tl", "-vv", "--color", "never"])
            .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.color, ColorChoice::Never);
        assert!(matches!(cli.command, Command::Parse { ref file } if file == Path::new("main.tl")));
    }

    #[test]
    fn cli_parses_prompts_and_completion() {
        let cli = Cli::try_parse_from(["tinyc", "lexprompt"]).unwrap();
        assert!(matches!(cli.command, Command::LexPrompt));
        let cli = Cli::try_parse_from(["tinyc", "parserprompt"]).unwrap();
        assert!(matches!(cli.command, Command::ParserPrompt));

        let cli = Cli::try_parse_from(["tinyc", "completion", "zsh"]).unwrap();
        assert!(matches!(cli.command, Command::Completion { shell: Shell::Zsh }));
        assert!(Cli::try_parse_from(["tinyc", "completion", "tcsh"]).is_err());
        assert!(Cli::try_parse_from(["tinyc", "completion"]).is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
