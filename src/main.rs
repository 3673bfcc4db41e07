use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::EnvFilter;

use sesh::commands::{archive, cat, cp, grep, ls, mv, rm, undo};
use sesh::{
    AppError, ArchiveFormat, FileContent, GrepOptions, HistoryService, LsOptions, ReadMode,
    Session, UndoEntry,
};

#[derive(Parser)]
#[command(name = "sesh")]
#[command(version)]
#[command(
    about = "Interactive file-shell session with history and undo",
    long_about = None
)]
struct Cli {
    /// Run a single command line and exit.
    #[arg(short = 'c', long = "command")]
    command: Option<String>,

    /// Location of the append-only history log.
    #[arg(long, default_value = ".history")]
    history_file: PathBuf,

    /// Location of the trash backup directory.
    #[arg(long, default_value = ".trash")]
    trash_dir: PathBuf,
}

enum Flow {
    Continue,
    Exit,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("{} {}", "error:".red(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let mut session = Session::current()?;
    let mut history = HistoryService::new(cli.history_file, cli.trash_dir)?;

    if let Some(line) = cli.command {
        return dispatch(&line, &mut session, &mut history, false).map(|_| ());
    }

    let mut editor = DefaultEditor::new()
        .map_err(|err| AppError::Io(std::io::Error::other(err.to_string())))?;

    loop {
        let prompt = format!("{} $ ", session.current_dir().display());
        match editor.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(line);
                match dispatch(line, &mut session, &mut history, true) {
                    Ok(Flow::Exit) => break,
                    Ok(Flow::Continue) => {}
                    Err(e) => eprintln!("{}", e.to_string().red()),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{} {err}", "error:".red());
                break;
            }
        }
    }
    Ok(())
}

/// Execute one command line against the session.
///
/// The raw line is appended to the history log before execution;
/// destructive operations snapshot their target first and push an undo
/// descriptor only on success.
fn dispatch(
    line: &str,
    session: &mut Session,
    history: &mut HistoryService,
    interactive: bool,
) -> Result<Flow, AppError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some((&command, rest)) = tokens.split_first() else {
        return Ok(Flow::Continue);
    };

    history.add(line)?;
    tracing::debug!(command, "dispatching");

    let (flags, args) = split_flags(rest);
    let flag = |name: char| flags.iter().any(|f| f.contains(name));

    match command {
        "ls" => {
            let options = LsOptions { hidden: flag('a'), detailed: flag('l') };
            for line in ls::execute(session, args.first().copied(), options)? {
                println!("{line}");
            }
        }
        "cd" => session.cd(args.first().copied().unwrap_or(""))?,
        "pwd" => println!("{}", session.current_dir().display()),
        "cat" => {
            let path = args.first().copied().unwrap_or("");
            let mode = if flag('b') { ReadMode::Bytes } else { ReadMode::Text };
            match cat::execute(session, path, mode)? {
                FileContent::Text(text) => print!("{text}"),
                FileContent::Bytes(bytes) => {
                    std::io::stdout().write_all(&bytes)?;
                }
            }
        }
        "cp" => {
            let (src, dst) = two_args(command, &args)?;
            let recursive = flag('r') || flag('R');
            let destination = cp::execute(session, src, dst, recursive)?;
            history.push_undo(UndoEntry::Copy { destination, recursive });
        }
        "mv" => {
            let (src, dst) = two_args(command, &args)?;
            let source = session.resolve(src);
            let destination = mv::execute(session, src, dst)?;
            history.push_undo(UndoEntry::Move { source, destination });
        }
        "rm" => {
            let path = one_arg(command, &args)?;
            let recursive = flag('r') || flag('R');
            if interactive && recursive && !confirm_recursive_rm(path) {
                println!("cancelled");
                return Ok(Flow::Continue);
            }
            let target = rm::validate(session, path, recursive)?;
            let backup = history.backup(&target)?;
            let source = rm::execute(session, path, recursive)?;
            history.push_undo(UndoEntry::Remove { source, backup, recursive });
        }
        "grep" => {
            let (pattern, path) = two_args(command, &args)?;
            let options = GrepOptions { recursive: flag('r'), ignore_case: flag('i') };
            for line in grep::execute(session, pattern, path, options)? {
                println!("{line}");
            }
        }
        "archive" => {
            let &[format, dir, name] = &args[..] else {
                return Err(missing_operand(command));
            };
            let format: ArchiveFormat = format.parse()?;
            let target = archive::create(session, format, dir, name)?;
            println!("created {}", target.display());
        }
        "unpack" => {
            let (format, name) = two_args(command, &args)?;
            archive::unpack(session, format.parse()?, name)?;
        }
        "history" => {
            let length = args.first().and_then(|n| n.parse().ok()).unwrap_or(-1);
            for line in history.get(length)? {
                println!("{line}");
            }
        }
        "undo" => match undo::execute(history)? {
            Some(message) => println!("{message}"),
            None => println!("nothing to undo"),
        },
        "help" => print_help(),
        "exit" | "quit" => return Ok(Flow::Exit),
        other => {
            eprintln!("{other}: command not found (try 'help')");
        }
    }
    Ok(Flow::Continue)
}

/// Partition arguments into `-x` style flags and positional tokens.
fn split_flags<'a>(tokens: &[&'a str]) -> (Vec<&'a str>, Vec<&'a str>) {
    tokens.iter().copied().partition(|t| t.starts_with('-') && t.len() > 1)
}

fn one_arg<'a>(command: &str, args: &[&'a str]) -> Result<&'a str, AppError> {
    args.first().copied().ok_or_else(|| missing_operand(command))
}

fn two_args<'a>(command: &str, args: &[&'a str]) -> Result<(&'a str, &'a str), AppError> {
    match args {
        [first, second, ..] => Ok((*first, *second)),
        _ => Err(missing_operand(command)),
    }
}

fn missing_operand(command: &str) -> AppError {
    AppError::Io(std::io::Error::new(
        std::io::ErrorKind::InvalidInput,
        format!("{command}: missing operand"),
    ))
}

fn confirm_recursive_rm(path: &str) -> bool {
    dialoguer::Confirm::new()
        .with_prompt(format!("recursively remove '{path}'?"))
        .default(false)
        .interact()
        .unwrap_or(false)
}

fn print_help() {
    println!(
        "commands:\n  \
         ls [-a] [-l] [path]        list a directory\n  \
         cd [path]                  change directory\n  \
         pwd                        print the current directory\n  \
         cat [-b] <path>            print file content (raw bytes with -b)\n  \
         cp [-r] <src> <dst>        copy a file or directory tree\n  \
         mv <src> <dst>             move or rename\n  \
         rm [-r] <path>             remove (backed up to the trash first)\n  \
         grep [-r] [-i] <pat> <path> search for a pattern\n  \
         archive <format> <dir> <name>  build a tar or tar.gz archive\n  \
         unpack <format> <name>     extract into the current directory\n  \
         history [n]                show recent commands\n  \
         undo                       reverse the last cp/mv/rm\n  \
         exit                       leave the session"
    );
}
