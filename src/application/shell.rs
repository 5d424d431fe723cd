use std::io::{self, BufRead, Write};

use colored::Colorize;
use snafu::Snafu;
use tracing::debug;

use shareplace::filesystem::{FilesystemNode, NodePath};
use shareplace::namespace::NamespaceError;
use shareplace::session::{Command, Outcome, Session};
use shareplace::storage::KeyValueStore;

const HELP: &str = "\
Commands:
  ls                 list the current folder
  pwd                show where you are
  cd NAME | /PATH    enter a folder (`cd ..` goes up, `cd` alone goes to the root)
  mkdir NAME         create a folder
  touch NAME         create an empty file
  mv OLD NEW         rename an item
  move NAME /DEST    move an item into another folder
  rm NAME            delete an item and everything inside it
  help               show this text
  exit               leave
Quote names containing spaces: mkdir \"My Folder\"";

/// What a single input line asks for
#[derive(Debug, Clone, PartialEq, Eq)]
enum ShellAction {
    Run(Command),
    List,
    Pwd,
    Help,
    Exit,
}

/// Line-oriented front-end: reads commands from `input`, renders to `output`.
pub struct Shell<S, R, W> {
    session: Session<S>,
    input: R,
    output: W,
    color: bool,
}

impl<S: KeyValueStore, R: BufRead, W: Write> Shell<S, R, W> {
    pub fn new(session: Session<S>, input: R, output: W, color: bool) -> Self {
        Self {
            session,
            input,
            output,
            color,
        }
    }

    /// Processes lines until `exit` or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        self.render_breadcrumbs()?;
        self.render_listing()?;
        loop {
            write!(self.output, "{}> ", self.session.current_path())?;
            self.output.flush()?;
            let Some(line) = self.read_line()? else {
                writeln!(self.output)?;
                break;
            };
            match parse_line(&line) {
                Ok(None) => continue,
                Ok(Some(ShellAction::Exit)) => break,
                Ok(Some(action)) => self.handle(action)?,
                Err(e) => writeln!(self.output, "{e}")?,
            }
        }
        Ok(())
    }

    fn handle(&mut self, action: ShellAction) -> io::Result<()> {
        debug!("Handling {:?}", action);
        match action {
            ShellAction::List => self.render_listing(),
            ShellAction::Pwd => self.render_breadcrumbs(),
            ShellAction::Help => writeln!(self.output, "{HELP}"),
            ShellAction::Exit => Ok(()),
            ShellAction::Run(Command::Delete { name }) => {
                if self.confirm(&format!("Really delete '{name}'?"))? {
                    self.run_command(Command::Delete { name })
                } else {
                    writeln!(self.output, "Cancelled")
                }
            }
            ShellAction::Run(command) => self.run_command(command),
        }
    }

    fn run_command(&mut self, command: Command) -> io::Result<()> {
        match self.session.dispatch(command) {
            Ok(Outcome::Moved(_)) => {
                self.render_breadcrumbs()?;
                self.render_listing()
            }
            Ok(Outcome::Changed) => self.render_listing(),
            Err(e) => {
                self.render_error(&e)?;
                if e.is_degraded() {
                    self.render_listing()?;
                }
                Ok(())
            }
        }
    }

    fn render_listing(&mut self) -> io::Result<()> {
        let color = self.color;
        let entries = self.session.listing();
        if entries.is_empty() {
            return writeln!(self.output, "  (empty)");
        }
        for (name, node) in entries {
            writeln!(self.output, "  {}", format_entry(name, node, color))?;
        }
        Ok(())
    }

    fn render_breadcrumbs(&mut self) -> io::Result<()> {
        let trail = self
            .session
            .breadcrumbs()
            .into_iter()
            .map(|(label, _)| label)
            .collect::<Vec<_>>()
            .join(" / ");
        writeln!(self.output, "{trail}")
    }

    fn render_error(&mut self, error: &NamespaceError) -> io::Result<()> {
        match error {
            NamespaceError::PersistFailure { source } => writeln!(
                self.output,
                "{error}: {source}. The change is kept for this session only."
            ),
            _ => writeln!(self.output, "{error}"),
        }
    }

    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        write!(self.output, "{question} [y/N] ")?;
        self.output.flush()?;
        let answer = self.read_line()?.unwrap_or_default();
        Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

fn format_entry(name: &str, node: &FilesystemNode, color: bool) -> String {
    match node {
        FilesystemNode::Folder { .. } if color => format!("📁 {}/", name.blue().bold()),
        FilesystemNode::Folder { .. } => format!("📁 {name}/"),
        FilesystemNode::File {} => format!("📄 {name}"),
    }
}

fn parse_line(line: &str) -> Result<Option<ShellAction>, ParseError> {
    let words = tokenize(line)?;
    let Some((name, args)) = words.split_first() else {
        return Ok(None);
    };

    let action = match (name.as_str(), args) {
        ("ls", []) => ShellAction::List,
        ("pwd", []) => ShellAction::Pwd,
        ("help", _) => ShellAction::Help,
        ("exit" | "quit", []) => ShellAction::Exit,
        ("cd", []) => ShellAction::Run(Command::NavigateTo {
            path: NodePath::root(),
        }),
        ("cd", [target]) if target == ".." => ShellAction::Run(Command::Up),
        ("cd", [target]) if target.starts_with('/') => ShellAction::Run(Command::NavigateTo {
            path: NodePath::parse(target),
        }),
        ("cd", [target]) => ShellAction::Run(Command::Navigate {
            name: target.clone(),
        }),
        ("mkdir", [folder]) => ShellAction::Run(Command::CreateFolder {
            name: folder.clone(),
        }),
        ("touch", [file]) => ShellAction::Run(Command::CreateFile { name: file.clone() }),
        ("mv", [from, to]) => ShellAction::Run(Command::Rename {
            from: from.clone(),
            to: to.clone(),
        }),
        ("move", [item, destination]) => ShellAction::Run(Command::Move {
            name: item.clone(),
            destination: NodePath::parse(destination),
        }),
        ("rm", [item]) => ShellAction::Run(Command::Delete { name: item.clone() }),
        ("ls" | "pwd" | "exit" | "quit" | "cd" | "mkdir" | "touch" | "mv" | "move" | "rm", _) => {
            return Err(ParseError::Usage {
                command: name.clone(),
            });
        }
        _ => {
            return Err(ParseError::UnknownCommand {
                command: name.clone(),
            });
        }
    };
    Ok(Some(action))
}

/// Splits on whitespace; double quotes group words and allow empty names.
fn tokenize(line: &str) -> Result<Vec<String>, ParseError> {
    let mut words = Vec::new();
    let mut current: Option<String> = None;
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                current.get_or_insert_with(String::new);
            }
            c if c.is_whitespace() && !quoted => {
                if let Some(word) = current.take() {
                    words.push(word);
                }
            }
            c => current.get_or_insert_with(String::new).push(c),
        }
    }

    if quoted {
        return Err(ParseError::UnterminatedQuote);
    }
    words.extend(current);
    Ok(words)
}

#[derive(Debug, Snafu, PartialEq, Eq)]
enum ParseError {
    #[snafu(display("Unknown command '{}', try 'help'", command))]
    UnknownCommand { command: String },
    #[snafu(display("Wrong arguments for '{}', try 'help'", command))]
    Usage { command: String },
    #[snafu(display("Missing closing quote"))]
    UnterminatedQuote,
}
