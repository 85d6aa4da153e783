use bornier::{BlockStyle, QetProject, generate_terminal_blocks, layout_block};
use serde::Serialize;
use std::io::Read;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Bornier(bornier::Error),
    Json(serde_json::Error),
    UnknownBlock(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Bornier(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::UnknownBlock(name) => {
                write!(f, "No terminal block named {name:?} in the project")
            }
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<bornier::Error> for CliError {
    fn from(value: bornier::Error) -> Self {
        Self::Bornier(value)
    }
}

impl From<bornier::CoreError> for CliError {
    fn from(value: bornier::CoreError) -> Self {
        Self::Bornier(value.into())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Terminals,
    Blocks,
    Layout,
    Generate,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    block: Option<String>,
    style: Option<String>,
    out: Option<String>,
}

fn usage() -> &'static str {
    "bornier-cli\n\
\n\
USAGE:\n\
  bornier-cli [terminals] [--pretty] [<project.qet>|-]\n\
  bornier-cli blocks [<project.qet>|-]\n\
  bornier-cli layout --block <name> [--pretty] [--style <style.json>] [<project.qet>|-]\n\
  bornier-cli generate [--style <style.json>] [--out <path>] [<project.qet>|-]\n\
\n\
NOTES:\n\
  - If <project.qet> is omitted or '-', the project XML is read from stdin.\n\
  - terminals prints the extracted terminal table as JSON.\n\
  - blocks prints the terminal-block names, one per line.\n\
  - layout prints the geometry of one block as JSON.\n\
  - generate rewrites the project with the generated blocks; without --out the\n\
    input file is rewritten in place (an input path is then required).\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1).peekable();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "terminals" => args.command = Command::Terminals,
            "blocks" => args.command = Command::Blocks,
            "layout" => args.command = Command::Layout,
            "generate" => args.command = Command::Generate,
            "--pretty" => args.pretty = true,
            "--block" => {
                let Some(name) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.block = Some(name.clone());
            }
            "--style" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.style = Some(path.clone());
            }
            "--out" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(path.clone());
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn load_style(path: Option<&str>) -> Result<BlockStyle, CliError> {
    match path {
        None => Ok(BlockStyle::default()),
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&text)?)
        }
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

fn run(args: Args) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;
    let mut project = QetProject::parse(&text)?;

    match args.command {
        Command::Terminals => {
            write_json(&project.terminals(), args.pretty)?;
            Ok(())
        }
        Command::Blocks => {
            for name in project.block_names() {
                println!("{name}");
            }
            Ok(())
        }
        Command::Layout => {
            let Some(block) = args.block.as_deref() else {
                return Err(CliError::Usage(usage()));
            };
            if !project.block_names().iter().any(|n| n == block) {
                return Err(CliError::UnknownBlock(block.to_string()));
            }
            let style = load_style(args.style.as_deref())?;
            let layout = layout_block(&project, block, &style)?;
            write_json(&layout, args.pretty)?;
            Ok(())
        }
        Command::Generate => {
            let style = load_style(args.style.as_deref())?;
            let names = generate_terminal_blocks(&mut project, &style)?;

            let out = match (args.out.as_deref(), args.input.as_deref()) {
                (Some(out), _) => out,
                (None, Some(path)) if path != "-" => path,
                _ => {
                    return Err(CliError::Usage(
                        "generate from stdin requires --out <path>",
                    ));
                }
            };
            std::fs::write(out, project.to_xml_string())?;
            for name in names {
                eprintln!("generated TB_{name}.elmt");
            }
            Ok(())
        }
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    match run(args) {
        Ok(()) => {}
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
