use anyhow::Result;
use clap::Parser;
use clap::error::{ContextKind, ErrorKind};

use npmrc::{
    commands::{self, Action},
    error::{NpmrcError, USAGE},
    logging,
    paths::Paths,
    profiles::ProfileStore,
    ui::{ColorMode, Ui},
};

#[derive(Parser)]
#[command(name = "npmrc")]
#[command(about = "Switch between different .npmrc files with ease and grace")]
#[command(version, disable_help_flag = true)]
struct Cli {
    /// Create a new, empty npmrc file and activate it
    #[arg(short = 'c')]
    create: bool,

    /// Set the registry of the active npmrc file (au, eu, cn, default)
    #[arg(short = 'r')]
    registry: bool,

    /// Print help
    #[arg(short = 'h', long = "help")]
    help: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// When to use colors: always, auto, never
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    color: ColorMode,

    /// Name of the npmrc file (partial names match), or a registry alias with -r.
    /// Only the first one is used.
    names: Vec<String>,
}

fn help_text() -> String {
    format!(
        "npmrc\n\
         \n  Switch between different .npmrc files with ease and grace.\n\n\
         {USAGE}\n\n\
         Example:\n\n  \
         # Creating and activating a new .npmrc called \"work\":\n  \
         $ npmrc -c work\n\n  \
         # Switch betwen \"work\" and \"default\"\n  \
         $ npmrc work\n  \
         $ npmrc default\n\n  \
         # Use the European npm mirror in the active .npmrc\n  \
         $ npmrc -r eu\n"
    )
}

fn parse_error_detail(err: &clap::Error) -> String {
    match err.get(ContextKind::InvalidArg) {
        Some(arg) if err.kind() == ErrorKind::UnknownArgument => {
            format!("Unknown option: {}", arg)
        }
        _ => err
            .to_string()
            .lines()
            .next()
            .unwrap_or_default()
            .trim_start_matches("error: ")
            .to_string(),
    }
}

fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.kind() == ErrorKind::DisplayVersion => {
            e.print()?;
            return Ok(());
        }
        Err(e) => return Err(NpmrcError::Usage(parse_error_detail(&e)).into()),
    };

    let ui = Ui::new(cli.color, cli.no_color);
    logging::init_logging(ui.color_enabled);

    // Help exits with status 1, which existing scripts rely on.
    if cli.help {
        ui.println(help_text());
        std::process::exit(1);
    }

    let action = Action::from_args(cli.create, cli.registry, cli.names.into_iter().next())?;
    let store = ProfileStore::new(Paths::new()?);

    if commands::init(&store, &ui)? {
        return Ok(());
    }
    commands::run(&store, action, &ui)
}
