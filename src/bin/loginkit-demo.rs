use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use loginkit::{
    Dispatched, FormResult, LogLoginHandler, LoginConfig, LoginEvent, LoginField, LoginScreen,
};
use tracing_subscriber::EnvFilter;

const HELP: &str = "commands: username <v> | email <v> | password <v> | blur <field> | submit | reset | quit";

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("loginkit=info")),
        )
        .init();

    let config = match config_path() {
        Some(path) => match LoginConfig::load(&path) {
            Ok(config) => config,
            Err(error) => {
                eprintln!("{error}");
                return ExitCode::FAILURE;
            }
        },
        None => LoginConfig::default(),
    };

    let screen = match build_screen(&config) {
        Ok(screen) => screen,
        Err(error) => {
            eprintln!("{error}");
            return ExitCode::FAILURE;
        }
    };

    match run(&screen) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}

fn config_path() -> Option<String> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args.next();
        }
        if let Some(path) = arg.strip_prefix("--config=") {
            return Some(path.to_string());
        }
    }
    None
}

#[cfg(feature = "i18n")]
fn build_screen(config: &LoginConfig) -> FormResult<LoginScreen> {
    match &config.locale {
        Some(locale) => LoginScreen::localized(
            config.form,
            loginkit::I18nManager::with_locale(locale.as_str()),
        ),
        None => LoginScreen::new(config.form),
    }
}

#[cfg(not(feature = "i18n"))]
fn build_screen(config: &LoginConfig) -> FormResult<LoginScreen> {
    LoginScreen::new(config.form)
}

fn run(screen: &LoginScreen) -> Result<(), Box<dyn std::error::Error>> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{HELP}")?;
    writeln!(out, "{}", screen.view()?)?;

    for line in io::stdin().lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" {
            break;
        }
        if line == "reset" {
            screen.reset()?;
            writeln!(out, "{}", screen.view()?)?;
            continue;
        }

        let event = match parse_event(line) {
            Ok(event) => event,
            Err(message) => {
                writeln!(out, "{message}\n{HELP}")?;
                continue;
            }
        };
        match screen.dispatch(event, &LogLoginHandler)? {
            Dispatched::Submitted => writeln!(out, "submitted")?,
            Dispatched::SubmitBlocked => {
                if let Some(field) = screen.focus_target()? {
                    writeln!(out, "fix {field} first")?;
                }
            }
            Dispatched::Rejected | Dispatched::Updated => {}
        }
        writeln!(out, "{}", screen.view()?)?;
    }
    Ok(())
}

fn parse_event(line: &str) -> Result<LoginEvent, String> {
    let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
    match command {
        "submit" => Ok(LoginEvent::SubmitRequested),
        "blur" => rest
            .parse::<LoginField>()
            .map(|field| LoginEvent::Blurred { field })
            .map_err(|error| error.to_string()),
        other => other
            .parse::<LoginField>()
            .map(|field| LoginEvent::Changed {
                field,
                value: rest.to_string(),
            })
            .map_err(|_| format!("unknown command `{other}`")),
    }
}
