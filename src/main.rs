use anyhow::{Context, Result, anyhow};
use argh::FromArgs;
use catgt_commands::paths::Resolver;
use catgt_commands::settings::Settings;
use catgt_commands::{CommandConfigBuilder, DEFAULT_EXECUTABLE, OptionValue, locate};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(FromArgs)]
/// Print the CatGt command line for a run without executing it.
///
/// Options from a settings file are applied first; command-line values override
/// them. Options given with --set, --switch and --path follow in that order.
struct Args {
    #[argh(option)]
    /// settings file (TOML) describing the run.
    config: Option<PathBuf>,

    #[argh(option)]
    /// directory holding the SpikeGLX run; relative paths resolve against the current directory.
    dir: Option<PathBuf>,

    #[argh(option)]
    /// run name, e.g. g0.
    run: Option<String>,

    #[argh(option, short = 'g')]
    /// gate index.
    gate: Option<u32>,

    #[argh(option, short = 't')]
    /// trigger index.
    trigger: Option<u32>,

    #[argh(option)]
    /// name or path of the CatGt executable; defaults to CatGt.
    exe: Option<String>,

    #[argh(option)]
    /// option as name=value; the value type is inferred (bool, integer, decimal, comma list, text).
    set: Vec<String>,

    #[argh(option)]
    /// boolean option to switch on, e.g. --switch ap.
    switch: Vec<String>,

    #[argh(option)]
    /// path-valued option as name=path; the path is made absolute.
    path: Vec<String>,

    #[argh(switch)]
    /// print one argument per line instead of a single command line.
    tokens: bool,

    #[argh(switch)]
    /// replace the executable with its location found through PATH.
    resolve: bool,
}

fn main() -> ExitCode {
    init_tracing();
    let args: Args = argh::from_env();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("catgt-cmd: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Args) -> Result<()> {
    let mut builder = CommandConfigBuilder::new(PathBuf::new(), String::new());
    let mut executable = None;

    if let Some(file) = &args.config {
        let settings = Settings::load(file)
            .with_context(|| format!("can't load settings from {}", file.display()))?;
        executable = settings.executable.clone();
        builder = settings.apply(builder)?;
    }

    // Command-line paths are relative to where the user stands, not to the settings file.
    let cwd = Resolver::current()?;
    if let Some(dir) = &args.dir {
        // An empty directory is left for the builder to report as missing.
        let dir = if dir.as_os_str().is_empty() {
            dir.clone()
        } else {
            cwd.normalize(dir)?
        };
        builder = builder.base_path(dir);
    }
    if let Some(run) = args.run {
        builder = builder.run_name(run);
    }
    if let Some(gate) = args.gate {
        builder = builder.gate(gate);
    }
    if let Some(trigger) = args.trigger {
        builder = builder.trigger(trigger);
    }
    for assignment in &args.set {
        let (name, value) = split_assignment(assignment)?;
        builder = builder.option(name, OptionValue::infer(value));
    }
    for name in &args.switch {
        builder = builder.option(name, true);
    }
    for assignment in &args.path {
        let (name, value) = split_assignment(assignment)?;
        builder = builder.path_option(name, cwd.normalize(value)?);
    }

    let config = builder.build().context("invalid CatGt configuration")?;

    let mut executable = args
        .exe
        .or(executable)
        .unwrap_or_else(|| DEFAULT_EXECUTABLE.to_string());
    if args.resolve {
        executable = resolve(&executable)?;
    }

    if args.tokens {
        for token in config.render_tokens(&executable)? {
            println!("{}", token);
        }
    } else {
        println!("{}", config.render_string(&executable)?);
    }
    Ok(())
}

fn split_assignment(text: &str) -> Result<(&str, &str)> {
    text.split_once('=')
        .ok_or_else(|| anyhow!("expected name=value, got '{}'", text))
}

fn resolve(executable: &str) -> Result<String> {
    let search_paths = std::env::var_os("PATH").unwrap_or_default();
    let found = locate::find_executable(&search_paths, Path::new(executable))
        .ok_or_else(|| anyhow!("executable '{}' not found", executable))?;
    found
        .to_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow!("executable path {} is not valid UTF-8", found.display()))
}
