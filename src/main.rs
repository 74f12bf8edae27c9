use clap::Parser;
use miette::Result;
use regwiz::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    init_logging(global.verbose);

    match cli.command {
        Commands::Run(args) => regwiz::cli::commands::run::run(args, &global),
        Commands::Submit(args) => regwiz::cli::commands::submit::run(args, &global),
        Commands::Validate(args) => regwiz::cli::commands::validate::run(args),
        Commands::Steps => regwiz::cli::commands::steps::run(&global),
        Commands::Schema(args) => regwiz::cli::commands::schema::run(args),
        Commands::Completions(args) => regwiz::cli::commands::completions::run(args),
    }
}

/// Log to stderr so prompts and command output on stdout stay clean.
/// `REGWIZ_LOG` takes an env-filter directive and wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("REGWIZ_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
