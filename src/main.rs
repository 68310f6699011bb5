use clap::Parser;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use promptvault::cli::{
    handle_check, handle_diff, handle_list, handle_log, handle_render, handle_show,
    handle_versions, Cli, Commands,
};

/// Log to stderr so stdout only carries command output.
fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.config();

    let result = match cli.command {
        Commands::List { json } => handle_list(&config, json),
        Commands::Versions { name, json } => handle_versions(&config, name, json),
        Commands::Show {
            name,
            prompt_version,
            json,
        } => handle_show(&config, name, prompt_version, json),
        Commands::Render {
            name,
            prompt_version,
            vars,
            strs,
            stdin,
            log,
            model,
        } => handle_render(&config, name, prompt_version, vars, strs, stdin, log, model),
        Commands::Diff {
            name,
            version_a,
            version_b,
        } => handle_diff(&config, name, version_a, version_b),
        Commands::Log {
            name,
            prompt_version,
            rendered,
            response,
            model,
            extra,
        } => handle_log(&config, name, prompt_version, rendered, response, model, extra),
        Commands::Check { json } => handle_check(&config, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
