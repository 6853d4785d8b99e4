use clap::Parser;
use todo::cli::commands::Cli;
use todo::cli::handlers;
use todo::context::AppContext;
use todo::logging;

fn main() {
    let cli = Cli::parse();

    let ctx = match AppContext::load(
        cli.config.as_deref().map(std::path::Path::new),
        cli.data_dir.as_deref().map(std::path::Path::new),
        cli.remote,
    ) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        None => {
            // No subcommand → launch TUI
            if let Err(e) = logging::init_file(&ctx.log_path()) {
                eprintln!("warning: logging disabled: {}", e);
            }
            todo::tui::run(&ctx)
        }
        Some(_) => {
            logging::init_stderr();
            handlers::dispatch(cli, &ctx)
        }
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
