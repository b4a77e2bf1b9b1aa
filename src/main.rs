use ascii_mosaic::cli::{handle_config_action, model_info, run_render, Args, Command};
use ascii_mosaic::config::Config;
use clap::Parser;

fn main() {
    let args = Args::parse();

    let config = match Config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let mut stdout = std::io::stdout().lock();
    let result = match &args.command {
        Command::Render(render) => run_render(render, &config, &mut stdout),
        Command::ModelInfo { path } => model_info(path.as_deref(), &config, &mut stdout),
        Command::Config { action } => {
            handle_config_action(action, args.config.as_deref(), &config, &mut stdout)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
