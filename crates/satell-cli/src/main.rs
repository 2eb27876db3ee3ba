use clap::{CommandFactory, Parser, Subcommand};

mod call;
mod require;
mod utils;


use call::handle_call;
use require::{handle_list, handle_require};

#[derive(Parser)]
#[command(
    author,
    version = satell_ext::BUILD_INFO,
    about = "Satell native extension host",
    long_about = None,
    disable_help_subcommand = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Call a function of the built-in extension module
    Call {
        /// Function name (cpp_hello, cpp_version, split)
        function: String,
        /// Arguments, passed as strings
        args: Vec<String>,
        /// Parse arguments as literals: nil, true, false, numbers, anything else is a string
        #[arg(long)]
        typed: bool,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Require a module and list the names it exports
    Require {
        /// Module name
        module: String,
        /// Native search path; `;;` stands for the default path
        #[arg(long, env = "SATELL_CPATH")]
        cpath: Option<String>,
    },
    /// List the functions of the built-in extension module
    List,
}

fn main() {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("warn"));
    utils::install_panic_hook();

    let cli = Cli::parse();

    let status = match &cli.command {
        Some(Commands::Call {
            function,
            args,
            typed,
            json,
        }) => handle_call(function, args, *typed, *json),
        Some(Commands::Require { module, cpath }) => handle_require(module, cpath.as_deref()),
        Some(Commands::List) => handle_list(),
        None => {
            // No subcommand - print help
            let _ = Cli::command().print_help();
            Ok(())
        }
    };

    if let Err(message) = status {
        eprintln!("error: {message}");
        std::process::exit(1);
    }
}
