use clap::Parser;
use subnet_planner::cli::Cli;

fn main() {
    // Do as little as possible in main.rs as it can't contain any tests
    // logging stays off when no config file is present
    let _ = log4rs::init_file("log4rs.yml", Default::default());
    log::info!("#Start main()");

    let cli = Cli::parse();
    if let Err(err) = cli.run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
