use airoute_cli::Cli;
use airoute_cli::exit_codes;
use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Help and version go to stdout and are not failures.
            let code = if err.use_stderr() {
                exit_codes::FAILURE
            } else {
                exit_codes::SUCCESS
            };
            let _ = err.print();
            std::process::exit(code);
        }
    };

    airoute_cli::init_logging(cli.global.verbose);
    std::process::exit(cli.run().await);
}
