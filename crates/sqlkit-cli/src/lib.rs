mod cli;
mod compile;
mod dsn;

pub fn run(args: Vec<String>) -> anyhow::Result<()> {
    let cmd = cli::parse_args(&args)?;
    match cmd {
        cli::Command::Help(topic) => {
            cli::print_help(topic);
            Ok(())
        }
        cli::Command::Dsn(args) => dsn::run(args),
        cli::Command::Compile(args) => compile::run(args),
    }
}
