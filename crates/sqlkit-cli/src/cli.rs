use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpTopic {
    Root,
    Dsn,
    Compile,
}

#[derive(Debug, Clone)]
pub enum Command {
    Help(HelpTopic),
    Dsn(DsnArgs),
    Compile(CompileArgs),
}

#[derive(Debug, Clone)]
pub struct DsnArgs {
    /// Explicit config file; defaults to `config/<env>.yml` under the cwd
    pub config: Option<PathBuf>,
    pub env: String,
    pub show_password: bool,
}

#[derive(Debug, Clone)]
pub struct CompileArgs {
    pub json: bool,
    pub files: Vec<PathBuf>,
}

pub fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let mut it = args.iter().skip(1);
    let Some(first) = it.next() else {
        return Ok(Command::Help(HelpTopic::Root));
    };

    match first.as_str() {
        "-h" | "--help" | "help" => Ok(Command::Help(HelpTopic::Root)),
        "dsn" => parse_dsn(it.map(|s| s.as_str())),
        "compile" => parse_compile(it.map(|s| s.as_str())),
        _ => anyhow::bail!("unknown command: {first}"),
    }
}

fn parse_dsn<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut config: Option<PathBuf> = None;
    let mut env = "local".to_string();
    let mut show_password = false;

    while let Some(token) = it.next() {
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Dsn)),
            "--config" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--config requires a value");
                };
                config = Some(PathBuf::from(v));
            }
            _ if token.starts_with("--config=") => {
                config = Some(PathBuf::from(token.trim_start_matches("--config=")));
            }
            "--env" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--env requires a value");
                };
                env = v.to_string();
            }
            _ if token.starts_with("--env=") => {
                env = token.trim_start_matches("--env=").to_string();
            }
            "--show-password" => show_password = true,
            other => anyhow::bail!("unknown argument: {other}"),
        }
    }

    if env.trim().is_empty() {
        anyhow::bail!("--env must not be empty");
    }

    Ok(Command::Dsn(DsnArgs {
        config,
        env,
        show_password,
    }))
}

fn parse_compile<'a>(it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut json = false;
    let mut files: Vec<PathBuf> = Vec::new();

    for token in it {
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Compile)),
            "--json" => json = true,
            other if other.starts_with("--") => anyhow::bail!("unknown argument: {other}"),
            file => files.push(PathBuf::from(file)),
        }
    }

    Ok(Command::Compile(CompileArgs { json, files }))
}

pub fn print_help(topic: HelpTopic) {
    match topic {
        HelpTopic::Root => {
            println!(
                "\
sqlkit - inspect database config and compile query files

USAGE:
  sqlkit <COMMAND> [OPTIONS]

COMMANDS:
  dsn           Print the connection string and pool settings from config
  compile       Compile YAML query files into SQL and arguments

Run `sqlkit <command> --help` for more."
            );
        }
        HelpTopic::Dsn => {
            println!(
                "\
USAGE:
  sqlkit dsn [OPTIONS]

OPTIONS:
  --config <FILE>       Config file path (default: config/<env>.yml)
  --env <NAME>          Environment name (default: local)
  --show-password       Print the password instead of masking it
  -h, --help            Print help"
            );
        }
        HelpTopic::Compile => {
            println!(
                "\
USAGE:
  sqlkit compile [OPTIONS] [FILES...]

Reads query YAML from FILES, or from stdin when no files are given.

OPTIONS:
  --json                Print one JSON object per query
  -h, --help            Print help"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("sqlkit")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn no_args_prints_root_help() {
        let cmd = parse_args(&args(&[])).unwrap();
        assert!(matches!(cmd, Command::Help(HelpTopic::Root)));
    }

    #[test]
    fn parse_dsn_defaults() {
        let Command::Dsn(dsn) = parse_args(&args(&["dsn"])).unwrap() else {
            panic!("expected dsn");
        };
        assert_eq!(dsn.config, None);
        assert_eq!(dsn.env, "local");
        assert!(!dsn.show_password);
    }

    #[test]
    fn parse_dsn_with_options() {
        let cmd = parse_args(&args(&[
            "dsn",
            "--config=conf/prod.yml",
            "--env",
            "prod",
            "--show-password",
        ]))
        .unwrap();
        let Command::Dsn(dsn) = cmd else {
            panic!("expected dsn");
        };
        assert_eq!(dsn.config, Some(PathBuf::from("conf/prod.yml")));
        assert_eq!(dsn.env, "prod");
        assert!(dsn.show_password);
    }

    #[test]
    fn parse_dsn_missing_value() {
        assert!(parse_args(&args(&["dsn", "--config"])).is_err());
    }

    #[test]
    fn parse_compile_with_files() {
        let cmd = parse_args(&args(&["compile", "--json", "a.yml", "b.yml"])).unwrap();
        let Command::Compile(compile) = cmd else {
            panic!("expected compile");
        };
        assert!(compile.json);
        assert_eq!(
            compile.files,
            vec![PathBuf::from("a.yml"), PathBuf::from("b.yml")]
        );
    }

    #[test]
    fn unknown_command_is_rejected() {
        assert!(parse_args(&args(&["migrate"])).is_err());
        assert!(parse_args(&args(&["compile", "--verbose"])).is_err());
    }
}
