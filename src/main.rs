use tellraw_convert::{generate_tellraw, validate_tellraw_command, ConversionConfig, MnMode};

use std::io::{self, Read};

const USAGE: &str = "usage: tellraw [-v] [--mn font|color|suffix] [--mixed-merge] [--mixed-mode] <selector> [message]
       tellraw [-v] validate <command>

With no message, the message buffer is read from stdin.";

struct Args {
    config: ConversionConfig,
    verbose: bool,
    positional: Vec<String>,
}

fn parse_args(raw: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut args = Args {
        config: ConversionConfig::default(),
        verbose: false,
        positional: Vec::new(),
    };
    let mut raw = raw.peekable();
    while let Some(arg) = raw.next() {
        match arg.as_str() {
            "-v" | "--verbose" => args.verbose = true,
            "--mixed-merge" => args.config.mixed_range_merge = true,
            "--mixed-mode" => args.config.java_bedrock_mixed_mode = true,
            "--mn" => {
                let value = raw.next().ok_or("--mn needs a value")?;
                args.config.mn_mode =
                    MnMode::parse(&value).ok_or_else(|| format!("unknown --mn mode '{}'", value))?;
            }
            "-h" | "--help" => return Err(USAGE.to_string()),
            "--" => {
                args.positional.extend(raw.by_ref());
            }
            _ => args.positional.push(arg),
        }
    }
    Ok(args)
}

fn init_logging() {
    if let Err(e) = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(tracing_subscriber::filter::LevelFilter::DEBUG)
        .try_init()
    {
        eprintln!("warning: verbose logging unavailable: {}", e);
    }
}

fn main() {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{}", message);
            std::process::exit(2);
        }
    };
    if args.verbose {
        init_logging();
    }

    match args.positional.as_slice() {
        [cmd, command @ ..] if cmd == "validate" && !command.is_empty() => {
            match validate_tellraw_command(&command.join(" ")) {
                Ok(()) => println!("ok"),
                Err(err) => {
                    eprintln!("{}: {}", err.code(), err);
                    std::process::exit(1);
                }
            }
        }
        [selector, message @ ..] => {
            let message = if message.is_empty() {
                let mut input = String::new();
                if let Err(err) = io::stdin().read_to_string(&mut input) {
                    eprintln!("failed to read stdin: {}", err);
                    std::process::exit(1);
                }
                input.trim_end_matches(['\r', '\n']).to_string()
            } else {
                message.join(" ")
            };
            let output = generate_tellraw(selector, &message, &args.config);
            println!("{}", output.java_command);
            println!("{}", output.bedrock_command);
            for warning in &output.warnings {
                eprintln!("warning: {}", warning);
            }
        }
        [] => {
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Result<Args, String> {
        parse_args(raw.iter().map(|s| s.to_string()))
    }

    #[test]
    fn logging_initializes_twice() {
        init_logging();
        init_logging();
        log::debug!("still running");
    }

    #[test]
    fn flags_set_config() {
        let parsed = args(&["-v", "--mn", "color", "--mixed-mode", "@a", "hi"]).unwrap();
        assert!(parsed.verbose);
        assert_eq!(parsed.config.mn_mode, MnMode::Color);
        assert!(parsed.config.java_bedrock_mixed_mode);
        assert_eq!(parsed.positional, ["@a", "hi"]);
        assert!(args(&["--mn", "bogus"]).is_err());
    }
}
