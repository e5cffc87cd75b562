//! Command-line interface.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::info;
use typehash_codegen::UpdateOutcome;

use crate::generator::{load_message, Generator};

#[derive(Debug, Parser)]
#[command(name = "typehash")]
#[command(
    about = "Compile EIP-712 typed-data schemas into Solidity hashing code",
    long_about = None
)]
pub struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Regenerate the sentinel regions of a Solidity file in place.
    Generate {
        /// JSON schema: a type map or a typed-data document with "types".
        #[arg(short, long, value_name = "FILE")]
        schema: PathBuf,

        /// Solidity file containing the SETUP and BODY regions.
        #[arg(short, long, value_name = "FILE")]
        target: PathBuf,

        /// JSON generator configuration.
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Fail if the target is out of date instead of rewriting it.
        #[arg(long)]
        check: bool,

        /// Emit console.log calls in the generated getters.
        #[arg(long)]
        debug_logging: bool,
    },

    /// Print the generated SETUP and BODY blocks.
    Print {
        #[arg(short, long, value_name = "FILE")]
        schema: PathBuf,

        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Print canonical type strings and type hashes.
    TypeHash {
        #[arg(short, long, value_name = "FILE")]
        schema: PathBuf,

        /// Only this type.
        #[arg(long = "type", value_name = "NAME")]
        type_name: Option<String>,
    },

    /// Compute the struct hash of a JSON message.
    Hash {
        #[arg(short, long, value_name = "FILE")]
        schema: PathBuf,

        /// Primary type of the message.
        #[arg(long = "type", value_name = "NAME")]
        type_name: String,

        /// JSON message file.
        #[arg(short, long, value_name = "FILE")]
        message: PathBuf,
    },
}

/// Execute a parsed command, writing results to `out`.
pub fn run(command: Command, out: &mut impl Write) -> anyhow::Result<()> {
    match command {
        Command::Generate {
            schema,
            target,
            config,
            check,
            debug_logging,
        } => {
            let mut generator = Generator::from_files(&schema, config.as_deref())?;
            if debug_logging {
                generator.config_mut().debug_logging = true;
            }
            if check {
                let outcome = generator
                    .check_file(&target)
                    .with_context(|| format!("checking {}", target.display()))?;
                if outcome == UpdateOutcome::Updated {
                    bail!("{} is out of date", target.display());
                }
                writeln!(out, "{} is up to date", target.display())?;
            } else {
                let outcome = generator
                    .update_file(&target)
                    .with_context(|| format!("updating {}", target.display()))?;
                info!(path = %target.display(), ?outcome, "generation finished");
                let status = match outcome {
                    UpdateOutcome::Updated => "updated",
                    UpdateOutcome::Unchanged => "unchanged",
                };
                writeln!(out, "{}: {status}", target.display())?;
            }
        }

        Command::Print { schema, config } => {
            let generator = Generator::from_files(&schema, config.as_deref())?;
            let code = generator.generate()?;
            let markers = &generator.config().markers;
            writeln!(out, "{}", markers.setup_begin)?;
            writeln!(out, "{}", code.setup_block())?;
            writeln!(out, "{}", markers.setup_end)?;
            writeln!(out, "{}", markers.body_begin)?;
            writeln!(out, "{}", code.body_block())?;
            writeln!(out, "{}", markers.body_end)?;
        }

        Command::TypeHash { schema, type_name } => {
            let generator = Generator::from_files(&schema, None)?;
            for entry in generator.type_hashes(type_name.as_deref())? {
                writeln!(out, "{} {}", entry.type_hash.to_literal(), entry.type_string)?;
            }
        }

        Command::Hash {
            schema,
            type_name,
            message,
        } => {
            let generator = Generator::from_files(&schema, None)?;
            let message = load_message(&message)?;
            let hash = generator
                .hash_message(&type_name, &message)
                .with_context(|| format!("hashing {type_name} message"))?;
            writeln!(out, "{}", hash.to_literal())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate() {
        let cli = Cli::try_parse_from([
            "typehash",
            "generate",
            "--schema",
            "types.json",
            "--target",
            "Delegatable.sol",
            "--check",
        ])
        .unwrap();
        match cli.command {
            Command::Generate {
                schema,
                target,
                config,
                check,
                debug_logging,
            } => {
                assert_eq!(schema, PathBuf::from("types.json"));
                assert_eq!(target, PathBuf::from("Delegatable.sol"));
                assert!(config.is_none());
                assert!(check);
                assert!(!debug_logging);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_type_hash_with_type() {
        let cli = Cli::try_parse_from([
            "typehash", "-v", "type-hash", "-s", "t.json", "--type", "Mail",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Command::TypeHash { type_name: Some(ref t), .. } if t == "Mail"
        ));
    }

    #[test]
    fn test_hash_requires_message() {
        let parsed = Cli::try_parse_from(["typehash", "hash", "-s", "t.json", "--type", "Mail"]);
        assert!(parsed.is_err());
    }
}
