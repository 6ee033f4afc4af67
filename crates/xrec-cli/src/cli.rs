use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "xrec",
    about = "Inspect, hash and verify XREC serialized records",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// TOML file with decoder limits
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Decode a hex-encoded record and print its fields
    Decode(DecodeArgs),
    /// Hash a hex-encoded record
    Hash(HashArgs),
    /// Check a record against its format and verify its signature
    Verify(VerifyArgs),
    /// List the field registry
    Fields(FieldsArgs),
    /// List the known record formats
    Formats(FormatsArgs),
}

#[derive(Args)]
pub struct DecodeArgs {
    pub hex: String,
}

#[derive(Args)]
pub struct HashArgs {
    pub hex: String,
    /// Hash only the signing fields
    #[arg(long)]
    pub signing: bool,
    /// Three-letter hash prefix tag
    #[arg(long, default_value = "txn")]
    pub prefix: String,
    #[arg(long, default_value = "blake3")]
    pub digest: String,
}

#[derive(Args)]
pub struct VerifyArgs {
    pub hex: String,
    #[arg(long, default_value = "stx")]
    pub prefix: String,
}

#[derive(Args)]
pub struct FieldsArgs {
    /// Only list fields of this wire type
    #[arg(long)]
    pub kind: Option<String>,
}

#[derive(Args)]
pub struct FormatsArgs {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_decode() {
        let cli = Cli::try_parse_from(["xrec", "decode", "1200002400000001"]).unwrap();
        if let Command::Decode(args) = cli.command {
            assert_eq!(args.hex, "1200002400000001");
        } else {
            panic!("wrong command");
        }
        assert!(matches!(cli.format, OutputFormat::Text));
    }

    #[test]
    fn parse_decode_json() {
        let cli = Cli::try_parse_from(["xrec", "decode", "--format", "json", "AB"]).unwrap();
        assert!(matches!(cli.format, OutputFormat::Json));
    }

    #[test]
    fn parse_hash_defaults() {
        let cli = Cli::try_parse_from(["xrec", "hash", "AB"]).unwrap();
        if let Command::Hash(args) = cli.command {
            assert!(!args.signing);
            assert_eq!(args.prefix, "txn");
            assert_eq!(args.digest, "blake3");
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_hash_signing() {
        let cli = Cli::try_parse_from([
            "xrec", "hash", "AB", "--signing", "--prefix", "stx", "--digest", "sha512half",
        ])
        .unwrap();
        if let Command::Hash(args) = cli.command {
            assert!(args.signing);
            assert_eq!(args.prefix, "stx");
            assert_eq!(args.digest, "sha512half");
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_verify() {
        let cli = Cli::try_parse_from(["xrec", "verify", "AB"]).unwrap();
        if let Command::Verify(args) = cli.command {
            assert_eq!(args.prefix, "stx");
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_fields_kind() {
        let cli = Cli::try_parse_from(["xrec", "fields", "--kind", "UInt32"]).unwrap();
        if let Command::Fields(args) = cli.command {
            assert_eq!(args.kind, Some("UInt32".into()));
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_formats() {
        let cli = Cli::try_parse_from(["xrec", "formats"]).unwrap();
        assert!(matches!(cli.command, Command::Formats(_)));
    }

    #[test]
    fn parse_global_options() {
        let cli =
            Cli::try_parse_from(["xrec", "-v", "--config", "limits.toml", "formats"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("limits.toml")));
    }

    #[test]
    fn missing_hex_is_rejected() {
        assert!(Cli::try_parse_from(["xrec", "decode"]).is_err());
    }
}
