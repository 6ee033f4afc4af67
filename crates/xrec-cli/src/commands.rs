use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, Context};
use colored::Colorize;
use tracing::{debug, warn};
use xrec_crypto::{digest_by_name, HashPrefix};
use xrec_protocol::{catalog, fields, verify_record, CodecConfig, Format, Record, RecordError};
use xrec_types::SerializedTypeId;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Command::Decode(args) => cmd_decode(args, &config, &cli.format),
        Command::Hash(args) => cmd_hash(args, &config),
        Command::Verify(args) => cmd_verify(args, &config),
        Command::Fields(args) => cmd_fields(args, &cli.format),
        Command::Formats(_) => cmd_formats(&cli.format),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<CodecConfig> {
    let Some(path) = path else {
        return Ok(CodecConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: CodecConfig =
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))?;
    debug!(?config, "loaded codec config");
    Ok(config)
}

fn parse_hex(input: &str) -> anyhow::Result<Vec<u8>> {
    let trimmed = input.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    hex::decode(digits).map_err(|e| {
        warn!(error = %e, "rejected hex input");
        anyhow!("invalid hex input: {e}")
    })
}

/// A decoded record, bound to its catalog format when one is recognized.
struct Decoded {
    record: Record,
    format: Option<&'static Format>,
    violation: Option<RecordError>,
}

fn decode(hex: &str, config: &CodecConfig) -> anyhow::Result<Decoded> {
    let bytes = parse_hex(hex)?;
    let mut record = Record::from_bytes_with(&bytes, config).map_err(|e| {
        warn!(error = %e, len = bytes.len(), "rejected record");
        e
    })?;
    let format = catalog().format_for(&record);
    let mut violation = None;
    if let Some(format) = format {
        let mut bound = record.clone();
        match bound.apply_template(format.template().clone()) {
            Ok(()) => record = bound,
            Err(e) => {
                warn!(format = format.name(), error = %e, "record does not match its format");
                violation = Some(e);
            }
        }
    }
    Ok(Decoded {
        record,
        format,
        violation,
    })
}

fn parse_prefix(tag: &str) -> anyhow::Result<HashPrefix> {
    HashPrefix::from_tag(tag).ok_or_else(|| anyhow!("unknown hash prefix: {tag}"))
}

fn cmd_decode(args: DecodeArgs, config: &CodecConfig, format: &OutputFormat) -> anyhow::Result<()> {
    let decoded = decode(&args.hex, config)?;
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&decoded.record.to_json())?);
        }
        OutputFormat::Text => {
            match decoded.format {
                Some(f) => println!("{} {}", "Format:".bold(), f.name().cyan()),
                None => println!("{} {}", "Format:".bold(), "unknown".dimmed()),
            }
            for (field, value) in decoded.record.present_fields() {
                println!("  {:<20} {}", field.name().yellow(), value);
            }
            if let Some(e) = decoded.violation {
                println!("{} {}", "!".red().bold(), e);
            }
        }
    }
    Ok(())
}

fn cmd_hash(args: HashArgs, config: &CodecConfig) -> anyhow::Result<()> {
    let digest =
        digest_by_name(&args.digest).ok_or_else(|| anyhow!("unknown digest: {}", args.digest))?;
    let prefix = parse_prefix(&args.prefix)?;
    let record = decode(&args.hex, config)?.record;
    let hash = if args.signing {
        record.signing_hash_with(digest, prefix)?
    } else {
        record.hash_with(digest, prefix)?
    };
    println!("{}", hash.to_hex());
    Ok(())
}

fn cmd_verify(args: VerifyArgs, config: &CodecConfig) -> anyhow::Result<()> {
    let prefix = parse_prefix(&args.prefix)?;
    let decoded = decode(&args.hex, config)?;
    match (decoded.format, &decoded.violation) {
        (Some(f), None) => println!("{} Matches format {}", "✓".green().bold(), f.name().cyan()),
        (Some(f), Some(e)) => {
            bail!("record does not match format {}: {e}", f.name());
        }
        (None, _) => println!("{} No known format", "-".dimmed()),
    }
    if !decoded.record.is_field_present(&fields::TXN_SIGNATURE) {
        println!("{} Unsigned", "-".dimmed());
        return Ok(());
    }
    let signer = verify_record(&decoded.record, prefix).map_err(|e| {
        warn!(error = %e, "signature rejected");
        e
    })?;
    println!("{} Signature valid", "✓".green().bold());
    println!("  Signer: {}", signer.account_id().to_hex().yellow());
    Ok(())
}

fn cmd_fields(args: FieldsArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let kind = match &args.kind {
        Some(name) => Some(
            SerializedTypeId::from_name(name).ok_or_else(|| anyhow!("unknown field type: {name}"))?,
        ),
        None => None,
    };
    let listed = fields::ALL
        .iter()
        .filter(|f| kind.map_or(true, |k| f.kind() == k));
    match format {
        OutputFormat::Json => {
            let rows: Vec<serde_json::Value> = listed
                .map(|f| {
                    serde_json::json!({
                        "name": f.name(),
                        "type": f.kind().name(),
                        "ordinal": f.ordinal(),
                        "signing": f.is_signing(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        OutputFormat::Text => {
            for f in listed {
                let signing = if f.is_signing() { "" } else { " (non-signing)" };
                println!(
                    "{:<24} {:<10} {:>3}{}",
                    f.name().bold(),
                    f.kind().name().cyan(),
                    f.ordinal(),
                    signing.dimmed()
                );
            }
        }
    }
    Ok(())
}

fn cmd_formats(format: &OutputFormat) -> anyhow::Result<()> {
    let c = catalog();
    let formats = c.transactions().iter().chain(c.ledger_entries());
    match format {
        OutputFormat::Json => {
            let rows: Vec<serde_json::Value> = formats
                .map(|f| {
                    let entries: Vec<serde_json::Value> = f
                        .template()
                        .entries()
                        .iter()
                        .map(|e| serde_json::json!({ "field": e.field.name(), "style": e.style.name() }))
                        .collect();
                    serde_json::json!({
                        "name": f.name(),
                        "kind": format!("{:?}", f.kind()),
                        "type": f.type_code(),
                        "fields": entries,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        OutputFormat::Text => {
            for f in formats {
                println!(
                    "{} {} ({:?}, {} fields)",
                    format!("{:>3}", f.type_code()).dimmed(),
                    f.name().bold(),
                    f.kind(),
                    f.template().len()
                );
            }
            for (field, template) in c.inner_objects() {
                println!("  {} {} ({} fields)", "inner".dimmed(), field.name().bold(), template.len());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn hex_accepts_prefix_and_whitespace() {
        assert_eq!(parse_hex(" 0x2400000001 ").unwrap(), vec![0x24, 0, 0, 0, 1]);
        assert!(parse_hex("zz").is_err());
    }

    #[test]
    fn config_defaults_without_file() {
        assert_eq!(load_config(None).unwrap(), CodecConfig::default());
    }

    #[test]
    fn config_from_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_depth = 3\nallow_trailing_bytes = true").unwrap();
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.max_depth, 3);
        assert!(config.allow_trailing_bytes);
        assert_eq!(config.max_blob_len, CodecConfig::default().max_blob_len);
    }

    #[test]
    fn decode_binds_known_format() {
        let payment = catalog().transaction_by_name("Payment").unwrap();
        let hex = hex::encode(payment.new_record().to_bytes().unwrap());
        let decoded = decode(&hex, &CodecConfig::default()).unwrap();
        assert_eq!(decoded.format.map(Format::name), Some("Payment"));
        assert!(decoded.violation.is_none());
        assert!(decoded.record.template().is_some());
    }

    #[test]
    fn decode_reports_format_mismatch() {
        // TransactionType = CheckCancel with no CheckID.
        let decoded = decode("120012", &CodecConfig::default()).unwrap();
        assert!(matches!(
            decoded.violation,
            Some(RecordError::TemplateViolation { .. })
        ));
        assert!(decoded.record.is_free());
    }

    #[test]
    fn unknown_prefix_is_an_error() {
        assert!(parse_prefix("zzz").is_err());
        assert_eq!(parse_prefix("STX").unwrap(), HashPrefix::TX_SIGN);
    }
}
