//! ie80211 command-line tool
//!
//! Parses information element blobs, resolves BSSIDs from raw MAC headers
//! and maps regulatory operating classes to frequencies.

use clap::{Arg, ArgAction, ArgMatches, Command};
use ieee80211_elems::{
    channel::{ieee80211_chan_to_freq, ieee80211_is_dfs},
    config::ElemsConfig,
    elems::parse_elems,
    header::{get_hdr_bssid, mac_to_string, FrameControl},
    ElemsError, Result,
};
use std::path::PathBuf;
use std::process;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

/// Default configuration file path
const DEFAULT_CONFIG_PATH: &str = "ie80211.toml";

fn cli() -> Command {
    Command::new("ie80211")
        .version(ieee80211_elems::VERSION)
        .about("IEEE 802.11 information element and header inspection")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .global(true),
        )
        .arg(
            Arg::new("log-level")
                .short('l')
                .long("log-level")
                .value_name("LEVEL")
                .help("Log level (trace, debug, info, warn, error)")
                .global(true),
        )
        .subcommand(
            Command::new("elems")
                .about("Parse an information element blob")
                .arg(
                    Arg::new("hex")
                        .value_name("HEX")
                        .help("Element bytes as hex")
                        .required(true),
                )
                .arg(
                    Arg::new("quiet")
                        .short('q')
                        .long("quiet")
                        .help("Suppress parser diagnostics")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("freq")
                .about("Map an operating class and channel to a frequency")
                .arg(
                    Arg::new("country")
                        .long("country")
                        .value_name("CC")
                        .help("Country code (defaults to the configured country)"),
                )
                .arg(
                    Arg::new("op-class")
                        .long("op-class")
                        .value_name("N")
                        .help("Operating class")
                        .value_parser(clap::value_parser!(u8))
                        .required(true),
                )
                .arg(
                    Arg::new("channel")
                        .long("channel")
                        .value_name("N")
                        .help("Channel number")
                        .value_parser(clap::value_parser!(u8))
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("bssid")
                .about("Find the BSSID in a raw 802.11 MAC header")
                .arg(
                    Arg::new("hex")
                        .value_name("HEX")
                        .help("Header bytes as hex")
                        .required(true),
                ),
        )
}

fn main() {
    let matches = cli().get_matches();

    if let Err(e) = run(&matches) {
        error!("{}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> Result<()> {
    let config = load_configuration(matches)?;

    let log_level = matches
        .get_one::<String>("log-level")
        .cloned()
        .unwrap_or_else(|| config.general.log_level.clone());
    init_logging(&log_level)?;

    debug!("ie80211 v{}", ieee80211_elems::VERSION);

    match matches.subcommand() {
        Some(("elems", sub)) => {
            let show_errors = config.parser.show_errors && !sub.get_flag("quiet");
            cmd_elems(required(sub, "hex")?, show_errors)
        }
        Some(("freq", sub)) => {
            let country = sub
                .get_one::<String>("country")
                .map(String::as_str)
                .or_else(|| config.country());
            let op_class = *sub
                .get_one::<u8>("op-class")
                .ok_or_else(|| missing("op-class"))?;
            let channel = *sub
                .get_one::<u8>("channel")
                .ok_or_else(|| missing("channel"))?;
            cmd_freq(country, op_class, channel)
        }
        Some(("bssid", sub)) => cmd_bssid(required(sub, "hex")?),
        _ => Err(ElemsError::InvalidParameter(
            "Use 'ie80211 --help' for usage information".to_string(),
        )),
    }
}

/// Initialize logging
fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(level)
        .map_err(|e| ElemsError::Config(format!("Invalid log level '{}': {}", level, e)))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// Load configuration from the given or default path
fn load_configuration(matches: &ArgMatches) -> Result<ElemsConfig> {
    match matches.get_one::<String>("config") {
        Some(path) => ElemsConfig::from_file(path),
        None => {
            let path = PathBuf::from(DEFAULT_CONFIG_PATH);
            if !path.exists() {
                return Ok(ElemsConfig::default());
            }
            ElemsConfig::from_file(&path)
        }
    }
}

fn cmd_elems(hex_arg: &str, show_errors: bool) -> Result<()> {
    let ies = decode_hex(hex_arg)?;
    info!("Parsing {} bytes of elements", ies.len());

    let (elems, res) = parse_elems(&ies, show_errors);
    if !res.is_well_formed() {
        warn!("Element stream is malformed");
    }

    let mut summary = serde_json::to_value(elems)?;
    if let Some(fields) = summary.as_object_mut() {
        fields.retain(|_, v| !v.is_null());
    }

    println!("result: {}", res.name());
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn cmd_freq(country: Option<&str>, op_class: u8, channel: u8) -> Result<()> {
    match ieee80211_chan_to_freq(country, op_class, channel) {
        Some(freq) => {
            println!("{} MHz", freq);
            println!("dfs: {}", ieee80211_is_dfs(freq));
        }
        None => {
            println!(
                "no frequency for op_class {} channel {} (country {})",
                op_class,
                channel,
                country.unwrap_or("global")
            );
        }
    }
    Ok(())
}

fn cmd_bssid(hex_arg: &str) -> Result<()> {
    let hdr = decode_hex(hex_arg)?;
    if let Some(fc) = FrameControl::parse(&hdr) {
        debug!("frame control {}", fc);
    }

    match get_hdr_bssid(&hdr) {
        Some(bssid) => println!("{}", mac_to_string(bssid)),
        None => println!("indeterminate"),
    }
    Ok(())
}

fn required<'a>(matches: &'a ArgMatches, id: &str) -> Result<&'a str> {
    matches
        .get_one::<String>(id)
        .map(String::as_str)
        .ok_or_else(|| missing(id))
}

fn missing(id: &str) -> ElemsError {
    ElemsError::InvalidParameter(format!("missing argument '{}'", id))
}

/// Decode hex input, ignoring whitespace, `:` separators and a `0x` prefix.
fn decode_hex(input: &str) -> Result<Vec<u8>> {
    let trimmed = input.trim();
    let trimmed = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let digits: String = trimmed
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':')
        .collect();

    hex::decode(&digits).map_err(|e| ElemsError::Parse(format!("Invalid hex input: {}", e)))
}
