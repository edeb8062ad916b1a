//! Fetch a public key by email and print it.
//!
//! ```text
//! cargo run --example lookup -- lookup.example@antontsv.github.io --names
//! RUST_LOG=pks_lookup=debug cargo run --example lookup -- someone@example.org
//! ```

use std::time::Duration;

use clap::Parser;
use colored::Colorize;
use pks_lookup::{DefaultKeyLookup, Keyring, LookupConfig, LookupContext, PgpKeyring};
use tracing_subscriber::EnvFilter;

/// Look up a PGP public key on a keyserver by email.
#[derive(Parser, Debug)]
#[command(name = "lookup", version, about, long_about = None)]
struct Args {
    /// Email address to search for
    email: String,

    /// Give up after this many seconds
    #[arg(long, default_value_t = 3)]
    timeout: u64,

    /// Lookup endpoint to query
    #[arg(long, default_value = pks_lookup::DEFAULT_KEYSERVER_URL)]
    keyserver: String,

    /// Print identity names instead of the armored key
    #[arg(long)]
    names: bool,
}

fn success(msg: &str) {
    println!("  {} {}", "✓".green(), msg);
}

fn error(msg: &str) {
    eprintln!("  {} {}", "✗".red(), msg);
}

async fn run(args: &Args) -> pks_lookup::Result<()> {
    let lookup = DefaultKeyLookup::new(&LookupConfig::for_keyserver(args.keyserver.as_str()))?;
    let ctx = LookupContext::with_timeout(Duration::from_secs(args.timeout));
    let key = lookup.lookup(&ctx, &args.email).await?;

    if !args.names {
        println!("{key}");
        return Ok(());
    }

    let keys = PgpKeyring::new().read_armored(key.as_str())?;
    for identity in &keys[0].identities {
        success(&identity.name);
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if let Err(e) = run(&args).await {
        error(&format!("Error: {e}"));
        std::process::exit(1);
    }
}
