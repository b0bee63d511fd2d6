// crates/agora-cli/src/commands/keys.rs
//
// `agora keys {generate, show}`: ed25519 key management. An account address
// is derived from the public key.

use std::fs;
use std::path::PathBuf;

use clap::Subcommand;
use ed25519_dalek::SigningKey;

use agora_core::Address;

use crate::config::CliConfig;

#[derive(Debug, Subcommand)]
pub enum KeysCmd {
    /// Generate a new ed25519 keypair and print its address.
    Generate {
        /// Key name. Files are written to `<data_dir>/keys/<name>.secret`.
        #[arg(long, default_value = "default")]
        name: String,

        /// Overwrite an existing key with the same name.
        #[arg(long)]
        force: bool,
    },
    /// Print the address of a stored key.
    Show {
        #[arg(long, default_value = "default")]
        name: String,
    },
}

pub fn run(cmd: &KeysCmd, config: &CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        KeysCmd::Generate { name, force } => generate(config, name, *force),
        KeysCmd::Show { name } => show(config, name),
    }
}

fn generate(config: &CliConfig, name: &str, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let keys_dir = config.keys_dir();
    fs::create_dir_all(&keys_dir)?;
    let secret_path = secret_path(config, name);
    if secret_path.exists() && !force {
        return Err(format!("key {} already exists at {}", name, secret_path.display()).into());
    }

    let (signing_key, address) = Address::generate();
    fs::write(&secret_path, hex::encode(signing_key.to_bytes()))?;
    fs::write(keys_dir.join(format!("{}.address", name)), address.to_string())?;

    println!("Key created successfully.");
    println!("  Address: {}", address);
    println!("  Saved to: {}", secret_path.display());
    println!();
    println!("IMPORTANT: Back up your secret key file securely.");
    Ok(())
}

fn show(config: &CliConfig, name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let path = secret_path(config, name);
    let contents = fs::read_to_string(&path)
        .map_err(|e| format!("cannot read key {}: {}. Run `agora keys generate` first.", path.display(), e))?;
    println!("{}", address_from_secret_hex(&contents)?);
    Ok(())
}

fn secret_path(config: &CliConfig, name: &str) -> PathBuf {
    config.keys_dir().join(format!("{}.secret", name))
}

/// Derive the address of a hex-encoded 32-byte ed25519 secret key.
fn address_from_secret_hex(secret: &str) -> Result<Address, Box<dyn std::error::Error>> {
    let bytes: [u8; 32] = hex::decode(secret.trim())?
        .try_into()
        .map_err(|_| "expected a 32-byte hex-encoded secret key")?;
    let key = SigningKey::from_bytes(&bytes);
    Ok(Address::from_public_key(&key.verifying_key()))
}
