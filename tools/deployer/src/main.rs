use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Stdio},
    str::FromStr,
};

use alloy_primitives::Address;
use alloy_sol_types::{sol, SolCall, SolValue};
use anyhow::{anyhow, Context, Result};
use clap::Parser;
use regex::Regex;
use serde_json::{json, Value};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

sol! {
    function setUp(bytes initializeParams);
}

/// Deploy the guard with `cargo stylus deploy`, then record the deployment
/// and the provisioning calldata in a machine-readable JSON.
///
/// This stays a thin wrapper over the canonical `cargo stylus deploy`
/// workflow; what it adds is the `setUp(owner, avatar, executor)` calldata
/// the operator still has to send (the guard is inert until provisioned),
/// plus a deployments file that integration tooling can consume.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Directory containing the guard contract crate.
    #[arg(long, default_value = "src/blacklist-guard")]
    contract_dir: PathBuf,

    /// RPC URL used by `cargo stylus deploy`.
    #[arg(long, env = "RPC_URL")]
    rpc_url: String,

    /// Path to a file containing the deployer private key.
    #[arg(long, env = "PRIV_KEY_PATH", conflicts_with = "private_key")]
    private_key_path: Option<String>,

    /// Private key (hex string, 0x...).
    #[arg(long, env = "PKEY", conflicts_with = "private_key_path")]
    private_key: Option<String>,

    /// Administrative owner the guard should be provisioned with.
    #[arg(long)]
    owner: String,

    /// The governed avatar account.
    #[arg(long)]
    avatar: String,

    /// The delayed-execution relay (or the avatar itself for synchronous
    /// delivery).
    #[arg(long)]
    executor: String,

    /// Path to write deployment info (eg, deployments.devnet.json).
    #[arg(long, default_value = "deployments.devnet.json")]
    deployments_path: PathBuf,

    /// Key under `deployments` to store this contract.
    #[arg(long, default_value = "blacklist-guard")]
    contract_key: String,

    /// Optional network name (eg, devnet, arb-sepolia).
    #[arg(long, default_value = "devnet")]
    network: String,

    /// Extra args to pass through to `cargo stylus deploy` (after `--`).
    #[arg(last = true)]
    passthrough: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let owner = parse_address(&cli.owner).context("invalid --owner")?;
    let avatar = parse_address(&cli.avatar).context("invalid --avatar")?;
    let executor = parse_address(&cli.executor).context("invalid --executor")?;
    if owner == Address::ZERO {
        return Err(anyhow!("--owner must not be the zero address"));
    }

    let deployed = run_cargo_stylus_deploy(&cli)?;
    let setup_calldata = setup_calldata(owner, avatar, executor);
    write_deployments_json(&cli, &deployed, &setup_calldata)?;

    println!("Deployed `{}` to {}", cli.contract_key, deployed.address);
    println!("Provision it with setUp calldata: 0x{}", hex::encode(&setup_calldata));
    Ok(())
}

fn parse_address(s: &str) -> Result<Address> {
    Address::from_str(s).map_err(|e| anyhow!("{e}"))
}

/// The `setUp(bytes)` calldata carrying ABI-encoded `(owner, avatar, executor)`.
fn setup_calldata(owner: Address, avatar: Address, executor: Address) -> Vec<u8> {
    let initialize_params = (owner, avatar, executor).abi_encode_params();
    setUpCall {
        initializeParams: initialize_params.into(),
    }
    .abi_encode()
}

struct Deployed {
    address: String,
    tx_hashes: Vec<String>,
}

fn run_cargo_stylus_deploy(cli: &Cli) -> Result<Deployed> {
    // Output lines we parse:
    //   Deploying program to address 0x...
    //   Confirmed tx 0x...
    let re_address = Regex::new(r"Deploying program to address (0x[a-fA-F0-9]{40})")?;
    let re_tx = Regex::new(r"Confirmed tx (0x[a-fA-F0-9]{64})")?;

    let mut cmd = Command::new("cargo");
    cmd.current_dir(&cli.contract_dir)
        .arg("stylus")
        .arg("deploy")
        .arg("-e")
        .arg(&cli.rpc_url)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    match (&cli.private_key_path, &cli.private_key) {
        (Some(pk_path), _) => {
            cmd.arg("--private-key-path").arg(pk_path);
        }
        (None, Some(pk)) => {
            cmd.arg("--private-key").arg(pk);
        }
        (None, None) => {
            return Err(anyhow!(
                "missing deployer key: provide --private-key-path or --private-key (or set PRIV_KEY_PATH/PKEY)"
            ));
        }
    }
    cmd.args(&cli.passthrough);

    let output = cmd.output().context("failed to run `cargo stylus deploy`")?;
    let combined = format!(
        "{}\n{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    if !output.status.success() {
        return Err(anyhow!(
            "`cargo stylus deploy` failed (exit {}):\n{}",
            output.status,
            combined
        ));
    }

    let address = re_address
        .captures(&combined)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| {
            anyhow!("could not parse deployed address from `cargo stylus deploy` output")
        })?;
    let tx_hashes = re_tx
        .captures_iter(&combined)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .collect();

    Ok(Deployed { address, tx_hashes })
}

fn write_deployments_json(cli: &Cli, deployed: &Deployed, setup_calldata: &[u8]) -> Result<()> {
    let now = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string());

    let mut root: Value = if cli.deployments_path.exists() {
        let existing = fs::read_to_string(&cli.deployments_path)
            .with_context(|| format!("failed reading {}", cli.deployments_path.display()))?;
        serde_json::from_str(&existing)
            .with_context(|| format!("failed parsing JSON in {}", cli.deployments_path.display()))?
    } else {
        json!({})
    };
    if !root.is_object() {
        root = json!({});
    }

    root["network"] = json!(cli.network);
    root["updated_at"] = json!(now);
    if root.get("deployments").and_then(Value::as_object).is_none() {
        root["deployments"] = json!({});
    }

    let mut entry = json!({
        "address": deployed.address,
        "rpc_url": cli.rpc_url,
        "deployed_at": now,
        "owner": cli.owner,
        "avatar": cli.avatar,
        "executor": cli.executor,
        "setup_calldata": format!("0x{}", hex::encode(setup_calldata)),
    });
    if !deployed.tx_hashes.is_empty() {
        entry["tx_hashes"] = json!(deployed.tx_hashes);
    }
    root["deployments"][&cli.contract_key] = entry;

    write_json_atomic(&cli.deployments_path, &root)
}

fn write_json_atomic(path: &Path, value: &Value) -> Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    if !parent.exists() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed creating directory {}", parent.display()))?;
    }

    let serialised =
        serde_json::to_string_pretty(value).context("failed serialising deployments JSON")?;
    let tmp_path = {
        let mut tmp = path.as_os_str().to_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    };
    fs::write(&tmp_path, serialised.as_bytes())
        .with_context(|| format!("failed writing temp file {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("failed replacing {}", path.display()))?;
    Ok(())
}
