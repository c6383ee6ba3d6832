use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "tx-composer")]
#[command(author = "quake")]
#[command(version)]
#[command(about = "Compose Ethereum transfers and Theta stake deposits from the terminal")]
pub struct Args {
    /// Tick rate in ticks per second
    #[arg(short, long, default_value_t = 4.0)]
    pub tick_rate: f64,

    /// Frame rate in frames per second
    #[arg(short, long, default_value_t = 60.0)]
    pub frame_rate: f64,

    /// Network preset (mainnet, testnet, offline)
    #[arg(short, long, default_value = "mainnet")]
    pub network: String,

    /// Custom Ethereum RPC URL (overrides network default)
    #[arg(long)]
    pub rpc_url: Option<String>,

    /// Data directory path
    #[arg(long)]
    pub data_dir: Option<String>,

    /// Wallet JSON file (defaults to wallet.json in the data directory)
    #[arg(short, long)]
    pub wallet: Option<String>,

    /// Stake purpose (validator, guardian)
    #[arg(short, long, default_value = "guardian")]
    pub purpose: String,

    /// Guardian node summary to stake to; hides the holder input
    #[arg(long)]
    pub guardian_summary: Option<String>,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
