use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Operator CLI for the bond gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check gateway liveness and network connectivity
    Health,
    /// List bonds from the upstream service
    Bonds,
    /// Mint an identity token
    Mint {
        /// Recipient address
        to_address: String,
    },
    /// Issue a new bond
    IssueBond {
        name: String,
        /// Decimal price in the bond's smallest unit (uint160)
        initial_price: String,
        /// Decimal price in the bond's smallest unit (uint160)
        maturity_price: String,
        maturity_at: u64,
    },
    /// Mint bond tokens to a recipient
    MintTokens {
        bond_address: String,
        to_address: String,
        /// Decimal token amount (uint256)
        amount: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Health => {
            let res = client.get(format!("{}/health", cli.url)).send().await?;
            print_response(res).await?;
        }
        Commands::Bonds => {
            let res = client.get(format!("{}/api/bonds", cli.url)).send().await?;
            print_response(res).await?;
        }
        Commands::Mint { to_address } => {
            let res = client
                .get(format!("{}/api/nft/mint", cli.url))
                .query(&[("to_address", to_address)])
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::IssueBond {
            name,
            initial_price,
            maturity_price,
            maturity_at,
        } => {
            let res = client
                .get(format!("{}/api/bond/issue", cli.url))
                .query(&[
                    ("name", name),
                    ("initial_price", initial_price),
                    ("maturity_price", maturity_price),
                    ("maturity_at", maturity_at.to_string()),
                ])
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::MintTokens {
            bond_address,
            to_address,
            amount,
        } => {
            let res = client
                .get(format!("{}/api/bond/mint-tokens", cli.url))
                .query(&[
                    ("bond_address", bond_address),
                    ("to_address", to_address),
                    ("amount", amount),
                ])
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let body: Value = res.json().await.unwrap_or(Value::Null);
    println!("HTTP {}", status);
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}
