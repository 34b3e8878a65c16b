//! opnsense-dns - manage OPNsense Unbound host overrides the external-dns way.

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    opnsense_dns_cli::run().await
}
