use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Refresh the metadata of every minted token of a collection
    Refresh {
        #[arg(long, help = "Contract address of the ERC-721 collection")]
        contract: String,

        #[arg(
            long,
            default_value_t = 0,
            help = "Only refresh tokens whose id is at least this value"
        )]
        offset: u64,

        #[arg(
            long,
            help = "If specified, writes the JSON run report to this file"
        )]
        output: Option<String>,

        #[arg(long, help = "Print events as JSON lines instead of text")]
        json_events: bool,
    },
    /// Print the collection name and minted token ids as JSON
    Resolve {
        #[arg(long, help = "Contract address of the ERC-721 collection")]
        contract: String,

        #[arg(
            long,
            help = "If specified, writes the JSON to this file instead of stdout"
        )]
        output: Option<String>,
    },
    /// Print the effective configuration with secrets redacted
    CheckConfig,
}
