//! Command-line interface: facts, split and join.

use clap::{Parser, Subcommand};

use crate::error::Result;
use crate::models::Block;
use crate::output::{print_facts, print_subnet_table, print_warnings, subnets_to_csv};
use crate::processing::{
    apply_provider, join_subnets, split_subnet, CloudProvider, SplitOptions, SplitRequest,
};
use crate::plan_root;

/// IPv4/IPv6 subnet planning from the terminal.
#[derive(Parser, Debug)]
#[command(name = "subnet-planner", version, about)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the addressing facts of one block.
    Facts {
        /// Block in CIDR form, e.g. 10.0.0.0/24 or 2001:db8::/48.
        cidr: String,
        /// Overlay a cloud provider's reserved addresses.
        #[arg(long, value_enum, default_value = "standard")]
        provider: CloudProvider,
    },
    /// Split a block into equal children or down to a target prefix.
    Split {
        /// Parent block in CIDR form.
        cidr: String,
        /// Number of equal children (rounded up to a power of two).
        #[arg(long, conflicts_with = "target_prefix")]
        count: Option<u64>,
        /// Target prefix length for the children.
        #[arg(long)]
        target_prefix: Option<u8>,
        /// Overlay a cloud provider's limits and reservations.
        #[arg(long, value_enum, default_value = "standard")]
        provider: CloudProvider,
        /// Cap on the number of children.
        #[arg(long, default_value_t = 1000)]
        max_results: usize,
        /// Return the first max-results children instead of failing over-cap.
        #[arg(long)]
        truncate: bool,
        /// Emit CSV instead of a table.
        #[arg(long)]
        csv: bool,
        /// Emit JSON instead of a table.
        #[arg(long, conflicts_with = "csv")]
        json: bool,
    },
    /// Join sibling blocks back into their parent.
    Join {
        /// Sibling blocks in CIDR form, any order.
        #[arg(required = true, num_args = 2..)]
        cidrs: Vec<String>,
    },
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Command::Facts { cidr, provider } => run_facts(&cidr, provider),
            Command::Split {
                cidr,
                count,
                target_prefix,
                provider,
                max_results,
                truncate,
                csv,
                json,
            } => {
                let request = match (count, target_prefix) {
                    (Some(count), _) => SplitRequest::Equal { count },
                    (None, Some(target_prefix)) => SplitRequest::Custom { target_prefix },
                    (None, None) => {
                        return Err(crate::Error::InvalidSplitRequest(
                            "pass either --count or --target-prefix".to_string(),
                        ))
                    }
                };
                let opts = SplitOptions {
                    max_results,
                    truncate,
                    provider,
                };
                run_split(&cidr, &request, &opts, csv, json)
            }
            Command::Join { cidrs } => run_join(&cidrs),
        }
    }
}

fn run_facts(cidr: &str, provider: CloudProvider) -> Result<()> {
    let root = plan_root(cidr)?;
    let facts = root.block.facts();
    let overlay = match provider {
        CloudProvider::Standard => None,
        _ => Some(apply_provider(&root.block, provider)?),
    };
    print_facts(&facts, overlay.as_ref());
    Ok(())
}

fn run_split(
    cidr: &str,
    request: &SplitRequest,
    opts: &SplitOptions,
    csv: bool,
    json: bool,
) -> Result<()> {
    let parent = plan_root(cidr)?;
    let outcome = split_subnet(&parent, request, opts)?;
    print_warnings(&outcome.validation.warnings);
    if csv {
        print!("{}", subnets_to_csv(&outcome.subnets));
    } else if json {
        // serialization of our own records cannot fail
        match serde_json::to_string_pretty(&outcome.subnets) {
            Ok(text) => println!("{text}"),
            Err(e) => log::error!("JSON encoding failed: {e}"),
        }
    } else {
        print_subnet_table(&outcome.subnets);
    }
    Ok(())
}

fn run_join(cidrs: &[String]) -> Result<()> {
    let subnets = cidrs
        .iter()
        .map(|c| Block::from_cidr(c).map(crate::SplitSubnet::root))
        .collect::<Result<Vec<_>>>()?;
    let joined = join_subnets(&subnets)?;
    println!("{}", joined.cidr());
    Ok(())
}
