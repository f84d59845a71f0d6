//! Terminal output for blocks and subnet plans.

use colored::Colorize;

use crate::models::{BlockFacts, SplitSubnet};
use crate::processing::CloudOverlay;

/// Format a value as a right-aligned field of at least `width` characters.
pub fn format_field<T: ToString>(value: T, width: usize) -> String {
    let value_str = value.to_string();
    if value_str.len() >= width {
        value_str
    } else {
        format!("{value_str:>width$}")
    }
}

/// Print the addressing facts of one block, with an optional provider overlay.
pub fn print_facts(facts: &BlockFacts, overlay: Option<&CloudOverlay>) {
    println!("{}", facts.cidr.bold());
    println!("  Network:      {}", facts.network);
    println!("  Last address: {}", facts.last);
    let first_host = overlay
        .and_then(|o| o.first_usable_address.as_deref())
        .unwrap_or(&facts.first_host);
    println!("  First host:   {}", first_host);
    println!("  Last host:    {}", facts.last_host);
    if let Some(mask) = &facts.subnet_mask {
        println!("  Subnet mask:  {}", mask);
    }
    if let Some(wildcard) = &facts.wildcard_mask {
        println!("  Wildcard:     {}", wildcard);
    }
    println!("  Total:        {}", facts.total_addresses);
    match overlay {
        Some(overlay) => {
            println!("  Usable:       {}", overlay.usable_addresses);
            for r in &overlay.reservations {
                println!(
                    "  {reserved} {addr:<16} {purpose}",
                    reserved = "reserved".yellow(),
                    addr = r.address,
                    purpose = r.purpose,
                );
            }
            for note in &overlay.notes {
                println!("  {note}", note = note.yellow());
            }
        }
        None => println!("  Usable:       {}", facts.usable_addresses),
    }
}

/// Print a subnet plan as an aligned table, one row per subnet.
pub fn print_subnet_table(subnets: &[SplitSubnet]) {
    println!(
        "{}",
        format!(
            "{cidr} {network} {last} {usable} {level}",
            cidr = format_field("subnet", 24),
            network = format_field("first host", 20),
            last = format_field("last host", 20),
            usable = format_field("usable", 12),
            level = format_field("level", 6),
        )
        .bold()
    );
    for subnet in subnets {
        let facts = subnet.block.facts();
        let usable = match &subnet.cloud_reserved {
            // provider reservations shrink the usable count below the plain facts
            Some(reserved) => facts
                .total_addresses
                .exact()
                .map(|t| (t - reserved.len() as u128).to_string())
                .unwrap_or_else(|| facts.usable_addresses.to_string()),
            None => facts.usable_addresses.to_string(),
        };
        println!(
            "{cidr} {first} {last} {usable} {level}",
            cidr = format_field(subnet.cidr(), 24).cyan(),
            first = format_field(&facts.first_host, 20),
            last = format_field(&facts.last_host, 20),
            usable = format_field(usable, 12),
            level = format_field(subnet.level, 6),
        );
    }
    println!("# {count} subnets", count = subnets.len());
}

/// Print validation warnings the way the planner surfaces advisories.
pub fn print_warnings(warnings: &[String]) {
    for warning in warnings {
        eprintln!("{tag} {warning}", tag = "warning:".yellow());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_field_short() {
        assert_eq!(format_field("test", 10), "      test");
    }

    #[test]
    fn test_format_field_exact() {
        assert_eq!(format_field("test", 4), "test");
    }

    #[test]
    fn test_format_field_long() {
        assert_eq!(format_field("long_value", 5), "long_value");
    }

    #[test]
    fn test_format_field_number() {
        assert_eq!(format_field(42, 4), "  42");
    }
}
