//! CSV export of a subnet plan.

use crate::models::SplitSubnet;

/// Render a subnet plan as CSV, one row per subnet, header first.
pub fn subnets_to_csv(subnets: &[SplitSubnet]) -> String {
    let mut out = String::from(
        "subnet,network,first_host,last_host,total,usable,level,parent,address_type\n",
    );
    for subnet in subnets {
        let facts = subnet.block.facts();
        let address_type = subnet
            .ipv6_info
            .as_ref()
            .map(|i| i.address_type.as_str())
            .unwrap_or("");
        let row = [
            subnet.cidr(),
            facts.network,
            facts.first_host,
            facts.last_host,
            facts.total_addresses.to_string(),
            facts.usable_addresses.to_string(),
            subnet.level.to_string(),
            subnet.parent_id.clone().unwrap_or_default(),
            address_type.to_string(),
        ];
        let escaped: Vec<String> = row.iter().map(|f| escape_csv_field(f)).collect();
        out.push_str(&escaped.join(","));
        out.push('\n');
    }
    out
}

/// Quote a field when it contains a comma or quote, doubling inner quotes.
fn escape_csv_field(input: &str) -> String {
    if input.contains(',') || input.contains('"') {
        let escaped = input.replace('"', "\"\"");
        format!("\"{escaped}\"")
    } else {
        input.to_string()
    }
}
