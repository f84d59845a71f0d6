//! Subnet partitioning (split).
//!
//! A parent block is divided either into N equal children (N rounded up to
//! the next power of two, with a warning) or down to an explicit target
//! prefix. All validation runs before any child is materialized, and the
//! `max_results` cap is enforced by bit arithmetic rather than enumeration,
//! so a request for 2^64 children fails instantly instead of looping.

use serde::{Deserialize, Serialize};

use super::cloud::{apply_provider, CloudProvider};
use crate::error::{Error, Result};
use crate::models::{AddressSpace, Block, SplitSubnet};
use crate::validation::ValidationResult;

/// Child-count threshold above which a split gets an advisory warning.
const LARGE_SPLIT_WARNING: u64 = 256;

/// How a parent block should be divided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplitRequest {
    /// Divide into `count` equal children. Non-power-of-two counts are
    /// rounded UP to the next power of two and surfaced as a warning.
    Equal { count: u64 },
    /// Divide down to an explicit prefix length.
    Custom { target_prefix: u8 },
}

/// Caller policy for one split call.
#[derive(Debug, Clone, Copy)]
pub struct SplitOptions {
    /// Hard cap on the number of children a single split may produce.
    pub max_results: usize,
    /// When true, an over-cap request returns the first `max_results`
    /// children with a warning instead of failing. Callers pick one policy
    /// and keep it; the engine never truncates silently.
    pub truncate: bool,
    /// Provider whose prefix limits and reservations apply to the children.
    pub provider: CloudProvider,
}

impl Default for SplitOptions {
    fn default() -> Self {
        SplitOptions {
            max_results: 1000,
            truncate: false,
            provider: CloudProvider::Standard,
        }
    }
}

/// A successful split: the children plus any advisory warnings.
#[derive(Debug, Clone)]
pub struct SplitOutcome {
    /// Children in ascending network order, tagged with lineage.
    pub subnets: Vec<SplitSubnet>,
    /// Always valid; carries warnings (rounding, truncation, large counts).
    pub validation: ValidationResult,
}

/// Resolved shape of a split: the target prefix and any advisory warnings
/// gathered while resolving it.
struct ResolvedSplit {
    target_prefix: u8,
    warnings: Vec<String>,
}

fn resolve_request(parent: &Block, request: &SplitRequest) -> Result<ResolvedSplit> {
    let space = parent.space();
    let width = space.bits();
    let mut warnings = Vec::new();

    let target_prefix = match *request {
        SplitRequest::Equal { count } => {
            if count < 2 {
                return Err(Error::InvalidSplitRequest(format!(
                    "cannot split into {count} subnets; at least 2 are required"
                )));
            }
            let rounded = count.next_power_of_two();
            if rounded != count {
                warnings.push(format!(
                    "Subnet count {count} is not a power of two; rounded up to {rounded}"
                ));
            }
            let extra_bits = rounded.trailing_zeros() as u8;
            let target = parent.prefix().checked_add(extra_bits).filter(|t| *t <= width);
            match target {
                Some(t) => t,
                None => {
                    return Err(Error::InvalidSplitRequest(format!(
                        "splitting {parent} into {rounded} subnets requires /{needed} prefixes, beyond the {space} maximum of /{width}",
                        needed = parent.prefix() as u32 + extra_bits as u32,
                    )))
                }
            }
        }
        SplitRequest::Custom { target_prefix } => {
            if target_prefix > width {
                return Err(Error::InvalidSplitRequest(format!(
                    "target prefix /{target_prefix} exceeds the {space} maximum of /{width}"
                )));
            }
            if target_prefix <= parent.prefix() {
                return Err(Error::InvalidSplitRequest(format!(
                    "target prefix /{target_prefix} must be more specific than the parent's /{prefix}; use a target prefix between /{lo} and /{width}",
                    prefix = parent.prefix(),
                    lo = parent.prefix() + 1,
                )));
            }
            target_prefix
        }
    };

    Ok(ResolvedSplit {
        target_prefix,
        warnings,
    })
}

/// Validate a split request without enumerating anything.
///
/// Returns the full picture: errors for a doomed request, warnings for
/// rounding/truncation/large results, and suggestions where a fix exists.
pub fn validate_split(parent: &Block, request: &SplitRequest, opts: &SplitOptions) -> ValidationResult {
    let resolved = match resolve_with_provider(parent, request, opts) {
        Ok(r) => r,
        Err(err) => {
            let mut v = ValidationResult::failed(err.to_string());
            if let Error::InvalidSplitRequest(_) = err {
                if parent.prefix() < parent.space().bits() {
                    v.push_suggestion(format!(
                        "use a target prefix between /{lo} and /{hi}",
                        lo = parent.prefix() + 1,
                        hi = parent.space().bits(),
                    ));
                }
            }
            return v;
        }
    };

    let mut v = ValidationResult::ok();
    for w in &resolved.warnings {
        v.push_warning(w.clone());
    }
    match child_count(parent, resolved.target_prefix) {
        Some(n) if n as usize <= opts.max_results => {
            if n >= LARGE_SPLIT_WARNING {
                v.push_warning(format!("This will create {n} subnets"));
            }
        }
        _ => {
            if opts.truncate {
                v.push_warning(format!(
                    "Result truncated to the first {max} subnets",
                    max = opts.max_results
                ));
            } else {
                let err = too_many_results(parent, resolved.target_prefix, opts.max_results);
                v.push_error(err.to_string());
                v.push_suggestion("raise max_results or choose a less specific target prefix".to_string());
            }
        }
    }
    v
}

/// Split a subnet record into children per `request`.
///
/// Children are enumerated ascending by network address, each tagged with
/// `parent_id`, `level = parent.level + 1` and the inherited family. When a
/// non-Standard provider is configured the children carry its reservation
/// overlay.
pub fn split_subnet(
    parent: &SplitSubnet,
    request: &SplitRequest,
    opts: &SplitOptions,
) -> Result<SplitOutcome> {
    let block = &parent.block;
    let resolved = resolve_with_provider(block, request, opts)?;
    let target = resolved.target_prefix;
    let mut validation = ValidationResult::ok();
    for w in resolved.warnings {
        validation.push_warning(w);
    }

    // Cap check before anything is materialized. `child_count` is None when
    // the count does not even fit in u64; that always exceeds the cap.
    let mut truncated = false;
    let emit = match child_count(block, target) {
        Some(n) if n as usize <= opts.max_results => n as usize,
        _ if opts.truncate => {
            truncated = true;
            validation.push_warning(format!(
                "Result truncated to the first {max} subnets",
                max = opts.max_results
            ));
            opts.max_results
        }
        _ => return Err(too_many_results(block, target, opts.max_results)),
    };

    // The large-count advisory accompanies any earlier warnings (rounding
    // included) so this path and `validate_split` report the same set.
    if !truncated && emit as u64 >= LARGE_SPLIT_WARNING {
        validation.push_warning(format!("This will create {emit} subnets"));
    }

    log::debug!(
        "split {block} -> /{target}: emitting {emit} children (provider {provider})",
        provider = opts.provider
    );

    let step = 1u128 << (block.space().bits() - target);
    let mut subnets = Vec::with_capacity(emit);
    for i in 0..emit {
        let network = block.network() + (i as u128) * step;
        let child_block = Block::new(block.space(), network, target)?;
        let mut child = SplitSubnet::child_of(parent, child_block);
        if opts.provider != CloudProvider::Standard && block.space() == AddressSpace::V4 {
            let overlay = apply_provider(&child_block, opts.provider)?;
            child.cloud_reserved = Some(overlay.reservations);
        }
        subnets.push(child);
    }

    Ok(SplitOutcome { subnets, validation })
}

/// Number of children a /parent -> /target split produces, if it fits in u64.
fn child_count(parent: &Block, target_prefix: u8) -> Option<u64> {
    let extra_bits = target_prefix - parent.prefix();
    if extra_bits >= 64 {
        None
    } else {
        Some(1u64 << extra_bits)
    }
}

fn too_many_results(parent: &Block, target_prefix: u8, max: usize) -> Error {
    let extra_bits = target_prefix - parent.prefix();
    let requested = if extra_bits <= 53 {
        format!("{}", 1u64 << extra_bits)
    } else {
        format!("2^{extra_bits}")
    };
    Error::TooManyResults { requested, max }
}

fn resolve_with_provider(
    parent: &Block,
    request: &SplitRequest,
    opts: &SplitOptions,
) -> Result<ResolvedSplit> {
    let resolved = resolve_request(parent, request)?;
    if parent.space() == AddressSpace::V4 {
        if let Some(profile) = opts.provider.profile() {
            let target = resolved.target_prefix;
            if target < profile.min_prefix || target > profile.max_prefix {
                return Err(Error::InvalidSplitRequest(format!(
                    "{provider} subnets require a prefix between /{min} and /{max}, requested /{target}",
                    provider = opts.provider,
                    min = profile.min_prefix,
                    max = profile.max_prefix,
                )));
            }
        }
    }
    Ok(resolved)
}
