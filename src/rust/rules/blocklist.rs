use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlocklistKind {
    /// DNS-based list run by a named operator
    Dnsbl,
    /// Reputation service of a filtering vendor or mailbox provider
    Vendor,
    /// Mentions a blocklist without saying which one
    Generic,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlocklistEntry {
    pub name: &'static str,
    pub kind: BlocklistKind,
}

/// Result of [`identify_blocklist`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BlocklistMatch {
    Single(BlocklistEntry),
    Multiple(Vec<BlocklistEntry>),
}

impl BlocklistMatch {
    pub fn names(&self) -> Vec<&'static str> {
        match self {
            BlocklistMatch::Single(entry) => vec![entry.name],
            BlocklistMatch::Multiple(entries) => entries.iter().map(|e| e.name).collect(),
        }
    }
}

/// Ordered (pattern, name, kind) signatures
pub const BLOCKLIST_SIGNATURES: &[(&str, &str, BlocklistKind)] = &[
    (r"spamhaus", "Spamhaus", BlocklistKind::Dnsbl),
    (r"barracuda", "Barracuda", BlocklistKind::Vendor),
    (r"spamcop", "SpamCop", BlocklistKind::Dnsbl),
    (r"\bsorbs\b", "SORBS", BlocklistKind::Dnsbl),
    (r"uceprotect", "UCEPROTECT", BlocklistKind::Dnsbl),
    (r"\bpsbl\b", "PSBL", BlocklistKind::Dnsbl),
    (r"mailspike", "Mailspike", BlocklistKind::Dnsbl),
    (r"\bsurbl\b", "SURBL", BlocklistKind::Dnsbl),
    (r"\buribl\b", "URIBL", BlocklistKind::Dnsbl),
    (r"invaluement", "Invaluement", BlocklistKind::Dnsbl),
    (r"proofpoint", "Proofpoint", BlocklistKind::Vendor),
    (r"cloudmark", "Cloudmark", BlocklistKind::Vendor),
    (r"trend ?micro|\bemail reputation service", "Trend Micro", BlocklistKind::Vendor),
    (r"\bs3150\b|outlook\.com.{0,40}block|microsoft.{0,40}block", "Microsoft", BlocklistKind::Vendor),
    (r"\brbl\b", "RBL", BlocklistKind::Generic),
    (r"\bdnsbl\b", "DNSBL", BlocklistKind::Generic),
    (r"\b(block|black) ?list(ed)?\b", "Blocklist", BlocklistKind::Generic),
];

lazy_static! {
    static ref COMPILED: Vec<(Regex, BlocklistEntry)> = BLOCKLIST_SIGNATURES
        .iter()
        .map(|(pattern, name, kind)| {
            let regex = RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .unwrap();
            (regex, BlocklistEntry { name: *name, kind: *kind })
        })
        .collect();
}

/// Names the blocklist(s) a rejection refers to.
///
/// Several named lists come back as [`BlocklistMatch::Multiple`] in signature
/// order; generic mentions only count when nothing more specific matched.
pub fn identify_blocklist(message: &str) -> Option<BlocklistMatch> {
    let mut specific: Vec<BlocklistEntry> = Vec::new();
    let mut first_generic: Option<BlocklistEntry> = None;

    for (regex, entry) in COMPILED.iter() {
        if !regex.is_match(message) {
            continue;
        }
        if entry.kind == BlocklistKind::Generic {
            first_generic.get_or_insert_with(|| entry.clone());
        } else if !specific.iter().any(|e| e.name == entry.name) {
            specific.push(entry.clone());
        }
    }

    match specific.len() {
        0 => first_generic.map(BlocklistMatch::Single),
        1 => specific.pop().map(BlocklistMatch::Single),
        _ => Some(BlocklistMatch::Multiple(specific)),
    }
}
