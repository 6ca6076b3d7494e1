//! Tactic registry
//!
//! The canonical ordered set of tactic identifiers and display titles.
//! Everything entering the catalog validates against this registry; a
//! candidate whose tactic is not listed here is discarded, never stored.
//!
//! Order is kill-chain order, not alphabetical, and is the order the read
//! contract groups techniques in.

/// Canonical tactic order (kill-chain order)
pub const TACTIC_ORDER: [&str; 14] = [
    "reconnaissance",
    "resource-development",
    "initial-access",
    "execution",
    "persistence",
    "privilege-escalation",
    "defense-evasion",
    "credential-access",
    "discovery",
    "lateral-movement",
    "collection",
    "command-and-control",
    "exfiltration",
    "impact",
];

/// Display title for a registered tactic
pub fn tactic_title(tactic: &str) -> Option<&'static str> {
    let title = match tactic {
        "reconnaissance" => "Reconnaissance",
        "resource-development" => "Resource Development",
        "initial-access" => "Initial Access",
        "execution" => "Execution",
        "persistence" => "Persistence",
        "privilege-escalation" => "Privilege Escalation",
        "defense-evasion" => "Defense Evasion",
        "credential-access" => "Credential Access",
        "discovery" => "Discovery",
        "lateral-movement" => "Lateral Movement",
        "collection" => "Collection",
        "command-and-control" => "Command & Control",
        "exfiltration" => "Exfiltration",
        "impact" => "Impact",
        _ => return None,
    };
    Some(title)
}

/// Is this identifier a member of the registry?
pub fn is_registered(tactic: &str) -> bool {
    tactic_title(tactic).is_some()
}

/// Position of a tactic in kill-chain order
pub fn order_index(tactic: &str) -> Option<usize> {
    TACTIC_ORDER.iter().position(|t| *t == tactic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_ordered_tactic_has_a_title() {
        for tactic in TACTIC_ORDER {
            assert!(tactic_title(tactic).is_some(), "missing title for {}", tactic);
        }
    }

    #[test]
    fn unknown_tactic_is_rejected() {
        assert!(!is_registered("weaponization"));
        assert!(!is_registered("Initial Access"));
        assert!(!is_registered(""));
    }

    #[test]
    fn order_is_kill_chain_not_alphabetical() {
        assert_eq!(order_index("reconnaissance"), Some(0));
        assert_eq!(order_index("initial-access"), Some(2));
        assert_eq!(order_index("impact"), Some(13));
        assert!(order_index("collection") < order_index("command-and-control"));
        // Alphabetical order would put collection before defense-evasion
        assert!(order_index("defense-evasion") < order_index("collection"));
    }
}
