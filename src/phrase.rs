//! Synthetic catch-phrase messages.
//!
//! Phrases follow the "adjective descriptor noun" shape of corporate
//! buzzword slogans, e.g. "Cross-platform asynchronous middleware".

use rand::seq::SliceRandom;
use rand::Rng;

const ADJECTIVES: &[&str] = &[
    "Adaptive",
    "Advanced",
    "Automated",
    "Balanced",
    "Business-focused",
    "Centralized",
    "Cloned",
    "Configurable",
    "Cross-platform",
    "Customer-focused",
    "Decentralized",
    "Distributed",
    "Enhanced",
    "Enterprise-wide",
    "Ergonomic",
    "Expanded",
    "Fault-tolerant",
    "Front-line",
    "Grass-roots",
    "Horizontal",
    "Innovative",
    "Integrated",
    "Managed",
    "Monitored",
    "Multi-layered",
    "Networked",
    "Optimized",
    "Persistent",
    "Proactive",
    "Reactive",
    "Realigned",
    "Robust",
    "Seamless",
    "Streamlined",
    "Synchronized",
    "Universal",
    "Virtual",
    "Visionary",
];

const DESCRIPTORS: &[&str] = &[
    "24/7",
    "asynchronous",
    "bandwidth-monitored",
    "bi-directional",
    "client-driven",
    "client-server",
    "content-based",
    "contextually-based",
    "dedicated",
    "demand-driven",
    "dynamic",
    "encompassing",
    "executive",
    "fault-tolerant",
    "global",
    "heuristic",
    "high-level",
    "holistic",
    "impactful",
    "interactive",
    "local",
    "logistical",
    "mission-critical",
    "modular",
    "multi-tasking",
    "next generation",
    "optimizing",
    "real-time",
    "scalable",
    "secondary",
    "stable",
    "system-worthy",
    "tangible",
    "transitional",
    "user-facing",
    "zero-defect",
];

const NOUNS: &[&str] = &[
    "ability",
    "access",
    "adapter",
    "algorithm",
    "alliance",
    "analyzer",
    "application",
    "architecture",
    "array",
    "benchmark",
    "capability",
    "circuit",
    "core",
    "database",
    "definition",
    "encoding",
    "firmware",
    "framework",
    "function",
    "groupware",
    "hierarchy",
    "hub",
    "infrastructure",
    "initiative",
    "interface",
    "knowledge base",
    "matrix",
    "middleware",
    "model",
    "moratorium",
    "paradigm",
    "pipeline",
    "policy",
    "portal",
    "protocol",
    "service-desk",
    "solution",
    "throughput",
    "toolset",
    "workforce",
];

/// Build one catch-phrase.
pub fn catch_phrase(rng: &mut impl Rng) -> String {
    // The lists are non-empty constants, so `choose` always yields a word.
    let adjective = ADJECTIVES.choose(rng).copied().unwrap_or("Robust");
    let descriptor = DESCRIPTORS.choose(rng).copied().unwrap_or("dynamic");
    let noun = NOUNS.choose(rng).copied().unwrap_or("solution");

    format!("{} {} {}", adjective, descriptor, noun)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_phrase_is_three_parts_from_lists() {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..200 {
            let phrase = catch_phrase(&mut rng);
            let adjective = ADJECTIVES.iter().find(|a| phrase.starts_with(*a));
            assert!(adjective.is_some(), "unknown adjective in {:?}", phrase);
            let noun = NOUNS.iter().any(|n| phrase.ends_with(n));
            assert!(noun, "unknown noun in {:?}", phrase);
        }
    }

    #[test]
    fn test_phrase_starts_capitalized() {
        let mut rng = StdRng::seed_from_u64(42);
        let phrase = catch_phrase(&mut rng);
        assert!(phrase.chars().next().unwrap().is_uppercase());
    }

    #[test]
    fn test_phrases_vary() {
        let mut rng = StdRng::seed_from_u64(1);
        let phrases: std::collections::HashSet<String> =
            (0..50).map(|_| catch_phrase(&mut rng)).collect();
        assert!(phrases.len() > 10);
    }
}
