// src/rules.rs
//
// Static per-category rule tables. Read-only after initialization; no
// synchronization needed (shared freely across concurrent requests).

use crate::types::ContractCategory;
use once_cell::sync::Lazy;

pub struct CategoryRules {
    pub category: ContractCategory,
    /// A source missing any of these yields MISSING_REQUIRED_FUNCTION.
    pub required_functions: &'static [&'static str],
    /// A source missing any of these yields MISSING_EVENT_DEFINITIONS.
    pub required_events: &'static [&'static str],
    /// A source missing any of these yields MISSING_IMPORT_STATEMENTS.
    pub required_imports: &'static [&'static str],
    /// Marker words in the source that imply this category when no explicit
    /// contract type was supplied.
    pub code_markers: &'static [&'static str],
    /// Request-text keywords scored during fallback category detection.
    pub prompt_keywords: &'static [&'static str],
    /// Request-text keywords mapped to template feature tags.
    pub feature_keywords: &'static [(&'static str, &'static str)],
}

pub static CATEGORY_RULES: Lazy<Vec<CategoryRules>> = Lazy::new(|| {
    vec![
        CategoryRules {
            category: ContractCategory::Nft,
            required_functions: &["createEmptyCollection", "mintNFT", "deposit", "withdraw"],
            required_events: &["Minted", "Deposit", "Withdraw"],
            required_imports: &["NonFungibleToken"],
            code_markers: &["NonFungibleToken", "NFT", "Collection"],
            prompt_keywords: &["nft", "non-fungible", "collectible", "collection", "artwork"],
            feature_keywords: &[
                ("metadata", "metadata"),
                ("royalt", "royalties"),
                ("batch", "batch-minting"),
                ("collection", "collection"),
            ],
        },
        CategoryRules {
            category: ContractCategory::FungibleToken,
            required_functions: &["mint", "withdraw", "deposit", "getBalance"],
            required_events: &["TokensMinted", "TokensWithdrawn", "TokensDeposited"],
            required_imports: &["FungibleToken"],
            code_markers: &["FungibleToken", "Vault", "totalSupply"],
            prompt_keywords: &["fungible", "token", "coin", "currency", "supply"],
            feature_keywords: &[
                ("burn", "burnable"),
                ("mint", "mintable"),
                ("pause", "pausable"),
                ("cap", "supply-cap"),
            ],
        },
        CategoryRules {
            category: ContractCategory::Dao,
            required_functions: &["createProposal", "vote", "executeProposal"],
            required_events: &["ProposalCreated", "VoteCast"],
            required_imports: &[],
            code_markers: &["Proposal", "vote", "quorum"],
            prompt_keywords: &["dao", "governance", "voting", "vote", "proposal"],
            feature_keywords: &[
                ("quorum", "quorum"),
                ("delegate", "delegation"),
                ("treasury", "treasury"),
            ],
        },
        CategoryRules {
            category: ContractCategory::Marketplace,
            required_functions: &["createListing", "purchase", "removeListing"],
            required_events: &["ListingCreated", "ListingCompleted"],
            required_imports: &[],
            code_markers: &["Listing", "Storefront", "salePrice"],
            prompt_keywords: &["marketplace", "listing", "sell", "auction", "storefront"],
            feature_keywords: &[
                ("auction", "auctions"),
                ("royalt", "royalties"),
                ("offer", "offers"),
            ],
        },
        CategoryRules {
            category: ContractCategory::Defi,
            required_functions: &["deposit", "withdraw", "swap"],
            required_events: &["TokensDeposited", "TokensWithdrawn"],
            required_imports: &[],
            code_markers: &["swap", "liquidity", "Pool"],
            prompt_keywords: &["defi", "swap", "staking", "lending", "yield", "liquidity"],
            feature_keywords: &[
                ("stak", "staking"),
                ("lend", "lending"),
                ("pool", "liquidity-pool"),
            ],
        },
        CategoryRules {
            category: ContractCategory::Utility,
            required_functions: &[],
            required_events: &[],
            required_imports: &[],
            code_markers: &["Registry", "Storage"],
            prompt_keywords: &["utility", "helper", "registry", "storage", "counter"],
            feature_keywords: &[],
        },
    ]
});

pub fn rules_for(category: ContractCategory) -> Option<&'static CategoryRules> {
    CATEGORY_RULES.iter().find(|r| r.category == category)
}

/// Functions whose body must carry pre/post condition blocks to be judged
/// complete by the completeness validator.
pub const CRITICAL_FUNCTIONS: &[&str] = &[
    "withdraw",
    "deposit",
    "mint",
    "burn",
    "transfer",
    "vote",
    "execute",
    "purchase",
    "createListing",
];

/// Resources whose name implies held state and therefore needs an `init`.
pub const NEEDS_INIT_RESOURCES: &[&str] = &["Collection", "Vault", "Minter", "Administrator"];

/// Comment markers that mean the generator left a hole in the logic.
pub const INCOMPLETE_MARKERS: &[&str] = &[
    "TODO",
    "FIXME",
    "// ...",
    "/* ... */",
    "implement this",
    "implementation here",
    "rest of the",
];

/// Substrings that force rejection of a generated contract regardless of its
/// score: placeholder literals leaking from the generator, legacy access
/// syntax, and leftover markdown fences.
pub const FORBIDDEN_TOKENS: &[&str] = &[
    "undefined",
    "pub fun",
    "pub var",
    "pub let",
    "pub contract",
    "pub resource",
    "pub event",
    "AuthAccount",
    "```",
];

/// Action keywords found anywhere in the source paired with the event names
/// one of which is expected to be defined or emitted.
pub const ACTION_EVENT_EXPECTATIONS: &[(&str, &[&str])] = &[
    ("mint", &["Minted", "TokensMinted"]),
    ("withdraw", &["Withdraw", "TokensWithdrawn"]),
    ("deposit", &["Deposit", "TokensDeposited"]),
    ("vote", &["VoteCast"]),
    ("purchase", &["ListingCompleted", "Purchase"]),
    ("buy", &["ListingCompleted", "Purchase"]),
];

/// Infer a category from marker words in the source. Declared order above is
/// the priority order; first category with a marker hit wins.
pub fn infer_category_from_code(code: &str) -> ContractCategory {
    for rules in CATEGORY_RULES.iter() {
        if rules.code_markers.iter().any(|m| code.contains(m)) {
            return rules.category;
        }
    }
    ContractCategory::Generic
}
