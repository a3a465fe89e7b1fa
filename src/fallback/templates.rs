// src/fallback/templates.rs
//
// Static catalog of guaranteed-working contracts. Loaded once at process
// start, read-only afterwards. Every entry must pass
// validate_fallback_quality by construction (enforced by tests).

use crate::types::*;
use once_cell::sync::Lazy;

const NFT_SIMPLE: &str = r#"import NonFungibleToken from 0xNONFUNGIBLETOKEN

access(all) contract BasicNFT {

    access(all) event Minted(id: UInt64)
    access(all) event Deposit(id: UInt64)
    access(all) event Withdraw(id: UInt64)

    access(all) var totalSupply: UInt64

    access(all) resource NFT {
        access(all) let id: UInt64

        init(id: UInt64) {
            self.id = id
        }

        destroy() {
        }
    }

    access(all) resource Collection {
        access(all) var ownedNFTs: @{UInt64: NFT}

        init() {
            self.ownedNFTs <- {}
        }

        access(all) fun deposit(token: @NFT) {
            pre {
                token.id > 0: "invalid token id"
            }
            let id = token.id
            self.ownedNFTs[id] <-! token
            emit Deposit(id: id)
        }

        access(all) fun withdraw(withdrawID: UInt64): @NFT {
            pre {
                self.ownedNFTs[withdrawID] != nil: "NFT not in collection"
            }
            let token <- self.ownedNFTs.remove(key: withdrawID)!
            emit Withdraw(id: token.id)
            return <-token
        }

        access(all) fun getIDs(): [UInt64] {
            return self.ownedNFTs.keys
        }

        destroy() {
            destroy self.ownedNFTs
        }
    }

    access(all) fun createEmptyCollection(): @Collection {
        return <-create Collection()
    }

    access(all) fun mintNFT(): @NFT {
        self.totalSupply = self.totalSupply + 1
        emit Minted(id: self.totalSupply)
        return <-create NFT(id: self.totalSupply)
    }

    init() {
        self.totalSupply = 0
    }
}
"#;

const NFT_METADATA: &str = r#"import NonFungibleToken from 0xNONFUNGIBLETOKEN

access(all) contract MetadataNFT {

    access(all) event Minted(id: UInt64, name: String)
    access(all) event Deposit(id: UInt64)
    access(all) event Withdraw(id: UInt64)

    access(all) var totalSupply: UInt64

    access(all) resource NFT {
        access(all) let id: UInt64
        access(all) let name: String
        access(all) let description: String

        init(id: UInt64, name: String, description: String) {
            self.id = id
            self.name = name
            self.description = description
        }

        destroy() {
        }
    }

    access(all) resource Collection {
        access(all) var ownedNFTs: @{UInt64: NFT}

        init() {
            self.ownedNFTs <- {}
        }

        access(all) fun deposit(token: @NFT) {
            pre {
                token.id > 0: "invalid token id"
            }
            let id = token.id
            self.ownedNFTs[id] <-! token
            emit Deposit(id: id)
        }

        access(all) fun withdraw(withdrawID: UInt64): @NFT {
            pre {
                self.ownedNFTs[withdrawID] != nil: "NFT not in collection"
            }
            let token <- self.ownedNFTs.remove(key: withdrawID)!
            emit Withdraw(id: token.id)
            return <-token
        }

        access(all) fun getIDs(): [UInt64] {
            return self.ownedNFTs.keys
        }

        destroy() {
            destroy self.ownedNFTs
        }
    }

    access(all) resource Minter {
        init() {
        }

        access(all) fun mintNFT(name: String, description: String): @NFT {
            pre {
                name.length > 0: "name must not be empty"
            }
            MetadataNFT.totalSupply = MetadataNFT.totalSupply + 1
            emit Minted(id: MetadataNFT.totalSupply, name: name)
            return <-create NFT(
                id: MetadataNFT.totalSupply,
                name: name,
                description: description
            )
        }

        destroy() {
        }
    }

    access(all) fun createEmptyCollection(): @Collection {
        return <-create Collection()
    }

    access(all) fun mintNFT(): @NFT {
        self.totalSupply = self.totalSupply + 1
        emit Minted(id: self.totalSupply, name: "")
        return <-create NFT(id: self.totalSupply, name: "", description: "")
    }

    init() {
        self.totalSupply = 0
        self.account.save(<-create Minter(), to: /storage/metadataNFTMinter)
    }
}
"#;

const FT_SIMPLE: &str = r#"import FungibleToken from 0xFUNGIBLETOKEN

access(all) contract BasicToken {

    access(all) event TokensMinted(amount: UFix64)
    access(all) event TokensWithdrawn(amount: UFix64)
    access(all) event TokensDeposited(amount: UFix64)

    access(all) var totalSupply: UFix64

    access(all) resource Vault {
        access(all) var balance: UFix64

        init(balance: UFix64) {
            self.balance = balance
        }

        access(all) fun withdraw(amount: UFix64): @Vault {
            pre {
                amount <= self.balance: "insufficient balance"
            }
            self.balance = self.balance - amount
            emit TokensWithdrawn(amount: amount)
            return <-create Vault(balance: amount)
        }

        access(all) fun deposit(from: @Vault) {
            pre {
                from.balance >= 0.0: "invalid vault"
            }
            self.balance = self.balance + from.balance
            emit TokensDeposited(amount: from.balance)
            destroy from
        }

        destroy() {
            BasicToken.totalSupply = BasicToken.totalSupply - self.balance
        }
    }

    access(all) fun createEmptyVault(): @Vault {
        return <-create Vault(balance: 0.0)
    }

    access(all) fun mint(amount: UFix64): @Vault {
        pre {
            amount > 0.0: "amount must be positive"
        }
        self.totalSupply = self.totalSupply + amount
        emit TokensMinted(amount: amount)
        return <-create Vault(balance: amount)
    }

    access(all) fun getBalance(vault: &Vault): UFix64 {
        return vault.balance
    }

    init() {
        self.totalSupply = 0.0
    }
}
"#;

const FT_CAPPED: &str = r#"import FungibleToken from 0xFUNGIBLETOKEN

access(all) contract CappedToken {

    access(all) event TokensMinted(amount: UFix64)
    access(all) event TokensWithdrawn(amount: UFix64)
    access(all) event TokensDeposited(amount: UFix64)
    access(all) event TokensBurned(amount: UFix64)

    access(all) var totalSupply: UFix64
    access(all) let maxSupply: UFix64

    access(all) resource Vault {
        access(all) var balance: UFix64

        init(balance: UFix64) {
            self.balance = balance
        }

        access(all) fun withdraw(amount: UFix64): @Vault {
            pre {
                amount <= self.balance: "insufficient balance"
            }
            self.balance = self.balance - amount
            emit TokensWithdrawn(amount: amount)
            return <-create Vault(balance: amount)
        }

        access(all) fun deposit(from: @Vault) {
            pre {
                from.balance >= 0.0: "invalid vault"
            }
            self.balance = self.balance + from.balance
            emit TokensDeposited(amount: from.balance)
            destroy from
        }

        destroy() {
            CappedToken.totalSupply = CappedToken.totalSupply - self.balance
        }
    }

    access(all) resource Administrator {
        init() {
        }

        access(all) fun burn(vault: @Vault) {
            let amount = vault.balance
            emit TokensBurned(amount: amount)
            destroy vault
        }

        destroy() {
        }
    }

    access(all) fun createEmptyVault(): @Vault {
        return <-create Vault(balance: 0.0)
    }

    access(all) fun mint(amount: UFix64): @Vault {
        pre {
            amount > 0.0: "amount must be positive"
            self.totalSupply + amount <= self.maxSupply: "max supply exceeded"
        }
        self.totalSupply = self.totalSupply + amount
        emit TokensMinted(amount: amount)
        return <-create Vault(balance: amount)
    }

    access(all) fun getBalance(vault: &Vault): UFix64 {
        return vault.balance
    }

    init() {
        self.totalSupply = 0.0
        self.maxSupply = 1000000.0
        self.account.save(<-create Administrator(), to: /storage/cappedTokenAdmin)
    }
}
"#;

const DAO_SIMPLE: &str = r#"access(all) contract BasicDAO {

    access(all) event ProposalCreated(id: UInt64, title: String)
    access(all) event VoteCast(proposalId: UInt64, approve: Bool)

    access(all) struct Proposal {
        access(all) let id: UInt64
        access(all) let title: String
        access(all) var votesFor: UInt64
        access(all) var votesAgainst: UInt64
        access(all) var executed: Bool

        init(id: UInt64, title: String) {
            self.id = id
            self.title = title
            self.votesFor = 0
            self.votesAgainst = 0
            self.executed = false
        }
    }

    access(all) var proposals: {UInt64: Proposal}
    access(all) var nextProposalId: UInt64

    access(all) fun createProposal(title: String): UInt64 {
        pre {
            title.length > 0: "title must not be empty"
        }
        let id = self.nextProposalId
        self.proposals[id] = Proposal(id: id, title: title)
        self.nextProposalId = id + 1
        emit ProposalCreated(id: id, title: title)
        return id
    }

    access(all) fun vote(proposalId: UInt64, approve: Bool) {
        pre {
            self.proposals[proposalId] != nil: "no such proposal"
        }
        let proposal = self.proposals[proposalId]!
        if approve {
            proposal.votesFor = proposal.votesFor + 1
        } else {
            proposal.votesAgainst = proposal.votesAgainst + 1
        }
        self.proposals[proposalId] = proposal
        emit VoteCast(proposalId: proposalId, approve: approve)
    }

    access(all) fun executeProposal(proposalId: UInt64): Bool {
        pre {
            self.proposals[proposalId] != nil: "no such proposal"
        }
        let proposal = self.proposals[proposalId]!
        if proposal.votesFor > proposal.votesAgainst {
            proposal.executed = true
            self.proposals[proposalId] = proposal
            return true
        }
        return false
    }

    init() {
        self.proposals = {}
        self.nextProposalId = 1
    }
}
"#;

const MARKETPLACE_SIMPLE: &str = r#"access(all) contract BasicMarketplace {

    access(all) event ListingCreated(id: UInt64, price: UFix64)
    access(all) event ListingCompleted(id: UInt64)
    access(all) event ListingRemoved(id: UInt64)

    access(all) struct Listing {
        access(all) let id: UInt64
        access(all) let price: UFix64
        access(all) var active: Bool

        init(id: UInt64, price: UFix64) {
            self.id = id
            self.price = price
            self.active = true
        }
    }

    access(all) var listings: {UInt64: Listing}
    access(all) var nextListingId: UInt64

    access(all) fun createListing(price: UFix64): UInt64 {
        pre {
            price > 0.0: "price must be positive"
        }
        let id = self.nextListingId
        self.listings[id] = Listing(id: id, price: price)
        self.nextListingId = id + 1
        emit ListingCreated(id: id, price: price)
        return id
    }

    access(all) fun purchase(listingId: UInt64) {
        pre {
            self.listings[listingId] != nil: "no such listing"
        }
        let listing = self.listings[listingId]!
        if listing.active {
            self.listings.remove(key: listingId)
            emit ListingCompleted(id: listingId)
        }
    }

    access(all) fun removeListing(listingId: UInt64) {
        pre {
            self.listings[listingId] != nil: "no such listing"
        }
        self.listings.remove(key: listingId)
        emit ListingRemoved(id: listingId)
    }

    init() {
        self.listings = {}
        self.nextListingId = 1
    }
}
"#;

const DEFI_SIMPLE: &str = r#"access(all) contract BasicPool {

    access(all) event TokensDeposited(amount: UFix64)
    access(all) event TokensWithdrawn(amount: UFix64)
    access(all) event Swapped(amountIn: UFix64, amountOut: UFix64)

    access(all) var poolBalance: UFix64
    access(all) var balances: {Address: UFix64}

    access(all) fun deposit(from: Address, amount: UFix64) {
        pre {
            amount > 0.0: "amount must be positive"
        }
        self.balances[from] = (self.balances[from] ?? 0.0) + amount
        self.poolBalance = self.poolBalance + amount
        emit TokensDeposited(amount: amount)
    }

    access(all) fun withdraw(to: Address, amount: UFix64): UFix64 {
        pre {
            amount > 0.0: "amount must be positive"
        }
        let held = self.balances[to] ?? 0.0
        if amount > held {
            return 0.0
        }
        self.balances[to] = held - amount
        self.poolBalance = self.poolBalance - amount
        emit TokensWithdrawn(amount: amount)
        return amount
    }

    access(all) fun swap(amountIn: UFix64): UFix64 {
        pre {
            amountIn > 0.0: "amount must be positive"
        }
        let amountOut = amountIn * 0.99
        emit Swapped(amountIn: amountIn, amountOut: amountOut)
        return amountOut
    }

    init() {
        self.poolBalance = 0.0
        self.balances = {}
    }
}
"#;

const UTILITY_SIMPLE: &str = r#"access(all) contract BasicRegistry {

    access(all) event EntryAdded(key: String)
    access(all) event EntryRemoved(key: String)

    access(all) var entries: {String: String}

    access(all) fun addEntry(key: String, value: String) {
        pre {
            key.length > 0: "key must not be empty"
        }
        self.entries[key] = value
        emit EntryAdded(key: key)
    }

    access(all) fun getEntry(key: String): String? {
        return self.entries[key]
    }

    access(all) fun removeEntry(key: String) {
        if self.entries[key] != nil {
            self.entries.remove(key: key)
            emit EntryRemoved(key: key)
        }
    }

    init() {
        self.entries = {}
    }
}
"#;

/// Minimal hard-coded contract returned when no catalog template applies or
/// the fallback path itself fails.
pub const EMERGENCY_CONTRACT: &str = r#"access(all) contract EmergencyContract {

    access(all) event ContractInitialized()

    init() {
        emit ContractInitialized()
    }
}
"#;

fn template(
    id: &str,
    category: ContractCategory,
    complexity: Complexity,
    features: &[&str],
    keywords: &[&str],
    code: &str,
) -> FallbackTemplate {
    FallbackTemplate {
        id: id.to_string(),
        contract_type: ContractType {
            category,
            complexity,
            features: features.iter().map(|s| s.to_string()).collect(),
        },
        code: code.to_string(),
        keywords: keywords.iter().map(|s| s.to_string()).collect(),
        complexity,
        guaranteed_working: true,
    }
}

pub static TEMPLATE_CATALOG: Lazy<Vec<FallbackTemplate>> = Lazy::new(|| {
    vec![
        template(
            "nft-basic",
            ContractCategory::Nft,
            Complexity::Simple,
            &["collection"],
            &["nft", "collectible", "collection"],
            NFT_SIMPLE,
        ),
        template(
            "nft-metadata",
            ContractCategory::Nft,
            Complexity::Intermediate,
            &["collection", "metadata"],
            &["nft", "metadata", "minter", "art"],
            NFT_METADATA,
        ),
        template(
            "ft-basic",
            ContractCategory::FungibleToken,
            Complexity::Simple,
            &["mintable"],
            &["token", "coin", "currency"],
            FT_SIMPLE,
        ),
        template(
            "ft-capped",
            ContractCategory::FungibleToken,
            Complexity::Intermediate,
            &["mintable", "burnable", "supply-cap"],
            &["token", "supply", "cap", "burn", "admin"],
            FT_CAPPED,
        ),
        template(
            "dao-basic",
            ContractCategory::Dao,
            Complexity::Simple,
            &["quorum"],
            &["dao", "governance", "voting", "proposal"],
            DAO_SIMPLE,
        ),
        template(
            "marketplace-basic",
            ContractCategory::Marketplace,
            Complexity::Simple,
            &["offers"],
            &["marketplace", "listing", "sell"],
            MARKETPLACE_SIMPLE,
        ),
        template(
            "defi-pool",
            ContractCategory::Defi,
            Complexity::Simple,
            &["liquidity-pool"],
            &["defi", "swap", "pool", "liquidity"],
            DEFI_SIMPLE,
        ),
        template(
            "utility-registry",
            ContractCategory::Utility,
            Complexity::Simple,
            &[],
            &["utility", "registry", "storage"],
            UTILITY_SIMPLE,
        ),
    ]
});

pub fn templates_for(category: ContractCategory) -> Vec<&'static FallbackTemplate> {
    TEMPLATE_CATALOG
        .iter()
        .filter(|t| t.contract_type.category == category && t.guaranteed_working)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::quality::validate_fallback_quality;

    #[test]
    fn test_every_template_passes_quality_gate() {
        for template in TEMPLATE_CATALOG.iter() {
            assert!(
                validate_fallback_quality(&template.code),
                "template {} failed the quality gate",
                template.id
            );
        }
    }

    #[test]
    fn test_emergency_contract_passes_quality_gate() {
        assert!(validate_fallback_quality(EMERGENCY_CONTRACT));
    }

    #[test]
    fn test_catalog_covers_major_categories() {
        for cat in [
            ContractCategory::Nft,
            ContractCategory::FungibleToken,
            ContractCategory::Dao,
            ContractCategory::Marketplace,
            ContractCategory::Defi,
            ContractCategory::Utility,
        ] {
            assert!(!templates_for(cat).is_empty(), "no template for {:?}", cat);
        }
    }

    #[test]
    fn test_template_ids_are_unique() {
        let mut ids: Vec<&str> = TEMPLATE_CATALOG.iter().map(|t| t.id.as_str()).collect();
        ids.sort_unstable();
        let before = ids.len();
        ids.dedup();
        assert_eq!(before, ids.len());
    }
}
