//! Knowledge-store query interface and the in-memory reference store.
pub mod registry;
pub mod types;

pub use registry::TokenRegistry;
pub use types::{Attribute, Predicate, TokenAttributes, TokenId};

/// The queries the analysis engine issues against a knowledge store.
///
/// Implementations own any equivalence or inference logic; the engine only
/// sees deduplicated results.
pub trait KnowledgeStore {
    /// Every token, in no particular order.
    fn tokens(&self) -> Vec<TokenId>;

    /// Raw value of a scalar attribute, `None` when the token does not carry it.
    fn attribute(&self, token: TokenId, attr: Attribute) -> Option<String>;

    /// Tokens related to `token` under `predicate`, one representative per
    /// equivalence class.
    fn related(&self, token: TokenId, predicate: Predicate) -> Vec<TokenId>;

    /// The token whose `index` attribute equals `index`.
    fn resolve_by_index(&self, index: u32) -> Option<TokenId>;

    /// Representative of the equivalence class containing `token`.
    fn representative(&self, token: TokenId) -> TokenId {
        token
    }

    /// Linear scan over `related`.
    fn has_relation(&self, a: TokenId, b: TokenId, predicate: Predicate) -> bool {
        let target = self.representative(b);
        self.related(a, predicate).contains(&target)
    }
}
