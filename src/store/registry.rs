use super::types::*;
use super::KnowledgeStore;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Per-predicate adjacency in linked-list form: `first[token]` is the newest
/// edge leaving `token`, `next[edge]` chains to the previous one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjacency {
    pub first: Vec<u32>,
    pub targets: Vec<TokenId>,
    pub next: Vec<u32>,
}

impl Adjacency {
    fn push(&mut self, from: TokenId, to: TokenId) {
        let f_idx = from.index();
        if self.first.len() <= f_idx {
            self.first.resize(f_idx + 1, u32::MAX);
        }
        let head = self.first[f_idx];
        let new_edge = self.targets.len() as u32;
        self.targets.push(to);
        self.next.push(head);
        self.first[f_idx] = new_edge;
    }

    fn check(&self, token_count: usize) -> std::result::Result<(), String> {
        let edge_count = self.targets.len();
        if self.next.len() != edge_count {
            return Err(format!("{} targets but {} next links", edge_count, self.next.len()));
        }
        if self.first.len() > token_count {
            return Err(format!("{} edge heads for {} tokens", self.first.len(), token_count));
        }
        if let Some(link) = self.first.iter().chain(&self.next).find(|&&l| l != u32::MAX && l as usize >= edge_count) {
            return Err(format!("edge link {} past {} edges", link, edge_count));
        }
        // A link must point at an older edge, which rules out cycles.
        if let Some(edge) = self.next.iter().enumerate().position(|(i, &l)| l != u32::MAX && l as usize >= i) {
            return Err(format!("edge {} links forward", edge));
        }
        if let Some(target) = self.targets.iter().find(|t| t.index() >= token_count) {
            return Err(format!("target {:?} is not a token", target));
        }
        Ok(())
    }

    fn for_each_target(&self, from: TokenId, mut f: impl FnMut(TokenId)) {
        let mut edge_idx = self.first.get(from.index()).copied().unwrap_or(u32::MAX);
        while edge_idx != u32::MAX {
            f(self.targets[edge_idx as usize]);
            edge_idx = self.next[edge_idx as usize];
        }
    }
}

/// In-memory knowledge store for a single expression.
///
/// Tokens are kept column-wise, relations as one adjacency list per
/// predicate, and equivalent tokens (same-as) as a union-find forest whose
/// root is the class representative.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "RegistryData")]
pub struct TokenRegistry {
    pub attributes: Vec<TokenAttributes>,
    pub edges: BTreeMap<Predicate, Adjacency>,
    pub same_as: Vec<TokenId>,

    // Ephemeral lookup for `resolve_by_index` (Not serialized, rebuilt on load)
    #[serde(skip)]
    pub by_index: HashMap<u32, TokenId>,
}

/// Serialized shape of `TokenRegistry`, checked before it becomes a store.
#[derive(Deserialize)]
struct RegistryData {
    attributes: Vec<TokenAttributes>,
    edges: BTreeMap<Predicate, Adjacency>,
    same_as: Vec<TokenId>,
}

impl TryFrom<RegistryData> for TokenRegistry {
    type Error = String;

    fn try_from(data: RegistryData) -> std::result::Result<Self, Self::Error> {
        let count = data.attributes.len();
        if data.same_as.len() != count {
            return Err(format!("same_as has {} entries for {} tokens", data.same_as.len(), count));
        }
        // Roots point at themselves, every other entry at a smaller handle.
        for (i, parent) in data.same_as.iter().enumerate() {
            if parent.index() > i {
                return Err(format!("same_as entry {} points forward to {}", i, parent.index()));
            }
        }
        for (predicate, adjacency) in &data.edges {
            adjacency.check(count).map_err(|msg| format!("{}: {}", predicate, msg))?;
        }

        let mut registry = TokenRegistry {
            attributes: data.attributes,
            edges: data.edges,
            same_as: data.same_as,
            by_index: HashMap::new(),
        };
        registry.rebuild();
        Ok(registry)
    }
}

impl TokenRegistry {
    pub fn new() -> Self { Self::default() }
    pub fn count(&self) -> usize { self.attributes.len() }

    /// One token per text, with `index` set to its 1-based position.
    pub fn from_expression<I, T>(texts: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut registry = Self::new();
        for (i, text) in texts.into_iter().enumerate() {
            registry.add_token(TokenAttributes {
                index: Some((i + 1).to_string()),
                text: Some(text.into()),
                is_operand: None,
            });
        }
        registry
    }

    /// Builds the registry from a JSON array of token texts, e.g. `["2","+","3"]`.
    pub fn from_json_expression(json: &str) -> Result<Self> {
        let texts: Vec<String> = serde_json::from_str(json)?;
        Ok(Self::from_expression(texts))
    }

    /// Rebuilds the `by_index` lookup from the `index` attributes.
    pub fn rebuild(&mut self) {
        self.by_index.clear();
        for (i, attrs) in self.attributes.iter().enumerate() {
            if let Some(index) = attrs.index.as_deref().and_then(|v| v.parse::<u32>().ok()) {
                self.by_index.entry(index).or_insert(TokenId::new(i));
            }
        }
    }

    pub fn add_token(&mut self, attrs: TokenAttributes) -> TokenId {
        let id = TokenId::new(self.attributes.len());
        if let Some(index) = attrs.index.as_deref().and_then(|v| v.parse::<u32>().ok()) {
            self.by_index.entry(index).or_insert(id);
        }
        self.attributes.push(attrs);
        self.same_as.push(id);
        id
    }

    pub fn set_attribute(&mut self, token: TokenId, attr: Attribute, value: impl Into<String>) {
        self.attributes[token.index()].set(attr, value.into());
        if attr == Attribute::Index {
            self.rebuild();
        }
    }

    pub fn add_relation(&mut self, from: TokenId, predicate: Predicate, to: TokenId) {
        debug_assert!(from.index() < self.count() && to.index() < self.count());
        self.edges.entry(predicate).or_default().push(from, to);
    }

    /// Declares `a` and `b` the same entity. The smaller handle of the two
    /// class roots becomes the representative.
    pub fn merge_same(&mut self, a: TokenId, b: TokenId) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }
        let (root, child) = if ra < rb { (ra, rb) } else { (rb, ra) };
        self.same_as[child.index()] = root;
    }

    fn find(&self, token: TokenId) -> TokenId {
        let mut current = token;
        while let Some(&parent) = self.same_as.get(current.index()) {
            if parent == current {
                break;
            }
            current = parent;
        }
        current
    }
}

impl KnowledgeStore for TokenRegistry {
    fn tokens(&self) -> Vec<TokenId> {
        (0..self.count()).map(TokenId::new).collect()
    }

    fn attribute(&self, token: TokenId, attr: Attribute) -> Option<String> {
        self.attributes.get(token.index())?.get(attr).map(str::to_string)
    }

    fn related(&self, token: TokenId, predicate: Predicate) -> Vec<TokenId> {
        let Some(adjacency) = self.edges.get(&predicate) else {
            return Vec::new();
        };
        // Facts asserted on any member of the class apply to the whole class.
        let root = self.find(token);
        let mut representatives = BTreeSet::new();
        for member in (0..self.count()).map(TokenId::new).filter(|&m| self.find(m) == root) {
            adjacency.for_each_target(member, |target| {
                representatives.insert(self.find(target));
            });
        }
        representatives.into_iter().collect()
    }

    fn resolve_by_index(&self, index: u32) -> Option<TokenId> {
        self.by_index.get(&index).copied()
    }

    fn representative(&self, token: TokenId) -> TokenId {
        self.find(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;
    use crate::validation::AnalysisOptions;
    use rstest::rstest;

    fn three_tokens() -> (TokenRegistry, TokenId, TokenId, TokenId) {
        let reg = TokenRegistry::from_expression(["a", "+", "b"]);
        (reg, TokenId(0), TokenId(1), TokenId(2))
    }

    #[test]
    fn test_from_expression_assigns_positions() {
        let (reg, _, plus, _) = three_tokens();
        assert_eq!(reg.count(), 3);
        assert_eq!(reg.attribute(plus, Attribute::Index).as_deref(), Some("2"));
        assert_eq!(reg.attribute(plus, Attribute::Text).as_deref(), Some("+"));
        assert_eq!(reg.attribute(plus, Attribute::IsOperand), None);
        assert_eq!(reg.resolve_by_index(3), Some(TokenId(2)));
        assert_eq!(reg.resolve_by_index(4), None);
    }

    #[test]
    fn test_from_json_expression() {
        let reg = TokenRegistry::from_json_expression(r#"["x","*","y","-","z"]"#).unwrap();
        assert_eq!(reg.count(), 5);
        assert_eq!(reg.attribute(TokenId(4), Attribute::Text).as_deref(), Some("z"));

        assert!(TokenRegistry::from_json_expression("[1, 2").is_err());
    }

    #[test]
    fn test_related_dedupes_by_representative() {
        let (mut reg, a, plus, b) = three_tokens();
        reg.add_relation(plus, Predicate::HasOperand, a);
        reg.add_relation(plus, Predicate::HasOperand, b);
        reg.add_relation(plus, Predicate::HasOperand, b);
        assert_eq!(reg.related(plus, Predicate::HasOperand), vec![a, b]);

        reg.merge_same(a, b);
        assert_eq!(reg.related(plus, Predicate::HasOperand), vec![a]);
        assert_eq!(reg.representative(b), a);
        assert!(reg.related(plus, Predicate::BeforeDirect).is_empty());
    }

    #[test]
    fn test_facts_shared_across_class() {
        let (mut reg, a, plus, b) = three_tokens();
        reg.add_relation(a, Predicate::BeforeDirect, plus);
        reg.merge_same(b, a);
        assert_eq!(reg.related(b, Predicate::BeforeDirect), vec![plus]);
    }

    #[test]
    fn test_has_relation() {
        let (mut reg, a, plus, b) = three_tokens();
        reg.add_relation(plus, Predicate::HasOperand, a);
        assert!(reg.has_relation(plus, a, Predicate::HasOperand));
        assert!(!reg.has_relation(plus, b, Predicate::HasOperand));
        assert!(!reg.has_relation(a, plus, Predicate::HasOperand));

        reg.merge_same(a, b);
        assert!(reg.has_relation(plus, b, Predicate::HasOperand));
    }

    #[test]
    fn test_set_index_refreshes_lookup() {
        let (mut reg, a, _, _) = three_tokens();
        reg.set_attribute(a, Attribute::Index, "7");
        assert_eq!(reg.resolve_by_index(7), Some(a));
        assert_eq!(reg.resolve_by_index(1), None);
    }

    #[test]
    fn test_loaded_registry_is_ready_for_analysis() {
        // 2 + 3 with a precedence finding on '+' (2) against '2' (1).
        let mut reg = TokenRegistry::from_expression(["2", "+", "3"]);
        reg.add_relation(TokenId(1), Predicate::StudentErrorMorePriorityLeft, TokenId(0));

        let json = serde_json::to_string(&reg).unwrap();
        let loaded: TokenRegistry = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.resolve_by_index(2), Some(TokenId(1)));

        let report = analyze(&loaded, &AnalysisOptions::default()).unwrap();
        assert_eq!(
            report.descriptions,
            vec!["Operator 2 on pos 1 evaluated before operator + on pos 2 as operator with higher precedence"]
        );
    }

    #[test]
    fn test_load_keeps_equivalence_classes() {
        let (mut reg, a, plus, b) = three_tokens();
        reg.add_relation(a, Predicate::BeforeDirect, plus);
        reg.merge_same(b, a);

        let loaded: TokenRegistry = serde_json::from_str(&serde_json::to_string(&reg).unwrap()).unwrap();
        assert_eq!(loaded.representative(b), a);
        assert_eq!(loaded.related(b, Predicate::BeforeDirect), vec![plus]);
    }

    fn load(json: serde_json::Value) -> std::result::Result<TokenRegistry, serde_json::Error> {
        serde_json::from_value(json)
    }

    fn two_tokens_with(edges: serde_json::Value, same_as: serde_json::Value) -> serde_json::Value {
        serde_json::json!({
            "attributes": [{ "index": "1", "text": "a" }, { "index": "2", "text": "b" }],
            "edges": edges,
            "same_as": same_as,
        })
    }

    #[test]
    fn test_load_accepts_well_formed_data() {
        let reg = load(two_tokens_with(
            serde_json::json!({ "has_operand": { "first": [0], "targets": [1], "next": [4294967295u32] } }),
            serde_json::json!([0, 0]),
        ))
        .unwrap();
        assert_eq!(reg.related(TokenId(0), Predicate::HasOperand), vec![TokenId(0)]);
        assert_eq!(reg.resolve_by_index(2), Some(TokenId(1)));
    }

    #[rstest]
    #[case::same_as_cycle(serde_json::json!({}), serde_json::json!([1, 0]))]
    #[case::same_as_length(serde_json::json!({}), serde_json::json!([0]))]
    #[case::same_as_unknown_token(serde_json::json!({}), serde_json::json!([0, 9]))]
    #[case::head_past_edges(
        serde_json::json!({ "before_direct": { "first": [3], "targets": [1], "next": [4294967295u32] } }),
        serde_json::json!([0, 1])
    )]
    #[case::next_past_edges(
        serde_json::json!({ "before_direct": { "first": [0], "targets": [1], "next": [7] } }),
        serde_json::json!([0, 1])
    )]
    #[case::next_loops(
        serde_json::json!({ "before_direct": { "first": [0], "targets": [1], "next": [0] } }),
        serde_json::json!([0, 1])
    )]
    #[case::links_out_of_step(
        serde_json::json!({ "before_direct": { "first": [0], "targets": [1], "next": [] } }),
        serde_json::json!([0, 1])
    )]
    #[case::target_unknown_token(
        serde_json::json!({ "before_direct": { "first": [0], "targets": [5], "next": [4294967295u32] } }),
        serde_json::json!([0, 1])
    )]
    #[case::heads_past_tokens(
        serde_json::json!({ "before_direct": { "first": [4294967295u32, 4294967295u32, 0], "targets": [1], "next": [4294967295u32] } }),
        serde_json::json!([0, 1])
    )]
    fn test_load_rejects_inconsistent_data(#[case] edges: serde_json::Value, #[case] same_as: serde_json::Value) {
        assert!(load(two_tokens_with(edges, same_as)).is_err());
    }
}
