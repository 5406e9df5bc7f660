//! Datapack loading and override resolution.
//!
//! [`load`] merges an unordered set of parsed datapack documents into an
//! immutable [`Ruleset`]:
//!
//! 1. every declared dependency must be present in the set;
//! 2. packs are ordered topologically over `dependencies` and (present)
//!    `load_after` edges, ties broken by name so the order is a function
//!    of the set, not of input order;
//! 3. features register into flat tables keyed by qualified name. A
//!    feature whose name prefix is another pack *overrides* that pack's
//!    registration: the payload is replaced, the owner and table position
//!    are kept. Overrides of names nobody registered are skipped;
//! 4. every memo reference must resolve, every action index must lie
//!    inside its rule's pattern;
//! 5. the last pack to declare board dimensions wins; the default board
//!    is 19x19.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, info, warn};

use crate::core::LoadError;
use crate::engine::{RegisteredRestriction, RegisteredRule, Ruleset};
use crate::pattern::Pattern;
use crate::rules::{
    BoardAction, Condition, DisjunctionRestriction, PatternRestriction, Restriction, Rule,
    RulePriority, ScoreAction, LOCATION_CENTER, PLAYER_ACTIVE, PLAYER_REMOVE,
};
use crate::score::ScoreSpec;

use super::document::{DatapackDoc, RestrictionDoc, RuleDoc, Topology};

/// Board used when no loaded pack declares dimensions.
pub const DEFAULT_DIMENSIONS: [usize; 2] = [19, 19];

/// Merge a set of datapack documents into a ruleset.
///
/// The input order is irrelevant: the same set always produces the same
/// ruleset.
pub fn load(docs: Vec<DatapackDoc>) -> Result<Ruleset, LoadError> {
    let mut by_name: FxHashMap<String, DatapackDoc> = FxHashMap::default();
    for doc in docs {
        if by_name.contains_key(&doc.name) {
            return Err(LoadError::DuplicatePack(doc.name));
        }
        by_name.insert(doc.name.clone(), doc);
    }

    for doc in by_name.values() {
        for dependency in &doc.dependencies {
            if !by_name.contains_key(dependency) {
                return Err(LoadError::MissingDependency {
                    pack: doc.name.clone(),
                    dependency: dependency.clone(),
                });
            }
        }
    }

    let order = sort_packs(&by_name)?;
    info!(order = ?order, "resolved datapack load order");

    let ordered: Vec<&DatapackDoc> = order.iter().map(|name| &by_name[name]).collect();

    // Scores first: restriction and rule conditions reference the final
    // score table.
    let mut scores: FeatureTable<ScoreSpec> = FeatureTable::new();
    for pack in &ordered {
        for spec in &pack.scores {
            if scores.is_dropped_override(&pack.name, &spec.name)? {
                continue;
            }
            scores.merge(&pack.name, &spec.name, spec.clone(), |slot, new| *slot = new)?;
        }
    }

    let mut restrictions: FeatureTable<Restriction> = FeatureTable::new();
    for pack in &ordered {
        for doc in &pack.restrictions {
            let Some(name) = doc.name() else {
                return Err(LoadError::AnonymousRestriction {
                    pack: pack.name.clone(),
                });
            };
            let name = name.to_string();
            // A dropped override is skipped before compilation: it may
            // reference features of the pack that isn't there.
            if restrictions.is_dropped_override(&pack.name, &name)? {
                continue;
            }
            let compiled = compile_restriction(&pack.name, &name, doc, &scores)?;
            restrictions.merge(&pack.name, &name, compiled, |slot, new| *slot = new)?;
        }
    }

    let mut rules: FeatureTable<(RulePriority, Rule)> = FeatureTable::new();
    for pack in &ordered {
        for doc in &pack.rules {
            if rules.is_dropped_override(&pack.name, &doc.name)? {
                continue;
            }
            let compiled = compile_rule(&pack.name, doc, &scores)?;
            // An override replaces the rule body but keeps the original
            // registration's priority, and with it the execution slot.
            rules.merge(&pack.name, &doc.name, compiled, |slot, new| {
                if slot.0 != new.0 {
                    debug!(rule = %doc.name, "override priority ignored");
                }
                slot.1 = new.1;
            })?;
        }
    }

    let dimensions = resolve_dimensions(&ordered)?;
    info!(?dimensions, "board resolved");

    let display_name = ordered
        .iter()
        .map(|pack| pack.display_name.clone().unwrap_or_else(|| pack.name.clone()))
        .collect::<Vec<_>>()
        .join(", ");

    let restrictions = restrictions
        .into_entries()
        .map(|entry| RegisteredRestriction {
            name: entry.name,
            owner: entry.owner,
            restriction: entry.payload,
        })
        .collect();

    let mut registered_rules: Vec<RegisteredRule> = rules
        .into_entries()
        .map(|entry| RegisteredRule {
            name: entry.name,
            owner: entry.owner,
            priority: entry.payload.0,
            rule: entry.payload.1,
        })
        .collect();
    // Stable sort: within a priority bucket, registration order is pack
    // load order then declaration order.
    registered_rules.sort_by_key(|entry| entry.priority);

    Ok(Ruleset::new(
        display_name,
        dimensions,
        scores.into_entries().map(|entry| entry.payload).collect(),
        restrictions,
        registered_rules,
        order,
    ))
}

/// Deterministic topological sort over dependency and load_after edges.
fn sort_packs(by_name: &FxHashMap<String, DatapackDoc>) -> Result<Vec<String>, LoadError> {
    let mut edges: FxHashSet<(String, String)> = FxHashSet::default();
    for doc in by_name.values() {
        for before in doc.dependencies.iter().chain(&doc.load_after) {
            if by_name.contains_key(before) {
                edges.insert((before.clone(), doc.name.clone()));
            }
        }
    }

    let mut indegree: FxHashMap<&str, usize> =
        by_name.keys().map(|name| (name.as_str(), 0)).collect();
    let mut successors: FxHashMap<&str, Vec<&str>> = FxHashMap::default();
    for (before, after) in &edges {
        *indegree.get_mut(after.as_str()).unwrap() += 1;
        successors
            .entry(before.as_str())
            .or_default()
            .push(after.as_str());
    }

    let mut ready: BinaryHeap<Reverse<&str>> = indegree
        .iter()
        .filter(|(_, &degree)| degree == 0)
        .map(|(&name, _)| Reverse(name))
        .collect();

    let mut order = Vec::with_capacity(by_name.len());
    while let Some(Reverse(name)) = ready.pop() {
        order.push(name.to_string());
        if let Some(afters) = successors.get(name) {
            for &after in afters {
                let degree = indegree.get_mut(after).unwrap();
                *degree -= 1;
                if *degree == 0 {
                    ready.push(Reverse(after));
                }
            }
        }
    }

    if order.len() < by_name.len() {
        let stuck = indegree
            .iter()
            .filter(|(_, &degree)| degree > 0)
            .map(|(&name, _)| name)
            .min()
            .unwrap_or_default();
        return Err(LoadError::DependencyCycle(stuck.to_string()));
    }

    Ok(order)
}

/// The board is whatever the last declaring pack says, but a pack may not
/// change the *axis count* out from under a dependency.
fn resolve_dimensions(ordered: &[&DatapackDoc]) -> Result<Vec<usize>, LoadError> {
    let mut declared: FxHashMap<&str, usize> = FxHashMap::default();
    let mut transitive: FxHashMap<&str, FxHashSet<&str>> = FxHashMap::default();
    let mut dimensions: Option<Vec<usize>> = None;

    for pack in ordered {
        // Dependencies appear earlier in load order, so their transitive
        // sets are complete by the time we reach this pack.
        let mut deps: FxHashSet<&str> = FxHashSet::default();
        for dependency in &pack.dependencies {
            deps.insert(dependency.as_str());
            if let Some(indirect) = transitive.get(dependency.as_str()) {
                deps.extend(indirect.iter().copied());
            }
        }

        if let Some(board) = &pack.board {
            if board.dimensions.is_empty() || board.dimensions.contains(&0) {
                return Err(LoadError::EmptyBoardAxis {
                    pack: pack.name.clone(),
                });
            }
            if board.topology != Topology::Stop {
                warn!(
                    pack = %pack.name,
                    topology = ?board.topology,
                    "topology is reserved; using stop semantics"
                );
            }
            let mut checked: Vec<&str> = deps.iter().copied().collect();
            checked.sort_unstable();
            for dependency in checked {
                if let Some(&expected) = declared.get(dependency) {
                    if expected != board.dimensions.len() {
                        return Err(LoadError::DimensionMismatch {
                            pack: pack.name.clone(),
                            dependency: dependency.to_string(),
                            expected,
                            found: board.dimensions.len(),
                        });
                    }
                }
            }
            declared.insert(&pack.name, board.dimensions.len());
            dimensions = Some(board.dimensions.clone());
        }

        transitive.insert(&pack.name, deps);
    }

    Ok(dimensions.unwrap_or_else(|| DEFAULT_DIMENSIONS.to_vec()))
}

fn compile_rule(
    pack: &str,
    doc: &RuleDoc,
    scores: &FeatureTable<ScoreSpec>,
) -> Result<(RulePriority, Rule), LoadError> {
    let pattern = compile_pattern(pack, &doc.pattern)?;
    let len = pattern.len();

    validate_conditions(pack, &doc.name, &doc.conditions, len, scores)?;
    for action in &doc.score_actions {
        validate_score_action(pack, &doc.name, action, len, scores)?;
    }
    for action in &doc.board_actions {
        validate_board_action(pack, &doc.name, action, len)?;
    }

    Ok((
        doc.priority,
        Rule {
            pattern,
            multimatch: doc.multimatch_mode,
            conditions: doc.conditions.clone(),
            score_actions: doc.score_actions.clone(),
            board_actions: doc.board_actions.clone(),
            active_player: doc.active_player,
        },
    ))
}

fn compile_restriction(
    pack: &str,
    context: &str,
    doc: &RestrictionDoc,
    scores: &FeatureTable<ScoreSpec>,
) -> Result<Restriction, LoadError> {
    match doc {
        RestrictionDoc::Pattern {
            pattern,
            conditions,
            active_player,
            negate,
            ..
        } => {
            let compiled = compile_pattern(pack, pattern)?;
            validate_conditions(pack, context, conditions, compiled.len(), scores)?;
            Ok(Restriction::Pattern(PatternRestriction {
                pattern: compiled,
                conditions: conditions.clone(),
                active_player: *active_player,
                negate: *negate,
            }))
        }
        RestrictionDoc::Disjunction { conjunctions, .. } => {
            let compiled = conjunctions
                .iter()
                .map(|conjunction| {
                    conjunction
                        .iter()
                        .map(|nested| compile_restriction(pack, context, nested, scores))
                        .collect::<Result<Vec<_>, _>>()
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Restriction::Disjunction(DisjunctionRestriction {
                conjunctions: compiled,
            }))
        }
    }
}

fn compile_pattern(pack: &str, source: &str) -> Result<Pattern, LoadError> {
    Pattern::compile(source).map_err(|err| LoadError::InvalidPattern {
        pack: pack.to_string(),
        pattern: source.to_string(),
        source: err,
    })
}

fn validate_conditions(
    pack: &str,
    name: &str,
    conditions: &[Condition],
    pattern_len: usize,
    scores: &FeatureTable<ScoreSpec>,
) -> Result<(), LoadError> {
    for condition in conditions {
        if let Condition::Score {
            player_index,
            memo,
            minimum,
            maximum,
        } = condition
        {
            if minimum.is_none() && maximum.is_none() {
                return Err(LoadError::MissingBounds {
                    pack: pack.to_string(),
                    name: name.to_string(),
                });
            }
            if !scores.contains(memo) {
                return Err(LoadError::UnknownMemo {
                    pack: pack.to_string(),
                    memo: memo.clone(),
                });
            }
            validate_player_index(pack, name, *player_index, PLAYER_ACTIVE, pattern_len)?;
        }
    }
    Ok(())
}

fn validate_score_action(
    pack: &str,
    name: &str,
    action: &ScoreAction,
    pattern_len: usize,
    scores: &FeatureTable<ScoreSpec>,
) -> Result<(), LoadError> {
    if !scores.contains(&action.memo) {
        return Err(LoadError::UnknownMemo {
            pack: pack.to_string(),
            memo: action.memo.clone(),
        });
    }
    validate_player_index(pack, name, action.player_index, PLAYER_ACTIVE, pattern_len)
}

fn validate_board_action(
    pack: &str,
    name: &str,
    action: &BoardAction,
    pattern_len: usize,
) -> Result<(), LoadError> {
    validate_player_index(pack, name, action.player_index, PLAYER_REMOVE, pattern_len)?;
    if action.location_index < LOCATION_CENTER
        || (action.location_index >= 0 && action.location_index as usize >= pattern_len)
    {
        return Err(LoadError::IndexOutOfPattern {
            pack: pack.to_string(),
            name: name.to_string(),
            index: action.location_index,
            len: pattern_len,
        });
    }
    Ok(())
}

fn validate_player_index(
    pack: &str,
    name: &str,
    index: i32,
    smallest_rogue: i32,
    pattern_len: usize,
) -> Result<(), LoadError> {
    if index < smallest_rogue {
        return Err(LoadError::InvalidPlayerIndex {
            pack: pack.to_string(),
            name: name.to_string(),
            index,
        });
    }
    if index >= 0 && index as usize >= pattern_len {
        return Err(LoadError::IndexOutOfPattern {
            pack: pack.to_string(),
            name: name.to_string(),
            index,
            len: pattern_len,
        });
    }
    Ok(())
}

/// A flat feature table keyed by qualified name.
///
/// Registration preserves order; overrides replace payloads in place.
struct FeatureTable<T> {
    entries: Vec<TableEntry<T>>,
    index: FxHashMap<String, usize>,
}

struct TableEntry<T> {
    name: String,
    owner: String,
    payload: T,
}

impl<T> FeatureTable<T> {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Whether this feature is an override of a name nobody registered.
    /// Such overrides are skipped silently (with a log line).
    fn is_dropped_override(&self, pack: &str, name: &str) -> Result<bool, LoadError> {
        let (owner, _) = split_qualified(pack, name)?;
        if owner != pack && !self.contains(name) {
            warn!(pack, name, "override target not registered; skipped");
            return Ok(true);
        }
        Ok(false)
    }

    /// Register (owner prefix = `pack`) or override (any other prefix).
    ///
    /// `replace` merges an override payload into the existing entry,
    /// letting the caller keep fields the override must not touch.
    fn merge(
        &mut self,
        pack: &str,
        name: &str,
        payload: T,
        replace: impl FnOnce(&mut T, T),
    ) -> Result<(), LoadError> {
        let (owner, _) = split_qualified(pack, name)?;

        if owner == pack {
            if self.index.contains_key(name) {
                return Err(LoadError::DuplicateRegistration {
                    pack: pack.to_string(),
                    name: name.to_string(),
                });
            }
            self.index.insert(name.to_string(), self.entries.len());
            self.entries.push(TableEntry {
                name: name.to_string(),
                owner: owner.to_string(),
                payload,
            });
        } else if let Some(&slot) = self.index.get(name) {
            debug!(pack, name, "feature overridden");
            replace(&mut self.entries[slot].payload, payload);
        } else {
            warn!(pack, name, "override target not registered; skipped");
        }
        Ok(())
    }

    fn into_entries(self) -> impl Iterator<Item = TableEntry<T>> {
        self.entries.into_iter()
    }
}

/// Split `owner.item`, requiring both halves to be non-empty.
fn split_qualified<'n>(pack: &str, name: &'n str) -> Result<(&'n str, &'n str), LoadError> {
    match name.rsplit_once('.') {
        Some((owner, item)) if !owner.is_empty() && !item.is_empty() => Ok((owner, item)),
        _ => Err(LoadError::UnqualifiedName {
            pack: pack.to_string(),
            name: name.to_string(),
        }),
    }
}
