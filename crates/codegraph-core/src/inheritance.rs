//! Inheritance-chain walk for member resolution through superclasses.

use std::collections::HashSet;

use crate::context::GlobalContext;
use crate::model::{ExtraKind, NodeId};
use crate::text::clean_type_text;

/// Starting from `class_qn`, look for a member named `member_name`, walking
/// up the `super_class` chain recorded on each `Class`'s `ClassExtra`. Stops
/// at the first class whose superclass cannot be resolved (typically
/// `Object`, or a builtin/external type the indexer never registered).
pub fn walk(ctx: &GlobalContext, class_qn: &str, member_name: &str) -> Option<NodeId> {
    walk_with_key(ctx, class_qn, member_name, |current, member| {
        ctx.resolver.build_qualified_name(current, member)
    })
}

/// Same traversal as `walk`, but with the candidate-QN-at-each-step built by
/// `key` instead of the resolver's default `parent.member` join. Lets a
/// caller probe for a method (`parent.member()`) rather than a field
/// (`parent.member`) without duplicating the chain-walk/cycle-guard logic.
pub fn walk_with_key(
    ctx: &GlobalContext,
    class_qn: &str,
    member_name: &str,
    key: impl Fn(&str, &str) -> String,
) -> Option<NodeId> {
    let mut visited = HashSet::new();
    let mut current = class_qn.to_string();

    loop {
        if !visited.insert(current.clone()) {
            return None; // cycle guard
        }

        let member_qn = key(&current, member_name);
        if let Some(id) = ctx.lookup_qn(&member_qn) {
            return Some(id);
        }

        let super_class = super_class_of(ctx, &current)?;
        let cleaned = clean_type_text(&super_class);
        if cleaned == "Object" {
            return None;
        }

        current = match ctx.lookup_qn(&cleaned) {
            Some(_) => cleaned,
            None => ctx
                .qns_ending_in(&cleaned)
                .into_iter()
                .next()
                .unwrap_or(cleaned),
        };
    }
}

fn super_class_of(ctx: &GlobalContext, class_qn: &str) -> Option<String> {
    let node_id = ctx.lookup_qn(class_qn)?;
    let graph = ctx.graph.read().expect("graph lock poisoned");
    let element = graph.node(node_id)?;
    match &element.extra.kind {
        Some(ExtraKind::Class(c)) => c.super_class.clone(),
        _ => None,
    }
}
