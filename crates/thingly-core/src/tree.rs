//! Hierarchical resource tree built from flat href lists.
//!
//! Devices publish resources as a flat list of slash-separated hrefs.
//! [`build_resource_tree`] materializes that list into a tree with one
//! node per unique href prefix, so `/light/1` and `/light/2` share a
//! single `/light/` parent. A node can simultaneously be a resource and
//! a container: publishing both `/a` and `/a/b` yields an `/a/` node
//! that carries the `/a` resource fields and has `/a/b/` as a child.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use thiserror::Error;

use crate::model::Resource;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    /// Hrefs must be slash-prefixed and contain at least one non-empty
    /// segment.
    #[error("malformed href: {href:?}")]
    MalformedHref { href: String },
}

/// One node of the materialized resource tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceTreeNode {
    /// Path prefix for this node, always slash-terminated, e.g. `/light/`.
    pub href: String,

    /// The input resource whose href ends at this node, if any. Pure
    /// containers (prefixes no resource ends at) carry `None`. The
    /// resource keeps its original, unterminated href.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<Resource>,

    /// Children, sorted case-insensitively by href.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sub_rows: Vec<ResourceTreeNode>,
}

impl ResourceTreeNode {
    /// Depth-first count of nodes that correspond to an input resource.
    #[must_use]
    pub fn resource_count(&self) -> usize {
        usize::from(self.resource.is_some())
            + self.sub_rows.iter().map(Self::resource_count).sum::<usize>()
    }
}

/// Case-insensitive ordering used for sibling sort.
fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

/// Split an href into its non-empty path segments.
///
/// Repeated slashes collapse, so `/light//oic` and `/light/oic` name
/// the same node. An href that is not slash-prefixed, or has no
/// segments at all, is malformed.
fn segments(href: &str) -> Result<Vec<&str>, TreeError> {
    if !href.starts_with('/') {
        return Err(TreeError::MalformedHref {
            href: href.to_owned(),
        });
    }
    let segs: Vec<&str> = href.split('/').filter(|s| !s.is_empty()).collect();
    if segs.is_empty() {
        return Err(TreeError::MalformedHref {
            href: href.to_owned(),
        });
    }
    Ok(segs)
}

/// Build the resource tree for one device's published resources.
///
/// Input order does not matter and rebuilding from the same input
/// yields an identical tree. Duplicate hrefs collapse into one node,
/// with the later record's fields winning.
///
/// # Errors
///
/// Returns [`TreeError::MalformedHref`] for any href that is empty, not
/// slash-prefixed, or all slashes. Nothing is partially built: one bad
/// href rejects the whole input.
pub fn build_resource_tree(resources: &[Resource]) -> Result<Vec<ResourceTreeNode>, TreeError> {
    // Arena keyed by slash-terminated prefix; edges kept separately so
    // node mutation never fights child registration.
    let mut arena: BTreeMap<String, Option<Resource>> = BTreeMap::new();
    let mut edges: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    let mut roots: BTreeSet<String> = BTreeSet::new();

    for resource in resources {
        let segs = segments(&resource.href)?;
        let last = segs.len() - 1;

        let mut prefix = String::from("/");
        let mut parent: Option<String> = None;

        for (i, seg) in segs.iter().enumerate() {
            prefix.push_str(seg);
            prefix.push('/');

            let slot = arena.entry(prefix.clone()).or_default();
            if i == last {
                *slot = Some(resource.clone());
            }

            match &parent {
                None => {
                    roots.insert(prefix.clone());
                }
                Some(p) => {
                    edges.entry(p.clone()).or_default().insert(prefix.clone());
                }
            }
            parent = Some(prefix.clone());
        }
    }

    let mut tree: Vec<ResourceTreeNode> = roots
        .iter()
        .map(|key| materialize(key, &arena, &edges))
        .collect();
    tree.sort_by(|a, b| cmp_ignore_case(&a.href, &b.href));
    Ok(tree)
}

fn materialize(
    key: &str,
    arena: &BTreeMap<String, Option<Resource>>,
    edges: &BTreeMap<String, BTreeSet<String>>,
) -> ResourceTreeNode {
    let mut sub_rows: Vec<ResourceTreeNode> = edges
        .get(key)
        .into_iter()
        .flatten()
        .map(|child| materialize(child, arena, edges))
        .collect();
    sub_rows.sort_by(|a, b| cmp_ignore_case(&a.href, &b.href));

    ResourceTreeNode {
        href: key.to_owned(),
        resource: arena.get(key).cloned().flatten(),
        sub_rows,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn resource(href: &str) -> Resource {
        Resource {
            href: href.to_owned(),
            resource_types: vec!["oic.r.test".into()],
            interfaces: vec!["oic.if.baseline".into()],
            endpoints: Vec::new(),
        }
    }

    fn hrefs(tree: &[ResourceTreeNode]) -> Vec<&str> {
        tree.iter().map(|n| n.href.as_str()).collect()
    }

    #[test]
    fn groups_shared_prefixes_under_one_parent() {
        let input = vec![
            resource("/light/1"),
            resource("/light/2"),
            resource("/oic/d"),
        ];
        let tree = build_resource_tree(&input).unwrap();

        assert_eq!(hrefs(&tree), vec!["/light/", "/oic/"]);

        let light = &tree[0];
        assert!(light.resource.is_none(), "pure container has no resource");
        assert_eq!(hrefs(&light.sub_rows), vec!["/light/1/", "/light/2/"]);
        assert_eq!(
            light.sub_rows[0].resource.as_ref().unwrap().href,
            "/light/1"
        );
    }

    #[test]
    fn repeated_slashes_collapse() {
        // "/light//oic" names the same node as "/light/oic".
        let tree = build_resource_tree(&[resource("/light//oic"), resource("/light/oic")]).unwrap();

        assert_eq!(hrefs(&tree), vec!["/light/"]);
        assert_eq!(hrefs(&tree[0].sub_rows), vec!["/light/oic/"]);
        assert_eq!(tree[0].sub_rows[0].resource_count(), 1);
    }

    #[test]
    fn ancestor_and_leaf_coexist() {
        let tree = build_resource_tree(&[resource("/a"), resource("/a/b")]).unwrap();

        assert_eq!(hrefs(&tree), vec!["/a/"]);
        let a = &tree[0];
        assert_eq!(a.resource.as_ref().unwrap().href, "/a");
        assert_eq!(hrefs(&a.sub_rows), vec!["/a/b/"]);
        assert_eq!(a.resource_count(), 2);
    }

    #[test]
    fn siblings_sort_case_insensitively() {
        let tree = build_resource_tree(&[
            resource("/Zeta"),
            resource("/alpha"),
            resource("/Beta"),
            resource("/p/B"),
            resource("/p/a"),
        ])
        .unwrap();

        assert_eq!(hrefs(&tree), vec!["/alpha/", "/Beta/", "/p/", "/Zeta/"]);
        let p = &tree[2];
        assert_eq!(hrefs(&p.sub_rows), vec!["/p/a/", "/p/B/"]);
    }

    #[test]
    fn rebuild_is_idempotent_and_order_independent() {
        let forward = vec![resource("/a/b"), resource("/a/c"), resource("/d")];
        let reversed: Vec<Resource> = forward.iter().rev().cloned().collect();

        let t1 = build_resource_tree(&forward).unwrap();
        let t2 = build_resource_tree(&forward).unwrap();
        let t3 = build_resource_tree(&reversed).unwrap();

        assert_eq!(t1, t2);
        assert_eq!(t1, t3);
    }

    #[test]
    fn resource_node_count_matches_distinct_hrefs() {
        let input = vec![
            resource("/a"),
            resource("/a/b"),
            resource("/a/b/c"),
            resource("/x/y"),
            resource("/a"), // duplicate collapses
        ];
        let tree = build_resource_tree(&input).unwrap();
        let total: usize = tree.iter().map(ResourceTreeNode::resource_count).sum();
        assert_eq!(total, 4);
    }

    #[test]
    fn duplicate_href_last_record_wins() {
        let mut first = resource("/light/1");
        first.resource_types = vec!["oic.r.old".into()];
        let mut second = resource("/light/1");
        second.resource_types = vec!["oic.r.new".into()];

        let tree = build_resource_tree(&[first, second]).unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(
            tree[0].resource.as_ref().unwrap().resource_types,
            vec!["oic.r.new"]
        );
    }

    #[test]
    fn malformed_hrefs_are_rejected() {
        for bad in ["", "/", "//", "light/1"] {
            let err = build_resource_tree(&[resource(bad)]).unwrap_err();
            assert_eq!(
                err,
                TreeError::MalformedHref {
                    href: bad.to_owned()
                }
            );
        }

        // One bad href rejects the whole batch.
        assert!(build_resource_tree(&[resource("/ok"), resource("")]).is_err());
    }

    #[test]
    fn empty_input_builds_empty_tree() {
        assert!(build_resource_tree(&[]).unwrap().is_empty());
    }
}
