//! Per-timestep eclipse forest.
//!
//! An edge parent → child means "child occults parent": the parent is the
//! farther of an overlapping pair. Each parent's children, and the parents
//! themselves, are kept in order of decreasing distance from the planet.
//!
//! The forest is rebuilt from scratch for every compound timestep and split
//! into connected components, which are resolved independently.

use std::collections::{BTreeMap, BTreeSet};

use crate::pairs::{EclipseFlag, PairTable};
use crate::sky::Sky;

/// Occultation forest over active-source slots at one timestep.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EclipseForest {
    timestep: usize,
    /// parent → occulting children, farthest first.
    children: BTreeMap<usize, Vec<usize>>,
    /// Parents, farthest first.
    parents: Vec<usize>,
}

impl EclipseForest {
    /// Build from `(farther, nearer)` edges at timestep `t`.
    pub fn build(sky: &Sky<'_>, t: usize, edges: &[(usize, usize)]) -> Self {
        let mut children: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for &(parent, child) in edges {
            let list = children.entry(parent).or_default();
            if !list.contains(&child) {
                list.push(child);
            }
        }
        for list in children.values_mut() {
            list.sort_by(|&x, &y| sky.cmp_farther(x, y, t));
        }
        let mut parents: Vec<usize> = children.keys().copied().collect();
        parents.sort_by(|&x, &y| sky.cmp_farther(x, y, t));

        Self {
            timestep: t,
            children,
            parents,
        }
    }

    /// Forest of every pair flagged compound at `t`.
    pub fn from_pairs(table: &PairTable, sky: &Sky<'_>, t: usize) -> Self {
        let edges: Vec<(usize, usize)> = table
            .flagged_at(t, EclipseFlag::Compound)
            .map(|p| sky.farther_first(p.a, p.b, t))
            .collect();
        Self::build(sky, t, &edges)
    }

    pub fn timestep(&self) -> usize {
        self.timestep
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// Occulted sources, farthest first.
    pub fn parents(&self) -> &[usize] {
        &self.parents
    }

    /// Direct occulters of `parent`, farthest first.
    pub fn children(&self, parent: usize) -> &[usize] {
        self.children.get(&parent).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every slot appearing in the forest.
    pub fn members(&self) -> BTreeSet<usize> {
        let mut all = BTreeSet::new();
        for (parent, kids) in &self.children {
            all.insert(*parent);
            all.extend(kids.iter().copied());
        }
        all
    }

    /// Split into connected components, ordered by their farthest parent.
    pub fn components(&self, sky: &Sky<'_>) -> Vec<EclipseForest> {
        let members: Vec<usize> = self.members().into_iter().collect();
        let mut root: BTreeMap<usize, usize> = members.iter().map(|&m| (m, m)).collect();

        fn find(root: &mut BTreeMap<usize, usize>, x: usize) -> usize {
            let mut r = x;
            while root[&r] != r {
                r = root[&r];
            }
            root.insert(x, r);
            r
        }

        for (parent, kids) in &self.children {
            for child in kids {
                let (a, b) = (find(&mut root, *parent), find(&mut root, *child));
                if a != b {
                    root.insert(a.max(b), a.min(b));
                }
            }
        }

        let mut grouped: BTreeMap<usize, Vec<(usize, usize)>> = BTreeMap::new();
        for (parent, kids) in &self.children {
            let r = find(&mut root, *parent);
            let edges = grouped.entry(r).or_default();
            edges.extend(kids.iter().map(|child| (*parent, *child)));
        }

        let mut parts: Vec<EclipseForest> = grouped
            .values()
            .map(|edges| Self::build(sky, self.timestep, edges))
            .collect();
        parts.sort_by(|x, y| sky.cmp_farther(x.parents[0], y.parents[0], self.timestep));
        parts
    }

    /// Partition `parent`'s occulters into groups that must be resolved
    /// together.
    ///
    /// Children are visited farthest first. A child opens a new group that
    /// also pulls in, recursively, any of its own occulters that directly
    /// occult `parent` too. Every occulter is counted in at most one group,
    /// so overlapping disks at different depths are never subtracted twice.
    pub fn occulter_groups(&self, parent: usize) -> Vec<Vec<usize>> {
        let mut counted = BTreeSet::new();
        let mut groups = Vec::new();
        for &child in self.children(parent) {
            let group = self.collect_occulters(parent, child, &mut counted);
            if !group.is_empty() {
                groups.push(group);
            }
        }
        groups
    }

    fn collect_occulters(
        &self,
        parent: usize,
        child: usize,
        counted: &mut BTreeSet<usize>,
    ) -> Vec<usize> {
        if !counted.insert(child) {
            return Vec::new();
        }
        let mut group = vec![child];
        let direct = self.children(parent);
        for &grandchild in self.children(child) {
            if direct.contains(&grandchild) && !counted.contains(&grandchild) {
                let sub = self.collect_occulters(parent, grandchild, counted);
                group.extend(sub);
            }
        }
        group
    }
}
