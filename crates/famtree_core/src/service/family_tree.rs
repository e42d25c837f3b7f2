//! Generation tree derived from a template.
//!
//! # Responsibility
//! - Turn coordinate prefixes into parent/child edges between nodes.
//! - Keep one canonical person and dynamic per id for node lookups.
//!
//! # Invariants
//! - Coordinates are unique within one tree.
//! - Every non-root node has its parent coordinate present.
//! - A canonical member hangs under at most `MAX_PARENT_NODES` parent nodes.

use crate::error::{TemplateError, TemplateResult};
use crate::model::dynamic::DynamicId;
use crate::model::person::PersonId;
use crate::model::{FamilyDynamic, FamilyName, HierarchicalCoordinate, Person, Template};
use log::{debug, info};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Distinct parent nodes one member may descend from.
pub const MAX_PARENT_NODES: usize = 1;

pub type NodeId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FamilyTreeNode {
    pub id: NodeId,
    pub coordinate: HierarchicalCoordinate,
    pub member_id: PersonId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_law_id: Option<PersonId>,
    pub dynamic_id: DynamicId,
    pub family_names: Vec<FamilyName>,
}

#[derive(Debug, Clone)]
pub struct FamilyTree {
    family_name: FamilyName,
    nodes: Vec<FamilyTreeNode>,
    by_coordinate: BTreeMap<HierarchicalCoordinate, usize>,
    parents: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
    roots: Vec<usize>,
    people: HashMap<PersonId, Person>,
    dynamics: HashMap<DynamicId, FamilyDynamic>,
}

impl FamilyTree {
    /// Derives the tree of `template`.
    ///
    /// # Errors
    /// - `DataFormat` when two lines share a coordinate.
    /// - `StructuralAssumption` when a parent coordinate is missing or a
    ///   member descends from too many parent nodes.
    pub fn build(template: &Template) -> TemplateResult<Self> {
        let mut tree = Self {
            family_name: template.family_name.clone(),
            nodes: Vec::with_capacity(template.len()),
            by_coordinate: BTreeMap::new(),
            parents: vec![None; template.len()],
            children: vec![Vec::new(); template.len()],
            roots: Vec::new(),
            people: HashMap::new(),
            dynamics: HashMap::new(),
        };

        for line in &template.lines {
            if tree.by_coordinate.contains_key(&line.coordinate) {
                return Err(TemplateError::data_format(
                    format!("duplicate coordinate {}", line.coordinate),
                    line.to_string(),
                ));
            }
            tree.by_coordinate
                .insert(line.coordinate.clone(), tree.nodes.len());
            tree.people
                .entry(line.member.id)
                .or_insert_with(|| line.member.clone());
            if let Some(in_law) = &line.in_law {
                tree.people
                    .entry(in_law.id)
                    .or_insert_with(|| in_law.clone());
            }
            tree.dynamics
                .entry(line.dynamic.id)
                .or_insert_with(|| line.dynamic.clone());
            tree.nodes.push(FamilyTreeNode {
                id: Uuid::new_v4(),
                coordinate: line.coordinate.clone(),
                member_id: line.member.id,
                in_law_id: line.in_law.as_ref().map(|in_law| in_law.id),
                dynamic_id: line.dynamic.id,
                family_names: vec![template.family_name.clone()],
            });
        }

        let mut member_parents: HashMap<PersonId, HashSet<usize>> = HashMap::new();
        for index in 0..tree.nodes.len() {
            let node = &tree.nodes[index];
            let Some(parent_coordinate) = node.coordinate.parent() else {
                tree.roots.push(index);
                continue;
            };
            let Some(&parent) = tree.by_coordinate.get(&parent_coordinate) else {
                return Err(TemplateError::structural(format!(
                    "node {} has no parent node {}",
                    node.coordinate, parent_coordinate
                )));
            };
            let parent_nodes = member_parents.entry(node.member_id).or_default();
            parent_nodes.insert(parent);
            if parent_nodes.len() > MAX_PARENT_NODES {
                return Err(TemplateError::structural(format!(
                    "member at {} descends from {} parent nodes; at most {} allowed",
                    node.coordinate,
                    parent_nodes.len(),
                    MAX_PARENT_NODES
                )));
            }
            tree.parents[index] = Some(parent);
            tree.children[parent].push(index);
        }

        for index in 0..tree.children.len() {
            let mut siblings = std::mem::take(&mut tree.children[index]);
            siblings.sort_by(|left, right| tree.compare_nodes(*left, *right));
            tree.children[index] = siblings;
        }

        info!(
            "event=tree_build module=family_tree status=ok family={} nodes={} roots={} people={}",
            tree.family_name,
            tree.nodes.len(),
            tree.roots.len(),
            tree.people.len()
        );
        Ok(tree)
    }

    pub fn family_name(&self) -> &FamilyName {
        &self.family_name
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, coordinate: &HierarchicalCoordinate) -> Option<&FamilyTreeNode> {
        self.by_coordinate
            .get(coordinate)
            .map(|index| &self.nodes[*index])
    }

    pub fn node(&self, id: NodeId) -> Option<&FamilyTreeNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn roots(&self) -> Vec<&FamilyTreeNode> {
        self.roots.iter().map(|index| &self.nodes[*index]).collect()
    }

    /// Children ordered by member, then by dynamic start date.
    pub fn children(&self, coordinate: &HierarchicalCoordinate) -> Vec<&FamilyTreeNode> {
        self.by_coordinate
            .get(coordinate)
            .map(|index| {
                self.children[*index]
                    .iter()
                    .map(|child| &self.nodes[*child])
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn parent(&self, coordinate: &HierarchicalCoordinate) -> Option<&FamilyTreeNode> {
        let index = self.by_coordinate.get(coordinate)?;
        self.parents[*index].map(|parent| &self.nodes[parent])
    }

    pub fn person(&self, id: PersonId) -> Option<&Person> {
        self.people.get(&id)
    }

    pub fn dynamic(&self, id: DynamicId) -> Option<&FamilyDynamic> {
        self.dynamics.get(&id)
    }

    /// Every node, parents before children, siblings in child order.
    pub fn pre_order(&self) -> Vec<&FamilyTreeNode> {
        let mut ordered = Vec::with_capacity(self.nodes.len());
        let mut stack = self.roots.iter().rev().copied().collect::<Vec<_>>();
        while let Some(index) = stack.pop() {
            debug!(
                "event=tree_visit module=family_tree status=ok coordinate={}",
                self.nodes[index].coordinate
            );
            ordered.push(&self.nodes[index]);
            stack.extend(self.children[index].iter().rev().copied());
        }
        ordered
    }

    fn compare_nodes(&self, left: usize, right: usize) -> Ordering {
        let left = &self.nodes[left];
        let right = &self.nodes[right];
        let member_order = match (self.person(left.member_id), self.person(right.member_id)) {
            (Some(a), Some(b)) => a.cmp(b),
            _ => Ordering::Equal,
        };
        member_order
            .then_with(|| {
                let a = self.dynamic(left.dynamic_id).map(|d| &d.start_date);
                let b = self.dynamic(right.dynamic_id).map(|d| &d.start_date);
                a.cmp(&b)
            })
            .then_with(|| left.coordinate.cmp(&right.coordinate))
    }
}

impl Display for FamilyTree {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Inherited Family Name: {}", self.family_name)?;
        for node in self.pre_order() {
            let indent = "  ".repeat(node.coordinate.depth().saturating_sub(1));
            write!(f, "\n{indent}[{}]", node.coordinate)?;
            if let Some(member) = self.person(node.member_id) {
                write!(f, " {member}")?;
            }
            if let Some(in_law) = node.in_law_id.and_then(|id| self.person(id)) {
                write!(f, " & {in_law}")?;
            }
        }
        Ok(())
    }
}
