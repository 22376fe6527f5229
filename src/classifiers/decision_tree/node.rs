//! Defines the inner representation
//! of the Decision Tree class.
use serde::{Serialize, Deserialize};

use crate::Sample;
use crate::common::utils;


/// The output of the function `split` of `Splitter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum LR {
    Left,
    Right,
}


/// A rule `x[feature] <= threshold`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(super) struct Splitter {
    pub(super) feature: usize,
    pub(super) name: String,
    pub(super) threshold: f64,
}


impl Splitter {
    /// Defines the splitting.
    #[inline]
    pub(super) fn split(&self, sample: &Sample, row: usize) -> LR {
        if sample.value(row, self.feature) <= self.threshold {
            LR::Left
        } else {
            LR::Right
        }
    }
}


/// Enumeration of `BranchNode` and `LeafNode`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(super) enum Node {
    /// A node that have two childrens.
    Branch(BranchNode),


    /// A node that have no child.
    Leaf(LeafNode),
}


/// Represents the branch nodes of decision tree.
/// Each `BranchNode` must have two childrens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(super) struct BranchNode {
    pub(super) rule: Splitter,
    pub(super) left: Box<Node>,
    pub(super) right: Box<Node>,
}


/// Represents the leaf nodes of decision tree.
/// A leaf keeps the class frequencies of the training examples
/// that reached it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(super) struct LeafNode {
    pub(super) proba: Vec<f64>,
    pub(super) label: usize,
}


impl LeafNode {
    /// Returns a `LeafNode` from the class counts.
    #[inline]
    pub(super) fn from_counts(counts: &[usize]) -> Self {
        let mut proba = counts.iter()
            .map(|&c| c as f64)
            .collect::<Vec<_>>();
        utils::normalize(&mut proba);
        let label = utils::argmax(&proba);
        Self { proba, label }
    }
}


impl Node {
    /// Returns the leaf that `row` of `sample` falls into.
    #[inline]
    pub(super) fn leaf(&self, sample: &Sample, row: usize) -> &LeafNode {
        match self {
            Node::Branch(b) => match b.rule.split(sample, row) {
                LR::Left => b.left.leaf(sample, row),
                LR::Right => b.right.leaf(sample, row),
            },
            Node::Leaf(l) => l,
        }
    }


    /// Returns the depth of the subtree rooted at this node.
    pub(super) fn depth(&self) -> usize {
        match self {
            Node::Branch(b) => 1 + b.left.depth().max(b.right.depth()),
            Node::Leaf(_) => 0,
        }
    }


    pub(super) fn to_dot_info(&self, id: usize) -> (Vec<String>, usize) {
        match self {
            Node::Branch(b) => {
                let b_info = format!(
                    "\tnode_{id} [ label = \"{feat} <= {thr:.2} ?\" ];\n",
                    feat = b.rule.name,
                    thr = b.rule.threshold
                );

                let (l_info, next_id) = b.left.to_dot_info(id + 1);
                let (mut r_info, ret_id) = b.right.to_dot_info(next_id);

                let mut info = l_info;
                info.push(b_info);
                info.append(&mut r_info);

                let l_edge = format!(
                    "\tnode_{id} -- node_{l_id} [ label = \"Yes\" ];\n",
                    l_id = id + 1
                );
                let r_edge = format!(
                    "\tnode_{id} -- node_{r_id} [ label = \"No\" ];\n",
                    r_id = next_id
                );

                info.push(l_edge);
                info.push(r_edge);

                (info, ret_id)
            },
            Node::Leaf(l) => {
                let proba = l.proba.iter()
                    .map(|p| format!("{p:.2}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                let info = format!(
                    "\tnode_{id} [ \
                     label = \"class {label} [{proba}]\", \
                     shape = box, \
                     ];\n",
                    label = l.label,
                );

                (vec![info], id + 1)
            }
        }
    }
}
