//! Raw event classification.
//!
//! [`classify`] walks the [`TAXONOMY`](crate::taxonomy::TAXONOMY) tree using
//! the raw event's string discriminators and stops at the first leaf. It is
//! total: anything that falls off the tree lands on [`LeafTag::Unhandled`],
//! and the [`Classification`] records where and why.

use ember_core::RawEvent;
use tracing::{debug, trace};

use crate::taxonomy::{Branch, LeafTag, TAXONOMY};

/// One discriminator that matched on the way down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discriminant {
    /// The field that was read.
    pub field: &'static str,
    /// The value it held.
    pub value: String,
}

/// The discriminator that stopped classification early.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationMiss {
    /// The field that was read.
    pub field: &'static str,
    /// The offending value rendered as JSON text, or `None` if the field was absent.
    pub value: Option<String>,
}

/// The result of classifying one raw event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// The selected leaf.
    pub leaf: LeafTag,
    /// Discriminators walked, outermost first.
    pub path: Vec<Discriminant>,
    /// Set when a discriminator was missing or unrecognized.
    pub miss: Option<ClassificationMiss>,
}

impl Classification {
    /// Returns `true` if no typed leaf was selected.
    pub fn is_unhandled(&self) -> bool {
        self.leaf.is_unhandled()
    }

    /// Renders the walked path as `field=value` pairs joined by `/`.
    pub fn path_string(&self) -> String {
        self.path
            .iter()
            .map(|d| format!("{}={}", d.field, d.value))
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Maps a raw event onto a taxonomy leaf.
pub fn classify(raw: &RawEvent) -> Classification {
    let mut node = &TAXONOMY;
    let mut path = Vec::new();

    loop {
        let Some(value) = raw.discriminator(node.field) else {
            let value = raw.get(node.field).map(ToString::to_string);
            return miss(path, node.field, value);
        };
        let Some(branch) = node.arm(value) else {
            return miss(path, node.field, Some(value.to_owned()));
        };
        path.push(Discriminant {
            field: node.field,
            value: value.to_owned(),
        });

        let leaf = match branch {
            Branch::Leaf(leaf) => *leaf,
            Branch::Descend(next) => {
                node = *next;
                continue;
            }
            Branch::SplitPositive {
                field,
                positive,
                otherwise,
            } => {
                let number = raw.integer(field).unwrap_or(0);
                path.push(Discriminant {
                    field: *field,
                    value: number.to_string(),
                });
                if number > 0 { *positive } else { *otherwise }
            }
        };

        trace!(%leaf, "Classified event");
        return Classification {
            leaf,
            path,
            miss: None,
        };
    }
}

fn miss(path: Vec<Discriminant>, field: &'static str, value: Option<String>) -> Classification {
    debug!(
        field,
        value = value.as_deref().unwrap_or("<absent>"),
        "Event matched no known shape, leaving it unhandled"
    );
    Classification {
        leaf: LeafTag::Unhandled,
        path,
        miss: Some(ClassificationMiss { field, value }),
    }
}
