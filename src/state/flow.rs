//! Conversation flow tree
//!
//! A flow is a named stage of a conversation. Flows nest: `PICK_RECIPES`
//! may contain `DINNER`, whose full upstream name is then
//! `PICK_RECIPES.DINNER`. Parents own their sub-flows; the link back to the
//! parent is weak so a tree never keeps itself alive.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::utils::logging;
use super::token::SEPARATOR;

/// Operations every flow node offers
pub trait FlowNode {
    fn name(&self) -> String;

    /// Rename the node; returns `false` when the name is rejected
    fn set_name(&self, name: &str) -> bool;

    /// Dot-joined names from the topmost named ancestor down to this node
    fn full_upstream_name(&self) -> String;

    fn has_sub_flow(&self) -> bool;

    /// Attach `child` below this node; returns `false` when rejected
    fn add_sub_flow(&self, child: &Flow) -> bool;

    fn sub_flows(&self) -> Vec<Flow>;
}

#[derive(Default)]
struct FlowData {
    name: String,
    sub_flows: Vec<Flow>,
    parent: Weak<RefCell<FlowData>>,
}

/// Shared handle to a flow node.
///
/// Cloning the handle does not copy the node; use [`Flow::ptr_eq`] to check
/// whether two handles point at the same flow.
#[derive(Clone, Default)]
pub struct Flow {
    inner: Rc<RefCell<FlowData>>,
}

impl Flow {
    /// Create a detached flow. The name is stored as given.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(FlowData {
                name: name.into(),
                ..FlowData::default()
            })),
        }
    }

    /// Create an unnamed flow, used as the root of a tree
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a chain of flows from a dotted string.
    ///
    /// The returned root has an empty name; each non-blank part becomes the
    /// only sub-flow of the previous one. Blank parts are skipped.
    pub fn parse(dotted: &str) -> Self {
        let root = Flow::root();
        let mut tail = root.clone();
        for part in dotted.split(SEPARATOR) {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let child = Flow::new(part);
            tail.add_sub_flow(&child);
            tail = child;
        }
        root
    }

    pub fn parent_flow(&self) -> Option<Flow> {
        self.inner.borrow().parent.upgrade().map(|inner| Flow { inner })
    }

    /// Sub-flow at `index`, in insertion order
    pub fn sub_flow(&self, index: usize) -> Option<Flow> {
        self.inner.borrow().sub_flows.get(index).cloned()
    }

    pub fn ptr_eq(&self, other: &Flow) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// True when `target` is this flow or sits anywhere below it.
    ///
    /// Walks `sub_flows` rather than parent links: a re-parented flow is
    /// still listed under its old parent, which its parent link no longer
    /// reaches.
    fn contains_flow(&self, target: &Flow) -> bool {
        let mut pending = vec![self.clone()];
        while let Some(flow) = pending.pop() {
            if flow.ptr_eq(target) {
                return true;
            }
            pending.extend(flow.sub_flows());
        }
        false
    }
}

impl FlowNode for Flow {
    fn name(&self) -> String {
        self.inner.borrow().name.clone()
    }

    fn set_name(&self, name: &str) -> bool {
        if name.contains(SEPARATOR) {
            logging::log_flow_rejected("set_name", name, "name contains a separator");
            return false;
        }
        if name.trim().is_empty() {
            logging::log_flow_rejected("set_name", name, "name is blank");
            return false;
        }
        self.inner.borrow_mut().name = name.to_string();
        true
    }

    fn full_upstream_name(&self) -> String {
        let mut names = vec![self.name()];
        let mut ancestor = self.parent_flow();
        while let Some(flow) = ancestor {
            let name = flow.name();
            if !name.trim().is_empty() {
                names.push(name);
            }
            ancestor = flow.parent_flow();
        }
        names.reverse();
        names.join(".")
    }

    fn has_sub_flow(&self) -> bool {
        !self.inner.borrow().sub_flows.is_empty()
    }

    fn add_sub_flow(&self, child: &Flow) -> bool {
        let name = child.name();
        if name.trim().is_empty() {
            logging::log_flow_rejected("add_sub_flow", &name, "name is blank");
            return false;
        }
        if child.contains_flow(self) {
            logging::log_flow_rejected("add_sub_flow", &name, "flow would contain itself");
            return false;
        }

        self.inner.borrow_mut().sub_flows.push(child.clone());
        child.inner.borrow_mut().parent = Rc::downgrade(&self.inner);
        true
    }

    fn sub_flows(&self) -> Vec<Flow> {
        self.inner.borrow().sub_flows.clone()
    }
}

impl fmt::Debug for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.inner.borrow();
        f.debug_struct("Flow")
            .field("name", &data.name)
            .field("sub_flows", &data.sub_flows)
            .finish()
    }
}

/// Whether a dynamically typed host value is a flow
pub fn is_flow(value: &dyn Any) -> bool {
    value.is::<Flow>()
}
