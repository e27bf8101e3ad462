use std::fmt;

/// Operator tags a node can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Constant,
    Add,
    Sub,
    Mul,
    Div,
    Sin,
    Cos,
}

impl Operator {
    /// Number of children a node with this operator owns
    pub fn arity(self) -> usize {
        match self {
            Operator::Constant => 0,
            Operator::Sin | Operator::Cos => 1,
            Operator::Add | Operator::Sub | Operator::Mul | Operator::Div => 2,
        }
    }

    /// Higher value binds more loosely
    pub fn precedence(self) -> u8 {
        match self {
            Operator::Constant | Operator::Sin | Operator::Cos | Operator::Div => 0,
            Operator::Mul => 1,
            Operator::Add | Operator::Sub => 2,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Operator::Constant => write!(f, "const"),
            Operator::Add => write!(f, "+"),
            Operator::Sub => write!(f, "-"),
            Operator::Mul => write!(f, "\\times"),
            Operator::Div => write!(f, "frac"),
            Operator::Sin => write!(f, "sin"),
            Operator::Cos => write!(f, "cos"),
        }
    }
}

/// Contents of a node. `Constant(None)` is a leaf that has not been assigned a value yet.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Constant(Option<f64>),
    Add(Box<Node>, Box<Node>),
    Sub(Box<Node>, Box<Node>),
    Mul(Box<Node>, Box<Node>),
    Div(Box<Node>, Box<Node>), // Div(numerator, denominator)
    Sin(Box<Node>),
    Cos(Box<Node>),
}

/// A node of an equation tree. The root sits at depth 1.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub(crate) depth: u32,
    pub(crate) kind: NodeKind,
}

impl Node {
    /// An unassigned constant leaf
    pub fn new(depth: u32) -> Self {
        Self {
            depth,
            kind: NodeKind::Constant(None),
        }
    }

    pub fn constant(depth: u32, value: f64) -> Self {
        Self {
            depth,
            kind: NodeKind::Constant(Some(value)),
        }
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn operator(&self) -> Operator {
        match self.kind {
            NodeKind::Constant(_) => Operator::Constant,
            NodeKind::Add(_, _) => Operator::Add,
            NodeKind::Sub(_, _) => Operator::Sub,
            NodeKind::Mul(_, _) => Operator::Mul,
            NodeKind::Div(_, _) => Operator::Div,
            NodeKind::Sin(_) => Operator::Sin,
            NodeKind::Cos(_) => Operator::Cos,
        }
    }

    /// The assigned value of a constant node
    pub fn value(&self) -> Option<f64> {
        match self.kind {
            NodeKind::Constant(value) => value,
            _ => None,
        }
    }

    pub fn is_constant(&self) -> bool {
        matches!(self.kind, NodeKind::Constant(_))
    }

    /// Direct children, left to right
    pub fn children(&self) -> Vec<&Node> {
        match &self.kind {
            NodeKind::Constant(_) => Vec::new(),
            NodeKind::Add(l, r)
            | NodeKind::Sub(l, r)
            | NodeKind::Mul(l, r)
            | NodeKind::Div(l, r) => vec![l.as_ref(), r.as_ref()],
            NodeKind::Sin(a) | NodeKind::Cos(a) => vec![a.as_ref()],
        }
    }

    /// Pre-order traversal of this node and all of its descendants
    pub fn iter(&self) -> NodeIter<'_> {
        NodeIter { stack: vec![self] }
    }

    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    /// Deepest depth reached by any node in this subtree
    pub fn max_depth(&self) -> u32 {
        self.iter().map(Node::depth).max().unwrap_or(self.depth)
    }

    /// Replace this node with an assigned constant, dropping any children
    pub(crate) fn assign(&mut self, value: f64) {
        self.kind = NodeKind::Constant(Some(value));
    }

    /// Rewrite depths top-down starting from `depth`
    pub(crate) fn set_depths(&mut self, depth: u32) {
        self.depth = depth;
        match &mut self.kind {
            NodeKind::Constant(_) => {}
            NodeKind::Add(l, r)
            | NodeKind::Sub(l, r)
            | NodeKind::Mul(l, r)
            | NodeKind::Div(l, r) => {
                l.set_depths(depth + 1);
                r.set_depths(depth + 1);
            }
            NodeKind::Sin(a) | NodeKind::Cos(a) => a.set_depths(depth + 1),
        }
    }
}

/// Iterator returned by [`Node::iter`]
pub struct NodeIter<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for NodeIter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().into_iter().rev());
        Some(node)
    }
}
