// ABOUTME: Arena-backed XML element tree and borrowed node handles
// ABOUTME: Provides path lookup and traversal over a parsed nvidia-smi report

use core::fmt;

/// Index of a node inside an [`XmlDocument`] arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in the arena (document order)
    pub fn index(self) -> usize {
        self.0
    }
}

/// XML element stored in the arena
#[derive(Debug, Clone)]
pub(crate) struct XmlNode {
    /// Tag name
    pub name: String,
    /// Trimmed text content, `None` when empty
    pub text: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl XmlNode {
    fn new(name: String, parent: Option<NodeId>) -> Self {
        Self {
            name,
            text: None,
            parent,
            children: Vec::new(),
        }
    }
}

/// Immutable element tree; node 0 is the root element
#[derive(Debug, Clone)]
pub struct XmlDocument {
    nodes: Vec<XmlNode>,
}

impl XmlDocument {
    /// Parse XML text into a document
    pub fn parse(raw: &str) -> crate::smi::Result<Self> {
        super::parser::parse_document_iterative(raw)
    }

    /// Handle to the root element
    pub fn root(&self) -> NodeRef<'_> {
        NodeRef {
            doc: self,
            id: NodeId(0),
        }
    }

    /// Handle to an arbitrary node
    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_>> {
        (id.0 < self.nodes.len()).then_some(NodeRef { doc: self, id })
    }

    /// Total number of elements
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

/// Incremental arena construction used by the parser
#[derive(Debug, Default)]
pub(crate) struct DocumentBuilder {
    nodes: Vec<XmlNode>,
    open: Vec<(NodeId, String)>,
    closed_root: bool,
}

impl DocumentBuilder {
    /// Open an element; returns false if the document already has a complete root
    pub(crate) fn open(&mut self, name: String) -> bool {
        if self.closed_root {
            return false;
        }
        let parent = self.open.last().map(|(id, _)| *id);
        let id = NodeId(self.nodes.len());
        self.nodes.push(XmlNode::new(name, parent));
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        self.open.push((id, String::new()));
        true
    }

    /// Append character data to the innermost open element
    pub(crate) fn text(&mut self, text: &str) {
        if let Some((_, buf)) = self.open.last_mut() {
            buf.push_str(text);
        }
    }

    /// Close the innermost open element; returns false on a stray end tag
    pub(crate) fn close(&mut self) -> bool {
        let Some((id, buf)) = self.open.pop() else {
            return false;
        };
        let trimmed = buf.trim();
        if !trimmed.is_empty() {
            self.nodes[id.0].text = Some(trimmed.to_string());
        }
        if self.open.is_empty() {
            self.closed_root = true;
        }
        true
    }

    /// Name of the innermost unclosed element, if any
    pub(crate) fn unclosed(&self) -> Option<&str> {
        self.open
            .last()
            .map(|(id, _)| self.nodes[id.0].name.as_str())
    }

    pub(crate) fn finish(self) -> Option<XmlDocument> {
        (self.closed_root && self.open.is_empty()).then_some(XmlDocument { nodes: self.nodes })
    }
}

/// Borrowed handle to one element of an [`XmlDocument`]
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    doc: &'a XmlDocument,
    id: NodeId,
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("name", &self.name())
            .field("text", &self.text())
            .finish()
    }
}

impl<'a> NodeRef<'a> {
    fn node(self) -> &'a XmlNode {
        &self.doc.nodes[self.id.0]
    }

    /// Arena id of this node
    pub fn id(self) -> NodeId {
        self.id
    }

    /// Tag name
    pub fn name(self) -> &'a str {
        self.node().name.as_str()
    }

    /// Text content, `None` when absent or whitespace only
    pub fn text(self) -> Option<&'a str> {
        self.node().text.as_deref()
    }

    /// Parent element, `None` for the root
    pub fn parent(self) -> Option<NodeRef<'a>> {
        let doc = self.doc;
        self.node().parent.map(|id| NodeRef { doc, id })
    }

    /// Direct children in document order
    pub fn children(self) -> impl Iterator<Item = NodeRef<'a>> {
        let doc = self.doc;
        self.node()
            .children
            .iter()
            .map(move |&id| NodeRef { doc, id })
    }

    /// First direct child with the given tag
    pub fn find_child(self, name: &str) -> Option<NodeRef<'a>> {
        self.children().find(|c| c.name() == name)
    }

    /// All nodes matching a relative path (e.g. `./temperature/gpu_temp`)
    ///
    /// Each step expands every matching child of the previous step, so the
    /// result is in document order.
    pub fn find_all(self, path: &str) -> Vec<NodeRef<'a>> {
        let mut current = vec![self];
        for step in path_steps(path) {
            current = current
                .into_iter()
                .flat_map(|n| n.children().filter(move |c| c.name() == step))
                .collect();
            if current.is_empty() {
                break;
            }
        }
        current
    }

    /// First node matching a relative path
    pub fn find(self, path: &str) -> Option<NodeRef<'a>> {
        self.find_all(path).into_iter().next()
    }

    /// Depth-first iterator over this node and its descendants
    pub fn iter_nodes(self) -> NodeIterator<'a> {
        NodeIterator { stack: vec![self] }
    }
}

/// Split a field path into element names, dropping `.` and empty segments
fn path_steps(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty() && *s != ".")
}

/// Iterator for depth-first traversal of XML nodes
pub struct NodeIterator<'a> {
    stack: Vec<NodeRef<'a>>,
}

impl<'a> Iterator for NodeIterator<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        let doc = node.doc;
        // Reverse so the first child is visited next
        for &id in node.node().children.iter().rev() {
            self.stack.push(NodeRef { doc, id });
        }
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> XmlDocument {
        XmlDocument::parse(
            "<log><a><b>first</b></a><a><b>second</b><c/></a><d>  padded  </d></log>",
        )
        .unwrap()
    }

    #[test]
    fn test_root_and_children() {
        let doc = sample();
        let root = doc.root();
        assert_eq!(root.name(), "log");
        assert!(root.parent().is_none());

        let names: Vec<_> = root.children().map(|c| c.name()).collect();
        assert_eq!(names, ["a", "a", "d"]);
    }

    #[test]
    fn test_find_returns_first_in_document_order() {
        let doc = sample();
        let b = doc.root().find("./a/b").unwrap();
        assert_eq!(b.text(), Some("first"));
        assert_eq!(b.parent().unwrap().name(), "a");
    }

    #[test]
    fn test_find_skips_branches_without_match() {
        let doc = sample();
        // Only the second <a> has a <c>
        let c = doc.root().find("a/c").unwrap();
        assert_eq!(c.name(), "c");
        assert_eq!(c.text(), None);
    }

    #[test]
    fn test_find_all_collects_every_match() {
        let doc = sample();
        let texts: Vec<_> = doc
            .root()
            .find_all("./a/b")
            .into_iter()
            .filter_map(|n| n.text())
            .collect();
        assert_eq!(texts, ["first", "second"]);
    }

    #[test]
    fn test_find_missing_path() {
        let doc = sample();
        assert!(doc.root().find("./a/zzz").is_none());
        assert!(doc.root().find("./nope").is_none());
    }

    #[test]
    fn test_dot_path_is_self() {
        let doc = sample();
        assert_eq!(doc.root().find(".").unwrap().name(), "log");
    }

    #[test]
    fn test_text_is_trimmed() {
        let doc = sample();
        assert_eq!(doc.root().find("./d").unwrap().text(), Some("padded"));
    }

    #[test]
    fn test_node_iterator() {
        let doc = sample();
        let names: Vec<_> = doc.root().iter_nodes().map(|n| n.name()).collect();
        assert_eq!(names, ["log", "a", "b", "a", "b", "c", "d"]);
        assert_eq!(doc.node_count(), 7);
    }

    #[test]
    fn test_get_by_id() {
        let doc = sample();
        let d = doc.root().find("./d").unwrap();
        assert_eq!(doc.get(d.id()).unwrap().name(), "d");
        assert!(doc.get(NodeId(99)).is_none());
    }
}
