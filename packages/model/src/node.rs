use crate::slots::{Columns, Rows, SlotArray};
use crate::width::Width;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable node identifier, never reused once issued
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Element node (document tree)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub width: Width,
    #[serde(flatten)]
    pub content: Content,
}

/// Per-kind payload. Leaves carry their own fields, containers carry children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Content {
    Text(TextInput),
    Textarea(TextInput),
    Email(TextInput),
    Date(TextInput),
    Number(NumberInput),
    Select(Choice),
    Radio(Choice),
    Checkbox(Checkbox),
    Button(Button),
    Image(Image),
    RichContent(RichContent),
    Divider,

    /// Free container
    Group(Group),
    /// Slot grid
    Columns(Columns),
    /// Slot stack
    Rows(Rows),
    /// Flex list with mirrored links
    Menu(Menu),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextInput {
    pub placeholder: String,
    pub required: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NumberInput {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub required: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Choice {
    pub options: Vec<String>,
    pub required: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Checkbox {
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Button {
    pub href: String,
}

impl Default for Button {
    fn default() -> Self {
        Self {
            href: "#".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Image {
    pub src: String,
    pub alt: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RichContent {
    pub html: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Group {
    pub children: Vec<Node>,
}

/// Summary of a button child, kept in `Menu::mirror`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuLink {
    pub label: String,
    pub href: String,
}

impl MenuLink {
    pub fn new(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: href.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Menu {
    pub children: Vec<Node>,
    mirror: Vec<MenuLink>,
}

impl Menu {
    /// Build a menu whose mirror already matches `children`
    pub fn with_children(children: Vec<Node>) -> Self {
        let mirror = Self::project(&children);
        Self { children, mirror }
    }

    pub fn mirror(&self) -> &[MenuLink] {
        &self.mirror
    }

    /// Button children projected to links, in order
    pub fn project(children: &[Node]) -> Vec<MenuLink> {
        children.iter().filter_map(Node::menu_link).collect()
    }

    pub fn mirror_in_sync(&self) -> bool {
        self.mirror == Self::project(&self.children)
    }

    /// Recompute the mirror; returns whether it changed
    pub fn sync_mirror(&mut self) -> bool {
        let projected = Self::project(&self.children);
        if projected == self.mirror {
            false
        } else {
            self.mirror = projected;
            true
        }
    }
}

/// Container taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContainerKind {
    /// Dense list, any length
    Free,
    /// Fixed column count, one entry per column
    SlotGrid,
    /// Fixed row count, one entry per row
    SlotStack,
    /// Dense list with a mirrored summary
    FlexList,
}

impl ContainerKind {
    pub fn is_slotted(self) -> bool {
        matches!(self, ContainerKind::SlotGrid | ContainerKind::SlotStack)
    }
}

/// Closed set of element kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementKind {
    Text,
    Textarea,
    Email,
    Date,
    Number,
    Select,
    Radio,
    Checkbox,
    Button,
    Image,
    RichContent,
    Divider,
    Group,
    Columns,
    Rows,
    Menu,
}

impl ElementKind {
    pub const ALL: [ElementKind; 16] = [
        ElementKind::Text,
        ElementKind::Textarea,
        ElementKind::Email,
        ElementKind::Date,
        ElementKind::Number,
        ElementKind::Select,
        ElementKind::Radio,
        ElementKind::Checkbox,
        ElementKind::Button,
        ElementKind::Image,
        ElementKind::RichContent,
        ElementKind::Divider,
        ElementKind::Group,
        ElementKind::Columns,
        ElementKind::Rows,
        ElementKind::Menu,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ElementKind::Text => "text",
            ElementKind::Textarea => "textarea",
            ElementKind::Email => "email",
            ElementKind::Date => "date",
            ElementKind::Number => "number",
            ElementKind::Select => "select",
            ElementKind::Radio => "radio",
            ElementKind::Checkbox => "checkbox",
            ElementKind::Button => "button",
            ElementKind::Image => "image",
            ElementKind::RichContent => "rich-content",
            ElementKind::Divider => "divider",
            ElementKind::Group => "group",
            ElementKind::Columns => "columns",
            ElementKind::Rows => "rows",
            ElementKind::Menu => "menu",
        }
    }

    pub fn container_kind(self) -> Option<ContainerKind> {
        match self {
            ElementKind::Group => Some(ContainerKind::Free),
            ElementKind::Columns => Some(ContainerKind::SlotGrid),
            ElementKind::Rows => Some(ContainerKind::SlotStack),
            ElementKind::Menu => Some(ContainerKind::FlexList),
            _ => None,
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only view of a container's children list
#[derive(Debug, Clone, Copy)]
pub enum ChildList<'a> {
    Dense(&'a [Node]),
    Slots(&'a SlotArray),
}

impl<'a> ChildList<'a> {
    pub fn position(&self, id: &NodeId) -> Option<usize> {
        match self {
            ChildList::Dense(children) => children.iter().position(|c| &c.id == id),
            ChildList::Slots(slots) => slots.position(id),
        }
    }

    /// Number of entries, holes included
    pub fn len(&self) -> usize {
        match self {
            ChildList::Dense(children) => children.len(),
            ChildList::Slots(slots) => slots.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Mutable view of a container's children list
#[derive(Debug)]
pub enum ChildListMut<'a> {
    Dense(&'a mut Vec<Node>),
    Slots(&'a mut SlotArray),
}

impl Content {
    pub fn kind(&self) -> ElementKind {
        match self {
            Content::Text(_) => ElementKind::Text,
            Content::Textarea(_) => ElementKind::Textarea,
            Content::Email(_) => ElementKind::Email,
            Content::Date(_) => ElementKind::Date,
            Content::Number(_) => ElementKind::Number,
            Content::Select(_) => ElementKind::Select,
            Content::Radio(_) => ElementKind::Radio,
            Content::Checkbox(_) => ElementKind::Checkbox,
            Content::Button(_) => ElementKind::Button,
            Content::Image(_) => ElementKind::Image,
            Content::RichContent(_) => ElementKind::RichContent,
            Content::Divider => ElementKind::Divider,
            Content::Group(_) => ElementKind::Group,
            Content::Columns(_) => ElementKind::Columns,
            Content::Rows(_) => ElementKind::Rows,
            Content::Menu(_) => ElementKind::Menu,
        }
    }

    pub fn container_kind(&self) -> Option<ContainerKind> {
        self.kind().container_kind()
    }

    /// Width a node takes when attached directly under this container
    pub fn child_width(&self) -> Width {
        match self {
            Content::Columns(columns) => Width::for_columns(columns.column_count()),
            _ => Width::FULL,
        }
    }

    pub fn child_list(&self) -> Option<ChildList<'_>> {
        match self {
            Content::Group(group) => Some(ChildList::Dense(&group.children)),
            Content::Menu(menu) => Some(ChildList::Dense(&menu.children)),
            Content::Columns(columns) => Some(ChildList::Slots(&columns.slots)),
            Content::Rows(rows) => Some(ChildList::Slots(&rows.slots)),
            _ => None,
        }
    }

    pub fn child_list_mut(&mut self) -> Option<ChildListMut<'_>> {
        match self {
            Content::Group(group) => Some(ChildListMut::Dense(&mut group.children)),
            Content::Menu(menu) => Some(ChildListMut::Dense(&mut menu.children)),
            Content::Columns(columns) => Some(ChildListMut::Slots(&mut columns.slots)),
            Content::Rows(rows) => Some(ChildListMut::Slots(&mut rows.slots)),
            _ => None,
        }
    }

    /// Child nodes in order, holes skipped
    pub fn children(&self) -> Box<dyn Iterator<Item = &Node> + '_> {
        match self.child_list() {
            Some(ChildList::Dense(children)) => Box::new(children.iter()),
            Some(ChildList::Slots(slots)) => Box::new(slots.nodes()),
            None => Box::new(std::iter::empty()),
        }
    }

    pub fn children_mut(&mut self) -> Box<dyn Iterator<Item = &mut Node> + '_> {
        match self.child_list_mut() {
            Some(ChildListMut::Dense(children)) => Box::new(children.iter_mut()),
            Some(ChildListMut::Slots(slots)) => Box::new(slots.nodes_mut()),
            None => Box::new(std::iter::empty()),
        }
    }
}

impl Node {
    pub fn new(id: NodeId, label: impl Into<String>, content: Content) -> Self {
        Self {
            id,
            label: label.into(),
            width: Width::FULL,
            content,
        }
    }

    pub fn kind(&self) -> ElementKind {
        self.content.kind()
    }

    pub fn is_container(&self) -> bool {
        self.content.container_kind().is_some()
    }

    /// Link summary for button nodes
    pub fn menu_link(&self) -> Option<MenuLink> {
        match &self.content {
            Content::Button(button) => Some(MenuLink::new(self.label.clone(), button.href.clone())),
            _ => None,
        }
    }

    pub fn children(&self) -> Box<dyn Iterator<Item = &Node> + '_> {
        self.content.children()
    }

    pub fn children_mut(&mut self) -> Box<dyn Iterator<Item = &mut Node> + '_> {
        self.content.children_mut()
    }

    /// Number of nodes in this subtree, including this one
    pub fn size(&self) -> usize {
        1 + self.children().map(Node::size).sum::<usize>()
    }

    /// Visit this node and every descendant in pre-order
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }

    /// Every id in this subtree, pre-order
    pub fn ids(&self) -> Vec<NodeId> {
        let mut ids = Vec::new();
        self.walk(&mut |node| ids.push(node.id.clone()));
        ids
    }
}
