//! # Element Defaults
//!
//! Every element starts from a canonical shape. Containers that ship with
//! initial content get it here: columns are pre-filled with one group per
//! column and menus come with three links.

use crate::id_generator::IdGenerator;
use crate::node::{
    Button, Checkbox, Choice, Content, ElementKind, Group, Image, Menu, MenuLink, Node,
    NumberInput, RichContent, TextInput,
};
use crate::slots::{Columns, Rows, SlotArray};
use crate::width::Width;

pub const DEFAULT_COLUMN_COUNT: usize = 2;
pub const DEFAULT_ROW_COUNT: usize = 2;

/// Links a freshly created menu starts with
pub fn default_menu_links() -> Vec<MenuLink> {
    vec![
        MenuLink::new("Home", "/"),
        MenuLink::new("About", "/about"),
        MenuLink::new("Contact", "/contact"),
    ]
}

pub fn default_label(kind: ElementKind) -> &'static str {
    match kind {
        ElementKind::Text => "Text Field",
        ElementKind::Textarea => "Text Area",
        ElementKind::Email => "Email",
        ElementKind::Date => "Date",
        ElementKind::Number => "Number",
        ElementKind::Select => "Select",
        ElementKind::Radio => "Radio Group",
        ElementKind::Checkbox => "Checkbox",
        ElementKind::Button => "Button",
        ElementKind::Image => "Image",
        ElementKind::RichContent => "Content",
        ElementKind::Divider => "Divider",
        ElementKind::Group => "Group",
        ElementKind::Columns => "Columns",
        ElementKind::Rows => "Rows",
        ElementKind::Menu => "Menu",
    }
}

fn default_options() -> Vec<String> {
    (1..=3).map(|i| format!("Option {}", i)).collect()
}

/// Create a node of `kind` with its default payload and initial children
pub fn create_node(kind: ElementKind, ids: &mut IdGenerator) -> Node {
    let id = ids.new_id();

    let content = match kind {
        ElementKind::Text => Content::Text(TextInput::default()),
        ElementKind::Textarea => Content::Textarea(TextInput::default()),
        ElementKind::Email => Content::Email(TextInput::default()),
        ElementKind::Date => Content::Date(TextInput::default()),
        ElementKind::Number => Content::Number(NumberInput::default()),
        ElementKind::Select => Content::Select(Choice {
            options: default_options(),
            required: false,
        }),
        ElementKind::Radio => Content::Radio(Choice {
            options: default_options(),
            required: false,
        }),
        ElementKind::Checkbox => Content::Checkbox(Checkbox::default()),
        ElementKind::Button => Content::Button(Button::default()),
        ElementKind::Image => Content::Image(Image::default()),
        ElementKind::RichContent => Content::RichContent(RichContent::default()),
        ElementKind::Divider => Content::Divider,
        ElementKind::Group => Content::Group(Group::default()),
        ElementKind::Columns => {
            let mut columns = Columns {
                slots: SlotArray::empty(DEFAULT_COLUMN_COUNT),
            };
            let width = Width::for_columns(DEFAULT_COLUMN_COUNT);
            for index in 0..DEFAULT_COLUMN_COUNT {
                let mut group = create_node(ElementKind::Group, ids);
                group.width = width;
                if let Some(slot) = columns.slots.slot_mut(index) {
                    *slot = Some(group);
                }
            }
            Content::Columns(columns)
        }
        ElementKind::Rows => Content::Rows(Rows {
            slots: SlotArray::empty(DEFAULT_ROW_COUNT),
        }),
        ElementKind::Menu => {
            let children = buttons_from_links(&default_menu_links(), ids);
            Content::Menu(Menu::with_children(children))
        }
    };

    Node::new(id, default_label(kind), content)
}

/// Fresh full-width button leaves, one per link
pub fn buttons_from_links(links: &[MenuLink], ids: &mut IdGenerator) -> Vec<Node> {
    links
        .iter()
        .map(|link| {
            Node::new(
                ids.new_id(),
                link.label.clone(),
                Content::Button(Button {
                    href: link.href.clone(),
                }),
            )
        })
        .collect()
}
