//! The field grouper.
//!
//! One left-to-right pass over the page's fields:
//!
//! 1. A field without `groupName` becomes a `Standalone` block.
//! 2. A field whose group already has a block joins that block.
//! 3. Otherwise a new `Grouped` block opens at the current position, using
//!    the page's descriptor for that name or a synthesized name-only one.
//!
//! A group therefore appears where its first member appears. The order of
//! `fieldGroups` in the schema has no effect on layout.

use std::borrow::Cow;
use std::collections::HashMap;

use tracing::debug;

use schemaform_contracts::schema::{FieldSpec, GroupSpec, PageSpec};

/// One unit of page layout.
#[derive(Debug, Clone, PartialEq)]
pub enum Block<'a> {
    Standalone(&'a FieldSpec),
    Grouped {
        /// Borrowed from the page, or owned when synthesized.
        group: Cow<'a, GroupSpec>,
        members: Vec<&'a FieldSpec>,
    },
}

impl<'a> Block<'a> {
    pub fn group(&self) -> Option<&GroupSpec> {
        match self {
            Block::Standalone(_) => None,
            Block::Grouped { group, .. } => Some(&**group),
        }
    }

    /// The fields in this block, in page order.
    pub fn fields(&self) -> Vec<&'a FieldSpec> {
        match self {
            Block::Standalone(field) => vec![*field],
            Block::Grouped { members, .. } => members.clone(),
        }
    }
}

/// Partition `fields` into blocks using `descriptors` for group metadata.
pub fn group<'a>(fields: &'a [FieldSpec], descriptors: &'a [GroupSpec]) -> Vec<Block<'a>> {
    let mut blocks: Vec<Block<'a>> = Vec::new();
    let mut open: HashMap<&'a str, usize> = HashMap::new();

    for field in fields {
        let Some(name) = field.group_name.as_deref() else {
            blocks.push(Block::Standalone(field));
            continue;
        };

        if let Some(&index) = open.get(name) {
            if let Block::Grouped { members, .. } = &mut blocks[index] {
                members.push(field);
            }
            continue;
        }

        let group = match descriptors.iter().find(|g| g.name == name) {
            Some(descriptor) => Cow::Borrowed(descriptor),
            None => {
                debug!(group = %name, field = %field.name, "synthesizing undeclared group");
                Cow::Owned(GroupSpec::named(name))
            }
        };
        open.insert(name, blocks.len());
        blocks.push(Block::Grouped {
            group,
            members: vec![field],
        });
    }

    blocks
}

/// Group a page's fields with the page's own descriptors.
pub fn page_layout(page: &PageSpec) -> Vec<Block<'_>> {
    group(&page.fields, &page.field_groups)
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use schemaform_contracts::schema::{FieldSpec, GroupSpec, PageSpec};

    use super::{group, page_layout, Block};

    fn names(block: &Block<'_>) -> Vec<String> {
        block.fields().iter().map(|f| f.name.clone()).collect()
    }

    #[test]
    fn ungrouped_fields_stay_standalone_in_order() {
        let fields = vec![FieldSpec::new("a"), FieldSpec::new("b")];
        let blocks = group(&fields, &[]);
        assert_eq!(blocks.len(), 2);
        assert!(matches!(blocks[0], Block::Standalone(f) if f.name == "a"));
        assert!(matches!(blocks[1], Block::Standalone(f) if f.name == "b"));
    }

    /// `[a(G2), b(G1), c(G2)]` → `[G2[a, c], G1[b]]`, whatever the
    /// declaration order of the groups.
    #[test]
    fn groups_follow_first_occurrence() {
        let fields = vec![
            FieldSpec::new("a").in_group("G2"),
            FieldSpec::new("b").in_group("G1"),
            FieldSpec::new("c").in_group("G2"),
        ];
        let descriptors = vec![GroupSpec::named("G1"), GroupSpec::named("G2")];

        let blocks = group(&fields, &descriptors);

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].group().unwrap().name, "G2");
        assert_eq!(names(&blocks[0]), vec!["a", "c"]);
        assert_eq!(blocks[1].group().unwrap().name, "G1");
        assert_eq!(names(&blocks[1]), vec!["b"]);
    }

    #[test]
    fn group_opens_at_first_member_between_standalone_fields() {
        let fields = vec![
            FieldSpec::new("intro"),
            FieldSpec::new("x").in_group("g"),
            FieldSpec::new("middle"),
            FieldSpec::new("y").in_group("g"),
        ];
        let blocks = group(&fields, &[]);

        assert_eq!(blocks.len(), 3);
        assert!(matches!(blocks[0], Block::Standalone(f) if f.name == "intro"));
        assert_eq!(names(&blocks[1]), vec!["x", "y"]);
        assert!(matches!(blocks[2], Block::Standalone(f) if f.name == "middle"));
    }

    #[test]
    fn declared_descriptor_is_borrowed() {
        let mut descriptor = GroupSpec::named("personal");
        descriptor.collapsible = true;
        let descriptors = vec![descriptor];
        let fields = vec![FieldSpec::new("name").in_group("personal")];

        let blocks = group(&fields, &descriptors);
        match &blocks[0] {
            Block::Grouped { group, .. } => {
                assert!(matches!(group, Cow::Borrowed(_)));
                assert!(group.collapsible);
            }
            other => panic!("expected a group block, got {:?}", other),
        }
    }

    #[test]
    fn undeclared_group_gets_name_only_descriptor() {
        let fields = vec![FieldSpec::new("x").in_group("extras")];
        let blocks = group(&fields, &[]);

        let g = blocks[0].group().unwrap();
        assert_eq!(g, &GroupSpec::named("extras"));
        assert!(g.title.is_none());
        assert_eq!(g.heading(), "extras");
    }

    #[test]
    fn unused_descriptors_produce_no_blocks() {
        let page = PageSpec {
            name: "p".into(),
            field_groups: vec![GroupSpec::named("empty")],
            fields: vec![FieldSpec::new("solo")],
            ..PageSpec::default()
        };
        let blocks = page_layout(&page);
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].group().is_none());
    }
}
