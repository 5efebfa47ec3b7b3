//! The schema document: pages, field groups, and fields.
//!
//! Everything here is loaded once and treated as immutable for the rest of
//! the form session. Keys follow the camelCase shape of the JSON schema
//! documents the form is authored in.

use serde::{Deserialize, Serialize};

use crate::{
    dependency::Dependency,
    rules::RuleSet,
    value::{FieldPrimitive, FieldValueMap},
};

/// Root of a schema document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<TextContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_text: Option<TextContent>,
    #[serde(default)]
    pub pages: Vec<PageSpec>,
}

impl Schema {
    /// Every field on every page, in page order then declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.pages.iter().flat_map(|p| p.fields.iter())
    }

    /// Look a field up by name anywhere in the schema.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields().find(|f| f.name == name)
    }

    /// A value map seeded from each field's `defaultValue`.
    ///
    /// Fields without a default are left absent.
    pub fn initial_values(&self) -> FieldValueMap {
        self.fields()
            .filter_map(|f| f.default_value.clone().map(|v| (f.name.clone(), v)))
            .collect()
    }
}

/// One page of the form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSpec {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<TextContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_text: Option<TextContent>,
    /// Group descriptors. Declaration order does not affect layout order.
    #[serde(default, alias = "fieldGroup")]
    pub field_groups: Vec<GroupSpec>,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
    #[serde(default = "GapSize::page_default")]
    pub gap_size: GapSize,
}

/// A named visual/logical grouping of fields on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSpec {
    pub name: String,
    #[serde(default, alias = "label", skip_serializing_if = "Option::is_none")]
    pub title: Option<TextContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_text: Option<TextContent>,
    #[serde(default, rename = "collapsable", alias = "collapsible")]
    pub collapsible: bool,
    /// Only meaningful when `collapsible` is set.
    #[serde(default)]
    pub start_collapsed: bool,
    #[serde(default)]
    pub gap_size: GapSize,
}

impl GroupSpec {
    /// A bare descriptor carrying only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: None,
            sub_text: None,
            collapsible: false,
            start_collapsed: false,
            gap_size: GapSize::default(),
        }
    }

    /// The heading a renderer should show: the title, else the name.
    pub fn heading(&self) -> &str {
        self.title
            .as_ref()
            .and_then(TextContent::as_plain)
            .unwrap_or(&self.name)
    }
}

/// Spacing between the children of a page or group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GapSize {
    #[default]
    Tight,
    Half,
    Normal,
    Wide,
}

impl GapSize {
    fn page_default() -> Self {
        GapSize::Normal
    }
}

/// Display text: either a plain string or a rich block whose `text` is the
/// plain content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextContent {
    Plain(String),
    Rich(RichText),
}

impl TextContent {
    pub fn as_plain(&self) -> Option<&str> {
        match self {
            TextContent::Plain(s) => Some(s),
            TextContent::Rich(r) => r.text.as_deref(),
        }
    }
}

impl From<&str> for TextContent {
    fn from(s: &str) -> Self {
        TextContent::Plain(s.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RichText {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
}

/// One form field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    /// Unique within the schema.
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: FieldKind,

    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_error_text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<FieldPrimitive>,

    /// Static options for select-family fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    /// Remote source for the option list. Fetching is the caller's job.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options_url: Option<String>,

    #[serde(
        default,
        rename = "validationConditions",
        alias = "conditions",
        skip_serializing_if = "Option::is_none"
    )]
    pub conditions: Option<RuleSet>,
    /// All entries must hold for the field to be active.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<Dependency>,

    /// Weak reference to a `GroupSpec` on the same page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<TextContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_text: Option<TextContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub no_label: bool,
    #[serde(default)]
    pub disabled: bool,
}

impl FieldSpec {
    /// A text field with nothing but a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self::of_kind(name, FieldKind::ShortText)
    }

    pub fn of_kind(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            required_error_text: None,
            default_value: None,
            options: Vec::new(),
            options_url: None,
            conditions: None,
            dependencies: Vec::new(),
            group_name: None,
            label: None,
            title: None,
            sub_text: None,
            description: None,
            placeholder: None,
            no_label: false,
            disabled: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_conditions(mut self, conditions: RuleSet) -> Self {
        self.conditions = Some(conditions);
        self
    }

    pub fn depends_on(mut self, dependency: Dependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.group_name = Some(group.into());
        self
    }

    /// False when the schema disables the field or its type is unknown.
    /// Validation skips fields that are not enabled.
    pub fn is_enabled(&self) -> bool {
        !self.disabled && self.kind.is_supported()
    }

    /// The label a renderer should show, falling back to the name.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

/// A label/value pair for select-family fields.
///
/// The schema may list options as bare strings, which become options whose
/// label equals their value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "OptionRepr")]
pub struct SelectOption {
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Extra search terms for autofill inputs.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

impl SelectOption {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: None,
            aliases: Vec::new(),
        }
    }

    pub fn labeled(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: Some(label.into()),
            aliases: Vec::new(),
        }
    }

    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.value)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OptionRepr {
    Bare(String),
    Full {
        value: String,
        #[serde(default)]
        label: Option<String>,
        #[serde(default)]
        aliases: Vec<String>,
    },
}

impl From<OptionRepr> for SelectOption {
    fn from(repr: OptionRepr) -> Self {
        match repr {
            OptionRepr::Bare(value) => SelectOption::new(value),
            OptionRepr::Full {
                value,
                label,
                aliases,
            } => SelectOption {
                value,
                label,
                aliases,
            },
        }
    }
}

/// The field's type tag.
///
/// Unknown tags are preserved as `Unsupported` so a single bad field
/// degrades to disabled instead of failing the whole document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldKind {
    #[default]
    ShortText,
    LongText,
    Number,
    Checkbox,
    MultiCheckbox,
    Select,
    Radio,
    Autofill,
    Unsupported(String),
}

impl FieldKind {
    pub fn tag(&self) -> &str {
        match self {
            FieldKind::ShortText => "text",
            FieldKind::LongText => "comment",
            FieldKind::Number => "number",
            FieldKind::Checkbox => "checkbox",
            FieldKind::MultiCheckbox => "multiCheckbox",
            FieldKind::Select => "select",
            FieldKind::Radio => "radio",
            FieldKind::Autofill => "autofill",
            FieldKind::Unsupported(tag) => tag,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, FieldKind::Unsupported(_))
    }

    /// Select-family kinds draw their values from an option list.
    pub fn uses_options(&self) -> bool {
        matches!(
            self,
            FieldKind::MultiCheckbox | FieldKind::Select | FieldKind::Radio | FieldKind::Autofill
        )
    }

    /// What a renderer needs to know to draw an input for this kind.
    pub fn describe_input(&self) -> InputDescriptor {
        let (control, value_shape) = match self {
            FieldKind::ShortText => (InputControl::TextInput, ValueShape::Text),
            FieldKind::LongText => (InputControl::TextInput, ValueShape::Text),
            FieldKind::Number => (InputControl::NumberInput, ValueShape::Number),
            FieldKind::Checkbox => (InputControl::Checkbox, ValueShape::Bool),
            FieldKind::MultiCheckbox => (InputControl::CheckboxGroup, ValueShape::List),
            FieldKind::Select => (InputControl::Dropdown, ValueShape::Text),
            FieldKind::Radio => (InputControl::RadioGroup, ValueShape::Text),
            FieldKind::Autofill => (InputControl::Autocomplete, ValueShape::Text),
            FieldKind::Unsupported(_) => (InputControl::Unsupported, ValueShape::Text),
        };
        InputDescriptor {
            control,
            value_shape,
            multiline_rows: matches!(self, FieldKind::LongText).then_some(4),
            needs_options: self.uses_options(),
        }
    }
}

impl From<String> for FieldKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "text" => FieldKind::ShortText,
            "comment" => FieldKind::LongText,
            "number" => FieldKind::Number,
            "checkbox" | "boolean" => FieldKind::Checkbox,
            "multiCheckbox" => FieldKind::MultiCheckbox,
            "select" => FieldKind::Select,
            "radio" => FieldKind::Radio,
            "autofill" => FieldKind::Autofill,
            _ => FieldKind::Unsupported(tag),
        }
    }
}

impl From<FieldKind> for String {
    fn from(kind: FieldKind) -> Self {
        kind.tag().to_string()
    }
}

/// Rendering hints for one field kind. The validation core never reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputDescriptor {
    pub control: InputControl,
    pub value_shape: ValueShape,
    pub multiline_rows: Option<u8>,
    pub needs_options: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputControl {
    TextInput,
    NumberInput,
    Checkbox,
    CheckboxGroup,
    Dropdown,
    RadioGroup,
    Autocomplete,
    Unsupported,
}

/// Which `FieldPrimitive` variant the input produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape {
    Text,
    Number,
    Bool,
    List,
}
