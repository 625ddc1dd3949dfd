//! Element data: qualified name, tag classification and attributes.
//!
//! [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
//!
//! husk models every HTML element with the same [`ElementData`]. What differs
//! between a `<form>` and an `<input>` is captured by [`HtmlTag`] and its
//! [`Capabilities`], and by the click behaviours in the `actions` module.

use bitflags::bitflags;
use strum_macros::{AsRefStr, Display, EnumString};

/// Largest `tabindex` value browsers accept.
const MAX_TAB_INDEX: i64 = 32767;

/// One attribute as stored on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Name as last written; lookups ignore ASCII case.
    pub name: String,
    /// Attribute value.
    pub value: String,
}

/// [§ 4.9.2 Interface NamedNodeMap](https://dom.spec.whatwg.org/#interface-namednodemap)
///
/// Ordered attribute list. Names compare ASCII case-insensitively; insertion
/// order is preserved for serialization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeMap {
    entries: Vec<Attribute>,
}

impl AttributeMap {
    /// Create an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|a| a.name.eq_ignore_ascii_case(name))
    }

    /// Value of `name`, if defined.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name).map(|i| self.entries[i].value.as_str())
    }

    /// Whether `name` is defined.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Set `name` to `value`, returning the previous value.
    ///
    /// An existing entry keeps its position but takes the new spelling of
    /// the name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let name = name.into();
        let value = value.into();
        match self.position(&name) {
            Some(i) => {
                let entry = &mut self.entries[i];
                entry.name = name;
                Some(std::mem::replace(&mut entry.value, value))
            }
            None => {
                self.entries.push(Attribute { name, value });
                None
            }
        }
    }

    /// Remove `name`, returning its value if it was defined.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.position(name).map(|i| self.entries.remove(i).value)
    }

    /// Iterate over attributes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.entries.iter()
    }

    /// Number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map holds no attribute.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AttributeMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (name, value) in iter {
            let _ = map.insert(name, value);
        }
        map
    }
}

/// The three states an attribute lookup can report.
///
/// `NotDefined` and `Empty` both read as `""` through [`AttributeValue::as_str`]
/// but remain distinguishable, which matters for boolean attributes such as
/// `checked` or `disabled` where presence is the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeValue<'a> {
    /// The attribute is not set.
    NotDefined,
    /// The attribute is set to the empty string.
    Empty,
    /// The attribute is set to a non-empty value.
    Value(&'a str),
}

impl<'a> AttributeValue<'a> {
    pub(crate) fn from_option(value: Option<&'a str>) -> Self {
        match value {
            None => Self::NotDefined,
            Some("") => Self::Empty,
            Some(v) => Self::Value(v),
        }
    }

    /// Whether the attribute is set (possibly to the empty string).
    #[must_use]
    pub const fn is_defined(self) -> bool {
        !matches!(self, Self::NotDefined)
    }

    /// The value as text; `""` when not defined.
    #[must_use]
    pub const fn as_str(self) -> &'a str {
        match self {
            Self::NotDefined | Self::Empty => "",
            Self::Value(v) => v,
        }
    }

    /// `None` when not defined, the text otherwise.
    #[must_use]
    pub const fn as_option(self) -> Option<&'a str> {
        match self {
            Self::NotDefined => None,
            Self::Empty => Some(""),
            Self::Value(v) => Some(v),
        }
    }
}

/// Classification of the elements husk gives behaviour to.
///
/// Parsing is ASCII case-insensitive; any other local name maps to
/// [`HtmlTag::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[allow(missing_docs)]
pub enum HtmlTag {
    A,
    Abbr,
    Address,
    Area,
    B,
    Base,
    Big,
    Blockquote,
    Body,
    Br,
    Button,
    Caption,
    Center,
    Code,
    Dd,
    Div,
    Dl,
    Dt,
    Em,
    Fieldset,
    Font,
    Form,
    Frame,
    Frameset,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    Head,
    Hr,
    Html,
    I,
    Iframe,
    Img,
    Input,
    Label,
    Legend,
    Li,
    Link,
    Map,
    Meta,
    Noscript,
    Object,
    Ol,
    Optgroup,
    Option,
    P,
    Pre,
    S,
    Script,
    Select,
    Small,
    Span,
    Strike,
    Strong,
    Style,
    Sub,
    Sup,
    Table,
    Tbody,
    Td,
    Textarea,
    Tfoot,
    Th,
    Thead,
    Title,
    Tr,
    Tt,
    U,
    Ul,
    Unknown,
}

impl HtmlTag {
    /// Classify a local name.
    #[must_use]
    pub fn from_local_name(local_name: &str) -> Self {
        local_name.parse().unwrap_or(Self::Unknown)
    }

    /// What elements with this tag can do.
    #[must_use]
    pub const fn capabilities(self) -> Capabilities {
        use Capabilities as C;
        match self {
            Self::A | Self::Area => C::CLICKABLE.union(C::FOCUSABLE).union(C::ACCESS_KEY),
            Self::Button | Self::Input | Self::Select | Self::Textarea => C::CLICKABLE
                .union(C::FOCUSABLE)
                .union(C::SUBMITTABLE)
                .union(C::DISABLEABLE)
                .union(C::ACCESS_KEY),
            Self::Object => C::FOCUSABLE,
            Self::Option => C::CLICKABLE.union(C::DISABLEABLE),
            Self::Optgroup => C::DISABLEABLE,
            Self::Label => C::CLICKABLE.union(C::ACCESS_KEY),
            Self::Legend => C::ACCESS_KEY.union(C::BLOCK),
            Self::Noscript => C::SCRIPT_HIDING.union(C::BLOCK),
            Self::Address
            | Self::Blockquote
            | Self::Body
            | Self::Caption
            | Self::Center
            | Self::Dd
            | Self::Div
            | Self::Dl
            | Self::Dt
            | Self::Fieldset
            | Self::Form
            | Self::H1
            | Self::H2
            | Self::H3
            | Self::H4
            | Self::H5
            | Self::H6
            | Self::Hr
            | Self::Html
            | Self::Li
            | Self::Ol
            | Self::P
            | Self::Pre
            | Self::Table
            | Self::Tbody
            | Self::Td
            | Self::Tfoot
            | Self::Th
            | Self::Thead
            | Self::Tr
            | Self::Ul => C::BLOCK,
            Self::Abbr
            | Self::B
            | Self::Big
            | Self::Code
            | Self::Em
            | Self::Font
            | Self::I
            | Self::S
            | Self::Small
            | Self::Span
            | Self::Strike
            | Self::Strong
            | Self::Sub
            | Self::Sup
            | Self::Tt
            | Self::U => C::INLINE_FORMATTING,
            _ => C::empty(),
        }
    }
}

bitflags! {
    /// Capability set of an element, replacing per-tag subclass checks.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u16 {
        /// Has a default click action.
        const CLICKABLE = 1;
        /// Takes part in sequential focus navigation.
        const FOCUSABLE = 1 << 1;
        /// Contributes to form submission.
        const SUBMITTABLE = 1 << 2;
        /// Honours the `disabled` attribute.
        const DISABLEABLE = 1 << 3;
        /// Rendered as a block: text around it is separated by whitespace.
        const BLOCK = 1 << 4;
        /// Inline formatting: rendered text keeps surrounding whitespace.
        const INLINE_FORMATTING = 1 << 5;
        /// Content is hidden while scripting is enabled.
        const SCRIPT_HIDING = 1 << 6;
        /// Can be activated through the `accesskey` attribute.
        const ACCESS_KEY = 1 << 7;
    }
}

/// [§ 6.6.3 The tabindex attribute](https://html.spec.whatwg.org/multipage/interaction.html#attr-tabindex)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabIndex {
    /// No (numeric) `tabindex` attribute.
    Unspecified,
    /// A valid index in `[0, 32767]`.
    Index(u16),
    /// A numeric index outside `[0, 32767]`; the element is not tabbable.
    OutOfBounds,
}

/// An element that honours `disabled`.
#[derive(Debug, Clone, Copy)]
pub struct Disableable<'a> {
    element: &'a ElementData,
}

impl Disableable<'_> {
    /// Whether the `disabled` attribute is present.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.element.attributes.contains("disabled")
    }
}

/// An element that can contribute a name/value pair to a form submission.
#[derive(Debug, Clone, Copy)]
pub struct Submittable<'a> {
    element: &'a ElementData,
}

impl<'a> Submittable<'a> {
    /// The control name; controls without a name are never submitted.
    #[must_use]
    pub fn name(&self) -> Option<&'a str> {
        self.element.attributes.get("name").filter(|n| !n.is_empty())
    }

    /// The `value` attribute, `""` when absent.
    #[must_use]
    pub fn value(&self) -> &'a str {
        self.element.attributes.get("value").unwrap_or_default()
    }
}

/// Element-specific node data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    qualified_name: String,
    namespace_uri: Option<String>,
    tag: HtmlTag,
    pub(crate) attributes: AttributeMap,
}

impl ElementData {
    pub(crate) fn new(
        qualified_name: String,
        namespace_uri: Option<String>,
        attributes: AttributeMap,
    ) -> Self {
        let tag = if namespace_uri.is_none() {
            HtmlTag::from_local_name(local_part(&qualified_name))
        } else {
            HtmlTag::Unknown
        };
        Self {
            qualified_name,
            namespace_uri,
            tag,
            attributes,
        }
    }

    /// The qualified name as created (`svg:rect`, `div`).
    #[must_use]
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// The lower-cased tag name used for HTML comparisons.
    #[must_use]
    pub fn tag_name(&self) -> String {
        self.qualified_name.to_ascii_lowercase()
    }

    /// Namespace URI; `None` for HTML elements.
    #[must_use]
    pub fn namespace_uri(&self) -> Option<&str> {
        self.namespace_uri.as_deref()
    }

    /// The part of the qualified name before `:`, if any.
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.qualified_name.split_once(':').map(|(prefix, _)| prefix)
    }

    /// The part of the qualified name after `:`, or the whole name.
    #[must_use]
    pub fn local_name(&self) -> &str {
        local_part(&self.qualified_name)
    }

    /// Tag classification.
    #[must_use]
    pub const fn tag(&self) -> HtmlTag {
        self.tag
    }

    /// Whether this is the HTML element `tag`.
    #[must_use]
    pub fn is(&self, tag: HtmlTag) -> bool {
        self.tag == tag
    }

    /// The attribute map.
    #[must_use]
    pub const fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }

    /// Case-insensitive attribute lookup.
    #[must_use]
    pub fn attribute(&self, name: &str) -> AttributeValue<'_> {
        AttributeValue::from_option(self.attributes.get(name))
    }

    /// The lower-cased `type` attribute (`input`, `button`).
    #[must_use]
    pub fn input_type(&self) -> String {
        let declared = self.attributes.get("type").unwrap_or_default();
        if declared.is_empty() {
            match self.tag {
                HtmlTag::Button => "submit".to_string(),
                _ => "text".to_string(),
            }
        } else {
            declared.to_ascii_lowercase()
        }
    }

    /// Capabilities of this element.
    #[must_use]
    pub const fn capabilities(&self) -> Capabilities {
        self.tag.capabilities()
    }

    /// View this element as one that honours `disabled`.
    #[must_use]
    pub fn as_disableable(&self) -> Option<Disableable<'_>> {
        self.capabilities()
            .contains(Capabilities::DISABLEABLE)
            .then_some(Disableable { element: self })
    }

    /// View this element as a form control.
    #[must_use]
    pub fn as_submittable(&self) -> Option<Submittable<'_>> {
        self.capabilities()
            .contains(Capabilities::SUBMITTABLE)
            .then_some(Submittable { element: self })
    }

    /// Whether this element honours `disabled` and has it set.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.as_disableable().is_some_and(|d| d.is_disabled())
    }

    /// The parsed `tabindex` attribute.
    #[must_use]
    pub fn tab_index(&self) -> TabIndex {
        let Some(raw) = self.attributes.get("tabindex") else {
            return TabIndex::Unspecified;
        };
        match raw.trim().parse::<i64>() {
            Ok(index) if (0..=MAX_TAB_INDEX).contains(&index) => {
                u16::try_from(index).map_or(TabIndex::OutOfBounds, TabIndex::Index)
            }
            Ok(_) => TabIndex::OutOfBounds,
            Err(_) => TabIndex::Unspecified,
        }
    }
}

fn local_part(qualified_name: &str) -> &str {
    qualified_name
        .split_once(':')
        .map_or(qualified_name, |(_, local)| local)
}
