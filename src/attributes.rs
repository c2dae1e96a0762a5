//! Attribute extraction.
//!
//! Splits an element's attributes into the class name, the identity label,
//! the templating control directives and a residual passthrough map.

use std::collections::BTreeMap;

use crate::block::{AssignmentSpec, BlockNode, ConditionalSpec, DEFAULT_LOOP_VARIABLE, LoopSpec};
use crate::config::ConvertConfig;

pub const LOOP_SOURCE_ATTR: &str = "loopsource";
pub const LOOP_VARIABLE_ATTR: &str = "loopvariable";
pub const CONDITIONAL_VISIBILITY_ATTR: &str = "conditionalvisibility";
pub const CONDITIONAL_EXPRESSION_ATTR: &str = "conditionalexpression";
pub const SET_VARIABLE_ATTR: &str = "setvariable";
pub const SET_EXPRESSION_ATTR: &str = "setexpression";

/// Every control attribute name, lowercase.
pub const CONTROL_ATTRIBUTES: &[&str] = &[
    LOOP_SOURCE_ATTR,
    LOOP_VARIABLE_ATTR,
    CONDITIONAL_VISIBILITY_ATTR,
    CONDITIONAL_EXPRESSION_ATTR,
    SET_VARIABLE_ATTR,
    SET_EXPRESSION_ATTR,
];

pub fn is_control_attribute(name: &str) -> bool {
    CONTROL_ATTRIBUTES
        .iter()
        .any(|attr| attr.eq_ignore_ascii_case(name))
}

/// Lenient boolean: only `true` and `1` count, anything else is false.
pub fn parse_bool(value: &str) -> bool {
    let value = value.trim();
    value.eq_ignore_ascii_case("true") || value == "1"
}

/// The result of splitting an element's attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedAttributes {
    pub class_name: Option<String>,
    pub block_identity: Option<String>,
    pub loop_spec: Option<LoopSpec>,
    pub conditional: Option<ConditionalSpec>,
    pub assignment: Option<AssignmentSpec>,
    pub attributes: BTreeMap<String, String>,
}

impl ExtractedAttributes {
    /// Move the extracted fields onto `node`.
    pub fn apply_to(self, node: &mut BlockNode) {
        node.class_name = self.class_name;
        node.block_identity = self.block_identity;
        node.loop_spec = self.loop_spec;
        node.conditional = self.conditional;
        node.assignment = self.assignment;
        node.attributes = self.attributes;
    }
}

#[derive(Default)]
struct ControlValues<'a> {
    loop_source: Option<&'a str>,
    loop_variable: Option<&'a str>,
    visibility: Option<&'a str>,
    condition: Option<&'a str>,
    set_variable: Option<&'a str>,
    set_expression: Option<&'a str>,
}

/// Split `attrs` into their block-node fields.
///
/// Values are expected entity-decoded, which is what the HTML parser hands
/// out. The first occurrence of a duplicated control attribute wins.
///
/// The identity attribute is removed from the residual map. When the label
/// falls back to `id`, `id` itself stays in the map so it renders unchanged.
///
/// ```
/// use blockbridge::ConvertConfig;
/// use blockbridge::attributes::extract_attributes;
///
/// let attrs = [("class", "card"), ("style", "color:red"), ("loopsource", "posts"), ("href", "/")];
/// let extracted = extract_attributes(attrs, &ConvertConfig::default());
///
/// assert_eq!(extracted.class_name.as_deref(), Some("card"));
/// assert_eq!(extracted.loop_spec.unwrap().variable, "item");
/// assert_eq!(extracted.attributes.len(), 1);
/// ```
pub fn extract_attributes<'a, N>(
    attrs: impl IntoIterator<Item = (N, &'a str)>,
    config: &ConvertConfig,
) -> ExtractedAttributes
where
    N: AsRef<str>,
{
    let mut out = ExtractedAttributes::default();
    let mut controls = ControlValues::default();
    let mut explicit_identity: Option<&str> = None;
    let mut id_value: Option<&str> = None;

    for (name, value) in attrs {
        let name = name.as_ref();
        let lower = name.to_ascii_lowercase();

        let slot = match lower.as_str() {
            LOOP_SOURCE_ATTR => Some(&mut controls.loop_source),
            LOOP_VARIABLE_ATTR => Some(&mut controls.loop_variable),
            CONDITIONAL_VISIBILITY_ATTR => Some(&mut controls.visibility),
            CONDITIONAL_EXPRESSION_ATTR => Some(&mut controls.condition),
            SET_VARIABLE_ATTR => Some(&mut controls.set_variable),
            SET_EXPRESSION_ATTR => Some(&mut controls.set_expression),
            _ => None,
        };
        if let Some(slot) = slot {
            slot.get_or_insert(value);
            continue;
        }

        if lower.eq_ignore_ascii_case(&config.identity_attr) {
            explicit_identity.get_or_insert(value);
            continue;
        }

        match lower.as_str() {
            "class" => {
                let class = value.trim();
                if !class.is_empty() && out.class_name.is_none() {
                    out.class_name = Some(class.to_string());
                }
            }
            "style" => {
                log::debug!("dropping inline style {value:?}");
            }
            _ => {
                if lower == "id" {
                    id_value.get_or_insert(value);
                }
                out.attributes
                    .entry(name.to_string())
                    .or_insert_with(|| value.to_string());
            }
        }
    }

    out.block_identity = explicit_identity
        .or(id_value)
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(str::to_string);
    out.loop_spec = loop_spec(&controls);
    out.conditional = conditional_spec(&controls);
    out.assignment = assignment_spec(&controls);
    out
}

fn loop_spec(controls: &ControlValues<'_>) -> Option<LoopSpec> {
    let source = controls.loop_source?;
    let variable = controls
        .loop_variable
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(DEFAULT_LOOP_VARIABLE);
    Some(LoopSpec::new(source, variable))
}

/// An expression without a flag means "enabled"; an explicit flag always wins.
fn conditional_spec(controls: &ControlValues<'_>) -> Option<ConditionalSpec> {
    match (controls.visibility, controls.condition) {
        (None, None) => None,
        (Some(flag), expression) => Some(ConditionalSpec {
            enabled: parse_bool(flag),
            expression: expression.unwrap_or_default().to_string(),
        }),
        (None, Some(expression)) => Some(ConditionalSpec::new(expression)),
    }
}

fn assignment_spec(controls: &ControlValues<'_>) -> Option<AssignmentSpec> {
    let variable = controls.set_variable.unwrap_or_default();
    let expression = controls.set_expression.unwrap_or_default();
    if variable.is_empty() && expression.is_empty() {
        return None;
    }
    Some(AssignmentSpec::new(variable, expression))
}
