//! Helpers for turning quick-xml tokens into record fields.

use quick_xml::events::BytesStart;

use crate::error::Result;

/// Get the element name without namespace prefix.
///
/// # Examples
/// ```
/// use quick_xml::events::BytesStart;
/// use kiesuitslag_tally::xml::local_name;
///
/// let start = BytesStart::new("kr:RegionName");
/// assert_eq!(local_name(&start), "RegionName");
/// ```
pub fn local_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.local_name().as_ref()).into_owned()
}

/// An attribute of an element, with the namespace prefix removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementAttribute {
    pub name: String,
    pub value: String,
}

/// Collect the attributes of an element.
///
/// Namespace declarations (`xmlns`, `xmlns:kr`) are not data and are skipped.
///
/// # Errors
/// Returns an XML error for malformed attributes or undecodable escapes.
pub fn element_attributes(start: &BytesStart<'_>) -> Result<Vec<ElementAttribute>> {
    let mut attributes = Vec::new();

    for attr in start.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        let name = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr.unescape_value()?.trim().to_string();
        attributes.push(ElementAttribute { name, value });
    }

    Ok(attributes)
}

/// Build the record key for an attribute: `Element-attribute`.
///
/// # Examples
/// ```
/// use kiesuitslag_tally::xml::attribute_key;
///
/// assert_eq!(attribute_key("Region", "RegionNumber"), "Region-RegionNumber");
/// ```
pub fn attribute_key(element: &str, attribute: &str) -> String {
    format!("{element}-{attribute}")
}
