// ABOUTME: XML event loop that builds the element arena
// ABOUTME: Drives quick-xml's pull reader with an open-element stack

use super::error::{Result, SmiError};
use super::tree::{DocumentBuilder, XmlDocument};
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use tracing::trace;

/// Parse XML text into an element arena using an open-element stack
pub(crate) fn parse_document_iterative(raw: &str) -> Result<XmlDocument> {
    let mut reader = Reader::from_str(raw);
    reader.config_mut().trim_text(true);

    let mut builder = DocumentBuilder::default();

    loop {
        let position = reader.buffer_position() as u64;
        let event = reader
            .read_event()
            .map_err(|e| SmiError::malformed_document(position, e))?;

        match event {
            Event::Start(start) => {
                let name = element_name(start.name().as_ref(), position)?;
                if !builder.open(name) {
                    return Err(SmiError::malformed_document(
                        position,
                        "multiple root elements",
                    ));
                }
            }
            Event::Empty(empty) => {
                let name = element_name(empty.name().as_ref(), position)?;
                if !builder.open(name) {
                    return Err(SmiError::malformed_document(
                        position,
                        "multiple root elements",
                    ));
                }
                builder.close();
            }
            Event::End(_) => {
                if !builder.close() {
                    return Err(SmiError::malformed_document(position, "unexpected end tag"));
                }
            }
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|e| SmiError::malformed_document(position, e))?;
                builder.text(&text);
            }
            Event::CData(cdata) => {
                let text = std::str::from_utf8(&cdata)
                    .map_err(|e| SmiError::malformed_document(position, e))?;
                builder.text(text);
            }
            Event::Eof => break,
            // Declarations, doctype, comments and processing instructions
            _ => {}
        }
    }

    let position = reader.buffer_position() as u64;
    if let Some(name) = builder.unclosed() {
        return Err(SmiError::malformed_document(
            position,
            format!("unclosed element <{name}>"),
        ));
    }

    let document = builder
        .finish()
        .ok_or_else(|| SmiError::malformed_document(position, "no root element"))?;
    trace!(nodes = document.node_count(), "parsed XML document");
    Ok(document)
}

fn element_name(name: &[u8], position: u64) -> Result<String> {
    std::str::from_utf8(name)
        .map(str::to_string)
        .map_err(|e| SmiError::malformed_document(position, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_declaration_and_doctype() {
        let raw = r#"<?xml version="1.0" ?>
<!DOCTYPE nvidia_smi_log SYSTEM "nvsmi_device_v12.dtd">
<nvidia_smi_log>
	<driver_version>550.54.14</driver_version>
	<!-- comment -->
	<gpu id="00000000:01:00.0">
		<product_name>NVIDIA RTX A5000</product_name>
	</gpu>
</nvidia_smi_log>
"#;
        let doc = parse_document_iterative(raw).unwrap();
        let root = doc.root();
        assert_eq!(root.name(), "nvidia_smi_log");
        assert_eq!(root.text(), None);
        assert_eq!(
            root.find("./gpu/product_name").unwrap().text(),
            Some("NVIDIA RTX A5000")
        );
    }

    #[test]
    fn test_parse_unescapes_entities() {
        let doc = parse_document_iterative("<r><v>A &amp; B</v></r>").unwrap();
        assert_eq!(doc.root().find("v").unwrap().text(), Some("A & B"));
    }

    #[test]
    fn test_parse_cdata() {
        let doc = parse_document_iterative("<r><v><![CDATA[1 < 2]]></v></r>").unwrap();
        assert_eq!(doc.root().find("v").unwrap().text(), Some("1 < 2"));
    }

    #[test]
    fn test_parse_empty_element_has_no_text() {
        let doc = parse_document_iterative("<r><serial/><uuid></uuid></r>").unwrap();
        assert_eq!(doc.root().find("serial").unwrap().text(), None);
        assert_eq!(doc.root().find("uuid").unwrap().text(), None);
    }

    #[test]
    fn test_parse_empty_input() {
        let result = parse_document_iterative("");
        assert!(matches!(result, Err(SmiError::MalformedDocument { .. })));
    }

    #[test]
    fn test_parse_plain_text_input() {
        let result = parse_document_iterative("NVIDIA-SMI has failed");
        assert!(matches!(result, Err(SmiError::MalformedDocument { .. })));
    }

    #[test]
    fn test_parse_unclosed_element() {
        let result = parse_document_iterative("<r><gpu>");
        assert!(matches!(result, Err(SmiError::MalformedDocument { .. })));
    }

    #[test]
    fn test_parse_mismatched_end_tag() {
        let result = parse_document_iterative("<r><a></b></r>");
        assert!(matches!(result, Err(SmiError::MalformedDocument { .. })));
    }

    #[test]
    fn test_parse_multiple_roots() {
        let result = parse_document_iterative("<a/><b/>");
        assert!(matches!(result, Err(SmiError::MalformedDocument { .. })));
    }
}
