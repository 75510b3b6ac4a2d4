//! `docProps/core.xml` metadata

use quick_xml::events::Event;
use quick_xml::Reader;
use shared_types::DocumentProperties;

#[derive(Clone, Copy)]
enum Field {
    Title,
    Author,
    Created,
    Modified,
}

/// Parse core properties. Metadata is best-effort: malformed XML yields
/// whatever was read before the error.
pub fn parse_core_properties(xml: &[u8]) -> DocumentProperties {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut props = DocumentProperties::default();
    let mut current: Option<Field> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                current = match e.local_name().as_ref() {
                    b"title" => Some(Field::Title),
                    b"creator" => Some(Field::Author),
                    b"created" => Some(Field::Created),
                    b"modified" => Some(Field::Modified),
                    _ => None,
                };
            }
            Ok(Event::Text(e)) => {
                if let (Some(field), Ok(text)) = (current, e.unescape()) {
                    let value = text.trim();
                    if !value.is_empty() {
                        let slot = match field {
                            Field::Title => &mut props.title,
                            Field::Author => &mut props.author,
                            Field::Created => &mut props.created,
                            Field::Modified => &mut props.modified,
                        };
                        *slot = Some(value.to_string());
                    }
                }
            }
            Ok(Event::End(_)) => current = None,
            Ok(Event::Eof) => break,
            Err(e) => {
                tracing::warn!("Could not read document properties: {}", e);
                break;
            }
            _ => {}
        }
        buf.clear();
    }

    props
}
