//! WordprocessingML body parsing
//!
//! Walks `w:p`, `w:t` and `w:tbl` elements with a streaming reader. Each
//! outermost table row is flattened into a single `" | "`-joined paragraph
//! at the table's position; text from nested tables folds into the
//! enclosing cell. Text-box paragraphs are emitted on their own, before
//! the paragraph that anchors them; `mc:Fallback` copies are skipped.

use quick_xml::events::Event;
use quick_xml::name::QName;
use quick_xml::Reader;

use crate::error::DocxError;

/// Separator between cells of a flattened table row
pub const CELL_SEPARATOR: &str = " | ";

/// Text extracted from one WordprocessingML part
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PartText {
    pub paragraphs: Vec<String>,
    pub table_count: usize,
}

#[derive(Default)]
struct TableState {
    depth: usize,
    rows: Vec<String>,
    row: Vec<String>,
    cell: String,
}

/// Parse a `document.xml` or `header*.xml` part
pub fn parse_part(xml: &[u8]) -> Result<PartText, DocxError> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut skip_buf = Vec::new();

    let mut out = PartText::default();
    let mut table = TableState::default();
    // One buffer per open `w:p`; text-box paragraphs nest inside their anchor
    let mut open_paragraphs: Vec<String> = Vec::new();
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"p" => open_paragraphs.push(String::new()),
                b"t" => in_text = true,
                b"tbl" => table.depth += 1,
                b"tr" if table.depth == 1 => table.row.clear(),
                b"tc" if table.depth == 1 => table.cell.clear(),
                // Legacy copy of the preceding `mc:Choice`
                b"Fallback" => {
                    let end = e.name().as_ref().to_vec();
                    reader
                        .read_to_end_into(QName(&end), &mut skip_buf)
                        .map_err(|err| malformed(reader.buffer_position(), err))?;
                    skip_buf.clear();
                }
                _ => {}
            },
            Ok(Event::Empty(e)) => {
                if let Some(paragraph) = open_paragraphs.last_mut() {
                    match e.local_name().as_ref() {
                        b"tab" => paragraph.push('\t'),
                        b"br" | b"cr" => paragraph.push('\n'),
                        _ => {}
                    }
                }
            }
            Ok(Event::Text(e)) if in_text => {
                let text = e.unescape().map_err(|err| {
                    DocxError::UnreadableDocument(format!("invalid text content: {}", err))
                })?;
                if let Some(paragraph) = open_paragraphs.last_mut() {
                    paragraph.push_str(&text);
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => {
                    if let Some(text) = open_paragraphs.pop() {
                        end_paragraph(&mut out, &mut table, text);
                    }
                }
                b"tc" if table.depth == 1 => {
                    let cell = std::mem::take(&mut table.cell);
                    table.row.push(cell.trim().to_string());
                }
                b"tr" if table.depth == 1 => {
                    if table.row.iter().any(|c| !c.is_empty()) {
                        table.rows.push(table.row.join(CELL_SEPARATOR));
                    }
                    table.row.clear();
                }
                b"tbl" => {
                    table.depth = table.depth.saturating_sub(1);
                    if table.depth == 0 {
                        out.table_count += 1;
                        out.paragraphs.append(&mut table.rows);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(malformed(reader.buffer_position(), e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(out)
}

fn malformed(position: usize, err: quick_xml::Error) -> DocxError {
    DocxError::UnreadableDocument(format!("malformed XML at position {}: {}", position, err))
}

fn end_paragraph(out: &mut PartText, table: &mut TableState, text: String) {
    if text.trim().is_empty() {
        return;
    }

    if table.depth > 0 {
        if !table.cell.is_empty() {
            table.cell.push(' ');
        }
        table.cell.push_str(text.trim());
    } else {
        out.paragraphs.push(text);
    }
}
