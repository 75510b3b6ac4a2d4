//! In-memory DOCX builder for tests

use std::io::{Cursor, Write};

use quick_xml::escape::escape;
use zip::result::ZipResult;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

enum Block {
    Paragraph(String),
    Table(Vec<Vec<String>>),
}

/// Builds a minimal but valid DOCX package
#[derive(Default)]
pub struct DocxBuilder {
    blocks: Vec<Block>,
    headers: Vec<String>,
    title: Option<String>,
    author: Option<String>,
    omit_body: bool,
}

impl DocxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paragraph(mut self, text: &str) -> Self {
        self.blocks.push(Block::Paragraph(text.to_string()));
        self
    }

    pub fn paragraphs(mut self, texts: &[&str]) -> Self {
        for text in texts {
            self.blocks.push(Block::Paragraph(text.to_string()));
        }
        self
    }

    pub fn table(mut self, rows: &[&[&str]]) -> Self {
        let rows = rows
            .iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect();
        self.blocks.push(Block::Table(rows));
        self
    }

    pub fn header(mut self, text: &str) -> Self {
        self.headers.push(text.to_string());
        self
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn author(mut self, author: &str) -> Self {
        self.author = Some(author.to_string());
        self
    }

    /// Produce a container with no `word/document.xml`
    pub fn without_body(mut self) -> Self {
        self.omit_body = true;
        self
    }

    pub fn build(self) -> ZipResult<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer.start_file("[Content_Types].xml", stored())?;
        writer.write_all(CONTENT_TYPES.as_bytes())?;

        if !self.omit_body {
            let body: String = self.blocks.iter().map(render_block).collect();
            writer.start_file("word/document.xml", stored())?;
            writer.write_all(wrap("w:document", &format!("<w:body>{}</w:body>", body)).as_bytes())?;
        }

        for (i, header) in self.headers.iter().enumerate() {
            writer.start_file(format!("word/header{}.xml", i + 1), stored())?;
            writer.write_all(wrap("w:hdr", &render_paragraph(header)).as_bytes())?;
        }

        if self.title.is_some() || self.author.is_some() {
            let mut props = String::new();
            if let Some(title) = &self.title {
                props.push_str(&format!("<dc:title>{}</dc:title>", escape(title.as_str())));
            }
            if let Some(author) = &self.author {
                props.push_str(&format!("<dc:creator>{}</dc:creator>", escape(author.as_str())));
            }
            writer.start_file("docProps/core.xml", stored())?;
            writer.write_all(
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/">{}</cp:coreProperties>"#,
                    props
                )
                .as_bytes(),
            )?;
        }

        Ok(writer.finish()?.into_inner())
    }
}

fn stored() -> SimpleFileOptions {
    SimpleFileOptions::default().compression_method(CompressionMethod::Stored)
}

fn wrap(root: &str, inner: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<{root} xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">{inner}</{root}>"#
    )
}

fn render_paragraph(text: &str) -> String {
    format!(
        r#"<w:p><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
        escape(text)
    )
}

fn render_block(block: &Block) -> String {
    match block {
        Block::Paragraph(text) => render_paragraph(text),
        Block::Table(rows) => {
            let rows: String = rows
                .iter()
                .map(|row| {
                    let cells: String = row
                        .iter()
                        .map(|cell| format!("<w:tc>{}</w:tc>", render_paragraph(cell)))
                        .collect();
                    format!("<w:tr>{}</w:tr>", cells)
                })
                .collect();
            format!("<w:tbl>{}</w:tbl>", rows)
        }
    }
}
