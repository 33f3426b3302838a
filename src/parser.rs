use crate::error::XrefError;
use crate::types::*;
use anyhow::{Context, Result};
use flate2::read::MultiGzDecoder;
use quick_xml::events::Event;
use quick_xml::Reader as XmlReader;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Open a text input, transparently decompressing `.gz` files.
pub fn open_input(path: &Path) -> Result<Box<dyn BufRead>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open input file: {}", path.display()))?;

    if path.extension().is_some_and(|ext| ext == "gz") {
        log::debug!("Reading {} through gzip decoder", path.display());
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::with_capacity(1024 * 1024, file)))
    }
}

// ============================================================================
// Orphanet catalog XML
// ============================================================================

/// Minimal element tree; the catalogs only need element names and text.
#[derive(Debug, Default)]
struct XmlNode {
    name: String,
    text: String,
    children: Vec<XmlNode>,
}

impl XmlNode {
    fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    fn required_text(&self, parent: &'static str, element: &'static str) -> Result<String, XrefError> {
        self.child(element)
            .map(|c| c.text.trim().to_string())
            .ok_or(XrefError::MissingElement { parent, element })
    }
}

pub fn parse_catalog(path: &Path) -> Result<Vec<Disorder>> {
    log::info!("Parsing Orphanet catalog {}...", path.display());
    let reader = open_input(path)?;
    let disorders = parse_catalog_from_reader(reader)
        .with_context(|| format!("Failed to parse Orphanet catalog: {}", path.display()))?;
    log::info!("Found {} disorders in {}", disorders.len(), path.display());
    Ok(disorders)
}

/// Read every `Disorder` element, at any depth, in document order.
pub fn parse_catalog_from_reader<R: BufRead>(reader: R) -> Result<Vec<Disorder>, XrefError> {
    let root = read_tree(reader)?;
    let mut disorders = Vec::new();
    collect_disorders(&root, &mut disorders)?;
    Ok(disorders)
}

fn read_tree<R: BufRead>(reader: R) -> Result<XmlNode, XrefError> {
    let mut reader = XmlReader::from_reader(reader);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut stack = vec![XmlNode::default()];

    loop {
        let event = reader.read_event_into(&mut buf).map_err(|e| XrefError::Xml {
            position: reader.buffer_position() as u64,
            message: e.to_string(),
        })?;

        match event {
            Event::Start(ref e) => {
                stack.push(XmlNode {
                    name: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
                    ..Default::default()
                });
            }
            Event::Empty(ref e) => {
                let node = XmlNode {
                    name: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
                    ..Default::default()
                };
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(node);
                }
            }
            Event::Text(e) => {
                let text = e.unescape().map_err(|err| XrefError::Xml {
                    position: reader.buffer_position() as u64,
                    message: err.to_string(),
                })?;
                if let Some(node) = stack.last_mut() {
                    node.text.push_str(&text);
                }
            }
            Event::CData(e) => {
                if let Some(node) = stack.last_mut() {
                    node.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Event::End(_) => {
                // The document root sentinel is never popped
                if stack.len() < 2 {
                    return Err(XrefError::Xml {
                        position: reader.buffer_position() as u64,
                        message: "unbalanced closing tag".to_string(),
                    });
                }
                if let Some(node) = stack.pop() {
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(node);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if stack.len() != 1 {
        return Err(XrefError::Xml {
            position: reader.buffer_position() as u64,
            message: format!("{} unclosed element(s) at end of document", stack.len() - 1),
        });
    }

    Ok(stack.pop().unwrap_or_default())
}

fn collect_disorders(node: &XmlNode, out: &mut Vec<Disorder>) -> Result<(), XrefError> {
    for child in &node.children {
        if child.name == "Disorder" {
            out.push(disorder_from_node(child)?);
        }
        collect_disorders(child, out)?;
    }
    Ok(())
}

fn disorder_from_node(node: &XmlNode) -> Result<Disorder, XrefError> {
    let orpha_number = node.required_text("Disorder", "OrphaNumber")?;

    let mut external_references = Vec::new();
    read_reference_lists(node, &mut external_references)?;

    let mut nested_references = Vec::new();
    for child in &node.children {
        if child.name != "ExternalReferenceList" {
            collect_nested_references(child, &mut nested_references)?;
        }
    }

    let mut inheritance = Vec::new();
    for list in node.children_named("TypeOfInheritanceList") {
        for entry in list.children_named("TypeOfInheritance") {
            inheritance.push(entry.required_text("TypeOfInheritance", "Name")?);
        }
    }

    Ok(Disorder {
        orpha_number,
        external_references,
        nested_references,
        inheritance,
    })
}

fn read_reference_lists(node: &XmlNode, out: &mut Vec<ExternalReference>) -> Result<(), XrefError> {
    for list in node.children_named("ExternalReferenceList") {
        for reference in list.children_named("ExternalReference") {
            out.push(ExternalReference {
                source: reference.required_text("ExternalReference", "Source")?,
                reference: reference.required_text("ExternalReference", "Reference")?,
            });
        }
    }
    Ok(())
}

/// Reference lists below `node`, stopping at nested disorders.
fn collect_nested_references(node: &XmlNode, out: &mut Vec<ExternalReference>) -> Result<(), XrefError> {
    if node.name == "Disorder" {
        return Ok(());
    }
    read_reference_lists(node, out)?;
    for child in &node.children {
        if child.name != "ExternalReferenceList" {
            collect_nested_references(child, out)?;
        }
    }
    Ok(())
}

// ============================================================================
// Phenotype annotation table
// ============================================================================

pub fn parse_phenotype_annotations(path: &Path) -> Result<Vec<PhenotypeAnnotation>> {
    log::info!("Parsing phenotype annotations {}...", path.display());
    let reader = open_input(path)?;
    parse_phenotype_annotations_from_reader(reader)
        .with_context(|| format!("Failed to parse phenotype annotations: {}", path.display()))
}

/// Column 1 is the source database, column 2 the disease id within it.
pub fn parse_phenotype_annotations_from_reader<R: BufRead>(
    reader: R,
) -> Result<Vec<PhenotypeAnnotation>> {
    let mut tsv = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .comment(Some(b'#'))
        .from_reader(reader);

    let mut annotations = Vec::new();
    for (idx, result) in tsv.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read annotation row {}", idx + 1))?;
        match (record.get(0), record.get(1)) {
            (Some(source), Some(disease_id)) => annotations.push(PhenotypeAnnotation {
                source: source.trim().to_string(),
                disease_id: disease_id.trim().to_string(),
            }),
            _ => log::debug!("Skipping short annotation row {}", idx + 1),
        }
    }

    Ok(annotations)
}

// ============================================================================
// Mutation database
// ============================================================================

pub fn parse_mutation_database(path: &Path, disease_id_key: &str) -> Result<Vec<MutationEntry>> {
    log::info!("Parsing mutation database {}...", path.display());
    let reader = open_input(path)?;
    let entries = parse_mutation_database_from_reader(reader, disease_id_key)
        .with_context(|| format!("Failed to parse mutation database: {}", path.display()))?;
    log::info!("Loaded {} mutation entries", entries.len());
    Ok(entries)
}

/// VCF-style records; the genotype id is read from the INFO key `disease_id_key`.
pub fn parse_mutation_database_from_reader<R: BufRead>(
    reader: R,
    disease_id_key: &str,
) -> Result<Vec<MutationEntry>> {
    let mut entries = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read mutation database line")?;
        if line.starts_with('#') || line.trim().is_empty() {
            continue;
        }

        let cols: Vec<&str> = line.split('\t').collect();
        if cols.len() < 8 {
            return Err(XrefError::MutationLine {
                line: idx + 1,
                columns: cols.len(),
            }
            .into());
        }

        let disease_id = cols[7]
            .split(';')
            .filter_map(|kv| kv.split_once('='))
            .find(|(key, _)| *key == disease_id_key)
            .map(|(_, value)| value.to_string());

        match disease_id {
            Some(disease_id) => entries.push(MutationEntry {
                chromosome: cols[0].to_string(),
                locus: cols[1].to_string(),
                disease_id,
            }),
            None => log::debug!("Line {} has no {} annotation", idx + 1, disease_id_key),
        }
    }

    Ok(entries)
}
