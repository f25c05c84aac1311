/// Parser for Cobertura XML coverage reports.
///
/// Cobertura XML structure:
///   <coverage>
///     <packages>
///       <package name="...">
///         <classes>
///           <class name="..." filename="..." line-rate="..." branch-rate="...">
///             <lines>
///               <line number="..." hits="..." branch="true|false"
///                     condition-coverage="50% (1/2)" />
///             </lines>
///           </class>
///         </classes>
///       </package>
///     </packages>
///   </coverage>
use std::collections::{HashMap, HashSet};
use std::str;
use std::sync::LazyLock;

use quick_xml::events::Event;
use quick_xml::reader::Reader;
use regex::Regex;

use crate::error::Result;
use crate::model::CoverageRecord;
use crate::parsers::Parser;

/// Pre-compiled regex for condition-coverage attributes like "75% (3/4)".
static BRANCH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((\d+)/(\d+)\)").unwrap());

pub struct CoberturaParser;

impl Parser for CoberturaParser {
    fn parse(&self, input: &[u8]) -> Result<Vec<CoverageRecord>> {
        parse_cobertura(input)
    }
}

/// Per-file accumulator. Lines may appear both under `<method><lines>` and
/// `<class><lines>`, and the same filename may appear under several
/// `<class>` elements, so counts are deduplicated by line number (keeping
/// the max hit count) before being collapsed into a record.
#[derive(Default)]
struct FileAccum {
    line_hits: HashMap<u32, u64>,
    branches_covered: u64,
    branches_valid: u64,
    branch_lines_seen: HashSet<u32>,
}

impl FileAccum {
    fn into_record(self, path: String) -> CoverageRecord {
        let lines_valid = self.line_hits.len() as u64;
        let lines_covered = self.line_hits.values().filter(|&&hits| hits > 0).count() as u64;
        CoverageRecord {
            path,
            lines_covered,
            lines_valid,
            branches_covered: self.branches_covered,
            branches_valid: self.branches_valid,
        }
    }
}

fn parse_cobertura(input: &[u8]) -> Result<Vec<CoverageRecord>> {
    let mut reader = Reader::from_reader(input);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();

    // Files keyed by normalized path, in first-seen order.
    let mut order: Vec<String> = Vec::new();
    let mut files: HashMap<String, FileAccum> = HashMap::new();
    let mut current: Option<String> = None;

    let branch_re = &*BRANCH_RE;

    loop {
        let event = reader.read_event_into(&mut buf);
        match event {
            Err(e) => return Err(e.into()),
            Ok(Event::Eof) => break,
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                let local_name = e.name();
                let local = local_name.as_ref().to_vec();

                match local.as_slice() {
                    b"class" => {
                        let attrs = attr_map(e);
                        if let Some(filename) = attrs.get("filename") {
                            let path = normalize_path(filename);
                            if !files.contains_key(&path) {
                                order.push(path.clone());
                                files.insert(path.clone(), FileAccum::default());
                            }
                            current = Some(path);
                        }
                    }
                    b"line" => {
                        let attrs = attr_map(e);
                        let file = match current.as_ref().and_then(|p| files.get_mut(p)) {
                            Some(file) => file,
                            None => continue,
                        };
                        let line_number = match attrs.get("number").and_then(|n| n.parse::<u32>().ok()) {
                            Some(n) => n,
                            None => continue,
                        };
                        let hit_count = attrs
                            .get("hits")
                            .and_then(|h| h.parse::<u64>().ok())
                            .unwrap_or(0);

                        let entry = file.line_hits.entry(line_number).or_insert(0);
                        if hit_count > *entry {
                            *entry = hit_count;
                        }

                        // Branch coverage — only counted on the first
                        // encounter of this line to avoid double-counting
                        // when the same line appears in both <method> and
                        // <class> blocks.
                        let is_branch = attrs
                            .get("branch")
                            .map(|v| v == "true")
                            .unwrap_or(false);
                        if is_branch && file.branch_lines_seen.insert(line_number) {
                            if let Some(cond) = attrs.get("condition-coverage") {
                                if let Some(caps) = branch_re.captures(cond) {
                                    let covered: u64 = caps[1].parse().unwrap_or(0);
                                    let total: u64 = caps[2].parse().unwrap_or(0);
                                    file.branches_covered += covered.min(total);
                                    file.branches_valid += total;
                                }
                            }
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::End(ref e)) => {
                if e.name().as_ref() == b"class" {
                    current = None;
                }
            }
            _ => {}
        }
        buf.clear();
    }

    let mut records = Vec::with_capacity(order.len());
    for path in order {
        if let Some(accum) = files.remove(&path) {
            records.push(accum.into_record(path));
        }
    }
    Ok(records)
}

/// Normalize a Cobertura filename into a forward-slash relative path.
fn normalize_path(filename: &str) -> String {
    let path = filename.replace('\\', "/");
    let path = path.strip_prefix("./").unwrap_or(&path);
    path.trim_start_matches('/').to_string()
}

/// Extract attributes from an XML element into a HashMap.
fn attr_map(e: &quick_xml::events::BytesStart) -> HashMap<String, String> {
    e.attributes()
        .filter_map(|a| {
            let attr = a.ok()?;
            let key = str::from_utf8(attr.key.local_name().into_inner())
                .ok()?
                .to_string();
            let value = attr.unescape_value().ok()?.to_string();
            Some((key, value))
        })
        .collect()
}
