use anyhow::{bail, Context, Result};
use invindex::tokenizer::tokenize;
use invindex::{DocId, InvertedIndex};
use serde::Deserialize;
use serde_json::{json, Value};
use walkdir::WalkDir;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct InputDoc {
    pub id: DocId,
    pub body: String,
    #[serde(default)]
    pub title: Option<String>,
}

/// Index every `.json` / `.jsonl` document under `input` (a file or a directory).
pub fn build_index(input: &str, track_positions: bool) -> Result<InvertedIndex> {
    let input_path = Path::new(input);
    let mut files: Vec<PathBuf> = Vec::new();
    if input_path.is_dir() {
        for entry in WalkDir::new(input_path).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() && matches!(p.extension().and_then(|s| s.to_str()), Some("json" | "jsonl")) {
                files.push(p.to_path_buf());
            }
        }
    } else if input_path.is_file() {
        files.push(input_path.to_path_buf());
    } else {
        bail!("input path not found: {input}");
    }

    let mut index = InvertedIndex::new();
    for file in files {
        let docs = if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
            read_jsonl(&file)?
        } else {
            read_json(&file)?
        };
        for doc in docs {
            ingest_doc(&mut index, doc, track_positions);
        }
    }

    tracing::info!(
        num_docs = index.document_count(),
        num_terms = index.len(),
        "ingested documents"
    );
    Ok(index)
}

fn read_jsonl(file: &Path) -> Result<Vec<InputDoc>> {
    let f = File::open(file).with_context(|| format!("opening {}", file.display()))?;
    let reader = BufReader::new(f);
    let mut docs = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        docs.push(serde_json::from_str(&line).with_context(|| format!("parsing {}", file.display()))?);
    }
    Ok(docs)
}

fn read_json(file: &Path) -> Result<Vec<InputDoc>> {
    let f = File::open(file).with_context(|| format!("opening {}", file.display()))?;
    let reader = BufReader::new(f);
    let json: Value = serde_json::from_reader(reader)?;
    let docs = match json {
        Value::Array(arr) => arr
            .into_iter()
            .map(serde_json::from_value)
            .collect::<std::result::Result<Vec<InputDoc>, _>>()?,
        Value::Object(_) => vec![serde_json::from_value(json)?],
        _ => Vec::new(),
    };
    Ok(docs)
}

/// Index one document, replacing any earlier document with the same id.
fn ingest_doc(index: &mut InvertedIndex, doc: InputDoc, track_positions: bool) {
    if index.documents().contains_key(&doc.id) {
        tracing::info!(doc_id = doc.id, "replacing duplicate document id");
        // purge cannot fail: the id was just found in the forward store
        let _ = index.purge(doc.id);
    }
    let text = match doc.title {
        Some(title) => format!("{title}\n{}", doc.body),
        None => doc.body,
    };
    index.add_text(doc.id, &text, track_positions);
}

pub fn stats_report(index: &InvertedIndex) -> Value {
    let words = index.word_count(None).unwrap_or_default();
    json!({
        "documents": index.document_count(),
        "terms": index.len(),
        "words": words,
        "average_length": index.average_length(),
    })
}

/// Postings for every term the query word normalizes to. Unknown terms map to null.
pub fn postings_report(index: &InvertedIndex, word: &str) -> Value {
    let mut out = serde_json::Map::new();
    for term in tokenize(word) {
        let entry = match index.get(&term) {
            Ok(list) => json!({
                "document_frequency": list.document_frequency(),
                "postings": list,
            }),
            Err(err) => {
                tracing::debug!(%err, "term absent");
                Value::Null
            }
        };
        out.insert(term, entry);
    }
    Value::Object(out)
}
