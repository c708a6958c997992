pub mod compute;
pub mod schema;

use ivacalc::Document;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Read a document (JSON) from a file, or stdin with "-".
pub fn read_document(path: &Path) -> anyhow::Result<Document> {
    if path.as_os_str() == "-" {
        read_from_stdin()
    } else {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

fn read_from_stdin() -> anyhow::Result<Document> {
    let stdin = io::stdin();
    let mut reader = BufReader::new(stdin.lock());

    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;

    if buffer.is_empty() {
        anyhow::bail!("No input received. Provide a file or pipe data to stdin.");
    }

    Ok(serde_json::from_slice(&buffer)?)
}
