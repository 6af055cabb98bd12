//! Integration tests for corpus reading.

use std::fs;
use std::io::Write;
use std::path::Path;

use flate2::write::GzEncoder;
use tacdoc::{CorpusReader, Document, Error, ReaderOptions, Result};

const NEWSWIRE: &str = "<DOC>\n\
<DOCID> AFP_ENG_20070101.0001 </DOCID>\n\
<DOCTYPE SOURCE=\"newswire\"> NEWS STORY </DOCTYPE>\n\
<DATETIME> 2007-01-01T00:05 </DATETIME>\n\
<BODY>\n\
<HEADLINE>\nFloods hit Jakarta\n</HEADLINE>\n\
<TEXT>\n\
<P>\nHeavy rain flooded Jakarta on Monday.\n</P>\n\
<P>\nOfficials in <B>Bogor</B> said more rain was due.\n</P>\n\
</TEXT>\n\
</BODY>\n\
</DOC>\n";

fn doc_with_id(id: &str, body: &str) -> String {
    format!(
        "<DOC>\n<DOCID> {} </DOCID>\n<TEXT>\n{}\n</TEXT>\n</DOC>\n",
        id, body
    )
}

fn write_gz(path: &Path, content: &str) {
    let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(content.as_bytes()).unwrap();
    fs::write(path, encoder.finish().unwrap()).unwrap();
}

fn collect(root: &Path) -> Vec<Document> {
    CorpusReader::new(root)
        .documents()
        .collect::<Result<_>>()
        .unwrap()
}

#[test]
fn test_two_nested_directories_yield_two_documents() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("nw/2007")).unwrap();
    fs::create_dir_all(dir.path().join("wb/2008")).unwrap();
    fs::write(dir.path().join("wb/2008/b.sgm"), doc_with_id("WB_1", "web")).unwrap();
    fs::write(dir.path().join("nw/2007/a.sgm"), doc_with_id("NW_1", "news")).unwrap();

    let docs = collect(dir.path());
    let ids: Vec<&str> = docs.iter().map(Document::id).collect();
    assert_eq!(ids, vec!["NW_1", "WB_1"]);
}

#[test]
fn test_newswire_document_fields() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("afp.sgm"), NEWSWIRE).unwrap();

    let docs = collect(dir.path());
    assert_eq!(docs.len(), 1);
    let doc = &docs[0];

    assert_eq!(doc.id(), "AFP_ENG_20070101.0001");
    assert_eq!(doc.attr("source"), Some("newswire"));
    assert_eq!(doc.attr("doctype"), Some(" NEWS STORY "));
    assert_eq!(doc.attr("datetime"), Some(" 2007-01-01T00:05 "));
    assert_eq!(doc.attr("headline"), Some("\nFloods hit Jakarta\n"));
    assert!(doc.attr("text").unwrap().contains("Bogor said"));
    assert_eq!(doc.raw(), NEWSWIRE);
}

#[test]
fn test_text_offsets_match_raw_offsets() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("afp.sgm"), NEWSWIRE).unwrap();
    let doc = collect(dir.path()).remove(0);

    assert_eq!(doc.char_len(), doc.raw().chars().count());

    // The body word sits at the same offset in both views.
    let start = NEWSWIRE.find("Jakarta on").unwrap();
    assert_eq!(doc.span(start, start + 7), Some("Jakarta"));

    // Header text is gone, inline tags are blanked.
    assert!(!doc.text().contains("Floods"));
    assert!(!doc.text().contains('<'));
    let bogor = NEWSWIRE.find("Bogor").unwrap();
    assert_eq!(doc.span(bogor - 3, bogor + 9), Some("   Bogor    "));
}

#[test]
fn test_blanked_regions_are_whitespace() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("afp.sgm"), NEWSWIRE).unwrap();
    let doc = collect(dir.path()).remove(0);

    let header_end = NEWSWIRE.find("<TEXT>").unwrap() + "<TEXT>".len();
    assert!(doc.text()[..header_end].chars().all(|c| c == ' '));

    for (i, c) in NEWSWIRE.char_indices() {
        if c == '<' {
            let close = i + NEWSWIRE[i..].find('>').unwrap();
            assert!(doc.text()[i..=close].chars().all(|c| c == ' '));
        }
    }
}

#[test]
fn test_gzip_files_are_decompressed() {
    let dir = tempfile::tempdir().unwrap();
    write_gz(
        &dir.path().join("batch.sgm.gz"),
        &format!("{}{}", doc_with_id("GZ_1", "one"), doc_with_id("GZ_2", "two")),
    );
    fs::write(dir.path().join("plain.sgm"), doc_with_id("PL_1", "three")).unwrap();

    let ids: Vec<String> = collect(dir.path())
        .iter()
        .map(|d| d.id().to_string())
        .collect();
    assert_eq!(ids, vec!["GZ_1", "GZ_2", "PL_1"]);
}

#[test]
fn test_files_without_documents_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("README"), "not a corpus file\n").unwrap();
    fs::write(dir.path().join("x.sgm"), doc_with_id("X", "x")).unwrap();

    assert_eq!(collect(dir.path()).len(), 1);
}

#[test]
fn test_unterminated_document_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let content = format!("{}<DOC>\n<DOCID>LOST</DOCID>\n", doc_with_id("KEPT", "k"));
    fs::write(dir.path().join("x.sgm"), content).unwrap();

    let docs = collect(dir.path());
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].id(), "KEPT");
}

#[test]
fn test_encoding_error_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("bad.sgm"),
        b"<DOC>\n<DOCID>B</DOCID>\n\xc3\x28\n</DOC>\n",
    )
    .unwrap();

    let results: Vec<_> = CorpusReader::new(dir.path()).documents().collect();
    assert_eq!(results.len(), 1);
    assert!(matches!(results[0], Err(Error::Encoding { .. })));
}

#[test]
fn test_custom_body_marker() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("x.sgm"),
        "<DOC>\n<DOCID>P1</DOCID>\n<POST>\nhello\n</POST>\n</DOC>\n",
    )
    .unwrap();

    let options = ReaderOptions::new().with_body_marker("<POST>");
    let doc = CorpusReader::with_options(dir.path(), options)
        .documents()
        .next()
        .unwrap()
        .unwrap();
    assert_eq!(doc.text().trim(), "hello");
    assert!(!doc.text().contains("P1"));
}

#[test]
fn test_iteration_is_restartable_per_invocation() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("x.sgm"), doc_with_id("R1", "r")).unwrap();

    let corpus = CorpusReader::new(dir.path());
    assert_eq!((&corpus).into_iter().count(), 1);
    assert_eq!((&corpus).into_iter().count(), 1);
}
