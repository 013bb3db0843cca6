use pdflex_core::{ScanError, Scanner, Token, TokenKind, scan_all};
use pretty_assertions::assert_eq;

const MINIMAL_PDF: &[u8] = b"%PDF-1.1\r\n\
%\xe2\xe3\xcf\xd3\n\
1 0 obj\n\
<< /Type /Catalog /Pages 2 0 R >>\n\
endobj\n\
2 0 obj\n\
<< /Type /Pages /Kids [3 0 R] /Count 1 /MediaBox [0 0 612.0 792] >>\n\
endobj\n\
3 0 obj\n\
<< /Type /Page /Parent 2 0 R /Contents 4 0 R >>\n\
endobj\n\
4 0 obj\n\
<< /Length 44 >>\n\
stream\n\
BT /F1 24 Tf 100 700 Td (Hello \\(World\\)) Tj ET\n\
endstream\n\
endobj\n\
xref\n\
0 5\n\
0000000000 65535 f \n\
trailer\n\
<< /Size 5 /Root 1 0 R /ID [<AB12> <ab12>] >>\n\
startxref\n\
400\n\
%%EOF\n";

fn collect_tokens(data: &[u8]) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    for item in Scanner::new("test", data) {
        tokens.push(item.expect("tokenize"));
    }
    tokens
}

fn significant(data: &[u8]) -> Vec<(TokenKind, &str)> {
    collect_tokens(data)
        .into_iter()
        .filter(|t| t.kind != TokenKind::Space)
        .map(|t| (t.kind, std::str::from_utf8(t.value).unwrap()))
        .collect()
}

#[test]
fn test_minimal_document_round_trips() {
    let tokens = collect_tokens(MINIMAL_PDF);
    let joined: Vec<u8> = tokens.iter().flat_map(|t| t.value.iter().copied()).collect();
    assert_eq!(joined, MINIMAL_PDF);

    let last = tokens.last().unwrap();
    assert_eq!(last.kind, TokenKind::Eof);
    assert_eq!(last.pos, MINIMAL_PDF.len());

    for pair in tokens.windows(2) {
        assert_eq!(pair[0].end(), pair[1].pos);
    }
}

#[test]
fn test_minimal_document_structure() {
    let tokens = collect_tokens(MINIMAL_PDF);
    let count = |kind: TokenKind| tokens.iter().filter(|t| t.kind == kind).count();

    assert_eq!(count(TokenKind::Obj), 4);
    assert_eq!(count(TokenKind::EndObj), 4);
    assert_eq!(count(TokenKind::LeftDict), 5);
    assert_eq!(count(TokenKind::RightDict), 5);
    assert_eq!(count(TokenKind::Stream), 1);
    assert_eq!(count(TokenKind::StreamBody), 1);
    assert_eq!(count(TokenKind::EndStream), 1);
    assert_eq!(count(TokenKind::Xref), 1);
    assert_eq!(count(TokenKind::Trailer), 1);
    assert_eq!(count(TokenKind::StartXref), 1);
    assert_eq!(count(TokenKind::HexString), 2);
    assert_eq!(count(TokenKind::Comment), 3);

    let body = tokens
        .iter()
        .find(|t| t.kind == TokenKind::StreamBody)
        .unwrap();
    assert_eq!(
        body.value,
        b"\nBT /F1 24 Tf 100 700 Td (Hello \\(World\\)) Tj ET\n"
    );

    let comments: Vec<&[u8]> = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Comment)
        .map(|t| t.value)
        .collect();
    assert_eq!(comments[0], b"%PDF-1.1");
    assert_eq!(comments[2], b"%%EOF");
}

#[test]
fn test_indirect_object_tokens() {
    assert_eq!(
        significant(b"12 0 obj << /Kids [3 0 R] >> endobj"),
        vec![
            (TokenKind::Number, "12"),
            (TokenKind::Number, "0"),
            (TokenKind::Obj, "obj"),
            (TokenKind::LeftDict, "<<"),
            (TokenKind::Name, "/Kids"),
            (TokenKind::LeftArray, "["),
            (TokenKind::Number, "3"),
            (TokenKind::Number, "0"),
            (TokenKind::Word, "R"),
            (TokenKind::RightArray, "]"),
            (TokenKind::RightDict, ">>"),
            (TokenKind::EndObj, "endobj"),
            (TokenKind::Eof, ""),
        ]
    );
}

#[test]
fn test_delimiters_need_no_whitespace() {
    assert_eq!(
        significant(b"<</A(x)/B<00>/C[true false null]>>"),
        vec![
            (TokenKind::LeftDict, "<<"),
            (TokenKind::Name, "/A"),
            (TokenKind::String, "(x)"),
            (TokenKind::Name, "/B"),
            (TokenKind::HexString, "<00>"),
            (TokenKind::Name, "/C"),
            (TokenKind::LeftArray, "["),
            (TokenKind::True, "true"),
            (TokenKind::False, "false"),
            (TokenKind::Null, "null"),
            (TokenKind::RightArray, "]"),
            (TokenKind::RightDict, ">>"),
            (TokenKind::Eof, ""),
        ]
    );
}

#[test]
fn test_stream_marker_inside_binary_data_ends_body_early() {
    let data = b"stream\n\x00\x01endstream\x02endstream";
    let kinds: Vec<_> = Scanner::new("binary", data)
        .map(|item| item.map(|t| t.kind))
        .collect();
    assert_eq!(
        kinds,
        vec![
            Ok(TokenKind::Stream),
            Ok(TokenKind::StreamBody),
            Ok(TokenKind::EndStream),
            Err(ScanError::IllegalCharacter {
                pos: 18,
                ch: pdflex_core::CodePoint('\u{2}')
            }),
        ]
    );
}

#[test]
fn test_error_is_the_single_terminal_item() {
    let mut scanner = Scanner::new("broken", b"<< /A 1 >> ] /B 2");
    let items: Vec<_> = scanner.by_ref().collect();
    assert_eq!(items.len(), 9);
    assert!(items[..8].iter().all(|item| item.is_ok()));
    assert_eq!(
        items[8],
        Err(ScanError::UnexpectedArrayTerminator { pos: 11 })
    );
    assert!(scanner.is_finished());
    assert_eq!(scanner.next(), None);
}

#[test]
fn test_scan_all_reports_error_and_prefix() {
    let (tokens, err) = scan_all("prefix", b"1 0 obj <ABCD");
    assert_eq!(err, Some(ScanError::UnterminatedHexString { pos: 8 }));
    assert!(tokens.iter().all(|t| t.kind != TokenKind::HexString));
    assert_eq!(tokens.last().unwrap().end(), 8);
}

#[test]
fn test_line_number_tracks_last_item() {
    let data = b"%PDF-1.7\n1 0 obj\n<< /A 1 >>\n]";
    let mut scanner = Scanner::new("lines.pdf", data);
    let mut failed_on = None;
    while let Some(item) = scanner.next() {
        if item.is_err() {
            failed_on = Some(scanner.line_number());
        }
    }
    assert_eq!(scanner.name(), "lines.pdf");
    assert_eq!(failed_on, Some(4));
    assert_eq!(scanner.pos(), data.len());
}

#[test]
fn test_unicode_words_and_whitespace() {
    // NBSP separates, letters beyond ASCII form words.
    let data = "abc\u{a0}ÿes".as_bytes();
    let tokens = collect_tokens(data);
    assert_eq!(tokens[0].kind, TokenKind::Word);
    assert_eq!(tokens[1].kind, TokenKind::Space);
    assert_eq!(tokens[1].value, "\u{a0}".as_bytes());
    assert_eq!(tokens[2].kind, TokenKind::Word);
    assert_eq!(tokens[2].text(), "ÿes");
}
