//! Integration tests for the public API

use seqpad::prelude::*;
use seqpad::{evaluate, evaluate_with_config};

#[test]
fn test_evaluate_simple_exchange() {
    let image = evaluate("diagram { alice -> bob; }").unwrap();
    assert_eq!(image.format(), ImageFormat::Png);
    assert_eq!(&image.data()[..8], &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n']);
}

#[test]
fn test_evaluate_text_format() {
    let config = RenderConfig::new(ImageFormat::Text, false);
    let image = evaluate_with_config("diagram { alice -> bob [label = \"hi\"]; }", config).unwrap();
    let text = image.as_text().unwrap();
    assert!(text.contains("alice"));
    assert!(text.contains("bob"));
    assert!(text.contains("hi"));
}

#[test]
fn test_evaluate_seqdiag_keyword() {
    let config = RenderConfig::new(ImageFormat::Text, false);
    let image = evaluate_with_config("seqdiag { a -> b; }", config).unwrap();
    assert!(image.as_text().unwrap().contains('b'));
}

#[test]
fn test_evaluate_chain_declares_every_actor() {
    let diagram = compile("diagram { a -> b -> c; }").unwrap();
    assert_eq!(diagram.actor_count(), 3);
    assert_eq!(diagram.exchange_count(), 2);
}

#[test]
fn test_evaluate_parse_error_has_position() {
    let err = evaluate("diagram {\n  a -> ;\n}").unwrap_err();
    match err {
        DiagramError::Parse { line, .. } => assert_eq!(line, 2),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn test_evaluate_empty_input_is_parse_error() {
    assert!(evaluate("").unwrap_err().is_parse());
}

#[test]
fn test_evaluate_dotted_return_arrow() {
    let diagram = compile("diagram { a -> b; a <-- b; }").unwrap();
    let exchanges = diagram.exchanges();
    assert_eq!(exchanges[0].line, LineStyle::Solid);
    assert_eq!(exchanges[1].line, LineStyle::Dotted);
    // <-- runs from b back to a
    assert_eq!(exchanges[1].from, "b");
    assert_eq!(exchanges[1].to, "a");
}

#[test]
fn test_evaluate_comments_ignored() {
    let source = "diagram {\n  // web traffic\n  a -> b; # inline note\n}";
    let diagram = compile(source).unwrap();
    assert_eq!(diagram.exchange_count(), 1);
}

#[test]
fn test_evaluate_deterministic_across_calls() {
    let source = "diagram { a -> b [label = \"x\"]; b <-- a; }";
    assert_eq!(evaluate(source).unwrap(), evaluate(source).unwrap());
}

#[test]
fn test_renderer_rejects_bad_font_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("font.bin");
    std::fs::write(&path, [0u8; 17]).unwrap();

    let config = RenderConfig::default().with_font_path(&path);
    assert!(DiagramRenderer::with_config(config).is_err());
}

#[test]
fn test_renderer_accepts_valid_font_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("font.bin");
    std::fs::write(&path, [0u8; 480]).unwrap();

    let config = RenderConfig::default().with_font_path(&path);
    let renderer = DiagramRenderer::with_config(config).unwrap();
    let diagram = compile("diagram { a -> b; }").unwrap();
    assert!(!renderer.render(&diagram).unwrap().is_empty());
}
