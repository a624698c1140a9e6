use super::*;

fn texts<'a>(pieces: &[MessagePiece<'a>]) -> Vec<&'a str> {
    pieces.iter().filter_map(MessagePiece::as_text).collect()
}

/// Rebuild the message from piece ranges, letting only dropped blank runs fill gaps.
fn assert_pieces_cover(message: &str) {
    let pieces = split_message(message);
    let mut cursor = 0;
    for piece in &pieces {
        let range = piece.range();
        let gap = &message[cursor..range.start];
        assert!(
            gap.is_empty() || gap == "\n",
            "unexpected gap {gap:?} before {range:?} in {message:?}"
        );
        if let MessagePiece::Text(run) = piece {
            assert_eq!(run.text, &message[range.clone()]);
        }
        cursor = range.end;
    }
    let tail = &message[cursor..];
    assert!(tail.is_empty() || tail == "\n", "unexpected tail {tail:?}");
}

#[test]
fn single_python_block() {
    let blocks = extract_code_blocks("```py\ndef f():\n    return 1\n```");
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].language, "py");
    assert_eq!(blocks[0].code, "def f():\n    return 1");
    assert!(blocks[0].has_language());
    assert_eq!(blocks[0].line_count(), 2);

    let pieces = split_message("```py\ndef f():\n    return 1\n```");
    assert_eq!(pieces.len(), 1);
    assert!(pieces[0].as_code().is_some());
}

#[test]
fn message_without_fences_is_one_run() {
    let message = "Just some prose.\nWith two lines.";
    assert!(extract_code_blocks(message).is_empty());
    let pieces = split_message(message);
    assert_eq!(texts(&pieces), vec![message]);
    assert_eq!(pieces[0].range(), 0..message.len());

    let empty = split_message("");
    assert_eq!(texts(&empty), vec![""]);
}

#[test]
fn prose_and_code_keep_document_order() {
    let message = "Here:\n```rust\nfn main() {}\n```\nDone.";
    let pieces = split_message(message);
    assert_eq!(pieces.len(), 3);
    assert_eq!(pieces[0].as_text(), Some("Here:\n"));
    let block = pieces[1].as_code().expect("code block");
    assert_eq!(block.language, "rust");
    assert_eq!(block.code, "fn main() {}");
    assert_eq!(&message[block.range.clone()], "```rust\nfn main() {}\n```");
    assert_eq!(&message[block.body_range.clone()], "fn main() {}\n");
    assert_eq!(pieces[2].as_text(), Some("\nDone."));
}

#[test]
fn missing_tag_means_plaintext() {
    let blocks = extract_code_blocks("```\nls -la\n```");
    assert_eq!(blocks[0].language, PLAINTEXT_LANGUAGE);
    assert!(!blocks[0].has_language());
}

#[test]
fn tags_are_lower_cased() {
    let blocks = extract_code_blocks("```Python\nprint(1)\n```");
    assert_eq!(blocks[0].language, "python");
}

#[test]
fn unterminated_fence_stays_in_prose() {
    let message = "intro\n```py\nprint(1)\n";
    let pieces = split_message(message);
    assert_eq!(texts(&pieces), vec![message]);
    assert!(extract_code_blocks(message).is_empty());
}

#[test]
fn unterminated_fence_after_a_complete_block() {
    let message = "```a\nx\n```\ntext\n```b\ny";
    let pieces = split_message(message);
    assert_eq!(pieces.len(), 2);
    assert_eq!(pieces[0].as_code().map(|b| b.code.as_str()), Some("x"));
    assert_eq!(pieces[1].as_text(), Some("\ntext\n```b\ny"));
}

#[test]
fn lone_newline_between_blocks_is_dropped() {
    let message = "```a\n1\n```\n```b\n2\n```";
    let pieces = split_message(message);
    assert_eq!(pieces.len(), 2);
    let blocks = extract_code_blocks(message);
    assert_eq!(
        blocks.iter().map(|b| (b.index, b.language.as_str())).collect::<Vec<_>>(),
        vec![(0, "a"), (1, "b")]
    );
    assert_pieces_cover(message);
}

#[test]
fn mid_line_backticks_do_not_open_a_block() {
    let message = "use ```x``` inline";
    assert_eq!(texts(&split_message(message)), vec![message]);
}

#[test]
fn empty_body_yields_empty_code() {
    let blocks = extract_code_blocks("```\n```");
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].code, "");
    assert_eq!(blocks[0].line_count(), 0);
}

#[test]
fn first_fence_after_the_newline_closes_the_block() {
    let message = "```md\na ``` b\n```";
    let pieces = split_message(message);
    assert_eq!(pieces[0].as_code().map(|b| b.code.as_str()), Some("a"));
    assert_eq!(pieces[1].as_text(), Some(" b\n```"));
}

#[test]
fn only_trailing_whitespace_is_trimmed() {
    let blocks = extract_code_blocks("```py\n\n  x = 1  \n\n```");
    assert_eq!(blocks[0].code, "\n  x = 1");

    let crlf = extract_code_blocks("```py\r\nx = 1\r\n```");
    assert_eq!(crlf[0].language, "py");
    assert_eq!(crlf[0].code, "x = 1");
}

#[test]
fn ranges_respect_multibyte_text() {
    let message = "héllo ✓\n```rs\nlet s = \"é\";\n```\nfin ✓";
    let pieces = split_message(message);
    assert_eq!(pieces.len(), 3);
    assert_eq!(pieces[0].as_text(), Some("héllo ✓\n"));
    assert_eq!(pieces[1].as_code().map(|b| b.code.as_str()), Some("let s = \"é\";"));
    assert_pieces_cover(message);
}

#[test]
fn fences_reinserted_reconstruct_the_message() {
    let message = "Intro\n```js\nconst a = 1;\n```\nMiddle\n```\nraw\n```\nOutro";
    let mut rebuilt = String::new();
    for piece in split_message(message) {
        match piece {
            MessagePiece::Text(run) => rebuilt.push_str(run.text),
            MessagePiece::Code(block) => {
                let tag = if block.has_language() { block.language.as_str() } else { "" };
                rebuilt.push_str(&format!("```{tag}\n{}\n```", block.code));
            }
        }
    }
    assert_eq!(rebuilt, message);
}

#[test]
fn extraction_agrees_with_split() {
    let messages = [
        "",
        "plain",
        "```\n```",
        "a\n```x\n1\n```\nb\n```y\n2\n```\n",
        "```a\nx\n```\ntext\n```b\ny",
        "```md\na ``` b\n```",
    ];
    for message in messages {
        let from_split: Vec<CodeBlock> = split_message(message)
            .iter()
            .filter_map(MessagePiece::as_code)
            .cloned()
            .collect();
        assert_eq!(extract_code_blocks(message), from_split);
        for (i, block) in from_split.iter().enumerate() {
            assert_eq!(block.index, i);
        }
        assert_pieces_cover(message);
    }
}
