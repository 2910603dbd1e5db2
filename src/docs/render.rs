use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

/// Flattens markdown into plain lines no wider than `width` characters.
pub fn render_lines(markdown: &str, width: usize) -> Vec<String> {
    let width = width.max(8);
    let mut raw_lines: Vec<String> = Vec::new();
    let mut line = String::new();
    let mut list_stack: Vec<Option<u64>> = Vec::new();
    let mut in_code_block = false;
    let mut image_dest: Option<String> = None;

    let flush = |line: &mut String, raw_lines: &mut Vec<String>| {
        if !line.is_empty() {
            raw_lines.push(std::mem::take(line));
        }
    };

    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    for event in Parser::new_ext(markdown, options) {
        if in_code_block {
            match event {
                Event::End(TagEnd::CodeBlock) => {
                    in_code_block = false;
                    raw_lines.push(String::new());
                }
                Event::Text(t) => {
                    for code_line in t.lines() {
                        raw_lines.push(format!("    {}", code_line));
                    }
                }
                _ => {}
            }
            continue;
        }

        match event {
            Event::Start(tag) => match tag {
                Tag::Heading { level, .. } => {
                    flush(&mut line, &mut raw_lines);
                    let depth = level as usize;
                    line.push_str(&"#".repeat(depth));
                    line.push(' ');
                }
                Tag::List(start) => {
                    flush(&mut line, &mut raw_lines);
                    list_stack.push(start);
                }
                Tag::Item => {
                    flush(&mut line, &mut raw_lines);
                    let indent = "  ".repeat(list_stack.len().saturating_sub(1));
                    line.push_str(&indent);
                    match list_stack.last_mut() {
                        Some(Some(n)) => {
                            line.push_str(&format!("{}. ", n));
                            *n += 1;
                        }
                        _ => line.push_str("- "),
                    }
                }
                Tag::CodeBlock(_) => {
                    flush(&mut line, &mut raw_lines);
                    in_code_block = true;
                }
                Tag::Image { dest_url, .. } => {
                    image_dest = Some(dest_url.to_string());
                    line.push_str("[image: ");
                }
                _ => {}
            },
            Event::End(tag_end) => match tag_end {
                TagEnd::Paragraph | TagEnd::Heading(_) => {
                    flush(&mut line, &mut raw_lines);
                    raw_lines.push(String::new());
                }
                TagEnd::List(_) => {
                    flush(&mut line, &mut raw_lines);
                    list_stack.pop();
                    if list_stack.is_empty() {
                        raw_lines.push(String::new());
                    }
                }
                TagEnd::Item => flush(&mut line, &mut raw_lines),
                TagEnd::Image => {
                    let dest = image_dest.take().unwrap_or_default();
                    line.push_str(&format!(" <{}>]", dest));
                }
                _ => {}
            },
            Event::Text(t) | Event::Code(t) => line.push_str(&t),
            Event::SoftBreak => line.push(' '),
            Event::HardBreak => flush(&mut line, &mut raw_lines),
            Event::Rule => {
                flush(&mut line, &mut raw_lines);
                raw_lines.push("-".repeat(width.min(48)));
            }
            _ => {}
        }
    }
    flush(&mut line, &mut raw_lines);

    while raw_lines.last().is_some_and(|l| l.is_empty()) {
        raw_lines.pop();
    }

    raw_lines
        .into_iter()
        .flat_map(|l| wrap(&l, width))
        .collect()
}

fn wrap(line: &str, width: usize) -> Vec<String> {
    if line.chars().count() <= width {
        return vec![line.to_string()];
    }

    let indent: String = line.chars().take_while(|c| *c == ' ').collect();
    let mut out = Vec::new();
    let mut cur = String::new();
    for word in line.split_whitespace() {
        let cur_len = cur.chars().count();
        let word_len = word.chars().count();
        if cur_len > 0 && cur_len + 1 + word_len > width {
            out.push(std::mem::take(&mut cur));
        }
        if cur.is_empty() {
            if out.is_empty() {
                cur.push_str(&indent);
            } else {
                cur.push_str(&indent);
                cur.push_str("  ");
            }
        } else {
            cur.push(' ');
        }
        // Words longer than a line are hard-split.
        let mut rest: &str = word;
        while cur.chars().count() + rest.chars().count() > width && !rest.is_empty() {
            let room = width.saturating_sub(cur.chars().count()).max(1);
            let split = rest
                .char_indices()
                .nth(room)
                .map(|(i, _)| i)
                .unwrap_or(rest.len());
            cur.push_str(&rest[..split]);
            rest = &rest[split..];
            if !rest.is_empty() {
                out.push(std::mem::take(&mut cur));
            }
        }
        cur.push_str(rest);
    }
    if !cur.trim().is_empty() {
        out.push(cur);
    }
    out
}
