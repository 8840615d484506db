/// A run of multi-line record text, split into paragraphs and bullet lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextBlock<'a> {
    Paragraph(&'a str),
    Bullets(Vec<&'a str>),
}

const BULLET_MARKERS: [char; 3] = ['-', '*', '•'];

/// Consecutive lines starting with a bullet marker become one list; blank
/// lines are dropped.
pub fn split_bullets(text: &str) -> Vec<TextBlock<'_>> {
    let mut blocks = Vec::new();

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match line.strip_prefix(BULLET_MARKERS) {
            Some(item) => {
                let item = item.trim_start();
                match blocks.last_mut() {
                    Some(TextBlock::Bullets(items)) => items.push(item),
                    _ => blocks.push(TextBlock::Bullets(vec![item])),
                }
            }
            None => blocks.push(TextBlock::Paragraph(line)),
        }
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_paragraphs_and_bullets() {
        let text = "Led the payments migration.\n- Cut p99 latency by 40%\n• Removed 3 legacy services\n\nOn-call lead.";
        assert_eq!(
            split_bullets(text),
            vec![
                TextBlock::Paragraph("Led the payments migration."),
                TextBlock::Bullets(vec!["Cut p99 latency by 40%", "Removed 3 legacy services"]),
                TextBlock::Paragraph("On-call lead."),
            ]
        );
    }

    #[test]
    fn test_blank_text_has_no_blocks() {
        assert!(split_bullets("  \n\n ").is_empty());
    }
}
