//! Message tokenization for the caption.
//!
//! The source string is split on whitespace. A piece whose characters
//! are all symbolic (emoji and friends) becomes one tightly-spaced
//! symbol cluster; consecutive symbolic pieces merge into a single
//! cluster. Ordinary word pieces explode into individually spaced
//! character glyphs.

/// Whether `ch` counts as ordinary text rather than a symbol.
/// Alphanumerics cover accented and non-Latin letters too.
pub fn is_text_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch.is_whitespace() || matches!(ch, '.' | ',' | '!' | '?' | '-')
}

/// A whitespace-delimited piece of the source string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Word(String),
    SymbolCluster(String),
}

/// One visual element of the caption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glyph {
    pub text: String,
    pub kind: GlyphKind,
    /// True when a word gap precedes this glyph (the host renders the
    /// spacing; the core only flags it).
    pub gap_before: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlyphKind {
    /// A single character of a word, individually spaced.
    Char,
    /// A merged run of symbols, rendered as one tight group.
    Cluster,
}

/// Split `text` into word and symbol-cluster tokens, merging adjacent
/// symbolic pieces.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens: Vec<Token> = Vec::new();
    for piece in text.split_whitespace() {
        let symbolic = piece.chars().all(|ch| !is_text_char(ch));
        if symbolic {
            if let Some(Token::SymbolCluster(prev)) = tokens.last_mut() {
                prev.push_str(piece);
                continue;
            }
            tokens.push(Token::SymbolCluster(piece.to_string()));
        } else {
            tokens.push(Token::Word(piece.to_string()));
        }
    }
    tokens
}

/// Flatten tokens into the ordered glyph sequence the caption reveals.
pub fn glyphs(text: &str) -> Vec<Glyph> {
    let mut out: Vec<Glyph> = Vec::new();
    for token in tokenize(text) {
        match token {
            Token::Word(word) => {
                let mut gap = !out.is_empty();
                for ch in word.chars() {
                    out.push(Glyph {
                        text: ch.to_string(),
                        kind: GlyphKind::Char,
                        gap_before: gap,
                    });
                    gap = false;
                }
            }
            Token::SymbolCluster(cluster) => {
                out.push(Glyph {
                    text: cluster,
                    kind: GlyphKind::Cluster,
                    gap_before: !out.is_empty(),
                });
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_accented_letters_as_text() {
        for ch in "CanımĞüŞİö".chars() {
            assert!(is_text_char(ch), "{} should be text", ch);
        }
        assert!(is_text_char('-'));
        assert!(is_text_char('!'));
        assert!(!is_text_char('😊'));
        assert!(!is_text_char('💖'));
    }

    #[test]
    fn words_and_trailing_cluster() {
        let tokens = tokenize("Canım Arkadaşım Ayşe 😊🥰");
        assert_eq!(
            tokens,
            vec![
                Token::Word("Canım".into()),
                Token::Word("Arkadaşım".into()),
                Token::Word("Ayşe".into()),
                Token::SymbolCluster("😊🥰".into()),
            ]
        );
    }

    #[test]
    fn consecutive_symbol_pieces_merge() {
        let tokens = tokenize("Canım Arkadaşım Ayşe 😊 🥰");
        assert_eq!(
            tokens.last(),
            Some(&Token::SymbolCluster("😊🥰".into())),
            "separate emoji pieces should merge into one cluster"
        );
        assert_eq!(tokens.len(), 4);
    }

    #[test]
    fn mixed_piece_stays_a_word() {
        // A piece with any text character is a word, not a cluster.
        let tokens = tokenize("yay! 😊ok");
        assert_eq!(
            tokens,
            vec![Token::Word("yay!".into()), Token::Word("😊ok".into())]
        );
    }

    #[test]
    fn glyphs_explode_words_keep_clusters_whole() {
        let gs = glyphs("Hi 💖✨");
        let texts: Vec<&str> = gs.iter().map(|g| g.text.as_str()).collect();
        assert_eq!(texts, vec!["H", "i", "💖✨"]);
        assert_eq!(gs[2].kind, GlyphKind::Cluster);
        assert!(!gs[0].gap_before);
        assert!(!gs[1].gap_before);
        assert!(gs[2].gap_before);
    }

    #[test]
    fn default_message_glyph_sequence() {
        let gs = glyphs("Canım arkadaşım 💖✨");
        // 5 + 9 word chars, plus one cluster.
        assert_eq!(gs.len(), 15);
        assert_eq!(gs.last().map(|g| g.text.as_str()), Some("💖✨"));
        let gaps: usize = gs.iter().filter(|g| g.gap_before).count();
        assert_eq!(gaps, 2, "one gap before each later token");
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(tokenize("").is_empty());
        assert!(glyphs("   ").is_empty());
    }
}
