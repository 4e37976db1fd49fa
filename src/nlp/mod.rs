//! Linguistic annotation handle
//!
//! Stylometer delegates tokenization, sentence segmentation, and
//! part-of-speech tagging to an annotator handle that is built once at
//! startup and shared read-only across workers. The built-in annotator
//! is a deterministic rule tagger: closed-class lexicon lookup first,
//! then suffix heuristics, defaulting to NOUN.

mod lexicon;

use std::ops::Range;

/// Coarse part-of-speech tags (UD-style inventory).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PosTag {
    Noun,
    Propn,
    Verb,
    Aux,
    Adj,
    Adv,
    Pron,
    Det,
    Adp,
    Cconj,
    Sconj,
    Part,
    Intj,
    Num,
    Punct,
    Other,
}

impl PosTag {
    /// Content tags counted by lexical density: NOUN, VERB, ADJ, ADV.
    pub fn is_content(self) -> bool {
        matches!(self, PosTag::Noun | PosTag::Verb | PosTag::Adj | PosTag::Adv)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PosTag::Noun => "NOUN",
            PosTag::Propn => "PROPN",
            PosTag::Verb => "VERB",
            PosTag::Aux => "AUX",
            PosTag::Adj => "ADJ",
            PosTag::Adv => "ADV",
            PosTag::Pron => "PRON",
            PosTag::Det => "DET",
            PosTag::Adp => "ADP",
            PosTag::Cconj => "CCONJ",
            PosTag::Sconj => "SCONJ",
            PosTag::Part => "PART",
            PosTag::Intj => "INTJ",
            PosTag::Num => "NUM",
            PosTag::Punct => "PUNCT",
            PosTag::Other => "X",
        }
    }
}

/// One annotated token.
#[derive(Debug, Clone)]
pub struct Token {
    /// Surface form as it appeared in the text
    pub text: String,
    /// Lowercased form
    pub lower: String,
    /// True when every character is alphabetic
    pub is_alpha: bool,
    pub pos: PosTag,
}

/// Annotation result: tokens plus sentence spans over the token slice.
#[derive(Debug, Clone, Default)]
pub struct AnnotatedText {
    pub tokens: Vec<Token>,
    /// Half-open token index ranges, one per sentence, in text order
    pub sentences: Vec<Range<usize>>,
}

impl AnnotatedText {
    /// Per-sentence token counts (all tokens, punctuation included).
    pub fn sentence_lengths(&self) -> Vec<usize> {
        self.sentences.iter().map(|s| s.end - s.start).collect()
    }

    /// Iterator over alphabetic tokens only.
    pub fn alpha_tokens(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter().filter(|t| t.is_alpha)
    }
}

/// The annotator handle. Construction builds the closed-class lexicon;
/// `annotate` is a pure function of the input text afterwards.
pub struct Annotator {
    lexicon: lexicon::Lexicon,
}

impl Default for Annotator {
    fn default() -> Self {
        Self::new()
    }
}

impl Annotator {
    pub fn new() -> Self {
        Self {
            lexicon: lexicon::Lexicon::new(),
        }
    }

    /// Tokenize, segment into sentences, and POS-tag `text`.
    pub fn annotate(&self, text: &str) -> AnnotatedText {
        let mut tokens = raw_tokens(text);
        let sentences = segment_sentences(&tokens);

        // Tagging needs sentence position: a capitalized word that is not
        // sentence-initial is treated as a proper noun.
        for sent in &sentences {
            for idx in sent.clone() {
                let sentence_initial = idx == sent.start;
                let tag = self.tag_token(&tokens[idx], sentence_initial);
                tokens[idx].pos = tag;
            }
        }

        AnnotatedText { tokens, sentences }
    }

    fn tag_token(&self, token: &Token, sentence_initial: bool) -> PosTag {
        if !token.is_alpha {
            return token.pos; // NUM / PUNCT / X assigned during tokenization
        }
        if let Some(tag) = self.lexicon.lookup(&token.lower) {
            return tag;
        }
        let mut chars = token.text.chars();
        let capitalized = chars.next().is_some_and(|c| c.is_uppercase());
        if capitalized && !sentence_initial {
            return PosTag::Propn;
        }
        lexicon::suffix_tag(&token.lower)
    }
}

/// Split text into word, number, and punctuation tokens.
fn raw_tokens(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else if c.is_alphabetic() {
            let mut word = String::new();
            while let Some(&c) = chars.peek() {
                if c.is_alphabetic() {
                    word.push(c);
                    chars.next();
                } else {
                    break;
                }
            }
            let lower = word.to_lowercase();
            tokens.push(Token {
                text: word,
                lower,
                is_alpha: true,
                pos: PosTag::Other,
            });
        } else if c.is_ascii_digit() {
            let mut num = String::new();
            while let Some(&c) = chars.peek() {
                if c.is_ascii_digit() || (c == '.' && num.chars().last().is_some_and(|p| p.is_ascii_digit())) {
                    num.push(c);
                    chars.next();
                } else {
                    break;
                }
            }
            let lower = num.clone();
            tokens.push(Token {
                text: num,
                lower,
                is_alpha: false,
                pos: PosTag::Num,
            });
        } else {
            chars.next();
            let s = c.to_string();
            let pos = if c.is_ascii_punctuation() || is_unicode_punct(c) {
                PosTag::Punct
            } else {
                PosTag::Other
            };
            tokens.push(Token {
                text: s.clone(),
                lower: s,
                is_alpha: false,
                pos,
            });
        }
    }

    tokens
}

fn is_unicode_punct(c: char) -> bool {
    matches!(c, '\u{2018}'..='\u{201F}' | '\u{2013}' | '\u{2014}' | '\u{2026}')
}

/// A sentence closes after a run of terminator tokens (. ! ?).
/// Trailing tokens without a terminator still form a final sentence.
fn segment_sentences(tokens: &[Token]) -> Vec<Range<usize>> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < tokens.len() {
        if is_terminator(&tokens[i]) {
            // Swallow consecutive terminators ("?!", "...") into one boundary
            while i + 1 < tokens.len() && is_terminator(&tokens[i + 1]) {
                i += 1;
            }
            sentences.push(start..i + 1);
            start = i + 1;
        }
        i += 1;
    }
    if start < tokens.len() {
        sentences.push(start..tokens.len());
    }

    sentences
}

fn is_terminator(token: &Token) -> bool {
    matches!(token.text.as_str(), "." | "!" | "?")
}
