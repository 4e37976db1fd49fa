//! Closed-class lexicon and suffix heuristics for the rule tagger.

use super::PosTag;
use std::collections::HashMap;

const DETERMINERS: &[&str] = &[
    "the", "a", "an", "this", "that", "these", "those", "each", "every", "either", "neither",
    "some", "any", "no", "another", "such", "all", "both",
];

const PRONOUNS: &[&str] = &[
    "i", "you", "he", "she", "it", "we", "they", "me", "him", "her", "us", "them", "my", "your",
    "his", "its", "our", "their", "mine", "yours", "hers", "ours", "theirs", "myself", "yourself",
    "himself", "herself", "itself", "ourselves", "themselves", "who", "whom", "whose", "which",
    "what", "something", "anything", "nothing", "everything", "someone", "anyone", "everyone",
    "nobody", "one",
];

const ADPOSITIONS: &[&str] = &[
    "in", "on", "at", "by", "for", "with", "about", "against", "between", "into", "through",
    "during", "before", "after", "above", "below", "from", "up", "down", "of", "off", "over",
    "under", "near", "since", "until", "among", "within", "without", "along", "across", "behind",
    "beyond", "toward", "towards", "upon", "out", "around", "past",
];

const COORDINATORS: &[&str] = &["and", "but", "or", "nor", "yet", "so"];

const SUBORDINATORS: &[&str] = &[
    "if", "because", "while", "although", "though", "unless", "whereas", "whether", "once",
    "when", "where", "as",
];

const AUXILIARIES: &[&str] = &[
    "am", "is", "are", "was", "were", "be", "been", "being", "do", "does", "did", "have", "has",
    "had", "having", "will", "would", "shall", "should", "may", "might", "must", "can", "could",
];

const PARTICLES: &[&str] = &["to", "not"];

const ADVERBS: &[&str] = &[
    "very", "too", "also", "just", "now", "then", "here", "there", "always", "never", "often",
    "sometimes", "again", "soon", "still", "already", "perhaps", "maybe", "quite", "rather",
    "almost", "even", "only", "well", "more", "most", "less", "least", "far", "away", "back",
    "however", "instead", "together", "else", "ever", "yesterday", "tomorrow",
];

const INTERJECTIONS: &[&str] = &["oh", "yes", "hey", "wow", "hello", "hi", "ah", "hmm", "ouch"];

// Irregular and very common verbs the suffix rules cannot reach
const VERBS: &[&str] = &[
    "sit", "sits", "sat", "run", "runs", "ran", "say", "says", "said", "go", "goes", "went",
    "gone", "get", "gets", "got", "make", "makes", "made", "know", "knows", "knew", "known",
    "think", "thinks", "thought", "take", "takes", "took", "taken", "see", "sees", "saw", "seen",
    "come", "comes", "came", "want", "wants", "look", "looks", "use", "uses", "find", "finds",
    "found", "give", "gives", "gave", "given", "tell", "tells", "told", "work", "works", "call",
    "calls", "try", "tries", "ask", "asks", "need", "needs", "feel", "feels", "felt", "become",
    "becomes", "became", "leave", "leaves", "left", "put", "puts", "mean", "means", "meant",
    "keep", "keeps", "kept", "let", "lets", "begin", "begins", "began", "begun", "seem", "seems",
    "help", "helps", "show", "shows", "shown", "hear", "hears", "heard", "play", "plays", "move",
    "moves", "live", "lives", "believe", "bring", "brings", "brought", "happen", "happens",
    "write", "writes", "wrote", "written", "read", "reads", "eat", "eats", "ate", "eaten",
    "walk", "walks", "speak", "speaks", "spoke", "spoken", "stand", "stands", "stood", "fall",
    "falls", "fell", "fallen", "buy", "buys", "bought", "send", "sends", "sent", "build",
    "builds", "built", "grow", "grows", "grew", "grown", "win", "wins", "won", "lose", "loses",
    "lost", "meet", "meets", "met", "pay", "pays", "paid", "hold", "holds", "held",
];

pub struct Lexicon {
    entries: HashMap<&'static str, PosTag>,
}

impl Lexicon {
    pub fn new() -> Self {
        let groups: &[(&[&str], PosTag)] = &[
            (DETERMINERS, PosTag::Det),
            (PRONOUNS, PosTag::Pron),
            (ADPOSITIONS, PosTag::Adp),
            (COORDINATORS, PosTag::Cconj),
            (SUBORDINATORS, PosTag::Sconj),
            (AUXILIARIES, PosTag::Aux),
            (PARTICLES, PosTag::Part),
            (ADVERBS, PosTag::Adv),
            (INTERJECTIONS, PosTag::Intj),
            (VERBS, PosTag::Verb),
        ];

        let mut entries = HashMap::new();
        for (words, tag) in groups {
            for w in *words {
                entries.insert(*w, *tag);
            }
        }
        Self { entries }
    }

    pub fn lookup(&self, lower: &str) -> Option<PosTag> {
        self.entries.get(lower).copied()
    }
}

/// Suffix heuristics for open-class words, checked longest-first.
/// Falls back to NOUN, the most frequent open class.
pub fn suffix_tag(lower: &str) -> PosTag {
    const NOUN_SUFFIXES: &[&str] = &[
        "tion", "sion", "ness", "ment", "ance", "ence", "ship", "hood", "ity", "ism",
    ];
    const ADJ_SUFFIXES: &[&str] = &[
        "ous", "ful", "ive", "less", "able", "ible", "ish", "ical",
    ];
    const VERB_SUFFIXES: &[&str] = &["ize", "ise", "ify"];

    if lower.len() > 3 && lower.ends_with("ly") {
        return PosTag::Adv;
    }
    for s in NOUN_SUFFIXES {
        if lower.len() > s.len() + 1 && lower.ends_with(s) {
            return PosTag::Noun;
        }
    }
    for s in ADJ_SUFFIXES {
        if lower.len() > s.len() + 1 && lower.ends_with(s) {
            return PosTag::Adj;
        }
    }
    for s in VERB_SUFFIXES {
        if lower.len() > s.len() + 1 && lower.ends_with(s) {
            return PosTag::Verb;
        }
    }
    // Inflectional endings last so derived nominals above win
    if lower.len() > 4 && (lower.ends_with("ing") || lower.ends_with("ed")) {
        return PosTag::Verb;
    }
    PosTag::Noun
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_closed_classes() {
        let lex = Lexicon::new();
        assert_eq!(lex.lookup("the"), Some(PosTag::Det));
        assert_eq!(lex.lookup("and"), Some(PosTag::Cconj));
        assert_eq!(lex.lookup("was"), Some(PosTag::Aux));
        assert_eq!(lex.lookup("sat"), Some(PosTag::Verb));
        assert_eq!(lex.lookup("zebra"), None);
    }

    #[test]
    fn test_suffixes() {
        assert_eq!(suffix_tag("slowly"), PosTag::Adv);
        assert_eq!(suffix_tag("movement"), PosTag::Noun);
        assert_eq!(suffix_tag("famous"), PosTag::Adj);
        assert_eq!(suffix_tag("simplify"), PosTag::Verb);
        assert_eq!(suffix_tag("jumping"), PosTag::Verb);
        assert_eq!(suffix_tag("cat"), PosTag::Noun);
    }

    #[test]
    fn test_short_words_not_suffix_matched() {
        // "ly" alone or two-letter words must not hit the adverb rule
        assert_eq!(suffix_tag("ly"), PosTag::Noun);
        assert_eq!(suffix_tag("ed"), PosTag::Noun);
    }
}
