//! Line normalizer for the pseudocode
//!
//! Keyword matching is case- and accent-insensitive, but emitted code must
//! keep the user's identifiers as written. A [`FoldedLine`] pairs the
//! original text with a folded comparison copy and maps positions back.

use std::ops::Range;

/// Fold a single character: lowercase and strip French accents
pub fn fold_char(c: char) -> char {
    let lower = c.to_lowercase().next().unwrap_or(c);
    match lower {
        'à' | 'â' | 'ä' | 'á' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'î' | 'ï' | 'í' => 'i',
        'ô' | 'ö' | 'ó' => 'o',
        'ù' | 'û' | 'ü' | 'ú' => 'u',
        'ç' => 'c',
        'ÿ' => 'y',
        other => other,
    }
}

/// Fold a whole string (see [`fold_char`])
pub fn fold(s: &str) -> String {
    s.chars().map(fold_char).collect()
}

/// Characters that can continue an identifier or keyword
pub fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// ASCII identifier: `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Truncate a line at the first `//` that is not inside a string literal
pub fn strip_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    let mut quote: Option<char> = None;

    for (i, c) in line.char_indices() {
        match quote {
            Some(q) => {
                if c == q {
                    quote = None;
                }
            }
            None => {
                if c == '"' || c == '\'' {
                    quote = Some(c);
                } else if c == '/' && bytes.get(i + 1) == Some(&b'/') {
                    return &line[..i];
                }
            }
        }
    }

    line
}

/// Whether a statement ends with `;`, trailing whitespace allowed
pub fn is_terminated(text: &str) -> bool {
    text.trim_end().ends_with(';')
}

/// Statement text without surrounding whitespace and its final `;`, if any
pub fn statement_body(text: &str) -> &str {
    let text = text.trim();
    text.strip_suffix(';').map_or(text, str::trim_end)
}

/// Per-byte mask that is `true` where `s` holds code, and `false` inside
/// string literals (quotes included) and `//` comments. Literals and
/// comments never extend past the end of a line.
pub fn code_mask(s: &str) -> Vec<bool> {
    mask(s, true)
}

/// Like [`code_mask`], but `//` is ordinary text
pub fn literal_mask(s: &str) -> Vec<bool> {
    mask(s, false)
}

fn mask(s: &str, comments: bool) -> Vec<bool> {
    let bytes = s.as_bytes();
    let mut mask = vec![true; s.len()];
    let mut quote: Option<char> = None;
    let mut in_comment = false;

    for (i, c) in s.char_indices() {
        let width = c.len_utf8();
        if c == '\n' {
            quote = None;
            in_comment = false;
            continue;
        }

        let is_code = if in_comment {
            false
        } else if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            false
        } else if c == '"' || c == '\'' {
            quote = Some(c);
            false
        } else if comments && c == '/' && bytes.get(i + 1) == Some(&b'/') {
            in_comment = true;
            false
        } else {
            true
        };

        if !is_code {
            mask[i..i + width].iter_mut().for_each(|m| *m = false);
        }
    }

    mask
}

/// How a pattern must sit in the text to count as a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Match {
    /// Plain substring
    Text,
    /// Substring not touching identifier characters on either side
    Word,
}

/// A whitespace-separated word of a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word<'a> {
    /// Folded spelling, for comparisons
    pub folded: &'a str,
    /// Byte range in the original line
    pub range: Range<usize>,
}

/// A source line together with its folded comparison copy
#[derive(Debug, Clone)]
pub struct FoldedLine<'src> {
    original: &'src str,
    folded: String,
    /// Original byte offset for every folded byte, plus one past the end
    offsets: Vec<usize>,
}

impl<'src> FoldedLine<'src> {
    pub fn new(original: &'src str) -> Self {
        let mut folded = String::with_capacity(original.len());
        let mut offsets = Vec::with_capacity(original.len() + 1);

        for (i, c) in original.char_indices() {
            let f = fold_char(c);
            offsets.extend(std::iter::repeat(i).take(f.len_utf8()));
            folded.push(f);
        }
        offsets.push(original.len());

        Self {
            original,
            folded,
            offsets,
        }
    }

    pub fn original(&self) -> &'src str {
        self.original
    }

    pub fn folded(&self) -> &str {
        &self.folded
    }

    /// Map a folded byte position (a char boundary) to the original text
    pub fn to_original(&self, folded_pos: usize) -> usize {
        self.offsets[folded_pos.min(self.folded.len())]
    }

    /// Original text covered by a folded byte range
    pub fn slice(&self, folded: Range<usize>) -> &'src str {
        &self.original[self.to_original(folded.start)..self.to_original(folded.end)]
    }

    /// Original text from a folded position to the end of the line
    pub fn slice_from(&self, folded_start: usize) -> &'src str {
        &self.original[self.to_original(folded_start)..]
    }

    /// Folded positions of every occurrence of `pattern` in code regions
    pub fn find_all_folded(&self, pattern: &str, mode: Match) -> Vec<usize> {
        self.find_masked(pattern, mode, &code_mask(&self.folded))
    }

    fn find_masked(&self, pattern: &str, mode: Match, mask: &[bool]) -> Vec<usize> {
        if pattern.is_empty() {
            return Vec::new();
        }
        self.folded
            .match_indices(pattern)
            .map(|(start, _)| start)
            .filter(|&start| mask[start] && mask[start + pattern.len() - 1])
            .filter(|&start| mode == Match::Text || self.is_word_at(start, start + pattern.len()))
            .collect()
    }

    /// Folded ranges running from `name` through the `(` of every call to
    /// `name`. Whitespace may separate the two; string literals are skipped.
    pub fn find_calls(&self, name: &str) -> Vec<Range<usize>> {
        self.find_masked(name, Match::Word, &literal_mask(&self.folded))
            .into_iter()
            .filter_map(|start| {
                let after = start + name.len();
                let rest = &self.folded[after..];
                let gap = rest.len() - rest.trim_start().len();
                rest[gap..].starts_with('(').then_some(start..after + gap + 1)
            })
            .collect()
    }

    /// Original byte ranges of every occurrence of `pattern` in code regions
    pub fn find_all(&self, pattern: &str, mode: Match) -> Vec<Range<usize>> {
        self.find_all_folded(pattern, mode)
            .into_iter()
            .map(|start| self.to_original(start)..self.to_original(start + pattern.len()))
            .collect()
    }

    /// First folded position of `word` as a whole word in code regions
    pub fn find_word(&self, word: &str) -> Option<usize> {
        self.find_all_folded(word, Match::Word).first().copied()
    }

    pub fn contains_word(&self, word: &str) -> bool {
        self.find_word(word).is_some()
    }

    /// Whether the folded line begins with `word` followed by a non-identifier character
    pub fn starts_with_word(&self, word: &str) -> bool {
        self.folded.starts_with(word) && self.is_word_at(0, word.len())
    }

    fn is_word_at(&self, start: usize, end: usize) -> bool {
        let before = self.folded[..start].chars().next_back();
        let after = self.folded[end..].chars().next();
        !before.is_some_and(is_ident_char) && !after.is_some_and(is_ident_char)
    }

    /// Split into whitespace-separated words
    pub fn words(&self) -> Vec<Word<'_>> {
        let mut words = Vec::new();
        let mut start: Option<usize> = None;

        for (i, c) in self.folded.char_indices() {
            match (c.is_whitespace(), start) {
                (true, Some(s)) => {
                    words.push(self.word(s, i));
                    start = None;
                }
                (false, None) => start = Some(i),
                _ => {}
            }
        }
        if let Some(s) = start {
            words.push(self.word(s, self.folded.len()));
        }

        words
    }

    fn word(&self, start: usize, end: usize) -> Word<'_> {
        Word {
            folded: &self.folded[start..end],
            range: self.to_original(start)..self.to_original(end),
        }
    }
}

/// Replace every occurrence of the folded `pattern` outside string literals.
/// `text` must already be free of comments, so a `//` produced by an earlier
/// replacement does not hide the rest of the line.
/// Returns the new text and the number of replacements.
pub fn replace_all(text: &str, pattern: &str, replacement: &str, mode: Match) -> (String, usize) {
    let line = FoldedLine::new(text);
    let ranges: Vec<Range<usize>> = line
        .find_masked(pattern, mode, &literal_mask(line.folded()))
        .into_iter()
        .map(|start| line.to_original(start)..line.to_original(start + pattern.len()))
        .collect();
    splice(text, &ranges, replacement)
}

/// Rewrite every call to `name` as `replacement(`, dropping any whitespace
/// before the parenthesis. Same contract as [`replace_all`].
pub fn replace_calls(text: &str, name: &str, replacement: &str) -> (String, usize) {
    let line = FoldedLine::new(text);
    let ranges: Vec<Range<usize>> = line
        .find_calls(name)
        .into_iter()
        .map(|call| line.to_original(call.start)..line.to_original(call.end))
        .collect();
    splice(text, &ranges, &format!("{}(", replacement))
}

fn splice(text: &str, ranges: &[Range<usize>], replacement: &str) -> (String, usize) {
    if ranges.is_empty() {
        return (text.to_string(), 0);
    }

    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for range in ranges {
        out.push_str(&text[last..range.start]);
        out.push_str(replacement);
        last = range.end;
    }
    out.push_str(&text[last..]);

    (out, ranges.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold() {
        assert_eq!(fold("Début"), "debut");
        assert_eq!(fold("ÉCRIRE"), "ecrire");
        assert_eq!(fold("Réel"), "reel");
        assert_eq!(fold("à"), "a");
        assert_eq!(fold("Chaîne"), "chaine");
    }

    #[test]
    fn test_folded_positions_map_back() {
        let line = FoldedLine::new("Écrire(été, x);");
        let paren = line.folded().find('(').unwrap();
        assert_eq!(line.slice(0..paren), "Écrire");
        assert_eq!(line.slice_from(paren + 1), "été, x);");
    }

    #[test]
    fn test_identifiers() {
        assert!(is_identifier("somme"));
        assert!(is_identifier("_tmp2"));
        assert!(!is_identifier("2x"));
        assert!(!is_identifier("ma var"));
        assert!(!is_identifier("été"));
        assert!(!is_identifier(""));
    }

    #[test]
    fn test_strip_comment() {
        assert_eq!(strip_comment("x <- 1; // set x"), "x <- 1; ");
        assert_eq!(strip_comment("ecrire(\"http://a\");"), "ecrire(\"http://a\");");
        assert_eq!(strip_comment("// all comment"), "");
    }

    #[test]
    fn test_word_search() {
        let line = FoldedLine::new("Si fini ET non trouve alors");
        assert!(line.contains_word("et"));
        assert!(line.contains_word("alors"));
        assert!(!line.contains_word("fin"));
        assert!(line.starts_with_word("si"));
        assert!(!FoldedLine::new("sinon").starts_with_word("si"));
    }

    #[test]
    fn test_search_skips_literals_and_comments() {
        let line = FoldedLine::new("ecrire(\"vrai et faux\") // et");
        assert!(!line.contains_word("et"));
        assert!(!line.contains_word("vrai"));
        assert!(line.contains_word("ecrire"));
    }

    #[test]
    fn test_words() {
        let line = FoldedLine::new("Pour i de 1 à n faire");
        let words: Vec<&str> = line.words().iter().map(|w| w.folded).collect();
        assert_eq!(words, vec!["pour", "i", "de", "1", "a", "n", "faire"]);
        let a = &line.words()[4];
        assert_eq!(&line.original()[a.range.clone()], "à");
    }

    #[test]
    fn test_replace_all() {
        let (out, n) = replace_all("a ET b et \"et\"", "et", "and", Match::Word);
        assert_eq!(out, "a and b and \"et\"");
        assert_eq!(n, 2);

        let (out, n) = replace_all("x Div 2", " div ", " // ", Match::Text);
        assert_eq!(out, "x // 2");
        assert_eq!(n, 1);

        let (out, n) = replace_all("a // 2 ET b", "et", "and", Match::Word);
        assert_eq!(out, "a // 2 and b");
        assert_eq!(n, 1);
    }

    #[test]
    fn test_statement_terminator() {
        assert!(is_terminated("lire(x) ;"));
        assert!(is_terminated("sortir;  "));
        assert!(!is_terminated("sortir"));
        assert_eq!(statement_body("  sortir ; "), "sortir");
        assert_eq!(statement_body("ecrire(x) ;"), "ecrire(x)");
        assert_eq!(statement_body("finsi"), "finsi");
    }

    #[test]
    fn test_find_calls() {
        let line = FoldedLine::new("y <- Racine (x) + racine(2) + racines(3);");
        let calls: Vec<&str> = line.find_calls("racine").into_iter().map(|r| line.slice(r)).collect();
        assert_eq!(calls, vec!["Racine (", "racine("]);

        assert!(FoldedLine::new("ecrire(\"lire(x)\");").find_calls("lire").is_empty());
        assert!(FoldedLine::new("relire(x);").find_calls("lire").is_empty());
    }

    #[test]
    fn test_replace_calls() {
        let (out, n) = replace_calls("x <- racine (y) + RACINE(2)", "racine", "math.sqrt");
        assert_eq!(out, "x <- math.sqrt(y) + math.sqrt(2)");
        assert_eq!(n, 2);

        let (out, n) = replace_calls("ecrire(\"racine (4)\")", "racine", "math.sqrt");
        assert_eq!(out, "ecrire(\"racine (4)\")");
        assert_eq!(n, 0);
    }
}
