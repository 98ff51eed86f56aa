use super::*;
use crate::matcher::KeyPattern;
use crate::parser::{is_path_safe_key, quoted_literals};
use rayon::prelude::*;
use std::collections::HashSet;
use tracing::{info, warn};

/// Literal suffixes that equal some candidate's name or path key, mapped to the files
/// (by corpus index) whose text holds such a literal.
///
/// "Does some literal in file F end with K" becomes "is F in `suffixes[K]`", and the
/// first referencing file is the smallest index in that set. Only the last
/// `longest key` bytes of a literal are looked at, so long generated strings cost no
/// more than short ones.
pub(crate) struct LiteralIndex {
    /// `None` for files that could not be read as UTF-8 text.
    texts: Vec<Option<String>>,
    suffixes: HashMap<String, BTreeSet<usize>>,
}

impl LiteralIndex {
    pub(crate) fn build(corpus: &Corpus) -> Self {
        let texts: Vec<Option<String>> = corpus
            .files
            .par_iter()
            .map(|file| match fs::read_to_string(&file.path) {
                Ok(text) => Some(text),
                Err(err) => {
                    warn!(file = %file.path.display(), error = %err, "unreadable, contributes no references");
                    None
                }
            })
            .collect();

        let keys = lookup_keys(corpus);
        let longest = keys.iter().map(|key| key.len()).max().unwrap_or(0);

        let mut suffixes: HashMap<String, BTreeSet<usize>> = HashMap::new();
        for (idx, text) in texts.iter().enumerate() {
            let Some(text) = text else {
                continue;
            };

            for literal in quoted_literals(text) {
                // Literals are ASCII, so every byte offset is a char boundary.
                for start in literal.len().saturating_sub(longest)..literal.len() {
                    let suffix = &literal[start..];
                    if !keys.contains(suffix) {
                        continue;
                    }
                    suffixes
                        .entry(suffix.to_string())
                        .or_default()
                        .insert(idx);
                }
            }
        }

        info!(
            files = texts.len(),
            unreadable = texts.iter().filter(|t| t.is_none()).count(),
            suffixes = suffixes.len(),
            "built literal index"
        );

        Self { texts, suffixes }
    }

    /// Smallest corpus index other than `exclude` whose text matches `pattern`.
    pub(crate) fn first_match(&self, pattern: &KeyPattern<'_>, exclude: usize) -> Option<usize> {
        match pattern {
            KeyPattern::Suffix(key) => self
                .suffixes
                .get(*key)?
                .iter()
                .copied()
                .find(|&idx| idx != exclude),
            KeyPattern::Regex(_) => self
                .texts
                .iter()
                .enumerate()
                .filter(|(idx, _)| *idx != exclude)
                .find(|(_, text)| text.as_deref().is_some_and(|t| pattern.is_match(t)))
                .map(|(idx, _)| idx),
        }
    }

    pub(crate) fn file_matches(&self, pattern: &KeyPattern<'_>, idx: usize) -> bool {
        match pattern {
            KeyPattern::Suffix(key) => self
                .suffixes
                .get(*key)
                .is_some_and(|files| files.contains(&idx)),
            KeyPattern::Regex(_) => self
                .texts
                .get(idx)
                .and_then(|text| text.as_deref())
                .is_some_and(|t| pattern.is_match(t)),
        }
    }
}

/// Keys answered from the suffix map. The rest go through [`KeyPattern::Regex`].
fn lookup_keys(corpus: &Corpus) -> HashSet<&str> {
    corpus
        .candidates()
        .flat_map(|file| [file.name_key(), file.path_key()])
        .filter(|key| is_path_safe_key(key))
        .collect()
}
