use super::*;
use crate::index::LiteralIndex;
use crate::parser::{is_path_safe_key, literal_ending_with};
use rayon::prelude::*;
use tracing::debug;

/// How one identity key is searched for in a file's text.
pub(crate) enum KeyPattern<'a> {
    /// Key made of path-safe characters: a quoted literal must end with it.
    Suffix(&'a str),
    /// Any other key: `['"][path-safe]*<key>['"]` over the raw text.
    Regex(Regex),
}

impl<'a> KeyPattern<'a> {
    pub(crate) fn new(key: &'a str) -> Result<Self> {
        if is_path_safe_key(key) {
            return Ok(Self::Suffix(key));
        }

        let pattern = format!(r#"['"]{PATH_SAFE_CLASS}*{}['"]"#, regex::escape(key));
        let re = Regex::new(&pattern)
            .with_context(|| format!("Failed to build reference pattern for key: {key}"))?;
        Ok(Self::Regex(re))
    }

    pub(crate) fn is_match(&self, source: &str) -> bool {
        match self {
            Self::Suffix(key) => literal_ending_with(source, key).is_some(),
            Self::Regex(re) => re.is_match(source),
        }
    }
}

struct Keys<'a> {
    name: KeyPattern<'a>,
    /// `None` when the path key adds nothing over the name key.
    path: Option<KeyPattern<'a>>,
}

impl<'a> Keys<'a> {
    fn for_file(file: &'a SourceFile) -> Result<Self> {
        let path = if file.path_key != file.name_key {
            Some(KeyPattern::new(&file.path_key)?)
        } else {
            None
        };

        Ok(Self {
            name: KeyPattern::new(&file.name_key)?,
            path,
        })
    }
}

/// Baseline search: every candidate re-reads every other corpus file and stops at the
/// first one that matches.
pub(crate) fn scan_usages(corpus: &Corpus) -> Result<Vec<Usage>> {
    corpus
        .candidates
        .par_iter()
        .map(|&candidate| scan_candidate(corpus, candidate))
        .collect()
}

fn scan_candidate(corpus: &Corpus, candidate: usize) -> Result<Usage> {
    let target = &corpus.files[candidate];
    let keys = Keys::for_file(target)?;

    for (idx, other) in corpus.files.iter().enumerate() {
        if idx == candidate {
            continue;
        }

        let source = match fs::read_to_string(&other.path) {
            Ok(source) => source,
            Err(err) => {
                debug!(file = %other.path.display(), error = %err, "unreadable, contributes no references");
                continue;
            }
        };

        if keys.name.is_match(&source) {
            let via = match &keys.path {
                Some(path) if path.is_match(&source) => KeyKind::Path,
                _ => KeyKind::Name,
            };
            return Ok(referenced(target, other, via));
        }
    }

    Ok(unreferenced(target))
}

/// Reads the corpus once into a [`LiteralIndex`] and answers every candidate from it.
/// Produces exactly what [`scan_usages`] produces.
pub(crate) fn index_usages(corpus: &Corpus) -> Result<Vec<Usage>> {
    let index = LiteralIndex::build(corpus);

    corpus
        .candidates
        .par_iter()
        .map(|&candidate| index_candidate(corpus, &index, candidate))
        .collect()
}

fn index_candidate(corpus: &Corpus, index: &LiteralIndex, candidate: usize) -> Result<Usage> {
    let target = &corpus.files[candidate];
    let keys = Keys::for_file(target)?;

    let Some(found) = index.first_match(&keys.name, candidate) else {
        return Ok(unreferenced(target));
    };

    let via = match &keys.path {
        Some(path) if index.file_matches(path, found) => KeyKind::Path,
        _ => KeyKind::Name,
    };
    Ok(referenced(target, &corpus.files[found], via))
}

fn referenced(target: &SourceFile, by: &SourceFile, via: KeyKind) -> Usage {
    debug!(
        file = %target.path.display(),
        referenced_by = %by.path.display(),
        via = ?via,
        "referenced"
    );
    Usage {
        file: target.path.clone(),
        referenced_by: Some(Reference {
            file: by.path.clone(),
            via,
        }),
    }
}

fn unreferenced(target: &SourceFile) -> Usage {
    debug!(file = %target.path.display(), "no references found");
    Usage {
        file: target.path.clone(),
        referenced_by: None,
    }
}
