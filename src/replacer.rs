use crate::args::ReplacementSpec;
use crate::case;
use anyhow::{Context, Result};
use regex::{Captures, Regex, RegexBuilder};

/// A case-insensitive literal pattern and the term that replaces its matches
#[derive(Debug)]
struct CasePass {
    pattern: Regex,
    new: String,
}

impl CasePass {
    /// Compile a pass for a literal term; None for an empty term, which never matches
    fn compile(old: &str, new: &str) -> Result<Option<Self>> {
        if old.is_empty() {
            return Ok(None);
        }
        let pattern = RegexBuilder::new(&regex::escape(old))
            .case_insensitive(true)
            .build()
            .with_context(|| format!("Failed to build a matcher for {:?}", old))?;
        Ok(Some(Self {
            pattern,
            new: new.to_string(),
        }))
    }

    fn apply(&self, content: &str) -> String {
        self.pattern
            .replace_all(content, |caps: &Captures| case::match_case(&caps[0], &self.new))
            .into_owned()
    }
}

/// Applies one replacement term to arbitrary text
///
/// Matchers are compiled once, so the same replacer serves every path and
/// file content of a run.
#[derive(Debug)]
pub struct Replacer {
    spec: ReplacementSpec,
    primary: Option<CasePass>,
    joined: Option<CasePass>,
}

impl Replacer {
    /// Build a replacer for a replacement spec
    ///
    /// # Arguments
    /// * `spec` - The terms and the case mode
    ///
    /// # Returns
    /// * `Result<Replacer>` - Error only when a term is too large to compile
    pub fn new(spec: ReplacementSpec) -> Result<Self> {
        let (primary, joined) = if spec.preserve_case {
            let primary = CasePass::compile(&spec.old_term, &spec.new_term)?;
            // "foo bar" also matches "foobar" / "FooBar"
            let joined = if spec.old_term.contains(' ') {
                CasePass::compile(&strip_spaces(&spec.old_term), &strip_spaces(&spec.new_term))?
            } else {
                None
            };
            (primary, joined)
        } else {
            (None, None)
        };

        Ok(Self {
            spec,
            primary,
            joined,
        })
    }

    /// Replace every occurrence of the old term in `content`
    ///
    /// # Arguments
    /// * `content` - The text to replace in
    ///
    /// # Returns
    /// * `String` - The replaced text
    pub fn replace(&self, content: &str) -> String {
        if !self.spec.preserve_case {
            if self.spec.old_term.is_empty() {
                return content.to_string();
            }
            return content.replace(&self.spec.old_term, &self.spec.new_term);
        }

        let mut result = match &self.primary {
            Some(pass) => pass.apply(content),
            None => content.to_string(),
        };
        if let Some(pass) = &self.joined {
            result = pass.apply(&result);
        }
        result
    }
}

fn strip_spaces(s: &str) -> String {
    s.replace(' ', "")
}
