use crate::classify::Classifier;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Replacement rule, fixed for the whole run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacementSpec {
    /// String to replace
    pub old_term: String,

    /// String to replace with
    pub new_term: String,

    /// Apply the case of each match to the replacement
    pub preserve_case: bool,
}

/// What a run is allowed to change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Rename files and folders
    pub rename_names: bool,

    /// Rewrite file contents
    pub rewrite_content: bool,

    /// Move with `git mv` inside a git work tree
    pub use_git: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            rename_names: true,
            rewrite_content: true,
            use_git: true,
        }
    }
}

/// Command line arguments parser
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Replace a string in file contents and in file and folder names, preserving case"
)]
#[command(name = "recase")]
pub struct Args {
    /// The string to replace
    pub old: String,

    /// The replacement string
    pub new: String,

    /// Files or folders to process
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Simple replacement, do not preserve case
    #[arg(long = "simple-replace")]
    pub simple_replace: bool,

    /// Only replace in file and folder names
    #[arg(long = "replace-in-name-only")]
    pub replace_in_name_only: bool,

    /// Only replace in file content
    #[arg(long = "replace-in-file-only")]
    pub replace_in_file_only: bool,

    /// Rename with plain filesystem moves even inside a git work tree
    #[arg(long = "no-git")]
    pub no_git: bool,

    /// Extra extension to always treat as text
    #[arg(long = "assume-text", value_name = "EXT", action = ArgAction::Append)]
    pub assume_text: Vec<String>,

    /// Extra extension to always treat as binary
    #[arg(long = "assume-binary", value_name = "EXT", action = ArgAction::Append)]
    pub assume_binary: Vec<String>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Args {
    pub fn replacement_spec(&self) -> ReplacementSpec {
        ReplacementSpec {
            old_term: self.old.clone(),
            new_term: self.new.clone(),
            preserve_case: !self.simple_replace,
        }
    }

    /// Both "only" flags together disable both modes, which leaves nothing to do
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            rename_names: !self.replace_in_file_only,
            rewrite_content: !self.replace_in_name_only,
            use_git: !self.no_git,
        }
    }

    pub fn classifier(&self) -> Classifier {
        Classifier::default()
            .with_text_extensions(&self.assume_text)
            .with_binary_extensions(&self.assume_binary)
    }
}

/// Parse command line arguments
///
/// Exits with a usage error when the arguments are invalid.
pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn parse_from(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse_from(&["recase", "abc", "cde", "src", "docs"]);
        assert_eq!(args.paths, vec![PathBuf::from("src"), PathBuf::from("docs")]);
        assert_eq!(
            args.replacement_spec(),
            ReplacementSpec {
                old_term: "abc".to_string(),
                new_term: "cde".to_string(),
                preserve_case: true,
            }
        );
        assert_eq!(args.run_options(), RunOptions::default());
    }

    #[test]
    fn test_mode_flags() {
        let args = parse_from(&[
            "recase",
            "--simple-replace",
            "--replace-in-name-only",
            "a",
            "b",
            ".",
        ]);
        assert!(!args.replacement_spec().preserve_case);
        let options = args.run_options();
        assert!(options.rename_names);
        assert!(!options.rewrite_content);

        let args = parse_from(&["recase", "--replace-in-file-only", "--no-git", "a", "b", "."]);
        let options = args.run_options();
        assert!(!options.rename_names);
        assert!(options.rewrite_content);
        assert!(!options.use_git);
    }

    #[test]
    fn test_both_only_flags_disable_everything() {
        let args = parse_from(&[
            "recase",
            "--replace-in-name-only",
            "--replace-in-file-only",
            "a",
            "b",
            ".",
        ]);
        let options = args.run_options();
        assert!(!options.rename_names);
        assert!(!options.rewrite_content);
    }

    #[test]
    fn test_requires_a_path() {
        assert!(Args::try_parse_from(["recase", "a", "b"]).is_err());
    }

    #[test]
    fn test_multi_word_terms_and_extensions() {
        let args = parse_from(&[
            "recase",
            "foo bar",
            "baz qux",
            "--assume-binary",
            "md",
            "--assume-text",
            ".png",
            "notes",
        ]);
        assert_eq!(args.old, "foo bar");
        assert_eq!(args.new, "baz qux");

        let classifier = args.classifier();
        assert!(classifier.is_binary(Path::new("missing/readme.md")).unwrap());
        assert!(!classifier.is_binary(Path::new("missing/logo.png")).unwrap());
    }
}
